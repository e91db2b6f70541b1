mod assembler;
mod loader;
mod pending;
pub mod types;
pub mod validation;

pub use assembler::assemble;
pub use loader::{ClientSettings, InitFileSettings, ServerSettings, SettingsError};
pub use pending::PendingConfiguration;
pub use types::*;
pub use validation::{ConfigWarning, Validated, ValidationOutcome, ValidationPipeline};
