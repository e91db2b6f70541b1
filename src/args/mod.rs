//! Command-line handling for koord.
//!
//! ```text
//! argv → Match → Classify → Resolve mode → (config::validation)
//! ```
//!
//! Each stage returns a value or a typed error; none of them exits.

mod classifier;
mod matcher;
mod mode;
mod registry;
mod uri;

pub use classifier::{classify, OptionsSeen, ParseOutcome, ParsedArgs};
pub use matcher::{
    match_def, match_flag, match_numeric, match_text, parse_numeric, OptionValue, RawOption,
};
pub use mode::{resolve_mode, Mode};
pub use registry::{names, OptionArity, OptionDef, OptionRegistry, OptionRole, MAX_NUM_CHANNELS};
pub use uri::{fix_address, parse_launch_uri, strip_scheme, URI_SCHEME};
