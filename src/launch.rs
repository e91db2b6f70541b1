//! Launch pipeline: raw argv to a running actor.
//!
//! [`resolve`] is pure apart from brief file probes and returns a typed
//! error instead of exiting, so every startup decision can be tested.
//! [`run`] performs the side effects: RPC bootstrap, actor construction and
//! the actor's run loop.

use crate::actor;
use crate::args::{classify, resolve_mode, Mode, OptionRegistry, ParseOutcome};
use crate::capabilities::Capabilities;
use crate::config::{
    assemble, ConfigWarning, InitFileSettings, PendingConfiguration, ResolvedConfiguration,
    Validated, ValidationPipeline,
};
use crate::error::StartupError;
use crate::rpc;
use crate::shutdown::ShutdownHandle;
use crate::usage::{help_text, version_text};

/// What the process should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launch {
    /// Print help and exit successfully.
    Help(String),
    /// Print version and exit successfully.
    Version(String),
    Run(LaunchPlan),
}

/// Everything decided before any actor exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub config: ResolvedConfiguration,
    /// Soft problems that were corrected; already logged.
    pub warnings: Vec<ConfigWarning>,
    /// Tokens skipped because the build tolerates unknown arguments.
    pub ignored_args: Vec<String>,
}

/// Turn `args` (program name excluded) into a launch decision.
pub fn resolve(
    program: &str,
    args: &[String],
    caps: &Capabilities,
) -> Result<Launch, StartupError> {
    let registry = OptionRegistry::standard();

    let parsed = match classify(args, &registry, caps)? {
        ParseOutcome::Help => return Ok(Launch::Help(help_text(program, &registry))),
        ParseOutcome::Version => return Ok(Launch::Version(version_text())),
        ParseOutcome::Options(parsed) => parsed,
    };

    let mode = resolve_mode(&parsed.seen, caps)?;
    let ignored_args = parsed.ignored.clone();

    let pending = PendingConfiguration::from_args(parsed);
    let Validated { pending, warnings } = ValidationPipeline::new(mode, *caps).run(pending);
    let config = assemble(pending, mode);

    tracing::debug!(mode = %mode, port = config.port, "configuration resolved");
    Ok(Launch::Run(LaunchPlan {
        config,
        warnings,
        ignored_args,
    }))
}

/// Bootstrap the remote-control listener, construct the actor and run it
/// until shutdown.
///
/// The RPC credential is loaded before the actor exists, so a bad secret
/// never leaves a half-started actor behind.
pub async fn run(plan: LaunchPlan, shutdown: ShutdownHandle) -> Result<(), StartupError> {
    let config = plan.config;
    let mode = config.mode();

    let rpc = match &config.rpc {
        Some(settings) => Some(rpc::bootstrap(settings, mode, shutdown.clone()).await?),
        None => None,
    };

    let settings = init_file_settings(&config);
    if let Some(language) = ui_language(&config, &settings) {
        tracing::info!("- language: {}", language);
    }
    let actor = actor::dispatch(config, &settings, rpc.as_ref())?;
    tracing::info!(mode = %actor.mode(), addr = %actor.local_addr(), "startup complete");

    actor.run(shutdown).await?;
    if let Some(rpc) = rpc {
        rpc.join().await;
    }
    Ok(())
}

fn init_file_settings(config: &ResolvedConfiguration) -> InitFileSettings {
    if config.mode() == Mode::Server && !config.use_gui {
        return InitFileSettings::default();
    }
    InitFileSettings::load_or_default(config.ini_file.as_deref())
}

/// Language from the init file, unless translations are switched off.
fn ui_language<'a>(
    config: &ResolvedConfiguration,
    settings: &'a InitFileSettings,
) -> Option<&'a str> {
    config
        .use_translation
        .then_some(settings.language.as_deref())
        .flatten()
}
