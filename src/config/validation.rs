//! Cross-option validation.
//!
//! Runs after the mode is known. None of these checks is fatal: an unusable
//! value is cleared and a warning is recorded, and the remaining checks still
//! run.

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::net::IpAddr;
use std::path::Path;

use crate::args::Mode;
use crate::capabilities::Capabilities;
use crate::config::pending::PendingConfiguration;
use crate::config::types::{FilterEntry, ListFilter, CLIENT_PORT_OFFSET, DEFAULT_PORT_NUMBER};

/// A non-fatal problem found while validating options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// Canonical long name of the option concerned.
    pub option: &'static str,
    pub message: String,
}

impl ConfigWarning {
    fn new(option: &'static str, message: impl Into<String>) -> Self {
        Self {
            option,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of a single check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accepted,
    /// Value kept, but problems were reported.
    AcceptedWithWarnings(Vec<ConfigWarning>),
    /// Value reset to empty or disabled.
    Cleared(Vec<ConfigWarning>),
}

impl ValidationOutcome {
    fn cleared(warning: ConfigWarning) -> Self {
        ValidationOutcome::Cleared(vec![warning])
    }

    pub fn warnings(&self) -> &[ConfigWarning] {
        match self {
            ValidationOutcome::Accepted => &[],
            ValidationOutcome::AcceptedWithWarnings(w) | ValidationOutcome::Cleared(w) => w,
        }
    }
}

/// Validated values plus every warning raised on the way.
#[derive(Debug, Clone)]
pub struct Validated {
    pub pending: PendingConfiguration,
    pub warnings: Vec<ConfigWarning>,
}

/// Literal loopback spellings that make a server host its own directory.
pub fn is_loopback_directory(address: &str) -> bool {
    address.eq_ignore_ascii_case("localhost") || address == "127.0.0.1"
}

/// Ordered set of checks for one resolved mode.
pub struct ValidationPipeline {
    mode: Mode,
    caps: Capabilities,
}

impl ValidationPipeline {
    pub fn new(mode: Mode, caps: Capabilities) -> Self {
        Self { mode, caps }
    }

    /// Run every check that applies to the mode, in order.
    pub fn run(&self, mut pending: PendingConfiguration) -> Validated {
        let mut outcomes = vec![check_gui_available(&mut pending, &self.caps)];

        match self.mode {
            Mode::Client => {
                outcomes.push(check_mute_my_own(&mut pending));
                outcomes.push(derive_client_port(&mut pending));
            }
            Mode::Server => {
                if !pending.use_gui {
                    outcomes.push(check_ini_file_headless_server(&mut pending));
                }
                outcomes.extend(check_directory_role(&mut pending));
                outcomes.push(check_public_ip(&mut pending));
                outcomes.push(check_bind_ip(&mut pending));
            }
        }

        let warnings: Vec<ConfigWarning> = outcomes
            .iter()
            .flat_map(|outcome| outcome.warnings().iter().cloned())
            .collect();
        for warning in &warnings {
            tracing::warn!(option = warning.option, "{}", warning.message);
        }

        Validated { pending, warnings }
    }
}

/// A requested GUI is switched off when none is compiled in.
pub fn check_gui_available(
    pending: &mut PendingConfiguration,
    caps: &Capabilities,
) -> ValidationOutcome {
    if caps.interactive_ui || !pending.use_gui {
        return ValidationOutcome::Accepted;
    }
    pending.use_gui = false;
    ValidationOutcome::cleared(ConfigWarning::new(
        crate::args::names::NOGUI,
        "No GUI support compiled. Running in headless mode.",
    ))
}

/// Muting oneself in the personal mix is a headless-only feature.
pub fn check_mute_my_own(pending: &mut PendingConfiguration) -> ValidationOutcome {
    if !(pending.use_gui && pending.mute_me_in_personal_mix) {
        return ValidationOutcome::Accepted;
    }
    pending.mute_me_in_personal_mix = false;
    ValidationOutcome::cleared(ConfigWarning::new(
        crate::args::names::MUTE_MY_OWN,
        "Mute my own signal in my personal mix is only supported in headless mode.",
    ))
}

/// Client default port sits above the server default.
pub fn derive_client_port(pending: &mut PendingConfiguration) -> ValidationOutcome {
    if pending.port.is_none() {
        let port = DEFAULT_PORT_NUMBER + CLIENT_PORT_OFFSET;
        pending.port = Some(port);
        tracing::info!("- allocated port number: {}", port);
    }
    ValidationOutcome::Accepted
}

/// The headless server never reads an init file.
pub fn check_ini_file_headless_server(pending: &mut PendingConfiguration) -> ValidationOutcome {
    if pending.ini_file.take().is_none() {
        return ValidationOutcome::Accepted;
    }
    ValidationOutcome::cleared(ConfigWarning::new(
        crate::args::names::INIFILE,
        "No initialization file support in headless server mode.",
    ))
}

/// Persistence file and list filter only apply to a server hosting its own
/// directory.
pub fn check_directory_role(pending: &mut PendingConfiguration) -> Vec<ValidationOutcome> {
    use crate::args::names::{DIRECTORY_FILE, LIST_FILTER};

    let hosting = pending
        .directory_server
        .as_deref()
        .is_some_and(is_loopback_directory);

    if !hosting {
        let mut outcomes = Vec::new();
        if pending.server_list_file.take().is_some() {
            outcomes.push(ValidationOutcome::cleared(ConfigWarning::new(
                DIRECTORY_FILE,
                "Server list persistence file will only take effect when running as a directory server.",
            )));
        }
        if pending.list_filter.take().is_some() {
            outcomes.push(ValidationOutcome::cleared(ConfigWarning::new(
                LIST_FILTER,
                "Server list filter will only take effect when running as a directory server.",
            )));
        }
        return outcomes;
    }

    let mut outcomes = Vec::new();
    if let Some(path) = pending.server_list_file.clone() {
        if let Err(message) = probe_persistence_file(Path::new(&path)) {
            pending.server_list_file = None;
            outcomes.push(ValidationOutcome::cleared(ConfigWarning::new(
                DIRECTORY_FILE,
                message,
            )));
        }
    }
    if let Some(filter) = pending.list_filter.as_deref() {
        outcomes.push(diagnose_list_filter(filter));
    }
    outcomes
}

/// The persistence file must be a plain, readable and writable file; a
/// missing one is created.
pub fn probe_persistence_file(path: &Path) -> Result<(), String> {
    let shown = path.display();
    match std::fs::metadata(path) {
        Err(e) if e.kind() == ErrorKind::NotFound => OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map(drop)
            .map_err(|_| {
                format!("Cannot create {shown} for reading and writing.  Please check permissions.")
            }),
        Err(_) => Err(format!(
            "Server list file {shown} must be readable and writeable.  Please check the permissions."
        )),
        Ok(meta) if !meta.is_file() => Err(format!(
            "Server list file {shown} must be a plain file.  Please check the name."
        )),
        Ok(_) => OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map(drop)
            .map_err(|_| {
                format!(
                    "Server list file {shown} must be readable and writeable.  Please check the permissions."
                )
            }),
    }
}

/// Report malformed filter entries. The filter is kept as given.
pub fn diagnose_list_filter(filter: &str) -> ValidationOutcome {
    let warnings: Vec<ConfigWarning> = ListFilter::new(filter)
        .entries()
        .into_iter()
        .filter_map(|entry| match entry {
            FilterEntry::Address(_) | FilterEntry::Version(_) => None,
            FilterEntry::Empty => Some(ConfigWarning::new(
                crate::args::names::LIST_FILTER,
                "There is empty entry in the server list filter that will be ignored",
            )),
            FilterEntry::Invalid(entry) => Some(ConfigWarning::new(
                crate::args::names::LIST_FILTER,
                format!(
                    "{entry} is not a valid server list filter entry. Only plain IP addresses are supported"
                ),
            )),
        })
        .collect();

    if warnings.is_empty() {
        ValidationOutcome::Accepted
    } else {
        ValidationOutcome::AcceptedWithWarnings(warnings)
    }
}

/// A public IP only matters when registering with a directory.
///
/// An accepted value is kept parsed in `public_ip_addr`.
pub fn check_public_ip(pending: &mut PendingConfiguration) -> ValidationOutcome {
    use crate::args::names::SERVER_PUBLIC_IP;

    pending.public_ip_addr = None;
    let Some(public_ip) = pending.public_ip.as_deref() else {
        return ValidationOutcome::Accepted;
    };
    let message = if pending.directory_server.is_none() {
        "Server Public IP will only take effect when registering a server with a directory server."
    } else if let Ok(addr) = public_ip.parse::<IpAddr>() {
        pending.public_ip_addr = Some(addr);
        return ValidationOutcome::Accepted;
    } else {
        "Server Public IP is invalid. Only plain IP addresses are supported."
    };
    pending.public_ip = None;
    ValidationOutcome::cleared(ConfigWarning::new(SERVER_PUBLIC_IP, message))
}

/// An invalid bind address falls back to binding all interfaces.
///
/// An accepted value is kept parsed in `bind_ip_addr`.
pub fn check_bind_ip(pending: &mut PendingConfiguration) -> ValidationOutcome {
    pending.bind_ip_addr = None;
    let Some(bind_ip) = pending.bind_ip.as_deref() else {
        return ValidationOutcome::Accepted;
    };
    match bind_ip.parse::<IpAddr>() {
        Ok(addr) => {
            pending.bind_ip_addr = Some(addr);
            ValidationOutcome::Accepted
        }
        Err(_) => {
            pending.bind_ip = None;
            ValidationOutcome::cleared(ConfigWarning::new(
                crate::args::names::SERVER_BIND_IP,
                "Server Bind IP is invalid. Only plain IP addresses are supported.",
            ))
        }
    }
}
