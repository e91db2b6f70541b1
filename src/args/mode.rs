//! Mode resolver: runs once, after every token has been classified.

use serde::Serialize;

use crate::args::classifier::OptionsSeen;
use crate::args::registry::names;
use crate::capabilities::Capabilities;
use crate::error::StartupError;

/// Operating mode of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Client,
    Server,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Client => "client",
            Mode::Server => "server",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Determine the operating mode and reject options from the other mode.
///
/// The conflict check only happens here: an option legal for the final mode
/// may well appear before the `--server` flag that selects it.
pub fn resolve_mode(seen: &OptionsSeen, caps: &Capabilities) -> Result<Mode, StartupError> {
    let mode = if caps.server_by_default || seen.contains(names::SERVER) {
        Mode::Server
    } else {
        Mode::Client
    };

    if mode == Mode::Client && caps.server_only {
        return Err(StartupError::UnsupportedMode);
    }

    let (opposing, label, hint) = match mode {
        Mode::Client => (Mode::Server, "Server", "Did you omit '--server'?"),
        Mode::Server => (Mode::Client, "Client", "See '--help' for help"),
    };
    let conflicting = seen.restricted_to(opposing);
    if !conflicting.is_empty() {
        return Err(StartupError::ModeConflict {
            mode: label,
            options: conflicting.join(", "),
            hint,
        });
    }

    tracing::debug!(%mode, "operating mode resolved");
    Ok(mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seen(all: &[&'static str], server: &[&'static str], client: &[&'static str]) -> OptionsSeen {
        OptionsSeen {
            all: all.to_vec(),
            server_only: server.to_vec(),
            client_only: client.to_vec(),
        }
    }

    #[test]
    fn client_is_the_default() {
        let mode = resolve_mode(&OptionsSeen::default(), &Capabilities::full()).unwrap();
        assert_eq!(mode, Mode::Client);
    }

    #[test]
    fn server_flag_selects_server() {
        let s = seen(&["--numchannels", "--server"], &["--numchannels", "--server"], &[]);
        assert_eq!(resolve_mode(&s, &Capabilities::full()).unwrap(), Mode::Server);
    }

    #[test]
    fn server_option_without_server_flag_is_rejected() {
        let s = seen(&["--welcomemessage"], &["--welcomemessage"], &[]);
        let err = resolve_mode(&s, &Capabilities::full()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Server only option(s) '--welcomemessage' used.  Did you omit '--server'?"
        );
    }

    #[test]
    fn client_option_in_server_mode_is_rejected() {
        let s = seen(
            &["--server", "--connect", "--mutestream"],
            &["--server"],
            &["--connect", "--mutestream"],
        );
        let err = resolve_mode(&s, &Capabilities::full()).unwrap_err();
        assert!(matches!(err, StartupError::ModeConflict { .. }));
        assert!(err.to_string().contains("'--connect, --mutestream'"));
    }

    #[test]
    fn server_default_build_needs_no_flag() {
        let s = seen(&["--numchannels"], &["--numchannels"], &[]);
        let caps = Capabilities {
            server_by_default: true,
            ..Capabilities::full()
        };
        assert_eq!(resolve_mode(&s, &caps).unwrap(), Mode::Server);
    }

    #[test]
    fn server_only_build_rejects_client_options() {
        let s = seen(&["--clientname"], &[], &["--clientname"]);
        let err = resolve_mode(&s, &Capabilities::server_only()).unwrap_err();
        assert!(matches!(err, StartupError::ModeConflict { mode: "Client", .. }));
    }
}
