//! Option registry: single source of truth for every command-line option.
//!
//! Which mode an option is legal in is decided here and nowhere else; the
//! classifier and the mode resolver both consult this table.

use crate::args::mode::Mode;

/// Upper bound for `--numchannels`.
pub const MAX_NUM_CHANNELS: u32 = 150;

/// Canonical long names.
pub mod names {
    pub const HELP: &str = "--help";
    pub const VERSION: &str = "--version";
    pub const INIFILE: &str = "--inifile";
    pub const NOGUI: &str = "--nogui";
    pub const PORT: &str = "--port";
    pub const JSONRPC_PORT: &str = "--jsonrpcport";
    pub const JSONRPC_SECRET_FILE: &str = "--jsonrpcsecretfile";
    pub const QOS: &str = "--qos";
    pub const NO_TRANSLATION: &str = "--notranslation";
    pub const ENABLE_IPV6: &str = "--enableipv6";

    pub const DISCONNECT_ON_QUIT: &str = "--discononquit";
    pub const DIRECTORY_SERVER: &str = "--directoryserver";
    pub const DIRECTORY_FILE: &str = "--directoryfile";
    pub const LIST_FILTER: &str = "--listfilter";
    pub const FAST_UPDATE: &str = "--fastupdate";
    pub const LOG: &str = "--log";
    pub const LICENCE: &str = "--licence";
    pub const HTML_STATUS: &str = "--htmlstatus";
    pub const SERVER_INFO: &str = "--serverinfo";
    pub const SERVER_PUBLIC_IP: &str = "--serverpublicip";
    pub const DELAY_PAN: &str = "--delaypan";
    pub const RECORDING: &str = "--recording";
    pub const NO_RECORD: &str = "--norecord";
    pub const SERVER: &str = "--server";
    pub const SERVER_BIND_IP: &str = "--serverbindip";
    pub const MULTITHREADING: &str = "--multithreading";
    pub const NUM_CHANNELS: &str = "--numchannels";
    pub const WELCOME_MESSAGE: &str = "--welcomemessage";
    pub const START_MINIMIZED: &str = "--startminimized";

    pub const CONNECT: &str = "--connect";
    pub const NO_JACK_CONNECT: &str = "--nojackconnect";
    pub const AUTOCONNECT: &str = "--autoconnect";
    pub const MUTE_STREAM: &str = "--mutestream";
    pub const MUTE_MY_OWN: &str = "--mutemyown";
    pub const CLIENT_NAME: &str = "--clientname";
    pub const CTRL_MIDI_CH: &str = "--ctrlmidich";

    pub const SHOW_ALL_SERVERS: &str = "--showallservers";
    pub const SHOW_ANALYZER_CONSOLE: &str = "--showanalyzerconsole";
}

/// Which mode an option belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionRole {
    /// Legal in both modes.
    Common,
    /// Only meaningful when running as a server.
    ServerOnly,
    /// Only meaningful when running as a client.
    ClientOnly,
    /// Debugging switches of the client front end, left out of `--help`.
    Undocumented,
}

impl OptionRole {
    /// The mode whose conflict set records this option, if any.
    pub fn restricted_to(self) -> Option<Mode> {
        match self {
            OptionRole::Common => None,
            OptionRole::ServerOnly => Some(Mode::Server),
            OptionRole::ClientOnly | OptionRole::Undocumented => Some(Mode::Client),
        }
    }
}

/// Whether an option takes a value, and of what shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionArity {
    /// Boolean switch, no value.
    Flag,
    /// Consumes the next token verbatim.
    Text,
    /// Consumes the next token as a number inside `min..=max`.
    Numeric { min: u32, max: u32 },
}

/// A single option definition.
#[derive(Debug, Clone)]
pub struct OptionDef {
    /// Canonical long form (e.g. "--port").
    pub long: &'static str,
    /// Other spellings: short forms and deprecated long forms.
    pub aliases: &'static [&'static str],
    pub arity: OptionArity,
    pub role: OptionRole,
    /// Human-readable description, used in help text and startup logging.
    pub description: &'static str,
}

impl OptionDef {
    /// Check if this definition matches the given token.
    pub fn matches(&self, token: &str) -> bool {
        token == self.long || self.aliases.contains(&token)
    }

    /// Short form shown in help output, if any.
    pub fn short(&self) -> Option<&'static str> {
        self.aliases
            .iter()
            .copied()
            .find(|alias| !alias.starts_with("--"))
    }
}

const fn def(
    long: &'static str,
    aliases: &'static [&'static str],
    arity: OptionArity,
    role: OptionRole,
    description: &'static str,
) -> OptionDef {
    OptionDef {
        long,
        aliases,
        arity,
        role,
        description,
    }
}

const PORT_RANGE: OptionArity = OptionArity::Numeric { min: 0, max: 65535 };

/// Immutable option lookup, built once at startup and passed to every stage
/// that needs to know about options.
#[derive(Debug, Clone)]
pub struct OptionRegistry {
    defs: Vec<OptionDef>,
}

impl OptionRegistry {
    /// The complete option table, in `--help` order.
    pub fn standard() -> Self {
        use names::*;
        use OptionArity::{Flag, Numeric, Text};
        use OptionRole::{ClientOnly, Common, ServerOnly, Undocumented};

        let defs = vec![
            // === Informational ===
            def(HELP, &["-h", "-?"], Flag, Common, "display this help text and exit"),
            def(VERSION, &["-v"], Flag, Common, "display version information and exit"),
            // === Common ===
            def(INIFILE, &["-i"], Text, Common, "initialization file name"),
            def(NOGUI, &["-n"], Flag, Common, "no GUI mode chosen"),
            def(PORT, &["-p"], PORT_RANGE, Common, "selected port number"),
            def(JSONRPC_PORT, &[], PORT_RANGE, Common, "JSON-RPC port number"),
            def(JSONRPC_SECRET_FILE, &[], Text, Common, "JSON-RPC secret file"),
            def(QOS, &["-Q"], Numeric { min: 0, max: 255 }, Common, "selected QoS value"),
            def(NO_TRANSLATION, &["-t"], Flag, Common, "translations disabled"),
            def(ENABLE_IPV6, &["-6"], Flag, Common, "IPv6 enabled"),
            // === Server only ===
            def(DISCONNECT_ON_QUIT, &["-d"], Flag, ServerOnly, "disconnect all clients on quit"),
            def(
                DIRECTORY_SERVER,
                &["-e", "--centralserver"],
                Text,
                ServerOnly,
                "directory server",
            ),
            def(DIRECTORY_FILE, &[], Text, ServerOnly, "directory server persistence file"),
            def(LIST_FILTER, &["-f"], Text, ServerOnly, "server list filter"),
            def(FAST_UPDATE, &["-F"], Flag, ServerOnly, "using 64 samples frame size mode"),
            def(LOG, &["-l"], Text, ServerOnly, "logging file name"),
            def(LICENCE, &["-L"], Flag, ServerOnly, "licence required"),
            def(HTML_STATUS, &["-m"], Text, ServerOnly, "HTML status file name"),
            def(SERVER_INFO, &["-o"], Text, ServerOnly, "server info"),
            def(SERVER_PUBLIC_IP, &[], Text, ServerOnly, "server public IP"),
            def(DELAY_PAN, &["-P"], Flag, ServerOnly, "starting with delay panning"),
            def(RECORDING, &["-R"], Text, ServerOnly, "recording directory name"),
            def(NO_RECORD, &[], Flag, ServerOnly, "recording will not take place until enabled"),
            def(SERVER, &["-s"], Flag, ServerOnly, "server mode chosen"),
            def(SERVER_BIND_IP, &[], Text, ServerOnly, "server bind IP"),
            def(MULTITHREADING, &["-T"], Flag, ServerOnly, "using multithreading"),
            def(
                NUM_CHANNELS,
                &["-u"],
                Numeric { min: 1, max: MAX_NUM_CHANNELS },
                ServerOnly,
                "maximum number of channels",
            ),
            def(WELCOME_MESSAGE, &["-w"], Text, ServerOnly, "welcome message"),
            def(START_MINIMIZED, &["-z"], Flag, ServerOnly, "start minimized enabled"),
            // === Client only ===
            def(CONNECT, &["-c"], Text, ClientOnly, "connect on startup to address"),
            def(NO_JACK_CONNECT, &["-j"], Flag, ClientOnly, "disable auto Jack connections"),
            def(AUTOCONNECT, &["-x"], Text, ClientOnly, "autoconnect on startup to address"),
            def(MUTE_STREAM, &["-M"], Flag, ClientOnly, "mute stream activated"),
            def(MUTE_MY_OWN, &[], Flag, ClientOnly, "mute me in my personal mix"),
            def(CLIENT_NAME, &[], Text, ClientOnly, "client name"),
            def(CTRL_MIDI_CH, &[], Text, ClientOnly, "MIDI controller settings"),
            // === Undocumented debugging switches ===
            def(
                SHOW_ALL_SERVERS,
                &[],
                Flag,
                Undocumented,
                "show all registered servers in server list",
            ),
            def(SHOW_ANALYZER_CONSOLE, &[], Flag, Undocumented, "show analyzer console"),
        ];

        Self { defs }
    }

    /// Definition matching a raw token, by any of its spellings.
    pub fn find(&self, token: &str) -> Option<&OptionDef> {
        self.defs.iter().find(|d| d.matches(token))
    }

    /// Definition by canonical long name.
    pub fn get(&self, long: &str) -> Option<&OptionDef> {
        self.defs.iter().find(|d| d.long == long)
    }

    /// Role of an option, by canonical long name.
    pub fn role_of(&self, long: &str) -> Option<OptionRole> {
        self.get(long).map(|d| d.role)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionDef> {
        self.defs.iter()
    }
}

impl Default for OptionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn spellings_are_unique() {
        let registry = OptionRegistry::standard();
        let mut seen = HashSet::new();
        for def in registry.iter() {
            assert!(seen.insert(def.long), "duplicate {}", def.long);
            for alias in def.aliases {
                assert!(seen.insert(alias), "duplicate {}", alias);
            }
        }
    }

    #[test]
    fn deprecated_central_server_maps_to_directory_server() {
        let registry = OptionRegistry::standard();
        let def = registry.find("--centralserver").expect("registered");
        assert_eq!(def.long, names::DIRECTORY_SERVER);
        assert_eq!(def.short(), Some("-e"));
    }

    #[test]
    fn server_flag_is_server_only() {
        let registry = OptionRegistry::standard();
        assert_eq!(registry.role_of(names::SERVER), Some(OptionRole::ServerOnly));
        assert_eq!(registry.role_of(names::PORT), Some(OptionRole::Common));
        assert_eq!(registry.role_of(names::AUTOCONNECT), Some(OptionRole::ClientOnly));
        assert_eq!(registry.role_of("--bogus"), None);
    }

    #[test]
    fn undocumented_switches_count_as_client_options() {
        assert_eq!(OptionRole::Undocumented.restricted_to(), Some(Mode::Client));
        assert_eq!(OptionRole::Common.restricted_to(), None);
    }
}
