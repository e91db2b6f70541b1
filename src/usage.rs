//! `--help` and `--version` output.

use std::fmt::Write as _;

use crate::args::{names, OptionDef, OptionRegistry, OptionRole};

const NAME_COLUMN: usize = 24;
const CONTINUATION: &str = "                        ";

/// Version banner printed by `--version`.
pub fn version_text() -> String {
    format!(
        "{} {}\nCopyright (C) the {} developers\nLicense GPLv2+",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_NAME"),
    )
}

/// Help text listing every documented option, grouped by role.
pub fn help_text(program: &str, registry: &OptionRegistry) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "Usage: {program} [option] [option argument] ...");
    let _ = writeln!(out);

    for def in registry
        .iter()
        .filter(|d| d.long == names::HELP || d.long == names::VERSION)
    {
        write_option(&mut out, def);
    }

    let sections = [
        ("Common options:", OptionRole::Common),
        ("Server only:", OptionRole::ServerOnly),
        ("Client only:", OptionRole::ClientOnly),
    ];
    for (title, role) in sections {
        let _ = writeln!(out);
        let _ = writeln!(out, "{title}");
        for def in registry
            .iter()
            .filter(|d| d.role == role && d.long != names::HELP && d.long != names::VERSION)
        {
            write_option(&mut out, def);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Example: {program} -s --inifile myinifile.toml");
    out
}

fn write_option(out: &mut String, def: &OptionDef) {
    let spelling = match def.long {
        names::HELP => "-h, -?, --help".to_string(),
        _ => match def.short() {
            Some(short) => format!("{short}, {}", def.long),
            None => format!("    {}", def.long),
        },
    };
    let mut lines = help_lines(def).iter();
    let first = lines.next().copied().unwrap_or(def.description);

    let head = format!("  {spelling}");
    if head.len() < NAME_COLUMN {
        let _ = writeln!(out, "{head:<NAME_COLUMN$}{first}");
    } else {
        let _ = writeln!(out, "{head}");
        let _ = writeln!(out, "{CONTINUATION}{first}");
    }
    for line in lines {
        let _ = writeln!(out, "{CONTINUATION}{line}");
    }
}

/// Help wording, which is more explanatory than the startup log wording.
fn help_lines(def: &OptionDef) -> &'static [&'static str] {
    match def.long {
        names::INIFILE => &[
            "initialization file name",
            "(not supported for headless Server mode)",
        ],
        names::NOGUI => &["disable GUI (\"headless\")"],
        names::PORT => &["set the local port number"],
        names::JSONRPC_PORT => &[
            "enable JSON-RPC server, set TCP port number",
            "(EXPERIMENTAL, APIs might still change;",
            "only accessible from localhost)",
        ],
        names::JSONRPC_SECRET_FILE => &[
            "path to a single-line file which contains a freely",
            "chosen secret to authenticate JSON-RPC users.",
        ],
        names::QOS => &["set the QoS value. Default is 128. Disable with 0"],
        names::NO_TRANSLATION => &["disable translation (use English language)"],
        names::ENABLE_IPV6 => &["enable IPv6 addressing (IPv4 is always enabled)"],
        names::DISCONNECT_ON_QUIT => &["disconnect all Clients on quit"],
        names::DIRECTORY_SERVER => &[
            "address of the directory Server with which to register",
            "(or 'localhost' to host a server list on this Server)",
        ],
        names::DIRECTORY_FILE => &[
            "remember registered Servers even if the Directory",
            "is restarted. Directory Servers only.",
        ],
        names::LIST_FILTER => &[
            "Server list whitelist filter.  Format:",
            "[IP address 1];[IP address 2];[IP address 3]; ...",
        ],
        names::LOG => &["enable logging, set file name"],
        names::LICENCE => &["show an agreement window before users can connect"],
        names::HTML_STATUS => &["enable HTML status file, set file name"],
        names::SERVER_INFO => &[
            "registration info for this Server.  Format:",
            "[name];[city];[country as locale ID]",
        ],
        names::SERVER_PUBLIC_IP => &[
            "public IP address for this Server.  Needed when",
            "registering with a server list hosted",
            "behind the same NAT",
        ],
        names::DELAY_PAN => &["start with delay panning enabled"],
        names::RECORDING => &["sets directory to contain recorded jams"],
        names::NO_RECORD => &["disables recording (when enabled by default by -R)"],
        names::SERVER => &["start Server"],
        names::SERVER_BIND_IP => &["IP address the Server will bind to (rather than all)"],
        names::MULTITHREADING => &[
            "use multithreading to make better use of",
            "multi-core CPUs and support more Clients",
        ],
        names::WELCOME_MESSAGE => &[
            "welcome message to display on connect",
            "(string or filename, HTML supported)",
        ],
        names::START_MINIMIZED => &["start minimized"],
        names::CONNECT => &["connect to given Server address on startup"],
        names::NO_JACK_CONNECT => &["disable auto JACK connections"],
        names::AUTOCONNECT => &["connect on startup to a koord:// address"],
        names::MUTE_STREAM => &["starts the application in muted state"],
        names::MUTE_MY_OWN => &["mute me in my personal mix (headless only)"],
        names::CLIENT_NAME => &["Client name (window title and JACK client name)"],
        names::CTRL_MIDI_CH => &["MIDI controller channel to listen"],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_lists_sections_and_hides_debug_switches() {
        let help = help_text("koord", &OptionRegistry::standard());
        assert!(help.contains("Usage: koord [option] [option argument] ..."));
        assert!(help.contains("Common options:"));
        assert!(help.contains("Server only:"));
        assert!(help.contains("Client only:"));
        assert!(help.contains("  -p, --port            set the local port number"));
        assert!(help.contains("  -h, -?, --help        display this help text and exit"));
        assert!(!help.contains(names::SHOW_ALL_SERVERS));
        assert!(!help.contains(names::SHOW_ANALYZER_CONSOLE));
        assert!(!help.contains("--centralserver"));
    }

    #[test]
    fn long_names_wrap_onto_the_next_line() {
        let help = help_text("koord", &OptionRegistry::standard());
        assert!(help.contains("      --jsonrpcsecretfile\n                        path to"));
    }

    #[test]
    fn version_names_the_package() {
        assert!(version_text().starts_with(&format!("koord {}", env!("CARGO_PKG_VERSION"))));
    }
}
