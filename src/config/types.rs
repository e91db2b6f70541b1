use std::net::IpAddr;
use std::path::PathBuf;

use serde::Serialize;

use crate::args::Mode;

/// Port used by a server when none is given.
pub const DEFAULT_PORT_NUMBER: u16 = 22124;
/// A client without `--port` moves this far above the default so it does not
/// collide with a server on the same host.
pub const CLIENT_PORT_OFFSET: u16 = 10;
pub const DEFAULT_QOS_NUMBER: u8 = 128;
pub const DEFAULT_USED_NUM_CHANNELS: u32 = 10;

/// Final, mode-specific configuration handed to the client or server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfiguration {
    pub use_gui: bool,
    pub use_translation: bool,
    pub enable_ipv6: bool,
    pub port: u16,
    pub qos: u8,
    pub ini_file: Option<PathBuf>,
    /// Remote-control request; the credential itself is loaded later.
    pub rpc: Option<RpcSettings>,
    /// Every option given on the command line, in order. Settings from the
    /// init file never override these.
    pub command_line_options: Vec<String>,
    pub role: RoleConfig,
}

impl ResolvedConfiguration {
    pub fn mode(&self) -> Mode {
        match self.role {
            RoleConfig::Client(_) => Mode::Client,
            RoleConfig::Server(_) => Mode::Server,
        }
    }

    pub fn given_on_command_line(&self, long: &str) -> bool {
        self.command_line_options.iter().any(|o| o == long)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum RoleConfig {
    Client(ClientConfig),
    Server(ServerConfig),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RpcSettings {
    pub port: u16,
    pub secret_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientConfig {
    /// Server to connect to right after startup.
    pub connect_address: Option<String>,
    pub midi_setup: Option<String>,
    pub no_auto_jack_connect: bool,
    pub client_name: Option<String>,
    pub mute_stream: bool,
    /// Headless only; always false when a GUI is used.
    pub mute_me_in_personal_mix: bool,
    pub show_all_servers: bool,
    pub show_analyzer_console: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerConfig {
    pub num_channels: u32,
    pub log_file: Option<PathBuf>,
    pub bind_ip: Option<IpAddr>,
    pub html_status_file: Option<PathBuf>,
    pub directory_server: Option<String>,
    pub server_list_file: Option<PathBuf>,
    pub server_info: Option<ServerInfo>,
    pub public_ip: Option<IpAddr>,
    pub list_filter: Option<ListFilter>,
    pub welcome_message: Option<String>,
    pub recording_dir: Option<PathBuf>,
    pub disconnect_all_on_quit: bool,
    /// 128 sample frames; `--fastupdate` switches to 64.
    pub use_double_frame_size: bool,
    pub multithreading: bool,
    pub disable_recording: bool,
    pub delay_pan: bool,
    pub licence: LicenceType,
    pub start_minimized: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            num_channels: DEFAULT_USED_NUM_CHANNELS,
            log_file: None,
            bind_ip: None,
            html_status_file: None,
            directory_server: None,
            server_list_file: None,
            server_info: None,
            public_ip: None,
            list_filter: None,
            welcome_message: None,
            recording_dir: None,
            disconnect_all_on_quit: false,
            use_double_frame_size: true,
            multithreading: false,
            disable_recording: false,
            delay_pan: false,
            licence: LicenceType::None,
            start_minimized: false,
        }
    }
}

/// Agreement users must accept before connecting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum LicenceType {
    #[default]
    None,
    CreativeCommons,
}

/// `[name];[city];[country]` registration info.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub city: String,
    pub country: String,
}

impl ServerInfo {
    /// Missing trailing fields are left empty; extra fields are ignored.
    pub fn parse(value: &str) -> Self {
        let mut parts = value.split(';').map(str::to_string);
        Self {
            name: parts.next().unwrap_or_default(),
            city: parts.next().unwrap_or_default(),
            country: parts.next().unwrap_or_default(),
        }
    }
}

/// Whitelist a hosted directory applies to registering servers.
///
/// The text is kept as given; invalid entries are diagnosed at startup
/// but not removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ListFilter(String);

/// One `;`-separated entry of a [`ListFilter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEntry {
    Address(IpAddr),
    /// `[x]` version token.
    Version(String),
    Empty,
    Invalid(String),
}

impl FilterEntry {
    pub fn parse(entry: &str) -> Self {
        if entry.len() > 2 && entry.starts_with('[') && entry.ends_with(']') {
            return FilterEntry::Version(entry[1..entry.len() - 1].to_string());
        }
        if entry.is_empty() {
            return FilterEntry::Empty;
        }
        match entry.parse() {
            Ok(addr) => FilterEntry::Address(addr),
            Err(_) => FilterEntry::Invalid(entry.to_string()),
        }
    }
}

impl ListFilter {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn entries(&self) -> Vec<FilterEntry> {
        self.0.split(';').map(FilterEntry::parse).collect()
    }

    /// Well-formed addresses in the filter.
    pub fn addresses(&self) -> Vec<IpAddr> {
        self.entries()
            .into_iter()
            .filter_map(|entry| match entry {
                FilterEntry::Address(addr) => Some(addr),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_info_tolerates_missing_fields() {
        let info = ServerInfo::parse("My Jam;Berlin");
        assert_eq!(info.name, "My Jam");
        assert_eq!(info.city, "Berlin");
        assert_eq!(info.country, "");
    }

    #[test]
    fn filter_entries_are_classified() {
        let filter = ListFilter::new("10.0.0.1;[3.8.2];;bogus;::1");
        assert_eq!(
            filter.entries(),
            vec![
                FilterEntry::Address("10.0.0.1".parse().unwrap()),
                FilterEntry::Version("3.8.2".into()),
                FilterEntry::Empty,
                FilterEntry::Invalid("bogus".into()),
                FilterEntry::Address("::1".parse().unwrap()),
            ]
        );
        assert_eq!(filter.addresses().len(), 2);
    }

    #[test]
    fn brackets_alone_are_not_a_version() {
        assert_eq!(FilterEntry::parse("[]"), FilterEntry::Invalid("[]".into()));
    }
}
