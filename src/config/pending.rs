//! Pending configuration: the mutable bag of parsed values that travels
//! through validation by value and is consumed by the assembler.

use std::net::IpAddr;

use crate::args::{fix_address, names, strip_scheme, OptionValue, OptionsSeen, ParsedArgs};
use crate::config::types::DEFAULT_QOS_NUMBER;

/// Values as given on the command line, before any cross-option checks.
///
/// Empty strings are stored as `None`; a later occurrence of an option
/// overrides an earlier one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfiguration {
    pub seen: OptionsSeen,

    pub use_gui: bool,
    pub ini_file: Option<String>,
    pub port: Option<u16>,
    pub rpc_port: Option<u16>,
    pub rpc_secret_file: Option<String>,
    pub qos: u8,
    pub use_translation: bool,
    pub enable_ipv6: bool,

    pub disconnect_all_on_quit: bool,
    pub directory_server: Option<String>,
    pub server_list_file: Option<String>,
    pub list_filter: Option<String>,
    pub use_double_frame_size: bool,
    pub log_file: Option<String>,
    pub licence: bool,
    pub html_status_file: Option<String>,
    pub server_info: Option<String>,
    pub public_ip: Option<String>,
    /// Set by validation once `public_ip` is known to be an IP literal.
    pub public_ip_addr: Option<IpAddr>,
    pub delay_pan: bool,
    pub recording_dir: Option<String>,
    pub disable_recording: bool,
    pub bind_ip: Option<String>,
    /// Set by validation once `bind_ip` is known to be an IP literal.
    pub bind_ip_addr: Option<IpAddr>,
    pub multithreading: bool,
    pub num_channels: Option<u32>,
    pub welcome_message: Option<String>,
    pub start_minimized: bool,

    pub connect_address: Option<String>,
    pub no_auto_jack_connect: bool,
    pub mute_stream: bool,
    pub mute_me_in_personal_mix: bool,
    pub client_name: Option<String>,
    pub midi_setup: Option<String>,
    pub show_all_servers: bool,
    pub show_analyzer_console: bool,
}

impl Default for PendingConfiguration {
    fn default() -> Self {
        Self {
            seen: OptionsSeen::default(),
            use_gui: true,
            ini_file: None,
            port: None,
            rpc_port: None,
            rpc_secret_file: None,
            qos: DEFAULT_QOS_NUMBER,
            use_translation: true,
            enable_ipv6: false,
            disconnect_all_on_quit: false,
            directory_server: None,
            server_list_file: None,
            list_filter: None,
            use_double_frame_size: true,
            log_file: None,
            licence: false,
            html_status_file: None,
            server_info: None,
            public_ip: None,
            public_ip_addr: None,
            delay_pan: false,
            recording_dir: None,
            disable_recording: false,
            bind_ip: None,
            bind_ip_addr: None,
            multithreading: false,
            num_channels: None,
            welcome_message: None,
            start_minimized: false,
            connect_address: None,
            no_auto_jack_connect: false,
            mute_stream: false,
            mute_me_in_personal_mix: false,
            client_name: None,
            midi_setup: None,
            show_all_servers: false,
            show_analyzer_console: false,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl PendingConfiguration {
    /// Fill the bag from classified options.
    pub fn from_args(parsed: ParsedArgs) -> Self {
        let mut pending = Self {
            seen: parsed.seen,
            ..Self::default()
        };
        for option in &parsed.options {
            match &option.value {
                OptionValue::Flag => pending.set_flag(option.name),
                OptionValue::Text(value) => pending.set_text(option.name, value),
                OptionValue::Number(value) => pending.set_number(option.name, *value),
            }
        }
        pending
    }

    fn set_flag(&mut self, name: &str) {
        match name {
            names::NOGUI => self.use_gui = false,
            names::NO_TRANSLATION => self.use_translation = false,
            names::ENABLE_IPV6 => self.enable_ipv6 = true,
            names::DISCONNECT_ON_QUIT => self.disconnect_all_on_quit = true,
            names::FAST_UPDATE => self.use_double_frame_size = false,
            names::LICENCE => self.licence = true,
            names::DELAY_PAN => self.delay_pan = true,
            names::NO_RECORD => self.disable_recording = true,
            names::MULTITHREADING => self.multithreading = true,
            names::START_MINIMIZED => self.start_minimized = true,
            names::NO_JACK_CONNECT => self.no_auto_jack_connect = true,
            names::MUTE_STREAM => self.mute_stream = true,
            names::MUTE_MY_OWN => self.mute_me_in_personal_mix = true,
            names::SHOW_ALL_SERVERS => self.show_all_servers = true,
            names::SHOW_ANALYZER_CONSOLE => self.show_analyzer_console = true,
            // --server only matters to the mode resolver.
            _ => {}
        }
    }

    fn set_text(&mut self, name: &str, value: &str) {
        let slot = match name {
            names::INIFILE => &mut self.ini_file,
            names::JSONRPC_SECRET_FILE => &mut self.rpc_secret_file,
            names::DIRECTORY_SERVER => &mut self.directory_server,
            names::DIRECTORY_FILE => &mut self.server_list_file,
            names::LIST_FILTER => &mut self.list_filter,
            names::LOG => &mut self.log_file,
            names::HTML_STATUS => &mut self.html_status_file,
            names::SERVER_INFO => &mut self.server_info,
            names::SERVER_PUBLIC_IP => &mut self.public_ip,
            names::RECORDING => &mut self.recording_dir,
            names::SERVER_BIND_IP => &mut self.bind_ip,
            names::WELCOME_MESSAGE => &mut self.welcome_message,
            names::CLIENT_NAME => &mut self.client_name,
            names::CTRL_MIDI_CH => &mut self.midi_setup,
            names::CONNECT => {
                self.connect_address = non_empty(&fix_address(value));
                return;
            }
            names::AUTOCONNECT => {
                self.connect_address = non_empty(&strip_scheme(value));
                return;
            }
            _ => return,
        };
        *slot = non_empty(value);
    }

    fn set_number(&mut self, name: &str, value: u32) {
        match name {
            // The registry bounds both ports to 0..=65535 and QoS to 0..=255.
            names::PORT => self.port = u16::try_from(value).ok(),
            names::JSONRPC_PORT => self.rpc_port = u16::try_from(value).ok(),
            names::QOS => self.qos = u8::try_from(value).unwrap_or(DEFAULT_QOS_NUMBER),
            names::NUM_CHANNELS => self.num_channels = Some(value),
            _ => {}
        }
    }
}
