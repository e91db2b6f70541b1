//! Assembler: validated pending values → immutable resolved configuration.

use std::path::PathBuf;

use crate::args::Mode;
use crate::config::pending::PendingConfiguration;
use crate::config::types::{
    ClientConfig, LicenceType, ListFilter, ResolvedConfiguration, RoleConfig, RpcSettings,
    ServerConfig, ServerInfo, DEFAULT_PORT_NUMBER, DEFAULT_USED_NUM_CHANNELS,
};

/// Merge validated values into the configuration for `mode`.
///
/// Values that only matter to the other mode are dropped here; the mode
/// resolver has already rejected any that were given explicitly.
pub fn assemble(pending: PendingConfiguration, mode: Mode) -> ResolvedConfiguration {
    let rpc = pending.rpc_port.map(|port| RpcSettings {
        port,
        secret_file: pending.rpc_secret_file.as_ref().map(PathBuf::from),
    });

    let role = match mode {
        Mode::Client => RoleConfig::Client(client_config(&pending)),
        Mode::Server => RoleConfig::Server(server_config(&pending)),
    };

    ResolvedConfiguration {
        use_gui: pending.use_gui,
        use_translation: pending.use_translation,
        enable_ipv6: pending.enable_ipv6,
        port: pending.port.unwrap_or(DEFAULT_PORT_NUMBER),
        qos: pending.qos,
        ini_file: pending.ini_file.as_ref().map(PathBuf::from),
        rpc,
        command_line_options: pending.seen.all.iter().map(|s| s.to_string()).collect(),
        role,
    }
}

fn client_config(p: &PendingConfiguration) -> ClientConfig {
    ClientConfig {
        connect_address: p.connect_address.clone(),
        midi_setup: p.midi_setup.clone(),
        no_auto_jack_connect: p.no_auto_jack_connect,
        client_name: p.client_name.clone(),
        mute_stream: p.mute_stream,
        mute_me_in_personal_mix: p.mute_me_in_personal_mix,
        show_all_servers: p.show_all_servers,
        show_analyzer_console: p.show_analyzer_console,
    }
}

fn server_config(p: &PendingConfiguration) -> ServerConfig {
    ServerConfig {
        num_channels: p.num_channels.unwrap_or(DEFAULT_USED_NUM_CHANNELS),
        log_file: p.log_file.as_ref().map(PathBuf::from),
        bind_ip: p.bind_ip_addr,
        html_status_file: p.html_status_file.as_ref().map(PathBuf::from),
        directory_server: p.directory_server.clone(),
        server_list_file: p.server_list_file.as_ref().map(PathBuf::from),
        server_info: p.server_info.as_deref().map(ServerInfo::parse),
        public_ip: p.public_ip_addr,
        list_filter: p.list_filter.as_deref().map(ListFilter::new),
        welcome_message: p.welcome_message.clone(),
        recording_dir: p.recording_dir.as_ref().map(PathBuf::from),
        disconnect_all_on_quit: p.disconnect_all_on_quit,
        use_double_frame_size: p.use_double_frame_size,
        multithreading: p.multithreading,
        disable_recording: p.disable_recording,
        delay_pan: p.delay_pan,
        licence: if p.licence {
            LicenceType::CreativeCommons
        } else {
            LicenceType::None
        },
        start_minimized: p.start_minimized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_defaults() {
        let config = assemble(PendingConfiguration::default(), Mode::Server);
        assert_eq!(config.mode(), Mode::Server);
        assert_eq!(config.port, DEFAULT_PORT_NUMBER);
        assert!(config.rpc.is_none());
        let RoleConfig::Server(server) = config.role else {
            panic!("expected server config");
        };
        assert_eq!(server, ServerConfig::default());
    }

    #[test]
    fn rpc_settings_require_port() {
        let pending = PendingConfiguration {
            rpc_secret_file: Some("secret.txt".into()),
            ..PendingConfiguration::default()
        };
        assert!(assemble(pending, Mode::Client).rpc.is_none());

        let pending = PendingConfiguration {
            rpc_port: Some(8765),
            ..PendingConfiguration::default()
        };
        let rpc = assemble(pending, Mode::Client).rpc.unwrap();
        assert_eq!(rpc.port, 8765);
        assert_eq!(rpc.secret_file, None);
    }

    #[test]
    fn licence_flag_maps_to_creative_commons() {
        let pending = PendingConfiguration {
            licence: true,
            ..PendingConfiguration::default()
        };
        let RoleConfig::Server(server) = assemble(pending, Mode::Server).role else {
            panic!("expected server config");
        };
        assert_eq!(server.licence, LicenceType::CreativeCommons);
    }
}
