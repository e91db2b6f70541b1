//! `koord://` URI handling.
//!
//! Desktop launchers hand a bare `koord://<IPv4>[:port]` to the binary as its
//! only argument. That single token is turned into an autoconnect address.

use std::sync::LazyLock;

use regex::Regex;

pub const URI_SCHEME: &str = "koord://";

static WITH_PORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^koord://((?:[0-9]{1,3}\.){3}[0-9]{1,3}:[0-9]{3,5})")
        .expect("static pattern")
});

static HOST_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^koord://((?:[0-9]{1,3}\.){3}[0-9]{1,3})").expect("static pattern")
});

/// Address captured from a launcher URI, or `None` if the token is not one.
///
/// The `host:port` shape is tried first so the port is not lost.
pub fn parse_launch_uri(token: &str) -> Option<String> {
    WITH_PORT
        .captures(token)
        .or_else(|| HOST_ONLY.captures(token))
        .map(|caps| caps[1].to_string())
}

/// Value of `--autoconnect`: the scheme is optional.
pub fn strip_scheme(value: &str) -> String {
    let trimmed = value.trim();
    trimmed
        .strip_prefix(URI_SCHEME)
        .unwrap_or(trimmed)
        .trim_end_matches('/')
        .to_string()
}

/// Value of `--connect`: all whitespace removed.
pub fn fix_address(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_only_uri() {
        assert_eq!(
            parse_launch_uri("koord://192.168.1.20").as_deref(),
            Some("192.168.1.20")
        );
    }

    #[test]
    fn host_and_port_uri() {
        assert_eq!(
            parse_launch_uri("koord://10.0.0.5:22124").as_deref(),
            Some("10.0.0.5:22124")
        );
    }

    #[test]
    fn short_port_falls_back_to_host() {
        // Ports need at least three digits.
        assert_eq!(
            parse_launch_uri("koord://10.0.0.5:80").as_deref(),
            Some("10.0.0.5")
        );
    }

    #[test]
    fn other_tokens_are_not_uris() {
        assert_eq!(parse_launch_uri("10.0.0.5"), None);
        assert_eq!(parse_launch_uri("http://10.0.0.5"), None);
        assert_eq!(parse_launch_uri("koord://example.org"), None);
        assert_eq!(parse_launch_uri("--koord://10.0.0.5"), None);
    }

    #[test]
    fn autoconnect_scheme_is_optional() {
        assert_eq!(strip_scheme("koord://10.0.0.5:22124/"), "10.0.0.5:22124");
        assert_eq!(strip_scheme("10.0.0.5"), "10.0.0.5");
    }

    #[test]
    fn connect_address_loses_whitespace() {
        assert_eq!(fix_address(" 10.0.0.5 : 22124 "), "10.0.0.5:22124");
    }
}
