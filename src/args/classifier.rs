//! Argument classifier: raw argument vector → recognised options plus the
//! per-role membership lists used for mode conflict detection.

use crate::args::matcher::{match_def, OptionValue, RawOption};
use crate::args::mode::Mode;
use crate::args::registry::{names, OptionDef, OptionRegistry};
use crate::args::uri::parse_launch_uri;
use crate::capabilities::Capabilities;
use crate::error::UsageError;

/// Ordered record of which options were used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionsSeen {
    /// Every recognised option, canonical long names, in order.
    pub all: Vec<&'static str>,
    /// Options only legal in server mode.
    pub server_only: Vec<&'static str>,
    /// Options only legal in client mode.
    pub client_only: Vec<&'static str>,
}

impl OptionsSeen {
    fn record(&mut self, def: &OptionDef) {
        self.all.push(def.long);
        match def.role.restricted_to() {
            Some(Mode::Server) => self.server_only.push(def.long),
            Some(Mode::Client) => self.client_only.push(def.long),
            None => {}
        }
    }

    pub fn contains(&self, long: &str) -> bool {
        self.all.contains(&long)
    }

    /// Options recorded as legal only in `mode`.
    pub fn restricted_to(&self, mode: Mode) -> &[&'static str] {
        match mode {
            Mode::Server => &self.server_only,
            Mode::Client => &self.client_only,
        }
    }
}

/// Everything the classifier extracted from a run's arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    /// Recognised options in order.
    pub options: Vec<RawOption>,
    pub seen: OptionsSeen,
    /// Unknown tokens tolerated by the build.
    pub ignored: Vec<String>,
}

/// Result of classifying a run's arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// `--help` was found; nothing after it was looked at.
    Help,
    /// `--version` was found; nothing after it was looked at.
    Version,
    Options(ParsedArgs),
}

/// Classify raw args (program name excluded) against the registry.
pub fn classify(
    args: &[String],
    registry: &OptionRegistry,
    caps: &Capabilities,
) -> Result<ParseOutcome, UsageError> {
    let mut parsed = ParsedArgs::default();
    let mut i = 0;

    while i < args.len() {
        let token = &args[i];

        if let Some(def) = registry.find(token) {
            if def.long == names::HELP {
                return Ok(ParseOutcome::Help);
            }
            if def.long == names::VERSION {
                return Ok(ParseOutcome::Version);
            }
            if let Some(option) = match_def(args, &mut i, def)? {
                log_option(def, &option);
                parsed.seen.record(def);
                parsed.options.push(option);
            }
            i += 1;
            continue;
        }

        if args.len() == 1 {
            if let Some(address) = parse_launch_uri(token) {
                let def = registry
                    .get(names::AUTOCONNECT)
                    .ok_or_else(|| UsageError::UnknownOption(token.clone()))?;
                let option = RawOption {
                    name: def.long,
                    value: OptionValue::Text(address),
                };
                log_option(def, &option);
                parsed.seen.record(def);
                parsed.options.push(option);
                i += 1;
                continue;
            }
        }

        if !caps.tolerate_unknown_args {
            return Err(UsageError::UnknownOption(token.clone()));
        }
        tracing::warn!("Unknown option '{}' -- ignored", token);
        parsed.ignored.push(token.clone());
        i += 1;
    }

    Ok(ParseOutcome::Options(parsed))
}

fn log_option(def: &OptionDef, option: &RawOption) {
    match &option.value {
        OptionValue::Flag => tracing::info!("- {}", def.description),
        OptionValue::Text(value) => tracing::info!("- {}: {}", def.description, value),
        OptionValue::Number(value) => tracing::info!("- {}: {}", def.description, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn parse(args: &[&str]) -> Result<ParseOutcome, UsageError> {
        classify(&raw(args), &OptionRegistry::standard(), &Capabilities::full())
    }

    fn parsed(args: &[&str]) -> ParsedArgs {
        match parse(args).expect("valid arguments") {
            ParseOutcome::Options(parsed) => parsed,
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn records_options_by_role() {
        let result = parsed(&["-p", "5000", "--server", "--connect", "10.0.0.5", "-n"]);
        assert_eq!(result.seen.all, vec!["--port", "--server", "--connect", "--nogui"]);
        assert_eq!(result.seen.server_only, vec!["--server"]);
        assert_eq!(result.seen.client_only, vec!["--connect"]);
    }

    #[test]
    fn help_stops_parsing() {
        assert_eq!(parse(&["-?", "--port", "banana"]).unwrap(), ParseOutcome::Help);
        assert_eq!(parse(&["-v", "--bogus"]).unwrap(), ParseOutcome::Version);
    }

    #[test]
    fn errors_before_help_still_win() {
        let err = parse(&["--port", "banana", "--help"]).unwrap_err();
        assert!(matches!(err, UsageError::BadNumber { .. }));
    }

    #[test]
    fn unknown_option_is_fatal_by_default() {
        let err = parse(&["--server", "--frobnicate"]).unwrap_err();
        assert_eq!(err, UsageError::UnknownOption("--frobnicate".into()));
    }

    #[test]
    fn unknown_option_is_tolerated_when_build_allows() {
        let caps = Capabilities::full().tolerating_unknown_args();
        let outcome = classify(
            &raw(&["-psn_0_12345", "--nogui"]),
            &OptionRegistry::standard(),
            &caps,
        )
        .unwrap();
        let ParseOutcome::Options(parsed) = outcome else {
            panic!("expected options");
        };
        assert_eq!(parsed.ignored, vec!["-psn_0_12345"]);
        assert_eq!(parsed.seen.all, vec!["--nogui"]);
    }

    #[test]
    fn lone_uri_becomes_autoconnect() {
        let result = parsed(&["koord://10.1.2.3:22124"]);
        assert_eq!(result.seen.client_only, vec!["--autoconnect"]);
        assert_eq!(result.options[0].text(), Some("10.1.2.3:22124"));
    }

    #[test]
    fn uri_is_only_recognised_alone() {
        let err = parse(&["koord://10.1.2.3", "--nogui"]).unwrap_err();
        assert_eq!(err, UsageError::UnknownOption("koord://10.1.2.3".into()));
    }

    #[test]
    fn central_server_is_recorded_under_canonical_name() {
        let result = parsed(&["--centralserver", "localhost", "-s"]);
        assert_eq!(result.seen.server_only, vec!["--directoryserver", "--server"]);
    }
}
