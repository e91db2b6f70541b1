//! Shared-secret loading for the remote-control interface.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::RpcSettings;
use crate::rpc::RpcBootstrapError;

/// Secrets shorter than this are refused.
pub const MIN_SECRET_LENGTH: usize = 16;

/// Wrapper for the shared secret that prevents accidental logging.
///
/// The inner value is never exposed via Debug or Display traits.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Expose the inner value, for comparing against what a peer sent.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretString(••••••••)")
    }
}

impl std::fmt::Display for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "••••••••")
    }
}

/// Port and secret of the remote-control interface, held for the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcCredential {
    pub port: u16,
    pub secret: SecretString,
}

/// Read the first line of the secret file.
///
/// The file is closed before this returns.
pub fn read_secret(path: &Path) -> Result<SecretString, RpcBootstrapError> {
    let file = File::open(path).map_err(|source| RpcBootstrapError::SecretFileUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let mut line = String::new();
    BufReader::new(file)
        .read_line(&mut line)
        .map_err(|source| RpcBootstrapError::SecretFileUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
    let secret = line.trim_end_matches(['\r', '\n']).to_string();
    Ok(SecretString::new(secret))
}

/// Validate the request and load the credential.
pub fn load_credential(settings: &RpcSettings) -> Result<RpcCredential, RpcBootstrapError> {
    let path = settings
        .secret_file
        .as_deref()
        .ok_or(RpcBootstrapError::SecretFileRequired)?;
    let secret = read_secret(path)?;
    if secret.len() < MIN_SECRET_LENGTH {
        return Err(RpcBootstrapError::SecretTooShort {
            length: secret.len(),
            required: MIN_SECRET_LENGTH,
        });
    }
    Ok(RpcCredential {
        port: settings.port,
        secret,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn settings(secret_file: Option<&Path>) -> RpcSettings {
        RpcSettings {
            port: 8765,
            secret_file: secret_file.map(Path::to_path_buf),
        }
    }

    #[test]
    fn secret_does_not_leak() {
        let secret = SecretString::new("correct horse battery staple".to_string());
        assert!(!format!("{:?}", secret).contains("horse"));
        assert!(!format!("{}", secret).contains("horse"));
        assert_eq!(secret.expose(), "correct horse battery staple");
    }

    #[test]
    fn missing_secret_file_option_is_fatal() {
        let err = load_credential(&settings(None)).unwrap_err();
        assert!(matches!(err, RpcBootstrapError::SecretFileRequired));
    }

    #[test]
    fn unreadable_secret_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_credential(&settings(Some(&dir.path().join("nope")))).unwrap_err();
        assert!(matches!(err, RpcBootstrapError::SecretFileUnreadable { .. }));
    }

    #[test]
    fn only_first_line_is_the_secret() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret");
        fs::write(&path, "0123456789abcdef\nsecond line\n").unwrap();
        let credential = load_credential(&settings(Some(&path))).unwrap();
        assert_eq!(credential.secret.expose(), "0123456789abcdef");
        assert_eq!(credential.port, 8765);
    }

    #[test]
    fn short_secret_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret");
        fs::write(&path, "tooshort\n0123456789abcdef0123\n").unwrap();
        let err = load_credential(&settings(Some(&path))).unwrap_err();
        assert!(matches!(
            err,
            RpcBootstrapError::SecretTooShort {
                length: 8,
                required: 16
            }
        ));
    }
}
