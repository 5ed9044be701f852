//! Where the bearer token comes from, and what happens when it is rejected.

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Supplies the bearer token attached to every request.
pub trait CredentialProvider: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// Called once for every request answered with 401.
pub type SessionInvalidated = Arc<dyn Fn() + Send + Sync>;

/// A fixed token, or none at all.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl CredentialProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Token persisted in a file in the data directory.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub const FILE_NAME: &'static str = "session.token";

    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self::new(dir.as_ref().join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(&self.path, token.trim())
            .with_context(|| format!("Failed to write token file: {}", self.path.display()))?;
        debug!(path = %self.path.display(), "Saved session token");
        Ok(())
    }

    /// Removes the token. Returns whether one existed.
    pub fn discard(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Discarded session token");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove token file: {}", self.path.display())),
        }
    }
}

impl CredentialProvider for TokenFile {
    fn bearer_token(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(token) => {
                let token = token.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Could not read token file");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_static_token() {
        assert_eq!(StaticToken::new("abc").bearer_token().as_deref(), Some("abc"));
        assert!(StaticToken::anonymous().bearer_token().is_none());
    }

    #[test]
    fn test_token_file_round_trip() -> Result<()> {
        let dir = TempDir::new()?;
        let tokens = TokenFile::in_dir(dir.path().join("nested"));

        assert!(tokens.bearer_token().is_none());
        tokens.save("  secret-token\n")?;
        assert_eq!(tokens.bearer_token().as_deref(), Some("secret-token"));

        assert!(tokens.discard()?);
        assert!(tokens.bearer_token().is_none());
        assert!(!tokens.discard()?);
        Ok(())
    }

    #[test]
    fn test_blank_token_file_is_no_token() -> Result<()> {
        let dir = TempDir::new()?;
        let tokens = TokenFile::in_dir(dir.path());
        fs::write(tokens.path(), "\n")?;
        assert!(tokens.bearer_token().is_none());
        Ok(())
    }
}
