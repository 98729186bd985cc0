//! Run configuration and input validation.

use crate::error::SyncError;

/// Service used when no `service` input is given.
pub const DEFAULT_SERVICE: &str = "https://bsky.social";

/// Inputs for one run.
#[derive(Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub handle: String,
    pub app_password: String,
    pub lexicon_files: Vec<String>,
    pub service: String,
}

impl RunConfig {
    /// Build a config from raw job inputs.
    ///
    /// `lexicon_files` entries are trimmed and blank ones dropped; a blank
    /// `service` falls back to [`DEFAULT_SERVICE`].
    pub fn from_inputs(
        handle: impl Into<String>,
        app_password: impl Into<String>,
        lexicon_files: impl IntoIterator<Item = impl AsRef<str>>,
        service: Option<&str>,
    ) -> Self {
        let lexicon_files = lexicon_files
            .into_iter()
            .map(|line| line.as_ref().trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        let service = service
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SERVICE)
            .to_string();
        Self {
            handle: handle.into(),
            app_password: app_password.into(),
            lexicon_files,
            service,
        }
    }

    /// Reject blank required inputs before any I/O happens.
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.handle.trim().is_empty() {
            return Err(SyncError::InvalidInput(
                "Handle is required and cannot be empty".to_string(),
            ));
        }
        if self.app_password.trim().is_empty() {
            return Err(SyncError::InvalidInput(
                "App password is required and cannot be empty".to_string(),
            ));
        }
        if self.lexicon_files.is_empty() {
            return Err(SyncError::InvalidInput(
                "At least one lexicon file path is required in lexicon-files input".to_string(),
            ));
        }
        Ok(())
    }
}

// Hand-written so the password never reaches a log line via `{:?}`.
impl std::fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfig")
            .field("handle", &self.handle)
            .field("app_password", &"***")
            .field("lexicon_files", &self.lexicon_files)
            .field("service", &self.service)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn valid() -> RunConfig {
        RunConfig::from_inputs(
            "test.bsky.social",
            "test-password-1234",
            ["./lexicons"],
            Some("https://public.api.bsky.app"),
        )
    }

    #[test]
    fn valid_inputs_pass() {
        assert!(valid().validate().is_ok());
    }

    #[rstest]
    #[case("", "pw", "Handle is required and cannot be empty")]
    #[case("   ", "pw", "Handle is required and cannot be empty")]
    #[case("me.test", "", "App password is required and cannot be empty")]
    #[case("me.test", " \t", "App password is required and cannot be empty")]
    fn blank_credentials_are_rejected(
        #[case] handle: &str,
        #[case] password: &str,
        #[case] expected: &str,
    ) {
        let config = RunConfig::from_inputs(handle, password, ["./lexicons"], None);
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn handle_is_checked_before_password() {
        let config = RunConfig::from_inputs("", "", ["./lexicons"], None);
        assert_eq!(
            config.validate().unwrap_err().to_string(),
            "Handle is required and cannot be empty"
        );
    }

    #[test]
    fn blank_lexicon_lines_do_not_count() {
        let config = RunConfig::from_inputs("me.test", "pw", ["", "  ", "\n"], None);
        assert!(config.lexicon_files.is_empty());
        assert_eq!(
            config.validate().unwrap_err().to_string(),
            "At least one lexicon file path is required in lexicon-files input"
        );
    }

    #[test]
    fn lexicon_lines_are_trimmed() {
        let config = RunConfig::from_inputs("me.test", "pw", [" ./a ", "./b"], None);
        assert_eq!(config.lexicon_files, vec!["./a", "./b"]);
    }

    #[test]
    fn blank_service_uses_default() {
        assert_eq!(
            RunConfig::from_inputs("h", "p", ["x"], Some("  ")).service,
            DEFAULT_SERVICE
        );
        assert_eq!(valid().service, "https://public.api.bsky.app");
    }

    #[test]
    fn debug_output_hides_password() {
        let rendered = format!("{:?}", valid());
        assert!(!rendered.contains("test-password-1234"));
        assert!(rendered.contains("***"));
    }
}
