//! Error taxonomy shared by the editor, the stores and the history manager

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// FormKit error type
///
/// Every variant carries the human-readable message that is shown to the
/// user and sent over the wire. Use the constructor helpers to build
/// messages locally; remote errors are rebuilt with [`FormsError::from_code`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormsError {
    /// Schema failed validation
    #[error("{0}")]
    InvalidSchema(String),

    /// Form or version does not exist
    #[error("{0}")]
    NotFound(String),

    /// Caller is not allowed to touch the form
    #[error("{0}")]
    PermissionDenied(String),

    /// Attempt to delete the version the form currently points at
    #[error("{0}")]
    ActiveVersion(String),

    /// Editor operation addressed an unknown field id
    #[error("{0}")]
    FieldNotFound(String),

    /// Network, decoding or server-side failure
    #[error("{0}")]
    Transport(String),
}

/// Error categories as seen by a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    Validation,
    NotFound,
    PermissionDenied,
    Conflict,
    Transport,
}

/// How loudly an error should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl FormsError {
    pub fn invalid_schema(reason: impl std::fmt::Display) -> Self {
        Self::InvalidSchema(format!("invalid schema: {}", reason))
    }

    pub fn form_not_found(form_id: &str) -> Self {
        Self::NotFound(format!("form not found: {}", form_id))
    }

    pub fn version_not_found(form_id: &str, version_number: u32) -> Self {
        Self::NotFound(format!(
            "version {} not found for form {}",
            version_number, form_id
        ))
    }

    pub fn access_denied() -> Self {
        Self::PermissionDenied("access denied".to_string())
    }

    pub fn active_version(version_number: u32) -> Self {
        Self::ActiveVersion(format!(
            "cannot delete the active version (version {})",
            version_number
        ))
    }

    pub fn field_not_found(field_id: &str) -> Self {
        Self::FieldNotFound(format!("field not found: {}", field_id))
    }

    pub fn transport(reason: impl std::fmt::Display) -> Self {
        Self::Transport(format!("request failed: {}", reason))
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSchema(_) => ErrorKind::Validation,
            Self::NotFound(_) | Self::FieldNotFound(_) => ErrorKind::NotFound,
            Self::PermissionDenied(_) => ErrorKind::PermissionDenied,
            Self::ActiveVersion(_) => ErrorKind::Conflict,
            Self::Transport(_) => ErrorKind::Transport,
        }
    }

    /// Business-rule conflicts are warnings, everything else is an error
    pub fn severity(&self) -> Severity {
        match self.kind() {
            ErrorKind::Conflict => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Wire code carried in the response envelope
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidSchema(_) => "invalid_schema",
            Self::NotFound(_) => "not_found",
            Self::PermissionDenied(_) => "access_denied",
            Self::ActiveVersion(_) => "active_version",
            Self::FieldNotFound(_) => "field_not_found",
            Self::Transport(_) => "internal",
        }
    }

    /// Rebuild an error from a wire code and message
    ///
    /// Unknown codes become `Transport` so a newer server never breaks an
    /// older client.
    pub fn from_code(code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            "invalid_schema" => Self::InvalidSchema(message),
            "not_found" => Self::NotFound(message),
            "access_denied" => Self::PermissionDenied(message),
            "active_version" => Self::ActiveVersion(message),
            "field_not_found" => Self::FieldNotFound(message),
            _ => Self::Transport(message),
        }
    }

    /// Message without the variant wrapper
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidSchema(m)
            | Self::NotFound(m)
            | Self::PermissionDenied(m)
            | Self::ActiveVersion(m)
            | Self::FieldNotFound(m)
            | Self::Transport(m) => m,
        }
    }
}

/// Result type for FormKit operations
pub type Result<T> = std::result::Result<T, FormsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_version_is_a_warning() {
        let err = FormsError::active_version(3);
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.severity(), Severity::Warning);
        assert!(err.to_string().contains("active version"));
    }

    #[test]
    fn test_not_found_messages_name_the_target() {
        assert_eq!(
            FormsError::form_not_found("f1").to_string(),
            "form not found: f1"
        );
        assert_eq!(
            FormsError::version_not_found("f1", 7).to_string(),
            "version 7 not found for form f1"
        );
        assert_eq!(FormsError::form_not_found("f1").severity(), Severity::Error);
    }

    #[test]
    fn test_code_survives_the_wire() {
        let errors = [
            FormsError::invalid_schema("title is empty"),
            FormsError::form_not_found("f1"),
            FormsError::access_denied(),
            FormsError::active_version(2),
            FormsError::field_not_found("x"),
            FormsError::transport("timeout"),
        ];
        for err in errors {
            let rebuilt = FormsError::from_code(err.code(), err.message());
            assert_eq!(rebuilt, err);
        }
    }

    #[test]
    fn test_unknown_code_is_transport() {
        let err = FormsError::from_code("teapot", "short and stout");
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.message(), "short and stout");
    }
}
