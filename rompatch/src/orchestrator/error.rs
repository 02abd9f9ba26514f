//! Error types for patch resolution.

use thiserror::Error;

/// Errors raised while turning options into patch descriptors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrchestratorError {
    /// A patch the options call for is missing from the catalog.
    #[error("patch not found in catalog: {path}")]
    NotInCatalog { path: String },

    /// An add-on was enabled whose requirement does not hold.
    #[error("invalid selection for '{option}': {reason}")]
    InvalidSelection { option: String, reason: String },

    /// No add-on is registered under this key.
    #[error("unknown patch option '{0}'")]
    UnknownOption(String),

    /// The add-on exists but has no such choice.
    #[error("unknown choice '{value}' for option '{option}'")]
    UnknownChoice { option: String, value: String },

    /// The requested version is not in the catalog.
    #[error("version '{0}' not found in catalog")]
    UnknownVersion(String),

    /// Patch URLs cannot be built on this base.
    #[error("invalid patch base URL '{0}'")]
    InvalidBaseUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OrchestratorError::NotInCatalog {
            path: "Legacy Variant/Legacy v7.4 - New Wilds.ips".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "patch not found in catalog: Legacy Variant/Legacy v7.4 - New Wilds.ips"
        );

        let err = OrchestratorError::UnknownChoice {
            option: "sprites".to_string(),
            value: "pixel".to_string(),
        };
        assert!(err.to_string().contains("pixel"));
    }
}
