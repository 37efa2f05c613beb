use clashapi::FixActionKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Internal error: {0}")]
    Internal(&'static str),
}

#[derive(Error, Debug)]
pub enum FileError {
    #[error("{0} io error: {1}")]
    Io(String, std::io::Error),
    #[error("{0} deserialization error: {1}")]
    Serde(String, serde_yaml::Error),
    #[error("Env variable error: {0}")]
    Env(#[from] std::env::VarError),
}

/// Failure of a single field against its rule. The display text is the
/// message handed back to callers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("{0}: field is required")]
    Required(String),
    #[error("{0}: {1}")]
    Type(String, String),
    #[error("{field}: value must be one of {}", allowed.join(", "))]
    NotInEnum { field: String, allowed: Vec<String> },
    #[error("{0}: value must not be less than {1}")]
    BelowMin(String, f64),
    #[error("{0}: value must not be greater than {1}")]
    AboveMax(String, f64),
    #[error("{0}: length must not be less than {1}")]
    TooShort(String, usize),
    #[error("{0}: length must not be greater than {1}")]
    TooLong(String, usize),
    #[error("{0}: {1}")]
    Format(String, &'static str),
    #[error("{0}[{1}]: array item has wrong type")]
    ItemType(String, usize),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FixError {
    #[error("Proxy group #{0} not found")]
    GroupNotFound(usize),
    #[error("Rule not found: {0}")]
    RuleNotFound(String),
    #[error("Rule has no target field: {0}")]
    MissingTarget(String),
    #[error("Rule provider not found: {0}")]
    ProviderNotFound(String),
    #[error("{0}: data does not identify a matching subject")]
    DataMismatch(FixActionKind),
    #[error("{0}: manual action required")]
    ManualActionRequired(FixActionKind),
}

#[test]
fn test_error_messages() {
    assert_eq!(
        ConfigError::Internal("Tracing filter").to_string(),
        "Internal error: Tracing filter"
    );
    assert_eq!(
        FixError::ManualActionRequired(FixActionKind::FixRuleFormat).to_string(),
        "fixRuleFormat: manual action required"
    );
    assert_eq!(
        FieldError::NotInEnum {
            field: "mode".to_string(),
            allowed: vec!["rule".to_string(), "global".to_string()],
        }
        .to_string(),
        "mode: value must be one of rule, global"
    );
}
