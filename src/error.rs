use thiserror::Error;

use crate::core::types::Category;

/// Error type for the GCU detector
#[derive(Error, Debug)]
pub enum DetectorError {
    /// The diagnostic tool could not be spawned, exited non-zero, or printed nothing.
    #[error(
        "Failed to execute `{command}`: {reason} (exit code: {}), stdout: {stdout:?}, stderr: {stderr:?}",
        display_code(.exit_code)
    )]
    Execution {
        command: String,
        reason: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("Device {device_id} is reported by the device query but missing from the {category} query")]
    Consistency { device_id: u32, category: Category },

    #[error("Device {device_id} has no `{field}` entry in the {category} query")]
    MissingField {
        device_id: u32,
        category: Category,
        field: &'static str,
    },

    #[error("Failed to parse `{key}` value {value:?}{}: {reason}", display_category(.category))]
    Parse {
        category: Option<Category>,
        key: String,
        value: String,
        reason: String,
    },

    #[error("Invalid output grammar: {0}")]
    Grammar(String),
}

fn display_code(code: &Option<i32>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "none".to_string())
}

fn display_category(category: &Option<Category>) -> String {
    category
        .map(|c| format!(" in the {} query", c))
        .unwrap_or_default()
}

/// Result type alias for the detector
pub type Result<T> = std::result::Result<T, DetectorError>;

impl DetectorError {
    /// Create a grammar error
    pub fn grammar<S: Into<String>>(msg: S) -> Self {
        DetectorError::Grammar(msg.into())
    }

    pub fn parse<K, V, R>(key: K, value: V, reason: R) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        DetectorError::Parse {
            category: None,
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Attach the category being parsed to a parse error
    pub fn in_category(self, category: Category) -> Self {
        match self {
            DetectorError::Parse {
                key, value, reason, ..
            } => DetectorError::Parse {
                category: Some(category),
                key,
                value,
                reason,
            },
            other => other,
        }
    }
}
