use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building a dictionary or reading configuration.
///
/// Lookups and subscriptions never fail; only loading does.
#[derive(Debug, Error)]
pub enum I18nError {
    #[cfg(feature = "yaml")]
    #[error("yaml catalog error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[cfg(feature = "json")]
    #[error("json catalog error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog entry at `{path}`: {reason}")]
    InvalidValue { path: String, reason: String },

    #[error("unsupported catalog format: `{}`", .0.display())]
    UnsupportedFormat(PathBuf),
}

impl I18nError {
    pub(crate) fn invalid(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
