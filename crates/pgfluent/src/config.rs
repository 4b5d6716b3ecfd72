use crate::error::QbResult;
use crate::placeholder::PlaceholderStyle;
use serde::Deserialize;

/// Rendering configuration for [`SqlBuilder`](crate::SqlBuilder).
///
/// Can be built in code or loaded from TOML:
///
/// ```toml
/// placeholder_style = "dollar"
/// literal_aware = true
/// max_log_sql_length = 200
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QbConfig {
    /// How positional parameters are written. Default is `$n`.
    pub placeholder_style: PlaceholderStyle,
    /// Treat `?` inside quoted literals/identifiers as text. Default is `true`.
    pub literal_aware: bool,
    /// Truncate logged SQL (in bytes). `None` means no truncation.
    pub max_log_sql_length: Option<usize>,
}

impl Default for QbConfig {
    fn default() -> Self {
        Self {
            placeholder_style: PlaceholderStyle::Dollar,
            literal_aware: true,
            max_log_sql_length: Some(200),
        }
    }
}

impl QbConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> QbResult<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Set the placeholder style.
    pub fn placeholder_style(mut self, style: PlaceholderStyle) -> Self {
        self.placeholder_style = style;
        self
    }

    /// Enable or disable quote-aware marker scanning.
    pub fn literal_aware(mut self, enabled: bool) -> Self {
        self.literal_aware = enabled;
        self
    }

    /// Set maximum SQL length to log.
    pub fn max_log_sql_length(mut self, len: usize) -> Self {
        self.max_log_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation in logs.
    pub fn no_truncate(mut self) -> Self {
        self.max_log_sql_length = None;
        self
    }
}
