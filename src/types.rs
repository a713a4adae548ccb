use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity of a toast.
///
/// Payloads go through [`Level::lenient`], which only accepts the exact
/// lowercase names. `FromStr` is forgiving about case and whitespace and is
/// meant for configuration keys.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl Level {
    pub const ALL: [Self; 4] = [Self::Success, Self::Error, Self::Warning, Self::Info];

    /// Exact, case-sensitive match on the wire names.
    #[must_use]
    pub fn from_name(raw: &str) -> Option<Self> {
        match raw {
            "success" => Some(Self::Success),
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            "info" => Some(Self::Info),
            _ => None,
        }
    }

    /// Total parse: anything that is not exactly a known name resolves to
    /// `Info`.
    #[must_use]
    pub fn lenient(raw: &str) -> Self {
        Self::from_name(raw).unwrap_or(Self::Info)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            other => Err(format!("unknown toast level: {other}")),
        }
    }
}
