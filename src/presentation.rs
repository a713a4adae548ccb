use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::Level;

/// Icon and style pairing rendered for one severity level.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Presentation {
    pub icon: String,
    pub style: String,
}

impl Presentation {
    pub fn new(icon: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            style: style.into(),
        }
    }
}

/// Built-in severity to presentation mappings.
///
/// `Classes` yields utility class lists and solid icons; `Inline` yields
/// inline CSS declarations and outline icons. Both share one palette.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationScheme {
    #[default]
    Classes,
    Inline,
}

impl PresentationScheme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Classes => "classes",
            Self::Inline => "inline",
        }
    }
}

impl Display for PresentationScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresentationScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classes" | "class" => Ok(Self::Classes),
            "inline" | "style" => Ok(Self::Inline),
            other => Err(format!("unknown presentation scheme: {other}")),
        }
    }
}

/// One presentation per level. Lookups are total.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PresentationTable {
    success: Presentation,
    error: Presentation,
    warning: Presentation,
    info: Presentation,
}

impl PresentationTable {
    #[must_use]
    pub fn for_scheme(scheme: PresentationScheme) -> Self {
        match scheme {
            PresentationScheme::Classes => Self::classes(),
            PresentationScheme::Inline => Self::inline(),
        }
    }

    #[must_use]
    pub fn classes() -> Self {
        Self {
            success: Presentation::new(
                "heroicons:check-circle-solid",
                "bg-green-50 border border-green-200 text-green-800",
            ),
            error: Presentation::new(
                "heroicons:x-circle-solid",
                "bg-red-50 border border-red-200 text-red-800",
            ),
            warning: Presentation::new(
                "heroicons:exclamation-triangle-solid",
                "bg-amber-50 border border-amber-200 text-amber-800",
            ),
            info: Presentation::new(
                "heroicons:information-circle-solid",
                "bg-blue-50 border border-blue-200 text-blue-800",
            ),
        }
    }

    #[must_use]
    pub fn inline() -> Self {
        Self {
            success: Presentation::new(
                "heroicons:check-circle",
                "background-color:#f0fdf4;border:1px solid #bbf7d0;color:#166534",
            ),
            error: Presentation::new(
                "heroicons:x-circle",
                "background-color:#fef2f2;border:1px solid #fecaca;color:#991b1b",
            ),
            warning: Presentation::new(
                "heroicons:exclamation-triangle",
                "background-color:#fffbeb;border:1px solid #fde68a;color:#92400e",
            ),
            info: Presentation::new(
                "heroicons:information-circle",
                "background-color:#eff6ff;border:1px solid #bfdbfe;color:#1e40af",
            ),
        }
    }

    #[must_use]
    pub const fn get(&self, level: Level) -> &Presentation {
        match level {
            Level::Success => &self.success,
            Level::Error => &self.error,
            Level::Warning => &self.warning,
            Level::Info => &self.info,
        }
    }

    /// Resolve a raw level name; unknown names get the info entry.
    #[must_use]
    pub fn resolve(&self, raw: &str) -> &Presentation {
        self.get(Level::lenient(raw))
    }

    pub fn set(&mut self, level: Level, presentation: Presentation) {
        let slot = match level {
            Level::Success => &mut self.success,
            Level::Error => &mut self.error,
            Level::Warning => &mut self.warning,
            Level::Info => &mut self.info,
        };
        *slot = presentation;
    }

    #[must_use]
    pub fn with(mut self, level: Level, presentation: Presentation) -> Self {
        self.set(level, presentation);
        self
    }
}

impl Default for PresentationTable {
    fn default() -> Self {
        Self::classes()
    }
}
