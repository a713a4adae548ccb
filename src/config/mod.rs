use std::path::Path;

use crate::Result;
use crate::controller::ToastSettings;
use crate::error::Error as ToastError;
use crate::presentation::{Presentation, PresentationScheme, PresentationTable};
use crate::types::Level;

mod defaults;
mod env;
mod raw;
mod serde;

pub(crate) use self::serde::HumantimeDuration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub toast: ToastSettings,
    pub scheme: PresentationScheme,
    pub overrides: Vec<(Level, Presentation)>,
    pub bus_capacity: usize,
}

impl Config {
    /// Load configuration from a file and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration file cannot be parsed, when
    /// environment overrides are invalid, or when the resulting values fail
    /// validation.
    pub fn from_env_and_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut raw = raw::load(path).map_err(ToastError::from)?;
        raw.apply_env_overrides().map_err(ToastError::from)?;
        raw.validate_and_build()
    }

    /// Parse a TOML document without consulting the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the document is malformed or fails validation.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        raw::load_str(source)
            .map_err(ToastError::from)?
            .validate_and_build()
    }

    /// Built-in table for the configured scheme with overrides applied.
    #[must_use]
    pub fn presentation_table(&self) -> PresentationTable {
        self.overrides.iter().fold(
            PresentationTable::for_scheme(self.scheme),
            |table, (level, presentation)| table.with(*level, presentation.clone()),
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            toast: ToastSettings::default(),
            scheme: PresentationScheme::default(),
            overrides: Vec::new(),
            bus_capacity: defaults::default_bus_capacity(),
        }
    }
}
