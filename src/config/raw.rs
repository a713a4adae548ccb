use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use serde_with::serde_as;

use crate::Result;
use crate::controller::ToastSettings;
use crate::error::ConfigError;
use crate::presentation::{Presentation, PresentationScheme, PresentationTable};
use crate::types::Level;

use super::defaults::{default_bus_capacity, default_display_for, default_fade_out};
use super::env::{env_duration, env_parse, env_string};
use super::{Config, HumantimeDuration};

const ENV_PREFIX: &str = "TOASTER";

pub(super) fn load(path: impl AsRef<Path>) -> std::result::Result<RawConfig, ConfigError> {
    let mut builder = ::config::Config::builder();
    let path = path.as_ref();
    builder = builder.add_source(::config::File::from(path).required(false));
    builder = builder.add_source(
        ::config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );
    deserialize(builder)
}

pub(super) fn load_str(source: &str) -> std::result::Result<RawConfig, ConfigError> {
    let builder = ::config::Config::builder()
        .add_source(::config::File::from_str(source, ::config::FileFormat::Toml));
    deserialize(builder)
}

fn deserialize(
    builder: ::config::ConfigBuilder<::config::builder::DefaultState>,
) -> std::result::Result<RawConfig, ConfigError> {
    builder
        .build()
        .map_err(|err| ConfigError::Other(err.to_string()))?
        .try_deserialize()
        .map_err(|err| ConfigError::Parse(err.to_string()))
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub(super) toast: RawToast,
    #[serde(default)]
    pub(super) presentation: RawPresentation,
    #[serde(default)]
    pub(super) bus: RawBus,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawToast {
    #[serde(default = "default_display_for")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) display_for: Duration,
    #[serde(default = "default_fade_out")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) fade_out: Duration,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawPresentation {
    #[serde(default)]
    pub(super) scheme: Option<String>,
    #[serde(default)]
    pub(super) overrides: BTreeMap<String, RawOverride>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawOverride {
    #[serde(default)]
    pub(super) icon: Option<String>,
    #[serde(default)]
    pub(super) style: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawBus {
    #[serde(default = "default_bus_capacity")]
    pub(super) capacity: usize,
}

impl Default for RawToast {
    fn default() -> Self {
        Self {
            display_for: default_display_for(),
            fade_out: default_fade_out(),
        }
    }
}

impl Default for RawBus {
    fn default() -> Self {
        Self {
            capacity: default_bus_capacity(),
        }
    }
}

impl RawConfig {
    pub(super) fn apply_env_overrides(&mut self) -> std::result::Result<(), ConfigError> {
        if let Some(display_for) = env_duration("TOAST_DISPLAY_FOR")? {
            self.toast.display_for = display_for;
        }
        if let Some(fade_out) = env_duration("TOAST_FADE_OUT")? {
            self.toast.fade_out = fade_out;
        }
        if let Some(scheme) = env_string("TOAST_SCHEME")? {
            self.presentation.scheme = Some(scheme);
        }
        if let Some(capacity) = env_parse::<usize>("TOAST_BUS_CAPACITY")? {
            self.bus.capacity = capacity;
        }
        Ok(())
    }

    pub(super) fn validate_and_build(self) -> Result<Config> {
        if self.toast.display_for.is_zero() {
            return Err(ConfigError::InvalidField {
                field: "toast.display_for",
                message: "display time must be greater than zero".to_string(),
            }
            .into());
        }
        if self.toast.fade_out.is_zero() {
            return Err(ConfigError::InvalidField {
                field: "toast.fade_out",
                message: "fade-out time must be greater than zero".to_string(),
            }
            .into());
        }
        if self.bus.capacity == 0 {
            return Err(ConfigError::InvalidField {
                field: "bus.capacity",
                message: "bus capacity must be greater than zero".to_string(),
            }
            .into());
        }

        let scheme = match self.presentation.scheme.as_deref() {
            Some(raw) => PresentationScheme::from_str(raw).map_err(|message| {
                ConfigError::InvalidField {
                    field: "presentation.scheme",
                    message,
                }
            })?,
            None => PresentationScheme::default(),
        };

        let base = PresentationTable::for_scheme(scheme);
        let mut overrides = Vec::with_capacity(self.presentation.overrides.len());
        for (name, raw) in self.presentation.overrides {
            let level = Level::from_str(&name).map_err(|message| ConfigError::InvalidField {
                field: "presentation.overrides",
                message,
            })?;
            let fallback = base.get(level);
            overrides.push((
                level,
                Presentation {
                    icon: raw.icon.unwrap_or_else(|| fallback.icon.clone()),
                    style: raw.style.unwrap_or_else(|| fallback.style.clone()),
                },
            ));
        }

        Ok(Config {
            toast: ToastSettings {
                display_for: self.toast.display_for,
                fade_out: self.toast.fade_out,
            },
            scheme,
            overrides,
            bus_capacity: self.bus.capacity,
        })
    }
}
