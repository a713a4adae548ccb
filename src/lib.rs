#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod presentation;
pub mod service;
pub mod telemetry;
pub mod timer;
pub mod types;

pub use controller::{ToastController, ToastSettings, ToastState, ToastView};
pub use event::{EventBus, ShowToast};
pub use types::Level;

pub type Result<T> = std::result::Result<T, error::Error>;
