use std::path::PathBuf;
use std::time::Duration;

use tokio::io::BufReader;
use tokio::signal;
use toaster::Result;
use toaster::config::Config;
use toaster::error::{ConfigError, Error as ToastError};
use toaster::event::EventBus;
use toaster::service::ToastService;
use toaster::telemetry::init_tracing;
use tracing::{info, warn};

use super::cli::Cli;
use super::feed::feed_events;
use super::render::render_views;

const DEFAULT_CONFIG: &str = "toaster.toml";

pub async fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.log_filter.as_deref(), cli.json_logs)?;

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let mut config = Config::from_env_and_file(&config_path)?;
    apply_cli_overrides(&mut config, &cli)?;

    info!(
        display_for = ?config.toast.display_for,
        fade_out = ?config.toast.fade_out,
        scheme = %config.scheme,
        "toast service starting"
    );

    let bus = EventBus::new(config.bus_capacity);
    let (service, views) = ToastService::new(&bus, config.toast, config.presentation_table());
    let service = tokio::spawn(service.run(async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }));
    let renderer = tokio::spawn(render_views(views, tokio::io::stdout()));
    let feeder = tokio::spawn(feed_events(BufReader::new(tokio::io::stdin()), bus));

    if let Err(err) = service.await {
        warn!(error = %err, "toast service terminated unexpectedly");
    }
    if feeder.is_finished() {
        if let Ok(Err(err)) = feeder.await {
            warn!(error = %err.chain(), "failed to read events");
        }
    } else {
        feeder.abort();
    }

    match renderer.await {
        Ok(Ok(rendered)) => info!(rendered, "toast service stopped"),
        Ok(Err(err)) => return Err(err),
        Err(err) => warn!(error = %err, "renderer terminated unexpectedly"),
    }
    Ok(())
}

fn apply_cli_overrides(config: &mut Config, cli: &Cli) -> Result<()> {
    if let Some(display_for) = cli.display_for {
        config.toast.display_for = non_zero("cli.display_for", display_for)?;
    }
    if let Some(fade_out) = cli.fade_out {
        config.toast.fade_out = non_zero("cli.fade_out", fade_out)?;
    }
    if let Some(scheme) = cli.scheme {
        config.scheme = scheme;
    }
    Ok(())
}

fn non_zero(field: &'static str, value: Duration) -> Result<Duration> {
    if value.is_zero() {
        return Err(ToastError::from(ConfigError::InvalidField {
            field,
            message: "duration must be greater than zero".to_string(),
        }));
    }
    Ok(value)
}
