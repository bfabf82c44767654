use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use rota_attribution::{CalendarDayClassifier, OverlapAttributionEngine, TimezonePolicy};
use rota_core::config::{RotaConfig, SourceKind};
use rota_source::{PagerDutySource, ScheduleSource, StaticSource};

mod app;
mod http;

/// On-call compensation service.
#[derive(Parser, Debug)]
#[command(name = "rota-gateway", version, about)]
struct Cli {
    /// Path to rota.toml (default: $ROTA_CONFIG, then ~/.rota/rota.toml).
    #[arg(long)]
    config: Option<String>,
    /// Override gateway.bind.
    #[arg(long)]
    bind: Option<String>,
    /// Override gateway.port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "rota_gateway=info,rota_source=info,rota_attribution=info,tower_http=debug".into()
            }),
        )
        .init();

    let cli = Cli::parse();

    // explicit flag > ROTA_CONFIG env > ~/.rota/rota.toml
    let config_path = cli.config.or_else(|| std::env::var("ROTA_CONFIG").ok());
    let mut config = RotaConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        RotaConfig::default()
    });
    if let Some(bind) = cli.bind {
        config.gateway.bind = bind;
    }
    if let Some(port) = cli.port {
        config.gateway.port = port;
    }

    let source = build_source(&config)?;
    let engine = build_engine(&config)?;

    let addr: SocketAddr = format!("{}:{}", config.gateway.bind, config.gateway.port).parse()?;
    let state = Arc::new(app::AppState::new(config, source, engine));
    let router = app::build_router(state);

    info!("rota gateway listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

/// Build the attribution engine from the `[attribution]` section.
fn build_engine(config: &RotaConfig) -> anyhow::Result<OverlapAttributionEngine> {
    let policy = TimezonePolicy::from_setting(&config.attribution.timezone_policy)?;
    let secs = config.attribution.min_duration_secs;
    let min_duration = i64::try_from(secs)
        .ok()
        .and_then(chrono::TimeDelta::try_seconds)
        .ok_or_else(|| anyhow::anyhow!("attribution.min_duration_secs is out of range: {secs}"))?;
    info!(%policy, min_duration_secs = secs, "attribution engine");
    Ok(OverlapAttributionEngine::new(
        Box::new(CalendarDayClassifier::with_min_duration(min_duration)),
        policy,
    ))
}

/// Build the schedule source selected by `source.kind`.
fn build_source(config: &RotaConfig) -> anyhow::Result<Box<dyn ScheduleSource>> {
    let cfg = &config.source;
    match cfg.kind {
        SourceKind::Pagerduty => {
            let api_key = cfg.api_key.clone().ok_or_else(|| {
                anyhow::anyhow!(
                    "source.api_key is required for the pagerduty source (or set PAGERDUTY_API_KEY)"
                )
            })?;
            info!(base_url = %cfg.base_url, "schedule source: PagerDuty");
            Ok(Box::new(PagerDutySource::new(
                Some(cfg.base_url.clone()),
                api_key,
                Duration::from_secs(cfg.timeout_secs),
            )?))
        }
        SourceKind::Static => match cfg.static_file {
            Some(ref path) => {
                info!(%path, "schedule source: static file");
                Ok(Box::new(StaticSource::from_file(path)?))
            }
            None => {
                warn!("static source configured without source.static_file, serving no schedules");
                Ok(Box::new(StaticSource::default()))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rota_core::types::{AssignmentInterval, Rates, ScheduleMetadata};

    fn metadata() -> ScheduleMetadata {
        ScheduleMetadata {
            id: "S1".into(),
            display_name: "Primary".into(),
            external_url: String::new(),
            timezone: "UTC".into(),
        }
    }

    fn one_hour() -> AssignmentInterval {
        AssignmentInterval {
            person_id: "U1".into(),
            person_display_name: "Ada".into(),
            schedule_id: "S1".into(),
            start: Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2026, 1, 5, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn min_duration_setting_reaches_classifier() {
        let mut config = RotaConfig::default();
        config.attribution.min_duration_secs = 2 * 60 * 60;
        let reports = build_engine(&config)
            .unwrap()
            .attribute(&[metadata()], &[one_hour()], Rates::default())
            .unwrap();
        assert!(reports[0].employees.is_empty());

        let reports = build_engine(&RotaConfig::default())
            .unwrap()
            .attribute(&[metadata()], &[one_hour()], Rates::default())
            .unwrap();
        assert_eq!(reports[0].employees.len(), 1);
    }

    #[test]
    fn oversized_min_duration_is_rejected() {
        let mut config = RotaConfig::default();
        config.attribution.min_duration_secs = u64::MAX;
        assert!(build_engine(&config).is_err());
    }
}
