//! Honeylure service binary.
//!
//! Loads configuration, wires the adapters chosen by it, and serves the
//! honeypot REST surface.

use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use honeylure::adapters::http::{router, AppState};
use honeylure::adapters::{
    HeuristicPhoneValidator, HttpReporter, HttpScammerChannel, InMemorySessionStore, LogReporter,
    ReportDispatcher, SimulatedScammerChannel,
};
use honeylure::adapters::reporting::TokenBucket;
use honeylure::application::handlers::engage::{
    DriveConversationHandler, IdleSweeper, ProcessTurnHandler,
};
use honeylure::config::{AppConfig, ChannelMode};
use honeylure::domain::detection::ScamDetector;
use honeylure::domain::intel::IntelligenceExtractor;
use honeylure::domain::persona::PersonaSelector;
use honeylure::ports::{Reporter, ScammerChannel, SessionStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(config.is_production());

    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
    let reporter = build_reporter(&config);
    let channel = build_channel(&config);

    let turn_handler = Arc::new(ProcessTurnHandler::new(
        Arc::clone(&store),
        reporter,
        ScamDetector::new(config.detection.threshold),
        IntelligenceExtractor::new(
            config.extraction.enabled_set(),
            Arc::new(HeuristicPhoneValidator::new()),
        ),
        PersonaSelector::new(config.engagement.persona_auto_select),
        config.engagement.termination_policy(),
        config.engagement.persona_override_id(),
    ));

    let sweeper = IdleSweeper::new(
        Arc::clone(&store),
        config.engagement.termination_policy(),
        turn_handler.finalizer(),
        Duration::from_secs(config.engagement.sweep_interval_secs),
    );
    tokio::spawn(sweeper.run());

    let drive_handler = Arc::new(DriveConversationHandler::new(
        channel,
        Arc::clone(&turn_handler),
    ));

    let state = AppState::new(turn_handler, drive_handler, config.server.api_key.clone());
    let app = router(state).layer(
        tower::ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(TimeoutLayer::new(Duration::from_secs(30))),
    );

    let addr = config.server.bind_addr();
    info!(%addr, production = config.is_production(), "honeylure listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(production: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if production {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// The configured reporter, wrapped in the pacing/retry dispatcher.
fn build_reporter(config: &AppConfig) -> Arc<dyn Reporter> {
    let reporting = &config.reporting;
    let inner: Arc<dyn Reporter> = match &reporting.endpoint {
        Some(endpoint) => {
            info!(%endpoint, "reporting to external collector");
            Arc::new(HttpReporter::new(
                endpoint.clone(),
                reporting.api_key.clone(),
                Duration::from_secs(reporting.timeout_secs),
            ))
        }
        None => {
            info!("no reporting endpoint configured, reports go to the log");
            Arc::new(LogReporter::new())
        }
    };

    Arc::new(ReportDispatcher::new(
        inner,
        TokenBucket::new(reporting.burst_capacity, reporting.refill_per_sec()),
        Duration::from_secs(reporting.timeout_secs),
        reporting.max_retries,
        Duration::from_millis(reporting.retry_backoff_ms),
    ))
}

/// The scammer channel adapter, chosen once here and never branched on
/// again.
fn build_channel(config: &AppConfig) -> Arc<dyn ScammerChannel> {
    match config.channel.mode {
        ChannelMode::Simulator => {
            info!("using the scripted scammer simulator");
            Arc::new(SimulatedScammerChannel::new())
        }
        ChannelMode::Live => {
            let base_url = config
                .channel
                .base_url
                .clone()
                .expect("validated configuration guarantees a base url in live mode");
            info!(%base_url, "using the live scammer relay");
            Arc::new(HttpScammerChannel::new(
                base_url,
                config.channel.api_key.clone(),
                Duration::from_secs(config.channel.timeout_secs),
            ))
        }
    }
}
