use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryLeadDirectory, InMemoryResultCache};
use crate::routes::with_analytics_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use reachiq::config::AppConfig;
use reachiq::error::AppError;
use reachiq::outreach::analytics::OutreachAnalyticsService;
use reachiq::outreach::sequencing::SequencingEngine;
use reachiq::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.leads_csv.take() {
        config.engine.leads_csv = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let directory = Arc::new(InMemoryLeadDirectory::load(config.engine.leads_csv.as_deref())?);
    let cache = Arc::new(InMemoryResultCache::default());
    let ttl = config.engine.cache_ttl();
    let analytics_service = Arc::new(OutreachAnalyticsService::new(
        directory.clone(),
        cache.clone(),
        SequencingEngine::new(config.engine.policy.clone()),
        ttl,
    ));
    spawn_cache_eviction(cache, ttl);

    let app = with_analytics_routes(analytics_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        leads = directory.len(),
        policy = %config.engine.policy.fingerprint(),
        "outreach sequencing service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Periodically drop expired analyses so the in-memory cache stays bounded
/// by the active lead set.
fn spawn_cache_eviction(cache: Arc<InMemoryResultCache>, ttl: chrono::Duration) {
    let period = ttl
        .to_std()
        .unwrap_or(Duration::from_secs(300))
        .max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let evicted = cache.evict_older_than(Utc::now() - ttl);
            if evicted > 0 {
                debug!(evicted, "expired analyses evicted");
            }
        }
    });
}
