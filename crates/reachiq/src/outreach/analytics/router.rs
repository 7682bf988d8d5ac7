use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::cache::ResultCache;
use super::service::{AnalyticsServiceError, OutreachAnalyticsService};
use crate::outreach::signals::{LeadId, OutreachSignals, SignalSource};

/// Router builder exposing the read-only analytics endpoints.
pub fn analytics_router<S, C>(service: Arc<OutreachAnalyticsService<S, C>>) -> Router
where
    S: SignalSource + 'static,
    C: ResultCache + 'static,
{
    Router::new()
        .route(
            "/analytics/growth-curve/custom",
            post(custom_growth_curve_handler::<S, C>),
        )
        .route(
            "/analytics/growth-curve/:lead_id",
            get(growth_curve_handler::<S, C>),
        )
        .route(
            "/analytics/growth-curves",
            get(batch_growth_curves_handler::<S, C>),
        )
        .route(
            "/analytics/optimization-insights",
            get(optimization_insights_handler::<S, C>),
        )
        .route("/buyers/:lead_id/outreach", get(outreach_handler::<S, C>))
        .route(
            "/buyers/:lead_id/decision-tree",
            get(decision_tree_handler::<S, C>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct BatchQuery {
    #[serde(default)]
    lead_ids: String,
}

impl BatchQuery {
    fn lead_ids(&self) -> Vec<LeadId> {
        self.lead_ids
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(LeadId::from)
            .collect()
    }
}

pub(crate) async fn growth_curve_handler<S, C>(
    State(service): State<Arc<OutreachAnalyticsService<S, C>>>,
    Path(lead_id): Path<String>,
) -> Response
where
    S: SignalSource + 'static,
    C: ResultCache + 'static,
{
    match service.growth_curve(&LeadId(lead_id), Utc::now()) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn outreach_handler<S, C>(
    State(service): State<Arc<OutreachAnalyticsService<S, C>>>,
    Path(lead_id): Path<String>,
) -> Response
where
    S: SignalSource + 'static,
    C: ResultCache + 'static,
{
    match service.outreach_signals(&LeadId(lead_id)) {
        Ok(signals) => (StatusCode::OK, axum::Json(signals)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn decision_tree_handler<S, C>(
    State(service): State<Arc<OutreachAnalyticsService<S, C>>>,
    Path(lead_id): Path<String>,
) -> Response
where
    S: SignalSource + 'static,
    C: ResultCache + 'static,
{
    match service.decision_tree(&LeadId(lead_id), Utc::now()) {
        Ok(tree) => (StatusCode::OK, axum::Json(tree)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn batch_growth_curves_handler<S, C>(
    State(service): State<Arc<OutreachAnalyticsService<S, C>>>,
    Query(query): Query<BatchQuery>,
) -> Response
where
    S: SignalSource + 'static,
    C: ResultCache + 'static,
{
    let lead_ids = query.lead_ids();
    if lead_ids.is_empty() {
        let payload = json!({ "error": "lead_ids must name at least one lead" });
        return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
    }

    match service.batch(&lead_ids, Utc::now()) {
        Ok(predictions) => {
            let payload = json!({
                "count": predictions.len(),
                "predictions": predictions,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn custom_growth_curve_handler<S, C>(
    State(service): State<Arc<OutreachAnalyticsService<S, C>>>,
    axum::Json(signals): axum::Json<OutreachSignals>,
) -> Response
where
    S: SignalSource + 'static,
    C: ResultCache + 'static,
{
    let result = service.custom(&signals);
    (StatusCode::OK, axum::Json(result)).into_response()
}

pub(crate) async fn optimization_insights_handler<S, C>(
    State(service): State<Arc<OutreachAnalyticsService<S, C>>>,
) -> Response
where
    S: SignalSource + 'static,
    C: ResultCache + 'static,
{
    match service.optimization_insights(Utc::now()) {
        Ok(insights) => (StatusCode::OK, axum::Json(insights)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: AnalyticsServiceError) -> Response {
    match err {
        AnalyticsServiceError::LeadNotFound(_) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({
                "error": other.to_string(),
                "retryable": other.is_retryable(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}
