//! Health check endpoint.

use actix_web::{HttpResponse, web};
use shutter_shared::ApiResponse;
use shutter_shared::dto::HealthStatus;

use crate::observability::CorrelationId;
use crate::state::AppState;

/// Health check endpoint - returns server and database status.
///
/// GET /health
pub async fn health_check(state: web::Data<AppState>, correlation_id: CorrelationId) -> HttpResponse {
    let database = match state.db.ping().await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::error!(
                correlation_id = correlation_id.as_str(),
                error = %e,
                "Database ping failed"
            );
            "unavailable"
        }
    };

    let status = HealthStatus {
        status: if database == "ok" { "ok" } else { "degraded" }.to_string(),
        database: database.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    if database == "ok" {
        HttpResponse::Ok().json(ApiResponse::ok(status))
    } else {
        HttpResponse::ServiceUnavailable().json(ApiResponse::failed(status, "Database unavailable"))
    }
}
