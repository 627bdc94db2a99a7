/// Health endpoints for container probes
use crate::services::PipelineService;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Instant;

#[derive(Serialize, Clone)]
#[serde(rename_all = "lowercase")]
enum ComponentStatus {
    Healthy,
    Unhealthy,
}

#[derive(Serialize)]
struct ComponentCheck {
    status: ComponentStatus,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
}

#[derive(Serialize)]
struct ReadinessResponse {
    ready: bool,
    status: ComponentStatus,
    checks: HashMap<String, ComponentCheck>,
    timestamp: String,
}

async fn check_sqlite(pipeline: &PipelineService) -> Result<(), sqlx::Error> {
    let mut conn =
        db_pool::acquire_with_metrics(pipeline.store().pool(), crate::config::SERVICE_NAME).await?;
    sqlx::query("SELECT 1")
        .fetch_one(&mut *conn)
        .await
        .map(|_| ())
}

pub async fn health_summary(pipeline: web::Data<PipelineService>) -> HttpResponse {
    match check_sqlite(&pipeline).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": crate::config::SERVICE_NAME,
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("SQLite check failed: {}", e),
            "service": crate::config::SERVICE_NAME
        })),
    }
}

pub async fn readiness_summary(pipeline: web::Data<PipelineService>) -> HttpResponse {
    let mut checks = HashMap::new();

    let start = Instant::now();
    let result = check_sqlite(&pipeline).await;
    let latency_ms = Some(start.elapsed().as_millis() as u64);
    let ready = result.is_ok();
    let sqlite_check = match result {
        Ok(_) => ComponentCheck {
            status: ComponentStatus::Healthy,
            message: "SQLite query successful".to_string(),
            latency_ms,
        },
        Err(e) => ComponentCheck {
            status: ComponentStatus::Unhealthy,
            message: format!("SQLite query failed: {}", e),
            latency_ms,
        },
    };
    checks.insert("sqlite".to_string(), sqlite_check);

    let response = ReadinessResponse {
        ready,
        status: if ready {
            ComponentStatus::Healthy
        } else {
            ComponentStatus::Unhealthy
        },
        checks,
        timestamp: Utc::now().to_rfc3339(),
    };

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}
