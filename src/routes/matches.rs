use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::engine::{MatchEngine, RunOptions};
use crate::error::MatchError;
use crate::models::{AssignRequest, AssignResponse, ErrorResponse, HealthResponse};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: MatchEngine,
    pub calibrator: crate::core::calibration::Calibrator,
    pub random_seed: u64,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/assign", web::post().to(assign_matches));
}

/// Map an engine error onto the JSON error shape
pub fn error_response(error: &str, err: &MatchError) -> HttpResponse {
    if err.is_input_error() {
        HttpResponse::BadRequest().json(ErrorResponse {
            error: error.to_string(),
            message: err.to_string(),
            status_code: 400,
        })
    } else {
        HttpResponse::InternalServerError().json(ErrorResponse {
            error: error.to_string(),
            message: err.to_string(),
            status_code: 500,
        })
    }
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Assign matches endpoint
///
/// POST /api/v1/matches/assign
///
/// Request body:
/// ```json
/// {
///   "subjects": [{"id": "p1", "age": 28, "education": "bachelor"}],
///   "candidates": [{"id": "r1", "age": 29, "conditions": [], "medications": []}],
///   "policy": "optimal|greedy|random",
///   "seed": 42,
///   "basis": "compatibility|total",
///   "includeBreakdown": false
/// }
/// ```
async fn assign_matches(
    state: web::Data<AppState>,
    req: web::Json<AssignRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for assign request: {}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let req = req.into_inner();
    let engine = match req.weights {
        Some(weights) => match state.engine.with_weights(weights) {
            Ok(engine) => engine,
            Err(e) => return error_response("Invalid weights", &e),
        },
        None => state.engine.clone(),
    };

    let options = RunOptions {
        policy: req.policy,
        seed: req.seed.unwrap_or(state.random_seed),
        basis: req.basis,
        include_breakdown: req.include_breakdown,
    };

    tracing::info!(
        "Assigning {} subjects to {} candidates ({} policy)",
        req.subjects.len(),
        req.candidates.len(),
        options.policy
    );

    // Matrix construction is CPU bound; keep it off the request workers
    let result = web::block(move || engine.run(&req.subjects, &req.candidates, options)).await;

    match result {
        Ok(Ok(run)) => HttpResponse::Ok().json(AssignResponse {
            run_id: uuid::Uuid::new_v4().to_string(),
            policy: run.policy,
            matches: run.matches,
            statistics: run.statistics,
            threshold: run.threshold,
        }),
        Ok(Err(e)) => {
            tracing::warn!("Assignment failed: {}", e);
            error_response("Assignment failed", &e)
        }
        Err(e) => {
            tracing::error!("Assignment worker failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Assignment failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
