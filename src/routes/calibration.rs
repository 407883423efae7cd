use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{CalibrateRequest, ClassifyRequest, ClassifyResponse, ErrorResponse};
use crate::routes::matches::{error_response, AppState};

/// Configure calibration routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/calibration", web::post().to(calibrate))
        .route("/calibration/classify", web::post().to(classify));
}

/// Calibrate a threshold from labeled samples
///
/// POST /api/v1/calibration
///
/// Request body:
/// ```json
/// {
///   "bestScores": [0.87, 0.91],
///   "worstScores": [0.15, 0.17]
/// }
/// ```
async fn calibrate(
    state: web::Data<AppState>,
    req: web::Json<CalibrateRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state.calibrator.calibrate(&req.best_scores, &req.worst_scores) {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => error_response("Calibration failed", &e),
    }
}

/// Classify one score against the active threshold
///
/// POST /api/v1/calibration/classify
async fn classify(
    state: web::Data<AppState>,
    req: web::Json<ClassifyRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let detector = state.engine.detector();
    HttpResponse::Ok().json(ClassifyResponse {
        score: req.score,
        threshold: detector.threshold(),
        anomalous: detector.is_anomalous(req.score),
        band: detector.band(req.score),
    })
}
