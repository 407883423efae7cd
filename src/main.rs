use actix_cors::Cors;
use actix_web::{error, middleware, web, App, HttpRequest, HttpResponse, HttpServer};
use persona_match::config::Settings;
use persona_match::core::calibration::Calibrator;
use persona_match::core::engine::MatchEngine;
use persona_match::models::ErrorResponse;
use persona_match::routes::{self, matches::AppState};
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

/// Default JSON body limit; matrices are built from the whole body at once
const DEFAULT_MAX_PAYLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Reject malformed JSON bodies with the same error shape the handlers use
fn json_error_handler(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    info!("Rejected JSON body on {}: {}", req.path(), err);
    let body = ErrorResponse {
        error: "invalid_json".to_string(),
        message: err.to_string(),
        status_code: 400,
    };
    error::InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration before logging so the configured level applies
    let settings = Settings::load();

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| {
        settings
            .as_ref()
            .map(|s| s.logging.level.clone())
            .unwrap_or_else(|_| "info".to_string())
    });
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| {
        settings
            .as_ref()
            .map(|s| s.logging.format.clone())
            .unwrap_or_else(|_| "compact".to_string())
    });

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }

    info!("Starting Persona Match service...");

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let detector = settings.calibration.detector();
    let engine = MatchEngine::new(settings.matching, detector).map_err(|e| {
        error!("Invalid matching weights: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    info!(
        "Engine initialized with weights: {:?}, threshold {:.3}",
        engine.weights(),
        detector.threshold()
    );

    let app_state = AppState {
        engine,
        calibrator: Calibrator::new(settings.calibration.estimator_config()),
        random_seed: settings.calibration.random_seed,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);
    let payload_limit = settings.server.max_payload_bytes.unwrap_or(DEFAULT_MAX_PAYLOAD_BYTES);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(
                web::JsonConfig::default()
                    .limit(payload_limit)
                    .error_handler(json_error_handler),
            )
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
