use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{compare_reports, Evaluator};
use crate::models::{
    CompareRequest, ErrorResponse, EvaluateRequest, HealthResponse, PreferenceRequest,
    PreferenceResponse, ScoreRequest,
};
use crate::services::PreferenceGenerator;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub evaluator: Evaluator,
    pub generator: PreferenceGenerator,
}

/// Configure all scoring routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/score", web::post().to(score))
        .route("/evaluate", web::post().to(evaluate))
        .route("/compare", web::post().to(compare))
        .route("/preferences", web::post().to(preferences));
}

fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        judges: state.generator.orchestrator().judge_names(),
        timestamp: chrono::Utc::now(),
    })
}

/// Score one response on every rubric
///
/// POST /api/v1/score
///
/// Request body:
/// ```json
/// {
///   "prompt": "Generate 5 names. Use TLDs: .com, .io",
///   "response": "- brewlo.com — ..."
/// }
/// ```
async fn score(state: web::Data<AppState>, req: web::Json<ScoreRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let scores = state.evaluator.score_sample(&req.prompt, &req.response);
    tracing::debug!(
        "Scored response with {} domains: combined={:.3}",
        scores.domains_found,
        scores.combined_score
    );

    HttpResponse::Ok().json(scores)
}

/// Evaluate a batch of samples
///
/// POST /api/v1/evaluate
async fn evaluate(state: web::Data<AppState>, req: web::Json<EvaluateRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    match state.evaluator.evaluate(&req.name, &req.samples) {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Evaluation failed".to_string(),
            message: e.to_string(),
            status_code: 400,
        }),
    }
}

/// Delta between two evaluation reports
///
/// POST /api/v1/compare
async fn compare(req: web::Json<CompareRequest>) -> impl Responder {
    HttpResponse::Ok().json(compare_reports(&req.baseline, &req.candidate))
}

/// Score candidate domains with the judges and build preference pairs
///
/// POST /api/v1/preferences
///
/// Request body:
/// ```json
/// {
///   "prompt": "Generate 4 names for a coffee brand",
///   "responses": ["- brewlo.com — ...", "- beanly.io — ..."]
/// }
/// ```
async fn preferences(
    state: web::Data<AppState>,
    req: web::Json<PreferenceRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    tracing::info!(
        "Building preferences from {} responses",
        req.responses.len()
    );

    let response = match state.generator.process_prompt(&req.prompt, req.responses.as_slice()).await {
        Some(result) => PreferenceResponse {
            prompt: result.prompt,
            candidates: result.candidates,
            pairs: result.pairs,
        },
        None => PreferenceResponse {
            prompt: req.prompt.clone(),
            candidates: vec![],
            pairs: vec![],
        },
    };

    tracing::info!(
        "Returning {} pairs from {} candidates",
        response.pairs.len(),
        response.candidates.len()
    );

    HttpResponse::Ok().json(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{JudgeOrchestrator, PairingOptions};
    use actix_web::{test, App};
    use std::time::Duration;

    fn state() -> AppState {
        AppState {
            evaluator: Evaluator::default(),
            generator: PreferenceGenerator::new(
                JudgeOrchestrator::new(vec![], Duration::from_secs(1)),
                PairingOptions {
                    candidate_delay: Duration::ZERO,
                    ..PairingOptions::default()
                },
            ),
        }
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: HealthResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.status, "healthy");
        assert!(body.judges.is_empty());
    }

    #[actix_web::test]
    async fn test_score_endpoint() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/score")
            .set_json(serde_json::json!({
                "prompt": "Generate 2 names. Length 4-8. Use TLDs: .com, .io. Must include 'nova'.",
                "response": "- abnova.com — x\n- banova.io — y",
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["domains_found"], 2);
        assert_eq!(body["constraints"]["overall"], 1.0);
    }

    #[actix_web::test]
    async fn test_evaluate_rejects_empty_batch() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/evaluate")
            .set_json(serde_json::json!({"name": "empty", "samples": []}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }
}
