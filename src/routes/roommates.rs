use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{
    ErrorResponse, HealthResponse, LikedProfilesQuery, RecommendationsQuery, ToggleLikeRequest,
    ToggleLikeResponse, LikeToggle,
};
use crate::services::{RecommendationError, RecommendationService};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RecommendationService>,
}

/// Configure all roommate-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/roommates/recommendations", web::get().to(get_recommendations))
        .route("/users/like", web::patch().to(toggle_like))
        .route("/users/liked", web::get().to(get_liked_profiles));
}

fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

fn service_error(context: &str, err: RecommendationError) -> HttpResponse {
    match err {
        RecommendationError::NotFound(id) => {
            tracing::info!("{}: user {} not found", context, id);
            HttpResponse::NotFound().json(ErrorResponse {
                error: "User not found".to_string(),
                message: format!("No user with id {}", id),
                status_code: 404,
            })
        }
        RecommendationError::SelfLike => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid like".to_string(),
            message: RecommendationError::SelfLike.to_string(),
            status_code: 400,
        }),
        RecommendationError::Store(e) => {
            tracing::error!("{}: {}", context, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: context.to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.service.store().health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Recommended roommates endpoint
///
/// GET /api/v1/roommates/recommendations?userId={userId}
///
/// Returns every eligible candidate ranked by compatibility:
/// ```json
/// {
///   "baseGender": "string",
///   "recommendations": [{ "id": "string", "compatibilityScore": 87, ... }]
/// }
/// ```
async fn get_recommendations(
    state: web::Data<AppState>,
    query: web::Query<RecommendationsQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    tracing::info!("Generating recommendations for user: {}", query.user_id);

    match state.service.get_recommendations(&query.user_id).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => service_error("Failed to generate recommendations", e),
    }
}

/// Like or unlike a profile
///
/// PATCH /api/v1/users/like
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "targetUserId": "string"
/// }
/// ```
async fn toggle_like(
    state: web::Data<AppState>,
    req: web::Json<ToggleLikeRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    match state.service.toggle_like(&req.user_id, &req.target_user_id).await {
        Ok(outcome) => HttpResponse::Ok().json(ToggleLikeResponse {
            message: outcome.message().to_string(),
            liked: outcome == LikeToggle::Liked,
        }),
        Err(e) => service_error("Failed to update like status", e),
    }
}

/// Profiles the user has liked
///
/// GET /api/v1/users/liked?userId={userId}
async fn get_liked_profiles(
    state: web::Data<AppState>,
    query: web::Query<LikedProfilesQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    match state.service.liked_profiles(&query.user_id).await {
        Ok(profiles) => HttpResponse::Ok().json(profiles),
        Err(e) => service_error("Failed to fetch liked profiles", e),
    }
}
