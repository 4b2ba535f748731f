// Integration tests for Roomie Algo

use std::sync::Arc;

use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use roomie_algo::core::Matcher;
use roomie_algo::models::{LikeToggle, Profile, RecommendationsResponse, ToggleLikeResponse};
use roomie_algo::routes::{self, AppState};
use roomie_algo::services::{
    InMemoryStore, ProfileStore, RecommendationError, RecommendationService, StoreError,
};

fn create_test_profile(id: &str, campus: &str, budget: f64) -> Profile {
    Profile {
        id: id.to_string(),
        full_name: Some(format!("User {}", id)),
        gender: Some("Male".to_string()),
        is_profile_complete: true,
        campus: Some(campus.to_string()),
        budget: Some(budget),
        ..Profile::default()
    }
}

fn create_store() -> Arc<InMemoryStore> {
    let mut profiles = vec![
        create_test_profile("me", "Surrey", 1000.0),
        create_test_profile("a_surrey", "Surrey", 1000.0),
        create_test_profile("b_richmond", "Richmond", 4000.0),
        create_test_profile("c_langley", "Langley", 2500.0),
    ];

    let mut incomplete = create_test_profile("d_incomplete", "Surrey", 1000.0);
    incomplete.is_profile_complete = false;
    profiles.push(incomplete);

    // Liked profiles that pull the centroid toward Richmond
    for i in 0..5 {
        profiles.push(create_test_profile(&format!("liked_{}", i), "Richmond", 4000.0));
    }

    Arc::new(InMemoryStore::with_profiles(profiles))
}

fn create_service(store: Arc<InMemoryStore>) -> RecommendationService {
    RecommendationService::new(store, Matcher::with_default_weights())
}

fn ids(response: &RecommendationsResponse) -> Vec<&str> {
    response.recommendations.iter().map(|r| r.id.as_str()).collect()
}

#[tokio::test]
async fn test_integration_end_to_end_recommendations() {
    let service = create_service(create_store());

    let response = service.get_recommendations("me").await.unwrap();

    assert_eq!(response.base_gender, "Male");
    // Everyone complete except the requester
    assert_eq!(response.recommendations.len(), 8);
    assert!(!ids(&response).contains(&"me"));
    assert!(!ids(&response).contains(&"d_incomplete"));

    assert_eq!(response.recommendations[0].id, "a_surrey");
    assert_eq!(response.recommendations[0].compatibility_score, 100);

    for pair in response.recommendations.windows(2) {
        assert!(pair[0].compatibility_score >= pair[1].compatibility_score);
    }
    for rec in &response.recommendations {
        assert!(rec.compatibility_score <= 100);
    }
}

#[tokio::test]
async fn test_liked_profiles_leave_the_pool() {
    let store = create_store();
    let service = create_service(store.clone());

    service.toggle_like("me", "b_richmond").await.unwrap();

    let response = service.get_recommendations("me").await.unwrap();
    assert!(!ids(&response).contains(&"b_richmond"));
}

#[tokio::test]
async fn test_centroid_takes_over_at_five_likes() {
    let store = create_store();
    let service = create_service(store.clone());

    for i in 0..4 {
        service.toggle_like("me", &format!("liked_{}", i)).await.unwrap();
    }

    // Four likes: still ranked against the requester's own Surrey profile
    let response = service.get_recommendations("me").await.unwrap();
    assert_eq!(response.recommendations[0].id, "a_surrey");

    service.toggle_like("me", "liked_4").await.unwrap();

    // Five likes: centroid of the Richmond profiles
    let response = service.get_recommendations("me").await.unwrap();
    assert_eq!(response.recommendations[0].id, "b_richmond");
    assert_eq!(response.recommendations[0].compatibility_score, 100);
    assert!(!ids(&response).iter().any(|id| id.starts_with("liked_")));
}

#[tokio::test]
async fn test_dangling_likes_are_skipped() {
    let store = create_store();
    let service = create_service(store.clone());

    service.toggle_like("me", "a_surrey").await.unwrap();
    service.toggle_like("me", "deleted_user").await.unwrap();

    let liked = service.liked_profiles("me").await.unwrap();
    let liked_ids: Vec<&str> = liked.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(liked_ids, vec!["a_surrey"]);
}

#[tokio::test]
async fn test_equal_scores_rank_in_id_order() {
    let store = Arc::new(InMemoryStore::with_profiles(vec![
        create_test_profile("me", "Surrey", 1000.0),
        create_test_profile("zed", "Surrey", 1000.0),
        create_test_profile("amy", "Surrey", 1000.0),
        create_test_profile("kai", "Surrey", 1000.0),
    ]));
    let service = create_service(store);

    let response = service.get_recommendations("me").await.unwrap();
    assert_eq!(ids(&response), vec!["amy", "kai", "zed"]);
}

#[tokio::test]
async fn test_malformed_profiles_do_not_fail() {
    let store = Arc::new(InMemoryStore::new());
    store.upsert_profile(Profile::new("me")).await.unwrap();
    store
        .upsert_profile(Profile {
            is_profile_complete: true,
            campus: Some("   ".to_string()),
            budget: Some(f64::NAN),
            ..Profile::new("weird")
        })
        .await
        .unwrap();
    let service = create_service(store);

    let response = service.get_recommendations("me").await.unwrap();
    assert_eq!(response.recommendations.len(), 1);
    assert_eq!(response.recommendations[0].compatibility_score, 0);
}

#[tokio::test]
async fn test_unknown_user() {
    let service = create_service(create_store());

    let result = service.get_recommendations("nobody").await;
    assert!(matches!(result, Err(RecommendationError::NotFound(_))));
}

fn app_state(store: Arc<InMemoryStore>) -> web::Data<AppState> {
    web::Data::new(AppState {
        service: Arc::new(create_service(store)),
    })
}

#[actix_web::test]
async fn test_http_recommendations() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(create_store()))
            .configure(routes::extractor_configs)
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/roommates/recommendations?userId=me")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["baseGender"], "Male");
    assert_eq!(body["recommendations"][0]["id"], "a_surrey");
    assert_eq!(body["recommendations"][0]["compatibilityScore"], 100);
    assert_eq!(body["recommendations"][0]["profilePicture"], "/default_profile.png");
}

#[actix_web::test]
async fn test_http_unknown_user_is_404() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(create_store()))
            .configure(routes::extractor_configs)
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/roommates/recommendations?userId=nobody")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_http_missing_user_id_is_400() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(create_store()))
            .configure(routes::extractor_configs)
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/roommates/recommendations")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_http_like_toggle() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(create_store()))
            .configure(routes::extractor_configs)
            .configure(routes::configure_routes),
    )
    .await;

    let like = || {
        test::TestRequest::patch()
            .uri("/api/v1/users/like")
            .set_json(serde_json::json!({ "userId": "me", "targetUserId": "c_langley" }))
            .to_request()
    };

    let first: ToggleLikeResponse = test::call_and_read_body_json(&app, like()).await;
    assert!(first.liked);
    assert_eq!(first.message, "Profile liked");

    let req = test::TestRequest::get()
        .uri("/api/v1/users/liked?userId=me")
        .to_request();
    let liked: Vec<Profile> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(liked.len(), 1);
    assert_eq!(liked[0].id, "c_langley");

    let second: ToggleLikeResponse = test::call_and_read_body_json(&app, like()).await;
    assert!(!second.liked);
    assert_eq!(second.message, "Profile unliked");
}

#[actix_web::test]
async fn test_http_self_like_is_400() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(create_store()))
            .configure(routes::extractor_configs)
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::patch()
        .uri("/api/v1/users/like")
        .set_json(serde_json::json!({ "userId": "me", "targetUserId": "me" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_http_malformed_json_is_400() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(create_store()))
            .configure(routes::extractor_configs)
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::patch()
        .uri("/api/v1/users/like")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_json");
}

#[actix_web::test]
async fn test_http_health() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(create_store()))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
}

/// Store whose backing database is unreachable
struct UnreachableStore;

#[async_trait]
impl ProfileStore for UnreachableStore {
    async fn get_profile(&self, _user_id: &str) -> Result<Option<Profile>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn get_profiles(&self, _ids: &[String]) -> Result<Vec<Profile>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn liked_ids(&self, _user_id: &str) -> Result<Vec<String>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn candidate_pool(
        &self,
        _exclude_id: &str,
        _exclude_ids: &[String],
    ) -> Result<Vec<Profile>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn toggle_like(&self, _user_id: &str, _target_id: &str) -> Result<LikeToggle, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn upsert_profile(&self, _profile: Profile) -> Result<(), StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }
}

fn unreachable_state() -> web::Data<AppState> {
    web::Data::new(AppState {
        service: Arc::new(RecommendationService::new(
            Arc::new(UnreachableStore),
            Matcher::with_default_weights(),
        )),
    })
}

#[actix_web::test]
async fn test_http_health_degraded() {
    let app = test::init_service(
        App::new()
            .app_data(unreachable_state())
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "degraded");
}

#[actix_web::test]
async fn test_http_store_failure_is_500() {
    let app = test::init_service(
        App::new()
            .app_data(unreachable_state())
            .configure(routes::extractor_configs)
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/roommates/recommendations?userId=me")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_store_errors_are_not_reported_as_missing_users() {
    let service = RecommendationService::new(Arc::new(UnreachableStore), Matcher::with_default_weights());

    assert!(matches!(
        service.toggle_like("me", "a_surrey").await,
        Err(RecommendationError::Store(StoreError::Database(_)))
    ));
}
