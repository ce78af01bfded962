use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use course_discovery::discovery::{
    CourseApi, DiscoveryConfig, DiscoveryController, DiscoveryError, HttpCourseApi, LoadOutcome,
    QueryParams, ViewStatus,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Serves `router` on an ephemeral port and returns its base URL.
async fn spawn_backend(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn api_for(base_url: String) -> HttpCourseApi {
    let config = DiscoveryConfig {
        base_url,
        ..Default::default()
    };
    HttpCourseApi::new(&config).unwrap()
}

fn catalog() -> Value {
    json!([
        {"CourseID": 1, "Title": "React Basics", "Price": 10, "AverageRating": 4.8, "InstructorName": "Alice"},
        {"CourseID": 2, "Title": "Python 101", "Price": "25.50", "AverageRating": null, "InstructorName": "Bob"},
        {"CourseID": 3, "Title": "Advanced REACT", "Price": 99.0, "AverageRating": "3.9", "InstructorName": "Alice"},
        {"CourseID": 4, "Title": "SQL Fundamentals", "Price": 0, "LessonCount": 8}
    ])
}

#[axum_macros::debug_handler]
async fn list_courses() -> Json<Value> {
    Json(catalog())
}

#[axum_macros::debug_handler]
async fn list_instructors() -> Json<Value> {
    Json(json!([
        {"UserID": 11, "FullName": "Alice"},
        {"UserID": 12, "FullName": "Bob"}
    ]))
}

async fn server_error() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable")
}

async fn malformed() -> impl IntoResponse {
    (StatusCode::OK, "{\"not\": \"a list\"}")
}

fn healthy_backend() -> Router {
    Router::new()
        .route("/api/courses", get(list_courses))
        .route("/api/courses/instructors", get(list_instructors))
}

#[tokio::test]
async fn test_fetch_courses_over_http() {
    let base = spawn_backend(healthy_backend()).await;
    let api = api_for(format!("{base}/api"));

    let courses = api.fetch_courses().await.unwrap();
    assert_eq!(courses.len(), 4);
    assert_eq!(courses[1].price, 25.5);
    assert_eq!(courses[2].average_rating, Some(3.9));
    assert_eq!(courses[3].lesson_count, 8);

    let instructors = api.fetch_instructors().await.unwrap();
    assert_eq!(instructors[1].full_name, "Bob");
}

#[tokio::test]
async fn test_server_error_is_retryable_failure() {
    let base = spawn_backend(Router::new().route("/courses", get(server_error))).await;
    let api = api_for(base);

    let err = api.fetch_courses().await.unwrap_err();
    match &err {
        DiscoveryError::UnexpectedResponse { status, message } => {
            assert_eq!(*status, 500);
            assert_eq!(message, "database unavailable");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let base = spawn_backend(Router::new().route("/courses", get(malformed))).await;
    let err = api_for(base).fetch_courses().await.unwrap_err();
    assert!(matches!(err, DiscoveryError::Decode { .. }));
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    // bind then drop so the port is (almost certainly) closed
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = api_for(format!("http://{addr}")).fetch_courses().await.unwrap_err();
    assert!(matches!(err, DiscoveryError::Network { .. }));
}

#[tokio::test]
async fn test_bookmarked_search_end_to_end() {
    let base = spawn_backend(healthy_backend()).await;
    let api = Arc::new(api_for(format!("{base}/api")));
    let query = QueryParams::parse("?title=react&instructor=Alice&page=1");

    let controller = DiscoveryController::with_query(api, 6, query);
    assert_eq!(controller.mount().await, LoadOutcome::Applied { count: 4 });

    let mut state = controller.lock().await;
    let titles: Vec<&str> = state.filtered().iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["React Basics", "Advanced REACT"]);
    assert_eq!(state.instructors().len(), 2);
    assert_eq!(state.view_status(), ViewStatus::Ready);

    state.set_min_rating(Some(4.0));
    assert_eq!(state.filtered().len(), 1);
    assert_eq!(
        state.query().to_query_string(),
        "title=react&page=1&minRating=4&instructor=Alice"
    );

    state.set_price_bounds(Some(50.0), None);
    assert_eq!(state.view_status(), ViewStatus::Empty);

    state.reset_filters();
    assert_eq!(state.filtered().len(), 4);
    assert!(state.query().is_empty());
}

#[tokio::test]
async fn test_failed_load_surfaces_error_state() {
    let base = spawn_backend(Router::new().route("/courses", get(server_error))).await;
    let controller = DiscoveryController::new(Arc::new(api_for(base)), Default::default());

    assert!(matches!(controller.load().await, LoadOutcome::Failed(_)));
    let state = controller.lock().await;
    assert!(state.courses().is_empty());
    assert_eq!(
        state.view_status(),
        ViewStatus::Failed {
            message: "Failed to load courses. Please try again later.".to_string(),
            retryable: true,
        }
    );
}
