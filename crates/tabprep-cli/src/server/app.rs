//! Axum application setup.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use super::handlers;
use super::state::AppState;

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration for local development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let upload_limit = DefaultBodyLimit::max(state.config.server.max_upload_bytes);

    let api_routes = Router::new()
        // Sessions
        .route(
            "/sessions",
            post(handlers::create_session).layer(upload_limit),
        )
        .route(
            "/sessions/:id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/sessions/:id/reset", post(handlers::reset_session))
        // Transformations
        .route("/sessions/:id/operations", post(handlers::apply_operation))
        .route("/sessions/:id/split", post(handlers::split_session))
        // Views
        .route("/sessions/:id/columns", get(handlers::get_columns))
        .route("/sessions/:id/preview", get(handlers::get_preview))
        .route(
            "/sessions/:id/value-counts/:column",
            get(handlers::get_value_counts),
        )
        .route("/sessions/:id/crosstab", get(handlers::get_crosstab))
        // Downloads
        .route("/sessions/:id/export/:kind", get(handlers::export_csv));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state)
}

/// Start the web server; returns after Ctrl+C.
pub async fn run_server(state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %listener.local_addr()?, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // no signal handler; run until killed
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use serde_json::{Value, json};
    use tabprep::TabprepConfig;
    use tower::ServiceExt;

    use super::*;

    const CSV: &str = "name,age,city,survived\n\
                       ann,30,NYC,1\n\
                       bob,,LA,0\n\
                       cy,25,NYC,1\n\
                       dee,40,,0\n\
                       eve,35,LA,1\n";

    fn app() -> (AppState, Router) {
        let state = AppState::new(TabprepConfig::default());
        (state.clone(), create_router(state))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = send(app, request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn upload(app: &Router) -> String {
        let request = Request::post("/api/sessions?filename=people.csv")
            .body(Body::from(CSV))
            .unwrap();
        let (status, body) = send_json(app, request).await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_create_and_get_session() {
        let (state, app) = app();
        let id = upload(&app).await;
        assert_eq!(state.sessions.read().await.len(), 1);

        let (status, body) = send_json(&app, get(&format!("/api/sessions/{}", id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["upload_message"], "Uploaded: people.csv (5 rows, 4 columns)");
        assert_eq!(body["view"]["row_count"], 5);
        assert_eq!(body["view"]["total_missing"], 2);
        assert_eq!(body["status_message"], Value::Null);
    }

    #[tokio::test]
    async fn test_upload_rejects_non_csv_name() {
        let (_, app) = app();
        let request = Request::post("/api/sessions?filename=people.xlsx")
            .body(Body::from(CSV))
            .unwrap();
        let (status, body) = send_json(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Please upload a CSV file.");
    }

    #[tokio::test]
    async fn test_upload_requires_filename() {
        let (_, app) = app();
        let request = Request::post("/api/sessions").body(Body::from(CSV)).unwrap();
        let (status, body) = send_json(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_json_error() {
        let mut config = TabprepConfig::default();
        config.server.max_upload_bytes = 16;
        let app = create_router(AppState::new(config));

        let request = Request::post("/api/sessions?filename=people.csv")
            .body(Body::from(CSV))
            .unwrap();
        let (status, body) = send_json(&app, request).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"], "payload_too_large");
        assert_eq!(body["message"], "Upload exceeds the 16 byte limit.");
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let (_, app) = app();
        let (status, body) = send_json(&app, get("/api/sessions/ses_missing")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_apply_operation_and_reset() {
        let (_, app) = app();
        let id = upload(&app).await;

        let (status, body) = send_json(
            &app,
            post_json(
                &format!("/api/sessions/{}/operations", id),
                json!({"op": "drop_nulls", "column": "age"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["report"]["outcome"], "applied");
        assert_eq!(body["view"]["row_count"], 4);
        assert_eq!(body["status_message"], "Data has been modified (unsaved changes)");

        let request = Request::post(format!("/api/sessions/{}/reset", id))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send_json(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["report"]["message"], "✓ Reset to original data");
        assert_eq!(body["view"]["row_count"], 5);
        assert_eq!(body["view"]["version"], 2);
    }

    #[tokio::test]
    async fn test_rejected_operation_maps_status() {
        let (_, app) = app();
        let id = upload(&app).await;
        let uri = format!("/api/sessions/{}/operations", id);

        let (status, body) = send_json(
            &app,
            post_json(&uri, json!({"op": "convert_type", "column": "city", "target": "float"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "type_mismatch");
        assert_eq!(body["column"], "city");

        let (status, body) = send_json(
            &app,
            post_json(&uri, json!({"op": "drop_nulls", "column": "height"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "column_not_found");
    }

    #[tokio::test]
    async fn test_split_then_export_train() {
        let (_, app) = app();
        let id = upload(&app).await;

        let (status, _) = send(&app, get(&format!("/api/sessions/{}/export/train", id))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send_json(
            &app,
            post_json(
                &format!("/api/sessions/{}/split", id),
                json!({"target": "survived", "test_size": 0.4}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["train_shape"], json!([3, 4]));
        assert_eq!(body["test_shape"], json!([2, 4]));
        assert_eq!(body["seed"], 42);
        assert_eq!(body["outcome"], "applied");

        let response = app
            .clone()
            .oneshot(get(&format!("/api/sessions/{}/export/train", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"train_data.csv\""
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.starts_with("name,age,city,survived\n"));
        assert_eq!(text.lines().count(), 4);
    }

    #[tokio::test]
    async fn test_split_without_target_is_unchanged() {
        let (_, app) = app();
        let id = upload(&app).await;

        let (status, body) = send_json(
            &app,
            post_json(&format!("/api/sessions/{}/split", id), json!({"target": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "unchanged");
        assert_eq!(body["message"], "");
        assert!(body.get("train_shape").is_none());

        let (status, _) = send(&app, get(&format!("/api/sessions/{}/export/test", id))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_discretize_rejects_huge_bin_count() {
        let (_, app) = app();
        let id = upload(&app).await;

        let (status, body) = send_json(
            &app,
            post_json(
                &format!("/api/sessions/{}/operations", id),
                json!({"op": "discretize", "column": "age", "bins": u64::MAX}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "invalid_parameter");
    }

    #[tokio::test]
    async fn test_export_latest_uses_last_operation() {
        let (_, app) = app();
        let id = upload(&app).await;
        send(
            &app,
            post_json(&format!("/api/sessions/{}/operations", id), json!({"op": "normalize"})),
        )
        .await;

        let response = app
            .clone()
            .oneshot(get(&format!("/api/sessions/{}/export/latest", id)))
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"normalized_data.csv\""
        );
    }

    #[tokio::test]
    async fn test_column_views() {
        let (_, app) = app();
        let id = upload(&app).await;

        let (status, body) =
            send_json(&app, get(&format!("/api/sessions/{}/columns?kind=numerical", id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["columns"], json!(["age", "survived"]));

        let (status, _) =
            send_json(&app, get(&format!("/api/sessions/{}/columns?kind=dates", id))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) =
            send_json(&app, get(&format!("/api/sessions/{}/value-counts/city", id))).await;
        assert_eq!(body["counts"], json!({"LA": 2, "NYC": 2}));

        let (_, body) =
            send_json(&app, get(&format!("/api/sessions/{}/crosstab?x=city&y=survived", id)))
                .await;
        assert_eq!(body.as_array().unwrap().len(), 3);

        let (_, body) =
            send_json(&app, get(&format!("/api/sessions/{}/preview?limit=2", id))).await;
        assert_eq!(body["rows"].as_array().unwrap().len(), 2);
        assert_eq!(body["total_rows"], 5);
    }

    #[tokio::test]
    async fn test_delete_session() {
        let (state, app) = app();
        let id = upload(&app).await;

        let request = Request::builder()
            .method(Method::DELETE)
            .uri(format!("/api/sessions/{}", id))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(state.sessions.read().await.is_empty());

        let (status, _) = send(&app, get(&format!("/api/sessions/{}", id))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
