use anyhow::Context;
use axum::handler::Handler;
use axum::http::HeaderValue;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{self, AppConfig, Environment};
use crate::database;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Bootstrap and serve. Store-initialization failure is the one startup error
/// that aborts the process; everything later is translated per-request.
pub async fn run() -> anyhow::Result<()> {
    let config = config::config();
    tracing::info!("Starting driving school API in {:?} mode", config.environment);

    let pool = database::connect_pool(&config.database)
        .map_err(|e| anyhow::anyhow!("store initialization failed: {}", e))?;

    let app = app(AppState::new(pool));

    // Allow tests or deployments to override port via env
    let port = std::env::var("API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("driving school API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}

pub fn app(state: AppState) -> Router {
    let auth_layer = from_fn_with_state(state.clone(), jwt_auth_middleware);

    // Everything behind the access gate
    let protected_routes = Router::new()
        .route("/api/users", get(protected::users::users_get))
        .route("/api/users/:id", get(protected::users::user_get))
        .route("/api/instructors", get(protected::instructors::instructors_get))
        .route("/api/students", get(protected::students::students_get))
        .route("/api/students/:id", get(protected::students::student_get))
        .route("/api/vehicles", get(protected::vehicles::vehicles_get))
        .route("/api/enrollments", post(protected::enrollments::enrollment_post))
        .route("/api/lessons", post(protected::lessons::lesson_post))
        .route("/api/payments", post(protected::payments::payment_post))
        .route("/api/exams", post(protected::exams::exam_post))
        .route("/api/schedule", get(protected::schedule::schedule_get))
        .route("/api/dashboard/stats", get(protected::dashboard::stats_get))
        .route("/api/reports/students", get(protected::reports::students_report_get))
        .route("/api/reports/instructors", get(protected::reports::instructors_report_get))
        .route("/api/reports/financial", get(protected::reports::financial_report_get))
        .route_layer(auth_layer.clone());

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api", get(root))
        // Public auth routes
        .route("/api/auth/login", post(public::auth::login_post))
        .route("/api/auth/register", post(public::auth::register_post))
        // Course catalog is browsable without a token; creation is not. The
        // gate goes on the POST handler itself since a layered route cannot
        // merge with the catalog GET on the same path.
        .route(
            "/api/courses",
            get(public::courses::courses_get)
                .post(protected::courses::course_post.layer(auth_layer)),
        )
        .merge(protected_routes)
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(config::config())),
        )
        .with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if !config.security.enable_cors {
        return CorsLayer::new();
    }

    match config.environment {
        Environment::Development => CorsLayer::permissive(),
        _ => {
            let origins: Vec<HeaderValue> = config
                .security
                .cors_origins
                .iter()
                .filter_map(|o| o.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Driving School Management API",
            "version": version,
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/api/auth/login, /api/auth/register (public - token acquisition)",
                "courses": "/api/courses (catalog public, creation admin)",
                "users": "/api/users[/:id] (protected)",
                "students": "/api/students[/:id] (protected)",
                "instructors": "/api/instructors (protected)",
                "vehicles": "/api/vehicles (protected)",
                "enrollments": "/api/enrollments (protected)",
                "lessons": "/api/lessons (protected)",
                "payments": "/api/payments (protected, admin)",
                "exams": "/api/exams (protected)",
                "schedule": "/api/schedule (protected)",
                "dashboard": "/api/dashboard/stats (protected)",
                "reports": "/api/reports/* (protected, admin)",
            }
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
