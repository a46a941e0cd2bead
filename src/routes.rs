// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, patch, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{dashboard, grade, module, subject, submission},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * `/api/modules` is public: students browse published modules and take them.
/// * `/api/dashboard` requires an instructor token.
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let public_routes = Router::new()
        .route("/{module_slug}/published", get(module::get_published_module))
        .route(
            "/{module_slug}/questions/{question_slug}",
            get(module::get_published_question),
        )
        .route(
            "/{module_slug}/submissions",
            post(submission::start_submission),
        )
        .route(
            "/{module_slug}/submissions/{code}/answers",
            post(submission::submit_answer),
        )
        .route(
            "/{module_slug}/submissions/{code}/finalize",
            patch(submission::finalize_submission),
        )
        .route(
            "/{module_slug}/submissions/{code}/cancel",
            patch(submission::cancel_submission),
        );

    let dashboard_routes = Router::new()
        .route("/statistics", get(dashboard::get_statistics))
        .route(
            "/modules",
            get(module::list_modules).post(module::create_module),
        )
        .route(
            "/modules/{module_slug}",
            get(module::get_module).delete(module::delete_module),
        )
        .route("/modules/{module_slug}/publish", patch(module::toggle_publish))
        .route("/modules/{module_slug}/questions", post(module::add_questions))
        .route(
            "/modules/{module_slug}/questions/{question_slug}",
            delete(module::remove_question),
        )
        .route(
            "/subjects",
            get(subject::list_subjects).post(subject::create_subject),
        )
        .route(
            "/subjects/{id}",
            get(subject::get_subject)
                .put(subject::update_subject)
                .delete(subject::delete_subject),
        )
        .route("/grades", get(grade::list_grades).post(grade::create_grade))
        .route(
            "/grades/{id}",
            get(grade::get_grade)
                .put(grade::update_grade)
                .delete(grade::delete_grade),
        )
        .route("/submissions", get(submission::list_submissions))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/modules", public_routes)
        .nest("/api/dashboard", dashboard_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
