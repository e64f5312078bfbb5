//! HTTP router.
//!
//! Returns a composable `Router` mounting `/auth/*` and `/api/*`.
//!
//! Layers (outermost → innermost):
//! CORS → no-store cache header → request log → handler

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, patch, post, put};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the full application router.
///
/// `cors_origin` restricts browser access to one origin; `None` allows any.
pub fn api_router(core: Arc<CoreState>, cors_origin: Option<&str>) -> Router {
    build_router(ApiContext::new(core), cors_layer(cors_origin))
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let allow_origin = match origin.map(HeaderValue::from_str) {
        Some(Ok(value)) => AllowOrigin::exact(value),
        Some(Err(_)) => {
            tracing::warn!(?origin, "Ignoring unparsable CORS origin, allowing any");
            AllowOrigin::any()
        }
        None => AllowOrigin::any(),
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

fn build_router(ctx: ApiContext, cors: CorsLayer) -> Router {
    use endpoints::{appointments, auth, departments, doctors, health, prescriptions, users};

    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    // Static segments such as `/pending` win over `/:email`.
    let auth_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login));

    let user_routes = Router::new()
        .route("/", get(users::list).post(users::create))
        .route("/pending", get(users::pending))
        .route("/role/:role", get(users::by_role))
        .route(
            "/:email",
            get(users::get).put(users::update).delete(users::delete),
        )
        .route("/:email/verify", put(users::verify));

    let doctor_routes = Router::new()
        .route("/", get(doctors::list).post(doctors::create))
        .route("/available", get(doctors::available))
        .route("/department/:department", get(doctors::by_department))
        .route("/specialization/:specialization", get(doctors::by_specialization))
        .route("/email/:email", get(doctors::by_email))
        .route(
            "/:id",
            get(doctors::get).put(doctors::update).delete(doctors::delete),
        );

    let department_routes = Router::new()
        .route("/", get(departments::list).post(departments::create))
        .route("/active", get(departments::active))
        .route("/name/:name", get(departments::by_name))
        .route(
            "/:id",
            get(departments::get)
                .put(departments::update)
                .delete(departments::delete),
        );

    let appointment_routes = Router::new()
        .route("/", get(appointments::list).post(appointments::create))
        .route("/patient/:patient_id", get(appointments::by_patient))
        .route("/doctor/:doctor_id", get(appointments::by_doctor))
        .route("/status/:status", get(appointments::by_status))
        .route(
            "/:id",
            get(appointments::get)
                .put(appointments::update)
                .delete(appointments::delete),
        )
        .route("/:id/status", patch(appointments::update_status));

    let prescription_routes = Router::new()
        .route("/", get(prescriptions::list).post(prescriptions::create))
        .route("/patient/:patient_id", get(prescriptions::by_patient))
        .route("/doctor/:doctor_id", get(prescriptions::by_doctor))
        .route("/patient-name/:name", get(prescriptions::by_patient_name))
        .route(
            "/:id",
            get(prescriptions::get)
                .put(prescriptions::update)
                .delete(prescriptions::delete),
        )
        .route("/:id/dispense", patch(prescriptions::dispense));

    let api = Router::new()
        .route("/health", get(health::check))
        .nest("/users", user_routes)
        .nest("/doctors", doctor_routes)
        .nest("/departments", department_routes)
        .nest("/appointments", appointment_routes)
        .nest("/prescriptions", prescription_routes);

    Router::new()
        .nest("/auth", auth_routes)
        .nest("/api", api)
        .with_state(ctx)
        // Innermost first, outermost last
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(cors)
}
