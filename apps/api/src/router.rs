use std::sync::Arc;

use axum::{routing::get, Router};

use auth_cell::router::auth_routes;
use clinic_cell::router::clinic_routes;
use doctor_cell::router::doctor_routes;
use patient_cell::router::patient_routes;
use payment_cell::router::payment_routes;
use scheduling_cell::router::scheduling_routes;
use shared_database::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic scheduling API is running!" }))
        .nest("/api/turnos", scheduling_routes(state.clone()))
        .nest("/api/pagos", payment_routes(state.clone()))
        .nest("/api/patients", patient_routes(state.clone()))
        .nest("/api/doctors", doctor_routes(state.clone()))
        .nest("/api/clinics", clinic_routes(state.clone()))
        .nest("/api", auth_routes(state))
}
