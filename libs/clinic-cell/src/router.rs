// libs/clinic-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use shared_database::AppState;

use crate::handlers;

pub fn clinic_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::list_clinics))
        .route("/", post(handlers::create_clinic))
        .route("/{clinic_id}", put(handlers::update_clinic))
        .route("/{clinic_id}", delete(handlers::delete_clinic))
        .with_state(state)
}
