// libs/payment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use shared_database::AppState;

use crate::handlers;

pub fn payment_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::list_payments))
        .route("/", post(handlers::record_payment))
        .route("/{payment_id}", get(handlers::get_payment))
        .route("/{payment_id}", put(handlers::update_payment))
        .route("/{payment_id}", delete(handlers::delete_payment))
        .with_state(state)
}
