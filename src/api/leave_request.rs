use crate::db::queries::leave_request::{
    create_leave_request, delete_leave_request, get_all_leave_requests, get_leave_request,
    update_leave_request,
};
use axum::{
    routing::{delete, get, post, put},
    Router,
};

use sqlx::PgPool;

pub fn leave_request_routes() -> Router<PgPool> {
    Router::new()
        .route("/leave-requests", post(create_leave_request))
        .route("/leave-requests", get(get_all_leave_requests))
        .route("/leave-requests/{id}", get(get_leave_request))
        .route("/leave-requests/{id}", put(update_leave_request))
        .route("/leave-requests/{id}", delete(delete_leave_request))
}
