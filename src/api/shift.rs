use crate::db::queries::shift::{
    create_shift, delete_shift, get_all_shifts, get_shift, update_shift,
};
use axum::{
    routing::{delete, get, post, put},
    Router,
};

use sqlx::PgPool;

pub fn shift_routes() -> Router<PgPool> {
    Router::new()
        .route("/shifts", post(create_shift))
        .route("/shifts", get(get_all_shifts))
        .route("/shifts/{id}", get(get_shift))
        .route("/shifts/{id}", put(update_shift))
        .route("/shifts/{id}", delete(delete_shift))
}
