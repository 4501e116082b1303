use crate::db::queries::assignment::{
    create_assignment, delete_assignment, get_all_assignments, get_assignment, update_assignment,
};
use axum::{
    routing::{delete, get, post, put},
    Router,
};

use sqlx::PgPool;

pub fn assignment_routes() -> Router<PgPool> {
    Router::new()
        .route("/assignments", post(create_assignment))
        .route("/assignments", get(get_all_assignments))
        .route("/assignments/{id}", get(get_assignment))
        .route("/assignments/{id}", put(update_assignment))
        .route("/assignments/{id}", delete(delete_assignment))
}
