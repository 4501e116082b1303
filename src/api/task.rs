use crate::db::queries::planner::task_staffing;
use crate::db::queries::task::{create_task, delete_task, get_all_tasks, get_task, update_task};
use axum::{
    routing::{delete, get, post, put},
    Router,
};

use sqlx::PgPool;

pub fn task_routes() -> Router<PgPool> {
    Router::new()
        .route("/tasks", post(create_task))
        .route("/tasks", get(get_all_tasks))
        .route("/tasks/{id}", get(get_task))
        .route("/tasks/{id}", put(update_task))
        .route("/tasks/{id}", delete(delete_task))
        .route("/tasks/{id}/staffing", get(task_staffing))
}
