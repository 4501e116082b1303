use crate::db::queries::employee::{
    create_employee, delete_employee, get_all_employees, get_employee, update_employee,
};
use axum::{
    routing::{delete, get, post, put},
    Router,
};

use sqlx::PgPool;

pub fn employee_routes() -> Router<PgPool> {
    Router::new()
        .route("/employees", post(create_employee))
        .route("/employees", get(get_all_employees))
        .route("/employees/{id}", get(get_employee))
        .route("/employees/{id}", put(update_employee))
        .route("/employees/{id}", delete(delete_employee))
}
