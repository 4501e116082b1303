use crate::db::queries::work_order::{
    create_work_order, delete_work_order, get_all_work_orders, get_work_order, update_work_order,
};
use axum::{
    routing::{delete, get, post, put},
    Router,
};

use sqlx::PgPool;

pub fn work_order_routes() -> Router<PgPool> {
    Router::new()
        .route("/work-orders", post(create_work_order))
        .route("/work-orders", get(get_all_work_orders))
        .route("/work-orders/{id}", get(get_work_order))
        .route("/work-orders/{id}", put(update_work_order))
        .route("/work-orders/{id}", delete(delete_work_order))
}
