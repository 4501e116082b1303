use crate::db::queries::planner::{availability_summary, check_availability, day_board};
use axum::{routing::get, Router};

use sqlx::PgPool;

pub fn planner_routes() -> Router<PgPool> {
    Router::new()
        .route("/planner/availability", get(check_availability))
        .route("/planner/availability/summary", get(availability_summary))
        .route("/planner/day/{date}", get(day_board))
}
