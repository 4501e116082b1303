use axum::Router;
use dotenvy::dotenv;
use sqlx::PgPool;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use utoipa_swagger_ui::SwaggerUi;

mod api;
mod config;
mod db;
mod utils;

use crate::config::Config;
use crate::db::pool::get_db_pool;
use crate::db::queries::assignment::AssignmentDoc;
use crate::db::queries::employee::EmployeeDoc;
use crate::db::queries::leave_request::LeaveRequestDoc;
use crate::db::queries::planner::PlannerDoc;
use crate::db::queries::shift::ShiftDoc;
use crate::db::queries::task::TaskDoc;
use crate::db::queries::work_order::WorkOrderDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    Config::init();

    std::fs::create_dir_all("logs")?;

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true) // Include target (module path) in logs
        .with_writer(std::io::stdout.and(non_blocking))
        .init();

    let pool = get_db_pool().await?;
    sqlx::migrate!().run(&pool).await?;

    let merged_doc = WorkOrderDoc::openapi()
        .merge_from(TaskDoc::openapi())
        .merge_from(EmployeeDoc::openapi())
        .merge_from(LeaveRequestDoc::openapi())
        .merge_from(AssignmentDoc::openapi())
        .merge_from(ShiftDoc::openapi())
        .merge_from(PlannerDoc::openapi());

    let app = Router::new()
        .merge(api::health::health_routes())
        .merge(api::work_order::work_order_routes())
        .merge(api::task::task_routes())
        .merge(api::employee::employee_routes())
        .merge(api::leave_request::leave_request_routes())
        .merge(api::assignment::assignment_routes())
        .merge(api::shift::shift_routes())
        .merge(api::planner::planner_routes())
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", merged_doc.clone()))
        .merge(RapiDoc::with_openapi("/api-docs/rapidoc.json", merged_doc).path("/rapidoc"))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .with_state(pool.clone());

    run_server(app, pool).await?;
    println!("Shutdown complete.");
    Ok(())
}

async fn run_server(app: Router, pool: PgPool) -> anyhow::Result<()> {
    let addr = Config::get().bind_addr();
    tracing::info!("Server running at http://{addr}");

    let listener = TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(pool))
        .await?;

    Ok(())
}

async fn shutdown_signal(pool: PgPool) {
    signal::ctrl_c()
        .await
        .expect("Failed to listen for Ctrl+C");
    println!("Received Ctrl+C, shutting down...");
    println!("🛠️ Closing database pool...");
    pool.close().await;
    println!("✅ Database pool closed. Server shutting down.");
}
