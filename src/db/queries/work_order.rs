use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::{PgPool, QueryBuilder};

use crate::db::models::work_order::{NewWorkOrder, UpdateWorkOrder, WorkOrder};
use crate::db::queries::push_if_some;
use crate::utils::api_response::ApiResponse;
use crate::utils::error::{conflict_on_unique, PlannerError};

const WORK_ORDER_COLUMNS: &str =
    "id, code, description, client, status, start_date, end_date, budget, created_at";

/// Creates a new work order
#[utoipa::path(
    post,
    path = "/work-orders",
    request_body = NewWorkOrder,
    responses(
        (status = 201, description = "Work order created successfully", body = WorkOrder),
        (status = 400, description = "Duplicate work order code"),
        (status = 500, description = "Failed to create work order")
    ),
    tag = "Work Orders"
)]
pub async fn create_work_order(
    State(pool): State<PgPool>,
    Json(new_order): Json<NewWorkOrder>,
) -> Result<ApiResponse<WorkOrder>, PlannerError> {
    let status = new_order.status.unwrap_or_default();

    let work_order = sqlx::query_as::<_, WorkOrder>(&format!(
        r#"
        INSERT INTO work_orders (code, description, client, status, start_date, end_date, budget)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {WORK_ORDER_COLUMNS}
        "#
    ))
    .bind(&new_order.code)
    .bind(&new_order.description)
    .bind(&new_order.client)
    .bind(status)
    .bind(new_order.start_date)
    .bind(new_order.end_date)
    .bind(new_order.budget)
    .fetch_one(&pool)
    .await
    .map_err(|e| conflict_on_unique(e, "A work order with this code already exists"))?;

    Ok(ApiResponse::success(
        StatusCode::CREATED,
        "Work order created successfully",
        work_order,
    ))
}

/// Retrieves all work orders
#[utoipa::path(
    get,
    path = "/work-orders",
    responses(
        (status = 200, description = "Work orders retrieved successfully", body = Vec<WorkOrder>),
        (status = 500, description = "Failed to retrieve work orders")
    ),
    tag = "Work Orders"
)]
pub async fn get_all_work_orders(
    State(pool): State<PgPool>,
) -> Result<ApiResponse<Vec<WorkOrder>>, PlannerError> {
    let work_orders = sqlx::query_as::<_, WorkOrder>(&format!(
        "SELECT {WORK_ORDER_COLUMNS} FROM work_orders ORDER BY code"
    ))
    .fetch_all(&pool)
    .await?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Work orders retrieved successfully",
        work_orders,
    ))
}

/// Retrieves a specific work order by ID
#[utoipa::path(
    get,
    path = "/work-orders/{id}",
    params(("id" = i32, Path, description = "ID of the work order")),
    responses(
        (status = 200, description = "Work order retrieved successfully", body = WorkOrder),
        (status = 404, description = "Work order not found"),
        (status = 500, description = "Failed to fetch work order")
    ),
    tag = "Work Orders"
)]
pub async fn get_work_order(
    State(pool): State<PgPool>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<WorkOrder>, PlannerError> {
    let work_order = sqlx::query_as::<_, WorkOrder>(&format!(
        "SELECT {WORK_ORDER_COLUMNS} FROM work_orders WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| PlannerError::not_found("Work order", id))?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Work order retrieved successfully",
        work_order,
    ))
}

/// Updates an existing work order
#[utoipa::path(
    put,
    path = "/work-orders/{id}",
    params(("id" = i32, Path, description = "ID of the work order to update")),
    request_body = UpdateWorkOrder,
    responses(
        (status = 200, description = "Work order updated successfully", body = WorkOrder),
        (status = 400, description = "No fields provided for update"),
        (status = 404, description = "Work order not found"),
        (status = 500, description = "Failed to update work order")
    ),
    tag = "Work Orders"
)]
pub async fn update_work_order(
    State(pool): State<PgPool>,
    Path(id): Path<i32>,
    Json(update): Json<UpdateWorkOrder>,
) -> Result<ApiResponse<WorkOrder>, PlannerError> {
    if update.is_empty() {
        return Err(PlannerError::Validation(
            "No fields provided for update".to_string(),
        ));
    }

    let mut query_builder = QueryBuilder::new("UPDATE work_orders SET ");
    let mut separated = query_builder.separated(", ");

    push_if_some!(separated, update, code);
    push_if_some!(separated, update, description);
    push_if_some!(separated, update, client);
    push_if_some!(separated, update, status);
    push_if_some!(separated, update, start_date);
    push_if_some!(separated, update, end_date);
    push_if_some!(separated, update, budget);
    separated.push("updated_at = NOW()");

    query_builder.push(" WHERE id = ").push_bind(id);

    let result = query_builder
        .build()
        .execute(&pool)
        .await
        .map_err(|e| conflict_on_unique(e, "A work order with this code already exists"))?;

    if result.rows_affected() == 0 {
        return Err(PlannerError::not_found("Work order", id));
    }

    let work_order = sqlx::query_as::<_, WorkOrder>(&format!(
        "SELECT {WORK_ORDER_COLUMNS} FROM work_orders WHERE id = $1"
    ))
    .bind(id)
    .fetch_one(&pool)
    .await?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Work order updated successfully",
        work_order,
    ))
}

/// Deletes a work order; its tasks (and their shifts) cascade with it
#[utoipa::path(
    delete,
    path = "/work-orders/{id}",
    params(("id" = i32, Path, description = "ID of the work order to delete")),
    responses(
        (status = 200, description = "Work order deleted successfully"),
        (status = 404, description = "Work order not found"),
        (status = 500, description = "Failed to delete work order")
    ),
    tag = "Work Orders"
)]
pub async fn delete_work_order(
    State(pool): State<PgPool>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<()>, PlannerError> {
    let result = sqlx::query("DELETE FROM work_orders WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(PlannerError::not_found("Work order", id));
    }

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Work order deleted successfully",
        (),
    ))
}

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        create_work_order,
        get_all_work_orders,
        get_work_order,
        update_work_order,
        delete_work_order
    ),
    components(schemas(WorkOrder, NewWorkOrder, UpdateWorkOrder)),
    tags(
        (name = "Work Orders", description = "Work order API endpoints")
    )
)]
pub struct WorkOrderDoc;
