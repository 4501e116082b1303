use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use sqlx::{PgPool, QueryBuilder};

use crate::db::models::leave_request::{
    LeaveRequest, LeaveStatus, NewLeaveRequest, UpdateLeaveRequest,
};
use crate::db::queries::push_if_some;
use crate::utils::api_response::ApiResponse;
use crate::utils::error::PlannerError;

const LEAVE_COLUMNS: &str =
    "id, user_id, request_type, start_date, end_date, note, status, created_at";

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequestFilter {
    pub user_id: Option<i32>,
    pub status: Option<LeaveStatus>,
}

/// Files a new leave request (pending unless stated otherwise)
#[utoipa::path(
    post,
    path = "/leave-requests",
    request_body = NewLeaveRequest,
    responses(
        (status = 201, description = "Leave request created successfully", body = LeaveRequest),
        (status = 400, description = "End date before start date"),
        (status = 500, description = "Failed to create leave request")
    ),
    tag = "Leave Requests"
)]
pub async fn create_leave_request(
    State(pool): State<PgPool>,
    Json(new_request): Json<NewLeaveRequest>,
) -> Result<ApiResponse<LeaveRequest>, PlannerError> {
    if new_request.end_date < new_request.start_date {
        return Err(PlannerError::Validation(
            "endDate must not be before startDate".to_string(),
        ));
    }

    let status = new_request.status.unwrap_or_default();

    let request = sqlx::query_as::<_, LeaveRequest>(&format!(
        r#"
        INSERT INTO leave_requests (user_id, request_type, start_date, end_date, note, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {LEAVE_COLUMNS}
        "#
    ))
    .bind(new_request.user_id)
    .bind(new_request.request_type)
    .bind(new_request.start_date)
    .bind(new_request.end_date)
    .bind(&new_request.note)
    .bind(status)
    .fetch_one(&pool)
    .await?;

    Ok(ApiResponse::success(
        StatusCode::CREATED,
        "Leave request created successfully",
        request,
    ))
}

/// Retrieves leave requests, optionally filtered by user and status
#[utoipa::path(
    get,
    path = "/leave-requests",
    params(LeaveRequestFilter),
    responses(
        (status = 200, description = "Leave requests retrieved successfully", body = Vec<LeaveRequest>),
        (status = 500, description = "Failed to retrieve leave requests")
    ),
    tag = "Leave Requests"
)]
pub async fn get_all_leave_requests(
    State(pool): State<PgPool>,
    Query(filter): Query<LeaveRequestFilter>,
) -> Result<ApiResponse<Vec<LeaveRequest>>, PlannerError> {
    let mut query_builder = QueryBuilder::new(format!(
        "SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE 1 = 1"
    ));

    if let Some(user_id) = filter.user_id {
        query_builder.push(" AND user_id = ").push_bind(user_id);
    }
    if let Some(status) = filter.status {
        query_builder.push(" AND status = ").push_bind(status);
    }
    query_builder.push(" ORDER BY start_date ASC");

    let requests = query_builder
        .build_query_as::<LeaveRequest>()
        .fetch_all(&pool)
        .await?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Leave requests retrieved successfully",
        requests,
    ))
}

/// Retrieves a specific leave request by ID
#[utoipa::path(
    get,
    path = "/leave-requests/{id}",
    params(("id" = i32, Path, description = "ID of the leave request")),
    responses(
        (status = 200, description = "Leave request retrieved successfully", body = LeaveRequest),
        (status = 404, description = "Leave request not found"),
        (status = 500, description = "Failed to fetch leave request")
    ),
    tag = "Leave Requests"
)]
pub async fn get_leave_request(
    State(pool): State<PgPool>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<LeaveRequest>, PlannerError> {
    let request = sqlx::query_as::<_, LeaveRequest>(&format!(
        "SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| PlannerError::not_found("Leave request", id))?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Leave request retrieved successfully",
        request,
    ))
}

/// Updates a leave request; approving or rejecting is a status update
#[utoipa::path(
    put,
    path = "/leave-requests/{id}",
    params(("id" = i32, Path, description = "ID of the leave request to update")),
    request_body = UpdateLeaveRequest,
    responses(
        (status = 200, description = "Leave request updated successfully", body = LeaveRequest),
        (status = 400, description = "No fields provided for update, or invalid date order"),
        (status = 404, description = "Leave request not found"),
        (status = 500, description = "Failed to update leave request")
    ),
    tag = "Leave Requests"
)]
pub async fn update_leave_request(
    State(pool): State<PgPool>,
    Path(id): Path<i32>,
    Json(update): Json<UpdateLeaveRequest>,
) -> Result<ApiResponse<LeaveRequest>, PlannerError> {
    if update.is_empty() {
        return Err(PlannerError::Validation(
            "No fields provided for update".to_string(),
        ));
    }

    let existing = sqlx::query_as::<_, LeaveRequest>(&format!(
        "SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| PlannerError::not_found("Leave request", id))?;

    // Check the merged interval before touching the row
    let start_date = update.start_date.unwrap_or(existing.start_date);
    let end_date = update.end_date.unwrap_or(existing.end_date);
    if end_date < start_date {
        return Err(PlannerError::Validation(
            "endDate must not be before startDate".to_string(),
        ));
    }

    let mut query_builder = QueryBuilder::new("UPDATE leave_requests SET ");
    let mut separated = query_builder.separated(", ");

    push_if_some!(separated, update, request_type);
    push_if_some!(separated, update, start_date);
    push_if_some!(separated, update, end_date);
    push_if_some!(separated, update, note);
    push_if_some!(separated, update, status);
    separated.push("updated_at = NOW()");

    query_builder.push(" WHERE id = ").push_bind(id);
    query_builder.build().execute(&pool).await?;

    let request = sqlx::query_as::<_, LeaveRequest>(&format!(
        "SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = $1"
    ))
    .bind(id)
    .fetch_one(&pool)
    .await?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Leave request updated successfully",
        request,
    ))
}

/// Deletes a leave request
#[utoipa::path(
    delete,
    path = "/leave-requests/{id}",
    params(("id" = i32, Path, description = "ID of the leave request to delete")),
    responses(
        (status = 200, description = "Leave request deleted successfully"),
        (status = 404, description = "Leave request not found"),
        (status = 500, description = "Failed to delete leave request")
    ),
    tag = "Leave Requests"
)]
pub async fn delete_leave_request(
    State(pool): State<PgPool>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<()>, PlannerError> {
    let result = sqlx::query("DELETE FROM leave_requests WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(PlannerError::not_found("Leave request", id));
    }

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Leave request deleted successfully",
        (),
    ))
}

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        create_leave_request,
        get_all_leave_requests,
        get_leave_request,
        update_leave_request,
        delete_leave_request
    ),
    components(schemas(LeaveRequest, NewLeaveRequest, UpdateLeaveRequest)),
    tags(
        (name = "Leave Requests", description = "Leave request API endpoints")
    )
)]
pub struct LeaveRequestDoc;
