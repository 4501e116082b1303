use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::{PgPool, QueryBuilder};

use crate::db::models::assignment::{
    Assignment, AssignmentDetail, AssignmentDetailRow, AssignmentFilter, NewAssignment,
    UpdateAssignment,
};
use crate::db::queries::employee::fetch_employee;
use crate::db::queries::push_if_some;
use crate::db::queries::task::fetch_task;
use crate::utils::api_response::ApiResponse;
use crate::utils::error::{conflict_on_unique, PlannerError};

const ASSIGNMENT_COLUMNS: &str = "id, task_id, employee_id, role, note, created_at";

const ASSIGNMENT_DETAIL_SELECT: &str = r#"
SELECT a.id, a.role, a.note,
       t.id AS task_id, t.name AS task_name, t.status AS task_status,
       t.required_resources, t.start_date AS task_start_date, t.end_date AS task_end_date,
       w.id AS work_order_id, w.code AS work_order_code,
       w.description AS work_order_description, w.client AS work_order_client,
       w.status AS work_order_status,
       e.id AS employee_id, e.first_name, e.last_name, e.email
FROM assignments a
JOIN tasks t ON t.id = a.task_id
JOIN work_orders w ON w.id = t.work_order_id
JOIN employees e ON e.id = a.employee_id
WHERE 1 = 1
"#;

/// Assigns an employee to a task.
///
/// Both references are validated before the write; the duplicate check is
/// backed by the store's unique constraint, so two racing creates for the
/// same pair cannot both succeed.
#[utoipa::path(
    post,
    path = "/assignments",
    request_body = NewAssignment,
    responses(
        (status = 201, description = "Assignment created successfully", body = Assignment),
        (status = 400, description = "Assignment already exists"),
        (status = 404, description = "Task or employee not found"),
        (status = 500, description = "Failed to create assignment")
    ),
    tag = "Assignments"
)]
pub async fn create_assignment(
    State(pool): State<PgPool>,
    Json(new_assignment): Json<NewAssignment>,
) -> Result<ApiResponse<Assignment>, PlannerError> {
    if fetch_task(&pool, new_assignment.task_id).await?.is_none() {
        return Err(PlannerError::not_found("Task", new_assignment.task_id));
    }
    if fetch_employee(&pool, new_assignment.employee_id)
        .await?
        .is_none()
    {
        return Err(PlannerError::not_found(
            "Employee",
            new_assignment.employee_id,
        ));
    }

    let existing = sqlx::query_scalar::<_, i32>(
        "SELECT id FROM assignments WHERE task_id = $1 AND employee_id = $2",
    )
    .bind(new_assignment.task_id)
    .bind(new_assignment.employee_id)
    .fetch_optional(&pool)
    .await?;

    if existing.is_some() {
        return Err(PlannerError::Conflict(
            "Assignment already exists for this task and employee".to_string(),
        ));
    }

    let assignment = sqlx::query_as::<_, Assignment>(&format!(
        r#"
        INSERT INTO assignments (task_id, employee_id, role, note)
        VALUES ($1, $2, $3, $4)
        RETURNING {ASSIGNMENT_COLUMNS}
        "#
    ))
    .bind(new_assignment.task_id)
    .bind(new_assignment.employee_id)
    .bind(&new_assignment.role)
    .bind(&new_assignment.note)
    .fetch_one(&pool)
    .await
    .map_err(|e| conflict_on_unique(e, "Assignment already exists for this task and employee"))?;

    Ok(ApiResponse::success(
        StatusCode::CREATED,
        "Assignment created successfully",
        assignment,
    ))
}

/// Updates an assignment's role/note; the task/employee pairing is immutable
#[utoipa::path(
    put,
    path = "/assignments/{id}",
    params(("id" = i32, Path, description = "ID of the assignment to update")),
    request_body = UpdateAssignment,
    responses(
        (status = 200, description = "Assignment updated successfully", body = Assignment),
        (status = 400, description = "No fields provided for update"),
        (status = 404, description = "Assignment not found"),
        (status = 500, description = "Failed to update assignment")
    ),
    tag = "Assignments"
)]
pub async fn update_assignment(
    State(pool): State<PgPool>,
    Path(id): Path<i32>,
    Json(update): Json<UpdateAssignment>,
) -> Result<ApiResponse<Assignment>, PlannerError> {
    if update.is_empty() {
        return Err(PlannerError::Validation(
            "No fields provided for update".to_string(),
        ));
    }

    let mut query_builder = QueryBuilder::new("UPDATE assignments SET ");
    let mut separated = query_builder.separated(", ");

    push_if_some!(separated, update, role);
    push_if_some!(separated, update, note);
    separated.push("updated_at = NOW()");

    query_builder.push(" WHERE id = ").push_bind(id);

    let result = query_builder.build().execute(&pool).await?;
    if result.rows_affected() == 0 {
        return Err(PlannerError::not_found("Assignment", id));
    }

    let assignment = sqlx::query_as::<_, Assignment>(&format!(
        "SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE id = $1"
    ))
    .bind(id)
    .fetch_one(&pool)
    .await?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Assignment updated successfully",
        assignment,
    ))
}

/// Removes an assignment. Shifts already created for the employee/task pair
/// are left untouched.
#[utoipa::path(
    delete,
    path = "/assignments/{id}",
    params(("id" = i32, Path, description = "ID of the assignment to delete")),
    responses(
        (status = 200, description = "Assignment deleted successfully"),
        (status = 404, description = "Assignment not found"),
        (status = 500, description = "Failed to delete assignment")
    ),
    tag = "Assignments"
)]
pub async fn delete_assignment(
    State(pool): State<PgPool>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<()>, PlannerError> {
    let result = sqlx::query("DELETE FROM assignments WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(PlannerError::not_found("Assignment", id));
    }

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Assignment deleted successfully",
        (),
    ))
}

/// Retrieves assignments joined with task, work order and employee
/// projections, ordered by task planned start date then employee surname
#[utoipa::path(
    get,
    path = "/assignments",
    params(AssignmentFilter),
    responses(
        (status = 200, description = "Assignments retrieved successfully", body = Vec<AssignmentDetail>),
        (status = 500, description = "Failed to retrieve assignments")
    ),
    tag = "Assignments"
)]
pub async fn get_all_assignments(
    State(pool): State<PgPool>,
    Query(filter): Query<AssignmentFilter>,
) -> Result<ApiResponse<Vec<AssignmentDetail>>, PlannerError> {
    let mut query_builder = QueryBuilder::new(ASSIGNMENT_DETAIL_SELECT);

    if let Some(task_id) = filter.task_id {
        query_builder.push(" AND a.task_id = ").push_bind(task_id);
    }
    if let Some(work_order_id) = filter.work_order_id {
        query_builder
            .push(" AND t.work_order_id = ")
            .push_bind(work_order_id);
    }
    if let Some(employee_id) = filter.employee_id {
        query_builder
            .push(" AND a.employee_id = ")
            .push_bind(employee_id);
    }
    query_builder.push(" ORDER BY t.start_date ASC, e.last_name ASC");

    let rows = query_builder
        .build_query_as::<AssignmentDetailRow>()
        .fetch_all(&pool)
        .await?;

    let assignments: Vec<AssignmentDetail> =
        rows.into_iter().map(AssignmentDetail::from).collect();

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Assignments retrieved successfully",
        assignments,
    ))
}

/// Retrieves a single assignment by ID
#[utoipa::path(
    get,
    path = "/assignments/{id}",
    params(("id" = i32, Path, description = "ID of the assignment")),
    responses(
        (status = 200, description = "Assignment retrieved successfully", body = AssignmentDetail),
        (status = 404, description = "Assignment not found"),
        (status = 500, description = "Failed to fetch assignment")
    ),
    tag = "Assignments"
)]
pub async fn get_assignment(
    State(pool): State<PgPool>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<AssignmentDetail>, PlannerError> {
    let mut query_builder = QueryBuilder::new(ASSIGNMENT_DETAIL_SELECT);
    query_builder.push(" AND a.id = ").push_bind(id);

    let row = query_builder
        .build_query_as::<AssignmentDetailRow>()
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| PlannerError::not_found("Assignment", id))?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Assignment retrieved successfully",
        AssignmentDetail::from(row),
    ))
}

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        create_assignment,
        update_assignment,
        delete_assignment,
        get_all_assignments,
        get_assignment
    ),
    components(schemas(Assignment, NewAssignment, UpdateAssignment, AssignmentDetail)),
    tags(
        (name = "Assignments", description = "API for managing task assignments")
    )
)]
pub struct AssignmentDoc;
