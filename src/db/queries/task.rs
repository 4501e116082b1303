use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use sqlx::types::Json as SqlJson;
use sqlx::{PgPool, QueryBuilder};

use crate::db::models::task::{NewTask, Task, TaskStatus, UpdateTask};
use crate::db::queries::push_if_some;
use crate::utils::api_response::ApiResponse;
use crate::utils::error::PlannerError;

const TASK_COLUMNS: &str = "id, name, description, work_order_id, status, estimated_hours, \
                            required_resources, skills, start_date, end_date, created_at";

pub(crate) async fn work_order_exists(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    let found = sqlx::query_scalar::<_, i32>("SELECT id FROM work_orders WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

pub(crate) async fn fetch_task(pool: &PgPool, id: i32) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    pub work_order_id: Option<i32>,
    pub status: Option<TaskStatus>,
}

/// Creates a new task under a work order
#[utoipa::path(
    post,
    path = "/tasks",
    request_body = NewTask,
    responses(
        (status = 201, description = "Task created successfully", body = Task),
        (status = 400, description = "Invalid required headcount"),
        (status = 404, description = "Work order not found"),
        (status = 500, description = "Failed to create task")
    ),
    tag = "Tasks"
)]
pub async fn create_task(
    State(pool): State<PgPool>,
    Json(new_task): Json<NewTask>,
) -> Result<ApiResponse<Task>, PlannerError> {
    let required_resources = new_task.required_resources.unwrap_or(1);
    if required_resources < 1 {
        return Err(PlannerError::Validation(
            "requiredResources must be at least 1".to_string(),
        ));
    }

    if !work_order_exists(&pool, new_task.work_order_id).await? {
        return Err(PlannerError::not_found(
            "Work order",
            new_task.work_order_id,
        ));
    }

    let status = new_task.status.unwrap_or_default();

    let task = sqlx::query_as::<_, Task>(&format!(
        r#"
        INSERT INTO tasks (
            name, description, work_order_id, status, estimated_hours,
            required_resources, skills, start_date, end_date
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {TASK_COLUMNS}
        "#
    ))
    .bind(&new_task.name)
    .bind(&new_task.description)
    .bind(new_task.work_order_id)
    .bind(status)
    .bind(new_task.estimated_hours)
    .bind(required_resources)
    .bind(new_task.skills.map(SqlJson))
    .bind(new_task.start_date)
    .bind(new_task.end_date)
    .fetch_one(&pool)
    .await?;

    Ok(ApiResponse::success(
        StatusCode::CREATED,
        "Task created successfully",
        task,
    ))
}

/// Retrieves tasks, optionally filtered by work order and status
#[utoipa::path(
    get,
    path = "/tasks",
    params(TaskFilter),
    responses(
        (status = 200, description = "Tasks retrieved successfully", body = Vec<Task>),
        (status = 500, description = "Failed to retrieve tasks")
    ),
    tag = "Tasks"
)]
pub async fn get_all_tasks(
    State(pool): State<PgPool>,
    Query(filter): Query<TaskFilter>,
) -> Result<ApiResponse<Vec<Task>>, PlannerError> {
    let mut query_builder =
        QueryBuilder::new(format!("SELECT {TASK_COLUMNS} FROM tasks WHERE 1 = 1"));

    if let Some(work_order_id) = filter.work_order_id {
        query_builder
            .push(" AND work_order_id = ")
            .push_bind(work_order_id);
    }
    if let Some(status) = filter.status {
        query_builder.push(" AND status = ").push_bind(status);
    }
    query_builder.push(" ORDER BY start_date ASC, name ASC");

    let tasks = query_builder
        .build_query_as::<Task>()
        .fetch_all(&pool)
        .await?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Tasks retrieved successfully",
        tasks,
    ))
}

/// Retrieves a specific task by ID
#[utoipa::path(
    get,
    path = "/tasks/{id}",
    params(("id" = i32, Path, description = "ID of the task")),
    responses(
        (status = 200, description = "Task retrieved successfully", body = Task),
        (status = 404, description = "Task not found"),
        (status = 500, description = "Failed to fetch task")
    ),
    tag = "Tasks"
)]
pub async fn get_task(
    State(pool): State<PgPool>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<Task>, PlannerError> {
    let task = fetch_task(&pool, id)
        .await?
        .ok_or_else(|| PlannerError::not_found("Task", id))?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Task retrieved successfully",
        task,
    ))
}

/// Updates an existing task; the owning work order is immutable
#[utoipa::path(
    put,
    path = "/tasks/{id}",
    params(("id" = i32, Path, description = "ID of the task to update")),
    request_body = UpdateTask,
    responses(
        (status = 200, description = "Task updated successfully", body = Task),
        (status = 400, description = "No fields provided for update"),
        (status = 404, description = "Task not found"),
        (status = 500, description = "Failed to update task")
    ),
    tag = "Tasks"
)]
pub async fn update_task(
    State(pool): State<PgPool>,
    Path(id): Path<i32>,
    Json(update): Json<UpdateTask>,
) -> Result<ApiResponse<Task>, PlannerError> {
    if update.is_empty() {
        return Err(PlannerError::Validation(
            "No fields provided for update".to_string(),
        ));
    }

    if let Some(required_resources) = update.required_resources {
        if required_resources < 1 {
            return Err(PlannerError::Validation(
                "requiredResources must be at least 1".to_string(),
            ));
        }
    }

    let mut query_builder = QueryBuilder::new("UPDATE tasks SET ");
    let mut separated = query_builder.separated(", ");

    push_if_some!(separated, update, name);
    push_if_some!(separated, update, description);
    push_if_some!(separated, update, status);
    push_if_some!(separated, update, estimated_hours);
    push_if_some!(separated, update, required_resources);
    if let Some(skills) = &update.skills {
        separated
            .push("skills = ")
            .push_bind_unseparated(SqlJson(skills.clone()));
    }
    push_if_some!(separated, update, start_date);
    push_if_some!(separated, update, end_date);
    separated.push("updated_at = NOW()");

    query_builder.push(" WHERE id = ").push_bind(id);

    let result = query_builder.build().execute(&pool).await?;
    if result.rows_affected() == 0 {
        return Err(PlannerError::not_found("Task", id));
    }

    let task = fetch_task(&pool, id)
        .await?
        .ok_or_else(|| PlannerError::not_found("Task", id))?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Task updated successfully",
        task,
    ))
}

/// Deletes a task
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    params(("id" = i32, Path, description = "ID of the task to delete")),
    responses(
        (status = 200, description = "Task deleted successfully"),
        (status = 404, description = "Task not found"),
        (status = 500, description = "Failed to delete task")
    ),
    tag = "Tasks"
)]
pub async fn delete_task(
    State(pool): State<PgPool>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<()>, PlannerError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(PlannerError::not_found("Task", id));
    }

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Task deleted successfully",
        (),
    ))
}

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(create_task, get_all_tasks, get_task, update_task, delete_task),
    components(schemas(Task, NewTask, UpdateTask)),
    tags(
        (name = "Tasks", description = "Task API endpoints")
    )
)]
pub struct TaskDoc;
