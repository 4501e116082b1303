use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveTime;
use sqlx::{PgPool, QueryBuilder};

use crate::db::models::shift::{
    NewShift, Shift, ShiftDetail, ShiftDetailRow, ShiftFilter, UpdateShift,
};
use crate::db::queries::employee::fetch_employee;
use crate::db::queries::push_if_some;
use crate::db::queries::task::{fetch_task, work_order_exists};
use crate::utils::api_response::ApiResponse;
use crate::utils::error::PlannerError;

const SHIFT_COLUMNS: &str = "id, employee_id, work_order_id, task_id, date, start_time, \
                             end_time, role, location, note, created_at";

pub(crate) const SHIFT_DETAIL_SELECT: &str = r#"
SELECT s.id, s.date, s.start_time, s.end_time, s.role, s.location, s.note,
       e.id AS employee_id, e.first_name, e.last_name, e.email,
       w.id AS work_order_id, w.code AS work_order_code,
       w.description AS work_order_description, w.client AS work_order_client,
       w.status AS work_order_status,
       t.id AS task_id, t.name AS task_name, t.status AS task_status,
       t.required_resources, t.start_date AS task_start_date, t.end_date AS task_end_date
FROM shifts s
JOIN employees e ON e.id = s.employee_id
LEFT JOIN work_orders w ON w.id = s.work_order_id
LEFT JOIN tasks t ON t.id = s.task_id
WHERE 1 = 1
"#;

/// The shift window is time-only on a single date; it must not be empty or
/// inverted.
pub(crate) fn validate_time_window(
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<(), PlannerError> {
    if end_time <= start_time {
        return Err(PlannerError::Validation(
            "endTime must be later than startTime".to_string(),
        ));
    }
    Ok(())
}

/// A shift naming both a task and a work order must name the task's owner.
pub(crate) fn validate_task_work_order(
    task_work_order_id: i32,
    work_order_id: i32,
) -> Result<(), PlannerError> {
    if task_work_order_id != work_order_id {
        return Err(PlannerError::Inconsistent(
            "Task does not belong to the specified work order".to_string(),
        ));
    }
    Ok(())
}

async fn fetch_shift_detail(pool: &PgPool, id: i32) -> Result<Option<ShiftDetail>, PlannerError> {
    let mut query_builder = QueryBuilder::new(SHIFT_DETAIL_SELECT);
    query_builder.push(" AND s.id = ").push_bind(id);

    let row = query_builder
        .build_query_as::<ShiftDetailRow>()
        .fetch_optional(pool)
        .await?;

    Ok(row.map(ShiftDetail::from))
}

/// Creates a new shift.
///
/// All references are resolved before the write. When a task is given
/// without a work order, the task's owning work order is attached
/// automatically.
#[utoipa::path(
    post,
    path = "/shifts",
    request_body = NewShift,
    responses(
        (status = 201, description = "Shift created successfully", body = ShiftDetail),
        (status = 400, description = "Missing required field, invalid time window, or task/work order mismatch"),
        (status = 404, description = "Employee, task or work order not found"),
        (status = 500, description = "Failed to create shift")
    ),
    tag = "Shifts"
)]
pub async fn create_shift(
    State(pool): State<PgPool>,
    Json(new_shift): Json<NewShift>,
) -> Result<ApiResponse<ShiftDetail>, PlannerError> {
    let employee_id = new_shift
        .employee_id
        .ok_or_else(|| PlannerError::Validation("employeeId is required".to_string()))?;
    let date = new_shift
        .date
        .ok_or_else(|| PlannerError::Validation("date is required".to_string()))?;
    let start_time = new_shift
        .start_time
        .ok_or_else(|| PlannerError::Validation("startTime is required".to_string()))?;
    let end_time = new_shift
        .end_time
        .ok_or_else(|| PlannerError::Validation("endTime is required".to_string()))?;

    validate_time_window(start_time, end_time)?;

    if fetch_employee(&pool, employee_id).await?.is_none() {
        return Err(PlannerError::not_found("Employee", employee_id));
    }

    if let Some(work_order_id) = new_shift.work_order_id {
        if !work_order_exists(&pool, work_order_id).await? {
            return Err(PlannerError::not_found("Work order", work_order_id));
        }
    }

    let mut work_order_id = new_shift.work_order_id;
    if let Some(task_id) = new_shift.task_id {
        let task = fetch_task(&pool, task_id)
            .await?
            .ok_or_else(|| PlannerError::not_found("Task", task_id))?;

        match work_order_id {
            Some(stated) => validate_task_work_order(task.work_order_id, stated)?,
            None => work_order_id = Some(task.work_order_id),
        }
    }

    let shift = sqlx::query_as::<_, Shift>(&format!(
        r#"
        INSERT INTO shifts (
            employee_id, work_order_id, task_id, date, start_time, end_time,
            role, location, note
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {SHIFT_COLUMNS}
        "#
    ))
    .bind(employee_id)
    .bind(work_order_id)
    .bind(new_shift.task_id)
    .bind(date)
    .bind(start_time)
    .bind(end_time)
    .bind(&new_shift.role)
    .bind(&new_shift.location)
    .bind(&new_shift.note)
    .fetch_one(&pool)
    .await?;

    let detail = fetch_shift_detail(&pool, shift.id)
        .await?
        .ok_or_else(|| PlannerError::not_found("Shift", shift.id))?;

    Ok(ApiResponse::success(
        StatusCode::CREATED,
        "Shift created successfully",
        detail,
    ))
}

/// Updates a shift: omitted fields keep their previous values, and the time
/// window and task/work-order consistency are re-validated on the merged
/// result
#[utoipa::path(
    put,
    path = "/shifts/{id}",
    params(("id" = i32, Path, description = "ID of the shift to update")),
    request_body = UpdateShift,
    responses(
        (status = 200, description = "Shift updated successfully", body = ShiftDetail),
        (status = 400, description = "No fields provided, invalid time window, or task/work order mismatch"),
        (status = 404, description = "Shift, employee, task or work order not found"),
        (status = 500, description = "Failed to update shift")
    ),
    tag = "Shifts"
)]
pub async fn update_shift(
    State(pool): State<PgPool>,
    Path(id): Path<i32>,
    Json(update): Json<UpdateShift>,
) -> Result<ApiResponse<ShiftDetail>, PlannerError> {
    if update.is_empty() {
        return Err(PlannerError::Validation(
            "No fields provided for update".to_string(),
        ));
    }

    let existing = sqlx::query_as::<_, Shift>(&format!(
        "SELECT {SHIFT_COLUMNS} FROM shifts WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| PlannerError::not_found("Shift", id))?;

    let start_time = update.start_time.unwrap_or(existing.start_time);
    let end_time = update.end_time.unwrap_or(existing.end_time);
    validate_time_window(start_time, end_time)?;

    if let Some(employee_id) = update.employee_id {
        if fetch_employee(&pool, employee_id).await?.is_none() {
            return Err(PlannerError::not_found("Employee", employee_id));
        }
    }

    if let Some(work_order_id) = update.work_order_id {
        if !work_order_exists(&pool, work_order_id).await? {
            return Err(PlannerError::not_found("Work order", work_order_id));
        }
    }

    // Consistency is re-checked on the merged references whenever either
    // side changes.
    if update.task_id.is_some() || update.work_order_id.is_some() {
        let task_id = update.task_id.or(existing.task_id);
        let work_order_id = update.work_order_id.or(existing.work_order_id);

        if let Some(task_id) = task_id {
            let task = fetch_task(&pool, task_id)
                .await?
                .ok_or_else(|| PlannerError::not_found("Task", task_id))?;

            if let Some(work_order_id) = work_order_id {
                validate_task_work_order(task.work_order_id, work_order_id)?;
            }
        }
    }

    let mut query_builder = QueryBuilder::new("UPDATE shifts SET ");
    let mut separated = query_builder.separated(", ");

    push_if_some!(separated, update, employee_id);
    push_if_some!(separated, update, date);
    push_if_some!(separated, update, start_time);
    push_if_some!(separated, update, end_time);
    push_if_some!(separated, update, task_id);
    push_if_some!(separated, update, work_order_id);
    push_if_some!(separated, update, role);
    push_if_some!(separated, update, location);
    push_if_some!(separated, update, note);
    separated.push("updated_at = NOW()");

    query_builder.push(" WHERE id = ").push_bind(id);
    query_builder.build().execute(&pool).await?;

    let detail = fetch_shift_detail(&pool, id)
        .await?
        .ok_or_else(|| PlannerError::not_found("Shift", id))?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Shift updated successfully",
        detail,
    ))
}

/// Deletes a shift
#[utoipa::path(
    delete,
    path = "/shifts/{id}",
    params(("id" = i32, Path, description = "ID of the shift to delete")),
    responses(
        (status = 200, description = "Shift deleted successfully"),
        (status = 404, description = "Shift not found"),
        (status = 500, description = "Failed to delete shift")
    ),
    tag = "Shifts"
)]
pub async fn delete_shift(
    State(pool): State<PgPool>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<()>, PlannerError> {
    let result = sqlx::query("DELETE FROM shifts WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(PlannerError::not_found("Shift", id));
    }

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Shift deleted successfully",
        (),
    ))
}

/// Retrieves a single shift with its resolved summaries
#[utoipa::path(
    get,
    path = "/shifts/{id}",
    params(("id" = i32, Path, description = "ID of the shift")),
    responses(
        (status = 200, description = "Shift retrieved successfully", body = ShiftDetail),
        (status = 404, description = "Shift not found"),
        (status = 500, description = "Failed to fetch shift")
    ),
    tag = "Shifts"
)]
pub async fn get_shift(
    State(pool): State<PgPool>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<ShiftDetail>, PlannerError> {
    let detail = fetch_shift_detail(&pool, id)
        .await?
        .ok_or_else(|| PlannerError::not_found("Shift", id))?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Shift retrieved successfully",
        detail,
    ))
}

/// Retrieves shifts ordered by date then start time. The date range filter
/// supports open-ended intervals (only `startDate` or only `endDate`).
#[utoipa::path(
    get,
    path = "/shifts",
    params(ShiftFilter),
    responses(
        (status = 200, description = "Shifts retrieved successfully", body = Vec<ShiftDetail>),
        (status = 500, description = "Failed to retrieve shifts")
    ),
    tag = "Shifts"
)]
pub async fn get_all_shifts(
    State(pool): State<PgPool>,
    Query(filter): Query<ShiftFilter>,
) -> Result<ApiResponse<Vec<ShiftDetail>>, PlannerError> {
    let mut query_builder = QueryBuilder::new(SHIFT_DETAIL_SELECT);

    if let Some(start_date) = filter.start_date {
        query_builder.push(" AND s.date >= ").push_bind(start_date);
    }
    if let Some(end_date) = filter.end_date {
        query_builder.push(" AND s.date <= ").push_bind(end_date);
    }
    if let Some(employee_id) = filter.employee_id {
        query_builder
            .push(" AND s.employee_id = ")
            .push_bind(employee_id);
    }
    if let Some(work_order_id) = filter.work_order_id {
        query_builder
            .push(" AND s.work_order_id = ")
            .push_bind(work_order_id);
    }
    if let Some(task_id) = filter.task_id {
        query_builder.push(" AND s.task_id = ").push_bind(task_id);
    }
    query_builder.push(" ORDER BY s.date ASC, s.start_time ASC");

    let rows = query_builder
        .build_query_as::<ShiftDetailRow>()
        .fetch_all(&pool)
        .await?;

    let shifts: Vec<ShiftDetail> = rows.into_iter().map(ShiftDetail::from).collect();

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Shifts retrieved successfully",
        shifts,
    ))
}

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        create_shift,
        update_shift,
        delete_shift,
        get_shift,
        get_all_shifts
    ),
    components(schemas(Shift, NewShift, UpdateShift, ShiftDetail)),
    tags(
        (name = "Shifts", description = "Shift API endpoints")
    )
)]
pub struct ShiftDoc;

#[cfg(test)]
mod tests {
    use super::*;

    fn time(s: &str) -> NaiveTime {
        s.parse().unwrap()
    }

    #[test]
    fn inverted_time_window_is_rejected() {
        let err = validate_time_window(time("16:00:00"), time("08:00:00")).unwrap_err();
        assert!(matches!(err, PlannerError::Validation(_)));
    }

    #[test]
    fn empty_time_window_is_rejected() {
        let err = validate_time_window(time("08:00:00"), time("08:00:00")).unwrap_err();
        assert!(matches!(err, PlannerError::Validation(_)));
    }

    #[test]
    fn forward_time_window_is_accepted() {
        assert!(validate_time_window(time("08:00:00"), time("16:00:00")).is_ok());
    }

    #[test]
    fn task_outside_stated_work_order_is_inconsistent() {
        let err = validate_task_work_order(1, 2).unwrap_err();
        assert!(matches!(err, PlannerError::Inconsistent(_)));
        assert!(validate_task_work_order(2, 2).is_ok());
    }
}
