use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::types::Json as SqlJson;
use sqlx::{PgPool, QueryBuilder};

use crate::db::models::employee::{Employee, NewEmployee, UpdateEmployee};
use crate::db::queries::push_if_some;
use crate::utils::api_response::ApiResponse;
use crate::utils::error::{conflict_on_unique, PlannerError};

const EMPLOYEE_COLUMNS: &str =
    "id, first_name, last_name, email, phone, user_id, role, skills, created_at";

pub(crate) async fn fetch_employee(
    pool: &PgPool,
    id: i32,
) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>(&format!(
        "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Registers a new employee
#[utoipa::path(
    post,
    path = "/employees",
    request_body = NewEmployee,
    responses(
        (status = 201, description = "Employee created successfully", body = Employee),
        (status = 400, description = "Duplicate email"),
        (status = 500, description = "Failed to create employee")
    ),
    tag = "Employees"
)]
pub async fn create_employee(
    State(pool): State<PgPool>,
    Json(new_employee): Json<NewEmployee>,
) -> Result<ApiResponse<Employee>, PlannerError> {
    let employee = sqlx::query_as::<_, Employee>(&format!(
        r#"
        INSERT INTO employees (first_name, last_name, email, phone, user_id, role, skills)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {EMPLOYEE_COLUMNS}
        "#
    ))
    .bind(&new_employee.first_name)
    .bind(&new_employee.last_name)
    .bind(&new_employee.email)
    .bind(&new_employee.phone)
    .bind(new_employee.user_id)
    .bind(&new_employee.role)
    .bind(new_employee.skills.map(SqlJson))
    .fetch_one(&pool)
    .await
    .map_err(|e| conflict_on_unique(e, "An employee with this email already exists"))?;

    Ok(ApiResponse::success(
        StatusCode::CREATED,
        "Employee created successfully",
        employee,
    ))
}

/// Retrieves all employees, ordered by surname
#[utoipa::path(
    get,
    path = "/employees",
    responses(
        (status = 200, description = "Employees retrieved successfully", body = Vec<Employee>),
        (status = 500, description = "Failed to retrieve employees")
    ),
    tag = "Employees"
)]
pub async fn get_all_employees(
    State(pool): State<PgPool>,
) -> Result<ApiResponse<Vec<Employee>>, PlannerError> {
    let employees = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY last_name, first_name"
    ))
    .fetch_all(&pool)
    .await?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Employees retrieved successfully",
        employees,
    ))
}

/// Retrieves a specific employee by ID
#[utoipa::path(
    get,
    path = "/employees/{id}",
    params(("id" = i32, Path, description = "ID of the employee")),
    responses(
        (status = 200, description = "Employee retrieved successfully", body = Employee),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Failed to fetch employee")
    ),
    tag = "Employees"
)]
pub async fn get_employee(
    State(pool): State<PgPool>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<Employee>, PlannerError> {
    let employee = fetch_employee(&pool, id)
        .await?
        .ok_or_else(|| PlannerError::not_found("Employee", id))?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Employee retrieved successfully",
        employee,
    ))
}

/// Updates an existing employee
#[utoipa::path(
    put,
    path = "/employees/{id}",
    params(("id" = i32, Path, description = "ID of the employee to update")),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated successfully", body = Employee),
        (status = 400, description = "No fields provided for update"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Failed to update employee")
    ),
    tag = "Employees"
)]
pub async fn update_employee(
    State(pool): State<PgPool>,
    Path(id): Path<i32>,
    Json(update): Json<UpdateEmployee>,
) -> Result<ApiResponse<Employee>, PlannerError> {
    if update.is_empty() {
        return Err(PlannerError::Validation(
            "No fields provided for update".to_string(),
        ));
    }

    let mut query_builder = QueryBuilder::new("UPDATE employees SET ");
    let mut separated = query_builder.separated(", ");

    push_if_some!(separated, update, first_name);
    push_if_some!(separated, update, last_name);
    push_if_some!(separated, update, email);
    push_if_some!(separated, update, phone);
    push_if_some!(separated, update, user_id);
    push_if_some!(separated, update, role);
    if let Some(skills) = &update.skills {
        separated
            .push("skills = ")
            .push_bind_unseparated(SqlJson(skills.clone()));
    }
    separated.push("updated_at = NOW()");

    query_builder.push(" WHERE id = ").push_bind(id);

    let result = query_builder
        .build()
        .execute(&pool)
        .await
        .map_err(|e| conflict_on_unique(e, "An employee with this email already exists"))?;

    if result.rows_affected() == 0 {
        return Err(PlannerError::not_found("Employee", id));
    }

    let employee = fetch_employee(&pool, id)
        .await?
        .ok_or_else(|| PlannerError::not_found("Employee", id))?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Employee updated successfully",
        employee,
    ))
}

/// Removes an employee
#[utoipa::path(
    delete,
    path = "/employees/{id}",
    params(("id" = i32, Path, description = "ID of the employee to delete")),
    responses(
        (status = 200, description = "Employee deleted successfully"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Failed to delete employee")
    ),
    tag = "Employees"
)]
pub async fn delete_employee(
    State(pool): State<PgPool>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<()>, PlannerError> {
    let result = sqlx::query("DELETE FROM employees WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(PlannerError::not_found("Employee", id));
    }

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Employee deleted successfully",
        (),
    ))
}

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        create_employee,
        get_all_employees,
        get_employee,
        update_employee,
        delete_employee
    ),
    components(schemas(Employee, NewEmployee, UpdateEmployee)),
    tags(
        (name = "Employees", description = "Employee API endpoints")
    )
)]
pub struct EmployeeDoc;
