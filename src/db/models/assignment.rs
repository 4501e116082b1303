use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::employee::EmployeeSummary;
use super::task::{TaskStatus, TaskSummary};
use super::work_order::{WorkOrderStatus, WorkOrderSummary};

/// Non-dated binding of an employee to a task: who *can* work on what.
/// The (task_id, employee_id) pair is unique.
#[derive(Debug, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: i32,
    pub task_id: i32,
    pub employee_id: i32,
    pub role: Option<String>,
    pub note: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewAssignment {
    pub task_id: i32,
    pub employee_id: i32,
    pub role: Option<String>,
    pub note: Option<String>,
}

/// Identity fields (task, employee) are immutable after creation; changing
/// the pairing requires delete + recreate.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssignment {
    pub role: Option<String>,
    pub note: Option<String>,
}

impl UpdateAssignment {
    /// Returns `true` if all fields are `None`.
    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.note.is_none()
    }
}

/// Typed filter for assignment listings.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentFilter {
    pub task_id: Option<i32>,
    pub work_order_id: Option<i32>,
    pub employee_id: Option<i32>,
}

/// Assignment joined with its task (and transitively the work order) and
/// employee projections.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDetail {
    pub id: i32,
    pub role: Option<String>,
    pub note: Option<String>,
    pub task: TaskSummary,
    pub work_order: WorkOrderSummary,
    pub employee: EmployeeSummary,
}

/// Flat row shape produced by the assignment listing join.
#[derive(Debug, FromRow)]
pub(crate) struct AssignmentDetailRow {
    pub id: i32,
    pub role: Option<String>,
    pub note: Option<String>,
    pub task_id: i32,
    pub task_name: String,
    pub task_status: TaskStatus,
    pub required_resources: i32,
    pub task_start_date: Option<NaiveDate>,
    pub task_end_date: Option<NaiveDate>,
    pub work_order_id: i32,
    pub work_order_code: String,
    pub work_order_description: String,
    pub work_order_client: String,
    pub work_order_status: WorkOrderStatus,
    pub employee_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<AssignmentDetailRow> for AssignmentDetail {
    fn from(row: AssignmentDetailRow) -> Self {
        AssignmentDetail {
            id: row.id,
            role: row.role,
            note: row.note,
            task: TaskSummary {
                id: row.task_id,
                name: row.task_name,
                status: row.task_status,
                required_resources: row.required_resources,
                start_date: row.task_start_date,
                end_date: row.task_end_date,
            },
            work_order: WorkOrderSummary {
                id: row.work_order_id,
                code: row.work_order_code,
                description: row.work_order_description,
                client: row.work_order_client,
                status: row.work_order_status,
            },
            employee: EmployeeSummary {
                id: row.employee_id,
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
            },
        }
    }
}
