use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::employee::EmployeeSummary;
use super::task::{TaskStatus, TaskSummary};
use super::work_order::{WorkOrderStatus, WorkOrderSummary};

/// A dated, timed occurrence of an employee working a task/work order.
/// Times are local `HH:MM:SS` values on a single date; the window never
/// crosses midnight.
#[derive(Debug, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: i32,
    pub employee_id: i32,
    pub work_order_id: Option<i32>,
    pub task_id: Option<i32>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub role: Option<String>,
    pub location: Option<String>,
    pub note: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

/// Required fields are optional here so that missing input surfaces as a
/// validation failure instead of a deserialization rejection; each field is
/// checked independently at create time.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewShift {
    pub employee_id: Option<i32>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub task_id: Option<i32>,
    pub work_order_id: Option<i32>,
    pub role: Option<String>,
    pub location: Option<String>,
    pub note: Option<String>,
}

/// Partial update: any omitted field retains its previous value.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShift {
    pub employee_id: Option<i32>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub task_id: Option<i32>,
    pub work_order_id: Option<i32>,
    pub role: Option<String>,
    pub location: Option<String>,
    pub note: Option<String>,
}

impl UpdateShift {
    /// Returns `true` if all fields are `None`.
    pub fn is_empty(&self) -> bool {
        self.employee_id.is_none()
            && self.date.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.task_id.is_none()
            && self.work_order_id.is_none()
            && self.role.is_none()
            && self.location.is_none()
            && self.note.is_none()
    }
}

/// Typed filter for shift listings; the date range supports open-ended
/// (from-only or to-only) and closed intervals.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ShiftFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub employee_id: Option<i32>,
    pub work_order_id: Option<i32>,
    pub task_id: Option<i32>,
}

/// Shift with resolved employee/work-order/task summaries attached.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShiftDetail {
    pub id: i32,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub role: Option<String>,
    pub location: Option<String>,
    pub note: Option<String>,
    pub employee: EmployeeSummary,
    pub work_order: Option<WorkOrderSummary>,
    pub task: Option<TaskSummary>,
}

/// Flat row shape produced by the shift detail join.
#[derive(Debug, FromRow)]
pub(crate) struct ShiftDetailRow {
    pub id: i32,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub role: Option<String>,
    pub location: Option<String>,
    pub note: Option<String>,
    pub employee_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub work_order_id: Option<i32>,
    pub work_order_code: Option<String>,
    pub work_order_description: Option<String>,
    pub work_order_client: Option<String>,
    pub work_order_status: Option<WorkOrderStatus>,
    pub task_id: Option<i32>,
    pub task_name: Option<String>,
    pub task_status: Option<TaskStatus>,
    pub required_resources: Option<i32>,
    pub task_start_date: Option<NaiveDate>,
    pub task_end_date: Option<NaiveDate>,
}

impl From<ShiftDetailRow> for ShiftDetail {
    fn from(row: ShiftDetailRow) -> Self {
        let work_order = match (
            row.work_order_id,
            row.work_order_code,
            row.work_order_description,
            row.work_order_client,
            row.work_order_status,
        ) {
            (Some(id), Some(code), Some(description), Some(client), Some(status)) => {
                Some(WorkOrderSummary {
                    id,
                    code,
                    description,
                    client,
                    status,
                })
            }
            _ => None,
        };

        let task = match (row.task_id, row.task_name, row.task_status) {
            (Some(id), Some(name), Some(status)) => Some(TaskSummary {
                id,
                name,
                status,
                required_resources: row.required_resources.unwrap_or(1),
                start_date: row.task_start_date,
                end_date: row.task_end_date,
            }),
            _ => None,
        };

        ShiftDetail {
            id: row.id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            role: row.role,
            location: row.location,
            note: row.note,
            employee: EmployeeSummary {
                id: row.employee_id,
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
            },
            work_order,
            task,
        }
    }
}
