use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;

use super::string_enum;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
    pub enum TaskStatus {
        Active => "active",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Active
    }
}

/// A unit of work under a work order requiring a headcount of employees
/// over a planned period.
#[derive(Debug, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub work_order_id: i32,
    pub status: TaskStatus,
    pub estimated_hours: Option<f64>,
    pub required_resources: i32,
    #[schema(value_type = Option<Vec<String>>)]
    pub skills: Option<Json<Vec<String>>>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub name: String,
    pub description: Option<String>,
    pub work_order_id: i32,
    pub status: Option<TaskStatus>,
    pub estimated_hours: Option<f64>,
    /// Required headcount; defaults to 1 when omitted.
    pub required_resources: Option<i32>,
    pub skills: Option<Vec<String>>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub estimated_hours: Option<f64>,
    pub required_resources: Option<i32>,
    pub skills: Option<Vec<String>>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl UpdateTask {
    /// Returns `true` if all fields are `None`.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.estimated_hours.is_none()
            && self.required_resources.is_none()
            && self.skills.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }
}

/// Projection attached to assignment and shift read models.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub id: i32,
    pub name: String,
    pub status: TaskStatus,
    pub required_resources: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
