use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::string_enum;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
    pub enum WorkOrderStatus {
        Active => "active",
        Completed => "completed",
        Suspended => "suspended",
        Cancelled => "cancelled",
    }
}

impl Default for WorkOrderStatus {
    fn default() -> Self {
        WorkOrderStatus::Active
    }
}

/// A client engagement under which tasks and shifts are organized.
#[derive(Debug, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    pub id: i32,
    pub code: String,
    pub description: String,
    pub client: String,
    pub status: WorkOrderStatus,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<f64>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkOrder {
    pub code: String,
    pub description: String,
    pub client: String,
    pub status: Option<WorkOrderStatus>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkOrder {
    pub code: Option<String>,
    pub description: Option<String>,
    pub client: Option<String>,
    pub status: Option<WorkOrderStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<f64>,
}

impl UpdateWorkOrder {
    /// Returns `true` if all fields are `None`.
    pub fn is_empty(&self) -> bool {
        self.code.is_none()
            && self.description.is_none()
            && self.client.is_none()
            && self.status.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.budget.is_none()
    }
}

/// Projection attached to assignment and shift read models.
#[derive(Debug, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderSummary {
    pub id: i32,
    pub code: String,
    pub description: String,
    pub client: String,
    pub status: WorkOrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            WorkOrderStatus::Active,
            WorkOrderStatus::Completed,
            WorkOrderStatus::Suspended,
            WorkOrderStatus::Cancelled,
        ] {
            let parsed: WorkOrderStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("archived".parse::<WorkOrderStatus>().is_err());
    }

    #[test]
    fn empty_update_is_detected() {
        let update = UpdateWorkOrder {
            code: None,
            description: None,
            client: None,
            status: None,
            start_date: None,
            end_date: None,
            budget: None,
        };
        assert!(update.is_empty());
    }
}
