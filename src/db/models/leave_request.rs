use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::string_enum;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
    pub enum LeaveType {
        Vacation => "vacation",
        Permit => "permit",
        Other => "other",
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
    pub enum LeaveStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

impl Default for LeaveStatus {
    fn default() -> Self {
        LeaveStatus::Pending
    }
}

/// A vacation/permit request for a user account. Both interval bounds are
/// inclusive; only approved requests affect availability.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: i32,
    pub user_id: i32,
    pub request_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub note: Option<String>,
    pub status: LeaveStatus,
    pub created_at: Option<NaiveDateTime>,
}

impl LeaveRequest {
    /// Whether this request makes its owner unavailable on `date`.
    pub fn blocks(&self, date: NaiveDate) -> bool {
        self.status == LeaveStatus::Approved
            && self.start_date <= date
            && date <= self.end_date
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewLeaveRequest {
    pub user_id: i32,
    pub request_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub note: Option<String>,
    pub status: Option<LeaveStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeaveRequest {
    pub request_type: Option<LeaveType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub note: Option<String>,
    pub status: Option<LeaveStatus>,
}

impl UpdateLeaveRequest {
    /// Returns `true` if all fields are `None`.
    pub fn is_empty(&self) -> bool {
        self.request_type.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.note.is_none()
            && self.status.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(status: LeaveStatus, start: &str, end: &str) -> LeaveRequest {
        LeaveRequest {
            id: 1,
            user_id: 10,
            request_type: LeaveType::Vacation,
            start_date: start.parse().unwrap(),
            end_date: end.parse().unwrap(),
            note: None,
            status,
            created_at: None,
        }
    }

    #[test]
    fn approved_request_blocks_dates_inside_the_interval() {
        let req = request(LeaveStatus::Approved, "2025-05-10", "2025-05-15");
        assert!(req.blocks("2025-05-12".parse().unwrap()));
    }

    #[test]
    fn interval_bounds_are_inclusive() {
        let req = request(LeaveStatus::Approved, "2025-05-10", "2025-05-15");
        assert!(req.blocks("2025-05-10".parse().unwrap()));
        assert!(req.blocks("2025-05-15".parse().unwrap()));
        assert!(!req.blocks("2025-05-09".parse().unwrap()));
        assert!(!req.blocks("2025-05-16".parse().unwrap()));
    }

    #[test]
    fn pending_and_rejected_requests_never_block() {
        for status in [LeaveStatus::Pending, LeaveStatus::Rejected] {
            let req = request(status, "2025-05-10", "2025-05-15");
            assert!(!req.blocks("2025-05-12".parse().unwrap()));
        }
    }

    #[test]
    fn single_day_request_blocks_only_that_day() {
        let req = request(LeaveStatus::Approved, "2025-05-10", "2025-05-10");
        assert!(req.blocks("2025-05-10".parse().unwrap()));
        assert!(!req.blocks("2025-05-11".parse().unwrap()));
    }
}
