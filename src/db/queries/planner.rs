use std::cmp::Ordering;
use std::collections::HashSet;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, QueryBuilder};
use utoipa::ToSchema;

use crate::db::models::employee::EmployeeSummary;
use crate::db::models::leave_request::LeaveRequest;
use crate::db::models::shift::{ShiftDetail, ShiftDetailRow};
use crate::db::models::task::TaskSummary;
use crate::db::models::work_order::WorkOrderSummary;
use crate::db::queries::employee::fetch_employee;
use crate::db::queries::shift::SHIFT_DETAIL_SELECT;
use crate::db::queries::task::fetch_task;
use crate::utils::api_response::ApiResponse;
use crate::utils::error::PlannerError;

// ---------------------------------------------------------------------------
// Pure planning logic
// ---------------------------------------------------------------------------

/// An employee is available unless one of their leave requests blocks the
/// date. Requests that are not approved never block.
pub(crate) fn is_available_on(requests: &[LeaveRequest], date: NaiveDate) -> bool {
    !requests.iter().any(|r| r.blocks(date))
}

/// Share of a task's required headcount covered by distinct assignees,
/// capped at 100. A headcount below 1 is treated as 1; the raw count may
/// exceed the headcount, the reported figure never does.
pub(crate) fn utilization_percent(distinct_assignees: i64, required_resources: i32) -> f64 {
    let required = required_resources.max(1) as f64;
    (distinct_assignees as f64 / required * 100.0).min(100.0)
}

/// Counts employees whose linked user account is not on leave; employees
/// without a linked account are always counted as available.
pub(crate) fn count_available(user_links: &[Option<i32>], on_leave: &HashSet<i32>) -> usize {
    user_links
        .iter()
        .filter(|link| match link {
            Some(user_id) => !on_leave.contains(user_id),
            None => true,
        })
        .count()
}

/// One shift on the daily board, stripped of the group-level work order.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayShift {
    pub id: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub role: Option<String>,
    pub location: Option<String>,
    pub employee: EmployeeSummary,
    pub task: Option<TaskSummary>,
}

impl From<ShiftDetail> for DayShift {
    fn from(shift: ShiftDetail) -> Self {
        DayShift {
            id: shift.id,
            start_time: shift.start_time,
            end_time: shift.end_time,
            role: shift.role,
            location: shift.location,
            employee: shift.employee,
            task: shift.task,
        }
    }
}

/// Same-day shifts bucketed under their work order; shifts with no work
/// order land in a trailing unassigned bucket (`workOrder: null`).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayBoardGroup {
    pub work_order: Option<WorkOrderSummary>,
    pub shifts: Vec<DayShift>,
}

/// Groups one day's shifts by work order, ordered by work order code with
/// the unassigned bucket last; within a bucket shifts run by start time.
pub(crate) fn group_shifts_for_day(mut shifts: Vec<ShiftDetail>) -> Vec<DayBoardGroup> {
    shifts.sort_by(|a, b| {
        let a_code = a.work_order.as_ref().map(|w| w.code.as_str());
        let b_code = b.work_order.as_ref().map(|w| w.code.as_str());
        match (a_code, b_code) {
            (Some(a_code), Some(b_code)) => a_code
                .cmp(b_code)
                .then(a.start_time.cmp(&b.start_time)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.start_time.cmp(&b.start_time),
        }
    });

    let mut groups: Vec<DayBoardGroup> = Vec::new();
    for mut shift in shifts {
        let key = shift.work_order.as_ref().map(|w| w.id);
        let same_bucket = groups
            .last()
            .is_some_and(|g| g.work_order.as_ref().map(|w| w.id) == key);

        if same_bucket {
            if let Some(group) = groups.last_mut() {
                group.shifts.push(DayShift::from(shift));
            }
        } else {
            let work_order = shift.work_order.take();
            groups.push(DayBoardGroup {
                work_order,
                shifts: vec![DayShift::from(shift)],
            });
        }
    }
    groups
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub employee_id: i32,
    pub date: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub employee_id: i32,
    pub date: NaiveDate,
    pub available: bool,
}

/// Whether an employee is available on a date.
///
/// Availability is recomputed from the store on every call: leave approvals
/// can change between requests, so nothing is cached.
#[utoipa::path(
    get,
    path = "/planner/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Availability computed", body = AvailabilityResponse),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Failed to compute availability")
    ),
    tag = "Planner"
)]
pub async fn check_availability(
    State(pool): State<PgPool>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<ApiResponse<AvailabilityResponse>, PlannerError> {
    let employee = fetch_employee(&pool, query.employee_id)
        .await?
        .ok_or_else(|| PlannerError::not_found("Employee", query.employee_id))?;

    // No linked account means no leave data to check.
    let available = match employee.user_id {
        None => true,
        Some(user_id) => {
            let requests = sqlx::query_as::<_, LeaveRequest>(
                "SELECT id, user_id, request_type, start_date, end_date, note, status, created_at \
                 FROM leave_requests WHERE user_id = $1 AND status = 'approved'",
            )
            .bind(user_id)
            .fetch_all(&pool)
            .await?;

            is_available_on(&requests, query.date)
        }
    };

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Availability computed successfully",
        AvailabilityResponse {
            employee_id: query.employee_id,
            date: query.date,
            available,
        },
    ))
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct AvailabilitySummaryQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySummary {
    pub date: NaiveDate,
    pub total_employees: i64,
    pub available_employees: i64,
    pub percent_available: f64,
}

/// Workforce-wide availability for a date: how many employees are free and
/// the resulting percentage (the daily dashboard headline)
#[utoipa::path(
    get,
    path = "/planner/availability/summary",
    params(AvailabilitySummaryQuery),
    responses(
        (status = 200, description = "Availability summary computed", body = AvailabilitySummary),
        (status = 500, description = "Failed to compute availability summary")
    ),
    tag = "Planner"
)]
pub async fn availability_summary(
    State(pool): State<PgPool>,
    Query(query): Query<AvailabilitySummaryQuery>,
) -> Result<ApiResponse<AvailabilitySummary>, PlannerError> {
    let user_links = sqlx::query_scalar::<_, Option<i32>>("SELECT user_id FROM employees")
        .fetch_all(&pool)
        .await?;

    let on_leave: HashSet<i32> = sqlx::query_scalar::<_, i32>(
        "SELECT user_id FROM leave_requests \
         WHERE status = 'approved' AND start_date <= $1 AND end_date >= $1",
    )
    .bind(query.date)
    .fetch_all(&pool)
    .await?
    .into_iter()
    .collect();

    let total = user_links.len();
    let available = count_available(&user_links, &on_leave);
    let percent_available = if total > 0 {
        available as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Availability summary computed successfully",
        AvailabilitySummary {
            date: query.date,
            total_employees: total as i64,
            available_employees: available as i64,
            percent_available,
        },
    ))
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskStaffing {
    pub task_id: i32,
    pub required_resources: i32,
    pub assigned_employees: i64,
    pub percent_staffed: f64,
}

/// Staffing level for a task: distinct assigned employees against the
/// required headcount, capped at 100%
#[utoipa::path(
    get,
    path = "/tasks/{id}/staffing",
    params(("id" = i32, Path, description = "ID of the task")),
    responses(
        (status = 200, description = "Staffing computed", body = TaskStaffing),
        (status = 404, description = "Task not found"),
        (status = 500, description = "Failed to compute staffing")
    ),
    tag = "Planner"
)]
pub async fn task_staffing(
    State(pool): State<PgPool>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<TaskStaffing>, PlannerError> {
    let task = fetch_task(&pool, id)
        .await?
        .ok_or_else(|| PlannerError::not_found("Task", id))?;

    // Deduplicated in the query rather than assumed unique: the pair
    // constraint holds today, but historical data may predate it.
    let assigned_employees = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(DISTINCT employee_id) FROM assignments WHERE task_id = $1",
    )
    .bind(id)
    .fetch_one(&pool)
    .await?;

    let percent_staffed = utilization_percent(assigned_employees, task.required_resources);

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Staffing computed successfully",
        TaskStaffing {
            task_id: id,
            required_resources: task.required_resources,
            assigned_employees,
            percent_staffed,
        },
    ))
}

/// The daily board: all shifts on a date grouped under their work order,
/// ordered by work order code with unassigned shifts last
#[utoipa::path(
    get,
    path = "/planner/day/{date}",
    params(("date" = String, Path, description = "Calendar date (YYYY-MM-DD)")),
    responses(
        (status = 200, description = "Daily board computed", body = Vec<DayBoardGroup>),
        (status = 500, description = "Failed to compute daily board")
    ),
    tag = "Planner"
)]
pub async fn day_board(
    State(pool): State<PgPool>,
    Path(date): Path<NaiveDate>,
) -> Result<ApiResponse<Vec<DayBoardGroup>>, PlannerError> {
    let mut query_builder = QueryBuilder::new(SHIFT_DETAIL_SELECT);
    query_builder.push(" AND s.date = ").push_bind(date);
    query_builder.push(" ORDER BY w.code ASC NULLS LAST, s.start_time ASC");

    let rows = query_builder
        .build_query_as::<ShiftDetailRow>()
        .fetch_all(&pool)
        .await?;

    let shifts: Vec<ShiftDetail> = rows.into_iter().map(ShiftDetail::from).collect();
    let groups = group_shifts_for_day(shifts);

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Daily board computed successfully",
        groups,
    ))
}

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        check_availability,
        availability_summary,
        task_staffing,
        day_board
    ),
    components(schemas(
        AvailabilityResponse,
        AvailabilitySummary,
        TaskStaffing,
        DayBoardGroup,
        DayShift
    )),
    tags(
        (name = "Planner", description = "Availability, staffing and daily board views")
    )
)]
pub struct PlannerDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::leave_request::{LeaveStatus, LeaveType};
    use crate::db::models::task::TaskStatus;
    use crate::db::models::work_order::WorkOrderStatus;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn leave(status: LeaveStatus, start: &str, end: &str) -> LeaveRequest {
        LeaveRequest {
            id: 1,
            user_id: 42,
            request_type: LeaveType::Vacation,
            start_date: date(start),
            end_date: date(end),
            note: None,
            status,
            created_at: None,
        }
    }

    #[test]
    fn employee_is_unavailable_inside_an_approved_leave() {
        let requests = vec![leave(LeaveStatus::Approved, "2025-05-10", "2025-05-15")];
        assert!(!is_available_on(&requests, date("2025-05-12")));
        assert!(is_available_on(&requests, date("2025-05-16")));
    }

    #[test]
    fn pending_and_rejected_leaves_leave_the_employee_available() {
        let requests = vec![
            leave(LeaveStatus::Pending, "2025-05-10", "2025-05-15"),
            leave(LeaveStatus::Rejected, "2025-05-10", "2025-05-15"),
        ];
        assert!(is_available_on(&requests, date("2025-05-12")));
    }

    #[test]
    fn no_requests_means_available() {
        assert!(is_available_on(&[], date("2025-05-12")));
    }

    #[test]
    fn unstaffed_task_reports_zero() {
        assert_eq!(utilization_percent(0, 2), 0.0);
    }

    #[test]
    fn fully_staffed_task_reports_one_hundred() {
        assert_eq!(utilization_percent(2, 2), 100.0);
    }

    #[test]
    fn partially_staffed_task_reports_the_share() {
        assert_eq!(utilization_percent(1, 2), 50.0);
        assert_eq!(utilization_percent(1, 4), 25.0);
    }

    #[test]
    fn overstaffing_is_capped_at_one_hundred() {
        assert_eq!(utilization_percent(5, 2), 100.0);
    }

    #[test]
    fn zero_headcount_is_treated_as_one() {
        assert_eq!(utilization_percent(0, 0), 0.0);
        assert_eq!(utilization_percent(1, 0), 100.0);
        assert_eq!(utilization_percent(3, -2), 100.0);
    }

    #[test]
    fn unlinked_employees_always_count_as_available() {
        let on_leave: HashSet<i32> = [7].into_iter().collect();
        let links = vec![None, Some(7), Some(8)];
        assert_eq!(count_available(&links, &on_leave), 2);
    }

    fn board_shift(id: i32, work_order: Option<(i32, &str)>, start: &str) -> ShiftDetail {
        ShiftDetail {
            id,
            date: date("2025-05-12"),
            start_time: start.parse().unwrap(),
            end_time: "23:00:00".parse().unwrap(),
            role: None,
            location: None,
            note: None,
            employee: EmployeeSummary {
                id: 1,
                first_name: "Anna".to_string(),
                last_name: "Bianchi".to_string(),
                email: "anna.bianchi@example.com".to_string(),
            },
            work_order: work_order.map(|(wo_id, code)| WorkOrderSummary {
                id: wo_id,
                code: code.to_string(),
                description: "desc".to_string(),
                client: "client".to_string(),
                status: WorkOrderStatus::Active,
            }),
            task: Some(TaskSummary {
                id: 1,
                name: "survey".to_string(),
                status: TaskStatus::Active,
                required_resources: 1,
                start_date: None,
                end_date: None,
            }),
        }
    }

    #[test]
    fn day_board_groups_by_work_order_code_with_unassigned_last() {
        let shifts = vec![
            board_shift(1, None, "09:00:00"),
            board_shift(2, Some((20, "WO-2")), "08:00:00"),
            board_shift(3, Some((10, "WO-1")), "10:00:00"),
            board_shift(4, Some((20, "WO-2")), "06:00:00"),
        ];

        let groups = group_shifts_for_day(shifts);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].work_order.as_ref().unwrap().code, "WO-1");
        assert_eq!(groups[1].work_order.as_ref().unwrap().code, "WO-2");
        assert!(groups[2].work_order.is_none());

        // Within a bucket shifts run by start time.
        let wo2_ids: Vec<i32> = groups[1].shifts.iter().map(|s| s.id).collect();
        assert_eq!(wo2_ids, vec![4, 2]);
    }

    #[test]
    fn day_board_of_no_shifts_is_empty() {
        assert!(group_shifts_for_day(Vec::new()).is_empty());
    }
}
