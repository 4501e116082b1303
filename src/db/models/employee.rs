use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;

/// A person eligible for assignment to tasks and shifts. The optional
/// `user_id` links the employee to an account in the external auth system;
/// leave requests are looked up through that account.
#[derive(Debug, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub user_id: Option<i32>,
    pub role: Option<String>,
    #[schema(value_type = Option<Vec<String>>)]
    pub skills: Option<Json<Vec<String>>>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub user_id: Option<i32>,
    pub role: Option<String>,
    pub skills: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployee {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub user_id: Option<i32>,
    pub role: Option<String>,
    pub skills: Option<Vec<String>>,
}

impl UpdateEmployee {
    /// Returns `true` if all fields are `None`.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.user_id.is_none()
            && self.role.is_none()
            && self.skills.is_none()
    }
}

/// Projection attached to assignment and shift read models.
#[derive(Debug, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummary {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}
