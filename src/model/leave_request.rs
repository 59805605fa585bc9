use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// jenis_izin column values.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
    sqlx::Type, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum LeaveKind {
    Izin,
    Sakit,
}

impl LeaveKind {
    pub fn attendance_status(self) -> crate::model::attendance::AttendanceStatus {
        match self {
            LeaveKind::Izin => crate::model::attendance::AttendanceStatus::Izin,
            LeaveKind::Sakit => crate::model::attendance::AttendanceStatus::Sakit,
        }
    }
}

/// Approval lifecycle shared by izin and dispen requests.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
    sqlx::Type, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

/// One izin row. Unique key: (siswa_id, date).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequest {
    pub id: u64,
    pub siswa_id: u64,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "sakit", value_type = String)]
    pub kind: LeaveKind,
    pub deskripsi: String,
    /// Reference into the image store; upload handling is not this service's job.
    pub image_id: Option<u64>,
    #[schema(example = "pending", value_type = String)]
    pub status: ApprovalStatus,
}

#[derive(Debug, Clone)]
pub struct NewLeaveRequest {
    pub siswa_id: u64,
    pub date: NaiveDate,
    pub kind: LeaveKind,
    pub deskripsi: String,
    pub image_id: Option<u64>,
}
