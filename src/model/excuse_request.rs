use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::leave_request::ApprovalStatus;

/// One dispen row. Same shape as izin minus the kind; dispen never writes an
/// attendance row on filing — it only counts after staff approval.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ExcuseRequest {
    pub id: u64,
    pub siswa_id: u64,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub deskripsi: String,
    pub image_id: Option<u64>,
    #[schema(example = "pending", value_type = String)]
    pub status: ApprovalStatus,
}

#[derive(Debug, Clone)]
pub struct NewExcuseRequest {
    pub siswa_id: u64,
    pub date: NaiveDate,
    pub deskripsi: String,
    pub image_id: Option<u64>,
}
