use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::core::clock::{Clock, SystemClock};
use crate::core::error::PresensiError;
use crate::core::policy::AttendancePolicy;
use crate::core::reconcile::reconcile_class;
use crate::store::mysql::MySqlStore;

#[derive(Deserialize, IntoParams)]
pub struct RekapQuery {
    /// Day to summarize; defaults to the current civil date
    #[param(example = "2026-01-01", value_type = Option<String>)]
    pub date: Option<NaiveDate>,
}

/// Class attendance summary; runs the reconciliation pass when the day is past
/// the check-out cutoff
#[utoipa::path(
    get,
    path = "/api/rekap/{kelas_id}",
    params(
        ("kelas_id" = u64, Path, description = "Class to summarize"),
        RekapQuery
    ),
    responses(
        (status = 200, description = "Reconciled records and per-status counts",
         body = crate::core::reconcile::ClassSummary),
        (status = 404, description = "No students in this class", body = Object, example = json!({
            "error": "roster_empty", "message": "No students enrolled in this class"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Rekap"
)]
pub async fn class_summary(
    store: web::Data<MySqlStore>,
    policy: web::Data<AttendancePolicy>,
    clock: web::Data<SystemClock>,
    path: web::Path<u64>,
    query: web::Query<RekapQuery>,
) -> Result<HttpResponse, PresensiError> {
    let kelas_id = path.into_inner();
    let now = clock.now_utc();
    let date = query.date.unwrap_or_else(|| policy.civil_date(now));

    let summary = reconcile_class(store.get_ref(), policy.get_ref(), kelas_id, date, now).await?;
    Ok(HttpResponse::Ok().json(summary))
}
