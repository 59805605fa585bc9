use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::core::clock::{Clock, SystemClock};
use crate::core::error::PresensiError;
use crate::core::policy::AttendancePolicy;
use crate::core::state_machine::AttendanceService;
use crate::model::excuse_request::NewExcuseRequest;
use crate::store::mysql::MySqlStore;

#[derive(Deserialize, ToSchema)]
pub struct CreateDispen {
    #[schema(example = 42)]
    pub siswa_id: u64,
    #[schema(example = "dispensasi lomba LKS")]
    pub deskripsi: String,
    /// Reference to the already-uploaded supporting image
    pub image_id: Option<u64>,
    /// Defaults to the current civil date
    #[schema(example = "2026-01-01", format = "date", value_type = Option<String>)]
    pub date: Option<NaiveDate>,
}

/// File a dispen request; attendance is only affected after staff approval
#[utoipa::path(
    post,
    path = "/api/dispen",
    request_body = CreateDispen,
    responses(
        (status = 200, description = "Request filed, pending approval", body = Object, example = json!({
            "message": "Dispen request submitted", "status": "pending"
        })),
        (status = 400, description = "Already filed today", body = Object, example = json!({
            "error": "duplicate_leave_request",
            "message": "A request was already filed for this day"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Dispen"
)]
pub async fn create_dispen(
    store: web::Data<MySqlStore>,
    policy: web::Data<AttendancePolicy>,
    clock: web::Data<SystemClock>,
    payload: web::Json<CreateDispen>,
) -> Result<HttpResponse, PresensiError> {
    let payload = payload.into_inner();
    let date = payload
        .date
        .unwrap_or_else(|| policy.civil_date(clock.now_utc()));

    let service = AttendanceService::new(store.get_ref(), *policy.get_ref());
    let request = service
        .file_excuse(NewExcuseRequest {
            siswa_id: payload.siswa_id,
            date,
            deskripsi: payload.deskripsi,
            image_id: payload.image_id,
        })
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Dispen request submitted",
        "status": "pending",
        "data": request
    })))
}

/// Approve a dispen request (staff)
#[utoipa::path(
    put,
    path = "/api/dispen/{id}/approve",
    params(
        ("id" = u64, Path, description = "ID of the dispen request to approve")
    ),
    responses(
        (status = 200, description = "Request approved", body = Object, example = json!({
            "message": "Dispen approved"
        })),
        (status = 404, description = "Request not found"),
        (status = 422, description = "Already approved or rejected"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Dispen"
)]
pub async fn approve_dispen(
    store: web::Data<MySqlStore>,
    policy: web::Data<AttendancePolicy>,
    path: web::Path<u64>,
) -> Result<HttpResponse, PresensiError> {
    let service = AttendanceService::new(store.get_ref(), *policy.get_ref());
    let request = service.approve_excuse(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Dispen approved",
        "data": request
    })))
}

/// Reject a dispen request (staff)
#[utoipa::path(
    put,
    path = "/api/dispen/{id}/reject",
    params(
        ("id" = u64, Path, description = "ID of the dispen request to reject")
    ),
    responses(
        (status = 200, description = "Request rejected", body = Object, example = json!({
            "message": "Dispen rejected"
        })),
        (status = 404, description = "Request not found"),
        (status = 422, description = "Not pending anymore"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Dispen"
)]
pub async fn reject_dispen(
    store: web::Data<MySqlStore>,
    policy: web::Data<AttendancePolicy>,
    path: web::Path<u64>,
) -> Result<HttpResponse, PresensiError> {
    let service = AttendanceService::new(store.get_ref(), *policy.get_ref());
    let request = service.reject_excuse(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Dispen rejected",
        "data": request
    })))
}
