use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::core::clock::{Clock, SystemClock};
use crate::core::error::PresensiError;
use crate::core::policy::AttendancePolicy;
use crate::core::state_machine::AttendanceService;
use crate::model::leave_request::{LeaveKind, NewLeaveRequest};
use crate::store::mysql::MySqlStore;

#[derive(Deserialize, ToSchema)]
pub struct CreateIzin {
    #[schema(example = 42)]
    pub siswa_id: u64,
    #[schema(example = "sakit")]
    pub kind: LeaveKind,
    #[schema(example = "demam sejak semalam")]
    pub deskripsi: String,
    /// Reference to the already-uploaded supporting image
    pub image_id: Option<u64>,
    /// Defaults to the current civil date
    #[schema(example = "2026-01-01", format = "date", value_type = Option<String>)]
    pub date: Option<NaiveDate>,
}

/// File an izin/sakit request
#[utoipa::path(
    post,
    path = "/api/izin",
    request_body = CreateIzin,
    responses(
        (status = 200, description = "Request filed, pending approval", body = Object, example = json!({
            "message": "Leave request submitted", "status": "pending"
        })),
        (status = 400, description = "Already filed or already recorded today", body = Object, example = json!({
            "error": "duplicate_leave_request",
            "message": "A request was already filed for this day"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Izin"
)]
pub async fn create_izin(
    store: web::Data<MySqlStore>,
    policy: web::Data<AttendancePolicy>,
    clock: web::Data<SystemClock>,
    payload: web::Json<CreateIzin>,
) -> Result<HttpResponse, PresensiError> {
    let payload = payload.into_inner();
    let date = payload
        .date
        .unwrap_or_else(|| policy.civil_date(clock.now_utc()));

    let service = AttendanceService::new(store.get_ref(), *policy.get_ref());
    let request = service
        .file_leave(NewLeaveRequest {
            siswa_id: payload.siswa_id,
            date,
            kind: payload.kind,
            deskripsi: payload.deskripsi,
            image_id: payload.image_id,
        })
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave request submitted",
        "status": "pending",
        "data": request
    })))
}

/// Approve an izin request (staff)
#[utoipa::path(
    put,
    path = "/api/izin/{id}/approve",
    params(
        ("id" = u64, Path, description = "ID of the izin request to approve")
    ),
    responses(
        (status = 200, description = "Request approved", body = Object, example = json!({
            "message": "Leave approved"
        })),
        (status = 404, description = "Request not found"),
        (status = 422, description = "Already approved or rejected", body = Object, example = json!({
            "error": "already_approved", "message": "Request is already approved"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Izin"
)]
pub async fn approve_izin(
    store: web::Data<MySqlStore>,
    policy: web::Data<AttendancePolicy>,
    path: web::Path<u64>,
) -> Result<HttpResponse, PresensiError> {
    let service = AttendanceService::new(store.get_ref(), *policy.get_ref());
    let request = service.approve_leave(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave approved",
        "data": request
    })))
}

/// Reject an izin request (staff)
#[utoipa::path(
    put,
    path = "/api/izin/{id}/reject",
    params(
        ("id" = u64, Path, description = "ID of the izin request to reject")
    ),
    responses(
        (status = 200, description = "Request rejected", body = Object, example = json!({
            "message": "Leave rejected"
        })),
        (status = 404, description = "Request not found"),
        (status = 422, description = "Not pending anymore"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Izin"
)]
pub async fn reject_izin(
    store: web::Data<MySqlStore>,
    policy: web::Data<AttendancePolicy>,
    path: web::Path<u64>,
) -> Result<HttpResponse, PresensiError> {
    let service = AttendanceService::new(store.get_ref(), *policy.get_ref());
    let request = service.reject_leave(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave rejected",
        "data": request
    })))
}
