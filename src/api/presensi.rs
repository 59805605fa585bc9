use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::core::clock::{Clock, SystemClock};
use crate::core::error::PresensiError;
use crate::core::policy::AttendancePolicy;
use crate::core::state_machine::{AttendanceService, TapOutcome};
use crate::store::RosterStore;
use crate::store::mysql::MySqlStore;

#[derive(Deserialize, ToSchema)]
pub struct TapRequest {
    #[schema(example = "04:A3:2F:1B")]
    pub rfid_tag: String,
}

fn tap_response(outcome: TapOutcome) -> HttpResponse {
    match outcome {
        TapOutcome::Datang(record) => HttpResponse::Ok().json(serde_json::json!({
            "status": "datang",
            "message": "Checked in",
            "data": record
        })),
        TapOutcome::Pulang(record) => HttpResponse::Created().json(serde_json::json!({
            "status": "pulang",
            "message": "Checked out",
            "data": record
        })),
    }
}

/// Check-in/check-out toggle for one student
#[utoipa::path(
    post,
    path = "/api/presensi/{siswa_id}",
    params(
        ("siswa_id" = u64, Path, description = "Student to record attendance for")
    ),
    responses(
        (status = 200, description = "Checked in", body = Object, example = json!({
            "status": "datang", "message": "Checked in"
        })),
        (status = 201, description = "Checked out", body = Object, example = json!({
            "status": "pulang", "message": "Checked out"
        })),
        (status = 422, description = "Rejected by attendance rules", body = Object, example = json!({
            "error": "too_early", "message": "Not yet time to check out"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Presensi"
)]
pub async fn presensi(
    store: web::Data<MySqlStore>,
    policy: web::Data<AttendancePolicy>,
    clock: web::Data<SystemClock>,
    path: web::Path<u64>,
) -> Result<HttpResponse, PresensiError> {
    let siswa_id = path.into_inner();
    let service = AttendanceService::new(store.get_ref(), *policy.get_ref());

    let outcome = service.tap(siswa_id, clock.now_utc()).await?;
    Ok(tap_response(outcome))
}

/// Check-in/check-out via RFID tap
#[utoipa::path(
    post,
    path = "/api/presensi/tap",
    request_body = TapRequest,
    responses(
        (status = 200, description = "Checked in"),
        (status = 201, description = "Checked out"),
        (status = 404, description = "Unknown RFID tag", body = Object, example = json!({
            "error": "not_found", "message": "Data not found"
        })),
        (status = 422, description = "Rejected by attendance rules"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Presensi"
)]
pub async fn tap_rfid(
    store: web::Data<MySqlStore>,
    policy: web::Data<AttendancePolicy>,
    clock: web::Data<SystemClock>,
    payload: web::Json<TapRequest>,
) -> Result<HttpResponse, PresensiError> {
    // the store stays the source of truth for tag membership; nothing is
    // cached across taps
    let Some(student) = store.find_by_tag(&payload.rfid_tag).await? else {
        return Err(PresensiError::NotFound);
    };

    let service = AttendanceService::new(store.get_ref(), *policy.get_ref());
    let outcome = service.tap(student.id, clock.now_utc()).await?;
    Ok(tap_response(outcome))
}

/// Today's attendance status for one student
#[utoipa::path(
    get,
    path = "/api/presensi/{siswa_id}/status",
    params(
        ("siswa_id" = u64, Path, description = "Student to query")
    ),
    responses(
        (status = 200, description = "Projection of today's record", body = Object, example = json!({
            "status": "checked_in"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Presensi"
)]
pub async fn today_status(
    store: web::Data<MySqlStore>,
    policy: web::Data<AttendancePolicy>,
    clock: web::Data<SystemClock>,
    path: web::Path<u64>,
) -> Result<HttpResponse, PresensiError> {
    let siswa_id = path.into_inner();
    let today = policy.civil_date(clock.now_utc());
    let service = AttendanceService::new(store.get_ref(), *policy.get_ref());

    let status = service.today_status(siswa_id, today).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": status })))
}
