pub mod dispen;
pub mod izin;
pub mod presensi;
pub mod rekap;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;

use crate::core::error::PresensiError;

impl actix_web::ResponseError for PresensiError {
    fn status_code(&self) -> StatusCode {
        match self {
            PresensiError::NotFound | PresensiError::RosterEmpty => StatusCode::NOT_FOUND,
            PresensiError::DuplicateLeaveRequest | PresensiError::DuplicateDailyRecord => {
                StatusCode::BAD_REQUEST
            }
            PresensiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // business-rule rejections
            PresensiError::AlreadyCheckedIn
            | PresensiError::AlreadyCheckedOut
            | PresensiError::NoRecordYet
            | PresensiError::TooEarly
            | PresensiError::AlreadyApproved
            | PresensiError::InvalidStatus => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let PresensiError::Internal(e) = self {
            tracing::error!(error = %e, "request failed");
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.kind(),
            "message": self.to_string(),
        }))
    }
}
