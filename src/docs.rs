use crate::api::dispen::CreateDispen;
use crate::api::izin::CreateIzin;
use crate::api::presensi::TapRequest;
use crate::core::reconcile::ClassSummary;
use crate::model::attendance::{Attendance, AttendanceStatus, TodayStatus};
use crate::model::excuse_request::ExcuseRequest;
use crate::model::leave_request::{ApprovalStatus, LeaveKind, LeaveRequest};
use crate::model::student::Student;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Presensi Sekolah API",
        version = "1.0.0",
        description = r#"
## School Attendance (Presensi) Service

Daily student attendance over a fixed civil timezone.

### 🔹 Key Features
- **Presensi**
  - Check-in before/after the 07:00 deadline (hadir/telat), check-out from 15:00
  - RFID tap support for attendance terminals
- **Izin & Sakit**
  - One leave request per student per day, with staff approval
- **Dispen**
  - Excuse requests that only count after staff approval
- **Rekap**
  - Per-class daily summary with alpha back-fill after the cutoff

### 📦 Response Format
- JSON-based RESTful responses
- Stable machine-readable error kinds next to human messages

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::presensi::presensi,
        crate::api::presensi::tap_rfid,
        crate::api::presensi::today_status,

        crate::api::izin::create_izin,
        crate::api::izin::approve_izin,
        crate::api::izin::reject_izin,

        crate::api::dispen::create_dispen,
        crate::api::dispen::approve_dispen,
        crate::api::dispen::reject_dispen,

        crate::api::rekap::class_summary
    ),
    components(
        schemas(
            Attendance,
            AttendanceStatus,
            TodayStatus,
            Student,
            LeaveRequest,
            LeaveKind,
            ApprovalStatus,
            ExcuseRequest,
            CreateIzin,
            CreateDispen,
            TapRequest,
            ClassSummary
        )
    ),
    tags(
        (name = "Presensi", description = "Check-in / check-out APIs"),
        (name = "Izin", description = "Leave request APIs"),
        (name = "Dispen", description = "Excuse request APIs"),
        (name = "Rekap", description = "Class summary and reconciliation APIs"),
    )
)]
pub struct ApiDoc;
