use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Closed set of keterangan values. Stored lowercase in the kehadiran table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    sqlx::Type, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Hadir,
    Telat,
    Alpha,
    Izin,
    Sakit,
    Dispen,
}

impl AttendanceStatus {
    /// Izin/sakit/dispen days never carry check-in/check-out timestamps and
    /// accept no further presence events.
    pub fn is_excused(self) -> bool {
        matches!(self, Self::Izin | Self::Sakit | Self::Dispen)
    }
}

/// One kehadiran row. Unique key: (siswa_id, date).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Attendance {
    pub id: u64,
    pub siswa_id: u64,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "hadir", value_type = String)]
    pub status: AttendanceStatus,
    #[schema(example = "2026-01-01T06:45:00", format = "date-time", value_type = Option<String>)]
    pub check_in: Option<NaiveDateTime>,
    #[schema(example = "2026-01-01T15:05:00", format = "date-time", value_type = Option<String>)]
    pub check_out: Option<NaiveDateTime>,
}

/// Insert payload for a kehadiran row.
#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub siswa_id: u64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub check_in: Option<NaiveDateTime>,
}

/// Read-only projection of a student's day, as shown on the student app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TodayStatus {
    NotMarked,
    CheckedIn,
    CheckedOut,
    OnLeave,
    Sick,
    Excused,
}
