pub mod mysql;

#[cfg(test)]
pub mod memory;

use chrono::{NaiveDate, NaiveDateTime};

use crate::model::attendance::{Attendance, AttendanceStatus, NewAttendance};
use crate::model::excuse_request::{ExcuseRequest, NewExcuseRequest};
use crate::model::leave_request::{ApprovalStatus, LeaveRequest, NewLeaveRequest};
use crate::model::student::Student;

/// Storage outcomes the core cares about. A unique-key conflict on
/// (siswa_id, date) is a race outcome, not a failure.
#[derive(Debug)]
pub enum StoreError {
    Duplicate,
    Backend(anyhow::Error),
}

impl From<StoreError> for crate::core::error::PresensiError {
    fn from(e: StoreError) -> Self {
        match e {
            // duplicates are only meaningful where the caller matches on them
            StoreError::Duplicate => {
                Self::Internal(anyhow::anyhow!("unexpected duplicate key"))
            }
            StoreError::Backend(e) => Self::Internal(e),
        }
    }
}

/// Per-statement outcome of the transactional izin + kehadiran insert, so the
/// caller can tell which daily invariant was violated. Either way nothing is
/// committed.
#[derive(Debug)]
pub enum FileLeaveError {
    DuplicateRequest,
    DuplicateAttendance,
    Backend(anyhow::Error),
}

#[allow(async_fn_in_trait)]
pub trait AttendanceStore {
    async fn find_for_day(
        &self,
        siswa_id: u64,
        date: NaiveDate,
    ) -> Result<Option<Attendance>, StoreError>;

    /// Insert one kehadiran row. The unique key on (siswa_id, date) serializes
    /// concurrent writers; the loser sees `StoreError::Duplicate`.
    async fn insert(&self, new: NewAttendance) -> Result<Attendance, StoreError>;

    /// Conditional write: only lands while check_out is still unset. Returns
    /// false when another writer closed the day first.
    async fn set_check_out(&self, id: u64, at: NaiveDateTime) -> Result<bool, StoreError>;

    async fn set_status(&self, id: u64, status: AttendanceStatus) -> Result<(), StoreError>;

    async fn list_for_day(
        &self,
        siswa_ids: &[u64],
        date: NaiveDate,
    ) -> Result<Vec<Attendance>, StoreError>;
}

#[allow(async_fn_in_trait)]
pub trait RequestStore {
    /// Atomically create a pending izin row plus its companion kehadiran row
    /// (izin/sakit status, no timestamps). Rolls back on either conflict.
    async fn file_izin(&self, new: NewLeaveRequest) -> Result<LeaveRequest, FileLeaveError>;

    async fn get_izin(&self, id: u64) -> Result<Option<LeaveRequest>, StoreError>;

    /// Conditional transition; returns false when the row was not in `from`
    /// anymore (lost race).
    async fn set_izin_status(
        &self,
        id: u64,
        from: ApprovalStatus,
        to: ApprovalStatus,
    ) -> Result<bool, StoreError>;

    async fn insert_dispen(&self, new: NewExcuseRequest) -> Result<ExcuseRequest, StoreError>;

    async fn get_dispen(&self, id: u64) -> Result<Option<ExcuseRequest>, StoreError>;

    async fn set_dispen_status(
        &self,
        id: u64,
        from: ApprovalStatus,
        to: ApprovalStatus,
    ) -> Result<bool, StoreError>;
}

#[allow(async_fn_in_trait)]
pub trait RosterStore {
    /// Enrolled students of a class, in roster order.
    async fn class_roster(&self, kelas_id: u64) -> Result<Vec<Student>, StoreError>;

    async fn find_by_tag(&self, rfid_tag: &str) -> Result<Option<Student>, StoreError>;
}
