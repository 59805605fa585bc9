use chrono::{DateTime, NaiveDate, Utc};

use crate::core::error::PresensiError;
use crate::core::policy::AttendancePolicy;
use crate::model::attendance::{Attendance, NewAttendance, TodayStatus};
use crate::model::excuse_request::{ExcuseRequest, NewExcuseRequest};
use crate::model::leave_request::{ApprovalStatus, LeaveRequest, NewLeaveRequest};
use crate::store::{AttendanceStore, FileLeaveError, RequestStore, StoreError};

/// Outcome of the check-in/check-out toggle, named after the original
/// datang/pulang flow.
#[derive(Debug)]
pub enum TapOutcome {
    Datang(Attendance),
    Pulang(Attendance),
}

/// Per-student-per-day attendance state machine. All transitions run through
/// here; handlers only translate transport.
pub struct AttendanceService<'a, S> {
    store: &'a S,
    policy: AttendancePolicy,
}

impl<'a, S> AttendanceService<'a, S>
where
    S: AttendanceStore + RequestStore,
{
    pub fn new(store: &'a S, policy: AttendancePolicy) -> Self {
        Self { store, policy }
    }

    /// NoRecord → Hadir/Telat. The civil date of `at` decides which day the
    /// record belongs to; the 07:00 deadline decides the status.
    pub async fn check_in(
        &self,
        siswa_id: u64,
        at: DateTime<Utc>,
    ) -> Result<Attendance, PresensiError> {
        let civil = self.policy.to_civil(at);
        let date = civil.date();

        if let Some(existing) = self
            .store
            .find_for_day(siswa_id, date)
            .await?
        {
            // excused days and closed days are terminal
            return Err(
                if existing.check_out.is_some() || existing.status.is_excused() {
                    PresensiError::AlreadyCheckedOut
                } else {
                    PresensiError::AlreadyCheckedIn
                },
            );
        }

        let status = self.policy.classify_check_in(at);
        match self
            .store
            .insert(NewAttendance {
                siswa_id,
                date,
                status,
                check_in: Some(civil),
            })
            .await
        {
            Ok(record) => {
                tracing::info!(siswa_id, %date, %status, "check-in recorded");
                Ok(record)
            }
            // lost a same-day race; the winner's record stands
            Err(StoreError::Duplicate) => Err(PresensiError::AlreadyCheckedIn),
            Err(StoreError::Backend(e)) => Err(PresensiError::Internal(e)),
        }
    }

    /// Hadir/Telat → closed day. Only open at/after 15:00; status is kept.
    pub async fn check_out(
        &self,
        siswa_id: u64,
        at: DateTime<Utc>,
    ) -> Result<Attendance, PresensiError> {
        let civil = self.policy.to_civil(at);
        let date = civil.date();

        let Some(existing) = self
            .store
            .find_for_day(siswa_id, date)
            .await?
        else {
            return Err(PresensiError::NoRecordYet);
        };

        if existing.status.is_excused() {
            return Err(PresensiError::InvalidStatus);
        }
        if existing.check_out.is_some() {
            return Err(PresensiError::AlreadyCheckedOut);
        }
        if existing.check_in.is_none() {
            // alpha back-fill row; the student never checked in
            return Err(PresensiError::NoRecordYet);
        }
        if !self.policy.check_out_open(at) {
            return Err(PresensiError::TooEarly);
        }

        let updated = self
            .store
            .set_check_out(existing.id, civil)
            .await?;
        if !updated {
            // lost the write race to a concurrent check-out; the winner's
            // timestamp stands
            return Err(PresensiError::AlreadyCheckedOut);
        }
        tracing::info!(siswa_id, %date, "check-out recorded");

        Ok(Attendance {
            check_out: Some(civil),
            ..existing
        })
    }

    /// One call for the attendance terminal: first event of the day checks in,
    /// the next one attempts check-out.
    pub async fn tap(
        &self,
        siswa_id: u64,
        at: DateTime<Utc>,
    ) -> Result<TapOutcome, PresensiError> {
        let date = self.policy.civil_date(at);
        let existing = self
            .store
            .find_for_day(siswa_id, date)
            .await?;

        match existing {
            None => self.check_in(siswa_id, at).await.map(TapOutcome::Datang),
            Some(_) => self.check_out(siswa_id, at).await.map(TapOutcome::Pulang),
        }
    }

    /// File an izin/sakit request: pending request plus an excused attendance
    /// row, atomically. A day that already has any attendance row is not
    /// silently double-recorded.
    pub async fn file_leave(&self, new: NewLeaveRequest) -> Result<LeaveRequest, PresensiError> {
        match self.store.file_izin(new).await {
            Ok(request) => {
                tracing::info!(
                    siswa_id = request.siswa_id,
                    date = %request.date,
                    kind = %request.kind,
                    "leave request filed"
                );
                Ok(request)
            }
            Err(FileLeaveError::DuplicateRequest) => Err(PresensiError::DuplicateLeaveRequest),
            Err(FileLeaveError::DuplicateAttendance) => Err(PresensiError::DuplicateDailyRecord),
            Err(FileLeaveError::Backend(e)) => Err(PresensiError::Internal(e)),
        }
    }

    /// File a dispen request. No attendance row until staff approve it.
    pub async fn file_excuse(
        &self,
        new: NewExcuseRequest,
    ) -> Result<ExcuseRequest, PresensiError> {
        match self.store.insert_dispen(new).await {
            Ok(request) => {
                tracing::info!(
                    siswa_id = request.siswa_id,
                    date = %request.date,
                    "dispen request filed"
                );
                Ok(request)
            }
            Err(StoreError::Duplicate) => Err(PresensiError::DuplicateLeaveRequest),
            Err(StoreError::Backend(e)) => Err(PresensiError::Internal(e)),
        }
    }

    pub async fn approve_leave(&self, id: u64) -> Result<LeaveRequest, PresensiError> {
        // existence before status, always
        let Some(request) = self.store.get_izin(id).await? else {
            return Err(PresensiError::NotFound);
        };
        match request.status {
            ApprovalStatus::Pending => {}
            ApprovalStatus::Approved => return Err(PresensiError::AlreadyApproved),
            ApprovalStatus::Rejected => return Err(PresensiError::InvalidStatus),
        }

        let updated = self
            .store
            .set_izin_status(id, ApprovalStatus::Pending, ApprovalStatus::Approved)
            .await?;
        if !updated {
            return Err(PresensiError::AlreadyApproved);
        }

        Ok(LeaveRequest {
            status: ApprovalStatus::Approved,
            ..request
        })
    }

    pub async fn reject_leave(&self, id: u64) -> Result<LeaveRequest, PresensiError> {
        let Some(request) = self.store.get_izin(id).await? else {
            return Err(PresensiError::NotFound);
        };
        if request.status != ApprovalStatus::Pending {
            return Err(PresensiError::InvalidStatus);
        }

        let updated = self
            .store
            .set_izin_status(id, ApprovalStatus::Pending, ApprovalStatus::Rejected)
            .await?;
        if !updated {
            return Err(PresensiError::InvalidStatus);
        }

        Ok(LeaveRequest {
            status: ApprovalStatus::Rejected,
            ..request
        })
    }

    pub async fn approve_excuse(&self, id: u64) -> Result<ExcuseRequest, PresensiError> {
        let Some(request) = self.store.get_dispen(id).await? else {
            return Err(PresensiError::NotFound);
        };
        match request.status {
            ApprovalStatus::Pending => {}
            ApprovalStatus::Approved => return Err(PresensiError::AlreadyApproved),
            ApprovalStatus::Rejected => return Err(PresensiError::InvalidStatus),
        }

        let updated = self
            .store
            .set_dispen_status(id, ApprovalStatus::Pending, ApprovalStatus::Approved)
            .await?;
        if !updated {
            return Err(PresensiError::AlreadyApproved);
        }

        // approval is what puts dispen into the attendance stats
        match self
            .store
            .insert(NewAttendance {
                siswa_id: request.siswa_id,
                date: request.date,
                status: crate::model::attendance::AttendanceStatus::Dispen,
                check_in: None,
            })
            .await
        {
            Ok(_) => {}
            // the day already has a record (e.g. the student checked in);
            // the approval stands, the existing record wins
            Err(StoreError::Duplicate) => {
                tracing::warn!(
                    siswa_id = request.siswa_id,
                    date = %request.date,
                    "dispen approved but an attendance record already exists"
                );
            }
            Err(StoreError::Backend(e)) => return Err(PresensiError::Internal(e)),
        }

        Ok(ExcuseRequest {
            status: ApprovalStatus::Approved,
            ..request
        })
    }

    pub async fn reject_excuse(&self, id: u64) -> Result<ExcuseRequest, PresensiError> {
        let Some(request) = self.store.get_dispen(id).await? else {
            return Err(PresensiError::NotFound);
        };
        if request.status != ApprovalStatus::Pending {
            return Err(PresensiError::InvalidStatus);
        }

        let updated = self
            .store
            .set_dispen_status(id, ApprovalStatus::Pending, ApprovalStatus::Rejected)
            .await?;
        if !updated {
            return Err(PresensiError::InvalidStatus);
        }

        Ok(ExcuseRequest {
            status: ApprovalStatus::Rejected,
            ..request
        })
    }

    /// Pure projection of the stored record for one day; no side effects.
    pub async fn today_status(
        &self,
        siswa_id: u64,
        today: NaiveDate,
    ) -> Result<TodayStatus, PresensiError> {
        use crate::model::attendance::AttendanceStatus;

        let record = self
            .store
            .find_for_day(siswa_id, today)
            .await?;

        Ok(match record {
            None => TodayStatus::NotMarked,
            Some(rec) => match rec.status {
                AttendanceStatus::Izin => TodayStatus::OnLeave,
                AttendanceStatus::Sakit => TodayStatus::Sick,
                AttendanceStatus::Dispen => TodayStatus::Excused,
                // a reconciled absence is still unmarked from the student side
                AttendanceStatus::Alpha => TodayStatus::NotMarked,
                AttendanceStatus::Hadir | AttendanceStatus::Telat => {
                    if rec.check_out.is_some() {
                        TodayStatus::CheckedOut
                    } else {
                        TodayStatus::CheckedIn
                    }
                }
            },
        })
    }
}
