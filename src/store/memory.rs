//! In-memory store with the same unique-key semantics as the MySQL schema.
//! Backs the state machine and reconciliation tests.

use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime};

use crate::model::attendance::{Attendance, AttendanceStatus, NewAttendance};
use crate::model::excuse_request::{ExcuseRequest, NewExcuseRequest};
use crate::model::leave_request::{ApprovalStatus, LeaveRequest, NewLeaveRequest};
use crate::model::student::Student;
use crate::store::{AttendanceStore, FileLeaveError, RequestStore, RosterStore, StoreError};

#[derive(Default)]
struct Inner {
    next_id: u64,
    attendance: Vec<Attendance>,
    izin: Vec<LeaveRequest>,
    dispen: Vec<ExcuseRequest>,
    siswa: Vec<Student>,
}

impl Inner {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_student(&self, student: Student) {
        self.inner.lock().unwrap().siswa.push(student);
    }
}

impl AttendanceStore for MemoryStore {
    async fn find_for_day(
        &self,
        siswa_id: u64,
        date: NaiveDate,
    ) -> Result<Option<Attendance>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .attendance
            .iter()
            .find(|r| r.siswa_id == siswa_id && r.date == date)
            .cloned())
    }

    async fn insert(&self, new: NewAttendance) -> Result<Attendance, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner
            .attendance
            .iter()
            .any(|r| r.siswa_id == new.siswa_id && r.date == new.date)
        {
            return Err(StoreError::Duplicate);
        }
        let record = Attendance {
            id: inner.next_id(),
            siswa_id: new.siswa_id,
            date: new.date,
            status: new.status,
            check_in: new.check_in,
            check_out: None,
        };
        inner.attendance.push(record.clone());
        Ok(record)
    }

    async fn set_check_out(&self, id: u64, at: NaiveDateTime) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        match inner
            .attendance
            .iter_mut()
            .find(|r| r.id == id && r.check_out.is_none())
        {
            Some(rec) => {
                rec.check_out = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_status(&self, id: u64, status: AttendanceStatus) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(rec) = inner.attendance.iter_mut().find(|r| r.id == id) {
            rec.status = status;
        }
        Ok(())
    }

    async fn list_for_day(
        &self,
        siswa_ids: &[u64],
        date: NaiveDate,
    ) -> Result<Vec<Attendance>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut records: Vec<Attendance> = inner
            .attendance
            .iter()
            .filter(|r| r.date == date && siswa_ids.contains(&r.siswa_id))
            .cloned()
            .collect();
        records.sort_by_key(|r| r.siswa_id);
        Ok(records)
    }
}

impl RequestStore for MemoryStore {
    async fn file_izin(&self, new: NewLeaveRequest) -> Result<LeaveRequest, FileLeaveError> {
        // one lock covers both inserts, matching the SQL transaction
        let mut inner = self.inner.lock().unwrap();
        if inner
            .izin
            .iter()
            .any(|r| r.siswa_id == new.siswa_id && r.date == new.date)
        {
            return Err(FileLeaveError::DuplicateRequest);
        }
        if inner
            .attendance
            .iter()
            .any(|r| r.siswa_id == new.siswa_id && r.date == new.date)
        {
            return Err(FileLeaveError::DuplicateAttendance);
        }

        let request = LeaveRequest {
            id: inner.next_id(),
            siswa_id: new.siswa_id,
            date: new.date,
            kind: new.kind,
            deskripsi: new.deskripsi,
            image_id: new.image_id,
            status: ApprovalStatus::Pending,
        };
        let companion = Attendance {
            id: inner.next_id(),
            siswa_id: new.siswa_id,
            date: new.date,
            status: new.kind.attendance_status(),
            check_in: None,
            check_out: None,
        };
        inner.izin.push(request.clone());
        inner.attendance.push(companion);
        Ok(request)
    }

    async fn get_izin(&self, id: u64) -> Result<Option<LeaveRequest>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.izin.iter().find(|r| r.id == id).cloned())
    }

    async fn set_izin_status(
        &self,
        id: u64,
        from: ApprovalStatus,
        to: ApprovalStatus,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        match inner
            .izin
            .iter_mut()
            .find(|r| r.id == id && r.status == from)
        {
            Some(rec) => {
                rec.status = to;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn insert_dispen(&self, new: NewExcuseRequest) -> Result<ExcuseRequest, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner
            .dispen
            .iter()
            .any(|r| r.siswa_id == new.siswa_id && r.date == new.date)
        {
            return Err(StoreError::Duplicate);
        }
        let request = ExcuseRequest {
            id: inner.next_id(),
            siswa_id: new.siswa_id,
            date: new.date,
            deskripsi: new.deskripsi,
            image_id: new.image_id,
            status: ApprovalStatus::Pending,
        };
        inner.dispen.push(request.clone());
        Ok(request)
    }

    async fn get_dispen(&self, id: u64) -> Result<Option<ExcuseRequest>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.dispen.iter().find(|r| r.id == id).cloned())
    }

    async fn set_dispen_status(
        &self,
        id: u64,
        from: ApprovalStatus,
        to: ApprovalStatus,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        match inner
            .dispen
            .iter_mut()
            .find(|r| r.id == id && r.status == from)
        {
            Some(rec) => {
                rec.status = to;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl RosterStore for MemoryStore {
    async fn class_roster(&self, kelas_id: u64) -> Result<Vec<Student>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .siswa
            .iter()
            .filter(|s| s.kelas_id == kelas_id)
            .cloned()
            .collect())
    }

    async fn find_by_tag(&self, rfid_tag: &str) -> Result<Option<Student>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .siswa
            .iter()
            .find(|s| s.rfid_tag.as_deref() == Some(rfid_tag))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::AttendanceStatus;

    #[actix_web::test]
    async fn second_insert_for_same_day_conflicts() {
        let store = MemoryStore::new();
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let new = |status| NewAttendance {
            siswa_id: 1,
            date,
            status,
            check_in: None,
        };

        store.insert(new(AttendanceStatus::Hadir)).await.unwrap();
        assert!(matches!(
            store.insert(new(AttendanceStatus::Alpha)).await,
            Err(StoreError::Duplicate)
        ));
    }

    #[actix_web::test]
    async fn first_check_out_write_wins() {
        let store = MemoryStore::new();
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let rec = store
            .insert(NewAttendance {
                siswa_id: 1,
                date,
                status: AttendanceStatus::Hadir,
                check_in: date.and_hms_opt(6, 30, 0),
            })
            .await
            .unwrap();

        // two writers got past the read check for the same open day
        let first = date.and_hms_opt(15, 5, 0).unwrap();
        let second = date.and_hms_opt(16, 45, 0).unwrap();
        assert!(store.set_check_out(rec.id, first).await.unwrap());
        assert!(!store.set_check_out(rec.id, second).await.unwrap());

        let stored = store.find_for_day(1, date).await.unwrap().unwrap();
        assert_eq!(stored.check_out, Some(first));
    }
}
