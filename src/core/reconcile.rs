use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::core::error::PresensiError;
use crate::core::policy::AttendancePolicy;
use crate::core::roster::RosterIndex;
use crate::model::attendance::{Attendance, AttendanceStatus, NewAttendance};
use crate::store::{AttendanceStore, RosterStore, StoreError};

/// The staff view of one class day: every record plus per-status counts.
#[derive(Debug, Serialize, ToSchema)]
pub struct ClassSummary {
    pub total_siswa: usize,
    pub hadir: usize,
    pub telat: usize,
    pub alpha: usize,
    pub izin: usize,
    pub sakit: usize,
    pub dispen: usize,
    pub data: Vec<Attendance>,
}

/// Reconcile one class for one day, then summarize it.
///
/// Before the check-out cutoff this only reads: existing records are counted
/// as they are. At or after the cutoff, every roster student without a record
/// is back-filled alpha, and records that never saw a check-in (and are not
/// excused) are reclassified alpha. Safe to call repeatedly; a duplicate-key
/// loss on the back-fill just means another pass got there first.
pub async fn reconcile_class<S>(
    store: &S,
    policy: &AttendancePolicy,
    kelas_id: u64,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> Result<ClassSummary, PresensiError>
where
    S: AttendanceStore + RosterStore,
{
    let roster = store
        .class_roster(kelas_id)
        .await?;
    let index = RosterIndex::new(roster);
    if index.is_empty() {
        return Err(PresensiError::RosterEmpty);
    }

    let ids = index.ids();
    let mut records = store.list_for_day(&ids, date).await?;

    if policy.reconcile_open(now) {
        let marked: HashSet<u64> = records.iter().map(|r| r.siswa_id).collect();
        let mut backfilled = 0usize;
        let mut reclassified = 0usize;

        for student in index.students() {
            if marked.contains(&student.id) {
                continue;
            }
            match store
                .insert(NewAttendance {
                    siswa_id: student.id,
                    date,
                    status: AttendanceStatus::Alpha,
                    check_in: None,
                })
                .await
            {
                Ok(_) => backfilled += 1,
                // another reconciliation pass won the insert
                Err(StoreError::Duplicate) => {}
                Err(StoreError::Backend(e)) => return Err(PresensiError::Internal(e)),
            }
        }

        for record in &records {
            if record.status.is_excused()
                || record.status == AttendanceStatus::Alpha
                || record.check_in.is_some()
            {
                continue;
            }
            store
                .set_status(record.id, AttendanceStatus::Alpha)
                .await?;
            reclassified += 1;
        }

        if backfilled > 0 || reclassified > 0 {
            tracing::info!(kelas_id, %date, backfilled, reclassified, "class reconciled");
        }
        // re-read unconditionally: a concurrent pass may have landed rows this
        // call only saw as duplicate-key losses
        records = store.list_for_day(&ids, date).await?;
    }

    let mut summary = ClassSummary {
        total_siswa: index.len(),
        hadir: 0,
        telat: 0,
        alpha: 0,
        izin: 0,
        sakit: 0,
        dispen: 0,
        data: records,
    };
    for record in &summary.data {
        match record.status {
            AttendanceStatus::Hadir => summary.hadir += 1,
            AttendanceStatus::Telat => summary.telat += 1,
            AttendanceStatus::Alpha => summary.alpha += 1,
            AttendanceStatus::Izin => summary.izin += 1,
            AttendanceStatus::Sakit => summary.sakit += 1,
            AttendanceStatus::Dispen => summary.dispen += 1,
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state_machine::AttendanceService;
    use crate::model::student::Student;
    use crate::store::memory::MemoryStore;
    use chrono::TimeZone;

    const KELAS: u64 = 3;

    fn policy() -> AttendancePolicy {
        AttendancePolicy::default()
    }

    fn at_local(h: u32, m: u32) -> DateTime<Utc> {
        policy()
            .tz
            .with_ymd_and_hms(2026, 3, 2, h, m, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn store_with_class(ids: &[u64]) -> MemoryStore {
        let store = MemoryStore::new();
        for &id in ids {
            store.add_student(Student {
                id,
                kelas_id: KELAS,
                nama: format!("Siswa {id}"),
                rfid_tag: Some(format!("TAG-{id:04}")),
            });
        }
        store
    }

    #[actix_web::test]
    async fn unmarked_students_are_backfilled_alpha() {
        let store = store_with_class(&[1, 2]);
        let svc = AttendanceService::new(&store, policy());
        svc.check_in(1, at_local(6, 30)).await.unwrap();

        let summary = reconcile_class(&store, &policy(), KELAS, date(), at_local(15, 30))
            .await
            .unwrap();

        assert_eq!(summary.total_siswa, 2);
        assert_eq!(summary.hadir, 1);
        assert_eq!(summary.alpha, 1);
        assert_eq!(summary.data.len(), 2);

        // the checked-in record kept its timestamp and status
        let rec = store.find_for_day(1, date()).await.unwrap().unwrap();
        assert_eq!(rec.status, AttendanceStatus::Hadir);
        assert!(rec.check_in.is_some());

        let rec = store.find_for_day(2, date()).await.unwrap().unwrap();
        assert_eq!(rec.status, AttendanceStatus::Alpha);
        assert!(rec.check_in.is_none());
    }

    #[actix_web::test]
    async fn reconcile_is_idempotent() {
        let store = store_with_class(&[1, 2, 3]);
        let svc = AttendanceService::new(&store, policy());
        svc.check_in(2, at_local(7, 5)).await.unwrap();

        let first = reconcile_class(&store, &policy(), KELAS, date(), at_local(15, 30))
            .await
            .unwrap();
        let second = reconcile_class(&store, &policy(), KELAS, date(), at_local(16, 0))
            .await
            .unwrap();

        assert_eq!(first.data.len(), second.data.len());
        assert_eq!(first.telat, second.telat);
        assert_eq!(first.alpha, second.alpha);
        assert_eq!(second.telat, 1);
        assert_eq!(second.alpha, 2);
        let ids = |s: &ClassSummary| s.data.iter().map(|r| (r.id, r.status)).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
    }

    #[actix_web::test]
    async fn before_cutoff_reconcile_writes_nothing() {
        let store = store_with_class(&[1, 2]);
        let svc = AttendanceService::new(&store, policy());
        svc.check_in(1, at_local(6, 30)).await.unwrap();

        let summary = reconcile_class(&store, &policy(), KELAS, date(), at_local(10, 0))
            .await
            .unwrap();

        assert_eq!(summary.total_siswa, 2);
        assert_eq!(summary.hadir, 1);
        assert_eq!(summary.alpha, 0);
        assert_eq!(summary.data.len(), 1);
        assert!(store.find_for_day(2, date()).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn stale_record_without_check_in_is_reclassified() {
        let store = store_with_class(&[1]);
        // hadir row with no check-in, as left behind by a bad import
        store
            .insert(NewAttendance {
                siswa_id: 1,
                date: date(),
                status: AttendanceStatus::Hadir,
                check_in: None,
            })
            .await
            .unwrap();

        let summary = reconcile_class(&store, &policy(), KELAS, date(), at_local(15, 30))
            .await
            .unwrap();

        assert_eq!(summary.alpha, 1);
        assert_eq!(summary.hadir, 0);
    }

    #[actix_web::test]
    async fn excused_records_are_left_alone() {
        let store = store_with_class(&[1, 2]);
        let svc = AttendanceService::new(&store, policy());
        svc.file_leave(crate::model::leave_request::NewLeaveRequest {
            siswa_id: 1,
            date: date(),
            kind: crate::model::leave_request::LeaveKind::Sakit,
            deskripsi: "demam".into(),
            image_id: None,
        })
        .await
        .unwrap();

        let summary = reconcile_class(&store, &policy(), KELAS, date(), at_local(15, 30))
            .await
            .unwrap();

        assert_eq!(summary.sakit, 1);
        assert_eq!(summary.alpha, 1);
        let rec = store.find_for_day(1, date()).await.unwrap().unwrap();
        assert_eq!(rec.status, AttendanceStatus::Sakit);
    }

    /// Every insert loses to another reconciliation pass that lands the same
    /// row just before ours.
    struct ContestedStore {
        inner: MemoryStore,
    }

    impl AttendanceStore for ContestedStore {
        async fn find_for_day(
            &self,
            siswa_id: u64,
            date: NaiveDate,
        ) -> Result<Option<Attendance>, StoreError> {
            self.inner.find_for_day(siswa_id, date).await
        }

        async fn insert(&self, new: NewAttendance) -> Result<Attendance, StoreError> {
            let _ = self.inner.insert(new).await;
            Err(StoreError::Duplicate)
        }

        async fn set_check_out(
            &self,
            id: u64,
            at: chrono::NaiveDateTime,
        ) -> Result<bool, StoreError> {
            self.inner.set_check_out(id, at).await
        }

        async fn set_status(&self, id: u64, status: AttendanceStatus) -> Result<(), StoreError> {
            self.inner.set_status(id, status).await
        }

        async fn list_for_day(
            &self,
            siswa_ids: &[u64],
            date: NaiveDate,
        ) -> Result<Vec<Attendance>, StoreError> {
            self.inner.list_for_day(siswa_ids, date).await
        }
    }

    impl RosterStore for ContestedStore {
        async fn class_roster(&self, kelas_id: u64) -> Result<Vec<Student>, StoreError> {
            self.inner.class_roster(kelas_id).await
        }

        async fn find_by_tag(&self, rfid_tag: &str) -> Result<Option<Student>, StoreError> {
            self.inner.find_by_tag(rfid_tag).await
        }
    }

    #[actix_web::test]
    async fn summary_includes_rows_landed_by_a_concurrent_pass() {
        let store = ContestedStore {
            inner: store_with_class(&[1, 2]),
        };

        let summary = reconcile_class(&store, &policy(), KELAS, date(), at_local(15, 30))
            .await
            .unwrap();

        // every back-fill lost its race, but the rows exist and must be counted
        assert_eq!(summary.data.len(), 2);
        assert_eq!(summary.alpha, 2);
        assert_eq!(summary.total_siswa, 2);
    }

    #[actix_web::test]
    async fn empty_roster_is_an_error() {
        let store = MemoryStore::new();
        assert!(matches!(
            reconcile_class(&store, &policy(), KELAS, date(), at_local(15, 30)).await,
            Err(PresensiError::RosterEmpty)
        ));
    }
}
