use chrono::{NaiveDate, NaiveDateTime};
use futures_util::StreamExt;
use sqlx::MySqlPool;

use crate::model::attendance::{Attendance, AttendanceStatus, NewAttendance};
use crate::model::excuse_request::{ExcuseRequest, NewExcuseRequest};
use crate::model::leave_request::{ApprovalStatus, LeaveRequest, NewLeaveRequest};
use crate::model::student::Student;
use crate::store::{AttendanceStore, FileLeaveError, RequestStore, RosterStore, StoreError};

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

// SQLSTATE for integrity constraint violations (duplicate key on MySQL)
fn is_duplicate(e: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = e {
        return db_err.code().as_deref() == Some("23000");
    }
    false
}

fn map_err(e: sqlx::Error) -> StoreError {
    if is_duplicate(&e) {
        StoreError::Duplicate
    } else {
        StoreError::Backend(e.into())
    }
}

impl AttendanceStore for MySqlStore {
    async fn find_for_day(
        &self,
        siswa_id: u64,
        date: NaiveDate,
    ) -> Result<Option<Attendance>, StoreError> {
        sqlx::query_as::<_, Attendance>(
            r#"
            SELECT id, siswa_id, date, status, check_in, check_out
            FROM kehadiran
            WHERE siswa_id = ? AND date = ?
            "#,
        )
        .bind(siswa_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn insert(&self, new: NewAttendance) -> Result<Attendance, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO kehadiran (siswa_id, date, status, check_in)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(new.siswa_id)
        .bind(new.date)
        .bind(new.status)
        .bind(new.check_in)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(Attendance {
            id: result.last_insert_id(),
            siswa_id: new.siswa_id,
            date: new.date,
            status: new.status,
            check_in: new.check_in,
            check_out: None,
        })
    }

    async fn set_check_out(&self, id: u64, at: NaiveDateTime) -> Result<bool, StoreError> {
        let result =
            sqlx::query("UPDATE kehadiran SET check_out = ? WHERE id = ? AND check_out IS NULL")
                .bind(at)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(map_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_status(&self, id: u64, status: AttendanceStatus) -> Result<(), StoreError> {
        sqlx::query("UPDATE kehadiran SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(())
    }

    async fn list_for_day(
        &self,
        siswa_ids: &[u64],
        date: NaiveDate,
    ) -> Result<Vec<Attendance>, StoreError> {
        if siswa_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; siswa_ids.len()].join(", ");
        let sql = format!(
            r#"
            SELECT id, siswa_id, date, status, check_in, check_out
            FROM kehadiran
            WHERE date = ? AND siswa_id IN ({placeholders})
            ORDER BY siswa_id
            "#
        );

        let mut query = sqlx::query_as::<_, Attendance>(&sql).bind(date);
        for id in siswa_ids {
            query = query.bind(*id);
        }

        query.fetch_all(&self.pool).await.map_err(map_err)
    }
}

impl RequestStore for MySqlStore {
    async fn file_izin(&self, new: NewLeaveRequest) -> Result<LeaveRequest, FileLeaveError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| FileLeaveError::Backend(e.into()))?;

        let result = sqlx::query(
            r#"
            INSERT INTO izin (siswa_id, date, kind, deskripsi, image_id, status)
            VALUES (?, ?, ?, ?, ?, 'pending')
            "#,
        )
        .bind(new.siswa_id)
        .bind(new.date)
        .bind(new.kind)
        .bind(&new.deskripsi)
        .bind(new.image_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_duplicate(&e) {
                FileLeaveError::DuplicateRequest
            } else {
                FileLeaveError::Backend(e.into())
            }
        })?;

        let izin_id = result.last_insert_id();

        // companion kehadiran row; tx rolls back on conflict, keeping the
        // one-record-per-day invariant
        sqlx::query("INSERT INTO kehadiran (siswa_id, date, status) VALUES (?, ?, ?)")
            .bind(new.siswa_id)
            .bind(new.date)
            .bind(new.kind.attendance_status())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_duplicate(&e) {
                    FileLeaveError::DuplicateAttendance
                } else {
                    FileLeaveError::Backend(e.into())
                }
            })?;

        tx.commit()
            .await
            .map_err(|e| FileLeaveError::Backend(e.into()))?;

        Ok(LeaveRequest {
            id: izin_id,
            siswa_id: new.siswa_id,
            date: new.date,
            kind: new.kind,
            deskripsi: new.deskripsi,
            image_id: new.image_id,
            status: ApprovalStatus::Pending,
        })
    }

    async fn get_izin(&self, id: u64) -> Result<Option<LeaveRequest>, StoreError> {
        sqlx::query_as::<_, LeaveRequest>(
            r#"
            SELECT id, siswa_id, date, kind, deskripsi, image_id, status
            FROM izin
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn set_izin_status(
        &self,
        id: u64,
        from: ApprovalStatus,
        to: ApprovalStatus,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE izin SET status = ? WHERE id = ? AND status = ?")
            .bind(to)
            .bind(id)
            .bind(from)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_dispen(&self, new: NewExcuseRequest) -> Result<ExcuseRequest, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO dispen (siswa_id, date, deskripsi, image_id, status)
            VALUES (?, ?, ?, ?, 'pending')
            "#,
        )
        .bind(new.siswa_id)
        .bind(new.date)
        .bind(&new.deskripsi)
        .bind(new.image_id)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(ExcuseRequest {
            id: result.last_insert_id(),
            siswa_id: new.siswa_id,
            date: new.date,
            deskripsi: new.deskripsi,
            image_id: new.image_id,
            status: ApprovalStatus::Pending,
        })
    }

    async fn get_dispen(&self, id: u64) -> Result<Option<ExcuseRequest>, StoreError> {
        sqlx::query_as::<_, ExcuseRequest>(
            r#"
            SELECT id, siswa_id, date, deskripsi, image_id, status
            FROM dispen
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn set_dispen_status(
        &self,
        id: u64,
        from: ApprovalStatus,
        to: ApprovalStatus,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE dispen SET status = ? WHERE id = ? AND status = ?")
            .bind(to)
            .bind(id)
            .bind(from)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(result.rows_affected() > 0)
    }
}

impl RosterStore for MySqlStore {
    async fn class_roster(&self, kelas_id: u64) -> Result<Vec<Student>, StoreError> {
        let mut stream = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, kelas_id, nama, rfid_tag
            FROM siswa
            WHERE kelas_id = ?
            ORDER BY id
            "#,
        )
        .bind(kelas_id)
        .fetch(&self.pool);

        let mut students = Vec::new();
        while let Some(row) = stream.next().await {
            students.push(row.map_err(map_err)?);
        }
        Ok(students)
    }

    async fn find_by_tag(&self, rfid_tag: &str) -> Result<Option<Student>, StoreError> {
        sqlx::query_as::<_, Student>(
            r#"
            SELECT id, kelas_id, nama, rfid_tag
            FROM siswa
            WHERE rfid_tag = ?
            "#,
        )
        .bind(rfid_tag)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)
    }
}
