use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::config::Config;
use crate::model::attendance::AttendanceStatus;

/// Time rules for one school day. Every cutoff comparison in the service goes
/// through here, always in the single fixed civil timezone — callers may hand
/// in UTC timestamps, we normalize before comparing.
#[derive(Debug, Clone, Copy)]
pub struct AttendancePolicy {
    pub tz: FixedOffset,
    /// Checking in at or after this time is telat.
    pub check_in_deadline: NaiveTime,
    /// Check-out (and reconciliation) open at this time.
    pub check_out_earliest: NaiveTime,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            tz: FixedOffset::east_opt(7 * 3600).unwrap(), // Asia/Jakarta
            check_in_deadline: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            check_out_earliest: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
        }
    }
}

impl AttendancePolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            tz: FixedOffset::east_opt(config.tz_offset_hours * 3600)
                .expect("TZ_OFFSET_HOURS out of range"),
            check_in_deadline: NaiveTime::parse_from_str(&config.check_in_deadline, "%H:%M:%S")
                .expect("CHECK_IN_DEADLINE must be HH:MM:SS"),
            check_out_earliest: NaiveTime::parse_from_str(&config.check_out_earliest, "%H:%M:%S")
                .expect("CHECK_OUT_EARLIEST must be HH:MM:SS"),
        }
    }

    /// Normalize a timestamp to civil wall-clock time.
    pub fn to_civil(&self, at: DateTime<Utc>) -> NaiveDateTime {
        at.with_timezone(&self.tz).naive_local()
    }

    /// The calendar day an event belongs to.
    pub fn civil_date(&self, at: DateTime<Utc>) -> NaiveDate {
        self.to_civil(at).date()
    }

    /// Hadir before the deadline, telat at or after it.
    pub fn classify_check_in(&self, at: DateTime<Utc>) -> AttendanceStatus {
        if self.to_civil(at).time() >= self.check_in_deadline {
            AttendanceStatus::Telat
        } else {
            AttendanceStatus::Hadir
        }
    }

    pub fn check_out_open(&self, at: DateTime<Utc>) -> bool {
        self.to_civil(at).time() >= self.check_out_earliest
    }

    /// The reconciliation pass only writes after the check-out cutoff.
    pub fn reconcile_open(&self, now: DateTime<Utc>) -> bool {
        self.check_out_open(now)
    }
}
