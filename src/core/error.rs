use derive_more::Display;

/// Business-rule violations surfaced to the caller. All of these are expected,
/// recoverable outcomes with a stable kind; only `Internal` carries a backend
/// failure from the store.
#[derive(Debug, Display)]
pub enum PresensiError {
    #[display(fmt = "Already checked in today")]
    AlreadyCheckedIn,
    #[display(fmt = "Already checked out today")]
    AlreadyCheckedOut,
    #[display(fmt = "No check-in recorded for today")]
    NoRecordYet,
    #[display(fmt = "Not yet time to check out")]
    TooEarly,
    #[display(fmt = "A request was already filed for this day")]
    DuplicateLeaveRequest,
    #[display(fmt = "An attendance record already exists for this day")]
    DuplicateDailyRecord,
    #[display(fmt = "Request is already approved")]
    AlreadyApproved,
    #[display(fmt = "Request is not in a state that allows this")]
    InvalidStatus,
    #[display(fmt = "Data not found")]
    NotFound,
    #[display(fmt = "No students enrolled in this class")]
    RosterEmpty,
    #[display(fmt = "Internal Server Error")]
    Internal(anyhow::Error),
}

impl PresensiError {
    /// Stable machine-readable kind, independent of the human message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AlreadyCheckedIn => "already_checked_in",
            Self::AlreadyCheckedOut => "already_checked_out",
            Self::NoRecordYet => "no_record_yet",
            Self::TooEarly => "too_early",
            Self::DuplicateLeaveRequest => "duplicate_leave_request",
            Self::DuplicateDailyRecord => "duplicate_daily_record",
            Self::AlreadyApproved => "already_approved",
            Self::InvalidStatus => "invalid_status",
            Self::NotFound => "not_found",
            Self::RosterEmpty => "roster_empty",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<anyhow::Error> for PresensiError {
    fn from(e: anyhow::Error) -> Self {
        Self::Internal(e)
    }
}
