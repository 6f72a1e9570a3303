//! Late / early-leave classification and worked-minute computation.
//!
//! Everything here is pure. Times of day are local wall-clock times; the
//! caller converts from UTC using the configured office offset.

use chrono::{DateTime, NaiveTime, Timelike, Utc};

use crate::database::models::AttendanceStatus;

/// 09:00, in minutes since local midnight.
pub const WORK_START_MINUTES: u32 = 9 * 60;
/// 18:00, in minutes since local midnight.
pub const WORK_END_MINUTES: u32 = 18 * 60;

const MILLIS_PER_MINUTE: i64 = 60_000;

pub fn minutes_since_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Status of a fresh check-in. Arriving at 09:00:00 exactly is on time;
/// any later second is late.
pub fn classify_check_in(time: NaiveTime) -> AttendanceStatus {
    if time.num_seconds_from_midnight() > WORK_START_MINUTES * 60 {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Present
    }
}

pub fn classify_check_in_minutes(minutes: u32) -> AttendanceStatus {
    if minutes > WORK_START_MINUTES {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Present
    }
}

/// Status after check-out. Late is sticky; otherwise leaving before 18:00
/// turns the record into an early leave.
pub fn classify_check_out(time: NaiveTime, prior: AttendanceStatus) -> AttendanceStatus {
    classify_check_out_minutes(minutes_since_midnight(time), prior)
}

pub fn classify_check_out_minutes(minutes: u32, prior: AttendanceStatus) -> AttendanceStatus {
    if prior == AttendanceStatus::Late {
        return AttendanceStatus::Late;
    }
    if minutes < WORK_END_MINUTES {
        AttendanceStatus::EarlyLeave
    } else {
        prior
    }
}

/// Whole minutes between the two punches, rounded down.
///
/// `check_out` must not precede `check_in`.
pub fn compute_worked_minutes(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> i64 {
    compute_worked_minutes_millis(check_in.timestamp_millis(), check_out.timestamp_millis())
}

pub fn compute_worked_minutes_millis(check_in_ms: i64, check_out_ms: i64) -> i64 {
    debug_assert!(
        check_out_ms >= check_in_ms,
        "check-out precedes check-in"
    );
    (check_out_ms - check_in_ms).div_euclid(MILLIS_PER_MINUTE)
}
