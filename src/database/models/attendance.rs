use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum AttendanceStatus {
        Present => "present",
        Late => "late",
        EarlyLeave => "early_leave",
        Absent => "absent",
    }
}

impl AttendanceStatus {
    /// Late arrivals and early departures, the two irregular outcomes.
    pub fn is_irregular(&self) -> bool {
        matches!(self, AttendanceStatus::Late | AttendanceStatus::EarlyLeave)
    }
}

/// Device position captured with a punch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Radius of uncertainty in metres.
    pub accuracy: f64,
}

impl GeoLocation {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude)) {
            return Err(format!("Invalid latitude: {}", self.latitude));
        }
        if !(self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude)) {
            return Err(format!("Invalid longitude: {}", self.longitude));
        }
        if !(self.accuracy.is_finite() && self.accuracy >= 0.0) {
            return Err(format!("Invalid accuracy: {}", self.accuracy));
        }
        Ok(())
    }
}

/// One user's attendance for one local calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub check_in: Option<DateTime<Utc>>,
    pub check_in_location: Option<GeoLocation>,
    pub check_out: Option<DateTime<Utc>>,
    pub check_out_location: Option<GeoLocation>,
    pub working_minutes: i64,
    pub status: AttendanceStatus,
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Where a day's record sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PunchState {
    NotStarted,
    Open {
        status: AttendanceStatus,
    },
    Closed {
        status: AttendanceStatus,
        working_minutes: i64,
    },
}

impl Attendance {
    /// A freshly opened record, as written on clock-in.
    pub fn open(
        user_id: Uuid,
        date: NaiveDate,
        check_in: DateTime<Utc>,
        location: GeoLocation,
        status: AttendanceStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            date,
            check_in: Some(check_in),
            check_in_location: Some(location),
            check_out: None,
            check_out_location: None,
            working_minutes: 0,
            status,
            note: String::new(),
            created_at: check_in,
            updated_at: check_in,
        }
    }

    pub fn state(&self) -> PunchState {
        match (self.check_in, self.check_out) {
            (None, _) => PunchState::NotStarted,
            (Some(_), None) => PunchState::Open {
                status: self.status,
            },
            (Some(_), Some(_)) => PunchState::Closed {
                status: self.status,
                working_minutes: self.working_minutes,
            },
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state(), PunchState::Closed { .. })
    }
}

/// Fields written when a record is closed.
#[derive(Debug, Clone)]
pub struct CheckOutUpdate {
    pub check_out: DateTime<Utc>,
    /// Clock time of the request; stored as `updated_at`.
    pub updated_at: DateTime<Utc>,
    pub location: GeoLocation,
    pub working_minutes: i64,
    pub status: AttendanceStatus,
}

/// Body of a clock-in or clock-out request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PunchInput {
    pub location: GeoLocation,
}

#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub user_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl AttendanceFilter {
    pub fn matches(&self, attendance: &Attendance) -> bool {
        self.user_id.is_none_or(|id| attendance.user_id == id)
            && self.start_date.is_none_or(|d| attendance.date >= d)
            && self.end_date.is_none_or(|d| attendance.date <= d)
    }
}
