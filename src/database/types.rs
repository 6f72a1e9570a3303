use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::models::{Attendance, AttendanceStatus, GeoLocation};

/// Raw `attendances` row, exactly as the table stores it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AttendanceRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub check_in: Option<DateTime<Utc>>,
    pub check_in_latitude: Option<f64>,
    pub check_in_longitude: Option<f64>,
    pub check_in_accuracy: Option<f64>,
    pub check_out: Option<DateTime<Utc>>,
    pub check_out_latitude: Option<f64>,
    pub check_out_longitude: Option<f64>,
    pub check_out_accuracy: Option<f64>,
    pub working_minutes: i64,
    pub status: String,
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column list matching [`AttendanceRow`], for SELECT and RETURNING clauses.
pub const ATTENDANCE_COLUMNS: &str = r#"
    id,
    user_id,
    date,
    check_in,
    check_in_latitude,
    check_in_longitude,
    check_in_accuracy,
    check_out,
    check_out_latitude,
    check_out_longitude,
    check_out_accuracy,
    working_minutes,
    status,
    note,
    created_at,
    updated_at
"#;

fn location(
    field: &str,
    latitude: Option<f64>,
    longitude: Option<f64>,
    accuracy: Option<f64>,
) -> Result<Option<GeoLocation>, String> {
    match (latitude, longitude, accuracy) {
        (None, None, None) => Ok(None),
        (Some(latitude), Some(longitude), Some(accuracy)) => Ok(Some(GeoLocation {
            latitude,
            longitude,
            accuracy,
        })),
        _ => Err(format!("{} is partially populated", field)),
    }
}

impl TryFrom<AttendanceRow> for Attendance {
    type Error = String;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        let status: AttendanceStatus = row.status.parse()?;

        let check_in_location = location(
            "check_in_location",
            row.check_in_latitude,
            row.check_in_longitude,
            row.check_in_accuracy,
        )?;
        let check_out_location = location(
            "check_out_location",
            row.check_out_latitude,
            row.check_out_longitude,
            row.check_out_accuracy,
        )?;

        if row.check_in.is_none() != (status == AttendanceStatus::Absent) {
            return Err(format!(
                "attendance {}: status {} does not match check-in presence",
                row.id, status
            ));
        }
        if row.check_in.is_none() && row.check_out.is_some() {
            return Err(format!(
                "attendance {}: check-out without check-in",
                row.id
            ));
        }
        if let (Some(check_in), Some(check_out)) = (row.check_in, row.check_out) {
            if check_out < check_in {
                return Err(format!(
                    "attendance {}: check-out precedes check-in",
                    row.id
                ));
            }
        }
        if row.working_minutes < 0 {
            return Err(format!(
                "attendance {}: negative working minutes",
                row.id
            ));
        }

        Ok(Attendance {
            id: row.id,
            user_id: row.user_id,
            date: row.date,
            check_in: row.check_in,
            check_in_location,
            check_out: row.check_out,
            check_out_location,
            working_minutes: row.working_minutes,
            status,
            note: row.note,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
