use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::attendance::AttendanceStatus;

/// Per-status tallies. Keys match the status wire names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub present: u32,
    pub late: u32,
    pub early_leave: u32,
    pub absent: u32,
}

impl StatusCounts {
    pub fn record(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Late => self.late += 1,
            AttendanceStatus::EarlyLeave => self.early_leave += 1,
            AttendanceStatus::Absent => self.absent += 1,
        }
    }

    pub fn late_or_early(&self) -> u32 {
        self.late + self.early_leave
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub user_id: Uuid,
    pub year: i32,
    pub month: u32,
    pub counts: StatusCounts,
    pub days_worked: u32,
    pub total_working_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeListItem {
    pub user_id: Uuid,
    pub employee_number: String,
    pub name: String,
    pub position: Option<String>,
    pub department: String,
    pub attendance_status: StatusCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamLead {
    pub id: Uuid,
    pub name: String,
    pub department: String,
    pub employee_number: Option<String>,
    /// Display label, e.g. `Yamada Taro (Sales) EMP001`.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberAttendance {
    pub user_id: Uuid,
    pub name: String,
    pub employee_number: String,
    pub status: AttendanceStatus,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
    /// `H:MM`, or `-` while the day is not closed.
    pub working_hours: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummary {
    pub total_members: u32,
    pub present: u32,
    pub late_early: u32,
    pub absent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamAttendanceReport {
    pub lead: TeamLead,
    pub date: NaiveDate,
    pub members: Vec<TeamMemberAttendance>,
    pub summary: TeamSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRatePoint {
    /// `YYYY-MM`
    pub month: String,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentHours {
    pub department: String,
    pub average_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTrendPoint {
    pub date: NaiveDate,
    pub late: u32,
    pub early_leave: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub date: NaiveDate,
    pub employee_count: u32,
    pub present_today: u32,
    pub late_or_early_today: u32,
    pub month_total_hours: i64,
    pub attendance_rate: Vec<MonthlyRatePoint>,
    pub department_average_hours: Vec<DepartmentHours>,
    pub late_early_trend: Vec<DailyTrendPoint>,
    pub today_status: StatusCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub cached_dates: Vec<NaiveDate>,
    pub total_cached_records: usize,
}
