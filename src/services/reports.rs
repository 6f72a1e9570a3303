//! Rollups over users and attendance records. No I/O; callers fetch the
//! records and pass them in.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, Duration, Months, NaiveDate};
use uuid::Uuid;

use super::cache::{employees, team_members};
use crate::database::models::{
    Attendance, AttendanceStatus, DailyTrendPoint, DashboardReport, DepartmentHours,
    EmployeeListItem, MonthlyRatePoint, MonthlySummary, StatusCounts, TeamAttendanceReport,
    TeamLead, TeamMemberAttendance, TeamSummary, User,
};
use crate::error::AppError;

/// Months shown on the attendance-rate chart, current month included.
pub const RATE_HISTORY_MONTHS: u32 = 6;
/// Days shown on the late/early-leave trend chart, reference day included.
pub const TREND_DAYS: i64 = 7;

/// First and last day of a month.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), AppError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid month: {}-{}", year, month)))?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| AppError::BadRequest(format!("Invalid month: {}-{}", year, month)))?;
    Ok((first, last))
}

fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `H:MM` for a closed record, `-` otherwise.
pub fn format_working_hours(record: Option<&Attendance>) -> String {
    match record {
        Some(r) if r.is_closed() => {
            format!("{}:{:02}", r.working_minutes / 60, r.working_minutes % 60)
        }
        _ => "-".to_string(),
    }
}

pub fn monthly_summary(
    user_id: Uuid,
    year: i32,
    month: u32,
    records: &[Attendance],
) -> MonthlySummary {
    let mut counts = StatusCounts::default();
    let mut days_worked = 0;
    let mut total_working_minutes = 0;

    for record in records.iter().filter(|r| r.user_id == user_id) {
        counts.record(record.status);
        if record.check_in.is_some() {
            days_worked += 1;
        }
        total_working_minutes += record.working_minutes;
    }

    MonthlySummary {
        user_id,
        year,
        month,
        counts,
        days_worked,
        total_working_minutes,
    }
}

/// One row per employee with status counts over `records`.
pub fn employee_list(users: &[User], records: &[Attendance]) -> Vec<EmployeeListItem> {
    let mut counts: HashMap<Uuid, StatusCounts> = HashMap::new();
    for record in records {
        counts.entry(record.user_id).or_default().record(record.status);
    }

    employees(users)
        .into_iter()
        .map(|user| EmployeeListItem {
            user_id: user.id,
            employee_number: user
                .employee_number
                .clone()
                .unwrap_or_else(|| "-".to_string()),
            name: user.name.clone(),
            position: user.position.clone(),
            department: user.department.clone(),
            attendance_status: counts.get(&user.id).copied().unwrap_or_default(),
        })
        .collect()
}

pub fn team_lead(user: &User) -> TeamLead {
    let mut label = format!("{} ({})", user.name, user.department);
    if let Some(number) = &user.employee_number {
        label.push(' ');
        label.push_str(number);
    }

    TeamLead {
        id: user.id,
        name: user.name.clone(),
        department: user.department.clone(),
        employee_number: user.employee_number.clone(),
        label,
    }
}

/// The lead's team on `date`. Members without a record count as absent.
pub fn team_attendance(
    lead: &User,
    users: &[User],
    date: NaiveDate,
    records: &[Attendance],
) -> TeamAttendanceReport {
    let by_user: HashMap<Uuid, &Attendance> = records
        .iter()
        .filter(|r| r.date == date)
        .map(|r| (r.user_id, r))
        .collect();

    let mut summary = TeamSummary::default();
    let members: Vec<TeamMemberAttendance> = team_members(users, lead.id)
        .into_iter()
        .map(|member| {
            let record = by_user.get(&member.id).copied();
            let status = record.map_or(AttendanceStatus::Absent, |r| r.status);

            summary.total_members += 1;
            if status.is_irregular() {
                summary.late_early += 1;
            } else if status == AttendanceStatus::Present {
                summary.present += 1;
            } else {
                summary.absent += 1;
            }

            TeamMemberAttendance {
                user_id: member.id,
                name: member.name.clone(),
                employee_number: member
                    .employee_number
                    .clone()
                    .unwrap_or_else(|| "-".to_string()),
                status,
                check_in: record.and_then(|r| r.check_in),
                check_out: record.and_then(|r| r.check_out),
                working_hours: format_working_hours(record),
            }
        })
        .collect();

    TeamAttendanceReport {
        lead: team_lead(lead),
        date,
        members,
        summary,
    }
}

/// Earliest date the dashboard for `date` reads from.
pub fn dashboard_window_start(date: NaiveDate) -> NaiveDate {
    let month_start = date.with_day(1).unwrap_or(date);
    let rate_start = month_start
        .checked_sub_months(Months::new(RATE_HISTORY_MONTHS - 1))
        .unwrap_or(month_start);
    let trend_start = date - Duration::days(TREND_DAYS - 1);
    rate_start.min(trend_start)
}

/// Dashboard rollups for `date`. `records` must cover
/// [`dashboard_window_start`] through `date`; only employees' records count.
pub fn dashboard(date: NaiveDate, users: &[User], records: &[Attendance]) -> DashboardReport {
    let staff = employees(users);
    let staff_ids: HashSet<Uuid> = staff.iter().map(|u| u.id).collect();
    let records: Vec<&Attendance> = records
        .iter()
        .filter(|r| staff_ids.contains(&r.user_id) && r.date <= date)
        .collect();

    let mut today_status = StatusCounts::default();
    let mut checked_in_today = HashSet::new();
    for record in records.iter().filter(|r| r.date == date) {
        today_status.record(record.status);
        if record.check_in.is_some() {
            checked_in_today.insert(record.user_id);
        }
    }
    // Absent records and employees with no record at all.
    today_status.absent = staff
        .iter()
        .filter(|u| !checked_in_today.contains(&u.id))
        .count() as u32;

    let month_minutes: i64 = records
        .iter()
        .filter(|r| same_month(r.date, date))
        .map(|r| r.working_minutes)
        .sum();

    DashboardReport {
        date,
        employee_count: staff.len() as u32,
        present_today: today_status.present,
        late_or_early_today: today_status.late_or_early(),
        month_total_hours: month_minutes.div_euclid(60),
        attendance_rate: attendance_rate(date, staff.len(), &records),
        department_average_hours: department_average_hours(date, &staff, &records),
        late_early_trend: late_early_trend(date, &records),
        today_status,
    }
}

fn attendance_rate(
    date: NaiveDate,
    employee_count: usize,
    records: &[&Attendance],
) -> Vec<MonthlyRatePoint> {
    let month_start = date.with_day(1).unwrap_or(date);

    (0..RATE_HISTORY_MONTHS)
        .rev()
        .filter_map(|back| month_start.checked_sub_months(Months::new(back)))
        .map(|first| {
            let days_elapsed = if same_month(first, date) {
                date.day()
            } else {
                month_bounds(first.year(), first.month()).map_or(0, |(_, last)| last.day())
            };

            let attended: HashSet<(Uuid, NaiveDate)> = records
                .iter()
                .filter(|r| same_month(r.date, first) && r.check_in.is_some())
                .map(|r| (r.user_id, r.date))
                .collect();

            let possible = employee_count as f64 * days_elapsed as f64;
            let rate = if possible > 0.0 {
                round_one_decimal(attended.len() as f64 / possible * 100.0).min(100.0)
            } else {
                0.0
            };

            MonthlyRatePoint {
                month: first.format("%Y-%m").to_string(),
                rate,
            }
        })
        .collect()
}

fn department_average_hours(
    date: NaiveDate,
    staff: &[&User],
    records: &[&Attendance],
) -> Vec<DepartmentHours> {
    let department_of: HashMap<Uuid, &str> = staff
        .iter()
        .map(|u| (u.id, u.department.as_str()))
        .collect();

    let mut totals: BTreeMap<&str, (i64, u32)> = BTreeMap::new();
    for user in staff {
        totals.entry(user.department.as_str()).or_default();
    }
    for record in records
        .iter()
        .filter(|r| same_month(r.date, date) && r.is_closed())
    {
        if let Some(department) = department_of.get(&record.user_id) {
            let entry = totals.entry(*department).or_default();
            entry.0 += record.working_minutes;
            entry.1 += 1;
        }
    }

    totals
        .into_iter()
        .map(|(department, (minutes, count))| DepartmentHours {
            department: department.to_string(),
            average_hours: if count == 0 {
                0.0
            } else {
                round_one_decimal(minutes as f64 / 60.0 / count as f64)
            },
        })
        .collect()
}

fn late_early_trend(date: NaiveDate, records: &[&Attendance]) -> Vec<DailyTrendPoint> {
    (0..TREND_DAYS)
        .rev()
        .map(|back| {
            let day = date - Duration::days(back);
            let mut point = DailyTrendPoint {
                date: day,
                late: 0,
                early_leave: 0,
            };
            for record in records.iter().filter(|r| r.date == day) {
                match record.status {
                    AttendanceStatus::Late => point.late += 1,
                    AttendanceStatus::EarlyLeave => point.early_leave += 1,
                    _ => {}
                }
            }
            point
        })
        .collect()
}
