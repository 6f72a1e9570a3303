use actix_web::{HttpResponse, Result, web};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::database::models::{CreateUserInput, User, UserInfo, UserRole};
use crate::error::AppError;
use crate::handlers::{attendance::MonthQuery, shared::ApiResponse};
use crate::services::{
    Claims, cache,
    reports::{self, month_bounds},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListQuery {
    pub role: Option<UserRole>,
    pub department: Option<String>,
    pub manager_id: Option<Uuid>,
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRangeQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<NaiveDate>,
}

fn user_infos<'a>(users: impl IntoIterator<Item = &'a User>) -> Vec<UserInfo> {
    users.into_iter().cloned().map(UserInfo::from).collect()
}

// User handlers
pub async fn create_user(
    state: web::Data<AppState>,
    claims: Claims,
    input: web::Json<CreateUserInput>,
) -> Result<HttpResponse> {
    claims.require_admin()?;

    let user = state.auth_service.create_user(input.into_inner()).await?;
    state.user_directory.invalidate().await;

    Ok(ApiResponse::created(UserInfo::from(user)))
}

pub async fn get_users(
    state: web::Data<AppState>,
    claims: Claims,
    query: web::Query<UserListQuery>,
) -> Result<HttpResponse> {
    claims.require_admin()?;

    let users = state
        .user_directory
        .users(state.user_repository.as_ref(), query.refresh)
        .await?;

    let mut selected: Vec<&User> = match (query.manager_id, query.role, &query.department) {
        (Some(lead_id), _, _) => cache::team_members(&users, lead_id),
        (None, Some(UserRole::Admin), _) => cache::admins(&users),
        (None, Some(UserRole::Employee), _) => cache::employees(&users),
        (None, None, Some(department)) => cache::by_department(&users, department),
        (None, None, None) => users.iter().collect(),
    };
    if let Some(role) = query.role {
        selected.retain(|u| u.role == role);
    }
    if let Some(department) = &query.department {
        selected.retain(|u| &u.department == department);
    }

    Ok(ApiResponse::ok(user_infos(selected)))
}

pub async fn get_user(
    state: web::Data<AppState>,
    claims: Claims,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    claims.require_admin()?;

    let user_id = path.into_inner();
    let user = state
        .user_repository
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

    Ok(ApiResponse::ok(UserInfo::from(user)))
}

// Attendance handlers
pub async fn attendance_by_date(
    state: web::Data<AppState>,
    claims: Claims,
    path: web::Path<NaiveDate>,
) -> Result<HttpResponse> {
    claims.require_admin()?;

    let records = state
        .attendance_cache
        .get_or_fetch(path.into_inner(), state.attendance_repository.as_ref())
        .await?;

    Ok(ApiResponse::ok(records.as_slice()))
}

pub async fn attendance_range(
    state: web::Data<AppState>,
    claims: Claims,
    query: web::Query<AdminRangeQuery>,
) -> Result<HttpResponse> {
    claims.require_admin()?;

    let records = state
        .attendance_service
        .for_range(query.user_id, query.start_date, query.end_date)
        .await?;

    Ok(ApiResponse::ok(records))
}

pub async fn clear_cache(
    state: web::Data<AppState>,
    claims: Claims,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse> {
    claims.require_admin()?;

    state.attendance_cache.clear(query.date).await;
    let message = match query.date {
        Some(date) => format!("Cleared cached attendance for {}", date),
        None => "Cleared all cached attendance".to_string(),
    };

    Ok(ApiResponse::ok_with_message(
        state.attendance_cache.stats().await,
        &message,
    ))
}

pub async fn refresh_date(
    state: web::Data<AppState>,
    claims: Claims,
    path: web::Path<NaiveDate>,
) -> Result<HttpResponse> {
    claims.require_admin()?;

    let records = state
        .attendance_cache
        .refresh(path.into_inner(), state.attendance_repository.as_ref())
        .await?;

    Ok(ApiResponse::ok(records.as_slice()))
}

pub async fn cache_stats(state: web::Data<AppState>, claims: Claims) -> Result<HttpResponse> {
    claims.require_admin()?;

    Ok(ApiResponse::ok(state.attendance_cache.stats().await))
}

// Report handlers
pub async fn employees(
    state: web::Data<AppState>,
    claims: Claims,
    query: web::Query<MonthQuery>,
) -> Result<HttpResponse> {
    claims.require_admin()?;

    let (year, month) = query.resolve(state.attendance_service.local_today());
    let (start, end) = month_bounds(year, month)?;
    let users = state
        .user_directory
        .users(state.user_repository.as_ref(), false)
        .await?;
    let records = state.attendance_service.for_range(None, start, end).await?;

    Ok(ApiResponse::ok(reports::employee_list(&users, &records)))
}

pub async fn teams(state: web::Data<AppState>, claims: Claims) -> Result<HttpResponse> {
    claims.require_admin()?;

    let users = state
        .user_directory
        .users(state.user_repository.as_ref(), false)
        .await?;
    let leads: Vec<_> = cache::team_leads(&users)
        .into_iter()
        .map(reports::team_lead)
        .collect();

    Ok(ApiResponse::ok(leads))
}

pub async fn team_attendance(
    state: web::Data<AppState>,
    claims: Claims,
    path: web::Path<Uuid>,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse> {
    claims.require_admin()?;

    let lead_id = path.into_inner();
    let date = query
        .date
        .unwrap_or_else(|| state.attendance_service.local_today());
    let users = state
        .user_directory
        .users(state.user_repository.as_ref(), false)
        .await?;
    let lead = users
        .iter()
        .find(|u| u.id == lead_id)
        .ok_or_else(|| AppError::NotFound(format!("Team lead {} not found", lead_id)))?;

    let records = state
        .attendance_cache
        .get_or_fetch(date, state.attendance_repository.as_ref())
        .await?;

    Ok(ApiResponse::ok(reports::team_attendance(
        lead, &users, date, &records,
    )))
}

pub async fn dashboard(
    state: web::Data<AppState>,
    claims: Claims,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse> {
    claims.require_admin()?;

    let date = query
        .date
        .unwrap_or_else(|| state.attendance_service.local_today());
    let users = state
        .user_directory
        .users(state.user_repository.as_ref(), false)
        .await?;
    let records = state
        .attendance_service
        .for_range(None, reports::dashboard_window_start(date), date)
        .await?;

    Ok(ApiResponse::ok(reports::dashboard(date, &users, &records)))
}
