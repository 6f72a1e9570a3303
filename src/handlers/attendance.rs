use actix_web::{HttpRequest, HttpResponse, Result, web};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::AppState;
use crate::database::models::PunchInput;
use crate::handlers::shared::ApiResponse;
use crate::middleware::RequestIdExt;
use crate::services::Claims;

/// `year` / `month` default to the current local month.
#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl MonthQuery {
    pub fn resolve(&self, today: NaiveDate) -> (i32, u32) {
        (
            self.year.unwrap_or(today.year()),
            self.month.unwrap_or(today.month()),
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

pub async fn clock_in(
    req: HttpRequest,
    state: web::Data<AppState>,
    claims: Claims,
    input: web::Json<PunchInput>,
) -> Result<HttpResponse> {
    let record = state
        .attendance_service
        .clock_in(claims.user_id(), input.into_inner().location)
        .await?;

    log::debug!(
        "clock-in record {} (correlation_id={})",
        record.id,
        req.correlation_id().unwrap_or_default()
    );

    Ok(ApiResponse::ok_with_message(record, "Clocked in"))
}

pub async fn clock_out(
    req: HttpRequest,
    state: web::Data<AppState>,
    claims: Claims,
    input: web::Json<PunchInput>,
) -> Result<HttpResponse> {
    let record = state
        .attendance_service
        .clock_out(claims.user_id(), input.into_inner().location)
        .await?;

    log::debug!(
        "clock-out record {} (correlation_id={})",
        record.id,
        req.correlation_id().unwrap_or_default()
    );

    Ok(ApiResponse::ok_with_message(record, "Clocked out"))
}

pub async fn today(state: web::Data<AppState>, claims: Claims) -> Result<HttpResponse> {
    let record = state.attendance_service.today(claims.user_id()).await?;

    Ok(ApiResponse::ok(record))
}

pub async fn monthly(
    state: web::Data<AppState>,
    claims: Claims,
    query: web::Query<MonthQuery>,
) -> Result<HttpResponse> {
    let (year, month) = query.resolve(state.attendance_service.local_today());
    let records = state
        .attendance_service
        .for_month(claims.user_id(), year, month)
        .await?;

    Ok(ApiResponse::ok(records))
}

pub async fn summary(
    state: web::Data<AppState>,
    claims: Claims,
    query: web::Query<MonthQuery>,
) -> Result<HttpResponse> {
    let (year, month) = query.resolve(state.attendance_service.local_today());
    let summary = state
        .attendance_service
        .monthly_summary(claims.user_id(), year, month)
        .await?;

    Ok(ApiResponse::ok(summary))
}

pub async fn range(
    state: web::Data<AppState>,
    claims: Claims,
    query: web::Query<RangeQuery>,
) -> Result<HttpResponse> {
    let records = state
        .attendance_service
        .for_range(Some(claims.user_id()), query.start_date, query.end_date)
        .await?;

    Ok(ApiResponse::ok(records))
}
