#![allow(dead_code, unused_macros)]

use std::sync::Arc;

use actix_web::{body::MessageBody, dev::ServiceResponse, http::StatusCode, test, web};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use fake::{
    Fake,
    faker::{internet::en::SafeEmail, name::en::Name},
};
use serde_json::Value;
use uuid::Uuid;

use punchclock::config::Config;
use punchclock::database::models::{CreateUserInput, GeoLocation, User, UserRole};
use punchclock::services::FixedClock;
use punchclock::AppState;

pub const PASSWORD: &str = "password123";

pub const OFFICE: GeoLocation = GeoLocation {
    latitude: 35.6812,
    longitude: 139.7671,
    accuracy: 12.0,
};

/// Builds the full `/api/v1` app around a [`TestContext`].
macro_rules! test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($ctx.state.clone())
                .app_data($ctx.config_data.clone())
                .wrap(punchclock::middleware::RequestIdMiddleware)
                .configure(punchclock::routes::configure),
        )
        .await
    };
}

/// Clocks `$user` in (and optionally out) on 2026-01-`$day`, Tokyo time.
macro_rules! punch_day {
    ($ctx:expr, $app:expr, $user:expr, $day:expr, $check_in:expr, $check_out:expr) => {{
        let (in_hour, in_minute): (u32, u32) = $check_in;
        $ctx.set_time(crate::common::tokyo(2026, 1, $day, in_hour, in_minute));
        let req = actix_web::test::TestRequest::post()
            .uri("/api/v1/attendance/clock-in")
            .insert_header($ctx.auth_header(&$user))
            .set_json(crate::common::punch_body())
            .to_request();
        assert!(actix_web::test::call_service(&$app, req).await.status().is_success());

        let check_out: Option<(u32, u32)> = $check_out;
        if let Some((out_hour, out_minute)) = check_out {
            $ctx.set_time(crate::common::tokyo(2026, 1, $day, out_hour, out_minute));
            let req = actix_web::test::TestRequest::post()
                .uri("/api/v1/attendance/clock-out")
                .insert_header($ctx.auth_header(&$user))
                .set_json(crate::common::punch_body())
                .to_request();
            assert!(actix_web::test::call_service(&$app, req).await.status().is_success());
        }
    }};
}

/// A UTC instant for a wall-clock time in Tokyo (the test config's zone).
pub fn tokyo(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    FixedOffset::east_opt(9 * 3600)
        .unwrap()
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .unwrap()
        .with_timezone(&Utc)
}

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub config_data: web::Data<Config>,
    pub clock: FixedClock,
}

impl TestContext {
    /// In-memory app whose clock starts at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_config(Config::test_config(), now)
    }

    pub fn with_config(config: Config, now: DateTime<Utc>) -> Self {
        let clock = FixedClock::new(now);
        let state = AppState::in_memory(config.clone(), Arc::new(clock.clone()));

        Self {
            state: web::Data::new(state),
            config_data: web::Data::new(config),
            clock,
        }
    }

    pub fn set_time(&self, now: DateTime<Utc>) {
        self.clock.set(now);
    }

    pub async fn create_user(
        &self,
        role: UserRole,
        department: &str,
        manager_id: Option<Uuid>,
    ) -> User {
        let email: String = SafeEmail().fake();
        let name: String = Name().fake();
        self.state
            .auth_service
            .create_user(CreateUserInput {
                // Prefix keeps generated addresses unique within a test.
                email: format!("{}.{}", Uuid::new_v4().simple(), email),
                password: PASSWORD.to_string(),
                name,
                role: Some(role),
                department: department.to_string(),
                position: None,
                employee_number: None,
                manager_id,
            })
            .await
            .expect("failed to create test user")
    }

    pub async fn employee(&self, department: &str) -> User {
        self.create_user(UserRole::Employee, department, None).await
    }

    pub async fn admin(&self) -> User {
        self.create_user(UserRole::Admin, "Administration", None).await
    }

    pub fn token(&self, user: &User) -> String {
        self.state
            .auth_service
            .generate_token(user)
            .expect("failed to sign test token")
    }

    pub fn auth_header(&self, user: &User) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.token(user)))
    }
}

pub fn punch_body() -> Value {
    serde_json::json!({ "location": OFFICE })
}

/// Status and parsed JSON envelope of a response.
pub async fn json_response<B: MessageBody>(res: ServiceResponse<B>) -> (StatusCode, Value) {
    let status = res.status();
    let body: Value = test::read_body_json(res).await;
    (status, body)
}
