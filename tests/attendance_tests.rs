use actix_web::{http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::json;

#[macro_use]
mod common;

use common::{TestContext, json_response, punch_body, tokyo};

#[actix_web::test]
async fn test_full_day_on_time() {
    let ctx = TestContext::new(tokyo(2026, 1, 13, 8, 55));
    let app = test_app!(ctx);
    let user = ctx.employee("Sales").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/clock-in")
        .insert_header(ctx.auth_header(&user))
        .set_json(punch_body())
        .to_request();
    let (status, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "present");
    assert_eq!(body["data"]["date"], "2026-01-13");
    assert!(body["data"]["checkOut"].is_null());

    ctx.set_time(tokyo(2026, 1, 13, 18, 0));
    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/clock-out")
        .insert_header(ctx.auth_header(&user))
        .set_json(punch_body())
        .to_request();
    let (status, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "present");
    assert_eq!(body["data"]["workingMinutes"], 545);
    assert_eq!(body["data"]["checkOutLocation"]["latitude"], 35.6812);
}

#[actix_web::test]
async fn test_late_arrival_is_not_downgraded_by_early_leave() {
    let ctx = TestContext::new(tokyo(2026, 1, 13, 9, 15));
    let app = test_app!(ctx);
    let user = ctx.employee("Sales").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/clock-in")
        .insert_header(ctx.auth_header(&user))
        .set_json(punch_body())
        .to_request();
    let (_, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["status"], "late");

    ctx.set_time(tokyo(2026, 1, 13, 17, 30));
    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/clock-out")
        .insert_header(ctx.auth_header(&user))
        .set_json(punch_body())
        .to_request();
    let (_, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["status"], "late");
    assert_eq!(body["data"]["workingMinutes"], 495);
}

#[actix_web::test]
async fn test_leaving_one_minute_early_is_early_leave() {
    let ctx = TestContext::new(tokyo(2026, 1, 13, 9, 0));
    let app = test_app!(ctx);
    let user = ctx.employee("Sales").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/clock-in")
        .insert_header(ctx.auth_header(&user))
        .set_json(punch_body())
        .to_request();
    let (_, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["status"], "present");

    ctx.set_time(tokyo(2026, 1, 13, 17, 59));
    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/clock-out")
        .insert_header(ctx.auth_header(&user))
        .set_json(punch_body())
        .to_request();
    let (_, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["status"], "early_leave");
    assert_eq!(body["data"]["workingMinutes"], 539);
}

#[actix_web::test]
async fn test_duplicate_punches_are_conflicts() {
    let ctx = TestContext::new(tokyo(2026, 1, 13, 8, 45));
    let app = test_app!(ctx);
    let user = ctx.employee("Sales").await;

    let clock_in = || {
        test::TestRequest::post()
            .uri("/api/v1/attendance/clock-in")
            .insert_header(ctx.auth_header(&user))
            .set_json(punch_body())
            .to_request()
    };
    let clock_out = || {
        test::TestRequest::post()
            .uri("/api/v1/attendance/clock-out")
            .insert_header(ctx.auth_header(&user))
            .set_json(punch_body())
            .to_request()
    };

    let (status, _) = json_response(test::call_service(&app, clock_in()).await).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = json_response(test::call_service(&app, clock_in()).await).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert!(body["data"].is_null());

    ctx.set_time(tokyo(2026, 1, 13, 18, 30));
    let (status, _) = json_response(test::call_service(&app, clock_out()).await).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = json_response(test::call_service(&app, clock_out()).await).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_clock_out_without_clock_in_is_not_found() {
    let ctx = TestContext::new(tokyo(2026, 1, 13, 18, 0));
    let app = test_app!(ctx);
    let user = ctx.employee("Sales").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/clock-out")
        .insert_header(ctx.auth_header(&user))
        .set_json(punch_body())
        .to_request();
    let (status, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_yesterdays_open_record_does_not_block_today() {
    let ctx = TestContext::new(tokyo(2026, 1, 12, 9, 30));
    let app = test_app!(ctx);
    let user = ctx.employee("Sales").await;

    let clock_in = || {
        test::TestRequest::post()
            .uri("/api/v1/attendance/clock-in")
            .insert_header(ctx.auth_header(&user))
            .set_json(punch_body())
            .to_request()
    };

    let (status, _) = json_response(test::call_service(&app, clock_in()).await).await;
    assert_eq!(status, StatusCode::OK);

    ctx.set_time(tokyo(2026, 1, 13, 8, 50));
    let (status, body) = json_response(test::call_service(&app, clock_in()).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["date"], "2026-01-13");
    assert_eq!(body["data"]["status"], "present");
}

#[actix_web::test]
async fn test_today_is_null_until_clock_in() {
    let ctx = TestContext::new(tokyo(2026, 1, 13, 8, 0));
    let app = test_app!(ctx);
    let user = ctx.employee("Sales").await;

    let today = || {
        test::TestRequest::get()
            .uri("/api/v1/attendance/today")
            .insert_header(ctx.auth_header(&user))
            .to_request()
    };

    let (status, body) = json_response(test::call_service(&app, today()).await).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].is_null());

    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/clock-in")
        .insert_header(ctx.auth_header(&user))
        .set_json(punch_body())
        .to_request();
    test::call_service(&app, req).await;

    let (_, body) = json_response(test::call_service(&app, today()).await).await;
    assert_eq!(body["data"]["status"], "present");
}

#[actix_web::test]
async fn test_monthly_records_and_summary() {
    let ctx = TestContext::new(tokyo(2026, 1, 5, 8, 30));
    let app = test_app!(ctx);
    let user = ctx.employee("Sales").await;

    // Mon: on time, Tue: late, Wed: early leave
    let days = [(5, (8, 30), (18, 0)), (6, (9, 10), (18, 5)), (7, (8, 50), (16, 0))];
    for (day, (in_h, in_m), (out_h, out_m)) in days {
        ctx.set_time(tokyo(2026, 1, day, in_h, in_m));
        let req = test::TestRequest::post()
            .uri("/api/v1/attendance/clock-in")
            .insert_header(ctx.auth_header(&user))
            .set_json(punch_body())
            .to_request();
        test::call_service(&app, req).await;

        ctx.set_time(tokyo(2026, 1, day, out_h, out_m));
        let req = test::TestRequest::post()
            .uri("/api/v1/attendance/clock-out")
            .insert_header(ctx.auth_header(&user))
            .set_json(punch_body())
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance/monthly?year=2026&month=1")
        .insert_header(ctx.auth_header(&user))
        .to_request();
    let (status, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);
    let records = body["data"].as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["date"], "2026-01-07");

    // Defaults to the current local month.
    let req = test::TestRequest::get()
        .uri("/api/v1/attendance/summary")
        .insert_header(ctx.auth_header(&user))
        .to_request();
    let (status, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["counts"],
        json!({ "present": 1, "late": 1, "early_leave": 1, "absent": 0 })
    );
    assert_eq!(body["data"]["daysWorked"], 3);
    assert_eq!(body["data"]["totalWorkingMinutes"], 570 + 535 + 430);

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance?startDate=2026-01-06&endDate=2026-01-06")
        .insert_header(ctx.auth_header(&user))
        .to_request();
    let (_, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["status"], "late");
}

#[actix_web::test]
async fn test_bad_input_is_rejected_with_envelope() {
    let ctx = TestContext::new(tokyo(2026, 1, 13, 9, 0));
    let app = test_app!(ctx);
    let user = ctx.employee("Sales").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/clock-in")
        .insert_header(ctx.auth_header(&user))
        .set_json(json!({ "location": { "latitude": 91.0, "longitude": 0.0, "accuracy": 5.0 } }))
        .to_request();
    let (status, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/clock-in")
        .insert_header(ctx.auth_header(&user))
        .set_json(json!({ "where": "office" }))
        .to_request();
    let (status, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance/monthly?year=2026&month=13")
        .insert_header(ctx.auth_header(&user))
        .to_request();
    let (status, _) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance?startDate=2026-01-10&endDate=2026-01-01")
        .insert_header(ctx.auth_header(&user))
        .to_request();
    let (status, _) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance/today")
        .to_request();
    let (status, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_shift_past_midnight_can_clock_out() {
    let ctx = TestContext::new(tokyo(2026, 1, 12, 22, 0));
    let app = test_app!(ctx);
    let user = ctx.employee("Ops").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/clock-in")
        .insert_header(ctx.auth_header(&user))
        .set_json(punch_body())
        .to_request();
    let (status, _) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);

    ctx.set_time(tokyo(2026, 1, 13, 1, 0));
    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/clock-out")
        .insert_header(ctx.auth_header(&user))
        .set_json(punch_body())
        .to_request();
    let (status, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["date"], "2026-01-12");
    assert_eq!(body["data"]["status"], "late");
    assert_eq!(body["data"]["workingMinutes"], 180);
}
