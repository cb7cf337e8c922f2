use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web::Data};
use chrono::{Duration, TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use crate::config::Config;
use crate::model::employee::{NewEmployee, Role};
use crate::repository::MemoryRepository;
use crate::routes;
use crate::service::AppState;
use crate::service::clock::FixedClock;

macro_rules! test_app {
    ($state:expr) => {{
        let config = Config::for_tests();
        test::init_service(
            App::new()
                .app_data(Data::new($state.clone()))
                .configure(move |cfg| routes::configure(cfg, &config)),
        )
        .await
    }};
}

struct Harness {
    state: AppState,
    clock: Arc<FixedClock>,
}

#[fixture]
fn harness() -> Harness {
    let clock = Arc::new(FixedClock::at(
        Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap(),
    ));
    let state = AppState::new(Arc::new(MemoryRepository::new()), clock.clone(), 1000);
    Harness { state, clock }
}

async fn hire(state: &AppState, code: &str) -> u64 {
    state
        .employees
        .create(NewEmployee {
            employee_code: code.to_string(),
            name: format!("Employee {code}"),
            email: format!("{}@example.com", code.to_lowercase()),
            role: Role::Employee,
        })
        .await
        .unwrap()
        .id
}

#[rstest]
#[actix_web::test]
async fn check_in_then_out_is_reflected_in_status_and_monthly_stats(harness: Harness) {
    let app = test_app!(harness.state);
    let id = hire(&harness.state, "EMP001").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/attendance/check-in?employeeId={id}&notes=on%20time"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let record: Value = test::read_body_json(resp).await;
    assert_eq!(record["attendance_type"], "check_in");
    assert_eq!(record["notes"], "on time");

    let req = test::TestRequest::post()
        .uri(&format!("/api/attendance/check-in?employeeId={id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_transition");
    assert_eq!(body["message"], "Already checked in today. Please check out first.");

    harness.clock.advance(Duration::hours(9));
    let req = test::TestRequest::post()
        .uri(&format!("/api/attendance/check-out?employee_id={id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri(&format!("/api/attendance/status/{id}"))
        .to_request();
    let status: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(status["status"], "checked_out");
    assert_eq!(status["last_action"], "check_out");

    let req = test::TestRequest::get()
        .uri("/api/attendance/monthly/2026/1")
        .to_request();
    let stats: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stats["total_records"], 2);
    assert_eq!(stats["check_in_count"], 1);
    assert_eq!(stats["check_out_count"], 1);
    assert_eq!(stats["records"][0]["employee"]["employee_code"], "EMP001");
}

#[rstest]
#[actix_web::test]
async fn check_out_without_check_in_is_rejected(harness: Harness) {
    let app = test_app!(harness.state);
    let id = hire(&harness.state, "EMP002").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/attendance/check-out?employeeId={id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Please check in first before checking out.");
}

#[rstest]
#[actix_web::test]
async fn deactivated_employee_keeps_history_but_cannot_check_in(harness: Harness) {
    let app = test_app!(harness.state);
    let id = hire(&harness.state, "EMP003").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/attendance/check-in?employeeId={id}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::put()
        .uri(&format!("/api/employees/{id}"))
        .set_json(json!({ "is_active": false }))
        .to_request();
    let employee: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(employee["is_active"], false);

    harness.clock.advance(Duration::days(1));
    let req = test::TestRequest::post()
        .uri(&format!("/api/attendance/check-in?employeeId={id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "inactive_employee");

    let req = test::TestRequest::get()
        .uri(&format!("/api/attendance/records?employeeId={id}"))
        .to_request();
    let records: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(records.len(), 1);
}

#[rstest]
#[actix_web::test]
async fn only_one_schedule_is_active_after_activation(harness: Harness) {
    let app = test_app!(harness.state);

    let mut ids = Vec::new();
    for (name, check_in, check_out) in [
        ("Standard", "09:00:00", "18:00:00"),
        ("Early", "08:00:00", "16:00:00"),
        ("Late", "14:00:00", "22:00:00"),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/schedules")
            .set_json(json!({
                "name": name,
                "check_in_time": check_in,
                "check_out_time": check_out
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created["is_active"], false);
        ids.push(created["id"].as_u64().unwrap());
    }

    let req = test::TestRequest::get().uri("/api/schedules/active").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    for id in [ids[0], ids[1]] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/schedules/{id}/activate"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get().uri("/api/schedules/active").to_request();
    let active: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(active["id"].as_u64(), Some(ids[1]));
    assert_eq!(active["name"], "Early");

    let req = test::TestRequest::get()
        .uri("/api/schedules?activeOnly=false")
        .to_request();
    let all: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all.len(), 3);
    assert_eq!(all.iter().filter(|s| s["is_active"] == true).count(), 1);

    let req = test::TestRequest::get().uri("/api/schedules").to_request();
    let active_only: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(active_only.len(), 1);
}

#[rstest]
#[actix_web::test]
async fn deleted_schedule_is_gone(harness: Harness) {
    let app = test_app!(harness.state);

    let req = test::TestRequest::post()
        .uri("/api/schedules")
        .set_json(json!({
            "name": "Standard",
            "check_in_time": "09:00:00",
            "check_out_time": "18:00:00"
        }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_u64().unwrap();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/schedules/{id}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/schedules/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Work schedule not found");
}

#[rstest]
#[case::employee("/api/employees/999")]
#[case::schedule("/api/schedules/999")]
#[case::status("/api/attendance/status/999")]
#[actix_web::test]
async fn unknown_ids_are_not_found(harness: Harness, #[case] uri: &str) {
    let app = test_app!(harness.state);

    let req = test::TestRequest::get().uri(uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "not_found");
}

#[rstest]
#[actix_web::test]
async fn duplicate_employee_code_is_rejected(harness: Harness) {
    let app = test_app!(harness.state);

    let payload = json!({
        "employee_code": "EMP001",
        "name": "Zhang San",
        "email": "zhangsan@example.com"
    });
    let req = test::TestRequest::post()
        .uri("/api/employees")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["role"], "employee");
    assert_eq!(created["is_active"], true);

    let req = test::TestRequest::post()
        .uri("/api/employees")
        .set_json(json!({
            "employee_code": "EMP001",
            "name": "Someone Else",
            "email": "someone@example.com"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Employee code already registered");
}

#[rstest]
#[case::bad_email(
    test::TestRequest::post()
        .uri("/api/employees")
        .set_json(json!({ "employee_code": "E1", "name": "N", "email": "not-an-email" }))
)]
#[case::missing_field(
    test::TestRequest::post()
        .uri("/api/employees")
        .set_json(json!({ "employee_code": "E1" }))
)]
#[case::bad_month(test::TestRequest::get().uri("/api/attendance/monthly/2026/13"))]
#[case::non_numeric_id(test::TestRequest::get().uri("/api/employees/abc"))]
#[case::missing_employee_id(test::TestRequest::post().uri("/api/attendance/check-in"))]
#[actix_web::test]
async fn malformed_input_is_unprocessable(harness: Harness, #[case] req: test::TestRequest) {
    let app = test_app!(harness.state);

    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation_error");
}

#[rstest]
#[actix_web::test]
async fn pagination_skips_and_limits(harness: Harness) {
    let app = test_app!(harness.state);
    for code in ["EMP001", "EMP002", "EMP003"] {
        hire(&harness.state, code).await;
    }

    let req = test::TestRequest::get()
        .uri("/api/employees?skip=1&limit=1")
        .to_request();
    let page: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["employee_code"], "EMP002");
}

#[rstest]
#[actix_web::test]
async fn health_reports_healthy(harness: Harness) {
    let app = test_app!(harness.state);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "status": "healthy" }));
}
