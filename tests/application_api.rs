mod common;

use axum::http::StatusCode;
use chrono::{Duration, NaiveDate};
use common::{body_json, build_test_app, get, get_as, location, post_as, user_with};
use rust_decimal::Decimal;
use scholarship_archive::models::{today, ApplicationStatus, CreateInstance, CreateStudent, Permission};
use scholarship_archive::service::{InstanceService, StudentService};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

async fn instance(pool: &PgPool, imprint: &str, deadline: Option<NaiveDate>, status: ApplicationStatus) -> Uuid {
    InstanceService::create(
        pool,
        &CreateInstance {
            scholarship_id: None,
            imprint: imprint.into(),
            deadline,
            status,
        },
    )
    .await
    .unwrap()
    .id
}

async fn student(pool: &PgPool, first: &str, last: &str) -> Uuid {
    StudentService::create(
        pool,
        &CreateStudent {
            first_name: first.into(),
            last_name: last.into(),
            gpa: Decimal::new(375, 2),
        },
    )
    .await
    .unwrap()
    .id
}

fn next_month() -> Option<NaiveDate> {
    Some(today() + Duration::days(30))
}

#[sqlx::test]
async fn applying_twice_keeps_one_membership(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let clerk = user_with(&pool, "clerk", &[]).await;
    let id = instance(&pool, "2026 cycle", next_month(), ApplicationStatus::Available).await;
    let ada = student(&pool, "Ada", "Lovelace").await;

    for _ in 0..2 {
        let response = post_as(&app, &format!("/scholarship/{id}/apply/"), clerk, json!({ "student_id": ada })).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/success");
    }

    let applicants = InstanceService::applicants(&pool, id).await.unwrap();
    assert_eq!(applicants.len(), 1);
    assert_eq!(applicants[0].id, ada);

    let applied = InstanceService::get(&pool, id).await.unwrap();
    assert_eq!(applied.status, ApplicationStatus::Applied);
    assert_eq!(applied.applicant_id, Some(clerk));

    let form = body_json(get_as(&app, &format!("/scholarship/{id}/apply/"), clerk).await).await;
    assert_eq!(form["data"]["status"], "applied");
    assert_eq!(form["data"]["applicants"][0]["last_name"], "Lovelace");

    assert_eq!(get(&app, "/success").await.status(), StatusCode::OK);
}

#[sqlx::test]
async fn past_deadline_and_rewarded_instances_refuse_applications(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let clerk = user_with(&pool, "clerk", &[]).await;
    let ada = student(&pool, "Ada", "Lovelace").await;
    let closed = instance(&pool, "1999 cycle", NaiveDate::from_ymd_opt(2000, 1, 1), ApplicationStatus::Available).await;
    let rewarded = instance(&pool, "2026 cycle", next_month(), ApplicationStatus::Rewarded).await;

    let late = post_as(&app, &format!("/scholarship/{closed}/apply/"), clerk, json!({ "student_id": ada })).await;
    assert_eq!(late.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let taken = post_as(&app, &format!("/scholarship/{rewarded}/apply/"), clerk, json!({ "student_id": ada })).await;
    assert_eq!(taken.status(), StatusCode::CONFLICT);

    assert!(InstanceService::applicants(&pool, closed).await.unwrap().is_empty());
    let unchanged = InstanceService::get(&pool, rewarded).await.unwrap();
    assert_eq!(unchanged.status, ApplicationStatus::Rewarded);
    assert_eq!(unchanged.applicant_id, None);

    let view = body_json(get_as(&app, &format!("/scholarship/{closed}/apply/"), clerk).await).await;
    assert_eq!(view["data"]["is_pastdeadline"], true);
}

#[sqlx::test]
async fn apply_rejects_bad_ids(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let clerk = user_with(&pool, "clerk", &[]).await;
    let id = instance(&pool, "2026 cycle", None, ApplicationStatus::Available).await;

    let malformed = post_as(&app, "/scholarship/not-a-uuid/apply/", clerk, json!({ "student_id": Uuid::new_v4() })).await;
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);

    let unknown_instance = post_as(
        &app,
        &format!("/scholarship/{}/apply/", Uuid::new_v4()),
        clerk,
        json!({ "student_id": Uuid::new_v4() }),
    )
    .await;
    assert_eq!(unknown_instance.status(), StatusCode::NOT_FOUND);

    let unknown_student = post_as(&app, &format!("/scholarship/{id}/apply/"), clerk, json!({ "student_id": Uuid::new_v4() })).await;
    assert_eq!(unknown_student.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(InstanceService::get(&pool, id).await.unwrap().status, ApplicationStatus::Available);
}

#[sqlx::test]
async fn my_scholarships_lists_only_own_applications(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let alice = user_with(&pool, "alice", &[]).await;
    let bob = user_with(&pool, "bob", &[]).await;
    let ada = student(&pool, "Ada", "Lovelace").await;
    let later = instance(&pool, "later", Some(today() + Duration::days(60)), ApplicationStatus::Available).await;
    let sooner = instance(&pool, "sooner", next_month(), ApplicationStatus::Available).await;
    let undated = instance(&pool, "undated", None, ApplicationStatus::Available).await;
    let bobs = instance(&pool, "bobs", next_month(), ApplicationStatus::Available).await;

    for id in [later, undated, sooner] {
        post_as(&app, &format!("/scholarship/{id}/apply/"), alice, json!({ "student_id": ada })).await;
    }
    post_as(&app, &format!("/scholarship/{bobs}/apply/"), bob, json!({ "student_id": ada })).await;

    let body = body_json(get_as(&app, "/myscholarships/", alice).await).await;
    let imprints: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["imprint"].as_str().unwrap())
        .collect();
    assert_eq!(imprints, vec!["sooner", "later", "undated"]);

    assert_eq!(get(&app, "/myscholarships/").await.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test]
async fn all_applied_requires_can_mark_awarded(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let clerk = user_with(&pool, "clerk", &[]).await;
    let officer = user_with(&pool, "officer", &[Permission::CanMarkAwarded]).await;
    let ada = student(&pool, "Ada", "Lovelace").await;
    let id = instance(&pool, "2026 cycle", next_month(), ApplicationStatus::Available).await;
    instance(&pool, "untouched", next_month(), ApplicationStatus::Available).await;
    post_as(&app, &format!("/scholarship/{id}/apply/"), clerk, json!({ "student_id": ada })).await;

    assert_eq!(get_as(&app, "/apply/", clerk).await.status(), StatusCode::FORBIDDEN);
    let body = body_json(get_as(&app, "/apply/", officer).await).await;
    assert_eq!(body["meta"]["count"], 1);
    assert_eq!(body["data"][0]["id"], id.to_string());
}

#[sqlx::test]
async fn marking_status_requires_can_mark_awarded(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let clerk = user_with(&pool, "clerk", &[]).await;
    let officer = user_with(&pool, "officer", &[Permission::CanMarkAwarded]).await;
    let id = instance(&pool, "2026 cycle", next_month(), ApplicationStatus::Applied).await;
    let uri = format!("/scholarship/{id}/status/");

    assert_eq!(post_as(&app, &uri, clerk, json!({ "status": "rewarded" })).await.status(), StatusCode::FORBIDDEN);

    let marked = post_as(&app, &uri, officer, json!({ "status": "r" })).await;
    assert_eq!(marked.status(), StatusCode::OK);
    assert_eq!(body_json(marked).await["data"]["status"], "rewarded");
    assert_eq!(InstanceService::get(&pool, id).await.unwrap().status, ApplicationStatus::Rewarded);

    let bogus = post_as(&app, &uri, officer, json!({ "status": "lost" })).await;
    assert!(bogus.status().is_client_error());
}

#[sqlx::test]
async fn applicants_page_lists_students_with_their_applications(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let clerk = user_with(&pool, "clerk", &[]).await;
    let ada = student(&pool, "Ada", "Lovelace").await;
    let grace = student(&pool, "Grace", "Hopper").await;
    student(&pool, "Alan", "Turing").await;
    let id = instance(&pool, "2026 cycle", next_month(), ApplicationStatus::Available).await;
    for s in [ada, grace] {
        post_as(&app, &format!("/scholarship/{id}/apply/"), clerk, json!({ "student_id": s })).await;
    }

    let body = body_json(get(&app, "/applicants/").await).await;
    assert_eq!(body["meta"]["count"], 2);
    assert_eq!(body["data"][0]["display"], "Hopper, Grace");
    assert_eq!(body["data"][1]["display"], "Lovelace, Ada");
    assert_eq!(body["data"][1]["applied_scholarships"], json!([id.to_string()]));
}

#[sqlx::test]
async fn index_counts_archive_records(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    instance(&pool, "open", None, ApplicationStatus::Available).await;
    instance(&pool, "won", None, ApplicationStatus::Rewarded).await;
    student(&pool, "Ada", "Lovelace").await;

    let body = body_json(get(&app, "/").await).await;
    assert_eq!(body["data"]["instances"], 2);
    assert_eq!(body["data"]["instances_available"], 1);
    assert_eq!(body["data"]["students"], 1);
    assert_eq!(body["data"]["donors"], 0);
}

#[sqlx::test]
async fn health_and_ready(pool: PgPool) {
    let app = build_test_app(pool).await;
    assert_eq!(body_json(get(&app, "/health").await).await["status"], "ok");
    assert_eq!(body_json(get(&app, "/ready").await).await["database"], "ok");
    assert_eq!(body_json(get(&app, "/version").await).await["name"], "scholarship-archive");
}

#[sqlx::test]
async fn students_are_found_by_id_and_listed_by_name(pool: PgPool) {
    build_test_app(pool.clone()).await;
    let ada = student(&pool, "Ada", "Lovelace").await;
    student(&pool, "Grace", "Hopper").await;
    student(&pool, "Alan", "Hopper").await;

    let found = StudentService::find(&pool, ada).await.unwrap().unwrap();
    assert_eq!(found.to_string(), "Lovelace, Ada");
    assert_eq!(found.gpa, Decimal::new(375, 2));
    assert!(StudentService::find(&pool, Uuid::new_v4()).await.unwrap().is_none());

    let names: Vec<String> = StudentService::list(&pool, 10, 0)
        .await
        .unwrap()
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(names, vec!["Hopper, Alan", "Hopper, Grace", "Lovelace, Ada"]);
    assert_eq!(StudentService::list(&pool, 1, 2).await.unwrap()[0].id, ada);
}
