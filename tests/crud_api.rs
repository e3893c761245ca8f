// This file is part of the product Proxima.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use common::{TestHarness, build_app};
use serde_json::{Value, json};

#[actix_web::test]
async fn contact_create_requires_name_and_email() {
    let harness = TestHarness::new("crud-contact-required");
    let app = test::init_service(build_app(harness.state.clone())).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/contact")
            .set_json(json!({ "subject": "hello" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/contact")
            .set_json(json!({ "name": "Alice", "email": "  " }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn contact_list_paginates_and_reports_totals() {
    let harness = TestHarness::new("crud-contact-paging");
    let app = test::init_service(build_app(harness.state.clone())).await;

    for i in 0..25 {
        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/contact")
                .set_json(json!({
                    "name": format!("Visitor {}", i),
                    "email": format!("visitor{}@example.com", i),
                    "message": "Looking forward to the conference"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let page: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/contact?page=2&limit=10")
            .to_request(),
    )
    .await;

    assert_eq!(page["success"], true);
    assert_eq!(page["data"].as_array().expect("data").len(), 10);
    assert_eq!(page["page"], 2);
    assert_eq!(page["limit"], 10);
    assert_eq!(page["total"], 25);
    assert_eq!(page["pages"], 3);
}

#[actix_web::test]
async fn unknown_status_filter_is_ignored() {
    let harness = TestHarness::new("crud-status-ignored");
    let app = test::init_service(build_app(harness.state.clone())).await;

    for name in ["Alice", "Bob"] {
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/contact")
                .set_json(json!({ "name": name, "email": "person@example.com" }))
                .to_request(),
        )
        .await;
    }

    let page: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/contact?status=bogus")
            .to_request(),
    )
    .await;
    assert_eq!(page["total"], 2);
}

#[actix_web::test]
async fn contact_text_search_is_case_insensitive_across_fields() {
    let harness = TestHarness::new("crud-contact-search");
    let app = test::init_service(build_app(harness.state.clone())).await;

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/contact")
            .set_json(json!({ "name": "Alice", "email": "alice@example.com", "subject": "Sponsorship" }))
            .to_request(),
    )
    .await;
    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/contact")
            .set_json(json!({ "name": "Bob", "email": "bob@example.com", "message": "General question" }))
            .to_request(),
    )
    .await;

    let page: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/contact?q=SPONSOR")
            .to_request(),
    )
    .await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["data"][0]["name"], "Alice");
}

#[actix_web::test]
async fn contact_status_update_validates_the_enum() {
    let harness = TestHarness::new("crud-contact-status");
    let app = test::init_service(build_app(harness.state.clone())).await;

    let created: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/contact")
            .set_json(json!({ "name": "Alice", "email": "alice@example.com" }))
            .to_request(),
    )
    .await;
    let id = created["data"]["id"].as_str().expect("id").to_string();

    let updated: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/contact/{}", id))
            .set_json(json!({ "status": "read", "note": "handled" }))
            .to_request(),
    )
    .await;
    assert_eq!(updated["data"]["status"], "read");
    assert_eq!(updated["data"]["note"], "handled");

    // Unknown status values leave the stored one alone.
    let updated: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/contact/{}", id))
            .set_json(json!({ "status": "spam" }))
            .to_request(),
    )
    .await;
    assert_eq!(updated["data"]["status"], "read");
}

#[actix_web::test]
async fn newsletter_subscribe_twice_yields_one_subscribed_record() {
    let harness = TestHarness::new("crud-newsletter-idempotent");
    let app = test::init_service(build_app(harness.state.clone())).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/newsletter/subscribe")
            .set_json(json!({ "email": "Fan@Example.com" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/newsletter/subscribe")
            .set_json(json!({ "email": "  fan@example.com " }))
            .to_request(),
    )
    .await;
    assert!(response.status().is_success());

    let page: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/newsletter").to_request(),
    )
    .await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["data"][0]["email"], "fan@example.com");
    assert_eq!(page["data"][0]["status"], "subscribed");
}

#[actix_web::test]
async fn newsletter_resubscribe_flips_status_back() {
    let harness = TestHarness::new("crud-newsletter-flip");
    let app = test::init_service(build_app(harness.state.clone())).await;

    let created: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/newsletter/subscribe")
            .set_json(json!({ "email": "fan@example.com" }))
            .to_request(),
    )
    .await;
    let id = created["data"]["id"].as_str().expect("id").to_string();

    let updated: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/newsletter/{}", id))
            .set_json(json!({ "status": "unsubscribed", "note": "bounced" }))
            .to_request(),
    )
    .await;
    assert_eq!(updated["data"]["status"], "unsubscribed");

    let resubscribed: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/newsletter/subscribe")
            .set_json(json!({ "email": "fan@example.com" }))
            .to_request(),
    )
    .await;
    assert_eq!(resubscribed["data"]["status"], "subscribed");
    assert_eq!(resubscribed["data"]["id"], id.as_str());
}

#[actix_web::test]
async fn newsletter_rejects_invalid_email() {
    let harness = TestHarness::new("crud-newsletter-invalid");
    let app = test::init_service(build_app(harness.state.clone())).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/newsletter/subscribe")
            .set_json(json!({ "email": "not-an-email" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn conference_crud_round_trip() {
    let harness = TestHarness::new("crud-conferences");
    let app = test::init_service(build_app(harness.state.clone())).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/conferences")
            .set_json(json!({}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let created: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/conferences")
            .set_json(json!({ "name": "Proxima Summit" }))
            .to_request(),
    )
    .await;
    let id = created["data"]["id"].as_str().expect("id").to_string();

    let updated: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/conferences/{}", id))
            .set_json(json!({ "name": "Proxima Summit 2026" }))
            .to_request(),
    )
    .await;
    assert_eq!(updated["data"]["name"], "Proxima Summit 2026");

    let response = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/conferences/{}", id))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let page: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/conferences").to_request(),
    )
    .await;
    assert_eq!(page["total"], 0);
}

#[actix_web::test]
async fn sponsor_create_validates_required_fields() {
    let harness = TestHarness::new("crud-sponsors");
    let app = test::init_service(build_app(harness.state.clone())).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/sponsors")
            .set_json(json!({ "name": "Acme", "email": "acme@example.com" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let created: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/sponsors")
            .set_json(json!({
                "name": "Acme",
                "email": "acme@example.com",
                "country": "Norway",
                "organization": "Acme Corp"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(created["data"]["country"], "Norway");
    assert_eq!(created["data"]["sponsor"], Value::Null);
}

#[actix_web::test]
async fn guidelines_upsert_keeps_a_single_document() {
    let harness = TestHarness::new("crud-guidelines");
    let app = test::init_service(build_app(harness.state.clone())).await;

    let empty: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/guidelines").to_request(),
    )
    .await;
    assert_eq!(empty["data"], Value::Null);

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/guidelines")
            .set_json(json!({ "speaker": "" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let first: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/guidelines")
            .set_json(json!({ "speaker": "<p>Arrive early.</p>" }))
            .to_request(),
    )
    .await;
    let id = first["data"]["id"].as_str().expect("id").to_string();

    let second: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/guidelines")
            .set_json(json!({ "speaker": "<p>Arrive very early.</p>" }))
            .to_request(),
    )
    .await;
    assert_eq!(second["data"]["id"], id.as_str());
    assert_eq!(second["data"]["speaker"], "<p>Arrive very early.</p>");
}

#[actix_web::test]
async fn date_range_filter_is_inclusive() {
    let harness = TestHarness::new("crud-date-range");
    let app = test::init_service(build_app(harness.state.clone())).await;

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/contact")
            .set_json(json!({ "name": "Alice", "email": "alice@example.com" }))
            .to_request(),
    )
    .await;

    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    let page: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/contact?from={}&to={}", today, today))
            .to_request(),
    )
    .await;
    assert_eq!(page["total"], 1);

    let page: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/contact?from=2000-01-01&to=2000-12-31")
            .to_request(),
    )
    .await;
    assert_eq!(page["total"], 0);
}
