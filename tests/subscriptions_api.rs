mod common;

use actix_web::{http::StatusCode, test};
use birthday_notify::{
    api::{subscriptions::MessageResponse, users::UserResponse},
    services::{pagination::Page, subscriptions},
};
use chrono::{Duration, NaiveDate};

use common::*;

#[actix_web::test]
async fn subscribe_and_list() {
    let state = test_state().await;
    let app = init_app(&state).await;

    let (_, token) = register_and_login(&app, "Ada", "ada@example.org", born_in_2000(12, 10)).await;
    let bob = register(&app, "Bob", "bob@example.org", born_in_2000(1, 2)).await;
    let cid = register(&app, "Cid", "cid@example.org", born_in_2000(5, 5)).await;

    for target in [&cid, &bob] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/users/{}/subscribe", target.id))
            .insert_header(bearer(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: MessageResponse = test::read_body_json(resp).await;
        assert_eq!(
            body.message,
            format!("subscribed to user's birthday with id {}", target.id)
        );
    }

    let req = test::TestRequest::get()
        .uri("/api/subscriptions")
        .insert_header(bearer(&token))
        .to_request();
    let subscriptions: Vec<UserResponse> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(subscriptions, vec![bob, cid]);
}

#[actix_web::test]
async fn subscribe_rejects_duplicates_self_and_unknown() {
    let state = test_state().await;
    let app = init_app(&state).await;

    let (ada, token) = register_and_login(&app, "Ada", "ada@example.org", born_in_2000(12, 10)).await;
    let bob = register(&app, "Bob", "bob@example.org", born_in_2000(1, 2)).await;

    let subscribe = |id: i32| {
        test::TestRequest::post()
            .uri(&format!("/api/users/{}/subscribe", id))
            .insert_header(bearer(&token))
            .to_request()
    };

    let resp = test::call_service(&app, subscribe(bob.id)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(&app, subscribe(bob.id)).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = test::call_service(&app, subscribe(ada.id)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let (_, message) = error_body(resp).await;
    assert_eq!(message, "cannot subscribe to oneself");

    let resp = test::call_service(&app, subscribe(9999)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn unsubscribe_removes_relation_once() {
    let state = test_state().await;
    let app = init_app(&state).await;

    let (_, token) = register_and_login(&app, "Ada", "ada@example.org", born_in_2000(12, 10)).await;
    let bob = register(&app, "Bob", "bob@example.org", born_in_2000(1, 2)).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/users/{}/subscribe", bob.id))
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let unsubscribe = || {
        test::TestRequest::post()
            .uri(&format!("/api/users/{}/unsubscribe", bob.id))
            .insert_header(bearer(&token))
            .to_request()
    };

    let resp = test::call_service(&app, unsubscribe()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: MessageResponse = test::read_body_json(resp).await;
    assert_eq!(
        body.message,
        format!("unsubscribed from user's birthday with id {}", bob.id)
    );

    let resp = test::call_service(&app, unsubscribe()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/subscriptions")
        .insert_header(bearer(&token))
        .to_request();
    let subscriptions: Vec<UserResponse> = test::call_and_read_body_json(&app, req).await;
    assert!(subscriptions.is_empty());
}

#[actix_web::test]
async fn birthdays_lists_only_todays_subscriptions() {
    let state = test_state().await;
    let app = init_app(&state).await;

    let today = birthday_today(&state.config);
    let later = today + Duration::days(40);

    let (_, token) = register_and_login(&app, "Ada", "ada@example.org", today).await;
    let bob = register(&app, "Bob", "bob@example.org", today).await;
    let cid = register(&app, "Cid", "cid@example.org", later).await;
    // Dan празднует сегодня, но на него никто не подписан
    register(&app, "Dan", "dan@example.org", today).await;

    for target in [&bob, &cid] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/users/{}/subscribe", target.id))
            .insert_header(bearer(&token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/birthdays")
        .insert_header(bearer(&token))
        .to_request();
    let birthdays: Vec<UserResponse> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(birthdays, vec![bob]);
}

#[actix_web::test]
async fn subscription_endpoints_require_token() {
    let state = test_state().await;
    let app = init_app(&state).await;

    let bob = register(&app, "Bob", "bob@example.org", born_in_2000(1, 2)).await;

    let requests = [
        test::TestRequest::post()
            .uri(&format!("/api/users/{}/subscribe", bob.id))
            .to_request(),
        test::TestRequest::post()
            .uri(&format!("/api/users/{}/unsubscribe", bob.id))
            .to_request(),
        test::TestRequest::get().uri("/api/subscriptions").to_request(),
        test::TestRequest::get().uri("/api/birthdays").to_request(),
    ];

    for req in requests {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let (code, message) = error_body(resp).await;
        assert_eq!(code, "UNAUTHORIZED");
        assert_eq!(message, "missing auth token");
    }
}

#[actix_web::test]
async fn subscriptions_and_birthdays_are_paginated() {
    let state = test_state().await;
    let app = init_app(&state).await;

    let today = birthday_today(&state.config);
    let (_, token) = register_and_login(&app, "Ada", "ada@example.org", born_in_2000(1, 1)).await;

    let mut watched = Vec::new();
    for name in ["Bob", "Cid", "Dan"] {
        let email = format!("{}@example.org", name.to_lowercase());
        let target = register(&app, name, &email, today).await;
        let req = test::TestRequest::post()
            .uri(&format!("/api/users/{}/subscribe", target.id))
            .insert_header(bearer(&token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
        watched.push(target);
    }

    for path in ["/api/subscriptions", "/api/birthdays"] {
        let req = test::TestRequest::get()
            .uri(&format!("{path}?page=1&page_size=2"))
            .insert_header(bearer(&token))
            .to_request();
        let first: Vec<UserResponse> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(first, watched[..2].to_vec(), "{path}");

        let req = test::TestRequest::get()
            .uri(&format!("{path}?page=2&page_size=2"))
            .insert_header(bearer(&token))
            .to_request();
        let second: Vec<UserResponse> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(second, watched[2..].to_vec(), "{path}");

        let req = test::TestRequest::get()
            .uri(&format!("{path}?page=9223372036854775807&page_size=100"))
            .insert_header(bearer(&token))
            .to_request();
        let beyond: Vec<UserResponse> = test::call_and_read_body_json(&app, req).await;
        assert!(beyond.is_empty(), "{path}");
    }
}

#[actix_web::test]
async fn leap_day_birthdays_move_to_feb_28_in_common_years() {
    let state = test_state().await;
    let app = init_app(&state).await;

    let ada = register(&app, "Ada", "ada@example.org", born_in_2000(1, 1)).await;
    let leap = register(&app, "Leap", "leap@example.org", born_in_2000(2, 29)).await;
    let plain = register(&app, "Plain", "plain@example.org", born_in_2000(2, 28)).await;

    for target in [&leap, &plain] {
        subscriptions::subscribe(&state.db, ada.id, target.id)
            .await
            .expect("subscribe");
    }

    let subscriber_id = ada.id;
    let names_on = |y: i32, m: u32, d: u32| {
        let db = state.db.clone();
        async move {
            let date = NaiveDate::from_ymd_opt(y, m, d).expect("valid date");
            subscriptions::birthdays_on(&db, subscriber_id, date, Page::default())
                .await
                .expect("birthdays")
                .into_iter()
                .map(|u| u.first_name)
                .collect::<Vec<_>>()
        }
    };

    assert_eq!(names_on(2025, 2, 28).await, vec!["Leap", "Plain"]);
    assert_eq!(names_on(2024, 2, 28).await, vec!["Plain"]);
    assert_eq!(names_on(2024, 2, 29).await, vec!["Leap"]);
    assert!(names_on(2025, 3, 1).await.is_empty());
}
