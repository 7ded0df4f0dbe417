//! HTTP tests for login and security-question verification.

mod common;

use axum::http::StatusCode;
use common::{json_request, send_json, setup_app};
use serde_json::json;

const VERIFY_URI: &str = "/api/users/harry@hogwarts.edu/verify-security-questions";

fn harry_answers() -> serde_json::Value {
    json!({
        "answers": [
            {"answer": "Hedwig"},
            {"answer": "Quidditch Through the Ages"},
            {"answer": "Evans"}
        ]
    })
}

#[tokio::test]
async fn test_login_succeeds_with_correct_credentials() {
    let app = setup_app();

    let (status, body) = send_json(
        &app,
        json_request(
            "POST",
            "/api/login",
            json!({"email": "harry@hogwarts.edu", "password": "potter"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Authentication successful");
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let app = setup_app();

    let (status, body) = send_json(
        &app,
        json_request(
            "POST",
            "/api/login",
            json!({"email": "harry@hogwarts.edu", "password": "malfoy"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized");
}

#[tokio::test]
async fn test_login_unknown_user_matches_wrong_password() {
    let app = setup_app();

    let (wrong_status, wrong_body) = send_json(
        &app,
        json_request(
            "POST",
            "/api/login",
            json!({"email": "harry@hogwarts.edu", "password": "malfoy"}),
        ),
    )
    .await;
    let (unknown_status, unknown_body) = send_json(
        &app,
        json_request(
            "POST",
            "/api/login",
            json!({"email": "draco@hogwarts.edu", "password": "malfoy"}),
        ),
    )
    .await;

    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_status, unknown_status);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn test_login_missing_email() {
    let app = setup_app();

    let (status, body) = send_json(
        &app,
        json_request("POST", "/api/login", json!({"password": "potter"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Bad Request");
}

#[tokio::test]
async fn test_login_missing_password() {
    let app = setup_app();

    let (status, body) = send_json(
        &app,
        json_request("POST", "/api/login", json!({"email": "harry@hogwarts.edu"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Bad Request");
}

#[tokio::test]
async fn test_verify_security_questions_success() {
    let app = setup_app();

    let (status, body) = send_json(&app, json_request("POST", VERIFY_URI, harry_answers())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Security questions successfully answered");
}

#[tokio::test]
async fn test_verify_security_questions_one_wrong_answer() {
    let app = setup_app();

    let mut payload = harry_answers();
    payload["answers"][1]["answer"] = json!("Fantastic Beasts");

    let (status, body) = send_json(&app, json_request("POST", VERIFY_URI, payload)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized");
}

#[tokio::test]
async fn test_verify_security_questions_is_case_sensitive() {
    let app = setup_app();

    let mut payload = harry_answers();
    payload["answers"][0]["answer"] = json!("hedwig");

    let (status, _) = send_json(&app, json_request("POST", VERIFY_URI, payload)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_verify_security_questions_malformed_answers() {
    let app = setup_app();

    let payloads = [
        json!({"answers": [{"answer": "Hedwig"}, {"answer": "Quidditch Through the Ages"}, {"reply": "Evans"}]}),
        json!({"answers": [{"answer": "Hedwig"}]}),
        json!({"answers": ["Hedwig", "Quidditch Through the Ages", "Evans"]}),
        json!({}),
    ];

    for payload in payloads {
        let (status, body) = send_json(&app, json_request("POST", VERIFY_URI, payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Bad Request");
    }
}

#[tokio::test]
async fn test_verify_security_questions_unknown_user() {
    let app = setup_app();

    let (status, body) = send_json(
        &app,
        json_request(
            "POST",
            "/api/users/neville@hogwarts.edu/verify-security-questions",
            harry_answers(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized");
}

#[tokio::test]
async fn test_login_rejects_positional_body() {
    let app = setup_app();

    let (status, body) = send_json(
        &app,
        json_request("POST", "/api/login", json!(["harry@hogwarts.edu", "potter"])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Bad Request");
}

#[tokio::test]
async fn test_verify_security_questions_rejects_array_elements() {
    let app = setup_app();

    let payload = json!({
        "answers": [["Hedwig"], ["Quidditch Through the Ages"], ["Evans"]]
    });
    let (status, body) = send_json(&app, json_request("POST", VERIFY_URI, payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Bad Request");
}

#[tokio::test]
async fn test_verify_security_questions_undecodable_email() {
    let app = setup_app();

    let (status, body) = send_json(
        &app,
        json_request(
            "POST",
            "/api/users/%FF/verify-security-questions",
            harry_answers(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Bad Request");
    assert_eq!(body["error"], json!({}));
}
