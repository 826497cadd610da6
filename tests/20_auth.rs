mod common;

use anyhow::Result;
use chrono::{Duration, Utc};
use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

use driving_school_api::auth::{generate_jwt, Claims, Role};

#[tokio::test]
async fn protected_endpoint_without_token_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/users", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "missing_token");
    Ok(())
}

#[tokio::test]
async fn malformed_token_is_rejected_as_invalid() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/dashboard/stats", server.base_url))
        .header("Authorization", "Bearer not.a.jwt")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "invalid_token");
    Ok(())
}

#[tokio::test]
async fn expired_token_is_rejected_as_invalid() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // Sign with the same secret the spawned server resolves from its config
    let now = Utc::now();
    let claims = Claims {
        sub: Uuid::new_v4(),
        username: "ghost".to_string(),
        role: Role::Admin,
        exp: (now - Duration::hours(2)).timestamp(),
        iat: (now - Duration::hours(3)).timestamp(),
    };
    let token = generate_jwt(&claims)?;

    let res = client
        .get(format!("{}/api/schedule", server.base_url))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "invalid_token");
    Ok(())
}

#[tokio::test]
async fn login_without_body_is_a_client_error() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .send()
        .await?;

    assert!(
        res.status().is_client_error(),
        "expected client error, got {}",
        res.status()
    );
    Ok(())
}

#[tokio::test]
async fn login_with_blank_credentials_reports_field_errors() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&json!({ "username": "", "password": "" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "validation_error");
    assert!(body["field_errors"]["username"].is_string());
    Ok(())
}

#[tokio::test]
async fn login_with_unknown_user_does_not_succeed() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&json!({ "username": "no-such-user", "password": "wrong" }))
        .send()
        .await?;

    // 401 invalid_credentials with a database behind the server; a store
    // error without one. Never a success.
    let status = res.status();
    assert!(
        status == StatusCode::UNAUTHORIZED
            || status == StatusCode::INTERNAL_SERVER_ERROR
            || status == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected status: {}",
        status
    );
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], false);
    if status == StatusCode::UNAUTHORIZED {
        assert_eq!(body["code"], "invalid_credentials");
    }
    Ok(())
}

#[tokio::test]
async fn forged_token_never_reaches_a_report() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // Well-signed student token for an identity that does not exist. The
    // gate either fails to resolve it (unknown_identity) or the store is
    // unreachable; with a seeded matching identity the role check would
    // still answer 403. It never succeeds.
    let claims = Claims::new(Uuid::new_v4(), "student".to_string(), Role::Student);
    let token = generate_jwt(&claims)?;

    let res = client
        .get(format!("{}/api/reports/financial", server.base_url))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await?;

    assert_ne!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], false);
    Ok(())
}
