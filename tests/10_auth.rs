mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn protected_endpoints_require_a_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/routes", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "TOKEN_MISSING");
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_unprocessable() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/routes", server.base_url))
        .bearer_auth("not-a-jwt")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "TOKEN_MALFORMED");
    Ok(())
}

#[tokio::test]
async fn register_login_and_whoami() -> Result<()> {
    if !common::db_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (token, user) = common::register_user(&server.base_url).await?;
    let username = user["username"].as_str().unwrap().to_string();

    // The token works immediately
    let res = client
        .get(format!("{}/auth/me", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let me = res.json::<serde_json::Value>().await?;
    assert_eq!(me["username"], username.as_str());
    assert!(me.get("password_hash").is_none(), "hash must never serialize");

    // Login with the same credentials
    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&serde_json::json!({ "username": username, "password": "chalkbag42" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // Wrong password is a 401, not a 404
    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&serde_json::json!({ "username": username, "password": "wrong" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn duplicate_username_is_rejected_case_insensitively() -> Result<()> {
    if !common::db_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (_token, user) = common::register_user(&server.base_url).await?;
    let username = user["username"].as_str().unwrap().to_uppercase();

    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&serde_json::json!({
            "username": username,
            "nickname": format!("other{}", common::unique_suffix()),
            "email": format!("other{}@example.com", common::unique_suffix()),
            "password": "chalkbag42",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn duplicate_nickname_is_rejected_case_insensitively() -> Result<()> {
    if !common::db_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (_token, user) = common::register_user(&server.base_url).await?;
    let nickname = user["nickname"].as_str().unwrap().to_uppercase();

    // Same nickname in a different case, everything else fresh
    let suffix = common::unique_suffix();
    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&serde_json::json!({
            "username": format!("climber{}", suffix),
            "nickname": nickname,
            "email": format!("climber{}@example.com", suffix),
            "password": "chalkbag42",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    Ok(())
}

#[tokio::test]
async fn login_accepts_any_username_casing() -> Result<()> {
    if !common::db_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (_token, user) = common::register_user(&server.base_url).await?;
    let username = user["username"].as_str().unwrap().to_uppercase();

    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&serde_json::json!({ "username": username, "password": "chalkbag42" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn bad_nicknames_are_rejected() -> Result<()> {
    if !common::db_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for nickname in ["ab", "has spaces", "way_too_long_for_a_nickname"] {
        let suffix = common::unique_suffix();
        let res = client
            .post(format!("{}/auth/register", server.base_url))
            .json(&serde_json::json!({
                "username": format!("climber{}", suffix),
                "nickname": nickname,
                "email": format!("climber{}@example.com", suffix),
                "password": "chalkbag42",
            }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "nickname {:?}", nickname);
    }
    Ok(())
}
