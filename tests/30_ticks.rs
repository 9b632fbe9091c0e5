mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn first_attempt_lead_send_flashes_without_legacy_flag() -> Result<()> {
    if !common::db_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _user) = common::register_user(&server.base_url).await?;
    let route_id = common::create_route(&server.base_url, &token, "Onsight City").await?;

    let res = client
        .post(format!("{}/routes/{}/ticks", server.base_url, route_id))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "attempts": 1, "lead_send": true }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let tick = res.json::<serde_json::Value>().await?;
    assert_eq!(tick["attempts"], 1);
    assert_eq!(tick["lead_send"], true);
    assert_eq!(tick["lead_flash"], true);
    assert_eq!(tick["top_rope_flash"], false);
    assert_eq!(tick["flash"], false);
    Ok(())
}

#[tokio::test]
async fn patching_an_existing_tick_returns_200() -> Result<()> {
    if !common::db_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _user) = common::register_user(&server.base_url).await?;
    let route_id = common::create_route(&server.base_url, &token, "Work In Progress").await?;

    let url = format!("{}/routes/{}/ticks", server.base_url, route_id);

    let res = client
        .post(&url)
        .bearer_auth(&token)
        .json(&serde_json::json!({ "attempts": 2 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(&url)
        .bearer_auth(&token)
        .json(&serde_json::json!({ "add_attempts": 3, "notes": "so close" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let tick = res.json::<serde_json::Value>().await?;
    assert_eq!(tick["attempts"], 5);
    assert_eq!(tick["notes"], "so close");
    Ok(())
}

#[tokio::test]
async fn send_endpoint_defaults_to_one_attempt_flash() -> Result<()> {
    if !common::db_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _user) = common::register_user(&server.base_url).await?;
    let route_id = common::create_route(&server.base_url, &token, "Walk Up").await?;

    let res = client
        .post(format!("{}/routes/{}/send", server.base_url, route_id))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "style": "top_rope" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let tick = res.json::<serde_json::Value>().await?;
    assert_eq!(tick["attempts"], 1);
    assert_eq!(tick["top_rope_send"], true);
    assert_eq!(tick["top_rope_flash"], true);
    assert_eq!(tick["flash"], true);
    Ok(())
}

#[tokio::test]
async fn unknown_send_style_gets_the_valid_options() -> Result<()> {
    if !common::db_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _user) = common::register_user(&server.base_url).await?;
    let route_id = common::create_route(&server.base_url, &token, "No Ropes Here").await?;

    let res = client
        .post(format!("{}/routes/{}/send", server.base_url, route_id))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "style": "solo" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["valid_options"], serde_json::json!(["top_rope", "lead"]));
    Ok(())
}

#[tokio::test]
async fn lead_send_removes_project_and_blocks_reprojecting() -> Result<()> {
    if !common::db_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _user) = common::register_user(&server.base_url).await?;
    let route_id = common::create_route(&server.base_url, &token, "Someday Maybe").await?;

    let project_url = format!("{}/routes/{}/projects", server.base_url, route_id);

    let res = client
        .post(&project_url)
        .bearer_auth(&token)
        .json(&serde_json::json!({ "notes": "crux at the third bolt" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    // Sending on lead clears the project in the same transaction
    let res = client
        .post(format!("{}/routes/{}/send", server.base_url, route_id))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "style": "lead" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .get(format!("{}/me", project_url))
        .bearer_auth(&token)
        .send()
        .await?;
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["has_project"], false);

    // And the route can no longer be projected
    let res = client.post(&project_url).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn missing_tick_reads_as_absent_not_error() -> Result<()> {
    if !common::db_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _user) = common::register_user(&server.base_url).await?;
    let route_id = common::create_route(&server.base_url, &token, "Untouched").await?;

    let res = client
        .get(format!("{}/routes/{}/ticks/me", server.base_url, route_id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["has_tick"], false);
    assert!(body["tick"].is_null());

    let res = client
        .delete(format!("{}/routes/{}/ticks", server.base_url, route_id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn stats_reflect_the_logbook() -> Result<()> {
    if !common::db_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _user) = common::register_user(&server.base_url).await?;

    // Fresh user: everything zero, no grades
    let res = client
        .get(format!("{}/user/stats", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let stats = res.json::<serde_json::Value>().await?;
    assert_eq!(stats["total_ticks"], 0);
    assert_eq!(stats["average_attempts"], 0.0);
    assert!(stats["hardest_grade"].is_null());
    assert_eq!(stats["achieved_grades"], serde_json::json!([]));

    let route_id = common::create_route(&server.base_url, &token, "Stat Builder").await?;
    let res = client
        .post(format!("{}/routes/{}/send", server.base_url, route_id))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "style": "lead" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .get(format!("{}/user/stats", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    let stats = res.json::<serde_json::Value>().await?;
    assert_eq!(stats["total_ticks"], 1);
    assert_eq!(stats["lead_sends"], 1);
    assert_eq!(stats["hardest_lead_grade"], "6a+");
    assert!(stats["sent_wall_sections"]
        .as_array()
        .unwrap()
        .contains(&serde_json::json!("overhang")));

    // The logbook listing carries route context
    let res = client
        .get(format!("{}/user/ticks", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    let ticks = res.json::<Vec<serde_json::Value>>().await?;
    assert_eq!(ticks.len(), 1);
    assert_eq!(ticks[0]["route_name"], "Stat Builder");
    assert_eq!(ticks[0]["route_grade"], "6a+");
    Ok(())
}
