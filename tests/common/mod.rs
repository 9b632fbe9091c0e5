use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    #[allow(dead_code)]
    pub port: u16,
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        let mut cmd = Command::new("target/debug/crux-api");
        cmd.env("CRUX_API_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server sees DATABASE_URL and CRUX_JWT_SECRET
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Database-backed tests only run when DATABASE_URL is configured.
pub fn db_configured() -> bool {
    std::env::var("DATABASE_URL").is_ok()
}

/// Suffix for usernames/emails so repeated runs never collide.
pub fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .subsec_nanos();
    format!("{}{}", std::process::id(), nanos)
}

/// Register a fresh user and return (token, user json).
#[allow(dead_code)]
pub async fn register_user(base_url: &str) -> Result<(String, serde_json::Value)> {
    let suffix = unique_suffix();
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/auth/register", base_url))
        .json(&serde_json::json!({
            "username": format!("climber{}", suffix),
            "nickname": format!("crusher{}", suffix),
            "email": format!("climber{}@example.com", suffix),
            "password": "chalkbag42",
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "registration failed: {}",
        res.status()
    );
    let body: serde_json::Value = res.json().await?;
    let token = body["token"]
        .as_str()
        .context("registration response missing token")?
        .to_string();
    Ok((token, body["user"].clone()))
}

/// Create a route through the API and return its id.
#[allow(dead_code)]
pub async fn create_route(base_url: &str, token: &str, name: &str) -> Result<i64> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/routes", base_url))
        .bearer_auth(token)
        .json(&serde_json::json!({
            "name": name,
            "grade": "6a+",
            "route_setter": "Sam",
            "wall_section": "overhang",
            "lane": 3,
            "color": "Red",
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "route creation failed: {}",
        res.status()
    );
    let body: serde_json::Value = res.json().await?;
    body["id"].as_i64().context("route response missing id")
}
