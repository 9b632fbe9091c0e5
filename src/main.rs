use axum::routing::get;
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crux_api::database::manager::DatabaseManager;
use crux_api::handlers;
use crux_api::middleware::jwt_auth_middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, CRUX_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = crux_api::config::config();
    tracing::info!("Starting Crux API in {:?} mode", config.environment);

    // Run migrations up front; a down database still gets a serving /health
    if let Err(e) = DatabaseManager::migrate().await {
        tracing::warn!("migrations not applied at startup: {}", e);
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("CRUX_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("Crux API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::public::root))
        .route("/health", get(handlers::public::health))
        .merge(auth_public_routes())
        // Everything else requires a bearer token
        .merge(protected_routes().layer(axum::middleware::from_fn(jwt_auth_middleware)))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_public_routes() -> Router {
    use axum::routing::post;
    use handlers::public::auth;

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

fn protected_routes() -> Router {
    Router::new()
        .merge(route_routes())
        .merge(engagement_routes())
        .merge(tick_routes())
        .merge(project_routes())
        .merge(reference_routes())
        .merge(user_routes())
}

fn route_routes() -> Router {
    use handlers::protected::routes;

    Router::new()
        .route("/routes", get(routes::list_routes).post(routes::create_route))
        .route(
            "/routes/:id",
            get(routes::get_route)
                .put(routes::update_route)
                .delete(routes::delete_route),
        )
}

fn engagement_routes() -> Router {
    use axum::routing::post;
    use handlers::protected::engagement;

    Router::new()
        .route(
            "/routes/:id/like",
            post(engagement::like_route).delete(engagement::unlike_route),
        )
        .route("/routes/:id/comments", post(engagement::add_comment))
        .route("/routes/:id/grade-proposals", post(engagement::propose_grade))
        .route("/routes/:id/grade-proposals/me", get(engagement::my_grade_proposal))
        .route("/routes/:id/warnings", post(engagement::add_warning))
}

fn tick_routes() -> Router {
    use axum::routing::post;
    use handlers::protected::ticks;

    Router::new()
        .route(
            "/routes/:id/ticks",
            post(ticks::upsert_tick).delete(ticks::remove_tick),
        )
        .route("/routes/:id/ticks/me", get(ticks::my_tick))
        .route("/routes/:id/send", post(ticks::mark_send))
        .route("/routes/:id/attempts", post(ticks::add_attempts))
}

fn project_routes() -> Router {
    use axum::routing::post;
    use handlers::protected::projects;

    Router::new()
        .route(
            "/routes/:id/projects",
            post(projects::add_project).delete(projects::remove_project),
        )
        .route("/routes/:id/projects/me", get(projects::my_project))
}

fn reference_routes() -> Router {
    use handlers::protected::reference;

    Router::new()
        .route("/wall-sections", get(reference::wall_sections))
        .route("/grades", get(reference::grades))
        .route("/grade-definitions", get(reference::grade_definitions))
        .route("/grade-colors", get(reference::grade_colors))
        .route("/hold-colors", get(reference::hold_colors))
        .route("/lanes", get(reference::lanes))
}

fn user_routes() -> Router {
    use axum::routing::put;
    use handlers::protected::user;

    Router::new()
        .route("/auth/me", get(user::me))
        .route("/user/nickname", put(user::set_nickname))
        .route("/user/ticks", get(user::my_ticks))
        .route("/user/likes", get(user::my_likes))
        .route("/user/projects", get(user::my_projects))
        .route("/user/stats", get(user::my_stats))
}
