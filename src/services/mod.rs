pub mod engagement_service;
pub mod project_service;
pub mod reference_service;
pub mod route_service;
pub mod stats_service;
pub mod tick_service;
pub mod user_service;
