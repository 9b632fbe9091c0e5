pub mod engagement;
pub mod projects;
pub mod reference;
pub mod routes;
pub mod ticks;
pub mod user;
