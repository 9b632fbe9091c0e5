pub mod db;
pub mod reference;
pub mod routes;
pub mod users;
