pub mod assoc;
pub mod manager;
pub mod models;
pub mod refs;
