pub mod comment;
pub mod grade;
pub mod grade_proposal;
pub mod hold_color;
pub mod lane;
pub mod like;
pub mod project;
pub mod route;
pub mod tick;
pub mod user;
pub mod warning;
