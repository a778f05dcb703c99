pub mod board;
pub mod comment;
pub mod list;
pub mod task;
pub mod user;
