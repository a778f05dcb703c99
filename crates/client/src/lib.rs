//! Client-side mirror of the board-planner API: a thin HTTP client plus an
//! explicit state cache refreshed by re-fetch after each mutation.

pub mod api;
pub mod state;

pub use api::{ApiClient, ClientError};
pub use state::{BoardState, DraggedTaskInfo, TaskDrop};
