// ABOUTME: Main application structure and state management for the TUI

pub mod auth_flow;
pub mod events;
pub mod form;
pub mod profile_form;
pub mod resource_view;
pub mod runtime;
pub mod state;
pub mod task_form;

pub use events::{AppEvent, EventHandler};
pub use runtime::App;
pub use state::{AppMessage, AppState, AsyncAction, View};
