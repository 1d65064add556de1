// ABOUTME: UI components for the TUI: sign-in form, profiles, task board, editors and help

pub mod auth_form;
pub mod form_fields;
pub mod help;
pub mod layout;
pub mod profile_edit;
pub mod profile_view;
pub mod task_form;
pub mod task_list;

pub use auth_form::AuthFormComponent;
pub use help::HelpComponent;
pub use layout::LayoutComponent;
pub use profile_edit::ProfileEditComponent;
pub use profile_view::{ProfileCard, ProfileViewComponent};
pub use task_form::TaskFormComponent;
pub use task_list::TaskListComponent;
