pub mod bridge;
pub mod dialogs;
