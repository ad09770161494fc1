//! UI components for the Chairside application

pub mod message_list;
pub mod record_button;
pub mod status_bar;

pub use message_list::MessageList;
pub use record_button::RecordButton;
pub use status_bar::StatusBar;
