//! egui front end for the Chairside client

pub mod app;
pub mod components;
pub mod theme;

pub use app::ChairsideApp;
pub use theme::Theme;
