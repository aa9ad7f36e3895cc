// Terminal UI implementation using ratatui
// The pretty face of shelfscout

pub mod app;
pub mod runner;
pub mod ui;

pub use app::{App, Phase};
pub use runner::run_tui;
