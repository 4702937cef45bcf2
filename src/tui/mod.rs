//! TUI module: Terminal User Interface using Ratatui.
//!
//! A single screen with:
//! - Input form (13 clinical features in three groups)
//! - Result panel with tiered advice
//! - Feature reference overlay

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::MedicalTheme;
pub use ui::result::ViewState;
