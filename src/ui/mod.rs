//! Ratatui front-end: a two-panel shelf with modal forms layered on top.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use screens::ShelfView;
pub use terminal::run_app;
