//! TUI pane rendering modules
//!
//! - [`map`]: the scrollable occupancy map
//! - [`status`]: status bar with position, usage summary and keybindings
//!
//! Each pane module exports a `render_*` function that draws into a [`Rect`]
//! and keeps no state of its own beyond the scroll offset it is handed.
//!
//! [`Rect`]: ratatui::layout::Rect

pub mod map;
pub mod status;

pub use map::{render_map_pane, MapRow};
pub use status::{render_status_bar, StatusRenderData};
