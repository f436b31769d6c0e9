//! UI modules for the Schnar map.
//!
//! The page is split into distinct regions:
//! - Top bar: title, load status and theme toggle
//! - Central page: resort map followed by the conditions table
//! - Footer: credit line
//! - Toasts: transient notifications in the bottom-right corner

mod canvas;
pub mod colors;
mod footer;
mod resort_table;
mod toasts;
mod top_bar;

pub use canvas::render_map;
pub use footer::render_footer;
pub use resort_table::render_resort_table;
pub use toasts::render_toasts;
pub use top_bar::{apply_theme, render_top_bar};
