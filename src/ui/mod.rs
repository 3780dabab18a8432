//! Terminal host for the docking engine.
//!
//! This module provides everything needed to run a dock in a terminal:
//!
//! - **terminal**: Cell grid `Surface` and column-based `TextMetrics`
//! - **renderer**: Frame-synchronized, diffing renderer with pointer shapes
//! - **content**: Demo tab content used by the binary

pub mod content;
pub mod renderer;
pub mod terminal;

pub use renderer::Renderer;
pub use terminal::{CellGrid, TerminalMetrics};
