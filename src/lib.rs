//! tabdock - A tabbed-panel docking layout engine.
//!
//! Tabs live in folders; folders are arranged by nested horizontal and
//! vertical groups. Tabs are rearranged by dragging them between folders or
//! onto a folder's edge, which splits it. The engine lays out and paints
//! through host-provided traits, and ships with a terminal host in [`ui`].

pub mod config;
pub mod dock;
pub mod ui;
