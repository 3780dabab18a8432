//! Dock - Tabbed-panel docking layout engine.
//!
//! This module provides the docking core, independent of any window system:
//!
//! - **layout**: The group/folder tree, merge pass and proportional layout
//! - **tab**: Tab identity, descriptors and the hosted `Content` seam
//! - **hover**: Hit-testing the tree under the pointer
//! - **drag**: Interaction modes and drop resolution
//! - **area**: `DockArea`, the composite hosts drive
//! - **paint**: `Surface`/`TextMetrics` seams and the painter
//! - **persist**: Layout snapshots and their TOML form
//!
//! # Module Hierarchy
//!
//! ```text
//! dock/
//! ├── mod.rs       - Module exports
//! ├── area.rs      - DockArea (top-level coordinator)
//! ├── layout.rs    - Element / Group / Folder tree
//! ├── tab.rs       - TabId, TabInfo, Tab, Content
//! ├── hover.rs     - Hover classification, cursor shapes
//! ├── drag.rs      - Mode, DragSession, DropAction
//! ├── geometry.rs  - Point, Size, Rect, Orientation, Side
//! ├── paint.rs     - Painter and host drawing traits
//! └── persist.rs   - FolderInfo snapshots
//! ```

pub mod area;
pub mod drag;
pub mod geometry;
pub mod hover;
pub mod layout;
pub mod paint;
pub mod persist;
pub mod tab;

#[cfg(test)]
pub(crate) mod test_support;

pub use area::{Dirty, DockArea, DockEvent};
pub use drag::{DragSession, DropAction, Mode};
pub use geometry::{Orientation, Point, Rect, Side, Size};
pub use hover::{CursorKind, Hover};
pub use layout::{Element, Folder, Group, InvariantViolation, LayoutVisitor, NodePath};
pub use paint::{Surface, TextMetrics};
pub use persist::{FolderInfo, PersistError, TabRecord};
pub use tab::{Content, ContentFactory, Tab, TabId, TabInfo};
