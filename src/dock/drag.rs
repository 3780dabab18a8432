//! Drag - Pointer interaction modes and tab drag-and-drop
//!
//! The dock is always in exactly one [`Mode`]. A drag owns its transient
//! visuals (the floating title preview and the drop-zone overlay) inside the
//! [`Mode::Dragging`] payload, so leaving that mode for any reason destroys
//! them.

use super::geometry::{Point, Rect, Side};
use super::hover::Hover;
use super::layout::{Element, NodePath};
use super::tab::TabId;

/// Pointer interaction state
#[derive(Debug, Default)]
pub enum Mode {
    #[default]
    Idle,
    /// Pointer went down on a tab but has not moved yet
    ArmedForDrag {
        folder: NodePath,
        tab: usize,
        origin: Point,
    },
    Dragging(DragSession),
    /// A separator is being dragged
    Resizing {
        group: NodePath,
        index: usize,
        last: Point,
    },
}

impl Mode {
    pub fn is_idle(&self) -> bool {
        matches!(self, Mode::Idle)
    }

    pub fn drag(&self) -> Option<&DragSession> {
        match self {
            Mode::Dragging(session) => Some(session),
            _ => None,
        }
    }
}

/// Floating window following the pointer with the dragged tab's title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPreview {
    pub title: String,
    pub position: Point,
}

/// Overlay covering the docking area, highlighting where a drop would split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropOverlay {
    pub area: Rect,
    pub highlight: Option<Rect>,
}

/// An in-progress tab drag
#[derive(Debug)]
pub struct DragSession {
    /// Folder the tab is dragged out of
    pub source: NodePath,
    /// Index of the tab in the source folder
    pub tab: usize,
    pub id: TabId,
    pub preview: DragPreview,
    pub overlay: DropOverlay,
}

/// Structural change a drop commits to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropAction {
    /// Nothing changes
    Cancel,
    /// Reorder within the source folder
    Reorder {
        folder: NodePath,
        from: usize,
        before: Option<usize>,
    },
    /// Move into another folder before `before` (or at the end)
    Move { to: NodePath, before: Option<usize> },
    /// Dock into a new folder on `side` of `target`
    Split { target: NodePath, side: Side },
}

impl DragSession {
    pub fn start(source: NodePath, tab: usize, id: TabId, title: &str, at: Point, area: Rect) -> Self {
        Self {
            source,
            tab,
            id,
            preview: DragPreview {
                title: title.to_string(),
                position: at,
            },
            overlay: DropOverlay {
                area,
                highlight: None,
            },
        }
    }

    /// Follow the pointer: move the preview and update the drop-zone highlight
    pub fn track(&mut self, hover: &Hover, root: &Element, at: Point) {
        self.preview.position = at;
        self.overlay.highlight = match hover {
            Hover::FolderBody { folder } => root.folder(folder).and_then(|f| {
                Side::classify(&f.bounds, at.x, at.y).map(|side| side.zone(&f.bounds))
            }),
            _ => None,
        };
    }

    /// Decide what releasing the pointer at `at` over `hover` would do
    pub fn resolve(&self, hover: &Hover, root: &Element, at: Point) -> DropAction {
        match hover {
            Hover::Tab { folder, tab } if *folder == self.source => {
                let len = root.folder(folder).map_or(0, |f| f.tabs.len());
                let target = tab.unwrap_or(len);
                if target == self.tab || target == self.tab + 1 {
                    DropAction::Cancel
                } else {
                    DropAction::Reorder {
                        folder: folder.clone(),
                        from: self.tab,
                        before: *tab,
                    }
                }
            }
            Hover::Tab { folder, tab } => DropAction::Move {
                to: folder.clone(),
                before: *tab,
            },
            Hover::FolderBody { folder } => {
                let Some(target) = root.folder(folder) else {
                    return DropAction::Cancel;
                };
                match Side::classify(&target.bounds, at.x, at.y) {
                    // Re-docking a folder's only tab beside itself changes nothing
                    Some(_) if *folder == self.source && target.tabs.len() == 1 => DropAction::Cancel,
                    Some(side) => DropAction::Split {
                        target: folder.clone(),
                        side,
                    },
                    None => DropAction::Cancel,
                }
            }
            Hover::None | Hover::Separator { .. } | Hover::MaximizeButton { .. } => DropAction::Cancel,
        }
    }
}
