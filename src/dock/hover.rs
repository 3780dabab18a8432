//! Hit-testing: what is under the pointer

use super::geometry::Orientation;
use super::layout::{Element, Folder, Group, NodePath};

/// Pointer shape requested from the host
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorKind {
    #[default]
    Default,
    /// Over a separator between side-by-side children
    ResizeColumn,
    /// Over a separator between stacked children
    ResizeRow,
    /// A tab is being dragged
    Grabbing,
}

impl CursorKind {
    /// Cursor for dragging a separator of a group with this orientation
    pub fn resize(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Horizontal => CursorKind::ResizeColumn,
            Orientation::Vertical => CursorKind::ResizeRow,
        }
    }
}

/// Classification of the element under the pointer
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Hover {
    #[default]
    None,
    /// Gutter between child `index` and `index + 1` of a group
    Separator {
        group: NodePath,
        index: usize,
        cursor: CursorKind,
    },
    MaximizeButton { folder: NodePath },
    /// A folder's content area
    FolderBody { folder: NodePath },
    /// A tab, or with `tab: None` the empty slot after the last tab
    Tab { folder: NodePath, tab: Option<usize> },
}

impl Hover {
    /// Folder whose tab bar shows this hover
    pub fn folder(&self) -> Option<&[usize]> {
        match self {
            Hover::MaximizeButton { folder }
            | Hover::FolderBody { folder }
            | Hover::Tab { folder, .. } => Some(folder),
            Hover::None | Hover::Separator { .. } => None,
        }
    }

    /// Group containing the hovered folder (None for a root folder)
    pub fn parent_group(&self) -> Option<&[usize]> {
        let folder = self.folder()?;
        folder.split_last().map(|(_, parent)| parent)
    }

    /// Position of the hovered folder within its parent group
    pub fn index_in_parent(&self) -> Option<usize> {
        self.folder()?.last().copied()
    }

    pub fn cursor(&self) -> CursorKind {
        match self {
            Hover::Separator { cursor, .. } => *cursor,
            _ => CursorKind::Default,
        }
    }
}

impl Element {
    /// Classify the point `(x, y)`. `path` is the path of `self` and is
    /// extended while descending.
    ///
    /// With `include_trailing` the empty tab-bar space after the last tab
    /// counts as a trailing tab slot (drop at end); otherwise it is no match.
    pub fn find(&self, path: &mut NodePath, x: i32, y: i32, include_trailing: bool) -> Hover {
        match self {
            Element::Group(g) => g.find(path, x, y, include_trailing),
            Element::Folder(f) => f.find(path, x, y, include_trailing),
        }
    }
}

impl Group {
    fn find(&self, path: &mut NodePath, x: i32, y: i32, include_trailing: bool) -> Hover {
        for (i, child) in self.children.iter().enumerate() {
            if child.bounds().contains(x, y) {
                path.push(i);
                return child.find(path, x, y, include_trailing);
            }
        }
        if self.children.len() >= 2 {
            for index in 0..self.children.len() - 1 {
                if self.separator(index).is_some_and(|sep| sep.contains(x, y)) {
                    return Hover::Separator {
                        group: path.clone(),
                        index,
                        cursor: CursorKind::resize(self.orientation),
                    };
                }
            }
        }
        Hover::None
    }
}

impl Folder {
    fn find(&self, path: &mut NodePath, x: i32, y: i32, include_trailing: bool) -> Hover {
        if !self.bounds.contains(x, y) {
            return Hover::None;
        }
        if self.button().contains(x, y) {
            return Hover::MaximizeButton { folder: path.clone() };
        }
        if let Some(index) = self.tab_bounds().iter().position(|r| r.contains(x, y)) {
            return Hover::Tab {
                folder: path.clone(),
                tab: Some(index),
            };
        }
        if self.tab_bar().contains(x, y) {
            return if include_trailing {
                Hover::Tab {
                    folder: path.clone(),
                    tab: None,
                }
            } else {
                Hover::None
            };
        }
        Hover::FolderBody { folder: path.clone() }
    }
}
