//! Persist - Layout snapshots and their TOML form
//!
//! A snapshot is a plain tree of [`FolderInfo`] records built by visiting the
//! live tree. Leaves carry tab records, inner nodes carry an orientation and
//! children. A leaf root is always wrapped in a one-child horizontal group so
//! that readers can rely on the root having children.
//!
//! ```toml
//! version = 1
//!
//! [root]
//! weight = -1
//! orientation = "horizontal"
//!
//! [[root.children]]
//! weight = 400
//! current = "editor"
//!
//! [[root.children.tabs]]
//! id = "editor"
//! label = "Editor"
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::geometry::Orientation;
use super::layout::{Element, Folder, Group, LayoutVisitor, UNSET_WEIGHT};
use super::tab::{Tab, TabId, TabInfo};

/// Current snapshot format
pub const LAYOUT_VERSION: u32 = 1;

/// Deepest tree a snapshot may describe
pub const MAX_DEPTH: usize = 64;

/// Persisted form of a tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabRecord {
    pub id: TabId,
    pub label: String,
}

/// Persisted form of a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderInfo {
    #[serde(default = "unset_weight")]
    pub weight: i32,
    /// Set on groups; a missing value alternates from the parent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    /// Visible tab of a leaf
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<TabId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tabs: Vec<TabRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FolderInfo>,
}

fn unset_weight() -> i32 {
    UNSET_WEIGHT
}

impl Default for FolderInfo {
    fn default() -> Self {
        Self {
            weight: UNSET_WEIGHT,
            orientation: None,
            current: None,
            tabs: Vec::new(),
            children: Vec::new(),
        }
    }
}

impl FolderInfo {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Top-level table of a layout file
#[derive(Debug, Serialize, Deserialize)]
struct LayoutFile {
    version: u32,
    root: FolderInfo,
}

/// Errors reading or rebuilding a snapshot
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed layout: {0}")]
    Decode(#[from] toml::de::Error),

    #[error("Failed to encode layout: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("Unsupported layout version: {0}")]
    Version(u32),

    #[error("Node at depth {0} has both tabs and children")]
    MixedNode(usize),

    #[error("Layout nests deeper than {MAX_DEPTH} levels")]
    TooDeep,
}

/// Collects visitor events into a [`FolderInfo`] tree
#[derive(Default)]
struct SnapshotBuilder {
    stack: Vec<FolderInfo>,
    done: Option<FolderInfo>,
}

impl SnapshotBuilder {
    fn close(&mut self) {
        let Some(node) = self.stack.pop() else {
            return;
        };
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.done = Some(node),
        }
    }
}

impl LayoutVisitor for SnapshotBuilder {
    fn group(&mut self, orientation: Orientation, weight: i32) {
        self.stack.push(FolderInfo {
            weight,
            orientation: Some(orientation),
            ..Default::default()
        });
    }

    fn folder(&mut self, weight: i32) {
        self.stack.push(FolderInfo {
            weight,
            ..Default::default()
        });
    }

    fn tab(&mut self, info: &TabInfo) {
        if let Some(folder) = self.stack.last_mut() {
            folder.tabs.push(TabRecord {
                id: info.id.clone(),
                label: info.label.clone(),
            });
        }
    }

    fn end_folder(&mut self) {
        self.close();
    }

    fn end_group(&mut self) {
        self.close();
    }
}

/// Capture the structure of `root`
pub fn snapshot(root: &Element) -> FolderInfo {
    let mut builder = SnapshotBuilder::default();
    root.visit(&mut builder);
    let mut info = builder.done.unwrap_or_default();

    // The visitor has no notion of the visible tab
    let mut currents = Vec::new();
    root.walk_folders(&mut Vec::new(), &mut |_, folder| {
        currents.push(folder.current_tab().map(|t| t.id().clone()));
    });
    let mut currents = currents.into_iter();
    fill_current(&mut info, &mut currents);

    if info.is_leaf() {
        info = FolderInfo {
            weight: info.weight,
            orientation: Some(Orientation::Horizontal),
            children: vec![info],
            ..Default::default()
        };
    }
    info
}

fn fill_current(info: &mut FolderInfo, currents: &mut impl Iterator<Item = Option<TabId>>) {
    if info.is_leaf() {
        info.current = currents.next().flatten();
    } else {
        for child in &mut info.children {
            fill_current(child, currents);
        }
    }
}

/// Rebuild a live tree from `info`.
///
/// `resolve` supplies the live tab for each record; records it rejects are
/// skipped, as are repeats of an id already placed. The result is not
/// merged: empty folders and degenerate groups are left for the caller's
/// merge pass.
pub fn build(
    info: &FolderInfo,
    resolve: &mut dyn FnMut(&TabRecord) -> Option<TabInfo>,
) -> Result<Element, PersistError> {
    let mut builder = TreeBuilder {
        resolve,
        seen: HashSet::new(),
    };
    builder.node(info, None, 0)
}

struct TreeBuilder<'a> {
    resolve: &'a mut dyn FnMut(&TabRecord) -> Option<TabInfo>,
    /// Ids already owned by a rebuilt folder
    seen: HashSet<TabId>,
}

impl TreeBuilder<'_> {
    fn node(
        &mut self,
        info: &FolderInfo,
        parent: Option<Orientation>,
        depth: usize,
    ) -> Result<Element, PersistError> {
        if depth > MAX_DEPTH {
            return Err(PersistError::TooDeep);
        }

        if info.is_leaf() {
            let mut tabs = Vec::with_capacity(info.tabs.len());
            for record in &info.tabs {
                if self.seen.contains(&record.id) {
                    debug!("Skipping repeated tab {}", record.id);
                    continue;
                }
                match (self.resolve)(record) {
                    Some(tab) if self.seen.insert(tab.id.clone()) => tabs.push(Tab::new(tab)),
                    Some(tab) => debug!("Skipping repeated tab {}", tab.id),
                    None => debug!("Skipping unknown tab {}", record.id),
                }
            }
            let mut folder = Folder::with_tabs(tabs);
            folder.weight = info.weight;
            if let Some(index) = info.current.as_ref().and_then(|id| folder.index_of(id)) {
                folder.show(index);
            }
            return Ok(Element::Folder(folder));
        }

        if !info.tabs.is_empty() {
            return Err(PersistError::MixedNode(depth));
        }
        let orientation = info
            .orientation
            .unwrap_or_else(|| parent.map_or(Orientation::Horizontal, Orientation::flip));
        let mut group = Group::new(orientation);
        group.weight = info.weight;
        for child in &info.children {
            group.children.push(self.node(child, Some(orientation), depth + 1)?);
        }
        Ok(Element::Group(group))
    }
}

/// Encode a snapshot as a TOML document
pub fn to_toml(info: &FolderInfo) -> Result<String, PersistError> {
    let file = LayoutFile {
        version: LAYOUT_VERSION,
        root: info.clone(),
    };
    Ok(toml::to_string_pretty(&file)?)
}

pub fn from_toml(text: &str) -> Result<FolderInfo, PersistError> {
    let file: LayoutFile = toml::from_str(text)?;
    if file.version != LAYOUT_VERSION {
        return Err(PersistError::Version(file.version));
    }
    Ok(file.root)
}

/// Write a snapshot to `path`, creating the parent directory
pub fn save(path: &Path, info: &FolderInfo) -> Result<(), PersistError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, to_toml(info)?)?;
    Ok(())
}

pub fn load(path: &Path) -> Result<FolderInfo, PersistError> {
    from_toml(&fs::read_to_string(path)?)
}
