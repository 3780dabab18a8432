//! Layout - The recursive tree of groups and folders
//!
//! Internal nodes are [`Group`]s laying children out along one axis, leaves
//! are [`Folder`]s holding tabs. Nodes are addressed by a [`NodePath`] of child
//! indices from the root; there are no parent pointers. Structural edits that
//! affect a parent are returned to it as a [`MergeOutcome`].

use thiserror::Error;

use crate::config::DockMetrics;

use super::geometry::{Orientation, Rect, Side};
use super::paint::TextMetrics;
use super::tab::{Tab, TabId, TabInfo};

/// Child indices from the root down to a node
pub type NodePath = Vec<usize>;

/// Weight meaning "distribute evenly"
pub const UNSET_WEIGHT: i32 = -1;

/// Shared inputs for a layout pass
pub struct LayoutContext<'a> {
    pub metrics: &'a DockMetrics,
    pub text: &'a dyn TextMetrics,
}

/// A node of the layout tree
#[derive(Debug)]
pub enum Element {
    Group(Group),
    Folder(Folder),
}

/// Internal node laying out its children along `orientation`
#[derive(Debug)]
pub struct Group {
    pub orientation: Orientation,
    pub children: Vec<Element>,
    pub weight: i32,
    pub bounds: Rect,
}

/// Leaf node hosting tabs
#[derive(Debug)]
pub struct Folder {
    /// Tabs in display order
    pub tabs: Vec<Tab>,
    /// Index of the visible tab
    pub current: Option<usize>,
    pub maximized: bool,
    pub weight: i32,
    pub bounds: Rect,
    /// Hit areas of the tabs, parallel to `tabs`
    tab_bounds: Vec<Rect>,
    tab_bar_height: i32,
    button_size: i32,
}

/// What a merge pass did to a node, applied by its parent
#[derive(Debug)]
pub enum MergeOutcome {
    /// The node is gone
    Removed,
    /// The node collapsed into this element
    Replaced(Element),
    Unchanged,
}

/// Receives the structural events of a depth-first traversal
///
/// Events are well nested: every `group` is closed by `end_group`, every
/// `folder` by `end_folder`, and `tab` only appears inside a folder.
pub trait LayoutVisitor {
    fn group(&mut self, orientation: Orientation, weight: i32);
    fn folder(&mut self, weight: i32);
    fn tab(&mut self, info: &TabInfo);
    fn end_folder(&mut self);
    fn end_group(&mut self);
}

/// A broken tree invariant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("group at {path:?} has {count} children")]
    DegenerateGroup { path: NodePath, count: usize },

    #[error("group at {0:?} nests a group of the same orientation")]
    SameOrientation(NodePath),

    #[error("folder at {0:?} has no tabs")]
    EmptyFolder(NodePath),

    #[error("folder at {path:?} shows tab {current} of {count}")]
    CurrentOutOfRange { path: NodePath, current: usize, count: usize },

    #[error("{0} folders are maximized")]
    MultipleMaximized(usize),
}

/// Split `extent` between children proportionally to `weights`.
///
/// Any unset weight makes the split even. Pixels lost to rounding go one per
/// child from the first, so the sizes always add up to `extent`.
pub fn distribute(extent: i32, weights: &[i32]) -> Vec<i32> {
    if weights.is_empty() {
        return Vec::new();
    }
    let extent = extent.max(0);
    let mut sizes: Vec<i32> = if weights.iter().any(|&w| w <= 0) {
        vec![extent / weights.len() as i32; weights.len()]
    } else {
        let total: i64 = weights.iter().map(|&w| w as i64).sum();
        weights
            .iter()
            .map(|&w| (extent as i64 * w as i64 / total) as i32)
            .collect()
    };
    let mut leftover = extent - sizes.iter().sum::<i32>();
    for size in sizes.iter_mut() {
        if leftover == 0 {
            break;
        }
        *size += 1;
        leftover -= 1;
    }
    sizes
}

fn halve(weight: i32) -> (i32, i32) {
    if weight <= 0 {
        (UNSET_WEIGHT, UNSET_WEIGHT)
    } else {
        (weight - weight / 2, (weight / 2).max(1))
    }
}

impl Element {
    pub fn weight(&self) -> i32 {
        match self {
            Element::Group(g) => g.weight,
            Element::Folder(f) => f.weight,
        }
    }

    pub fn set_weight(&mut self, weight: i32) {
        match self {
            Element::Group(g) => g.weight = weight,
            Element::Folder(f) => f.weight = weight,
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Element::Group(g) => g.bounds,
            Element::Folder(f) => f.bounds,
        }
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Element::Folder(f) => Some(f),
            Element::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Element::Group(g) => Some(g),
            Element::Folder(_) => None,
        }
    }

    /// Assign bounds top-down
    pub fn set_bounds(&mut self, rect: Rect, ctx: &LayoutContext<'_>) {
        match self {
            Element::Group(g) => g.set_bounds(rect, ctx),
            Element::Folder(f) => f.set_bounds(rect, ctx),
        }
    }

    /// Hide every content control in this subtree
    pub fn hide_all(&mut self) {
        match self {
            Element::Group(g) => g.children.iter_mut().for_each(Element::hide_all),
            Element::Folder(f) => {
                for tab in &mut f.tabs {
                    tab.content.set_visible(false);
                }
            }
        }
    }

    /// Drop cached title sizes (text metrics changed)
    pub fn invalidate_titles(&mut self) {
        match self {
            Element::Group(g) => g.children.iter_mut().for_each(Element::invalidate_titles),
            Element::Folder(f) => f.tabs.iter_mut().for_each(Tab::invalidate_title),
        }
    }

    pub fn get(&self, path: &[usize]) -> Option<&Element> {
        match path.split_first() {
            None => Some(self),
            Some((&index, rest)) => match self {
                Element::Group(g) => g.children.get(index)?.get(rest),
                Element::Folder(_) => None,
            },
        }
    }

    pub fn get_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        match path.split_first() {
            None => Some(self),
            Some((&index, rest)) => match self {
                Element::Group(g) => g.children.get_mut(index)?.get_mut(rest),
                Element::Folder(_) => None,
            },
        }
    }

    pub fn folder(&self, path: &[usize]) -> Option<&Folder> {
        self.get(path)?.as_folder()
    }

    pub fn folder_mut(&mut self, path: &[usize]) -> Option<&mut Folder> {
        match self.get_mut(path)? {
            Element::Folder(f) => Some(f),
            Element::Group(_) => None,
        }
    }

    pub fn group_mut(&mut self, path: &[usize]) -> Option<&mut Group> {
        match self.get_mut(path)? {
            Element::Group(g) => Some(g),
            Element::Folder(_) => None,
        }
    }

    /// Locate a tab by identity: folder path and index within the folder
    pub fn find_tab(&self, id: &TabId) -> Option<(NodePath, usize)> {
        let mut path = Vec::new();
        self.find_tab_at(id, &mut path).map(|index| (path, index))
    }

    fn find_tab_at(&self, id: &TabId, path: &mut NodePath) -> Option<usize> {
        match self {
            Element::Folder(f) => f.index_of(id),
            Element::Group(g) => {
                for (i, child) in g.children.iter().enumerate() {
                    path.push(i);
                    if let Some(index) = child.find_tab_at(id, path) {
                        return Some(index);
                    }
                    path.pop();
                }
                None
            }
        }
    }

    /// First leaf reached by always descending into the first child
    pub fn first_folder_path(&self) -> NodePath {
        let mut path = Vec::new();
        let mut node = self;
        while let Element::Group(g) = node {
            match g.children.first() {
                Some(child) => {
                    path.push(0);
                    node = child;
                }
                None => break,
            }
        }
        path
    }

    /// Folder that receives a tab added at the front of the tree.
    ///
    /// When the root's first child is a group, a new empty folder is put in
    /// front of it and takes half its weight; the caller must fill it.
    pub fn leading_folder_for_insert(&mut self) -> NodePath {
        if let Element::Group(g) = self {
            if matches!(g.children.first(), Some(Element::Group(_))) {
                let side = match g.orientation {
                    Orientation::Horizontal => Side::Left,
                    Orientation::Vertical => Side::Top,
                };
                return vec![g.insert_beside(0, side, Folder::new())];
            }
        }
        self.first_folder_path()
    }

    /// Leaf reached by always descending into the heaviest child
    pub fn largest_folder_path(&self) -> NodePath {
        let mut path = Vec::new();
        let mut node = self;
        while let Element::Group(g) = node {
            let mut best: Option<(usize, &Element)> = None;
            for (i, child) in g.children.iter().enumerate() {
                if best.map_or(true, |(_, b)| child.weight() > b.weight()) {
                    best = Some((i, child));
                }
            }
            match best {
                Some((i, child)) => {
                    path.push(i);
                    node = child;
                }
                None => break,
            }
        }
        path
    }

    /// Path of the maximized folder, if any
    pub fn maximized_path(&self) -> Option<NodePath> {
        let mut found = None;
        self.walk_folders(&mut Vec::new(), &mut |path, folder| {
            if folder.maximized && found.is_none() {
                found = Some(path.to_vec());
            }
        });
        found
    }

    /// Call `f` for every folder with its path, in display order
    pub fn walk_folders(&self, path: &mut NodePath, f: &mut dyn FnMut(&[usize], &Folder)) {
        match self {
            Element::Folder(folder) => f(path, folder),
            Element::Group(g) => {
                for (i, child) in g.children.iter().enumerate() {
                    path.push(i);
                    child.walk_folders(path, f);
                    path.pop();
                }
            }
        }
    }

    /// Clear the maximized flag everywhere
    pub fn clear_maximized(&mut self) {
        match self {
            Element::Folder(f) => f.maximized = false,
            Element::Group(g) => g.children.iter_mut().for_each(Element::clear_maximized),
        }
    }

    /// Identities of every tab, in traversal order
    pub fn tab_ids(&self) -> Vec<TabId> {
        let mut ids = Vec::new();
        self.walk_folders(&mut Vec::new(), &mut |_, folder| {
            ids.extend(folder.tabs.iter().map(|t| t.id().clone()));
        });
        ids
    }

    /// Bottom-up cleanup: drop empty folders, collapse singleton groups and
    /// flatten same-orientation nesting.
    pub fn merge(&mut self) -> MergeOutcome {
        match self {
            Element::Folder(f) if f.tabs.is_empty() => MergeOutcome::Removed,
            Element::Folder(_) => MergeOutcome::Unchanged,
            Element::Group(g) => g.merge(),
        }
    }

    /// Dock `folder` against `side` of the folder at `target`.
    ///
    /// Inserts a sibling when the parent group already runs along the needed
    /// axis, otherwise wraps the target in a new group. Returns the path of
    /// the inserted folder.
    pub fn split(&mut self, target: &[usize], side: Side, folder: Folder) -> Option<NodePath> {
        let Some((&index, parent_path)) = target.split_last() else {
            let at = wrap(self, side, folder);
            return Some(vec![at]);
        };
        let parent = self.group_mut(parent_path)?;
        if index >= parent.children.len() {
            return None;
        }
        let mut path = parent_path.to_vec();
        if parent.orientation == side.axis() {
            let at = parent.insert_beside(index, side, folder);
            path.push(at);
        } else {
            let at = wrap(&mut parent.children[index], side, folder);
            path.push(index);
            path.push(at);
        }
        Some(path)
    }

    /// Emit the traversal events for this subtree
    pub fn visit(&self, visitor: &mut dyn LayoutVisitor) {
        match self {
            Element::Group(g) => {
                visitor.group(g.orientation, g.weight);
                for child in &g.children {
                    child.visit(visitor);
                }
                visitor.end_group();
            }
            Element::Folder(f) => {
                visitor.folder(f.weight);
                for tab in &f.tabs {
                    visitor.tab(&tab.info);
                }
                visitor.end_folder();
            }
        }
    }

    /// Verify the post-merge invariants. A lone root folder may be empty.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut maximized = 0;
        self.check_node(&mut Vec::new(), None, &mut maximized)?;
        if maximized > 1 {
            return Err(InvariantViolation::MultipleMaximized(maximized));
        }
        Ok(())
    }

    fn check_node(
        &self,
        path: &mut NodePath,
        parent: Option<Orientation>,
        maximized: &mut usize,
    ) -> Result<(), InvariantViolation> {
        match self {
            Element::Folder(f) => {
                if f.maximized {
                    *maximized += 1;
                }
                if f.tabs.is_empty() && !path.is_empty() {
                    return Err(InvariantViolation::EmptyFolder(path.clone()));
                }
                if let Some(current) = f.current {
                    if current >= f.tabs.len() {
                        return Err(InvariantViolation::CurrentOutOfRange {
                            path: path.clone(),
                            current,
                            count: f.tabs.len(),
                        });
                    }
                }
                Ok(())
            }
            Element::Group(g) => {
                if g.children.len() < 2 {
                    return Err(InvariantViolation::DegenerateGroup {
                        path: path.clone(),
                        count: g.children.len(),
                    });
                }
                if parent == Some(g.orientation) {
                    return Err(InvariantViolation::SameOrientation(path.clone()));
                }
                for (i, child) in g.children.iter().enumerate() {
                    path.push(i);
                    child.check_node(path, Some(g.orientation), maximized)?;
                    path.pop();
                }
                Ok(())
            }
        }
    }
}

/// Replace `slot` with a group holding the old element and `folder`
fn wrap(slot: &mut Element, side: Side, mut folder: Folder) -> usize {
    let weight = slot.weight();
    let bounds = slot.bounds();
    let (keep, give) = halve(weight);
    let mut old = std::mem::replace(slot, Element::Folder(Folder::new()));
    old.set_weight(keep);
    folder.weight = give;
    let (children, at) = if side.is_leading() {
        (vec![Element::Folder(folder), old], 0)
    } else {
        (vec![old, Element::Folder(folder)], 1)
    };
    *slot = Element::Group(Group {
        orientation: side.axis(),
        children,
        weight,
        bounds,
    });
    at
}

impl Group {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            children: Vec::new(),
            weight: UNSET_WEIGHT,
            bounds: Rect::default(),
        }
    }

    pub fn with_children(orientation: Orientation, children: Vec<Element>) -> Self {
        Self {
            children,
            ..Self::new(orientation)
        }
    }

    fn set_bounds(&mut self, rect: Rect, ctx: &LayoutContext<'_>) {
        self.bounds = rect;
        let count = self.children.len();
        if count == 0 {
            return;
        }
        if count == 1 {
            self.children[0].set_bounds(rect, ctx);
            return;
        }

        let axis = self.orientation;
        let gutter = ctx.metrics.gutter;
        let extent = rect.extent(axis) - gutter * (count as i32 - 1);
        let weights: Vec<i32> = self.children.iter().map(Element::weight).collect();
        let sizes = distribute(extent, &weights);

        let mut pos = rect.start(axis);
        for (child, size) in self.children.iter_mut().zip(sizes) {
            let child_rect = match axis {
                Orientation::Horizontal => Rect::new(pos, rect.y, size, rect.height),
                Orientation::Vertical => Rect::new(rect.x, pos, rect.width, size),
            };
            child.set_bounds(child_rect, ctx);
            // Keep user proportions for the next pass
            child.set_weight(size.max(1));
            pos += size + gutter;
        }
    }

    /// The gutter between child `index` and `index + 1`
    pub fn separator(&self, index: usize) -> Option<Rect> {
        let before = self.children.get(index)?.bounds();
        let after = self.children.get(index + 1)?.bounds();
        Some(match self.orientation {
            Orientation::Horizontal => Rect::new(
                before.right(),
                self.bounds.y,
                after.x - before.right(),
                self.bounds.height,
            ),
            Orientation::Vertical => Rect::new(
                self.bounds.x,
                before.bottom(),
                self.bounds.width,
                after.y - before.bottom(),
            ),
        })
    }

    /// Move the separator after child `index` by `delta` along the main axis.
    ///
    /// Neither neighbour may shrink below the minimum extent. Returns whether
    /// any weight changed; a relayout is needed afterwards.
    pub fn move_separator(&mut self, index: usize, delta: i32, metrics: &DockMetrics) -> bool {
        if index + 1 >= self.children.len() || delta == 0 {
            return false;
        }
        let axis = self.orientation;
        let min = metrics.min_extent(axis);
        let a = self.children[index].bounds().extent(axis);
        let b = self.children[index + 1].bounds().extent(axis);
        let total = a + b;
        if total < 2 * min {
            return false;
        }
        let new_a = (a + delta).clamp(min, total - min);
        if new_a == a {
            return false;
        }
        // Weights must all be concrete or the next layout goes even
        for child in &mut self.children {
            if child.weight() <= 0 {
                let extent = child.bounds().extent(axis).max(1);
                child.set_weight(extent);
            }
        }
        self.children[index].set_weight(new_a.max(1));
        self.children[index + 1].set_weight((total - new_a).max(1));
        true
    }

    /// Insert `folder` next to child `index`, splitting that child's weight.
    fn insert_beside(&mut self, index: usize, side: Side, mut folder: Folder) -> usize {
        let target = &mut self.children[index];
        let (keep, give) = halve(target.weight());
        target.set_weight(keep);
        folder.weight = give;
        let at = if side.is_leading() { index } else { index + 1 };
        self.children.insert(at, Element::Folder(folder));
        at
    }

    fn merge(&mut self) -> MergeOutcome {
        let mut i = 0;
        while i < self.children.len() {
            match self.children[i].merge() {
                MergeOutcome::Removed => {
                    self.children.remove(i);
                    continue;
                }
                MergeOutcome::Replaced(child) => self.children[i] = child,
                MergeOutcome::Unchanged => {}
            }

            let same_axis = matches!(
                &self.children[i],
                Element::Group(g) if g.orientation == self.orientation
            );
            if same_axis {
                if let Element::Group(inner) = self.children.remove(i) {
                    let grandchildren = inner.into_rescaled_children();
                    let count = grandchildren.len();
                    self.children.splice(i..i, grandchildren);
                    i += count;
                    continue;
                }
            }
            i += 1;
        }

        match self.children.len() {
            0 => MergeOutcome::Removed,
            1 => match self.children.pop() {
                Some(mut child) => {
                    child.set_weight(self.weight);
                    MergeOutcome::Replaced(child)
                }
                None => MergeOutcome::Removed,
            },
            _ => MergeOutcome::Unchanged,
        }
    }

    /// Children rescaled so that together they weigh what this group did
    fn into_rescaled_children(self) -> Vec<Element> {
        let mut children = self.children;
        let sum: i64 = children.iter().map(|c| c.weight() as i64).sum();
        let concrete = self.weight > 0 && children.iter().all(|c| c.weight() > 0);
        for child in &mut children {
            let weight = if concrete {
                ((child.weight() as i64 * self.weight as i64 / sum) as i32).max(1)
            } else {
                UNSET_WEIGHT
            };
            child.set_weight(weight);
        }
        children
    }
}

impl Default for Folder {
    fn default() -> Self {
        Self::new()
    }
}

impl Folder {
    pub fn new() -> Self {
        Self {
            tabs: Vec::new(),
            current: None,
            maximized: false,
            weight: UNSET_WEIGHT,
            bounds: Rect::default(),
            tab_bounds: Vec::new(),
            tab_bar_height: 0,
            button_size: 0,
        }
    }

    pub fn with_tabs(tabs: Vec<Tab>) -> Self {
        let mut folder = Self::new();
        for tab in tabs {
            folder.insert_tab(tab, None);
        }
        folder
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn index_of(&self, id: &TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id() == id)
    }

    pub fn current_tab(&self) -> Option<&Tab> {
        self.tabs.get(self.current?)
    }

    /// Insert before `before` (or append); the first tab becomes current
    pub fn insert_tab(&mut self, tab: Tab, before: Option<usize>) -> usize {
        let at = before.map_or(self.tabs.len(), |i| i.min(self.tabs.len()));
        self.tabs.insert(at, tab);
        match self.current {
            None => self.current = Some(at),
            Some(current) if current >= at => self.current = Some(current + 1),
            Some(_) => {}
        }
        at
    }

    /// Detach the tab at `index`, keeping a neighbour visible
    pub fn remove_tab(&mut self, index: usize) -> Option<Tab> {
        if index >= self.tabs.len() {
            return None;
        }
        let mut tab = self.tabs.remove(index);
        tab.content.set_visible(false);
        self.current = match self.current {
            _ if self.tabs.is_empty() => None,
            Some(current) if current == index => Some(index.min(self.tabs.len() - 1)),
            Some(current) if current > index => Some(current - 1),
            other => other,
        };
        Some(tab)
    }

    /// Make the tab at `index` visible; returns whether it changed
    pub fn show(&mut self, index: usize) -> bool {
        if index >= self.tabs.len() || self.current == Some(index) {
            return false;
        }
        self.current = Some(index);
        true
    }

    /// Move the tab at `from` to just before `before` (or to the end).
    ///
    /// Returns false when the move would leave the order unchanged.
    pub fn move_tab(&mut self, from: usize, before: Option<usize>) -> bool {
        if from >= self.tabs.len() {
            return false;
        }
        let target = before.map_or(self.tabs.len(), |i| i.min(self.tabs.len()));
        if target == from || target == from + 1 {
            return false;
        }
        let current_id = self.current_tab().map(|t| t.id().clone());
        let tab = self.tabs.remove(from);
        let at = if target > from { target - 1 } else { target };
        self.tabs.insert(at, tab);
        self.current = current_id.and_then(|id| self.index_of(&id));
        true
    }

    /// Hit areas of the tabs from the last layout
    pub fn tab_bounds(&self) -> &[Rect] {
        &self.tab_bounds
    }

    pub fn tab_bar(&self) -> Rect {
        Rect::new(self.bounds.x, self.bounds.y, self.bounds.width, self.tab_bar_height)
    }

    /// Area below the tab bar where the current content lives
    pub fn body(&self) -> Rect {
        Rect::new(
            self.bounds.x,
            self.bounds.y + self.tab_bar_height,
            self.bounds.width,
            (self.bounds.height - self.tab_bar_height).max(0),
        )
    }

    /// The maximize/restore button at the right end of the tab bar
    pub fn button(&self) -> Rect {
        let size = self.button_size.min(self.bounds.width);
        Rect::new(
            self.bounds.right() - size,
            self.bounds.y,
            size,
            size.min(self.tab_bar_height),
        )
    }

    fn set_bounds(&mut self, rect: Rect, ctx: &LayoutContext<'_>) {
        let m = ctx.metrics;
        self.bounds = rect;
        self.tab_bar_height = m.tab_bar_height.min(rect.height.max(0));
        self.button_size = m.button_size;

        // Tabs stop short of the button; overflowing ones get empty rects
        let limit = self.button().x.max(rect.x);
        self.tab_bounds.clear();
        let mut x = rect.x;
        for tab in &mut self.tabs {
            let title = tab.title_size(|label| ctx.text.text_extent(label));
            let width = m.tab_margin + title.width.max(m.min_title_width) + m.tab_margin;
            let start = x.min(limit);
            let end = (x + width).min(limit);
            self.tab_bounds.push(Rect::new(start, rect.y, end - start, self.tab_bar_height));
            x += width;
        }

        let body = self.body();
        for (i, tab) in self.tabs.iter_mut().enumerate() {
            if self.current == Some(i) {
                tab.content.set_bounds(body);
                tab.content.set_visible(true);
            } else {
                tab.content.set_visible(false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dock::test_support::{folder, group, tab, FixedMetrics};

    fn layout(root: &mut Element, rect: Rect) {
        let metrics = DockMetrics::pixels();
        let text = FixedMetrics;
        let ctx = LayoutContext { metrics: &metrics, text: &text };
        root.set_bounds(rect, &ctx);
    }

    fn ids(folder: &Folder) -> Vec<&str> {
        folder.tabs.iter().map(|t| t.id().as_str()).collect()
    }

    #[test]
    fn test_distribute_even_with_leftover() {
        assert_eq!(distribute(10, &[UNSET_WEIGHT, 5, 5]), vec![4, 3, 3]);
        assert_eq!(distribute(9, &[-1, -1, -1]), vec![3, 3, 3]);
    }

    #[test]
    fn test_distribute_proportional_sums_to_extent() {
        let sizes = distribute(101, &[1, 1, 1]);
        assert_eq!(sizes.iter().sum::<i32>(), 101);
        assert_eq!(sizes, vec![34, 34, 33]);

        let sizes = distribute(300, &[100, 200]);
        assert_eq!(sizes, vec![100, 200]);
    }

    #[test]
    fn test_group_layout_conserves_extent() {
        let mut root = group(
            Orientation::Horizontal,
            vec![folder(&["a"]), folder(&["b"]), folder(&["c"])],
        );
        layout(&mut root, Rect::new(0, 0, 303, 100));

        let g = root.as_group().unwrap();
        let gutter = DockMetrics::pixels().gutter;
        let total: i32 = g.children.iter().map(|c| c.bounds().width).sum();
        assert_eq!(total, 303 - 2 * gutter);
        // No gaps beyond the gutter, no overlap
        for pair in g.children.windows(2) {
            assert_eq!(pair[0].bounds().right() + gutter, pair[1].bounds().x);
        }
        assert_eq!(g.children[2].bounds().right(), 303);
        // Weights were back-filled with the assigned sizes
        let weights: Vec<i32> = g.children.iter().map(Element::weight).collect();
        let widths: Vec<i32> = g.children.iter().map(|c| c.bounds().width).collect();
        assert_eq!(weights, widths);
    }

    #[test]
    fn test_layout_is_idempotent() {
        let mut root = group(
            Orientation::Vertical,
            vec![
                folder(&["a"]),
                group(Orientation::Horizontal, vec![folder(&["b"]), folder(&["c", "d"])]),
            ],
        );
        root.get_mut(&[0]).unwrap().set_weight(3);
        root.get_mut(&[1]).unwrap().set_weight(7);

        let rect = Rect::new(0, 0, 517, 389);
        layout(&mut root, rect);
        let mut first = Vec::new();
        root.walk_folders(&mut Vec::new(), &mut |_, f| first.push(f.bounds));
        layout(&mut root, rect);
        let mut second = Vec::new();
        root.walk_folders(&mut Vec::new(), &mut |_, f| second.push(f.bounds));

        assert_eq!(first, second);
    }

    #[test]
    fn test_folder_tab_geometry() {
        let mut root = folder(&["a", "a-much-longer-title"]);
        layout(&mut root, Rect::new(10, 20, 400, 300));

        let f = root.as_folder().unwrap();
        let m = DockMetrics::pixels();
        // "a" is narrower than the minimum title width
        assert_eq!(f.tab_bounds()[0], Rect::new(10, 20, m.tab_margin * 2 + m.min_title_width, 24));
        let long = FixedMetrics::width_of("a-much-longer-title");
        assert_eq!(f.tab_bounds()[1].width, m.tab_margin * 2 + long);
        assert_eq!(f.body(), Rect::new(10, 44, 400, 276));
        assert_eq!(f.button(), Rect::new(410 - 16, 20, 16, 16));
    }

    #[test]
    fn test_tabs_clipped_before_button() {
        let mut root = folder(&["a", "b", "c"]);
        layout(&mut root, Rect::new(0, 0, 100, 200));

        let f = root.as_folder().unwrap();
        // Button occupies x = 84..100
        assert_eq!(f.tab_bounds()[0], Rect::new(0, 0, 56, 24));
        assert_eq!(f.tab_bounds()[1], Rect::new(56, 0, 28, 24));
        assert!(f.tab_bounds()[2].is_empty());
        assert!(f.tab_bounds().iter().all(|r| r.right() <= f.button().x));
    }

    #[test]
    fn test_only_current_tab_visible() {
        let (log, infos) = crate::dock::test_support::recorded(&["a", "b", "c"]);
        let mut f = Folder::with_tabs(infos.into_iter().map(Tab::new).collect());
        f.show(1);
        let mut root = Element::Folder(f);
        layout(&mut root, Rect::new(0, 0, 300, 200));

        assert!(!log.state("a").visible);
        assert!(log.state("b").visible);
        assert!(!log.state("c").visible);
        assert_eq!(log.state("b").bounds, Rect::new(0, 24, 300, 176));
    }

    #[test]
    fn test_merge_removes_empty_folder() {
        let mut root = group(Orientation::Horizontal, vec![folder(&["a"]), folder(&["b"])]);
        root.set_weight(42);
        root.folder_mut(&[0]).unwrap().remove_tab(0);

        match root.merge() {
            MergeOutcome::Replaced(child) => {
                let f = child.as_folder().unwrap();
                assert_eq!(ids(f), vec!["b"]);
                assert_eq!(child.weight(), 42);
            }
            other => panic!("expected replacement, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_flattens_same_orientation() {
        // H[a, V[H[b, c]]] collapses to H[a, b, c]
        let inner = group(Orientation::Horizontal, vec![folder(&["b"]), folder(&["c"])]);
        let mut middle = group(Orientation::Vertical, vec![inner]);
        middle.set_weight(60);
        middle.get_mut(&[0]).unwrap().set_weight(10);
        middle.get_mut(&[0, 0]).unwrap().set_weight(20);
        middle.get_mut(&[0, 1]).unwrap().set_weight(40);
        let mut root = group(Orientation::Horizontal, vec![folder(&["a"]), middle]);
        root.get_mut(&[0]).unwrap().set_weight(60);

        assert!(matches!(root.merge(), MergeOutcome::Unchanged));
        let g = root.as_group().unwrap();
        assert_eq!(g.children.len(), 3);
        let weights: Vec<i32> = g.children.iter().map(Element::weight).collect();
        // 20:40 rescaled to fill the collapsed child's 60
        assert_eq!(weights, vec![60, 20, 40]);
        assert!(root.check_invariants().is_ok());
    }

    #[test]
    fn test_merge_rescales_grandchildren() {
        let mut inner = group(Orientation::Horizontal, vec![folder(&["b"]), folder(&["c"])]);
        inner.set_weight(100);
        inner.get_mut(&[0]).unwrap().set_weight(30);
        inner.get_mut(&[1]).unwrap().set_weight(10);
        let mut root = group(Orientation::Horizontal, vec![folder(&["a"]), inner]);

        root.merge();
        let weights: Vec<i32> = root.as_group().unwrap().children.iter().map(Element::weight).collect();
        assert_eq!(weights[1..], [75, 25]);
    }

    #[test]
    fn test_merge_everything_empty() {
        let mut root = group(Orientation::Vertical, vec![folder(&[]), folder(&[])]);
        assert!(matches!(root.merge(), MergeOutcome::Removed));
    }

    #[test]
    fn test_split_root_folder_wraps() {
        let mut root = folder(&["t"]);
        root.set_weight(100);
        let path = root.split(&[], Side::Right, Folder::with_tabs(vec![tab("u")]));

        assert_eq!(path, Some(vec![1]));
        let g = root.as_group().unwrap();
        assert_eq!(g.orientation, Orientation::Horizontal);
        assert_eq!(ids(g.children[0].as_folder().unwrap()), vec!["t"]);
        assert_eq!(ids(g.children[1].as_folder().unwrap()), vec!["u"]);
        assert_eq!(g.children[0].weight(), 50);
        assert_eq!(g.children[1].weight(), 50);
        assert!(root.check_invariants().is_ok());
    }

    #[test]
    fn test_split_inserts_into_matching_group() {
        let mut root = group(Orientation::Horizontal, vec![folder(&["a"]), folder(&["b"])]);
        root.get_mut(&[1]).unwrap().set_weight(80);
        let path = root.split(&[1], Side::Left, Folder::with_tabs(vec![tab("n")]));

        assert_eq!(path, Some(vec![1]));
        let g = root.as_group().unwrap();
        assert_eq!(g.children.len(), 3);
        assert_eq!(g.children[1].weight(), 40);
        assert_eq!(g.children[2].weight(), 40);
    }

    #[test]
    fn test_split_wraps_in_opposite_group() {
        let mut root = group(Orientation::Horizontal, vec![folder(&["a"]), folder(&["b"])]);
        let path = root.split(&[0], Side::Bottom, Folder::with_tabs(vec![tab("n")]));

        assert_eq!(path, Some(vec![0, 1]));
        let inner = root.get(&[0]).unwrap().as_group().unwrap();
        assert_eq!(inner.orientation, Orientation::Vertical);
        assert!(root.check_invariants().is_ok());
    }

    #[test]
    fn test_move_separator_clamps_to_minimum() {
        let mut root = group(Orientation::Horizontal, vec![folder(&["a"]), folder(&["b"])]);
        layout(&mut root, Rect::new(0, 0, 204, 100));
        let metrics = DockMetrics::pixels();

        let Element::Group(g) = &mut root else { unreachable!() };
        assert!(g.move_separator(0, -1000, &metrics));
        assert_eq!(g.children[0].weight(), metrics.min_width);
        assert_eq!(g.children[1].weight(), 200 - metrics.min_width);
        // Already at the minimum
        layout(&mut root, Rect::new(0, 0, 204, 100));
        let Element::Group(g) = &mut root else { unreachable!() };
        assert!(!g.move_separator(0, -5, &metrics));
    }

    #[test]
    fn test_folder_move_tab() {
        let mut f = Folder::with_tabs(vec![tab("a"), tab("b"), tab("c")]);
        assert!(f.move_tab(1, None));
        assert_eq!(ids(&f), vec!["a", "c", "b"]);

        // Dropping a tab just before itself or its successor is a no-op
        assert!(!f.move_tab(0, Some(0)));
        assert!(!f.move_tab(0, Some(1)));
        assert!(!f.move_tab(2, None));

        assert!(f.move_tab(2, Some(0)));
        assert_eq!(ids(&f), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_folder_remove_keeps_neighbour_current() {
        let mut f = Folder::with_tabs(vec![tab("a"), tab("b"), tab("c")]);
        f.show(2);
        f.remove_tab(2);
        assert_eq!(f.current, Some(1));
        f.remove_tab(0);
        assert_eq!(f.current, Some(0));
        f.remove_tab(0);
        assert_eq!(f.current, None);
    }

    #[test]
    fn test_insertion_targets() {
        let mut root = group(
            Orientation::Horizontal,
            vec![
                group(Orientation::Vertical, vec![folder(&["a"]), folder(&["b"])]),
                folder(&["c"]),
            ],
        );
        root.get_mut(&[0]).unwrap().set_weight(30);
        root.get_mut(&[1]).unwrap().set_weight(70);

        assert_eq!(root.first_folder_path(), vec![0, 0]);
        assert_eq!(root.largest_folder_path(), vec![1]);
        assert_eq!(root.find_tab(&TabId::new("b")), Some((vec![0, 1], 0)));
        assert_eq!(root.find_tab(&TabId::new("zz")), None);
    }

    #[test]
    fn test_check_invariants_reports_violations() {
        let root = group(Orientation::Horizontal, vec![folder(&["a"])]);
        assert_eq!(
            root.check_invariants(),
            Err(InvariantViolation::DegenerateGroup { path: vec![], count: 1 })
        );

        let root = group(Orientation::Horizontal, vec![folder(&["a"]), folder(&[])]);
        assert_eq!(root.check_invariants(), Err(InvariantViolation::EmptyFolder(vec![1])));

        // A lone root folder may be empty
        assert!(folder(&[]).check_invariants().is_ok());
    }
}
