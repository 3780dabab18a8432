//! DockArea - The docking composite hosts talk to
//!
//! Owns the layout tree, the pointer interaction [`Mode`], the current hover
//! and the single maximized-folder override. Every structural change runs a
//! merge pass followed by a full relayout.

use bitflags::bitflags;
use tracing::{debug, error, info, trace, warn};

use crate::config::{ColorScheme, DockMetrics};

use super::drag::{DragPreview, DragSession, DropAction, Mode};
use super::geometry::{Orientation, Point, Rect};
use super::hover::{CursorKind, Hover};
use super::layout::{Element, Folder, LayoutContext, MergeOutcome, NodePath};
use super::paint::{Painter, Surface, TextMetrics};
use super::persist::{self, FolderInfo, PersistError, TabRecord};
use super::tab::{Tab, TabId, TabInfo};

bitflags! {
    /// What the host needs to redo after feeding an event
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Dirty: u8 {
        const LAYOUT = 0b0001;
        const PAINT  = 0b0010;
        const CURSOR = 0b0100;
    }
}

/// Notifications for host listeners
#[derive(Clone, Debug)]
pub enum DockEvent {
    /// A tab became the visible one in its folder
    TabShown(TabInfo),
    /// A tab changed folder or position through a drag
    TabMoved(TabInfo),
}

type Listener = Box<dyn FnMut(&DockEvent)>;

/// The docking area
pub struct DockArea {
    root: Element,
    bounds: Rect,
    metrics: DockMetrics,
    text: Box<dyn TextMetrics>,
    mode: Mode,
    hover: Hover,
    cursor: CursorKind,
    /// Most recently shown tab; its folder is the active folder
    active: Option<TabId>,
    dirty: Dirty,
    damage: Option<Rect>,
    listeners: Vec<Listener>,
}

impl DockArea {
    /// Create an empty dock (a single folder with no tabs)
    pub fn new(metrics: DockMetrics, text: Box<dyn TextMetrics>) -> Self {
        Self {
            root: Element::Folder(Folder::new()),
            bounds: Rect::default(),
            metrics,
            text,
            mode: Mode::Idle,
            hover: Hover::None,
            cursor: CursorKind::Default,
            active: None,
            dirty: Dirty::empty(),
            damage: None,
            listeners: Vec::new(),
        }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// The element being laid out: the maximized folder, or the whole tree
    pub fn element(&self) -> &Element {
        self.root
            .maximized_path()
            .and_then(|path| self.root.get(&path))
            .unwrap_or(&self.root)
    }

    /// Path of [`element`](Self::element) from the root
    pub fn element_path(&self) -> NodePath {
        self.root.maximized_path().unwrap_or_default()
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn metrics(&self) -> &DockMetrics {
        &self.metrics
    }

    pub fn text_metrics(&self) -> &dyn TextMetrics {
        self.text.as_ref()
    }

    /// Swap the text measurer (font change) and relayout
    pub fn set_text_metrics(&mut self, text: Box<dyn TextMetrics>) {
        self.text = text;
        self.root.invalidate_titles();
        self.layout();
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn hover(&self) -> &Hover {
        &self.hover
    }

    pub fn cursor(&self) -> CursorKind {
        self.cursor
    }

    pub fn is_maximized(&self) -> bool {
        self.root.maximized_path().is_some()
    }

    /// Folder holding the most recently shown tab
    pub fn active_folder(&self) -> Option<NodePath> {
        let id = self.active.as_ref()?;
        self.root.find_tab(id).map(|(path, _)| path)
    }

    pub fn tab_info(&self, id: &TabId) -> Option<&TabInfo> {
        let (path, index) = self.root.find_tab(id)?;
        self.root.folder(&path)?.tabs.get(index).map(|t| &t.info)
    }

    /// Register a listener for [`DockEvent`]s
    pub fn add_listener(&mut self, listener: impl FnMut(&DockEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Drain the dirty flags accumulated since the last call
    pub fn take_dirty(&mut self) -> Dirty {
        std::mem::take(&mut self.dirty)
    }

    /// Drain the region that needs repainting
    pub fn take_damage(&mut self) -> Option<Rect> {
        self.damage.take()
    }

    // ----- layout / paint driver -----

    /// Resize the docking area and lay everything out
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.layout();
    }

    /// Lay out the tree, or only the maximized folder over the full area.
    /// Content of non-current tabs is hidden, never destroyed.
    fn layout(&mut self) {
        let ctx = LayoutContext {
            metrics: &self.metrics,
            text: self.text.as_ref(),
        };
        match self.root.maximized_path() {
            Some(path) => {
                self.root.hide_all();
                if let Some(folder) = self.root.get_mut(&path) {
                    folder.set_bounds(self.bounds, &ctx);
                }
            }
            None => self.root.set_bounds(self.bounds, &ctx),
        }
        self.dirty |= Dirty::LAYOUT;
        self.invalidate(self.bounds);
    }

    fn invalidate(&mut self, region: Rect) {
        if region.is_empty() {
            return;
        }
        self.damage = Some(match self.damage {
            Some(damage) => damage.union(&region),
            None => region,
        });
        self.dirty |= Dirty::PAINT;
    }

    /// Paint the whole area, or only `region` when given
    pub fn paint(&self, scheme: &ColorScheme, surface: &mut dyn Surface, region: Option<Rect>) {
        Painter::new(scheme, self).paint(surface, region.unwrap_or(self.bounds));
    }

    /// Where the floating drag preview sits
    pub fn preview_bounds(&self, preview: &DragPreview) -> Rect {
        let title = self.text.text_extent(&preview.title);
        Rect::new(
            preview.position.x + 1,
            preview.position.y + 1,
            title.width + 2 * self.metrics.tab_margin,
            self.metrics.tab_bar_height.max(title.height),
        )
    }

    // ----- host API -----

    /// Reveal a tab anywhere in the tree; returns whether it exists
    pub fn show_tab(&mut self, id: &TabId) -> bool {
        let Some((path, index)) = self.root.find_tab(id) else {
            return false;
        };
        // A tab hidden behind a maximized folder needs the tree back
        let hidden = self
            .root
            .maximized_path()
            .is_some_and(|maximized| maximized != path);
        if hidden {
            self.root.clear_maximized();
        }

        let changed = self.root.folder_mut(&path).is_some_and(|f| f.show(index));
        let previous = self.active.replace(id.clone());
        if changed || hidden {
            self.layout();
        } else if previous.as_ref() != Some(id) {
            self.invalidate(self.bounds);
        }
        if changed {
            debug!("Tab shown: {}", id);
            self.emit_shown(id);
        }
        true
    }

    /// Add a tab to the first folder (descending into first children).
    ///
    /// A group in the root's first slot gets a new folder in front of it.
    pub fn add_tab_to_first_folder(&mut self, info: TabInfo) {
        self.add_tab(info, Element::leading_folder_for_insert);
    }

    /// Add a tab to the folder reached by descending into the heaviest children
    pub fn add_tab_to_largest_folder(&mut self, info: TabInfo) {
        self.add_tab(info, |root| root.largest_folder_path());
    }

    fn add_tab(&mut self, info: TabInfo, locate: impl FnOnce(&mut Element) -> NodePath) {
        if self.root.find_tab(&info.id).is_some() {
            debug!("Tab {} already docked, revealing it", info.id);
            self.show_tab(&info.id);
            return;
        }
        let path = locate(&mut self.root);
        // A new tab is always revealed
        if self.root.maximized_path().is_some_and(|maximized| maximized != path) {
            self.root.clear_maximized();
        }
        let id = info.id.clone();
        let Some(folder) = self.root.folder_mut(&path) else {
            warn!("No folder to add tab {} to", id);
            return;
        };
        let index = folder.insert_tab(Tab::new(info), None);
        folder.show(index);
        info!("Tab added: {} (folder {:?})", id, path);

        self.active = Some(id.clone());
        self.layout();
        self.emit_shown(&id);
    }

    /// Close a tab by identity; returns whether it existed
    pub fn dispose_tab(&mut self, id: &TabId) -> bool {
        let Some((path, index)) = self.root.find_tab(id) else {
            return false;
        };
        // Paths held by an interaction may not survive the merge
        self.cancel_interaction();

        let promoted = self.remove_from(&path, index).and_then(|(tab, promoted)| {
            drop(tab);
            promoted
        });
        if self.active.as_ref() == Some(id) {
            self.active = promoted.clone();
        }
        info!("Tab disposed: {}", id);

        self.hover = Hover::None;
        self.merge();
        self.layout();
        if let Some(promoted) = promoted {
            self.emit_shown(&promoted);
        }
        true
    }

    /// Close the visible tab of the active folder
    pub fn close_current_tab(&mut self) -> bool {
        let path = self.active_folder().unwrap_or_else(|| self.root.first_folder_path());
        let id = self
            .root
            .folder(&path)
            .and_then(Folder::current_tab)
            .map(|t| t.id().clone());
        match id {
            Some(id) => self.dispose_tab(&id),
            None => false,
        }
    }

    /// Maximize the folder at `path`, or restore if it already is
    pub fn toggle_maximize(&mut self, path: &[usize]) {
        let Some(was) = self.root.folder(path).map(|f| f.maximized) else {
            return;
        };
        self.root.clear_maximized();
        if !was {
            if let Some(folder) = self.root.folder_mut(path) {
                folder.maximized = true;
            }
        }
        info!("Folder {:?} {}", path, if was { "restored" } else { "maximized" });
        self.hover = Hover::None;
        self.layout();
    }

    /// Drop the maximize override
    pub fn restore(&mut self) {
        if self.is_maximized() {
            self.root.clear_maximized();
            self.layout();
        }
    }

    // ----- persistence -----

    /// Serializable picture of the current tree
    pub fn snapshot(&self) -> FolderInfo {
        persist::snapshot(&self.root)
    }

    /// Replace the tree with one rebuilt from `snapshot`.
    ///
    /// `resolve` turns persisted tab records into live tabs; records it
    /// rejects are skipped and folders left empty are merged away.
    pub fn restore_snapshot(
        &mut self,
        snapshot: &FolderInfo,
        resolve: &mut dyn FnMut(&TabRecord) -> Option<TabInfo>,
    ) -> Result<(), PersistError> {
        let root = persist::build(snapshot, resolve)?;
        self.cancel_interaction();
        self.root = root;
        self.hover = Hover::None;
        self.active = None;
        self.merge();
        self.layout();
        info!("Layout restored ({} tabs)", self.root.tab_ids().len());
        Ok(())
    }

    // ----- pointer input -----

    /// Classify a point against the visible element
    pub fn find(&self, x: i32, y: i32, include_trailing: bool) -> Hover {
        let base = self.element_path();
        let Some(element) = self.root.get(&base) else {
            return Hover::None;
        };
        let mut path = base;
        element.find(&mut path, x, y, include_trailing)
    }

    pub fn pointer_down(&mut self, x: i32, y: i32) {
        if !self.mode.is_idle() {
            return;
        }
        let at = Point::new(x, y);
        let hover = self.find(x, y, false);
        self.set_hover(hover.clone());

        match hover {
            Hover::Tab {
                folder,
                tab: Some(index),
            } => {
                let id = self
                    .root
                    .folder(&folder)
                    .and_then(|f| f.tabs.get(index))
                    .map(|t| t.id().clone());
                if let Some(id) = id {
                    self.show_tab(&id);
                    self.mode = Mode::ArmedForDrag {
                        folder,
                        tab: index,
                        origin: at,
                    };
                }
            }
            Hover::MaximizeButton { folder } => self.toggle_maximize(&folder),
            Hover::Separator {
                group,
                index,
                cursor,
            } => {
                trace!("Resize start: group {:?} separator {}", group, index);
                self.mode = Mode::Resizing {
                    group,
                    index,
                    last: at,
                };
                self.set_cursor(cursor);
            }
            Hover::FolderBody { folder } => {
                let id = self
                    .root
                    .folder(&folder)
                    .and_then(Folder::current_tab)
                    .map(|t| t.id().clone());
                if id.is_some() && id != self.active {
                    self.active = id;
                    self.invalidate(self.bounds);
                }
            }
            Hover::Tab { tab: None, .. } | Hover::None => {}
        }
    }

    pub fn pointer_move(&mut self, x: i32, y: i32) {
        let at = Point::new(x, y);
        match std::mem::take(&mut self.mode) {
            Mode::Idle => {
                let hover = self.find(x, y, false);
                self.set_cursor(hover.cursor());
                self.set_hover(hover);
            }
            Mode::ArmedForDrag {
                folder,
                tab,
                origin,
            } => {
                if origin == at {
                    self.mode = Mode::ArmedForDrag {
                        folder,
                        tab,
                        origin,
                    };
                    return;
                }
                let Some(dragged) = self.root.folder(&folder).and_then(|f| f.tabs.get(tab)) else {
                    return;
                };
                let mut session =
                    DragSession::start(folder, tab, dragged.id().clone(), dragged.label(), at, self.bounds);
                debug!("Drag start: {}", session.id);
                self.set_cursor(CursorKind::Grabbing);
                self.track_drag(&mut session, at);
                self.mode = Mode::Dragging(session);
            }
            Mode::Dragging(mut session) => {
                self.track_drag(&mut session, at);
                self.mode = Mode::Dragging(session);
            }
            Mode::Resizing { group, index, last } => {
                if let Some(g) = self.root.group_mut(&group) {
                    let delta = match g.orientation {
                        Orientation::Horizontal => x - last.x,
                        Orientation::Vertical => y - last.y,
                    };
                    if g.move_separator(index, delta, &self.metrics) {
                        self.layout();
                    }
                }
                self.mode = Mode::Resizing {
                    group,
                    index,
                    last: at,
                };
            }
        }
    }

    pub fn pointer_up(&mut self, x: i32, y: i32) {
        match std::mem::take(&mut self.mode) {
            Mode::Dragging(session) => {
                let at = Point::new(x, y);
                let hover = self.find(x, y, true);
                let action = session.resolve(&hover, &self.root, at);
                // Preview and overlay go away with the session
                let DragSession { source, tab, id, .. } = session;
                self.invalidate(self.bounds);
                self.commit(&source, tab, &id, action);

                let hover = self.find(x, y, false);
                self.set_cursor(hover.cursor());
                self.set_hover(hover);
            }
            Mode::Resizing { .. } => {
                let hover = self.find(x, y, false);
                self.set_cursor(hover.cursor());
                self.set_hover(hover);
            }
            Mode::ArmedForDrag { .. } | Mode::Idle => {}
        }
    }

    /// Pointer capture was lost (e.g. window deactivated): abandon any drag
    /// or resize without touching the tree
    pub fn capture_lost(&mut self) {
        self.cancel_interaction();
        self.set_cursor(CursorKind::Default);
    }

    fn cancel_interaction(&mut self) {
        match std::mem::take(&mut self.mode) {
            Mode::Dragging(session) => {
                debug!("Drag cancelled: {}", session.id);
                self.invalidate(self.bounds);
            }
            Mode::Resizing { .. } => debug!("Resize cancelled"),
            Mode::ArmedForDrag { .. } | Mode::Idle => {}
        }
    }

    fn track_drag(&mut self, session: &mut DragSession, at: Point) {
        let hover = self.find(at.x, at.y, true);
        let before = self.preview_bounds(&session.preview);
        let highlight = session.overlay.highlight;
        session.track(&hover, &self.root, at);
        let after = self.preview_bounds(&session.preview);

        self.invalidate(before.union(&after));
        if highlight != session.overlay.highlight {
            for zone in [highlight, session.overlay.highlight].into_iter().flatten() {
                self.invalidate(zone);
            }
        }
        self.set_hover(hover);
    }

    /// Apply a drop, then merge and relayout
    fn commit(&mut self, source: &[usize], from: usize, id: &TabId, action: DropAction) {
        // Tab the source folder falls back to when the dragged one leaves it
        let mut promoted = None;
        match action {
            DropAction::Cancel => {
                debug!("Drop of {} cancelled", id);
                return;
            }
            DropAction::Reorder {
                folder,
                from,
                before,
            } => {
                if let Some(f) = self.root.folder_mut(&folder) {
                    f.move_tab(from, before);
                    if let Some(index) = f.index_of(id) {
                        f.show(index);
                    }
                }
                debug!("Tab {} reordered", id);
            }
            DropAction::Move { to, before } => {
                if self.root.folder(&to).is_none() {
                    return;
                }
                let Some((tab, left_behind)) = self.remove_from(source, from) else {
                    return;
                };
                promoted = left_behind;
                if let Some(dest) = self.root.folder_mut(&to) {
                    let index = dest.insert_tab(tab, before);
                    dest.show(index);
                }
                debug!("Tab {} moved to folder {:?}", id, to);
            }
            DropAction::Split { target, side } => {
                if self.root.folder(&target).is_none() {
                    return;
                }
                self.root.clear_maximized();
                let Some((tab, left_behind)) = self.remove_from(source, from) else {
                    return;
                };
                promoted = left_behind;
                let path = self.root.split(&target, side, Folder::with_tabs(vec![tab]));
                debug!("Tab {} docked {:?} of {:?} at {:?}", id, side, target, path);
            }
        }

        self.active = Some(id.clone());
        self.hover = Hover::None;
        self.merge();
        self.layout();

        if let Some(info) = self.tab_info(id).cloned() {
            info!("Tab moved: {}", id);
            self.emit(DockEvent::TabMoved(info.clone()));
            self.emit(DockEvent::TabShown(info));
        }
        if let Some(promoted) = promoted {
            self.emit_shown(&promoted);
        }
    }

    /// Take a tab out of its folder. Also returns the tab that became
    /// visible in its place, if the removed one was showing.
    fn remove_from(&mut self, path: &[usize], index: usize) -> Option<(Tab, Option<TabId>)> {
        let folder = self.root.folder_mut(path)?;
        let was_current = folder.current == Some(index);
        let tab = folder.remove_tab(index)?;
        let promoted = if was_current {
            folder.current_tab().map(|t| t.id().clone())
        } else {
            None
        };
        Some((tab, promoted))
    }

    /// Run the merge pass on the whole tree
    fn merge(&mut self) {
        match self.root.merge() {
            MergeOutcome::Removed => {
                trace!("Merge emptied the tree");
                self.root = Element::Folder(Folder::new());
            }
            MergeOutcome::Replaced(child) => {
                trace!("Merge replaced the root");
                self.root = child;
            }
            MergeOutcome::Unchanged => {}
        }
        if let Err(violation) = self.root.check_invariants() {
            error!("Layout invariant broken: {}", violation);
            debug_assert!(false, "layout invariant broken: {}", violation);
        }
    }

    fn set_hover(&mut self, hover: Hover) {
        if hover == self.hover {
            return;
        }
        let old = std::mem::replace(&mut self.hover, hover);
        let regions = [self.hover_region(&old), self.hover_region(&self.hover)];
        for region in regions.into_iter().flatten() {
            self.invalidate(region);
        }
    }

    /// Part of the screen that changes when `hover` is highlighted
    fn hover_region(&self, hover: &Hover) -> Option<Rect> {
        match hover {
            Hover::Separator { group, index, .. } => self.root.get(group)?.as_group()?.separator(*index),
            _ => self.root.folder(hover.folder()?).map(Folder::tab_bar),
        }
    }

    fn set_cursor(&mut self, cursor: CursorKind) {
        if self.cursor != cursor {
            self.cursor = cursor;
            self.dirty |= Dirty::CURSOR;
        }
    }

    fn emit_shown(&mut self, id: &TabId) {
        if let Some(info) = self.tab_info(id).cloned() {
            self.emit(DockEvent::TabShown(info));
        }
    }

    fn emit(&mut self, event: DockEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::dock::geometry::Side;
    use crate::dock::layout::Group;
    use crate::dock::test_support::{folder, group, info, recorded, FixedMetrics};

    fn dock(width: i32, height: i32) -> DockArea {
        let mut area = DockArea::new(DockMetrics::pixels(), Box::new(FixedMetrics));
        area.set_bounds(Rect::new(0, 0, width, height));
        area
    }

    fn ids(area: &DockArea, path: &[usize]) -> Vec<String> {
        area.root()
            .folder(path)
            .map(|f| f.tabs.iter().map(|t| t.id().to_string()).collect())
            .unwrap_or_default()
    }

    fn drag(area: &mut DockArea, from: (i32, i32), to: (i32, i32)) {
        area.pointer_down(from.0, from.1);
        area.pointer_move(to.0, to.1);
        area.pointer_up(to.0, to.1);
    }

    #[test]
    fn test_drag_reorder_to_trailing() {
        let mut area = dock(600, 400);
        for id in ["a", "b", "c"] {
            area.add_tab_to_first_folder(info(id));
        }
        // Tabs are 56 wide: b spans 56..112, the trailing slot starts at 168
        drag(&mut area, (60, 5), (300, 5));

        assert_eq!(ids(&area, &[]), vec!["a", "c", "b"]);
        assert!(area.mode().is_idle());
        assert_eq!(area.cursor(), CursorKind::Default);
    }

    #[test]
    fn test_drop_onto_own_position_is_noop() {
        let mut area = dock(600, 400);
        for id in ["a", "b", "c"] {
            area.add_tab_to_first_folder(info(id));
        }
        drag(&mut area, (130, 5), (300, 5));
        assert_eq!(ids(&area, &[]), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_drag_split_right() {
        let mut area = dock(300, 200);
        area.add_tab_to_first_folder(info("t"));
        area.add_tab_to_first_folder(info("u"));
        drag(&mut area, (60, 5), (290, 100));

        let g = area.root().as_group().expect("split produced a group");
        assert_eq!(g.orientation, Orientation::Horizontal);
        assert_eq!(g.children.len(), 2);
        assert_eq!(ids(&area, &[0]), vec!["t"]);
        assert_eq!(ids(&area, &[1]), vec!["u"]);
        let half = (300 - DockMetrics::pixels().gutter) / 2;
        assert_eq!(g.children[0].weight(), half);
        assert_eq!(g.children[1].weight(), half);
        assert!(area.root().check_invariants().is_ok());
    }

    #[test]
    fn test_drag_moves_between_folders() {
        let mut area = dock(604, 300);
        area.root = group(Orientation::Horizontal, vec![folder(&["a", "b"]), folder(&["c"])]);
        area.set_bounds(Rect::new(0, 0, 604, 300));

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        area.add_listener(move |event| {
            let tag = match event {
                DockEvent::TabShown(info) => format!("shown:{}", info.id),
                DockEvent::TabMoved(info) => format!("moved:{}", info.id),
            };
            sink.borrow_mut().push(tag);
        });

        // Drag "a" (0..56) before "c" (304..360)
        drag(&mut area, (5, 5), (310, 5));

        assert_eq!(ids(&area, &[0]), vec!["b"]);
        assert_eq!(ids(&area, &[1]), vec!["a", "c"]);
        assert_eq!(area.root().folder(&[1]).unwrap().current, Some(0));
        // "a" was already current, so pressing on it announces nothing;
        // "b" takes its place in the source folder
        assert_eq!(*events.borrow(), vec!["moved:a", "shown:a", "shown:b"]);
    }

    /// Record every event as "shown:<id>" or "moved:<id>"
    fn record_events(area: &mut DockArea) -> Rc<RefCell<Vec<String>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        area.add_listener(move |event| {
            let tag = match event {
                DockEvent::TabShown(info) => format!("shown:{}", info.id),
                DockEvent::TabMoved(info) => format!("moved:{}", info.id),
            };
            sink.borrow_mut().push(tag);
        });
        events
    }

    #[test]
    fn test_split_away_current_tab_announces_neighbour() {
        let mut area = dock(300, 200);
        for id in ["a", "b", "c"] {
            area.add_tab_to_first_folder(info(id));
        }
        area.show_tab(&TabId::new("b"));
        let events = record_events(&mut area);

        // Press on "b" (56..112) and drop it on the right third
        drag(&mut area, (60, 5), (290, 100));

        assert_eq!(ids(&area, &[0]), vec!["a", "c"]);
        assert_eq!(area.root().folder(&[0]).unwrap().current, Some(1));
        assert_eq!(*events.borrow(), vec!["moved:b", "shown:b", "shown:c"]);
    }

    #[test]
    fn test_dispose_current_tab_announces_neighbour() {
        let mut area = dock(300, 200);
        area.add_tab_to_first_folder(info("a"));
        area.add_tab_to_first_folder(info("b"));
        let events = record_events(&mut area);

        assert!(area.dispose_tab(&TabId::new("b")));
        assert_eq!(*events.borrow(), vec!["shown:a"]);

        // Closing a hidden tab changes nothing visible
        area.add_tab_to_first_folder(info("c"));
        events.borrow_mut().clear();
        assert!(area.dispose_tab(&TabId::new("a")));
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_last_tab_dragged_out_merges_folder() {
        let mut area = dock(604, 300);
        area.root = group(Orientation::Horizontal, vec![folder(&["a"]), folder(&["b"])]);
        area.set_bounds(Rect::new(0, 0, 604, 300));

        drag(&mut area, (5, 5), (400, 5));

        assert!(area.root().as_folder().is_some());
        assert_eq!(ids(&area, &[]), vec!["b", "a"]);
    }

    #[test]
    fn test_dispose_merges_group() {
        let mut area = dock(604, 300);
        let mut root = Group::with_children(
            Orientation::Horizontal,
            vec![folder(&["a"]), folder(&["b"])],
        );
        root.weight = 500;
        area.root = Element::Group(root);
        area.set_bounds(Rect::new(0, 0, 604, 300));

        assert!(area.dispose_tab(&TabId::new("a")));

        let f = area.root().as_folder().expect("group collapsed into folder");
        assert_eq!(f.tabs.len(), 1);
        assert_eq!(area.root().weight(), 500);
        assert!(!area.dispose_tab(&TabId::new("a")));
    }

    #[test]
    fn test_dispose_destroys_content() {
        let (log, infos) = recorded(&["a", "b"]);
        let mut area = dock(300, 200);
        for info in infos {
            area.add_tab_to_first_folder(info);
        }
        assert!(log.state("b").visible);

        area.dispose_tab(&TabId::new("b"));
        assert!(!log.state("b").alive);
        assert!(log.state("a").visible);
    }

    #[test]
    fn test_show_tab() {
        let (log, infos) = recorded(&["a", "b"]);
        let mut area = dock(300, 200);
        for info in infos {
            area.add_tab_to_first_folder(info);
        }

        assert!(area.show_tab(&TabId::new("a")));
        assert!(log.state("a").visible);
        assert!(!log.state("b").visible);
        assert!(log.state("b").alive);
        assert!(!area.show_tab(&TabId::new("missing")));
    }

    #[test]
    fn test_add_to_largest_folder() {
        let mut area = dock(604, 300);
        area.root = group(Orientation::Horizontal, vec![folder(&["a"]), folder(&["b"])]);
        area.root.get_mut(&[0]).unwrap().set_weight(100);
        area.root.get_mut(&[1]).unwrap().set_weight(300);
        area.set_bounds(Rect::new(0, 0, 604, 300));

        area.add_tab_to_largest_folder(info("n"));
        assert_eq!(ids(&area, &[1]), vec!["b", "n"]);
        area.add_tab_to_first_folder(info("m"));
        assert_eq!(ids(&area, &[0]), vec!["a", "m"]);
        // Adding a known id reveals it instead of duplicating
        area.add_tab_to_first_folder(info("n"));
        assert_eq!(area.root().tab_ids().len(), 4);
    }

    #[test]
    fn test_first_folder_insert_fronts_leading_group() {
        let mut area = dock(604, 300);
        area.root = group(
            Orientation::Horizontal,
            vec![
                group(Orientation::Vertical, vec![folder(&["a"]), folder(&["b"])]),
                folder(&["c"]),
            ],
        );
        area.root.get_mut(&[0]).unwrap().set_weight(400);
        area.root.get_mut(&[1]).unwrap().set_weight(200);
        area.set_bounds(Rect::new(0, 0, 604, 300));

        area.add_tab_to_first_folder(info("n"));

        let root = area.root().as_group().unwrap();
        assert_eq!(root.children.len(), 3);
        assert_eq!(ids(&area, &[0]), vec!["n"]);
        assert!(area.root().get(&[1]).unwrap().as_group().is_some());
        // The new folder took half of the group's share
        assert_eq!(root.children[0].bounds().width, root.children[1].bounds().width);
        assert!(area.root().check_invariants().is_ok());

        // The new leading folder now receives further tabs
        area.add_tab_to_first_folder(info("m"));
        assert_eq!(ids(&area, &[0]), vec!["n", "m"]);
        // A known id creates no folder
        area.root = group(
            Orientation::Horizontal,
            vec![group(Orientation::Vertical, vec![folder(&["a"]), folder(&["b"])]), folder(&["c"])],
        );
        area.add_tab_to_first_folder(info("b"));
        assert_eq!(area.root().as_group().unwrap().children.len(), 2);
    }

    #[test]
    fn test_restore_drops_repeated_tab() {
        let mut area = dock(604, 300);
        let snapshot = persist::snapshot(&group(
            Orientation::Horizontal,
            vec![folder(&["a"]), folder(&["a"])],
        ));
        area.restore_snapshot(&snapshot, &mut |record: &TabRecord| Some(info(record.id.as_str())))
            .unwrap();

        assert_eq!(area.root().tab_ids(), vec![TabId::new("a")]);
        assert!(area.dispose_tab(&TabId::new("a")));
        assert!(!area.show_tab(&TabId::new("a")));
    }

    #[test]
    fn test_maximize_hides_other_content() {
        let (log, infos) = recorded(&["a", "b"]);
        let mut area = dock(604, 300);
        let mut tabs = infos.into_iter().map(Tab::new);
        let left = Folder::with_tabs(vec![tabs.next().unwrap()]);
        let right = Folder::with_tabs(vec![tabs.next().unwrap()]);
        area.root = Element::Group(Group::with_children(
            Orientation::Horizontal,
            vec![Element::Folder(left), Element::Folder(right)],
        ));
        area.set_bounds(Rect::new(0, 0, 604, 300));

        // Maximize button of the right folder: 16px at its top-right corner
        area.pointer_down(600, 5);
        assert!(area.is_maximized());
        assert_eq!(area.element_path(), vec![1]);
        assert!(!log.state("a").visible);
        assert!(log.state("a").alive);
        assert!(log.state("b").visible);
        assert_eq!(log.state("b").bounds, Rect::new(0, 24, 604, 276));

        // Same layout twice gives the same result
        area.set_bounds(Rect::new(0, 0, 604, 300));
        assert_eq!(log.state("b").bounds, Rect::new(0, 24, 604, 276));

        area.pointer_down(600, 5);
        assert!(!area.is_maximized());
        assert!(log.state("a").visible);
        assert_eq!(log.state("b").bounds, Rect::new(304, 24, 300, 276));
    }

    #[test]
    fn test_drag_overlay_classification() {
        let mut area = dock(300, 200);
        area.add_tab_to_first_folder(info("a"));
        area.add_tab_to_first_folder(info("b"));

        area.pointer_down(5, 5);
        area.pointer_move(140, 90);
        let drag = area.mode().drag().expect("dragging");
        assert_eq!(drag.overlay.highlight, None);
        assert_eq!(drag.overlay.area, Rect::new(0, 0, 300, 200));

        area.pointer_move(10, 90);
        let drag = area.mode().drag().expect("dragging");
        assert_eq!(drag.overlay.highlight, Some(Side::Left.zone(&Rect::new(0, 0, 300, 200))));
        assert_eq!(drag.preview.title, "A");
        assert_eq!(area.cursor(), CursorKind::Grabbing);

        // Releasing in the centre third splits nothing
        area.pointer_up(140, 90);
        assert!(area.root().as_folder().is_some());
        assert_eq!(ids(&area, &[]), vec!["a", "b"]);
    }

    #[test]
    fn test_capture_lost_cancels_drag() {
        let mut area = dock(300, 200);
        area.add_tab_to_first_folder(info("a"));
        area.add_tab_to_first_folder(info("b"));

        area.pointer_down(5, 5);
        area.pointer_move(290, 100);
        assert!(area.mode().drag().is_some());

        area.capture_lost();
        assert!(area.mode().is_idle());
        assert_eq!(area.cursor(), CursorKind::Default);
        // Release after losing capture does nothing
        area.pointer_up(290, 100);
        assert!(area.root().as_folder().is_some());
        assert_eq!(ids(&area, &[]), vec!["a", "b"]);
    }

    #[test]
    fn test_separator_resize() {
        let mut area = dock(204, 100);
        area.root = group(Orientation::Horizontal, vec![folder(&["a"]), folder(&["b"])]);
        area.set_bounds(Rect::new(0, 0, 204, 100));

        area.pointer_move(101, 50);
        assert_eq!(area.cursor(), CursorKind::ResizeColumn);
        area.pointer_down(101, 50);
        area.pointer_move(121, 50);
        assert_eq!(area.root().get(&[0]).unwrap().bounds().width, 120);
        assert_eq!(area.root().get(&[1]).unwrap().bounds().width, 80);

        // Clamped at the minimum width
        area.pointer_move(500, 50);
        assert_eq!(area.root().get(&[1]).unwrap().bounds().width, DockMetrics::pixels().min_width);

        area.pointer_up(500, 50);
        assert!(area.mode().is_idle());
    }

    #[test]
    fn test_hover_damage_is_bounded() {
        let mut area = dock(604, 300);
        area.root = group(Orientation::Horizontal, vec![folder(&["a"]), folder(&["b"])]);
        area.set_bounds(Rect::new(0, 0, 604, 300));
        area.take_damage();
        area.take_dirty();

        area.pointer_move(5, 5);
        assert_eq!(area.take_damage(), Some(Rect::new(0, 0, 300, 24)));
        assert!(area.take_dirty().contains(Dirty::PAINT));

        // Same hover again repaints nothing
        area.pointer_move(6, 5);
        assert_eq!(area.take_damage(), None);
    }

    #[test]
    fn test_close_current_tab_uses_active_folder() {
        let mut area = dock(604, 300);
        area.root = group(Orientation::Horizontal, vec![folder(&["a"]), folder(&["b", "c"])]);
        area.set_bounds(Rect::new(0, 0, 604, 300));

        area.pointer_down(400, 150);
        area.pointer_up(400, 150);
        assert_eq!(area.active_folder(), Some(vec![1]));
        assert!(area.close_current_tab());
        assert_eq!(ids(&area, &[1]), vec!["c"]);
    }

    struct WideMetrics;

    impl TextMetrics for WideMetrics {
        fn text_extent(&self, text: &str) -> crate::dock::geometry::Size {
            crate::dock::geometry::Size::new(text.chars().count() as i32 * 50, 14)
        }
    }

    #[test]
    fn test_text_metrics_change_remeasures_titles() {
        let mut area = dock(600, 200);
        area.add_tab_to_first_folder(info("a"));
        assert_eq!(area.root().as_folder().unwrap().tab_bounds()[0].width, 56);

        area.set_text_metrics(Box::new(WideMetrics));
        assert_eq!(area.root().as_folder().unwrap().tab_bounds()[0].width, 66);
    }

    /// Tiny xorshift so the sequence is reproducible without extra crates
    struct Rng(u64);

    impl Rng {
        fn next(&mut self, bound: u32) -> i32 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            (self.0 % bound as u64) as i32
        }
    }

    #[test]
    fn test_invariants_survive_random_operations() {
        let mut area = dock(800, 600);
        let mut rng = Rng(0x9e37_79b9_7f4a_7c15);
        let mut next_id = 0;

        for _ in 0..400 {
            match rng.next(6) {
                0 => {
                    area.add_tab_to_first_folder(info(&format!("t{}", next_id)));
                    next_id += 1;
                }
                1 => {
                    area.add_tab_to_largest_folder(info(&format!("t{}", next_id)));
                    next_id += 1;
                }
                2 => {
                    let ids = area.root().tab_ids();
                    if !ids.is_empty() {
                        let id = ids[rng.next(ids.len() as u32) as usize].clone();
                        assert!(area.dispose_tab(&id));
                    }
                }
                _ => {
                    let from = (rng.next(800), rng.next(600));
                    let to = (rng.next(800), rng.next(600));
                    drag(&mut area, from, to);
                }
            }
            area.capture_lost();
            assert_eq!(area.root().check_invariants(), Ok(()));

            // Layout conserves every group's extent
            let gutter = area.metrics().gutter;
            check_extents(area.element(), gutter);
        }
    }

    fn check_extents(element: &Element, gutter: i32) {
        if let Element::Group(g) = element {
            if g.children.len() > 1 {
                let axis = g.orientation;
                let sum: i32 = g.children.iter().map(|c| c.bounds().extent(axis)).sum();
                let expected = (g.bounds.extent(axis) - gutter * (g.children.len() as i32 - 1)).max(0);
                assert_eq!(sum, expected);
            }
            for child in &g.children {
                check_extents(child, gutter);
            }
        }
    }
}
