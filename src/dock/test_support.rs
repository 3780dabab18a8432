//! Test doubles shared by the dock unit tests

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::geometry::{Orientation, Rect, Size};
use super::layout::{Element, Folder, Group};
use super::paint::TextMetrics;
use super::tab::{Content, Tab, TabId, TabInfo};

/// Every character is 7 units wide, lines are 14 high
pub struct FixedMetrics;

impl FixedMetrics {
    pub fn width_of(text: &str) -> i32 {
        text.chars().count() as i32 * 7
    }
}

impl TextMetrics for FixedMetrics {
    fn text_extent(&self, text: &str) -> Size {
        Size::new(Self::width_of(text), 14)
    }
}

struct NullContent;

impl Content for NullContent {
    fn set_bounds(&mut self, _bounds: Rect) {}
    fn set_visible(&mut self, _visible: bool) {}
}

pub fn info(id: &str) -> TabInfo {
    TabInfo::new(id, id.to_uppercase(), Rc::new(|_: &TabId| Box::new(NullContent) as Box<dyn Content>))
}

pub fn tab(id: &str) -> Tab {
    Tab::new(info(id))
}

pub fn folder(ids: &[&str]) -> Element {
    Element::Folder(Folder::with_tabs(ids.iter().map(|id| tab(id)).collect()))
}

pub fn group(orientation: Orientation, children: Vec<Element>) -> Element {
    Element::Group(Group::with_children(orientation, children))
}

/// Last state reported to a content control
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContentState {
    pub bounds: Rect,
    pub visible: bool,
    pub alive: bool,
}

/// Shared record of what the engine did to each content control
#[derive(Clone, Default)]
pub struct ContentLog(Rc<RefCell<HashMap<TabId, ContentState>>>);

impl ContentLog {
    pub fn info(&self, id: &str) -> TabInfo {
        let log = self.clone();
        TabInfo::new(
            id,
            id.to_uppercase(),
            Rc::new(move |id: &TabId| {
                log.0.borrow_mut().insert(
                    id.clone(),
                    ContentState { alive: true, ..Default::default() },
                );
                Box::new(RecordingContent { id: id.clone(), log: log.clone() }) as Box<dyn Content>
            }),
        )
    }

    pub fn state(&self, id: &str) -> ContentState {
        self.0.borrow().get(&TabId::new(id)).copied().unwrap_or_default()
    }
}

struct RecordingContent {
    id: TabId,
    log: ContentLog,
}

impl RecordingContent {
    fn update(&self, f: impl FnOnce(&mut ContentState)) {
        if let Some(state) = self.log.0.borrow_mut().get_mut(&self.id) {
            f(state);
        }
    }
}

impl Content for RecordingContent {
    fn set_bounds(&mut self, bounds: Rect) {
        self.update(|s| s.bounds = bounds);
    }

    fn set_visible(&mut self, visible: bool) {
        self.update(|s| s.visible = visible);
    }
}

impl Drop for RecordingContent {
    fn drop(&mut self) {
        self.update(|s| {
            s.alive = false;
            s.visible = false;
        });
    }
}

/// Tab infos whose content reports into a fresh log
pub fn recorded(ids: &[&str]) -> (ContentLog, Vec<TabInfo>) {
    let log = ContentLog::default();
    let infos = ids.iter().map(|id| log.info(id)).collect();
    (log, infos)
}
