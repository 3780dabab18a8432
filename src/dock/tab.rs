//! Tab - A single dockable unit of content

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::geometry::{Rect, Size};
use super::paint::Surface;

/// Opaque tab identity, compared for equality in every lookup
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(String);

impl TabId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TabId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A hosted content control.
///
/// The docking engine only positions and shows/hides content; everything the
/// content does inside its bounds is its own business.
pub trait Content {
    /// Place the control within the docking area
    fn set_bounds(&mut self, bounds: Rect);

    /// Show or hide the control (hidden controls are kept alive)
    fn set_visible(&mut self, visible: bool);

    /// Draw the control into its bounds
    fn paint(&self, _surface: &mut dyn Surface) {}
}

/// Deferred constructor for a tab's content
pub type ContentFactory = Rc<dyn Fn(&TabId) -> Box<dyn Content>>;

/// Description of a tab: identity, label and how to build its content
#[derive(Clone)]
pub struct TabInfo {
    pub id: TabId,
    pub label: String,
    factory: ContentFactory,
}

impl TabInfo {
    pub fn new(id: impl Into<TabId>, label: impl Into<String>, factory: ContentFactory) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            factory,
        }
    }

    /// Build the content control for this tab
    pub fn create_content(&self) -> Box<dyn Content> {
        (self.factory)(&self.id)
    }
}

impl fmt::Debug for TabInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabInfo")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl From<String> for TabId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Runtime wrapper for a tab owned by exactly one folder
pub struct Tab {
    pub info: TabInfo,
    pub content: Box<dyn Content>,
    /// Cached title extent in the current font
    title_size: Option<Size>,
}

impl Tab {
    /// Create a tab, materializing its content
    pub fn new(info: TabInfo) -> Self {
        let content = info.create_content();
        Self {
            info,
            content,
            title_size: None,
        }
    }

    pub fn id(&self) -> &TabId {
        &self.info.id
    }

    pub fn label(&self) -> &str {
        &self.info.label
    }

    /// Measured title size, computing it on first use
    pub fn title_size(&mut self, measure: impl FnOnce(&str) -> Size) -> Size {
        if let Some(size) = self.title_size {
            return size;
        }
        let size = measure(&self.info.label);
        self.title_size = Some(size);
        size
    }

    /// Forget the cached title size (font changed)
    pub fn invalidate_title(&mut self) {
        self.title_size = None;
    }
}

impl fmt::Debug for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tab").field("id", &self.info.id).finish_non_exhaustive()
    }
}
