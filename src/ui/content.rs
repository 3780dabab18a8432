//! Demo tab content for the terminal host.
//!
//! Each tab shows its title, its current size and a few usage hints, so
//! moving and resizing tabs is visible without any real application behind
//! them.

use std::rc::Rc;

use crate::config::Color;
use crate::dock::{Content, ContentFactory, Point, Rect, Surface, TabId, TabInfo, TabRecord};

/// Prefix every demo tab id carries
const ID_PREFIX: &str = "demo-";

const TITLES: &[&str] = &[
    "Editor", "Terminal", "Output", "Explorer", "Search", "Problems", "Outline", "Debug",
];

const PALETTE: &[Color] = &[
    Color::new(136, 192, 208),
    Color::new(163, 190, 140),
    Color::new(235, 203, 139),
    Color::new(208, 135, 112),
    Color::new(180, 142, 173),
    Color::new(143, 188, 187),
];

const HINTS: &[&str] = &[
    "drag a tab to move it",
    "drop on an edge to split",
    "drag a gutter to resize",
    "t/T new tab  x close  m maximize  q quit",
];

/// Placeholder content
pub struct DemoContent {
    title: String,
    accent: Color,
    bounds: Rect,
    visible: bool,
}

impl DemoContent {
    pub fn new(title: impl Into<String>, accent: Color) -> Self {
        Self {
            title: title.into(),
            accent,
            bounds: Rect::default(),
            visible: false,
        }
    }

    fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            self.title.clone(),
            format!("{} x {}", self.bounds.width, self.bounds.height),
            String::new(),
        ];
        lines.extend(HINTS.iter().map(|h| h.to_string()));
        lines
    }
}

impl Content for DemoContent {
    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn paint(&self, surface: &mut dyn Surface) {
        if !self.visible {
            return;
        }
        for (row, line) in self.lines().iter().enumerate() {
            let y = self.bounds.y + 1 + row as i32;
            if y >= self.bounds.bottom() {
                break;
            }
            surface.draw_text(Point::new(self.bounds.x + 1, y), line, self.accent);
        }
    }
}

/// Factory building [`DemoContent`] for a tab id
pub fn demo_factory(title: String) -> ContentFactory {
    Rc::new(move |id: &TabId| {
        let accent = PALETTE[id_number(id).unwrap_or(0) % PALETTE.len()];
        Box::new(DemoContent::new(title.clone(), accent)) as Box<dyn Content>
    })
}

fn id_number(id: &TabId) -> Option<usize> {
    id.as_str().strip_prefix(ID_PREFIX)?.parse().ok()
}

/// The `n`th demo tab
pub fn demo_tab(n: usize) -> TabInfo {
    let label = match n / TITLES.len() {
        0 => TITLES[n % TITLES.len()].to_string(),
        round => format!("{} {}", TITLES[n % TITLES.len()], round + 1),
    };
    TabInfo::new(format!("{}{}", ID_PREFIX, n), label.clone(), demo_factory(label))
}

/// Rebuild a persisted demo tab; foreign ids are rejected
pub fn resolve(record: &TabRecord) -> Option<TabInfo> {
    id_number(&record.id)?;
    Some(TabInfo::new(
        record.id.clone(),
        record.label.clone(),
        demo_factory(record.label.clone()),
    ))
}

/// Next unused demo tab number given the ids already docked
pub fn next_number<'a>(ids: impl IntoIterator<Item = &'a TabId>) -> usize {
    ids.into_iter()
        .filter_map(id_number)
        .max()
        .map_or(0, |n| n + 1)
}
