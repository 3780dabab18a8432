//! Paint - Drawing the dock onto a host surface
//!
//! The engine never talks to a window system directly. Hosts hand it a
//! [`Surface`] to draw on and a [`TextMetrics`] to measure tab titles with;
//! the terminal host implements both over a cell grid.

use crate::config::{Color, ColorScheme};

use super::area::DockArea;
use super::drag::DragSession;
use super::geometry::{Orientation, Point, Rect, Size};
use super::hover::Hover;
use super::layout::{Element, Folder, NodePath};

/// Drawing primitives offered by the host
pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Straight line between two points (horizontal or vertical)
    fn draw_line(&mut self, from: Point, to: Point, color: Color);

    /// Draw `text` with its top-left corner at `at`, over whatever is below
    fn draw_text(&mut self, at: Point, text: &str, color: Color);

    /// Restrict drawing to `clip`, or lift the restriction
    fn set_clip(&mut self, clip: Option<Rect>);
}

/// Text measurement in the same units as the layout
pub trait TextMetrics {
    fn text_extent(&self, text: &str) -> Size;
}

/// Button glyphs
const MAXIMIZE_GLYPH: &str = "□";
const RESTORE_GLYPH: &str = "❐";

/// Draws one frame of a [`DockArea`]
pub struct Painter<'a> {
    scheme: &'a ColorScheme,
    area: &'a DockArea,
}

impl<'a> Painter<'a> {
    pub fn new(scheme: &'a ColorScheme, area: &'a DockArea) -> Self {
        Self { scheme, area }
    }

    /// Paint everything intersecting `region`
    pub fn paint(&self, surface: &mut dyn Surface, region: Rect) {
        let clip = region.intersect(&self.area.bounds());
        if clip.is_empty() {
            return;
        }
        surface.set_clip(Some(clip));
        // Whatever no folder covers is gutter
        surface.fill_rect(clip, self.scheme.separator);

        let mut path = self.area.element_path();
        if let Some(element) = self.area.root().get(&path) {
            self.paint_element(element, &mut path, surface, clip);
        }
        if let Some(drag) = self.area.mode().drag() {
            self.paint_drag(drag, surface, clip);
        }
        surface.set_clip(None);
    }

    fn paint_element(&self, element: &Element, path: &mut NodePath, surface: &mut dyn Surface, clip: Rect) {
        match element {
            Element::Folder(folder) => self.paint_folder(folder, path, surface, clip),
            Element::Group(group) => {
                for (i, child) in group.children.iter().enumerate() {
                    path.push(i);
                    self.paint_element(child, path, surface, clip);
                    path.pop();
                }
                for index in 0..group.children.len().saturating_sub(1) {
                    let Some(sep) = group.separator(index) else {
                        continue;
                    };
                    if sep.intersect(&clip).is_empty() {
                        continue;
                    }
                    let hovered = matches!(
                        self.area.hover(),
                        Hover::Separator { group: g, index: i, .. } if g == path && *i == index
                    );
                    let color = if hovered {
                        self.scheme.separator_hover
                    } else {
                        self.scheme.separator
                    };
                    surface.fill_rect(sep, color);
                    let (from, to) = match group.orientation {
                        Orientation::Horizontal => {
                            let x = sep.x + sep.width / 2;
                            (Point::new(x, sep.y), Point::new(x, sep.bottom() - 1))
                        }
                        Orientation::Vertical => {
                            let y = sep.y + sep.height / 2;
                            (Point::new(sep.x, y), Point::new(sep.right() - 1, y))
                        }
                    };
                    surface.draw_line(from, to, color);
                }
            }
        }
    }

    fn paint_folder(&self, folder: &Folder, path: &[usize], surface: &mut dyn Surface, clip: Rect) {
        if folder.bounds.intersect(&clip).is_empty() {
            return;
        }
        let cs = self.scheme;
        let margin = self.area.metrics().tab_margin;
        let text = self.area.text_metrics();
        let hover = self.area.hover();
        let active = self.area.active_folder().as_deref() == Some(path);

        surface.fill_rect(folder.tab_bar(), cs.tab_bar_bg);
        for (i, (tab, rect)) in folder.tabs.iter().zip(folder.tab_bounds()).enumerate() {
            let hovered = matches!(
                hover,
                Hover::Tab { folder: f, tab: Some(t) } if f == path && *t == i
            );
            let (bg, fg) = if folder.current == Some(i) {
                if active {
                    (cs.tab_active_bg, cs.tab_active_fg)
                } else {
                    (cs.tab_selected_bg, cs.tab_selected_fg)
                }
            } else if hovered {
                (cs.tab_hover_bg, cs.tab_inactive_fg)
            } else {
                (cs.tab_inactive_bg, cs.tab_inactive_fg)
            };
            if rect.intersect(&clip).is_empty() {
                continue;
            }
            surface.fill_rect(*rect, bg);

            let title = text.text_extent(tab.label());
            let at = Point::new(rect.x + margin, rect.y + (rect.height - title.height).max(0) / 2);
            surface.set_clip(Some(rect.intersect(&clip)));
            surface.draw_text(at, tab.label(), fg);
            surface.set_clip(Some(clip));
        }

        let button = folder.button();
        if !button.intersect(&clip).is_empty() {
            let hovered = matches!(hover, Hover::MaximizeButton { folder: f } if f == path);
            let bg = if hovered { cs.tab_hover_bg } else { cs.tab_bar_bg };
            surface.fill_rect(button, bg);
            let glyph = if folder.maximized { RESTORE_GLYPH } else { MAXIMIZE_GLYPH };
            let size = text.text_extent(glyph);
            let at = Point::new(
                button.x + (button.width - size.width).max(0) / 2,
                button.y + (button.height - size.height).max(0) / 2,
            );
            surface.set_clip(Some(button.intersect(&clip)));
            surface.draw_text(at, glyph, cs.button_fg);
            surface.set_clip(Some(clip));
        }

        let body = folder.body();
        surface.fill_rect(body, cs.body_bg);
        if let Some(tab) = folder.current_tab() {
            let body_clip = body.intersect(&clip);
            if !body_clip.is_empty() {
                surface.set_clip(Some(body_clip));
                tab.content.paint(surface);
                surface.set_clip(Some(clip));
            }
        }
    }

    fn paint_drag(&self, drag: &DragSession, surface: &mut dyn Surface, clip: Rect) {
        let cs = self.scheme;
        if self.area.metrics().drop_overlay {
            if let Some(zone) = drag.overlay.highlight {
                surface.fill_rect(zone, cs.drop_zone);
            }
        }

        let rect = self.area.preview_bounds(&drag.preview);
        if rect.intersect(&clip).is_empty() {
            return;
        }
        surface.fill_rect(rect, cs.preview_bg);
        let title = self.area.text_metrics().text_extent(&drag.preview.title);
        let at = Point::new(
            rect.x + self.area.metrics().tab_margin,
            rect.y + (rect.height - title.height).max(0) / 2,
        );
        surface.set_clip(Some(rect.intersect(&clip)));
        surface.draw_text(at, &drag.preview.title, cs.preview_fg);
        surface.set_clip(Some(clip));
    }
}
