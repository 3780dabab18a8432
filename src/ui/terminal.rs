//! Cell grid surface for the terminal host.
//!
//! The painter draws into a [`CellGrid`]; the renderer then diffs it against
//! the previous frame and writes only changed cells.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::Color;
use crate::dock::{Point, Rect, Size, Surface, TextMetrics};

/// Placeholder stored in the right half of a double-width character
pub const WIDE_CONTINUATION: char = '\0';

/// One terminal cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::new(255, 255, 255),
            bg: Color::new(0, 0, 0),
        }
    }
}

/// Screen-sized grid of cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellGrid {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    clip: Option<Rect>,
}

impl CellGrid {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
            clip: None,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Resize, clearing the contents when the size changes
    pub fn resize(&mut self, width: u16, height: u16) -> bool {
        if width == self.width && height == self.height {
            return false;
        }
        *self = Self::new(width, height);
        true
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y as usize * self.width as usize + x as usize)
    }

    /// Text of one row, without wide-character placeholders
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .map(|c| c.ch)
            .filter(|&ch| ch != WIDE_CONTINUATION)
            .collect()
    }

    fn bounds(&self) -> Rect {
        let full = Rect::new(0, 0, self.width as i32, self.height as i32);
        match self.clip {
            Some(clip) => full.intersect(&clip),
            None => full,
        }
    }

    fn cell_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        if !self.bounds().contains(x, y) {
            return None;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.cells.get_mut(index)
    }
}

impl Surface for CellGrid {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let area = rect.intersect(&self.bounds());
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                if let Some(cell) = self.cell_mut(x, y) {
                    cell.ch = ' ';
                    cell.bg = color;
                }
            }
        }
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color) {
        if from.x == to.x {
            for y in from.y.min(to.y)..=from.y.max(to.y) {
                if let Some(cell) = self.cell_mut(from.x, y) {
                    cell.ch = '│';
                    cell.fg = color;
                }
            }
        } else if from.y == to.y {
            for x in from.x.min(to.x)..=from.x.max(to.x) {
                if let Some(cell) = self.cell_mut(x, from.y) {
                    cell.ch = '─';
                    cell.fg = color;
                }
            }
        }
    }

    fn draw_text(&mut self, at: Point, text: &str, color: Color) {
        let mut x = at.x;
        for ch in text.chars() {
            let width = ch.width().unwrap_or(0) as i32;
            if width == 0 {
                continue;
            }
            // A wide character is drawn only when both halves fit
            if width == 2 && self.cell_mut(x + 1, at.y).is_none() {
                break;
            }
            if let Some(cell) = self.cell_mut(x, at.y) {
                cell.ch = ch;
                cell.fg = color;
            }
            if width == 2 {
                if let Some(cell) = self.cell_mut(x + 1, at.y) {
                    cell.ch = WIDE_CONTINUATION;
                    cell.fg = color;
                }
            }
            x += width;
        }
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = clip;
    }
}

/// Text measured in terminal columns
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalMetrics;

impl TextMetrics for TerminalMetrics {
    fn text_extent(&self, text: &str) -> Size {
        Size::new(UnicodeWidthStr::width(text) as i32, 1)
    }
}
