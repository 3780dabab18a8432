//! Geometry primitives shared by layout, hit-testing and painting.
//!
//! All coordinates are integer units relative to the docking area's origin.
//! A graphical host treats them as pixels, the terminal host as cells.

use serde::{Deserialize, Serialize};

/// A position relative to the docking area
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Measured extent of some text or control
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check if a point is inside this rectangle (right/bottom edges exclusive)
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Extent along the given axis
    pub fn extent(&self, axis: Orientation) -> i32 {
        match axis {
            Orientation::Horizontal => self.width,
            Orientation::Vertical => self.height,
        }
    }

    /// Start coordinate along the given axis
    pub fn start(&self, axis: Orientation) -> i32 {
        match axis {
            Orientation::Horizontal => self.x,
            Orientation::Vertical => self.y,
        }
    }

    pub fn intersect(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Rect::new(x, y, (right - x).max(0), (bottom - y).max(0))
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }
}

/// Main axis of a group
///
/// A horizontal group lays its children out left to right, a vertical group
/// stacks them top to bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn flip(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// Side of a folder a dragged tab can be docked against
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    /// Orientation of the group needed to place a sibling on this side
    pub fn axis(self) -> Orientation {
        match self {
            Side::Left | Side::Right => Orientation::Horizontal,
            Side::Top | Side::Bottom => Orientation::Vertical,
        }
    }

    /// Whether the new sibling goes before the target in its group
    pub fn is_leading(self) -> bool {
        matches!(self, Side::Left | Side::Top)
    }

    /// Classify a point against the thirds of a rectangle.
    ///
    /// The horizontal thirds are checked first, so a point in a corner third
    /// resolves to `Left`/`Right`. The centre cell yields `None`.
    pub fn classify(rect: &Rect, x: i32, y: i32) -> Option<Side> {
        if rect.is_empty() || !rect.contains(x, y) {
            return None;
        }
        // Compare 3 * offset against the extent to avoid rounding the thirds.
        let dx = 3 * (x - rect.x);
        let dy = 3 * (y - rect.y);
        if dx < rect.width {
            Some(Side::Left)
        } else if dx >= 2 * rect.width {
            Some(Side::Right)
        } else if dy < rect.height {
            Some(Side::Top)
        } else if dy >= 2 * rect.height {
            Some(Side::Bottom)
        } else {
            None
        }
    }

    /// The third of `rect` highlighted for this side
    pub fn zone(self, rect: &Rect) -> Rect {
        let w = rect.width / 3;
        let h = rect.height / 3;
        match self {
            Side::Left => Rect::new(rect.x, rect.y, w, rect.height),
            Side::Right => Rect::new(rect.right() - w, rect.y, w, rect.height),
            Side::Top => Rect::new(rect.x, rect.y, rect.width, h),
            Side::Bottom => Rect::new(rect.x, rect.bottom() - h, rect.width, h),
        }
    }
}
