//! Terminal renderer for the docking area.
//!
//! The renderer paints the dock into a [`CellGrid`] and writes the cells that
//! changed since the previous frame. Frames use synchronized updates to
//! prevent tearing:
//!
//! ```text
//! begin_frame()  → Hide cursor, disable autowrap, start sync
//!     ↓
//! flush cells    → Only cells that differ from the last frame
//!     ↓
//! end_frame()    → Enable autowrap, end sync, flush
//! ```
//!
//! The pointer shape follows the dock's [`CursorKind`] through the OSC 22
//! sequence, which terminals without support silently ignore.

use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute, queue,
    style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::debug;

use crate::config::{Color, ColorScheme};
use crate::dock::{CursorKind, Dirty, DockArea};

use super::terminal::{CellGrid, WIDE_CONTINUATION};

/// Begin a render frame (synchronized update, hide cursor, disable autowrap)
fn begin_frame<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "\x1b[?2026h")?;  // Begin synchronized update
    write!(out, "\x1b[?7l")?;      // Disable autowrap
    queue!(out, Hide)?;
    Ok(())
}

/// End a render frame (enable autowrap, end synchronized update, flush)
fn end_frame<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(out, ResetColor)?;
    write!(out, "\x1b[?7h")?;      // Enable autowrap
    write!(out, "\x1b[?2026l")?;   // End synchronized update
    out.flush()?;
    Ok(())
}

/// Execute a render operation with frame guards, ensuring cleanup on error
fn with_frame<W: Write, F, R>(out: &mut W, f: F) -> io::Result<R>
where
    F: FnOnce(&mut W) -> io::Result<R>,
{
    begin_frame(out)?;
    let result = f(out);
    // Always end frame, even on error
    let _ = end_frame(out);
    result
}

/// CSS cursor name requested through OSC 22
pub fn pointer_shape(kind: CursorKind) -> &'static str {
    match kind {
        CursorKind::Default => "default",
        CursorKind::ResizeColumn => "col-resize",
        CursorKind::ResizeRow => "row-resize",
        CursorKind::Grabbing => "grabbing",
    }
}

/// Docking area renderer
pub struct Renderer {
    initialized: bool,
    pub color_scheme: ColorScheme,
    /// Frame being painted
    grid: CellGrid,
    /// What the terminal currently shows
    shown: CellGrid,
    /// Repaint and rewrite everything on the next frame
    force: bool,
}

impl Renderer {
    pub fn with_color_scheme(color_scheme: ColorScheme) -> Self {
        Self {
            initialized: false,
            color_scheme,
            grid: CellGrid::default(),
            shown: CellGrid::default(),
            force: true,
        }
    }

    /// Set color scheme
    pub fn set_color_scheme(&mut self, scheme: ColorScheme) {
        debug!("Color scheme: {}", scheme.name);
        self.color_scheme = scheme;
        self.force = true;
    }

    /// Initialize the terminal
    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableFocusChange,
            Clear(ClearType::All)
        )?;
        stdout.flush()?;

        self.initialized = true;
        self.force = true;
        Ok(())
    }

    /// Cleanup
    pub fn cleanup(&mut self) -> io::Result<()> {
        if !self.initialized {
            return Ok(());
        }

        let mut stdout = io::stdout();

        // Restore terminal state (in case of abnormal exit)
        write!(stdout, "\x1b[?7h")?;      // Enable autowrap
        write!(stdout, "\x1b[?2026l")?;   // End synchronized update (if active)
        write!(stdout, "\x1b]22;{}\x1b\\", pointer_shape(CursorKind::Default))?;
        stdout.flush()?;

        execute!(
            stdout,
            ResetColor,
            Show,
            DisableFocusChange,
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()?;
        self.initialized = false;
        Ok(())
    }

    /// Get terminal size
    pub fn size() -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Force a full repaint (e.g. after the terminal was resized)
    pub fn invalidate(&mut self) {
        self.force = true;
    }

    /// Paint what the dock reports as damaged and write it out
    pub fn render(&mut self, area: &mut DockArea) -> io::Result<()> {
        let bounds = area.bounds();
        let width = bounds.right().clamp(0, u16::MAX as i32) as u16;
        let height = bounds.bottom().clamp(0, u16::MAX as i32) as u16;
        if self.grid.resize(width, height) {
            self.force = true;
        }

        let dirty = area.take_dirty();
        let damage = area.take_damage();
        let region = if self.force { Some(bounds) } else { damage };
        if let Some(region) = region {
            area.paint(&self.color_scheme, &mut self.grid, Some(region));
        }
        if region.is_none() && !dirty.contains(Dirty::CURSOR) {
            return Ok(());
        }

        let stdout = io::stdout();
        let mut out = io::BufWriter::with_capacity(65536, stdout.lock());
        let force = std::mem::replace(&mut self.force, false);
        let (grid, shown) = (&self.grid, &mut self.shown);
        with_frame(&mut out, |out| {
            flush_cells(out, grid, shown, force)?;
            if force || dirty.contains(Dirty::CURSOR) {
                write!(out, "\x1b]22;{}\x1b\\", pointer_shape(area.cursor()))?;
            }
            Ok(())
        })
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Write every cell of `grid` that differs from `shown`, then remember it
fn flush_cells<W: Write>(out: &mut W, grid: &CellGrid, shown: &mut CellGrid, force: bool) -> io::Result<()> {
    if shown.width() != grid.width() || shown.height() != grid.height() {
        *shown = CellGrid::new(grid.width(), grid.height());
    }

    let mut colors: Option<(Color, Color)> = None;
    for y in 0..grid.height() {
        let mut cursor_at: Option<u16> = None;
        for x in 0..grid.width() {
            let Some(cell) = grid.get(x, y) else {
                continue;
            };
            if cell.ch == WIDE_CONTINUATION {
                continue;
            }
            if !force && shown.get(x, y) == Some(cell) {
                continue;
            }
            if cursor_at != Some(x) {
                queue!(out, MoveTo(x, y))?;
            }
            if colors != Some((cell.fg, cell.bg)) {
                queue!(
                    out,
                    SetForegroundColor(cell.fg.to_crossterm()),
                    SetBackgroundColor(cell.bg.to_crossterm())
                )?;
                colors = Some((cell.fg, cell.bg));
            }
            queue!(out, Print(cell.ch))?;
            let wide = grid.get(x + 1, y).is_some_and(|c| c.ch == WIDE_CONTINUATION);
            cursor_at = Some(x + if wide { 2 } else { 1 });
        }
    }
    *shown = grid.clone();
    Ok(())
}
