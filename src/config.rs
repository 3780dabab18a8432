//! Configuration and color scheme management for tabdock.
//!
//! This module provides:
//! - TOML configuration file loading from `~/.tabdock/config.toml`
//! - Dock metrics (gutters, tab bar geometry, minimum sizes)
//! - Built-in color schemes used by the painter
//!
//! # Configuration File
//!
//! ```toml
//! # Color scheme: default, nord, dracula, gruvbox-dark, tokyo-night
//! color_scheme = "nord"
//!
//! # Where the demo keeps its layout between sessions (optional)
//! layout_file = "/home/me/.tabdock/layout.toml"
//!
//! [dock]
//! gutter = 1
//! tab_bar_height = 1
//! min_width = 6
//! ```

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::dock::Orientation;

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Color scheme name
    pub color_scheme: String,
    /// Saved layout location
    pub layout_file: Option<PathBuf>,
    /// Dock geometry
    pub dock: DockMetrics,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color_scheme: "default".to_string(),
            layout_file: None,
            dock: DockMetrics::default(),
        }
    }
}

/// Fixed sizes used by layout and hit-testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockMetrics {
    /// Space between siblings in a group (also the separator grab area)
    pub gutter: i32,
    /// Height of a folder's tab bar
    pub tab_bar_height: i32,
    /// Horizontal padding on each side of a tab title
    pub tab_margin: i32,
    /// Titles narrower than this still get this much room
    pub min_title_width: i32,
    /// Edge length of the maximize button
    pub button_size: i32,
    /// Smallest width a separator drag may leave a child with
    pub min_width: i32,
    /// Smallest height a separator drag may leave a child with
    pub min_height: i32,
    /// Highlight the drop zone while dragging
    pub drop_overlay: bool,
}

impl Default for DockMetrics {
    fn default() -> Self {
        Self::terminal()
    }
}

impl DockMetrics {
    /// Pixel-based metrics for a graphical host
    pub fn pixels() -> Self {
        Self {
            gutter: 4,
            tab_bar_height: 24,
            tab_margin: 8,
            min_title_width: 40,
            button_size: 16,
            min_width: 40,
            min_height: 40,
            drop_overlay: true,
        }
    }

    /// Cell-based metrics for the terminal host
    pub fn terminal() -> Self {
        Self {
            gutter: 1,
            tab_bar_height: 1,
            tab_margin: 1,
            min_title_width: 3,
            button_size: 3,
            min_width: 6,
            min_height: 3,
            drop_overlay: true,
        }
    }

    /// Minimum extent along a group's main axis
    pub fn min_extent(&self, axis: Orientation) -> i32 {
        match axis {
            Orientation::Horizontal => self.min_width,
            Orientation::Vertical => self.min_height,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Self {
        if let Some(path) = Self::get_config_path() {
            if path.exists() {
                match fs::read_to_string(&path) {
                    Ok(content) => match toml::from_str(&content) {
                        Ok(config) => return config,
                        Err(e) => warn!("Ignoring malformed config {}: {}", path.display(), e),
                    },
                    Err(e) => warn!("Cannot read config {}: {}", path.display(), e),
                }
            }
        }
        Self::default()
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<(), String> {
        if let Some(path) = Self::get_config_path() {
            let content = toml::to_string_pretty(self)
                .map_err(|e| format!("Failed to serialize config: {}", e))?;
            fs::write(&path, content)
                .map_err(|e| format!("Failed to write config: {}", e))?;
            Ok(())
        } else {
            Err("Could not determine config path".to_string())
        }
    }

    /// Where the layout snapshot lives
    pub fn layout_path(&self) -> Option<PathBuf> {
        self.layout_file
            .clone()
            .or_else(|| data_dir().map(|dir| dir.join("layout.toml")))
    }

    /// Get config file path
    fn get_config_path() -> Option<PathBuf> {
        data_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get the color scheme
    pub fn get_color_scheme(&self) -> ColorScheme {
        ColorScheme::by_name(&self.color_scheme)
    }
}

/// Color definition (RGB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to crossterm Color
    pub fn to_crossterm(&self) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }
}

/// Color scheme definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorScheme {
    pub name: String,

    // Tab bar colors
    pub tab_bar_bg: Color,
    pub tab_bar_fg: Color,
    /// Current tab of the active folder
    pub tab_active_bg: Color,
    pub tab_active_fg: Color,
    /// Current tab of any other folder
    pub tab_selected_bg: Color,
    pub tab_selected_fg: Color,
    pub tab_inactive_bg: Color,
    pub tab_inactive_fg: Color,
    pub tab_hover_bg: Color,
    pub button_fg: Color,

    // Folder body and separators
    pub body_bg: Color,
    pub body_fg: Color,
    pub separator: Color,
    pub separator_hover: Color,

    // Drag feedback
    pub drop_zone: Color,
    pub preview_bg: Color,
    pub preview_fg: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_scheme()
    }
}

impl ColorScheme {
    /// Default color scheme
    pub fn default_scheme() -> Self {
        Self {
            name: "default".to_string(),

            tab_bar_bg: Color::new(40, 40, 40),
            tab_bar_fg: Color::new(180, 180, 180),
            tab_active_bg: Color::new(60, 60, 180),
            tab_active_fg: Color::new(255, 255, 255),
            tab_selected_bg: Color::new(80, 80, 80),
            tab_selected_fg: Color::new(230, 230, 230),
            tab_inactive_bg: Color::new(60, 60, 60),
            tab_inactive_fg: Color::new(150, 150, 150),
            tab_hover_bg: Color::new(90, 90, 120),
            button_fg: Color::new(200, 200, 0),

            body_bg: Color::new(20, 20, 20),
            body_fg: Color::new(200, 200, 200),
            separator: Color::new(80, 80, 80),
            separator_hover: Color::new(100, 150, 255),

            drop_zone: Color::new(40, 90, 160),
            preview_bg: Color::new(200, 200, 0),
            preview_fg: Color::new(0, 0, 0),
        }
    }

    /// Nord scheme
    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),

            tab_bar_bg: Color::new(46, 52, 64),
            tab_bar_fg: Color::new(216, 222, 233),
            tab_active_bg: Color::new(136, 192, 208),
            tab_active_fg: Color::new(46, 52, 64),
            tab_selected_bg: Color::new(76, 86, 106),
            tab_selected_fg: Color::new(236, 239, 244),
            tab_inactive_bg: Color::new(59, 66, 82),
            tab_inactive_fg: Color::new(147, 161, 181),
            tab_hover_bg: Color::new(94, 129, 172),
            button_fg: Color::new(163, 190, 140),

            body_bg: Color::new(46, 52, 64),
            body_fg: Color::new(216, 222, 233),
            separator: Color::new(59, 66, 82),
            separator_hover: Color::new(136, 192, 208),

            drop_zone: Color::new(94, 129, 172),
            preview_bg: Color::new(163, 190, 140),
            preview_fg: Color::new(46, 52, 64),
        }
    }

    /// Dracula scheme
    pub fn dracula() -> Self {
        Self {
            name: "dracula".to_string(),

            tab_bar_bg: Color::new(40, 42, 54),
            tab_bar_fg: Color::new(248, 248, 242),
            tab_active_bg: Color::new(189, 147, 249),
            tab_active_fg: Color::new(40, 42, 54),
            tab_selected_bg: Color::new(98, 114, 164),
            tab_selected_fg: Color::new(248, 248, 242),
            tab_inactive_bg: Color::new(68, 71, 90),
            tab_inactive_fg: Color::new(98, 114, 164),
            tab_hover_bg: Color::new(255, 121, 198),
            button_fg: Color::new(80, 250, 123),

            body_bg: Color::new(40, 42, 54),
            body_fg: Color::new(248, 248, 242),
            separator: Color::new(68, 71, 90),
            separator_hover: Color::new(189, 147, 249),

            drop_zone: Color::new(98, 114, 164),
            preview_bg: Color::new(80, 250, 123),
            preview_fg: Color::new(40, 42, 54),
        }
    }

    /// Gruvbox Dark scheme
    pub fn gruvbox_dark() -> Self {
        Self {
            name: "gruvbox-dark".to_string(),

            tab_bar_bg: Color::new(40, 40, 40),
            tab_bar_fg: Color::new(235, 219, 178),
            tab_active_bg: Color::new(215, 153, 33),
            tab_active_fg: Color::new(40, 40, 40),
            tab_selected_bg: Color::new(102, 92, 84),
            tab_selected_fg: Color::new(235, 219, 178),
            tab_inactive_bg: Color::new(60, 56, 54),
            tab_inactive_fg: Color::new(168, 153, 132),
            tab_hover_bg: Color::new(124, 111, 100),
            button_fg: Color::new(152, 151, 26),

            body_bg: Color::new(29, 32, 33),
            body_fg: Color::new(235, 219, 178),
            separator: Color::new(60, 56, 54),
            separator_hover: Color::new(215, 153, 33),

            drop_zone: Color::new(69, 133, 136),
            preview_bg: Color::new(152, 151, 26),
            preview_fg: Color::new(40, 40, 40),
        }
    }

    /// Tokyo Night scheme
    pub fn tokyo_night() -> Self {
        Self {
            name: "tokyo-night".to_string(),

            tab_bar_bg: Color::new(26, 27, 38),
            tab_bar_fg: Color::new(169, 177, 214),
            tab_active_bg: Color::new(122, 162, 247),
            tab_active_fg: Color::new(26, 27, 38),
            tab_selected_bg: Color::new(51, 59, 91),
            tab_selected_fg: Color::new(192, 202, 245),
            tab_inactive_bg: Color::new(36, 40, 59),
            tab_inactive_fg: Color::new(86, 95, 137),
            tab_hover_bg: Color::new(65, 72, 104),
            button_fg: Color::new(158, 206, 106),

            body_bg: Color::new(26, 27, 38),
            body_fg: Color::new(169, 177, 214),
            separator: Color::new(41, 46, 66),
            separator_hover: Color::new(122, 162, 247),

            drop_zone: Color::new(61, 89, 161),
            preview_bg: Color::new(158, 206, 106),
            preview_fg: Color::new(26, 27, 38),
        }
    }

    /// Get scheme by name
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "nord" => Self::nord(),
            "dracula" => Self::dracula(),
            "gruvbox-dark" | "gruvbox_dark" | "gruvbox" => Self::gruvbox_dark(),
            "tokyo-night" | "tokyo_night" | "tokyonight" => Self::tokyo_night(),
            _ => Self::default_scheme(),
        }
    }

    /// List available schemes
    pub fn list() -> Vec<&'static str> {
        vec!["default", "nord", "dracula", "gruvbox-dark", "tokyo-night"]
    }
}

/// `~/.tabdock`, created on demand
pub fn data_dir() -> Option<PathBuf> {
    let dir = home_dir()?.join(".tabdock");
    if !dir.exists() {
        let _ = fs::create_dir_all(&dir);
    }
    Some(dir)
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
}
