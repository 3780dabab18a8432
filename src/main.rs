//! tabdock - A tabbed-panel docking demo for the terminal
//!
//! Opens a docking area filling the terminal, with a handful of demo tabs.
//! Everything is driven with the mouse; the layout is saved on exit and
//! restored on the next start.
//!
//! # Quick Start
//!
//! ```text
//! tabdock              # Restore the last layout (or start with 4 tabs)
//! tabdock -n 8         # Start fresh layouts with 8 tabs
//! tabdock --fresh      # Ignore the saved layout
//! ```
//!
//! # Mouse
//!
//! | Gesture | Action |
//! |---------|--------|
//! | Click tab | Show it |
//! | Drag tab onto a tab bar | Move / reorder |
//! | Drag tab onto a folder edge | Split the folder |
//! | Drag gutter | Resize |
//! | Click □ | Maximize / restore |
//!
//! # Keys
//!
//! | Key | Action |
//! |-----|--------|
//! | t / T | New tab in the largest / first folder |
//! | x | Close the current tab |
//! | m | Maximize or restore the active folder |
//! | c | Next color scheme |
//! | q / Esc | Quit (Esc cancels a drag first) |

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tabdock::config::{self, ColorScheme, Config};
use tabdock::dock::{persist, DockArea, DockEvent, Rect};
use tabdock::ui::{content, Renderer, TerminalMetrics};

/// Command line options
struct Options {
    /// Tabs created when no layout is restored
    tabs: usize,
    /// Layout file overriding the configured one
    layout: Option<PathBuf>,
    /// Skip restoring the saved layout
    fresh: bool,
    /// Debug-level logging
    verbose: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tabs: 4,
            layout: None,
            fresh: false,
            verbose: false,
        }
    }
}

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    eprintln!("tabdock {}", VERSION);
}

fn print_help() {
    eprintln!("tabdock {} - A tabbed-panel docking demo for the terminal", VERSION);
    eprintln!();
    eprintln!("Usage: tabdock [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -n, --tabs <N>        Tabs to open when starting fresh (default: 4)");
    eprintln!("  -l, --layout <FILE>   Layout file (default: ~/.tabdock/layout.toml)");
    eprintln!("      --fresh           Ignore the saved layout");
    eprintln!("      --verbose         Debug logging to ~/.tabdock/tabdock.log");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Keys:");
    eprintln!("  t / T                 New tab in the largest / first folder");
    eprintln!("  x                     Close the current tab");
    eprintln!("  m                     Maximize or restore the active folder");
    eprintln!("  c                     Next color scheme");
    eprintln!("  q, Esc                Quit");
}

fn parse_args() -> Result<Options, String> {
    let args: Vec<String> = env::args().collect();
    let mut options = Options::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "-n" | "--tabs" => {
                i += 1;
                let value = args.get(i).ok_or("--tabs requires a number")?;
                options.tabs = value
                    .parse()
                    .map_err(|_| format!("Invalid tab count: {}", value))?;
            }
            "-l" | "--layout" => {
                i += 1;
                let value = args.get(i).ok_or("--layout requires a file")?;
                options.layout = Some(PathBuf::from(value));
            }
            "--fresh" => options.fresh = true,
            "--verbose" => options.verbose = true,
            arg => {
                return Err(format!("Unknown argument: {}. Use -h for help.", arg));
            }
        }
        i += 1;
    }

    Ok(options)
}

/// Log to `~/.tabdock/tabdock.log`; `RUST_LOG` overrides the level
fn init_logging(verbose: bool) {
    let log_path = config::data_dir()
        .map(|dir| dir.join("tabdock.log"))
        .unwrap_or_else(|| PathBuf::from("tabdock.log"));

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let level = if verbose { "debug" } else { "info" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn main() -> anyhow::Result<()> {
    let options = match parse_args() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    init_logging(options.verbose);
    info!("tabdock {} starting...", VERSION);

    let mut config = Config::load();
    let layout_path = options.layout.clone().or_else(|| config.layout_path());

    let mut area = DockArea::new(config.dock, Box::new(TerminalMetrics));
    area.add_listener(|event| match event {
        DockEvent::TabShown(tab) => debug!("Showing {}", tab.label),
        DockEvent::TabMoved(tab) => debug!("Moved {}", tab.label),
    });
    let (cols, rows) = Renderer::size()?;
    area.set_bounds(Rect::new(0, 0, cols as i32, rows as i32));
    populate(&mut area, &options, layout_path.as_deref());

    let mut renderer = Renderer::with_color_scheme(config.get_color_scheme());
    renderer.init()?;
    let result = run_main_loop(&mut area, &mut renderer, &mut config);
    renderer.cleanup()?;

    if let Some(path) = layout_path {
        match persist::save(&path, &area.snapshot()) {
            Ok(()) => info!("Layout saved to {}", path.display()),
            Err(e) => error!("Failed to save layout: {}", e),
        }
    }

    info!("tabdock exiting");
    result
}

/// Restore the saved layout, or open fresh demo tabs
fn populate(area: &mut DockArea, options: &Options, layout_path: Option<&Path>) {
    if let Some(path) = layout_path.filter(|p| !options.fresh && p.exists()) {
        let restored = persist::load(path)
            .and_then(|snapshot| area.restore_snapshot(&snapshot, &mut content::resolve));
        match restored {
            Ok(()) if !area.root().tab_ids().is_empty() => return,
            Ok(()) => info!("Saved layout has no tabs, starting fresh"),
            Err(e) => warn!("Ignoring layout {}: {}", path.display(), e),
        }
    }

    for n in 0..options.tabs {
        area.add_tab_to_first_folder(content::demo_tab(n));
    }
}

fn new_tab(area: &mut DockArea, largest: bool) {
    let ids = area.root().tab_ids();
    let tab = content::demo_tab(content::next_number(&ids));
    if largest {
        area.add_tab_to_largest_folder(tab);
    } else {
        area.add_tab_to_first_folder(tab);
    }
}

/// Main event loop
fn run_main_loop(area: &mut DockArea, renderer: &mut Renderer, config: &mut Config) -> anyhow::Result<()> {
    let poll_timeout = Duration::from_millis(50);
    let schemes = ColorScheme::list();

    loop {
        renderer.render(area)?;

        if !event::poll(poll_timeout)? {
            continue;
        }
        match event::read()? {
            Event::Key(key_event) => {
                if key_event.kind != KeyEventKind::Press {
                    continue;
                }
                match key_event.code {
                    KeyCode::Esc if !area.mode().is_idle() => area.capture_lost(),
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('t') => new_tab(area, true),
                    KeyCode::Char('T') => new_tab(area, false),
                    KeyCode::Char('x') => {
                        area.close_current_tab();
                    }
                    KeyCode::Char('m') => {
                        let path = area
                            .active_folder()
                            .unwrap_or_else(|| area.element_path());
                        area.toggle_maximize(&path);
                    }
                    KeyCode::Char('c') => {
                        let current = schemes
                            .iter()
                            .position(|s| *s == renderer.color_scheme.name)
                            .unwrap_or(0);
                        let next = schemes[(current + 1) % schemes.len()];
                        renderer.set_color_scheme(ColorScheme::by_name(next));
                        config.color_scheme = next.to_string();
                        if let Err(e) = config.save() {
                            warn!("{}", e);
                        }
                    }
                    _ => {}
                }
            }

            Event::Mouse(mouse_event) => {
                let (x, y) = (mouse_event.column as i32, mouse_event.row as i32);
                match mouse_event.kind {
                    MouseEventKind::Down(MouseButton::Left) => area.pointer_down(x, y),
                    MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                        area.pointer_move(x, y)
                    }
                    MouseEventKind::Up(MouseButton::Left) => area.pointer_up(x, y),
                    _ => {}
                }
            }

            Event::Resize(cols, rows) => {
                area.set_bounds(Rect::new(0, 0, cols as i32, rows as i32));
                renderer.invalidate();
            }

            // The pointer left with the button held: nothing to drop on
            Event::FocusLost => area.capture_lost(),

            _ => {}
        }
    }

    Ok(())
}
