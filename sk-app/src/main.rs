//! softkeys - feature-phone soft-key simulator
//!
//! Hosts a demo page in the terminal and drives the soft-key engine with it.
//! Page mutations typed in command mode exercise binding synchronization.

mod demo;

use std::fs::{self, OpenOptions};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    Terminal,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sk_core::{Config, LogicalKey, MenuPlacement, Routed, SoftKeyError, SoftKeys};
use sk_input::{Command, InputHandler};
use sk_tree::{Document, NodeId, NodeSpec, ViewTree, ACCESSKEY_ATTR};
use sk_tui::{
    App, HelpWidget, OptionsMenuWidget, PageWidget, SoftKeyBarWidget, StatusBarWidget, Theme,
};

/// Input poll interval; the screen only changes on input
const POLL_INTERVAL: Duration = Duration::from_millis(250);
/// Width of the simulated phone screen
const PHONE_WIDTH: u16 = 44;

fn main() -> anyhow::Result<()> {
    if let Err(e) = init_logging() {
        eprintln!("softkeys: logging disabled: {e}");
    }

    let config = Config::load();
    info!(preset = config.preset.name(), "starting softkeys");

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &config);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Log to a file under the data dir so the alternate screen stays clean
fn init_logging() -> anyhow::Result<()> {
    let dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("softkeys");
    fs::create_dir_all(&dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("softkeys.log"))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &Config,
) -> anyhow::Result<()> {
    let mut app = App::new();
    match Theme::by_name(&config.theme) {
        Some(theme) => app.state.theme = theme,
        None => warn!(theme = %config.theme, "unknown theme in config, using default"),
    }

    let mut input_handler = InputHandler::new();
    input_handler.set_soft_keys(LogicalKey::ALL.map(|key| config.keymap.physical(key).to_string()));

    let mut doc = demo::build(&config.keymap);
    let mut keys = SoftKeys::new(config);
    keys.init(&mut doc)?;

    app.state.set_message(format!(
        "softkeys - {} preset | Press ? for help, : for commands",
        config.preset.name()
    ));

    loop {
        if app.should_quit {
            break;
        }

        terminal.draw(|frame| {
            render_ui(frame, &app, &doc, &keys);
        })?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if let Some(cmd) = input_handler.handle_key(key) {
                    handle_command(&mut app, &mut doc, &mut keys, cmd);
                }

                app.state.set_mode(input_handler.mode());
                app.state.command_buffer = input_handler.command_buffer().to_string();
            }
        }

        settle(&mut app, &mut doc, &mut keys);
    }

    keys.destroy(&mut doc);
    Ok(())
}

/// Deliver this turn's mutations, reconcile them, and report activations
fn settle(app: &mut App, doc: &mut Document, keys: &mut SoftKeys) {
    doc.checkpoint();
    let report = keys.process_mutations(doc);
    app.state.batches_processed += report.batches;
    if !report.cleared.is_empty() {
        let cleared: Vec<String> = report.cleared.iter().map(ToString::to_string).collect();
        app.state
            .set_warning(format!("Unbound: {}", cleared.join(", ")));
    }

    for node in doc.take_activations() {
        let label = doc.text(node).unwrap_or_default();
        app.state.set_success(format!("Activated: {} ({})", label, node));
    }
}

fn handle_command(app: &mut App, doc: &mut Document, keys: &mut SoftKeys, cmd: Command) {
    match cmd {
        // Soft keys
        Command::Key(physical) => match keys.on_physical_key(doc, &physical) {
            Ok(routed) => handle_routed(app, doc, keys, routed),
            Err(e) => app.state.set_error(e.to_string()),
        },

        // Options menu
        Command::SelectNext => keys.select_next(),
        Command::SelectPrev => keys.select_prev(),
        Command::ActivateRow(index) => match keys.activate_item(doc, index) {
            Ok(Some(_)) | Err(SoftKeyError::OverlayNotOpen) => {}
            Ok(None) => app.state.set_warning(format!("No row {}", index + 1)),
            Err(e) => app.state.set_error(e.to_string()),
        },

        // Page mutations
        Command::SetText { node, text } => {
            if let Some(n) = resolve(app, doc, &node) {
                doc.set_text(n, text);
            }
        }
        Command::Remove(node) => {
            if let Some(n) = resolve(app, doc, &node) {
                if !doc.remove(n) {
                    app.state.set_warning(format!("{} is not attached", node));
                }
            }
        }
        Command::SetAccel { node, key } => {
            if let Some(n) = resolve(app, doc, &node) {
                match key {
                    Some(key) => doc.set_attribute(n, ACCESSKEY_ATTR, key),
                    None => doc.remove_attribute(n, ACCESSKEY_ATTR),
                }
            }
        }
        Command::Hide(node) => {
            if let Some(n) = resolve(app, doc, &node) {
                doc.set_hidden(n, true);
            }
        }
        Command::Show(node) => {
            if let Some(n) = resolve(app, doc, &node) {
                doc.set_hidden(n, false);
            }
        }
        Command::Add {
            parent,
            id,
            label,
            key,
        } => {
            if let Some(p) = resolve(app, doc, &parent) {
                let mut spec = NodeSpec::new("button").id(id.as_str()).text(label);
                if let Some(key) = key {
                    spec = spec.accesskey(key);
                }
                let node = doc.append(p, spec);
                app.state.set_message(format!("Added {} as {}", id, node));
            }
        }
        Command::Rescan => match keys.rescan(doc) {
            Ok(()) => {
                let bound = keys.registry().bindings().count();
                app.state.set_success(format!("Rescanned: {} soft keys bound", bound));
            }
            Err(e) => app.state.set_error(e.to_string()),
        },

        // UI
        Command::ToggleHelp => app.state.toggle_help(),
        Command::HelpScrollUp => app.state.help_scroll_up(),
        Command::HelpScrollDown => app.state.help_scroll_down(),
        Command::SetTheme(name) => app.state.set_theme(&name),

        // Mode changes are mirrored from the input handler after dispatch
        Command::EnterCommandMode | Command::EnterNormalMode => {}

        Command::Quit => app.quit(),
        Command::ExecuteCommand(input) => {
            app.state.set_error(format!("Unknown command: {}", input));
        }
    }
}

fn handle_routed(app: &mut App, doc: &mut Document, keys: &mut SoftKeys, routed: Routed) {
    match routed {
        Routed::Ignored | Routed::Activated { .. } => {}
        Routed::Unbound(key) => app.state.set_warning(format!("{} has no binding", key)),
        Routed::MenuOpened { menu, .. } => app.state.set_message(format!("Opened {}", menu)),
        Routed::MenuEmpty { menu, .. } => {
            app.state.set_warning(format!("Menu {} has no items", menu));
        }
        Routed::MenuClosed => app.state.set_message("Menu closed"),
        // The center key picks the highlighted row of an open menu.
        Routed::Swallowed(LogicalKey::Csk) => {
            if let Err(e) = keys.activate_selected(doc) {
                app.state.set_error(e.to_string());
            }
        }
        Routed::Swallowed(_) => {}
    }
}

/// Look up a node reference, reporting unknown ones on the status bar
fn resolve(app: &mut App, doc: &Document, reference: &str) -> Option<NodeId> {
    let node = doc.lookup(reference);
    if node.is_none() {
        app.state.set_error(format!("No node {}", reference));
    }
    node
}

fn render_ui(frame: &mut ratatui::Frame, app: &App, doc: &Document, keys: &SoftKeys) {
    let area = frame.area();
    let theme = &app.state.theme;

    // Clear with background
    let block = ratatui::widgets::Block::default().style(theme.normal());
    frame.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Min(4),    // Phone screen
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    let phone = centered_rect(PHONE_WIDTH, chunks[0].height, chunks[0]);
    let screen = Layout::vertical([
        Constraint::Min(3),    // Page
        Constraint::Length(1), // Soft-key bar
    ])
    .split(phone);

    frame.render_widget(PageWidget::new(doc, theme).title("Messages"), screen[0]);

    let bar = SoftKeyBarWidget::new(keys.renderer().container(), theme);
    match keys.overlay().form() {
        // Appended overlay is layered over the bar
        Some(form) if keys.placement() == MenuPlacement::Append => {
            frame.render_widget(bar, screen[1]);
            let menu_area = OptionsMenuWidget::area(form, phone);
            frame.render_widget(OptionsMenuWidget::new(form, theme), menu_area);
        }
        Some(form) => {
            let menu_area = OptionsMenuWidget::area(form, screen[0]);
            frame.render_widget(OptionsMenuWidget::new(form, theme), menu_area);
            frame.render_widget(bar, screen[1]);
        }
        None => frame.render_widget(bar, screen[1]),
    }

    frame.render_widget(
        StatusBarWidget::new(app.state.mode, &app.state.command_buffer, theme)
            .message(app.state.message.as_deref(), app.state.message_type)
            .menu_open(keys.overlay().is_open()),
        chunks[1],
    );

    if app.state.show_help {
        frame.render_widget(HelpWidget::new(theme).scroll(app.state.help_scroll), chunks[0]);
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
