// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! # Courier TUI.
//!
//! A terminal-based messaging inbox.
//!
//! This application coordinates a TUI frontend built with `ratatui` and a
//! background processing layer over a local SQLite message store.
//!
//! It uses an event-driven architecture where:
//!
//! * The **Main Thread** manages the terminal lifecycle, UI rendering, and
//!   the process-wide event bus that every view and service hangs off.
//! * **Background Workers** handle message store access and the simulated
//!   incoming message feed via asynchronous task processing.
//! * **Event Loops** capture user input and system ticks to drive the UI
//!   state.
//!
//! ## Architecture
//!
//! The application follows a strict setup-run-teardown pattern to ensure the
//! terminal state is preserved even in the event of a crash. Communication
//! between the UI and background workers is handled via `std::sync::mpsc`
//! channels; background results come back as bus events dispatched on the
//! main thread.

mod components;
mod config;
mod db;
mod events;
mod feedback;
mod model;
mod render;
mod tasks;
mod theme;
mod util;

use anyhow::{Context, Result};
use crossterm::{
    event::{self},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    cell::{Cell, RefCell},
    io::{self},
    rc::Rc,
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::Duration,
};
use tracing_subscriber::EnvFilter;

use crate::{
    components::{InboxView, SettingsView, StatusBarView},
    config::AppConfig,
    events::{AppEvent, Event, EventKind, EventManager, process_events},
    tasks::AppTask,
    theme::Theme,
};

const LOG_FILE: &str = "courier.log";

/// Which screen owns the main content area and the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Inbox,
    Settings,
}

/// Application state.
struct App {
    pub config: Rc<RefCell<AppConfig>>,

    pub theme: Theme,
    pub screen: Rc<Cell<Screen>>,

    pub bus: Rc<EventManager>,

    pub event_tx: Sender<AppEvent>,
    pub event_rx: Receiver<AppEvent>,

    pub task_tx: Sender<AppTask>,

    pub inbox: InboxView,
    pub settings: SettingsView,
    pub status_bar: StatusBarView,
}

impl App {
    /// Create a new instance of application state.
    pub fn new(config: AppConfig, task_tx: Sender<AppTask>) -> Self {
        let (event_tx, event_rx) = mpsc::channel();

        let inbox = InboxView::new(config.notifications_filter, config.show_previews);
        let status_bar = StatusBarView::new(config.notifications_filter);

        Self {
            config: Rc::new(RefCell::new(config)),
            theme: Theme::default(),
            screen: Rc::new(Cell::new(Screen::Inbox)),
            bus: Rc::new(EventManager::new()),
            event_tx,
            event_rx,
            task_tx,
            inbox,
            settings: SettingsView::new(),
            status_bar,
        }
    }
}

/// The entry point of the application.
///
/// Sets up logging, the communication channels, and the application state,
/// manages the terminal lifecycle, and returns an error if any part of the
/// execution fails.
fn main() -> Result<()> {
    let _log_guard = init_logging()?;

    let config = config::load_config();

    let (task_tx, task_rx) = mpsc::channel();

    let mut app = App::new(config, task_tx);

    let mut terminal = setup_terminal(&app)?;
    let res = run(&mut terminal, &mut app, task_rx);
    restore_terminal(&mut terminal);

    res.context("Application error occurred")
}

/// Initialises file-based logging.
///
/// The TUI owns stdout and stderr while it runs, so log lines go to a file
/// next to the message store instead. The filter honours `RUST_LOG` and
/// defaults to `info`. The returned guard must stay alive for the duration
/// of the program or buffered log lines are lost.
fn init_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let appender = tracing_appender::rolling::never(".", LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}

/// Prepares the terminal for the TUI application.
///
/// This function performs the following side effects:
/// * Sets the terminal background color based on the provided theme.
/// * Enables raw mode to capture all keyboard input.
/// * Switches the terminal to the alternate screen buffer.
///
/// # Errors
///
/// Returns an error if raw mode cannot be enabled or if the alternate screen
/// cannot be entered.
fn setup_terminal(app: &App) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    // Set the background of the entire terminal window, without this we'd get
    // a thin black outline
    util::term::set_terminal_bg(&theme::Theme::to_hex(app.theme.background_colour));

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// This reverses the changes made by [`setup_terminal`], including disabling
/// raw mode, leaving the alternate screen, and resetting the background color.
/// It also ensures the cursor is made visible again.
///
/// This function is designed to be "best-effort" and does not return a result,
/// as it is typically called during cleanup or panic handling.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    util::term::reset_terminal_bg();
    terminal.show_cursor().ok();
}

/// Attaches every standing listener and starts the background workers, then
/// enters the main event loop.
///
/// This function spawns several long-running background threads:
/// * A task worker that owns the message store connection.
/// * An input thread to poll for system keyboard events.
/// * A tick thread to trigger periodic UI refreshes.
/// * A feed thread simulating incoming messages, when enabled.
///
/// After spawning the workers, it hands control to [`process_events`] to
/// manage the UI and state updates.
///
/// # Errors
///
/// Returns an error if the event processing loop encounters an unrecoverable
/// application error.
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    task_rx: Receiver<AppTask>,
) -> Result<()> {
    // Everything that reacts to events registers before anything can
    // publish, so the first refresh already has its audience.
    wire_navigation(app);
    wire_config_persistence(app);
    app.inbox.mount(&app.bus);
    app.status_bar.mount(&app.bus);
    feedback::mount(&app.bus, app.config.borrow().sound_enabled);

    // Spawn a background worker to process application tasks asynchronously.
    tasks::spawn_task_worker(task_rx, app.event_tx.clone());

    // Spawn a thread to translate raw key events to application events.
    let tx_keys = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            if let Ok(event::Event::Key(key)) = event::read() {
                tx_keys.send(AppEvent::Key(key)).ok();
            }
        }
    });

    // Spawn a thread to send a periodic tick application event, this is
    // effectively the minimum "frame rate" for rendering the TUI application.
    let tx_tick = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            let _ = tx_tick.send(AppEvent::Tick);
            thread::sleep(Duration::from_millis(250));
        }
    });

    // Spawn the simulated incoming message feed.
    let feed_interval = app.config.borrow().feed_interval_secs;
    if feed_interval > 0 {
        let tx_feed = app.task_tx.clone();
        thread::spawn(move || {
            loop {
                thread::sleep(Duration::from_secs(feed_interval));
                if tx_feed.send(AppTask::IngestIncomingMessage).is_err() {
                    break;
                }
            }
        });
    }

    // Initial trigger to populate the inbox from the message store.
    app.task_tx.send(AppTask::RefreshConversations)?;

    process_events(terminal, app)
}

/// Connects screen navigation to the bus.
///
/// Opening the settings screen mounts it so it only listens while visible;
/// closing it unmounts it again. Both happen inside the dispatch pass that
/// delivers the event.
fn wire_navigation(app: &App) {
    let screen = Rc::clone(&app.screen);
    let settings = app.settings.clone();
    let config = Rc::clone(&app.config);
    let bus = Rc::downgrade(&app.bus);
    let _ = app
        .bus
        .add_listener(EventKind::OpenMessagesSettings, move |_| {
            if let Some(bus) = bus.upgrade() {
                settings.mount(&bus, &config.borrow());
                screen.set(Screen::Settings);
            }
            Ok(())
        });

    let screen = Rc::clone(&app.screen);
    let settings = app.settings.clone();
    let bus = Rc::downgrade(&app.bus);
    let _ = app
        .bus
        .add_listener(EventKind::CloseMessagesSettings, move |_| {
            if let Some(bus) = bus.upgrade() {
                settings.unmount(&bus);
                screen.set(Screen::Inbox);
            }
            Ok(())
        });
}

/// Persists preference changes as they are published.
///
/// These listeners are the only place the configuration file is written. A
/// failed write surfaces through the bus error containment and leaves the
/// running state untouched.
fn wire_config_persistence(app: &App) {
    let config = Rc::clone(&app.config);
    let _ = app
        .bus
        .add_listener(EventKind::NotificationsFilterChanged, move |event| {
            if let Event::NotificationsFilterChanged(filter) = event {
                let mut config = config.borrow_mut();
                config.notifications_filter = *filter;
                config::save_config(&config).context("Failed to persist notifications filter")?;
            }
            Ok(())
        });

    let config = Rc::clone(&app.config);
    let _ = app
        .bus
        .add_listener(EventKind::PreviewsVisibilityChanged, move |event| {
            if let Event::PreviewsVisibilityChanged(visible) = event {
                let mut config = config.borrow_mut();
                config.show_previews = *visible;
                config::save_config(&config).context("Failed to persist preview visibility")?;
            }
            Ok(())
        });

    let config = Rc::clone(&app.config);
    let _ = app
        .bus
        .add_listener(EventKind::SoundEnabledChanged, move |event| {
            if let Event::SoundEnabledChanged(enabled) = event {
                let mut config = config.borrow_mut();
                config.sound_enabled = *enabled;
                config::save_config(&config).context("Failed to persist sound preference")?;
            }
            Ok(())
        });
}
