// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};

mod app;
mod config;
mod data;
mod events;
mod poll;
mod provider;
mod state;
mod ui;

use app::{App, Category};
use config::Settings;
use data::{check_alerts, default_rules};
use poll::PollingScheduler;
use provider::{SnapshotProvider, SystemProvider};
use state::ViewStateStore;

#[derive(Parser, Debug)]
#[command(name = "sysdock")]
#[command(about = "Terminal dashboard for local system resources")]
struct Args {
    /// Path to a TOML config file (default: sysdock.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Snapshot poll interval in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Network interface poll interval in milliseconds
    #[arg(long)]
    net_interval_ms: Option<u64>,

    /// CPU usage percentage that triggers the CPU alert
    #[arg(long)]
    cpu_warn: Option<f64>,

    /// Memory percentage that triggers the memory alert
    #[arg(long)]
    mem_warn: Option<f64>,

    /// Per-disk percentage that triggers the disk alert
    #[arg(long)]
    disk_warn: Option<f64>,

    /// Where to store persisted view state
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Start on this category without changing the stored default
    /// (cpu, memory, gpu, disks, network)
    #[arg(long)]
    category: Option<Category>,

    /// Evaluate alert thresholds once, print firing alerts, and exit
    /// (exit code 1 if any alert fires)
    #[arg(long)]
    check: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(ms) = args.interval_ms {
        settings.snapshot_interval_ms = ms;
    }
    if let Some(ms) = args.net_interval_ms {
        settings.network_interval_ms = ms;
    }
    if let Some(t) = args.cpu_warn {
        settings.cpu_threshold = t;
    }
    if let Some(t) = args.mem_warn {
        settings.memory_threshold = t;
    }
    if let Some(t) = args.disk_warn {
        settings.disk_threshold = t;
    }
    if let Some(path) = args.state_file {
        settings.state_file = path;
    }

    if args.check {
        return run_check(&settings);
    }

    run_tui(&settings, args.category)
}

/// One-shot alert evaluation for scripts and cron jobs. Shares the
/// rule set with the dashboard's alert engine.
fn run_check(settings: &Settings) -> Result<()> {
    let mut provider = SystemProvider::new(Default::default());
    let snapshot = provider.fetch_snapshot()?;
    let alerts = check_alerts(&snapshot, settings.thresholds());

    if alerts.is_empty() {
        println!("ok: no alerts");
        return Ok(());
    }
    for message in &alerts {
        println!("alert: {}", message);
    }
    std::process::exit(1);
}

/// Run the interactive dashboard.
fn run_tui(settings: &Settings, requested: Option<Category>) -> Result<()> {
    let view_state = ViewStateStore::load(&settings.state_file);
    let initial = view_state.startup_category(requested);

    let provider = Box::new(SystemProvider::new(view_state.gpu_tick()));
    let scheduler =
        PollingScheduler::new(settings.intervals(), default_rules(settings.thresholds()));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let mut app = App::new(provider, scheduler, view_state, initial);
    app.poll_now(Instant::now());

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered =
                    ratatui::layout::Rect::new(0, area.height.saturating_sub(4) / 2, area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            match app.category() {
                Category::Network => ui::network::render(frame, app, chunks[2]),
                _ => ui::meters::render(frame, app, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            if app.show_notifications {
                ui::notifications::render(frame, app, area);
            }

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Drive due polls
        app.tick(Instant::now());
    }

    Ok(())
}
