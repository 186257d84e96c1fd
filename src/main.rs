use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use sparkx_monitor::config::{Settings, ThemeChoice};
use sparkx_monitor::ui::{self, Theme};
use sparkx_monitor::{events, logging, App, DataSource, FileSource, HttpSource};
use sparkx_types::RobotStatus;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sparkx")]
#[command(about = "Terminal dashboard for monitoring a SparkX robot fleet")]
struct Args {
    /// JSON file of robot rows to watch
    #[arg(short, long, conflicts_with = "url")]
    file: Option<PathBuf>,

    /// Base URL of the fleet REST backend (e.g. http://localhost:3001)
    #[arg(short, long)]
    url: Option<String>,

    /// Settings file (defaults to ./sparkx.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only show robots with this status
    #[arg(long)]
    status: Option<String>,

    #[arg(long)]
    country: Option<String>,

    #[arg(long)]
    region: Option<String>,

    #[arg(long)]
    location: Option<String>,

    /// Dashboard refresh interval in milliseconds
    #[arg(short, long)]
    refresh_ms: Option<u64>,

    #[arg(long, value_enum)]
    theme: Option<ThemeChoice>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Export a fleet report to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

impl Args {
    /// Command-line flags win over every other settings layer.
    fn apply(&self, settings: &mut Settings) {
        if let Some(file) = &self.file {
            settings.source.file = file.clone();
            settings.source.url = None;
        }
        if let Some(url) = &self.url {
            settings.source.url = Some(url.clone());
        }
        if let Some(status) = &self.status {
            settings.filter.status = Some(RobotStatus::parse(&status.to_ascii_lowercase()));
        }
        if let Some(country) = &self.country {
            settings.filter.country = Some(country.clone());
        }
        if let Some(region) = &self.region {
            settings.filter.region = Some(region.clone());
        }
        if let Some(location) = &self.location {
            settings.filter.location = Some(location.clone());
        }
        if let Some(refresh_ms) = self.refresh_ms {
            settings.source.refresh_ms = refresh_ms;
        }
        if let Some(theme) = self.theme {
            settings.theme = theme;
        }
        if let Some(log_file) = &self.log_file {
            settings.logging.file = Some(log_file.clone());
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    args.apply(&mut settings);
    logging::init(&settings.logging, args.export.is_none())?;

    // The HTTP source polls on this runtime while the UI loop owns the main thread.
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let source: Box<dyn DataSource> = match settings.http_source() {
        Some(http) => Box::new(HttpSource::spawn(http)?),
        None => Box::new(FileSource::new(&settings.source.file)),
    };
    info!(source = source.description(), "starting");

    let app = App::new(source, settings.thresholds).with_filter(settings.filter.clone());

    if let Some(export_path) = args.export {
        let timeout = Duration::from_secs(settings.source.timeout_secs.max(1) + 1);
        return export_to_file(app, &export_path, timeout);
    }

    let app = app.with_theme(Theme::from_choice(settings.theme));
    run_tui(app, settings.source.refresh_interval())
}

/// Wait for the first snapshot, write its report, and exit.
fn export_to_file(mut app: App, export_path: &Path, timeout: Duration) -> Result<()> {
    let started = Instant::now();
    while !app.reload_data() {
        if let Some(err) = &app.load_error {
            bail!("{}: {}", app.source_description(), err);
        }
        if started.elapsed() >= timeout {
            bail!("no data from {} within {:?}", app.source_description(), timeout);
        }
        std::thread::sleep(Duration::from_millis(50));
    }

    app.export_report(export_path)?;
    println!("Exported fleet report to: {}", export_path.display());
    Ok(())
}

/// Run the TUI until the user quits.
fn run_tui(mut app: App, refresh_interval: Duration) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Restore the terminal before the panic message is printed
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    app.reload_data();
    let result = run_app(&mut terminal, &mut app, refresh_interval);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

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
                let centered = ratatui::layout::Rect::new(
                    0,
                    (area.height / 2).saturating_sub(2),
                    area.width,
                    5.min(area.height),
                );
                frame.render_widget(paragraph, centered);
                return;
            }

            ui::draw(frame, app);
        })?;

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                // Content starts after header (1) + tabs (1) + table border (1) + table header (1)
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse, 3),
                _ => {}
            }
        }

        if last_refresh.elapsed() >= refresh_interval {
            app.reload_data();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}
