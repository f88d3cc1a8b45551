use concept_canvas::{actions, app, config, event, export, logging, source, ui};

use anyhow::{Context, Result};
use app::AppState;
use clap::Parser;
use config::{load_config, CliArgs};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use logging::LogTarget;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{error, info};

fn main() -> Result<()> {
    // Parse command line arguments
    let args = CliArgs::parse();

    // Load configuration
    let config = load_config(&args)?;

    if args.debug_config {
        println!("Configuration:");
        println!("{:#?}", config);
        return Ok(());
    }

    let headless = args.export_svg.is_some() || args.export_json.is_some();
    let target = if headless {
        LogTarget::Stderr
    } else {
        LogTarget::FileOnly
    };
    logging::init_logging(&config, target)?;

    let mut app = AppState::new(config);

    if let Some(ref filename) = args.filename {
        let forest = source::load_file(filename)
            .with_context(|| format!("loading {}", filename.display()))?;
        app.load_forest(forest)?;
        app.filename = Some(filename.clone());
        info!(file = %filename.display(), nodes = app.canvas.forest().len(), "forest loaded");
    }

    if headless {
        if let Some(ref path) = args.export_svg {
            export::save_svg(&app.canvas, path)?;
            println!("Wrote {}", path.display());
        }
        if let Some(ref path) = args.export_json {
            export::save_snapshot(&app.canvas, path)?;
            println!("Wrote {}", path.display());
        }
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    terminal.clear()?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("main loop failed: {err:#}");
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
) -> Result<()> {
    while app.running {
        terminal.draw(|frame| ui::render(frame, app))?;

        if let Some(action) = event::handle_events(app)? {
            actions::execute_action(action, app)?;
        }
    }

    Ok(())
}
