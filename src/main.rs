use color_eyre::Result;
use ipcompass::{
    api::LocationProvider,
    app::App,
    config::Config,
    events::{Event, EventHandler},
    logging, ui,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, time::Duration};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Instrumentation and safety
    let _log_guard = logging::initialize_logging();
    install_panic_hook();
    color_eyre::install()?;

    let config = Config::load();
    let provider = LocationProvider::new(
        config.api.base_url.as_str(),
        Duration::from_secs(config.api.timeout_seconds),
    );

    // Ready terminal and state
    let mut terminal = setup_terminal()?;
    let mut app = App::new(config);
    let mut events = EventHandler::new(150);

    // Own-location fetch; failing it just means no "you" marker.
    let startup_tx = events.tx.clone();
    let startup_provider = provider.clone();
    tokio::spawn(async move {
        let record = match startup_provider.my_location().await {
            Ok(record) => {
                info!("Resolved own location: {} ({})", record.ip, record.city);
                Some(record)
            }
            Err(e) => {
                error!("Own-location fetch failed, continuing without it: {}", e);
                None
            }
        };
        let _ = startup_tx.send(Event::MyLocation(record));
    });

    // Main loop
    while !app.should_quit {
        terminal.draw(|f| ui::render(f, &app))?;

        if let Some(event) = events.next().await {
            match event {
                Event::Tick => app.on_tick(),
                Event::Input(key) => app.handle_key(key),
                Event::MyLocation(record) => app.apply_my_location(record),
                Event::LookupResult { ip, result } => {
                    match &result {
                        Ok(record) => {
                            info!("Lookup {} resolved to {}, {}", ip, record.city, record.country);
                        }
                        Err(e) => error!("Lookup {} failed: {}", ip, e),
                    }
                    app.apply_lookup(result);
                }
            }
        }

        // Each submission from the input bar becomes one spawned request.
        if let Some(ip) = app.take_pending_lookup() {
            info!("Looking up {}", ip);
            let tx = events.tx.clone();
            let provider = provider.clone();
            tokio::spawn(async move {
                let result = provider.lookup(&ip).await;
                let _ = tx.send(Event::LookupResult { ip, result });
            });
        }
    }

    restore_terminal(terminal)?;
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(
        stdout,
        crossterm::terminal::EnterAlternateScreen,
        crossterm::cursor::Hide
    )?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::cursor::Show
    )?;
    Ok(())
}

fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Force terminal cleanup!
        crossterm::terminal::disable_raw_mode().ok();
        crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::cursor::Show
        )
        .ok();
        original_hook(panic_info);
    }));
}
