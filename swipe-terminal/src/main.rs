use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    fs::File,
    io,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use swipe_core::catalog::fetch_with_retry;
use swipe_core::wallet::{
    FileStore, IdentityProvider, KeyValueStore, KeypairIdentity, NetworkClient, SolBalanceSource,
    StoredIdentity,
};
use swipe_core::Session;
use swipe_terminal::app::{App, AppEvent, Command};
use swipe_terminal::config::{load_config, Args};
use swipe_terminal::ui::{card_width, ui};

const IDLE_POLL: Duration = Duration::from_millis(100);
const FRAME_POLL: Duration = Duration::from_millis(16);

fn init_logging(path: &str) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create log file {}", path))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn build_session(config: &Args, width: u16) -> Result<Session> {
    let session_config = config
        .session_config()
        .context("failed to load configuration")?;
    info!("starting swipe on {}", session_config.network);
    let store: Arc<dyn KeyValueStore> = Arc::new(
        FileStore::open(&config.store_path)
            .with_context(|| format!("failed to open wallet store {}", config.store_path))?,
    );
    let identity: Arc<dyn IdentityProvider> = match &config.keypair_path {
        Some(path) => Arc::new(KeypairIdentity::new(path)),
        None => Arc::new(StoredIdentity::new(store.clone())),
    };
    Ok(Session::new(
        session_config,
        identity,
        store,
        f64::from(card_width(width)),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config();
    init_logging(&config.log_file)?;

    // Channel for async events
    let (tx, mut rx) = mpsc::channel(100);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = match build_session(&config, terminal.size()?.width) {
        Ok(session) => {
            let network_client = NetworkClient::new(&session.config().rpc_url);
            let mut app = App::new(session, config.keypair_path.is_some());
            run_app(&mut terminal, &mut app, tx, &mut rx, network_client).await
        }
        Err(e) => Err(e),
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("{:?}", err);
        println!("{:?}", err)
    }

    Ok(())
}

/// Starts the async work behind `command`; its result comes back over `tx`.
fn spawn_command(
    command: Command,
    app: &App,
    tx: &mpsc::Sender<AppEvent>,
    network_client: &NetworkClient,
) {
    match command {
        Command::FetchTokens(ticket) => {
            let source = app.session.catalog_source();
            let query = app.session.token_query();
            let retries = app.session.fetch_retries();
            let backoff = app.session.initial_backoff();
            let tx_tokens = tx.clone();
            tokio::spawn(async move {
                let result = fetch_with_retry(source.as_ref(), &query, retries, backoff).await;
                let _ = tx_tokens
                    .send(AppEvent::TokensFetched(ticket, result))
                    .await;
            });
        }
        Command::FetchSolBalance(pubkey) => {
            let nc = network_client.clone();
            let tx_balance = tx.clone();
            tokio::spawn(async move {
                let result = nc.fetch_sol_balance(&pubkey).await;
                let _ = tx_balance.send(AppEvent::SolBalance(result)).await;
            });
        }
    }
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tx: mpsc::Sender<AppEvent>,
    rx: &mut mpsc::Receiver<AppEvent>,
    network_client: NetworkClient,
) -> Result<()> {
    for command in app.start() {
        spawn_command(command, app, &tx, &network_client);
    }

    let mut last_tick = Instant::now();
    loop {
        app.resize(card_width(terminal.size()?.width));
        terminal.draw(|f| ui(f, app))?;

        // Check for async events
        while let Ok(event) = rx.try_recv() {
            app.on_event(event);
        }

        let timeout = if app.is_animating() {
            FRAME_POLL
        } else {
            IDLE_POLL
        };
        if crossterm::event::poll(timeout)? {
            let command = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => {
                    app.handle_mouse(mouse);
                    None
                }
                _ => None,
            };
            if let Some(command) = command {
                spawn_command(command, app, &tx, &network_client);
            }
        }

        let now = Instant::now();
        app.tick(now - last_tick);
        last_tick = now;

        if app.should_quit {
            info!("quitting");
            return Ok(());
        }
    }
}
