use std::{
    io::{self, Stdout},
    sync::Arc,
    time::Duration,
};

use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};
use tokio::{
    sync::mpsc,
    time::{Instant, MissedTickBehavior, interval, timeout},
};

use crate::{
    config::{IDLE_PAUSE, POLL_INTERVAL},
    error::PlayerError,
    types::PlaybackSnapshot,
    ui::{DisplayState, PlaybackSource},
};

pub const PANEL_WIDTH: u16 = 50;
pub const PANEL_HEIGHT: u16 = 10;
const HEADER: &str = "spotcli";

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Rectangle of at most `width` x `height` centered inside `area`.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn transport_line(is_playing: bool) -> &'static str {
    if is_playing {
        "|<| (||) |>|"
    } else {
        "|<| (|>) |>|"
    }
}

pub fn is_quit_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Runs the full-screen player until a quit key is pressed.
///
/// The terminal is restored on every exit path that returns.
pub async fn run<S: PlaybackSource>(
    source: Arc<S>,
    fetch_timeout: Duration,
) -> Result<(), PlayerError> {
    let mut terminal = init()?;
    let outcome = event_loop(&mut terminal, source, fetch_timeout).await;
    exit(terminal)?;
    outcome
}

async fn event_loop<S: PlaybackSource>(
    terminal: &mut Tui,
    source: Arc<S>,
    fetch_timeout: Duration,
) -> Result<(), PlayerError> {
    let (width, height) = terminal::size()?;
    let mut state = DisplayState::default();
    state.resize(width, height);

    let (fetch_tx, mut fetch_rx) = mpsc::unbounded_channel();
    let mut event_stream = EventStream::new();
    let mut ticker = interval(POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut in_flight = false;
    let mut idle_until: Option<Instant> = None;

    tracing::info!("Entering full-screen player loop");

    loop {
        terminal.draw(|f| render(f, &state))?;

        tokio::select! {
            _ = ticker.tick() => {
                let idle = idle_until.is_some_and(|until| Instant::now() < until);
                if !in_flight && !idle {
                    idle_until = None;
                    in_flight = true;
                    spawn_fetch(Arc::clone(&source), fetch_timeout, fetch_tx.clone());
                }
            }
            Some(event) = event_stream.next() => {
                match event? {
                    Event::Key(key) if key.kind == KeyEventKind::Press && is_quit_key(&key) => {
                        tracing::info!("Quit requested");
                        break;
                    }
                    Event::Resize(width, height) => state.resize(width, height),
                    _ => {}
                }
            }
            Some(fetched) = fetch_rx.recv() => {
                in_flight = false;
                match fetched {
                    Ok(snapshot) => {
                        if !state.apply(&snapshot) {
                            idle_until = Some(Instant::now() + IDLE_PAUSE);
                        }
                    }
                    Err(PlayerError::Timeout) => {
                        tracing::warn!(timeout = ?fetch_timeout, "Playback fetch timed out");
                    }
                    Err(e) => return Err(e),
                }
            }
        }
    }

    Ok(())
}

fn spawn_fetch<S: PlaybackSource>(
    source: Arc<S>,
    fetch_timeout: Duration,
    tx: mpsc::UnboundedSender<Result<PlaybackSnapshot, PlayerError>>,
) {
    tokio::spawn(async move {
        let fetched = timeout(fetch_timeout, source.fetch())
            .await
            .unwrap_or(Err(PlayerError::Timeout));
        let _ = tx.send(fetched);
    });
}

fn render(frame: &mut Frame, state: &DisplayState) {
    let area = Rect::new(0, 0, state.width, state.height).intersection(frame.area());
    let outer = centered_rect(PANEL_WIDTH, PANEL_HEIGHT + 1, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(outer);

    let header = Paragraph::new(HEADER).style(
        Style::default()
            .fg(Color::LightGreen)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(header, chunks[0]);

    let lines = vec![
        Line::from(state.title.as_str()),
        Line::default(),
        Line::from(state.artists.as_str()),
        Line::default(),
        Line::from(state.album.as_str()),
        Line::default(),
        Line::from(transport_line(state.is_playing)),
        Line::from(state.progress.as_str()),
    ];
    let panel = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );
    frame.render_widget(panel, chunks[1]);
}

fn init() -> Result<Tui, io::Error> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn exit(mut terminal: Tui) -> Result<(), io::Error> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
