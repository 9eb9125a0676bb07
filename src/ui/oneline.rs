use std::io::{self, Write};

use crossterm::{
    cursor::MoveToColumn,
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use tokio::time::{MissedTickBehavior, interval};

use crate::{
    config::{IDLE_PAUSE, POLL_INTERVAL},
    error::PlayerError,
    types::PlaybackSnapshot,
    ui::{PlaybackSource, poller::NOTHING_PLAYING},
};

const PLAYING_ICON: &str = "▶";
const PAUSED_ICON: &str = "⏸";
const IDLE_ICON: &str = "■";

/// Gap between the end and the start of a scrolling status.
pub const SEPARATOR: &str = "   ";

/// Rotating window over a status string.
///
/// Each call to [`Marquee::frame`] shows `width` characters starting at the
/// current offset and then advances the offset by one, wrapping at the text
/// length. Text that already fits, or a width of zero, is returned unchanged.
///
/// `width` covers the rotating text only. [`scrolling_line`] keeps the status
/// icon and a space fixed in front of the window, so a scrolling line takes
/// `width + 2` columns and the icon never scrolls out of view.
#[derive(Debug, Clone)]
pub struct Marquee {
    width: usize,
    offset: usize,
}

impl Marquee {
    pub fn new(width: usize) -> Self {
        Self { width, offset: 0 }
    }

    pub fn frame(&mut self, text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        if self.width == 0 || chars.len() <= self.width {
            self.offset = 0;
            return text.to_string();
        }

        let start = self.offset % chars.len();
        let window = chars[start..]
            .iter()
            .copied()
            .chain(SEPARATOR.chars())
            .chain(chars[..start].iter().copied())
            .take(self.width)
            .collect();

        self.offset = (start + 1) % chars.len();
        window
    }
}

pub fn status_icon(snapshot: &PlaybackSnapshot) -> &'static str {
    match (&snapshot.item, snapshot.is_playing) {
        (None, _) => IDLE_ICON,
        (Some(_), true) => PLAYING_ICON,
        (Some(_), false) => PAUSED_ICON,
    }
}

/// Status text without the icon: `<title> - <first artist>[ | <progress>]`.
pub fn status_text(snapshot: &PlaybackSnapshot, show_progress: bool) -> String {
    let Some(item) = &snapshot.item else {
        return NOTHING_PLAYING.to_string();
    };

    let mut text = match item.artists.first() {
        Some(artist) => format!("{} - {}", item.name, artist),
        None => item.name.clone(),
    };
    if show_progress {
        if let Some(progress) = snapshot.progress() {
            text = format!("{} | {}", text, progress);
        }
    }
    text
}

pub fn format_line(snapshot: &PlaybackSnapshot, show_progress: bool) -> String {
    format!(
        "{} {}",
        status_icon(snapshot),
        status_text(snapshot, show_progress)
    )
}

/// Next frame of a scrolling status line: fixed icon, then the marquee window.
pub fn scrolling_line(
    snapshot: &PlaybackSnapshot,
    marquee: &mut Marquee,
    show_progress: bool,
) -> String {
    let text = status_text(snapshot, show_progress);
    format!("{} {}", status_icon(snapshot), marquee.frame(&text))
}

#[derive(Debug, Clone, Copy)]
pub struct OneLineOptions {
    pub show_progress: bool,
    /// Marquee width; `0` prints once and exits.
    pub scroll: usize,
}

/// Prints the playback status on a single line.
///
/// Without a scroll width the status is fetched and printed once. With a
/// scroll width the line is rewritten in place every poll tick. In both modes
/// observing that nothing is playing prints the indicator, pauses briefly and
/// returns.
pub async fn run<S: PlaybackSource>(source: &S, options: OneLineOptions) -> Result<(), PlayerError> {
    if options.scroll == 0 {
        let snapshot = source.fetch().await?;
        println!("{}", format_line(&snapshot, options.show_progress));
        if snapshot.item.is_none() {
            tokio::time::sleep(IDLE_PAUSE).await;
        }
        return Ok(());
    }

    let mut marquee = Marquee::new(options.scroll);
    let mut ticker = interval(POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut stdout = io::stdout();

    loop {
        ticker.tick().await;
        let snapshot = source.fetch().await?;
        let line = scrolling_line(&snapshot, &mut marquee, options.show_progress);

        queue!(
            stdout,
            MoveToColumn(0),
            Clear(ClearType::UntilNewLine),
            Print(line)
        )?;
        stdout.flush()?;

        if snapshot.item.is_none() {
            tracing::info!("Nothing playing, leaving one-line display");
            tokio::time::sleep(IDLE_PAUSE).await;
            println!();
            return Ok(());
        }
    }
}
