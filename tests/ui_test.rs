use std::future::Future;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use reqwest::StatusCode;
use spotcli::error::PlayerError;
use spotcli::types::{CurrentlyPlayingResponse, PlaybackItem, PlaybackSnapshot};
use spotcli::ui::fullscreen::{PANEL_WIDTH, centered_rect, is_quit_key, transport_line};
use spotcli::ui::oneline::{
    self, Marquee, OneLineOptions, format_line, scrolling_line, status_icon, status_text,
};
use spotcli::ui::{DisplayState, NOTHING_PLAYING, PlaybackSource};

fn create_test_snapshot(is_playing: bool) -> PlaybackSnapshot {
    PlaybackSnapshot {
        item: Some(PlaybackItem {
            name: "Get Lucky".to_string(),
            artists: vec!["Daft Punk".to_string(), "Pharrell Williams".to_string()],
            album: "Random Access Memories".to_string(),
            duration_ms: 243_000,
        }),
        progress_ms: 125_000,
        is_playing,
        shuffle_state: false,
    }
}

struct StaticSource(Result<PlaybackSnapshot, StatusCode>);

impl PlaybackSource for StaticSource {
    fn fetch(&self) -> impl Future<Output = Result<PlaybackSnapshot, PlayerError>> + Send {
        let result = self.0.clone().map_err(|status| PlayerError::Api {
            status,
            message: "Player command failed: No active device found".to_string(),
        });
        async move { result }
    }
}

#[test]
fn test_marquee_rotates_one_character_per_tick() {
    let mut marquee = Marquee::new(5);

    assert_eq!(marquee.frame("ABCDEFGHIJ"), "ABCDE");
    assert_eq!(marquee.frame("ABCDEFGHIJ"), "BCDEF");
    assert_eq!(marquee.frame("ABCDEFGHIJ"), "CDEFG");
}

#[test]
fn test_marquee_wraps_with_separator() {
    let mut marquee = Marquee::new(5);
    let frames: Vec<String> = (0..11).map(|_| marquee.frame("ABCDEFGHIJ")).collect();

    assert_eq!(frames[8], "IJ   ");
    assert_eq!(frames[9], "J   A");
    // Back at the start after traversing the full string
    assert_eq!(frames[10], "ABCDE");
    assert!(frames.iter().all(|f| f.chars().count() == 5));
}

#[test]
fn test_marquee_static_when_text_fits() {
    let mut marquee = Marquee::new(20);
    let first = marquee.frame("short text");
    let second = marquee.frame("short text");

    assert_eq!(first, "short text");
    assert_eq!(first, second);

    // Exactly the width does not scroll either
    let mut marquee = Marquee::new(5);
    assert_eq!(marquee.frame("ABCDE"), "ABCDE");
    assert_eq!(marquee.frame("ABCDE"), "ABCDE");
}

#[test]
fn test_marquee_zero_width_is_static() {
    let mut marquee = Marquee::new(0);

    for _ in 0..3 {
        assert_eq!(marquee.frame("ABCDEFGHIJ"), "ABCDEFGHIJ");
    }
}

#[test]
fn test_marquee_counts_characters_not_bytes() {
    let mut marquee = Marquee::new(3);

    assert_eq!(marquee.frame("Björk"), "Bjö");
    assert_eq!(marquee.frame("Björk"), "jör");
}

#[test]
fn test_scrolling_line_keeps_icon_in_front_of_window() {
    let snapshot = create_test_snapshot(true);
    let icon = status_icon(&snapshot);
    let mut marquee = Marquee::new(10);

    let first = scrolling_line(&snapshot, &mut marquee, true);
    let second = scrolling_line(&snapshot, &mut marquee, true);

    // Icon and space stay fixed, the window holds exactly the scroll width
    assert_eq!(first, format!("{} Get Lucky ", icon));
    assert_eq!(second, format!("{} et Lucky -", icon));
    assert_eq!(first.chars().count(), 10 + 2);
    assert_eq!(second.chars().count(), 10 + 2);
}

#[test]
fn test_format_line_with_progress() {
    let line = format_line(&create_test_snapshot(true), true);

    assert!(line.ends_with("Get Lucky - Daft Punk | 02:05 / 04:03"));
}

#[test]
fn test_format_line_without_progress() {
    let text = status_text(&create_test_snapshot(true), false);

    // Only the first artist is shown
    assert_eq!(text, "Get Lucky - Daft Punk");
}

#[test]
fn test_format_line_icon_reflects_playback() {
    let playing = format_line(&create_test_snapshot(true), false);
    let paused = format_line(&create_test_snapshot(false), false);

    assert_ne!(playing, paused);
    assert!(paused.ends_with("Get Lucky - Daft Punk"));
}

#[test]
fn test_format_line_nothing_playing() {
    let snapshot = PlaybackSnapshot::default();

    assert_eq!(status_text(&snapshot, true), NOTHING_PLAYING);
    assert!(format_line(&snapshot, true).ends_with("No Song Playing"));
}

#[test]
fn test_snapshot_from_api_response() {
    let body = r#"{
        "is_playing": true,
        "shuffle_state": true,
        "progress_ms": 125000,
        "item": {
            "name": "Get Lucky",
            "duration_ms": 243000,
            "artists": [{"name": "Daft Punk"}, {"name": "Pharrell Williams"}],
            "album": {"name": "Random Access Memories"}
        }
    }"#;
    let res: CurrentlyPlayingResponse = serde_json::from_str(body).unwrap();
    let snapshot = PlaybackSnapshot::from(res);

    let mut expected = create_test_snapshot(true);
    expected.shuffle_state = true;
    assert_eq!(snapshot, expected);
    assert_eq!(snapshot.progress().as_deref(), Some("02:05 / 04:03"));
}

#[test]
fn test_snapshot_without_item() {
    let res: CurrentlyPlayingResponse =
        serde_json::from_str(r#"{"is_playing": false, "item": null}"#).unwrap();
    let snapshot = PlaybackSnapshot::from(res);

    assert!(snapshot.item.is_none());
    assert_eq!(snapshot.progress(), None);
}

#[test]
fn test_display_state_apply() {
    let mut state = DisplayState::default();
    state.resize(120, 40);

    assert!(state.apply(&create_test_snapshot(false)));
    assert_eq!(state.title, "Get Lucky");
    assert_eq!(state.artists, "Daft Punk, Pharrell Williams");
    assert_eq!(state.album, "Random Access Memories");
    assert_eq!(state.progress, "02:05 / 04:03");
    assert!(!state.is_playing);
}

#[test]
fn test_display_state_nothing_playing_keeps_size() {
    let mut state = DisplayState::default();
    state.resize(120, 40);
    state.apply(&create_test_snapshot(true));

    assert!(!state.apply(&PlaybackSnapshot::default()));
    assert_eq!(state.title, NOTHING_PLAYING);
    assert_eq!(state.artists, "");
    assert_eq!((state.width, state.height), (120, 40));
}

#[test]
fn test_centered_rect() {
    let area = Rect::new(0, 0, 100, 40);
    let rect = centered_rect(PANEL_WIDTH, 11, area);

    assert_eq!(rect, Rect::new(25, 14, 50, 11));
}

#[test]
fn test_centered_rect_clamps_to_small_terminal() {
    let area = Rect::new(0, 0, 30, 5);
    let rect = centered_rect(PANEL_WIDTH, 11, area);

    assert_eq!(rect, area);
}

#[test]
fn test_transport_line() {
    assert_eq!(transport_line(true), "|<| (||) |>|");
    assert_eq!(transport_line(false), "|<| (|>) |>|");
}

#[test]
fn test_quit_keys() {
    let key = |code, modifiers| KeyEvent::new(code, modifiers);

    assert!(is_quit_key(&key(KeyCode::Char('q'), KeyModifiers::NONE)));
    assert!(is_quit_key(&key(KeyCode::Esc, KeyModifiers::NONE)));
    assert!(is_quit_key(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    assert!(!is_quit_key(&key(KeyCode::Char('c'), KeyModifiers::NONE)));
    assert!(!is_quit_key(&key(KeyCode::Char('p'), KeyModifiers::NONE)));
}

#[tokio::test]
async fn test_oneline_single_shot() {
    let source = StaticSource(Ok(create_test_snapshot(true)));
    let options = OneLineOptions {
        show_progress: true,
        scroll: 0,
    };

    assert!(oneline::run(&source, options).await.is_ok());
}

#[tokio::test]
async fn test_oneline_surfaces_api_error() {
    let source = StaticSource(Err(StatusCode::NOT_FOUND));
    let options = OneLineOptions {
        show_progress: true,
        scroll: 0,
    };

    match oneline::run(&source, options).await {
        Err(PlayerError::Api { status, message }) => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert!(message.contains("No active device"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}
