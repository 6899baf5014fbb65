// TUI editor: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding the latest league snapshot plus one
// `EditableField` per text or number cell. The app orchestrator pushes
// `UiUpdate` messages over an mpsc channel; the TUI applies them to
// `ViewState` and re-renders on a fixed tick.

pub mod focus;
pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use standings_core::config::Config;
use standings_core::export::ExportFormat;
use standings_core::field::EditableField;
use standings_core::league::LeagueData;
use standings_core::upload::FilePicker;

use crate::protocol::{ImageTarget, Notification, UiUpdate, UserCommand};

use focus::FieldId;
use layout::build_layout;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// An open logo picker and the slot it will fill.
#[derive(Debug, Clone)]
pub struct OpenPicker {
    pub target: ImageTarget,
    pub picker: FilePicker,
}

/// TUI-local state that mirrors the application state for rendering.
pub struct ViewState {
    /// Latest snapshot from the app. `None` until the first one arrives.
    pub league: Option<Arc<LeagueData>>,
    /// Edit state of every text and number cell.
    pub fields: BTreeMap<FieldId, EditableField>,
    pub focus: FieldId,
    pub picker: Option<OpenPicker>,
    /// Blocking message; all input goes to it until dismissed.
    pub notification: Option<Notification>,
    /// Format of the export in flight, if any.
    pub exporting: Option<ExportFormat>,
    /// One-line status shown in the status bar (e.g. the last export path).
    pub status_message: Option<String>,
    pub confirm_quit: bool,
    /// Directory the logo picker lists.
    pub image_dir: PathBuf,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            league: None,
            fields: BTreeMap::new(),
            focus: FieldId::Title,
            picker: None,
            notification: None,
            exporting: None,
            status_message: None,
            confirm_quit: false,
            image_dir: PathBuf::from("."),
        }
    }
}

impl ViewState {
    pub fn new(image_dir: PathBuf) -> Self {
        ViewState {
            image_dir,
            ..Default::default()
        }
    }

    /// Take a new snapshot. Every field resynchronizes with it; a field in
    /// the middle of an edit keeps its draft.
    pub fn apply_league(&mut self, league: Arc<LeagueData>) {
        let order = focus::focus_order(&league);
        let mut fields = BTreeMap::new();
        for id in &order {
            let Some(value) = id.value(&league) else {
                continue;
            };
            let field = match self.fields.remove(id) {
                Some(mut field) => {
                    field.sync(&value);
                    field
                }
                None => EditableField::new(value),
            };
            fields.insert(*id, field);
        }
        self.fields = fields;

        if !order.contains(&self.focus) {
            self.focus = order.first().copied().unwrap_or(FieldId::Title);
        }
        self.league = Some(league);
    }

    pub fn field(&self, id: FieldId) -> Option<&EditableField> {
        self.fields.get(&id)
    }

    /// Whether the focused field is being edited.
    pub fn is_editing(&self) -> bool {
        self.field(self.focus).is_some_and(EditableField::is_editing)
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::League(league) => {
            state.apply_league(league);
        }
        UiUpdate::ExportStarted(format) => {
            state.exporting = Some(format);
            state.status_message = Some(format!("Exporting {}...", format));
        }
        UiUpdate::ExportSucceeded { path } => {
            state.exporting = None;
            state.status_message = Some(format!("Saved {}", path.display()));
        }
        UiUpdate::ExportFailed(notification) => {
            state.exporting = None;
            state.status_message = None;
            state.notification = Some(notification);
        }
        UiUpdate::Notify(notification) => {
            state.notification = Some(notification);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete editor frame, overlays last.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let group_count = state.league.as_ref().map_or(0, |l| l.groups.len());
    let layout = build_layout(frame.area(), group_count);

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::header::render(frame, layout.header, state);
    for (g, area) in layout.groups.iter().enumerate() {
        widgets::standings::render(frame, *area, state, g);
    }
    widgets::footer::render(frame, layout.footer, state);
    widgets::help_bar::render(frame, layout.help_bar, state);

    if let Some(open) = &state.picker {
        widgets::picker::render(frame, frame.area(), open);
    }
    if let Some(notification) = &state.notification {
        widgets::notification::render(frame, frame.area(), notification);
    }
    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area(), state.exporting);
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    config: &Config,
) -> anyhow::Result<()> {
    // 1. Initialize terminal
    let mut terminal = ratatui::init();

    // 2. Restore the terminal before the default hook prints the panic.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    // 3. Create ViewState
    let mut view_state = ViewState::new(config.image_dir.clone());

    // 4. Create crossterm EventStream for async keyboard input
    let mut event_stream = EventStream::new();

    // 5. Create render interval
    let mut render_tick = tokio::time::interval(Duration::from_millis(config.tick_ms));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    // 6. Main loop
    loop {
        tokio::select! {
            // UI updates from the app orchestrator
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => {
                        apply_ui_update(&mut view_state, ui_update);
                    }
                    None => {
                        // Channel closed: app is shutting down
                        break;
                    }
                }
            }

            // Keyboard input
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            debug!("Sending command: {:?}", cmd);
                            let quit = cmd == UserCommand::Quit;
                            if cmd_tx.send(cmd).await.is_err() || quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {
                        // Mouse events, resize events, etc. -- redrawn on the next tick
                    }
                    Some(Err(e)) => {
                        warn!("Terminal input error: {}", e);
                        break;
                    }
                    None => {
                        // Stream ended
                        break;
                    }
                }
            }

            // Render tick
            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    // 7. Restore terminal
    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use standings_core::field::{FieldKey, FieldValue};
    use standings_core::league::{seed, Stat, StatColumn, TeamPatch};

    fn seeded_state() -> ViewState {
        let mut state = ViewState::default();
        state.apply_league(Arc::new(seed()));
        state
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn view_state_default_is_sensible() {
        let state = ViewState::default();
        assert!(state.league.is_none());
        assert!(state.fields.is_empty());
        assert_eq!(state.focus, FieldId::Title);
        assert!(state.picker.is_none());
        assert!(state.notification.is_none());
        assert!(state.exporting.is_none());
        assert!(!state.confirm_quit);
        assert!(!state.is_editing());
    }

    #[test]
    fn apply_league_creates_fields() {
        let state = seeded_state();
        // Every non-image cell: 4 header, 2 group names, 10 teams * 7, footer text.
        assert_eq!(state.fields.len(), 4 + 2 + 10 * 7 + 1);
        assert_eq!(
            state.field(FieldId::Title).unwrap().committed(),
            &FieldValue::from("KZDFA")
        );
        assert!(state.field(FieldId::FooterLogo).is_none());
    }

    #[test]
    fn apply_league_keeps_draft_while_editing() {
        let mut state = seeded_state();
        let field = state.fields.get_mut(&FieldId::Title).unwrap();
        field.activate();
        field.handle_key(FieldKey::Char('X'));

        let league = seed().with_field(standings_core::league::LeagueUpdate::Title("NEW".into()));
        state.apply_league(Arc::new(league));

        let field = state.field(FieldId::Title).unwrap();
        assert!(field.is_editing());
        assert_eq!(field.draft(), "X");
        assert_eq!(field.committed(), &FieldValue::from("NEW"));
    }

    #[test]
    fn apply_league_resyncs_idle_fields() {
        let mut state = seeded_state();
        let league = seed()
            .with_team(0, 0, &TeamPatch::stat(StatColumn::Won, Stat::new(4)))
            .unwrap();
        state.apply_league(Arc::new(league));
        let id = FieldId::TeamStat(0, 0, StatColumn::Won);
        assert_eq!(state.field(id).unwrap().text(), "4");
    }

    #[test]
    fn export_updates_track_state() {
        let mut state = seeded_state();
        apply_ui_update(&mut state, UiUpdate::ExportStarted(ExportFormat::Jpeg));
        assert_eq!(state.exporting, Some(ExportFormat::Jpeg));

        apply_ui_update(
            &mut state,
            UiUpdate::ExportSucceeded {
                path: PathBuf::from("/tmp/league-standings-1.jpeg"),
            },
        );
        assert!(state.exporting.is_none());
        assert_eq!(
            state.status_message.as_deref(),
            Some("Saved /tmp/league-standings-1.jpeg")
        );
    }

    #[test]
    fn export_failure_raises_notification() {
        let mut state = seeded_state();
        apply_ui_update(&mut state, UiUpdate::ExportStarted(ExportFormat::Png));
        apply_ui_update(
            &mut state,
            UiUpdate::ExportFailed(Notification::new("Export failed", "disk full")),
        );
        assert!(state.exporting.is_none());
        assert_eq!(state.notification.as_ref().unwrap().message, "disk full");
    }

    #[test]
    fn render_frame_shows_seed() {
        let state = seeded_state();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| render_frame(frame, &state)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("KZDFA"));
        assert!(text.contains("GROUP A"));
        assert!(text.contains("FC Darngawn"));
        assert!(text.contains("PTS"));
    }

    #[test]
    fn render_frame_before_first_snapshot() {
        let state = ViewState::default();
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render_frame(frame, &state)).unwrap();
    }

    #[test]
    fn render_frame_with_notification() {
        let mut state = seeded_state();
        state.notification = Some(Notification::new("Image not loaded", "bad file"));
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render_frame(frame, &state)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Image not loaded"));
        assert!(text.contains("bad file"));
    }
}
