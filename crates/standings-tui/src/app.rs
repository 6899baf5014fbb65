// Application state and orchestration logic.
//
// The app task owns the league. The TUI reports committed edits as
// `UserCommand`s; the app applies each as a scoped copy-on-write update and
// pushes the new snapshot back as a `UiUpdate`. Image reads and exports run
// as background tasks that report through the `TaskEvent` channel.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use standings_core::config::Config;
use standings_core::export::{self, ExportError, ExportFormat, ExportGate, Rasterizer};
use standings_core::league::{GroupPatch, LeagueData, LeagueError, LeagueUpdate, TeamPatch};
use standings_core::upload::{ImageRef, ImageSource};

use crate::protocol::{ImageTarget, Notification, TaskEvent, UiUpdate, UserCommand};

/// Shown when an export fails, followed by the error detail.
pub const EXPORT_FAILED_MESSAGE: &str = "Could not export the image. Please try again.";

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    /// Current snapshot. Replaced wholesale on every edit, never mutated.
    pub league: Arc<LeagueData>,
    pub export_gate: ExportGate,
    pub rasterizer: Arc<dyn Rasterizer>,
    pub images: Arc<dyn ImageSource>,
    /// Sender handed to background tasks so they can report completion.
    pub task_tx: mpsc::Sender<TaskEvent>,
}

impl AppState {
    pub fn new(
        config: Config,
        league: LeagueData,
        rasterizer: Arc<dyn Rasterizer>,
        images: Arc<dyn ImageSource>,
        task_tx: mpsc::Sender<TaskEvent>,
    ) -> Self {
        AppState {
            config,
            league: Arc::new(league),
            export_gate: ExportGate::new(),
            rasterizer,
            images,
            task_tx,
        }
    }

    pub fn snapshot(&self) -> Arc<LeagueData> {
        Arc::clone(&self.league)
    }

    pub fn apply_league_update(&mut self, update: LeagueUpdate) {
        debug!("League field update: {:?}", update);
        self.league = Arc::new(self.league.with_field(update));
    }

    pub fn apply_group_update(&mut self, group: usize, patch: &GroupPatch) -> Result<(), LeagueError> {
        self.league = Arc::new(self.league.with_group(group, patch)?);
        debug!("Group {} updated: {:?}", group, patch);
        Ok(())
    }

    pub fn apply_team_update(
        &mut self,
        group: usize,
        team: usize,
        patch: &TeamPatch,
    ) -> Result<(), LeagueError> {
        self.league = Arc::new(self.league.with_team(group, team, patch)?);
        debug!("Team ({}, {}) updated: {:?}", group, team, patch);
        Ok(())
    }

    /// Store an uploaded image in its slot.
    pub fn apply_image(&mut self, target: ImageTarget, image: ImageRef) -> Result<(), LeagueError> {
        match target {
            ImageTarget::TeamLogo { group, team } => {
                self.apply_team_update(group, team, &TeamPatch::logo(Some(image)))
            }
            ImageTarget::FooterLogo => {
                self.apply_league_update(LeagueUpdate::FooterLogo(Some(image)));
                Ok(())
            }
            ImageTarget::FooterLogo2 => {
                self.apply_league_update(LeagueUpdate::FooterLogo2(Some(image)));
                Ok(())
            }
        }
    }

    /// Start an export of the current snapshot.
    ///
    /// Returns `false` without doing anything when an export is already in
    /// flight.
    pub fn start_export(&mut self, format: ExportFormat) -> bool {
        if !self.export_gate.try_begin() {
            debug!("Export to {} ignored: another export is in flight", format);
            return false;
        }
        info!("Exporting sheet as {}", format);

        let snapshot = self.snapshot();
        let rasterizer = Arc::clone(&self.rasterizer);
        let dir = self.config.export_dir.clone();
        let task_tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = export_snapshot(rasterizer, snapshot, format, &dir).await;
            let _ = task_tx.send(TaskEvent::ExportDone { format, result }).await;
        });
        true
    }

    /// Start reading an image file for `target`.
    pub fn start_image_load(&self, target: ImageTarget, path: PathBuf) {
        info!("Loading image {} for {:?}", path.display(), target);
        let images = Arc::clone(&self.images);
        let task_tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = images.load(&path).await;
            let _ = task_tx
                .send(TaskEvent::ImageLoaded {
                    target,
                    path,
                    result,
                })
                .await;
        });
    }
}

/// Rasterize on a blocking worker, then write the file.
async fn export_snapshot(
    rasterizer: Arc<dyn Rasterizer>,
    snapshot: Arc<LeagueData>,
    format: ExportFormat,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let bytes = tokio::task::spawn_blocking(move || rasterizer.rasterize(&snapshot, format))
        .await
        .map_err(|e| ExportError::Worker(e.to_string()))??;
    export::save(dir, format, &bytes, export::timestamp_ms()).await
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens on two channels using `tokio::select!`:
/// 1. User commands from the TUI
/// 2. Completions of background image reads and exports
///
/// Pushes UI updates through `ui_tx` for the TUI render loop. The initial
/// snapshot is sent before the first command is read.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut task_rx: mpsc::Receiver<TaskEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");
    let _ = ui_tx.send(UiUpdate::League(state.snapshot())).await;

    loop {
        tokio::select! {
            // --- User commands ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            // --- Background task completions ---
            // AppState keeps a sender alive, so this channel never closes
            // while the loop runs.
            Some(event) = task_rx.recv() => {
                handle_task_event(&mut state, event, &ui_tx).await;
            }
        }
    }

    Ok(())
}

/// Handle a user command from the TUI.
async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    let changed = match cmd {
        UserCommand::UpdateLeague(update) => {
            state.apply_league_update(update);
            true
        }
        UserCommand::UpdateGroup { group, patch } => {
            report(state.apply_group_update(group, &patch))
        }
        UserCommand::UpdateTeam { group, team, patch } => {
            report(state.apply_team_update(group, team, &patch))
        }
        UserCommand::PickImage { target, path } => {
            state.start_image_load(target, path);
            false
        }
        UserCommand::Export(format) => {
            if state.start_export(format) {
                let _ = ui_tx.send(UiUpdate::ExportStarted(format)).await;
            }
            false
        }
        UserCommand::Quit => {
            // Handled in the main loop
            false
        }
    };

    if changed {
        let _ = ui_tx.send(UiUpdate::League(state.snapshot())).await;
    }
}

/// Handle completion of a background task.
async fn handle_task_event(state: &mut AppState, event: TaskEvent, ui_tx: &mpsc::Sender<UiUpdate>) {
    match event {
        TaskEvent::ImageLoaded {
            target,
            path,
            result,
        } => match result {
            Ok(image) => {
                if report(state.apply_image(target, image)) {
                    info!("Image {} stored for {:?}", path.display(), target);
                    let _ = ui_tx.send(UiUpdate::League(state.snapshot())).await;
                }
            }
            Err(e) => {
                warn!("Image upload for {:?} failed: {}", target, e);
                let _ = ui_tx
                    .send(UiUpdate::Notify(Notification::new(
                        "Image not loaded",
                        e.to_string(),
                    )))
                    .await;
            }
        },
        TaskEvent::ExportDone { format, result } => {
            state.export_gate.finish();
            match result {
                Ok(path) => {
                    info!("{} export written to {}", format, path.display());
                    let _ = ui_tx.send(UiUpdate::ExportSucceeded { path }).await;
                }
                Err(e) => {
                    error!("Export failed: {}", e);
                    let _ = ui_tx
                        .send(UiUpdate::ExportFailed(Notification::new(
                            "Export failed",
                            format!("{EXPORT_FAILED_MESSAGE}\n\n{e}"),
                        )))
                        .await;
                }
            }
        }
    }
}

/// Log a rejected update. Returns whether the update applied.
fn report(result: Result<(), LeagueError>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            warn!("Update rejected: {}", e);
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use standings_core::league::{seed, Stat, StatColumn};
    use standings_core::upload::{FsImageSource, ImageMime};

    struct NullRasterizer;

    impl Rasterizer for NullRasterizer {
        fn rasterize(&self, _: &LeagueData, _: ExportFormat) -> Result<Vec<u8>, ExportError> {
            Ok(vec![1, 2, 3])
        }
    }

    fn create_test_app_state() -> (AppState, mpsc::Receiver<TaskEvent>) {
        let (task_tx, task_rx) = mpsc::channel(16);
        let state = AppState::new(
            Config::default(),
            seed(),
            Arc::new(NullRasterizer),
            Arc::new(FsImageSource),
            task_tx,
        );
        (state, task_rx)
    }

    #[tokio::test]
    async fn team_update_replaces_snapshot_scoped() {
        let (mut state, _rx) = create_test_app_state();
        let before = state.snapshot();
        state
            .apply_team_update(1, 4, &TeamPatch::stat(StatColumn::Won, Stat::new(2)))
            .unwrap();
        let after = state.snapshot();
        assert!(!Arc::ptr_eq(&before, &after));
        assert!(Arc::ptr_eq(&before.groups[0], &after.groups[0]));
        assert_eq!(after.team(1, 4).unwrap().points(), Stat::new(6));
        assert_eq!(before.team(1, 4).unwrap().points(), Stat::ZERO);
    }

    #[tokio::test]
    async fn rejected_update_keeps_snapshot() {
        let (mut state, _rx) = create_test_app_state();
        let before = state.snapshot();
        assert!(state.apply_group_update(7, &GroupPatch::name("x")).is_err());
        assert!(Arc::ptr_eq(&before, &state.snapshot()));
    }

    #[tokio::test]
    async fn apply_image_targets() {
        let (mut state, _rx) = create_test_app_state();
        let logo = ImageRef::from_bytes(ImageMime::Png, b"\x89PNG\r\n\x1a\n");
        state
            .apply_image(ImageTarget::TeamLogo { group: 0, team: 1 }, logo.clone())
            .unwrap();
        state.apply_image(ImageTarget::FooterLogo2, logo.clone()).unwrap();
        let league = state.snapshot();
        assert_eq!(league.team(0, 1).unwrap().logo, Some(logo.clone()));
        assert_eq!(league.footer_logo_2, Some(logo));
        assert!(league.footer_logo.is_none());
    }

    #[tokio::test]
    async fn second_export_is_rejected_while_first_runs() {
        let (mut state, mut task_rx) = create_test_app_state();
        state.config.export_dir = std::env::temp_dir().join("standings_app_gate");
        assert!(state.start_export(ExportFormat::Png));
        assert!(!state.start_export(ExportFormat::Jpeg));

        let event = task_rx.recv().await.unwrap();
        match event {
            TaskEvent::ExportDone { format, result } => {
                assert_eq!(format, ExportFormat::Png);
                let path = result.unwrap();
                assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
            }
            other => panic!("unexpected event {:?}", other),
        }
        let _ = std::fs::remove_dir_all(&state.config.export_dir);
    }

    #[tokio::test]
    async fn event_loop_sends_initial_snapshot_and_quits() {
        let (state, task_rx) = create_test_app_state();
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (ui_tx, mut ui_rx) = mpsc::channel(16);

        let handle = tokio::spawn(run(cmd_rx, task_rx, ui_tx, state));

        match ui_rx.recv().await {
            Some(UiUpdate::League(league)) => assert_eq!(league.title, "KZDFA"),
            other => panic!("expected initial snapshot, got {:?}", other),
        }

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        assert!(handle.await.unwrap().is_ok());
    }

    #[test]
    fn report_flags_errors() {
        assert!(report(Ok(())));
        assert!(!report(Err(LeagueError::GroupOutOfRange { index: 3, len: 2 })));
    }
}
