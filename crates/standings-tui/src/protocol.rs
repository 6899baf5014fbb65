// Messages between the TUI, the app orchestrator and background tasks.

use std::path::PathBuf;
use std::sync::Arc;

use standings_core::export::{ExportError, ExportFormat};
use standings_core::league::{GroupPatch, LeagueData, LeagueUpdate, TeamPatch};
use standings_core::upload::{ImageRef, UploadError};

/// Which image slot an upload is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageTarget {
    TeamLogo { group: usize, team: usize },
    FooterLogo,
    FooterLogo2,
}

/// Commands sent from the TUI to the app orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    UpdateLeague(LeagueUpdate),
    UpdateGroup {
        group: usize,
        patch: GroupPatch,
    },
    UpdateTeam {
        group: usize,
        team: usize,
        patch: TeamPatch,
    },
    /// A file was chosen in the picker for `target`.
    PickImage {
        target: ImageTarget,
        path: PathBuf,
    },
    Export(ExportFormat),
    Quit,
}

/// A message the user has to acknowledge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Notification {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Updates pushed from the app orchestrator to the TUI.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    /// The current league snapshot.
    League(Arc<LeagueData>),
    ExportStarted(ExportFormat),
    ExportSucceeded { path: PathBuf },
    ExportFailed(Notification),
    /// Blocking notice unrelated to export (e.g. an unreadable logo).
    Notify(Notification),
}

/// Completions of background work, fed back into the app loop.
#[derive(Debug)]
pub enum TaskEvent {
    ImageLoaded {
        target: ImageTarget,
        path: PathBuf,
        result: Result<ImageRef, UploadError>,
    },
    ExportDone {
        format: ExportFormat,
        result: Result<PathBuf, ExportError>,
    },
}
