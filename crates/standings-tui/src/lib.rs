// Terminal editor for a league standings sheet.
//
// `app` owns the league and runs background work, `tui` renders it and turns
// key presses into commands. The two halves talk over the channels described
// in `protocol`.

pub mod app;
pub mod protocol;
pub mod tui;
