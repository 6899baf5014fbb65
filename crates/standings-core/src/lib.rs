// Library root for the standings sheet core: data model, editing state
// machines, image intake, export and configuration. Nothing in here touches
// the terminal; the `standings` crate drives it.

pub mod config;
pub mod export;
pub mod field;
pub mod league;
pub mod upload;
