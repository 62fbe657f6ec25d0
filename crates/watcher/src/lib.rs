#![forbid(unsafe_code)]

mod event;
mod watcher;

pub use event::PurgeEvent;
pub use watcher::TrashWatcher;
