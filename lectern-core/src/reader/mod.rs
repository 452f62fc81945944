//! Reading session: position, page turns, bookmarks and autoplay

mod autoplay;
mod bookmarks;
mod controller;
mod position;
mod view;

pub use autoplay::{clamp_speed, AutoPlay, DEFAULT_SPEED, MAX_SPEED, MIN_SPEED};
pub use bookmarks::{Bookmark, BookmarkStore};
pub use controller::{Reader, ReaderOptions, TurnOutcome};
pub use position::{Direction, Pagination, Position, Step, VerseTarget};
pub use view::{PageView, VerseLine, VerseView};
