//! Bar-by-bar engine — strategies, recording, and the run driver.
//!
//! Each bar goes through one `Strategy::step`: classify the bar, manage the
//! open position, then arm or consume entries. Every transition is appended to
//! the event log and every bar gets one history snapshot.

pub mod event;
pub mod ladder;
pub mod lifecycle;
pub mod psych_box;
pub mod recorder;
pub mod runner;
pub mod strategy;
pub mod summary;

pub use event::{Event, EventKind};
pub use ladder::{LadderState, LadderStrategy};
pub use psych_box::{BoxState, BoxStrategy, PrevBox};
pub use recorder::{BoxSnapshot, EventLog, LadderSnapshot, LevelSnapshot, Recorder};
pub use runner::{run, RunOutput, Session};
pub use strategy::{Lagged, PrevBar, Strategy};
pub use summary::{ReasonCounts, RunSummary};
