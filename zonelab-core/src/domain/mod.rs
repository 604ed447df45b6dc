//! Domain types for ZoneLab

pub mod bar;
pub mod position;
pub mod trade;
pub mod zone;

pub use bar::{Bar, BarError};
pub use position::{Bracket, Position, Side};
pub use trade::{CloseReason, ClosedPosition};
pub use zone::{EntryZone, PsychBox};
