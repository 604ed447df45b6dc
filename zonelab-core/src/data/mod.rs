//! Bar sources. The engine itself never fetches data; callers hand it bars.

pub mod synthetic;

pub use synthetic::{generate, random_walk, WalkParams};
