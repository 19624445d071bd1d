//! Dataset toolkit for the fire detection workflow.
//!
//! It reads the dataset description file shared with the detection framework,
//! resolves a split into concrete image files and maintains the dataset
//! directory itself.

mod common;
pub mod autosplit;
pub mod config;
pub mod inspect;
pub mod resolve;
pub mod sample;
pub mod setup;

pub use autosplit::*;
pub use config::*;
pub use inspect::*;
pub use resolve::*;
pub use sample::*;
pub use setup::*;
