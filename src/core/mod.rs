//! Core data types for AlphaPanel.

pub mod error;
pub mod panel;
pub mod parse;

pub use error::{AlphaError, Result};
pub use panel::Panel;
