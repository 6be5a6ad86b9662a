//! Configuration loaded from the environment (and `.env`) at startup.

pub mod settings;

pub use settings::*;
