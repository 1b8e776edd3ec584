//! User settings and their `config.json` storage

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
