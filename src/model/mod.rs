pub mod character;
pub mod config;
pub mod document;

pub use character::*;
pub use config::*;
pub use document::*;
