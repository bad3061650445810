pub mod config_io;
pub mod recovery;
pub mod roster_io;
