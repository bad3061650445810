use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "roster",
    about = concat!("roster v", env!("CARGO_PKG_VERSION"), " - character logins at a glance"),
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Roster file to use (default: act.txt in the current directory)
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List characters grouped by class
    List(ListArgs),
    /// Add a character
    Add(AddArgs),
    /// Mark a character as selected (moves it to the top of Recent)
    Select(NameArgs),
    /// Toggle a character's favorite flag
    Fav(NameArgs),
    /// Permanently delete a character
    Delete(DeleteArgs),
    /// Show or set the saved window geometry and opacity
    Window(WindowArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Only show one server (All, Blue, Green, Red); defaults to the saved filter
    #[arg(long)]
    pub server: Option<String>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub level: String,
    /// Blue, Green or Red
    #[arg(long)]
    pub server: String,
    #[arg(long)]
    pub class: String,
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub password: String,
    #[arg(long, default_value = "")]
    pub note: String,
}

#[derive(Args)]
pub struct NameArgs {
    /// Character name (exact match)
    pub name: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Character name (exact match)
    pub name: String,
    /// Confirm the deletion
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct WindowArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub x: Option<i32>,
    #[arg(long, allow_negative_numbers = true)]
    pub y: Option<i32>,
    #[arg(long)]
    pub width: Option<u32>,
    #[arg(long)]
    pub height: Option<u32>,
    /// Opacity, clamped to 0.1..=1.0
    #[arg(long)]
    pub alpha: Option<f64>,
}
