use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::format_projection;
use crate::io::roster_io::{DATA_FILE, LoadOutcome};
use crate::model::{ServerFilter, WindowPosition};
use crate::ops::roster_ops::RosterError;
use crate::ops::validate::CharacterForm;
use crate::store::RosterStore;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let path = roster_path(cli.file.as_deref());

    match cli.command {
        None => crate::tui::run(Some(path.as_path())),
        Some(cmd) => match cmd {
            Commands::List(args) => cmd_list(&path, args),
            Commands::Add(args) => cmd_add(&path, args),
            Commands::Select(args) => cmd_select(&path, args),
            Commands::Fav(args) => cmd_fav(&path, args),
            Commands::Delete(args) => cmd_delete(&path, args),
            Commands::Window(args) => cmd_window(&path, args),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn roster_path(file: Option<&Path>) -> PathBuf {
    file.map_or_else(|| PathBuf::from(DATA_FILE), Path::to_path_buf)
}

/// Open the roster, warning on stderr when the file was reset or unreadable
fn open_store(path: &Path) -> RosterStore {
    let (store, outcome) = RosterStore::open(path);
    match outcome {
        LoadOutcome::ReplacedCorrupt => eprintln!(
            "warning: {} was unreadable and has been reset (old content is in the recovery log)",
            path.display()
        ),
        LoadOutcome::Unreadable => eprintln!(
            "warning: could not read {}; changes will not be saved",
            path.display()
        ),
        LoadOutcome::Loaded | LoadOutcome::CreatedDefault => {}
    }
    store
}

/// Id of the first character with this exact name
fn id_by_name(store: &RosterStore, name: &str) -> Result<String, RosterError> {
    store
        .find_by_name(name)
        .map(|c| c.id.clone())
        .ok_or_else(|| RosterError::NotFound(name.to_string()))
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(path: &Path, args: ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(path);
    let filter = match args.server.as_deref() {
        Some(s) => ServerFilter::parse_filter(s).ok_or_else(|| {
            format!("unknown server \"{}\" (expected All, Blue, Green or Red)", s)
        })?,
        None => store.filter(),
    };
    let projection = store.visible_groups(filter);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&projection)?);
    } else {
        for line in format_projection(&projection) {
            println!("{}", line);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(path: &Path, args: AddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(path);
    let form = CharacterForm {
        name: args.name,
        level: args.level,
        server: args.server,
        class: args.class,
        username: args.username,
        password: args.password,
        note: args.note,
    };
    let id = store.add(&form)?;
    if let Some(c) = store.get(&id) {
        println!("added {} ({})", c.long_label(), id);
    }
    Ok(())
}

fn cmd_select(path: &Path, args: NameArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(path);
    let id = id_by_name(&store, &args.name)?;
    store.select(&id)?;
    println!("selected {}", args.name);
    Ok(())
}

fn cmd_fav(path: &Path, args: NameArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(path);
    let id = id_by_name(&store, &args.name)?;
    if store.toggle_favorite(&id)? {
        println!("{} added to favorites", args.name);
    } else {
        println!("{} removed from favorites", args.name);
    }
    Ok(())
}

fn cmd_delete(path: &Path, args: DeleteArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(path);
    let id = id_by_name(&store, &args.name)?;
    if !args.yes {
        return Err(format!("refusing to delete {} without --yes", args.name).into());
    }
    let removed = store.delete(&id)?;
    println!("deleted {}", removed.name);
    Ok(())
}

/// Flags given update the stored values; the result is printed either way
fn cmd_window(path: &Path, args: WindowArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(path);
    let current = store.document().window_position;
    let position = WindowPosition {
        x: args.x.unwrap_or(current.x),
        y: args.y.unwrap_or(current.y),
        width: args.width.unwrap_or(current.width),
        height: args.height.unwrap_or(current.height),
    };
    if position != current {
        store.set_window_position(position)?;
    }
    if let Some(alpha) = args.alpha {
        store.set_alpha(alpha)?;
    }

    let doc = store.document();
    let pos = doc.window_position;
    println!(
        "position {},{}  size {}x{}  alpha {}",
        pos.x, pos.y, pos.width, pos.height, doc.alpha
    );
    Ok(())
}
