use pretty_assertions::assert_eq;
use std::fs;

use roster::io::roster_io::{read_document, to_json, write_document};
use roster::model::{CharacterClass, RosterDocument, ServerFilter, WindowPosition};
use roster::ops::validate::CharacterForm;
use roster::store::RosterStore;

fn form(name: &str, level: &str, server: &str, class: &str) -> CharacterForm {
    CharacterForm {
        name: name.into(),
        level: level.into(),
        server: server.into(),
        class: class.into(),
        username: format!("{}_acct", name.to_lowercase()),
        password: "pw".into(),
        note: String::new(),
    }
}

/// A roster that touches every persisted field
fn populated(dir: &std::path::Path) -> RosterStore {
    let (mut store, _) = RosterStore::open(&dir.join("act.txt"));
    let zeb = store.add(&form("Zeb", "50", "Blue", "Wizard")).unwrap();
    let amy = store.add(&form("Amy", "12", "Red", "Shadow Knight")).unwrap();
    let mut note = form("Bo", "3", "Green", "Bard");
    note.note = "bank alt".into();
    let bo = store.add(&note).unwrap();

    for id in [&zeb, &amy, &bo, &zeb] {
        store.select(id).unwrap();
    }
    store.toggle_favorite(&amy).unwrap();
    store.toggle_class_expansion(CharacterClass::Rogue).unwrap();
    store.set_server_filter(ServerFilter::Green, None).unwrap();
    store
        .set_window_position(WindowPosition {
            x: 40,
            y: 80,
            ..WindowPosition::default()
        })
        .unwrap();
    store.set_alpha(0.75).unwrap();
    store
}

#[test]
fn saved_roster_loads_back_equal() {
    let tmp = tempfile::TempDir::new().unwrap();
    let store = populated(tmp.path());

    let loaded = read_document(store.path()).unwrap();
    assert_eq!(&loaded, store.document());
    assert_eq!(loaded.recent, vec!["C-002", "C-003", "C-001"]);
    assert_eq!(loaded.favorites, vec!["C-002"]);
    assert!(!loaded.is_expanded(CharacterClass::Rogue));
    assert_eq!(loaded.last_server, ServerFilter::Green);

    // Selection is session state and does not survive a reopen
    let (reopened, _) = RosterStore::open(store.path());
    assert_eq!(reopened.document(), store.document());
    assert!(reopened.selected().is_none());
}

#[test]
fn rewrite_is_byte_identical() {
    let tmp = tempfile::TempDir::new().unwrap();
    let store = populated(tmp.path());

    let on_disk = fs::read_to_string(store.path()).unwrap();
    let doc = read_document(store.path()).unwrap();
    assert_eq!(to_json(&doc).unwrap(), on_disk);

    let copy = tmp.path().join("copy.txt");
    write_document(&copy, &doc).unwrap();
    assert_eq!(fs::read_to_string(&copy).unwrap(), on_disk);
}

#[test]
fn legacy_file_is_upgraded_on_save() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("act.txt");
    fs::write(
        &path,
        r#"{
  "accounts": [
    {"name": "Zeb", "level": 50, "server": "Blue", "class": "Wizard",
     "username": "zeb_acct", "password": "pw", "note": ""},
    {"name": "Amy", "level": 12, "server": "Red", "class": "Rogue",
     "username": "amy_acct", "password": "pw"}
  ],
  "recent": ["Zeb", "Amy"],
  "favorites": ["Amy"],
  "last_server": "Red"
}
"#,
    )
    .unwrap();

    let (store, _) = RosterStore::open(&path);
    store.save().unwrap();
    let upgraded = read_document(&path).unwrap();

    let ids: Vec<&str> = upgraded.accounts.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["C-001", "C-002"]);
    assert_eq!(upgraded.recent, vec!["C-001", "C-002"]);
    assert_eq!(upgraded.favorites, vec!["C-002"]);
    assert_eq!(upgraded.accounts[0].note, None);
    assert_eq!(upgraded.last_server, ServerFilter::Red);
    assert_eq!(
        upgraded.expanded_classes,
        RosterDocument::default().expanded_classes
    );
}
