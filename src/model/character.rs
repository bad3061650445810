use std::fmt;

use serde::{Deserialize, Serialize};

/// Game server a character lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Server {
    Blue,
    Green,
    Red,
}

impl Server {
    pub const ALL: [Server; 3] = [Server::Blue, Server::Green, Server::Red];

    pub fn label(self) -> &'static str {
        match self {
            Server::Blue => "Blue",
            Server::Green => "Green",
            Server::Red => "Red",
        }
    }

    /// Parse a server name (case-insensitive)
    pub fn parse_server(s: &str) -> Option<Self> {
        Server::ALL
            .into_iter()
            .find(|server| server.label().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The server filter shown at the top of the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ServerFilter {
    #[default]
    All,
    Blue,
    Green,
    Red,
}

impl ServerFilter {
    pub const ALL: [ServerFilter; 4] = [
        ServerFilter::All,
        ServerFilter::Blue,
        ServerFilter::Green,
        ServerFilter::Red,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ServerFilter::All => "All",
            ServerFilter::Blue => "Blue",
            ServerFilter::Green => "Green",
            ServerFilter::Red => "Red",
        }
    }

    pub fn parse_filter(s: &str) -> Option<Self> {
        ServerFilter::ALL
            .into_iter()
            .find(|filter| filter.label().eq_ignore_ascii_case(s.trim()))
    }

    /// Whether a character on `server` passes this filter
    pub fn matches(self, server: Server) -> bool {
        match self {
            ServerFilter::All => true,
            ServerFilter::Blue => server == Server::Blue,
            ServerFilter::Green => server == Server::Green,
            ServerFilter::Red => server == Server::Red,
        }
    }

    /// Next filter in display order, wrapping around
    pub fn next(self) -> Self {
        let idx = ServerFilter::ALL.iter().position(|f| *f == self).unwrap_or(0);
        ServerFilter::ALL[(idx + 1) % ServerFilter::ALL.len()]
    }
}

impl From<Server> for ServerFilter {
    fn from(server: Server) -> Self {
        match server {
            Server::Blue => ServerFilter::Blue,
            Server::Green => ServerFilter::Green,
            Server::Red => ServerFilter::Red,
        }
    }
}

impl fmt::Display for ServerFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The fixed set of character classes, in canonical display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CharacterClass {
    Bard,
    Cleric,
    Druid,
    Enchanter,
    Magician,
    Monk,
    Necromancer,
    Paladin,
    Ranger,
    Rogue,
    #[serde(rename = "Shadow Knight")]
    ShadowKnight,
    Shaman,
    Warrior,
    Wizard,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 14] = [
        CharacterClass::Bard,
        CharacterClass::Cleric,
        CharacterClass::Druid,
        CharacterClass::Enchanter,
        CharacterClass::Magician,
        CharacterClass::Monk,
        CharacterClass::Necromancer,
        CharacterClass::Paladin,
        CharacterClass::Ranger,
        CharacterClass::Rogue,
        CharacterClass::ShadowKnight,
        CharacterClass::Shaman,
        CharacterClass::Warrior,
        CharacterClass::Wizard,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CharacterClass::Bard => "Bard",
            CharacterClass::Cleric => "Cleric",
            CharacterClass::Druid => "Druid",
            CharacterClass::Enchanter => "Enchanter",
            CharacterClass::Magician => "Magician",
            CharacterClass::Monk => "Monk",
            CharacterClass::Necromancer => "Necromancer",
            CharacterClass::Paladin => "Paladin",
            CharacterClass::Ranger => "Ranger",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::ShadowKnight => "Shadow Knight",
            CharacterClass::Shaman => "Shaman",
            CharacterClass::Warrior => "Warrior",
            CharacterClass::Wizard => "Wizard",
        }
    }

    /// Parse a class name (case-insensitive, `Shadow Knight` needs its space)
    pub fn parse_class(s: &str) -> Option<Self> {
        CharacterClass::ALL
            .into_iter()
            .find(|class| class.label().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A stored character with its login credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Stable identifier like `C-004`. Empty when read from a file that
    /// predates ids; one is assigned on load.
    #[serde(default)]
    pub id: String,
    /// Display name (not unique)
    pub name: String,
    pub level: i64,
    pub server: Server,
    pub class: CharacterClass,
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Character {
    /// `Name (Lvl 50)`, the label used inside a class group
    pub fn short_label(&self) -> String {
        format!("{} (Lvl {})", self.name, self.level)
    }

    /// `Name - Class (Lvl 50)`, the label used in Recent and Favorites
    pub fn long_label(&self) -> String {
        format!("{} - {} (Lvl {})", self.name, self.class, self.level)
    }
}
