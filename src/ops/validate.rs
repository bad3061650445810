use std::fmt;

use crate::model::{Character, CharacterClass, Server};

/// A required or constrained input field of the character form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Level,
    Server,
    Class,
    Username,
    Password,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Level => "level",
            Field::Server => "server",
            Field::Class => "class",
            Field::Username => "username",
            Field::Password => "password",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One problem with one field
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("{0} is required")]
    Missing(Field),
    #[error("level must be a whole number of at least 1 (got \"{0}\")")]
    InvalidLevel(String),
    #[error("unknown server \"{0}\" (expected Blue, Green or Red)")]
    InvalidServer(String),
    #[error("unknown class \"{0}\"")]
    InvalidClass(String),
}

impl FieldError {
    pub fn field(&self) -> Field {
        match self {
            FieldError::Missing(field) => *field,
            FieldError::InvalidLevel(_) => Field::Level,
            FieldError::InvalidServer(_) => Field::Server,
            FieldError::InvalidClass(_) => Field::Class,
        }
    }
}

/// Rejected form input. Lists every offending field, in form order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_errors(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Whether any error concerns `field`
    pub fn has(&self, field: Field) -> bool {
        self.errors.iter().any(|e| e.field() == field)
    }

    /// First message for `field`, if any
    pub fn message_for(&self, field: Field) -> Option<String> {
        self.errors
            .iter()
            .find(|e| e.field() == field)
            .map(|e| e.to_string())
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Raw text input for Add/Edit, exactly as typed or chosen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterForm {
    pub name: String,
    pub level: String,
    pub server: String,
    pub class: String,
    pub username: String,
    pub password: String,
    pub note: String,
}

impl CharacterForm {
    /// Prefill a form from an existing character (for Edit)
    pub fn from_character(c: &Character) -> Self {
        CharacterForm {
            name: c.name.clone(),
            level: c.level.to_string(),
            server: c.server.label().to_string(),
            class: c.class.label().to_string(),
            username: c.username.clone(),
            password: c.password.clone(),
            note: c.note.clone().unwrap_or_default(),
        }
    }
}

/// Form input that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCharacter {
    pub name: String,
    pub level: i64,
    pub server: Server,
    pub class: CharacterClass,
    pub username: String,
    pub password: String,
    pub note: Option<String>,
}

/// Check a form. Values are trimmed; a blank value counts as missing.
pub fn validate(form: &CharacterForm) -> Result<ValidCharacter, ValidationError> {
    let mut errors = Vec::new();

    let name = required(&form.name, Field::Name, &mut errors);

    let level = match form.level.trim() {
        "" => {
            errors.push(FieldError::Missing(Field::Level));
            None
        }
        raw => match raw.parse::<i64>() {
            Ok(n) if n >= 1 => Some(n),
            _ => {
                errors.push(FieldError::InvalidLevel(raw.to_string()));
                None
            }
        },
    };

    let server = match form.server.trim() {
        "" => {
            errors.push(FieldError::Missing(Field::Server));
            None
        }
        raw => {
            let parsed = Server::parse_server(raw);
            if parsed.is_none() {
                errors.push(FieldError::InvalidServer(raw.to_string()));
            }
            parsed
        }
    };

    let class = match form.class.trim() {
        "" => {
            errors.push(FieldError::Missing(Field::Class));
            None
        }
        raw => {
            let parsed = CharacterClass::parse_class(raw);
            if parsed.is_none() {
                errors.push(FieldError::InvalidClass(raw.to_string()));
            }
            parsed
        }
    };

    let username = required(&form.username, Field::Username, &mut errors);
    let password = required(&form.password, Field::Password, &mut errors);

    let note = Some(form.note.trim().to_string()).filter(|n| !n.is_empty());

    match (name, level, server, class, username, password) {
        (Some(name), Some(level), Some(server), Some(class), Some(username), Some(password))
            if errors.is_empty() =>
        {
            Ok(ValidCharacter {
                name,
                level,
                server,
                class,
                username,
                password,
                note,
            })
        }
        _ => Err(ValidationError { errors }),
    }
}

fn required(value: &str, field: Field, errors: &mut Vec<FieldError>) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::Missing(field));
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zeb() -> CharacterForm {
        CharacterForm {
            name: "Zeb".into(),
            level: "50".into(),
            server: "Blue".into(),
            class: "Wizard".into(),
            username: "u1".into(),
            password: "p1".into(),
            note: String::new(),
        }
    }

    #[test]
    fn valid_form_passes() {
        let valid = validate(&zeb()).unwrap();
        assert_eq!(valid.name, "Zeb");
        assert_eq!(valid.level, 50);
        assert_eq!(valid.server, Server::Blue);
        assert_eq!(valid.class, CharacterClass::Wizard);
        assert_eq!(valid.note, None);
    }

    #[test]
    fn values_are_trimmed() {
        let mut form = zeb();
        form.name = "  Zeb ".into();
        form.note = " camp at docks ".into();
        let valid = validate(&form).unwrap();
        assert_eq!(valid.name, "Zeb");
        assert_eq!(valid.note.as_deref(), Some("camp at docks"));
    }

    #[test]
    fn each_required_field_is_checked() {
        let cases: [(fn(&mut CharacterForm), Field); 6] = [
            (|f| f.name.clear(), Field::Name),
            (|f| f.level.clear(), Field::Level),
            (|f| f.server.clear(), Field::Server),
            (|f| f.class.clear(), Field::Class),
            (|f| f.username.clear(), Field::Username),
            (|f| f.password = "   ".into(), Field::Password),
        ];
        for (clear, field) in cases {
            let mut form = zeb();
            clear(&mut form);
            let err = validate(&form).unwrap_err();
            assert_eq!(err.errors, vec![FieldError::Missing(field)], "field {}", field);
        }
    }

    #[test]
    fn non_numeric_level_is_level_specific() {
        let mut form = zeb();
        form.level = "nine".into();
        let err = validate(&form).unwrap_err();
        assert_eq!(err.errors, vec![FieldError::InvalidLevel("nine".into())]);
        assert!(err.has(Field::Level));
        assert!(!err.has(Field::Name));
    }

    #[test]
    fn level_below_one_is_rejected() {
        let mut form = zeb();
        form.level = "0".into();
        assert!(validate(&form).unwrap_err().has(Field::Level));
        form.level = "-3".into();
        assert!(validate(&form).unwrap_err().has(Field::Level));
    }

    #[test]
    fn bad_choices_are_reported() {
        let mut form = zeb();
        form.server = "Purple".into();
        form.class = "Berserker".into();
        let err = validate(&form).unwrap_err();
        assert_eq!(
            err.errors,
            vec![
                FieldError::InvalidServer("Purple".into()),
                FieldError::InvalidClass("Berserker".into()),
            ]
        );
    }

    #[test]
    fn all_problems_are_collected() {
        let err = validate(&CharacterForm::default()).unwrap_err();
        assert_eq!(err.errors.len(), 6);
        assert_eq!(
            err.to_string(),
            "name is required; level is required; server is required; \
             class is required; username is required; password is required"
        );
    }

    #[test]
    fn form_prefills_from_character() {
        let c = Character {
            id: "C-001".into(),
            name: "Amy".into(),
            level: 12,
            server: Server::Red,
            class: CharacterClass::ShadowKnight,
            username: "amy".into(),
            password: "pw".into(),
            note: Some("bank alt".into()),
        };
        let form = CharacterForm::from_character(&c);
        assert_eq!(form.level, "12");
        assert_eq!(form.class, "Shadow Knight");
        assert_eq!(form.note, "bank alt");
        assert_eq!(validate(&form).unwrap().class, CharacterClass::ShadowKnight);
    }
}
