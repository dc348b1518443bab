//! Naming-convention validation for object names.

use snafu::Snafu;

use crate::object::ObjectKind;

/// Characters that must not appear in object names. They collide with the
/// config file syntax or with downstream macro expansion.
pub const ILLEGAL_NAME_CHARS: &str = "`~!$%^&*\"|'<>?,()=;\n\r";

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum Error {
    #[snafu(display("{kind} name must not be empty"))]
    EmptyName { kind: ObjectKind },

    #[snafu(display("{kind} name {name:?} contains illegal character {found:?}"))]
    IllegalCharacter {
        kind: ObjectKind,
        name: String,
        found: char,
    },
}

/// Validates an object name against the naming convention.
pub fn validate_name(kind: ObjectKind, name: &str) -> Result<(), Error> {
    if name.is_empty() {
        return EmptyNameSnafu { kind }.fail();
    }
    if let Some(found) = name.chars().find(|c| ILLEGAL_NAME_CHARS.contains(*c)) {
        return IllegalCharacterSnafu {
            kind,
            name: name.to_string(),
            found,
        }
        .fail();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("web-01")]
    #[case("db_primary")]
    #[case("router.site1")]
    #[case("Host With Spaces")]
    fn accepts_conventional_names(#[case] name: &str) {
        assert_eq!(validate_name(ObjectKind::Host, name), Ok(()));
    }

    #[rstest]
    #[case("web;01", ';')]
    #[case("db'primary", '\'')]
    #[case("a!b", '!')]
    #[case("multi\nline", '\n')]
    fn rejects_illegal_characters(#[case] name: &str, #[case] found: char) {
        assert_eq!(
            validate_name(ObjectKind::Host, name),
            Err(Error::IllegalCharacter {
                kind: ObjectKind::Host,
                name: name.to_string(),
                found,
            })
        );
    }

    #[test]
    fn rejects_empty_names() {
        assert_eq!(
            validate_name(ObjectKind::Contact, ""),
            Err(Error::EmptyName {
                kind: ObjectKind::Contact
            })
        );
    }
}
