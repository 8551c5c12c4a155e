use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// A GraphQL identifier: `[A-Za-z_][A-Za-z0-9_]*`.
///
/// Cheap to clone (reference-counted) and usable as a map key looked up by
/// `&str`.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Name(Arc<str>);

/// The string did not follow the GraphQL name grammar.
#[derive(thiserror::Error, Debug, Clone, Eq, PartialEq)]
#[error("`{0}` is not a valid GraphQL name")]
pub struct InvalidNameError(pub String);

impl Name {
    pub fn new(value: &str) -> Result<Self, InvalidNameError> {
        if Self::is_valid(value) {
            Ok(Self(Arc::from(value)))
        } else {
            Err(InvalidNameError(value.to_owned()))
        }
    }

    /// Creates a name without checking the grammar. Only for inputs that the
    /// lexer already classified as `Name` tokens.
    pub(crate) fn new_unchecked(value: &str) -> Self {
        debug_assert!(Self::is_valid(value));
        Self(Arc::from(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_valid(value: &str) -> bool {
        let mut chars = value.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        matches!(first, 'a'..='z' | 'A'..='Z' | '_')
            && chars.all(|c| matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '_'))
    }
}

impl std::ops::Deref for Name {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for Name {
    type Error = InvalidNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_name_grammar() {
        assert!(Name::new("User").is_ok());
        assert!(Name::new("__Schema").is_ok());
        assert!(Name::new("_0").is_ok());
        assert!(Name::new("").is_err());
        assert!(Name::new("0ops").is_err());
        assert!(Name::new("kebab-case").is_err());
    }

    #[test]
    fn looked_up_by_str() {
        let name = Name::new("users").unwrap();
        assert_eq!(name, "users");
        assert_eq!(name.as_str(), "users");
    }
}
