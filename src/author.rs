use std::fmt;
use std::str::FromStr;

use crate::error::BackdateError;

/// Commit author identity in the `Name <email>` form git uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: String,
}

impl Author {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl FromStr for Author {
    type Err = BackdateError;

    /// Parse `Name <email>`. Both parts must be non-empty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BackdateError::InvalidAuthor {
            input: s.to_string(),
        };
        let (name, rest) = s.trim().split_once('<').ok_or_else(invalid)?;
        let email = rest.strip_suffix('>').ok_or_else(invalid)?;
        let (name, email) = (name.trim(), email.trim());
        if name.is_empty() || email.is_empty() || email.contains(['<', '>']) {
            return Err(invalid());
        }
        Ok(Self::new(name, email))
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}
