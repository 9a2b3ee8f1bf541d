//! Extension identifiers
//!
//! An [`ExtensionName`] is the single string that keys the entry point,
//! names the output artifact and locates the source file. Validation happens
//! once, at construction, so every descriptor built from a name agrees on it.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Longest accepted identifier, in bytes (same ceiling npm puts on package names)
pub const MAX_NAME_LEN: usize = 214;

/// Reasons an identifier cannot be used as an extension name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    /// Name is the empty string
    #[error("extension name cannot be empty")]
    Empty,

    /// Name exceeds [`MAX_NAME_LEN`]
    #[error("extension name is {len} bytes, the limit is {max}")]
    TooLong { len: usize, max: usize },

    /// `.` and `..` would escape the source root
    #[error("extension name '{0}' is reserved")]
    Reserved(String),

    /// First character must be an ASCII letter, digit or `_`
    #[error("extension name cannot start with '{0}'")]
    InvalidStart(char),

    /// Character not allowed in a file stem
    #[error("invalid character '{ch}' at index {index} in extension name")]
    InvalidChar { ch: char, index: usize },
}

/// Validated extension identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExtensionName(String);

impl ExtensionName {
    /// Validate and wrap an identifier
    pub fn new(name: impl Into<String>) -> Result<Self, NameError> {
        let name = name.into();
        validate(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

fn validate(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.len() > MAX_NAME_LEN {
        return Err(NameError::TooLong {
            len: name.len(),
            max: MAX_NAME_LEN,
        });
    }
    if name == "." || name == ".." {
        return Err(NameError::Reserved(name.to_string()));
    }

    let mut chars = name.char_indices();
    if let Some((_, first)) = chars.next() {
        if !(first.is_ascii_alphanumeric() || first == '_') {
            return Err(NameError::InvalidStart(first));
        }
    }
    for (index, ch) in chars {
        if !(ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.')) {
            return Err(NameError::InvalidChar { ch, index });
        }
    }

    Ok(())
}

impl fmt::Display for ExtensionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ExtensionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ExtensionName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ExtensionName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ExtensionName {
    type Error = NameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
