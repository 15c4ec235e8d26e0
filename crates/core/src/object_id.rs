//! Document identifiers
//!
//! An [`ObjectId`] is the fixed-length primary key type of the document store:
//! 12 opaque bytes, always rendered as 24 lowercase hex characters.
//!
//! Identifiers are a distinct type on purpose. `ObjectId("507f...")` and the
//! string `"507f..."` never compare equal, and the codec never collapses one
//! into the other.

use std::fmt;
use std::str::FromStr;

/// Number of raw bytes in an identifier.
pub const OBJECT_ID_LEN: usize = 12;

/// Number of hex characters in the rendered form of an identifier.
pub const OBJECT_ID_HEX_LEN: usize = OBJECT_ID_LEN * 2;

/// A 12-byte document identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; OBJECT_ID_LEN]);

/// Reasons a string is not a valid identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObjectIdError {
    /// Wrong number of characters
    #[error("identifier must be {OBJECT_ID_HEX_LEN} hex characters, got {0}")]
    Length(usize),

    /// Contains a non-hex character
    #[error("identifier contains non-hex character {ch:?} at offset {offset}")]
    NonHex {
        /// Offending character
        ch: char,
        /// Character offset into the input
        offset: usize,
    },
}

impl ObjectId {
    /// Wrap raw identifier bytes.
    pub const fn from_bytes(bytes: [u8; OBJECT_ID_LEN]) -> Self {
        ObjectId(bytes)
    }

    /// Raw identifier bytes.
    pub const fn bytes(&self) -> [u8; OBJECT_ID_LEN] {
        self.0
    }

    /// Parse a 24-character hex string (either case).
    pub fn parse_hex(s: &str) -> Result<Self, ObjectIdError> {
        let count = s.chars().count();
        if count != OBJECT_ID_HEX_LEN {
            return Err(ObjectIdError::Length(count));
        }
        if let Some((offset, ch)) = s.chars().enumerate().find(|(_, c)| !c.is_ascii_hexdigit()) {
            return Err(ObjectIdError::NonHex { ch, offset });
        }
        let mut bytes = [0u8; OBJECT_ID_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| ObjectIdError::Length(count))?;
        Ok(ObjectId(bytes))
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_hex(s)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}
