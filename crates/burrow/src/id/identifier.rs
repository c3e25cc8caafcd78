use core::fmt;
use core::ops::Deref;

/// A short, immutable identifier handed out by the factory.
///
/// Backed by a boxed `str` so a batch of identifiers carries no spare
/// capacity. The byte view returned by [`Identifier::as_bytes`] is read-only.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Identifier(Box<str>);

impl Identifier {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the raw bytes of the identifier.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Consumes the identifier, returning the owned string.
    pub fn into_string(self) -> String {
        self.0.into_string()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({:?})", &*self.0)
    }
}

impl Deref for Identifier {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<[u8]> for Identifier {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self(value.into_boxed_str())
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self(Box::from(value))
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.into_string()
    }
}

impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Identifier {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_agree() {
        let id = Identifier::from("aB3_");
        assert_eq!(id.as_str(), "aB3_");
        assert_eq!(id.as_bytes(), b"aB3_");
        assert_eq!(id.len(), 4);
        assert_eq!(id, "aB3_");
        assert_eq!(id.to_string(), "aB3_");
        assert_eq!(format!("{id:?}"), "Identifier(\"aB3_\")");
        assert_eq!(String::from(id), "aB3_");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_plain_string() {
        let id = Identifier::from("x-9Q");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"x-9Q\"");
        let back: Identifier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
