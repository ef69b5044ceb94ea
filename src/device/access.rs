use std::fmt;

/// Predefined access rights.
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Access {
    /// Read and write accesses are permitted. Writes affect the state of the
    /// register and reads return the register value.
    #[default]
    ReadWrite,
    /// Read access is permitted. Write operations have an undefined result.
    ReadOnly,
    /// Read operations have an undefined result. Write access is permitted.
    WriteOnly,
    /// Only the first write after a reset has an effect. Reads are undefined.
    WriteOnce,
    /// Read access is always permitted. Only the first write access after a
    /// reset will have an effect on the content.
    ReadWriteOnce,
    /// A token outside the known set, kept verbatim.
    Other(String),
}

impl Access {
    /// Parses an access token in either its long (`read-write`) or abbreviated
    /// (`rw`) form. Unknown tokens are preserved as [`Access::Other`].
    pub fn parse(token: &str) -> Self {
        match token.trim() {
            "read-write" | "rw" => Self::ReadWrite,
            "read-only" | "r" => Self::ReadOnly,
            "write-only" | "w" => Self::WriteOnly,
            "writeOnce" => Self::WriteOnce,
            "read-writeOnce" => Self::ReadWriteOnce,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Returns the canonical SVD token.
    pub fn as_str(&self) -> &str {
        match self {
            Self::ReadWrite => "read-write",
            Self::ReadOnly => "read-only",
            Self::WriteOnly => "write-only",
            Self::WriteOnce => "writeOnce",
            Self::ReadWriteOnce => "read-writeOnce",
            Self::Other(token) => token,
        }
    }

    /// Returns the short form drawn under a field name in the bit diagram.
    pub fn abbrev(&self) -> String {
        match self {
            Self::ReadWrite => "rw".to_owned(),
            Self::ReadOnly => "r".to_owned(),
            Self::WriteOnly => "w".to_owned(),
            Self::WriteOnce => "writeOnce".to_owned(),
            Self::ReadWriteOnce => "rwOnce".to_owned(),
            Self::Other(token) => token
                .replace("read-write", "rw")
                .replace("read-only", "r")
                .replace("write-only", "w"),
        }
    }

    /// Returns a human-readable description.
    pub fn describe(&self) -> &str {
        match self {
            Self::ReadWrite => "read/write",
            Self::ReadOnly => "read only",
            Self::WriteOnly => "write only",
            Self::WriteOnce => "write once",
            Self::ReadWriteOnce => "read, write once",
            Self::Other(token) => token,
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
