use std::fmt;
use std::hash::{Hash, Hasher};

/// A token identifying a type registered in a [`crate::metadata::typesystem::TypeRegistry`].
///
/// Tokens consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the type table (built-in, class, interface)
/// - The low 24 bits (bits 0-23) indicate the row index within that table
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TypeToken(pub u32);

impl TypeToken {
    /// Table holding the root object type, the primitives and `String`
    pub const TABLE_BUILTIN: u8 = 0x01;
    /// Table holding user registered classes
    pub const TABLE_CLASS: u8 = 0x02;
    /// Table holding user registered interfaces
    pub const TABLE_INTERFACE: u8 = 0x03;

    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        TypeToken(value)
    }

    /// Creates a token from a table id and a row index
    #[must_use]
    pub fn from_parts(table: u8, row: u32) -> Self {
        TypeToken((u32::from(table) << 24) | (row & 0x00FF_FFFF))
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table type from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for TypeToken {
    fn from(value: u32) -> Self {
        TypeToken(value)
    }
}

impl From<TypeToken> for u32 {
    fn from(token: TypeToken) -> Self {
        token.0
    }
}

impl fmt::Debug for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TypeToken(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl Hash for TypeToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
