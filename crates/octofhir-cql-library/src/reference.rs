//! Symbol references in the pipe-delimited wire format
//!
//! A reference to a symbol declared in an included library is written as
//! `<libraryName>-<version>|<alias>|<identifier>`. Anything that does not
//! split into exactly three segments is a plain, unqualified identifier.

use std::fmt;

/// Segment delimiter of qualified references
pub const DELIMITER: char = '|';

/// A parsed symbol reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolReference<'a> {
    /// Identifier declared in the current library
    Unqualified { name: &'a str },
    /// Identifier declared in an included library
    Qualified {
        /// `libraryName-version` of the included library
        library: &'a str,
        /// Alias of the include; carried for display only
        alias: &'a str,
        name: &'a str,
    },
}

impl<'a> SymbolReference<'a> {
    /// Parse a reference string
    ///
    /// Trailing empty segments are ignored when counting, so `"A|B|"` is
    /// unqualified. An unqualified reference keeps the whole input as its
    /// name. Parsing never fails.
    pub fn parse(reference: &'a str) -> Self {
        let mut segments: Vec<&'a str> = reference.split(DELIMITER).collect();
        while segments.last() == Some(&"") {
            segments.pop();
        }

        match segments[..] {
            [library, alias, name] => Self::Qualified {
                library,
                alias,
                name,
            },
            _ => Self::Unqualified { name: reference },
        }
    }

    /// Build a qualified reference
    pub fn qualified(library: &'a str, alias: &'a str, name: &'a str) -> Self {
        Self::Qualified {
            library,
            alias,
            name,
        }
    }

    /// The referenced identifier
    pub fn name(&self) -> &'a str {
        match self {
            Self::Unqualified { name } | Self::Qualified { name, .. } => name,
        }
    }

    /// `libraryName-version` for qualified references
    pub fn library(&self) -> Option<&'a str> {
        match self {
            Self::Unqualified { .. } => None,
            Self::Qualified { library, .. } => Some(library),
        }
    }

    pub fn is_qualified(&self) -> bool {
        matches!(self, Self::Qualified { .. })
    }
}

impl fmt::Display for SymbolReference<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unqualified { name } => f.write_str(name),
            Self::Qualified {
                library,
                alias,
                name,
            } => write!(f, "{library}{DELIMITER}{alias}{DELIMITER}{name}"),
        }
    }
}
