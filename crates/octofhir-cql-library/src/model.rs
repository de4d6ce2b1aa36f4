//! Library scope model
//!
//! A [`LibraryScope`] is the symbol table of one compiled CQL library: the
//! definitions, functions, parameters, value sets, codes and code systems it
//! declares, plus the libraries it includes. Included libraries are owned
//! copies, so a root scope owns the whole tree below it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Data model kind declared by a library's `using` statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// Base FHIR model
    Fhir,
    /// QI-Core profiles on FHIR
    QiCore,
    /// Quality Data Model
    Qdm,
    /// Any other model
    Other,
}

impl ModelKind {
    /// Classify a `using` model identifier (case-sensitive)
    pub fn from_model_name(name: &str) -> Self {
        match name {
            "FHIR" => Self::Fhir,
            "QI-Core" => Self::QiCore,
            "QDM" => Self::Qdm,
            _ => Self::Other,
        }
    }

    /// Whether the model is FHIR-based
    pub fn is_fhir(&self) -> bool {
        matches!(self, Self::Fhir | Self::QiCore)
    }
}

/// Kind of locally declared symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Expression definition (`define X:`)
    Definition,
    /// Function definition (`define function X(...)`)
    Function,
    /// Parameter definition
    Parameter,
    /// Value set definition
    ValueSet,
    /// Code definition
    Code,
    /// Code system definition
    CodeSystem,
}

impl SymbolKind {
    pub const ALL: [SymbolKind; 6] = [
        SymbolKind::Definition,
        SymbolKind::Function,
        SymbolKind::Parameter,
        SymbolKind::ValueSet,
        SymbolKind::Code,
        SymbolKind::CodeSystem,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Definition => "definition",
            SymbolKind::Function => "function",
            SymbolKind::Parameter => "parameter",
            SymbolKind::ValueSet => "valueset",
            SymbolKind::Code => "code",
            SymbolKind::CodeSystem => "codesystem",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Symbols that can be annotated with the alias of the include they were
/// aggregated from
pub trait AliasTagged {
    /// Alias of the including library, if this is an aggregated copy
    fn alias(&self) -> Option<&str>;

    /// Set the alias on this copy
    fn set_alias(&mut self, alias: Option<String>);
}

macro_rules! impl_alias_tagged {
    ($($ty:ty),* $(,)?) => {
        $(
            impl AliasTagged for $ty {
                fn alias(&self) -> Option<&str> {
                    self.alias.as_deref()
                }

                fn set_alias(&mut self, alias: Option<String>) {
                    self.alias = alias;
                }
            }
        )*
    };
}

impl_alias_tagged!(Definition, Parameter, ValueSetRef, CodeRef);

/// Expression or function definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    pub id: String,
    pub name: String,
    /// Raw source text; the first line is the `define` header
    pub logic: String,
    #[serde(default)]
    pub is_function: bool,
    /// Library this definition was inherited from, when flattened by a consumer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_library: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl Definition {
    /// Create an expression definition
    pub fn new(id: impl Into<String>, name: impl Into<String>, logic: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            logic: logic.into(),
            is_function: false,
            parent_library: None,
            alias: None,
        }
    }

    /// Create a function definition
    pub fn function(
        id: impl Into<String>,
        name: impl Into<String>,
        logic: impl Into<String>,
    ) -> Self {
        Self {
            is_function: true,
            ..Self::new(id, name, logic)
        }
    }

    /// Set the parent library
    pub fn with_parent_library(mut self, library: impl Into<String>) -> Self {
        self.parent_library = Some(library.into());
        self
    }

    /// Logic without its header line
    pub fn body(&self) -> &str {
        match self.logic.find('\n') {
            Some(idx) => &self.logic[idx + 1..],
            None => &self.logic,
        }
    }

    /// `Alias.Name` for aggregated copies, the bare name otherwise
    pub fn display_name(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{}.{}", alias, self.name),
            None => self.name.clone(),
        }
    }
}

/// Parameter definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_specifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_specifier: None,
            default: None,
            alias: None,
        }
    }

    pub fn with_type(mut self, type_specifier: impl Into<String>) -> Self {
        self.type_specifier = Some(type_specifier.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Value set declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueSetRef {
    pub name: String,
    pub oid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl ValueSetRef {
    pub fn new(name: impl Into<String>, oid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            oid: oid.into(),
            version: None,
            alias: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// Code declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeRef {
    /// Code name (the code value in its system)
    pub name: String,
    /// Code id/OID
    pub id: String,
    /// Identifier the code was declared under, when it differs from the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub code_system_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_system_version: Option<String>,
    #[serde(default)]
    pub includes_version: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl CodeRef {
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        code_system_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            display_name: None,
            code_system_name: code_system_name.into(),
            code_system_version: None,
            includes_version: false,
            alias: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Set the code system version; marks the version as included
    pub fn with_code_system_version(mut self, version: impl Into<String>) -> Self {
        self.code_system_version = Some(version.into());
        self.includes_version = true;
        self
    }

    /// Identifier references use: the display name if present, else the name
    pub fn identifier(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// Code system declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSystemRef {
    pub name: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl CodeSystemRef {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// Key of one include edge: `include <library_name> version '<version>' called <alias>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludeKey {
    pub alias: String,
    pub library_name: String,
    pub version: String,
}

impl IncludeKey {
    pub fn new(
        alias: impl Into<String>,
        library_name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            alias: alias.into(),
            library_name: library_name.into(),
            version: version.into(),
        }
    }

    /// `library_name-version`, the first segment of a qualified reference
    pub fn formatted_name(&self) -> String {
        format_name(&self.library_name, &self.version)
    }
}

impl fmt::Display for IncludeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} version '{}' called {}",
            self.library_name, self.version, self.alias
        )
    }
}

pub(crate) fn format_name(name: &str, version: &str) -> String {
    format!("{}-{}", name, version)
}

/// Symbol table of one compiled CQL library
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryScope {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub using_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub using_model_version: Option<String>,
    /// Declared default context, e.g. `Patient`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default)]
    pub line_count: usize,
    #[serde(default)]
    pub definitions: Vec<Definition>,
    #[serde(default)]
    pub functions: Vec<Definition>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub value_sets: Vec<ValueSetRef>,
    #[serde(default)]
    pub codes: Vec<CodeRef>,
    #[serde(default)]
    pub code_systems: Vec<CodeSystemRef>,
    /// Included libraries in declaration order
    #[serde(default, with = "include_entries")]
    pub includes: IndexMap<IncludeKey, LibraryScope>,
}

impl LibraryScope {
    /// Create an empty scope
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// `name-version`
    pub fn formatted_name(&self) -> String {
        format_name(&self.name, &self.version)
    }

    /// Classification of the `using` model
    pub fn model_kind(&self) -> ModelKind {
        self.using_model
            .as_deref()
            .map(ModelKind::from_model_name)
            .unwrap_or(ModelKind::Other)
    }

    pub fn uses_fhir(&self) -> bool {
        self.model_kind().is_fhir()
    }

    /// Names of the local symbols of one kind, in declaration order
    ///
    /// Codes are named by their identifier (display name, else name).
    pub fn symbol_names(&self, kind: SymbolKind) -> Vec<&str> {
        match kind {
            SymbolKind::Definition => self.definitions.iter().map(|d| d.name.as_str()).collect(),
            SymbolKind::Function => self.functions.iter().map(|f| f.name.as_str()).collect(),
            SymbolKind::Parameter => self.parameters.iter().map(|p| p.name.as_str()).collect(),
            SymbolKind::ValueSet => self.value_sets.iter().map(|v| v.name.as_str()).collect(),
            SymbolKind::Code => self.codes.iter().map(CodeRef::identifier).collect(),
            SymbolKind::CodeSystem => self.code_systems.iter().map(|c| c.name.as_str()).collect(),
        }
    }
}

/// Serde form of the include map: an ordered array of entries, since JSON
/// object keys cannot hold an `IncludeKey`
mod include_entries {
    use super::{IncludeKey, LibraryScope};
    use indexmap::IndexMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct EntryRef<'a> {
        alias: &'a str,
        library_name: &'a str,
        version: &'a str,
        library: &'a LibraryScope,
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Entry {
        alias: String,
        library_name: String,
        version: String,
        library: LibraryScope,
    }

    pub fn serialize<S: Serializer>(
        includes: &IndexMap<IncludeKey, LibraryScope>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(includes.iter().map(|(key, library)| EntryRef {
            alias: &key.alias,
            library_name: &key.library_name,
            version: &key.version,
            library,
        }))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<IndexMap<IncludeKey, LibraryScope>, D::Error> {
        let entries = Vec::<Entry>::deserialize(deserializer)?;
        let mut includes = IndexMap::with_capacity(entries.len());
        for entry in entries {
            let key = IncludeKey::new(entry.alias, entry.library_name, entry.version);
            // A repeated key keeps its first library
            includes.entry(key).or_insert(entry.library);
        }
        Ok(includes)
    }
}
