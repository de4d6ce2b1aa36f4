//! Reference resolution over a library include tree
//!
//! This module handles:
//! - Code and value set lookup by unqualified or qualified reference
//! - Aggregation of symbols declared by directly included libraries
//! - Alias-qualified identifier listings
//!
//! Resolution never looks further than the directly included libraries.
//! Included libraries of included libraries are never consulted.

use serde::Serialize;
use std::fmt;

use crate::model::{
    AliasTagged, CodeRef, Definition, IncludeKey, LibraryScope, Parameter, SymbolKind, ValueSetRef,
};
use crate::reference::SymbolReference;

/// A symbol name paired with the alias of the include it was found through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct QualifiedRef<'a> {
    pub alias: &'a str,
    pub name: &'a str,
}

impl<'a> QualifiedRef<'a> {
    pub fn new(alias: &'a str, name: &'a str) -> Self {
        Self { alias, name }
    }
}

impl fmt::Display for QualifiedRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.alias, self.name)
    }
}

/// Read-only resolver over a built library scope
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    scope: &'a LibraryScope,
}

impl LibraryScope {
    /// Resolver over this scope and its direct includes
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self)
    }
}

impl<'a> Resolver<'a> {
    /// Create a new resolver
    pub fn new(scope: &'a LibraryScope) -> Self {
        Self { scope }
    }

    /// Resolve a code reference
    ///
    /// Codes match on their identifier: the display name when present,
    /// otherwise the code name.
    pub fn resolve_code(&self, reference: &str) -> Option<&'a CodeRef> {
        let reference = SymbolReference::parse(reference);
        let name = reference.name();
        self.target(&reference)?
            .codes
            .iter()
            .find(|code| code.identifier() == name)
    }

    /// Resolve a value set reference by exact name
    pub fn resolve_value_set(&self, reference: &str) -> Option<&'a ValueSetRef> {
        let reference = SymbolReference::parse(reference);
        let name = reference.name();
        self.target(&reference)?
            .value_sets
            .iter()
            .find(|value_set| value_set.name == name)
    }

    /// Scope a parsed reference is looked up in
    ///
    /// Unqualified references only ever see the local scope.
    fn target(&self, reference: &SymbolReference<'_>) -> Option<&'a LibraryScope> {
        match reference.library() {
            None => Some(self.scope),
            Some(library) => self.find_included(library).map(|(_, scope)| scope),
        }
    }

    /// Find a direct include by its `libraryName-version`
    ///
    /// When several includes share the formatted name, the first registered
    /// one wins.
    pub fn find_included(
        &self,
        formatted_name: &str,
    ) -> Option<(&'a IncludeKey, &'a LibraryScope)> {
        let found = self
            .scope
            .includes
            .iter()
            .find(|(key, _)| key.formatted_name() == formatted_name);
        if found.is_none() {
            log::debug!(
                "{} has no include named '{}'",
                self.scope.formatted_name(),
                formatted_name
            );
        }
        found
    }

    /// Find a local expression by name, searching definitions then functions
    pub fn find_expression(&self, name: &str) -> Option<&'a Definition> {
        self.scope
            .definitions
            .iter()
            .chain(&self.scope.functions)
            .find(|def| def.name == name)
    }

    /// Definitions of every direct include, in include order
    ///
    /// Duplicates across libraries are preserved. Entries are not tagged.
    pub fn aggregate_included_definitions(&self) -> Vec<Definition> {
        self.scope
            .includes
            .values()
            .flat_map(|library| library.definitions.iter().cloned())
            .collect()
    }

    /// Functions of every direct include, tagged with the include alias
    pub fn aggregate_included_functions(&self) -> Vec<Definition> {
        self.aggregate_tagged(|library| library.functions.as_slice())
    }

    /// Value sets of every direct include, tagged with the include alias
    pub fn aggregate_included_value_sets(&self) -> Vec<ValueSetRef> {
        self.aggregate_tagged(|library| library.value_sets.as_slice())
    }

    /// Codes of every direct include, tagged with the include alias
    pub fn aggregate_included_codes(&self) -> Vec<CodeRef> {
        self.aggregate_tagged(|library| library.codes.as_slice())
    }

    /// Parameters of every direct include, tagged with the include alias
    pub fn aggregate_included_parameters(&self) -> Vec<Parameter> {
        self.aggregate_tagged(|library| library.parameters.as_slice())
    }

    fn aggregate_tagged<T, F>(&self, select: F) -> Vec<T>
    where
        T: Clone + AliasTagged + 'a,
        F: Fn(&'a LibraryScope) -> &'a [T],
    {
        self.scope
            .includes
            .iter()
            .flat_map(|(key, library)| {
                select(library).iter().map(move |item| {
                    let mut copy = item.clone();
                    copy.set_alias(Some(key.alias.clone()));
                    copy
                })
            })
            .collect()
    }

    /// `(alias, name)` for every symbol of `kind` declared by a direct include
    pub fn qualified_identifiers(&self, kind: SymbolKind) -> Vec<QualifiedRef<'a>> {
        self.scope
            .includes
            .iter()
            .flat_map(|(key, library)| {
                library
                    .symbol_names(kind)
                    .into_iter()
                    .map(move |name| QualifiedRef::new(&key.alias, name))
            })
            .collect()
    }

    /// Local definition names followed by local function names
    pub fn all_expression_names(&self) -> Vec<&'a str> {
        self.scope
            .definitions
            .iter()
            .chain(&self.scope.functions)
            .map(|def| def.name.as_str())
            .collect()
    }
}
