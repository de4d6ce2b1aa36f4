//! Build-phase construction of library scopes
//!
//! The builder is where a compiler front end populates a scope. It rejects
//! symbols that would break per-kind name uniqueness and repeated include
//! keys, so that resolution over the finished scope stays unambiguous.

use octofhir_cql_diagnostics::{CQL0109, CQL0121, CqlError, Result};

use crate::model::{
    AliasTagged, CodeRef, CodeSystemRef, Definition, IncludeKey, LibraryScope, Parameter,
    SymbolKind, ValueSetRef,
};

/// Builder for [`LibraryScope`]
#[derive(Debug, Clone)]
pub struct LibraryScopeBuilder {
    scope: LibraryScope,
}

impl LibraryScopeBuilder {
    /// Start a scope for library `name` at `version`
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            scope: LibraryScope::new(name, version),
        }
    }

    /// Set the `using` model and its version
    pub fn using(mut self, model: impl Into<String>, version: impl Into<String>) -> Self {
        self.scope.using_model = Some(model.into());
        self.scope.using_model_version = Some(version.into());
        self
    }

    /// Set the default context
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.scope.context = Some(context.into());
        self
    }

    /// Set the library comment
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.scope.comment = Some(comment.into());
        self
    }

    /// Set the source line count
    pub fn line_count(mut self, lines: usize) -> Self {
        self.scope.line_count = lines;
        self
    }

    /// Add an expression definition
    pub fn add_definition(mut self, mut definition: Definition) -> Result<Self> {
        self.ensure_unique(SymbolKind::Definition, &definition.name)?;
        definition.is_function = false;
        definition.set_alias(None);
        self.scope.definitions.push(definition);
        Ok(self)
    }

    /// Add a function definition
    pub fn add_function(mut self, mut function: Definition) -> Result<Self> {
        self.ensure_unique(SymbolKind::Function, &function.name)?;
        function.is_function = true;
        function.set_alias(None);
        self.scope.functions.push(function);
        Ok(self)
    }

    pub fn add_parameter(mut self, mut parameter: Parameter) -> Result<Self> {
        self.ensure_unique(SymbolKind::Parameter, &parameter.name)?;
        parameter.set_alias(None);
        self.scope.parameters.push(parameter);
        Ok(self)
    }

    pub fn add_value_set(mut self, mut value_set: ValueSetRef) -> Result<Self> {
        self.ensure_unique(SymbolKind::ValueSet, &value_set.name)?;
        value_set.set_alias(None);
        self.scope.value_sets.push(value_set);
        Ok(self)
    }

    /// Add a code; uniqueness is checked on the code identifier
    pub fn add_code(mut self, mut code: CodeRef) -> Result<Self> {
        self.ensure_unique(SymbolKind::Code, code.identifier())?;
        code.set_alias(None);
        self.scope.codes.push(code);
        Ok(self)
    }

    pub fn add_code_system(mut self, code_system: CodeSystemRef) -> Result<Self> {
        self.ensure_unique(SymbolKind::CodeSystem, &code_system.name)?;
        self.scope.code_systems.push(code_system);
        Ok(self)
    }

    /// Register an included library under `key`
    ///
    /// A key that is already registered is rejected. A different key whose
    /// `libraryName-version` collides with an earlier include is accepted;
    /// qualified lookups keep resolving to the earlier one.
    pub fn include(mut self, key: IncludeKey, library: LibraryScope) -> Result<Self> {
        if self.scope.includes.contains_key(&key) {
            return Err(CqlError::library_in(
                CQL0121,
                format!("Library {} is already included", key),
                self.scope.formatted_name(),
            ));
        }

        let formatted = key.formatted_name();
        if let Some(existing) = self
            .scope
            .includes
            .keys()
            .find(|existing| existing.formatted_name() == formatted)
        {
            log::warn!(
                "{}: include '{}' shares the name {} with '{}', which qualified references use",
                self.scope.formatted_name(),
                key.alias,
                formatted,
                existing.alias
            );
        }

        self.scope.includes.insert(key, library);
        Ok(self)
    }

    /// Finish the scope
    pub fn build(self) -> LibraryScope {
        self.scope
    }

    fn ensure_unique(&self, kind: SymbolKind, name: &str) -> Result<()> {
        if self.scope.symbol_names(kind).contains(&name) {
            return Err(CqlError::library_in(
                CQL0109,
                format!("Duplicate {} '{}'", kind, name),
                self.scope.formatted_name(),
            ));
        }
        Ok(())
    }
}
