use std::fmt::Formatter;
use std::path::Path;
use std::sync::Arc;

use apollo_compiler::Name;
use apollo_compiler::Schema;
use apollo_compiler::ast;
use apollo_compiler::collections::IndexMap;
use apollo_compiler::collections::IndexSet;
use apollo_compiler::validation::Valid;
use tracing::debug;
use tracing::warn;

use crate::compose::compose;
use crate::compose::rules::CompositionRule;
use crate::compose::rules::default_composition_rules;
use crate::error::FederationError;
use crate::error::MultipleFederationErrors;
use crate::mode::SchemaMode;
use crate::resolvers::ReferenceResolver;
use crate::resolvers::add_federation_fields;
use crate::resolvers::discover_entities;
use crate::resolvers::entities::EntitiesRequest;
use crate::resolvers::entities::EntitiesResponse;
use crate::resolvers::entities::resolve_entities;
use crate::resolvers::service::Service;
use crate::resolvers::service::resolve_service;

/// A subgraph's schema composed with the federation vocabulary.
///
/// In [`SchemaMode::Service`] it also resolves the `_entities` and `_service` fields.
pub struct SubgraphSchema {
    schema: Valid<Schema>,
    mode: SchemaMode,
    entity_types: IndexSet<Name>,
    stub_types: IndexSet<Name>,
    resolvers: IndexMap<String, Arc<dyn ReferenceResolver>>,
}

impl SubgraphSchema {
    pub fn builder() -> SubgraphSchemaBuilder {
        SubgraphSchemaBuilder::new()
    }

    /// Compose a single source in service mode, without reference resolvers.
    pub fn parse(source: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, FederationError> {
        Self::builder().parse(source, path).build()
    }

    /// The composed schema. A gateway's partial schema is only checked by the composition rules,
    /// since its roots and stubs may be left without fields.
    pub fn schema(&self) -> &Valid<Schema> {
        &self.schema
    }

    pub fn mode(&self) -> SchemaMode {
        self.mode
    }

    /// Object types carrying `@key`.
    pub fn entity_types(&self) -> &IndexSet<Name> {
        &self.entity_types
    }

    /// Types that were only ever extended, and got an empty definition to extend.
    pub fn stub_types(&self) -> &IndexSet<Name> {
        &self.stub_types
    }

    /// Resolve the `_entities` field.
    ///
    /// The outer error means the schema does not serve `_entities`. Each representation gets
    /// its own result, at the same position as in the request.
    pub async fn resolve_entities(
        &self,
        request: &EntitiesRequest,
    ) -> Result<EntitiesResponse, FederationError> {
        resolve_entities(&self.schema, &self.resolvers, request).await
    }

    /// Resolve the `_service` field.
    pub fn service(&self) -> Result<Service, FederationError> {
        resolve_service(&self.schema, &self.stub_types)
    }
}

impl std::fmt::Debug for SubgraphSchema {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubgraphSchema")
            .field("mode", &self.mode)
            .field("entity_types", &self.entity_types)
            .field("stub_types", &self.stub_types)
            .field("resolvers", &self.resolvers.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

pub struct SubgraphSchemaBuilder {
    mode: SchemaMode,
    document: ast::Document,
    errors: MultipleFederationErrors,
    resolvers: IndexMap<String, Arc<dyn ReferenceResolver>>,
    rules: Vec<Box<dyn CompositionRule>>,
}

impl Default for SubgraphSchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SubgraphSchemaBuilder {
    pub fn new() -> Self {
        Self {
            mode: SchemaMode::default(),
            document: ast::Document::new(),
            errors: MultipleFederationErrors::new(),
            resolvers: IndexMap::default(),
            rules: default_composition_rules(),
        }
    }

    pub fn mode(mut self, mode: SchemaMode) -> Self {
        self.mode = mode;
        self
    }

    /// Add a source. Sources are composed as one document, in the order they were added.
    ///
    /// Parse errors are reported by [`build`][Self::build].
    pub fn parse(mut self, source: impl Into<String>, path: impl AsRef<Path>) -> Self {
        let document = match ast::Document::parse(source, path) {
            Ok(document) => document,
            Err(with_errors) => {
                self.errors.push(with_errors.errors.into());
                with_errors.partial
            }
        };
        self.add_document(document);
        self
    }

    fn add_document(&mut self, document: ast::Document) {
        let sources = Arc::make_mut(&mut self.document.sources);
        for (file_id, source) in document.sources.iter() {
            sources.entry(*file_id).or_insert_with(|| source.clone());
        }
        self.document.definitions.extend(document.definitions);
    }

    /// Register how representations of `type_name` become entities.
    pub fn reference_resolver(
        mut self,
        type_name: impl Into<String>,
        resolver: impl ReferenceResolver + 'static,
    ) -> Self {
        self.resolvers.insert(type_name.into(), Arc::new(resolver));
        self
    }

    /// Replace the composition rules.
    pub fn composition_rules(mut self, rules: Vec<Box<dyn CompositionRule>>) -> Self {
        self.rules = rules;
        self
    }

    pub fn build(self) -> Result<SubgraphSchema, FederationError> {
        self.errors.into_result()?;

        let composition = compose(&self.document, self.mode, &self.rules)?;
        let mut schema = composition.schema;
        let entity_types = discover_entities(&schema);
        if self.mode == SchemaMode::Service {
            add_federation_fields(&mut schema, &entity_types);
        }
        for type_name in self.resolvers.keys() {
            if !entity_types.contains(type_name.as_str()) {
                warn!("reference resolver registered for {type_name}, which is not an entity type");
            }
        }
        let schema = match self.mode {
            SchemaMode::Service => schema.validate()?,
            // The composition rules have checked the extensions. Root types left empty and
            // stubs whose fields were all external are filled in by the supergraph.
            SchemaMode::Gateway => Valid::assume_valid(schema),
        };
        debug!(
            mode = %self.mode,
            entities = entity_types.len(),
            stubs = composition.stub_types.len(),
            "built subgraph schema"
        );

        Ok(SubgraphSchema {
            schema,
            mode: self.mode,
            entity_types,
            stub_types: composition.stub_types,
            resolvers: self.resolvers,
        })
    }
}

const _: () = {
    const fn assert_thread_safe<T: Sync + Send>() {}

    assert_thread_safe::<SubgraphSchema>();
};
