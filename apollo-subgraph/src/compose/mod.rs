//! Composition of a subgraph's SDL with the federation vocabulary.
//!
//! The source is partitioned into definitions, extensions and stubs, the extensions are checked
//! by the composition rules against everything else, and the three are merged into one schema.

use apollo_compiler::Name;
use apollo_compiler::Schema;
use apollo_compiler::ast;
use apollo_compiler::collections::IndexSet;
use tracing::instrument;

use crate::error::FederationError;
use crate::federation::missing_federation_definitions;
use crate::mode::SchemaMode;

pub(crate) mod classify;
pub(crate) mod merge;
pub(crate) mod partition;
pub mod rules;
pub(crate) mod validation;

use self::rules::CompositionRule;

/// A merged schema, before any federation field is added.
pub(crate) struct Composition {
    pub(crate) schema: Schema,
    pub(crate) stub_types: IndexSet<Name>,
}

#[instrument(level = "trace", skip_all, fields(mode = %mode))]
pub(crate) fn compose(
    document: &ast::Document,
    mode: SchemaMode,
    rules: &[Box<dyn CompositionRule>],
) -> Result<Composition, FederationError> {
    let partition = partition::partition(document, mode);
    let base = missing_federation_definitions(&partition.declared_names());

    let partial = merge::build_partial_schema(
        &base,
        &partition.stubs,
        &partition.definitions,
        &document.sources,
    )?;
    let extensions = merge::document_of(partition.extensions.iter().cloned(), &document.sources);
    validation::validate_composition(&extensions, &partial, rules)?;

    let schema = merge::merge(
        &base,
        &partition.stubs,
        &partition.definitions,
        &partition.extensions,
        &document.sources,
    )?;
    Ok(Composition {
        schema,
        stub_types: partition.stub_names(),
    })
}
