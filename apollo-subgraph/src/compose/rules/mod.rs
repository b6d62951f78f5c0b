//! Validation rules that only make sense while composing: they check a document of extensions
//! against the schema built from everything else.

use apollo_compiler::Name;
use apollo_compiler::Schema;
use apollo_compiler::ast;
use apollo_compiler::ast::Definition;

use crate::error::MultipleFederationErrors;

mod known_directives;
mod known_type_names;
mod possible_type_extensions;
mod unique_enum_value_names;
mod unique_field_definition_names;

pub use known_directives::KnownDirectives;
pub use known_type_names::KnownTypeNames;
pub use possible_type_extensions::PossibleTypeExtensions;
pub use unique_enum_value_names::UniqueEnumValueNames;
pub use unique_field_definition_names::UniqueFieldDefinitionNames;

/// What a composition rule gets to look at.
pub struct CompositionContext<'a> {
    /// The schema built from the federation definitions, the stubs and the source's own
    /// definitions. Extensions are not applied yet.
    pub schema: &'a Schema,
    /// The extensions about to be applied, in source order.
    pub extensions: &'a ast::Document,
}

impl CompositionContext<'_> {
    /// Type extensions paired with their target name.
    pub fn type_extensions(&self) -> impl Iterator<Item = (&Name, &Definition)> {
        self.extensions
            .definitions
            .iter()
            .filter_map(|definition| Some((definition.name()?, definition)))
    }
}

/// A validation rule run over the extensions of a subgraph before they are merged.
pub trait CompositionRule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Report every violation into `errors`.
    fn check(&self, context: &CompositionContext<'_>, errors: &mut MultipleFederationErrors);
}

/// The rules a [`SubgraphSchemaBuilder`][crate::SubgraphSchemaBuilder] runs unless told
/// otherwise.
pub fn default_composition_rules() -> Vec<Box<dyn CompositionRule>> {
    vec![
        Box::new(PossibleTypeExtensions),
        Box::new(UniqueFieldDefinitionNames),
        Box::new(UniqueEnumValueNames),
        Box::new(KnownTypeNames),
        Box::new(KnownDirectives),
    ]
}
