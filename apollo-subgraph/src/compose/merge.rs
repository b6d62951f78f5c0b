use apollo_compiler::Node;
use apollo_compiler::Schema;
use apollo_compiler::ast;
use apollo_compiler::ast::Definition;
use apollo_compiler::collections::IndexMap;
use apollo_compiler::collections::IndexSet;
use apollo_compiler::parser::SourceMap;
use apollo_compiler::schema::ComponentName;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::schema::ObjectType;
use tracing::debug;

use crate::error::FederationError;
use crate::federation::QUERY_TYPE_NAME;

pub(crate) fn document_of(
    definitions: impl IntoIterator<Item = Definition>,
    sources: &SourceMap,
) -> ast::Document {
    let mut document = ast::Document::new();
    document.sources = sources.clone();
    document.definitions = definitions.into_iter().collect();
    document
}

/// Stubs that a real definition of the same name does not supersede.
fn surviving_stubs<'a>(
    stubs: &'a [Definition],
    definitions: &[Definition],
) -> impl Iterator<Item = Definition> + 'a {
    let defined: IndexSet<_> = definitions
        .iter()
        .filter_map(|definition| definition.name().cloned())
        .collect();
    stubs
        .iter()
        .filter(move |stub| stub.name().is_none_or(|name| !defined.contains(name)))
        .cloned()
}

/// The schema extensions are validated against: federation definitions, then stubs, then the
/// source's own definitions.
pub(crate) fn build_partial_schema(
    base: &ast::Document,
    stubs: &[Definition],
    definitions: &[Definition],
    sources: &SourceMap,
) -> Result<Schema, FederationError> {
    Ok(Schema::builder()
        .add_ast(base)
        .add_ast(&document_of(surviving_stubs(stubs, definitions), sources))
        .add_ast(&document_of(definitions.iter().cloned(), sources))
        .build()?)
}

/// Merge everything into one schema, extensions last.
///
/// Root types that are only ever extended are adopted as definitions. If the result has no
/// query root, an empty `Query` object type is added and made the root.
pub(crate) fn merge(
    base: &ast::Document,
    stubs: &[Definition],
    definitions: &[Definition],
    extensions: &[Definition],
    sources: &SourceMap,
) -> Result<Schema, FederationError> {
    let mut schema = Schema::builder()
        .adopt_orphan_extensions()
        .add_ast(base)
        .add_ast(&document_of(surviving_stubs(stubs, definitions), sources))
        .add_ast(&document_of(definitions.iter().cloned(), sources))
        .add_ast(&document_of(extensions.iter().cloned(), sources))
        .build()?;
    ensure_query_root(&mut schema);
    Ok(schema)
}

fn ensure_query_root(schema: &mut Schema) {
    if schema.schema_definition.query.is_some() {
        return;
    }
    let query_type_name = schema
        .schema_definition
        .make_mut()
        .query
        .get_or_insert(ComponentName::from(QUERY_TYPE_NAME));
    schema
        .types
        .entry(query_type_name.name.clone())
        .or_insert_with(|| {
            debug!("synthesizing empty {} root type", query_type_name.name);
            ExtendedType::Object(Node::new(ObjectType {
                description: None,
                name: query_type_name.name.clone(),
                directives: Default::default(),
                fields: IndexMap::default(),
                implements_interfaces: IndexSet::default(),
            }))
        });
}
