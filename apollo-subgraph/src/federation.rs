//! The federation vocabulary every subgraph schema is composed with.
//!
//! The definitions are parsed once per process and never mutated afterwards. Composition only
//! reads them, adding the ones a source does not declare itself.

use std::sync::LazyLock;

use apollo_compiler::Name;
use apollo_compiler::ast;
use apollo_compiler::collections::IndexSet;
use apollo_compiler::name;

pub(crate) const ANY_SCALAR_NAME: Name = name!("_Any");
pub(crate) const FIELDSET_SCALAR_NAME: Name = name!("_FieldSet");
pub(crate) const SERVICE_TYPE: Name = name!("_Service");
pub(crate) const ENTITY_UNION_NAME: Name = name!("_Entity");
pub(crate) const ENTITIES_QUERY: Name = name!("_entities");
pub(crate) const SERVICE_SDL_QUERY: Name = name!("_service");
pub(crate) const REPRESENTATIONS_ARGUMENT: Name = name!("representations");
pub(crate) const TYPENAME_FIELD: Name = name!("__typename");

pub(crate) const KEY_DIRECTIVE_NAME: Name = name!("key");
pub(crate) const EXTENDS_DIRECTIVE_NAME: Name = name!("extends");
pub(crate) const EXTERNAL_DIRECTIVE_NAME: Name = name!("external");
pub(crate) const REQUIRES_DIRECTIVE_NAME: Name = name!("requires");
pub(crate) const PROVIDES_DIRECTIVE_NAME: Name = name!("provides");

pub(crate) const FEDERATION_DIRECTIVE_NAMES: [Name; 5] = [
    KEY_DIRECTIVE_NAME,
    EXTENDS_DIRECTIVE_NAME,
    EXTERNAL_DIRECTIVE_NAME,
    REQUIRES_DIRECTIVE_NAME,
    PROVIDES_DIRECTIVE_NAME,
];

pub(crate) const FEDERATION_SCALAR_NAMES: [Name; 2] = [ANY_SCALAR_NAME, FIELDSET_SCALAR_NAME];

/// Conventional root type names. A service may extend these without ever defining them.
pub(crate) const ROOT_TYPE_NAMES: [Name; 3] =
    [name!("Query"), name!("Mutation"), name!("Subscription")];

pub(crate) const QUERY_TYPE_NAME: Name = name!("Query");

const FEDERATION_DEFINITIONS_SDL: &str = r#"
scalar _Any
scalar _FieldSet

type _Service {
  sdl: String
}

directive @key(fields: _FieldSet!) repeatable on OBJECT | INTERFACE
directive @extends on OBJECT | INTERFACE
directive @external on OBJECT | FIELD_DEFINITION
directive @requires(fields: _FieldSet!) on FIELD_DEFINITION
directive @provides(fields: _FieldSet!) on FIELD_DEFINITION
"#;

static FEDERATION_DEFINITIONS: LazyLock<ast::Document> = LazyLock::new(|| {
    ast::Document::parse(FEDERATION_DEFINITIONS_SDL, "federation.graphql")
        .expect("Invalid federation definitions")
});

pub(crate) fn is_root_type_name(name: &str) -> bool {
    ROOT_TYPE_NAMES.iter().any(|root| root == name)
}

pub(crate) fn is_federation_directive_name(name: &str) -> bool {
    FEDERATION_DIRECTIVE_NAMES
        .iter()
        .any(|directive| directive == name)
}

/// Types the federation definitions provide, which an extension may extend without a stub.
pub(crate) fn is_federation_type_name(name: &str) -> bool {
    [SERVICE_TYPE]
        .iter()
        .chain(&FEDERATION_SCALAR_NAMES)
        .any(|federation_type| federation_type == name)
}

/// The federation definitions minus every type or directive whose name is in `declared`.
///
/// A source that brings its own `@key` or `_Any` keeps its own declaration.
pub(crate) fn missing_federation_definitions(declared: &IndexSet<Name>) -> ast::Document {
    let mut document = ast::Document::new();
    document.sources = FEDERATION_DEFINITIONS.sources.clone();
    document.definitions = FEDERATION_DEFINITIONS
        .definitions
        .iter()
        .filter(|definition| {
            definition
                .name()
                .is_none_or(|name| !declared.contains(name))
        })
        .cloned()
        .collect();
    document
}
