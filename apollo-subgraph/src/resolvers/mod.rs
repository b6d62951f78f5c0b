//! The `_entities` and `_service` query fields a federated service must serve.

use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::Schema;
use apollo_compiler::ast::FieldDefinition;
use apollo_compiler::ast::InputValueDefinition;
use apollo_compiler::ast::OperationType;
use apollo_compiler::collections::IndexSet;
use apollo_compiler::response::JsonMap;
use apollo_compiler::response::JsonValue;
use apollo_compiler::schema::Component;
use apollo_compiler::schema::ComponentName;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::schema::ObjectType;
use apollo_compiler::schema::UnionType;
use apollo_compiler::ty;
use futures::future::BoxFuture;
use tower::BoxError;
use tracing::debug;

use crate::federation::ENTITIES_QUERY;
use crate::federation::ENTITY_UNION_NAME;
use crate::federation::KEY_DIRECTIVE_NAME;
use crate::federation::REPRESENTATIONS_ARGUMENT;
use crate::federation::SERVICE_SDL_QUERY;

pub(crate) mod entities;
pub(crate) mod service;

/// What a reference resolver hands back: a value right away, or one that settles later.
pub enum Resolution {
    Ready(JsonValue),
    Pending(BoxFuture<'static, Result<JsonValue, BoxError>>),
}

impl Resolution {
    pub fn pending(
        future: impl Future<Output = Result<JsonValue, BoxError>> + Send + 'static,
    ) -> Self {
        Self::Pending(Box::pin(future))
    }
}

impl From<JsonValue> for Resolution {
    fn from(value: JsonValue) -> Self {
        Self::Ready(value)
    }
}

impl std::fmt::Debug for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Self::Pending(_) => f.write_str("Pending"),
        }
    }
}

/// Everything a reference resolver may want to know besides the representation itself.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceContext<'a> {
    /// Arguments of the `_entities` field.
    pub arguments: &'a JsonMap,
    /// Request-scoped data from the transport.
    pub extensions: &'a http::Extensions,
    /// The type declaring the field being resolved, the query root.
    pub parent_type: &'a Name,
    /// The field being resolved, `_entities`.
    pub field_name: &'a Name,
}

/// Turns an entity representation (`{"__typename": ..., <key fields>}`) into the entity.
///
/// Registered per object type. A type without one resolves to its representation unchanged.
pub trait ReferenceResolver: Send + Sync {
    fn resolve_reference(
        &self,
        representation: &JsonMap,
        context: &ReferenceContext<'_>,
    ) -> Result<Resolution, BoxError>;
}

impl<F> ReferenceResolver for F
where
    F: Fn(&JsonMap, &ReferenceContext<'_>) -> Result<Resolution, BoxError> + Send + Sync,
{
    fn resolve_reference(
        &self,
        representation: &JsonMap,
        context: &ReferenceContext<'_>,
    ) -> Result<Resolution, BoxError> {
        self(representation, context)
    }
}

/// Object types carrying `@key`, on their definition or on any of their extensions.
pub(crate) fn discover_entities(schema: &Schema) -> IndexSet<Name> {
    let entities: IndexSet<Name> = schema
        .types
        .iter()
        .filter(|(_, ty)| {
            matches!(ty, ExtendedType::Object(object) if object.directives.has(&KEY_DIRECTIVE_NAME))
        })
        .map(|(name, _)| name.clone())
        .collect();
    debug!(count = entities.len(), "discovered entity types");
    entities
}

pub(crate) fn query_root(schema: &Schema) -> Option<&Node<ObjectType>> {
    schema
        .root_operation(OperationType::Query)
        .and_then(|name| schema.get_object(name))
}

/// Whether the query root serves `field_name`.
pub(crate) fn has_query_field(schema: &Schema, field_name: &Name) -> bool {
    query_root(schema).is_some_and(|query| query.fields.contains_key(field_name))
}

/// Add `_service`, plus `_entities` and the `_Entity` union when there is at least one entity.
///
/// Nothing the schema already declares is replaced.
pub(crate) fn add_federation_fields(schema: &mut Schema, entities: &IndexSet<Name>) {
    if !entities.is_empty() {
        schema
            .types
            .entry(ENTITY_UNION_NAME)
            .or_insert_with(|| entity_union_definition(entities));
    }
    let Some(query_type_name) = schema
        .schema_definition
        .query
        .as_ref()
        .map(|query| query.name.clone())
    else {
        return;
    };
    // a query root that is not an object type is reported by schema validation
    if let Some(ExtendedType::Object(query_type)) = schema.types.get_mut(&query_type_name) {
        let query_type = query_type.make_mut();
        query_type
            .fields
            .entry(SERVICE_SDL_QUERY)
            .or_insert_with(service_sdl_query_field);
        if !entities.is_empty() {
            // _entities(representations: [_Any!]!): [_Entity]!
            query_type
                .fields
                .entry(ENTITIES_QUERY)
                .or_insert_with(entities_query_field);
        }
    }
}

fn entity_union_definition(entities: &IndexSet<Name>) -> ExtendedType {
    ExtendedType::Union(Node::new(UnionType {
        description: None,
        name: ENTITY_UNION_NAME,
        directives: Default::default(),
        members: entities
            .iter()
            .map(|entity| ComponentName::from(entity.clone()))
            .collect(),
    }))
}

fn service_sdl_query_field() -> Component<FieldDefinition> {
    Component::new(FieldDefinition {
        description: None,
        name: SERVICE_SDL_QUERY,
        arguments: Vec::new(),
        ty: ty!(_Service!),
        directives: Default::default(),
    })
}

fn entities_query_field() -> Component<FieldDefinition> {
    Component::new(FieldDefinition {
        description: None,
        name: ENTITIES_QUERY,
        arguments: vec![Node::new(InputValueDefinition {
            description: None,
            name: REPRESENTATIONS_ARGUMENT,
            ty: ty!([_Any!]!).into(),
            default_value: None,
            directives: Default::default(),
        })],
        ty: ty!([_Entity]!),
        directives: Default::default(),
    })
}
