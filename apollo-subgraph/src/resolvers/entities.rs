use std::sync::Arc;
use std::task::Poll;

use apollo_compiler::Name;
use apollo_compiler::Schema;
use apollo_compiler::collections::IndexMap;
use apollo_compiler::response::JsonMap;
use apollo_compiler::response::JsonValue;
use apollo_compiler::schema::ExtendedType;
use futures::future::BoxFuture;
use futures::future::join_all;
use serde_json_bytes::json;
use tower::BoxError;
use tracing::debug;

use crate::SubgraphSchema;
use crate::error::FederationError;
use crate::error::SingleFederationError;
use crate::federation::ENTITIES_QUERY;
use crate::federation::REPRESENTATIONS_ARGUMENT;
use crate::federation::TYPENAME_FIELD;
use crate::resolvers::ReferenceContext;
use crate::resolvers::ReferenceResolver;
use crate::resolvers::Resolution;
use crate::resolvers::query_root;

/// The input of an `_entities` field.
#[derive(Debug, Clone, Default)]
pub struct EntitiesRequest {
    pub representations: Vec<JsonValue>,
    /// Every argument of the field, `representations` included.
    pub arguments: JsonMap,
    pub extensions: http::Extensions,
}

impl EntitiesRequest {
    pub fn new(representations: Vec<JsonValue>) -> Self {
        let mut arguments = JsonMap::new();
        arguments.insert(
            REPRESENTATIONS_ARGUMENT.as_str(),
            JsonValue::Array(representations.clone()),
        );
        Self {
            representations,
            arguments,
            extensions: http::Extensions::default(),
        }
    }

    /// Read the representations out of the field arguments.
    pub fn from_arguments(arguments: JsonMap) -> Result<Self, FederationError> {
        let Some(JsonValue::Array(representations)) = arguments.get(REPRESENTATIONS_ARGUMENT.as_str())
        else {
            return Err(SingleFederationError::InvalidGraphQL {
                message: format!(
                    r#"Argument "{REPRESENTATIONS_ARGUMENT}" of "{ENTITIES_QUERY}" must be a list"#
                ),
            }
            .into());
        };
        Ok(Self {
            representations: representations.clone(),
            arguments,
            extensions: http::Extensions::default(),
        })
    }

    pub fn with_extensions(mut self, extensions: http::Extensions) -> Self {
        self.extensions = extensions;
        self
    }
}

/// A successfully resolved entity, paired with the type its representation named.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntity {
    pub typename: Name,
    pub value: JsonValue,
}

/// Why a single representation could not be resolved. Sibling representations are unaffected.
#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    #[error("Representation must be an object with a string __typename")]
    MissingTypename,
    #[error(
        r#"The _entities resolver tried to load an entity for type "{typename}", but no object type of that name was found in the schema"#
    )]
    UnknownEntityType { typename: String },
    #[error(r#"Failed to resolve reference for type "{typename}": {source}"#)]
    ResolverFailed {
        typename: Name,
        #[source]
        source: BoxError,
    },
}

impl EntityError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingTypename => "INVALID_REPRESENTATION",
            Self::UnknownEntityType { .. } => "UNKNOWN_ENTITY_TYPE",
            Self::ResolverFailed { .. } => "REFERENCE_RESOLVER_FAILED",
        }
    }

    /// A GraphQL error for the representation at `index`.
    pub fn to_graphql_error(&self, index: usize) -> JsonValue {
        json!({
            "message": self.to_string(),
            "path": [ENTITIES_QUERY.as_str(), index],
            "extensions": { "code": self.code() },
        })
    }
}

pub type EntitiesResponse = Vec<Result<ResolvedEntity, EntityError>>;

/// Resolve every representation, concurrently, into a list in the same order.
pub(crate) async fn resolve_entities(
    schema: &Schema,
    resolvers: &IndexMap<String, Arc<dyn ReferenceResolver>>,
    request: &EntitiesRequest,
) -> Result<EntitiesResponse, FederationError> {
    let Some(query_type) = query_root(schema).filter(|query| query.fields.contains_key(&ENTITIES_QUERY))
    else {
        return Err(SingleFederationError::MissingFederationField {
            field_name: ENTITIES_QUERY,
        }
        .into());
    };
    let context = ReferenceContext {
        arguments: &request.arguments,
        extensions: &request.extensions,
        parent_type: &query_type.name,
        field_name: &ENTITIES_QUERY,
    };
    debug!(
        representations = request.representations.len(),
        "resolving entities"
    );
    Ok(join_all(
        request
            .representations
            .iter()
            .map(|representation| resolve_entity(schema, resolvers, representation, &context)),
    )
    .await)
}

async fn resolve_entity(
    schema: &Schema,
    resolvers: &IndexMap<String, Arc<dyn ReferenceResolver>>,
    representation: &JsonValue,
    context: &ReferenceContext<'_>,
) -> Result<ResolvedEntity, EntityError> {
    let object = representation
        .as_object()
        .ok_or(EntityError::MissingTypename)?;
    let typename = object
        .get(TYPENAME_FIELD.as_str())
        .and_then(|typename| typename.as_str())
        .ok_or(EntityError::MissingTypename)?;
    let typename = match schema.types.get_key_value(typename) {
        Some((name, ExtendedType::Object(_))) => name.clone(),
        _ => {
            return Err(EntityError::UnknownEntityType {
                typename: typename.to_owned(),
            });
        }
    };

    let Some(resolver) = resolvers.get(typename.as_str()) else {
        return Ok(ResolvedEntity {
            typename,
            value: representation.clone(),
        });
    };
    let resolution = match resolver.resolve_reference(object, context) {
        Ok(resolution) => resolution,
        Err(source) => return Err(EntityError::ResolverFailed { typename, source }),
    };
    let value = match resolution {
        Resolution::Ready(value) => value,
        Resolution::Pending(pending) => match pending.await {
            Ok(value) => value,
            Err(source) => return Err(EntityError::ResolverFailed { typename, source }),
        },
    };
    Ok(ResolvedEntity { typename, value })
}

/// Serves `_entities` for a shared [`SubgraphSchema`].
#[derive(Clone, Debug)]
pub struct EntitiesService {
    schema: Arc<SubgraphSchema>,
}

impl EntitiesService {
    pub fn new(schema: Arc<SubgraphSchema>) -> Self {
        Self { schema }
    }
}

impl tower::Service<EntitiesRequest> for EntitiesService {
    type Response = EntitiesResponse;
    type Error = FederationError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut std::task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: EntitiesRequest) -> Self::Future {
        let schema = self.schema.clone();
        Box::pin(async move { schema.resolve_entities(&request).await })
    }
}
