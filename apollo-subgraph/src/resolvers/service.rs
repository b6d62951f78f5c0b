use apollo_compiler::Name;
use apollo_compiler::Schema;
use apollo_compiler::collections::IndexSet;
use serde::Deserialize;
use serde::Serialize;

use crate::error::FederationError;
use crate::error::SingleFederationError;
use crate::federation::SERVICE_SDL_QUERY;
use crate::reflection::service_sdl;
use crate::resolvers::has_query_field;

/// The value of the `_service` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub sdl: String,
}

/// Resolve `_service`, reflecting the schema at call time.
pub(crate) fn resolve_service(
    schema: &Schema,
    stub_types: &IndexSet<Name>,
) -> Result<Service, FederationError> {
    if !has_query_field(schema, &SERVICE_SDL_QUERY) {
        return Err(SingleFederationError::MissingFederationField {
            field_name: SERVICE_SDL_QUERY,
        }
        .into());
    }
    Ok(Service {
        sdl: service_sdl(schema, stub_types)?,
    })
}
