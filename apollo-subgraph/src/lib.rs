//! ## Usage
//!
//! Compose a subgraph's SDL with the Apollo Federation vocabulary (`@key`, `@extends`,
//! `@external`, `@requires`, `@provides`), then serve the `_entities` and `_service` fields a
//! gateway uses to plan queries across subgraphs.
//!
//! ```rust
//! use apollo_subgraph::SubgraphSchema;
//!
//! let schema = SubgraphSchema::parse(
//!     r#"
//!     extend type Query { topProducts: [Product] }
//!     type Product @key(fields: "upc") { upc: String! name: String }
//!     "#,
//!     "products.graphql",
//! )
//! .unwrap();
//! assert!(schema.entity_types().contains("Product"));
//! assert!(!schema.service().unwrap().sdl.contains("_entities"));
//! ```
//!
//! Types only ever declared with `extend` get an empty definition to extend, and a gateway's
//! view of a subgraph ([`SchemaMode::Gateway`]) treats root types as extensions of the
//! supergraph's.

#![warn(
    rustdoc::broken_intra_doc_links,
    unreachable_pub,
    unreachable_patterns,
    unused,
    unused_qualifications,
    dead_code,
    while_true,
    unconditional_panic,
    clippy::all
)]

pub mod compose;
pub mod error;
pub(crate) mod federation;
mod mode;
mod reflection;
pub mod resolvers;
mod schema;

pub use crate::compose::rules::CompositionContext;
pub use crate::compose::rules::CompositionRule;
pub use crate::compose::rules::default_composition_rules;
pub use crate::mode::SchemaMode;
pub use crate::resolvers::ReferenceContext;
pub use crate::resolvers::ReferenceResolver;
pub use crate::resolvers::Resolution;
pub use crate::resolvers::entities::EntitiesRequest;
pub use crate::resolvers::entities::EntitiesResponse;
pub use crate::resolvers::entities::EntitiesService;
pub use crate::resolvers::entities::EntityError;
pub use crate::resolvers::entities::ResolvedEntity;
pub use crate::resolvers::service::Service;
pub use crate::schema::SubgraphSchema;
pub use crate::schema::SubgraphSchemaBuilder;
