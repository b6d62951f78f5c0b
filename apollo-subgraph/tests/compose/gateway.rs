use apollo_compiler::schema::ComponentOrigin;
use apollo_compiler::schema::ExtendedType;
use apollo_subgraph::EntitiesRequest;
use apollo_subgraph::SchemaMode;
use apollo_subgraph::SubgraphSchema;
use apollo_subgraph::error::FederationError;
use apollo_subgraph::error::SingleFederationError;
use pretty_assertions::assert_eq;
use serde_json_bytes::json;

use super::field_names;

const REVIEWS: &str = r#"
    type Query {
      topReviews: [Review]
    }

    type Review @key(fields: "id") {
      id: ID!
      body: String
      author: User
    }

    extend type User @key(fields: "id") {
      id: ID! @external
      username: String @external
      reviews: [Review]
    }
"#;

fn gateway() -> SubgraphSchema {
    SubgraphSchema::builder()
        .mode(SchemaMode::Gateway)
        .parse(REVIEWS, "reviews.graphql")
        .build()
        .unwrap()
}

#[test]
fn external_fields_are_dropped() {
    let schema = gateway();
    assert_eq!(field_names(schema.schema(), "User"), ["reviews"]);
    assert!(schema.stub_types().contains("User"));
}

#[test]
fn external_fields_are_kept_by_services() {
    let schema = SubgraphSchema::parse(REVIEWS, "reviews.graphql").unwrap();
    assert_eq!(
        field_names(schema.schema(), "User"),
        ["id", "reviews", "username"]
    );
}

#[test]
fn root_types_are_extensions() {
    let schema = gateway();
    let Some(ExtendedType::Object(query)) = schema.schema().types.get("Query") else {
        panic!("expected a Query object type");
    };
    let top_reviews = &query.fields["topReviews"];
    assert!(matches!(
        top_reviews.origin,
        ComponentOrigin::Extension(_)
    ));
}

#[test]
fn no_federation_fields_are_served() {
    let schema = gateway();
    assert_eq!(field_names(schema.schema(), "Query"), ["topReviews"]);
    assert!(!schema.schema().types.contains_key("_Entity"));
    assert!(schema.entity_types().contains("Review"));

    let error = schema.service().unwrap_err();
    assert!(matches!(
        error,
        FederationError::SingleFederationError(
            SingleFederationError::MissingFederationField { .. }
        )
    ));
}

#[tokio::test]
async fn entities_are_not_resolved() {
    let schema = gateway();
    let request = EntitiesRequest::new(vec![json!({ "__typename": "Review", "id": "1" })]);
    let error = schema.resolve_entities(&request).await.unwrap_err();
    assert_eq!(error.errors()[0].code(), "MISSING_FEDERATION_FIELD");
}

#[test]
fn sources_without_a_query_root_get_an_empty_one() {
    let schema = SubgraphSchema::builder()
        .mode(SchemaMode::Gateway)
        .parse(
            r#"type Product @key(fields: "upc") { upc: String! }"#,
            "products.graphql",
        )
        .build()
        .unwrap();
    let query = schema.schema().schema_definition.query.as_ref().unwrap();
    assert_eq!(query.name.as_str(), "Query");
    assert!(field_names(schema.schema(), "Query").is_empty());
    assert!(schema.stub_types().is_empty());
}

#[test]
fn reference_only_extensions_compose() {
    let schema = SubgraphSchema::builder()
        .mode(SchemaMode::Gateway)
        .parse(
            r#"
            extend type Query { me: User }
            extend type User @key(fields: "id") { id: ID! @external }
            "#,
            "accounts.graphql",
        )
        .build()
        .unwrap();
    assert!(field_names(schema.schema(), "User").is_empty());
    assert_eq!(field_names(schema.schema(), "Query"), ["me"]);
    assert!(schema.entity_types().contains("User"));
}

#[test]
fn gateway_composition_rules_still_apply() {
    let error = SubgraphSchema::builder()
        .mode(SchemaMode::Gateway)
        .parse(
            r#"
            type Product { upc: String }
            extend type Product { upc: String }
            "#,
            "products.graphql",
        )
        .build()
        .unwrap_err();
    assert!(matches!(
        error,
        FederationError::SingleFederationError(
            SingleFederationError::DuplicateFieldDefinition { .. }
        )
    ));
}
