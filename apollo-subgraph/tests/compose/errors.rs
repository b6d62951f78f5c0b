use apollo_subgraph::SubgraphSchema;
use apollo_subgraph::error::FederationError;
use apollo_subgraph::error::SingleFederationError;

fn build_for_errors(schema: &str) -> FederationError {
    SubgraphSchema::parse(schema, "schema.graphql").expect_err("composition should fail")
}

#[test]
fn a_single_violation_is_raised_as_itself() {
    let error = build_for_errors(
        r#"
        type Query { a: Int }
        type Product { upc: String }
        extend type Product { upc: String }
        "#,
    );
    let FederationError::SingleFederationError(SingleFederationError::DuplicateFieldDefinition {
        type_name,
        field_name,
    }) = &error
    else {
        panic!("expected a duplicate field error, got {error:?}");
    };
    assert_eq!(type_name.as_str(), "Product");
    assert_eq!(field_name.as_str(), "upc");
    insta::assert_snapshot!(error.to_string(), @r###"Field "Product.upc" already exists in the schema. It cannot also be defined in this type extension."###);
}

#[test]
fn several_violations_are_raised_together() {
    let error = build_for_errors(
        r#"
        type Query { a: Int }
        interface Node { id: ID }
        extend type Query { a: Int }
        extend type Node { name: String }
        extend type Query { author: Author }
        "#,
    );
    assert!(matches!(error, FederationError::MultipleFederationErrors(_)));
    let codes: Vec<_> = error.errors().iter().map(|e| e.code()).collect();
    assert_eq!(
        codes,
        [
            "EXTENSION_WITH_INVALID_KIND",
            "DUPLICATE_FIELD_DEFINITION",
            "UNKNOWN_TYPE",
        ]
    );
    insta::assert_snapshot!(error.to_string(), @r###"
    The following errors occurred:
      - Cannot extend non-object type "Node".
      - Field "Query.a" already exists in the schema. It cannot also be defined in this type extension.
      - Unknown type "Author".
    "###);
}

#[test]
fn errors_abort_the_build_before_any_schema_is_returned() {
    let error = build_for_errors(
        r#"
        type Query { a: Int }
        extend type Product @unknown { upc: String }
        "#,
    );
    assert!(matches!(
        error,
        FederationError::SingleFederationError(SingleFederationError::UnknownDirective { .. })
    ));
}

#[test]
fn malformed_sources_are_reported_as_invalid_graphql() {
    let error = build_for_errors("type Query { a: Int");
    assert!(error.has_invalid_graphql_error());
}

#[test]
fn base_definitions_get_ordinary_validation() {
    let error = build_for_errors("type Query { product: Product }");
    assert!(error.has_invalid_graphql_error());
}
