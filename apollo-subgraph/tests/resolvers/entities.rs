use std::sync::Arc;
use std::time::Duration;

use apollo_compiler::response::JsonMap;
use apollo_compiler::response::JsonValue;
use apollo_subgraph::EntitiesRequest;
use apollo_subgraph::EntitiesService;
use apollo_subgraph::EntityError;
use apollo_subgraph::ReferenceContext;
use apollo_subgraph::Resolution;
use apollo_subgraph::SubgraphSchema;
use apollo_subgraph::SubgraphSchemaBuilder;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json_bytes::json;
use tower::BoxError;
use tower::ServiceExt;

const SCHEMA: &str = r#"
    type Query {
      topProducts: [Product]
    }

    type Product @key(fields: "upc") {
      upc: String!
      name: String
    }

    extend type User @key(fields: "id") {
      id: ID! @external
      reviews: [String]
    }

    interface Node {
      id: ID!
    }

    type Review implements Node {
      id: ID!
    }
"#;

fn upc(representation: &JsonMap) -> String {
    representation
        .get("upc")
        .and_then(|upc| upc.as_str())
        .unwrap_or_default()
        .to_owned()
}

/// Products with an odd upc settle later than the others.
fn resolve_product(
    representation: &JsonMap,
    _context: &ReferenceContext<'_>,
) -> Result<Resolution, BoxError> {
    let upc = upc(representation);
    let odd = upc.parse::<u32>().map(|n| n % 2 == 1).unwrap_or(false);
    let product = json!({ "upc": upc, "name": format!("product {upc}") });
    if odd {
        Ok(Resolution::pending(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok(product)
        }))
    } else {
        Ok(product.into())
    }
}

fn builder() -> SubgraphSchemaBuilder {
    SubgraphSchema::builder()
        .parse(SCHEMA, "products.graphql")
        .reference_resolver("Product", resolve_product)
}

fn products(upcs: &[&str]) -> Vec<JsonValue> {
    upcs.iter()
        .map(|upc| json!({ "__typename": "Product", "upc": upc }))
        .collect()
}

#[rstest]
#[case::none(&[])]
#[case::one(&["1"])]
#[case::many(&["1", "2", "3", "4", "5"])]
#[case::deferred_first(&["9", "8"])]
#[tokio::test]
async fn results_match_representations_in_order(#[case] upcs: &[&str]) {
    let schema = builder().build().unwrap();
    let response = schema
        .resolve_entities(&EntitiesRequest::new(products(upcs)))
        .await
        .unwrap();

    assert_eq!(response.len(), upcs.len());
    for (result, upc) in response.iter().zip(upcs) {
        let entity = result.as_ref().unwrap();
        assert_eq!(entity.typename.as_str(), "Product");
        assert_eq!(entity.value, json!({ "upc": upc, "name": format!("product {upc}") }));
    }
}

#[tokio::test]
async fn unknown_types_fail_alone() {
    let schema = builder().build().unwrap();
    let request = EntitiesRequest::new(vec![
        json!({ "__typename": "Product", "upc": "1" }),
        json!({ "__typename": "Missing", "id": "1" }),
        json!({ "__typename": "Node", "id": "1" }),
        json!({ "upc": "2" }),
        json!({ "__typename": "Product", "upc": "2" }),
    ]);
    let response = schema.resolve_entities(&request).await.unwrap();

    assert_eq!(response.len(), 5);
    assert!(response[0].is_ok());
    assert!(matches!(
        &response[1],
        Err(EntityError::UnknownEntityType { typename }) if typename == "Missing"
    ));
    // interfaces are not object types
    assert!(matches!(
        &response[2],
        Err(EntityError::UnknownEntityType { typename }) if typename == "Node"
    ));
    assert!(matches!(&response[3], Err(EntityError::MissingTypename)));
    assert!(response[4].is_ok());

    let Err(error) = &response[1] else {
        unreachable!()
    };
    assert_eq!(
        error.to_graphql_error(1),
        json!({
            "message": "The _entities resolver tried to load an entity for type \"Missing\", but no object type of that name was found in the schema",
            "path": ["_entities", 1],
            "extensions": { "code": "UNKNOWN_ENTITY_TYPE" },
        })
    );
}

#[tokio::test]
async fn types_without_a_resolver_return_the_representation() {
    let schema = builder().build().unwrap();
    let representation = json!({ "__typename": "User", "id": "u1" });
    let response = schema
        .resolve_entities(&EntitiesRequest::new(vec![representation.clone()]))
        .await
        .unwrap();
    let entity = response[0].as_ref().unwrap();
    assert_eq!(entity.typename.as_str(), "User");
    assert_eq!(entity.value, representation);
}

#[tokio::test]
async fn resolver_failures_are_per_representation() {
    let schema = builder()
        .reference_resolver(
            "User",
            |representation: &JsonMap, _context: &ReferenceContext<'_>| -> Result<Resolution, BoxError> {
                match representation.get("id").and_then(|id| id.as_str()) {
                    Some("now") => Err("user service is down".into()),
                    Some("later") => Ok(Resolution::pending(async {
                        Err::<JsonValue, BoxError>("user service timed out".into())
                    })),
                    _ => Ok(json!({ "id": "ok" }).into()),
                }
            },
        )
        .build()
        .unwrap();
    let request = EntitiesRequest::new(vec![
        json!({ "__typename": "User", "id": "now" }),
        json!({ "__typename": "User", "id": "later" }),
        json!({ "__typename": "User", "id": "fine" }),
    ]);
    let response = schema.resolve_entities(&request).await.unwrap();

    let messages: Vec<_> = response
        .iter()
        .map(|result| match result {
            Ok(entity) => serde_json::to_string(&entity.value).unwrap(),
            Err(error) => error.to_string(),
        })
        .collect();
    assert_eq!(
        messages,
        [
            r#"Failed to resolve reference for type "User": user service is down"#,
            r#"Failed to resolve reference for type "User": user service timed out"#,
            r#"{"id":"ok"}"#,
        ]
    );
    assert!(matches!(
        &response[1],
        Err(error) if error.code() == "REFERENCE_RESOLVER_FAILED"
    ));
}

#[derive(Clone)]
struct Tenant(&'static str);

#[tokio::test]
async fn resolvers_see_the_request_context() {
    let schema = SubgraphSchema::builder()
        .parse(
            r#"
            schema { query: Root }
            type Root { product: Product }
            type Product @key(fields: "upc") { upc: String! tenant: String }
            "#,
            "products.graphql",
        )
        .reference_resolver(
            "Product",
            |representation: &JsonMap, context: &ReferenceContext<'_>| -> Result<Resolution, BoxError> {
                assert_eq!(context.parent_type.as_str(), "Root");
                assert_eq!(context.field_name.as_str(), "_entities");
                assert!(context.arguments.contains_key("representations"));
                let tenant = context
                    .extensions
                    .get::<Tenant>()
                    .ok_or("no tenant in the request")?;
                Ok(json!({ "upc": representation.get("upc").cloned(), "tenant": tenant.0 }).into())
            },
        )
        .build()
        .unwrap();

    let mut extensions = http::Extensions::new();
    extensions.insert(Tenant("acme"));
    let request = EntitiesRequest::new(vec![json!({ "__typename": "Product", "upc": "1" })])
        .with_extensions(extensions);
    let response = schema.resolve_entities(&request).await.unwrap();
    assert_eq!(
        response[0].as_ref().unwrap().value,
        json!({ "upc": "1", "tenant": "acme" })
    );
}

#[tokio::test]
async fn entities_service_serves_a_shared_schema() {
    let service = EntitiesService::new(Arc::new(builder().build().unwrap()));

    let response = service
        .clone()
        .oneshot(EntitiesRequest::new(products(&["1", "2"])))
        .await
        .unwrap();
    assert_eq!(response.len(), 2);

    let mut arguments = JsonMap::new();
    arguments.insert("representations", json!(products(&["3"])));
    let request = EntitiesRequest::from_arguments(arguments).unwrap();
    let response = service.oneshot(request).await.unwrap();
    assert_eq!(
        response[0].as_ref().unwrap().value,
        json!({ "upc": "3", "name": "product 3" })
    );
}
