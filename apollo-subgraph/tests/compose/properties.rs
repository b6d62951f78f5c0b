use apollo_compiler::Schema;
use apollo_subgraph::SchemaMode;
use apollo_subgraph::SubgraphSchema;
use pretty_assertions::assert_eq;
use rstest::rstest;

use super::field_names;
use super::observable_members;

const PRODUCTS: &str = r#"
    extend type Query {
      topProducts(first: Int = 5): [Product]
    }

    type Product @key(fields: "upc") {
      upc: String!
      name: String
      price: Int
      category: Category
    }

    enum Category {
      BOOKS
      GAMES
    }

    extend enum Category {
      TOYS
    }

    extend type Review @key(fields: "id") {
      id: ID! @external
      product: Product
    }

    input ProductFilter {
      category: Category
    }

    union SearchResult = Product
"#;

fn is_federation_type(name: &str) -> bool {
    name.starts_with('_')
}

fn user_types(schema: &Schema) -> Vec<(String, Vec<String>)> {
    let mut types: Vec<_> = schema
        .types
        .iter()
        .filter(|(name, ty)| !ty.is_built_in() && !is_federation_type(name))
        .map(|(name, ty)| (name.to_string(), observable_members(ty)))
        .collect();
    types.sort();
    types
}

#[test]
fn sources_without_extensions_compose_to_the_plain_schema() {
    let sdl = r#"
        directive @key(fields: String!) repeatable on OBJECT | INTERFACE
        type Query { product(upc: String!): Product }
        type Product @key(fields: "upc") { upc: String! name: String }
        enum Currency { EUR USD }
    "#;
    let composed = SubgraphSchema::parse(sdl, "products.graphql").unwrap();
    let plain = Schema::parse_and_validate(sdl, "products.graphql").unwrap();

    assert!(composed.stub_types().is_empty());
    for (name, ty) in &plain.types {
        if name == "Query" {
            continue;
        }
        assert_eq!(composed.schema().types.get(name), Some(ty), "{name}");
    }
    let query: Vec<_> = field_names(composed.schema(), "Query")
        .into_iter()
        .filter(|field| !field.starts_with('_'))
        .collect();
    assert_eq!(query, field_names(&plain, "Query"));
}

#[test]
fn reflected_sdl_composes_to_the_same_fields() {
    let first = SubgraphSchema::parse(PRODUCTS, "products.graphql").unwrap();
    let sdl = first.service().unwrap().sdl;
    let second = SubgraphSchema::parse(&sdl, "service.graphql").unwrap();

    assert_eq!(user_types(first.schema()), user_types(second.schema()));
    assert_eq!(first.stub_types(), second.stub_types());
    assert_eq!(first.entity_types(), second.entity_types());
}

#[rstest]
fn composition_is_idempotent(#[values(SchemaMode::Service, SchemaMode::Gateway)] mode: SchemaMode) {
    let build = || {
        SubgraphSchema::builder()
            .mode(mode)
            .parse(PRODUCTS, "products.graphql")
            .build()
            .unwrap()
    };
    let (first, second) = (build(), build());
    assert_eq!(first.schema().to_string(), second.schema().to_string());
    assert_eq!(user_types(first.schema()), user_types(second.schema()));
    if mode == SchemaMode::Service {
        assert_eq!(first.service().unwrap(), second.service().unwrap());
    }
}
