//! Printing a composed schema back as the SDL its owner could have written by hand.

use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::Schema;
use apollo_compiler::ast;
use apollo_compiler::ast::Definition;
use apollo_compiler::ast::OperationType;
use apollo_compiler::collections::IndexMap;
use apollo_compiler::collections::IndexSet;

use crate::compose::classify::TypeKind;
use crate::compose::classify::type_description;
use crate::error::FederationError;
use crate::federation::ENTITIES_QUERY;
use crate::federation::ENTITY_UNION_NAME;
use crate::federation::EXTENDS_DIRECTIVE_NAME;
use crate::federation::SERVICE_SDL_QUERY;
use crate::federation::is_federation_directive_name;
use crate::federation::is_federation_type_name;
use crate::resolvers::query_root;

struct ReflectionFilter<'a> {
    stub_types: &'a IndexSet<Name>,
    /// Descriptions of `@extends` definitions, carried by their stubs.
    stub_descriptions: IndexMap<Name, Node<str>>,
    query_type: Option<&'a Name>,
    /// Whether the query root keeps any field once federation fields are gone.
    keep_query: bool,
}

/// The schema as SDL, without the federation vocabulary, the federation query fields, or the
/// stubs composition synthesized.
pub(crate) fn service_sdl(
    schema: &Schema,
    stub_types: &IndexSet<Name>,
) -> Result<String, FederationError> {
    let printed = ast::Document::parse(schema.to_string(), "service.graphql")?;
    let query = query_root(schema);
    let filter = ReflectionFilter {
        stub_types,
        stub_descriptions: printed
            .definitions
            .iter()
            .filter_map(|definition| {
                let name = definition.name().filter(|name| stub_types.contains(*name))?;
                Some((name.clone(), type_description(definition)?.clone()))
            })
            .collect(),
        query_type: query.map(|query| &query.name),
        keep_query: query.is_some_and(|query| {
            query
                .fields
                .values()
                .any(|field| !is_federation_field(&field.name))
        }),
    };

    let mut reflected = ast::Document::new();
    reflected.definitions = printed
        .definitions
        .iter()
        .filter_map(|definition| filter.reflect(definition))
        .collect();
    Ok(reflected.to_string())
}

fn is_federation_field(name: &Name) -> bool {
    *name == SERVICE_SDL_QUERY || *name == ENTITIES_QUERY
}

impl ReflectionFilter<'_> {
    fn reflect(&self, definition: &Definition) -> Option<Definition> {
        match definition {
            Definition::DirectiveDefinition(def) if is_federation_directive_name(&def.name) => {
                None
            }
            _ if TypeKind::of(definition).is_some()
                && definition.name().is_some_and(|name| is_federation_type_name(name)) =>
            {
                None
            }
            Definition::UnionTypeDefinition(def) if def.name == ENTITY_UNION_NAME => None,
            Definition::ObjectTypeDefinition(def) if self.is_query(&def.name) => {
                self.reflect_query_definition(def)
            }
            Definition::ObjectTypeExtension(ext) if self.is_query(&ext.name) => {
                self.reflect_query_extension(ext)
            }
            Definition::ObjectTypeExtension(ext) if ext.directives.has(&EXTENDS_DIRECTIVE_NAME) => {
                Some(self.object_written_with_extends(ext))
            }
            Definition::InterfaceTypeExtension(ext)
                if ext.directives.has(&EXTENDS_DIRECTIVE_NAME) =>
            {
                Some(self.interface_written_with_extends(ext))
            }
            Definition::SchemaDefinition(def) => self.reflect_schema_definition(def),
            Definition::SchemaExtension(ext) => self.reflect_schema_extension(ext),
            _ if self.is_empty_stub(definition) => None,
            _ => Some(definition.clone()),
        }
    }

    fn is_query(&self, name: &Name) -> bool {
        self.query_type == Some(name)
    }

    /// An extension tagged `@extends` was written as a definition, and is printed as one again.
    fn object_written_with_extends(&self, ext: &Node<ast::ObjectTypeExtension>) -> Definition {
        Definition::ObjectTypeDefinition(ext.same_location(ast::ObjectTypeDefinition {
            description: self.stub_descriptions.get(&ext.name).cloned(),
            name: ext.name.clone(),
            implements_interfaces: ext.implements_interfaces.clone(),
            directives: ext.directives.clone(),
            fields: ext.fields.clone(),
        }))
    }

    fn interface_written_with_extends(
        &self,
        ext: &Node<ast::InterfaceTypeExtension>,
    ) -> Definition {
        Definition::InterfaceTypeDefinition(ext.same_location(ast::InterfaceTypeDefinition {
            description: self.stub_descriptions.get(&ext.name).cloned(),
            name: ext.name.clone(),
            implements_interfaces: ext.implements_interfaces.clone(),
            directives: ext.directives.clone(),
            fields: ext.fields.clone(),
        }))
    }

    fn is_empty_stub(&self, definition: &Definition) -> bool {
        let Some(name) = definition.name() else {
            return false;
        };
        if !self.stub_types.contains(name) {
            return false;
        }
        match definition {
            Definition::ScalarTypeDefinition(def) => def.directives.is_empty(),
            Definition::ObjectTypeDefinition(def) => {
                def.fields.is_empty()
                    && def.directives.is_empty()
                    && def.implements_interfaces.is_empty()
            }
            Definition::InterfaceTypeDefinition(def) => {
                def.fields.is_empty()
                    && def.directives.is_empty()
                    && def.implements_interfaces.is_empty()
            }
            Definition::UnionTypeDefinition(def) => {
                def.members.is_empty() && def.directives.is_empty()
            }
            Definition::EnumTypeDefinition(def) => {
                def.values.is_empty() && def.directives.is_empty()
            }
            Definition::InputObjectTypeDefinition(def) => {
                def.fields.is_empty() && def.directives.is_empty()
            }
            _ => false,
        }
    }

    fn reflect_query_definition(&self, def: &Node<ast::ObjectTypeDefinition>) -> Option<Definition> {
        if !self.keep_query {
            return None;
        }
        let fields: Vec<_> = def
            .fields
            .iter()
            .filter(|field| !is_federation_field(&field.name))
            .cloned()
            .collect();
        if fields.is_empty() && def.directives.is_empty() && def.implements_interfaces.is_empty() {
            return None;
        }
        Some(Definition::ObjectTypeDefinition(def.same_location(
            ast::ObjectTypeDefinition {
                description: def.description.clone(),
                name: def.name.clone(),
                implements_interfaces: def.implements_interfaces.clone(),
                directives: def.directives.clone(),
                fields,
            },
        )))
    }

    fn reflect_query_extension(&self, ext: &Node<ast::ObjectTypeExtension>) -> Option<Definition> {
        if !self.keep_query {
            return None;
        }
        let fields: Vec<_> = ext
            .fields
            .iter()
            .filter(|field| !is_federation_field(&field.name))
            .cloned()
            .collect();
        if fields.is_empty() && ext.directives.is_empty() && ext.implements_interfaces.is_empty() {
            return None;
        }
        Some(Definition::ObjectTypeExtension(ext.same_location(
            ast::ObjectTypeExtension {
                name: ext.name.clone(),
                implements_interfaces: ext.implements_interfaces.clone(),
                directives: ext.directives.clone(),
                fields,
            },
        )))
    }

    fn root_operations(
        &self,
        root_operations: &[Node<(OperationType, Name)>],
    ) -> Vec<Node<(OperationType, Name)>> {
        root_operations
            .iter()
            .filter(|root| self.keep_query || root.0 != OperationType::Query)
            .cloned()
            .collect()
    }

    /// A schema definition that only names the conventional roots says nothing and is dropped.
    fn reflect_schema_definition(&self, def: &Node<ast::SchemaDefinition>) -> Option<Definition> {
        let root_operations = self.root_operations(&def.root_operations);
        let implied = root_operations
            .iter()
            .all(|root| root.1 == root.0.default_type_name());
        if def.description.is_none() && def.directives.is_empty() && implied {
            return None;
        }
        Some(Definition::SchemaDefinition(def.same_location(
            ast::SchemaDefinition {
                description: def.description.clone(),
                directives: def.directives.clone(),
                root_operations,
            },
        )))
    }

    fn reflect_schema_extension(&self, ext: &Node<ast::SchemaExtension>) -> Option<Definition> {
        let root_operations = self.root_operations(&ext.root_operations);
        if root_operations.is_empty() && ext.directives.is_empty() {
            return None;
        }
        Some(Definition::SchemaExtension(ext.same_location(
            ast::SchemaExtension {
                directives: ext.directives.clone(),
                root_operations,
            },
        )))
    }
}
