use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::ast;
use apollo_compiler::ast::Definition;
use apollo_compiler::collections::IndexMap;
use apollo_compiler::collections::IndexSet;
use tracing::debug;
use tracing::warn;

use crate::compose::classify::ExtensionRecord;
use crate::compose::classify::TypeKind;
use crate::compose::classify::is_extension_by_directive;
use crate::compose::classify::is_type_extension;
use crate::compose::classify::to_extension;
use crate::compose::classify::type_description;
use crate::federation::EXTERNAL_DIRECTIVE_NAME;
use crate::federation::is_federation_type_name;
use crate::federation::is_root_type_name;
use crate::mode::SchemaMode;

/// A source document split into what composition merges in, and in which order.
#[derive(Debug, Default)]
pub(crate) struct Partition {
    /// Empty definitions for extension targets that have no definition of their own.
    pub(crate) stubs: Vec<Definition>,
    /// Type and schema extensions, in source order.
    pub(crate) extensions: Vec<Definition>,
    /// Directive definitions, then schema definitions, then type definitions.
    pub(crate) definitions: Vec<Definition>,
}

impl Partition {
    pub(crate) fn stub_names(&self) -> IndexSet<Name> {
        self.stubs
            .iter()
            .filter_map(|stub| stub.name())
            .cloned()
            .collect()
    }

    /// Every type and directive name the source defines. Stubs do not count: they only stand in
    /// for a definition and must not shadow a federation definition of the same name.
    pub(crate) fn declared_names(&self) -> IndexSet<Name> {
        self.definitions
            .iter()
            .filter_map(|definition| definition.name())
            .cloned()
            .collect()
    }
}

/// Split `document` into stubs, extensions and definitions in a single pass.
///
/// The document is never modified. Declarations that change form (a definition tagged
/// `@extends`, a gateway's root type, a gateway's extension with `@external` fields) are
/// rebuilt as new nodes.
pub(crate) fn partition(document: &ast::Document, mode: SchemaMode) -> Partition {
    let mut directive_definitions = Vec::new();
    let mut schema_definitions = Vec::new();
    let mut type_definitions: IndexMap<Name, Definition> = IndexMap::default();
    let mut extension_records: IndexMap<Name, ExtensionRecord> = IndexMap::default();
    let mut extensions = Vec::new();

    for definition in &document.definitions {
        match definition {
            Definition::DirectiveDefinition(_) => {
                directive_definitions.push(definition.clone());
                continue;
            }
            Definition::SchemaDefinition(_) => {
                schema_definitions.push(definition.clone());
                continue;
            }
            Definition::SchemaExtension(_) => {
                extensions.push(definition.clone());
                continue;
            }
            Definition::OperationDefinition(_) | Definition::FragmentDefinition(_) => {
                warn!(
                    "skipping executable definition {} in schema source",
                    definition.name().map_or("<anonymous>", |name| name.as_str()),
                );
                continue;
            }
            _ => {}
        }
        let (Some(kind), Some(name)) = (TypeKind::of(definition), definition.name()) else {
            continue;
        };

        let forced_root = mode.is_gateway() && is_root_type_name(name);
        let extension = if is_type_extension(definition) {
            Some(definition.clone())
        } else if forced_root || is_extension_by_directive(definition) {
            to_extension(definition)
        } else {
            None
        };

        match extension {
            Some(extension) => {
                let record = extension_records
                    .entry(name.clone())
                    .or_insert_with(|| ExtensionRecord {
                        kind,
                        name: name.clone(),
                        description: None,
                    });
                if record.description.is_none() {
                    record.description = type_description(definition).cloned();
                }
                extensions.push(if mode.is_gateway() {
                    without_external_fields(extension)
                } else {
                    extension
                });
            }
            None => {
                // last one wins, at the position of the first one
                type_definitions.insert(name.clone(), definition.clone());
            }
        }
    }

    let stubs: Vec<Definition> = extension_records
        .values()
        .filter(|record| {
            !type_definitions.contains_key(&record.name)
                && !is_root_type_name(&record.name)
                && !is_federation_type_name(&record.name)
        })
        .map(|record| {
            debug!("synthesizing {} stub for extension of {}", record.kind, record.name);
            record
                .kind
                .stub(record.name.clone(), record.description.clone())
        })
        .collect();

    debug!(
        stubs = stubs.len(),
        extensions = extensions.len(),
        definitions = type_definitions.len(),
        "partitioned schema source"
    );

    Partition {
        stubs,
        extensions,
        definitions: directive_definitions
            .into_iter()
            .chain(schema_definitions)
            .chain(type_definitions.into_values())
            .collect(),
    }
}

/// Drop the fields another service contributes. Returns the extension unchanged if it has none.
fn without_external_fields(extension: Definition) -> Definition {
    let is_local =
        |field: &Node<ast::FieldDefinition>| !field.directives.has(&EXTERNAL_DIRECTIVE_NAME);
    match &extension {
        Definition::ObjectTypeExtension(ext) if !ext.fields.iter().all(is_local) => {
            Definition::ObjectTypeExtension(ext.same_location(ast::ObjectTypeExtension {
                name: ext.name.clone(),
                implements_interfaces: ext.implements_interfaces.clone(),
                directives: ext.directives.clone(),
                fields: ext.fields.iter().filter(|f| is_local(*f)).cloned().collect(),
            }))
        }
        Definition::InterfaceTypeExtension(ext) if !ext.fields.iter().all(is_local) => {
            Definition::InterfaceTypeExtension(ext.same_location(ast::InterfaceTypeExtension {
                name: ext.name.clone(),
                implements_interfaces: ext.implements_interfaces.clone(),
                directives: ext.directives.clone(),
                fields: ext.fields.iter().filter(|f| is_local(*f)).cloned().collect(),
            }))
        }
        _ => extension,
    }
}
