use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::ast;
use apollo_compiler::ast::Definition;
use apollo_compiler::collections::HashSet;

use crate::compose::rules::CompositionContext;
use crate::compose::rules::CompositionRule;
use crate::error::MultipleFederationErrors;
use crate::error::SingleFederationError;

/// Every type an extension refers to must exist, either in the schema or as the target of
/// another extension.
pub struct KnownTypeNames;

impl CompositionRule for KnownTypeNames {
    fn name(&self) -> &'static str {
        "KnownTypeNames"
    }

    fn check(&self, context: &CompositionContext<'_>, errors: &mut MultipleFederationErrors) {
        let extended: HashSet<&Name> = context.type_extensions().map(|(name, _)| name).collect();
        let mut reported = HashSet::default();
        for (_, extension) in context.type_extensions() {
            for referenced in referenced_types(extension) {
                if context.schema.types.contains_key(referenced)
                    || extended.contains(referenced)
                    || !reported.insert(referenced)
                {
                    continue;
                }
                errors.push(
                    SingleFederationError::UnknownType {
                        type_name: referenced.clone(),
                    }
                    .into(),
                );
            }
        }
    }
}

fn referenced_types(extension: &Definition) -> Vec<&Name> {
    match extension {
        Definition::ObjectTypeExtension(ext) => field_types(&ext.fields)
            .chain(&ext.implements_interfaces)
            .collect(),
        Definition::InterfaceTypeExtension(ext) => field_types(&ext.fields)
            .chain(&ext.implements_interfaces)
            .collect(),
        Definition::UnionTypeExtension(ext) => ext.members.iter().collect(),
        Definition::InputObjectTypeExtension(ext) => ext
            .fields
            .iter()
            .map(|field| field.ty.inner_named_type())
            .collect(),
        _ => Vec::new(),
    }
}

fn field_types(fields: &[Node<ast::FieldDefinition>]) -> impl Iterator<Item = &Name> {
    fields.iter().flat_map(|field| {
        std::iter::once(field.ty.inner_named_type()).chain(
            field
                .arguments
                .iter()
                .map(|argument| argument.ty.inner_named_type()),
        )
    })
}
