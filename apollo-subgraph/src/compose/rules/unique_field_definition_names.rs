use apollo_compiler::Name;
use apollo_compiler::ast::Definition;
use apollo_compiler::collections::HashMap;
use apollo_compiler::collections::HashSet;
use apollo_compiler::schema::ExtendedType;

use crate::compose::rules::CompositionContext;
use crate::compose::rules::CompositionRule;
use crate::error::MultipleFederationErrors;
use crate::error::SingleFederationError;

/// A type extension may not define a field the type already has, whether from its definition
/// or from an earlier extension.
pub struct UniqueFieldDefinitionNames;

impl CompositionRule for UniqueFieldDefinitionNames {
    fn name(&self) -> &'static str {
        "UniqueFieldDefinitionNames"
    }

    fn check(&self, context: &CompositionContext<'_>, errors: &mut MultipleFederationErrors) {
        let mut known_fields: HashMap<&Name, HashSet<&Name>> = HashMap::default();
        for (type_name, extension) in context.type_extensions() {
            let field_names: Vec<&Name> = match extension {
                Definition::ObjectTypeExtension(ext) => ext.fields.iter().map(|f| &f.name).collect(),
                Definition::InterfaceTypeExtension(ext) => {
                    ext.fields.iter().map(|f| &f.name).collect()
                }
                Definition::InputObjectTypeExtension(ext) => {
                    ext.fields.iter().map(|f| &f.name).collect()
                }
                _ => continue,
            };
            let known = known_fields
                .entry(type_name)
                .or_insert_with(|| existing_fields(context, type_name));
            for field_name in field_names {
                if !known.insert(field_name) {
                    errors.push(
                        SingleFederationError::DuplicateFieldDefinition {
                            type_name: type_name.clone(),
                            field_name: field_name.clone(),
                        }
                        .into(),
                    );
                }
            }
        }
    }
}

fn existing_fields<'a>(context: &CompositionContext<'a>, type_name: &Name) -> HashSet<&'a Name> {
    match context.schema.types.get(type_name) {
        Some(ExtendedType::Object(ty)) => ty.fields.keys().collect(),
        Some(ExtendedType::Interface(ty)) => ty.fields.keys().collect(),
        Some(ExtendedType::InputObject(ty)) => ty.fields.keys().collect(),
        _ => HashSet::default(),
    }
}
