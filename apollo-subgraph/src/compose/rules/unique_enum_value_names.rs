use apollo_compiler::Name;
use apollo_compiler::ast::Definition;
use apollo_compiler::collections::HashMap;
use apollo_compiler::collections::HashSet;
use apollo_compiler::schema::ExtendedType;

use crate::compose::rules::CompositionContext;
use crate::compose::rules::CompositionRule;
use crate::error::MultipleFederationErrors;
use crate::error::SingleFederationError;

/// An enum extension may not redefine an existing value.
pub struct UniqueEnumValueNames;

impl CompositionRule for UniqueEnumValueNames {
    fn name(&self) -> &'static str {
        "UniqueEnumValueNames"
    }

    fn check(&self, context: &CompositionContext<'_>, errors: &mut MultipleFederationErrors) {
        let mut known_values: HashMap<&Name, HashSet<&Name>> = HashMap::default();
        for (type_name, extension) in context.type_extensions() {
            let Definition::EnumTypeExtension(extension) = extension else {
                continue;
            };
            let known = known_values.entry(type_name).or_insert_with(|| {
                match context.schema.types.get(type_name) {
                    Some(ExtendedType::Enum(ty)) => ty.values.keys().collect(),
                    _ => HashSet::default(),
                }
            });
            for value in &extension.values {
                if !known.insert(&value.value) {
                    errors.push(
                        SingleFederationError::DuplicateEnumValue {
                            type_name: type_name.clone(),
                            value: value.value.clone(),
                        }
                        .into(),
                    );
                }
            }
        }
    }
}
