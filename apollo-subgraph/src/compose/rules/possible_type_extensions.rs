use crate::compose::classify::TypeKind;
use crate::compose::rules::CompositionContext;
use crate::compose::rules::CompositionRule;
use crate::error::MultipleFederationErrors;
use crate::error::SingleFederationError;
use crate::federation::is_root_type_name;

/// An extension must target an existing type of the same kind.
///
/// Root types are exempt from the existence check: a service may extend `Query` without ever
/// defining it.
pub struct PossibleTypeExtensions;

impl CompositionRule for PossibleTypeExtensions {
    fn name(&self) -> &'static str {
        "PossibleTypeExtensions"
    }

    fn check(&self, context: &CompositionContext<'_>, errors: &mut MultipleFederationErrors) {
        for (name, extension) in context.type_extensions() {
            let Some(kind) = TypeKind::of(extension) else {
                continue;
            };
            match context.schema.types.get(name) {
                Some(existing) if TypeKind::of_type(existing) != kind => {
                    errors.push(
                        SingleFederationError::InvalidExtensionKind {
                            type_name: name.clone(),
                            expected: kind.to_string(),
                        }
                        .into(),
                    );
                }
                Some(_) => {}
                None if is_root_type_name(name) => {}
                None => errors.push(
                    SingleFederationError::ExtensionOfUndefinedType {
                        type_name: name.clone(),
                    }
                    .into(),
                ),
            }
        }
    }
}
