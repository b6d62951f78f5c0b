use apollo_compiler::Schema;
use apollo_compiler::ast;
use tracing::trace;

use crate::compose::rules::CompositionContext;
use crate::compose::rules::CompositionRule;
use crate::error::FederationError;
use crate::error::MultipleFederationErrors;

/// Run every rule over `extensions` against `schema`, collecting all violations in rule order.
pub(crate) fn composition_errors(
    extensions: &ast::Document,
    schema: &Schema,
    rules: &[Box<dyn CompositionRule>],
) -> MultipleFederationErrors {
    let context = CompositionContext { schema, extensions };
    let mut errors = MultipleFederationErrors::new();
    for rule in rules {
        let before = errors.len();
        rule.check(&context, &mut errors);
        trace!(
            rule = rule.name(),
            violations = errors.len() - before,
            "ran composition rule"
        );
    }
    errors
}

/// Validate `extensions` before they are applied.
///
/// A single violation is returned as itself and several as one aggregate error.
pub(crate) fn validate_composition(
    extensions: &ast::Document,
    schema: &Schema,
    rules: &[Box<dyn CompositionRule>],
) -> Result<(), FederationError> {
    composition_errors(extensions, schema, rules).into_result()
}
