use apollo_compiler::Node;
use apollo_compiler::ast;
use apollo_compiler::ast::Definition;
use apollo_compiler::ast::DirectiveLocation;

use crate::compose::rules::CompositionContext;
use crate::compose::rules::CompositionRule;
use crate::error::MultipleFederationErrors;
use crate::error::SingleFederationError;

/// Every directive applied in an extension must be defined, and allowed where it is applied.
pub struct KnownDirectives;

impl CompositionRule for KnownDirectives {
    fn name(&self) -> &'static str {
        "KnownDirectives"
    }

    fn check(&self, context: &CompositionContext<'_>, errors: &mut MultipleFederationErrors) {
        for extension in &context.extensions.definitions {
            for (directive, location) in applied_directives(extension) {
                match context.schema.directive_definitions.get(&directive.name) {
                    None => errors.push(
                        SingleFederationError::UnknownDirective {
                            directive_name: directive.name.clone(),
                        }
                        .into(),
                    ),
                    Some(definition) if !definition.locations.contains(&location) => errors.push(
                        SingleFederationError::MisplacedDirective {
                            directive_name: directive.name.clone(),
                            location: location_name(location),
                        }
                        .into(),
                    ),
                    Some(_) => {}
                }
            }
        }
    }
}

type Applied<'a> = Vec<(&'a Node<ast::Directive>, DirectiveLocation)>;

fn applied_directives(extension: &Definition) -> Applied<'_> {
    let mut applied = Vec::new();
    match extension {
        Definition::SchemaExtension(ext) => {
            applied.extend(at(&ext.directives, DirectiveLocation::Schema));
        }
        Definition::ScalarTypeExtension(ext) => {
            applied.extend(at(&ext.directives, DirectiveLocation::Scalar));
        }
        Definition::ObjectTypeExtension(ext) => {
            applied.extend(at(&ext.directives, DirectiveLocation::Object));
            applied.extend(fields(&ext.fields));
        }
        Definition::InterfaceTypeExtension(ext) => {
            applied.extend(at(&ext.directives, DirectiveLocation::Interface));
            applied.extend(fields(&ext.fields));
        }
        Definition::UnionTypeExtension(ext) => {
            applied.extend(at(&ext.directives, DirectiveLocation::Union));
        }
        Definition::EnumTypeExtension(ext) => {
            applied.extend(at(&ext.directives, DirectiveLocation::Enum));
            for value in &ext.values {
                applied.extend(at(&value.directives, DirectiveLocation::EnumValue));
            }
        }
        Definition::InputObjectTypeExtension(ext) => {
            applied.extend(at(&ext.directives, DirectiveLocation::InputObject));
            for field in &ext.fields {
                applied.extend(at(
                    &field.directives,
                    DirectiveLocation::InputFieldDefinition,
                ));
            }
        }
        _ => {}
    }
    applied
}

fn at(
    directives: &ast::DirectiveList,
    location: DirectiveLocation,
) -> impl Iterator<Item = (&Node<ast::Directive>, DirectiveLocation)> {
    directives.iter().map(move |directive| (directive, location))
}

fn fields(fields: &[Node<ast::FieldDefinition>]) -> Applied<'_> {
    let mut applied = Vec::new();
    for field in fields {
        applied.extend(at(&field.directives, DirectiveLocation::FieldDefinition));
        for argument in &field.arguments {
            applied.extend(at(
                &argument.directives,
                DirectiveLocation::ArgumentDefinition,
            ));
        }
    }
    applied
}

fn location_name(location: DirectiveLocation) -> &'static str {
    match location {
        DirectiveLocation::Schema => "SCHEMA",
        DirectiveLocation::Scalar => "SCALAR",
        DirectiveLocation::Object => "OBJECT",
        DirectiveLocation::FieldDefinition => "FIELD_DEFINITION",
        DirectiveLocation::ArgumentDefinition => "ARGUMENT_DEFINITION",
        DirectiveLocation::Interface => "INTERFACE",
        DirectiveLocation::Union => "UNION",
        DirectiveLocation::Enum => "ENUM",
        DirectiveLocation::EnumValue => "ENUM_VALUE",
        DirectiveLocation::InputObject => "INPUT_OBJECT",
        DirectiveLocation::InputFieldDefinition => "INPUT_FIELD_DEFINITION",
        _ => "an executable location",
    }
}
