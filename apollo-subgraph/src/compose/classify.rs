use std::fmt::Display;
use std::fmt::Formatter;

use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::ast;
use apollo_compiler::ast::Definition;
use apollo_compiler::schema::ExtendedType;

use crate::federation::EXTENDS_DIRECTIVE_NAME;

/// The extensible type kinds. Every kind has one definition form and one extension form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
}

impl TypeKind {
    /// The kind of a type definition or type extension. `None` for every other definition.
    pub(crate) fn of(definition: &Definition) -> Option<Self> {
        Some(match definition {
            Definition::ScalarTypeDefinition(_) | Definition::ScalarTypeExtension(_) => {
                Self::Scalar
            }
            Definition::ObjectTypeDefinition(_) | Definition::ObjectTypeExtension(_) => {
                Self::Object
            }
            Definition::InterfaceTypeDefinition(_) | Definition::InterfaceTypeExtension(_) => {
                Self::Interface
            }
            Definition::UnionTypeDefinition(_) | Definition::UnionTypeExtension(_) => Self::Union,
            Definition::EnumTypeDefinition(_) | Definition::EnumTypeExtension(_) => Self::Enum,
            Definition::InputObjectTypeDefinition(_)
            | Definition::InputObjectTypeExtension(_) => Self::InputObject,
            _ => return None,
        })
    }

    pub(crate) fn of_type(ty: &ExtendedType) -> Self {
        match ty {
            ExtendedType::Scalar(_) => Self::Scalar,
            ExtendedType::Object(_) => Self::Object,
            ExtendedType::Interface(_) => Self::Interface,
            ExtendedType::Union(_) => Self::Union,
            ExtendedType::Enum(_) => Self::Enum,
            ExtendedType::InputObject(_) => Self::InputObject,
        }
    }

    /// An empty definition of this kind, for an extension to extend.
    pub(crate) fn stub(self, name: Name, description: Option<Node<str>>) -> Definition {
        match self {
            Self::Scalar => Definition::ScalarTypeDefinition(Node::new(ast::ScalarTypeDefinition {
                description,
                name,
                directives: Default::default(),
            })),
            Self::Object => Definition::ObjectTypeDefinition(Node::new(ast::ObjectTypeDefinition {
                description,
                name,
                implements_interfaces: Vec::new(),
                directives: Default::default(),
                fields: Vec::new(),
            })),
            Self::Interface => {
                Definition::InterfaceTypeDefinition(Node::new(ast::InterfaceTypeDefinition {
                    description,
                    name,
                    implements_interfaces: Vec::new(),
                    directives: Default::default(),
                    fields: Vec::new(),
                }))
            }
            Self::Union => Definition::UnionTypeDefinition(Node::new(ast::UnionTypeDefinition {
                description,
                name,
                directives: Default::default(),
                members: Vec::new(),
            })),
            Self::Enum => Definition::EnumTypeDefinition(Node::new(ast::EnumTypeDefinition {
                description,
                name,
                directives: Default::default(),
                values: Vec::new(),
            })),
            Self::InputObject => {
                Definition::InputObjectTypeDefinition(Node::new(ast::InputObjectTypeDefinition {
                    description,
                    name,
                    directives: Default::default(),
                    fields: Vec::new(),
                }))
            }
        }
    }
}

impl Display for TypeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Scalar => "scalar",
            Self::Object => "object",
            Self::Interface => "interface",
            Self::Union => "union",
            Self::Enum => "enum",
            Self::InputObject => "input object",
        })
    }
}

/// Marks that some extension targets `name`. Carries no body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExtensionRecord {
    pub(crate) kind: TypeKind,
    pub(crate) name: Name,
    /// The description of a definition tagged `@extends`, which an extension cannot carry.
    pub(crate) description: Option<Node<str>>,
}

/// The description of a type definition. Extensions have none.
pub(crate) fn type_description(definition: &Definition) -> Option<&Node<str>> {
    match definition {
        Definition::ScalarTypeDefinition(def) => def.description.as_ref(),
        Definition::ObjectTypeDefinition(def) => def.description.as_ref(),
        Definition::InterfaceTypeDefinition(def) => def.description.as_ref(),
        Definition::UnionTypeDefinition(def) => def.description.as_ref(),
        Definition::EnumTypeDefinition(def) => def.description.as_ref(),
        Definition::InputObjectTypeDefinition(def) => def.description.as_ref(),
        _ => None,
    }
}

/// The directives applied directly to a type definition or extension.
pub(crate) fn type_directives(definition: &Definition) -> Option<&ast::DirectiveList> {
    Some(match definition {
        Definition::ScalarTypeDefinition(def) => &def.directives,
        Definition::ObjectTypeDefinition(def) => &def.directives,
        Definition::InterfaceTypeDefinition(def) => &def.directives,
        Definition::UnionTypeDefinition(def) => &def.directives,
        Definition::EnumTypeDefinition(def) => &def.directives,
        Definition::InputObjectTypeDefinition(def) => &def.directives,
        Definition::ScalarTypeExtension(ext) => &ext.directives,
        Definition::ObjectTypeExtension(ext) => &ext.directives,
        Definition::InterfaceTypeExtension(ext) => &ext.directives,
        Definition::UnionTypeExtension(ext) => &ext.directives,
        Definition::EnumTypeExtension(ext) => &ext.directives,
        Definition::InputObjectTypeExtension(ext) => &ext.directives,
        _ => return None,
    })
}

/// Whether a type declaration is an extension in disguise: definition syntax tagged `@extends`.
pub(crate) fn is_extension_by_directive(definition: &Definition) -> bool {
    type_directives(definition).is_some_and(|directives| directives.has(&EXTENDS_DIRECTIVE_NAME))
}

pub(crate) fn is_type_extension(definition: &Definition) -> bool {
    matches!(
        definition,
        Definition::ScalarTypeExtension(_)
            | Definition::ObjectTypeExtension(_)
            | Definition::InterfaceTypeExtension(_)
            | Definition::UnionTypeExtension(_)
            | Definition::EnumTypeExtension(_)
            | Definition::InputObjectTypeExtension(_)
    )
}

/// The extension form of a type definition, as a new node at the same location.
///
/// Extensions cannot carry descriptions, so the description is left out; see
/// [`type_description`]. Returns `None` for anything that is not a type definition.
pub(crate) fn to_extension(definition: &Definition) -> Option<Definition> {
    Some(match definition {
        Definition::ScalarTypeDefinition(def) => {
            Definition::ScalarTypeExtension(def.same_location(ast::ScalarTypeExtension {
                name: def.name.clone(),
                directives: def.directives.clone(),
            }))
        }
        Definition::ObjectTypeDefinition(def) => {
            Definition::ObjectTypeExtension(def.same_location(ast::ObjectTypeExtension {
                name: def.name.clone(),
                implements_interfaces: def.implements_interfaces.clone(),
                directives: def.directives.clone(),
                fields: def.fields.clone(),
            }))
        }
        Definition::InterfaceTypeDefinition(def) => {
            Definition::InterfaceTypeExtension(def.same_location(ast::InterfaceTypeExtension {
                name: def.name.clone(),
                implements_interfaces: def.implements_interfaces.clone(),
                directives: def.directives.clone(),
                fields: def.fields.clone(),
            }))
        }
        Definition::UnionTypeDefinition(def) => {
            Definition::UnionTypeExtension(def.same_location(ast::UnionTypeExtension {
                name: def.name.clone(),
                directives: def.directives.clone(),
                members: def.members.clone(),
            }))
        }
        Definition::EnumTypeDefinition(def) => {
            Definition::EnumTypeExtension(def.same_location(ast::EnumTypeExtension {
                name: def.name.clone(),
                directives: def.directives.clone(),
                values: def.values.clone(),
            }))
        }
        Definition::InputObjectTypeDefinition(def) => {
            Definition::InputObjectTypeExtension(def.same_location(ast::InputObjectTypeExtension {
                name: def.name.clone(),
                directives: def.directives.clone(),
                fields: def.fields.clone(),
            }))
        }
        _ => return None,
    })
}
