use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Write;

use apollo_compiler::Name;
use apollo_compiler::validation::DiagnosticList;
use apollo_compiler::validation::WithErrors;

/// Create an internal error.
///
/// # Example
/// ```rust
/// use apollo_subgraph::internal_error;
/// use apollo_subgraph::error::FederationError;
/// # fn may_be_none() -> Option<()> { None }
///
/// const NAME: &str = "the thing";
/// let result: Result<(), FederationError> = may_be_none()
///     .ok_or_else(|| internal_error!("Expected {NAME} to be Some"));
/// ```
#[macro_export]
macro_rules! internal_error {
    ( $( $arg:tt )+ ) => {
        $crate::error::FederationError::internal(format!( $( $arg )+ ))
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SingleFederationError {
    #[error(
        "An internal error has occurred, please report this bug to Apollo.\n\nDetails: {message}"
    )]
    Internal { message: String },
    #[error("{message}")]
    InvalidGraphQL { message: String },
    #[error(r#"Cannot extend non-{expected} type "{type_name}"."#)]
    InvalidExtensionKind { type_name: Name, expected: String },
    #[error(r#"Cannot extend type "{type_name}" because it is not defined."#)]
    ExtensionOfUndefinedType { type_name: Name },
    #[error(
        r#"Field "{type_name}.{field_name}" already exists in the schema. It cannot also be defined in this type extension."#
    )]
    DuplicateFieldDefinition { type_name: Name, field_name: Name },
    #[error(
        r#"Enum value "{type_name}.{value}" already exists in the schema. It cannot also be defined in this type extension."#
    )]
    DuplicateEnumValue { type_name: Name, value: Name },
    #[error(r#"Unknown type "{type_name}"."#)]
    UnknownType { type_name: Name },
    #[error(r#"Unknown directive "@{directive_name}"."#)]
    UnknownDirective { directive_name: Name },
    #[error(r#"Directive "@{directive_name}" may not be used on {location}."#)]
    MisplacedDirective {
        directive_name: Name,
        location: &'static str,
    },
    #[error(r#"Schema has no "{field_name}" field on its query root."#)]
    MissingFederationField { field_name: Name },
}

impl SingleFederationError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Internal { .. } => "INTERNAL",
            Self::InvalidGraphQL { .. } => "INVALID_GRAPHQL",
            Self::InvalidExtensionKind { .. } => "EXTENSION_WITH_INVALID_KIND",
            Self::ExtensionOfUndefinedType { .. } => "EXTENSION_OF_UNDEFINED_TYPE",
            Self::DuplicateFieldDefinition { .. } => "DUPLICATE_FIELD_DEFINITION",
            Self::DuplicateEnumValue { .. } => "DUPLICATE_ENUM_VALUE",
            Self::UnknownType { .. } => "UNKNOWN_TYPE",
            Self::UnknownDirective { .. } => "UNKNOWN_DIRECTIVE",
            Self::MisplacedDirective { .. } => "MISPLACED_DIRECTIVE",
            Self::MissingFederationField { .. } => "MISSING_FEDERATION_FIELD",
        }
    }
}

/// An aggregate of errors, reported together so that every problem shows up in one report.
#[derive(Debug, Clone, Default)]
pub struct MultipleFederationErrors {
    pub errors: Vec<SingleFederationError>,
}

impl MultipleFederationErrors {
    pub fn new() -> Self {
        Self { errors: vec![] }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Add an error, flattening aggregates into this one.
    pub fn push(&mut self, error: FederationError) {
        match error {
            FederationError::SingleFederationError(error) => {
                self.errors.push(error);
            }
            FederationError::MultipleFederationErrors(errors) => {
                self.errors.extend(errors.errors);
            }
        }
    }

    /// Zero errors is a success. A single error is returned as itself, so callers matching on
    /// its variant keep working. Two or more are returned as one aggregate.
    pub fn into_result(self) -> Result<(), FederationError> {
        let mut errors = self.errors;
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0).into()),
            _ => Err(MultipleFederationErrors { errors }.into()),
        }
    }
}

impl Display for MultipleFederationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "The following errors occurred:")?;
        for error in &self.errors {
            write!(f, "\n  - ")?;
            for c in error.to_string().chars() {
                if c == '\n' {
                    write!(f, "\n    ")?;
                } else {
                    f.write_char(c)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for MultipleFederationErrors {}

impl FromIterator<SingleFederationError> for MultipleFederationErrors {
    fn from_iter<T: IntoIterator<Item = SingleFederationError>>(iter: T) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl From<SingleFederationError> for MultipleFederationErrors {
    fn from(value: SingleFederationError) -> Self {
        Self {
            errors: vec![value],
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum FederationError {
    #[error(transparent)]
    SingleFederationError(#[from] SingleFederationError),
    #[error(transparent)]
    MultipleFederationErrors(#[from] MultipleFederationErrors),
}

impl FederationError {
    pub fn internal(message: impl Into<String>) -> Self {
        SingleFederationError::Internal {
            message: message.into(),
        }
        .into()
    }

    /// Every individual error, in report order.
    pub fn errors(&self) -> Vec<&SingleFederationError> {
        match self {
            Self::SingleFederationError(error) => vec![error],
            Self::MultipleFederationErrors(errors) => errors.errors.iter().collect(),
        }
    }

    pub fn has_invalid_graphql_error(&self) -> bool {
        self.errors()
            .into_iter()
            .any(|e| matches!(e, SingleFederationError::InvalidGraphQL { .. }))
    }
}

impl From<DiagnosticList> for FederationError {
    fn from(value: DiagnosticList) -> Self {
        let mut errors = MultipleFederationErrors::new();
        for diagnostic in value.iter() {
            errors.push(
                SingleFederationError::InvalidGraphQL {
                    message: diagnostic.to_string(),
                }
                .into(),
            );
        }
        match errors.into_result() {
            Err(error) => error,
            Ok(()) => internal_error!("diagnostic list is empty"),
        }
    }
}

impl<T> From<WithErrors<T>> for FederationError {
    fn from(value: WithErrors<T>) -> Self {
        value.errors.into()
    }
}
