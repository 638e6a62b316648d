//! Errors raised while building a route table
//!
//! Both variants are configuration errors: they surface at parse or
//! registration time, never during lookup. A path that matches no route is
//! not an error (lookups return `None`).

use thiserror::Error;

/// Everything that can go wrong while registering routes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The template text could not be parsed
    #[error("invalid template '{template}': {kind}")]
    TemplateSyntax { template: String, kind: SyntaxError },

    /// Two templates tie under the precedence order
    #[error("the following routes are ambiguous: '{first}' '{second}'")]
    Ambiguous { first: String, second: String },
}

impl RouteError {
    pub(crate) fn syntax(template: &str, kind: SyntaxError) -> Self {
        RouteError::TemplateSyntax {
            template: template.to_string(),
            kind,
        }
    }

    /// Returns true for [`RouteError::Ambiguous`]
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, RouteError::Ambiguous { .. })
    }
}

/// Specific reason a template failed to parse
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("empty segments are not allowed")]
    EmptySegment,

    #[error("segment '{0}' has unbalanced braces")]
    UnbalancedBraces(String),

    #[error("literal segment '{0}' may not contain '{{' or '}}'")]
    BraceInLiteral(String),

    #[error("parameter segment '{0}' has an empty name")]
    EmptyParameterName(String),

    #[error("parameter name '{0}' contains invalid characters")]
    InvalidParameterName(String),

    #[error("the parameter '{0}' appears multiple times")]
    DuplicateParameter(String),

    #[error("a catch-all parameter can only appear as the last segment")]
    CatchAllNotLast,

    #[error("only one catch-all parameter is allowed")]
    MultipleCatchAll,

    #[error("a catch-all parameter cannot have a default value")]
    CatchAllDefault,

    #[error("parameter '{0}' is optional through its default value and cannot also be marked '?'")]
    OptionalWithDefault(String),

    #[error("non-optional parameters or literals cannot appear after optional parameter '{0}'")]
    RequiredAfterOptional(String),

    #[error("unknown constraint '{0}'")]
    UnknownConstraint(String),

    #[error("constraint '{name}' is malformed: {reason}")]
    InvalidConstraint { name: String, reason: String },

    #[error("default value '{value}' does not satisfy the constraints of '{param}'")]
    InvalidDefault { param: String, value: String },
}
