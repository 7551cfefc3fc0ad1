use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything `Parser::arg` and `Parser::parse` can fail with.
///
/// All variants are fatal: parsing stops at the first one and destinations
/// written by earlier tokens keep their values.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error("{name}: {source}")]
    Conversion {
        name: String,
        #[source]
        source: ConversionError,
    },

    #[error("{name} without value")]
    MissingValue { name: String },

    #[error("excessive argument {name}")]
    ExcessiveArgument { name: String },

    #[error("unrecognized argument {token}")]
    UnrecognizedArgument { token: String },

    #[error("unexpected option {token}")]
    UnexpectedArgument { token: String },
}

/// Raised while registering arguments, before any token is looked at.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("{slot}: repeated {kind} modifier in argument definition")]
    DuplicateModifier { slot: String, kind: &'static str },

    #[error("{slot}: no matchers given")]
    EmptyAliases { slot: String },

    #[error("short arg {literal} defined with more than one char")]
    ShortTooLong { literal: String },

    #[error("short arg {literal} defined without a char")]
    ShortEmpty { literal: String },

    #[error("{slot}: {reason}")]
    InvalidModifiers { slot: String, reason: String },

    #[error("invalid pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// A raw token that could not be turned into the destination's type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("\"{value}\" cannot be interpreted as {type_name}{}", reason_suffix(.reason))]
pub struct ConversionError {
    pub value: String,
    pub type_name: &'static str,
    pub reason: Option<String>,
}

impl ConversionError {
    pub fn new(value: impl Into<String>, type_name: &'static str) -> Self {
        Self {
            value: value.into(),
            type_name,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

fn reason_suffix(reason: &Option<String>) -> String {
    match reason {
        Some(r) if !r.trim().is_empty() => format!(" ({})", r.trim()),
        _ => String::new(),
    }
}

impl Error {
    /// The display name of the slot or the token the error is about.
    pub fn subject(&self) -> Option<&str> {
        match self {
            Self::Definition(_) => None,
            Self::Conversion { name, .. }
            | Self::MissingValue { name }
            | Self::ExcessiveArgument { name } => Some(name.as_str()),
            Self::UnrecognizedArgument { token } | Self::UnexpectedArgument { token } => {
                Some(token.as_str())
            }
        }
    }
}
