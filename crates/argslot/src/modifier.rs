//! Per-slot behavioral modifiers.
//!
//! Callers pass a list of [`Modifier`] values; it is checked once into a
//! [`Modifiers`] record when the slot is registered.

use std::fmt;

use serde::Serialize;

use crate::error::DefinitionError;

/// How many values a slot accepts over the whole parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Repeat {
    Times(u32),
    Unbounded,
}

impl Default for Repeat {
    fn default() -> Self {
        Self::Times(1)
    }
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Times(n) => write!(f, "{n}"),
            Self::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// Positional consumption settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Positional {
    /// Most bare tokens taken positionally; 0 means limited only by uses.
    pub limit: u8,
    /// Only the first uninterrupted run of bare tokens is taken.
    pub adjacent: bool,
}

pub type Converter<'a, T> = Box<dyn Fn(&str) -> Result<T, String> + 'a>;
pub type Implicit<'a, T> = Box<dyn Fn() -> T + 'a>;

pub enum Modifier<'a, T> {
    Required,
    Repeatable(Repeat),
    Positional(u8),
    Adjacent,
    Name(String),
    Convert(Converter<'a, T>),
    Implicit(Implicit<'a, T>),
    DefaultText(Option<String>),
}

impl<T> Modifier<'_, T> {
    fn kind(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Repeatable(_) => "repeatable",
            Self::Positional(_) => "positional",
            Self::Adjacent => "adjacent",
            Self::Name(_) => "name",
            Self::Convert(_) => "convert",
            Self::Implicit(_) => "implicit",
            Self::DefaultText(_) => "default",
        }
    }
}

impl<T> fmt::Debug for Modifier<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Repeatable(r) => f.debug_tuple("Repeatable").field(r).finish(),
            Self::Positional(n) => f.debug_tuple("Positional").field(n).finish(),
            Self::Name(s) => f.debug_tuple("Name").field(s).finish(),
            Self::DefaultText(s) => f.debug_tuple("DefaultText").field(s).finish(),
            other => f.write_str(other.kind()),
        }
    }
}

/// The slot must receive a value; a flag without one is an error.
pub fn required<'a, T>() -> Modifier<'a, T> {
    Modifier::Required
}

/// Accept up to `count` values instead of one.
pub fn repeatable<'a, T>(count: Repeat) -> Modifier<'a, T> {
    Modifier::Repeatable(count)
}

/// Let bare tokens that match nothing else land in this slot.
pub fn positional<'a, T>(limit: u8) -> Modifier<'a, T> {
    Modifier::Positional(limit)
}

/// Restrict positional consumption to the first run of adjacent tokens.
pub fn adjacent<'a, T>() -> Modifier<'a, T> {
    Modifier::Adjacent
}

/// Override the display name used in diagnostics and help.
pub fn name<'a, T>(name: impl Into<String>) -> Modifier<'a, T> {
    Modifier::Name(name.into())
}

/// Replace the default string conversion for this slot.
pub fn convert<'a, T, F, E>(f: F) -> Modifier<'a, T>
where
    F: Fn(&str) -> Result<T, E> + 'a,
    E: fmt::Display,
{
    Modifier::Convert(Box::new(move |raw| f(raw).map_err(|e| e.to_string())))
}

/// Value bound when the flag appears without a value token.
pub fn implicit<'a, T: Clone + 'a>(value: T) -> Modifier<'a, T> {
    Modifier::Implicit(Box::new(move || value.clone()))
}

/// Text shown as `[default: ...]` in help. `None` renders the destination's
/// value at the time help is produced.
pub fn default_text<'a, T>(text: Option<String>) -> Modifier<'a, T> {
    Modifier::DefaultText(text)
}

/// A checked set of modifiers, at most one of each kind.
pub struct Modifiers<'a, T> {
    pub required: bool,
    pub repeat: Repeat,
    pub positional: Option<Positional>,
    pub name: Option<String>,
    pub convert: Option<Converter<'a, T>>,
    pub implicit: Option<Implicit<'a, T>>,
    pub default_text: Option<Option<String>>,
}

impl<T> Default for Modifiers<'_, T> {
    fn default() -> Self {
        Self {
            required: false,
            repeat: Repeat::default(),
            positional: None,
            name: None,
            convert: None,
            implicit: None,
            default_text: None,
        }
    }
}

impl<'a, T> Modifiers<'a, T> {
    /// Check and collect `mods` for the slot labelled `slot`.
    pub fn collect(
        slot: &str,
        mods: impl IntoIterator<Item = Modifier<'a, T>>,
    ) -> Result<Self, DefinitionError> {
        let mut out = Self::default();
        let mut seen: Vec<&'static str> = Vec::new();
        let mut adjacent = false;

        for m in mods {
            let kind = m.kind();
            if seen.contains(&kind) {
                return Err(DefinitionError::DuplicateModifier {
                    slot: slot.to_string(),
                    kind,
                });
            }
            seen.push(kind);

            match m {
                Modifier::Required => out.required = true,
                Modifier::Repeatable(Repeat::Times(0)) => {
                    return Err(DefinitionError::InvalidModifiers {
                        slot: slot.to_string(),
                        reason: "repeat count must be at least 1".to_string(),
                    });
                }
                Modifier::Repeatable(count) => out.repeat = count,
                Modifier::Positional(limit) => {
                    out.positional = Some(Positional {
                        limit,
                        adjacent: false,
                    })
                }
                Modifier::Adjacent => adjacent = true,
                Modifier::Name(name) => {
                    if name.trim().is_empty() {
                        return Err(DefinitionError::InvalidModifiers {
                            slot: slot.to_string(),
                            reason: "name override is empty".to_string(),
                        });
                    }
                    out.name = Some(name)
                }
                Modifier::Convert(f) => out.convert = Some(f),
                Modifier::Implicit(f) => out.implicit = Some(f),
                Modifier::DefaultText(text) => out.default_text = Some(text),
            }
        }

        if adjacent {
            match out.positional.as_mut() {
                Some(p) => p.adjacent = true,
                None => {
                    return Err(DefinitionError::InvalidModifiers {
                        slot: slot.to_string(),
                        reason: "adjacent requires positional".to_string(),
                    });
                }
            }
        }

        Ok(out)
    }
}
