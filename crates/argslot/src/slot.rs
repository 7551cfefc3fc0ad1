use crate::error::{ConversionError, Error, Result};
use crate::matcher::MatcherInfo;
use crate::modifier::{Converter, Implicit, Modifiers, Positional, Repeat};
use crate::value::Binding;

/// Type-erased write side of a slot.
pub(crate) trait Sink {
    fn parse(&mut self, raw: &str) -> std::result::Result<(), ConversionError>;

    /// Bind the zero-token value. Returns false if there is none.
    fn switch(&mut self) -> bool;

    fn is_switch(&self) -> bool;

    fn render(&self) -> Option<String>;

    fn type_name(&self) -> &'static str;
}

struct Bound<'a, B: Binding> {
    dest: &'a mut B,
    convert: Option<Converter<'a, B::Item>>,
    implicit: Option<Implicit<'a, B::Item>>,
}

impl<B: Binding> Sink for Bound<'_, B> {
    fn parse(&mut self, raw: &str) -> std::result::Result<(), ConversionError> {
        let item = match &self.convert {
            Some(f) => f(raw).map_err(|reason| {
                ConversionError::new(raw, B::type_name()).with_reason(reason)
            })?,
            None => B::convert(raw)?,
        };
        self.dest.store(item);
        Ok(())
    }

    fn switch(&mut self) -> bool {
        let item = match &self.implicit {
            Some(f) => Some(f()),
            None => B::switch_item(),
        };
        match item {
            Some(item) => {
                self.dest.store(item);
                true
            }
            None => false,
        }
    }

    fn is_switch(&self) -> bool {
        self.implicit.is_some() || B::switch_item().is_some()
    }

    fn render(&self) -> Option<String> {
        self.dest.render()
    }

    fn type_name(&self) -> &'static str {
        B::type_name()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Remaining {
    Left(u32),
    Unbounded,
}

impl From<Repeat> for Remaining {
    fn from(r: Repeat) -> Self {
        match r {
            Repeat::Times(n) => Self::Left(n),
            Repeat::Unbounded => Self::Unbounded,
        }
    }
}

/// One registered argument: a destination plus its rules.
pub struct Slot<'a> {
    sink: Box<dyn Sink + 'a>,
    description: String,
    name: Option<String>,
    aliases: String,
    matchers: Vec<MatcherInfo>,
    repeat: Repeat,
    remaining: Remaining,
    required: bool,
    positional: Option<Positional>,
    default_text: Option<Option<String>>,
    received: u32,
    positional_taken: u32,
    positional_closed: bool,
}

impl<'a> Slot<'a> {
    pub(crate) fn new<B: Binding + 'a>(
        dest: &'a mut B,
        description: &str,
        matchers: Vec<MatcherInfo>,
        mods: Modifiers<'a, B::Item>,
    ) -> Self {
        let labels: Vec<&str> = matchers.iter().map(|m| m.label.as_str()).collect();
        let aliases = labels.join(", ");
        Self {
            sink: Box::new(Bound {
                dest,
                convert: mods.convert,
                implicit: mods.implicit,
            }),
            description: description.trim().to_string(),
            name: mods.name,
            aliases,
            matchers,
            repeat: mods.repeat,
            remaining: mods.repeat.into(),
            required: mods.required,
            positional: mods.positional,
            default_text: mods.default_text,
            received: 0,
            positional_taken: 0,
            positional_closed: false,
        }
    }

    /// The `name` override, else the description, else the alias list.
    pub fn display_name(&self) -> &str {
        if let Some(name) = &self.name {
            return name;
        }
        if !self.description.is_empty() {
            return &self.description;
        }
        &self.aliases
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn aliases(&self) -> &str {
        &self.aliases
    }

    pub fn matchers(&self) -> &[MatcherInfo] {
        &self.matchers
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn repeat(&self) -> Repeat {
        self.repeat
    }

    pub fn positional(&self) -> Option<Positional> {
        self.positional
    }

    pub fn is_switch(&self) -> bool {
        self.sink.is_switch()
    }

    pub fn type_name(&self) -> &'static str {
        self.sink.type_name()
    }

    /// Values bound so far in this parse.
    pub fn received(&self) -> u32 {
        self.received
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == Remaining::Left(0)
    }

    pub(crate) fn default_display(&self) -> Option<String> {
        match &self.default_text {
            Some(Some(text)) => Some(text.clone()),
            Some(None) => self.sink.render(),
            None => None,
        }
    }

    fn excessive(&self) -> Error {
        Error::ExcessiveArgument {
            name: self.display_name().to_string(),
        }
    }

    fn consume(&mut self) {
        if let Remaining::Left(n) = &mut self.remaining {
            *n = n.saturating_sub(1);
        }
        self.received += 1;
    }

    /// Convert `raw` into the destination and use up one value.
    pub fn parse(&mut self, raw: &str) -> Result<()> {
        if self.is_exhausted() {
            return Err(self.excessive());
        }
        self.sink.parse(raw).map_err(|source| Error::Conversion {
            name: self.display_name().to_string(),
            source,
        })?;
        self.consume();
        Ok(())
    }

    /// Bind the zero-token value if this slot has one.
    ///
    /// `Ok(false)` leaves the slot untouched.
    pub fn try_consume_as_switch(&mut self) -> Result<bool> {
        if !self.sink.is_switch() {
            return Ok(false);
        }
        if self.is_exhausted() {
            return Err(self.excessive());
        }
        if !self.sink.switch() {
            return Ok(false);
        }
        self.consume();
        Ok(true)
    }

    /// Whether a bare token may be bound positionally right now.
    pub(crate) fn accepts_positional(&self) -> bool {
        let Some(p) = self.positional else {
            return false;
        };
        if self.is_exhausted() || self.positional_closed {
            return false;
        }
        p.limit == 0 || self.positional_taken < u32::from(p.limit)
    }

    pub(crate) fn parse_positional(&mut self, raw: &str) -> Result<()> {
        self.parse(raw)?;
        self.positional_taken += 1;
        Ok(())
    }

    /// Another token arrived; an adjacent run that already started is over.
    pub(crate) fn interrupt_positional(&mut self) {
        if self.positional.is_some_and(|p| p.adjacent) && self.positional_taken > 0 {
            self.positional_closed = true;
        }
    }
}

impl std::fmt::Debug for Slot<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot")
            .field("name", &self.display_name())
            .field("aliases", &self.aliases)
            .field("remaining", &self.remaining)
            .field("required", &self.required)
            .field("positional", &self.positional)
            .finish_non_exhaustive()
    }
}
