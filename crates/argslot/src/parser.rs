//! The stateful token consumption loop.

use std::path::Path;

use crate::classify::{Classification, classify, split_inline};
use crate::error::{Error, Result};
use crate::help::{self, HelpContext, SlotInfo};
use crate::matcher::{IntoMatchers, Matcher};
use crate::modifier::{Modifier, Modifiers};
use crate::registry::{Registry, SlotId};
use crate::slot::Slot;
use crate::value::Binding;

/// What a successful parse produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Every token was bound to a destination.
    Parsed,
    /// A help matcher was hit; the text is ready to print.
    Help(String),
}

/// A slot that matched a flag and expects its value in a later token.
#[derive(Debug, Clone, Copy)]
struct Waiting {
    slot: SlotId,
    received: bool,
}

/// Binds command-line tokens into caller-owned destinations.
///
/// Destinations are borrowed for `'a`; drop the parser to read them back.
#[derive(Debug, Default)]
pub struct Parser<'a> {
    registry: Registry<'a>,
    help: Vec<Matcher<'a>>,
    program: Option<String>,
    about: Option<String>,
}

impl<'a> Parser<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Program name for help. Defaults to the file name of `argv[0]`.
    pub fn program(&mut self, name: impl Into<String>) -> &mut Self {
        self.program = Some(name.into());
        self
    }

    /// One-line description shown at the top of help.
    pub fn about(&mut self, text: impl Into<String>) -> &mut Self {
        self.about = Some(text.into());
        self
    }

    /// Tokens matching any of `matchers` stop parsing with
    /// [`ParseOutcome::Help`].
    pub fn help(&mut self, matchers: impl IntoMatchers<'a>) -> Result<&mut Self> {
        for spec in matchers.into_specs() {
            self.help.push(Matcher::build(spec)?);
        }
        Ok(self)
    }

    /// Register a destination with no modifiers.
    pub fn arg<B>(
        &mut self,
        dest: &'a mut B,
        matchers: impl IntoMatchers<'a>,
        description: &str,
    ) -> Result<&mut Self>
    where
        B: Binding + 'a,
    {
        self.arg_with(dest, matchers, description, [])
    }

    /// Register a destination, its matchers and its modifiers.
    ///
    /// Every matcher is bound to the same slot. Fails on an empty matcher
    /// list, a malformed short literal, or a repeated modifier kind.
    pub fn arg_with<B>(
        &mut self,
        dest: &'a mut B,
        matchers: impl IntoMatchers<'a>,
        description: &str,
        modifiers: impl IntoIterator<Item = Modifier<'a, B::Item>>,
    ) -> Result<&mut Self>
    where
        B: Binding + 'a,
    {
        let specs = matchers.into_specs();
        if specs.is_empty() {
            return Err(crate::DefinitionError::EmptyAliases {
                slot: description.to_string(),
            }
            .into());
        }
        let built = specs
            .into_iter()
            .map(Matcher::build)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let infos: Vec<_> = built.iter().map(Matcher::info).collect();

        let label = infos
            .iter()
            .map(|m| m.label.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let mods = Modifiers::collect(&label, modifiers)?;

        let slot = Slot::new(dest, description, infos, mods);
        tracing::trace!(slot = %slot.display_name(), aliases = %slot.aliases(), "registered slot");
        self.registry.insert(slot, built);
        Ok(self)
    }

    pub fn registry(&self) -> &Registry<'a> {
        &self.registry
    }

    /// Describe every registered slot, in registration order.
    pub fn describe(&self) -> Vec<SlotInfo> {
        self.registry.slots().iter().map(SlotInfo::from_slot).collect()
    }

    /// Render help text for the registered slots.
    pub fn help_text(&self) -> String {
        let ctx = HelpContext {
            program: self.program.as_deref().unwrap_or("program"),
            about: self.about.as_deref(),
            help_labels: self.help.iter().map(|m| m.label().to_string()).collect(),
        };
        help::render(&ctx, &self.describe())
    }

    /// Parse the process arguments.
    pub fn parse_env(&mut self) -> Result<ParseOutcome> {
        self.parse(std::env::args())
    }

    /// Parse `argv`. The first item is the program name and is not matched.
    ///
    /// Fails at the first error; destinations written before it keep their
    /// values.
    pub fn parse<I, S>(&mut self, argv: I) -> Result<ParseOutcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut argv = argv.into_iter();
        if let Some(first) = argv.next() {
            if self.program.is_none() {
                let name = Path::new(first.as_ref())
                    .file_name()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| first.as_ref().to_string());
                self.program = Some(name);
            }
        }

        let mut waiting: Option<Waiting> = None;
        for token in argv {
            let token = token.as_ref();
            if self.is_help(token, waiting.is_some()) {
                tracing::debug!(token, "help requested");
                return Ok(ParseOutcome::Help(self.help_text()));
            }
            waiting = self.step(token, waiting)?;
        }

        if let Some(w) = waiting {
            let slot = self.registry.slot(w.slot);
            if slot.is_required() && !w.received {
                return Err(missing(slot));
            }
        }
        if let Some(slot) = self
            .registry
            .slots()
            .iter()
            .find(|s| s.is_required() && s.received() == 0)
        {
            return Err(missing(slot));
        }

        Ok(ParseOutcome::Parsed)
    }

    fn is_help(&self, token: &str, waiting: bool) -> bool {
        if waiting && classify(token) == Classification::Context {
            return false;
        }
        self.help.iter().any(|m| m.matches(token))
    }

    /// Process one token and return the new waiting state.
    fn step(&mut self, token: &str, waiting: Option<Waiting>) -> Result<Option<Waiting>> {
        let class = classify(token);
        tracing::trace!(token, ?class, "classified token");

        if class != Classification::Context {
            if let Some(w) = waiting {
                let slot = self.registry.slot(w.slot);
                if slot.is_required() && !w.received {
                    return Err(missing(slot));
                }
            }
        }

        // A bare token continues whatever is waiting.
        if class == Classification::Context {
            if let Some(w) = waiting {
                return self.continue_waiting(token, w);
            }
        }

        let split = split_inline(token, class);

        let Some(id) = self.registry.resolve(class, split.key) else {
            if let Some(w) = waiting {
                return self.continue_waiting(token, w);
            }
            if class == Classification::Context {
                return self.bind_positional(token);
            }
            return Err(Error::UnrecognizedArgument {
                token: token.to_string(),
            });
        };

        self.registry.interrupt_positionals(None);
        let slot = self.registry.slot_mut(id);
        if slot.is_exhausted() {
            return Err(Error::ExcessiveArgument {
                name: slot.display_name().to_string(),
            });
        }
        tracing::debug!(token, slot = %slot.display_name(), "matched");

        // A context token that names a switch is the switch itself.
        let inline = match class {
            Classification::Context if slot.is_switch() => None,
            Classification::Context => Some(token),
            _ => split.inline,
        };
        if let Some(value) = inline {
            slot.parse(value)?;
            tracing::debug!(slot = %slot.display_name(), value, "bound inline value");
            return Ok(None);
        }
        if slot.try_consume_as_switch()? {
            tracing::debug!(slot = %slot.display_name(), "bound switch");
            return Ok(None);
        }
        tracing::debug!(slot = %slot.display_name(), "waiting for value");
        Ok(Some(Waiting {
            slot: id,
            received: false,
        }))
    }

    fn continue_waiting(&mut self, token: &str, w: Waiting) -> Result<Option<Waiting>> {
        self.registry.interrupt_positionals(None);
        let slot = self.registry.slot_mut(w.slot);
        if slot.is_exhausted() {
            return Err(Error::UnexpectedArgument {
                token: token.to_string(),
            });
        }
        slot.parse(token)?;
        tracing::debug!(slot = %slot.display_name(), value = token, "bound value");
        if slot.is_exhausted() {
            return Ok(None);
        }
        Ok(Some(Waiting {
            slot: w.slot,
            received: true,
        }))
    }

    fn bind_positional(&mut self, token: &str) -> Result<Option<Waiting>> {
        if !self.registry.has_positional() {
            return Err(Error::UnrecognizedArgument {
                token: token.to_string(),
            });
        }
        let Some(id) = self.registry.next_positional() else {
            return Err(Error::UnexpectedArgument {
                token: token.to_string(),
            });
        };
        self.registry.interrupt_positionals(Some(id));
        let slot = self.registry.slot_mut(id);
        slot.parse_positional(token)?;
        tracing::debug!(slot = %slot.display_name(), value = token, "bound positional");
        Ok(None)
    }
}

fn missing(slot: &Slot<'_>) -> Error {
    Error::MissingValue {
        name: slot.display_name().to_string(),
    }
}
