//! Declarative command-line argument binding.
//!
//! Callers register *slots*: a destination they own, one or more matchers
//! that recognize its tokens, and modifiers (required, repeatable,
//! positional, custom conversion, ...). [`Parser::parse`] then walks the
//! argument vector once, classifying each token as short (`-x`), long
//! (`--xyz`) or context (anything else), resolving it against the matchers
//! registered for that classification and writing converted values through
//! to the destinations.
//!
//! ```
//! use argslot::{Parser, Repeat, repeatable};
//!
//! let mut d = 0.0f64;
//! let mut ints: Vec<i32> = Vec::new();
//! {
//!     let mut p = Parser::new();
//!     p.arg(&mut d, 'd', "double")?;
//!     p.arg_with(&mut ints, ["--int", "-i"], "ints", [repeatable(Repeat::Unbounded)])?;
//!     p.parse(["prog", "-d", "1.5", "--int", "3", "4"])?;
//! }
//! assert_eq!(d, 1.5);
//! assert_eq!(ints, vec![3, 4]);
//! # Ok::<(), argslot::Error>(())
//! ```
//!
//! Not a getopt clone: there is no `--` separator handling, no clustering of
//! short switches (`-abc`) and no abbreviation of long options.

pub mod classify;
pub mod error;
pub mod help;
pub mod matcher;
pub mod modifier;
pub mod parser;
pub mod registry;
pub mod slot;
pub mod value;

pub use classify::{Classification, classify};
pub use error::{ConversionError, DefinitionError, Error, Result};
pub use help::{HelpContext, SlotInfo};
pub use matcher::{
    IntoMatchers, Matcher, MatcherInfo, MatcherSpec, Pattern, pattern, predicate, predicate_labeled,
    prefix,
};
pub use modifier::{
    Modifier, Positional, Repeat, adjacent, convert, default_text, implicit, name, positional,
    repeatable, required,
};
pub use parser::{ParseOutcome, Parser};
pub use registry::{Registry, SlotId};
pub use slot::Slot;
pub use value::{Binding, FromArg};
