//! Rules for recognizing which slot a raw token belongs to.

use std::fmt;

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::classify::{Classification, classify};
use crate::error::DefinitionError;

const PREDICATE_LABEL: &str = "<predicate>";

/// What the caller hands to `Parser::arg` to describe a matcher.
pub enum MatcherSpec<'a> {
    Char(char),
    Literal(String),
    Prefix(String),
    /// A caller-compiled regex, used exactly as built.
    Regex(Regex),
    Pattern(Pattern),
    Predicate {
        label: String,
        test: Box<dyn Fn(&str) -> bool + 'a>,
    },
}

impl fmt::Debug for MatcherSpec<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => f.debug_tuple("Char").field(c).finish(),
            Self::Literal(s) => f.debug_tuple("Literal").field(s).finish(),
            Self::Prefix(s) => f.debug_tuple("Prefix").field(s).finish(),
            Self::Regex(re) => f.debug_tuple("Regex").field(&re.as_str()).finish(),
            Self::Pattern(p) => f.debug_tuple("Pattern").field(&p.source).finish(),
            Self::Predicate { label, .. } => f.debug_tuple("Predicate").field(label).finish(),
        }
    }
}

/// Regex source plus compile options. The library anchors it at both ends
/// of the token, so alternatives are tried against the whole token.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    case_insensitive: bool,
    multi_line: bool,
    dot_matches_new_line: bool,
    ignore_whitespace: bool,
    unicode: bool,
    size_limit: Option<usize>,
}

/// Start a full-token regex matcher from `source`.
pub fn pattern(source: impl Into<String>) -> Pattern {
    Pattern {
        source: source.into(),
        case_insensitive: false,
        multi_line: false,
        dot_matches_new_line: false,
        ignore_whitespace: false,
        unicode: true,
        size_limit: None,
    }
}

impl Pattern {
    pub fn case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    pub fn multi_line(mut self, yes: bool) -> Self {
        self.multi_line = yes;
        self
    }

    pub fn dot_matches_new_line(mut self, yes: bool) -> Self {
        self.dot_matches_new_line = yes;
        self
    }

    pub fn ignore_whitespace(mut self, yes: bool) -> Self {
        self.ignore_whitespace = yes;
        self
    }

    pub fn unicode(mut self, yes: bool) -> Self {
        self.unicode = yes;
        self
    }

    pub fn size_limit(mut self, bytes: usize) -> Self {
        self.size_limit = Some(bytes);
        self
    }

    fn compile(&self) -> Result<Regex, DefinitionError> {
        // `\A`/`\z` stay text anchors under multi_line; the newline ends a
        // trailing `#` comment under ignore_whitespace.
        let anchored = if self.ignore_whitespace {
            format!("\\A(?:{}\n)\\z", self.source)
        } else {
            format!("\\A(?:{})\\z", self.source)
        };
        let mut builder = RegexBuilder::new(&anchored);
        builder
            .case_insensitive(self.case_insensitive)
            .multi_line(self.multi_line)
            .dot_matches_new_line(self.dot_matches_new_line)
            .ignore_whitespace(self.ignore_whitespace)
            .unicode(self.unicode);
        if let Some(limit) = self.size_limit {
            builder.size_limit(limit);
        }
        builder.build().map_err(|e| DefinitionError::InvalidPattern {
            pattern: self.source.clone(),
            reason: e.to_string(),
        })
    }
}

/// Match any token that starts with `text`.
///
/// Classified like a literal; a short-form prefix is a plain char matcher.
pub fn prefix<'a>(text: impl Into<String>) -> MatcherSpec<'a> {
    MatcherSpec::Prefix(text.into())
}

/// Match any token `test` accepts. Always a context matcher.
pub fn predicate<'a>(test: impl Fn(&str) -> bool + 'a) -> MatcherSpec<'a> {
    MatcherSpec::Predicate {
        label: PREDICATE_LABEL.to_string(),
        test: Box::new(test),
    }
}

/// Like [`predicate`], with a label for help and diagnostics.
pub fn predicate_labeled<'a>(
    label: impl Into<String>,
    test: impl Fn(&str) -> bool + 'a,
) -> MatcherSpec<'a> {
    MatcherSpec::Predicate {
        label: label.into(),
        test: Box::new(test),
    }
}

impl From<char> for MatcherSpec<'_> {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

impl From<&str> for MatcherSpec<'_> {
    fn from(s: &str) -> Self {
        Self::Literal(s.to_string())
    }
}

impl From<String> for MatcherSpec<'_> {
    fn from(s: String) -> Self {
        Self::Literal(s)
    }
}

impl From<Regex> for MatcherSpec<'_> {
    fn from(re: Regex) -> Self {
        Self::Regex(re)
    }
}

impl From<Pattern> for MatcherSpec<'_> {
    fn from(p: Pattern) -> Self {
        Self::Pattern(p)
    }
}

/// One or more matcher specs bound to the same slot.
///
/// Accepts a single matcher, a homogeneous list of aliases, or a tuple of
/// heterogeneous specs.
pub trait IntoMatchers<'a> {
    fn into_specs(self) -> Vec<MatcherSpec<'a>>;
}

impl<'a> IntoMatchers<'a> for MatcherSpec<'a> {
    fn into_specs(self) -> Vec<MatcherSpec<'a>> {
        vec![self]
    }
}

impl<'a> IntoMatchers<'a> for char {
    fn into_specs(self) -> Vec<MatcherSpec<'a>> {
        vec![self.into()]
    }
}

impl<'a> IntoMatchers<'a> for &str {
    fn into_specs(self) -> Vec<MatcherSpec<'a>> {
        vec![self.into()]
    }
}

impl<'a> IntoMatchers<'a> for String {
    fn into_specs(self) -> Vec<MatcherSpec<'a>> {
        vec![self.into()]
    }
}

impl<'a> IntoMatchers<'a> for Regex {
    fn into_specs(self) -> Vec<MatcherSpec<'a>> {
        vec![self.into()]
    }
}

impl<'a> IntoMatchers<'a> for Pattern {
    fn into_specs(self) -> Vec<MatcherSpec<'a>> {
        vec![self.into()]
    }
}

impl<'a, T, const N: usize> IntoMatchers<'a> for [T; N]
where
    T: Into<MatcherSpec<'a>>,
{
    fn into_specs(self) -> Vec<MatcherSpec<'a>> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<'a, T> IntoMatchers<'a> for Vec<T>
where
    T: Into<MatcherSpec<'a>>,
{
    fn into_specs(self) -> Vec<MatcherSpec<'a>> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<'a> IntoMatchers<'a> for &[&str] {
    fn into_specs(self) -> Vec<MatcherSpec<'a>> {
        self.iter().map(|&s| s.into()).collect()
    }
}

macro_rules! tuple_matchers {
    ($($name:ident),+) => {
        impl<'a, $($name),+> IntoMatchers<'a> for ($($name,)+)
        where
            $($name: Into<MatcherSpec<'a>>),+
        {
            #[allow(non_snake_case)]
            fn into_specs(self) -> Vec<MatcherSpec<'a>> {
                let ($($name,)+) = self;
                vec![$($name.into()),+]
            }
        }
    };
}

tuple_matchers!(A);
tuple_matchers!(A, B);
tuple_matchers!(A, B, C);
tuple_matchers!(A, B, C, D);

enum Rule<'a> {
    Char(char),
    Exact(String),
    Prefix(String),
    /// Matches when the leftmost-first match spans the whole token.
    Whole(Regex),
    Anchored(Regex),
    Predicate(Box<dyn Fn(&str) -> bool + 'a>),
}

/// An immutable predicate over one raw token, tagged with the
/// classification it was built for.
pub struct Matcher<'a> {
    rule: Rule<'a>,
    class: Classification,
    label: String,
}

impl fmt::Debug for Matcher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("label", &self.label)
            .field("class", &self.class)
            .finish()
    }
}

/// Read-only view of a matcher for help and schema output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MatcherInfo {
    pub label: String,
    pub class: Classification,
    pub kind: &'static str,
}

impl<'a> Matcher<'a> {
    /// Build a matcher, choosing the implementation from the input's shape.
    ///
    /// A textual literal that classifies as short becomes a char matcher.
    pub fn build(spec: MatcherSpec<'a>) -> Result<Self, DefinitionError> {
        match spec {
            MatcherSpec::Char(c) => Self::short(c, format!("-{c}")),
            MatcherSpec::Literal(text) => match classify(&text) {
                Classification::Short => Self::short_literal(text),
                class => Ok(Self {
                    label: text.clone(),
                    rule: Rule::Exact(text),
                    class,
                }),
            },
            MatcherSpec::Prefix(text) => match classify(&text) {
                Classification::Short => Self::short_literal(text),
                class => Ok(Self {
                    label: format!("{text}*"),
                    rule: Rule::Prefix(text),
                    class,
                }),
            },
            MatcherSpec::Regex(re) => Ok(Self {
                label: re.as_str().to_string(),
                rule: Rule::Whole(re),
                class: Classification::Context,
            }),
            MatcherSpec::Pattern(p) => Ok(Self {
                rule: Rule::Anchored(p.compile()?),
                label: p.source,
                class: Classification::Context,
            }),
            MatcherSpec::Predicate { label, test } => Ok(Self {
                rule: Rule::Predicate(test),
                class: Classification::Context,
                label,
            }),
        }
    }

    fn short_literal(text: String) -> Result<Self, DefinitionError> {
        let mut rest = text[1..].chars();
        match (rest.next(), rest.next()) {
            (Some(c), None) => Self::short(c, text.clone()),
            (None, _) => Err(DefinitionError::ShortEmpty { literal: text }),
            (Some(_), Some(_)) => Err(DefinitionError::ShortTooLong { literal: text }),
        }
    }

    fn short(c: char, label: String) -> Result<Self, DefinitionError> {
        if c == '-' {
            return Err(DefinitionError::ShortEmpty { literal: label });
        }
        Ok(Self {
            rule: Rule::Char(c),
            class: Classification::Short,
            label,
        })
    }

    pub fn matches(&self, token: &str) -> bool {
        match &self.rule {
            Rule::Char(c) => {
                let mut chars = token.chars();
                chars.next() == Some('-') && chars.next() == Some(*c) && chars.next().is_none()
            }
            Rule::Exact(text) => token == text,
            Rule::Prefix(text) => token.starts_with(text.as_str()),
            Rule::Whole(re) => re
                .find(token)
                .is_some_and(|m| m.start() == 0 && m.end() == token.len()),
            Rule::Anchored(re) => re.is_match(token),
            Rule::Predicate(test) => test(token),
        }
    }

    pub fn class(&self) -> Classification {
        self.class
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn info(&self) -> MatcherInfo {
        let kind = match &self.rule {
            Rule::Char(_) => "char",
            Rule::Exact(_) => "literal",
            Rule::Prefix(_) => "prefix",
            Rule::Whole(_) => "regex",
            Rule::Anchored(_) => "pattern",
            Rule::Predicate(_) => "predicate",
        };
        MatcherInfo {
            label: self.label.clone(),
            class: self.class,
            kind,
        }
    }
}
