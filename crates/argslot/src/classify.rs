use serde::Serialize;

/// Token shape, decided purely from the run of leading dashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    /// `-x`
    Short,
    /// `--xyz`
    Long,
    /// No dashes, or three and more.
    Context,
}

impl Classification {
    pub const ALL: [Classification; 3] = [Self::Short, Self::Long, Self::Context];

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Short => 0,
            Self::Long => 1,
            Self::Context => 2,
        }
    }
}

/// Classify a raw token. Total over all strings, including the empty one.
///
/// The same rule is used for placing matchers at registration and for
/// picking the bucket a token is looked up in.
pub fn classify(token: &str) -> Classification {
    match token.chars().take_while(|&c| c == '-').count() {
        1 => Classification::Short,
        2 => Classification::Long,
        _ => Classification::Context,
    }
}

/// A token split into the part used for matching and an attached value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Split<'t> {
    pub key: &'t str,
    pub inline: Option<&'t str>,
}

/// Extract an inline value for dash-form tokens.
///
/// `--int=7` gives `--int` + `7`, `-d1.5` gives `-d` + `1.5`. Context tokens
/// are returned whole; whether they act as a value is up to the engine.
pub(crate) fn split_inline(token: &str, class: Classification) -> Split<'_> {
    match class {
        Classification::Long => match token.split_once('=') {
            Some((key, value)) => Split {
                key,
                inline: Some(value),
            },
            None => Split {
                key: token,
                inline: None,
            },
        },
        Classification::Short => {
            // '-' is one byte; the flag char may not be.
            let flag_end = token[1..].chars().next().map_or(1, |c| 1 + c.len_utf8());
            let (key, rest) = token.split_at(flag_end);
            Split {
                key,
                inline: (!rest.is_empty()).then_some(rest),
            }
        }
        Classification::Context => Split {
            key: token,
            inline: None,
        },
    }
}
