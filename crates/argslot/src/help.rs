//! Help text and schema export built from the registered slots.

use serde::Serialize;

use crate::classify::Classification;
use crate::matcher::MatcherInfo;
use crate::modifier::{Positional, Repeat};
use crate::slot::Slot;

/// Read-only description of one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SlotInfo {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub matchers: Vec<MatcherInfo>,
    pub value_type: &'static str,
    pub required: bool,
    pub repeat: Repeat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub positional: Option<Positional>,
    pub switch: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl SlotInfo {
    pub(crate) fn from_slot(slot: &Slot<'_>) -> Self {
        Self {
            name: slot.display_name().to_string(),
            description: slot.description().to_string(),
            matchers: slot.matchers().to_vec(),
            value_type: slot.type_name(),
            required: slot.is_required(),
            repeat: slot.repeat(),
            positional: slot.positional(),
            switch: slot.is_switch(),
            default: slot.default_display(),
        }
    }

    fn has_flag(&self) -> bool {
        self.matchers
            .iter()
            .any(|m| m.class != Classification::Context)
    }

    fn is_multiple(&self) -> bool {
        self.repeat != Repeat::Times(1)
    }

    fn value_name(&self) -> String {
        if self.name.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
            self.name.to_ascii_uppercase()
        } else {
            self.value_type.to_ascii_uppercase()
        }
    }
}

/// Where the help text comes from.
#[derive(Debug, Clone, Default)]
pub struct HelpContext<'h> {
    pub program: &'h str,
    pub about: Option<&'h str>,
    /// Labels of the matchers that request help.
    pub help_labels: Vec<String>,
}

fn format_argument_left(info: &SlotInfo) -> String {
    let name = if info.positional.is_some() {
        info.value_name()
    } else {
        let labels: Vec<&str> = info.matchers.iter().map(|m| m.label.as_str()).collect();
        labels.join(" | ")
    };
    let mut out = if info.required {
        format!("<{name}>")
    } else {
        format!("[{name}]")
    };
    if info.is_multiple() {
        out.push_str("...");
    }
    out
}

fn format_option_left(info: &SlotInfo) -> String {
    let labels: Vec<&str> = info.matchers.iter().map(|m| m.label.as_str()).collect();
    let mut out = labels.join(", ");
    if !info.switch {
        out.push_str(&format!(" <{}>", info.value_type));
    }
    if info.is_multiple() {
        out.push_str("...");
    }
    out
}

fn format_help(info: &SlotInfo, show_required: bool) -> String {
    let mut out = info.description.trim().to_string();
    if info.description.trim() != info.name && !info.name.is_empty() && !info.description.is_empty()
    {
        out.push_str(&format!(" ({})", info.name));
    }
    if show_required && info.required {
        if out.is_empty() {
            out.push_str("required");
        } else {
            out.push_str(" (required)");
        }
    }
    if let Repeat::Times(n) = info.repeat {
        if n > 1 {
            out.push_str(&format!(" [max: {n}]"));
        }
    }
    if let Some(default) = &info.default {
        if out.is_empty() {
            out.push_str(&format!("[default: {default}]"));
        } else {
            out.push_str(&format!(" [default: {default}]"));
        }
    }
    out
}

fn push_rows(out: &mut String, title: &str, rows: Vec<(String, String)>) {
    if rows.is_empty() {
        return;
    }
    out.push_str(&format!("\n{title}:\n"));
    let width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    for (left, help) in rows {
        if help.is_empty() {
            out.push_str(&format!("  {}\n", left));
        } else {
            out.push_str(&format!("  {:width$}  {}\n", left, help, width = width));
        }
    }
}

/// Render help for `slots`.
///
/// Slots with a dash-form matcher are listed under `Options`; the rest
/// (context matchers and positional slots) under `Arguments`.
pub fn render(ctx: &HelpContext<'_>, slots: &[SlotInfo]) -> String {
    let mut out = String::new();
    match ctx.about.map(str::trim).filter(|s| !s.is_empty()) {
        Some(about) => out.push_str(&format!("{} - {}\n", ctx.program, about)),
        None => {
            out.push_str(ctx.program);
            out.push('\n');
        }
    }

    let (options, arguments): (Vec<&SlotInfo>, Vec<&SlotInfo>) =
        slots.iter().partition(|s| s.has_flag());

    let mut usage = format!("\nUsage: {}", ctx.program);
    if !options.is_empty() || !ctx.help_labels.is_empty() {
        usage.push_str(" [OPTIONS]");
    }
    for arg in &arguments {
        usage.push(' ');
        usage.push_str(&format_argument_left(arg));
    }
    for opt in options.iter().filter(|o| o.positional.is_some()) {
        usage.push(' ');
        usage.push_str(&format_argument_left(opt));
    }
    out.push_str(&usage);
    out.push('\n');

    let rows: Vec<(String, String)> = arguments
        .iter()
        .map(|a| (format_argument_left(a), format_help(a, false)))
        .collect();
    push_rows(&mut out, "Arguments", rows);

    let mut rows: Vec<(String, String)> = options
        .iter()
        .map(|o| (format_option_left(o), format_help(o, true)))
        .collect();
    if !ctx.help_labels.is_empty() {
        rows.push((
            ctx.help_labels.join(", "),
            "Show help information".to_string(),
        ));
    }
    push_rows(&mut out, "Options", rows);

    out
}
