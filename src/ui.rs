// Terminal helpers: JSON pretty-printing, status highlighting and the
// numbered choice prompt. Prompting goes through `dialoguer` so input
// editing behaves the same as in the rest of the CLI.

use crate::error::{Error, Result};
use crossterm::style::{Attribute, Color, Stylize};
use crossterm::tty::IsTty;
use dialoguer::Input;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;
use std::fmt::Display;

/// Render JSON with sorted keys and a four-space indent.
pub fn get_pretty_json(value: &Value) -> String {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    if value.serialize(&mut ser).is_err() {
        return value.to_string();
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Whether stdout accepts ANSI colors. On Windows this additionally
/// requires an ANSI-aware console (`ANSICON`).
pub fn supports_color() -> bool {
    let ansi_console = !cfg!(windows) || std::env::var_os("ANSICON").is_some();
    ansi_console && std::io::stdout().is_tty()
}

/// Highlight a status word: `up` in green, `down` in red, optionally bold.
/// Plain text when the terminal has no color support.
pub fn hilite(status: &str, bold: bool) -> String {
    hilite_with(status, bold, supports_color())
}

pub fn bold(text: &str) -> String {
    hilite(text, true)
}

/// `hilite` with the color decision made by the caller.
pub fn hilite_with(status: &str, bold: bool, color: bool) -> String {
    if !color {
        return status.to_string();
    }
    let mut styled = status.stylize();
    match status {
        "up" => styled = styled.with(Color::Green),
        "down" => styled = styled.with(Color::Red),
        _ => {}
    }
    if bold {
        styled = styled.attribute(Attribute::Bold);
    }
    styled.to_string()
}

/// Outcome of one line typed at the choice prompt.
#[derive(Debug, PartialEq, Eq)]
enum Choice {
    Abort,
    /// Zero-based index into the offered items.
    Pick(usize),
    Invalid,
}

fn parse_choice(input: &str, count: usize) -> Choice {
    let input = input.trim();
    if input == "x" {
        return Choice::Abort;
    }
    match input.parse::<usize>() {
        Ok(n) if n >= 1 && n <= count => Choice::Pick(n - 1),
        _ => Choice::Invalid,
    }
}

/// Print `items` as a numbered list and ask the user to pick one.
///
/// Returns `None` when the user aborts with `x` (or there is nothing to
/// choose from). Invalid input re-prompts.
pub fn choose_from_array<T: Display>(items: &[T]) -> Result<Option<&T>> {
    if items.is_empty() {
        return Ok(None);
    }
    for (i, item) in items.iter().enumerate() {
        println!("{:3}. {}", i + 1, item);
    }
    println!("{:>3}. {}", "x", "abort and exit");

    loop {
        let input: String = Input::new()
            .with_prompt("Choice")
            .allow_empty(true)
            .interact_text()
            .map_err(Error::Prompt)?;
        match parse_choice(&input, items.len()) {
            Choice::Abort => return Ok(None),
            Choice::Pick(i) => return Ok(items.get(i)),
            Choice::Invalid => println!("Please choose one of the given options"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_choice_accepts_numbers_in_range() {
        assert_eq!(parse_choice("1", 3), Choice::Pick(0));
        assert_eq!(parse_choice(" 3 ", 3), Choice::Pick(2));
        assert_eq!(parse_choice("0", 3), Choice::Invalid);
        assert_eq!(parse_choice("4", 3), Choice::Invalid);
        assert_eq!(parse_choice("two", 3), Choice::Invalid);
        assert_eq!(parse_choice("", 3), Choice::Invalid);
        assert_eq!(parse_choice("x", 3), Choice::Abort);
    }

    #[test]
    fn pretty_json_sorts_keys_and_indents_four() {
        let value = json!({"b": 1, "a": {"z": true, "y": [1]}});
        let expected = "{\n    \"a\": {\n        \"y\": [\n            1\n        ],\n        \"z\": true\n    },\n    \"b\": 1\n}";
        assert_eq!(get_pretty_json(&value), expected);
    }

    #[test]
    fn hilite_without_color_is_plain() {
        assert_eq!(hilite_with("up", true, false), "up");
    }

    #[test]
    fn hilite_with_color_wraps_in_escapes() {
        let up = hilite_with("up", false, true);
        assert!(up.starts_with("\x1b["));
        assert!(up.contains("up"));
        assert_ne!(up, hilite_with("down", false, true));
    }
}
