// src/args/tokenize.rs

//! Command-line style splitting of the property blob.
//!
//! Tokens are separated by spaces or tabs outside of quotes. Single and
//! double quotes group text (quotes themselves are removed) and do not nest;
//! backslashes are literal so Windows paths survive. Line breaks are kept
//! inside tokens and split afterwards by [`split_fragments`].

use crate::errors::{Result, ScanError};

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    InSingle,
    InDouble,
}

/// Split `input` into tokens, honouring quotes.
pub fn split_command_line(input: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut last_was_quoted = false;
    let mut state = State::Normal;
    let mut quote_start = 0;

    for (pos, c) in input.chars().enumerate() {
        match state {
            State::InSingle => {
                if c == '\'' {
                    last_was_quoted = true;
                    state = State::Normal;
                } else {
                    current.push(c);
                }
            }
            State::InDouble => {
                if c == '"' {
                    last_was_quoted = true;
                    state = State::Normal;
                } else {
                    current.push(c);
                }
            }
            State::Normal => match c {
                '\'' => {
                    state = State::InSingle;
                    quote_start = pos;
                }
                '"' => {
                    state = State::InDouble;
                    quote_start = pos;
                }
                ' ' | '\t' => {
                    if last_was_quoted || !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                    last_was_quoted = false;
                }
                c => current.push(c),
            },
        }
    }

    if state != State::Normal {
        let quote = if state == State::InSingle { "single" } else { "double" };
        return Err(ScanError::ArgumentParse(format!(
            "unterminated {quote} quote starting at character {}",
            quote_start + 1
        )));
    }

    if last_was_quoted || !current.is_empty() {
        tokens.push(current);
    }

    Ok(tokens)
}

/// Tokens of `blob` split further on line breaks, blank pieces dropped.
pub fn split_fragments(blob: &str) -> Result<Vec<String>> {
    let fragments = split_command_line(blob)?
        .iter()
        .flat_map(|token| token.split('\n'))
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();
    Ok(fragments)
}
