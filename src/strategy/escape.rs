// src/strategy/escape.rs

//! Per-strategy argument escapers.
//!
//! Each escaper turns one raw argument into a form that the strategy's
//! interpreter reads back as exactly that single argument.

/// Pure `&str -> String` escaping function carried by a strategy.
pub type Escaper = fn(&str) -> String;

/// Arguments handed straight to `java` are never re-parsed by a shell.
pub fn identity(arg: &str) -> String {
    arg.to_string()
}

/// Characters a POSIX shell treats specially, escaped with a backslash.
const XSI_SPECIAL: &[char] = &[
    '|', '&', ';', '<', '>', '(', ')', '$', '`', '\\', '"', '\'', ' ', '\t', '*', '?', '[',
    '#', '~', '=', '%',
];

/// Backslash escaping for POSIX (XSI) shells. Line breaks are dropped, a
/// backslash-newline pair being a line continuation.
pub fn escape_xsi(arg: &str) -> String {
    let mut out = String::with_capacity(arg.len() + 8);
    let mut chars = arg.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\n' => {}
            '\r' if chars.peek() == Some(&'\n') => {}
            c if XSI_SPECIAL.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

/// Characters PowerShell treats specially, escaped with a backtick.
const POWERSHELL_SPECIAL: &[char] = &[
    '`', ' ', '\t', ',', ';', '(', ')', '{', '}', '@', '\'', '"', '$', '#', '|', '&', '<', '>',
];

/// Backtick escaping for PowerShell.
pub fn escape_powershell(arg: &str) -> String {
    let mut out = String::with_capacity(arg.len() + 8);
    for c in arg.chars() {
        if POWERSHELL_SPECIAL.contains(&c) {
            out.push('`');
        }
        out.push(c);
    }
    out
}
