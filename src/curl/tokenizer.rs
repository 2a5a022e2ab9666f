//! Shell-style word splitting for a single curl command line.
//!
//! Only the subset of shell quoting that pasted curl commands rely on is
//! understood: whitespace separation, `'` and `"` quoted words with a few
//! backslash escapes, and option words. There is no expansion of any kind.

use std::iter::Peekable;
use std::str::Chars;

/// Splits `input` into tokens.
///
/// Never fails: an unterminated quote runs to the end of the input and an
/// empty quoted word (`""`) yields no token at all.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if starts_option(&chars) {
            tokens.push(read_option(&mut chars));
            continue;
        }

        let quote = match c {
            '"' | '\'' => {
                chars.next();
                Some(c)
            }
            _ => None,
        };

        let word = match quote {
            Some(q) => read_quoted(&mut chars, q),
            None => read_bare(&mut chars),
        };
        if !word.is_empty() {
            tokens.push(word);
        }
    }

    tokens
}

/// `-` followed by `-` or an ASCII letter.
fn starts_option(chars: &Peekable<Chars<'_>>) -> bool {
    let mut ahead = chars.clone();
    matches!(ahead.next(), Some('-'))
        && matches!(ahead.next(), Some(n) if n == '-' || n.is_ascii_alphabetic())
}

/// Reads an option word up to whitespace or `=`. The `=` is left in place.
fn read_option(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut token = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() || c == '=' {
            break;
        }
        token.push(c);
        chars.next();
    }
    token
}

fn read_quoted(chars: &mut Peekable<Chars<'_>>, quote: char) -> String {
    let mut buf = String::new();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                buf.push(match next {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    other => other,
                });
                continue;
            }
            buf.push(c);
            break;
        }
        if c == quote {
            break;
        }
        buf.push(c);
    }
    buf
}

fn read_bare(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut buf = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            break;
        }
        buf.push(c);
        chars.next();
    }
    buf
}
