//SPDX-License-Identifier: MIT OR Apache-2.0

use proc_macro::{Spacing, TokenStream, TokenTree};
use std::collections::{HashMap, VecDeque};

/// Builds a `compile_error!` invocation.
pub fn compile_error(message: &str) -> TokenStream {
    format!("compile_error!({message:?})")
        .parse()
        .unwrap_or_default()
}

/// True when the front of `input` is `name =` (a single `=`, not `==`).
pub fn at_named_argument(input: &VecDeque<TokenTree>, name: &str) -> bool {
    matches!(
        (input.front(), input.get(1)),
        (Some(TokenTree::Ident(i)), Some(TokenTree::Punct(p)))
            if i.to_string() == name && p.as_char() == '=' && p.spacing() == Spacing::Alone
    )
}

/// Parses a key from the token stream, consuming tokens until '=' is encountered.
///
/// # Returns
/// * `Some(String)` - The key if '=' was found
/// * `Some("".to_string())` - Empty string if another punctuation was found
/// * `None` - If the stream was exhausted without finding '='
fn parse_key(input: &mut VecDeque<TokenTree>) -> Option<String> {
    //basically we go until we get a =.
    let mut key = String::new();
    loop {
        match input.pop_front() {
            Some(TokenTree::Punct(p)) => {
                if p.as_char() == '=' {
                    return Some(key);
                }
                return Some("".to_string());
            }
            Some(TokenTree::Ident(i)) => {
                key.push_str(&i.to_string());
            }
            Some(TokenTree::Literal(l)) => {
                key.push_str(&l.to_string());
            }
            Some(TokenTree::Group(g)) => {
                key.push_str(&g.to_string());
            }
            None => {
                return None;
            }
        }
    }
}

/// Takes the tokens of one expression, up to a top-level ',' or the end of the stream.
///
/// The ',' is consumed.  Commas inside brackets belong to their group and do not end the
/// expression; commas inside `<...>` or closure parameters do, so wrap those in
/// parentheses.
pub fn parse_value(input: &mut VecDeque<TokenTree>) -> TokenStream {
    let mut value = Vec::new();
    loop {
        match input.pop_front() {
            Some(TokenTree::Punct(p)) if p.as_char() == ',' => break,
            Some(token) => value.push(token),
            None => break,
        }
    }
    value.into_iter().collect()
}

/// Builds a HashMap of key-value pairs from the remaining token stream.
///
/// Expects either nothing or a ',' followed by `key=value` pairs:
/// ```ignore
/// # // ignore because: This shows pseudo-code for token stream parsing, not actual runnable code
/// // After format string: , key1=value1, key2=value2, key3=complex_expr()
/// ```
fn build_kvs(input: &mut VecDeque<TokenTree>) -> Result<HashMap<String, TokenStream>, TokenStream> {
    let mut kvs = HashMap::new();
    //first extract the comma.
    if input.is_empty() {
        return Ok(kvs);
    }
    match input.pop_front() {
        Some(TokenTree::Punct(p)) if p.as_char() == ',' => {}
        _ => return Err(compile_error("Expected ','")),
    }
    loop {
        let key = match parse_key(input) {
            Some(k) if k.is_empty() => return Err(compile_error("Expected `key = value`")),
            Some(k) => k,
            None => {
                return Ok(kvs);
            }
        };
        let value = parse_value(input);
        if value.is_empty() {
            return Err(compile_error(&format!("Missing value for key {key}")));
        }
        kvs.insert(key, value);
    }
}

/// Result of processing a format string through `lformat_impl`.
pub struct LFormatResult {
    /// `formatter.write_*()` calls, or a `compile_error!`
    pub output: TokenStream,
    pub ok: bool,
}

impl LFormatResult {
    fn error(message: &str) -> Self {
        Self {
            output: compile_error(message),
            ok: false,
        }
    }
}

/// Pieces of a format string.
#[derive(Debug, PartialEq)]
enum Piece {
    /// Source text of a string literal, escapes intact.
    Literal(String),
    Key(String),
}

/**
Splits the inside of a string literal into literal text and `{key}` placeholders.

The literal's source text is kept as written, so escapes such as `\n` and `\u{1F600}`
pass through untouched and are interpreted when the text is emitted as a new literal.
`{{` and `}}` produce a single brace.
*/
fn split_format(format_string: &str) -> Result<Vec<Piece>, &'static str> {
    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut chars = format_string.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                literal.push(c);
                let Some(escaped) = chars.next() else { break };
                literal.push(escaped);
                if escaped == 'u' && chars.peek() == Some(&'{') {
                    for u in chars.by_ref() {
                        literal.push(u);
                        if u == '}' {
                            break;
                        }
                    }
                }
            }
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '}' => return Err("Unmatched '}' in format string; write '}}' for a literal brace"),
            '{' => {
                let mut key = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(k) => key.push(k),
                        None => return Err("Expected '}'"),
                    }
                }
                if !literal.is_empty() {
                    pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                }
                pieces.push(Piece::Key(key.trim().to_string()));
            }
            _ => literal.push(c),
        }
    }
    if !literal.is_empty() {
        pieces.push(Piece::Literal(literal));
    }
    Ok(pieces)
}

/// Core implementation for format string processing and code generation.
///
/// Transforms a format string with embedded `{key}` placeholders, followed by `key=value`
/// pairs, into a sequence of `formatter.write_literal()` and `formatter.write_val()` calls.
///
/// ```ignore
/// # // ignore because: This shows pseudo-code for code generation, not actual runnable code
/// // Input: "Hello {name}!", name="world"
/// // Generates:
/// // formatter.write_literal("Hello ");
/// // formatter.write_val(&("world"));
/// // formatter.write_literal("!");
/// ```
///
/// # Error Conditions
/// - Non-string-literal format string
/// - A placeholder without a value
/// - Malformed key-value syntax
/// - Unbalanced braces in the format string
pub fn lformat_impl(collect: &mut VecDeque<TokenTree>, formatter: &str) -> LFormatResult {
    let format_string = match collect.pop_front() {
        Some(TokenTree::Literal(l)) => {
            let out = l.to_string();
            if !out.starts_with('"') || !out.ends_with('"') || out.len() < 2 {
                return LFormatResult::error("Expected a string literal");
            }
            out[1..out.len() - 1].to_string()
        }
        _ => return LFormatResult::error("Expected a string literal"),
    };

    //parse kv section
    let kvs = match build_kvs(collect) {
        Ok(kvs) => kvs,
        Err(e) => {
            return LFormatResult {
                output: e,
                ok: false,
            };
        }
    };
    let pieces = match split_format(&format_string) {
        Ok(pieces) => pieces,
        Err(e) => return LFormatResult::error(e),
    };

    let mut source = String::new();
    for piece in pieces {
        match piece {
            Piece::Literal(literal) => {
                source.push_str(&format!("{formatter}.write_literal(\"{literal}\");\n"));
            }
            Piece::Key(key) => {
                let value = match kvs.get(&key) {
                    Some(value) => value,
                    None => return LFormatResult::error(&format!("Key {key} not found")),
                };
                source.push_str(&format!("{formatter}.write_val(&({value}));\n"));
            }
        }
    }
    match source.parse() {
        Ok(output) => LFormatResult { output, ok: true },
        Err(_) => LFormatResult::error("Could not parse format arguments"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> Piece {
        Piece::Literal(s.to_string())
    }
    fn key(s: &str) -> Piece {
        Piece::Key(s.to_string())
    }

    #[test]
    fn splits_keys_and_literals() {
        assert_eq!(
            split_format("Hello {name}, {n} new").unwrap(),
            [lit("Hello "), key("name"), lit(", "), key("n"), lit(" new")]
        );
    }

    #[test]
    fn doubled_braces_are_literal() {
        assert_eq!(
            split_format("{{a}} {b}").unwrap(),
            [lit("{a} "), key("b")]
        );
    }

    #[test]
    fn escapes_are_kept() {
        assert_eq!(
            split_format(r"tab\t smile\u{1F600} {x}").unwrap(),
            [lit(r"tab\t smile\u{1F600} "), key("x")]
        );
        assert_eq!(split_format(r#"quote\" {x}"#).unwrap(), [lit(r#"quote\" "#), key("x")]);
    }

    #[test]
    fn unbalanced_braces_are_errors() {
        assert!(split_format("open {never").is_err());
        assert!(split_format("stray } brace").is_err());
    }
}
