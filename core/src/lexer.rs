//! Whitespace tokenizer with single and double quote support.
//!
//! Tokens keep their quote characters; [`Token::quoted`] records whether a
//! single matching pair of quotes spans the whole token. Stripping the
//! quotes is left to [`coerce`](crate::coerce), which is the only place that
//! interprets token text.

use thiserror::Error;

/// One whitespace-delimited piece of a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Raw token text, quotes included.
    pub text: String,
    /// `true` iff one matching pair of `'` or `"` spans the whole token.
    pub quoted: bool,
}

impl Token {
    /// Creates a token.
    pub fn new(text: impl Into<String>, quoted: bool) -> Self {
        Self {
            text: text.into(),
            quoted,
        }
    }
}

/// Fatal tokenizer failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LexError {
    /// The line contained no tokens.
    #[error("empty command")]
    Empty,
    /// A quote was opened and the line ended before it closed.
    #[error("unterminated {quote} quote opened at column {column}")]
    UnterminatedQuote {
        /// Opening quote character.
        quote: char,
        /// Character offset of the opening quote.
        column: usize,
    },
}

fn is_quote(ch: char) -> bool {
    ch == '\'' || ch == '"'
}

/// Per-token bookkeeping used to decide whether the token is fully quoted.
#[derive(Default)]
struct Pending {
    text: String,
    spans: usize,
    opens_with_quote: bool,
    closed_at_end: bool,
}

impl Pending {
    fn is_started(&self) -> bool {
        !self.text.is_empty()
    }

    fn push(&mut self, ch: char) {
        self.text.push(ch);
        self.closed_at_end = false;
    }

    fn finish(&mut self) -> Token {
        let pending = std::mem::take(self);
        let quoted = pending.spans == 1 && pending.opens_with_quote && pending.closed_at_end;
        Token {
            text: pending.text,
            quoted,
        }
    }
}

/// Splits `line` into tokens.
///
/// Whitespace separates tokens outside quotes and is preserved inside them.
/// A quote may open in the middle of a token (`key="a b"`); such a token is
/// still one token but is not flagged as quoted.
///
/// # Errors
///
/// Returns [`LexError::UnterminatedQuote`] when a quote never closes and
/// [`LexError::Empty`] when the line holds no tokens.
///
/// # Examples
///
/// ```
/// use labelist_core::{tokenize, Token};
///
/// let tokens = tokenize("set --key 'a b' 10").unwrap();
/// assert_eq!(
///     tokens,
///     vec![
///         Token::new("set", false),
///         Token::new("--key", false),
///         Token::new("'a b'", true),
///         Token::new("10", false),
///     ]
/// );
/// assert!(tokenize("   ").is_err());
/// ```
pub fn tokenize(line: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut pending = Pending::default();
    let mut open: Option<(char, usize)> = None;

    for (column, ch) in line.chars().enumerate() {
        match open {
            Some((quote, _)) if ch == quote => {
                pending.text.push(ch);
                pending.closed_at_end = true;
                open = None;
            }
            Some(_) => pending.push(ch),
            None if is_quote(ch) => {
                if !pending.is_started() {
                    pending.opens_with_quote = true;
                }
                pending.push(ch);
                pending.spans += 1;
                open = Some((ch, column));
            }
            None if ch.is_whitespace() => {
                if pending.is_started() {
                    tokens.push(pending.finish());
                }
            }
            None => pending.push(ch),
        }
    }

    if let Some((quote, column)) = open {
        return Err(LexError::UnterminatedQuote { quote, column });
    }
    if pending.is_started() {
        tokens.push(pending.finish());
    }
    if tokens.is_empty() {
        return Err(LexError::Empty);
    }
    Ok(tokens)
}

/// Splits a line into `;`-separated statements, trimmed, with empty ones
/// dropped.
///
/// Semicolons inside a quoted span do not split. An unterminated quote
/// swallows the rest of the line into the current statement so the parser
/// can report it.
///
/// # Examples
///
/// ```
/// use labelist_core::split_statements;
///
/// assert_eq!(
///     split_statements("cd main; ;ask 'a; b' ;exit"),
///     vec!["cd main", "ask 'a; b'", "exit"]
/// );
/// ```
pub fn split_statements(line: &str) -> Vec<&str> {
    let mut statements = Vec::new();
    let mut open: Option<char> = None;
    let mut start = 0;

    for (idx, ch) in line.char_indices() {
        match open {
            Some(quote) if ch == quote => open = None,
            Some(_) => {}
            None if is_quote(ch) => open = Some(ch),
            None if ch == ';' => {
                statements.push(&line[start..idx]);
                start = idx + ch.len_utf8();
            }
            None => {}
        }
    }
    statements.push(&line[start..]);

    statements
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    fn quoted(tokens: &[Token]) -> Vec<bool> {
        tokens.iter().map(|t| t.quoted).collect()
    }

    #[test]
    fn test_splits_on_any_whitespace() {
        let tokens = tokenize("  ls\t--all \n -l  ").unwrap();
        assert_eq!(texts(&tokens), vec!["ls", "--all", "-l"]);
        assert_eq!(quoted(&tokens), vec![false, false, false]);
    }

    #[test]
    fn test_preserves_whitespace_inside_quotes() {
        let tokens = tokenize("ask \"why  is\tthe sky\" 'blue '").unwrap();
        assert_eq!(texts(&tokens), vec!["ask", "\"why  is\tthe sky\"", "'blue '"]);
        assert_eq!(quoted(&tokens), vec![false, true, true]);
    }

    #[test]
    fn test_other_quote_kind_is_literal_inside_span() {
        let tokens = tokenize(r#"say "it's" 'a "b"'"#).unwrap();
        assert_eq!(texts(&tokens), vec!["say", "\"it's\"", "'a \"b\"'"]);
        assert_eq!(quoted(&tokens), vec![false, true, true]);
    }

    #[test]
    fn test_partially_quoted_token_is_not_quoted() {
        let tokens = tokenize("key='a b' 'x'y 'a''b'").unwrap();
        assert_eq!(texts(&tokens), vec!["key='a b'", "'x'y", "'a''b'"]);
        assert_eq!(quoted(&tokens), vec![false, false, false]);
    }

    #[test]
    fn test_empty_quotes_form_a_token() {
        let tokens = tokenize("set --value ''").unwrap();
        assert_eq!(texts(&tokens), vec!["set", "--value", "''"]);
        assert!(tokens[2].quoted);
    }

    #[test]
    fn test_unterminated_quote_reports_position() {
        assert_eq!(
            tokenize("ask 'hello world"),
            Err(LexError::UnterminatedQuote {
                quote: '\'',
                column: 4
            })
        );
        assert_eq!(
            tokenize("a \"b"),
            Err(LexError::UnterminatedQuote {
                quote: '"',
                column: 2
            })
        );
    }

    #[test]
    fn test_blank_input_is_empty() {
        assert_eq!(tokenize(""), Err(LexError::Empty));
        assert_eq!(tokenize(" \t "), Err(LexError::Empty));
    }

    #[test]
    fn test_split_statements_ignores_quoted_semicolons() {
        assert_eq!(split_statements("a; b ;c"), vec!["a", "b", "c"]);
        assert_eq!(split_statements("a \"x;y\"; b"), vec!["a \"x;y\"", "b"]);
        assert_eq!(split_statements("a 'x; b"), vec!["a 'x; b"]);
        assert!(split_statements(" ; ;; ").is_empty());
    }
}
