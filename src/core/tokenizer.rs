//! Command-line tokenizer.
//!
//! Splits a console line into `;`-separated statements and each statement
//! into whitespace-separated tokens. A `"`-delimited run is one token even if
//! it contains whitespace or `;`. Parsing never fails: an unterminated quote
//! is taken as a literal character.

/// One statement of a console line: the command or variable name followed by
/// its arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedStatement {
    tokens: Vec<String>,
}

impl ParsedStatement {
    /// Create a statement from a list of tokens.
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    /// The command or variable name (first token), or `""` if empty.
    #[inline]
    pub fn name(&self) -> &str {
        self.tokens.first().map(String::as_str).unwrap_or("")
    }

    /// The tokens after the name.
    #[inline]
    pub fn args(&self) -> &[String] {
        self.tokens.get(1..).unwrap_or(&[])
    }

    /// All tokens, including the name.
    #[inline]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// The last token, if any.
    #[inline]
    pub fn last(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }

    /// Number of tokens, including the name.
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if the statement has no tokens.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Append a token.
    pub fn push(&mut self, token: impl Into<String>) {
        self.tokens.push(token.into());
    }
}

/// All statements parsed from one console line, plus the raw line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSequence {
    source: String,
    statements: Vec<ParsedStatement>,
    open: bool,
}

impl ParsedSequence {
    /// The raw line this sequence was parsed from.
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The parsed statements, in order.
    #[inline]
    pub fn statements(&self) -> &[ParsedStatement] {
        &self.statements
    }

    /// Mutable access to the statements.
    #[inline]
    pub fn statements_mut(&mut self) -> &mut [ParsedStatement] {
        &mut self.statements
    }

    /// The last statement, if any.
    #[inline]
    pub fn last(&self) -> Option<&ParsedStatement> {
        self.statements.last()
    }

    /// Whether the last statement is the unterminated tail of the line.
    ///
    /// `false` when the line is empty or ends with `;` (plus optional
    /// whitespace), i.e. when no statement is currently being typed.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether the raw line ends in a whitespace character.
    pub fn ends_with_whitespace(&self) -> bool {
        self.source.ends_with(char::is_whitespace)
    }

    /// Number of statements.
    #[inline]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Check if no statements were parsed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Iterate over the statements.
    pub fn iter(&self) -> impl Iterator<Item = &ParsedStatement> {
        self.statements.iter()
    }
}

impl<'a> IntoIterator for &'a ParsedSequence {
    type Item = &'a ParsedStatement;
    type IntoIter = std::slice::Iter<'a, ParsedStatement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}

/// Parse a console line into statements.
///
/// # Syntax
///
/// - Tokens are separated by whitespace
/// - `;` ends the current statement; empty statements are dropped
/// - `"..."` is a single token with the quotes stripped, as long as a closing
///   quote exists; otherwise the `"` is an ordinary character
/// - Inside quotes every char up to the next `"` is literal, backslashes
///   included
/// - Case is preserved
///
/// # Examples
///
/// ```
/// use bevy_dev_console::core::parse;
///
/// let seq = parse(r#"bind f1 "tp 5 ~ 10; timescale 2""#);
/// assert_eq!(seq.len(), 1);
/// assert_eq!(seq.statements()[0].args(), ["f1", "tp 5 ~ 10; timescale 2"]);
///
/// let seq = parse("noclip 1; timescale 0.5");
/// assert_eq!(seq.len(), 2);
/// assert_eq!(seq.statements()[1].name(), "timescale");
/// ```
pub fn parse(raw: &str) -> ParsedSequence {
    let mut statements = Vec::new();
    let mut current = ParsedStatement::default();
    let mut token = String::new();
    let mut pos = 0;

    while let Some(c) = raw[pos..].chars().next() {
        let next = pos + c.len_utf8();

        match c {
            '"' => match read_quoted(&raw[next..]) {
                Some((content, consumed)) => {
                    flush_token(&mut token, &mut current);
                    current.push(content);
                    pos = next + consumed;
                    continue;
                }
                None => token.push(c),
            },
            ';' => {
                flush_token(&mut token, &mut current);
                if !current.is_empty() {
                    statements.push(std::mem::take(&mut current));
                }
            }
            c if c.is_whitespace() => flush_token(&mut token, &mut current),
            _ => token.push(c),
        }

        pos = next;
    }

    flush_token(&mut token, &mut current);
    let open = !current.is_empty();
    if open {
        statements.push(current);
    }

    ParsedSequence {
        source: raw.to_string(),
        statements,
        open,
    }
}

fn flush_token(token: &mut String, statement: &mut ParsedStatement) {
    if !token.is_empty() {
        statement.push(std::mem::take(token));
    }
}

/// Read the body of a quoted run starting right after the opening quote.
///
/// Returns the content and the number of bytes consumed, including the
/// closing quote, or `None` if the quote is never closed.
fn read_quoted(input: &str) -> Option<(String, usize)> {
    let end = input.find('"')?;
    Some((input[..end].to_string(), end + 1))
}

/// Quote a token so that [`parse`] reads it back as a single token.
///
/// Tokens without whitespace, quotes or `;` are returned unchanged. A token
/// that itself contains `"` cannot be quoted and reads back split at it.
pub fn quote(token: &str) -> String {
    let needs_quotes = token.is_empty()
        || token
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == ';');

    if !needs_quotes {
        return token.to_string();
    }

    format!("\"{}\"", token)
}
