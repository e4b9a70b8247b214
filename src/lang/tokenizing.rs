use crate::{
    lang::source_buffer::{SourceBuffer, SourceLocation},
    runtime::error::{self, ErrorKind, ScriptError},
};
use std::{
    fmt::{self, Debug, Display, Formatter},
    fs::read_to_string,
};

/// Marks the start of a word definition, or with a word directly attached, a directive.
const DEFINITION_MARKER: char = ':';

/// Ends a word definition.
const DEFINITION_TERMINATOR: &str = ";";

/// Skip everything up to the end of the line.
const LINE_COMMENT_MARKER: char = '#';

const STRING_QUOTE: char = '"';
const COMMENT_OPEN: char = '(';
const COMMENT_CLOSE: char = ')';
const QUOTATION_OPEN: char = '[';
const QUOTATION_CLOSE: char = ']';

/// The lexical class of a token.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TokenKind {
    /// A marker with a keyword attached, `:variable`, `:defer` or `:include`.
    Directive,

    /// The name following a `: ` that starts a word definition.
    WordDefinitionHeader,

    /// The `;` ending a word definition.
    DefinitionTerminator,

    /// Anything else, a word name, a number or a boolean.
    WordOrData,

    /// Raw text between quotes.
    StringLiteral,

    /// A free standing `[`.
    QuotationOpen,

    /// A free standing `]`.
    QuotationClose,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let name = match self {
            TokenKind::Directive => "directive",
            TokenKind::WordDefinitionHeader => "word definition",
            TokenKind::DefinitionTerminator => "definition terminator",
            TokenKind::WordOrData => "word or data",
            TokenKind::StringLiteral => "string literal",
            TokenKind::QuotationOpen => "quotation open",
            TokenKind::QuotationClose => "quotation close",
        };

        write!(f, "{}", name)
    }
}

/// A single lexeme of the language along with where it was found.
///
/// Equality only looks at the kind and the text, two tokens read from different places in the
/// source are still the same token.
#[derive(Clone)]
pub struct Token {
    kind: TokenKind,
    text: String,
    location: SourceLocation,
}

/// A list of tokens found in the source code.
pub type TokenList = Vec<Token>;

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.text == other.text
    }
}

impl Eq for Token {}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.kind {
            TokenKind::StringLiteral => write!(f, "\"{}\"", self.text),
            _ => write!(f, "{}", self.text),
        }
    }
}

/// Include the location and kind for debugging.
impl Debug for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}: {} ({})", self.location, self, self.kind)
    }
}

impl Token {
    pub fn new(kind: TokenKind, text: &str, location: SourceLocation) -> Token {
        Token {
            kind,
            text: text.to_string(),
            location,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn text(&self) -> &String {
        &self.text
    }

    /// Get the token's location in the original source text.
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }
}

/// The fully materialized token sequence for one source unit.  Read front to back with
/// `next_token`, and rewound with `reset` for another pass.
#[derive(Clone, Debug)]
pub struct TokenStream {
    source_name: String,
    tokens: TokenList,
    index: usize,
}

/// One `kind: text` line per token, used by the token dump of the command line tool.
impl Display for TokenStream {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for token in self.tokens.iter() {
            writeln!(f, "{}: {}", token.kind, token)?;
        }

        Ok(())
    }
}

impl TokenStream {
    pub fn new(source_name: &str, tokens: TokenList) -> TokenStream {
        TokenStream {
            source_name: source_name.to_string(),
            tokens,
            index: 0,
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn tokens(&self) -> &TokenList {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.index < self.tokens.len()
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    /// Get the next token, or None once the stream is exhausted.
    pub fn next_token(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();

        if token.is_some() {
            self.index += 1;
        }

        token
    }

    /// Rewind to the first token.
    pub fn reset(&mut self) {
        self.index = 0;
    }
}

/// Check if the given character is considered whitespace.
fn is_whitespace(next: &char) -> bool {
    next.is_whitespace()
}

fn malformed<T>(buffer: &SourceBuffer, message: String) -> error::Result<T> {
    ScriptError::new_as_result(
        ErrorKind::MalformedMarker(message),
        Some(buffer.location().clone()),
        None,
    )
}

/// Is the character under the cursor a free standing marker?  That is, the previous character is
/// whitespace (or we're at the start of the buffer) and the following one is whitespace (or we're
/// at the end of the buffer).
fn is_free_standing(buffer: &mut SourceBuffer, marker: char) -> bool {
    if buffer.peek_next() != Some(marker) {
        return false;
    }

    let before_ok = if buffer.push_back() {
        let before = buffer.next_char();
        before.as_ref().is_some_and(is_whitespace)
    } else {
        true
    };

    let _ = buffer.next_char();
    let after = buffer.peek_next();
    buffer.push_back();

    before_ok && after.as_ref().is_none_or(is_whitespace)
}

/// Skip the remainder of the current line, including the newline itself.
fn skip_line(buffer: &mut SourceBuffer) {
    while let Some(next) = buffer.next_char() {
        if next == '\n' {
            break;
        }
    }
}

/// Skip over whitespace, stopping at the end of the buffer or the next non-whitespace character.
fn skip_whitespace(buffer: &mut SourceBuffer) {
    while let Some(next) = buffer.peek_next() {
        if !is_whitespace(&next) {
            break;
        }

        let _ = buffer.next_char();
    }
}

/// Skip a `( ... )` comment.  The cursor is on the opening paren, which has already been checked
/// to be free standing.  The comment ends at the next free standing closing paren.
fn skip_paren_comment(buffer: &mut SourceBuffer) -> error::Result<()> {
    let location = buffer.location().clone();

    let _ = buffer.next_char();

    while !buffer.at_end() {
        if is_free_standing(buffer, COMMENT_CLOSE) {
            let _ = buffer.next_char();
            return Ok(());
        }

        let _ = buffer.next_char();
    }

    ScriptError::new_as_result(ErrorKind::UnterminatedComment, Some(location), None)
}

/// Capture raw text after an opening quote.  The literal ends at a quote that is followed by
/// whitespace or the end of the buffer, any other quote is part of the text.  There is no escape
/// processing.
fn process_string(buffer: &mut SourceBuffer) -> error::Result<(SourceLocation, String)> {
    let location = buffer.location().clone();
    let mut text = String::new();

    let _ = buffer.next_char();

    while let Some(next) = buffer.next_char() {
        if next == STRING_QUOTE && buffer.peek_next().as_ref().is_none_or(is_whitespace) {
            return Ok((location, text));
        }

        text.push(next);
    }

    ScriptError::new_as_result(ErrorKind::UnterminatedStringLiteral, Some(location), None)
}

/// Pull text out of the buffer until we hit a whitespace character or the end of the buffer.
fn process_until_whitespace(buffer: &mut SourceBuffer) -> (SourceLocation, String) {
    let location = buffer.location().clone();
    let mut text = String::new();

    while let Some(next) = buffer.peek_next() {
        if is_whitespace(&next) {
            break;
        }

        text.push(next);
        let _ = buffer.next_char();
    }

    (location, text)
}

/// Read the token that follows a `:` marker.  Either the name of a new word definition when
/// whitespace follows the marker, or a directive keyword when an alphanumeric character does.
fn process_marker(buffer: &mut SourceBuffer) -> error::Result<Token> {
    let location = buffer.location().clone();

    let _ = buffer.next_char();

    match buffer.peek_next() {
        Some(next) if is_whitespace(&next) => {
            skip_whitespace(buffer);

            let (_, name) = process_until_whitespace(buffer);

            if name.is_empty() {
                return malformed(
                    buffer,
                    format!(
                        "expected a word name after '{}' in {}",
                        DEFINITION_MARKER,
                        buffer.source_name()
                    ),
                );
            }

            Ok(Token::new(TokenKind::WordDefinitionHeader, &name, location))
        }

        Some(next) if next.is_alphanumeric() => {
            let (_, keyword) = process_until_whitespace(buffer);
            let text = format!("{}{}", DEFINITION_MARKER, keyword);

            Ok(Token::new(TokenKind::Directive, &text, location))
        }

        Some(next) => malformed(
            buffer,
            format!(
                "'{}' must be followed by whitespace or a directive name, found '{}' in {}",
                DEFINITION_MARKER,
                next,
                buffer.source_name()
            ),
        ),

        None => malformed(
            buffer,
            format!(
                "unexpected end of input after '{}' in {}",
                DEFINITION_MARKER,
                buffer.source_name()
            ),
        ),
    }
}

/// Tokenize a whole character source.
pub fn tokenize(buffer: &mut SourceBuffer) -> error::Result<TokenStream> {
    let mut token_list = TokenList::new();

    while let Some(next) = buffer.peek_next() {
        if next == LINE_COMMENT_MARKER {
            skip_line(buffer);
            continue;
        }

        if next == STRING_QUOTE {
            let (location, text) = process_string(buffer)?;
            token_list.push(Token::new(TokenKind::StringLiteral, &text, location));
            continue;
        }

        if is_free_standing(buffer, COMMENT_OPEN) {
            skip_paren_comment(buffer)?;
            continue;
        }

        if is_whitespace(&next) {
            skip_whitespace(buffer);
            continue;
        }

        if next == DEFINITION_MARKER {
            token_list.push(process_marker(buffer)?);
            continue;
        }

        if is_free_standing(buffer, QUOTATION_OPEN) || is_free_standing(buffer, QUOTATION_CLOSE) {
            let location = buffer.location().clone();
            let kind = if next == QUOTATION_OPEN {
                TokenKind::QuotationOpen
            } else {
                TokenKind::QuotationClose
            };

            let _ = buffer.next_char();
            token_list.push(Token::new(kind, &next.to_string(), location));
            continue;
        }

        let (location, text) = process_until_whitespace(buffer);
        let kind = if text == DEFINITION_TERMINATOR {
            TokenKind::DefinitionTerminator
        } else {
            TokenKind::WordOrData
        };

        token_list.push(Token::new(kind, &text, location));
    }

    Ok(TokenStream::new(buffer.source_name(), token_list))
}

/// Tokenize the source code from a string.
pub fn tokenize_from_source(path: &str, source: &str) -> error::Result<TokenStream> {
    let mut buffer = SourceBuffer::new(path, source);
    tokenize(&mut buffer)
}

/// Load the code from a file and then tokenize it.
pub fn tokenize_from_file(path: &str) -> error::Result<TokenStream> {
    match read_to_string(path) {
        Ok(source) => tokenize_from_source(path, &source),
        Err(error) => ScriptError::new_as_result(
            ErrorKind::FileAccessFailure(format!("could not read file {}: {}", path, error)),
            Some(SourceLocation::new_from_path(path)),
            None,
        ),
    }
}
