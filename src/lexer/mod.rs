//! Build-file tokenizer over the line-addressable byte store.
//!
//! The lexer produces one transient token per call. Single characters are
//! classified through the symbol table, two-character operators through
//! one-byte lookahead, reserved phrases through the phrase table, and
//! everything else becomes a variable-length identifier.

pub mod line;
pub mod table;
pub mod token;

use std::path::Path;

use log::debug;

use crate::lexer::table::{phrase_token, symbol_token};
use crate::store::{os, LineFile};

pub use line::{LineInfo, LineKind};
pub use token::{Token, TokenKind};

/// Tokenizer and line classifier over one mapped build file.
pub struct Lexer {
    store: Option<LineFile>,
    token: Token,
    line: LineInfo,
}

impl Lexer {
    /// Opens `path` read-only and wraps it for tokenization.
    ///
    /// A lexer over an unopenable file is constructed in the closed state;
    /// [`Lexer::is_open`] reports it and every token request returns EOF.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let store = if os::exists(path) {
            match os::open_read_only(path) {
                Ok(store) => Some(store),
                Err(error) => {
                    debug!("failed to open {}: {error}", path.display());
                    None
                }
            }
        } else {
            None
        };

        Self::from_optional_store(store)
    }

    /// Wraps an already-open store.
    pub fn from_store(store: LineFile) -> Self {
        Self::from_optional_store(Some(store))
    }

    fn from_optional_store(store: Option<LineFile>) -> Self {
        Self {
            store,
            token: Token::default(),
            line: LineInfo::default(),
        }
    }

    /// Returns whether the underlying store holds a valid mapping.
    pub fn is_open(&self) -> bool {
        self.store.as_ref().is_some_and(LineFile::is_open)
    }

    /// Returns the backing file path when open.
    pub fn path(&self) -> Option<&Path> {
        self.store.as_ref().map(LineFile::path)
    }

    /// Returns whether the cursor is at a line start.
    pub fn is_at_line_start(&self) -> bool {
        self.store
            .as_ref()
            .is_none_or(LineFile::is_at_line_start)
    }

    /// Returns whether the cursor is at a line end.
    pub fn is_at_line_end(&self) -> bool {
        self.store.as_ref().is_none_or(LineFile::is_at_line_end)
    }

    /// Returns whether the cursor is at the buffer start.
    pub fn is_at_start(&self) -> bool {
        self.store
            .as_ref()
            .is_none_or(LineFile::is_at_buffer_start)
    }

    /// Returns whether the cursor is at or past the end sentinel.
    pub fn is_at_end(&self) -> bool {
        self.store.as_ref().is_none_or(LineFile::is_at_buffer_end)
    }

    /// Moves to the next line; `false` when the line did not change.
    pub fn next_line(&mut self) -> bool {
        let Some(store) = self.store.as_mut() else {
            return false;
        };
        let before = store.line_number();
        before != store.advance_to_next_line()
    }

    /// Moves to the previous line; `false` when the line did not change.
    pub fn prev_line(&mut self) -> bool {
        let Some(store) = self.store.as_mut() else {
            return false;
        };
        let before = store.line_number();
        before != store.advance_to_previous_line()
    }

    /// Classifies the current line and returns its kind.
    pub fn classify_line(&mut self) -> LineKind {
        match self.store.as_ref() {
            Some(store) => {
                self.line = line::classify(store);
                self.line.kind
            }
            None => {
                self.line = LineInfo::default();
                self.line.kind
            }
        }
    }

    /// Returns the most recent line classification.
    pub fn line_info(&self) -> &LineInfo {
        &self.line
    }

    /// Scans and returns the next token kind.
    ///
    /// Token metadata stays on the lexer; text is extracted on demand via
    /// [`Lexer::token_text`] and [`Lexer::token_var_text`].
    pub fn next_token(&mut self) -> TokenKind {
        let Some(store) = self.store.as_mut() else {
            self.token.kind = TokenKind::Eof;
            return TokenKind::Eof;
        };

        if store.is_at_buffer_end() {
            self.token.kind = TokenKind::Eof;
            return TokenKind::Eof;
        }

        if store.is_at_line_start() {
            self.token.line = store.line_number();
        }
        self.token.column = store.column_offset();
        self.token.start = store.position();

        let byte = store.read_byte();
        self.token.len = 1;

        if let Some(kind) = symbol_token(byte) {
            self.token.kind = kind;
            match kind {
                // The token spans the remainder of the physical line; the
                // cursor lands on the trailing newline, not past it.
                TokenKind::Comment => {
                    self.token.len = store.line_byte_length();
                    store.advance(self.token.len - 1);
                }
                TokenKind::Colon => {
                    if store.peek_current() == b'=' {
                        self.token.kind = TokenKind::ColonEqual;
                        self.token.len = 2;
                        store.advance_one();
                    }
                }
                TokenKind::Plus => {
                    if store.peek_current() == b'=' {
                        self.token.kind = TokenKind::PlusEqual;
                        self.token.len = 2;
                        store.advance_one();
                    } else {
                        self.token.kind = TokenKind::Identifier;
                    }
                }
                TokenKind::QuestionMark => {
                    if store.peek_current() == b'=' {
                        self.token.kind = TokenKind::QuestionEqual;
                        self.token.len = 2;
                        store.advance_one();
                    }
                }
                TokenKind::Dollar => {
                    return scan_variable(store, &mut self.token);
                }
                _ => {}
            }
            return self.token.kind;
        }

        scan_phrase_or_identifier(store, &mut self.token)
    }

    /// Returns the most recent token.
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Returns the literal text spanning the most recent token.
    pub fn token_text(&self) -> String {
        let Some(store) = self.store.as_ref() else {
            return String::new();
        };
        String::from_utf8_lossy(store.read_at(self.token.start, self.token.len)).into_owned()
    }

    /// Returns the bare variable name of a `$(NAME)` or `$X` token.
    pub fn token_var_text(&self) -> String {
        let Some(store) = self.store.as_ref() else {
            return String::new();
        };
        let bytes = store.read_at(self.token.start, self.token.len);
        let name = match bytes {
            [b'$', b'(', inner @ .., b')'] => inner,
            [b'$', inner @ ..] => inner,
            other => other,
        };
        String::from_utf8_lossy(name).into_owned()
    }

    /// Returns the current physical line without its newline.
    pub fn line_text(&self) -> String {
        let Some(store) = self.store.as_ref() else {
            return String::new();
        };
        let column = store.column_offset();
        let start = store.position() - column;
        let len = (column + store.line_byte_length()).saturating_sub(1);
        String::from_utf8_lossy(store.read_at(start, len)).into_owned()
    }

    /// Returns the 1-based line number under the cursor.
    pub fn line_number(&self) -> u64 {
        self.store
            .as_ref()
            .map(LineFile::line_number)
            .unwrap_or(1)
    }
}

/// Scans a `$(NAME)` or `$X` variable reference after the `$` byte.
fn scan_variable(store: &mut LineFile, token: &mut Token) -> TokenKind {
    if store.peek_current() != b'(' {
        let distance = store.find_any_of3(b' ', b'\t', b'\n');
        if distance == 0 {
            // Bare `$` before a blank or line end: plain identifier.
            token.kind = TokenKind::Identifier;
            return token.kind;
        }
        token.len = distance + 1;
    } else {
        let distance = store.find_byte(b')');
        token.len = distance + 2;
        if token.len - 1 >= store.line_byte_length() {
            // The reference would overrun the physical line.
            token.kind = TokenKind::Invalid;
            return token.kind;
        }
    }

    store.advance(token.len - 1);
    token.kind = TokenKind::Variable;
    token.kind
}

/// Matches a reserved phrase, falling back to an identifier token.
///
/// The candidate span starts one position before the cursor (the byte just
/// consumed) and ends at the next recognized single-character symbol.
fn scan_phrase_or_identifier(store: &mut LineFile, token: &mut Token) -> TokenKind {
    let base = token.start;
    let mut len: u64 = 1;
    loop {
        match store.peek_at(base + len) {
            Ok(byte) if symbol_token(byte).is_none() => len += 1,
            _ => break,
        }
    }
    token.len = len;

    let kind = phrase_token(store.read_at(base, len));
    token.kind = kind.unwrap_or(TokenKind::Identifier);
    store.advance(len - 1);
    token.kind
}
