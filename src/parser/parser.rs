//! Recursive-descent parser over classified lines.
//!
//! The parser drives the classifier and tokenizer across the whole file and
//! assembles the two AST collections. Failures communicate through the
//! parse state, never through panics: malformed variable assignments warn
//! and stay recoverable, malformed target/recipe structure is terminal.

use std::mem;
use std::path::Path;

use log::debug;

use crate::lexer::{Lexer, LineKind, TokenKind};
use crate::parser::ast::{AssignAttr, Assignment, ComplexReceipt, Expr, Receipt};

/// Parser lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseState {
    /// The underlying lexer failed to open its store.
    NotReady,
    /// Open and ready to parse.
    Ready,
    /// A recoverable failure (malformed variable assignment); the caller
    /// may continue parsing subsequent lines.
    Warning,
    /// A terminal syntax failure; the parse stops here.
    Error,
    /// The whole file was consumed without a terminal failure.
    Done,
}

/// Build-file parser owning the resulting AST collections.
pub struct Parser {
    lexer: Lexer,
    assignments: Vec<Expr>,
    receipts: Vec<Receipt>,
    state: ParseState,
}

impl Parser {
    /// Wraps a lexer; the parser starts [`ParseState::Ready`] only when the
    /// lexer opened its store.
    pub fn new(lexer: Lexer) -> Self {
        let state = if lexer.is_open() {
            ParseState::Ready
        } else {
            ParseState::NotReady
        };
        Self {
            lexer,
            assignments: Vec::new(),
            receipts: Vec::new(),
            state,
        }
    }

    /// Returns whether the parser is ready for its first parse call.
    pub fn is_ready(&self) -> bool {
        self.state == ParseState::Ready
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Returns the source path when the lexer is open.
    pub fn file_path(&self) -> Option<&Path> {
        self.lexer.path()
    }

    /// Returns the text of the line under the cursor, for diagnostics.
    pub fn line_text(&self) -> String {
        self.lexer.line_text()
    }

    /// Returns the 1-based line of the most recent token.
    pub fn line_number(&self) -> u64 {
        self.lexer.token().line
    }

    /// Returns the column offset of the most recent token.
    pub fn token_column(&self) -> u64 {
        self.lexer.token().column
    }

    /// Returns the byte length of the most recent token.
    pub fn token_len(&self) -> u64 {
        self.lexer.token().len
    }

    /// Returns the completed assignment nodes in source order.
    pub fn assignments(&self) -> &[Expr] {
        &self.assignments
    }

    /// Returns the completed receipt nodes in source order.
    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    /// Parses as much of the file as possible.
    ///
    /// Returns [`ParseState::Done`] or [`ParseState::Error`] on terminal
    /// conditions; [`ParseState::Warning`] after a recoverable failure, in
    /// which case calling again resumes past the malformed line.
    pub fn parse_to_ast(&mut self) -> ParseState {
        if self.state == ParseState::NotReady {
            return ParseState::NotReady;
        }

        while !self.lexer.is_at_end() {
            let kind = self.lexer.classify_line();
            debug!(
                "line {} classified as {kind:?}",
                self.lexer.line_number()
            );

            match kind {
                LineKind::Empty | LineKind::Comment => {
                    self.lexer.next_line();
                    continue;
                }
                LineKind::Target => {
                    if let Some(receipt) = self.construct_receipt() {
                        self.receipts.push(receipt);
                        continue;
                    }
                }
                LineKind::Variable => {
                    let Some(node) = self.construct_assignment() else {
                        self.state = ParseState::Warning;
                        return self.state;
                    };
                    self.assignments.push(node);
                    continue;
                }
                LineKind::AmbiguousTabOrVariable | LineKind::Directive => {
                    self.lexer.next_line();
                    continue;
                }
                LineKind::Recipe => {}
            }

            // Recipe outside a target context, or an unrecognized
            // line/token combination.
            self.state = ParseState::Error;
            return self.state;
        }

        self.state = ParseState::Done;
        self.state
    }

    /// Builds one receipt, consuming lines until a new target line or EOF.
    ///
    /// Returns `None` when the tokenizer reports a malformed token, which
    /// the caller treats as a terminal parse error.
    fn construct_receipt(&mut self) -> Option<Receipt> {
        let mut line_kind = self.lexer.classify_line();
        let mut names = Vec::new();
        let mut prereqs = Vec::new();
        let mut rules: Vec<Vec<Expr>> = Vec::new();
        let mut rule_line: Vec<Expr> = Vec::new();
        let mut crossed_colon = false;
        let mut crossed_leading_blanks = false;

        loop {
            let kind = self.lexer.next_token();

            if kind == TokenKind::Invalid {
                return None;
            }

            if kind == TokenKind::Newline || kind == TokenKind::Eof {
                // A finished recipe line is pushed before anything else so
                // EOF still captures it.
                if line_kind == LineKind::Recipe {
                    rules.push(mem::take(&mut rule_line));
                }
                if kind == TokenKind::Eof {
                    break;
                }

                line_kind = self.lexer.classify_line();
                if line_kind == LineKind::Target {
                    break;
                }
                crossed_leading_blanks = false;
                continue;
            }

            // The first colon separates names from prerequisites.
            if kind == TokenKind::Colon && line_kind == LineKind::Target {
                crossed_colon = true;
                continue;
            }

            match line_kind {
                LineKind::Target => {
                    let bucket = if crossed_colon {
                        &mut prereqs
                    } else {
                        &mut names
                    };
                    match kind {
                        TokenKind::Identifier => {
                            bucket.push(Expr::Literal(self.lexer.token_text()));
                        }
                        TokenKind::Variable => {
                            bucket.push(Expr::Variable(self.lexer.token_var_text()));
                        }
                        // Tabs, spaces, and stray tokens on the target line
                        // are discarded.
                        _ => {}
                    }
                }
                LineKind::Recipe => {
                    if !crossed_leading_blanks {
                        if kind.is_blank() {
                            continue;
                        }
                        crossed_leading_blanks = true;
                    }
                    // Recipe content accumulates verbatim, internal blanks
                    // included.
                    if kind == TokenKind::Variable {
                        rule_line.push(Expr::Variable(self.lexer.token_var_text()));
                    } else {
                        rule_line.push(Expr::Literal(self.lexer.token_text()));
                    }
                }
                LineKind::Comment | LineKind::Empty => {
                    self.lexer.next_line();
                    line_kind = self.lexer.classify_line();
                }
                // Variable, directive, and ambiguous lines inside a receipt
                // are consumed and dropped.
                _ => {}
            }
        }

        Some(Receipt::Complex(ComplexReceipt {
            names,
            prereqs,
            rules,
        }))
    }

    /// Builds one variable-assignment node from the current line.
    ///
    /// Returns `None` on a syntax failure; the parse state then reports a
    /// recoverable warning.
    fn construct_assignment(&mut self) -> Option<Expr> {
        let mut attr = AssignAttr::Normal;
        let mut name: Option<String> = None;
        let mut values = Vec::new();
        let mut crossed_equal = false;
        let mut crossed_leading_blanks = false;

        while !self.lexer.is_at_end() {
            let kind = self.lexer.next_token();

            if kind == TokenKind::Newline {
                break;
            }

            // The first operator fixes the attribute and switches to value
            // accumulation.
            if kind.is_assignment_operator() {
                crossed_equal = true;
                attr = match kind {
                    TokenKind::ColonEqual => AssignAttr::Immediate,
                    TokenKind::QuestionEqual => AssignAttr::Conditional,
                    TokenKind::PlusEqual => AssignAttr::Append,
                    _ => attr,
                };
                continue;
            }

            if crossed_equal {
                if !crossed_leading_blanks {
                    if kind.is_blank() {
                        continue;
                    }
                    crossed_leading_blanks = true;
                }
                match kind {
                    TokenKind::Identifier | TokenKind::Tab | TokenKind::Space => {
                        values.push(Expr::Literal(self.lexer.token_text()));
                    }
                    TokenKind::Variable => {
                        values.push(Expr::Variable(self.lexer.token_var_text()));
                    }
                    // A trailing comment terminates the line normally.
                    TokenKind::Comment => {
                        self.lexer.next_line();
                        break;
                    }
                    _ => return None,
                }
                continue;
            }

            // Name portion: only identifiers are valid; blanks are skipped.
            match kind {
                TokenKind::Identifier => {
                    name = Some(self.lexer.token_text());
                }
                TokenKind::Space | TokenKind::Tab => {}
                _ => {
                    self.lexer.next_line();
                    return None;
                }
            }
        }

        Some(Expr::Assignment(Assignment {
            name: name.unwrap_or_default(),
            attr,
            values,
        }))
    }
}
