//! Token model for the build-file lexer.

/// Token categories produced by [`crate::lexer::Lexer::next_token`].
///
/// Single characters come from the symbol table, two-character operators
/// from one-byte lookahead, and the reserved phrases from the phrase table.
/// Everything else falls back to [`TokenKind::Identifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TokenKind {
    /// Malformed token, e.g. a variable reference overrunning its line.
    #[default]
    Invalid,
    /// Variable-length run of bytes with no other classification.
    Identifier,
    /// `\n`
    Newline,
    /// `\r` (recognized but never handled downstream)
    CarriageReturn,
    /// `#` through the end of the physical line.
    Comment,
    /// `$`
    Dollar,
    /// ` `
    Space,
    /// `\t`
    Tab,
    /// `:`
    Colon,
    /// `?`
    QuestionMark,
    /// `=`
    Equal,
    /// `:=`
    ColonEqual,
    /// `?=`
    QuestionEqual,
    /// `+=`
    PlusEqual,
    /// `+` (degrades to an identifier when not part of `+=`)
    Plus,
    /// `@`
    At,
    /// `<`
    LessThan,
    /// `>`
    GreaterThan,
    /// `$(NAME)` or `$X` variable reference.
    Variable,
    /// `%`
    Percent,
    /// `^`
    Caret,
    /// `*`
    Star,
    /// End of the mapped buffer.
    Eof,

    // Directive phrases.
    /// `vpath`
    Vpath,
    /// `VPATH`
    VpathUpper,
    /// `include`
    Include,
    /// `if`
    If,
    /// `ifdef`
    Ifdef,
    /// `ifndef`
    Ifndef,
    /// `endef`
    Endef,
    /// `ifeq`
    Ifeq,
    /// `ifneq`
    Ifneq,
    /// `else`
    Else,
    /// `endif`
    Endif,
    /// `load`
    Load,

    // Dot-prefixed special target phrases.
    /// `.DEFAULT_GOAL`
    DefaultGoal,
    /// `.DEFAULT`
    Default,
    /// `.DELETE_ON_ERROR`
    DeleteOnError,
    /// `.EXPORT_ALL_VARIABLES`
    ExportAllVariables,
    /// `.FEATURES`
    Features,
    /// `.IGNORE`
    Ignore,
    /// `.INCLUDE_DIRS`
    IncludeDirs,
    /// `.INTERMEDIATE`
    Intermediate,
    /// `.LIBPATTERNS`
    LibPatterns,
    /// `.LOADED`
    Loaded,
    /// `.LOW_RESOLUTION_TIME`
    LowResolutionTime,
    /// `.NOTPARALLEL`
    NotParallel,
    /// `.ONESHELL`
    OneShell,
    /// `.PHONY`
    Phony,
    /// `.POSIX`
    Posix,
    /// `.PRECIOUS`
    Precious,
    /// `.RECIPEPREFIX`
    RecipePrefix,
    /// `.SECONDARY`
    Secondary,
    /// `.SECONDEXPANSION`
    SecondExpansion,
    /// `.SHELLFLAGS`
    ShellFlags,
    /// `.SILENT`
    Silent,
    /// `.SUFFIXES`
    Suffixes,
    /// `.VARIABLES`
    Variables,
}

impl TokenKind {
    /// Returns whether this kind is one of the assignment operators.
    pub fn is_assignment_operator(self) -> bool {
        matches!(
            self,
            Self::Equal | Self::ColonEqual | Self::QuestionEqual | Self::PlusEqual
        )
    }

    /// Returns whether this kind is horizontal whitespace.
    pub fn is_blank(self) -> bool {
        matches!(self, Self::Space | Self::Tab)
    }
}

/// One lexical token with source-position metadata.
///
/// Tokens are transient: the lexer overwrites its current token on every
/// call, and token text is re-read from the store on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Token {
    /// Token category.
    pub kind: TokenKind,
    /// 1-based line the token starts on.
    pub line: u64,
    /// 0-based byte offset within that line.
    pub column: u64,
    /// Absolute byte position of the first token byte.
    pub start: u64,
    /// Token length in bytes.
    pub len: u64,
}
