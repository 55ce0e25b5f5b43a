//! Static symbol and reserved-phrase tables.
//!
//! The single-character table is a `const` match; the phrase table is an
//! immutable map built once at process start. Phrase matching requires an
//! exact byte-length and content match, never a prefix match.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::lexer::token::TokenKind;

/// Looks up a single-character symbol token.
pub(crate) const fn symbol_token(byte: u8) -> Option<TokenKind> {
    match byte {
        b' ' => Some(TokenKind::Space),
        b'#' => Some(TokenKind::Comment),
        b'\t' => Some(TokenKind::Tab),
        b'\n' => Some(TokenKind::Newline),
        b'\r' => Some(TokenKind::CarriageReturn),
        b'$' => Some(TokenKind::Dollar),
        b':' => Some(TokenKind::Colon),
        b'=' => Some(TokenKind::Equal),
        b'?' => Some(TokenKind::QuestionMark),
        b'+' => Some(TokenKind::Plus),
        b'@' => Some(TokenKind::At),
        b'<' => Some(TokenKind::LessThan),
        b'>' => Some(TokenKind::GreaterThan),
        b'%' => Some(TokenKind::Percent),
        b'^' => Some(TokenKind::Caret),
        b'*' => Some(TokenKind::Star),
        _ => None,
    }
}

/// Reserved directive and dot-prefixed special-target phrases.
pub(crate) static PHRASE_TABLE: LazyLock<HashMap<&'static [u8], TokenKind>> =
    LazyLock::new(|| {
        let entries: [(&'static [u8], TokenKind); 35] = [
            (b"vpath", TokenKind::Vpath),
            (b"VPATH", TokenKind::VpathUpper),
            (b"include", TokenKind::Include),
            (b"if", TokenKind::If),
            (b"ifdef", TokenKind::Ifdef),
            (b"ifndef", TokenKind::Ifndef),
            (b"endef", TokenKind::Endef),
            (b"ifeq", TokenKind::Ifeq),
            (b"ifneq", TokenKind::Ifneq),
            (b"else", TokenKind::Else),
            (b"endif", TokenKind::Endif),
            (b"load", TokenKind::Load),
            (b".DEFAULT_GOAL", TokenKind::DefaultGoal),
            (b".DEFAULT", TokenKind::Default),
            (b".DELETE_ON_ERROR", TokenKind::DeleteOnError),
            (b".EXPORT_ALL_VARIABLES", TokenKind::ExportAllVariables),
            (b".FEATURES", TokenKind::Features),
            (b".IGNORE", TokenKind::Ignore),
            (b".INCLUDE_DIRS", TokenKind::IncludeDirs),
            (b".INTERMEDIATE", TokenKind::Intermediate),
            (b".LIBPATTERNS", TokenKind::LibPatterns),
            (b".LOADED", TokenKind::Loaded),
            (b".LOW_RESOLUTION_TIME", TokenKind::LowResolutionTime),
            (b".NOTPARALLEL", TokenKind::NotParallel),
            (b".ONESHELL", TokenKind::OneShell),
            (b".PHONY", TokenKind::Phony),
            (b".POSIX", TokenKind::Posix),
            (b".PRECIOUS", TokenKind::Precious),
            (b".RECIPEPREFIX", TokenKind::RecipePrefix),
            (b".SECONDARY", TokenKind::Secondary),
            (b".SECONDEXPANSION", TokenKind::SecondExpansion),
            (b".SHELLFLAGS", TokenKind::ShellFlags),
            (b".SILENT", TokenKind::Silent),
            (b".SUFFIXES", TokenKind::Suffixes),
            (b".VARIABLES", TokenKind::Variables),
        ];
        entries.into_iter().collect()
    });

/// Looks up a reserved phrase by exact bytes.
pub(crate) fn phrase_token(bytes: &[u8]) -> Option<TokenKind> {
    PHRASE_TABLE.get(bytes).copied()
}
