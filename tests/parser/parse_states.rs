use std::io::Write;

use remake::lexer::Lexer;
use remake::parser::{ParseState, Parser};
use tempfile::NamedTempFile;

fn parser_over(content: &str) -> (NamedTempFile, Parser) {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write fixture");
    let parser = Parser::new(Lexer::new(file.path()));
    (file, parser)
}

#[test]
fn a_missing_file_leaves_the_parser_not_ready() {
    let mut parser = Parser::new(Lexer::new("/no/such/build/file"));

    assert!(!parser.is_ready());
    assert_eq!(parser.state(), ParseState::NotReady);
    assert_eq!(parser.parse_to_ast(), ParseState::NotReady);
}

#[test]
fn a_zero_length_file_leaves_the_parser_not_ready() {
    let file = NamedTempFile::new().expect("create temp file");
    let parser = Parser::new(Lexer::new(file.path()));

    assert!(!parser.is_ready());
}

#[test]
fn an_open_file_starts_ready() {
    let (_guard, parser) = parser_over("x = 1\n");

    assert!(parser.is_ready());
    assert_eq!(parser.state(), ParseState::Ready);
}

#[test]
fn comments_and_blanks_alone_parse_to_done() {
    let (_guard, mut parser) = parser_over("# only notes\n\n   \n");

    assert_eq!(parser.parse_to_ast(), ParseState::Done);
    assert!(parser.assignments().is_empty());
    assert!(parser.receipts().is_empty());
}

#[test]
fn a_recipe_line_outside_a_target_is_a_terminal_error() {
    let (_guard, mut parser) = parser_over("\tcc -o app\n");

    assert_eq!(parser.parse_to_ast(), ParseState::Error);
    assert_eq!(parser.state(), ParseState::Error);
}

#[test]
fn directive_lines_are_skipped_without_nodes() {
    // `include` has no decisive character, so the whole line classifies
    // Empty and is skipped; no node may result either way.
    let (_guard, mut parser) = parser_over("include rules.mk\nx = 1\n");

    assert_eq!(parser.parse_to_ast(), ParseState::Done);
    assert_eq!(parser.assignments().len(), 1);
    assert!(parser.receipts().is_empty());
}

#[test]
fn ambiguous_tab_variable_lines_are_skipped() {
    let (_guard, mut parser) = parser_over("\tX = 1\ny = 2\n");

    assert_eq!(parser.parse_to_ast(), ParseState::Done);
    let names: Vec<&str> = parser
        .assignments()
        .iter()
        .map(|node| node.text())
        .collect();
    assert_eq!(names, vec!["y"]);
}

#[test]
fn warnings_do_not_poison_later_receipts() {
    let (_guard, mut parser) = parser_over("x @ = 1\nall: dep\n\tcc\n");

    assert_eq!(parser.parse_to_ast(), ParseState::Warning);
    assert_eq!(parser.parse_to_ast(), ParseState::Done);
    assert_eq!(parser.receipts().len(), 1);
}

#[test]
fn diagnostics_expose_token_and_line_positions() {
    let (_guard, mut parser) = parser_over("x = 1\n");

    assert_eq!(parser.parse_to_ast(), ParseState::Done);
    assert!(parser.file_path().is_some());
    assert_eq!(parser.line_number(), 1);
    assert!(parser.token_len() >= 1);
}

#[test]
fn a_whole_build_file_parses_in_one_call() {
    let content = "\
# toy build description
CC = gcc
CFLAGS += -O2

all: main.o util.o
\t$(CC) -o app main.o util.o

clean:
\trm -f app
";
    let (_guard, mut parser) = parser_over(content);

    assert_eq!(parser.parse_to_ast(), ParseState::Done);
    assert_eq!(parser.assignments().len(), 2);
    assert_eq!(parser.receipts().len(), 2);
}
