use std::io::Write;

use pretty_assertions::assert_eq;
use remake::lexer::Lexer;
use remake::parser::{AssignAttr, Assignment, Expr, ParseState, Parser};
use tempfile::NamedTempFile;

fn parser_over(content: &str) -> (NamedTempFile, Parser) {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write fixture");
    let parser = Parser::new(Lexer::new(file.path()));
    (file, parser)
}

fn parse_done(content: &str) -> (NamedTempFile, Parser) {
    let (guard, mut parser) = parser_over(content);
    assert_eq!(parser.parse_to_ast(), ParseState::Done);
    (guard, parser)
}

fn literal(text: &str) -> Expr {
    Expr::Literal(text.to_string())
}

#[test]
fn simple_assignment_builds_one_node() {
    let (_guard, parser) = parse_done("x = 1\n");

    assert_eq!(
        parser.assignments(),
        &[Expr::Assignment(Assignment {
            name: "x".to_string(),
            attr: AssignAttr::Normal,
            values: vec![literal("1")],
        })]
    );
}

#[test]
fn each_operator_sets_its_attribute() {
    let cases = [
        ("a = 1\n", AssignAttr::Normal),
        ("a := 1\n", AssignAttr::Immediate),
        ("a ?= 1\n", AssignAttr::Conditional),
        ("a += 1\n", AssignAttr::Append),
    ];

    for (content, attr) in cases {
        let (_guard, parser) = parse_done(content);
        let [Expr::Assignment(assignment)] = parser.assignments() else {
            panic!("expected one assignment for {content:?}");
        };
        assert_eq!(assignment.attr, attr, "content {content:?}");
    }
}

#[test]
fn leading_blanks_in_the_value_are_skipped_once() {
    let (_guard, parser) = parse_done("x =   \t value\n");

    let [Expr::Assignment(assignment)] = parser.assignments() else {
        panic!("expected one assignment");
    };
    assert_eq!(assignment.values, vec![literal("value")]);
}

#[test]
fn internal_blanks_in_the_value_are_kept_verbatim() {
    let (_guard, parser) = parse_done("flags = -O2 -Wall\n");

    let [Expr::Assignment(assignment)] = parser.assignments() else {
        panic!("expected one assignment");
    };
    assert_eq!(
        assignment.values,
        vec![
            literal("-O2"),
            literal(" "),
            literal("-Wall"),
        ]
    );
}

#[test]
fn variable_references_become_variable_nodes() {
    let (_guard, parser) = parse_done("objs = $(A) $B\n");

    let [Expr::Assignment(assignment)] = parser.assignments() else {
        panic!("expected one assignment");
    };
    assert_eq!(
        assignment.values,
        vec![
            Expr::Variable("A".to_string()),
            literal(" "),
            Expr::Variable("B".to_string()),
        ]
    );
}

#[test]
fn a_trailing_comment_terminates_the_value_normally() {
    let (_guard, parser) = parse_done("x = 1 # note\ny = 2\n");

    assert_eq!(parser.assignments().len(), 2);
    let [Expr::Assignment(first), Expr::Assignment(second)] = parser.assignments() else {
        panic!("expected two assignments");
    };
    assert_eq!(first.values, vec![literal("1"), literal(" ")]);
    assert_eq!(second.name, "y");
}

#[test]
fn multiple_assignments_accumulate_in_source_order() {
    let (_guard, parser) = parse_done("a = 1\nb := 2\nc ?= 3\n");

    let names: Vec<&str> = parser
        .assignments()
        .iter()
        .map(|node| node.text())
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn a_malformed_name_portion_warns_and_stays_recoverable() {
    let (_guard, mut parser) = parser_over("x @ = 1\ny = 2\n");

    assert_eq!(parser.parse_to_ast(), ParseState::Warning);
    assert_eq!(parser.assignments().len(), 0);

    // The malformed line was skipped; parsing resumes on the next call.
    assert_eq!(parser.parse_to_ast(), ParseState::Done);
    let [Expr::Assignment(assignment)] = parser.assignments() else {
        panic!("expected the recovered assignment");
    };
    assert_eq!(assignment.name, "y");
}

#[test]
fn the_last_identifier_before_the_operator_names_the_variable() {
    let (_guard, parser) = parse_done("one two = 3\n");

    let [Expr::Assignment(assignment)] = parser.assignments() else {
        panic!("expected one assignment");
    };
    assert_eq!(assignment.name, "two");
}
