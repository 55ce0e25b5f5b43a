//! Line-driven parser and AST for the build-file grammar.

pub mod ast;
pub mod parser;

pub use ast::{AssignAttr, Assignment, ComplexReceipt, Expr, Receipt, SimpleReceipt};
pub use parser::{ParseState, Parser};
