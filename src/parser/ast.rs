//! AST node families produced by the parser.
//!
//! Both families are closed sum types; every node owns its text and its
//! children exclusively, so the whole AST is a strict tree.

/// Attribute of a variable assignment operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AssignAttr {
    /// `=`
    #[default]
    Normal,
    /// `:=`
    Immediate,
    /// `?=`
    Conditional,
    /// `+=`
    Append,
}

/// Expression node family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Literal text fragment.
    Literal(String),
    /// Variable reference by bare name (`FOO` for `$(FOO)`).
    Variable(String),
    /// Variable assignment with its ordered value sequence.
    Assignment(Assignment),
}

impl Expr {
    /// Returns the node's own text: literal content, variable name, or
    /// assignment name.
    pub fn text(&self) -> &str {
        match self {
            Self::Literal(text) | Self::Variable(text) => text,
            Self::Assignment(assignment) => &assignment.name,
        }
    }
}

/// Variable assignment node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment {
    /// Variable name; empty when the line carried no identifier before the
    /// operator.
    pub name: String,
    /// Assignment operator attribute.
    pub attr: AssignAttr,
    /// Ordered value nodes, verbatim after the leading-blank skip.
    pub values: Vec<Expr>,
}

/// Receipt node family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Receipt {
    /// Single-name, single-prerequisite, single-command form. Declared
    /// surface only: the parser never constructs it.
    Simple(SimpleReceipt),
    /// General target group.
    Complex(ComplexReceipt),
}

/// Unconstructed single-command receipt form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SimpleReceipt {
    /// Target name.
    pub name: String,
    /// Prerequisite name.
    pub prereq: String,
    /// Command text.
    pub rule: String,
}

/// Target group: names, prerequisites, and ordered recipe lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComplexReceipt {
    /// Target-name nodes in source order.
    pub names: Vec<Expr>,
    /// Prerequisite nodes in source order.
    pub prereqs: Vec<Expr>,
    /// Recipe lines, each an ordered sequence of expression nodes.
    pub rules: Vec<Vec<Expr>>,
}
