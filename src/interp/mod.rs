//! Direct recipe execution over the completed AST.
//!
//! The interpreter borrows the parser's collections read-only, selects one
//! receipt by goal name (or the first receipt as the default goal), and
//! shells out each recipe line unconditionally. No dependency graph, no
//! staleness checks, no variable expansion.

use std::error::Error;
use std::fmt;
use std::process::Command;

use log::{debug, warn};

use crate::parser::{ComplexReceipt, Expr, Receipt};

/// Execution policy handed down from the front end.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecOptions {
    /// Print commands without running them.
    pub dry_run: bool,
    /// Do not echo commands before running them.
    pub silent: bool,
}

/// Failures surfaced by receipt execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    /// The parse produced no receipts to execute.
    NoReceipts,
    /// No receipt's target names match the requested goal.
    UnknownGoal { goal: String },
    /// The host shell could not be spawned.
    Shell { command: String, message: String },
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoReceipts => write!(f, "no targets to execute"),
            Self::UnknownGoal { goal } => {
                write!(f, "no rule to make target '{goal}'")
            }
            Self::Shell { command, message } => {
                write!(f, "failed to run '{command}': {message}")
            }
        }
    }
}

impl Error for ExecError {}

/// Walks the completed AST and runs one receipt's recipe lines.
pub struct Interpreter<'ast> {
    assignments: &'ast [Expr],
    receipts: &'ast [Receipt],
}

impl<'ast> Interpreter<'ast> {
    /// Borrows the parser's completed collections.
    pub fn new(assignments: &'ast [Expr], receipts: &'ast [Receipt]) -> Self {
        Self {
            assignments,
            receipts,
        }
    }

    /// Returns the borrowed assignment nodes.
    pub fn assignments(&self) -> &[Expr] {
        self.assignments
    }

    /// Selects the goal receipt and runs its recipe lines in order.
    ///
    /// Each line's node texts concatenate into one command string; variable
    /// nodes contribute their bare name text. A non-zero exit status is
    /// logged and execution continues.
    pub fn execute(&self, goal: Option<&str>, options: ExecOptions) -> Result<(), ExecError> {
        let receipt = self.select_receipt(goal)?;

        for rule in &receipt.rules {
            let command = render_command(rule);
            if command.is_empty() {
                continue;
            }
            if !options.silent {
                println!("{command}");
            }
            if options.dry_run {
                continue;
            }

            debug!("running '{command}'");
            let status = Command::new("sh")
                .arg("-c")
                .arg(&command)
                .status()
                .map_err(|error| ExecError::Shell {
                    command: command.clone(),
                    message: error.to_string(),
                })?;
            if !status.success() {
                warn!("command '{command}' exited with {status}");
            }
        }

        Ok(())
    }

    /// Finds the first complex receipt matching `goal`, or the first
    /// receipt overall when no goal is requested.
    fn select_receipt(&self, goal: Option<&str>) -> Result<&'ast ComplexReceipt, ExecError> {
        let mut complex = self.receipts.iter().filter_map(|receipt| match receipt {
            Receipt::Complex(receipt) => Some(receipt),
            Receipt::Simple(_) => None,
        });

        match goal {
            None => complex.next().ok_or(ExecError::NoReceipts),
            Some(goal) => complex
                .find(|receipt| receipt.names.iter().any(|name| name.text() == goal))
                .ok_or_else(|| ExecError::UnknownGoal {
                    goal: goal.to_string(),
                }),
        }
    }
}

/// Concatenates one recipe line's node texts into a command string.
fn render_command(rule: &[Expr]) -> String {
    let mut command = String::new();
    for node in rule {
        command.push_str(node.text());
    }
    command
}
