//! Centralized label naming for the VM translator
//!
//! Every label the translator emits is built from a structured [`Label`]
//! value rather than ad hoc string concatenation. The [`NameGenerator`] hands
//! out the counter-suffixed labels and records every declared name, so label
//! uniqueness is checked on every declaration instead of being a side effect
//! of the naming convention.

use std::collections::HashSet;
use std::fmt;
use vmt_common::TranslateError;

/// Namespace that user labels and return addresses are qualified with
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Bootstrap code, before any input file; renders as the empty string
    Bootstrap,
    /// Commands of a file that appear before its first `function`
    File(String),
    /// Body of a VM function
    Function(String),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Bootstrap => Ok(()),
            Scope::File(name) | Scope::Function(name) => f.write_str(name),
        }
    }
}

/// Which of the two labels of a comparison site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareBranch {
    True,
    End,
}

/// A label emitted by the translator
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Label {
    /// Global entry point of a VM function: `name`
    Function(String),
    /// User label qualified with its scope: `scope$name`
    User { scope: Scope, name: String },
    /// Return address of one call site: `scope$ret.N`
    Return { scope: Scope, ordinal: u32 },
    /// Internal label of one comparison site: `CMP.N.TRUE` / `CMP.N.END`
    Compare { ordinal: u32, branch: CompareBranch },
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Function(name) => f.write_str(name),
            Label::User { scope, name } => write!(f, "{}${}", scope, name),
            Label::Return { scope, ordinal } => write!(f, "{}$ret.{}", scope, ordinal),
            Label::Compare { ordinal, branch: CompareBranch::True } => {
                write!(f, "CMP.{}.TRUE", ordinal)
            }
            Label::Compare { ordinal, branch: CompareBranch::End } => {
                write!(f, "CMP.{}.END", ordinal)
            }
        }
    }
}

/// Name generator for one translation run
///
/// The comparison counter is global and never reset. The call-site counter
/// restarts whenever the scope changes.
#[derive(Debug, Default)]
pub struct NameGenerator {
    /// Last comparison ordinal handed out
    compare_counter: u32,

    /// Last call-site ordinal handed out in the current scope
    call_counter: u32,

    /// Every label name declared so far
    declared: HashSet<String>,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels for the next comparison site: (true branch, merge point)
    pub fn next_compare(&mut self) -> (Label, Label) {
        self.compare_counter += 1;
        let ordinal = self.compare_counter;
        (
            Label::Compare { ordinal, branch: CompareBranch::True },
            Label::Compare { ordinal, branch: CompareBranch::End },
        )
    }

    /// Return-address label for the next call site in `scope`
    pub fn next_return(&mut self, scope: &Scope) -> Label {
        self.call_counter += 1;
        Label::Return {
            scope: scope.clone(),
            ordinal: self.call_counter,
        }
    }

    pub fn reset_call_sites(&mut self) {
        self.call_counter = 0;
    }

    /// Record a label declaration and return its rendered name
    pub fn declare(&mut self, label: &Label) -> Result<String, TranslateError> {
        let name = label.to_string();
        if !self.declared.insert(name.clone()) {
            return Err(TranslateError::duplicate_label(name));
        }
        Ok(name)
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.declared.contains(name)
    }

    pub fn declared_count(&self) -> usize {
        self.declared.len()
    }

    pub fn comparisons(&self) -> u32 {
        self.compare_counter
    }
}
