//! Translation context
//!
//! All mutable state of one translation run lives here and is owned by the
//! translator: the current scope, the static namespace, and the name
//! generator with its counters. Nothing is ever rolled back.

use crate::naming::{Label, NameGenerator, Scope};
use log::{debug, info};
use vmt_common::TranslateError;

#[derive(Debug)]
pub struct TranslationContext {
    naming: NameGenerator,
    scope: Scope,
    static_namespace: Option<String>,
}

impl Default for TranslationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationContext {
    pub fn new() -> Self {
        Self {
            naming: NameGenerator::new(),
            scope: Scope::Bootstrap,
            static_namespace: None,
        }
    }

    /// Start translating a new input file
    ///
    /// `namespace` is derived from the file name by the caller; code before the
    /// file's first `function` is scoped to it.
    pub fn begin_file(&mut self, namespace: &str) {
        info!("Beginning file with static namespace '{namespace}'");
        self.static_namespace = Some(namespace.to_string());
        self.scope = Scope::File(namespace.to_string());
        self.naming.reset_call_sites();
    }

    /// Enter the body of a VM function and return its declared entry label
    pub fn enter_function(&mut self, name: &str) -> Result<String, TranslateError> {
        let label = self.naming.declare(&Label::Function(name.to_string()))?;
        let namespace = name.split('.').next().unwrap_or(name);
        debug!("Entering function {name} (static namespace '{namespace}')");
        self.static_namespace = Some(namespace.to_string());
        self.scope = Scope::Function(name.to_string());
        self.naming.reset_call_sites();
        Ok(label)
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Name of the enclosing VM function, if any
    pub fn current_function(&self) -> Option<&str> {
        match &self.scope {
            Scope::Function(name) => Some(name),
            _ => None,
        }
    }

    pub fn static_namespace(&self) -> Option<&str> {
        self.static_namespace.as_deref()
    }

    /// Symbol for static variable `index` of the current namespace
    pub fn static_symbol(&self, index: u16) -> Result<String, TranslateError> {
        match &self.static_namespace {
            Some(namespace) => Ok(format!("{}.{}", namespace, index)),
            None => Err(TranslateError::protocol_misuse(
                "static segment accessed before any file or function established a namespace",
            )),
        }
    }

    /// A user label qualified with the current scope
    pub fn user_label(&self, name: &str) -> Label {
        Label::User {
            scope: self.scope.clone(),
            name: name.to_string(),
        }
    }

    /// Fresh return-address label for a call site in the current scope
    pub fn next_return_label(&mut self) -> Label {
        self.naming.next_return(&self.scope)
    }

    /// Fresh (true, end) labels for a comparison site
    pub fn next_compare_labels(&mut self) -> (Label, Label) {
        self.naming.next_compare()
    }

    /// Declare a label, failing if the name was already declared
    pub fn declare(&mut self, label: &Label) -> Result<String, TranslateError> {
        self.naming.declare(label)
    }

    pub fn naming(&self) -> &NameGenerator {
        &self.naming
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_bootstrap_scope() {
        let ctx = TranslationContext::new();
        assert_eq!(ctx.scope(), &Scope::Bootstrap);
        assert_eq!(ctx.current_function(), None);
        assert!(matches!(
            ctx.static_symbol(0),
            Err(TranslateError::ProtocolMisuse { .. })
        ));
    }

    #[test]
    fn test_begin_file_sets_namespace_and_scope() {
        let mut ctx = TranslationContext::new();
        ctx.begin_file("StaticTest");
        assert_eq!(ctx.static_symbol(4).unwrap(), "StaticTest.4");
        assert_eq!(ctx.user_label("END").to_string(), "StaticTest$END");
        assert_eq!(ctx.current_function(), None);
    }

    #[test]
    fn test_enter_function_uses_class_prefix_as_namespace() {
        let mut ctx = TranslationContext::new();
        ctx.begin_file("Main");
        assert_eq!(ctx.enter_function("Class1.set").unwrap(), "Class1.set");
        assert_eq!(ctx.static_namespace(), Some("Class1"));
        assert_eq!(ctx.static_symbol(0).unwrap(), "Class1.0");
        assert_eq!(ctx.current_function(), Some("Class1.set"));

        ctx.enter_function("main").unwrap();
        assert_eq!(ctx.static_namespace(), Some("main"));
    }

    #[test]
    fn test_call_sites_restart_at_function_entry() {
        let mut ctx = TranslationContext::new();
        ctx.enter_function("A.f").unwrap();
        assert_eq!(ctx.next_return_label().to_string(), "A.f$ret.1");
        assert_eq!(ctx.next_return_label().to_string(), "A.f$ret.2");
        ctx.enter_function("A.g").unwrap();
        assert_eq!(ctx.next_return_label().to_string(), "A.g$ret.1");
    }

    #[test]
    fn test_function_redefinition_is_rejected() {
        let mut ctx = TranslationContext::new();
        ctx.enter_function("A.f").unwrap();
        assert!(matches!(
            ctx.enter_function("A.f"),
            Err(TranslateError::DuplicateLabel { .. })
        ));
    }
}
