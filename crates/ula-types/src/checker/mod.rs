// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Type checker implementation.

use std::collections::HashMap;

use ula_ast::decl::Program;
use ula_ast::{NodeId, Span, Type};

mod check_expr;
mod check_fn;
mod check_stmt;
mod errors;
mod typed;

pub use check_fn::block_always_returns;
pub use errors::TypeError;
pub use typed::{FnSig, FrameLayout, StorageClass, Symbol, TypedProgram};

pub struct TypeChecker {
    /// Function signatures, collected up front so calls can be forward.
    pub(super) signatures: HashMap<String, FnSig>,
    /// Span of each function definition, for duplicate reporting.
    pub(super) fn_spans: HashMap<String, Span>,
    /// Types assigned to expression nodes.
    pub(super) node_types: HashMap<NodeId, Type>,
    /// Resolved symbol for every name-carrying node.
    pub(super) resolutions: HashMap<NodeId, Symbol>,
    /// Frame layout per function.
    pub(super) frames: HashMap<String, FrameLayout>,
    /// Scope stack for local symbols (innermost scope last), with the
    /// span where each name was declared.
    pub(super) scopes: Vec<HashMap<String, (Symbol, Span)>>,
    /// Current function's return type (for checking return statements).
    pub(super) current_return_type: Option<Type>,
    /// Next free local slot in the current frame.
    pub(super) next_local_slot: usize,
}

impl TypeChecker {
    /// Create a new type checker.
    pub fn new() -> Self {
        Self {
            signatures: HashMap::new(),
            fn_spans: HashMap::new(),
            node_types: HashMap::new(),
            resolutions: HashMap::new(),
            frames: HashMap::new(),
            scopes: Vec::new(),
            current_return_type: None,
            next_local_slot: 0,
        }
    }

    /// Check a whole program. Stops at the first error.
    pub fn check(mut self, program: &Program) -> Result<TypedProgram, TypeError> {
        self.collect_signatures(program)?;
        for func in &program.funcs {
            self.check_fn(func)?;
        }
        Ok(TypedProgram {
            node_types: self.node_types,
            resolutions: self.resolutions,
            signatures: self.signatures,
            frames: self.frames,
        })
    }

    pub(super) fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub(super) fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Bind a name in the innermost scope. Names are unique per scope;
    /// shadowing an outer scope is allowed.
    pub(super) fn declare(&mut self, name: &str, symbol: Symbol, span: Span) -> Result<(), TypeError> {
        if let Some(scope) = self.scopes.last_mut() {
            if let Some((_, first_span)) = scope.get(name) {
                return Err(TypeError::DuplicateDefinition {
                    name: name.to_string(),
                    span,
                    first_span: Some(*first_span),
                });
            }
            scope.insert(name.to_string(), (symbol, span));
        }
        Ok(())
    }

    pub(super) fn lookup(&self, name: &str) -> Option<Symbol> {
        for scope in self.scopes.iter().rev() {
            if let Some((symbol, _)) = scope.get(name) {
                return Some(*symbol);
            }
        }
        None
    }

    /// Every variable name currently in scope, for did-you-mean hints.
    pub(super) fn visible_names(&self) -> Vec<String> {
        self.scopes
            .iter()
            .flat_map(|scope| scope.keys().cloned())
            .collect()
    }

    /// Every callable name, for did-you-mean hints. Includes the `print`
    /// builtin, which never appears in `signatures`.
    pub(super) fn callable_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.signatures.keys().cloned().collect();
        names.push("print".to_string());
        names
    }
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// Typecheck a program.
pub fn typecheck(program: &Program) -> Result<TypedProgram, TypeError> {
    TypeChecker::new().check(program)
}
