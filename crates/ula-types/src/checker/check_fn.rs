// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Function-level checking: signatures, frame layout, and return analysis.

use ula_ast::decl::{FunctionDef, Program};
use ula_ast::stmt::{Block, Stmt, StmtKind};
use ula_ast::Type;

use super::errors::TypeError;
use super::typed::{FnSig, FrameLayout, StorageClass, Symbol};
use super::TypeChecker;

impl TypeChecker {
    /// Pass 1: record every function signature so calls can be forward.
    pub(super) fn collect_signatures(&mut self, program: &Program) -> Result<(), TypeError> {
        for func in &program.funcs {
            if func.name == "print" {
                return Err(TypeError::DuplicateDefinition {
                    name: func.name.clone(),
                    span: func.span,
                    first_span: None,
                });
            }
            if let Some(first) = self.fn_spans.get(&func.name) {
                return Err(TypeError::DuplicateDefinition {
                    name: func.name.clone(),
                    span: func.span,
                    first_span: Some(*first),
                });
            }
            if func.name == "main" && (!func.params.is_empty() || func.ret != Type::Void) {
                return Err(TypeError::InvalidMainSignature { span: func.span });
            }
            let sig = FnSig {
                params: func.params.iter().map(|p| p.ty).collect(),
                ret: func.ret,
            };
            self.signatures.insert(func.name.clone(), sig);
            self.fn_spans.insert(func.name.clone(), func.span);
        }
        Ok(())
    }

    /// Pass 2: check one function body against its signature.
    pub(super) fn check_fn(&mut self, func: &FunctionDef) -> Result<(), TypeError> {
        self.current_return_type = Some(func.ret);
        self.next_local_slot = 0;

        // Parameters share the body's outermost scope, so a top-level
        // `let` cannot reuse a parameter name.
        self.push_scope();
        let n = func.params.len();
        for (i, param) in func.params.iter().enumerate() {
            let symbol = Symbol {
                ty: param.ty,
                storage: StorageClass::Param,
                offset: param_offset(i, n),
            };
            self.declare(&param.name, symbol, param.span)?;
        }
        for stmt in &func.body.stmts {
            self.check_stmt(stmt)?;
        }
        self.pop_scope();

        if func.ret != Type::Void && !block_always_returns(&func.body) {
            return Err(TypeError::MissingReturn {
                function_name: func.name.clone(),
                expected: func.ret,
                span: func.span,
            });
        }

        self.frames.insert(
            func.name.clone(),
            FrameLayout { param_count: n, local_count: self.next_local_slot },
        );
        Ok(())
    }

    /// Reserve the next local slot in the current frame.
    ///
    /// Slots are never reused within a function, even when a block exits,
    /// so every binding keeps a stable offset for its whole lifetime.
    pub(super) fn alloc_local(&mut self, ty: Type) -> Symbol {
        let offset = local_offset(self.next_local_slot);
        self.next_local_slot += 1;
        Symbol { ty, storage: StorageClass::Local, offset }
    }
}

/// IX displacement of the value byte for parameter `i` of `n`.
///
/// Arguments are pushed left to right as AF pairs; above them sit the
/// return address and the saved IX, so the last parameter lands nearest
/// the frame pointer.
fn param_offset(i: usize, n: usize) -> i16 {
    (5 + 2 * (n - 1 - i)) as i16
}

/// IX displacement of the value byte for local slot `j`. Each slot is two
/// bytes wide to match the AF push layout; the value occupies the upper
/// byte.
fn local_offset(j: usize) -> i16 {
    -(2 * (j as i16) + 1)
}

/// Whether every path through the block reaches a `return`.
pub fn block_always_returns(block: &Block) -> bool {
    block.stmts.iter().any(stmt_always_returns)
}

fn stmt_always_returns(stmt: &Stmt) -> bool {
    match &stmt.kind {
        StmtKind::Return(_) => true,
        StmtKind::If { then_block, else_block: Some(else_block), .. } => {
            block_always_returns(then_block) && block_always_returns(else_block)
        }
        _ => false,
    }
}
