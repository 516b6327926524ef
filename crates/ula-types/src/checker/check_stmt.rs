// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statement checking.

use ula_ast::stmt::{Block, Stmt, StmtKind};
use ula_ast::Type;

use super::errors::TypeError;
use super::TypeChecker;

impl TypeChecker {
    /// Check a nested block in its own scope.
    pub(super) fn check_block(&mut self, block: &Block) -> Result<(), TypeError> {
        self.push_scope();
        for stmt in &block.stmts {
            self.check_stmt(stmt)?;
        }
        self.pop_scope();
        Ok(())
    }

    pub(super) fn check_stmt(&mut self, stmt: &Stmt) -> Result<(), TypeError> {
        match &stmt.kind {
            StmtKind::Let { name, ty, init } => {
                // The initializer is checked before the name is bound, so
                // `let x: u8 = x` refers to an outer `x` or is undefined.
                self.check_expr(init, Some(*ty))?;
                let symbol = self.alloc_local(*ty);
                self.declare(name, symbol, stmt.span)?;
                self.resolutions.insert(stmt.id, symbol);
                Ok(())
            }
            StmtKind::Assign { name, value } => {
                let symbol = self.lookup(name).ok_or_else(|| TypeError::UndefinedSymbol {
                    name: name.clone(),
                    span: stmt.span,
                    candidates: self.visible_names(),
                })?;
                self.check_expr(value, Some(symbol.ty))?;
                self.resolutions.insert(stmt.id, symbol);
                Ok(())
            }
            StmtKind::If { cond, then_block, else_block } => {
                self.check_expr(cond, Some(Type::Bool))?;
                self.check_block(then_block)?;
                if let Some(else_block) = else_block {
                    self.check_block(else_block)?;
                }
                Ok(())
            }
            StmtKind::Expr(expr) => {
                self.check_expr(expr, None)?;
                Ok(())
            }
            StmtKind::Return(value) => {
                let expected = self.current_return_type.unwrap_or(Type::Void);
                match value {
                    None if expected == Type::Void => Ok(()),
                    None => Err(TypeError::Mismatch {
                        expected,
                        found: Type::Void,
                        span: stmt.span,
                    }),
                    // The payload must match the declared return type
                    // exactly, so `return g()` is fine in a void function
                    // when g itself returns void.
                    Some(expr) => {
                        self.check_expr(expr, Some(expected))?;
                        Ok(())
                    }
                }
            }
        }
    }
}
