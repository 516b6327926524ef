// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression checking and literal type inference.

use ula_ast::expr::{BinOp, Expr, ExprKind, UnaryOp};
use ula_ast::{Span, Type};

use super::errors::TypeError;
use super::TypeChecker;

impl TypeChecker {
    /// Check an expression, optionally against an expected type.
    ///
    /// The expected type drives integer literal inference: `200` is a u8
    /// in u8 position and an i8 error there only if out of range. With no
    /// expectation, non-negative literals default to u8 and negative ones
    /// to i8.
    pub(super) fn check_expr(
        &mut self,
        expr: &Expr,
        expected: Option<Type>,
    ) -> Result<Type, TypeError> {
        let ty = match &expr.kind {
            ExprKind::Int(value) => self.check_int_literal(*value, expected, expr.span)?,
            ExprKind::Bool(_) => Type::Bool,
            ExprKind::Ident(name) => {
                let symbol = self.lookup(name).ok_or_else(|| TypeError::UndefinedSymbol {
                    name: name.clone(),
                    span: expr.span,
                    candidates: self.visible_names(),
                })?;
                self.resolutions.insert(expr.id, symbol);
                symbol.ty
            }
            ExprKind::Binary { op, left, right } => {
                self.check_binary(*op, left, right, expected)?
            }
            ExprKind::Unary { op: UnaryOp::Neg, operand } => {
                self.check_expr(operand, Some(Type::I8))?;
                Type::I8
            }
            ExprKind::Call { callee, args } => self.check_call(callee, args, expr.span)?,
        };

        if let Some(expected) = expected {
            if ty != expected {
                return Err(TypeError::Mismatch { expected, found: ty, span: expr.span });
            }
        }
        self.node_types.insert(expr.id, ty);
        Ok(ty)
    }

    fn check_int_literal(
        &self,
        value: i64,
        expected: Option<Type>,
        span: Span,
    ) -> Result<Type, TypeError> {
        match expected {
            Some(ty) if ty.is_integer() => {
                if !ty.contains(value) {
                    return Err(TypeError::LiteralOutOfRange { value, ty, span });
                }
                Ok(ty)
            }
            _ => {
                if (0..=255).contains(&value) {
                    Ok(Type::U8)
                } else if (-128..=-1).contains(&value) {
                    Ok(Type::I8)
                } else {
                    let ty = if value < 0 { Type::I8 } else { Type::U8 };
                    Err(TypeError::LiteralOutOfRange { value, ty, span })
                }
            }
        }
    }

    fn check_binary(
        &mut self,
        op: BinOp,
        left: &Expr,
        right: &Expr,
        expected: Option<Type>,
    ) -> Result<Type, TypeError> {
        if op.is_comparison() {
            // Both operands must share one integer type. The left operand
            // fixes it, so literals compare cleanly against variables when
            // the variable comes first.
            let left_ty = self.check_expr(left, None)?;
            if !left_ty.is_integer() {
                return Err(TypeError::Mismatch {
                    expected: Type::U8,
                    found: left_ty,
                    span: left.span,
                });
            }
            self.check_expr(right, Some(left_ty))?;
            Ok(Type::Bool)
        } else {
            // Arithmetic inherits the surrounding integer expectation so
            // literals in `let x: i8 = 100 + 27` resolve as i8.
            let operand_expected = expected.filter(|t| t.is_integer());
            let left_ty = self.check_expr(left, operand_expected)?;
            if !left_ty.is_integer() {
                return Err(TypeError::Mismatch {
                    expected: operand_expected.unwrap_or(Type::U8),
                    found: left_ty,
                    span: left.span,
                });
            }
            self.check_expr(right, Some(left_ty))?;
            Ok(left_ty)
        }
    }

    fn check_call(
        &mut self,
        callee: &str,
        args: &[Expr],
        span: Span,
    ) -> Result<Type, TypeError> {
        if callee == "print" {
            return self.check_print_call(args, span);
        }

        let sig = self.signatures.get(callee).cloned().ok_or_else(|| {
            TypeError::UndefinedSymbol {
                name: callee.to_string(),
                span,
                candidates: self.callable_names(),
            }
        })?;
        if args.len() != sig.params.len() {
            return Err(TypeError::ArityMismatch {
                name: callee.to_string(),
                expected: sig.params.len(),
                found: args.len(),
                span,
            });
        }
        for (arg, &param_ty) in args.iter().zip(&sig.params) {
            self.check_expr(arg, Some(param_ty))?;
        }
        Ok(sig.ret)
    }

    /// `print` is the one builtin: a single u8 or i8 argument, returns void.
    fn check_print_call(&mut self, args: &[Expr], span: Span) -> Result<Type, TypeError> {
        if args.len() != 1 {
            return Err(TypeError::ArityMismatch {
                name: "print".to_string(),
                expected: 1,
                found: args.len(),
                span,
            });
        }
        let ty = self.check_expr(&args[0], None)?;
        if !ty.is_integer() {
            return Err(TypeError::Mismatch {
                expected: Type::U8,
                found: ty,
                span: args[0].span,
            });
        }
        Ok(Type::Void)
    }
}
