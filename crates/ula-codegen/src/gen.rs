// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The code generator: one pass over the typed AST, emitting text lines.
//!
//! Register discipline: every expression leaves its 8-bit value in A.
//! Binary operations stash the left value on the stack with `push af`
//! while the right side runs, so arbitrarily nested operands and calls
//! cannot clobber it. IX is the frame pointer; locals sit below it,
//! parameters above the saved IX and return address.

use ula_ast::decl::{FunctionDef, Program};
use ula_ast::expr::{BinOp, Expr, ExprKind};
use ula_ast::stmt::{Block, Stmt, StmtKind};
use ula_ast::{NodeId, Type};
use ula_types::{block_always_returns, FrameLayout, Symbol, TypedProgram};

use crate::runtime::PRINT_RUNTIME;
use crate::{CodegenError, CodegenResult};

/// The code generator for one program.
pub struct CodeGenerator<'a> {
    typed: &'a TypedProgram,
    /// Finished lines of the listing.
    lines: Vec<String>,
    /// Monotone counter for branch labels.
    next_label: u32,
    /// Frame of the function currently being generated.
    frame: FrameLayout,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(typed: &'a TypedProgram) -> Self {
        Self {
            typed,
            lines: Vec::new(),
            next_label: 0,
            frame: FrameLayout::default(),
        }
    }

    /// Generate the whole listing: entry stub, user routines in source
    /// order, then the print runtime.
    pub fn generate(mut self, program: &Program) -> CodegenResult<String> {
        self.emit("org $8000");
        self.emit_blank();
        self.emit_label("start");
        if self.typed.signatures.contains_key("main") {
            self.emit("call f_main");
        }
        self.emit("ret");

        for func in &program.funcs {
            self.emit_blank();
            self.gen_function(func)?;
        }

        self.emit_blank();
        for line in PRINT_RUNTIME.lines() {
            self.lines.push(line.to_string());
        }

        Ok(self.lines.join("\n") + "\n")
    }

    // =========================================================================
    // Emit helpers
    // =========================================================================

    fn emit(&mut self, instr: &str) {
        self.lines.push(format!("    {}", instr));
    }

    fn emit_label(&mut self, label: &str) {
        self.lines.push(format!("{}:", label));
    }

    fn emit_blank(&mut self) {
        self.lines.push(String::new());
    }

    fn fresh_label(&mut self) -> String {
        let label = format!("LB{}", self.next_label);
        self.next_label += 1;
        label
    }

    fn symbol_of(&self, id: NodeId) -> CodegenResult<Symbol> {
        self.typed.symbol_of(id).ok_or(CodegenError::MissingSymbol(id))
    }

    fn type_of(&self, id: NodeId) -> CodegenResult<Type> {
        self.typed.type_of(id).ok_or(CodegenError::MissingType(id))
    }

    // =========================================================================
    // Functions
    // =========================================================================

    fn gen_function(&mut self, func: &FunctionDef) -> CodegenResult<()> {
        self.frame = *self
            .typed
            .frames
            .get(&func.name)
            .ok_or_else(|| CodegenError::MissingFrame(func.name.clone()))?;

        self.emit_label(&format!("f_{}", func.name));
        self.emit("push ix");
        self.emit("ld ix, 0");
        self.emit("add ix, sp");
        if self.frame.local_count > 0 {
            self.emit(&format!("ld hl, -{}", 2 * self.frame.local_count));
            self.emit("add hl, sp");
            self.emit("ld sp, hl");
        }

        self.gen_block(&func.body)?;

        // A body that always returns emitted its epilogue inline at every
        // return; anything else needs the fallthrough epilogue.
        if !block_always_returns(&func.body) {
            self.gen_epilogue();
        }
        Ok(())
    }

    fn gen_epilogue(&mut self) {
        self.emit("ld sp, ix");
        self.emit("pop ix");
        self.emit("ret");
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn gen_block(&mut self, block: &Block) -> CodegenResult<()> {
        for stmt in &block.stmts {
            self.gen_stmt(stmt)?;
        }
        Ok(())
    }

    fn gen_stmt(&mut self, stmt: &Stmt) -> CodegenResult<()> {
        match &stmt.kind {
            StmtKind::Let { init, .. } => {
                self.gen_expr(init)?;
                let symbol = self.symbol_of(stmt.id)?;
                self.emit(&format!("ld ({}), a", ix_operand(symbol.offset)));
                Ok(())
            }
            StmtKind::Assign { value, .. } => {
                self.gen_expr(value)?;
                let symbol = self.symbol_of(stmt.id)?;
                self.emit(&format!("ld ({}), a", ix_operand(symbol.offset)));
                Ok(())
            }
            StmtKind::If { cond, then_block, else_block } => {
                self.gen_if(cond, then_block, else_block.as_ref())
            }
            StmtKind::Expr(expr) => {
                self.gen_expr(expr)?;
                Ok(())
            }
            StmtKind::Return(value) => {
                if let Some(expr) = value {
                    self.gen_expr(expr)?;
                }
                self.gen_epilogue();
                Ok(())
            }
        }
    }

    fn gen_if(
        &mut self,
        cond: &Expr,
        then_block: &Block,
        else_block: Option<&Block>,
    ) -> CodegenResult<()> {
        self.gen_expr(cond)?;
        self.emit("cp $01");
        match else_block {
            Some(else_block) => {
                let else_label = self.fresh_label();
                let end_label = self.fresh_label();
                self.emit(&format!("jp nz, {}", else_label));
                self.gen_block(then_block)?;
                self.emit(&format!("jp {}", end_label));
                self.emit_label(&else_label);
                self.gen_block(else_block)?;
                self.emit_label(&end_label);
            }
            None => {
                let end_label = self.fresh_label();
                self.emit(&format!("jp nz, {}", end_label));
                self.gen_block(then_block)?;
                self.emit_label(&end_label);
            }
        }
        Ok(())
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn gen_expr(&mut self, expr: &Expr) -> CodegenResult<()> {
        match &expr.kind {
            ExprKind::Int(value) => {
                self.emit(&format!("ld a, {}", value));
                Ok(())
            }
            ExprKind::Bool(value) => {
                self.emit(if *value { "ld a, $01" } else { "ld a, $00" });
                Ok(())
            }
            ExprKind::Ident(_) => {
                let symbol = self.symbol_of(expr.id)?;
                self.emit(&format!("ld a, ({})", ix_operand(symbol.offset)));
                Ok(())
            }
            ExprKind::Unary { operand, .. } => {
                self.gen_expr(operand)?;
                self.emit("neg");
                Ok(())
            }
            ExprKind::Binary { op, left, right } => self.gen_binary(*op, left, right),
            ExprKind::Call { callee, args } => self.gen_call(callee, args),
        }
    }

    /// Left value to the stack, right value to B, left back to A.
    fn gen_binary(&mut self, op: BinOp, left: &Expr, right: &Expr) -> CodegenResult<()> {
        self.gen_expr(left)?;
        self.emit("push af");
        self.gen_expr(right)?;
        self.emit("ld b, a");
        self.emit("pop af");

        match op {
            BinOp::Add => {
                self.emit("add a, b");
                Ok(())
            }
            BinOp::Sub => {
                self.emit("sub b");
                Ok(())
            }
            _ => self.gen_comparison(op, left),
        }
    }

    /// Compare A against B and materialize the result as $00/$01 in A.
    fn gen_comparison(&mut self, op: BinOp, left: &Expr) -> CodegenResult<()> {
        let signed = self.type_of(left.id)? == Type::I8;
        let ordered = !matches!(op, BinOp::Eq | BinOp::Ne);
        if signed && ordered {
            // Bias both operands by $80 so unsigned compare gives the
            // signed order.
            self.emit("xor $80");
            self.emit("ld c, a");
            self.emit("ld a, b");
            self.emit("xor $80");
            self.emit("ld b, a");
            self.emit("ld a, c");
        }
        self.emit("cp b");

        match op {
            BinOp::Eq => self.gen_flag_to_bool("jp z"),
            BinOp::Ne => self.gen_flag_to_bool("jp nz"),
            BinOp::Lt => self.gen_flag_to_bool("jp c"),
            BinOp::Ge => self.gen_flag_to_bool("jp nc"),
            BinOp::Gt => self.gen_carry_or_zero_bool(false),
            BinOp::Le => self.gen_carry_or_zero_bool(true),
            // Routed to add/sub in gen_binary
            BinOp::Add | BinOp::Sub => unreachable!("not comparisons"),
        }
    }

    /// One-flag result. `ld` leaves flags alone, so A is preloaded with
    /// the hit value and overwritten on fallthrough.
    fn gen_flag_to_bool(&mut self, jump: &str) -> CodegenResult<()> {
        let label = self.fresh_label();
        self.emit("ld a, $01");
        self.emit(&format!("{}, {}", jump, label));
        self.emit("ld a, $00");
        self.emit_label(&label);
        Ok(())
    }

    /// Gt and Le need both flags: carry means less, zero means equal.
    fn gen_carry_or_zero_bool(&mut self, value_when_le: bool) -> CodegenResult<()> {
        let label = self.fresh_label();
        let (on_le, otherwise) = if value_when_le { ("$01", "$00") } else { ("$00", "$01") };
        self.emit(&format!("ld a, {}", on_le));
        self.emit(&format!("jp c, {}", label));
        self.emit(&format!("jp z, {}", label));
        self.emit(&format!("ld a, {}", otherwise));
        self.emit_label(&label);
        Ok(())
    }

    /// Arguments go to the stack left to right; the caller cleans up.
    fn gen_call(&mut self, callee: &str, args: &[Expr]) -> CodegenResult<()> {
        if callee == "print" {
            let arg = match args {
                [arg] => arg,
                _ => return Err(CodegenError::MalformedPrint(args.len())),
            };
            self.gen_expr(arg)?;
            let routine = if self.type_of(arg.id)? == Type::I8 {
                "rt_print_i8"
            } else {
                "rt_print_u8"
            };
            self.emit(&format!("call {}", routine));
            return Ok(());
        }

        for arg in args {
            self.gen_expr(arg)?;
            self.emit("push af");
        }
        self.emit(&format!("call f_{}", callee));
        for _ in args {
            self.emit("pop bc");
        }
        Ok(())
    }
}

/// IX-relative operand text: `ix+5` or `ix-1`.
fn ix_operand(offset: i16) -> String {
    if offset >= 0 {
        format!("ix+{}", offset)
    } else {
        format!("ix{}", offset)
    }
}
