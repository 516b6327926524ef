// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Type system and type checker for the Ula language.
//!
//! Checks the AST against the declared types, resolves every name to a
//! stack frame slot, and produces a [`TypedProgram`] for code generation.

mod checker;

pub use checker::{
    block_always_returns, typecheck, FnSig, FrameLayout, StorageClass, Symbol, TypeChecker,
    TypeError, TypedProgram,
};

#[cfg(test)]
mod tests {
    use super::*;
    use ula_ast::decl::Program;
    use ula_ast::stmt::StmtKind;
    use ula_ast::Type;

    fn parse(src: &str) -> Program {
        let tokens = ula_lexer::Lexer::new(src).tokenize().expect("lex error");
        ula_parser::Parser::new(tokens).parse().expect("parse error")
    }

    fn check(src: &str) -> TypedProgram {
        typecheck(&parse(src)).expect("type error")
    }

    fn check_err(src: &str) -> TypeError {
        typecheck(&parse(src)).expect_err("expected a type error")
    }

    #[test]
    fn checks_a_two_function_program() {
        let typed = check(
            "def print_digit(digit: u8) -> void:\n    print(digit + 48)\n\ndef main() -> void:\n    let digit: u8 = 1\n    print_digit(digit)\n",
        );
        assert_eq!(typed.frames["print_digit"], FrameLayout { param_count: 1, local_count: 0 });
        assert_eq!(typed.frames["main"], FrameLayout { param_count: 0, local_count: 1 });
        assert_eq!(typed.signatures["print_digit"].params, vec![Type::U8]);
        assert_eq!(typed.signatures["print_digit"].ret, Type::Void);
    }

    #[test]
    fn literal_adopts_expected_type() {
        // 100 fits both u8 and i8; the declaration decides which it is.
        let program = parse("def f() -> void:\n    let a: u8 = 100\n    let b: i8 = 100\n");
        let typed = typecheck(&program).expect("type error");
        let body = &program.funcs[0].body.stmts;
        let (init_a, init_b) = match (&body[0].kind, &body[1].kind) {
            (StmtKind::Let { init: a, .. }, StmtKind::Let { init: b, .. }) => (a.id, b.id),
            _ => panic!("Expected let statements"),
        };
        assert_eq!(typed.type_of(init_a), Some(Type::U8));
        assert_eq!(typed.type_of(init_b), Some(Type::I8));
    }

    #[test]
    fn bare_literal_defaults_to_u8() {
        let err = check_err("def f() -> void:\n    let b: bool = 5\n");
        match err {
            TypeError::Mismatch { expected, found, .. } => {
                assert_eq!(expected, Type::Bool);
                assert_eq!(found, Type::U8);
            }
            other => panic!("Expected mismatch, got {:?}", other),
        }
    }

    #[test]
    fn negative_literal_defaults_to_i8() {
        check("def f() -> void:\n    let x: i8 = -128\n");
        let err = check_err("def f() -> void:\n    let b: bool = -1\n");
        match err {
            TypeError::Mismatch { found, .. } => assert_eq!(found, Type::I8),
            other => panic!("Expected mismatch, got {:?}", other),
        }
    }

    #[test]
    fn literal_out_of_range_for_u8() {
        let err = check_err("def f() -> void:\n    let x: u8 = 256\n");
        match err {
            TypeError::LiteralOutOfRange { value, ty, .. } => {
                assert_eq!(value, 256);
                assert_eq!(ty, Type::U8);
            }
            other => panic!("Expected out-of-range error, got {:?}", other),
        }
    }

    #[test]
    fn literal_out_of_range_for_i8() {
        let err = check_err("def f() -> void:\n    let x: i8 = -129\n");
        assert!(matches!(err, TypeError::LiteralOutOfRange { value: -129, ty: Type::I8, .. }));
    }

    #[test]
    fn negation_of_grouped_literal_checks_as_i8() {
        // `-(128)` is unary negation of the literal 128, which cannot be i8.
        let err = check_err("def f() -> void:\n    let x: i8 = -(128)\n");
        assert!(matches!(err, TypeError::LiteralOutOfRange { value: 128, .. }));
    }

    #[test]
    fn undefined_variable() {
        let err = check_err("def f(year: u8) -> u8:\n    return yearr\n");
        match err {
            TypeError::UndefinedSymbol { name, candidates, .. } => {
                assert_eq!(name, "yearr");
                assert!(candidates.contains(&"year".to_string()));
            }
            other => panic!("Expected undefined symbol, got {:?}", other),
        }
    }

    #[test]
    fn undefined_function() {
        let err = check_err("def f() -> void:\n    g()\n");
        match err {
            TypeError::UndefinedSymbol { name, candidates, .. } => {
                assert_eq!(name, "g");
                // Callable candidates cover user functions and the builtin.
                assert!(candidates.contains(&"f".to_string()));
                assert!(candidates.contains(&"print".to_string()));
            }
            other => panic!("Expected undefined symbol, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_function_definition() {
        let err = check_err("def f() -> void:\n    return\n\ndef f() -> void:\n    return\n");
        match err {
            TypeError::DuplicateDefinition { name, first_span, .. } => {
                assert_eq!(name, "f");
                assert!(first_span.is_some());
            }
            other => panic!("Expected duplicate definition, got {:?}", other),
        }
    }

    #[test]
    fn print_cannot_be_redefined() {
        let err = check_err("def print(x: u8) -> void:\n    return\n");
        match err {
            TypeError::DuplicateDefinition { name, first_span, .. } => {
                assert_eq!(name, "print");
                assert!(first_span.is_none());
            }
            other => panic!("Expected duplicate definition, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_local_in_same_scope() {
        let err = check_err("def f() -> void:\n    let x: u8 = 1\n    let x: u8 = 2\n");
        assert!(matches!(err, TypeError::DuplicateDefinition { .. }));
    }

    #[test]
    fn local_cannot_reuse_parameter_name() {
        let err = check_err("def f(x: u8) -> void:\n    let x: u8 = 1\n");
        assert!(matches!(err, TypeError::DuplicateDefinition { .. }));
    }

    #[test]
    fn shadowed_uses_resolve_to_the_innermost_binding() {
        let src = "def f() -> u8:\n    let x: u8 = 1\n    if true:\n        let x: u8 = 2\n        return x\n    return x\n";
        let program = parse(src);
        let typed = typecheck(&program).expect("type error");
        let body = &program.funcs[0].body.stmts;

        let then_block = match &body[1].kind {
            StmtKind::If { then_block, .. } => then_block,
            _ => panic!("Expected an if statement"),
        };
        let (inner_use, outer_use) = match (&then_block.stmts[1].kind, &body[2].kind) {
            (StmtKind::Return(Some(inner)), StmtKind::Return(Some(outer))) => (inner.id, outer.id),
            _ => panic!("Expected return statements"),
        };
        // The shadowing let owns the second slot; the use after the
        // block falls back to the outer one in the first.
        assert_eq!(typed.symbol_of(inner_use).unwrap().offset, -3);
        assert_eq!(typed.symbol_of(outer_use).unwrap().offset, -1);
    }

    #[test]
    fn arity_mismatch() {
        let err = check_err(
            "def g(a: u8, b: u8) -> void:\n    return\n\ndef f() -> void:\n    g(1)\n",
        );
        match err {
            TypeError::ArityMismatch { name, expected, found, .. } => {
                assert_eq!(name, "g");
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("Expected arity mismatch, got {:?}", other),
        }
    }

    #[test]
    fn argument_type_mismatch() {
        let err = check_err(
            "def g(a: i8) -> void:\n    return\n\ndef f(x: u8) -> void:\n    g(x)\n",
        );
        assert!(matches!(
            err,
            TypeError::Mismatch { expected: Type::I8, found: Type::U8, .. }
        ));
    }

    #[test]
    fn print_accepts_both_integer_types() {
        check("def f(a: u8, b: i8) -> void:\n    print(a)\n    print(b)\n");
    }

    #[test]
    fn print_rejects_bool() {
        let err = check_err("def f() -> void:\n    print(true)\n");
        assert!(matches!(err, TypeError::Mismatch { found: Type::Bool, .. }));
    }

    #[test]
    fn print_takes_exactly_one_argument() {
        let err = check_err("def f() -> void:\n    print(1, 2)\n");
        match err {
            TypeError::ArityMismatch { name, expected, found, .. } => {
                assert_eq!(name, "print");
                assert_eq!(expected, 1);
                assert_eq!(found, 2);
            }
            other => panic!("Expected arity mismatch, got {:?}", other),
        }
    }

    #[test]
    fn assignment_checks_the_variable_type() {
        let err = check_err("def f() -> void:\n    let x: u8 = 1\n    x = true\n");
        assert!(matches!(
            err,
            TypeError::Mismatch { expected: Type::U8, found: Type::Bool, .. }
        ));
    }

    #[test]
    fn assignment_to_undefined_name() {
        let err = check_err("def f() -> void:\n    x = 1\n");
        assert!(matches!(err, TypeError::UndefinedSymbol { .. }));
    }

    #[test]
    fn condition_must_be_bool() {
        let err = check_err("def f() -> void:\n    if 1:\n        return\n");
        assert!(matches!(err, TypeError::Mismatch { expected: Type::Bool, .. }));
    }

    #[test]
    fn missing_return_in_value_function() {
        let err = check_err("def f() -> u8:\n    let x: u8 = 1\n");
        match err {
            TypeError::MissingReturn { function_name, expected, .. } => {
                assert_eq!(function_name, "f");
                assert_eq!(expected, Type::U8);
            }
            other => panic!("Expected missing return, got {:?}", other),
        }
    }

    #[test]
    fn if_else_with_returns_on_both_arms_suffices() {
        check(
            "def f(x: bool) -> u8:\n    if x:\n        return 1\n    else:\n        return 2\n",
        );
    }

    #[test]
    fn if_without_else_does_not_guarantee_return() {
        let err = check_err("def f(x: bool) -> u8:\n    if x:\n        return 1\n");
        assert!(matches!(err, TypeError::MissingReturn { .. }));
    }

    #[test]
    fn void_function_may_fall_through() {
        check("def f() -> void:\n    let x: u8 = 1\n");
    }

    #[test]
    fn return_value_in_void_function() {
        let err = check_err("def f() -> void:\n    return 1\n");
        assert!(matches!(err, TypeError::Mismatch { expected: Type::Void, .. }));
    }

    #[test]
    fn void_function_may_return_a_void_call() {
        check("def g() -> void:\n    return\n\ndef f() -> void:\n    return g()\n");
    }

    #[test]
    fn bare_return_in_value_function() {
        let err = check_err("def f() -> u8:\n    return\n");
        assert!(matches!(
            err,
            TypeError::Mismatch { expected: Type::U8, found: Type::Void, .. }
        ));
    }

    #[test]
    fn arithmetic_requires_matching_types() {
        let err = check_err("def f(a: u8, b: i8) -> void:\n    let x: u8 = a + b\n");
        assert!(matches!(
            err,
            TypeError::Mismatch { expected: Type::U8, found: Type::I8, .. }
        ));
    }

    #[test]
    fn arithmetic_rejects_bool_operands() {
        let err = check_err("def f() -> void:\n    let x: u8 = true + 1\n");
        assert!(matches!(err, TypeError::Mismatch { found: Type::Bool, .. }));
    }

    #[test]
    fn comparison_yields_bool() {
        check("def f(a: u8, b: u8) -> bool:\n    return a < b\n");
    }

    #[test]
    fn comparison_on_bools_is_rejected() {
        let err = check_err("def f(a: bool) -> bool:\n    return a == true\n");
        assert!(matches!(err, TypeError::Mismatch { found: Type::Bool, .. }));
    }

    #[test]
    fn unary_negation_requires_i8() {
        let err = check_err("def f(x: u8) -> i8:\n    return -x\n");
        assert!(matches!(
            err,
            TypeError::Mismatch { expected: Type::I8, found: Type::U8, .. }
        ));
    }

    #[test]
    fn recursion_and_forward_calls_resolve() {
        check(
            "def even(n: u8) -> bool:\n    if n == 0:\n        return true\n    return odd(n - 1)\n\ndef odd(n: u8) -> bool:\n    if n == 0:\n        return false\n    return even(n - 1)\n",
        );
    }

    #[test]
    fn call_result_type_is_the_return_type() {
        let err = check_err(
            "def g() -> void:\n    return\n\ndef f() -> void:\n    let x: u8 = g()\n",
        );
        assert!(matches!(
            err,
            TypeError::Mismatch { expected: Type::U8, found: Type::Void, .. }
        ));
    }

    #[test]
    fn frame_offsets_for_params_and_locals() {
        let src = "def f(a: u8, b: u8) -> u8:\n    let x: u8 = a\n    let y: u8 = b\n    return x\n";
        let program = parse(src);
        let typed = typecheck(&program).expect("type error");
        let body = &program.funcs[0].body.stmts;

        // Params: last-declared sits nearest the frame pointer.
        let (init_a, init_b) = match (&body[0].kind, &body[1].kind) {
            (StmtKind::Let { init: a, .. }, StmtKind::Let { init: b, .. }) => (a.id, b.id),
            _ => panic!("Expected let statements"),
        };
        assert_eq!(typed.symbol_of(init_a).unwrap().offset, 7);
        assert_eq!(typed.symbol_of(init_b).unwrap().offset, 5);
        assert_eq!(typed.symbol_of(init_a).unwrap().storage, StorageClass::Param);

        // Locals: slots grow downward, value byte in the upper half.
        assert_eq!(typed.symbol_of(body[0].id).unwrap().offset, -1);
        assert_eq!(typed.symbol_of(body[1].id).unwrap().offset, -3);
        assert_eq!(typed.symbol_of(body[0].id).unwrap().storage, StorageClass::Local);
    }

    #[test]
    fn main_signature_is_enforced() {
        let err = check_err("def main(x: u8) -> void:\n    return\n");
        assert!(matches!(err, TypeError::InvalidMainSignature { .. }));
        let err = check_err("def main() -> u8:\n    return 0\n");
        assert!(matches!(err, TypeError::InvalidMainSignature { .. }));
    }

    #[test]
    fn program_without_main_is_valid() {
        check("def helper() -> u8:\n    return 1\n");
    }
}
