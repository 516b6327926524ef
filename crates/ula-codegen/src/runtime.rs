// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The decimal print runtime appended to every listing.

/// Routines backing the `print` builtin.
///
/// `rt_print_i8` prints a minus sign for negative values, negates, and
/// falls through to `rt_print_u8`. Negating -128 wraps to $80, which the
/// unsigned printer reads as 128, so the full i8 range comes out right.
///
/// `rt_print_u8` divides by repeated subtraction of 100 then 10. E is the
/// printed-digit flag for leading-zero suppression; the ones digit is
/// printed unconditionally so 0 still shows. Character output is `rst $10`,
/// the ROM print routine, with BC and DE saved around it.
pub(crate) const PRINT_RUNTIME: &str = "\
rt_print_i8:
    bit 7, a
    jr z, rt_print_u8
    push af
    ld a, $2d
    rst $10
    pop af
    neg
rt_print_u8:
    ld e, 0
    ld d, 100
    call rt_print_digit
    ld d, 10
    call rt_print_digit
    add a, $30
    rst $10
    ret
rt_print_digit:
    ld c, 0
rt_print_digit_sub:
    cp d
    jr c, rt_print_digit_done
    sub d
    inc c
    jr rt_print_digit_sub
rt_print_digit_done:
    ld b, a
    ld a, c
    or a
    jr nz, rt_print_digit_put
    bit 0, e
    jr z, rt_print_digit_skip
rt_print_digit_put:
    add a, $30
    push bc
    push de
    rst $10
    pop de
    pop bc
    ld e, 1
rt_print_digit_skip:
    ld a, b
    ret";
