//! RS274/NGC real value and expression readers
//!
//! Recursive descent over one line of code. A real value is a number, a
//! `#` parameter reference, a unary operation or a bracketed expression.
//! Expressions fold binary operations left to right within each precedence
//! tier; tier-1 (`/ MOD ** *`) binds before tier-2 (`+ - AND OR XOR`).
//!
//! `[9+8*7/6+5-4*3**2+1]` therefore evaluates as `[9+[8*7/6]+5-[[4*3]**2]+1]`.
//!
//! Every reader leaves the cursor on the first character after what it
//! consumed; on error the cursor stays where the fault was detected, which
//! for an unclosed expression is the line terminator.

use core::f32::consts::PI;

use crate::gcode::cursor::LineCursor;
use crate::gcode::error::EvalError;
use crate::gcode::ops::{Operation, UnaryOp};
use crate::params::{ParameterStore, MAX_PARAMETERS};
use crate::platform::traits::{PlcIoInterface, PositionSource};

/// Read a real value: number, parameter, unary operation or expression
///
/// Dispatches on the first character: `[` opens an expression, `#` a
/// parameter reference, a letter a unary operation name, anything else is
/// read as a number.
pub fn read_real_value<P, S>(
    cursor: &mut LineCursor,
    store: &ParameterStore<P, S>,
) -> Result<f32, EvalError>
where
    P: PlcIoInterface,
    S: PositionSource,
{
    match cursor.peek() {
        0 => Err(EvalError::NoCharactersInRealValue),
        b'[' => read_real_expression(cursor, store),
        b'#' => read_parameter(cursor, store),
        c if c.is_ascii_uppercase() => read_unary(cursor, store),
        _ => read_real_number(cursor),
    }
}

/// Read an integer-constrained value
///
/// Any real value is accepted as long as it lands within 0.0001 of an
/// integer; values just under the next integer (fraction above 0.9999) are
/// carried up to it.
pub fn read_integer_value<P, S>(
    cursor: &mut LineCursor,
    store: &ParameterStore<P, S>,
) -> Result<i32, EvalError>
where
    P: PlcIoInterface,
    S: PositionSource,
{
    let value = read_real_value(cursor, store)?;
    let mut integer = libm::floorf(value) as i32;
    if value - integer as f32 > 0.9999 {
        integer = libm::ceilf(value) as i32;
    } else if value - integer as f32 > 0.0001 {
        return Err(EvalError::NonIntegerForInteger);
    }
    Ok(integer)
}

/// Read a `#<integer-value>` parameter reference
///
/// The characters after `#` may be any expression that evaluates to an
/// integer, so `##2` and `#[#2]` both read the parameter whose number is
/// stored in parameter 2.
pub fn read_parameter<P, S>(
    cursor: &mut LineCursor,
    store: &ParameterStore<P, S>,
) -> Result<f32, EvalError>
where
    P: PlcIoInterface,
    S: PositionSource,
{
    if cursor.peek() != b'#' {
        return Err(EvalError::InternalCall);
    }
    cursor.bump();
    let index = read_integer_value(cursor, store)?;
    if index < 1 || index >= MAX_PARAMETERS as i32 {
        return Err(EvalError::ParameterOutOfRange);
    }
    store.read_stored(index as u16)
}

/// Read a literal number
///
/// The first character may be a digit, `+`, `-` or `.`; every following
/// character must be a digit or `.`. A second decimal point terminates the
/// number (the error, if any, surfaces on the next item).
pub fn read_real_number(cursor: &mut LineCursor) -> Result<f32, EvalError> {
    let line = cursor.line();
    let mut n = cursor.pos();

    match cursor.peek() {
        b'+' => {
            // Skip the sign so it does not reach the float parser.
            cursor.bump();
            n += 1;
        }
        b'-' => {
            n += 1;
        }
        c if c == b'.' || c.is_ascii_digit() => {}
        _ => return Err(EvalError::BadNumberFormat),
    }

    let mut found_digit = false;
    let mut found_point = false;
    while n < line.len() {
        let c = line[n];
        if c.is_ascii_digit() {
            found_digit = true;
        } else if c == b'.' {
            if found_point {
                break;
            }
            found_point = true;
        } else {
            break;
        }
        n += 1;
    }

    if !found_digit {
        return Err(EvalError::NoDigitsInNumber);
    }
    let text = core::str::from_utf8(&line[cursor.pos()..n])
        .map_err(|_| EvalError::BadNumberFormat)?;
    let value: f32 = text.parse().map_err(|_| EvalError::NumberParseFailed)?;
    cursor.set_pos(n);
    Ok(value)
}

/// Read a bracketed expression, cursor on `[`
pub fn read_real_expression<P, S>(
    cursor: &mut LineCursor,
    store: &ParameterStore<P, S>,
) -> Result<f32, EvalError>
where
    P: PlcIoInterface,
    S: PositionSource,
{
    if cursor.peek() != b'[' {
        return Err(EvalError::InternalCall);
    }
    cursor.bump();
    let mut value = read_real_value(cursor, store)?;
    let mut next_operation = read_operation(cursor)?;
    if next_operation == Operation::RightBracket {
        return Ok(value);
    }
    if next_operation.is_times_like() {
        read_rest_tier1(cursor, store, &mut value, &mut next_operation)?;
        if next_operation == Operation::RightBracket {
            return Ok(value);
        }
    }
    read_rest_tier2(cursor, store, &mut value, next_operation)?;
    Ok(value)
}

/// Fold a run of tier-1 operations into `value`
///
/// Stops once the operation read after a value is tier-2 or the closing
/// bracket; that operation is handed back through `last_operation`.
fn read_rest_tier1<P, S>(
    cursor: &mut LineCursor,
    store: &ParameterStore<P, S>,
    value: &mut f32,
    last_operation: &mut Operation,
) -> Result<(), EvalError>
where
    P: PlcIoInterface,
    S: PositionSource,
{
    loop {
        let mut next_value = read_real_value(cursor, store)?;
        let next_operation = read_operation(cursor)?;
        execute_binary1(value, *last_operation, &mut next_value)?;
        *last_operation = next_operation;
        if !next_operation.is_times_like() {
            return Ok(());
        }
    }
}

/// Fold tier-2 operations into `value` until the closing bracket
///
/// A tier-1 operation after a value starts a nested tier-1 fold whose
/// result becomes the right operand.
fn read_rest_tier2<P, S>(
    cursor: &mut LineCursor,
    store: &ParameterStore<P, S>,
    value: &mut f32,
    mut last_operation: Operation,
) -> Result<(), EvalError>
where
    P: PlcIoInterface,
    S: PositionSource,
{
    loop {
        let mut next_value = read_real_value(cursor, store)?;
        let mut next_operation = read_operation(cursor)?;
        if next_operation.is_times_like() {
            read_rest_tier1(cursor, store, &mut next_value, &mut next_operation)?;
        }
        execute_binary2(value, last_operation, next_value)?;
        if next_operation == Operation::RightBracket {
            return Ok(());
        }
        last_operation = next_operation;
    }
}

/// Apply a tier-1 binary operation: `/`, `MOD`, `**`, `*`
pub fn execute_binary1(
    left: &mut f32,
    operation: Operation,
    right: &mut f32,
) -> Result<(), EvalError> {
    match operation {
        Operation::DividedBy => {
            if *right == 0.0 {
                return Err(EvalError::DivideByZero);
            }
            *left /= *right;
        }
        Operation::Modulo => {
            // Always calculates a non-negative answer.
            *left = libm::fmodf(*left, *right);
            if *left < 0.0 {
                *left += libm::fabsf(*right);
            }
        }
        Operation::Power => {
            if *left < 0.0 && libm::floorf(*right) != *right {
                return Err(EvalError::NegativePowerNonInteger);
            }
            *left = libm::powf(*left, *right);
        }
        Operation::Times => *left *= *right,
        _ => return Err(EvalError::InternalOperation),
    }
    Ok(())
}

/// Apply a tier-2 binary operation: `AND`, `XOR`, `-`, `OR`, `+`
///
/// The logical operations treat any non-zero operand as true and produce
/// exactly 1.0 or 0.0.
pub fn execute_binary2(left: &mut f32, operation: Operation, right: f32) -> Result<(), EvalError> {
    match operation {
        Operation::And => {
            *left = if *left == 0.0 || right == 0.0 { 0.0 } else { 1.0 };
        }
        Operation::ExclusiveOr => {
            *left = if (*left == 0.0) != (right == 0.0) { 1.0 } else { 0.0 };
        }
        Operation::Minus => *left -= right,
        Operation::NonExclusiveOr => {
            *left = if *left != 0.0 || right != 0.0 { 1.0 } else { 0.0 };
        }
        Operation::Plus => *left += right,
        _ => return Err(EvalError::InternalOperation),
    }
    Ok(())
}

/// Read a binary operation or the closing bracket
///
/// A lone `*` is multiplication, `**` is power. Reaching the line
/// terminator here means the expression never closed.
pub fn read_operation(cursor: &mut LineCursor) -> Result<Operation, EvalError> {
    let c = cursor.peek();
    cursor.bump();
    match c {
        b'+' => Ok(Operation::Plus),
        b'-' => Ok(Operation::Minus),
        b'/' => Ok(Operation::DividedBy),
        b'*' => {
            if cursor.peek() == b'*' {
                cursor.bump();
                Ok(Operation::Power)
            } else {
                Ok(Operation::Times)
            }
        }
        b']' => Ok(Operation::RightBracket),
        b'A' => {
            if cursor.matches(b"ND") {
                cursor.advance(2);
                Ok(Operation::And)
            } else {
                Err(EvalError::UnknownOperationName(b'A'))
            }
        }
        b'M' => {
            if cursor.matches(b"OD") {
                cursor.advance(2);
                Ok(Operation::Modulo)
            } else {
                Err(EvalError::UnknownOperationName(b'M'))
            }
        }
        b'O' => {
            if cursor.peek() == b'R' {
                cursor.bump();
                Ok(Operation::NonExclusiveOr)
            } else {
                Err(EvalError::UnknownOperationName(b'O'))
            }
        }
        b'X' => {
            if cursor.matches(b"OR") {
                cursor.advance(2);
                Ok(Operation::ExclusiveOr)
            } else {
                Err(EvalError::UnknownOperationName(b'X'))
            }
        }
        0 => Err(EvalError::UnclosedExpression),
        _ => Err(EvalError::UnknownOperation),
    }
}

/// Read a unary operation name
///
/// Known names: ABS, ACOS, ASIN, ATAN, COS, EXP, FIX, FUP, LN, ROUND,
/// SIN, SQRT, TAN.
pub fn read_operation_unary(cursor: &mut LineCursor) -> Result<UnaryOp, EvalError> {
    let c = cursor.peek();
    cursor.bump();
    match c {
        b'A' => {
            if cursor.matches(b"BS") {
                cursor.advance(2);
                Ok(UnaryOp::Abs)
            } else if cursor.matches(b"COS") {
                cursor.advance(3);
                Ok(UnaryOp::Acos)
            } else if cursor.matches(b"SIN") {
                cursor.advance(3);
                Ok(UnaryOp::Asin)
            } else if cursor.matches(b"TAN") {
                cursor.advance(3);
                Ok(UnaryOp::Atan)
            } else {
                Err(EvalError::UnknownWord(b'A'))
            }
        }
        b'C' => {
            if cursor.matches(b"OS") {
                cursor.advance(2);
                Ok(UnaryOp::Cos)
            } else {
                Err(EvalError::UnknownWord(b'C'))
            }
        }
        b'E' => {
            if cursor.matches(b"XP") {
                cursor.advance(2);
                Ok(UnaryOp::Exp)
            } else {
                Err(EvalError::UnknownWord(b'E'))
            }
        }
        b'F' => {
            if cursor.matches(b"IX") {
                cursor.advance(2);
                Ok(UnaryOp::Fix)
            } else if cursor.matches(b"UP") {
                cursor.advance(2);
                Ok(UnaryOp::Fup)
            } else {
                Err(EvalError::UnknownWord(b'F'))
            }
        }
        b'L' => {
            if cursor.peek() == b'N' {
                cursor.bump();
                Ok(UnaryOp::Ln)
            } else {
                Err(EvalError::UnknownWord(b'L'))
            }
        }
        b'R' => {
            if cursor.matches(b"OUND") {
                cursor.advance(4);
                Ok(UnaryOp::Round)
            } else {
                Err(EvalError::UnknownWord(b'R'))
            }
        }
        b'S' => {
            if cursor.matches(b"IN") {
                cursor.advance(2);
                Ok(UnaryOp::Sin)
            } else if cursor.matches(b"QRT") {
                cursor.advance(3);
                Ok(UnaryOp::Sqrt)
            } else {
                Err(EvalError::UnknownWord(b'S'))
            }
        }
        b'T' => {
            if cursor.matches(b"AN") {
                cursor.advance(2);
                Ok(UnaryOp::Tan)
            } else {
                Err(EvalError::UnknownWord(b'T'))
            }
        }
        _ => Err(EvalError::UnknownUnaryName),
    }
}

/// Read a unary operation and its bracketed argument(s)
///
/// ATAN takes two arguments in the form `ATAN[..]/[..]`; everything else
/// takes one.
pub fn read_unary<P, S>(
    cursor: &mut LineCursor,
    store: &ParameterStore<P, S>,
) -> Result<f32, EvalError>
where
    P: PlcIoInterface,
    S: PositionSource,
{
    let operation = read_operation_unary(cursor)?;
    if cursor.peek() != b'[' {
        return Err(EvalError::UnaryMissingLeftBracket);
    }
    let value = read_real_expression(cursor, store)?;
    if operation == UnaryOp::Atan {
        read_atan(cursor, store, value)
    } else {
        execute_unary(value, operation)
    }
}

/// Read the second ATAN argument and compute the two-argument arctangent
///
/// The result is in degrees in the range (-180, 180].
pub fn read_atan<P, S>(
    cursor: &mut LineCursor,
    store: &ParameterStore<P, S>,
    first: f32,
) -> Result<f32, EvalError>
where
    P: PlcIoInterface,
    S: PositionSource,
{
    if cursor.peek() != b'/' {
        return Err(EvalError::AtanMissingSlash);
    }
    cursor.bump();
    if cursor.peek() != b'[' {
        return Err(EvalError::AtanMissingLeftBracket);
    }
    let second = read_real_expression(cursor, store)?;
    Ok(libm::atan2f(first, second) * 180.0 / PI)
}

/// Apply a one-argument unary operation
///
/// All angle measures in the input or output are in degrees. ROUND rounds
/// half away from zero.
pub fn execute_unary(value: f32, operation: UnaryOp) -> Result<f32, EvalError> {
    let result = match operation {
        UnaryOp::Abs => libm::fabsf(value),
        UnaryOp::Acos => {
            if !(-1.0..=1.0).contains(&value) {
                return Err(EvalError::AcosArgumentOutOfRange);
            }
            libm::acosf(value) * 180.0 / PI
        }
        UnaryOp::Asin => {
            if !(-1.0..=1.0).contains(&value) {
                return Err(EvalError::AsinArgumentOutOfRange);
            }
            libm::asinf(value) * 180.0 / PI
        }
        // The two-argument form is handled by read_atan.
        UnaryOp::Atan => return Err(EvalError::InternalOperation),
        UnaryOp::Cos => libm::cosf(value * PI / 180.0),
        UnaryOp::Exp => libm::expf(value),
        UnaryOp::Fix => libm::floorf(value),
        UnaryOp::Fup => libm::ceilf(value),
        UnaryOp::Ln => {
            if value <= 0.0 {
                return Err(EvalError::LnNonPositiveArgument);
            }
            libm::logf(value)
        }
        UnaryOp::Round => (value + if value < 0.0 { -0.5 } else { 0.5 }) as i32 as f32,
        UnaryOp::Sin => libm::sinf(value * PI / 180.0),
        UnaryOp::Sqrt => {
            if value < 0.0 {
                return Err(EvalError::SqrtNegativeArgument);
            }
            libm::sqrtf(value)
        }
        UnaryOp::Tan => libm::tanf(value * PI / 180.0),
    };
    Ok(result)
}
