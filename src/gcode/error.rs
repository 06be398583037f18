//! Expression evaluation errors
//!
//! Fault taxonomy of the RS274/NGC readers. Each variant carries the numeric
//! code reported on the serial console as `error:<code>`, kept compatible
//! with legacy NIST interpreter senders.

use core::fmt;

/// Errors raised while reading a real value, expression or parameter item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
    /// ACOS argument outside [-1, 1]
    AcosArgumentOutOfRange,
    /// ASIN argument outside [-1, 1]
    AsinArgumentOutOfRange,
    /// Right operand of `/` is zero
    DivideByZero,
    /// Negative base raised to a non-integer exponent
    NegativePowerNonInteger,
    /// Character cannot start an item
    BadCharacter,
    /// Character cannot start a number
    BadNumberFormat,
    /// Reader dispatched on the wrong character
    InternalCall,
    /// Operation code not handled by the executor
    InternalOperation,
    /// Negative argument to SQRT
    SqrtNegativeArgument,
    /// Zero or negative argument to LN
    LnNonPositiveArgument,
    /// Slash after the first ATAN argument missing
    AtanMissingSlash,
    /// Left bracket after `ATAN[..]/` missing
    AtanMissingLeftBracket,
    /// Left bracket after a unary operation name missing
    UnaryMissingLeftBracket,
    /// Line ended where a real value was expected
    NoCharactersInRealValue,
    /// No digits in what should be a number
    NoDigitsInNumber,
    /// Value not within 0.0001 of an integer where one is required
    NonIntegerForInteger,
    /// Parameter number outside 1..5999
    ParameterOutOfRange,
    /// Number text did not parse
    NumberParseFailed,
    /// Line ended inside a bracketed expression
    UnclosedExpression,
    /// Character is not a binary operation or right bracket
    UnknownOperation,
    /// Binary operation name starting with this letter not recognized
    UnknownOperationName(u8),
    /// Unary operation name starting with this letter not recognized
    UnknownWord(u8),
    /// Character cannot start a unary operation name
    UnknownUnaryName,
}

impl EvalError {
    /// Numeric code for the `error:<code>` wire protocol
    pub fn code(&self) -> u16 {
        match self {
            EvalError::AcosArgumentOutOfRange => 8,
            EvalError::AsinArgumentOutOfRange => 9,
            EvalError::DivideByZero => 10,
            EvalError::NegativePowerNonInteger => 11,
            EvalError::BadCharacter => 12,
            EvalError::BadNumberFormat => 14,
            EvalError::InternalCall => 32,
            EvalError::InternalOperation => 37,
            EvalError::UnaryMissingLeftBracket => 97,
            EvalError::AtanMissingLeftBracket => 96,
            EvalError::SqrtNegativeArgument => 121,
            EvalError::NoCharactersInRealValue => 133,
            EvalError::NoDigitsInNumber => 134,
            EvalError::NonIntegerForInteger => 135,
            EvalError::ParameterOutOfRange => 142,
            EvalError::AtanMissingSlash => 156,
            EvalError::NumberParseFailed => 161,
            EvalError::UnclosedExpression => 172,
            EvalError::UnknownOperation => 175,
            EvalError::UnknownOperationName(letter) => match letter {
                b'A' => 176,
                b'M' => 177,
                b'O' => 178,
                _ => 179,
            },
            EvalError::UnknownWord(letter) => match letter {
                b'A' => 180,
                b'C' => 181,
                b'E' => 182,
                b'F' => 183,
                b'L' => 184,
                b'R' => 185,
                b'S' => 186,
                _ => 187,
            },
            EvalError::UnknownUnaryName => 188,
            EvalError::LnNonPositiveArgument => 196,
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error:{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_wire_protocol() {
        assert_eq!(EvalError::DivideByZero.code(), 10);
        assert_eq!(EvalError::NonIntegerForInteger.code(), 135);
        assert_eq!(EvalError::ParameterOutOfRange.code(), 142);
        assert_eq!(EvalError::UnclosedExpression.code(), 172);
        assert_eq!(EvalError::UnknownOperationName(b'M').code(), 177);
        assert_eq!(EvalError::UnknownWord(b'T').code(), 187);
        assert_eq!(EvalError::LnNonPositiveArgument.code(), 196);
    }

    #[test]
    fn test_display_is_error_code() {
        let mut buf = heapless::String::<16>::new();
        core::fmt::write(&mut buf, format_args!("{}", EvalError::DivideByZero)).unwrap();
        assert_eq!(buf.as_str(), "error:10");
    }
}
