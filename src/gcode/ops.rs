//! Expression operation codes
//!
//! Binary operations fall in two precedence tiers. Tier-1 (times-like)
//! operations bind tighter than tier-2 (plus-like) ones; within a tier
//! evaluation folds left to right. The closing bracket is read through the
//! same path as an operation, which is what terminates the fold loops.

/// Binary operation or expression terminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    DividedBy,
    Modulo,
    Power,
    Times,
    And,
    ExclusiveOr,
    Minus,
    NonExclusiveOr,
    Plus,
    RightBracket,
}

impl Operation {
    /// True for tier-1 operations (`/`, `MOD`, `**`, `*`)
    pub fn is_times_like(&self) -> bool {
        matches!(
            self,
            Operation::DividedBy | Operation::Modulo | Operation::Power | Operation::Times
        )
    }
}

/// Unary operation name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Abs,
    Acos,
    Asin,
    Atan,
    Cos,
    Exp,
    Fix,
    Fup,
    Ln,
    Round,
    Sin,
    Sqrt,
    Tan,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_tiers() {
        assert!(Operation::DividedBy.is_times_like());
        assert!(Operation::Modulo.is_times_like());
        assert!(Operation::Power.is_times_like());
        assert!(Operation::Times.is_times_like());

        assert!(!Operation::And.is_times_like());
        assert!(!Operation::Plus.is_times_like());
        assert!(!Operation::RightBracket.is_times_like());
    }
}
