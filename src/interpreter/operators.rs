//! Binary and unary operators on values.
//!
//! Numbers are 32-bit and wrap on overflow.

use super::error::RuntimeError;
use super::value::Value;
use crate::parser::{ArithmeticOp, BooleanOp, ComparisonOp};

pub(super) fn arithmetic(op: ArithmeticOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    let l = left.as_number()?;
    let r = right.as_number()?;
    let result = match op {
        ArithmeticOp::Add => l.wrapping_add(r),
        ArithmeticOp::Sub => l.wrapping_sub(r),
        ArithmeticOp::Mul => l.wrapping_mul(r),
        ArithmeticOp::Div => {
            if r == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            l.wrapping_div(r)
        }
    };
    Ok(Value::Number(result))
}

pub(super) fn comparison(op: ComparisonOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    let l = left.as_number()?;
    let r = right.as_number()?;
    let result = match op {
        ComparisonOp::Lt => l < r,
        ComparisonOp::Le => l <= r,
        ComparisonOp::Gt => l > r,
        ComparisonOp::Ge => l >= r,
        ComparisonOp::Eq => l == r,
        ComparisonOp::Ne => l != r,
    };
    Ok(Value::Boolean(result))
}

pub(super) fn logical(op: BooleanOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    let l = left.as_boolean()?;
    let r = right.as_boolean()?;
    let result = match op {
        BooleanOp::And => l && r,
        BooleanOp::Or => l || r,
    };
    Ok(Value::Boolean(result))
}

pub(super) fn negate(operand: &Value) -> Result<Value, RuntimeError> {
    Ok(Value::Number(operand.as_number()?.wrapping_neg()))
}

pub(super) fn not(operand: &Value) -> Result<Value, RuntimeError> {
    Ok(Value::Boolean(!operand.as_boolean()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let (a, b) = (Value::Number(7), Value::Number(2));
        assert_eq!(arithmetic(ArithmeticOp::Add, &a, &b), Ok(Value::Number(9)));
        assert_eq!(arithmetic(ArithmeticOp::Sub, &a, &b), Ok(Value::Number(5)));
        assert_eq!(arithmetic(ArithmeticOp::Mul, &a, &b), Ok(Value::Number(14)));
        assert_eq!(arithmetic(ArithmeticOp::Div, &a, &b), Ok(Value::Number(3)));
        assert_eq!(
            arithmetic(ArithmeticOp::Div, &Value::Number(-7), &b),
            Ok(Value::Number(-3))
        );
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            arithmetic(ArithmeticOp::Div, &Value::Number(3), &Value::Number(0)),
            Err(RuntimeError::DivisionByZero)
        );
    }

    #[test]
    fn test_overflow_wraps() {
        let max = Value::Number(i32::MAX);
        assert_eq!(
            arithmetic(ArithmeticOp::Add, &max, &Value::Number(1)),
            Ok(Value::Number(i32::MIN))
        );
        assert_eq!(
            arithmetic(ArithmeticOp::Div, &Value::Number(i32::MIN), &Value::Number(-1)),
            Ok(Value::Number(i32::MIN))
        );
        assert_eq!(negate(&Value::Number(i32::MIN)), Ok(Value::Number(i32::MIN)));
    }

    #[test]
    fn test_comparisons() {
        let (a, b) = (Value::Number(1), Value::Number(2));
        assert_eq!(comparison(ComparisonOp::Lt, &a, &b), Ok(Value::Boolean(true)));
        assert_eq!(comparison(ComparisonOp::Ge, &a, &b), Ok(Value::Boolean(false)));
        assert_eq!(comparison(ComparisonOp::Ne, &a, &b), Ok(Value::Boolean(true)));
        assert_eq!(comparison(ComparisonOp::Eq, &a, &a), Ok(Value::Boolean(true)));
    }

    #[test]
    fn test_operand_tags_are_checked() {
        let t = Value::Boolean(true);
        let one = Value::Number(1);
        assert!(matches!(
            arithmetic(ArithmeticOp::Add, &t, &one),
            Err(RuntimeError::TypeMismatch { expected: "number", found: "boolean" })
        ));
        assert!(matches!(
            comparison(ComparisonOp::Eq, &t, &t),
            Err(RuntimeError::TypeMismatch { .. })
        ));
        assert!(matches!(
            logical(BooleanOp::And, &one, &t),
            Err(RuntimeError::TypeMismatch { expected: "boolean", found: "number" })
        ));
        assert!(not(&one).is_err());
        assert!(negate(&t).is_err());
    }

    #[test]
    fn test_logic() {
        let (t, f) = (Value::Boolean(true), Value::Boolean(false));
        assert_eq!(logical(BooleanOp::And, &t, &f), Ok(Value::Boolean(false)));
        assert_eq!(logical(BooleanOp::Or, &t, &f), Ok(Value::Boolean(true)));
        assert_eq!(not(&f), Ok(Value::Boolean(true)));
    }
}
