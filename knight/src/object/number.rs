//! Integer arithmetic.
//!
//! Knight numbers are 64-bit signed integers. Addition, subtraction and
//! multiplication wrap on overflow.

use num_traits::checked_pow;

use crate::error::Runtime;
use crate::types::BinOp;

/// Apply an arithmetic operator to two integers.
pub(crate) fn arithmetic(lhs: i64, op: BinOp, rhs: i64) -> Result<i64, Runtime> {
    match op {
        BinOp::Add => Ok(lhs.wrapping_add(rhs)),
        BinOp::Subtract => Ok(lhs.wrapping_sub(rhs)),
        BinOp::Multiply => Ok(lhs.wrapping_mul(rhs)),
        BinOp::Divide if rhs == 0 => Err(Runtime::DivideByZero),
        BinOp::Divide => Ok(lhs.wrapping_div(rhs)),
        BinOp::Modulo if rhs == 0 => Err(Runtime::ModuloByZero),
        BinOp::Modulo => Ok(lhs.wrapping_rem(rhs)),
        BinOp::Power => Ok(power(lhs, rhs)),
    }
}

/// Integer exponentiation.
///
/// Exact whenever the result fits in an `i64` and the exponent is
/// non-negative. Otherwise the power is taken in floating point, truncated
/// toward zero and saturated to the `i64` range, with NaN mapping to zero.
pub(crate) fn power(base: i64, exponent: i64) -> i64 {
    if let Ok(exp) = usize::try_from(exponent) {
        if let Some(exact) = checked_pow(base, exp) {
            return exact;
        }
    }

    (base as f64).powf(exponent as f64).trunc() as i64
}
