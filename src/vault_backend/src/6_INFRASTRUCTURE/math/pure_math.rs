//! Pure mathematical functions - no I/O, no async
//! All functions here must be deterministic and side-effect free

use candid::Nat;
use num_bigint::BigUint;

use crate::infrastructure::errors::{CalculationError, Result, VaultError};

/// Multiply two Nats and divide by a third with arbitrary precision
/// Formula: (a × b) ÷ c
pub fn multiply_and_divide(a: &Nat, b: &Nat, c: &Nat) -> Result<Nat> {
    if c == &Nat::from(0u64) {
        return Err(VaultError::Calculation(CalculationError::DivisionByZero {
            operation: format!("({} × {}) ÷ {}", a, b, c),
        }));
    }

    let a_big = nat_to_biguint(a);
    let b_big = nat_to_biguint(b);
    let c_big = nat_to_biguint(c);

    let result = (a_big * b_big) / c_big;

    biguint_to_nat(result)
}

fn nat_to_biguint(nat: &Nat) -> BigUint {
    BigUint::from_bytes_be(&nat.0.to_bytes_be())
}

fn biguint_to_nat(big: BigUint) -> Result<Nat> {
    match num_bigint::ToBigUint::to_biguint(&big) {
        Some(biguint) => Ok(Nat::from(biguint)),
        None => Err(VaultError::Calculation(CalculationError::Overflow {
            operation: format!("BigUint to Nat conversion failed for value: {}", big),
        })),
    }
}
