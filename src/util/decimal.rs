use std::{fmt::Display, marker::PhantomData, ops::Deref};

use rust_decimal::Decimal;

// These were deprecated as methods on Decimal, so re-implement them.
// The Decimal implementations don't do zero checks, and "-0" would
// otherwise behave strangely.
pub fn is_positive(d: &Decimal) -> bool {
    d.is_sign_positive() && !d.is_zero()
}

pub fn is_negative(d: &Decimal) -> bool {
    d.is_sign_negative() && !d.is_zero()
}

pub fn currency_precision_str(d: &Decimal) -> String {
    format!("{:.2}", d)
}

/// Parses a numeric token as rendered in the statement's Turkish locale:
/// when both separators appear, '.' groups thousands and ',' is the decimal
/// point ("1.234,56"); otherwise a lone ',' is the decimal point ("100,00").
pub fn parse_statement_decimal(text: &str) -> Option<Decimal> {
    let normalized = if text.contains('.') && text.contains(',') {
        text.replace('.', "").replace(',', ".")
    } else {
        text.replace(',', ".")
    };
    Decimal::from_str_exact(&normalized).ok()
}

pub trait DecConstraint {
    fn is_ok(d: &Decimal) -> bool;
}

pub mod constraint {
    use rust_decimal::Decimal;

    use super::{is_positive, DecConstraint};

    #[derive(PartialEq, Eq, Clone, Copy, Debug)]
    pub struct GreaterEqualZero(());
    impl DecConstraint for GreaterEqualZero {
        fn is_ok(d: &Decimal) -> bool {
            d.is_sign_positive() || d.is_zero()
        }
    }

    #[derive(PartialEq, Eq, Clone, Copy, Debug)]
    pub struct Pos(());
    impl DecConstraint for Pos {
        fn is_ok(d: &Decimal) -> bool {
            is_positive(d)
        }
    }
}

use self::constraint::{GreaterEqualZero, Pos};

// A constrained instance of Decimal. This can only be created through
// ::try_from, which will enforce the DecConstraint. This allows for a
// convenient and type-safe way to enforce what values any given value can
// contain (quantities and prices here are never negative).
//
// PhantomData here is size zero, and is simply to make the compiler happy.
pub struct ConstrainedDecimal<CONSTRAINT>(Decimal, PhantomData<CONSTRAINT>);

impl<CONSTRAINT: DecConstraint> TryFrom<Decimal> for ConstrainedDecimal<CONSTRAINT> {
    type Error = String;

    fn try_from(d: Decimal) -> Result<Self, Self::Error> {
        if CONSTRAINT::is_ok(&d) {
            Ok(Self(d, PhantomData))
        } else {
            Err(format!(
                "{} does not match constraints of {}",
                d,
                std::any::type_name::<CONSTRAINT>()
            ))
        }
    }
}

impl<CONSTRAINT: DecConstraint> Deref for ConstrainedDecimal<CONSTRAINT> {
    type Target = Decimal;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<CONSTRAINT: DecConstraint> Display for ConstrainedDecimal<CONSTRAINT> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl<CONSTRAINT: DecConstraint> std::fmt::Debug for ConstrainedDecimal<CONSTRAINT> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.0, f)
    }
}

impl<CONSTRAINT: DecConstraint> PartialEq for ConstrainedDecimal<CONSTRAINT> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<CONSTRAINT: DecConstraint> Eq for ConstrainedDecimal<CONSTRAINT> {}

impl<CONSTRAINT: DecConstraint> Clone for ConstrainedDecimal<CONSTRAINT> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<CONSTRAINT: DecConstraint> Copy for ConstrainedDecimal<CONSTRAINT> {}

impl std::ops::Add for ConstrainedDecimal<GreaterEqualZero> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        // GEZ + GEZ will never violate its own constraint
        GreaterEqualZeroDecimal::try_from(*self + *rhs).unwrap()
    }
}

impl std::ops::AddAssign for ConstrainedDecimal<GreaterEqualZero> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::Mul for ConstrainedDecimal<GreaterEqualZero> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        // GEZ * GEZ will never violate its own constraint
        GreaterEqualZeroDecimal::try_from(*self * *rhs).unwrap()
    }
}

impl From<ConstrainedDecimal<Pos>> for ConstrainedDecimal<GreaterEqualZero> {
    fn from(value: ConstrainedDecimal<Pos>) -> Self {
        GreaterEqualZeroDecimal::try_from(*value).unwrap()
    }
}

impl ConstrainedDecimal<GreaterEqualZero> {
    pub fn zero() -> Self {
        Self(Decimal::ZERO, PhantomData)
    }

    pub fn mul_pos(&self, pos_rhs: PosDecimal) -> Self {
        // GEZ * Pos will never violate its own constraint
        GreaterEqualZeroDecimal::try_from(self.0 * *pos_rhs).unwrap()
    }
}

impl std::ops::Mul for ConstrainedDecimal<Pos> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        // Pos * Pos will never violate its own constraint
        PosDecimal::try_from(*self * *rhs).unwrap()
    }
}

impl std::ops::Div for ConstrainedDecimal<Pos> {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        // Pos / Pos will never violate its own constraint, or divide by zero
        PosDecimal::try_from(*self / *rhs).unwrap()
    }
}

// Convenience aliases
pub type GreaterEqualZeroDecimal = ConstrainedDecimal<constraint::GreaterEqualZero>;
pub type PosDecimal = ConstrainedDecimal<constraint::Pos>;

#[macro_export]
macro_rules! pdec {
    ($arg:literal) => {{
        use rust_decimal_macros::dec;
        $crate::util::decimal::PosDecimal::try_from(dec!($arg)).unwrap()
    }};
}

#[macro_export]
macro_rules! gezdec {
    ($arg:literal) => {{
        use rust_decimal_macros::dec;
        $crate::util::decimal::GreaterEqualZeroDecimal::try_from(dec!($arg)).unwrap()
    }};
}
