//! Operation types, operators, and the arithmetic facts printed on tiles.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantArray};
use thiserror::Error;

use crate::NumberRange;

/// Family of operations a maze is populated with.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, VariantArray,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum OperationType {
    /// Every tile holds an addition.
    Addition,
    /// Every tile holds a subtraction.
    Subtraction,
    /// Tiles are split evenly between additions and subtractions.
    BothAdditionAndSubtraction,
    /// Every tile holds a multiplication.
    Multiplication,
    /// Every tile holds a division.
    Division,
    /// Tiles are split evenly between multiplications and divisions.
    BothMultiplicationAndDivision,
}

impl OperationType {
    /// Reports whether the type mixes an operation with its counterpart.
    #[must_use]
    pub const fn is_mixed(self) -> bool {
        matches!(
            self,
            Self::BothAdditionAndSubtraction | Self::BothMultiplicationAndDivision
        )
    }

    /// Reports whether the type is addition or multiplication alone.
    #[must_use]
    pub const fn first_operation(self) -> bool {
        matches!(self, Self::Addition | Self::Multiplication)
    }

    /// Reports whether the type draws from addition and subtraction.
    #[must_use]
    pub const fn involves_sum(self) -> bool {
        matches!(
            self,
            Self::Addition | Self::Subtraction | Self::BothAdditionAndSubtraction
        )
    }

    /// Reports whether the type draws from multiplication and division.
    #[must_use]
    pub const fn involves_product(self) -> bool {
        matches!(
            self,
            Self::Multiplication | Self::Division | Self::BothMultiplicationAndDivision
        )
    }

    /// Operator of this family: addition or multiplication when `first` is set,
    /// otherwise subtraction or division.
    #[must_use]
    pub const fn operator(self, first: bool) -> Operator {
        match (self.involves_product(), first) {
            (false, true) => Operator::Add,
            (false, false) => Operator::Subtract,
            (true, true) => Operator::Multiply,
            (true, false) => Operator::Divide,
        }
    }

    /// Reports whether tiles of this family may carry `operator`.
    #[must_use]
    pub const fn allows(self, operator: Operator) -> bool {
        matches!(
            (self, operator),
            (Self::Addition | Self::BothAdditionAndSubtraction, Operator::Add)
                | (Self::Subtraction | Self::BothAdditionAndSubtraction, Operator::Subtract)
                | (Self::Multiplication | Self::BothMultiplicationAndDivision, Operator::Multiply)
                | (Self::Division | Self::BothMultiplicationAndDivision, Operator::Divide)
        )
    }

    /// Single-operator type that a fact with `operator` belongs to.
    #[must_use]
    pub const fn from_operator(operator: Operator) -> Self {
        match operator {
            Operator::Add => Self::Addition,
            Operator::Subtract => Self::Subtraction,
            Operator::Multiply => Self::Multiplication,
            Operator::Divide => Self::Division,
        }
    }
}

/// Arithmetic operator printed between the two operands of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
}

impl Operator {
    /// Symbol used when rendering the operator.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }

    /// Parses a rendered operator symbol.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Add),
            "-" => Some(Self::Subtract),
            "*" => Some(Self::Multiply),
            "/" => Some(Self::Divide),
            _ => None,
        }
    }

    /// Reports whether the operator belongs to the multiplication family.
    #[must_use]
    pub const fn involves_product(self) -> bool {
        matches!(self, Self::Multiply | Self::Divide)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The `(a, b, result)` numbers underlying a tile.
///
/// Adjacent tiles are compared by triple, so a division is recorded with the
/// product triple it was drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperandTriple {
    first: i64,
    second: i64,
    result: i64,
}

impl OperandTriple {
    /// Creates a triple from its three components.
    #[must_use]
    pub const fn new(first: i64, second: i64, result: i64) -> Self {
        Self {
            first,
            second,
            result,
        }
    }

    /// First operand.
    #[must_use]
    pub const fn first(&self) -> i64 {
        self.first
    }

    /// Second operand.
    #[must_use]
    pub const fn second(&self) -> i64 {
        self.second
    }

    /// Result of combining the operands.
    #[must_use]
    pub const fn result(&self) -> i64 {
        self.result
    }
}

/// Reasons a rendered expression cannot be read back into a [`CellFact`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ExpressionError {
    /// The expression did not have the `a op b` shape.
    #[error("expression '{0}' is not of the form 'a op b'")]
    Malformed(String),
    /// The operator symbol was not one of `+ - * /`.
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),
    /// An operand was not an integer.
    #[error("operand '{0}' is not an integer")]
    InvalidOperand(String),
    /// A division did not produce a whole number.
    #[error("{dividend} is not divisible by {divisor}")]
    InexactDivision {
        /// Number being divided.
        dividend: i64,
        /// Number dividing it.
        divisor: i64,
    },
    /// An operation overflowed the integer range.
    #[error("expression '{0}' overflows")]
    Overflow(String),
}

/// Arithmetic fact printed on a single tile.
///
/// Facts serialize as their rendered expression, for example `"12 / 3"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellFact {
    operator: Operator,
    triple: OperandTriple,
}

impl CellFact {
    /// `a + b`.
    #[must_use]
    pub const fn sum(a: i64, b: i64) -> Self {
        Self::new(Operator::Add, OperandTriple::new(a, b, a + b))
    }

    /// The larger operand minus the smaller one, so the result is never negative.
    #[must_use]
    pub fn difference(a: i64, b: i64) -> Self {
        let (high, low) = if a >= b { (a, b) } else { (b, a) };
        Self::new(Operator::Subtract, OperandTriple::new(high, low, high - low))
    }

    /// `a * b`.
    #[must_use]
    pub const fn product(a: i64, b: i64) -> Self {
        Self::new(Operator::Multiply, OperandTriple::new(a, b, a * b))
    }

    /// `(a * b) / a`, recorded with the product triple `(a, b, a * b)`.
    #[must_use]
    pub const fn quotient(a: i64, b: i64) -> Self {
        Self::new(Operator::Divide, OperandTriple::new(a, b, a * b))
    }

    /// Fact rendered with `operator` from an already computed triple.
    #[must_use]
    pub const fn new(operator: Operator, triple: OperandTriple) -> Self {
        Self { operator, triple }
    }

    /// Operator printed on the tile.
    #[must_use]
    pub const fn operator(&self) -> Operator {
        self.operator
    }

    /// Numbers underlying the fact.
    #[must_use]
    pub const fn triple(&self) -> OperandTriple {
        self.triple
    }

    /// Value a solver obtains by evaluating the rendered expression.
    #[must_use]
    pub const fn value(&self) -> i64 {
        match self.operator {
            Operator::Divide => self.triple.second,
            Operator::Add | Operator::Subtract | Operator::Multiply => self.triple.result,
        }
    }

    /// Reports whether the evaluated value is even.
    #[must_use]
    pub const fn is_even(&self) -> bool {
        self.value() % 2 == 0
    }

    /// Reports whether operands drawn from `range` could have produced this fact.
    ///
    /// Sums and differences keep both operands and their sum inside the range,
    /// and a difference never uses equal operands. Products and quotients keep
    /// both factors inside the range.
    #[must_use]
    pub fn fits(&self, range: NumberRange) -> bool {
        let OperandTriple {
            first,
            second,
            result,
        } = self.triple;
        let operands = range.contains(first) && range.contains(second);
        match self.operator {
            Operator::Add => operands && range.contains(result),
            Operator::Subtract => operands && first > second && range.contains(first + second),
            Operator::Multiply | Operator::Divide => operands,
        }
    }

    /// Reads a rendered `a op b` expression back into a fact.
    pub fn parse(expression: &str) -> Result<Self, ExpressionError> {
        let mut tokens = expression.split_whitespace();
        let (Some(left), Some(symbol), Some(right), None) =
            (tokens.next(), tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(ExpressionError::Malformed(expression.to_owned()));
        };

        let operator = Operator::from_symbol(symbol)
            .ok_or_else(|| ExpressionError::UnknownOperator(symbol.to_owned()))?;
        let left = parse_operand(left)?;
        let right = parse_operand(right)?;
        let overflow = || ExpressionError::Overflow(expression.to_owned());

        let triple = match operator {
            Operator::Add => {
                OperandTriple::new(left, right, left.checked_add(right).ok_or_else(overflow)?)
            }
            Operator::Subtract => {
                OperandTriple::new(left, right, left.checked_sub(right).ok_or_else(overflow)?)
            }
            Operator::Multiply => {
                OperandTriple::new(left, right, left.checked_mul(right).ok_or_else(overflow)?)
            }
            Operator::Divide => {
                if right == 0 || left.checked_rem(right) != Some(0) {
                    return Err(ExpressionError::InexactDivision {
                        dividend: left,
                        divisor: right,
                    });
                }
                OperandTriple::new(right, left / right, left)
            }
        };

        Ok(Self::new(operator, triple))
    }
}

fn parse_operand(token: &str) -> Result<i64, ExpressionError> {
    token
        .parse()
        .map_err(|_| ExpressionError::InvalidOperand(token.to_owned()))
}

impl fmt::Display for CellFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let OperandTriple {
            first,
            second,
            result,
        } = self.triple;
        match self.operator {
            Operator::Divide => write!(f, "{result} / {first}"),
            operator => write!(f, "{first} {operator} {second}"),
        }
    }
}

impl FromStr for CellFact {
    type Err = ExpressionError;

    fn from_str(expression: &str) -> Result<Self, Self::Err> {
        Self::parse(expression)
    }
}

impl TryFrom<String> for CellFact {
    type Error = ExpressionError;

    fn try_from(expression: String) -> Result<Self, Self::Error> {
        Self::parse(&expression)
    }
}

impl From<CellFact> for String {
    fn from(fact: CellFact) -> Self {
        fact.to_string()
    }
}
