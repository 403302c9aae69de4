//! Validation of generation parameters before they reach the pipeline.

use math_maze_core::{CellFact, NumberRange, OperationType};
use math_maze_system_generation::MazeRequest;
use thiserror::Error;

/// Allowed sizes are odd and lie in `MIN_DIMENSION..MAX_DIMENSION`.
const MIN_DIMENSION: u32 = 11;
const MAX_DIMENSION: u32 = 50;

const SUM_RANGES: [(u32, u32); 3] = [(1, 10), (1, 20), (1, 100)];
const PRODUCT_RANGES: [(u32, u32); 3] = [(1, 10), (1, 20), (11, 20)];

/// Parameters as received from the command line.
#[derive(Clone, Debug)]
pub(crate) struct RawRequest {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) numbers_start: u32,
    pub(crate) numbers_end: u32,
    pub(crate) operation: OperationType,
    pub(crate) path_type_even: bool,
    pub(crate) min_length: Option<u32>,
    pub(crate) max_length: Option<u32>,
    pub(crate) must_include: Vec<CellFact>,
}

/// Reasons a generation request is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum RequestError {
    #[error("maze dimensions {width}x{height} must be odd and between 11 and 49")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("path length range {min}..={max} must lie within {floor}..={ceiling}")]
    InvalidLengthRange {
        min: u32,
        max: u32,
        floor: u32,
        ceiling: u32,
    },
    #[error("numbers range {range} is not offered for {operation}")]
    UnsupportedNumbersRange {
        range: NumberRange,
        operation: OperationType,
    },
    #[error("expression '{expression}' cannot appear in a {operation} maze over {range}")]
    IncompatibleExpression {
        expression: CellFact,
        range: NumberRange,
        operation: OperationType,
    },
}

impl RawRequest {
    /// Checks every rule and produces the request the pipeline consumes.
    ///
    /// Missing lengths default to the shorter side and to the cell count.
    pub(crate) fn validate(self) -> Result<MazeRequest, RequestError> {
        let (width, height) = (self.width, self.height);
        if !valid_dimension(width) || !valid_dimension(height) {
            return Err(RequestError::InvalidDimensions { width, height });
        }

        let floor = width.min(height);
        let ceiling = width * height;
        let min = self.min_length.unwrap_or(floor);
        let max = self.max_length.unwrap_or(ceiling);
        if min > max || min < floor || max > ceiling {
            return Err(RequestError::InvalidLengthRange {
                min,
                max,
                floor,
                ceiling,
            });
        }

        let allowed = if self.operation.involves_sum() {
            &SUM_RANGES
        } else {
            &PRODUCT_RANGES
        };
        let numbers_range = NumberRange::new(self.numbers_start, self.numbers_end);
        if !allowed.contains(&(self.numbers_start, self.numbers_end)) {
            return Err(RequestError::UnsupportedNumbersRange {
                range: numbers_range,
                operation: self.operation,
            });
        }

        let incompatible = self.must_include.iter().find(|fact| {
            !self.operation.allows(fact.operator()) || !fact.fits(numbers_range)
        });
        if let Some(&expression) = incompatible {
            return Err(RequestError::IncompatibleExpression {
                expression,
                range: numbers_range,
                operation: self.operation,
            });
        }

        Ok(MazeRequest {
            width,
            height,
            numbers_range,
            operation: self.operation,
            path_type_even: self.path_type_even,
            min_length: min,
            max_length: max,
            must_include: self.must_include,
        })
    }
}

fn valid_dimension(value: u32) -> bool {
    value % 2 == 1 && (MIN_DIMENSION..MAX_DIMENSION).contains(&value)
}

#[cfg(test)]
mod tests {
    use math_maze_core::{CellFact, NumberRange, OperationType};

    use super::{RawRequest, RequestError};

    fn raw() -> RawRequest {
        RawRequest {
            width: 11,
            height: 13,
            numbers_start: 1,
            numbers_end: 10,
            operation: OperationType::Addition,
            path_type_even: true,
            min_length: None,
            max_length: None,
            must_include: Vec::new(),
        }
    }

    #[test]
    fn defaults_span_the_whole_grid() {
        let request = raw().validate().expect("valid");
        assert_eq!(request.min_length, 11);
        assert_eq!(request.max_length, 143);
        assert_eq!(request.length_range(), 13..=145);
    }

    #[test]
    fn dimensions_must_be_odd_and_bounded() {
        for (width, height) in [(10, 11), (9, 11), (11, 51), (11, 50), (12, 12)] {
            let error = RawRequest {
                width,
                height,
                ..raw()
            }
            .validate()
            .unwrap_err();
            assert_eq!(error, RequestError::InvalidDimensions { width, height });
        }
        assert!(RawRequest {
            width: 49,
            height: 49,
            ..raw()
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn length_range_must_fit_the_grid() {
        let cases = [(Some(20), Some(19)), (Some(10), None), (None, Some(144))];
        for (min_length, max_length) in cases {
            let error = RawRequest {
                min_length,
                max_length,
                ..raw()
            }
            .validate()
            .unwrap_err();
            assert!(matches!(error, RequestError::InvalidLengthRange { .. }));
        }
    }

    #[test]
    fn numbers_range_depends_on_the_operation_family() {
        let product = RawRequest {
            numbers_start: 11,
            numbers_end: 20,
            operation: OperationType::Division,
            ..raw()
        };
        assert!(product.clone().validate().is_ok());

        let error = RawRequest {
            operation: OperationType::Subtraction,
            ..product
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            error,
            RequestError::UnsupportedNumbersRange {
                range: NumberRange::new(11, 20),
                operation: OperationType::Subtraction,
            }
        );

        let error = RawRequest {
            numbers_start: 1,
            numbers_end: 100,
            operation: OperationType::Multiplication,
            ..raw()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(error, RequestError::UnsupportedNumbersRange { .. }));
    }

    #[test]
    fn requested_expressions_must_suit_the_maze() {
        let fitting = RawRequest {
            operation: OperationType::BothAdditionAndSubtraction,
            must_include: vec![
                CellFact::parse("9 - 1").expect("valid"),
                CellFact::parse("2 + 3").expect("valid"),
            ],
            ..raw()
        };
        assert!(fitting.clone().validate().is_ok());

        for expression in ["3 - 9", "97 - 1", "3 * 3"] {
            let fact = CellFact::parse(expression).expect("valid");
            let error = RawRequest {
                must_include: vec![fact],
                ..fitting.clone()
            }
            .validate()
            .unwrap_err();
            assert_eq!(
                error,
                RequestError::IncompatibleExpression {
                    expression: fact,
                    range: NumberRange::new(1, 10),
                    operation: OperationType::BothAdditionAndSubtraction,
                }
            );
        }
    }
}
