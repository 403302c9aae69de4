//! Selection of the fact printed on a single tile.

use std::time::Instant;

use math_maze_core::{CellFact, NumberRange, OperandTriple, Operator, Point};
use rand::{seq::SliceRandom, Rng};

use crate::PopulationError;

/// Constraints a tile's fact has to satisfy.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TileConstraints<'a> {
    pub(crate) cell: Point,
    pub(crate) range: NumberRange,
    pub(crate) operator: Operator,
    pub(crate) wanted_even: bool,
    pub(crate) neighbours: &'a [OperandTriple],
}

impl TileConstraints<'_> {
    /// Reports whether a supplied fact may be placed on this tile as is.
    ///
    /// The fact has to be one the tile could have drawn itself.
    pub(crate) fn admits(&self, fact: &CellFact) -> bool {
        fact.operator() == self.operator
            && fact.fits(self.range)
            && fact.is_even() == self.wanted_even
            && !self.neighbours.contains(&fact.triple())
    }
}

/// Draws between two looks at the clock while sampling.
const DEADLINE_CHECK_INTERVAL: u32 = 1024;

/// Limits on the draws spent on one sampled tile.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SamplingBudget {
    pub(crate) max_attempts: u32,
    pub(crate) deadline: Option<Instant>,
}

impl SamplingBudget {
    pub(crate) fn expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Every `(a, b, a * b)` triple with both operands in `range`.
pub(crate) fn product_triples(range: NumberRange) -> Vec<OperandTriple> {
    range
        .iter()
        .flat_map(|a| range.iter().map(move |b| OperandTriple::new(a, b, a * b)))
        .collect()
}

/// Picks a multiplication or division uniformly among the admissible triples.
///
/// Multiplications are filtered on the parity of the product; divisions are
/// rendered as `product / a` and therefore filtered on the parity of `b`.
pub(crate) fn pick_product<R: Rng + ?Sized>(
    triples: &[OperandTriple],
    constraints: &TileConstraints<'_>,
    rng: &mut R,
) -> Result<CellFact, PopulationError> {
    let divide = constraints.operator == Operator::Divide;
    let candidates: Vec<&OperandTriple> = triples
        .iter()
        .filter(|triple| {
            let deciding = if divide {
                triple.second()
            } else {
                triple.result()
            };
            (deciding % 2 == 0) == constraints.wanted_even
        })
        .filter(|triple| !constraints.neighbours.contains(triple))
        .collect();

    let triple = candidates
        .choose(rng)
        .copied()
        .ok_or(PopulationError::NoCandidates {
            cell: constraints.cell,
        })?;

    Ok(if divide {
        CellFact::quotient(triple.first(), triple.second())
    } else {
        CellFact::product(triple.first(), triple.second())
    })
}

/// Rejection-samples an addition or subtraction.
///
/// Both operands are drawn from `range` and their sum has to land in `range`
/// with the wanted parity. Neither ordering of the operands may repeat a
/// neighbour's sum or difference, and a subtraction never uses equal operands.
/// The deadline is consulted every [`DEADLINE_CHECK_INTERVAL`] draws.
pub(crate) fn sample_sum<R: Rng + ?Sized>(
    constraints: &TileConstraints<'_>,
    budget: SamplingBudget,
    rng: &mut R,
) -> Result<CellFact, PopulationError> {
    let range = constraints.range;
    if range.is_empty() {
        return Err(PopulationError::EmptyRange { range });
    }
    let subtract = constraints.operator == Operator::Subtract;
    let remainder = i64::from(!constraints.wanted_even);
    let (low, high) = (i64::from(range.start()), i64::from(range.end()));

    for attempt in 1..=budget.max_attempts {
        if attempt % DEADLINE_CHECK_INTERVAL == 0 && budget.expired() {
            return Err(PopulationError::DeadlineExceeded {
                cell: constraints.cell,
            });
        }
        let a = rng.gen_range(low..=high);
        let b = rng.gen_range(low..=high);
        let sum = a + b;

        if sum.rem_euclid(2) != remainder || !range.contains(sum) {
            continue;
        }
        if subtract && a == b {
            continue;
        }

        let repeats_neighbour = [
            OperandTriple::new(a, b, sum),
            OperandTriple::new(b, a, sum),
            OperandTriple::new(a, b, a - b),
            OperandTriple::new(b, a, b - a),
        ]
        .iter()
        .any(|triple| constraints.neighbours.contains(triple));
        if repeats_neighbour {
            continue;
        }

        return Ok(if subtract {
            CellFact::difference(a, b)
        } else {
            CellFact::sum(a, b)
        });
    }

    Err(PopulationError::SamplingExhausted {
        cell: constraints.cell,
        attempts: budget.max_attempts,
    })
}
