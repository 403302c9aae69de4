#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that chooses where the solution path ends.
//!
//! The corner opposite the start is preferred. When its tree distance misses
//! the requested length range the closest-to-start border cell that fits is
//! used instead, and when nothing on the border fits the corner is kept
//! anyway. The range is therefore a best-effort target; callers wanting a
//! stricter guarantee regenerate the carving.

use std::ops::RangeInclusive;

use math_maze_core::{Point, SpanningTree};
use thiserror::Error;

/// Which rule produced the chosen endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EndpointChoice {
    /// The natural corner satisfied the length range.
    Corner,
    /// A border cell satisfied the range after the corner missed it.
    Border,
    /// Nothing satisfied the range, so the corner was kept.
    Fallback,
}

/// Endpoint chosen for a carving together with its solution path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    endpoint: Point,
    path: Vec<Point>,
    choice: EndpointChoice,
}

impl Selection {
    /// Last cell of the solution path.
    #[must_use]
    pub const fn endpoint(&self) -> Point {
        self.endpoint
    }

    /// Ordered cells from the start to the endpoint.
    #[must_use]
    pub fn path(&self) -> &[Point] {
        &self.path
    }

    /// Rule that produced the endpoint.
    #[must_use]
    pub const fn choice(&self) -> EndpointChoice {
        self.choice
    }

    /// Splits the selection into its endpoint and path.
    #[must_use]
    pub fn into_parts(self) -> (Point, Vec<Point>) {
        (self.endpoint, self.path)
    }
}

/// Failures raised while resolving an endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The endpoint was never reached by the carver.
    ///
    /// Only possible for grids with even dimensions, whose far corner is not a room.
    #[error("endpoint {endpoint} is not reachable from the start")]
    EndpointUnreachable {
        /// Cell that could not be reached.
        endpoint: Point,
    },
}

/// Pure system that picks the endpoint of the solution path.
#[derive(Debug, Default)]
pub struct EndpointSelector;

impl EndpointSelector {
    /// Creates a new endpoint selector.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Chooses an endpoint whose path length falls in `length_range`.
    ///
    /// Lengths count cells, including the start and the endpoint themselves.
    /// Border cells tied on distance are resolved in raster order. The start
    /// itself is never chosen.
    pub fn select(
        &self,
        tree: &SpanningTree,
        length_range: &RangeInclusive<usize>,
    ) -> Result<Selection, LayoutError> {
        let corner = natural_corner(tree);
        let corner_length = tree.distance(corner).map(|distance| distance as usize);

        let (endpoint, choice) = if corner_length.is_some_and(|length| length_range.contains(&length)) {
            (corner, EndpointChoice::Corner)
        } else {
            let border = tree
                .visited()
                .filter(|(point, _)| *point != Point::START)
                .filter(|(point, _)| point.at_border(tree.width(), tree.height()))
                .filter(|(_, node)| length_range.contains(&(node.distance() as usize)))
                .min_by_key(|(_, node)| node.distance());

            match border {
                Some((point, _)) => (point, EndpointChoice::Border),
                None => (corner, EndpointChoice::Fallback),
            }
        };

        tracing::debug!(
            %endpoint,
            ?choice,
            corner_length,
            min = length_range.start(),
            max = length_range.end(),
            "endpoint selected"
        );

        let path = self.reconstruct_path(tree, endpoint)?;
        Ok(Selection {
            endpoint,
            path,
            choice,
        })
    }

    /// Ordered cells from the start to `endpoint`, following parent links.
    pub fn reconstruct_path(
        &self,
        tree: &SpanningTree,
        endpoint: Point,
    ) -> Result<Vec<Point>, LayoutError> {
        tree.path_to(endpoint)
            .ok_or(LayoutError::EndpointUnreachable { endpoint })
    }
}

fn natural_corner(tree: &SpanningTree) -> Point {
    Point::new(
        tree.width().saturating_sub(1),
        tree.height().saturating_sub(1),
    )
}

#[cfg(test)]
mod tests {
    use math_maze_core::{Point, SpanningTree};

    use super::{EndpointChoice, EndpointSelector, LayoutError};

    /// 3x3 tree: an L-shaped branch to the corner and a short branch down the left edge.
    ///
    /// ```text
    /// S 2 3
    /// 2 . 4
    /// 3 . 5
    /// ```
    fn hooked_tree() -> SpanningTree {
        let mut tree = SpanningTree::new(3, 3);
        assert!(tree.insert_root(Point::START));
        let links = [
            (Point::new(1, 0), Point::START),
            (Point::new(2, 0), Point::new(1, 0)),
            (Point::new(2, 1), Point::new(2, 0)),
            (Point::new(2, 2), Point::new(2, 1)),
            (Point::new(0, 1), Point::START),
            (Point::new(0, 2), Point::new(0, 1)),
        ];
        for (child, parent) in links {
            assert!(tree.attach(child, parent).is_some());
        }
        tree
    }

    #[test]
    fn corner_is_preferred_when_in_range() {
        let selection = EndpointSelector::new()
            .select(&hooked_tree(), &(5..=9))
            .expect("corner reachable");
        assert_eq!(selection.endpoint(), Point::new(2, 2));
        assert_eq!(selection.choice(), EndpointChoice::Corner);
        assert_eq!(selection.path().len(), 5);
    }

    #[test]
    fn shortest_border_cell_wins_ties_in_raster_order() {
        let selection = EndpointSelector::new()
            .select(&hooked_tree(), &(3..=4))
            .expect("border reachable");
        assert_eq!(selection.endpoint(), Point::new(2, 0));
        assert_eq!(selection.choice(), EndpointChoice::Border);
        assert_eq!(
            selection.path(),
            &[Point::START, Point::new(1, 0), Point::new(2, 0)]
        );
    }

    #[test]
    fn corner_is_kept_when_nothing_fits() {
        let selection = EndpointSelector::new()
            .select(&hooked_tree(), &(6..=9))
            .expect("corner reachable");
        assert_eq!(selection.endpoint(), Point::new(2, 2));
        assert_eq!(selection.choice(), EndpointChoice::Fallback);
        assert_eq!(selection.path().len(), 5);
    }

    #[test]
    fn start_is_never_a_border_endpoint() {
        let selection = EndpointSelector::new()
            .select(&hooked_tree(), &(1..=2))
            .expect("border reachable");
        assert_eq!(selection.endpoint(), Point::new(1, 0));
        assert_eq!(selection.choice(), EndpointChoice::Border);
        assert_eq!(selection.path(), &[Point::START, Point::new(1, 0)]);
    }

    #[test]
    fn unreachable_corner_is_reported() {
        let mut tree = SpanningTree::new(2, 2);
        assert!(tree.insert_root(Point::START));
        let error = EndpointSelector::new().select(&tree, &(2..=4)).unwrap_err();
        assert_eq!(
            error,
            LayoutError::EndpointUnreachable {
                endpoint: Point::new(1, 1),
            }
        );
    }
}
