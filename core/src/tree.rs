//! Arena-backed spanning tree recorded while carving a maze.

use crate::Point;

/// Parent link and depth recorded for a visited cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TreeNode {
    parent: Option<Point>,
    distance: u32,
}

impl TreeNode {
    /// Cell the node was reached from, or `None` for the root.
    #[must_use]
    pub const fn parent(&self) -> Option<Point> {
        self.parent
    }

    /// Number of cells on the tree path from the root to this node, inclusive.
    #[must_use]
    pub const fn distance(&self) -> u32 {
        self.distance
    }
}

/// Spanning tree over the visited cells of a grid.
///
/// Nodes live in a dense arena indexed by row-major cell offset. The root has
/// distance 1 and every attached node is exactly one deeper than its parent,
/// so a node's distance equals the cell count of its path from the root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpanningTree {
    width: u32,
    height: u32,
    nodes: Vec<Option<TreeNode>>,
    visited: usize,
}

impl SpanningTree {
    /// Creates an empty tree over a `width` x `height` grid.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            nodes: vec![None; width as usize * height as usize],
            visited: 0,
        }
    }

    /// Number of columns of the underlying grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows of the underlying grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of visited cells recorded in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.visited
    }

    /// Reports whether no cell has been recorded yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.visited == 0
    }

    /// Records `root` as the distance-1 root of the tree.
    ///
    /// Returns `false` when the point lies outside the grid or was already visited.
    pub fn insert_root(&mut self, root: Point) -> bool {
        self.insert(
            root,
            TreeNode {
                parent: None,
                distance: 1,
            },
        )
    }

    /// Records `child` as reached from the already visited `parent`.
    ///
    /// Returns the distance assigned to the child, or `None` when the parent is
    /// unknown or the child was already visited.
    pub fn attach(&mut self, child: Point, parent: Point) -> Option<u32> {
        let distance = self.distance(parent)?.checked_add(1)?;
        let node = TreeNode {
            parent: Some(parent),
            distance,
        };
        self.insert(child, node).then_some(distance)
    }

    /// Reports whether the point has been visited.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        self.node(point).is_some()
    }

    /// Node recorded for the point, if it was visited.
    #[must_use]
    pub fn node(&self, point: Point) -> Option<TreeNode> {
        self.index(point)
            .and_then(|index| self.nodes.get(index).copied().flatten())
    }

    /// Tree distance of the point, if it was visited.
    #[must_use]
    pub fn distance(&self, point: Point) -> Option<u32> {
        self.node(point).map(|node| node.distance)
    }

    /// Parent of the point, if it was visited and is not the root.
    #[must_use]
    pub fn parent(&self, point: Point) -> Option<Point> {
        self.node(point).and_then(|node| node.parent)
    }

    /// Visited points paired with their nodes in raster order.
    pub fn visited(&self) -> impl Iterator<Item = (Point, TreeNode)> + '_ {
        let width = self.width.max(1);
        self.nodes.iter().enumerate().filter_map(move |(index, node)| {
            let node = (*node)?;
            let x = u32::try_from(index % width as usize).ok()?;
            let y = u32::try_from(index / width as usize).ok()?;
            Some((Point::new(x, y), node))
        })
    }

    /// Ordered cells from the root to `endpoint` following parent links.
    ///
    /// Returns `None` when the endpoint was never visited. The walk is bounded
    /// by the number of visited cells so a corrupted arena cannot loop.
    #[must_use]
    pub fn path_to(&self, endpoint: Point) -> Option<Vec<Point>> {
        let mut path = vec![endpoint];
        let mut current = self.node(endpoint)?;

        while let Some(parent) = current.parent {
            if path.len() > self.visited {
                return None;
            }
            path.push(parent);
            current = self.node(parent)?;
        }

        path.reverse();
        Some(path)
    }

    fn insert(&mut self, point: Point, node: TreeNode) -> bool {
        let Some(slot) = self.index(point).and_then(|index| self.nodes.get_mut(index)) else {
            return false;
        };
        if slot.is_some() {
            return false;
        }

        *slot = Some(node);
        self.visited += 1;
        true
    }

    fn index(&self, point: Point) -> Option<usize> {
        if point.x() >= self.width || point.y() >= self.height {
            return None;
        }
        Some(point.y() as usize * self.width as usize + point.x() as usize)
    }
}
