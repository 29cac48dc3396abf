use std::slice;

use tracing::trace;

use crate::{
    quadrant::{Quadrant, QuadrantPath},
    shapes::Rect,
    Error, Point, Result, P2,
};

/// Number of items a leaf holds before it subdivides.
pub const DEFAULT_NODE_CAPACITY: usize = 4;

/// Nodes at this depth never subdivide and keep accepting items past capacity.
/// Without it, more than `node_capacity` items at one coordinate would split forever.
pub const MAX_DEPTH: usize = 32;

/// A region QuadTree for spatial indexing of 2D points.
///
/// The tree is insert-only. Every node exclusively owns either its items (leaf) or
/// its four children (internal), so dropping the tree releases it depth first.
#[derive(Debug)]
pub struct QuadTree<T> {
    root: Node<T>,
    node_capacity: usize,
    len: usize,
}

impl<T: Point + Clone> QuadTree<T> {
    /// Create a new empty quadtree
    ///
    /// ## Arguments
    /// - `boundary`: The boundary of the quadtree
    /// - `node_capacity`: The maximum number of items a node can hold before subdividing
    pub fn new(boundary: Rect, node_capacity: usize) -> Result<Self> {
        if node_capacity == 0 {
            return Err(Error::InvalidCapacity);
        }
        Ok(Self {
            root: Node::External {
                boundary,
                data: Vec::with_capacity(node_capacity),
            },
            node_capacity,
            len: 0,
        })
    }

    /// Insert a point into the quadtree
    ///
    /// **Returns** a boolean value indicating if the item was inserted successfully.
    /// Items outside the root boundary are rejected and leave the tree unchanged.
    pub fn insert(&mut self, item: &T) -> bool {
        let inserted = self.root.insert(item, self.node_capacity, 0);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Lazily iterate over every stored item that lies within `rect`.
    ///
    /// Subtrees whose boundary does not intersect `rect` are skipped. Children are
    /// visited SW, NW, NE, SE and each child is exhausted before the next one starts,
    /// so the order is stable for a given tree and query.
    pub fn search(&self, rect: &Rect) -> Search<'_, T> {
        Search {
            rect: *rect,
            stack: vec![&self.root],
            leaf: Default::default(),
        }
    }

    /// Queries the QuadTree for items within a rectangular area.
    /// This method populates a passed mutable vector with all found items.
    pub fn query(&self, rect: &Rect, results: &mut Vec<T>) {
        results.extend(self.search(rect).cloned());
    }

    /// Replay the quadrant decisions from the root down to the leaf that covers
    /// `point`. A tree that never subdivided yields an empty path.
    pub fn trace(&self, point: &P2) -> QuadrantPath {
        let mut path = QuadrantPath::new();
        let mut node = &self.root;
        while let Node::Internal { boundary, children } = node {
            let q = Quadrant::of(boundary, point);
            path.push(q);
            node = &children[q.index()];
        }
        path
    }

    /// Number of items stored in the tree
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of subdivision levels below the root
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Return the point at the center of the boundary
    pub fn center(&self) -> P2 {
        self.root.boundary().center()
    }

    /// Get the boundary rect of the quadtree
    pub fn boundary(&self) -> &Rect {
        self.root.boundary()
    }

    pub fn node_capacity(&self) -> usize {
        self.node_capacity
    }
}

/// QuadTree node enum
///
/// ## Variants
/// - `Internal`: Contains four children ordered NW, NE, SW, SE and no items.
/// - `External`: A leaf holding its items directly.
#[derive(Debug)]
enum Node<T> {
    Internal {
        boundary: Rect,
        children: [Box<Self>; 4],
    },
    External {
        boundary: Rect,
        data: Vec<T>,
    },
}

impl<T: Point + Clone> Node<T> {
    fn insert(&mut self, item: &T, capacity: usize, depth: usize) -> bool {
        let point = item.point();

        if !self.boundary().contains(&point) {
            return false;
        }

        match self {
            &mut Self::External {
                boundary,
                ref mut data,
            } => {
                if data.len() < capacity || depth >= MAX_DEPTH {
                    data.push(item.clone());
                    return true;
                }

                trace!(depth, ?boundary, "subdividing full leaf");
                let data = std::mem::take(data);
                let children = Self::subdivide(&boundary, capacity);
                *self = Self::Internal { boundary, children };

                for existing_item in &data {
                    self.insert(existing_item, capacity, depth);
                }

                self.insert(item, capacity, depth)
            }
            Self::Internal { children, .. } => Quadrant::INSERT_ORDER
                .iter()
                .any(|q| children[q.index()].insert(item, capacity, depth + 1)),
        }
    }

    fn depth(&self) -> usize {
        match self {
            Self::External { .. } => 0,
            Self::Internal { children, .. } => {
                1 + children.iter().map(|c| c.depth()).max().unwrap_or(0)
            }
        }
    }

    fn boundary(&self) -> &Rect {
        match self {
            Self::External { boundary, .. } => boundary,
            Self::Internal { boundary, .. } => boundary,
        }
    }

    fn subdivide(boundary: &Rect, capacity: usize) -> [Box<Self>; 4] {
        boundary.quarter().map(|r| {
            Box::new(Self::External {
                boundary: r,
                data: Vec::with_capacity(capacity),
            })
        })
    }
}

/// Iterator returned by [`QuadTree::search`].
pub struct Search<'a, T> {
    rect: Rect,
    stack: Vec<&'a Node<T>>,
    leaf: slice::Iter<'a, T>,
}

impl<'a, T: Point> Iterator for Search<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            for item in self.leaf.by_ref() {
                if self.rect.contains(&item.point()) {
                    return Some(item);
                }
            }

            let node = self.stack.pop()?;
            match node {
                Node::External { boundary, data } => {
                    if boundary.intersects(&self.rect) {
                        self.leaf = data.iter();
                    }
                }
                Node::Internal { boundary, children } => {
                    if boundary.intersects(&self.rect) {
                        // Reversed so the stack pops them in search order
                        for q in Quadrant::SEARCH_ORDER.iter().rev() {
                            self.stack.push(&children[q.index()]);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::point;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use crate::{shapes::tests::make_rect, Point};

    use super::*;

    fn make_tree(capacity: usize) -> QuadTree<P2> {
        QuadTree::new(make_rect(0.0, 0.0, 100.0, 100.0), capacity).unwrap()
    }

    fn collect(qt: &QuadTree<P2>, rect: &Rect) -> Vec<P2> {
        let mut results = Vec::new();
        qt.query(rect, &mut results);
        results
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let qt = QuadTree::<P2>::new(make_rect(0.0, 0.0, 1.0, 1.0), 0);
        assert!(matches!(qt, Err(Error::InvalidCapacity)));
    }

    #[test]
    fn insert_single_item() {
        let mut qt = make_tree(1);
        let item = point![25.0, 25.0];
        assert!(qt.insert(&item), "Should insert item successfully");
        assert_eq!(qt.len(), 1);
    }

    #[test]
    fn insert_item_out_of_bounds() {
        let mut qt = make_tree(1);
        let item = point![150.0, 150.0];
        assert!(!qt.insert(&item), "Should not insert item outside bounds");
        assert!(qt.is_empty(), "Rejected item should not be counted");
        assert_eq!(qt.depth(), 0, "Rejected item should not split the root");
    }

    #[test]
    fn insert_multiple_items_subdivision() {
        let mut qt = make_tree(2);
        let item1 = point![20.0, 20.0];
        let item2 = point![40.0, 40.0];
        let item3 = point![60.0, 60.0];

        qt.insert(&item1);
        qt.insert(&item2);
        assert_eq!(qt.depth(), 0, "Should not split while at capacity");
        qt.insert(&item3);

        match &qt.root {
            Node::Internal { children, .. } => {
                assert_eq!(
                    children.len(),
                    4,
                    "Should have four children after subdivision"
                );
            }
            _ => panic!("QuadTree should have subdivided into an internal node"),
        }
    }

    #[test]
    fn split_redistributes_existing_items() {
        let mut qt = QuadTree::new(make_rect(0.0, 0.0, 10.0, 10.0), 4).unwrap();
        let points = [
            point![1.0, 1.0],
            point![9.0, 9.0],
            point![1.0, 9.0],
            point![9.0, 1.0],
            point![5.0, 5.0],
        ];
        for p in &points {
            assert!(qt.insert(p));
        }

        let Node::Internal { children, .. } = &qt.root else {
            panic!("Fifth item should split the root");
        };
        for child in children.iter() {
            assert!(
                matches!(**child, Node::External { .. }),
                "Children should still be leaves"
            );
        }
        let stored = |q: Quadrant| match &*children[q.index()] {
            Node::External { data, .. } => data.clone(),
            Node::Internal { .. } => unreachable!(),
        };
        assert_eq!(stored(Quadrant::NW), vec![point![1.0, 9.0], point![5.0, 5.0]]);
        assert_eq!(stored(Quadrant::NE), vec![point![9.0, 9.0]]);
        assert_eq!(stored(Quadrant::SW), vec![point![1.0, 1.0]]);
        assert_eq!(stored(Quadrant::SE), vec![point![9.0, 1.0]]);

        let all = collect(&qt, qt.boundary());
        assert_eq!(all.len(), 5, "All items should be reachable after a split");
        for p in &points {
            assert!(all.contains(p), "{p:?} should be reachable");
        }
    }

    #[test]
    fn repeated_coordinate_stops_at_max_depth() {
        let mut qt = make_tree(2);
        let p = point![33.3, 66.6];
        for _ in 0..10 {
            assert!(qt.insert(&p));
        }
        assert_eq!(qt.len(), 10);
        assert_eq!(qt.depth(), MAX_DEPTH);

        let window = Rect::from_center(p, 1e-9, 1e-9).unwrap();
        assert_eq!(qt.search(&window).count(), 10);
        assert_eq!(qt.trace(&p).len(), MAX_DEPTH);
    }

    #[test]
    fn query_rectangular_empty_quadtree() {
        let qt = make_tree(1);
        let results = collect(&qt, &make_rect(10.0, 10.0, 50.0, 50.0));
        assert!(results.is_empty(), "Should be empty for an empty tree");
    }

    #[test]
    fn query_rectangular_external_node_contains_point() {
        let mut qt = make_tree(1);
        let item = point![25.0, 25.0];
        qt.insert(&item);
        let results = collect(&qt, &make_rect(20.0, 20.0, 30.0, 30.0));
        assert_eq!(results.len(), 1, "Should find one item in the range");
        assert_eq!(
            results[0].point(),
            item.point(),
            "The point should match the inserted item"
        );
    }

    #[test]
    fn query_rectangular_external_node_does_not_contain_point() {
        let mut qt = make_tree(1);
        qt.insert(&point![75.0, 75.0]);
        let results = collect(&qt, &make_rect(20.0, 20.0, 30.0, 30.0));
        assert!(
            results.is_empty(),
            "Should not find any items outside the range"
        );
    }

    #[test]
    fn query_rectangular_internal_nodes_multiple_items() {
        let mut qt = make_tree(1);
        let item1 = point![25.0, 25.0];
        let item2 = point![75.0, 75.0];
        qt.insert(&item1);
        qt.insert(&item2);

        let results = collect(&qt, &make_rect(20.0, 20.0, 80.0, 80.0));
        assert_eq!(results.len(), 2, "Should find both items in the range");

        let results = collect(&qt, &make_rect(70.0, 70.0, 80.0, 80.0));
        assert_eq!(results.len(), 1, "Should find one item in the range");
        assert_eq!(
            results[0], item2,
            "The point should match the second inserted item"
        );

        let results = collect(&qt, &make_rect(200.0, 200.0, 300.0, 300.0));
        assert!(
            results.is_empty(),
            "Should not find any items outside the range"
        );
    }

    #[test]
    fn query_rectangular_boundary_edge_overlap() {
        let mut qt = make_tree(4);
        let edge_point = point![100.0, 50.0];
        qt.insert(&edge_point);
        let results = collect(&qt, &make_rect(95.0, 45.0, 105.0, 55.0));
        assert_eq!(results.len(), 1, "Should find the edge point.");
    }

    #[test]
    fn search_visits_children_sw_nw_ne_se() {
        let mut qt = QuadTree::new(make_rect(0.0, 0.0, 10.0, 10.0), 1).unwrap();
        let ne = point![9.0, 9.0];
        let se = point![9.0, 1.0];
        let nw = point![1.0, 9.0];
        let sw = point![1.0, 1.0];
        for p in [&ne, &se, &nw, &sw] {
            qt.insert(p);
        }

        let order: Vec<P2> = qt.search(qt.boundary()).copied().collect();
        assert_eq!(order, vec![sw, nw, ne, se]);
    }

    #[test]
    fn search_is_restartable_and_stable() {
        let mut qt = make_tree(3);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            qt.insert(&point![rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)]);
        }
        let window = make_rect(10.0, 30.0, 70.0, 90.0);
        let first: Vec<P2> = qt.search(&window).copied().collect();
        let second: Vec<P2> = qt.search(&window).copied().collect();
        assert!(!first.is_empty());
        assert_eq!(first, second, "Same query should enumerate the same items");
    }

    #[test]
    fn search_matches_brute_force() {
        let mut qt = make_tree(4);
        let mut rng = StdRng::seed_from_u64(11);
        let mut inserted = Vec::new();
        for _ in 0..1_000 {
            let p = point![rng.random_range(-10.0..110.0), rng.random_range(-10.0..110.0)];
            if qt.insert(&p) {
                inserted.push(p);
            } else {
                assert!(!qt.boundary().contains(&p), "In-bounds point was rejected");
            }
        }
        assert_eq!(qt.len(), inserted.len());
        assert_eq!(collect(&qt, qt.boundary()).len(), inserted.len());

        for _ in 0..100 {
            let window = Rect::from_center(
                point![rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)],
                rng.random_range(0.0..30.0),
                rng.random_range(0.0..30.0),
            )
            .unwrap();
            let found = collect(&qt, &window);
            let expected = inserted.iter().filter(|p| window.contains(p)).count();
            assert_eq!(found.len(), expected, "Search in {window:?} missed items");
            assert!(found.iter().all(|p| window.contains(p)));
        }
    }

    #[test]
    fn trace_follows_subdivisions() {
        let mut qt = QuadTree::new(make_rect(0.0, 0.0, 10.0, 10.0), 1).unwrap();
        assert!(qt.trace(&point![2.0, 2.0]).is_empty(), "Root leaf has no path");

        qt.insert(&point![1.0, 1.0]);
        qt.insert(&point![4.0, 4.0]);

        // Both land in SW of the root, which then splits at (2.5, 2.5)
        let path = qt.trace(&point![4.0, 4.0]);
        assert_eq!(path.steps(), &[Quadrant::SW, Quadrant::NE]);
        let path = qt.trace(&point![1.0, 1.0]);
        assert_eq!(path.steps(), &[Quadrant::SW, Quadrant::SW]);
        let path = qt.trace(&point![9.0, 9.0]);
        assert_eq!(path.steps(), &[Quadrant::NE]);
    }
}
