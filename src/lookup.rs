//! Exact-coordinate lookup against the tree.
//!
//! A query coordinate is widened into a tiny "epsilon box", region-searched, and every
//! stored item found is paired with the quadrant path leading to it.

use tracing::debug;

use crate::{
    quadrant::QuadrantPath,
    quadtree::QuadTree,
    shapes::Rect,
    Point, P2,
};

/// Half-extent, in coordinate units (degrees), of the box used to match a query
/// coordinate against stored points.
///
/// Absorbs rounding from parsing text back into `f64`. Nearby but distinct asset
/// coordinates differ by far more than this.
pub const COORDINATE_EPSILON: f64 = 1e-12;

/// A stored item matched by [`locate`], with the path to its leaf.
#[derive(Clone, Debug, PartialEq)]
pub struct Located<T> {
    pub item: T,
    pub path: QuadrantPath,
}

/// The query window for an exact-coordinate lookup
pub fn epsilon_box(point: &P2) -> Rect {
    let half = nalgebra::vector![COORDINATE_EPSILON, COORDINATE_EPSILON];
    Rect::new(*point - half, *point + half)
}

/// Find every stored item at `point` and trace where each one lives.
pub fn locate<T: Point + Clone>(tree: &QuadTree<T>, point: &P2) -> Vec<Located<T>> {
    let window = epsilon_box(point);
    let located: Vec<Located<T>> = tree
        .search(&window)
        .map(|item| Located {
            path: tree.trace(&item.point()),
            item: item.clone(),
        })
        .collect();
    debug!(x = point.x, y = point.y, matches = located.len(), "located point");
    located
}

#[cfg(test)]
mod tests {
    use nalgebra::point;

    use crate::{quadrant::Quadrant, shapes::tests::make_rect};

    use super::*;

    fn scenario_tree() -> QuadTree<P2> {
        let mut qt = QuadTree::new(make_rect(0.0, 0.0, 10.0, 10.0), 4).unwrap();
        for p in [
            point![1.0, 1.0],
            point![9.0, 9.0],
            point![1.0, 9.0],
            point![9.0, 1.0],
            point![5.0, 5.0],
        ] {
            assert!(qt.insert(&p));
        }
        qt
    }

    #[test]
    fn corner_point_traces_to_its_quadrant() {
        let qt = scenario_tree();
        let located = locate(&qt, &point![9.0, 9.0]);
        assert_eq!(located.len(), 1);
        assert_eq!(located[0].item, point![9.0, 9.0]);
        assert_eq!(located[0].path.steps(), &[Quadrant::NE]);
        assert_eq!(located[0].path.to_string(), "NE\n");
    }

    #[test]
    fn center_point_resolves_to_nw() {
        let qt = scenario_tree();
        let located = locate(&qt, &point![5.0, 5.0]);
        assert_eq!(located.len(), 1, "Shared-edge point should be stored once");
        assert_eq!(located[0].path.to_string(), "NW\n");
    }

    #[test]
    fn outside_point_is_not_found() {
        let qt = scenario_tree();
        assert!(locate(&qt, &point![100.0, 100.0]).is_empty());
    }

    #[test]
    fn nearby_point_is_not_matched() {
        let qt = scenario_tree();
        assert!(locate(&qt, &point![9.0 + 1e-9, 9.0]).is_empty());
    }

    #[test]
    fn repeated_coordinate_is_located_per_copy() {
        let mut qt = scenario_tree();
        qt.insert(&point![9.0, 1.0]);
        let located = locate(&qt, &point![9.0, 1.0]);
        assert_eq!(located.len(), 2);
        assert!(located.iter().all(|l| l.path.steps() == [Quadrant::SE]));
    }

    #[test]
    fn lookup_is_idempotent() {
        let qt = scenario_tree();
        let first = locate(&qt, &point![1.0, 9.0]);
        let second = locate(&qt, &point![1.0, 9.0]);
        assert_eq!(first, second);
    }
}
