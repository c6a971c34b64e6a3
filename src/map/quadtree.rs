use glam::DVec2;

/// Maximum subdivision depth (caps degenerate inputs, e.g. all points coincident)
const MAX_DEPTH: u32 = 16;

/// Leaf bucket capacity before a node subdivides
const BUCKET_CAPACITY: usize = 16;

/// Bucketed point quadtree over projected screen coordinates.
///
/// Built once per redraw and queried with half-open rectangles
/// `[min, max)`, which keeps grid-cell queries an exact partition:
/// a point on a shared cell edge belongs to exactly one cell.
pub struct PointQuadtree {
    root: Node,
    len: usize,
}

struct Node {
    min: DVec2,
    max: DVec2,
    depth: u32,
    /// Point indices stored at this leaf; empty once subdivided
    bucket: Vec<usize>,
    /// NW, NE, SW, SE in screen coordinates (y grows downward)
    children: Option<Box<[Node; 4]>>,
}

impl PointQuadtree {
    /// Build a quadtree over the given points. The root covers the point
    /// bounding box; an empty slice yields an empty tree.
    pub fn build(points: &[DVec2]) -> Self {
        let (min, max) = bounds(points);
        let mut root = Node::new(min, max, 0);
        for (idx, &p) in points.iter().enumerate() {
            root.insert(idx, p, points);
        }
        Self {
            root,
            len: points.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append indices of points inside `[min, max)` to `out`.
    pub fn query_into(&self, min: DVec2, max: DVec2, points: &[DVec2], out: &mut Vec<usize>) {
        if self.len > 0 {
            self.root.query(min, max, points, out);
        }
    }

    /// Collect indices of points inside `[min, max)`.
    #[allow(dead_code)]
    pub fn query(&self, min: DVec2, max: DVec2, points: &[DVec2]) -> Vec<usize> {
        let mut out = Vec::new();
        self.query_into(min, max, points, &mut out);
        out
    }
}

impl Node {
    fn new(min: DVec2, max: DVec2, depth: u32) -> Self {
        Self {
            min,
            max,
            depth,
            bucket: Vec::new(),
            children: None,
        }
    }

    fn insert(&mut self, idx: usize, p: DVec2, points: &[DVec2]) {
        let quadrant = self.child_index(p);
        if let Some(children) = &mut self.children {
            children[quadrant].insert(idx, p, points);
            return;
        }

        self.bucket.push(idx);

        if self.bucket.len() > BUCKET_CAPACITY && self.depth < MAX_DEPTH {
            self.subdivide();
            let bucket = std::mem::take(&mut self.bucket);
            for idx in bucket {
                let quadrant = self.child_index(points[idx]);
                if let Some(children) = &mut self.children {
                    children[quadrant].insert(idx, points[idx], points);
                }
            }
        }
    }

    /// Quadrant a point routes to: boundary points go east/south so the
    /// split matches the half-open query convention.
    fn child_index(&self, p: DVec2) -> usize {
        let mid = (self.min + self.max) * 0.5;
        let east = p.x >= mid.x;
        let south = p.y >= mid.y;
        match (south, east) {
            (false, false) => 0, // NW
            (false, true) => 1,  // NE
            (true, false) => 2,  // SW
            (true, true) => 3,   // SE
        }
    }

    fn subdivide(&mut self) {
        let mid = (self.min + self.max) * 0.5;
        let depth = self.depth + 1;
        self.children = Some(Box::new([
            Node::new(self.min, mid, depth),
            Node::new(DVec2::new(mid.x, self.min.y), DVec2::new(self.max.x, mid.y), depth),
            Node::new(DVec2::new(self.min.x, mid.y), DVec2::new(mid.x, self.max.y), depth),
            Node::new(mid, self.max, depth),
        ]));
    }

    /// Node extent `[self.min, self.max]` intersects query `[min, max)`?
    fn intersects(&self, min: DVec2, max: DVec2) -> bool {
        self.min.x < max.x && self.max.x >= min.x && self.min.y < max.y && self.max.y >= min.y
    }

    fn query(&self, min: DVec2, max: DVec2, points: &[DVec2], out: &mut Vec<usize>) {
        if !self.intersects(min, max) {
            return;
        }

        for &idx in &self.bucket {
            let p = points[idx];
            if p.x >= min.x && p.x < max.x && p.y >= min.y && p.y < max.y {
                out.push(idx);
            }
        }

        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query(min, max, points, out);
            }
        }
    }
}

fn bounds(points: &[DVec2]) -> (DVec2, DVec2) {
    let mut min = DVec2::splat(f64::INFINITY);
    let mut max = DVec2::splat(f64::NEG_INFINITY);
    for p in points {
        min = min.min(*p);
        max = max.max(*p);
    }
    if points.is_empty() {
        (DVec2::ZERO, DVec2::ZERO)
    } else {
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_points(n: usize, step: f64) -> Vec<DVec2> {
        let mut points = Vec::new();
        for y in 0..n {
            for x in 0..n {
                points.push(DVec2::new(x as f64 * step, y as f64 * step));
            }
        }
        points
    }

    #[test]
    fn test_empty_tree() {
        let points: Vec<DVec2> = Vec::new();
        let tree = PointQuadtree::build(&points);
        assert!(tree.is_empty());
        assert!(tree
            .query(DVec2::new(-100.0, -100.0), DVec2::new(100.0, 100.0), &points)
            .is_empty());
    }

    #[test]
    fn test_query_matches_linear_scan() {
        let points = grid_points(20, 3.7);
        let tree = PointQuadtree::build(&points);

        let min = DVec2::new(10.0, 5.0);
        let max = DVec2::new(40.0, 33.0);
        let mut got = tree.query(min, max, &points);
        got.sort_unstable();

        let expected: Vec<usize> = points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.x >= min.x && p.x < max.x && p.y >= min.y && p.y < max.y)
            .map(|(i, _)| i)
            .collect();

        assert_eq!(got, expected);
    }

    #[test]
    fn test_half_open_boundary() {
        let points = vec![DVec2::new(10.0, 10.0)];
        let tree = PointQuadtree::build(&points);

        // Point on the max edge is excluded...
        let hit = tree.query(DVec2::new(0.0, 0.0), DVec2::new(10.0, 10.0), &points);
        assert!(hit.is_empty());
        // ...and on the min edge included.
        let hit = tree.query(DVec2::new(10.0, 10.0), DVec2::new(20.0, 20.0), &points);
        assert_eq!(hit, vec![0]);
    }

    #[test]
    fn test_coincident_points_bounded_by_depth() {
        // All identical: bucket can never split usefully, depth cap must hold
        let points = vec![DVec2::new(1.0, 1.0); 500];
        let tree = PointQuadtree::build(&points);
        let hit = tree.query(DVec2::new(0.0, 0.0), DVec2::new(2.0, 2.0), &points);
        assert_eq!(hit.len(), 500);
    }

    #[test]
    fn test_full_cover_query_returns_all() {
        let points = grid_points(13, 1.0);
        let tree = PointQuadtree::build(&points);
        let mut got = tree.query(DVec2::new(-1.0, -1.0), DVec2::new(100.0, 100.0), &points);
        got.sort_unstable();
        let all: Vec<usize> = (0..points.len()).collect();
        assert_eq!(got, all);
    }
}
