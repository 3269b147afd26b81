/// Quadtree spatial index
///
/// A recursive 4-way partition over axis-aligned bounding boxes, used to answer
/// "which items are near this query box" without scanning everything. The fish
/// school uses it as the broad phase for bullet strikes; the structure itself
/// is general-purpose and holds any `Copy + Eq + Hash` item key.
///
/// # Behavior contract
///
/// - A node holds up to `capacity` items before splitting, unless it already
///   sits at `max_depth` (the hard floor that stops unbounded recursion).
/// - Splitting creates exactly four children over the four quadrants, in the
///   fixed order top-right, top-left, bottom-left, bottom-right, and migrates
///   every held item down; after that the node never holds items itself.
/// - An item whose box straddles a midpoint is inserted into every matching
///   quadrant. Duplication is by design; `retrieve` deduplicates by item
///   identity before returning, so a straddler comes back exactly once.
use std::collections::HashSet;
use std::hash::Hash;

use crate::geometry::Aabb;

pub struct Quadtree<T> {
    bounds: Aabb,
    capacity: usize,
    max_depth: usize,
    depth: usize,
    items: Vec<(T, Aabb)>,
    children: Option<Box<[Quadtree<T>; 4]>>,
}

impl<T: Copy + Eq + Hash> Quadtree<T> {
    pub fn new(bounds: Aabb, capacity: usize, max_depth: usize) -> Self {
        Self::node(bounds, capacity, max_depth, 0)
    }

    fn node(bounds: Aabb, capacity: usize, max_depth: usize, depth: usize) -> Self {
        Quadtree {
            bounds,
            capacity,
            max_depth,
            depth,
            items: Vec::new(),
            children: None,
        }
    }

    /// Which of the four quadrants a box belongs to. The two midpoints are
    /// tested independently per axis (starts north / starts west / ends east /
    /// ends south), so a box straddling both midpoints maps to all four.
    fn quadrants(bounds: &Aabb, bb: &Aabb) -> [bool; 4] {
        let v_mid = bounds.x + bounds.w / 2.0;
        let h_mid = bounds.y + bounds.h / 2.0;
        let starts_north = bb.y < h_mid;
        let starts_west = bb.x < v_mid;
        let ends_east = bb.x + bb.w > v_mid;
        let ends_south = bb.y + bb.h > h_mid;
        [
            starts_north && ends_east,   // top-right
            starts_west && starts_north, // top-left
            starts_west && ends_south,   // bottom-left
            ends_east && ends_south,     // bottom-right
        ]
    }

    fn split(&mut self) {
        let half_w = self.bounds.w / 2.0;
        let half_h = self.bounds.h / 2.0;
        let (x, y) = (self.bounds.x, self.bounds.y);
        let child = |bx: f32, by: f32| {
            Quadtree::node(
                Aabb::new(bx, by, half_w, half_h),
                self.capacity,
                self.max_depth,
                self.depth + 1,
            )
        };
        self.children = Some(Box::new([
            child(x + half_w, y),          // top-right
            child(x, y),                   // top-left
            child(x, y + half_h),          // bottom-left
            child(x + half_w, y + half_h), // bottom-right
        ]));
    }

    pub fn insert(&mut self, item: T, bb: Aabb) {
        if let Some(children) = self.children.as_mut() {
            // A split node must not hold items of its own.
            debug_assert!(self.items.is_empty(), "split node still holds items");
            let matches = Self::quadrants(&self.bounds, &bb);
            for (i, child) in children.iter_mut().enumerate() {
                if matches[i] {
                    child.insert(item, bb);
                }
            }
            return;
        }

        self.items.push((item, bb));

        if self.items.len() > self.capacity && self.depth < self.max_depth {
            self.split();
            // Redistribute everything held here into the matching children,
            // then clear; items straddling a midpoint land in several.
            let items = std::mem::take(&mut self.items);
            if let Some(children) = self.children.as_mut() {
                for (item, bb) in items {
                    let matches = Self::quadrants(&self.bounds, &bb);
                    for (i, child) in children.iter_mut().enumerate() {
                        if matches[i] {
                            child.insert(item, bb);
                        }
                    }
                }
            }
        }
    }

    /// All items whose node overlaps the query box, deduplicated by identity
    /// and in first-encountered order. The result is a superset of the items
    /// whose boxes actually intersect the query; callers run their own narrow
    /// phase.
    pub fn retrieve(&self, query: &Aabb) -> Vec<T> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        self.collect(query, &mut out, &mut seen);
        out
    }

    fn collect(&self, query: &Aabb, out: &mut Vec<T>, seen: &mut HashSet<T>) {
        for (item, _) in &self.items {
            if seen.insert(*item) {
                out.push(*item);
            }
        }
        if let Some(children) = self.children.as_ref() {
            let matches = Self::quadrants(&self.bounds, query);
            for (i, child) in children.iter().enumerate() {
                if matches[i] {
                    child.collect(query, out, seen);
                }
            }
        }
    }

    /// Drops every item and child node; the root keeps its bounds and limits.
    pub fn clear(&mut self) {
        self.items.clear();
        self.children = None;
    }

    #[cfg(test)]
    fn is_split(&self) -> bool {
        self.children.is_some()
    }

    #[cfg(test)]
    fn own_item_count(&self) -> usize {
        self.items.len()
    }
}
