/// Live-target registry shared between fish and bullets
///
/// Fish enroll when they spawn and refresh their collision rectangle every
/// tick; bullets run their hit query against the registry without ever
/// touching the fish entities themselves. A successful strike removes the
/// slot (the fish stops being a target immediately) and raises the fish's
/// shared capture flag; the fish reads that flag from its own tick and plays
/// out its dying sequence before flipping its dead flag.
///
/// The strike query is two-phase: a quadtree over the targets' bounding boxes
/// narrows the candidate set, then SAT decides, scanning candidates in
/// enrollment order so the earliest-enrolled fish wins when a bullet overlaps
/// several at once. The handful of fish on screen would also survive a linear
/// scan; the index is the scalability path and the result is identical.
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::collision::rects_intersect;
use crate::geometry::{Aabb, Bounds, OrientedRect};
use crate::quadtree::Quadtree;

const QUAD_CAPACITY: usize = 4;
const QUAD_MAX_DEPTH: usize = 4;

/// A fish's handle on its own registration.
pub struct Membership {
    pub id: u32,
    pub struck: Rc<Cell<bool>>,
}

struct Slot {
    id: u32,
    rect: OrientedRect,
    struck: Rc<Cell<bool>>,
}

struct SchoolState {
    bounds: Aabb,
    slots: Vec<Slot>,
    next_id: u32,
}

/// Cheaply cloneable shared registry; one per scene setup.
#[derive(Clone)]
pub struct School {
    inner: Rc<RefCell<SchoolState>>,
}

impl School {
    pub fn new(bounds: Bounds) -> Self {
        School {
            inner: Rc::new(RefCell::new(SchoolState {
                bounds: Aabb::new(bounds.cx, bounds.cy, bounds.width(), bounds.height()),
                slots: Vec::new(),
                next_id: 0,
            })),
        }
    }

    pub fn enroll(&self, rect: OrientedRect) -> Membership {
        let mut state = self.inner.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        let struck = Rc::new(Cell::new(false));
        state.slots.push(Slot {
            id,
            rect,
            struck: Rc::clone(&struck),
        });
        Membership { id, struck }
    }

    /// Updates the registered collision rectangle; fish call this every tick
    /// they move. Refreshing a slot that is gone is a logic bug.
    pub fn refresh(&self, id: u32, rect: OrientedRect) {
        let mut state = self.inner.borrow_mut();
        let slot = state.slots.iter_mut().find(|slot| slot.id == id);
        debug_assert!(slot.is_some(), "refresh of unregistered target {id}");
        if let Some(slot) = slot {
            slot.rect = rect;
        }
    }

    /// Removes a registration. Idempotent: a fish that was struck (slot
    /// already removed) leaves again when it finally dies.
    pub fn leave(&self, id: u32) {
        self.inner.borrow_mut().slots.retain(|slot| slot.id != id);
    }

    pub fn population(&self) -> usize {
        self.inner.borrow().slots.len()
    }

    /// How many targets have ever enrolled; tests use this to detect
    /// spawn/despawn churn.
    #[cfg(test)]
    pub(crate) fn enrolled_total(&self) -> u32 {
        self.inner.borrow().next_id
    }

    /// First-hit query for a bullet's collision rectangle. On a hit the slot
    /// is removed, its capture flag raised, and the target id returned.
    pub fn strike(&self, probe: &OrientedRect) -> Option<u32> {
        let mut state = self.inner.borrow_mut();
        if state.slots.is_empty() {
            return None;
        }
        let mut index: Quadtree<u32> = Quadtree::new(state.bounds, QUAD_CAPACITY, QUAD_MAX_DEPTH);
        for slot in &state.slots {
            index.insert(slot.id, slot.rect.bounds());
        }
        let mut candidates = index.retrieve(&probe.bounds());
        // Ids are handed out in enrollment order; the earliest target wins.
        candidates.sort_unstable();
        for id in candidates {
            let Some(pos) = state.slots.iter().position(|slot| slot.id == id) else {
                continue;
            };
            if rects_intersect(probe, &state.slots[pos].rect) {
                let slot = state.slots.remove(pos);
                slot.struck.set(true);
                log::debug!("target {} struck", slot.id);
                return Some(slot.id);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec2;

    fn school() -> School {
        School::new(Bounds::new(0.0, 800.0, 0.0, 480.0))
    }

    fn rect(cx: f32, cy: f32, hx: f32, hy: f32) -> OrientedRect {
        OrientedRect::new(Vec2::new(cx, cy), Vec2::new(hx, hy), 0.0)
    }

    #[test]
    fn test_enroll_and_population() {
        let school = school();
        let a = school.enroll(rect(100.0, 100.0, 20.0, 10.0));
        let b = school.enroll(rect(200.0, 100.0, 20.0, 10.0));
        assert_eq!(school.population(), 2);
        assert_ne!(a.id, b.id);
        assert!(!a.struck.get());
    }

    #[test]
    fn test_strike_marks_and_removes() {
        let school = school();
        let member = school.enroll(rect(100.0, 100.0, 20.0, 10.0));
        let hit = school.strike(&rect(105.0, 102.0, 10.0, 10.0));
        assert_eq!(hit, Some(member.id));
        assert!(member.struck.get());
        assert_eq!(school.population(), 0);
        // The target is gone; a second identical probe misses
        assert_eq!(school.strike(&rect(105.0, 102.0, 10.0, 10.0)), None);
    }

    #[test]
    fn test_strike_misses_cleanly() {
        let school = school();
        let member = school.enroll(rect(100.0, 100.0, 20.0, 10.0));
        assert_eq!(school.strike(&rect(400.0, 400.0, 10.0, 10.0)), None);
        assert!(!member.struck.get());
        assert_eq!(school.population(), 1);
    }

    #[test]
    fn test_earliest_enrolled_wins_on_overlap() {
        let school = school();
        let first = school.enroll(rect(100.0, 100.0, 30.0, 30.0));
        let second = school.enroll(rect(110.0, 100.0, 30.0, 30.0));
        let hit = school.strike(&rect(105.0, 100.0, 10.0, 10.0));
        assert_eq!(hit, Some(first.id));
        assert!(!second.struck.get());
        assert_eq!(school.population(), 1);
    }

    #[test]
    fn test_refresh_moves_the_target() {
        let school = school();
        let member = school.enroll(rect(100.0, 100.0, 20.0, 10.0));
        school.refresh(member.id, rect(300.0, 300.0, 20.0, 10.0));
        assert_eq!(school.strike(&rect(100.0, 100.0, 10.0, 10.0)), None);
        assert_eq!(
            school.strike(&rect(300.0, 300.0, 10.0, 10.0)),
            Some(member.id)
        );
    }

    #[test]
    fn test_leave_is_idempotent() {
        let school = school();
        let member = school.enroll(rect(100.0, 100.0, 20.0, 10.0));
        school.leave(member.id);
        school.leave(member.id);
        assert_eq!(school.population(), 0);
    }

    #[test]
    fn test_many_targets_all_reachable() {
        // Enough targets to split the broad-phase index; every one of them
        // must still be hittable.
        let school = school();
        let mut members = Vec::new();
        for i in 0..12 {
            let x = 60.0 + (i % 4) as f32 * 180.0;
            let y = 60.0 + (i / 4) as f32 * 150.0;
            members.push((school.enroll(rect(x, y, 25.0, 15.0)), x, y));
        }
        for (member, x, y) in members {
            let hit = school.strike(&rect(x, y, 5.0, 5.0));
            assert_eq!(hit, Some(member.id));
        }
        assert_eq!(school.population(), 0);
    }
}
