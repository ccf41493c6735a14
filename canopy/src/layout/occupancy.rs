use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Vertical extents already claimed in one column.
///
/// Claimed intervals are half-open `[start, end)` and pairwise disjoint, keyed by `start`. For a
/// candidate `[y, y + extent)` the only interval that can overlap it is the one with the greatest
/// start below `y + extent`, so a probe is a single `O(log n)` range lookup and a claim is an
/// `O(log n)` insert.
#[derive(Debug)]
pub(crate) struct Occupancy {
    claimed: BTreeMap<Coord, f64>,
    step: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Coord(f64);

impl Eq for Coord {}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Occupancy {
    /// Candidates slide down from their preferred start in multiples of `step`.
    pub(crate) fn new(step: f64) -> Self {
        Self {
            claimed: BTreeMap::new(),
            step,
        }
    }

    /// Claim `[y, y + extent)` for the smallest `y = start + k * step` (`k >= 0`) that does not
    /// overlap anything claimed so far, and return that `y`.
    ///
    /// Rather than probing every step, a collision jumps straight to the first step at or past
    /// the colliding interval's end: every step in between overlaps that same interval, so the
    /// result is the one unit-by-unit sliding would find.
    pub(crate) fn claim(&mut self, start: f64, extent: f64) -> f64 {
        let mut y = start;
        while let Some(end) = self.collision(y, extent) {
            y = self.first_step_at_or_after(start, end);
        }
        self.claimed.insert(Coord(y), y + extent);
        y
    }

    fn collision(&self, y: f64, extent: f64) -> Option<f64> {
        let (_, &end) = self.claimed.range(..Coord(y + extent)).next_back()?;
        (end > y).then_some(end)
    }

    fn first_step_at_or_after(&self, origin: f64, bound: f64) -> f64 {
        if self.step <= 0.0 {
            return bound;
        }
        let steps = ((bound - origin) / self.step).ceil();
        let y = origin + steps * self.step;
        // Rounding can land a hair short of `bound`.
        if y < bound {
            origin + (steps + 1.0) * self.step
        } else {
            y
        }
    }

    #[cfg(test)]
    fn intervals(&self) -> Vec<(f64, f64)> {
        self.claimed.iter().map(|(s, e)| (s.0, *e)).collect()
    }
}
