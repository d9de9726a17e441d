//! Category tallies and pie chart geometry.
//!
//! Slices are laid out clockwise from 12 o'clock in descending-count order, and take
//! their colour from the palette by position, so a category's colour depends on where
//! it ranks in the current tally rather than on its name.

use std::f64::consts::TAU;

use crate::fields::Category;
use crate::task::Task;

/// Hex colours of the pie palette, assigned to slices by position.
pub const PALETTE_HEX: [&str; 3] = ["#ff9999", "#99ff99", "#9999ff"];

/// One wedge of the category pie.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub category: Category,
    pub count: usize,
    /// Share of all tasks, in `0.0..=1.0`.
    pub fraction: f64,
    /// Clockwise angle from 12 o'clock where the slice begins, in radians.
    pub start: f64,
    /// Angular width of the slice, in radians.
    pub sweep: f64,
    /// Index into the palette.
    pub color: usize,
}

impl Slice {
    /// Whether a clockwise angle from 12 o'clock falls inside this slice.
    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.start && angle < self.start + self.sweep
    }
}

/// Count tasks per category, largest count first.
///
/// Categories with equal counts keep the order in which they first appear in `tasks`.
/// Categories with no tasks are left out.
pub fn tally(tasks: &[Task]) -> Vec<(Category, usize)> {
    let mut counts: Vec<(Category, usize)> = Vec::new();
    for task in tasks {
        match counts.iter_mut().find(|(c, _)| *c == task.category) {
            Some((_, n)) => *n += 1,
            None => counts.push((task.category, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Lay out pie slices for a tally.
pub fn slices(tally: &[(Category, usize)]) -> Vec<Slice> {
    let total: usize = tally.iter().map(|(_, n)| n).sum();
    if total == 0 {
        return Vec::new();
    }
    let mut start = 0.0;
    tally
        .iter()
        .enumerate()
        .map(|(i, &(category, count))| {
            let fraction = count as f64 / total as f64;
            let slice = Slice {
                category,
                count,
                fraction,
                start,
                sweep: fraction * TAU,
                color: i % PALETTE_HEX.len(),
            };
            start += slice.sweep;
            slice
        })
        .collect()
}

/// Clockwise angle from 12 o'clock of the point `(x, y)`, in `0..TAU`.
pub fn clockwise_angle(x: f64, y: f64) -> f64 {
    x.atan2(y).rem_euclid(TAU)
}

/// Index of the slice covering the given clockwise angle, if any.
pub fn slice_at(slices: &[Slice], angle: f64) -> Option<usize> {
    // The last slice absorbs rounding at the very end of the circle.
    slices
        .iter()
        .position(|s| s.contains(angle))
        .or_else(|| slices.len().checked_sub(1).filter(|_| angle < TAU))
}

/// Sample the unit disc on a grid and group the points by the slice they fall in.
///
/// `step` is the grid spacing; the result has one point list per slice, in slice
/// order, ready to be drawn as coloured points.
pub fn pie_points(slices: &[Slice], step: f64) -> Vec<Vec<(f64, f64)>> {
    let mut points = vec![Vec::new(); slices.len()];
    if slices.is_empty() || step <= 0.0 {
        return points;
    }
    let steps = (2.0 / step).ceil() as i64;
    for i in 0..=steps {
        let x = -1.0 + i as f64 * step;
        for j in 0..=steps {
            let y = -1.0 + j as f64 * step;
            if x * x + y * y > 1.0 {
                continue;
            }
            let angle = clockwise_angle(x, y);
            if let Some(index) = slice_at(slices, angle) {
                points[index].push((x, y));
            }
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn task(id: i64, category: Category) -> Task {
        Task {
            id,
            description: String::new(),
            due_date: None,
            category,
            completed: false,
        }
    }

    #[test]
    fn test_tally_one_of_each() {
        let tasks = [
            task(1, Category::Work),
            task(2, Category::Personal),
            task(3, Category::Other),
        ];
        assert_eq!(
            tally(&tasks),
            vec![(Category::Work, 1), (Category::Personal, 1), (Category::Other, 1)]
        );
    }

    #[test]
    fn test_tally_orders_by_count_then_first_appearance() {
        let tasks = [
            task(1, Category::Personal),
            task(2, Category::Other),
            task(3, Category::Other),
            task(4, Category::Work),
        ];
        assert_eq!(
            tally(&tasks),
            vec![(Category::Other, 2), (Category::Personal, 1), (Category::Work, 1)]
        );
    }

    #[test]
    fn test_tally_empty() {
        assert!(tally(&[]).is_empty());
        assert!(slices(&[]).is_empty());
    }

    #[test]
    fn test_colours_follow_position_not_category() {
        let a = slices(&[(Category::Work, 3), (Category::Other, 1)]);
        let b = slices(&[(Category::Other, 3), (Category::Work, 1)]);
        assert_eq!((a[0].category, a[0].color), (Category::Work, 0));
        assert_eq!((b[0].category, b[0].color), (Category::Other, 0));
        assert_eq!((b[1].category, b[1].color), (Category::Work, 1));
    }

    #[test]
    fn test_slices_cover_the_circle() {
        let s = slices(&[(Category::Work, 2), (Category::Personal, 1), (Category::Other, 1)]);
        assert_eq!(s[0].start, 0.0);
        assert!((s[0].fraction - 0.5).abs() < 1e-9);
        assert!((s[1].start - PI).abs() < 1e-9);
        let end = s[2].start + s[2].sweep;
        assert!((end - TAU).abs() < 1e-9);
    }

    #[test]
    fn test_clockwise_angle() {
        assert!(clockwise_angle(0.0, 1.0).abs() < 1e-9);
        assert!((clockwise_angle(1.0, 0.0) - FRAC_PI_2).abs() < 1e-9);
        assert!((clockwise_angle(0.0, -1.0) - PI).abs() < 1e-9);
        assert!((clockwise_angle(-1.0, 0.0) - 3.0 * FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_slice_at() {
        let s = slices(&[(Category::Work, 1), (Category::Personal, 1)]);
        assert_eq!(slice_at(&s, 0.1), Some(0));
        assert_eq!(slice_at(&s, PI + 0.1), Some(1));
        assert_eq!(slice_at(&s, TAU - 1e-12), Some(1));
        assert!(slice_at(&[], 1.0).is_none());
    }

    #[test]
    fn test_pie_points_split_by_share() {
        let s = slices(&[(Category::Work, 3), (Category::Other, 1)]);
        let points = pie_points(&s, 0.02);
        let total: usize = points.iter().map(Vec::len).sum();
        let share = points[0].len() as f64 / total as f64;
        assert!((share - 0.75).abs() < 0.02, "share was {share}");
        assert!(points
            .iter()
            .flatten()
            .all(|&(x, y)| x * x + y * y <= 1.0 + 1e-9));
    }
}
