//! Rasterizes paint/erase strokes onto the grid.
//!
//! A stroke is sampled along the line between the previous and current cursor
//! cells and a disc is stamped at every sample. The line walk stops after
//! `max_line_samples` points, so a very fast drag between two frames leaves
//! gaps at its far end.

use log::debug;

use super::grid::GridState;
use super::material::Material;
use super::vec::Vec2;

/// A single paint gesture between two cursor cells, consumed once per tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Stroke {
    pub from: Vec2<i32>,
    pub to: Vec2<i32>,
    pub radius: i32,
    pub material: Material,
}

impl Stroke {
    pub fn new(from: Vec2<i32>, to: Vec2<i32>, radius: i32, material: Material) -> Self {
        Self {
            from,
            to,
            radius,
            material,
        }
    }

    /// A stroke that stamps a single disc.
    pub fn dab(at: Vec2<i32>, radius: i32, material: Material) -> Self {
        Self::new(at, at, radius, material)
    }
}

/// Bresenham walk from `from` towards `to`, yielding at most `limit` points.
pub struct LineSamples {
    current: Vec2<i32>,
    target: Vec2<i32>,
    delta: Vec2<i32>,
    step: Vec2<i32>,
    err: i32,
    remaining: usize,
    done: bool,
}

impl LineSamples {
    pub fn new(from: Vec2<i32>, to: Vec2<i32>, limit: usize) -> Self {
        let delta = Vec2::new((to.x - from.x).abs(), (to.y - from.y).abs());
        let step = Vec2::new(
            if from.x < to.x { 1 } else { -1 },
            if from.y < to.y { 1 } else { -1 },
        );
        Self {
            current: from,
            target: to,
            delta,
            step,
            err: delta.x - delta.y,
            remaining: limit,
            done: false,
        }
    }
}

impl Iterator for LineSamples {
    type Item = Vec2<i32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let sample = self.current;
        if sample == self.target {
            self.done = true;
            return Some(sample);
        }

        let e2 = 2 * self.err;
        if e2 > -self.delta.y {
            self.err -= self.delta.y;
            self.current.x += self.step.x;
        }
        if e2 < self.delta.x {
            self.err += self.delta.x;
            self.current.y += self.step.y;
        }
        Some(sample)
    }
}

/// Applies `stroke` to the grid.
pub fn paint_stroke(grid: &mut GridState, stroke: &Stroke, max_line_samples: usize) {
    debug!(
        "painting {} from {:?} to {:?} (radius {})",
        stroke.material, stroke.from, stroke.to, stroke.radius
    );
    for center in LineSamples::new(stroke.from, stroke.to, max_line_samples) {
        stamp_disc(grid, center, stroke.radius, stroke.material);
    }
}

/// Writes `material` into every in-bounds cell `center + (dx, dy)` with
/// `dx, dy` in `[-radius, radius)` and `dx² + dy² <= radius²`.
///
/// Offsets are clipped to the grid before the loop, so the work is bounded by
/// the grid size whatever the radius.
pub fn stamp_disc(grid: &mut GridState, center: Vec2<i32>, radius: i32, material: Material) {
    let r = i64::from(radius);
    let (cx, cy) = (i64::from(center.x), i64::from(center.y));
    let (w, h) = (grid.width() as i64, grid.height() as i64);

    for dx in (-r).max(-cx)..r.min(w - cx) {
        for dy in (-r).max(-cy)..r.min(h - cy) {
            if dx * dx + dy * dy <= r * r {
                let pos = Vec2::new((cx + dx) as i32, (cy + dy) as i32);
                write_cell(grid, pos, material);
            }
        }
    }
}

/// Erasing and walls overwrite anything; sand and water only fill empty cells.
fn write_cell(grid: &mut GridState, pos: Vec2<i32>, material: Material) {
    let Some(id) = grid.index_of(pos) else {
        return;
    };
    let overwrite = matches!(material, Material::Empty | Material::Wall);
    if overwrite || grid.material(id).is_empty() {
        grid.set(pos, material);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(from: [i32; 2], to: [i32; 2], limit: usize) -> Vec<[i32; 2]> {
        LineSamples::new(from.into(), to.into(), limit)
            .map(Into::into)
            .collect()
    }

    #[test]
    fn line_includes_both_ends() {
        assert_eq!(samples([0, 0], [3, 0], 20), vec![[0, 0], [1, 0], [2, 0], [3, 0]]);
        assert_eq!(samples([2, 2], [0, 0], 20), vec![[2, 2], [1, 1], [0, 0]]);
        assert_eq!(samples([5, 5], [5, 5], 20), vec![[5, 5]]);
    }

    #[test]
    fn line_is_capped() {
        let points = samples([0, 0], [100, 0], 20);
        assert_eq!(points.len(), 20);
        assert_eq!(points.last(), Some(&[19, 0]));
    }

    #[test]
    fn disc_shape_is_half_open() {
        let mut grid = GridState::new(10, 10);
        stamp_disc(&mut grid, Vec2::new(5, 5), 1, Material::Wall);
        // dx, dy in [-1, 1) with dx² + dy² <= 1
        let expected = [[5, 5], [4, 5], [5, 4]];
        assert_eq!(grid.count(Material::Wall), expected.len());
        for pos in expected {
            assert_eq!(grid.material_at(pos.into()), Material::Wall);
        }
    }

    #[test]
    fn stamping_near_edges_is_clipped() {
        let mut grid = GridState::new(4, 4);
        stamp_disc(&mut grid, Vec2::new(0, 0), 3, Material::Sand);
        stamp_disc(&mut grid, Vec2::new(-10, 20), 3, Material::Sand);
        assert!(grid.count(Material::Sand) > 0);
        assert_eq!(grid.material_at(Vec2::new(3, 3)), Material::Empty);
    }

    #[test]
    fn huge_radius_covers_the_grid() {
        let mut grid = GridState::new(8, 6);
        grid.set(Vec2::new(3, 3), Material::Water);
        paint_stroke(&mut grid, &Stroke::dab(Vec2::new(4, 3), 50_000, Material::Sand), 20);
        assert_eq!(grid.count(Material::Sand), grid.len() - 1);
        assert_eq!(grid.material_at(Vec2::new(3, 3)), Material::Water);

        stamp_disc(&mut grid, Vec2::new(-70_000, 90_000), i32::MAX, Material::Empty);
        assert_eq!(grid.count(Material::Empty), grid.len());
    }

    #[test]
    fn paint_does_not_overwrite_matter() {
        let mut grid = GridState::new(8, 8);
        grid.set(Vec2::new(2, 2), Material::Water);
        let water_id = grid.index_of(Vec2::new(2, 2)).unwrap();
        grid.set_velocity(water_id, 30);

        paint_stroke(&mut grid, &Stroke::dab(Vec2::new(2, 2), 2, Material::Sand), 20);

        assert_eq!(grid.material_at(Vec2::new(2, 2)), Material::Water);
        assert_eq!(grid.velocity_at(Vec2::new(2, 2)), Some(30));
        assert_eq!(grid.material_at(Vec2::new(1, 2)), Material::Sand);
    }

    #[test]
    fn erase_and_wall_overwrite() {
        let mut grid = GridState::new(8, 8);
        stamp_disc(&mut grid, Vec2::new(4, 4), 3, Material::Sand);
        stamp_disc(&mut grid, Vec2::new(4, 4), 1, Material::Wall);
        assert_eq!(grid.material_at(Vec2::new(4, 4)), Material::Wall);

        paint_stroke(&mut grid, &Stroke::dab(Vec2::new(4, 4), 4, Material::Empty), 20);
        assert_eq!(grid.count(Material::Empty), grid.len());
    }

    #[test]
    fn stroke_covers_segment() {
        let mut grid = GridState::new(32, 8);
        let stroke = Stroke::new(Vec2::new(2, 4), Vec2::new(12, 4), 1, Material::Wall);
        paint_stroke(&mut grid, &stroke, 20);
        for x in 2..=12 {
            assert_eq!(grid.material_at(Vec2::new(x, 4)), Material::Wall);
        }
        assert_eq!(grid.material_at(Vec2::new(14, 4)), Material::Empty);
    }
}
