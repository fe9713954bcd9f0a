//! Structure-of-arrays storage for the simulation.
//!
//! Cell `(x, y)` lives at index `x + y * width`; `y` grows downward, the same
//! direction gravity pulls.

use log::{debug, info};

use super::material::Material;
use super::vec::Vec2;

pub struct GridState {
    width: usize,
    height: usize,
    materials: Vec<Material>,
    velocity_y: Vec<u8>,
    moved: Vec<bool>,
}

impl GridState {
    /// Allocates an empty grid. Zero dimensions are clamped to 1.
    pub fn new(width: usize, height: usize) -> Self {
        let (width, height) = clamp_dimensions(width, height);
        let size = width * height;
        Self {
            width,
            height,
            materials: vec![Material::Empty; size],
            velocity_y: vec![0; size],
            moved: vec![false; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Flat index of a cell, or `None` when the coordinates fall outside the grid.
    pub fn index_of(&self, pos: Vec2<i32>) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        let (x, y) = (pos.x as usize, pos.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(x + y * self.width)
    }

    pub fn pos_of(&self, id: usize) -> Vec2<i32> {
        Vec2::new((id % self.width) as i32, (id / self.width) as i32)
    }

    /// Material at `pos`; everything outside the grid reads as `Wall`.
    pub fn material_at(&self, pos: Vec2<i32>) -> Material {
        self.index_of(pos)
            .map_or(Material::Wall, |id| self.materials[id])
    }

    pub fn velocity_at(&self, pos: Vec2<i32>) -> Option<u8> {
        self.index_of(pos).map(|id| self.velocity_y[id])
    }

    /// Writes a material and resets the cell's velocity. Out-of-bounds writes are dropped.
    pub fn set(&mut self, pos: Vec2<i32>, material: Material) -> bool {
        match self.index_of(pos) {
            Some(id) => {
                self.materials[id] = material;
                self.velocity_y[id] = 0;
                true
            }
            None => false,
        }
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub(crate) fn material(&self, id: usize) -> Material {
        self.materials[id]
    }

    pub(crate) fn velocity(&self, id: usize) -> u8 {
        self.velocity_y[id]
    }

    pub(crate) fn set_velocity(&mut self, id: usize, velocity: u8) {
        self.velocity_y[id] = velocity;
    }

    pub(crate) fn is_moved(&self, id: usize) -> bool {
        self.moved[id]
    }

    /// Whether the cell at `pos` has moved during the current tick.
    pub fn is_moved_at(&self, pos: Vec2<i32>) -> bool {
        self.index_of(pos).map_or(false, |id| self.moved[id])
    }

    pub fn moved_count(&self) -> usize {
        self.moved.iter().filter(|&&m| m).count()
    }

    /// Moves the state of `from` into `to`, marking `to` as moved for this tick.
    /// Whatever `to` held before is written back into `from` with zero velocity;
    /// a displaced non-empty cell counts as moved too.
    pub(crate) fn relocate(&mut self, from: usize, to: usize) {
        if from == to {
            self.moved[to] = true;
            return;
        }
        debug_assert!(!self.moved[from], "cell {} relocated twice in one tick", from);
        debug_assert!(!self.moved[to], "cell {} received two moves in one tick", to);
        let displaced = self.materials[to];
        self.materials[to] = self.materials[from];
        self.velocity_y[to] = self.velocity_y[from];
        self.moved[to] = true;
        self.materials[from] = displaced;
        self.velocity_y[from] = 0;
        self.moved[from] = !displaced.is_empty();
    }

    /// Clears every moved flag ahead of a new tick.
    pub fn reset(&mut self) {
        self.moved.iter_mut().for_each(|m| *m = false);
    }

    /// Empties every cell without changing the dimensions.
    pub fn clear(&mut self) {
        self.materials.iter_mut().for_each(|m| *m = Material::Empty);
        self.velocity_y.iter_mut().for_each(|v| *v = 0);
        self.reset();
    }

    /// Reallocates the grid, copying every cell that lies inside both the old and
    /// the new bounds. Cells outside the old bounds start empty.
    pub fn resize(&mut self, new_width: usize, new_height: usize) {
        let (new_width, new_height) = clamp_dimensions(new_width, new_height);
        if (new_width, new_height) == (self.width, self.height) {
            self.reset();
            return;
        }

        let size = new_width * new_height;
        let mut materials = vec![Material::Empty; size];
        let mut velocity_y = vec![0; size];

        for y in 0..self.height.min(new_height) {
            for x in 0..self.width.min(new_width) {
                let old_id = x + y * self.width;
                let new_id = x + y * new_width;
                materials[new_id] = self.materials[old_id];
                velocity_y[new_id] = self.velocity_y[old_id];
            }
        }

        info!(
            "grid resized from {}x{} to {}x{}",
            self.width, self.height, new_width, new_height
        );

        self.width = new_width;
        self.height = new_height;
        self.materials = materials;
        self.velocity_y = velocity_y;
        self.moved = vec![false; size];
    }

    pub fn count(&self, material: Material) -> usize {
        self.materials.iter().filter(|&&m| m == material).count()
    }
}

fn clamp_dimensions(width: usize, height: usize) -> (usize, usize) {
    if width == 0 || height == 0 {
        debug!("clamping degenerate grid size {}x{}", width, height);
    }
    (width.max(1), height.max(1))
}
