//! One tick of the cellular automaton.
//!
//! Rows are swept top to bottom. Each row picks its horizontal scan direction
//! from a [`ScanSource`]; the same direction decides which way sand and water
//! try to slide first when they cannot fall.

use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::VelocityOverflow;
use super::grid::GridState;
use super::material::Material;
use super::vec::Vec2;

/// Velocity units per extra cell of fall distance.
pub const FALL_DIVISOR: usize = 18;

const DOWN: Vec2<i32> = Vec2::new(0, 1);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScanDirection {
    LeftToRight,
    RightToLeft,
}

impl ScanDirection {
    /// Horizontal sign of the preferred lateral move for this row.
    pub fn sign(self) -> i32 {
        match self {
            ScanDirection::LeftToRight => 1,
            ScanDirection::RightToLeft => -1,
        }
    }
}

pub trait ScanSource {
    fn next_direction(&mut self) -> ScanDirection;
}

/// Coin flip per row.
pub struct RandomScan<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomScan<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomScan<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> ScanSource for RandomScan<R> {
    fn next_direction(&mut self) -> ScanDirection {
        if self.rng.gen_bool(0.5) {
            ScanDirection::LeftToRight
        } else {
            ScanDirection::RightToLeft
        }
    }
}

/// Replays a fixed pattern of directions, repeating it forever.
pub struct FixedScan {
    pattern: Vec<ScanDirection>,
    cursor: usize,
}

impl FixedScan {
    pub fn new(pattern: Vec<ScanDirection>) -> Self {
        Self { pattern, cursor: 0 }
    }

    pub fn always(direction: ScanDirection) -> Self {
        Self::new(vec![direction])
    }
}

impl ScanSource for FixedScan {
    fn next_direction(&mut self) -> ScanDirection {
        if self.pattern.is_empty() {
            return ScanDirection::LeftToRight;
        }
        let direction = self.pattern[self.cursor % self.pattern.len()];
        self.cursor = (self.cursor + 1) % self.pattern.len();
        direction
    }
}

pub struct CellularStepper {
    overflow: VelocityOverflow,
}

impl CellularStepper {
    pub fn new(overflow: VelocityOverflow) -> Self {
        Self { overflow }
    }

    /// Advances every cell once. Moved flags must have been reset beforehand.
    pub fn step(&self, grid: &mut GridState, scan: &mut dyn ScanSource) {
        let (width, height) = (grid.width(), grid.height());
        for y in 0..height {
            let direction = scan.next_direction();
            for i in 0..width {
                let x = match direction {
                    ScanDirection::LeftToRight => i,
                    ScanDirection::RightToLeft => width - 1 - i,
                };
                self.update_cell(grid, x + y * width, direction.sign());
            }
        }
        trace!(
            "tick done: sand={} water={} wall={}",
            grid.count(Material::Sand),
            grid.count(Material::Water),
            grid.count(Material::Wall)
        );
    }

    fn update_cell(&self, grid: &mut GridState, id: usize, tu: i32) {
        let material = grid.material(id);
        if material.is_empty() || grid.is_moved(id) {
            return;
        }

        grid.set_velocity(id, self.overflow.accrue(grid.velocity(id)));
        if !material.is_movable() {
            return;
        }

        if attempt_move(grid, id, DOWN, reach(grid, id)) {
            return;
        }

        match material {
            Material::Water => {
                if !attempt_move(grid, id, Vec2::new(2 * tu, 0), reach(grid, id)) {
                    attempt_move(grid, id, Vec2::new(-2 * tu, 0), reach(grid, id));
                }
            }
            Material::Sand => {
                if !try_slide(grid, id, tu) {
                    try_slide(grid, id, -tu);
                }
            }
            _ => {}
        }
    }
}

fn reach(grid: &GridState, id: usize) -> usize {
    grid.velocity(id) as usize / FALL_DIVISOR
}

fn is_enterable(grid: &GridState, mover: Material, pos: Vec2<i32>) -> bool {
    match grid.index_of(pos) {
        Some(id) => !grid.is_moved(id) && mover.can_enter(grid.material(id)),
        None => false,
    }
}

/// Diagonal step down, refused when a wall sits directly beside the cell.
fn try_slide(grid: &mut GridState, id: usize, side: i32) -> bool {
    let pos = grid.pos_of(id);
    if grid.material_at(pos + Vec2::new(side, 0)) == Material::Wall {
        return false;
    }
    attempt_move(grid, id, Vec2::new(side, 1), reach(grid, id))
}

/// Moves the cell at `id` as far as possible along `direction`, up to
/// `reach + 1` steps, through cells the moving material can enter.
///
/// When even the first step is blocked the cell's velocity is zeroed and
/// `false` is returned. Cells outside the grid block like walls, and so do
/// cells that already received a moving cell this tick.
pub fn attempt_move(grid: &mut GridState, id: usize, direction: Vec2<i32>, reach: usize) -> bool {
    let pos = grid.pos_of(id);
    let mover = grid.material(id);

    let mut dist = 1;
    while dist <= reach + 1 && is_enterable(grid, mover, pos + direction * dist as i32) {
        dist += 1;
    }

    if dist == 1 {
        grid.set_velocity(id, 0);
        return false;
    }

    match grid.index_of(pos + direction * (dist - 1) as i32) {
        Some(to) if to != id => {
            grid.relocate(id, to);
            true
        }
        _ => {
            grid.set_velocity(id, 0);
            false
        }
    }
}
