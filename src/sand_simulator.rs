//! Per-frame orchestration: stroke, reset, step, present.

use log::{debug, info};

use super::brush::{paint_stroke, Stroke};
use super::config::SimulationConfig;
use super::grid::GridState;
use super::material::Material;
use super::stepper::{CellularStepper, RandomScan, ScanSource};
use super::vec::Vec2;

/// Consumes the material grid after every completed tick.
pub trait MaterialRenderer {
    fn present(&mut self, width: usize, height: usize, materials: &[Material]);
}

/// Cursor state fed by the host's input events. It never touches the grid;
/// strokes derived from it are applied inside [`Simulator::tick`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PointerState {
    previous: Vec2<i32>,
    current: Vec2<i32>,
    pressed: bool,
}

impl PointerState {
    pub fn press(&mut self, pos: Vec2<i32>) {
        self.previous = pos;
        self.current = pos;
        self.pressed = true;
    }

    pub fn move_to(&mut self, pos: Vec2<i32>) {
        self.previous = self.current;
        self.current = pos;
    }

    pub fn release(&mut self) {
        self.pressed = false;
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// The stroke between the last two cursor positions, in cell coordinates.
    pub fn stroke(&self, cell_size: u32, radius: i32, material: Material) -> Option<Stroke> {
        if !self.pressed {
            return None;
        }
        Some(Stroke::new(
            self.previous.pixel_to_cell(cell_size),
            self.current.pixel_to_cell(cell_size),
            radius,
            material,
        ))
    }
}

pub struct Simulator {
    grid: GridState,
    config: SimulationConfig,
    stepper: CellularStepper,
    scan: Box<dyn ScanSource>,
    pointer: PointerState,
    current_material: Material,
    pending_stroke: Option<Stroke>,
    ticks: u64,
}

impl Simulator {
    /// Builds a simulator with a random scan source, seeded from `config.seed` when set.
    pub fn new(config: SimulationConfig, width: usize, height: usize) -> Self {
        let scan: Box<dyn ScanSource> = match config.seed {
            Some(seed) => Box::new(RandomScan::seeded(seed)),
            None => Box::new(RandomScan::from_entropy()),
        };
        Self::with_scan(config, width, height, scan)
    }

    pub fn with_scan(
        config: SimulationConfig,
        width: usize,
        height: usize,
        scan: Box<dyn ScanSource>,
    ) -> Self {
        let grid = GridState::new(width, height);
        info!(
            "simulator ready: {}x{} cells, brush radius {}, {:?} velocity",
            grid.width(),
            grid.height(),
            config.brush.radius,
            config.velocity_overflow
        );
        Self {
            grid,
            stepper: CellularStepper::new(config.velocity_overflow),
            config,
            scan,
            pointer: PointerState::default(),
            current_material: Material::Sand,
            pending_stroke: None,
            ticks: 0,
        }
    }

    /// Sizes the grid to cover a viewport of `viewport` pixels.
    pub fn for_viewport(config: SimulationConfig, viewport: Vec2<u32>) -> Self {
        let size = config.grid_size_for(viewport);
        Self::new(config, size.x, size.y)
    }

    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut GridState {
        &mut self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn materials(&self) -> &[Material] {
        self.grid.materials()
    }

    pub fn count(&self, material: Material) -> usize {
        self.grid.count(material)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn pointer_mut(&mut self) -> &mut PointerState {
        &mut self.pointer
    }

    pub fn select_material(&mut self, material: Material) {
        if material != self.current_material {
            debug!("selected {}", material);
        }
        self.current_material = material;
    }

    pub fn current_material(&self) -> Material {
        self.current_material
    }

    /// Queues a stroke for the next tick, replacing one already queued.
    /// A queued stroke takes precedence over the pointer for that tick.
    pub fn queue_stroke(&mut self, stroke: Stroke) {
        self.pending_stroke = Some(stroke);
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.grid.resize(width, height);
    }

    pub fn resize_viewport(&mut self, viewport: Vec2<u32>) {
        let size = self.config.grid_size_for(viewport);
        self.resize(size.x, size.y);
    }

    pub fn clear(&mut self) {
        info!("clearing grid");
        self.grid.clear();
    }

    /// Runs one full tick: pending stroke, moved-flag reset, one step.
    pub fn tick(&mut self) {
        let stroke = self.pending_stroke.take().or_else(|| {
            self.pointer.stroke(
                self.config.cell_size,
                self.config.brush.radius,
                self.current_material,
            )
        });
        if let Some(stroke) = stroke {
            paint_stroke(&mut self.grid, &stroke, self.config.brush.max_line_samples);
        }

        self.grid.reset();
        self.stepper.step(&mut self.grid, self.scan.as_mut());
        self.ticks += 1;
    }

    /// Ticks once and hands the result to `renderer`.
    pub fn frame(&mut self, renderer: &mut dyn MaterialRenderer) {
        self.tick();
        renderer.present(self.grid.width(), self.grid.height(), self.grid.materials());
    }
}
