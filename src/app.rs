use anyhow::{anyhow, Context, Result};
use log::info;
use sdl2::{
    event::{Event, WindowEvent},
    keyboard::Keycode,
    mouse::MouseButton,
    pixels::Color,
    rect::Rect,
    render::Canvas,
    video::Window,
    EventPump,
};

use falling_sand::config::{SimulationConfig, WINDOW_SIZE};
use falling_sand::material::Material;
use falling_sand::sand_simulator::{MaterialRenderer, Simulator};
use falling_sand::vec::Vec2;

const BACKGROUND_COLOR: Color = Color::RGB(10, 10, 20);

fn material_color(material: Material) -> Color {
    match material {
        Material::Sand => Color::RGB(200, 170, 120),
        Material::Water => Color::RGB(70, 120, 230),
        Material::Wall => Color::RGB(200, 120, 120),
        Material::Empty => BACKGROUND_COLOR,
    }
}

fn get_sdl_window(sdl_context: &sdl2::Sdl, title: &str, size: Vec2<u32>) -> Result<Window> {
    let video_subsystem = sdl_context.video().map_err(|e| anyhow!(e))?;
    video_subsystem
        .window(title, size.x, size.y)
        .position_centered()
        .resizable()
        .build()
        .context("creating window")
}

/// Draws one filled rect per non-empty cell.
struct CanvasRenderer {
    canvas: Canvas<Window>,
    cell_size: u32,
}

impl MaterialRenderer for CanvasRenderer {
    fn present(&mut self, width: usize, _height: usize, materials: &[Material]) {
        self.canvas.set_draw_color(BACKGROUND_COLOR);
        self.canvas.clear();
        let scale = self.cell_size;
        for (id, &material) in materials.iter().enumerate() {
            if material.is_empty() {
                continue;
            }
            self.canvas.set_draw_color(material_color(material));
            let _ = self.canvas.fill_rect(Rect::new(
                ((id % width) as u32 * scale) as i32,
                ((id / width) as u32 * scale) as i32,
                scale,
                scale,
            ));
        }
        self.canvas.present();
    }
}

pub struct App {
    running: bool,
    simulator: Simulator,
    renderer: CanvasRenderer,
    event_pump: EventPump,
}

impl App {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let sdl_context = sdl2::init().map_err(|e| anyhow!(e))?;
        let window = get_sdl_window(&sdl_context, "sand", *WINDOW_SIZE)?;
        let (w, h) = window.size();
        let canvas = window
            .into_canvas()
            .present_vsync()
            .build()
            .context("creating canvas")?;

        info!("window {}x{}, cell size {}", w, h, config.cell_size);

        Ok(App {
            running: true,
            simulator: Simulator::for_viewport(config, Vec2::new(w, h)),
            renderer: CanvasRenderer {
                canvas,
                cell_size: config.cell_size,
            },
            event_pump: sdl_context.event_pump().map_err(|e| anyhow!(e))?,
        })
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn update(&mut self) {
        self.simulator.frame(&mut self.renderer);
    }

    /// Applies pending SDL events. Only cursor state and the grid size change here;
    /// painting happens inside the next tick.
    pub fn input(&mut self) {
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => self.running = false,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => match key {
                    Keycode::Num1 => self.simulator.select_material(Material::Sand),
                    Keycode::Num2 => self.simulator.select_material(Material::Water),
                    Keycode::Num3 => self.simulator.select_material(Material::Wall),
                    Keycode::Num0 | Keycode::E => self.simulator.select_material(Material::Empty),
                    Keycode::C => self.simulator.clear(),
                    _ => {}
                },
                Event::MouseButtonDown {
                    mouse_btn: MouseButton::Left,
                    x,
                    y,
                    ..
                } => self.simulator.pointer_mut().press(Vec2::new(x, y)),
                Event::MouseButtonUp {
                    mouse_btn: MouseButton::Left,
                    ..
                } => self.simulator.pointer_mut().release(),
                Event::MouseMotion { x, y, .. } => {
                    self.simulator.pointer_mut().move_to(Vec2::new(x, y));
                }
                Event::Window {
                    win_event: WindowEvent::SizeChanged(w, h),
                    ..
                } => {
                    self.simulator
                        .resize_viewport(Vec2::new(w.max(0) as u32, h.max(0) as u32));
                }
                _ => {}
            }
        }
    }
}
