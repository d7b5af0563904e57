//! Skyhop -- main loop and application entry point.
//!
//! Architecture: winit drives the event loop via `ApplicationHandler`. All simulation
//! runs inside `RedrawRequested` using a **fixed-timestep** model (see `TimeState`):
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed accumulator
//!   2. map held keys to player intents once for the frame
//!   3. `while should_step()` -- advance the game in fixed-dt slices
//!   4. Rebuild the shape mesh from the game state (+ hitbox overlay)
//!   5. Upload camera uniform, issue a single indexed draw
//!
//! The level is embedded at build time; the terminal doubles as the HUD.

mod controller;
mod draw;
mod entities;
mod hud;
mod level;
#[cfg(test)]
mod replay;
mod simulation;

use std::io;
use std::process;
use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use controller::map_intents;
use draw::{build_draw_list, CLEAR_COLOR};
use hud::{Hud, REFRESH_INTERVAL_FRAMES};
use level::{builtin_design, LevelDesign};
use simulation::{GameEvent, GameState, PhysicsConfig};
use skyhop_core::input::{InputState, Key};
use skyhop_core::time::TimeState;
use skyhop_platform::window::PlatformConfig;
use skyhop_render::{Camera2D, GpuContext, ShapeMesh, ShapePipeline, ShapeVertex};

/// All mutable engine state lives here. Constructed lazily in `ApplicationHandler::resumed`
/// once the window and GPU surface are available.
struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    time: TimeState,
    input: InputState,
    camera: Camera2D,
    shape_pipeline: ShapePipeline,
    game: GameState,
    hud: Hud<io::Stdout>,
    show_hitboxes: bool,

    // --- Per-frame GPU mesh state -----------------------------------------------
    // The shape mesh is rebuilt on the CPU each frame, then streamed into these
    // GPU buffers. Buffers grow (power-of-two) but never shrink.
    mesh: ShapeMesh,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_vertex_capacity: usize,
    mesh_index_capacity: usize,
}

impl EngineState {
    fn new(window: Arc<Window>, design: LevelDesign) -> Result<Self, String> {
        let gpu = GpuContext::new(window.clone())?;
        let shape_pipeline = ShapePipeline::new(&gpu.device, gpu.surface_format)?;
        let camera = Camera2D::new();

        let camera_uniform = camera.build_uniform();
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            shape_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 1);
        let index_buffer = create_index_buffer(&gpu.device, 1);

        let game = GameState::new(design, PhysicsConfig::default());
        let mut hud = Hud::new(io::stdout());
        if let Err(e) = hud.print_instructions() {
            log::warn!("Failed to print instructions: {e}");
        }

        Ok(Self {
            window,
            gpu,
            time: TimeState::new(),
            input: InputState::new(),
            camera,
            shape_pipeline,
            game,
            hud,
            show_hitboxes: false,
            mesh: ShapeMesh::with_capacity(256),
            vertex_buffer,
            index_buffer,
            camera_buffer,
            camera_bind_group,
            mesh_vertex_capacity: 0,
            mesh_index_capacity: 0,
        })
    }

    fn handle_game_event(&mut self, event: &GameEvent) {
        if let GameEvent::CoinCollected { index, score } = event {
            log::debug!("Coin {index} collected, score {score}");
        }
        if let Err(e) = self.hud.report(event) {
            log::warn!("HUD write failed: {e}");
        }
    }

    fn rebuild_shape_mesh(&mut self) {
        let commands = build_draw_list(&self.game, self.show_hitboxes);
        self.mesh.clear();
        self.mesh.extend_from_commands(&commands);
        self.ensure_mesh_capacity(self.mesh.vertices.len(), self.mesh.indices.len());

        if !self.mesh.vertices.is_empty() {
            self.gpu.queue.write_buffer(
                &self.vertex_buffer,
                0,
                bytemuck::cast_slice(&self.mesh.vertices),
            );
        }
        if !self.mesh.indices.is_empty() {
            self.gpu.queue.write_buffer(
                &self.index_buffer,
                0,
                bytemuck::cast_slice(&self.mesh.indices),
            );
        }
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.mesh_vertex_capacity {
            self.mesh_vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.mesh_vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.mesh_index_capacity {
            self.mesh_index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.mesh_index_capacity);
        }
    }

    fn render(&mut self) {
        self.rebuild_shape_mesh();

        self.camera.position.x = self.game.camera_offset;
        let camera_uniform = self.camera.build_uniform();
        self.gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera_uniform]),
        );

        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let [r, g, b] = CLEAR_COLOR;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a: 1.0 }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            let index_count = self.mesh.indices.len() as u32;
            if index_count > 0 {
                render_pass.set_pipeline(&self.shape_pipeline.render_pipeline);
                render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..index_count, 0, 0..1);
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

struct App {
    config: PlatformConfig,
    design: Option<LevelDesign>,
    state: Option<EngineState>,
    startup_error: Option<String>,
}

impl App {
    fn new(design: LevelDesign) -> Self {
        Self {
            config: PlatformConfig::default(),
            design: Some(design),
            state: None,
            startup_error: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<EngineState, String> {
        let design = self
            .design
            .take()
            .ok_or_else(|| "Level design already consumed".to_string())?;
        let window = skyhop_platform::window::create_window(event_loop, &self.config)?;
        log::info!(
            "Window created: {}x{}",
            self.config.width,
            self.config.height
        );
        EngineState::new(window, design)
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.startup_error.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(state) => self.state = Some(state),
            Err(e) => {
                log::error!("{e}");
                self.startup_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::Focused(false) => {
                state.input.release_all();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(game_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(game_key),
                            ElementState::Released => state.input.key_up(game_key),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                state.time.begin_frame();
                let intents = map_intents(&state.input);
                if intents.quit {
                    log::info!("Escape pressed, exiting.");
                    event_loop.exit();
                    return;
                }

                let dt = state.time.fixed_dt as f32;
                while state.time.should_step() {
                    // Edge-triggered toggles are consumed by the first step only.
                    if state.time.steps_this_frame == 1 && state.input.is_just_pressed(Key::F4) {
                        state.show_hitboxes = !state.show_hitboxes;
                        log::info!(
                            "Hitbox overlay: {}",
                            if state.show_hitboxes { "ON" } else { "OFF" }
                        );
                    }
                    for game_event in state.game.step(intents, dt) {
                        state.handle_game_event(&game_event);
                    }
                }

                // Only clear edge-triggered input after at least one fixed step
                // consumed it. Otherwise a press that lands on a frame with 0
                // simulation steps is silently lost.
                if state.time.steps_this_frame > 0 {
                    state.input.end_frame();
                }

                if state.time.frame_count % REFRESH_INTERVAL_FRAMES == 0 {
                    if let Err(e) = state.hud.refresh(&state.game) {
                        log::warn!("HUD write failed: {e}");
                    }
                }

                state.render();
            }

            _ => {}
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<ShapeVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Shape Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Shape Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::Space => Some(Key::Space),
        KeyCode::KeyR => Some(Key::R),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::F4 => Some(Key::F4),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Skyhop starting...");

    let design = match builtin_design() {
        Ok(design) => design,
        Err(e) => {
            log::error!("{e}");
            process::exit(1);
        }
    };
    log::info!(
        "Loaded level '{}': {} platforms, {} enemies, {} coins",
        design.level_id,
        design.platforms.len(),
        design.enemies.len(),
        design.coins.len()
    );

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {e}");
            process::exit(1);
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(design);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {e}");
        process::exit(1);
    }
    if app.startup_error.is_some() {
        process::exit(1);
    }
}
