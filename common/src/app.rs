//! Window runner shared by every simulation binary
//!
//! Hosts one page at a time inside a [`FrameLoop`]. Number keys switch pages
//! by unmounting the current scene and mounting a fresh one.
//!
//! Controls:
//! - 1-9: Select page
//! - Space: Pause / resume (scene specific)
//! - R: Reset the page
//! - Mouse: Interact, wheel zooms where supported

use glam::Vec2;
use winit::{
    event::{ElementState, Event, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

use crate::canvas::{CommandRecorder, TextAlign};
use crate::equations_ui::{draw_controls_panel, draw_equations_sidebar};
use crate::error::GraphicsError;
use crate::graphics::{tessellate, CanvasRenderer, GraphicsContext, Tessellation};
use crate::input::{Key, Modifiers, PointerButton, PointerEvent, WheelEvent};
use crate::scene::{FrameLoop, Scene};

const INITIAL_VERTICES: usize = 65_536;

/// A selectable page
pub struct Page {
    pub name: &'static str,
    pub build: fn() -> Box<dyn Scene>,
}

struct EguiState {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

struct App {
    ctx: GraphicsContext,
    renderer: CanvasRenderer,
    pages: &'static [Page],
    current: usize,
    frame_loop: FrameLoop,
    recorder: CommandRecorder,
    cursor: Vec2,
    modifiers: Modifiers,
    egui: EguiState,
}

impl App {
    fn new(ctx: GraphicsContext, pages: &'static [Page]) -> Self {
        let renderer = CanvasRenderer::new(&ctx, INITIAL_VERTICES);
        let size = ctx.surface_size();

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &ctx.window,
            Some(ctx.window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&ctx.device, ctx.config.format, None, 1);

        let mut app = Self {
            ctx,
            renderer,
            pages,
            current: 0,
            frame_loop: FrameLoop::new(),
            recorder: CommandRecorder::new(size.x, size.y),
            cursor: Vec2::ZERO,
            modifiers: Modifiers::default(),
            egui: EguiState {
                ctx: egui_ctx,
                state: egui_state,
                renderer: egui_renderer,
            },
        };
        app.select_page(0);
        app
    }

    fn select_page(&mut self, index: usize) {
        let Some(page) = self.pages.get(index) else {
            return;
        };
        self.current = index;
        let mut scene = (page.build)();
        let size = self.ctx.surface_size();
        scene.resize(size.x, size.y);
        self.frame_loop.mount(scene);
        self.ctx.window.set_title(page.name);
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(new_size);
        let size = self.ctx.surface_size();
        if let Some(scene) = self.frame_loop.scene_mut() {
            scene.resize(size.x, size.y);
        }
    }

    fn update(&mut self, dt: f32) {
        let size = self.ctx.surface_size();
        self.recorder.width = size.x;
        self.recorder.height = size.y;
        self.recorder.commands.clear();
        self.frame_loop.tick(dt, Some(&mut self.recorder));
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let frame = tessellate(&self.recorder.commands);

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let raw_input = self.egui.state.take_egui_input(&self.ctx.window);
        let pixels_per_point = self.ctx.window.scale_factor() as f32;
        let frame_loop = &mut self.frame_loop;
        let full_output = self.egui.ctx.run(raw_input, |ctx| {
            paint_text(ctx, &frame, pixels_per_point);

            if let Some(scene) = frame_loop.scene_mut() {
                let stats = scene.stats();
                draw_controls_panel(ctx, &stats, |ui| scene.controls(ui));
                draw_equations_sidebar(ctx, scene.title(), scene.equations(), scene.variables());
            }
        });

        self.egui
            .state
            .handle_platform_output(&self.ctx.window, full_output.platform_output);
        let tris = self
            .egui
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui
                .renderer
                .update_texture(&self.ctx.device, &self.ctx.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.ctx.size.width, self.ctx.size.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.render(&self.ctx, &mut encoder, &view, &frame);

        self.egui.renderer.update_buffers(
            &self.ctx.device,
            &self.ctx.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.egui
                .renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui.renderer.free_texture(id);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode, state: ElementState) {
        if state != ElementState::Pressed {
            return;
        }

        let digit = match code {
            KeyCode::Digit1 => Some(0),
            KeyCode::Digit2 => Some(1),
            KeyCode::Digit3 => Some(2),
            KeyCode::Digit4 => Some(3),
            KeyCode::Digit5 => Some(4),
            KeyCode::Digit6 => Some(5),
            KeyCode::Digit7 => Some(6),
            KeyCode::Digit8 => Some(7),
            KeyCode::Digit9 => Some(8),
            _ => None,
        };
        if let Some(index) = digit {
            if index != self.current {
                self.select_page(index);
            }
            return;
        }

        let key = match code {
            KeyCode::Space => Key::Space,
            KeyCode::KeyR => Key::Reset,
            KeyCode::Delete | KeyCode::Backspace => Key::Delete,
            KeyCode::Escape => Key::Escape,
            KeyCode::ArrowLeft => Key::Left,
            KeyCode::ArrowRight => Key::Right,
            KeyCode::ArrowUp => Key::Up,
            KeyCode::ArrowDown => Key::Down,
            KeyCode::Equal | KeyCode::NumpadAdd => Key::Plus,
            KeyCode::Minus | KeyCode::NumpadSubtract => Key::Minus,
            other => match letter(other) {
                Some(c) => Key::Char(c),
                None => return,
            },
        };
        log::debug!("Key {:?}", key);
        if let Some(scene) = self.frame_loop.scene_mut() {
            scene.key(key);
        }
    }

    fn handle_pointer(&mut self, event: PointerEvent) {
        if let Some(scene) = self.frame_loop.scene_mut() {
            scene.pointer(event);
        }
    }

    fn handle_scroll(&mut self, delta: f32) {
        let event = WheelEvent {
            position: self.cursor,
            delta,
        };
        if let Some(scene) = self.frame_loop.scene_mut() {
            scene.wheel(event);
        }
    }

    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.egui
            .state
            .on_window_event(&self.ctx.window, event)
            .consumed
    }
}

fn paint_text(ctx: &egui::Context, frame: &Tessellation, pixels_per_point: f32) {
    let painter = ctx.layer_painter(egui::LayerId::background());
    for run in &frame.texts {
        let anchor = match run.style.align {
            TextAlign::Left => egui::Align2::LEFT_CENTER,
            TextAlign::Center => egui::Align2::CENTER_CENTER,
            TextAlign::Right => egui::Align2::RIGHT_CENTER,
        };
        let font = egui::FontId::proportional(run.style.size / pixels_per_point);
        let color = run.style.color;
        painter.text(
            egui::pos2(
                run.position.x / pixels_per_point,
                run.position.y / pixels_per_point,
            ),
            anchor,
            &run.text,
            font,
            egui::Color32::from_rgba_unmultiplied(
                (color.r * 255.0) as u8,
                (color.g * 255.0) as u8,
                (color.b * 255.0) as u8,
                (color.a * 255.0) as u8,
            ),
        );
    }
}

fn letter(code: KeyCode) -> Option<char> {
    const LETTERS: [(KeyCode, char); 25] = [
        (KeyCode::KeyA, 'a'),
        (KeyCode::KeyB, 'b'),
        (KeyCode::KeyC, 'c'),
        (KeyCode::KeyD, 'd'),
        (KeyCode::KeyE, 'e'),
        (KeyCode::KeyF, 'f'),
        (KeyCode::KeyG, 'g'),
        (KeyCode::KeyH, 'h'),
        (KeyCode::KeyI, 'i'),
        (KeyCode::KeyJ, 'j'),
        (KeyCode::KeyK, 'k'),
        (KeyCode::KeyL, 'l'),
        (KeyCode::KeyM, 'm'),
        (KeyCode::KeyN, 'n'),
        (KeyCode::KeyO, 'o'),
        (KeyCode::KeyP, 'p'),
        (KeyCode::KeyQ, 'q'),
        (KeyCode::KeyS, 's'),
        (KeyCode::KeyT, 't'),
        (KeyCode::KeyU, 'u'),
        (KeyCode::KeyV, 'v'),
        (KeyCode::KeyW, 'w'),
        (KeyCode::KeyX, 'x'),
        (KeyCode::KeyY, 'y'),
        (KeyCode::KeyZ, 'z'),
    ];
    LETTERS.iter().find(|(k, _)| *k == code).map(|(_, c)| *c)
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

/// Open a window and run the given pages until it is closed
pub fn run(title: &str, pages: &'static [Page]) -> Result<(), GraphicsError> {
    env_logger::init();

    let (ctx, event_loop) = pollster::block_on(GraphicsContext::new(title, 1280, 760))?;
    log::info!("Starting '{}' with {} page(s)", title, pages.len());

    let mut app = App::new(ctx, pages);
    let mut last_time = std::time::Instant::now();

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { ref event, .. } => {
                let consumed = app.handle_window_event(event);

                match event {
                    WindowEvent::CloseRequested => {
                        app.frame_loop.unmount();
                        elwt.exit();
                    }
                    WindowEvent::Resized(size) => app.resize(*size),
                    WindowEvent::RedrawRequested => {
                        let now = std::time::Instant::now();
                        let dt = (now - last_time).as_secs_f32().min(0.1);
                        last_time = now;

                        app.update(dt);
                        match app.render() {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost) => app.resize(app.ctx.size),
                            Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                            Err(e) => log::warn!("Render error: {:?}", e),
                        }
                    }
                    WindowEvent::ModifiersChanged(modifiers) => {
                        app.modifiers = Modifiers {
                            shift: modifiers.state().shift_key(),
                            ctrl: modifiers.state().control_key(),
                        };
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        app.cursor = Vec2::new(position.x as f32, position.y as f32);
                        if !consumed {
                            app.handle_pointer(PointerEvent::Move {
                                position: app.cursor,
                                modifiers: app.modifiers,
                            });
                        }
                    }
                    WindowEvent::CursorLeft { .. } => app.handle_pointer(PointerEvent::Leave),
                    WindowEvent::MouseInput { state, button, .. } if !consumed => {
                        if let Some(button) = pointer_button(*button) {
                            let event = match state {
                                ElementState::Pressed => PointerEvent::Down {
                                    position: app.cursor,
                                    button,
                                    modifiers: app.modifiers,
                                },
                                ElementState::Released => PointerEvent::Up {
                                    position: app.cursor,
                                    button,
                                },
                            };
                            app.handle_pointer(event);
                        }
                    }
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(key),
                                state,
                                ..
                            },
                        ..
                    } if !consumed => app.handle_key(*key, *state),
                    WindowEvent::MouseWheel { delta, .. } if !consumed => {
                        // winit reports positive y when rolling the wheel away from the user
                        let scroll = match delta {
                            MouseScrollDelta::LineDelta(_, y) => -*y,
                            MouseScrollDelta::PixelDelta(pos) => -(pos.y as f32) / 100.0,
                        };
                        app.handle_scroll(scroll);
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                app.ctx.window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}
