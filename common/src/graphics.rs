//! Graphics initialization and canvas rasterisation
//!
//! Draw commands are tessellated on the CPU into flat-colored triangles in
//! pixel space and drawn with a single pipeline. Text runs are returned to
//! the caller, which paints them through egui.

use std::sync::Arc;

use glam::Vec2;
use winit::{
    dpi::PhysicalSize,
    event_loop::EventLoop,
    window::{Window, WindowBuilder},
};

use crate::canvas::{Color, DrawCommand, Paint, Stroke, TextStyle};
use crate::error::GraphicsError;

/// Holds all GPU resources needed for rendering
pub struct GraphicsContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: PhysicalSize<u32>,
    pub window: Arc<Window>,
}

impl GraphicsContext {
    /// Create a new graphics context with an associated window
    pub async fn new(
        title: &str,
        width: u32,
        height: u32,
    ) -> Result<(Self, EventLoop<()>), GraphicsError> {
        let event_loop = EventLoop::new()?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(title)
                .with_inner_size(PhysicalSize::new(width, height))
                .build(&event_loop)?,
        );

        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GraphicsError::NoAdapter)?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or(GraphicsError::NoSurfaceFormat)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Ok((
            Self {
                surface,
                device,
                queue,
                config,
                size,
                window,
            },
            event_loop,
        ))
    }

    /// Resize the rendering surface
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn surface_size(&self) -> Vec2 {
        Vec2::new(self.size.width as f32, self.size.height as f32)
    }
}

/// Vertex with pixel position and sRGB color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            wgpu::VertexAttribute {
                offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x4,
            },
        ],
    };

    pub fn new(position: Vec2, color: Color) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct ScreenUniform {
    size: [f32; 2],
    _padding: [f32; 2],
}

/// Text to be laid out by the UI layer
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub position: Vec2,
    pub text: String,
    pub style: TextStyle,
}

/// CPU-side result of tessellating one frame
#[derive(Debug, Clone, Default)]
pub struct Tessellation {
    pub clear: Option<Color>,
    pub vertices: Vec<Vertex>,
    pub texts: Vec<TextRun>,
}

const FLATTEN_TOLERANCE: f32 = 0.5;

/// Convert draw commands into triangles and text runs
pub fn tessellate(commands: &[DrawCommand]) -> Tessellation {
    let mut out = Tessellation::default();

    for command in commands {
        match command {
            DrawCommand::Clear(color) => {
                // a clear discards everything drawn before it
                out.clear = Some(*color);
                out.vertices.clear();
                out.texts.clear();
            }
            DrawCommand::FillPath { path, paint } => {
                for (points, _) in path.flatten(FLATTEN_TOLERANCE) {
                    fill_polygon(&mut out.vertices, &points, paint);
                }
            }
            DrawCommand::StrokePath { path, stroke } => {
                for (mut points, closed) in path.flatten(FLATTEN_TOLERANCE) {
                    if closed {
                        if let Some(first) = points.first().copied() {
                            points.push(first);
                        }
                    }
                    stroke_polyline(&mut out.vertices, &points, stroke);
                }
            }
            DrawCommand::Text {
                position,
                text,
                style,
            } => out.texts.push(TextRun {
                position: *position,
                text: text.clone(),
                style: *style,
            }),
        }
    }

    out
}

/// Convex outlines fan around the centroid so radial gradients keep their
/// centre colour; anything else is ear-clipped.
fn fill_polygon(vertices: &mut Vec<Vertex>, points: &[Vec2], paint: &Paint) {
    let mut outline: Vec<Vec2> = Vec::with_capacity(points.len());
    for &p in points {
        if outline.last() != Some(&p) {
            outline.push(p);
        }
    }
    if outline.len() > 1 && outline.first() == outline.last() {
        outline.pop();
    }
    if outline.len() < 3 {
        return;
    }
    let vertex = |p: Vec2| Vertex::new(p, paint.color_at(p));

    if is_convex(&outline) {
        let centroid = outline.iter().copied().sum::<Vec2>() / outline.len() as f32;
        let center = vertex(centroid);
        for i in 0..outline.len() {
            vertices.push(center);
            vertices.push(vertex(outline[i]));
            vertices.push(vertex(outline[(i + 1) % outline.len()]));
        }
        return;
    }
    for [a, b, c] in ear_clip(&outline) {
        vertices.extend([vertex(outline[a]), vertex(outline[b]), vertex(outline[c])]);
    }
}

fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum::<f32>()
        / 2.0
}

fn is_convex(points: &[Vec2]) -> bool {
    let n = points.len();
    let mut sign = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let c = points[(i + 2) % n];
        let turn = (b - a).perp_dot(c - b);
        if turn.abs() <= f32::EPSILON {
            continue;
        }
        if sign == 0.0 {
            sign = turn.signum();
        } else if turn.signum() != sign {
            return false;
        }
    }
    true
}

/// Triangulate a simple polygon by repeatedly cutting off ears
fn ear_clip(points: &[Vec2]) -> Vec<[usize; 3]> {
    let orientation = signed_area(points).signum();
    let mut remaining: Vec<usize> = (0..points.len()).collect();
    let mut triangles = Vec::with_capacity(points.len().saturating_sub(2));

    while remaining.len() > 3 {
        let n = remaining.len();
        let corner = |i: usize| {
            (
                remaining[(i + n - 1) % n],
                remaining[i],
                remaining[(i + 1) % n],
            )
        };
        let ear = (0..n).find(|&i| {
            let (ia, ib, ic) = corner(i);
            let (a, b, c) = (points[ia], points[ib], points[ic]);
            (b - a).perp_dot(c - b) * orientation > 0.0
                && !remaining.iter().any(|&j| {
                    j != ia && j != ib && j != ic && in_triangle(points[j], a, b, c, orientation)
                })
        });
        match ear {
            Some(i) => {
                let (ia, ib, ic) = corner(i);
                triangles.push([ia, ib, ic]);
                remaining.remove(i);
            }
            None => {
                // only collinear or self-intersecting corners are left
                let (a, b, c) = corner(0);
                let flat = (0..n).find(|&i| {
                    let (ia, ib, ic) = corner(i);
                    (points[ib] - points[ia]).perp_dot(points[ic] - points[ib]).abs() <= f32::EPSILON
                });
                match flat {
                    Some(i) => {
                        remaining.remove(i);
                    }
                    None => {
                        log::trace!("Polygon fill stopped at corner {a}/{b}/{c}");
                        return triangles;
                    }
                }
            }
        }
    }
    if let [a, b, c] = remaining[..] {
        triangles.push([a, b, c]);
    }
    triangles
}

fn in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2, orientation: f32) -> bool {
    [(a, b), (b, c), (c, a)]
        .iter()
        .all(|&(from, to)| (to - from).perp_dot(p - from) * orientation >= 0.0)
}

fn stroke_polyline(vertices: &mut Vec<Vertex>, points: &[Vec2], stroke: &Stroke) {
    let pattern: Vec<f32> = stroke.dash.iter().copied().filter(|d| *d > 0.0).collect();
    let mut dash_index = 0;
    let mut dash_left = pattern.first().copied().unwrap_or(f32::INFINITY);
    let mut drawing = true;

    for pair in points.windows(2) {
        let (mut from, to) = (pair[0], pair[1]);
        let mut remaining = from.distance(to);
        if remaining <= f32::EPSILON {
            continue;
        }
        let dir = (to - from) / remaining;

        while remaining > 0.0 {
            let step = remaining.min(dash_left);
            let end = from + dir * step;
            if drawing {
                segment_quad(vertices, from, end, stroke.width, stroke.color);
            }
            from = end;
            remaining -= step;
            dash_left -= step;
            if dash_left <= 0.0 && !pattern.is_empty() {
                dash_index = (dash_index + 1) % pattern.len();
                dash_left = pattern[dash_index];
                drawing = !drawing;
            }
        }
    }
}

fn segment_quad(vertices: &mut Vec<Vertex>, a: Vec2, b: Vec2, width: f32, color: Color) {
    let normal = (b - a).normalize_or_zero().perp() * (width.max(1.0) * 0.5);
    let corners = [a + normal, b + normal, b - normal, a - normal];
    for index in [0, 1, 2, 0, 2, 3] {
        vertices.push(Vertex::new(corners[index], color));
    }
}

fn srgb_channel_to_linear(c: f32) -> f64 {
    let c = c as f64;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn clear_color(color: Color) -> wgpu::Color {
    wgpu::Color {
        r: srgb_channel_to_linear(color.r),
        g: srgb_channel_to_linear(color.g),
        b: srgb_channel_to_linear(color.b),
        a: color.a as f64,
    }
}

/// Draws tessellated canvas frames
pub struct CanvasRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    screen_buffer: wgpu::Buffer,
    screen_bind_group: wgpu::BindGroup,
}

impl CanvasRenderer {
    pub fn new(ctx: &GraphicsContext, initial_vertices: usize) -> Self {
        let device = &ctx.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Canvas Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/canvas.wgsl").into()),
        });

        let screen_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Screen Buffer"),
            size: std::mem::size_of::<ScreenUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let screen_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Screen Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let screen_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Screen Bind Group"),
            layout: &screen_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: screen_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Canvas Pipeline Layout"),
            bind_group_layouts: &[&screen_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Canvas Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[Vertex::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let vertex_capacity = initial_vertices.max(1024);
        let vertex_buffer = create_vertex_buffer(device, vertex_capacity);

        Self {
            pipeline,
            vertex_buffer,
            vertex_capacity,
            screen_buffer,
            screen_bind_group,
        }
    }

    /// Upload the frame and record its render pass
    pub fn render(
        &mut self,
        ctx: &GraphicsContext,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        frame: &Tessellation,
    ) {
        let size = ctx.surface_size();
        let uniform = ScreenUniform {
            size: [size.x.max(1.0), size.y.max(1.0)],
            _padding: [0.0; 2],
        };
        ctx.queue
            .write_buffer(&self.screen_buffer, 0, bytemuck::cast_slice(&[uniform]));

        if frame.vertices.len() > self.vertex_capacity {
            self.vertex_capacity = frame.vertices.len().next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&ctx.device, self.vertex_capacity);
            log::debug!("Grew canvas vertex buffer to {}", self.vertex_capacity);
        }
        if !frame.vertices.is_empty() {
            ctx.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&frame.vertices));
        }

        let load = match frame.clear {
            Some(color) => wgpu::LoadOp::Clear(clear_color(color)),
            None => wgpu::LoadOp::Clear(wgpu::Color::BLACK),
        };

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Canvas Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if !frame.vertices.is_empty() {
            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.screen_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.draw(0..frame.vertices.len() as u32, 0..1);
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Canvas Vertex Buffer"),
        size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Canvas, CommandRecorder, Path, Rect};

    #[test]
    fn test_rect_fill_triangles() {
        let mut recorder = CommandRecorder::new(100.0, 100.0);
        recorder.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE);
        let frame = tessellate(&recorder.commands);
        // centroid fan, one triangle per edge
        assert_eq!(frame.vertices.len(), 12);
        assert!(frame.vertices.iter().all(|v| v.color == [1.0, 1.0, 1.0, 1.0]));
    }

    fn covered(frame: &Tessellation, p: Vec2) -> bool {
        frame.vertices.chunks(3).any(|t| {
            let [a, b, c] = [t[0], t[1], t[2]].map(|v| Vec2::from(v.position));
            let area = (b - a).perp_dot(c - a).signum();
            in_triangle(p, a, b, c, area)
        })
    }

    #[test]
    fn test_concave_fill_stays_inside() {
        let chevron = [
            Vec2::new(0.0, 0.0),
            Vec2::new(50.0, 40.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(50.0, 100.0),
        ];
        let mut recorder = CommandRecorder::new(100.0, 100.0);
        recorder.fill_path(Path::polygon(&chevron), Color::WHITE.into());
        let frame = tessellate(&recorder.commands);

        assert_eq!(frame.vertices.len(), 6);
        // the notch above (0,0)-(50,40) is outside the chevron
        assert!(!covered(&frame, Vec2::new(40.0, 30.0)));
        assert!(!covered(&frame, Vec2::new(50.0, 20.0)));
        assert!(covered(&frame, Vec2::new(50.0, 60.0)));
        let area: f32 = frame
            .vertices
            .chunks(3)
            .map(|t| {
                let [a, b, c] = [t[0], t[1], t[2]].map(|v| Vec2::from(v.position));
                (b - a).perp_dot(c - a).abs() / 2.0
            })
            .sum();
        assert!((area - 3000.0).abs() < 1e-3);
    }

    #[test]
    fn test_line_stroke_is_quad() {
        let mut recorder = CommandRecorder::new(100.0, 100.0);
        recorder.line(Vec2::ZERO, Vec2::new(10.0, 0.0), Stroke::new(Color::WHITE, 2.0));
        let frame = tessellate(&recorder.commands);
        assert_eq!(frame.vertices.len(), 6);
        let max_y = frame
            .vertices
            .iter()
            .map(|v| v.position[1].abs())
            .fold(0.0, f32::max);
        assert!((max_y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_dashed_stroke_skips_gaps() {
        let mut recorder = CommandRecorder::new(100.0, 100.0);
        recorder.line(
            Vec2::ZERO,
            Vec2::new(20.0, 0.0),
            Stroke::new(Color::WHITE, 1.0).dashed(&[5.0, 5.0]),
        );
        let frame = tessellate(&recorder.commands);
        // two dashes of 5px
        assert_eq!(frame.vertices.len(), 12);
    }

    #[test]
    fn test_clear_resets_frame() {
        let mut recorder = CommandRecorder::new(100.0, 100.0);
        recorder.fill_circle(Vec2::ZERO, 5.0, Color::WHITE);
        recorder.clear(Color::BLACK);
        recorder.fill_text(Vec2::ZERO, "label", TextStyle::new(Color::WHITE, 12.0));
        let frame = tessellate(&recorder.commands);
        assert_eq!(frame.clear, Some(Color::BLACK));
        assert!(frame.vertices.is_empty());
        assert_eq!(frame.texts.len(), 1);
    }
}
