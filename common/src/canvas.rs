//! 2D drawing surface contract
//!
//! Renderers never talk to the GPU directly. They emit [`DrawCommand`]s into a
//! [`Canvas`], which is either the on-screen frame (tessellated and uploaded by
//! [`crate::graphics::CanvasRenderer`]) or a [`CommandRecorder`] used for
//! snapshots in tests.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// RGBA color with components in 0..=1 (sRGB)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Color from 8-bit channels
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Color from a packed `0xRRGGBB` value
    pub fn hex(value: u32) -> Self {
        Self::rgb8((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Gradient color stop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Color,
}

/// Fill paint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Paint {
    Solid(Color),
    Linear {
        start: Vec2,
        end: Vec2,
        stops: Vec<ColorStop>,
    },
    Radial {
        center: Vec2,
        radius: f32,
        stops: Vec<ColorStop>,
    },
}

impl Paint {
    pub fn linear(start: Vec2, end: Vec2, stops: &[(f32, Color)]) -> Self {
        Paint::Linear {
            start,
            end,
            stops: to_stops(stops),
        }
    }

    pub fn radial(center: Vec2, radius: f32, stops: &[(f32, Color)]) -> Self {
        Paint::Radial {
            center,
            radius,
            stops: to_stops(stops),
        }
    }

    /// Color of the paint at a pixel position
    pub fn color_at(&self, point: Vec2) -> Color {
        match self {
            Paint::Solid(color) => *color,
            Paint::Linear { start, end, stops } => {
                let axis = *end - *start;
                let len_sq = axis.length_squared();
                let t = if len_sq > 0.0 {
                    (point - *start).dot(axis) / len_sq
                } else {
                    0.0
                };
                sample_stops(stops, t)
            }
            Paint::Radial {
                center,
                radius,
                stops,
            } => {
                let t = if *radius > 0.0 {
                    point.distance(*center) / radius
                } else {
                    0.0
                };
                sample_stops(stops, t)
            }
        }
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}

fn to_stops(stops: &[(f32, Color)]) -> Vec<ColorStop> {
    stops
        .iter()
        .map(|&(offset, color)| ColorStop { offset, color })
        .collect()
}

fn sample_stops(stops: &[ColorStop], t: f32) -> Color {
    let (first, last) = match (stops.first(), stops.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Color::TRANSPARENT,
    };
    if t <= first.offset {
        return first.color;
    }
    if t >= last.offset {
        return last.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if t >= a.offset && t <= b.offset {
            let span = b.offset - a.offset;
            let local = if span > 0.0 { (t - a.offset) / span } else { 0.0 };
            return a.color.lerp(b.color, local);
        }
    }
    last.color
}

/// Path segment, in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathSegment {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo { control: Vec2, to: Vec2 },
    Arc {
        center: Vec2,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
    },
    Close,
}

/// Builder for a sequence of subpaths
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub segments: Vec<PathSegment>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, p: Vec2) -> Self {
        self.segments.push(PathSegment::MoveTo(p));
        self
    }

    pub fn line_to(mut self, p: Vec2) -> Self {
        self.segments.push(PathSegment::LineTo(p));
        self
    }

    pub fn quad_to(mut self, control: Vec2, to: Vec2) -> Self {
        self.segments.push(PathSegment::QuadTo { control, to });
        self
    }

    /// Arc with angles in radians measured in pixel space (clockwise on screen)
    pub fn arc(mut self, center: Vec2, radius: f32, start_angle: f32, end_angle: f32) -> Self {
        self.segments.push(PathSegment::Arc {
            center,
            radius,
            start_angle,
            end_angle,
        });
        self
    }

    pub fn close(mut self) -> Self {
        self.segments.push(PathSegment::Close);
        self
    }

    pub fn circle(center: Vec2, radius: f32) -> Self {
        Self::new()
            .arc(center, radius, 0.0, std::f32::consts::TAU)
            .close()
    }

    pub fn rect(rect: Rect) -> Self {
        Self::polygon(&rect.corners())
    }

    pub fn polyline(points: &[Vec2]) -> Self {
        let mut path = Self::new();
        for (i, p) in points.iter().enumerate() {
            path = if i == 0 { path.move_to(*p) } else { path.line_to(*p) };
        }
        path
    }

    pub fn polygon(points: &[Vec2]) -> Self {
        Self::polyline(points).close()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Flatten into polylines. The flag marks closed subpaths.
    pub fn flatten(&self, tolerance: f32) -> Vec<(Vec<Vec2>, bool)> {
        let mut out = Vec::new();
        let mut current: Vec<Vec2> = Vec::new();

        for segment in &self.segments {
            match *segment {
                PathSegment::MoveTo(p) => {
                    if current.len() > 1 {
                        out.push((std::mem::take(&mut current), false));
                    }
                    current.clear();
                    current.push(p);
                }
                PathSegment::LineTo(p) => current.push(p),
                PathSegment::QuadTo { control, to } => {
                    let from = current.last().copied().unwrap_or(control);
                    let steps = ((from.distance(control) + control.distance(to)) / tolerance.max(0.1))
                        .ceil()
                        .clamp(2.0, 64.0) as usize;
                    for i in 1..=steps {
                        let t = i as f32 / steps as f32;
                        let a = from.lerp(control, t);
                        let b = control.lerp(to, t);
                        current.push(a.lerp(b, t));
                    }
                }
                PathSegment::Arc {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                } => {
                    let sweep = end_angle - start_angle;
                    let steps = ((sweep.abs() * radius / tolerance.max(0.1)).sqrt() * 2.0)
                        .ceil()
                        .clamp(8.0, 128.0) as usize;
                    for i in 0..=steps {
                        let angle = start_angle + sweep * i as f32 / steps as f32;
                        current.push(center + Vec2::new(angle.cos(), angle.sin()) * radius);
                    }
                }
                PathSegment::Close => {
                    if current.len() > 1 {
                        out.push((std::mem::take(&mut current), true));
                    }
                    current.clear();
                }
            }
        }
        if current.len() > 1 {
            out.push((current, false));
        }
        out
    }
}

/// Axis-aligned rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    pub fn contains(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.min.x && p.x <= max.x && p.y >= self.min.y && p.y <= max.y
    }

    pub fn corners(&self) -> [Vec2; 4] {
        let max = self.max();
        [
            self.min,
            Vec2::new(max.x, self.min.y),
            max,
            Vec2::new(self.min.x, max.y),
        ]
    }
}

/// Stroke style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    /// Alternating dash/gap lengths, empty for a solid line
    pub dash: Vec<f32>,
}

impl Stroke {
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            dash: Vec::new(),
        }
    }

    pub fn dashed(mut self, dash: &[f32]) -> Self {
        self.dash = dash.to_vec();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub color: Color,
    pub size: f32,
    pub align: TextAlign,
}

impl TextStyle {
    pub fn new(color: Color, size: f32) -> Self {
        Self {
            color,
            size,
            align: TextAlign::Left,
        }
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }
}

/// A single drawing instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Clear(Color),
    FillPath { path: Path, paint: Paint },
    StrokePath { path: Path, stroke: Stroke },
    Text {
        position: Vec2,
        text: String,
        style: TextStyle,
    },
}

/// Anything that accepts drawing commands
pub trait Canvas {
    /// Surface size in pixels
    fn size(&self) -> Vec2;

    fn push(&mut self, command: DrawCommand);

    fn clear(&mut self, color: Color) {
        self.push(DrawCommand::Clear(color));
    }

    fn fill_path(&mut self, path: Path, paint: Paint) {
        self.push(DrawCommand::FillPath { path, paint });
    }

    fn stroke_path(&mut self, path: Path, stroke: Stroke) {
        self.push(DrawCommand::StrokePath { path, stroke });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.push(DrawCommand::FillPath {
            path: Path::rect(rect),
            paint: Paint::Solid(color),
        });
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: Stroke) {
        self.stroke_path(Path::rect(rect), stroke);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.push(DrawCommand::FillPath {
            path: Path::circle(center, radius),
            paint: Paint::Solid(color),
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: Stroke) {
        self.stroke_path(Path::circle(center, radius), stroke);
    }

    fn line(&mut self, from: Vec2, to: Vec2, stroke: Stroke) {
        self.stroke_path(Path::new().move_to(from).line_to(to), stroke);
    }

    /// Line with a filled arrow head at `to`
    fn arrow(&mut self, from: Vec2, to: Vec2, color: Color, width: f32, head: f32) {
        let dir = (to - from).normalize_or_zero();
        if dir == Vec2::ZERO {
            return;
        }
        self.line(from, to, Stroke::new(color, width));
        let side = dir.perp() * head * 0.5;
        let base = to - dir * head;
        self.push(DrawCommand::FillPath {
            path: Path::polygon(&[to, base + side, base - side]),
            paint: Paint::Solid(color),
        });
    }

    /// Square background grid covering the whole surface
    fn grid(&mut self, spacing: f32, color: Color) {
        if spacing <= 0.0 {
            return;
        }
        let size = self.size();
        let stroke = Stroke::new(color, 1.0);
        let mut x = 0.0;
        while x <= size.x {
            self.line(Vec2::new(x, 0.0), Vec2::new(x, size.y), stroke.clone());
            x += spacing;
        }
        let mut y = 0.0;
        while y <= size.y {
            self.line(Vec2::new(0.0, y), Vec2::new(size.x, y), stroke.clone());
            y += spacing;
        }
    }

    fn fill_text(&mut self, position: Vec2, text: &str, style: TextStyle) {
        self.push(DrawCommand::Text {
            position,
            text: text.to_string(),
            style,
        });
    }
}

/// Canvas that stores every command, for snapshots
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandRecorder {
    pub width: f32,
    pub height: f32,
    pub commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// All text drawn so far
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count_fills(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillPath { .. }))
            .count()
    }

    pub fn count_strokes(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::StrokePath { .. }))
            .count()
    }
}

impl Canvas for CommandRecorder {
    fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_gradient_endpoints() {
        let paint = Paint::linear(
            Vec2::ZERO,
            Vec2::new(100.0, 0.0),
            &[(0.0, Color::BLACK), (1.0, Color::WHITE)],
        );
        assert_eq!(paint.color_at(Vec2::new(-10.0, 5.0)), Color::BLACK);
        assert_eq!(paint.color_at(Vec2::new(200.0, 5.0)), Color::WHITE);
        let mid = paint.color_at(Vec2::new(50.0, 0.0));
        assert!((mid.r - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_radial_gradient() {
        let paint = Paint::radial(
            Vec2::ZERO,
            10.0,
            &[(0.0, Color::WHITE), (1.0, Color::TRANSPARENT)],
        );
        assert_eq!(paint.color_at(Vec2::ZERO), Color::WHITE);
        assert_eq!(paint.color_at(Vec2::new(20.0, 0.0)).a, 0.0);
    }

    #[test]
    fn test_flatten_circle_is_closed() {
        let subpaths = Path::circle(Vec2::new(5.0, 5.0), 10.0).flatten(0.5);
        assert_eq!(subpaths.len(), 1);
        let (points, closed) = &subpaths[0];
        assert!(*closed);
        for p in points {
            assert!((p.distance(Vec2::new(5.0, 5.0)) - 10.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_flatten_splits_subpaths() {
        let path = Path::new()
            .move_to(Vec2::ZERO)
            .line_to(Vec2::X)
            .move_to(Vec2::Y)
            .line_to(Vec2::ONE);
        assert_eq!(path.flatten(1.0).len(), 2);
    }

    #[test]
    fn test_recorder_collects_commands() {
        let mut recorder = CommandRecorder::new(800.0, 600.0);
        recorder.clear(Color::BLACK);
        recorder.arrow(Vec2::ZERO, Vec2::new(10.0, 0.0), Color::WHITE, 2.0, 4.0);
        recorder.fill_text(Vec2::ZERO, "hi", TextStyle::new(Color::WHITE, 12.0));
        assert_eq!(recorder.count_strokes(), 1);
        assert_eq!(recorder.count_fills(), 1);
        assert_eq!(recorder.texts(), vec!["hi"]);

        // zero-length arrows draw nothing
        recorder.arrow(Vec2::ONE, Vec2::ONE, Color::WHITE, 2.0, 4.0);
        assert_eq!(recorder.count_strokes(), 1);
    }

    #[test]
    fn test_hex_color() {
        let c = Color::hex(0x3b82f6);
        assert!((c.r - 59.0 / 255.0).abs() < 1e-6);
        assert!((c.b - 246.0 / 255.0).abs() < 1e-6);
    }
}
