//! Drawing for the graphing board

use common::{axis_label, Canvas, Color, Path, Stroke, TextAlign, TextStyle, Viewport};
use glam::{DVec2, Vec2};

use crate::analysis::{CriticalPoint, Extremum, Tangent};
use crate::geometry::{GeometryBoard, GeometryObject, ObjectId};

pub const BACKGROUND: Color = Color::rgb(0.98, 0.98, 0.98);
const GRID: Color = Color::rgb(0.898, 0.898, 0.898);
const AXIS: Color = Color::rgb(0.4, 0.4, 0.4);
const SELECTED: Color = Color::rgb(0.145, 0.388, 0.922);
const HOVERED: Color = Color::rgb(0.376, 0.647, 0.98);
const INK: Color = Color::rgb(0.1, 0.1, 0.1);

/// Colours handed out to functions and points in turn
pub const PALETTE: [u32; 10] = [
    0x3b82f6, 0xef4444, 0x22c55e, 0xa78bfa, 0xf97316, 0xec4899, 0xeab308, 0x06b6d4, 0x8b5cf6,
    0xf59e0b,
];

pub fn palette(index: usize) -> Color {
    Color::hex(PALETTE[index % PALETTE.len()])
}

fn px(viewport: &Viewport, p: DVec2) -> Vec2 {
    viewport.to_pixel(p).as_vec2()
}

pub fn draw_axes(canvas: &mut dyn Canvas, viewport: &Viewport, show_grid: bool) {
    canvas.clear(BACKGROUND);
    let size = canvas.size();
    let (xs, ys) = viewport.grid_lines();

    if show_grid {
        let stroke = Stroke::new(GRID, 1.0);
        for &x in &xs {
            let gx = px(viewport, DVec2::new(x, 0.0)).x;
            canvas.line(Vec2::new(gx, 0.0), Vec2::new(gx, size.y), stroke.clone());
        }
        for &y in &ys {
            let gy = px(viewport, DVec2::new(0.0, y)).y;
            canvas.line(Vec2::new(0.0, gy), Vec2::new(size.x, gy), stroke.clone());
        }
    }

    let origin = px(viewport, DVec2::ZERO);
    canvas.line(Vec2::new(0.0, origin.y), Vec2::new(size.x, origin.y), Stroke::new(AXIS, 2.0));
    canvas.line(Vec2::new(origin.x, 0.0), Vec2::new(origin.x, size.y), Stroke::new(AXIS, 2.0));

    let half = viewport.grid_spacing() / 2.0;
    let tick = Stroke::new(AXIS, 1.5);
    for &x in xs.iter().filter(|x| x.abs() >= half) {
        let at = Vec2::new(px(viewport, DVec2::new(x, 0.0)).x, origin.y);
        canvas.line(at - Vec2::Y * 5.0, at + Vec2::Y * 5.0, tick.clone());
        canvas.fill_text(
            at + Vec2::new(0.0, 16.0),
            &axis_label(x),
            TextStyle::new(AXIS, 11.0).align(TextAlign::Center),
        );
    }
    for &y in ys.iter().filter(|y| y.abs() >= half) {
        let at = Vec2::new(origin.x, px(viewport, DVec2::new(0.0, y)).y);
        canvas.line(at - Vec2::X * 5.0, at + Vec2::X * 5.0, tick.clone());
        canvas.fill_text(
            at + Vec2::new(-8.0, 4.0),
            &axis_label(y),
            TextStyle::new(AXIS, 11.0).align(TextAlign::Right),
        );
    }
}

/// Pixel-space polylines as produced by `Curve::trace`
pub fn draw_curve(canvas: &mut dyn Canvas, lines: &[Vec<DVec2>], color: Color, width: f32) {
    for line in lines.iter().filter(|line| line.len() >= 2) {
        let points: Vec<Vec2> = line.iter().map(|p| p.as_vec2()).collect();
        canvas.stroke_path(Path::polyline(&points), Stroke::new(color, width));
    }
}

pub fn draw_geometry(
    canvas: &mut dyn Canvas,
    board: &GeometryBoard,
    viewport: &Viewport,
    selected: Option<ObjectId>,
    hovered: Option<ObjectId>,
    pending: &[ObjectId],
) {
    let (min, max) = viewport.visible_bounds();
    let reach = (max - min).length();
    let point = |id: ObjectId| board.point(id).ok();
    let highlight = |id: ObjectId, color: Color| {
        if selected == Some(id) {
            SELECTED
        } else if hovered == Some(id) {
            HOVERED
        } else {
            color
        }
    };

    // constructions first so points sit on top
    for (id, entry) in board.iter().filter(|(_, e)| e.visible) {
        let width = if selected == Some(id) { 3.0 } else { 2.0 };
        match &entry.object {
            GeometryObject::Point { .. } => {}
            GeometryObject::Line { a, b } => {
                let (Some(a), Some(b)) = (point(*a), point(*b)) else { continue };
                let dir = (b - a).normalize_or_zero() * reach;
                canvas.line(
                    px(viewport, a - dir),
                    px(viewport, b + dir),
                    Stroke::new(highlight(id, INK), width),
                );
            }
            GeometryObject::Segment { a, b } => {
                let (Some(a), Some(b)) = (point(*a), point(*b)) else { continue };
                canvas.line(px(viewport, a), px(viewport, b), Stroke::new(highlight(id, INK), width));
            }
            GeometryObject::Circle { center, through } => {
                let (Some(c), Some(t)) = (point(*center), point(*through)) else { continue };
                let radius = (c.distance(t) * viewport.scale) as f32;
                canvas.stroke_circle(px(viewport, c), radius, Stroke::new(highlight(id, INK), width));
            }
            GeometryObject::Polygon { vertices } => {
                let corners: Option<Vec<Vec2>> = vertices
                    .iter()
                    .map(|v| point(*v).map(|p| px(viewport, p)))
                    .collect();
                let Some(corners) = corners else { continue };
                let color = highlight(id, palette(id.0 as usize));
                canvas.fill_path(Path::polygon(&corners), color.with_alpha(0.2).into());
                canvas.stroke_path(Path::polygon(&corners), Stroke::new(color, width));
            }
            GeometryObject::Distance { a, b } => {
                let (Some(a), Some(b)) = (point(*a), point(*b)) else { continue };
                let (pa, pb) = (px(viewport, a), px(viewport, b));
                canvas.line(
                    pa,
                    pb,
                    Stroke::new(highlight(id, AXIS), 1.5).dashed(&[6.0, 4.0]),
                );
                canvas.fill_text(
                    (pa + pb) / 2.0 + Vec2::new(0.0, -8.0),
                    &format!("{:.2}", a.distance(b)),
                    TextStyle::new(INK, 12.0).align(TextAlign::Center),
                );
            }
        }
    }

    for (index, (id, entry)) in board
        .iter()
        .filter(|(_, e)| e.visible)
        .filter(|(_, e)| matches!(e.object, GeometryObject::Point { .. }))
        .enumerate()
    {
        let GeometryObject::Point { position, label } = &entry.object else { continue };
        let at = px(viewport, *position);
        let emphasised = selected == Some(id) || hovered == Some(id) || pending.contains(&id);
        let radius = if emphasised { 6.0 } else { 5.0 };
        canvas.fill_circle(at, radius, highlight(id, palette(index)));
        canvas.stroke_circle(at, radius, Stroke::new(Color::WHITE, 2.0));
        canvas.fill_text(at + Vec2::new(10.0, -10.0), label, TextStyle::new(INK, 12.0));
    }
}

pub fn draw_critical_points(canvas: &mut dyn Canvas, viewport: &Viewport, points: &[CriticalPoint]) {
    for point in points {
        let at = px(viewport, point.position);
        let (color, tag) = match point.kind {
            Extremum::Maximum => (Color::hex(0xef4444), "max"),
            Extremum::Minimum => (Color::hex(0x22c55e), "min"),
        };
        canvas.fill_circle(at, 5.0, color);
        canvas.fill_text(
            at + Vec2::new(8.0, -8.0),
            &format!("{tag} ({:.2}, {:.2})", point.position.x, point.position.y),
            TextStyle::new(color, 11.0),
        );
    }
}

pub fn draw_tangent(canvas: &mut dyn Canvas, viewport: &Viewport, tangent: &Tangent) {
    let (min, max) = viewport.visible_bounds();
    let color = Color::hex(0xf97316);
    canvas.line(
        px(viewport, DVec2::new(min.x, tangent.y_at(min.x))),
        px(viewport, DVec2::new(max.x, tangent.y_at(max.x))),
        Stroke::new(color, 2.0).dashed(&[8.0, 4.0]),
    );
    let at = px(viewport, tangent.point);
    canvas.fill_circle(at, 5.0, color);
    canvas.fill_text(
        at + Vec2::new(8.0, 16.0),
        &format!("slope = {:.3}", tangent.slope),
        TextStyle::new(color, 12.0),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{CommandRecorder, DrawCommand};

    #[test]
    fn test_axis_labels_skip_origin() {
        let mut recorder = CommandRecorder::new(800.0, 600.0);
        draw_axes(&mut recorder, &Viewport::default(), true);
        let texts = recorder.texts();
        assert!(texts.contains(&"1"));
        assert!(texts.contains(&"-7"));
        assert!(!texts.contains(&"0"));
    }

    #[test]
    fn test_grid_toggle() {
        let viewport = Viewport::default();
        let mut with_grid = CommandRecorder::new(800.0, 600.0);
        draw_axes(&mut with_grid, &viewport, true);
        let mut without = CommandRecorder::new(800.0, 600.0);
        draw_axes(&mut without, &viewport, false);
        let (xs, ys) = viewport.grid_lines();
        assert_eq!(with_grid.count_strokes() - without.count_strokes(), xs.len() + ys.len());
    }

    #[test]
    fn test_short_runs_are_skipped() {
        let mut recorder = CommandRecorder::new(800.0, 600.0);
        let lines = vec![vec![DVec2::ZERO], vec![DVec2::ZERO, DVec2::ONE]];
        draw_curve(&mut recorder, &lines, palette(0), 2.5);
        assert_eq!(recorder.count_strokes(), 1);
    }

    #[test]
    fn test_points_drawn_over_constructions() {
        let mut board = GeometryBoard::new();
        let a = board.add_point(DVec2::new(-1.0, 0.0));
        let b = board.add_point(DVec2::new(1.0, 0.0));
        board.add_segment(a, b).unwrap();
        let mut recorder = CommandRecorder::new(800.0, 600.0);
        draw_geometry(&mut recorder, &board, &Viewport::default(), None, None, &[]);
        assert!(matches!(recorder.commands[0], DrawCommand::StrokePath { .. }));
        assert_eq!(recorder.texts(), vec!["A", "B"]);
    }
}
