//! Interactive graphing and geometry scene

use common::{Canvas, Equation, Key, PointerButton, PointerEvent, Scene, Viewport, WheelEvent};
use glam::{DVec2, Vec2};

use crate::analysis::Function;
use crate::curve::{parse_input, trace_columns, Curve, CurveError, Input};
use crate::equations_ui::*;
use crate::expression::Calculator;
use crate::geometry::{GeometryBoard, GeometryError, ObjectId};
use crate::parameters::Parameters;
use crate::renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Select,
    Point,
    Line,
    Segment,
    Circle,
    Polygon,
    Distance,
}

impl Tool {
    pub const ALL: [Tool; 7] = [
        Tool::Select,
        Tool::Point,
        Tool::Line,
        Tool::Segment,
        Tool::Circle,
        Tool::Polygon,
        Tool::Distance,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Point => "Point",
            Tool::Line => "Line",
            Tool::Segment => "Segment",
            Tool::Circle => "Circle",
            Tool::Polygon => "Polygon",
            Tool::Distance => "Distance",
        }
    }

    /// Points a two-point construction needs
    fn arity(self) -> Option<usize> {
        match self {
            Tool::Line | Tool::Segment | Tool::Circle | Tool::Distance => Some(2),
            _ => None,
        }
    }
}

/// Entries of the shapes menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Ellipse,
    Hyperbola,
    Parabola,
    Heart,
    Sine,
    Cosine,
}

impl Shape {
    pub const ALL: [Shape; 7] = [
        Shape::Circle,
        Shape::Ellipse,
        Shape::Hyperbola,
        Shape::Parabola,
        Shape::Heart,
        Shape::Sine,
        Shape::Cosine,
    ];

    pub fn input(self) -> &'static str {
        match self {
            Shape::Circle => "circle(r)",
            Shape::Ellipse => "ellipse(a, b)",
            Shape::Hyperbola => "hyperbola(a, b)",
            Shape::Parabola => "a*x^2",
            Shape::Heart => "heart",
            Shape::Sine => "a*sin(b*x)",
            Shape::Cosine => "a*cos(b*x)",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Shape::Circle => "Circle",
            Shape::Ellipse => "Ellipse",
            Shape::Hyperbola => "Hyperbola",
            Shape::Parabola => "Parabola",
            Shape::Heart => "Heart",
            Shape::Sine => "Sine wave",
            Shape::Cosine => "Cosine wave",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FunctionEntry {
    pub input: String,
    pub curve: Result<Curve, CurveError>,
    pub visible: bool,
    pub color: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisOptions {
    pub derivative: bool,
    pub critical_points: bool,
    pub tangent: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Drag {
    Pan { last: Vec2 },
    Point(ObjectId),
}

pub struct GraphingScene {
    evaluator: Calculator,
    viewport: Viewport,
    functions: Vec<FunctionEntry>,
    parameters: Parameters,
    board: GeometryBoard,
    tool: Tool,
    /// Points picked so far for the construction in progress
    pending: Vec<ObjectId>,
    selected: Option<ObjectId>,
    hovered: Option<ObjectId>,
    drag: Option<Drag>,
    show_grid: bool,
    analysis: AnalysisOptions,
    tangent_x: Option<f64>,
    draft: String,
    next_color: usize,
}

impl GraphingScene {
    pub fn new() -> Self {
        Self {
            evaluator: Calculator::new(),
            viewport: Viewport::new(800.0, 600.0),
            functions: Vec::new(),
            parameters: Parameters::new(),
            board: GeometryBoard::new(),
            tool: Tool::Select,
            pending: Vec::new(),
            selected: None,
            hovered: None,
            drag: None,
            show_grid: true,
            analysis: AnalysisOptions::default(),
            tangent_x: None,
            draft: String::new(),
            next_color: 0,
        }
    }

    fn to_graph(&self, position: Vec2) -> DVec2 {
        self.viewport.to_sim(position.as_dvec2())
    }

    fn sync_parameters(&mut self) {
        let expressions: Vec<&str> = self
            .functions
            .iter()
            .filter_map(|f| f.curve.as_ref().ok())
            .flat_map(Curve::expressions)
            .collect();
        self.parameters.sync(expressions);
    }

    /// Add a line of input: a function, an equation, a shorthand or a point
    pub fn submit(&mut self, text: &str) -> Result<(), CurveError> {
        match parse_input(text)? {
            Input::Point { label, position } => {
                self.board.define_point(&label, position);
            }
            Input::Curve(curve) => {
                log::info!("Plotting {}", curve.describe());
                self.functions.push(FunctionEntry {
                    input: text.trim().to_string(),
                    curve: Ok(curve),
                    visible: true,
                    color: self.next_color,
                });
                self.next_color += 1;
                self.sync_parameters();
            }
        }
        Ok(())
    }

    /// Re-parse an edited entry. Point notation turns the entry into a point.
    pub fn edit_function(&mut self, index: usize, text: &str) {
        let Some(entry) = self.functions.get_mut(index) else { return };
        entry.input = text.to_string();
        match parse_input(text) {
            Ok(Input::Point { label, position }) => {
                self.functions.remove(index);
                self.board.define_point(&label, position);
            }
            Ok(Input::Curve(curve)) => entry.curve = Ok(curve),
            Err(err) => entry.curve = Err(err),
        }
        self.sync_parameters();
    }

    pub fn remove_function(&mut self, index: usize) {
        if index < self.functions.len() {
            self.functions.remove(index);
            self.sync_parameters();
        }
    }

    pub fn add_shape(&mut self, shape: Shape) {
        if let Err(err) = self.submit(shape.input()) {
            log::warn!("Could not add {}: {err}", shape.label());
        }
    }

    pub fn select_tool(&mut self, tool: Tool) {
        if self.tool != tool {
            self.tool = tool;
            self.pending.clear();
            log::debug!("Tool: {}", tool.label());
        }
    }

    /// The function analysed by the derivative, extrema and tangent tools
    fn analysed(&self) -> Option<&str> {
        self.functions
            .iter()
            .filter(|f| f.visible)
            .find_map(|f| match &f.curve {
                Ok(Curve::Explicit { expr }) => Some(expr.as_str()),
                _ => None,
            })
    }

    fn function(&self) -> Option<Function<'_, Calculator>> {
        self.analysed()
            .map(|expr| Function::new(&self.evaluator, expr, self.parameters.scope()))
    }

    pub fn delete_selected(&mut self) -> Result<Vec<ObjectId>, GeometryError> {
        let Some(id) = self.selected.take() else {
            return Ok(Vec::new());
        };
        let removed = self.board.delete(id)?;
        self.pending.retain(|p| !removed.contains(p));
        if self.hovered.is_some_and(|h| removed.contains(&h)) {
            self.hovered = None;
        }
        Ok(removed)
    }

    /// Existing point under the pointer, or a new one
    fn pick_or_create(&mut self, position: Vec2) -> ObjectId {
        match self.board.hit_test(&self.viewport, position.as_dvec2()) {
            Some(id) if self.board.point(id).is_ok() => id,
            _ => self.board.add_point(self.to_graph(position)),
        }
    }

    fn construct(&mut self, position: Vec2) {
        let id = self.pick_or_create(position);
        if self.tool == Tool::Polygon {
            if self.pending.len() >= 3 && self.pending.first() == Some(&id) {
                let vertices = std::mem::take(&mut self.pending);
                if let Err(err) = self.board.add_polygon(&vertices) {
                    log::warn!("Polygon not created: {err}");
                }
            } else if !self.pending.contains(&id) {
                self.pending.push(id);
            }
            return;
        }
        if self.pending.last() != Some(&id) {
            self.pending.push(id);
        }
        if Some(self.pending.len()) == self.tool.arity() {
            let (a, b) = (self.pending[0], self.pending[1]);
            self.pending.clear();
            let result = match self.tool {
                Tool::Line => self.board.add_line(a, b),
                Tool::Segment => self.board.add_segment(a, b),
                Tool::Circle => self.board.add_circle(a, b),
                _ => self.board.add_distance(a, b),
            };
            if let Err(err) = result {
                log::warn!("{} not created: {err}", self.tool.label());
            }
        }
    }
}

impl Default for GraphingScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for GraphingScene {
    fn title(&self) -> &str {
        "Graphing & Geometry"
    }

    fn update(&mut self, _dt: f32) {}

    fn draw(&self, canvas: &mut dyn Canvas) {
        let viewport = &self.viewport;
        renderer::draw_axes(canvas, viewport, self.show_grid);

        let scope = self.parameters.scope();
        for entry in self.functions.iter().filter(|f| f.visible) {
            if let Ok(curve) = &entry.curve {
                let lines = curve.trace(&self.evaluator, &scope, viewport);
                renderer::draw_curve(canvas, &lines, renderer::palette(entry.color), 2.5);
            }
        }

        if let Some(function) = self.function() {
            if self.analysis.derivative {
                let lines = trace_columns(viewport, |x| function.derivative(x));
                let color = renderer::palette(0).with_alpha(0.6);
                renderer::draw_curve(canvas, &lines, color, 1.5);
            }
            if self.analysis.critical_points {
                let (min, max) = viewport.visible_bounds();
                let points = function.critical_points(min.x, max.x);
                renderer::draw_critical_points(canvas, viewport, &points);
            }
            if self.analysis.tangent {
                if let Some(tangent) = self.tangent_x.and_then(|x| function.tangent(x)) {
                    renderer::draw_tangent(canvas, viewport, &tangent);
                }
            }
        }

        renderer::draw_geometry(
            canvas,
            &self.board,
            viewport,
            self.selected,
            self.hovered,
            &self.pending,
        );
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.viewport.resize(width as f64, height as f64);
    }

    fn pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                position,
                button: PointerButton::Primary,
                modifiers,
            } => {
                if modifiers.shift {
                    self.tangent_x = Some(self.to_graph(position).x);
                    self.analysis.tangent = true;
                    return;
                }
                let hit = self.board.hit_test(&self.viewport, position.as_dvec2());
                match self.tool {
                    Tool::Select => {
                        self.selected = hit;
                        self.drag = Some(match hit {
                            Some(id) => Drag::Point(id),
                            None => Drag::Pan { last: position },
                        });
                    }
                    Tool::Point => {
                        let id = self.board.add_point(self.to_graph(position));
                        self.selected = Some(id);
                    }
                    _ => self.construct(position),
                }
            }
            PointerEvent::Move { position, .. } => match self.drag {
                Some(Drag::Point(id)) => {
                    let target = self.to_graph(position);
                    if let Err(err) = self.board.move_point(id, target) {
                        log::debug!("Drag stopped: {err}");
                        self.drag = None;
                    }
                }
                Some(Drag::Pan { last }) => {
                    self.viewport.pan((position - last).as_dvec2());
                    self.drag = Some(Drag::Pan { last: position });
                }
                None => {
                    self.hovered = self.board.hit_test(&self.viewport, position.as_dvec2());
                }
            },
            PointerEvent::Up { .. } => self.drag = None,
            PointerEvent::Leave => {
                self.drag = None;
                self.hovered = None;
            }
            _ => {}
        }
    }

    fn wheel(&mut self, event: WheelEvent) {
        self.viewport.zoom(event.delta as f64);
    }

    fn key(&mut self, key: Key) {
        match key {
            Key::Delete => {
                if let Err(err) = self.delete_selected() {
                    log::warn!("Delete failed: {err}");
                }
            }
            Key::Escape => {
                self.pending.clear();
                self.select_tool(Tool::Select);
            }
            Key::Plus => self.viewport.zoom_in(),
            Key::Minus => self.viewport.zoom_out(),
            Key::Reset => self.viewport.reset(),
            Key::Char('s') => self.select_tool(Tool::Select),
            Key::Char('p') => self.select_tool(Tool::Point),
            Key::Char('l') => self.select_tool(Tool::Line),
            Key::Char('g') => self.select_tool(Tool::Segment),
            Key::Char('c') => self.select_tool(Tool::Circle),
            Key::Char('o') => self.select_tool(Tool::Polygon),
            Key::Char('d') => self.select_tool(Tool::Distance),
            _ => {}
        }
    }

    fn equations(&self) -> &'static [Equation] {
        GRAPHING_EQUATIONS
    }

    fn variables(&self) -> &'static [(&'static str, &'static str)] {
        GRAPHING_VARIABLES
    }

    fn stats(&self) -> Vec<(&'static str, String)> {
        let mut stats = vec![
            ("Tool", self.tool.label().to_string()),
            ("Functions", self.functions.len().to_string()),
            ("Objects", self.board.len().to_string()),
            ("Scale", format!("{:.1} px/unit", self.viewport.scale)),
            (
                "Center",
                format!("({:.2}, {:.2})", self.viewport.center.x, self.viewport.center.y),
            ),
        ];
        if let Some(text) = self.selected.and_then(|id| self.board.describe(id)) {
            stats.push(("Selected", text));
        }
        stats
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            for tool in Tool::ALL {
                if ui.selectable_label(self.tool == tool, tool.label()).clicked() {
                    self.select_tool(tool);
                }
            }
        });

        ui.separator();
        ui.label("Functions");
        let mut edited = None;
        let mut removed = None;
        for (i, entry) in self.functions.iter_mut().enumerate() {
            ui.horizontal(|ui| {
                ui.checkbox(&mut entry.visible, "");
                let mut text = entry.input.clone();
                if ui.text_edit_singleline(&mut text).changed() {
                    edited = Some((i, text));
                }
                if ui.small_button("✕").clicked() {
                    removed = Some(i);
                }
            });
            if let Err(err) = &entry.curve {
                ui.colored_label(egui::Color32::RED, err.to_string());
            }
        }
        if let Some((i, text)) = edited {
            self.edit_function(i, &text);
        } else if let Some(i) = removed {
            self.remove_function(i);
        }

        let response = ui.text_edit_singleline(&mut self.draft);
        if response.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter)) {
            let draft = std::mem::take(&mut self.draft);
            if let Err(err) = self.submit(&draft) {
                log::warn!("Ignored input '{draft}': {err}");
            }
        }
        ui.horizontal_wrapped(|ui| {
            for shape in Shape::ALL {
                if ui.button(shape.label()).clicked() {
                    self.add_shape(shape);
                }
            }
        });

        if !self.parameters.is_empty() {
            ui.separator();
            ui.label("Parameters");
            for (name, parameter) in self.parameters.iter_mut() {
                ui.add(egui::Slider::new(&mut parameter.value, parameter.min..=parameter.max).text(name));
            }
        }

        ui.separator();
        ui.checkbox(&mut self.show_grid, "Show grid");
        ui.checkbox(&mut self.board.snap_to_grid, "Snap to grid");
        ui.checkbox(&mut self.analysis.derivative, "Show derivative");
        ui.checkbox(&mut self.analysis.critical_points, "Show critical points");
        ui.checkbox(&mut self.analysis.tangent, "Show tangent (Shift+Click)");
        ui.horizontal(|ui| {
            if ui.button("Zoom In").clicked() {
                self.viewport.zoom_in();
            }
            if ui.button("Zoom Out").clicked() {
                self.viewport.zoom_out();
            }
            if ui.button("Reset View").clicked() {
                self.viewport.reset();
            }
        });
        ui.horizontal(|ui| {
            if ui.button("Delete Selected").clicked() {
                if let Err(err) = self.delete_selected() {
                    log::warn!("Delete failed: {err}");
                }
            }
            if ui.button("Clear Board").clicked() {
                self.board.clear();
                self.pending.clear();
                self.selected = None;
            }
        });

        if !self.board.is_empty() {
            ui.separator();
            ui.label("Algebra");
            let lines: Vec<String> = self
                .board
                .iter()
                .filter_map(|(id, _)| self.board.describe(id))
                .collect();
            for line in lines {
                ui.monospace(line);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::constants::FRAME_DT;
    use crate::expression::Evaluator;
    use common::{CommandRecorder, FrameLoop, Modifiers};

    fn click(scene: &mut GraphingScene, position: Vec2) {
        scene.pointer(PointerEvent::Down {
            position,
            button: PointerButton::Primary,
            modifiers: Modifiers::default(),
        });
        scene.pointer(PointerEvent::Up {
            position,
            button: PointerButton::Primary,
        });
    }

    #[test]
    fn test_submit_discovers_parameters() {
        let mut scene = GraphingScene::new();
        scene.submit("a*sin(b*x)").unwrap();
        scene.add_shape(Shape::Circle);
        let names: Vec<&str> = scene.parameters.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["a", "b", "r"]);

        scene.remove_function(0);
        let names: Vec<&str> = scene.parameters.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["r"]);
    }

    #[test]
    fn test_typed_formula_with_parameter_draws() {
        let mut scene = GraphingScene::new();
        scene.submit("k*x^2 + 2*x - 1").unwrap();
        assert_eq!(scene.parameters.get("k").map(|p| p.value), Some(1.0));

        let mut bare = CommandRecorder::new(800.0, 600.0);
        GraphingScene::new().draw(&mut bare);
        let mut recorder = CommandRecorder::new(800.0, 600.0);
        scene.draw(&mut recorder);
        assert_eq!(recorder.count_strokes(), bare.count_strokes() + 1);

        // the slider value reaches the evaluator
        scene.parameters.set("k", 0.0);
        let scope = scene.parameters.scope().with("x", 3.0);
        assert_eq!(scene.evaluator.evaluate("k*x^2 + 2*x - 1", &scope), Ok(5.0));
    }

    #[test]
    fn test_point_notation_edits_become_points() {
        let mut scene = GraphingScene::new();
        scene.submit("x^2").unwrap();
        scene.edit_function(0, "A = (2, 3)");
        assert!(scene.functions.is_empty());
        let a = scene.board.find_label("A").unwrap();
        assert_eq!(scene.board.point(a).unwrap(), DVec2::new(2.0, 3.0));

        scene.submit("A = (0, 1)").unwrap();
        assert_eq!(scene.board.len(), 1);
        assert_eq!(scene.board.point(a).unwrap(), DVec2::new(0.0, 1.0));
    }

    #[test]
    fn test_segment_tool_reuses_points() {
        let mut scene = GraphingScene::new();
        scene.key(Key::Char('g'));
        click(&mut scene, Vec2::new(400.0, 300.0));
        click(&mut scene, Vec2::new(480.0, 300.0));
        assert_eq!(scene.board.len(), 3);
        // second segment starts on an existing point
        click(&mut scene, Vec2::new(483.0, 302.0));
        click(&mut scene, Vec2::new(480.0, 380.0));
        assert_eq!(scene.board.len(), 5);
    }

    #[test]
    fn test_polygon_closes_on_first_vertex() {
        let mut scene = GraphingScene::new();
        scene.select_tool(Tool::Polygon);
        for p in [(400.0, 300.0), (500.0, 300.0), (450.0, 200.0), (401.0, 301.0)] {
            click(&mut scene, Vec2::new(p.0, p.1));
        }
        assert_eq!(scene.board.len(), 4);
        assert!(scene.pending.is_empty());
    }

    #[test]
    fn test_delete_cascades_from_scene() {
        let mut scene = GraphingScene::new();
        scene.select_tool(Tool::Circle);
        click(&mut scene, Vec2::new(400.0, 300.0));
        click(&mut scene, Vec2::new(440.0, 300.0));
        scene.select_tool(Tool::Select);
        click(&mut scene, Vec2::new(400.0, 300.0));
        assert!(scene.selected.is_some());
        scene.key(Key::Delete);
        assert_eq!(scene.board.len(), 1);
    }

    #[test]
    fn test_drag_point_and_pan() {
        let mut scene = GraphingScene::new();
        scene.select_tool(Tool::Point);
        click(&mut scene, Vec2::new(400.0, 300.0));
        scene.select_tool(Tool::Select);

        scene.pointer(PointerEvent::Down {
            position: Vec2::new(400.0, 300.0),
            button: PointerButton::Primary,
            modifiers: Modifiers::default(),
        });
        scene.pointer(PointerEvent::Move {
            position: Vec2::new(440.0, 260.0),
            modifiers: Modifiers::default(),
        });
        let a = scene.board.find_label("A").unwrap();
        assert_eq!(scene.board.point(a).unwrap(), DVec2::new(1.0, 1.0));
        scene.pointer(PointerEvent::Leave);

        // empty space pans instead
        scene.pointer(PointerEvent::Down {
            position: Vec2::new(100.0, 100.0),
            button: PointerButton::Primary,
            modifiers: Modifiers::default(),
        });
        scene.pointer(PointerEvent::Move {
            position: Vec2::new(140.0, 100.0),
            modifiers: Modifiers::default(),
        });
        assert_eq!(scene.viewport.center, DVec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_shift_click_places_tangent() {
        let mut scene = GraphingScene::new();
        scene.submit("x^2").unwrap();
        scene.pointer(PointerEvent::Down {
            position: Vec2::new(440.0, 300.0),
            button: PointerButton::Primary,
            modifiers: Modifiers {
                shift: true,
                ctrl: false,
            },
        });
        assert_eq!(scene.tangent_x, Some(1.0));
        let mut recorder = CommandRecorder::new(800.0, 600.0);
        scene.draw(&mut recorder);
        assert!(recorder.texts().iter().any(|t| t.starts_with("slope = 2.000")));
        assert!(scene.board.is_empty());
    }

    #[test]
    fn test_zoom_stays_clamped() {
        let mut scene = GraphingScene::new();
        for _ in 0..100 {
            scene.wheel(WheelEvent {
                position: Vec2::ZERO,
                delta: 1.0,
            });
        }
        assert_eq!(scene.viewport.scale, 5.0);
        for _ in 0..100 {
            scene.key(Key::Plus);
        }
        assert_eq!(scene.viewport.scale, 200.0);
    }

    #[test]
    fn test_scene_runs_in_frame_loop() {
        let mut frame_loop = FrameLoop::new();
        let mut scene = GraphingScene::new();
        scene.submit("sin(x)").unwrap();
        scene.submit("heart").unwrap();
        frame_loop.mount(Box::new(scene));
        let mut recorder = CommandRecorder::new(800.0, 600.0);
        assert!(frame_loop.tick(FRAME_DT, Some(&mut recorder)));
        assert!(recorder.count_strokes() > 2);
        frame_loop.unmount();
        assert!(frame_loop.pending_request().is_none());
    }
}
