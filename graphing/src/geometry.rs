//! Geometry construction board
//!
//! Objects live in an arena keyed by [`ObjectId`] and refer to each other by
//! id only, so moving a point moves everything built on it. Deleting an
//! object deletes everything that (transitively) depends on it.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use common::{snap, Viewport};
use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pixel radius for picking a point
pub const HIT_RADIUS: f64 = 10.0;
/// Grid step used when snapping is on
pub const SNAP_STEP: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("object {0:?} does not exist")]
    Missing(ObjectId),

    #[error("object {0:?} is not a point")]
    NotAPoint(ObjectId),

    #[error("construction needs distinct points")]
    Degenerate,

    #[error("a polygon needs at least three vertices, got {0}")]
    TooFewVertices(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeometryObject {
    Point { position: DVec2, label: String },
    /// Infinite line through two points
    Line { a: ObjectId, b: ObjectId },
    Segment { a: ObjectId, b: ObjectId },
    Circle { center: ObjectId, through: ObjectId },
    Polygon { vertices: Vec<ObjectId> },
    Distance { a: ObjectId, b: ObjectId },
}

impl GeometryObject {
    /// Ids this object is built from
    pub fn references(&self) -> Vec<ObjectId> {
        match self {
            GeometryObject::Point { .. } => Vec::new(),
            GeometryObject::Line { a, b }
            | GeometryObject::Segment { a, b }
            | GeometryObject::Distance { a, b } => vec![*a, *b],
            GeometryObject::Circle { center, through } => vec![*center, *through],
            GeometryObject::Polygon { vertices } => vertices.clone(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GeometryObject::Point { .. } => "Point",
            GeometryObject::Line { .. } => "Line",
            GeometryObject::Segment { .. } => "Segment",
            GeometryObject::Circle { .. } => "Circle",
            GeometryObject::Polygon { .. } => "Polygon",
            GeometryObject::Distance { .. } => "Distance",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryEntry {
    pub object: GeometryObject,
    pub visible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryBoard {
    objects: BTreeMap<ObjectId, GeometryEntry>,
    next_id: u32,
    pub snap_to_grid: bool,
}

impl GeometryBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        log::info!("Geometry board cleared");
    }

    pub fn get(&self, id: ObjectId) -> Option<&GeometryObject> {
        self.objects.get(&id).map(|entry| &entry.object)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Objects in creation order
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &GeometryEntry)> {
        self.objects.iter().map(|(id, entry)| (*id, entry))
    }

    pub fn set_visible(&mut self, id: ObjectId, visible: bool) -> Result<(), GeometryError> {
        let entry = self.objects.get_mut(&id).ok_or(GeometryError::Missing(id))?;
        entry.visible = visible;
        Ok(())
    }

    fn insert(&mut self, object: GeometryObject) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        log::debug!("Added {} {:?}", object.kind(), id);
        self.objects.insert(
            id,
            GeometryEntry {
                object,
                visible: true,
            },
        );
        id
    }

    fn snapped(&self, position: DVec2) -> DVec2 {
        if self.snap_to_grid {
            DVec2::new(snap(position.x, SNAP_STEP), snap(position.y, SNAP_STEP))
        } else {
            position
        }
    }

    pub fn point(&self, id: ObjectId) -> Result<DVec2, GeometryError> {
        match self.get(id) {
            Some(GeometryObject::Point { position, .. }) => Ok(*position),
            Some(_) => Err(GeometryError::NotAPoint(id)),
            None => Err(GeometryError::Missing(id)),
        }
    }

    pub fn label(&self, id: ObjectId) -> Option<&str> {
        match self.get(id) {
            Some(GeometryObject::Point { label, .. }) => Some(label),
            _ => None,
        }
    }

    pub fn find_label(&self, label: &str) -> Option<ObjectId> {
        self.iter()
            .find(|(_, entry)| matches!(&entry.object, GeometryObject::Point { label: l, .. } if l == label))
            .map(|(id, _)| id)
    }

    /// First unused label in A..Z, then A1..Z1 and so on
    pub fn next_label(&self) -> String {
        let used: BTreeSet<&str> = self.iter().filter_map(|(id, _)| self.label(id)).collect();
        (0u32..)
            .flat_map(|round| {
                ('A'..='Z').map(move |c| {
                    if round == 0 {
                        c.to_string()
                    } else {
                        format!("{c}{round}")
                    }
                })
            })
            .find(|label| !used.contains(label.as_str()))
            .unwrap_or_default()
    }

    pub fn add_point(&mut self, position: DVec2) -> ObjectId {
        let label = self.next_label();
        self.add_labelled_point(&label, position)
    }

    pub fn add_labelled_point(&mut self, label: &str, position: DVec2) -> ObjectId {
        let position = self.snapped(position);
        self.insert(GeometryObject::Point {
            position,
            label: label.to_string(),
        })
    }

    /// Point notation: move the point called `label`, or create it
    pub fn define_point(&mut self, label: &str, position: DVec2) -> ObjectId {
        match self.find_label(label) {
            Some(id) => {
                if let Some(GeometryObject::Point { position: p, .. }) =
                    self.objects.get_mut(&id).map(|e| &mut e.object)
                {
                    *p = position;
                }
                id
            }
            None => self.insert(GeometryObject::Point {
                position,
                label: label.to_string(),
            }),
        }
    }

    /// Move a point; everything built on it follows
    pub fn move_point(&mut self, id: ObjectId, position: DVec2) -> Result<(), GeometryError> {
        let position = self.snapped(position);
        match self.objects.get_mut(&id).map(|e| &mut e.object) {
            Some(GeometryObject::Point { position: p, .. }) => {
                *p = position;
                Ok(())
            }
            Some(_) => Err(GeometryError::NotAPoint(id)),
            None => Err(GeometryError::Missing(id)),
        }
    }

    fn two_points(&self, a: ObjectId, b: ObjectId) -> Result<(), GeometryError> {
        self.point(a)?;
        self.point(b)?;
        if a == b {
            return Err(GeometryError::Degenerate);
        }
        Ok(())
    }

    pub fn add_line(&mut self, a: ObjectId, b: ObjectId) -> Result<ObjectId, GeometryError> {
        self.two_points(a, b)?;
        Ok(self.insert(GeometryObject::Line { a, b }))
    }

    pub fn add_segment(&mut self, a: ObjectId, b: ObjectId) -> Result<ObjectId, GeometryError> {
        self.two_points(a, b)?;
        Ok(self.insert(GeometryObject::Segment { a, b }))
    }

    pub fn add_circle(&mut self, center: ObjectId, through: ObjectId) -> Result<ObjectId, GeometryError> {
        self.two_points(center, through)?;
        Ok(self.insert(GeometryObject::Circle { center, through }))
    }

    pub fn add_distance(&mut self, a: ObjectId, b: ObjectId) -> Result<ObjectId, GeometryError> {
        self.two_points(a, b)?;
        Ok(self.insert(GeometryObject::Distance { a, b }))
    }

    pub fn add_polygon(&mut self, vertices: &[ObjectId]) -> Result<ObjectId, GeometryError> {
        if vertices.len() < 3 {
            return Err(GeometryError::TooFewVertices(vertices.len()));
        }
        for id in vertices {
            self.point(*id)?;
        }
        let distinct: BTreeSet<_> = vertices.iter().collect();
        if distinct.len() != vertices.len() {
            return Err(GeometryError::Degenerate);
        }
        Ok(self.insert(GeometryObject::Polygon {
            vertices: vertices.to_vec(),
        }))
    }

    /// `id` plus every object depending on it, directly or through others,
    /// in breadth-first order
    pub fn dependency_closure(&self, id: ObjectId) -> Vec<ObjectId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut found = vec![id];
        let mut seen = BTreeSet::from([id]);
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            for (other, entry) in self.iter() {
                if !seen.contains(&other) && entry.object.references().contains(&current) {
                    seen.insert(other);
                    found.push(other);
                    queue.push_back(other);
                }
            }
        }
        found
    }

    /// Delete an object and all its dependants. Returns the removed ids.
    pub fn delete(&mut self, id: ObjectId) -> Result<Vec<ObjectId>, GeometryError> {
        if !self.contains(id) {
            return Err(GeometryError::Missing(id));
        }
        let removed = self.dependency_closure(id);
        for id in &removed {
            self.objects.remove(id);
        }
        log::info!("Deleted {} object(s)", removed.len());
        Ok(removed)
    }

    /// Topmost visible point within [`HIT_RADIUS`] pixels of `px`
    pub fn hit_test(&self, viewport: &Viewport, px: DVec2) -> Option<ObjectId> {
        self.objects.iter().rev().find_map(|(id, entry)| match &entry.object {
            GeometryObject::Point { position, .. }
                if entry.visible && viewport.pixel_distance(*position, px) < HIT_RADIUS =>
            {
                Some(*id)
            }
            _ => None,
        })
    }

    /// Length of a segment or distance measurement, radius of a circle,
    /// perimeter of a polygon
    pub fn measure(&self, id: ObjectId) -> Result<f64, GeometryError> {
        let object = self.get(id).ok_or(GeometryError::Missing(id))?;
        match object {
            GeometryObject::Segment { a, b }
            | GeometryObject::Distance { a, b }
            | GeometryObject::Line { a, b } => Ok(self.point(*a)?.distance(self.point(*b)?)),
            GeometryObject::Circle { center, through } => {
                Ok(self.point(*center)?.distance(self.point(*through)?))
            }
            GeometryObject::Polygon { vertices } => {
                let mut perimeter = 0.0;
                for (i, a) in vertices.iter().enumerate() {
                    let b = vertices[(i + 1) % vertices.len()];
                    perimeter += self.point(*a)?.distance(self.point(b)?);
                }
                Ok(perimeter)
            }
            GeometryObject::Point { .. } => Ok(0.0),
        }
    }

    /// One line per object for the algebra view, e.g. `A = (1, 2)`
    pub fn describe(&self, id: ObjectId) -> Option<String> {
        let name = |id: ObjectId| self.label(id).unwrap_or("?").to_string();
        let text = match self.get(id)? {
            GeometryObject::Point { position, label } => {
                format!("{label} = ({}, {})", trim(position.x), trim(position.y))
            }
            GeometryObject::Line { a, b } => format!("line({}, {})", name(*a), name(*b)),
            GeometryObject::Segment { a, b } => format!(
                "segment({}, {}) = {}",
                name(*a),
                name(*b),
                trim(self.measure(id).ok()?)
            ),
            GeometryObject::Circle { center, through } => format!(
                "circle({}, {}), r = {}",
                name(*center),
                name(*through),
                trim(self.measure(id).ok()?)
            ),
            GeometryObject::Polygon { vertices } => {
                let names: Vec<String> = vertices.iter().map(|v| name(*v)).collect();
                format!("polygon({})", names.join(", "))
            }
            GeometryObject::Distance { a, b } => format!(
                "|{}{}| = {}",
                name(*a),
                name(*b),
                trim(self.measure(id).ok()?)
            ),
        };
        Some(text)
    }
}

/// Up to two decimals without trailing zeros
fn trim(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with_points(n: usize) -> (GeometryBoard, Vec<ObjectId>) {
        let mut board = GeometryBoard::new();
        let ids = (0..n)
            .map(|i| board.add_point(DVec2::new(i as f64, 0.0)))
            .collect();
        (board, ids)
    }

    #[test]
    fn test_cascade_delete() {
        let (mut board, p) = board_with_points(3);
        let line = board.add_line(p[0], p[1]).unwrap();
        let circle = board.add_circle(p[0], p[2]).unwrap();
        let distance = board.add_distance(p[0], p[2]).unwrap();
        let unrelated = board.add_segment(p[1], p[2]).unwrap();

        let removed = board.delete(p[0]).unwrap();
        assert_eq!(removed, vec![p[0], line, circle, distance]);
        assert_eq!(board.len(), 3);
        assert!(board.contains(unrelated));
    }

    #[test]
    fn test_delete_unreferenced_point() {
        let (mut board, p) = board_with_points(3);
        board.add_segment(p[0], p[1]).unwrap();
        assert_eq!(board.delete(p[2]).unwrap(), vec![p[2]]);
        assert_eq!(board.len(), 3);
        assert_eq!(board.delete(p[2]), Err(GeometryError::Missing(p[2])));
    }

    #[test]
    fn test_transitive_dependants() {
        let (mut board, p) = board_with_points(3);
        let polygon = board.add_polygon(&p).unwrap();
        assert_eq!(board.dependency_closure(p[1]), vec![p[1], polygon]);
        // deleting the polygon leaves its vertices alone
        assert_eq!(board.delete(polygon).unwrap(), vec![polygon]);
        assert_eq!(board.len(), 3);
    }

    #[test]
    fn test_construction_validation() {
        let (mut board, p) = board_with_points(2);
        let segment = board.add_segment(p[0], p[1]).unwrap();
        assert_eq!(board.add_line(p[0], segment), Err(GeometryError::NotAPoint(segment)));
        assert_eq!(board.add_line(p[0], p[0]), Err(GeometryError::Degenerate));
        assert_eq!(
            board.add_circle(p[0], ObjectId(99)),
            Err(GeometryError::Missing(ObjectId(99)))
        );
        assert_eq!(board.add_polygon(&p), Err(GeometryError::TooFewVertices(2)));
    }

    #[test]
    fn test_moving_a_point_moves_dependants() {
        let (mut board, p) = board_with_points(2);
        let segment = board.add_segment(p[0], p[1]).unwrap();
        assert!((board.measure(segment).unwrap() - 1.0).abs() < 1e-12);
        board.move_point(p[1], DVec2::new(3.0, 4.0)).unwrap();
        assert!((board.measure(segment).unwrap() - 5.0).abs() < 1e-12);
        assert_eq!(board.move_point(segment, DVec2::ZERO), Err(GeometryError::NotAPoint(segment)));
    }

    #[test]
    fn test_labels() {
        let (mut board, p) = board_with_points(2);
        assert_eq!(board.label(p[0]), Some("A"));
        assert_eq!(board.label(p[1]), Some("B"));
        board.delete(p[0]).unwrap();
        assert_eq!(board.next_label(), "A");

        let mut board = GeometryBoard::new();
        for i in 0..27 {
            board.add_point(DVec2::new(i as f64, 0.0));
        }
        assert_eq!(board.next_label(), "B1");
    }

    #[test]
    fn test_point_notation_creates_or_moves() {
        let mut board = GeometryBoard::new();
        let a = board.define_point("A", DVec2::new(1.0, 2.0));
        let again = board.define_point("A", DVec2::new(-3.0, 0.5));
        assert_eq!(a, again);
        assert_eq!(board.len(), 1);
        assert_eq!(board.describe(a).unwrap(), "A = (-3, 0.5)");
    }

    #[test]
    fn test_snap_to_grid() {
        let mut board = GeometryBoard::new();
        board.snap_to_grid = true;
        let a = board.add_point(DVec2::new(1.26, -0.74));
        assert_eq!(board.point(a).unwrap(), DVec2::new(1.5, -0.5));
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let viewport = Viewport::default();
        let mut board = GeometryBoard::new();
        let below = board.add_point(DVec2::new(0.0, 0.0));
        let above = board.add_point(DVec2::new(0.1, 0.0));
        let center = DVec2::new(400.0, 300.0);
        assert_eq!(board.hit_test(&viewport, center), Some(above));
        board.set_visible(above, false).unwrap();
        assert_eq!(board.hit_test(&viewport, center), Some(below));
        assert_eq!(board.hit_test(&viewport, DVec2::new(420.0, 300.0)), None);
    }

    #[test]
    fn test_serde_round_trip() {
        let (mut board, p) = board_with_points(3);
        board.add_polygon(&p).unwrap();
        let json = serde_json::to_string(&board).unwrap();
        let back: GeometryBoard = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);
    }
}
