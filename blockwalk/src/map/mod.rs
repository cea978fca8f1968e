pub mod loader;

use glam::Vec2;
use rustc_hash::FxHashMap;

/// Per-axis tolerance used when comparing authored coordinates.
pub const DEFAULT_TOLERANCE: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointKind {
    Start,
    Destination,
    Littlebit,
    Plain,
}

#[derive(Clone, Debug)]
pub struct Point {
    pub position: Vec2,
    pub kind: PointKind,
    pub name: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Connection {
    pub p1: Vec2,
    pub p2: Vec2,
}

/// Points have no identifiers, they are the same point when both coordinates
/// lie within the tolerance. Cheap per-axis comparison, not Euclidean.
pub fn same_point(a: Vec2, b: Vec2, tolerance: f32) -> bool {
    (a.x - b.x).abs() <= tolerance && (a.y - b.y).abs() <= tolerance
}

impl Connection {
    pub fn touches(&self, position: Vec2, tolerance: f32) -> bool {
        same_point(self.p1, position, tolerance) || same_point(self.p2, position, tolerance)
    }

    pub fn opposite_end(&self, position: Vec2, tolerance: f32) -> Vec2 {
        if same_point(self.p1, position, tolerance) {
            self.p2
        } else {
            self.p1
        }
    }

    pub fn links(&self, a: Vec2, b: Vec2, tolerance: f32) -> bool {
        (same_point(self.p1, a, tolerance) && same_point(self.p2, b, tolerance)) || (same_point(self.p2, a, tolerance) && same_point(self.p1, b, tolerance))
    }
}

pub struct MapModel {
    points: Vec<Point>,
    connections: Vec<Connection>,
    names: FxHashMap<String, usize>,
}

impl MapModel {
    pub(crate) fn new(points: Vec<Point>, connections: Vec<Connection>) -> Self {
        let names = points.iter().enumerate().filter_map(|(index, point)| point.name.as_ref().map(|name| (name.clone(), index))).collect();
        Self { points, connections, names }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn find_point(&self, position: Vec2, tolerance: f32) -> Option<&Point> {
        self.points.iter().find(|point| same_point(point.position, position, tolerance))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Point> {
        self.names.get(name).map(|index| &self.points[*index])
    }

    /// Connections touching the position, in authored order. Several selection
    /// rules are first-found-wins, so the order matters.
    pub fn connections_at(&self, position: Vec2, tolerance: f32) -> impl Iterator<Item = &Connection> {
        self.connections.iter().filter(move |connection| connection.touches(position, tolerance))
    }

    pub fn points_of_kind(&self, kind: PointKind) -> impl Iterator<Item = &Point> {
        self.points.iter().filter(move |point| point.kind == kind)
    }

    pub fn has_direct_connection(&self, a: Vec2, b: Vec2, tolerance: f32) -> bool {
        self.connections.iter().any(|connection| connection.links(a, b, tolerance))
    }

    pub fn nearest_point(&self, position: Vec2) -> Option<&Point> {
        self.points.iter().min_by(|a, b| a.position.distance_squared(position).total_cmp(&b.position.distance_squared(position)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_map() -> MapModel {
        let points = vec![
            Point { position: Vec2::new(0.0, 0.0), kind: PointKind::Start, name: None },
            Point { position: Vec2::new(100.0, 0.0), kind: PointKind::Plain, name: Some("Square".to_string()) },
            Point { position: Vec2::new(200.0, 0.0), kind: PointKind::Destination, name: Some("Market".to_string()) },
        ];
        let connections = vec![
            Connection { p1: Vec2::new(0.0, 0.0), p2: Vec2::new(100.0, 0.0) },
            Connection { p1: Vec2::new(100.0, 0.0), p2: Vec2::new(200.0, 0.0) },
        ];

        MapModel::new(points, connections)
    }

    #[test]
    fn same_point_is_symmetric_and_tolerance_bounded() {
        let a = Vec2::new(10.0, 10.0);

        assert!(same_point(a, a, 1.0));
        assert!(same_point(a, Vec2::new(11.0, 11.0), 1.0));
        assert!(same_point(Vec2::new(11.0, 11.0), a, 1.0));
        assert!(!same_point(a, Vec2::new(12.0, 10.0), 1.0));
    }

    #[test]
    fn find_point_uses_tolerance() {
        let map = test_map();

        assert!(map.find_point(Vec2::new(100.5, -0.5), 1.0).is_some());
        assert!(map.find_point(Vec2::new(103.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn find_by_name_returns_named_points() {
        let map = test_map();

        assert_eq!(map.find_by_name("Market").unwrap().kind, PointKind::Destination);
        assert!(map.find_by_name("Harbor").is_none());
    }

    #[test]
    fn connections_at_preserves_authored_order() {
        let map = test_map();
        let touching: Vec<&Connection> = map.connections_at(Vec2::new(100.0, 0.0), 1.0).collect();

        assert_eq!(touching.len(), 2);
        assert_eq!(touching[0].p1, Vec2::new(0.0, 0.0));
        assert_eq!(touching[1].p2, Vec2::new(200.0, 0.0));
    }

    #[test]
    fn opposite_end_resolves_both_directions() {
        let connection = Connection { p1: Vec2::new(0.0, 0.0), p2: Vec2::new(100.0, 0.0) };

        assert_eq!(connection.opposite_end(Vec2::new(0.0, 0.0), 1.0), Vec2::new(100.0, 0.0));
        assert_eq!(connection.opposite_end(Vec2::new(100.0, 0.0), 1.0), Vec2::new(0.0, 0.0));
    }

    #[test]
    fn direct_connection_is_undirected() {
        let map = test_map();

        assert!(map.has_direct_connection(Vec2::new(100.0, 0.0), Vec2::new(0.0, 0.0), 1.0));
        assert!(map.has_direct_connection(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), 1.0));
        assert!(!map.has_direct_connection(Vec2::new(0.0, 0.0), Vec2::new(200.0, 0.0), 1.0));
    }

    #[test]
    fn nearest_point_uses_euclidean_distance() {
        let map = test_map();

        assert_eq!(map.nearest_point(Vec2::new(130.0, 50.0)).unwrap().position, Vec2::new(100.0, 0.0));
    }
}
