use super::Connection;
use super::MapModel;
use super::Point;
use super::PointKind;
use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use glam::Vec2;
use log::info;
use std::collections::HashMap;
use tinyjson::JsonValue;

impl MapModel {
    /// Parses a map document. The format is flat on purpose, points carry
    /// coordinates and a type, connections reference points by coordinates.
    pub fn from_json(data: &str) -> Result<MapModel> {
        let parsed = data.parse::<JsonValue>().map_err(|err| anyhow!("Failed to parse map data ({})", err))?;
        let root = as_object(&parsed)?;

        let points = match root.get("points") {
            Some(JsonValue::Array(array)) => array.iter().map(read_point).collect::<Result<Vec<Point>>>()?,
            _ => bail!("Failed to read points"),
        };
        let connections = match root.get("connections") {
            Some(JsonValue::Array(array)) => array.iter().map(read_connection).collect::<Result<Vec<Connection>>>()?,
            _ => bail!("Failed to read connections"),
        };

        if !points.iter().any(|point| point.kind == PointKind::Start) {
            bail!("Map has no start point");
        }
        if !points.iter().any(|point| point.kind == PointKind::Destination) {
            bail!("Map has no destination point");
        }

        info!("Map loaded, {} points and {} connections", points.len(), connections.len());
        Ok(MapModel::new(points, connections))
    }
}

fn as_object(value: &JsonValue) -> Result<&HashMap<String, JsonValue>> {
    match value {
        JsonValue::Object(object) => Ok(object),
        _ => bail!("Failed to read object"),
    }
}

fn read_number(data: &HashMap<String, JsonValue>, name: &str) -> Result<f32> {
    match data.get(name) {
        Some(JsonValue::Number(value)) => Ok(*value as f32),
        _ => bail!("Failed to read number {}", name),
    }
}

fn read_point(value: &JsonValue) -> Result<Point> {
    let object = as_object(value)?;
    let position = Vec2::new(read_number(object, "x")?, read_number(object, "y")?);

    let kind = match object.get("type") {
        Some(JsonValue::String(kind)) => match kind.as_str() {
            "start" => PointKind::Start,
            "destination" => PointKind::Destination,
            "littlebit" => PointKind::Littlebit,
            "plain" => PointKind::Plain,
            other => bail!("Unknown point type {}", other),
        },
        _ => bail!("Failed to read point type"),
    };

    let name = match object.get("name") {
        Some(JsonValue::String(name)) => Some(name.clone()),
        Some(JsonValue::Null) | None => None,
        _ => bail!("Failed to read point name"),
    };

    Ok(Point { position, kind, name })
}

fn read_connection(value: &JsonValue) -> Result<Connection> {
    let object = as_object(value)?;

    Ok(Connection { p1: read_position(object, "p1")?, p2: read_position(object, "p2")? })
}

fn read_position(data: &HashMap<String, JsonValue>, name: &str) -> Result<Vec2> {
    let object = match data.get(name) {
        Some(JsonValue::Object(object)) => object,
        _ => bail!("Failed to read position {}", name),
    };

    Ok(Vec2::new(read_number(object, "x")?, read_number(object, "y")?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_MAP: &str = r#"{
        "points": [
            { "x": 0, "y": 0, "type": "start", "name": "West Gate" },
            { "x": 100, "y": 0, "type": "littlebit" },
            { "x": 200, "y": 0, "type": "destination", "name": "Market" }
        ],
        "connections": [
            { "p1": { "x": 0, "y": 0 }, "p2": { "x": 100, "y": 0 } },
            { "p1": { "x": 100, "y": 0 }, "p2": { "x": 200, "y": 0 } }
        ]
    }"#;

    #[test]
    fn valid_map_loads() {
        let map = MapModel::from_json(VALID_MAP).unwrap();

        assert_eq!(map.points().len(), 3);
        assert_eq!(map.connections().len(), 2);
        assert_eq!(map.find_by_name("West Gate").unwrap().kind, PointKind::Start);
        assert_eq!(map.points()[1].name, None);
    }

    #[test]
    fn missing_points_section_fails() {
        assert!(MapModel::from_json(r#"{ "connections": [] }"#).is_err());
    }

    #[test]
    fn missing_connections_section_fails() {
        assert!(MapModel::from_json(r#"{ "points": [] }"#).is_err());
    }

    #[test]
    fn map_without_start_fails() {
        let data = r#"{
            "points": [{ "x": 0, "y": 0, "type": "destination", "name": "Market" }],
            "connections": []
        }"#;

        assert!(MapModel::from_json(data).is_err());
    }

    #[test]
    fn map_without_destination_fails() {
        let data = r#"{
            "points": [{ "x": 0, "y": 0, "type": "start" }],
            "connections": []
        }"#;

        assert!(MapModel::from_json(data).is_err());
    }

    #[test]
    fn unknown_point_type_fails() {
        let data = r#"{
            "points": [{ "x": 0, "y": 0, "type": "portal" }],
            "connections": []
        }"#;

        assert!(MapModel::from_json(data).is_err());
    }

    #[test]
    fn malformed_json_fails() {
        assert!(MapModel::from_json("{ not json").is_err());
    }
}
