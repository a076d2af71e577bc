use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

mod common;

pub use common::{CANVAS_HEIGHT, CANVAS_WIDTH, MIN_ELEMENT_SIZE, Position, Size};

use crate::id_generator;

/// Unique identifier of an element within a presentation
pub type ElementId = String;

/// Open property bag; which keys are meaningful depends on the element kind.
///
/// Only JSON-representable values can live here.
pub type Properties = Map<String, Value>;

/// The closed set of element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Image,
    Shape,
    Chart,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Image => "image",
            ElementKind::Shape => "shape",
            ElementKind::Chart => "chart",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The atomic editable unit on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub position: Position,
    pub size: Size,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<f64>,
    #[serde(default)]
    pub properties: Properties,
}

impl Element {
    pub fn new(kind: ElementKind, position: Position, size: Size, properties: Properties) -> Self {
        Self {
            id: id_generator::generate_element_id(),
            kind,
            position,
            size,
            z_index: None,
            properties,
        }
    }

    /// Structural copy carrying a freshly generated id
    pub fn with_fresh_id(&self) -> Self {
        Self {
            id: id_generator::generate_element_id(),
            ..self.clone()
        }
    }

    /// Stacking order used for display: the explicit `zIndex` when set,
    /// otherwise the insertion index within the slide.
    pub fn effective_z_index(&self, insertion_index: usize) -> f64 {
        self.z_index.unwrap_or(insertion_index as f64)
    }

    /// Read a string property
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }
}

/// Factory functions for creating elements
pub mod factory {
    use super::*;
    use serde_json::json;

    /// Where newly added elements land on the canvas
    pub const DEFAULT_POSITION: Position = Position::new(100.0, 100.0);

    /// Default size for a freshly added element of `kind`
    pub fn default_size(kind: ElementKind) -> Size {
        match kind {
            ElementKind::Text => Size::new(300.0, 60.0),
            ElementKind::Image => Size::new(240.0, 160.0),
            ElementKind::Shape => Size::new(160.0, 160.0),
            ElementKind::Chart => Size::new(400.0, 260.0),
        }
    }

    /// Default property bag for a freshly added element of `kind`
    pub fn default_properties(kind: ElementKind) -> Properties {
        let value = match kind {
            ElementKind::Text => json!({
                "text": "Click to edit text",
                "fontSize": 24,
                "color": "#000000",
                "bold": false,
                "italic": false,
                "underline": false,
                "align": "left",
            }),
            ElementKind::Image => json!({
                "src": "",
                "alt": "Image",
                "borderRadius": 0,
                "opacity": 1,
            }),
            ElementKind::Shape => json!({
                "shapeType": "rectangle",
                "fill": "#3b82f6",
                "stroke": "#1e40af",
                "strokeWidth": 2,
                "borderRadius": 0,
            }),
            ElementKind::Chart => json!({
                "chartType": "bar",
                "data": [30, 50, 40, 70],
                "labels": ["Q1", "Q2", "Q3", "Q4"],
            }),
        };
        match value {
            Value::Object(map) => map,
            _ => Properties::new(),
        }
    }

    /// Create an element of `kind` with default geometry and properties
    pub fn create_element(kind: ElementKind) -> Element {
        Element::new(kind, DEFAULT_POSITION, default_size(kind), default_properties(kind))
    }

    /// Create a text element with the given content and font size
    pub fn create_text(text: &str, font_size: u32, position: Position, size: Size) -> Element {
        let mut properties = default_properties(ElementKind::Text);
        properties.insert("text".to_owned(), Value::from(text));
        properties.insert("fontSize".to_owned(), Value::from(font_size));
        Element::new(ElementKind::Text, position, size, properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let mut element = factory::create_element(ElementKind::Shape);
        element.z_index = Some(3.0);
        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(json["type"], "shape");
        assert_eq!(json["zIndex"], 3.0);
        assert_eq!(json["properties"]["strokeWidth"], 2);
    }

    #[test]
    fn fractional_z_index_is_accepted() {
        let json = r#"{"id":"e1","type":"text","position":{"x":0,"y":0},
            "size":{"width":10,"height":10},"zIndex":1.5}"#;
        let element: Element = serde_json::from_str(json).unwrap();
        assert_eq!(element.z_index, Some(1.5));
        assert_eq!(element.effective_z_index(0), 1.5);
    }

    #[test]
    fn missing_z_index_is_omitted() {
        let element = factory::create_element(ElementKind::Text);
        let json = serde_json::to_value(&element).unwrap();
        assert!(json.get("zIndex").is_none());
        assert_eq!(element.effective_z_index(4), 4.0);
    }
}
