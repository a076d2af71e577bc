use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementId};
use crate::id_generator;

pub const DEFAULT_BACKGROUND: &str = "#ffffff";

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_owned()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_background")]
    pub background: String,
    /// Insertion order; breaks ties between elements without a `zIndex`
    #[serde(default)]
    pub elements: Vec<Element>,
    /// Name of the layout the generator picked, for generated slides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl Slide {
    /// An empty slide with a white background
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: id_generator::generate_slide_id(),
            title: title.into(),
            background: default_background(),
            elements: Vec::new(),
            template: None,
        }
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|element| element.id == id)
    }

    pub fn element_index(&self, id: &str) -> Option<usize> {
        self.elements.iter().position(|element| element.id == id)
    }

    pub fn contains_element(&self, id: &str) -> bool {
        self.element_index(id).is_some()
    }

    pub fn element_ids(&self) -> impl Iterator<Item = &ElementId> {
        self.elements.iter().map(|element| &element.id)
    }

    /// Range of effective stacking values on this slide, if it has elements
    pub fn z_range(&self) -> Option<(f64, f64)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(index, element)| element.effective_z_index(index))
            .fold(None, |range, z| match range {
                None => Some((z, z)),
                Some((lo, hi)) => Some((lo.min(z), hi.max(z))),
            })
    }

    /// Copy of this slide where the slide and every element get fresh ids
    pub fn with_fresh_ids(&self) -> Self {
        Self {
            id: id_generator::generate_slide_id(),
            elements: self.elements.iter().map(Element::with_fresh_id).collect(),
            ..self.clone()
        }
    }
}

/// A reusable slide layout. Element ids are placeholders and are replaced
/// every time the template is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Template {
    /// Instantiate the template's elements with unique ids
    pub fn instantiate(&self) -> Vec<Element> {
        self.elements.iter().map(Element::with_fresh_id).collect()
    }
}
