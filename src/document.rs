use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementId};
use crate::slide::Slide;

/// Ids of elements that move and resize operations must leave alone.
///
/// Lock state lives outside the document and is not part of undo history.
pub type LockedElements = HashSet<ElementId>;

/// The single live document of an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    #[serde(default)]
    pub title: String,
    pub slides: Vec<Slide>,
    #[serde(default)]
    pub current_slide_index: usize,
}

impl Default for Presentation {
    fn default() -> Self {
        Self::new("Untitled Presentation")
    }
}

impl Presentation {
    /// A presentation holding one empty slide
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slides: vec![Slide::new("Slide 1")],
            current_slide_index: 0,
        }
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.slides.get(self.current_slide_index)
    }

    /// Index of the slide owning the element with `id`
    pub fn find_slide_containing_element(&self, id: &str) -> Option<usize> {
        self.slides.iter().position(|slide| slide.contains_element(id))
    }

    pub fn find_element(&self, id: &str) -> Option<&Element> {
        self.slides.iter().find_map(|slide| slide.element(id))
    }

    pub fn is_element_locked(&self, locked: &LockedElements, id: &str) -> bool {
        locked.contains(id)
    }

    pub fn element_count(&self) -> usize {
        self.slides.iter().map(|slide| slide.elements.len()).sum()
    }

    /// Pull `current_slide_index` back into range after the slide list changed
    pub fn clamp_current_slide(&mut self) {
        self.current_slide_index = self
            .current_slide_index
            .min(self.slides.len().saturating_sub(1));
    }
}
