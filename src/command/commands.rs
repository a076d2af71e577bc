use serde::{Deserialize, Serialize};

use super::{Applied, CommandContext, CommandResult, SelectionChange};
use crate::document::Presentation;
use crate::element::{Element, ElementId, ElementKind, Position, Size, factory};
use crate::error::Ignored;
use crate::slide::{Slide, Template};

/// Payload accepted by `Command::ImportPresentation`.
///
/// Mirrors the export format `{title, slides, currentSlideIndex}`; only
/// `slides` is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportData {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slides: Option<Vec<Slide>>,
    #[serde(default)]
    pub current_slide_index: Option<usize>,
}

impl From<Presentation> for ImportData {
    fn from(doc: Presentation) -> Self {
        Self {
            title: Some(doc.title),
            slides: Some(doc.slides),
            current_slide_index: Some(doc.current_slide_index),
        }
    }
}

/// Document mutations that go through undo history.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Replace an element, matched by id, keeping its position in the slide
    UpdateElement(Element),

    DeleteElement {
        element_id: ElementId,
    },

    /// Copy an element onto the same slide, offset from the original
    DuplicateElement {
        element_id: ElementId,
    },

    /// Append a default element of `kind` to the current slide
    AddElement {
        kind: ElementKind,
    },

    MoveElement {
        element_id: ElementId,
        delta: Position,
    },

    ResizeElement {
        element_id: ElementId,
        size: Size,
    },

    BringToFront {
        element_id: ElementId,
    },

    SendToBack {
        element_id: ElementId,
    },

    AddSlide,

    DeleteSlide {
        index: usize,
    },

    /// Move the slide at `from` so that it ends up at `to`
    MoveSlide {
        from: usize,
        to: usize,
    },

    DuplicateSlide {
        index: usize,
    },

    UpdateSlide {
        index: usize,
        title: Option<String>,
        background: Option<String>,
    },

    SetTitle(String),

    /// Replace the current slide's background and elements with a template
    ApplyTemplate(Template),

    /// Replace the whole document
    ImportPresentation(ImportData),
}

impl Command {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::UpdateElement(_) => "update_element",
            Command::DeleteElement { .. } => "delete_element",
            Command::DuplicateElement { .. } => "duplicate_element",
            Command::AddElement { .. } => "add_element",
            Command::MoveElement { .. } => "move_element",
            Command::ResizeElement { .. } => "resize_element",
            Command::BringToFront { .. } => "bring_to_front",
            Command::SendToBack { .. } => "send_to_back",
            Command::AddSlide => "add_slide",
            Command::DeleteSlide { .. } => "delete_slide",
            Command::MoveSlide { .. } => "move_slide",
            Command::DuplicateSlide { .. } => "duplicate_slide",
            Command::UpdateSlide { .. } => "update_slide",
            Command::SetTitle(_) => "set_title",
            Command::ApplyTemplate(_) => "apply_template",
            Command::ImportPresentation(_) => "import_presentation",
        }
    }

    /// Compute the document that results from this command.
    ///
    /// `doc` is never modified. An `Err` means the command does not apply
    /// and the document stays as it is.
    pub fn apply(&self, doc: &Presentation, ctx: &CommandContext<'_>) -> CommandResult {
        match self {
            Command::UpdateElement(updated) => {
                let (slide_index, element_index) = locate(doc, &updated.id)?;
                if doc.slides[slide_index].elements[element_index] == *updated {
                    return Err(Ignored::Unchanged);
                }
                let mut next = doc.clone();
                next.slides[slide_index].elements[element_index] = updated.clone();
                Ok(Applied::keep(next))
            }

            Command::DeleteElement { element_id } => {
                let (slide_index, element_index) = locate(doc, element_id)?;
                let mut next = doc.clone();
                next.slides[slide_index].elements.remove(element_index);
                let selection = if ctx.is_selected(element_id) {
                    SelectionChange::Clear
                } else {
                    SelectionChange::Keep
                };
                Ok(Applied::new(next, selection))
            }

            Command::DuplicateElement { element_id } => {
                let (slide_index, element_index) = locate(doc, element_id)?;
                let original = &doc.slides[slide_index].elements[element_index];
                let mut copy = original.with_fresh_id();
                copy.position = original.position.offset(ctx.duplicate_offset);
                let copy_id = copy.id.clone();

                let mut next = doc.clone();
                next.slides[slide_index].elements.push(copy);
                Ok(Applied::new(next, SelectionChange::Select(copy_id)))
            }

            Command::AddElement { kind } => {
                if doc.current_slide().is_none() {
                    return Err(Ignored::NoCurrentSlide);
                }
                let element = factory::create_element(*kind);
                let element_id = element.id.clone();

                let mut next = doc.clone();
                next.slides[doc.current_slide_index].elements.push(element);
                Ok(Applied::new(next, SelectionChange::Select(element_id)).editing())
            }

            Command::MoveElement { element_id, delta } => {
                ensure_unlocked(doc, ctx, element_id)?;
                let (slide_index, element_index) = locate(doc, element_id)?;
                let current = doc.slides[slide_index].elements[element_index].position;
                let moved = current.offset(*delta);
                if moved == current || !moved.is_finite() {
                    return Err(Ignored::Unchanged);
                }
                let mut next = doc.clone();
                next.slides[slide_index].elements[element_index].position = moved;
                Ok(Applied::keep(next))
            }

            Command::ResizeElement { element_id, size } => {
                ensure_unlocked(doc, ctx, element_id)?;
                let (slide_index, element_index) = locate(doc, element_id)?;
                let size = size.clamped();
                if doc.slides[slide_index].elements[element_index].size == size {
                    return Err(Ignored::Unchanged);
                }
                let mut next = doc.clone();
                next.slides[slide_index].elements[element_index].size = size;
                Ok(Applied::keep(next))
            }

            Command::BringToFront { element_id } => {
                restack(doc, element_id, Stacking::Front)
            }

            Command::SendToBack { element_id } => {
                restack(doc, element_id, Stacking::Back)
            }

            Command::AddSlide => {
                let mut next = doc.clone();
                let title = format!("Slide {}", next.slides.len() + 1);
                next.slides.push(Slide::new(title));
                next.current_slide_index = next.slides.len() - 1;
                Ok(Applied::keep(next))
            }

            Command::DeleteSlide { index } => {
                let index = *index;
                if doc.slides.len() <= 1 {
                    return Err(Ignored::LastSlide);
                }
                ensure_slide(doc, index)?;

                let mut next = doc.clone();
                let removed = next.slides.remove(index);
                if index < next.current_slide_index {
                    next.current_slide_index -= 1;
                }
                next.clamp_current_slide();

                let selection = match ctx.selected {
                    Some(selected) if removed.contains_element(selected) => SelectionChange::Clear,
                    _ => SelectionChange::Keep,
                };
                Ok(Applied::new(next, selection))
            }

            Command::MoveSlide { from, to } => {
                let (from, to) = (*from, *to);
                ensure_slide(doc, from)?;
                ensure_slide(doc, to)?;
                if from == to {
                    return Err(Ignored::Unchanged);
                }

                let mut next = doc.clone();
                let slide = next.slides.remove(from);
                next.slides.insert(to, slide);
                next.current_slide_index = follow_moved_slide(doc.current_slide_index, from, to);
                Ok(Applied::keep(next))
            }

            Command::DuplicateSlide { index } => {
                ensure_slide(doc, *index)?;
                let mut next = doc.clone();
                let copy = doc.slides[*index].with_fresh_ids();
                next.slides.insert(index + 1, copy);
                next.current_slide_index = index + 1;
                Ok(Applied::keep(next))
            }

            Command::UpdateSlide {
                index,
                title,
                background,
            } => {
                ensure_slide(doc, *index)?;
                let mut next = doc.clone();
                let slide = &mut next.slides[*index];
                if let Some(title) = title {
                    slide.title = title.clone();
                }
                if let Some(background) = background {
                    slide.background = background.clone();
                }
                if next.slides[*index] == doc.slides[*index] {
                    return Err(Ignored::Unchanged);
                }
                Ok(Applied::keep(next))
            }

            Command::SetTitle(title) => {
                if doc.title == *title {
                    return Err(Ignored::Unchanged);
                }
                let mut next = doc.clone();
                next.title = title.clone();
                Ok(Applied::keep(next))
            }

            Command::ApplyTemplate(template) => {
                let current = doc.current_slide().ok_or(Ignored::NoCurrentSlide)?;
                let selection = match ctx.selected {
                    Some(selected) if current.contains_element(selected) => SelectionChange::Clear,
                    _ => SelectionChange::Keep,
                };

                let mut next = doc.clone();
                let slide = &mut next.slides[doc.current_slide_index];
                slide.background = template.background.clone();
                slide.elements = template.instantiate();
                Ok(Applied::new(next, selection))
            }

            Command::ImportPresentation(data) => {
                let slides = match &data.slides {
                    Some(slides) if !slides.is_empty() => slides.clone(),
                    _ => return Err(Ignored::MissingSlides),
                };
                let next = Presentation {
                    title: data.title.clone().unwrap_or_else(|| doc.title.clone()),
                    slides,
                    current_slide_index: 0,
                };
                Ok(Applied::new(next, SelectionChange::Clear))
            }
        }
    }
}

/// Find `(slide_index, element_index)` for an element id
fn locate(doc: &Presentation, id: &str) -> Result<(usize, usize), Ignored> {
    doc.slides
        .iter()
        .enumerate()
        .find_map(|(slide_index, slide)| {
            slide
                .element_index(id)
                .map(|element_index| (slide_index, element_index))
        })
        .ok_or_else(|| Ignored::ElementNotFound(id.to_owned()))
}

fn ensure_slide(doc: &Presentation, index: usize) -> Result<(), Ignored> {
    if index < doc.slides.len() {
        Ok(())
    } else {
        Err(Ignored::SlideOutOfRange {
            index,
            len: doc.slides.len(),
        })
    }
}

fn ensure_unlocked(doc: &Presentation, ctx: &CommandContext<'_>, id: &str) -> Result<(), Ignored> {
    if doc.is_element_locked(ctx.locked, id) {
        Err(Ignored::ElementLocked(id.to_owned()))
    } else {
        Ok(())
    }
}

/// New index of the slide that was at `current` after moving `from` to `to`
fn follow_moved_slide(current: usize, from: usize, to: usize) -> usize {
    if current == from {
        to
    } else if from < current && current <= to {
        current - 1
    } else if to <= current && current < from {
        current + 1
    } else {
        current
    }
}

#[derive(Clone, Copy)]
enum Stacking {
    Front,
    Back,
}

fn restack(doc: &Presentation, id: &str, stacking: Stacking) -> CommandResult {
    let (slide_index, element_index) = locate(doc, id)?;
    let slide = &doc.slides[slide_index];
    let own = slide.elements[element_index].effective_z_index(element_index);
    let mut others = slide
        .elements
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != element_index)
        .map(|(index, element)| element.effective_z_index(index))
        .peekable();
    if others.peek().is_none() {
        return Err(Ignored::Unchanged);
    }

    // at the edge of the f64 range a step of one no longer moves the value
    let z_index = match stacking {
        Stacking::Front => {
            let top = others.fold(f64::NEG_INFINITY, f64::max);
            let z_index = top + 1.0;
            if own > top || z_index <= top {
                return Err(Ignored::Unchanged);
            }
            z_index
        }
        Stacking::Back => {
            let bottom = others.fold(f64::INFINITY, f64::min);
            let z_index = bottom - 1.0;
            if own < bottom || z_index >= bottom {
                return Err(Ignored::Unchanged);
            }
            z_index
        }
    };

    let mut next = doc.clone();
    next.slides[slide_index].elements[element_index].z_index = Some(z_index);
    Ok(Applied::keep(next))
}
