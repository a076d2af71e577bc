//! Recovery-oriented extraction of slide objects from a partially streamed
//! JSON array.
//!
//! The buffer handed to [`extract_slides`] is usually cut off in the middle
//! of an object. A direct parse is tried first; when it fails, a brace-depth
//! scanner pulls out every top-level object that is already complete.

use serde_json::{Map, Value};

use crate::element::{Element, Position, Size, factory};
use crate::slide::{DEFAULT_BACKGROUND, Slide};

const FENCE: &str = "```";

/// A slide object emitted by the generator: any JSON object carrying both an
/// `id` and a `template`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSlide {
    key: String,
    fields: Map<String, Value>,
}

impl GeneratedSlide {
    /// Accept `value` if it is a well-formed slide object
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(fields) = value else {
            return None;
        };
        let key = match fields.get("id")? {
            Value::Null => return None,
            id => id.to_string(),
        };
        if fields.get("template").is_none_or(Value::is_null) {
            return None;
        }
        Some(Self { key, fields })
    }

    /// The generator's id as JSON text (`"1"` and `1` stay distinct); used
    /// for deduplication
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn template(&self) -> Option<&str> {
        self.str_field("template")
    }

    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Convert into a document slide. `number` is the 1-based position used
    /// for the fallback title.
    ///
    /// Explicit `elements` are used when present (each gets a fresh id);
    /// otherwise text elements are laid out from `title`, `subtitle`,
    /// `content` and `bullets`.
    pub fn into_slide(&self, number: usize) -> Slide {
        let title = self
            .title()
            .map(str::to_owned)
            .unwrap_or_else(|| format!("Slide {number}"));
        let mut slide = Slide::new(title);
        slide.background = self
            .str_field("background")
            .unwrap_or(DEFAULT_BACKGROUND)
            .to_owned();
        slide.template = self.template().map(str::to_owned);
        slide.elements = match self.fields.get("elements") {
            Some(Value::Array(elements)) => elements
                .iter()
                .filter_map(|value| serde_json::from_value::<Element>(value.clone()).ok())
                .map(|element| element.with_fresh_id())
                .collect(),
            _ => self.text_elements(&slide.title),
        };
        slide
    }

    fn text_elements(&self, title: &str) -> Vec<Element> {
        let mut elements = vec![factory::create_text(
            title,
            40,
            Position::new(60.0, 50.0),
            Size::new(840.0, 80.0),
        )];

        if let Some(subtitle) = self.str_field("subtitle") {
            elements.push(factory::create_text(
                subtitle,
                24,
                Position::new(60.0, 140.0),
                Size::new(840.0, 50.0),
            ));
        }

        let body = match (self.fields.get("content"), self.fields.get("bullets")) {
            (Some(Value::String(content)), _) => Some(content.clone()),
            (_, Some(Value::Array(bullets))) | (Some(Value::Array(bullets)), _) => Some(
                bullets
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|bullet| format!("• {bullet}"))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            _ => None,
        };
        if let Some(body) = body.filter(|body| !body.is_empty()) {
            elements.push(factory::create_text(
                &body,
                20,
                Position::new(60.0, 210.0),
                Size::new(840.0, 280.0),
            ));
        }
        elements
    }
}

/// Extract every well-formed slide currently recoverable from `buffer`.
///
/// Never fails: a buffer with nothing recoverable yields an empty list.
pub fn extract_slides(buffer: &str) -> Vec<GeneratedSlide> {
    let cleaned = strip_markup(buffer);
    let start = cleaned.find('[');

    if let Some(slides) = parse_array(array_slice(&cleaned, start)) {
        return slides;
    }

    scan_objects(&cleaned[start.unwrap_or(0)..])
}

/// Remove code-fence markers (with their language tag) and `//` line
/// comments that sit outside string literals.
pub fn strip_markup(buffer: &str) -> String {
    let mut out = String::with_capacity(buffer.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = buffer;

    while let Some(c) = rest.chars().next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            rest = &rest[c.len_utf8()..];
            continue;
        }

        if let Some(after) = rest.strip_prefix(FENCE) {
            rest = after.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
            continue;
        }
        if rest.starts_with("//") {
            rest = &rest[rest.find('\n').unwrap_or(rest.len())..];
            continue;
        }

        if c == '"' {
            in_string = true;
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

/// Slice from the first `[` to the last `]` when both exist in that order
fn array_slice(cleaned: &str, start: Option<usize>) -> &str {
    match (start, cleaned.rfind(']')) {
        (Some(start), Some(end)) if start < end => &cleaned[start..=end],
        _ => cleaned,
    }
}

fn parse_array(text: &str) -> Option<Vec<GeneratedSlide>> {
    match serde_json::from_str::<Value>(text).ok()? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(GeneratedSlide::from_value)
                .collect(),
        ),
        _ => None,
    }
}

/// Walk `text` tracking string state and brace depth; every time the depth
/// returns to zero, try the enclosed `{...}` as a standalone object.
fn scan_objects(text: &str) -> Vec<GeneratedSlide> {
    let mut slides = Vec::new();
    let mut depth = 0usize;
    let mut object_start = 0;
    let mut in_string = false;
    let mut chars = text.char_indices();

    while let Some((i, c)) = chars.next() {
        if in_string {
            match c {
                '\\' => {
                    chars.next();
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => {
                if depth == 0 {
                    object_start = i;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    let candidate = &text[object_start..=i];
                    match serde_json::from_str::<Value>(candidate) {
                        Ok(value) => slides.extend(GeneratedSlide::from_value(value)),
                        Err(err) => log::trace!("skipping unparsable object: {err}"),
                    }
                }
            }
            _ => {}
        }
    }
    slides
}

#[cfg(test)]
mod tests {
    use super::*;

    const DECK: &str = r#"[
        {"id": 1, "template": "title", "title": "Launch {plan}", "subtitle": "Q3"},
        {"id": 2, "template": "bullets", "title": "Goals", "bullets": ["Grow \"reach\"", "Convert"]}
    ]"#;

    #[test]
    fn parses_a_complete_array_directly() {
        let slides = extract_slides(DECK);
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].key(), "1");
        assert_eq!(slides[1].key(), "2");
        assert_eq!(slides[1].template(), Some("bullets"));
    }

    #[test]
    fn strips_fences_and_comments_outside_strings() {
        let buffer = "```json\n[{\"id\":\"a\",\"template\":\"t\",\"src\":\"https://x.test\"} // first\n]\n```";
        let cleaned = strip_markup(buffer);
        assert!(!cleaned.contains("```"));
        assert!(!cleaned.contains("// first"));
        assert!(cleaned.contains("https://x.test"));
        assert_eq!(extract_slides(buffer).len(), 1);
    }

    #[test]
    fn recovers_complete_objects_from_a_truncated_buffer() {
        let cut = DECK.find("\"Convert").unwrap();
        let slides = extract_slides(&DECK[..cut]);
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].title(), Some("Launch {plan}"));
    }

    #[test]
    fn objects_without_id_or_template_are_dropped() {
        let buffer = r#"[{"id": "a"}, {"template": "t"}, {"id": null, "template": "t"}, {"id": "b", "template": "t"}"#;
        let slides = extract_slides(buffer);
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].key(), r#""b""#);
    }

    #[test]
    fn numeric_and_string_ids_are_distinct_keys() {
        let slides = extract_slides(r#"[{"id": 1, "template": "t"}, {"id": "1", "template": "t"}]"#);
        assert_eq!(slides.len(), 2);
        assert_ne!(slides[0].key(), slides[1].key());
    }

    #[test]
    fn garbage_yields_nothing() {
        assert!(extract_slides("").is_empty());
        assert!(extract_slides("}}}{{\"\\").is_empty());
        assert!(extract_slides("] no array here [").is_empty());
    }

    #[test]
    fn bullets_become_a_text_body() {
        let slides = extract_slides(DECK);
        let slide = slides[1].into_slide(2);
        assert_eq!(slide.title, "Goals");
        assert_eq!(slide.template.as_deref(), Some("bullets"));
        assert_eq!(slide.elements.len(), 2);
        assert_eq!(
            slide.elements[1].property_str("text"),
            Some("• Grow \"reach\"\n• Convert")
        );
    }

    #[test]
    fn explicit_elements_get_fresh_ids() {
        let buffer = r#"[{"id":"s","template":"custom","elements":[
            {"id":"placeholder","type":"shape","position":{"x":1,"y":2},"size":{"width":3,"height":4}},
            {"id":"broken","type":"video"}
        ]}]"#;
        let slide = extract_slides(buffer)[0].into_slide(1);
        assert_eq!(slide.title, "Slide 1");
        assert_eq!(slide.elements.len(), 1);
        assert_ne!(slide.elements[0].id, "placeholder");
    }
}
