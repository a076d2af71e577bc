use std::collections::HashSet;

use futures::future::{self, Either};
use futures::{Stream, StreamExt};
use parking_lot::Mutex;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::extractor::{GeneratedSlide, extract_slides};
use crate::error::EditorResult;
use crate::state::Editor;

/// Accumulates streamed text and hands out each slide exactly once.
#[derive(Debug, Default)]
pub struct GenerationSession {
    buffer: String,
    seen: HashSet<String>,
}

impl GenerationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return the slides that became complete with it
    pub fn push_chunk(&mut self, chunk: &str) -> Vec<GeneratedSlide> {
        self.buffer.push_str(chunk);
        extract_slides(&self.buffer)
            .into_iter()
            .filter(|slide| self.seen.insert(slide.key().to_owned()))
            .collect()
    }

    /// Number of distinct slides handed out so far
    pub fn emitted(&self) -> usize {
        self.seen.len()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }
}

/// Deck substituted when a finished stream produced no slides at all.
pub fn default_deck() -> Vec<GeneratedSlide> {
    let deck = json!([
        {
            "id": "default-1",
            "template": "title",
            "title": "Marketing Plan",
            "subtitle": "Strategy overview",
        },
        {
            "id": "default-2",
            "template": "bullets",
            "title": "Objectives",
            "bullets": [
                "Define the target audience",
                "Set measurable growth goals",
                "Choose the primary channels",
            ],
        },
        {
            "id": "default-3",
            "template": "bullets",
            "title": "Next Steps",
            "bullets": [
                "Assign owners and budget",
                "Launch the first campaign",
                "Review results monthly",
            ],
        },
    ]);
    match deck {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(GeneratedSlide::from_value)
            .collect(),
        _ => Vec::new(),
    }
}

/// How a driven generation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    Completed { slides: usize, used_fallback: bool },
    Cancelled { slides: usize },
}

/// Feed every chunk of `stream` into the editor until the stream ends or
/// `cancel` fires.
///
/// Cancellation is raced against the next chunk, so a stalled source does
/// not keep the editor in generation mode. The editor is locked once per
/// chunk, never across an await. A stream error ends consumption early;
/// whatever was extracted so far is kept.
pub async fn drive_generation<S, E>(
    editor: &Mutex<Editor>,
    stream: S,
    cancel: &CancellationToken,
) -> EditorResult<GenerationOutcome>
where
    S: Stream<Item = Result<String, E>>,
    E: std::fmt::Display,
{
    editor.lock().begin_generation()?;
    futures::pin_mut!(stream);
    let cancelled = cancel.cancelled();
    futures::pin_mut!(cancelled);

    loop {
        let chunk = match future::select(cancelled.as_mut(), stream.next()).await {
            Either::Left(_) | Either::Right((None, _)) => break,
            Either::Right((Some(chunk), _)) => chunk,
        };
        // cancelled while the chunk was being produced
        if cancel.is_cancelled() {
            break;
        }
        match chunk {
            Ok(chunk) => {
                editor.lock().push_generation_chunk(&chunk)?;
            }
            Err(err) => {
                editor.lock().report_generation_error(&err.to_string());
                break;
            }
        }
    }

    let mut editor = editor.lock();
    if cancel.is_cancelled() {
        let slides = editor.cancel_generation()?;
        return Ok(GenerationOutcome::Cancelled { slides });
    }
    let (slides, used_fallback) = editor.finish_generation()?;
    Ok(GenerationOutcome::Completed {
        slides,
        used_fallback,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_never_repeat_a_slide() {
        let mut session = GenerationSession::new();
        let first = session.push_chunk(r#"[{"id":"a","template":"t"},"#);
        assert_eq!(first.len(), 1);
        let second = session.push_chunk(r#"{"id":"b","template":"t"}]"#);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].key(), r#""b""#);
        assert!(session.push_chunk("").is_empty());
        assert_eq!(session.emitted(), 2);
    }

    #[test]
    fn mixed_id_types_are_both_emitted() {
        let mut session = GenerationSession::new();
        let first = session.push_chunk(r#"[{"id":7,"template":"t","title":"Seven"},"#);
        assert_eq!(first.len(), 1);
        let second = session.push_chunk(r#"{"id":"7","template":"t","title":"Also seven"}]"#);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].title(), Some("Also seven"));
        assert_eq!(session.emitted(), 2);
    }

    #[test]
    fn default_deck_is_well_formed() {
        let deck = default_deck();
        assert_eq!(deck.len(), 3);
        assert_eq!(deck[0].title(), Some("Marketing Plan"));
    }

    #[test]
    fn cancelled_before_start_consumes_nothing() {
        let editor = Mutex::new(Editor::default());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let chunks = vec![Ok::<_, String>(r#"[{"id":"a","template":"t"}]"#.to_owned())];
        let source = futures::stream::iter(chunks);
        let outcome =
            futures::executor::block_on(drive_generation(&editor, source, &cancel)).unwrap();
        assert_eq!(outcome, GenerationOutcome::Cancelled { slides: 0 });
        assert_eq!(editor.lock().document().slides[0].title, "Slide 1");
    }
}
