use std::collections::HashSet;
use std::sync::{Arc, Mutex as StdMutex};
use std::thread;
use std::time::Duration;

use deck_editor::event::{EditorEvent, EventTopic, GenerationEvent};
use deck_editor::stream::{
    CancellationToken, GenerationOutcome, GenerationSession, drive_generation, extract_slides,
};
use deck_editor::{Editor, ElementKind, Ignored};
use futures::executor::block_on;
use futures::stream::{self, StreamExt};
use parking_lot::Mutex;

const DECK: &str = r#"```json
[
  // opening slide
  {"id": "s1", "template": "title", "title": "Spring {Launch}", "subtitle": "Plan \"A\" \\ backup"},
  {"id": "s2", "template": "bullets", "title": "Channels", "bullets": ["Email", "Social: {paid}", "Events"]},
  {"id": 3, "template": "chart", "title": "Budget", "elements": [
    {"id": "x", "type": "chart", "position": {"x": 60, "y": 120}, "size": {"width": 400, "height": 260},
     "properties": {"chartType": "pie", "data": [40, 35, 25], "labels": ["Ads", "Content", "Events"]}}
  ]},
  {"id": "s4", "template": "closing", "title": "Thanks - questions? https://example.com/q"}
]
```"#;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn chunks(text: &str, size: usize) -> Vec<Result<String, String>> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(size)
        .map(|chunk| Ok(chunk.iter().collect()))
        .collect()
}

#[test]
fn test_char_by_char_growth_emits_each_slide_once() {
    let mut session = GenerationSession::new();
    let mut keys = Vec::new();

    for c in DECK.chars() {
        let mut buf = [0u8; 4];
        for slide in session.push_chunk(c.encode_utf8(&mut buf)) {
            keys.push(slide.key().to_owned());
        }
    }

    assert_eq!(keys, vec![r#""s1""#, r#""s2""#, "3", r#""s4""#]);
    let unique: HashSet<&String> = keys.iter().collect();
    assert_eq!(unique.len(), 4);
}

#[test]
fn test_every_truncation_point_is_tolerated() {
    let complete = extract_slides(DECK).len();
    assert_eq!(complete, 4);

    let mut previous = 0;
    for (offset, _) in DECK.char_indices() {
        let slides = extract_slides(&DECK[..offset]);
        assert!(slides.len() <= complete);
        // a longer prefix never loses a slide
        assert!(slides.len() >= previous, "lost slides at offset {offset}");
        previous = slides.len();
    }
}

#[test]
fn test_drive_generation_replaces_the_deck() {
    init_logging();
    let mut editor = Editor::default();
    editor.add_new_element(ElementKind::Text).unwrap();
    let before = editor.document().clone();
    let editor = Mutex::new(editor);

    let outcome = block_on(drive_generation(
        &editor,
        stream::iter(chunks(DECK, 7)),
        &CancellationToken::new(),
    ))
    .unwrap();
    assert_eq!(
        outcome,
        GenerationOutcome::Completed {
            slides: 4,
            used_fallback: false
        }
    );

    let mut editor = editor.into_inner();
    let doc = editor.document();
    assert_eq!(doc.slides.len(), 4);
    assert_eq!(doc.slides[0].title, "Spring {Launch}");
    assert_eq!(doc.slides[0].template.as_deref(), Some("title"));
    assert_eq!(doc.slides[2].elements[0].kind, ElementKind::Chart);
    assert!(editor.state().is_idle());

    // the whole generation undoes in one step
    editor.undo().unwrap();
    assert_eq!(editor.document(), &before);
}

#[test]
fn test_empty_stream_falls_back_to_default_deck() {
    let editor = Mutex::new(Editor::default());
    let outcome = block_on(drive_generation(
        &editor,
        stream::iter(chunks("Sorry, I can't help with that.", 5)),
        &CancellationToken::new(),
    ))
    .unwrap();

    assert_eq!(
        outcome,
        GenerationOutcome::Completed {
            slides: 3,
            used_fallback: true
        }
    );
    assert_eq!(editor.lock().document().slides[0].title, "Marketing Plan");
}

#[test]
fn test_cancellation_stops_consumption() {
    let editor = Mutex::new(Editor::default());
    let original = editor.lock().document().clone();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();

    let mut seen = 0;
    let source = stream::iter(chunks(DECK, 40)).map(move |chunk| {
        seen += 1;
        if seen == 2 {
            trigger.cancel();
        }
        chunk
    });

    let outcome = block_on(drive_generation(&editor, source, &cancel)).unwrap();
    assert_eq!(outcome, GenerationOutcome::Cancelled { slides: 0 });

    let editor = editor.into_inner();
    assert!(!editor.is_generating());
    assert_eq!(editor.document(), &original);
}

#[test]
fn test_cancel_reaches_a_stalled_stream() {
    let editor = Mutex::new(Editor::default());
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();

    // one chunk, then the source never yields again
    let source = stream::iter(vec![Ok::<_, String>("[".to_owned())]).chain(stream::pending());
    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        trigger.cancel();
    });

    let outcome = block_on(drive_generation(&editor, source, &cancel)).unwrap();
    canceller.join().unwrap();
    assert_eq!(outcome, GenerationOutcome::Cancelled { slides: 0 });

    let mut editor = editor.into_inner();
    assert!(!editor.is_generating());
    editor.add_new_slide().unwrap();
    assert_eq!(editor.document().slides.len(), 2);
}

#[test]
fn test_stream_error_keeps_extracted_slides() {
    let editor = Mutex::new(Editor::default());
    let failures = Arc::new(StdMutex::new(Vec::new()));
    let sink = failures.clone();
    let on_failure = move |event: &EditorEvent| {
        if let EditorEvent::Generation(GenerationEvent::Failed { message }) = event {
            sink.lock().unwrap().push(message.clone());
        }
    };
    editor
        .lock()
        .subscribe_to(EventTopic::Generation, Box::new(on_failure));

    let items: Vec<Result<String, String>> = vec![
        Ok(r#"[{"id":"a","template":"title","title":"Only"},"#.to_owned()),
        Err("connection reset".to_owned()),
        Ok(r#"{"id":"b","template":"title"}]"#.to_owned()),
    ];
    let outcome = block_on(drive_generation(
        &editor,
        stream::iter(items),
        &CancellationToken::new(),
    ))
    .unwrap();

    assert_eq!(
        outcome,
        GenerationOutcome::Completed {
            slides: 1,
            used_fallback: false
        }
    );
    assert_eq!(editor.lock().document().slides[0].title, "Only");
    assert_eq!(*failures.lock().unwrap(), vec!["connection reset".to_owned()]);
}

#[test]
fn test_editing_is_refused_while_generating() {
    let mut editor = Editor::default();
    editor.begin_generation().unwrap();

    assert_eq!(editor.add_new_slide(), Err(Ignored::Generating));
    assert_eq!(editor.undo(), Err(Ignored::Generating));
    assert!(editor.begin_generation().is_err());

    let appended = editor
        .push_generation_chunk(r#"[{"id":1,"template":"title","title":"Live"}"#)
        .unwrap();
    assert_eq!(appended, 1);
    assert_eq!(editor.finish_generation().unwrap(), (1, false));

    editor.add_new_slide().unwrap();
    assert_eq!(editor.document().slides.len(), 2);
}
