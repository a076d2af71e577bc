use std::sync::atomic::{AtomicUsize, Ordering};

use crate::util::time;

// Single static counter shared by slide and element ids
static NEXT_ID_SEQUENCE: AtomicUsize = AtomicUsize::new(1);

fn next_sequence() -> usize {
    NEXT_ID_SEQUENCE.fetch_add(1, Ordering::SeqCst)
}

/// Generate an element id of the form `element-<millis>-<random>`.
///
/// The random part starts with a process-wide sequence number, so two ids
/// minted within the same millisecond still differ.
pub fn generate_element_id() -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "element-{}-{:x}{}",
        time::timestamp_millis(),
        next_sequence(),
        &random[..7]
    )
}

/// Generate a slide id of the form `slide-<millis>-<seq>`.
pub fn generate_slide_id() -> String {
    format!("slide-{}-{}", time::timestamp_millis(), next_sequence())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn element_ids_do_not_collide_within_a_millisecond() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_element_id()).collect();
        assert_eq!(ids.len(), 1000);
        assert!(ids.iter().all(|id| id.starts_with("element-")));
    }

    #[test]
    fn slide_ids_are_prefixed() {
        let a = generate_slide_id();
        let b = generate_slide_id();
        assert!(a.starts_with("slide-"));
        assert_ne!(a, b);
    }
}
