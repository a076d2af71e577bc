//! Turning a generated token stream into slides.

mod extractor;
mod session;

pub use extractor::{GeneratedSlide, extract_slides, strip_markup};
pub use session::{GenerationOutcome, GenerationSession, default_deck, drive_generation};
pub use tokio_util::sync::CancellationToken;
