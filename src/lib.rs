#![warn(clippy::all, rust_2018_idioms)]

pub mod autosave;
pub mod command;
pub mod config;
pub mod document;
pub mod element;
pub mod error;
pub mod event;
pub mod id_generator;
pub mod slide;
pub mod state;
pub mod stream;
pub mod util;

pub use command::{Command, History, ImportData};
pub use config::EditorConfig;
pub use document::{LockedElements, Presentation};
pub use element::{Element, ElementKind, Position, Size};
pub use error::{EditorError, Ignored};
pub use slide::{Slide, Template};
pub use state::{Editor, EditorState, SlideStore};
pub use stream::{CancellationToken, GenerationSession, drive_generation, extract_slides};
