mod editor_state;
pub mod context;
mod persistence;

pub use editor_state::EditorState;
pub use context::{EditResult, Editor};
pub use persistence::{
    JsonFileStore,
    PersistenceError,
    PersistenceResult,
    Project,
    ProjectRecord,
    SlideStore,
};
