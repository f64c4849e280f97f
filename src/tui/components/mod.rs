//! # TUI Components
//!
//! One component per piece of screen. Each receives its data as props
//! (struct fields borrowed from `App`, `TuiState` and `Theme`) and draws
//! into the `Rect` it is given. No component reads global state.
//!
//! ```text
//! components/
//! ├── title_bar.rs    (top line: app name, location, busy marker)
//! ├── status_bar.rs   (bottom line: notice or key hints)
//! ├── path_prompt.rs  (first-run directory prompt)
//! ├── note_list.rs    (browsing: filter line + note list)
//! └── note_view.rs    (viewing: visible lines + scrollbar)
//! ```

mod note_list;
mod note_view;
mod path_prompt;
mod status_bar;
mod title_bar;

pub use note_list::NoteList;
pub use note_view::{NoteView, SCROLLBAR_WIDTH};
pub use path_prompt::PathPrompt;
pub use status_bar::StatusBar;
pub use title_bar::TitleBar;
