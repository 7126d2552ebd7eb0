//! # Editing core
//!
//! The document lives in a single **`xi_rope::Rope`** buffer. Edits are
//! expressed as [`Cmd`] values that compile to xi-rope `Delta`s, so every
//! change is applied in one step and the bytes on disk never drift from
//! the bytes the user typed.
//!
//! After each edit the document is re-parsed into the lossless syntax tree
//! from `extra-styles-syntax`, which the decoration engine walks.
//!
//! ```rust
//! use extra_styles_engine::editing::{Cmd, Document};
//!
//! let mut doc = Document::from_text("Hello world\n");
//! let patch = doc.apply(Cmd::InsertText { at: 6, text: "`_".to_string() });
//! assert_eq!(patch.version, 1);
//! assert_eq!(doc.text(), "Hello `_world\n");
//! ```

pub mod commands;
pub mod document;
pub mod patch;
pub mod selection;

pub use commands::Cmd;
pub use document::{Document, ViewState};
pub use patch::Patch;
pub use selection::Selection;
