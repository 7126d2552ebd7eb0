//! # extra-styles-engine
//!
//! Renders user-defined inline styles written as code spans, such as
//! `` `_underlined_` `` or `` `^superscript^` ``.
//!
//! ```text
//! Document ─ visible ranges ─► syntax walk ─► code span text ─► Grammar
//!                                                                 │ Styled
//!                 DecorationSet ◄─ StyleWidget ◄─ render adapter ◄┘
//! ```
//!
//! - [`grammar`] matches code span text against the configured rules.
//! - [`render`] turns a match into elements ([`dom`]).
//! - [`decorations`] runs one pass over the visible part of a document.
//! - [`live_preview`] decides when to re-run it and keeps unchanged widgets.
//! - [`commands`] wraps and unwraps selections in a style.
//! - [`static_render`] applies the same styles to a whole document as HTML.

pub mod commands;
pub mod decorations;
pub mod dom;
pub mod editing;
pub mod grammar;
pub mod live_preview;
pub mod render;
pub mod rope;
pub mod scheduler;
pub mod static_render;
pub mod widget;

// Re-export key types for easier usage
pub use commands::{CommandError, ToggleCommand, toggle_commands, toggle_style};
pub use decorations::{Decoration, DecorationEngine, DecorationSet, compute_decorations};
pub use editing::{Cmd, Document, Patch, Selection, ViewState};
pub use grammar::{Grammar, ParseResult};
pub use live_preview::{LivePreview, ViewUpdate};
pub use rope::Span;
pub use scheduler::{FOCUS_SETTLE_DELAY, Scheduler};
pub use widget::{PointerEvent, PointerPlacement, StyleWidget, WidgetKey, WidgetRect};
