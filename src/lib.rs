//! logo-forge: Logo editing with undo/redo and icon export
//!
//! This crate holds the core of an interactive logo editor: a single
//! authoritative [`StyleState`], a [`History`] that is its only mutator, a
//! pure [`render`] step producing a [`VisualDescription`], and an export
//! pipeline that turns the current logo into a PNG, a JPEG or a zipped
//! multi-size icon bundle.
//!
//! # Example
//!
//! ```
//! use logo_forge::{Command, ExportFormat, LogoEditor, StyleField};
//!
//! let mut editor = LogoEditor::default();
//! editor.dispatch(Command::SelectIcon("rocket".into())).unwrap();
//! editor.dispatch(Command::SetField(StyleField::Size(120.0))).unwrap();
//! editor.dispatch(Command::Undo).unwrap();
//! assert_eq!(editor.current().geometry.size, 350.0);
//! editor.dispatch(Command::Redo).unwrap();
//!
//! let png = editor.dispatch(Command::Export(ExportFormat::Png)).unwrap();
//! assert!(png.is_some());
//! ```
//!
//! # Without the editor
//!
//! The pieces are usable on their own:
//!
//! ```
//! use logo_forge::{History, Paint, StyleField, render};
//!
//! let mut history = History::default();
//! history.push(&StyleField::FillOpacity(0.3).into());
//!
//! let desc = render(history.current());
//! assert!(matches!(desc.background, Paint::LinearGradient(_)));
//! assert!((desc.icon.opacity - 0.7).abs() < 1e-6);
//! ```

pub mod editor;
pub mod error;
pub mod export;
pub mod feedback;
pub mod glyph;
pub mod history;
pub mod render;
pub mod style;

pub use editor::{Command, LogoEditor};
pub use error::{AssetError, EditorError, ExportError, Result};
pub use export::{
    ExportArtifact, ExportConfig, ExportFormat, Exporter, GlyphRasterizer, IconBundle, IconSpec,
    ManifestIcon, SvgGlyphRasterizer, ThrottlePolicy, WebManifest,
};
pub use feedback::{Acknowledgment, ConfettiBurst};
pub use glyph::Glyph;
pub use history::{History, HistoryStatus, Snapshot};
pub use render::{Paint, VisualDescription, render};
pub use style::{BackgroundMode, Color, IconColor, StyleField, StylePatch, StyleState};
