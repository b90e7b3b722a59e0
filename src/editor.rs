//! Command dispatch for the logo editor.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EditorError;
use crate::export::{
    ExportArtifact, ExportConfig, ExportFormat, Exporter, GlyphRasterizer, SvgGlyphRasterizer,
};
use crate::feedback::Acknowledgment;
use crate::glyph;
use crate::history::{History, HistoryStatus};
use crate::render::{self, VisualDescription};
use crate::style::{BackgroundMode, StyleField, StyleState};

// ============================================================================
// Command
// ============================================================================

/// A discrete user action.
///
/// # JSON Format
///
/// ```json
/// { "command": "setField", "args": { "field": "size", "value": 256.0 } }
/// { "command": "export", "args": "png" }
/// { "command": "undo" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "args", rename_all = "camelCase")]
pub enum Command {
    SelectIcon(String),
    SetField(StyleField),
    SetBackgroundMode(BackgroundMode),
    Undo,
    Redo,
    Export(ExportFormat),
}

impl Command {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// ============================================================================
// LogoEditor
// ============================================================================

/// The editing session: one [`History`] plus the export pipeline.
///
/// The history is the only mutator of style state. Every [`Command`] maps to
/// exactly one history operation or one export:
///
/// | Command             | Effect                         |
/// |---------------------|--------------------------------|
/// | `SelectIcon`        | one push (unknown ids rejected) |
/// | `SetField`          | one push                       |
/// | `SetBackgroundMode` | one push                       |
/// | `Undo` / `Redo`     | cursor move, no-op at the ends |
/// | `Export`            | returns an artifact            |
///
/// A successful export starts an [`Acknowledgment`]; a failed one leaves the
/// previous acknowledgment (if any) alone and never touches the history.
pub struct LogoEditor<R: GlyphRasterizer = SvgGlyphRasterizer> {
    history: History,
    exporter: Exporter<R>,
    acknowledgment: Option<Acknowledgment>,
}

impl LogoEditor {
    /// Starts a session at the default style with the given export settings.
    pub fn new(config: ExportConfig) -> Self {
        Self::with_exporter(StyleState::default(), Exporter::new(config))
    }
}

impl Default for LogoEditor {
    fn default() -> Self {
        Self::new(ExportConfig::default())
    }
}

impl<R: GlyphRasterizer> LogoEditor<R> {
    pub fn with_exporter(initial: StyleState, exporter: Exporter<R>) -> Self {
        Self {
            history: History::new(initial),
            exporter,
            acknowledgment: None,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn exporter(&self) -> &Exporter<R> {
        &self.exporter
    }

    /// The authoritative style state.
    pub fn current(&self) -> &StyleState {
        self.history.current()
    }

    pub fn status(&self) -> HistoryStatus {
        self.history.status()
    }

    pub fn render(&self) -> VisualDescription {
        render::render(self.current())
    }

    /// Registers a callback for undo/redo availability changes.
    pub fn subscribe(&mut self, subscriber: impl FnMut(HistoryStatus) + 'static) {
        self.history.subscribe(subscriber);
    }

    pub fn acknowledgment(&self) -> Option<Acknowledgment> {
        self.acknowledgment
    }

    /// Whether the success acknowledgment is still showing at `now`.
    pub fn is_acknowledging(&self, now: Instant) -> bool {
        self.acknowledgment.is_some_and(|ack| ack.is_active(now))
    }

    /// Runs `command` against the wall clock.
    pub fn dispatch(&mut self, command: Command) -> Result<Option<ExportArtifact>, EditorError> {
        self.dispatch_at(command, Utc::now(), Instant::now())
    }

    /// Runs `command`, using `timestamp` for export file names and `now` to
    /// start the acknowledgment.
    ///
    /// Returns the artifact for `Export` and `None` for everything else.
    pub fn dispatch_at(
        &mut self,
        command: Command,
        timestamp: DateTime<Utc>,
        now: Instant,
    ) -> Result<Option<ExportArtifact>, EditorError> {
        match command {
            Command::SelectIcon(id) => {
                let glyph = glyph::find(&id).ok_or(EditorError::UnknownIcon(id))?;
                self.history
                    .push(&StyleField::Icon(glyph.id.to_string()).into());
            }
            Command::SetField(StyleField::Icon(id)) => {
                return self.dispatch_at(Command::SelectIcon(id), timestamp, now);
            }
            Command::SetField(field) => self.history.push(&field.into()),
            Command::SetBackgroundMode(mode) => {
                self.history.push(&StyleField::BackgroundMode(mode).into())
            }
            Command::Undo => {
                self.history.undo();
            }
            Command::Redo => {
                self.history.redo();
            }
            Command::Export(format) => {
                let artifact = self
                    .exporter
                    .export(self.history.current(), format, timestamp)?;
                self.acknowledgment = Some(Acknowledgment::start(now));
                tracing::info!(
                    file = %artifact.file_name,
                    bytes = artifact.bytes.len(),
                    "export complete"
                );
                return Ok(Some(artifact));
            }
        }
        Ok(None)
    }
}
