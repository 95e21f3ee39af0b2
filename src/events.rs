/// Event Sink Module
///
/// Operation progress is reported through an injected `Reporter` instead of
/// being printed from the core. The binary installs a console reporter;
/// tests install a recording reporter and assert on the emitted events.
use crate::classifier::ScriptCategory;
use crate::reflect::ObjectKind;
use std::path::PathBuf;
use std::sync::Mutex;

/// Progress events emitted by the three public operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A fresh database file was created (build only).
    DatabaseCreated { path: PathBuf },
    /// A script file was classified and queued for execution.
    ScriptQueued {
        path: PathBuf,
        category: ScriptCategory,
    },
    /// A script file matched no category and will not be executed.
    ScriptSkipped { path: PathBuf },
    /// A script file is about to execute.
    ScriptExecuting { path: PathBuf },
    /// A schema object was written to the output directory.
    ObjectExported { kind: ObjectKind, name: String },
    /// A catalog row was visited but could not be exported.
    RowSkipped {
        kind: ObjectKind,
        name: String,
        reason: String,
    },
    /// Procedure reflection finished; exported never exceeds visited.
    ProcedureExportFinished { visited: usize, exported: usize },
}

/// Sink for operation progress events.
pub trait Reporter {
    fn report(&self, event: Event);
}

/// Reporter that discards every event.
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _event: Event) {}
}

/// Reporter that stores every event for later inspection.
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<Event>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events reported so far.
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().expect("reporter lock poisoned").clone()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: Event) {
        self.events.lock().expect("reporter lock poisoned").push(event);
    }
}
