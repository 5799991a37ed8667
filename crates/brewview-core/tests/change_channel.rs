//! Integration tests for the property + signal change channel pattern.

use std::sync::Arc;

use brewview_core::{
    Diagnostic, DiagnosticKind, Diagnostics, Property, RecordingDiagnostics, Signal,
};
use parking_lot::Mutex;

struct Kettle {
    volume: Property<f64>,
    changed: Signal<(&'static str, f64)>,
}

impl Kettle {
    fn new() -> Self {
        Self {
            volume: Property::new(20.0),
            changed: Signal::new(),
        }
    }

    fn set_volume(&self, liters: f64) {
        if self.volume.set(liters) {
            self.changed.emit(("volume", liters));
        }
    }
}

#[test]
fn test_unchanged_write_is_silent() {
    let kettle = Kettle::new();
    let events = Arc::new(Mutex::new(Vec::new()));

    let events_clone = events.clone();
    kettle.changed.connect(move |change| {
        events_clone.lock().push(*change);
    });

    kettle.set_volume(20.0);
    kettle.set_volume(23.5);
    kettle.set_volume(23.5);

    assert_eq!(*events.lock(), vec![("volume", 23.5)]);
}

#[test]
fn test_slot_can_read_property_during_emit() {
    let kettle = Arc::new(Kettle::new());
    let seen = Arc::new(Mutex::new(0.0));

    let weak = Arc::downgrade(&kettle);
    let seen_clone = seen.clone();
    kettle.changed.connect(move |_| {
        if let Some(kettle) = weak.upgrade() {
            *seen_clone.lock() = kettle.volume.get();
        }
    });

    kettle.set_volume(30.0);
    assert_eq!(*seen.lock(), 30.0);
}

#[test]
fn test_shared_sink_collects_from_many_reporters() {
    let recorder = Arc::new(RecordingDiagnostics::new());
    let sink: Arc<dyn Diagnostics> = recorder.clone();

    let reporters: Vec<_> = ["FermentableTableModel", "HopTableModel"]
        .into_iter()
        .map(|source| {
            let sink = sink.clone();
            std::thread::spawn(move || {
                sink.report(Diagnostic::new(source, DiagnosticKind::BadRow, "row 3"));
            })
        })
        .collect();
    for reporter in reporters {
        reporter.join().unwrap();
    }

    assert_eq!(recorder.count_of(DiagnosticKind::BadRow), 2);
    let mut sources: Vec<_> = recorder.entries().iter().map(|d| d.source).collect();
    sources.sort();
    assert_eq!(sources, vec!["FermentableTableModel", "HopTableModel"]);
}
