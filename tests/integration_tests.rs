//! Integration Tests
//!
//! End-to-end tests for the Import and Export commands, run through the
//! public command API with recording collaborators.

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use tempfile::tempdir;

use nueva_automation::commands::{
    run_script_line, CollectingSink, Command, CommandContext, ExportCommand, ImportCommand,
    Services,
};
use nueva_automation::config::AutomationConfig;
use nueva_automation::document::{
    AudioTrack, Document, Label, LabelTrack, SelectedRegion, Track,
};
use nueva_automation::engine::{
    read_wav, ExportBackend, FileImporter, Importer, MediaExportRequest, WavExportBackend,
};
use nueva_automation::export::{backup_path_for, FileSystem, OsFileSystem, OutputFile};
use nueva_automation::{AutomationError, Result};

// === Test collaborators ===

/// Real filesystem that records every call
#[derive(Default)]
struct RecordingFileSystem {
    calls: RefCell<Vec<String>>,
}

impl RecordingFileSystem {
    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl FileSystem for RecordingFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.record(format!("exists {}", path.display()));
        OsFileSystem.exists(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.record(format!("remove {}", path.display()));
        OsFileSystem.remove_file(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.record(format!("rename {} {}", from.display(), to.display()));
        OsFileSystem.rename(from, to)
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn OutputFile>> {
        self.record(format!("create {}", path.display()));
        OsFileSystem.create(path)
    }
}

/// Real filesystem on which creating a file always fails
struct NoCreateFileSystem;

impl FileSystem for NoCreateFileSystem {
    fn exists(&self, path: &Path) -> bool {
        OsFileSystem.exists(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        OsFileSystem.remove_file(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        OsFileSystem.rename(from, to)
    }

    fn create(&self, _path: &Path) -> io::Result<Box<dyn OutputFile>> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only volume"))
    }
}

/// Backend that records requests and answers with a fixed outcome
struct CapturingBackend {
    succeed: bool,
    requests: RefCell<Vec<MediaExportRequest>>,
}

impl CapturingBackend {
    fn new(succeed: bool) -> Self {
        Self {
            succeed,
            requests: RefCell::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<MediaExportRequest> {
        self.requests.borrow().clone()
    }
}

impl ExportBackend for CapturingBackend {
    fn process(&self, _document: &Document, request: &MediaExportRequest) -> Result<()> {
        self.requests.borrow_mut().push(request.clone());
        if self.succeed {
            Ok(())
        } else {
            Err(AutomationError::UnsupportedFormat {
                format: request.format.clone(),
            })
        }
    }
}

/// Importer that always refuses
struct FailingImporter;

impl Importer for FailingImporter {
    fn import(&self, _document: &mut Document, path: &Path) -> Result<()> {
        Err(AutomationError::InvalidAudio {
            reason: format!("cannot decode {}", path.display()),
            source: None,
        })
    }
}

struct Outcome {
    ok: bool,
    sink: CollectingSink,
}

fn run_command<C: Command>(
    command: &C,
    document: &mut Document,
    importer: &dyn Importer,
    backend: &dyn ExportBackend,
    fs: &dyn FileSystem,
) -> Outcome {
    let config = AutomationConfig {
        backup_suffix: "~".to_string(),
        ..AutomationConfig::default()
    };
    let services = Services::new(importer, backend, fs, &config);
    let mut sink = CollectingSink::new();
    let ok = {
        let mut context = CommandContext::new(document, services, &mut sink);
        command.apply(&mut context)
    };

    // Exactly one message per run, matching the outcome
    assert_eq!(sink.reports.len(), 1, "reports: {:?}", sink.reports);
    assert_eq!(sink.statuses().len(), usize::from(ok));
    assert_eq!(sink.errors().len(), usize::from(!ok));

    Outcome { ok, sink }
}

fn export(
    command: &ExportCommand,
    document: &mut Document,
    backend: &dyn ExportBackend,
    fs: &dyn FileSystem,
) -> Outcome {
    run_command(command, document, &FileImporter, backend, fs)
}

fn labelled_document() -> Document {
    let mut doc = Document::new("Session");
    doc.append_track(Track::label(
        "Verses",
        LabelTrack::new(vec![
            Label::new(0.5, 4.25, "Verse 1"),
            Label::new(12.0, 16.125, "Verse 2"),
        ]),
    ));
    doc.append_track(Track::audio("Voice", AudioTrack::new(1000, vec![0.25; 3000])));
    doc.append_track(Track::label(
        "Hits",
        LabelTrack::new(vec![Label::point(8.0, "Snare roll")]),
    ));
    doc.set_selection(SelectedRegion::new(1.0, 2.0));
    doc
}

fn target(dir: &Path, name: &str) -> String {
    dir.join(name).to_string_lossy().to_string()
}

// === Dispatch ===

#[test]
fn test_missing_extension_fails_before_any_filesystem_call() {
    let fs = RecordingFileSystem::default();
    let backend = CapturingBackend::new(true);
    let mut doc = labelled_document();

    for name in ["exported", "exported.", "some.dir/exported."] {
        let outcome = export(&ExportCommand::new(name, 1), &mut doc, &backend, &fs);
        assert!(!outcome.ok);
        assert_eq!(outcome.sink.errors(), vec!["Export filename must have an extension!"]);
    }

    assert!(fs.calls().is_empty());
    assert!(backend.requests().is_empty());
}

#[test]
fn test_dot_in_directory_counts_as_extension() {
    let fs = RecordingFileSystem::default();
    let backend = CapturingBackend::new(false);
    let mut doc = labelled_document();

    let outcome = export(&ExportCommand::new("some.dir/exported", 1), &mut doc, &backend, &fs);

    assert!(!outcome.ok);
    assert_eq!(outcome.sink.errors(), vec!["Could not export to DIR/EXPORTED format!"]);
    assert_eq!(backend.requests()[0].format, "DIR/EXPORTED");
    assert!(fs.calls().is_empty());
}

#[test]
fn test_txt_extension_goes_to_label_exporter_in_any_case() {
    let dir = tempdir().unwrap();
    for name in ["a.txt", "b.TXT", "c.Txt"] {
        let fs = RecordingFileSystem::default();
        let backend = CapturingBackend::new(true);
        let path = target(dir.path(), name);
        let mut doc = labelled_document();

        let outcome = export(&ExportCommand::new(path.as_str(), 2), &mut doc, &backend, &fs);

        assert!(outcome.ok, "{}", name);
        assert_eq!(
            outcome.sink.statuses(),
            vec![format!("Exported to TXT format: {}", path)]
        );
        assert!(backend.requests().is_empty());
        assert!(!fs.calls().is_empty());
        assert!(Path::new(&path).exists());
    }
}

#[test]
fn test_other_extensions_go_to_backend() {
    let dir = tempdir().unwrap();
    let fs = RecordingFileSystem::default();
    let backend = CapturingBackend::new(true);
    let path = target(dir.path(), "mix.Flac");
    let mut doc = labelled_document();

    let outcome = export(&ExportCommand::new(path.as_str(), 2), &mut doc, &backend, &fs);

    assert!(outcome.ok);
    assert_eq!(
        outcome.sink.statuses(),
        vec![format!("Exported to FLAC format: {}", path)]
    );
    assert!(fs.calls().is_empty());

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0],
        MediaExportRequest {
            channels: 2,
            format: "FLAC".to_string(),
            path: PathBuf::from(&path),
            selected_only: true,
            t0: 1.0,
            t1: 2.0,
        }
    );
}

#[test]
fn test_negative_channel_count_reaches_backend_as_zero() {
    let backend = CapturingBackend::new(true);
    let mut doc = labelled_document();
    let command =
        ExportCommand::with_arguments([("Filename", "out.wav"), ("NumChannels", "-5")]).unwrap();

    let outcome = export(&command, &mut doc, &backend, &RecordingFileSystem::default());

    assert!(outcome.ok);
    assert_eq!(backend.requests()[0].channels, 0);
}

#[test]
fn test_backend_failure_is_format_qualified() {
    let backend = CapturingBackend::new(false);
    let mut doc = labelled_document();

    let outcome = export(&ExportCommand::new("take.ogg", 1), &mut doc, &backend, &OsFileSystem);

    assert!(!outcome.ok);
    assert_eq!(outcome.sink.errors(), vec!["Could not export to OGG format!"]);
    assert_eq!(backend.requests().len(), 1);
}

// === Label export ===

#[test]
fn test_label_export_without_label_tracks_creates_nothing() {
    let dir = tempdir().unwrap();
    let path = target(dir.path(), "labels.txt");
    let mut doc = Document::new("Audio only");
    doc.append_track(Track::audio("Voice", AudioTrack::new(1000, vec![0.0; 10])));

    let outcome = export(
        &ExportCommand::new(path.as_str(), 1),
        &mut doc,
        &CapturingBackend::new(true),
        &OsFileSystem,
    );

    assert!(!outcome.ok);
    assert_eq!(outcome.sink.errors(), vec!["Could not export to TXT format!"]);
    assert!(!Path::new(&path).exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_label_export_backs_up_existing_file() {
    let dir = tempdir().unwrap();
    let path = target(dir.path(), "labels.txt");
    fs::write(&path, "OLD").unwrap();
    let mut doc = labelled_document();

    let outcome = export(
        &ExportCommand::new(path.as_str(), 1),
        &mut doc,
        &CapturingBackend::new(true),
        &OsFileSystem,
    );
    assert!(outcome.ok);

    let backup = backup_path_for(Path::new(&path), "~");
    assert_eq!(fs::read_to_string(&backup).unwrap(), "OLD");

    // The written file parses back to the document's labels, in track order
    let written = LabelTrack::parse(&fs::read_to_string(&path).unwrap()).unwrap();
    let expected: Vec<&Label> = doc.label_tracks().flat_map(|t| t.labels()).collect();
    assert_eq!(written.len(), expected.len());
    for (back, orig) in written.labels().iter().zip(expected) {
        assert_relative_eq!(back.t0, orig.t0, epsilon = 1e-6);
        assert_relative_eq!(back.t1, orig.t1, epsilon = 1e-6);
        assert_eq!(back.text, orig.text);
    }
}

#[test]
fn test_backup_holds_exactly_one_generation() {
    let dir = tempdir().unwrap();
    let path = target(dir.path(), "labels.txt");
    fs::write(&path, "ORIGINAL").unwrap();
    let backup = backup_path_for(Path::new(&path), "~");

    let mut doc = labelled_document();
    let command = ExportCommand::new(path.as_str(), 1);
    let backend = CapturingBackend::new(true);

    assert!(export(&command, &mut doc, &backend, &OsFileSystem).ok);
    let first = fs::read_to_string(&path).unwrap();

    doc.append_track(Track::label(
        "Late",
        LabelTrack::new(vec![Label::point(30.0, "Outro")]),
    ));
    assert!(export(&command, &mut doc, &backend, &OsFileSystem).ok);

    assert_eq!(fs::read_to_string(&backup).unwrap(), first);
    assert!(fs::read_to_string(&path).unwrap().ends_with("Outro\n"));
}

#[test]
fn test_label_export_protocol_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("labels.txt");
    let backup = backup_path_for(&path, "~");
    fs::write(&path, "OLD").unwrap();
    fs::write(&backup, "OLDER").unwrap();

    let fs = RecordingFileSystem::default();
    let mut doc = labelled_document();
    let outcome = export(
        &ExportCommand::new(path.to_string_lossy(), 1),
        &mut doc,
        &CapturingBackend::new(true),
        &fs,
    );
    assert!(outcome.ok);

    assert_eq!(
        fs.calls(),
        vec![
            format!("exists {}", path.display()),
            format!("exists {}", backup.display()),
            format!("remove {}", backup.display()),
            format!("rename {} {}", path.display(), backup.display()),
            format!("create {}", path.display()),
        ]
    );
}

#[test]
fn test_label_export_open_failure_keeps_backup() {
    let dir = tempdir().unwrap();
    let path = target(dir.path(), "labels.txt");
    fs::write(&path, "OLD").unwrap();
    let mut doc = labelled_document();

    let outcome = export(
        &ExportCommand::new(path.as_str(), 1),
        &mut doc,
        &CapturingBackend::new(true),
        &NoCreateFileSystem,
    );

    assert!(!outcome.ok);
    assert_eq!(outcome.sink.errors(), vec!["Could not export to TXT format!"]);

    let backup = backup_path_for(Path::new(&path), "~");
    assert_eq!(fs::read_to_string(&backup).unwrap(), "OLD");
    assert!(!Path::new(&path).exists());
}

// === Media export through the WAV backend ===

#[test]
fn test_wav_export_renders_selection() {
    let dir = tempdir().unwrap();
    let path = target(dir.path(), "selection.WAV");
    let mut doc = labelled_document();
    doc.sample_rate = 1000;

    let outcome = export(
        &ExportCommand::new(path.as_str(), 0),
        &mut doc,
        &WavExportBackend::new(16),
        &OsFileSystem,
    );
    assert!(outcome.ok);

    let data = read_wav(Path::new(&path)).unwrap();
    assert_eq!(data.channels.len(), 1);
    assert_eq!(data.channels[0].len(), 1000);
    assert_relative_eq!(data.channels[0][0], 0.25, epsilon = 0.001);
}

#[test]
fn test_wav_export_refuses_channel_count_beyond_header() {
    let dir = tempdir().unwrap();
    let path = target(dir.path(), "wide.wav");
    let mut doc = labelled_document();
    doc.sample_rate = 1000;
    doc.set_selection(SelectedRegion::new(0.0, 0.005));

    let outcome = export(
        &ExportCommand::new(path.as_str(), 65537),
        &mut doc,
        &WavExportBackend::new(16),
        &OsFileSystem,
    );

    assert!(!outcome.ok);
    assert_eq!(outcome.sink.errors(), vec!["Could not export to WAV format!"]);
    assert!(!Path::new(&path).exists());
}

#[test]
fn test_wav_export_of_unbounded_selection_fails_cleanly() {
    let dir = tempdir().unwrap();
    let path = target(dir.path(), "forever.wav");
    let mut doc = labelled_document();
    doc.set_selection(SelectedRegion::new(0.0, f64::INFINITY));

    let outcome = export(
        &ExportCommand::new(path.as_str(), 1),
        &mut doc,
        &WavExportBackend::new(16),
        &OsFileSystem,
    );

    assert!(!outcome.ok);
    assert_eq!(outcome.sink.errors(), vec!["Could not export to WAV format!"]);
    assert!(!Path::new(&path).exists());
}

#[test]
fn test_wav_backend_rejects_unknown_format() {
    let dir = tempdir().unwrap();
    let path = target(dir.path(), "selection.aiff");
    let mut doc = labelled_document();

    let outcome = export(
        &ExportCommand::new(path.as_str(), 1),
        &mut doc,
        &WavExportBackend::default(),
        &OsFileSystem,
    );

    assert!(!outcome.ok);
    assert_eq!(outcome.sink.errors(), vec!["Could not export to AIFF format!"]);
    assert!(!Path::new(&path).exists());
}

// === Import ===

#[test]
fn test_import_failure_leaves_document_unchanged() {
    let mut doc = labelled_document();
    let before = serde_json::to_string(&doc).unwrap();

    let outcome = run_command(
        &ImportCommand::new("broken.wav"),
        &mut doc,
        &FailingImporter,
        &CapturingBackend::new(true),
        &OsFileSystem,
    );

    assert!(!outcome.ok);
    assert_eq!(outcome.sink.errors(), vec!["Invalid audio file: cannot decode broken.wav"]);
    assert_eq!(serde_json::to_string(&doc).unwrap(), before);
}

#[test]
fn test_import_then_export_labels() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("cues.txt");
    let exported = dir.path().join("cues-out.txt");
    fs::write(&source, "1.000000\t1.500000\tCue A\n2.000000\t2.000000\tCue B\n").unwrap();

    let mut doc = Document::new("Empty");
    let import = ImportCommand::new(source.to_string_lossy());
    let backend = CapturingBackend::new(true);
    assert!(run_command(&import, &mut doc, &FileImporter, &backend, &OsFileSystem).ok);

    let export_cmd = ExportCommand::new(exported.to_string_lossy(), 1);
    assert!(export(&export_cmd, &mut doc, &CapturingBackend::new(true), &OsFileSystem).ok);

    assert_eq!(
        fs::read_to_string(&exported).unwrap(),
        fs::read_to_string(&source).unwrap()
    );
}

// === Script lines ===

#[test]
fn test_script_lines_report_one_message_each() {
    let dir = tempdir().unwrap();
    let path = target(dir.path(), "script labels.txt");
    let mut doc = labelled_document();
    let config = AutomationConfig::default();
    let backend = CapturingBackend::new(true);
    let services = Services::new(&FileImporter, &backend, &OsFileSystem, &config);
    let mut sink = CollectingSink::new();

    let results: Vec<bool> = {
        let mut context = CommandContext::new(&mut doc, services, &mut sink);
        [
            format!("Export: Filename=\"{}\"", path),
            "Export: NumChannels=two".to_string(),
            "Render: Filename=x.wav".to_string(),
            "Export Filename".to_string(),
        ]
        .iter()
        .map(|line| run_script_line(line, &mut context))
        .collect()
    };

    assert_eq!(results, vec![true, false, false, false]);
    assert_eq!(sink.reports.len(), 4);
    assert_eq!(sink.statuses(), vec![format!("Exported to TXT format: {}", path)]);
    assert_eq!(
        sink.errors(),
        vec![
            "Invalid value for parameter 'NumChannels': expected an integer, got 'two'",
            "Unknown command: Render",
            "Malformed command line: expected Key=Value, found 'Filename'",
        ]
    );
}
