pub mod combine;
pub mod export_report;
pub mod flatten;
pub mod runner;

pub use combine::{decode_text, CombineSink};
pub use export_report::{ExportProgress, ExportReport};
pub use flatten::FlattenSink;
pub use runner::{ExportSink, Exporter, SinkOutcome};
