pub mod manifest_reader;

pub use manifest_reader::{Manifest, ManifestEntries};
