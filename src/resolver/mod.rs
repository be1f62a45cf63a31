pub mod entry_resolver;

pub use entry_resolver::{EntryOrigin, EntryResolver, ExportFile, ResolvedEntry};
