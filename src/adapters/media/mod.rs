//! Media generation adapters.

mod placeholder_media_generator;

pub use placeholder_media_generator::PlaceholderMediaGenerator;
