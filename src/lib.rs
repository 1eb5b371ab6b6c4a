// Owner Resolution - Core Library
// Turns scraped free-text owner fields into typed Person / Company records
// grouped on an ownership timeline, with an audit list of what failed.

pub mod affixes;
pub mod audit;
pub mod classifier;
pub mod config;
pub mod data_quality;
pub mod deduplication;
pub mod document;
pub mod entities;
pub mod error;
pub mod logging;
pub mod normalizer;
pub mod person;
pub mod resolver;
pub mod splitter;
pub mod temporal;

// Re-export commonly used types
pub use affixes::{affix_key, AffixClass, AffixEntry, AffixExtraction, AffixTable};
pub use audit::{write_invalid_csv, write_invalid_csv_file};
pub use classifier::{Classification, EntityClassifier};
pub use config::{DigitPolicy, NameOrder, ResolverConfig};
pub use data_quality::{InvalidCollector, InvalidFragment, ReasonCode};
pub use deduplication::{dedup_owners, Deduplicator};
pub use document::{DocumentInput, OwnerEntry, RawOwnerInput, ResolutionOutput, SaleRecord};
pub use entities::{Company, ParsedOwner, Person};
pub use error::{ResolveError, Result};
pub use normalizer::Normalizer;
pub use person::{ParseContext, PersonNameParser, PersonParse};
pub use resolver::OwnerResolver;
pub use splitter::{CompositeSplitter, SplitResult};
pub use temporal::{DateKey, OwnerTimeline, TimelineAssembler};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resolve one document with the built-in tables
pub fn resolve_document(doc: &DocumentInput) -> Result<ResolutionOutput> {
    Ok(OwnerResolver::with_defaults()?.resolve_document(doc))
}
