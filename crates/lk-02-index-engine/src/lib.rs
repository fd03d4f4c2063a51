//! # Index Engine (lk-02)
//!
//! Secondary equality indexes built purely from key ordering. An index entry
//! is a synthetic key whose value is the primary key it points at:
//!
//! ```text
//! idx:<recordType>:<field>:<normalizedValue>:<primaryKey>  ->  <primaryKey>
//! idx:order:status:shipped:order:00042                      ->  order:00042
//! idx:order:status-region:shipped-eu:order:00042            ->  order:00042   (composite)
//! ```
//!
//! Values are normalized (trimmed, lower-cased) on both write and lookup, so
//! equality is case- and whitespace-insensitive. A lookup is one bounded
//! prefix scan.
//!
//! ## Maintenance Modes
//!
//! - Manual: call `IndexEngine::update_indexes` / `delete_indexes` next to
//!   every `EnvelopeStore` write. Index entries are advisory; nothing ties
//!   them to the document they describe.
//! - Transactional: `DocumentRepository` writes the envelope and its full
//!   index delta in one atomic batch.
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Key encoding, indexable-field rules, errors
//! - `ports/` - `IndexEngineApi` (inbound), substrate (outbound)
//! - `service.rs` - `IndexEngine`
//! - `repository.rs` - `DocumentRepository`

pub mod domain;
pub mod ports;
pub mod repository;
pub mod service;

pub use domain::errors::IndexError;
pub use domain::fields::{field_text, is_indexable_field, NON_INDEXABLE_FIELDS};
pub use domain::keys::{
    composite_field, composite_value, field_prefix, normalize_value, search_prefix, IndexKey,
    INDEX_NAMESPACE,
};
pub use ports::inbound::{IndexEngineApi, IndexedDocument};
pub use repository::DocumentRepository;
pub use service::IndexEngine;
