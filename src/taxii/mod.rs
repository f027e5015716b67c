//! TAXII 2.1 feed client.
//!
//! Implements the three server interactions the pipeline needs:
//!
//! - **Discovery**: resolve the server root into its API roots
//! - **Collections**: list the collections under an API root and locate
//!   the one of interest by title
//! - **Objects**: pull a collection's full current object set (envelope)
//!
//! Every failure is fatal to the run — there is no retry or partial-result
//! handling at this layer.

mod client;
mod types;

pub use client::{find_collection, FetchError, TaxiiClient};
pub use types::{CollectionInfo, ThreatObject};
