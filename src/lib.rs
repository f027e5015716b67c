//! ETL connector for MITRE ATT&CK threat intelligence.
//!
//! One linear pass per invocation: pull the full object set of the
//! "Enterprise ATT&CK" collection from a TAXII 2.1 server, keep only
//! attack-pattern, intrusion-set, and malware objects, and append each
//! survivor verbatim as one MongoDB document.
//!
//! The library split exists so the pipeline stages are testable in
//! isolation; the binary in `main.rs` just wires them together.

pub mod config;
pub mod filter;
pub mod store;
pub mod taxii;
