//! Type-based selection of feed objects.
//!
//! Filtering is a pure, total function: it reads each object's `type`
//! attribute and keeps exact matches against the allowed set, preserving
//! relative order. Objects with a missing or unrecognized type are silently
//! dropped — the feed carries many object kinds this pipeline does not
//! ingest, and that is not an error condition.
use crate::taxii::ThreatObject;
use std::collections::BTreeMap;

/// The categories of interest. Membership is exact string equality.
pub const ALLOWED_TYPES: &[&str] = &["attack-pattern", "intrusion-set", "malware"];

/// Keep only objects whose `type` is in [`ALLOWED_TYPES`].
///
/// Survivors pass through unmodified; no field-level transformation occurs.
pub fn filter_objects(objects: Vec<ThreatObject>) -> Vec<ThreatObject> {
    objects
        .into_iter()
        .filter(|obj| obj.object_type().is_some_and(|t| ALLOWED_TYPES.contains(&t)))
        .collect()
}

/// Per-type counts, for the post-filter summary log.
pub fn type_breakdown(objects: &[ThreatObject]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for obj in objects {
        if let Some(t) = obj.object_type() {
            *counts.entry(t.to_string()).or_insert(0) += 1;
        }
    }
    counts
}
