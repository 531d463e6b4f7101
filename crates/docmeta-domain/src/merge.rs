//! Merge policy for per-chunk metadata
//!
//! Partial records are folded left to right, in chunk order, into one
//! accumulator. Each field is reconciled by shape:
//!
//! | existing | incoming | result |
//! |----------|----------|--------|
//! | any      | null     | unchanged (null never establishes or alters a key) |
//! | absent   | any      | inserted verbatim |
//! | string   | string   | `existing + " | " + incoming` unless incoming is a substring of existing |
//! | number   | number   | the larger of the two |
//! | list     | any      | incoming appended as one element unless already an element |
//! | bool/object | same shape | unchanged |
//! | other    | other    | unchanged, incoming discarded and reported as a [`TypeConflict`] |
//!
//! Numeric fields are treated as magnitudes (page counts, scores) where the
//! largest value seen across chunks is the best estimate. This is a policy
//! choice for document metadata, not a general truth about numbers.
//!
//! List membership compares the incoming value as a whole: a list arriving
//! for a list field is nested as a single element, not flattened. Callers that
//! want element-wise deduplication across chunks must emit scalars.
//!
//! Cost is linear in the number of (key, value) pairs, plus a scan of the
//! current list for every value merged into a list field.

use crate::value::{MergedMetadata, PartialMetadata, Value, ValueKind};

/// Separator placed between distinct string fragments
pub const STRING_SEPARATOR: &str = " | ";

/// A value dropped because its shape did not match the accumulated one
///
/// The first shape seen for a key wins for the life of the merge. Conflicts
/// do not change the merged output; they exist so callers can surface the loss.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeConflict {
    /// Field whose incoming value was dropped
    pub key: String,
    /// Shape already held by the accumulator
    pub existing_kind: ValueKind,
    /// Shape of the dropped value
    pub incoming_kind: ValueKind,
    /// Zero-based position of the record that carried the dropped value
    pub record_index: usize,
}

/// Outcome of merging one incoming value into an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldOutcome {
    Changed,
    Unchanged,
    Discarded,
}

/// Stateful left fold over partial metadata records
///
/// # Examples
///
/// ```
/// use docmeta_domain::{MetadataMerger, PartialMetadata, Value};
///
/// let mut first = PartialMetadata::new();
/// first.insert("title".to_string(), Value::from("Report"));
/// let mut second = PartialMetadata::new();
/// second.insert("title".to_string(), Value::from("Summary"));
///
/// let mut merger = MetadataMerger::new();
/// merger.absorb(first);
/// merger.absorb(second);
///
/// let merged = merger.finish();
/// assert_eq!(merged["title"], Value::from("Report | Summary"));
/// ```
#[derive(Debug, Default)]
pub struct MetadataMerger {
    merged: MergedMetadata,
    conflicts: Vec<TypeConflict>,
    records_absorbed: usize,
}

impl MetadataMerger {
    /// Create an empty merger
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record into the accumulator
    pub fn absorb(&mut self, record: PartialMetadata) {
        let record_index = self.records_absorbed;
        self.records_absorbed += 1;

        for (key, value) in record {
            if value.is_null() {
                continue;
            }

            let Some(existing) = self.merged.get_mut(&key) else {
                self.merged.insert(key, value);
                continue;
            };

            let existing_kind = existing.kind();
            let incoming_kind = value.kind();
            if merge_field(existing, value) == FieldOutcome::Discarded {
                self.conflicts.push(TypeConflict {
                    key,
                    existing_kind,
                    incoming_kind,
                    record_index,
                });
            }
        }
    }

    /// The accumulator as it stands after the records absorbed so far
    pub fn current(&self) -> &MergedMetadata {
        &self.merged
    }

    /// Values dropped so far because of shape mismatches
    pub fn conflicts(&self) -> &[TypeConflict] {
        &self.conflicts
    }

    /// Number of records folded so far
    pub fn records_absorbed(&self) -> usize {
        self.records_absorbed
    }

    /// Consume the merger, returning the merged metadata
    pub fn finish(self) -> MergedMetadata {
        self.merged
    }

    /// Consume the merger, returning the merged metadata and the dropped values
    pub fn into_parts(self) -> (MergedMetadata, Vec<TypeConflict>) {
        (self.merged, self.conflicts)
    }
}

/// Merge a sequence of partial records in order
pub fn merge_metadata<I>(records: I) -> MergedMetadata
where
    I: IntoIterator<Item = PartialMetadata>,
{
    let mut merger = MetadataMerger::new();
    for record in records {
        merger.absorb(record);
    }
    merger.finish()
}

fn merge_field(existing: &mut Value, incoming: Value) -> FieldOutcome {
    match (existing, incoming) {
        (Value::String(current), Value::String(new)) => {
            if current.contains(new.as_str()) {
                FieldOutcome::Unchanged
            } else {
                current.push_str(STRING_SEPARATOR);
                current.push_str(&new);
                FieldOutcome::Changed
            }
        }
        (Value::Number(current), Value::Number(new)) => {
            // Ties keep the existing value
            if new > *current {
                *current = new;
                FieldOutcome::Changed
            } else {
                FieldOutcome::Unchanged
            }
        }
        (Value::List(items), new) => {
            if items.contains(&new) {
                FieldOutcome::Unchanged
            } else {
                items.push(new);
                FieldOutcome::Changed
            }
        }
        // Same shape with no merge rule (bool, object): first value stays
        (current, new) if current.kind() == new.kind() => FieldOutcome::Unchanged,
        _ => FieldOutcome::Discarded,
    }
}
