//! Records and textual-null normalization.

/// Field text that upstream exports use for a database NULL.
pub const NULL_SENTINEL: &str = "NULL";

/// One delimited record. `None` marks an absent value and serializes as an empty field.
pub type Record = Vec<Option<String>>;

/// Converts raw fields into a [`Record`], mapping fields that are exactly
/// [`NULL_SENTINEL`] to `None`. The match is case-sensitive and whole-field.
pub fn normalize_nulls<I, S>(fields: I) -> Record
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    fields
        .into_iter()
        .map(Into::into)
        .map(|field| if field == NULL_SENTINEL { None } else { Some(field) })
        .collect()
}
