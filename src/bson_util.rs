use std::{collections::HashSet, time::Duration};

use serde::Serializer;

use crate::{
    bson::{Bson, RawDocumentBuf},
    error::{Error, Result},
};

/// Coerce numeric types into an `i64` if it would be lossless to do so. If this Bson is not numeric
/// or the conversion would be lossy (e.g. 1.5 -> 1), this returns `None`.
pub(crate) fn get_int(val: &Bson) -> Option<i64> {
    match *val {
        Bson::Int32(i) => Some(i64::from(i)),
        Bson::Int64(i) => Some(i),
        Bson::Double(f) if (f - (f as i64 as f64)).abs() <= f64::EPSILON => Some(f as i64),
        _ => None,
    }
}

/// Appends the entries of `other` to `this`, failing if a key would be repeated.
pub(crate) fn extend_raw_document_buf(
    this: &mut RawDocumentBuf,
    other: RawDocumentBuf,
) -> Result<()> {
    let mut keys: HashSet<String> = HashSet::new();
    for result in this.iter() {
        let (key, _) = result?;
        keys.insert(key.to_owned());
    }
    for result in other.iter() {
        let (key, value) = result?;
        if keys.contains(key) {
            return Err(Error::internal(format!(
                "duplicate raw document key {key:?}"
            )));
        }
        this.append(key, value.to_raw_bson());
    }
    Ok(())
}

pub(crate) fn serialize_duration_option_as_int_millis<S: Serializer>(
    val: &Option<Duration>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match val {
        Some(duration) if duration.as_millis() > i32::MAX as u128 => {
            serializer.serialize_i64(duration.as_millis() as i64)
        }
        Some(duration) => serializer.serialize_i32(duration.as_millis() as i32),
        None => serializer.serialize_none(),
    }
}
