//! Normalization for collections round-tripped through the document store.
//!
//! Some document stores serialize arrays as objects with consecutive
//! integer string keys (and drop empty arrays entirely). Every
//! externally-sourced collection is treated as untyped key-value input and
//! materialized into an ordered `Vec` before the engine sees it.

use serde::de::{Deserialize, Deserializer, Error};
use std::collections::BTreeMap;

/// Accept a JSON array, an integer-keyed object, or null, and produce a
/// `Vec` ordered by numeric key (array order for arrays).
pub fn seq_or_map<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Collection<T> {
        Seq(Vec<T>),
        Map(BTreeMap<String, T>),
        Null,
    }

    match Collection::deserialize(deserializer)? {
        Collection::Seq(items) => Ok(items),
        Collection::Map(map) => {
            let mut keyed = Vec::with_capacity(map.len());
            for (key, value) in map {
                let index: u64 = key
                    .parse()
                    .map_err(|_| Error::custom(format!("non-numeric collection key `{key}`")))?;
                keyed.push((index, value));
            }
            // BTreeMap orders keys lexically; "10" sorts before "2".
            keyed.sort_by_key(|(index, _)| *index);
            Ok(keyed.into_iter().map(|(_, value)| value).collect())
        }
        Collection::Null => Ok(Vec::new()),
    }
}
