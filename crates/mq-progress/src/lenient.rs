//! Tolerant deserializers for collection fields.
//!
//! A profile document written by an older client may hold `null` or a
//! non-array where a list is expected. Those fields read as empty instead of
//! failing the whole snapshot. Inside a well-formed array, an element that
//! does not parse is skipped and its siblings are kept.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use std::any::type_name;
use tracing::warn;

#[derive(Deserialize)]
#[serde(untagged)]
enum Element<T> {
    Item(T),
    Skipped(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Items(Vec<Element<T>>),
    Other(IgnoredAny),
}

pub(crate) fn vec_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let elements = match Lenient::deserialize(deserializer)? {
        Lenient::Items(elements) => elements,
        Lenient::Other(_) => return Ok(Vec::new()),
    };
    let total = elements.len();
    let items: Vec<T> = elements
        .into_iter()
        .filter_map(|element| match element {
            Element::Item(item) => Some(item),
            Element::Skipped(_) => None,
        })
        .collect();
    if items.len() < total {
        warn!(
            kind = type_name::<T>(),
            skipped = total - items.len(),
            "dropped unreadable collection elements"
        );
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "vec_or_empty")]
        items: Vec<u32>,
    }

    #[test]
    fn accepts_arrays() {
        let h: Holder = serde_json::from_str(r#"{"items":[1,2,3]}"#).unwrap();
        assert_eq!(h.items, vec![1, 2, 3]);
    }

    #[test]
    fn malformed_reads_as_empty() {
        for raw in [r#"{"items":null}"#, r#"{"items":"oops"}"#, r#"{"items":{"a":1}}"#, "{}"] {
            let h: Holder = serde_json::from_str(raw).unwrap();
            assert!(h.items.is_empty(), "{raw}");
        }
    }

    #[test]
    fn bad_elements_are_skipped_individually() {
        let h: Holder = serde_json::from_str(r#"{"items":[1,"two",3,null,{"n":4},5]}"#).unwrap();
        assert_eq!(h.items, vec![1, 3, 5]);
    }
}
