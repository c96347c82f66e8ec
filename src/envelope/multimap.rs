//! Ordered string multimap used by the envelope.
//!
//! Deserializes from either `{"k": "v"}` or `{"k": ["v1", "v2"]}`; `null`
//! maps and `null` values are treated as absent.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Multimap(Vec<(String, String)>);

impl Multimap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, keeping any existing values for the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// First value stored under `name` (exact match).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn contains(&self, name: &str, ignore_case: bool) -> bool {
        self.0.iter().any(|(n, _)| {
            if ignore_case {
                n.eq_ignore_ascii_case(name)
            } else {
                n == name
            }
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Multimap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Pairs from `single` whose name is absent from `multi`, then all of `multi`.
pub(crate) fn merge<'a>(
    single: &'a Multimap,
    multi: &'a Multimap,
    ignore_case: bool,
) -> Vec<(&'a str, &'a str)> {
    let mut pairs: Vec<_> = single
        .iter()
        .filter(|(name, _)| !multi.contains(name, ignore_case))
        .collect();
    pairs.extend(multi.iter());
    pairs
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

struct MultimapVisitor;

impl<'de> Visitor<'de> for MultimapVisitor {
    type Value = Multimap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of strings or string arrays")
    }

    fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(Multimap::new())
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(Multimap::new())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_map(self)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = Multimap::new();
        while let Some((name, values)) = access.next_entry::<String, Option<OneOrMany>>()? {
            match values {
                Some(OneOrMany::One(value)) => map.append(name, value),
                Some(OneOrMany::Many(values)) => {
                    for value in values {
                        map.append(name.clone(), value);
                    }
                }
                None => {}
            }
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for Multimap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_option(MultimapVisitor)
    }
}

impl Serialize for Multimap {
    /// Names with one value serialize as a string, repeated names as an array.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut grouped: Vec<(&str, Vec<&str>)> = Vec::new();
        for (name, value) in self.iter() {
            match grouped.iter_mut().find(|(n, _)| *n == name) {
                Some((_, values)) => values.push(value),
                None => grouped.push((name, vec![value])),
            }
        }

        let mut map = serializer.serialize_map(Some(grouped.len()))?;
        for (name, values) in &grouped {
            match values.as_slice() {
                [single] => map.serialize_entry(name, single)?,
                many => map.serialize_entry(name, many)?,
            }
        }
        map.end()
    }
}
