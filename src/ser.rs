//! Linear encoding of a set through `serde`.
//!
//! A set encodes as a struct of its strategy, its element count, its load
//! factor, and its elements as a sequence in table order. Decoding sizes a
//! fresh table for the element count and re-adds every element, so the
//! decoded layout does not depend on the encoder's capacity.

use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;

use serde::de;
use serde::de::Deserialize;
use serde::de::Deserializer;
use serde::de::MapAccess;
use serde::de::SeqAccess;
use serde::de::Visitor;
use serde::ser::Serialize;
use serde::ser::SerializeSeq;
use serde::ser::SerializeStruct;
use serde::ser::Serializer;

use crate::hash_set::StrategySet;
use crate::hash_table::DEFAULT_INITIAL_CAPACITY;
use crate::hash_table::HashTable;
use crate::strategy::HashingStrategy;

const FIELDS: &[&str] = &["strategy", "size", "load_factor", "elements"];

struct Elements<'a, T>(&'a HashTable<T>);

impl<T: Serialize> Serialize for Elements<'_, T> {
    fn serialize<Ser>(&self, ser: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        let mut s = ser.serialize_seq(Some(self.0.len()))?;
        for i in self.0.iter() {
            s.serialize_element(i)?;
        }
        s.end()
    }
}

impl<T, S> Serialize for StrategySet<T, S>
where
    T: Serialize,
    S: Serialize,
{
    fn serialize<Ser>(&self, ser: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        let mut s = ser.serialize_struct("StrategySet", FIELDS.len())?;
        s.serialize_field("strategy", self.strategy())?;
        s.serialize_field("size", &self.len())?;
        s.serialize_field("load_factor", &self.load_factor())?;
        s.serialize_field("elements", &Elements(self.table()))?;
        s.end()
    }
}

#[derive(serde::Deserialize)]
#[serde(field_identifier, rename_all = "snake_case")]
enum Field {
    Strategy,
    Size,
    LoadFactor,
    Elements,
}

struct SetVisitor<'de, T, S> {
    phantom: PhantomData<(T, S)>,
    phantom_lifetime: PhantomData<&'de ()>,
}

impl<'de, T, S> SetVisitor<'de, T, S> {
    fn new() -> Self {
        SetVisitor {
            phantom: PhantomData,
            phantom_lifetime: PhantomData,
        }
    }
}

/// Rebuilds a set from its decoded parts.
fn rebuild<T, S, E>(
    strategy: S,
    size: usize,
    load_factor: f32,
    elements: Vec<T>,
) -> Result<StrategySet<T, S>, E>
where
    S: HashingStrategy<T>,
    E: de::Error,
{
    if elements.len() != size {
        return Err(E::invalid_length(elements.len(), &"as many elements as `size`"));
    }
    let capacity = ((size as f64 / load_factor as f64) as usize)
        .saturating_add(1)
        .max(DEFAULT_INITIAL_CAPACITY);
    let mut set = StrategySet::with_capacity_and_load_factor(strategy, capacity, load_factor)
        .map_err(E::custom)?;
    set.add_all(elements);
    Ok(set)
}

impl<'de, T, S> Visitor<'de> for SetVisitor<'de, T, S>
where
    T: Deserialize<'de>,
    S: Deserialize<'de> + HashingStrategy<T>,
{
    type Value = StrategySet<T, S>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a strategy set")
    }

    fn visit_seq<Access>(self, mut access: Access) -> Result<Self::Value, Access::Error>
    where
        Access: SeqAccess<'de>,
    {
        let strategy = access
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let size = access
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;
        let load_factor = access
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(2, &self))?;
        let elements = access
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(3, &self))?;
        rebuild(strategy, size, load_factor, elements)
    }

    fn visit_map<Access>(self, mut access: Access) -> Result<Self::Value, Access::Error>
    where
        Access: MapAccess<'de>,
    {
        let mut strategy = None;
        let mut size = None;
        let mut load_factor = None;
        let mut elements = None;

        while let Some(field) = access.next_key()? {
            match field {
                Field::Strategy => {
                    if strategy.is_some() {
                        return Err(de::Error::duplicate_field("strategy"));
                    }
                    strategy = Some(access.next_value()?);
                }
                Field::Size => {
                    if size.is_some() {
                        return Err(de::Error::duplicate_field("size"));
                    }
                    size = Some(access.next_value()?);
                }
                Field::LoadFactor => {
                    if load_factor.is_some() {
                        return Err(de::Error::duplicate_field("load_factor"));
                    }
                    load_factor = Some(access.next_value()?);
                }
                Field::Elements => {
                    if elements.is_some() {
                        return Err(de::Error::duplicate_field("elements"));
                    }
                    elements = Some(access.next_value()?);
                }
            }
        }

        rebuild(
            strategy.ok_or_else(|| de::Error::missing_field("strategy"))?,
            size.ok_or_else(|| de::Error::missing_field("size"))?,
            load_factor.ok_or_else(|| de::Error::missing_field("load_factor"))?,
            elements.ok_or_else(|| de::Error::missing_field("elements"))?,
        )
    }
}

impl<'de, T, S> Deserialize<'de> for StrategySet<T, S>
where
    T: Deserialize<'de>,
    S: Deserialize<'de> + HashingStrategy<T>,
{
    fn deserialize<D>(des: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        des.deserialize_struct("StrategySet", FIELDS, SetVisitor::new())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    use super::*;
    use crate::strategy::NaturalStrategy;
    use crate::strategy::NullSafe;

    /// Compares strings ignoring ASCII case, and serializes as a marker.
    #[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
    struct IgnoreCase;

    impl HashingStrategy<String> for IgnoreCase {
        fn hash_code(&self, value: &String) -> u32 {
            value.bytes().fold(0u32, |h, b| {
                h.wrapping_mul(31)
                    .wrapping_add(b.to_ascii_lowercase() as u32)
            })
        }

        fn equals(&self, a: &String, b: &String) -> bool {
            a.eq_ignore_ascii_case(b)
        }
    }

    fn sorted<T: Ord + Clone, S>(set: &StrategySet<T, S>) -> Vec<T> {
        let mut values: Vec<T> = set.iter().cloned().collect();
        values.sort();
        values
    }

    #[test]
    fn round_trip_preserves_elements() {
        for load_factor in [0.1, 0.5, 0.75, 1.0] {
            let mut set =
                StrategySet::with_capacity_and_load_factor(NaturalStrategy, 4, load_factor)
                    .unwrap();
            set.add_all(0u32..500);

            let json = serde_json::to_string(&set).unwrap();
            let decoded: StrategySet<u32, NaturalStrategy> = serde_json::from_str(&json).unwrap();

            assert_eq!(decoded.len(), 500);
            assert_eq!(decoded.load_factor(), load_factor);
            assert_eq!(decoded, set);
            assert_eq!(sorted(&decoded), sorted(&set));
        }
    }

    #[test]
    fn encoding_layout() {
        let mut set = StrategySet::new(IgnoreCase);
        set.add("Only".to_string());

        let value = serde_json::to_value(&set).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "strategy": null,
                "size": 1,
                "load_factor": 0.75,
                "elements": ["Only"],
            })
        );
    }

    #[test]
    fn decoding_sizes_for_count() {
        let json = r#"{"strategy":null,"size":3,"load_factor":0.5,"elements":["a","b","c"]}"#;
        let set: StrategySet<String, IgnoreCase> = serde_json::from_str(json).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.capacity(), DEFAULT_INITIAL_CAPACITY);
        assert!(set.contains(&"B".to_string()));

        let elements: Vec<String> = (0..100).map(|i| i.to_string()).collect();
        let json = serde_json::json!({
            "strategy": null,
            "size": 100,
            "load_factor": 0.5,
            "elements": elements,
        });
        let set: StrategySet<String, IgnoreCase> = serde_json::from_value(json).unwrap();
        // 100 / 0.5 + 1 = 201, rounded up.
        assert_eq!(set.capacity(), 256);
        assert_eq!(set.len(), 100);
    }

    #[test]
    fn null_element_round_trips() {
        let mut set = StrategySet::new(NullSafe::new(NaturalStrategy));
        set.add(None);
        set.add(Some(7));

        let json = serde_json::to_string(&set).unwrap();
        let decoded: StrategySet<Option<i32>, NullSafe<NaturalStrategy>> =
            serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.len(), 2);
        assert!(decoded.contains(&None));
        assert!(decoded.contains(&Some(7)));
    }

    #[test]
    fn decode_errors() {
        let mismatched = r#"{"strategy":null,"size":2,"load_factor":0.75,"elements":["a"]}"#;
        assert!(serde_json::from_str::<StrategySet<String, IgnoreCase>>(mismatched).is_err());

        let bad_load = r#"{"strategy":null,"size":1,"load_factor":1.5,"elements":["a"]}"#;
        let err = serde_json::from_str::<StrategySet<String, IgnoreCase>>(bad_load)
            .err()
            .unwrap();
        assert!(err.to_string().contains("load factor"), "{err}");

        let missing = r#"{"strategy":null,"size":1,"elements":["a"]}"#;
        assert!(serde_json::from_str::<StrategySet<String, IgnoreCase>>(missing).is_err());
    }
}
