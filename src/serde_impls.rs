//! `Serialize`/`Deserialize` for the public containers.
//!
//! Sequences serialize in logical order (a stack from bottom to top), sets as
//! sequences and dictionaries as maps. Loading collects into the target
//! container through its fallible API, so capacity errors surface as
//! deserialization errors instead of panics.

use crate::containers::{Deque, List, Queue, Stack};
use crate::hash_map::{Dictionary, EqualityComparer, Set};
use serde::de::{Error as DeError, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

fn serialize_seq<'a, S, T, I>(serializer: S, len: usize, items: I) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut seq = serializer.serialize_seq(Some(len))?;
    for item in items {
        seq.serialize_element(item)?;
    }
    seq.end()
}

/// Visitor feeding each element of a sequence into a fresh container.
struct SeqVisitor<C, T, F> {
    make: fn(usize) -> crate::Result<C>,
    push: F,
    marker: PhantomData<fn() -> T>,
}

impl<'de, C, T, F> Visitor<'de> for SeqVisitor<C, T, F>
where
    T: Deserialize<'de>,
    F: Fn(&mut C, T) -> crate::Result<()>,
{
    type Value = C;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a sequence")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<C, A::Error> {
        let hint = seq.size_hint().unwrap_or(0).min(4096);
        let mut container = (self.make)(hint).map_err(A::Error::custom)?;
        while let Some(item) = seq.next_element()? {
            (self.push)(&mut container, item).map_err(A::Error::custom)?;
        }
        Ok(container)
    }
}

fn deserialize_seq<'de, D, C, T, F>(
    deserializer: D,
    make: fn(usize) -> crate::Result<C>,
    push: F,
) -> Result<C, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
    F: Fn(&mut C, T) -> crate::Result<()>,
{
    deserializer.deserialize_seq(SeqVisitor {
        make,
        push,
        marker: PhantomData,
    })
}

impl<T: Serialize> Serialize for List<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_seq(serializer, self.len(), self.iter())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for List<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_seq(deserializer, List::with_capacity, |list: &mut List<T>, item: T| {
            list.add(item)
        })
    }
}

impl<T: Serialize> Serialize for Stack<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_seq(serializer, self.len(), self.as_slice())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Stack<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_seq(deserializer, Stack::with_capacity, |stack: &mut Stack<T>, item: T| {
            stack.push(item)
        })
    }
}

impl<T: Serialize> Serialize for Deque<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_seq(serializer, self.len(), self.iter())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Deque<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_seq(deserializer, Deque::with_capacity, |deque: &mut Deque<T>, item: T| {
            deque.enqueue_last(item)
        })
    }
}

impl<T: Serialize> Serialize for Queue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_seq(serializer, self.len(), self.iter())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Queue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_seq(deserializer, Queue::with_capacity, |queue: &mut Queue<T>, item: T| {
            queue.enqueue(item)
        })
    }
}

impl<T: Serialize, C: EqualityComparer<T>> Serialize for Set<T, C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_seq(serializer, self.len(), self.iter())
    }
}

impl<'de, T, C> Deserialize<'de> for Set<T, C>
where
    T: Deserialize<'de>,
    C: EqualityComparer<T> + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_seq(
            deserializer,
            |capacity| {
                let mut set = Set::with_comparer(C::default());
                set.ensure_capacity(capacity)?;
                Ok(set)
            },
            |set: &mut Set<T, C>, item: T| set.add(item).map(drop),
        )
    }
}

impl<K, V, C> Serialize for Dictionary<K, V, C>
where
    K: Serialize,
    V: Serialize,
    C: EqualityComparer<K>,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct DictionaryVisitor<K, V, C>(PhantomData<fn() -> Dictionary<K, V, C>>);

impl<'de, K, V, C> Visitor<'de> for DictionaryVisitor<K, V, C>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    C: EqualityComparer<K> + Default,
{
    type Value = Dictionary<K, V, C>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut dict = Dictionary::with_comparer(C::default());
        dict.ensure_capacity(access.size_hint().unwrap_or(0).min(4096))
            .map_err(A::Error::custom)?;
        // Repeated keys: the last occurrence wins.
        while let Some((key, value)) = access.next_entry()? {
            dict.insert(key, value).map_err(A::Error::custom)?;
        }
        Ok(dict)
    }
}

impl<'de, K, V, C> Deserialize<'de> for Dictionary<K, V, C>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    C: EqualityComparer<K> + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DictionaryVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequences_keep_logical_order() {
        let mut deque = Deque::new();
        deque.enqueue_last(2).unwrap();
        deque.enqueue_first(1).unwrap();
        deque.enqueue_last(3).unwrap();
        assert_eq!(serde_json::to_string(&deque).unwrap(), "[1,2,3]");

        let back: Deque<i32> = serde_json::from_str("[1,2,3]").unwrap();
        assert_eq!(back.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);

        let stack: Stack<i32> = serde_json::from_str("[1,2,3]").unwrap();
        assert_eq!(stack.try_peek(), Some(&3));
        assert_eq!(serde_json::to_string(&stack).unwrap(), "[1,2,3]");

        let queue: Queue<&str> = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(queue.try_peek(), Some(&"a"));

        let list: List<u8> = serde_json::from_str("[4,5]").unwrap();
        assert_eq!(serde_json::to_string(&list).unwrap(), "[4,5]");
    }

    #[test]
    fn test_set_and_dictionary() {
        let set: Set<u32> = serde_json::from_str("[3,1,3,2]").unwrap();
        assert_eq!(set.len(), 3);
        let json = serde_json::to_string(&set).unwrap();
        let again: Set<u32> = serde_json::from_str(&json).unwrap();
        assert!(set.set_equals(again.iter()));

        let dict: Dictionary<String, u32> =
            serde_json::from_str(r#"{"a":1,"b":2,"a":3}"#).unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get(&"a".to_string()), Some(&3));
        let json = serde_json::to_string(&dict).unwrap();
        let again: Dictionary<String, u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(dict, again);
    }
}
