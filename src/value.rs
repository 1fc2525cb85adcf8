//! `Value`s hold a fully decoded, owned bencode tree.
//!
//! If the `serde` feature is enabled, `Value` and `Integer` also implement `Serialize` and
//! `Deserialize`, so a decoded tree can be handed to any serde data format.

use alloc::{collections::BTreeMap, vec::Vec};
use core::{
    fmt::{self, Display, Formatter},
    str,
};

/// A decoded dictionary. Keys are raw byte strings; iteration follows byte order.
pub type Dict = BTreeMap<Vec<u8>, Value>;

/// A decoded bencode integer.
///
/// The decoder only produces [`Integer::Unsigned`] for values above [`i64::MAX`]. Use
/// [`Integer::from`] to get the same normalisation when building values by hand.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Integer {
    /// Any value in `i64` range
    Signed(i64),
    /// A value above `i64::MAX`
    Unsigned(u64),
}

impl Integer {
    /// The value as an `i64`, if it fits.
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Integer::Signed(value) => Some(value),
            Integer::Unsigned(value) => i64::try_from(value).ok(),
        }
    }

    /// The value as a `u64`, if it is non-negative.
    pub fn as_u64(self) -> Option<u64> {
        match self {
            Integer::Signed(value) => u64::try_from(value).ok(),
            Integer::Unsigned(value) => Some(value),
        }
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer::Signed(value)
    }
}

impl From<u64> for Integer {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(signed) => Integer::Signed(signed),
            Err(_) => Integer::Unsigned(value),
        }
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Integer::Signed(value) => Display::fmt(value, f),
            Integer::Unsigned(value) => Display::fmt(value, f),
        }
    }
}

/// A decoded bencode value.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Value {
    /// A signed or large unsigned integer
    Integer(Integer),
    /// A raw byte string; may not be UTF-8
    Bytes(Vec<u8>),
    /// A list of values in encoded order
    List(Vec<Value>),
    /// A dictionary mapping byte strings to values
    Dict(Dict),
}

impl Value {
    /// Name of the variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Bytes(_) => "byte string",
            Value::List(_) => "list",
            Value::Dict(_) => "dictionary",
        }
    }

    /// The integer, if this is one.
    pub fn as_integer(&self) -> Option<Integer> {
        match self {
            Value::Integer(integer) => Some(*integer),
            _ => None,
        }
    }

    /// The integer as an `i64`, if this is one and it fits.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_integer().and_then(Integer::as_i64)
    }

    /// The integer as a `u64`, if this is one and it is non-negative.
    pub fn as_u64(&self) -> Option<u64> {
        self.as_integer().and_then(Integer::as_u64)
    }

    /// The raw byte string, if this is one.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// The byte string as text, if it is one and it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|bytes| str::from_utf8(bytes).ok())
    }

    /// The list elements, if this is a list.
    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// The dictionary, if this is one.
    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    /// Look up `key` if this value is a dictionary.
    ///
    /// ```
    /// let value = bdecode::decode_value(b"d4:infod6:lengthi12eee")?;
    /// let length = value.get("info").and_then(|info| info.get("length"));
    /// assert_eq!(length.and_then(bdecode::Value::as_i64), Some(12));
    /// # Ok::<(), bdecode::Error>(())
    /// ```
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&Value> {
        self.as_dict().and_then(|dict| dict.get(key.as_ref()))
    }
}

impl From<Integer> for Value {
    fn from(integer: Integer) -> Self {
        Value::Integer(integer)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(Integer::from(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Integer(Integer::from(value))
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Bytes(text.as_bytes().to_vec())
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Value::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<Vec<Value>> for Value {
    fn from(list: Vec<Value>) -> Self {
        Value::List(list)
    }
}

impl From<Dict> for Value {
    fn from(dict: Dict) -> Self {
        Value::Dict(dict)
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;

    use alloc::string::String;
    use core::marker::PhantomData;

    use serde::{
        Deserialize, Deserializer, Serialize, Serializer,
        de::{self, MapAccess, SeqAccess},
        ser::{SerializeMap, SerializeSeq},
    };
    use serde_bytes::{ByteBuf, Bytes};

    impl Serialize for Integer {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match *self {
                Integer::Signed(value) => serializer.serialize_i64(value),
                Integer::Unsigned(value) => serializer.serialize_u64(value),
            }
        }
    }

    /// Byte strings that are valid UTF-8 are serialized as strings, everything else as bytes.
    impl Serialize for Value {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match self {
                Value::Integer(integer) => integer.serialize(serializer),
                Value::Bytes(bytes) => match str::from_utf8(bytes) {
                    Ok(text) => serializer.serialize_str(text),
                    Err(_) => serializer.serialize_bytes(bytes),
                },
                Value::List(list) => {
                    let mut seq = serializer.serialize_seq(Some(list.len()))?;
                    for value in list {
                        seq.serialize_element(value)?;
                    }
                    seq.end()
                },
                Value::Dict(dict) => {
                    let mut map = serializer.serialize_map(Some(dict.len()))?;
                    for (key, value) in dict {
                        match str::from_utf8(key) {
                            Ok(text) => map.serialize_entry(text, value)?,
                            Err(_) => map.serialize_entry(Bytes::new(key), value)?,
                        }
                    }
                    map.end()
                },
            }
        }
    }

    impl<'de> Deserialize<'de> for Integer {
        fn deserialize<D>(deserializer: D) -> Result<Integer, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Value::deserialize(deserializer)? {
                Value::Integer(integer) => Ok(integer),
                other => Err(de::Error::invalid_type(
                    de::Unexpected::Other(other.type_name()),
                    &"an integer",
                )),
            }
        }
    }

    impl<'de> Deserialize<'de> for Value {
        #[inline]
        fn deserialize<D>(deserializer: D) -> Result<Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(Visitor(PhantomData))
        }
    }

    struct Visitor<'de>(PhantomData<&'de ()>);

    impl<'de> de::Visitor<'de> for Visitor<'de> {
        type Value = Value;

        fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
            formatter.write_str("an integer, string, byte string, sequence or map")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Value, E> {
            Ok(Value::from(value))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Value, E> {
            Ok(Value::from(value))
        }

        fn visit_str<E>(self, value: &str) -> Result<Value, E> {
            Ok(Value::from(value))
        }

        fn visit_string<E>(self, value: String) -> Result<Value, E> {
            Ok(Value::Bytes(value.into_bytes()))
        }

        fn visit_bytes<E>(self, value: &[u8]) -> Result<Value, E> {
            Ok(Value::from(value))
        }

        fn visit_byte_buf<E>(self, value: Vec<u8>) -> Result<Value, E> {
            Ok(Value::Bytes(value))
        }

        fn visit_seq<V>(self, mut access: V) -> Result<Value, V::Error>
        where
            V: SeqAccess<'de>,
        {
            let mut list = Vec::new();
            while let Some(element) = access.next_element()? {
                list.push(element);
            }
            Ok(Value::List(list))
        }

        fn visit_map<V>(self, mut access: V) -> Result<Value, V::Error>
        where
            V: MapAccess<'de>,
        {
            let mut dict = Dict::new();
            while let Some((key, value)) = access.next_entry::<ByteBuf, Value>()? {
                dict.insert(key.into_vec(), value);
            }
            Ok(Value::Dict(dict))
        }
    }
}
