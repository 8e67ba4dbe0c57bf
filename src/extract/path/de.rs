// ==============================================================================
// Path parameter deserializer
// ==============================================================================
//
// Two layers:
//
//   PathDeserializer   the whole parameter list: a single value, a tuple or
//                      sequence, or a struct/map keyed by parameter name
//   ValueDeserializer  one decoded value, parsed with `FromStr` into whatever
//                      primitive the visitor asks for
//
// Nested containers are rejected; a path segment is always a scalar.

use serde::de::{
    DeserializeSeed, Deserializer, Error as _, IntoDeserializer, MapAccess, SeqAccess, Visitor,
    value::BorrowedStrDeserializer,
};

use super::{ErrorKind, Param, PercentDecodedStr};

// ==============================================================================
// PathDeserializer
// ==============================================================================

/// Forwards to the single captured value, failing if there is not exactly one.
macro_rules! single_value {
    ($($method:ident)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value, Self::Error>
            where
                V: Visitor<'de>,
            {
                self.single()?.$method(visitor)
            }
        )*
    };
}

#[allow(clippy::redundant_pub_crate)] // Explicit crate visibility on crate-private module item.
pub(crate) struct PathDeserializer<'de> {
    params: &'de [Param],
}

impl<'de> PathDeserializer<'de> {
    #[inline]
    #[allow(clippy::redundant_pub_crate)] // Explicit crate visibility on crate-private module item.
    pub(crate) const fn new(params: &'de [Param]) -> Self {
        Self { params }
    }

    fn single(&self) -> Result<ValueDeserializer<'de>, ErrorKind> {
        let params: &'de [Param] = self.params;
        match params {
            [(key, value)] => Ok(ValueDeserializer {
                key: Key::Name(key.as_ref()),
                value,
            }),
            params => Err(ErrorKind::ParamCount {
                got: params.len(),
                expected: 1,
            }),
        }
    }
}

impl<'de> Deserializer<'de> for PathDeserializer<'de> {
    type Error = ErrorKind;

    single_value! {
        deserialize_bool
        deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64
        deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64
        deserialize_f32 deserialize_f64
        deserialize_char deserialize_str deserialize_string
        deserialize_bytes deserialize_byte_buf
        deserialize_identifier
    }

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        if self.params.is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_seq(SeqParams {
            params: self.params,
            index: 0,
        })
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        if self.params.len() != len {
            return Err(ErrorKind::ParamCount {
                got: self.params.len(),
                expected: len,
            });
        }
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(MapParams {
            params: self.params.iter(),
            value: None,
        })
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.single()?.deserialize_enum(name, variants, visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

// ==============================================================================
// Sequence and map access
// ==============================================================================

struct SeqParams<'de> {
    params: &'de [Param],
    index: usize,
}

impl<'de> SeqAccess<'de> for SeqParams<'de> {
    type Error = ErrorKind;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, Self::Error>
    where
        T: DeserializeSeed<'de>,
    {
        let params = self.params;
        let Some((_, value)) = params.get(self.index) else {
            return Ok(None);
        };

        let key = Key::Index(self.index);
        self.index += 1;

        seed.deserialize(ValueDeserializer { key, value })
        .map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.params.len() - self.index)
    }
}

struct MapParams<'de> {
    params: std::slice::Iter<'de, Param>,
    value: Option<(&'de str, &'de PercentDecodedStr)>,
}

impl<'de> MapAccess<'de> for MapParams<'de> {
    type Error = ErrorKind;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: DeserializeSeed<'de>,
    {
        let Some((key, value)) = self.params.next() else {
            return Ok(None);
        };
        let key: &'de str = key;

        self.value = Some((key, value));
        seed.deserialize(BorrowedStrDeserializer::new(key)).map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        let (key, value) = self
            .value
            .take()
            .ok_or_else(|| ErrorKind::custom("value requested before key"))?;

        seed.deserialize(ValueDeserializer {
            key: Key::Name(key),
            value,
        })
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.params.len())
    }
}

// ==============================================================================
// ValueDeserializer
// ==============================================================================

/// Where a value came from, for error messages.
#[derive(Clone, Copy, Debug)]
enum Key<'de> {
    Name(&'de str),
    Index(usize),
}

/// Parses the value with `FromStr` and hands it to the matching visit method.
macro_rules! parse_value {
    ($($method:ident => $visit:ident: $ty:literal,)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value, Self::Error>
            where
                V: Visitor<'de>,
            {
                let parsed = self.value.parse().map_err(|_| self.parse_error($ty))?;
                visitor.$visit(parsed)
            }
        )*
    };
}

/// Rejects container types, which a single segment can never hold.
macro_rules! unsupported {
    ($($method:ident($($arg:ident: $arg_ty:ty),*),)*) => {
        $(
            fn $method<V>(self, $($arg: $arg_ty,)* _visitor: V) -> Result<V::Value, Self::Error>
            where
                V: Visitor<'de>,
            {
                Err(ErrorKind::Unsupported {
                    name: std::any::type_name::<V::Value>(),
                })
            }
        )*
    };
}

#[derive(Debug)]
struct ValueDeserializer<'de> {
    key: Key<'de>,
    value: &'de PercentDecodedStr,
}

impl ValueDeserializer<'_> {
    fn parse_error(&self, expected_type: &'static str) -> ErrorKind {
        let value = self.value.as_str().to_owned();
        match self.key {
            Key::Name(key) => ErrorKind::InvalidValue {
                key: key.to_owned(),
                value,
                expected_type,
            },
            Key::Index(index) => ErrorKind::InvalidValueAt {
                index,
                value,
                expected_type,
            },
        }
    }
}

impl<'de> Deserializer<'de> for ValueDeserializer<'de> {
    type Error = ErrorKind;

    parse_value! {
        deserialize_bool => visit_bool: "bool",
        deserialize_i8 => visit_i8: "i8",
        deserialize_i16 => visit_i16: "i16",
        deserialize_i32 => visit_i32: "i32",
        deserialize_i64 => visit_i64: "i64",
        deserialize_u8 => visit_u8: "u8",
        deserialize_u16 => visit_u16: "u16",
        deserialize_u32 => visit_u32: "u32",
        deserialize_u64 => visit_u64: "u64",
        deserialize_f32 => visit_f32: "f32",
        deserialize_f64 => visit_f64: "f64",
        deserialize_char => visit_char: "char",
    }

    unsupported! {
        deserialize_seq(),
        deserialize_map(),
        deserialize_tuple(_len: usize),
        deserialize_tuple_struct(_name: &'static str, _len: usize),
        deserialize_struct(_name: &'static str, _fields: &'static [&'static str]),
    }

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let value: &'de PercentDecodedStr = self.value;
        visitor.visit_borrowed_str(value.as_str())
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let value: &'de PercentDecodedStr = self.value;
        visitor.visit_borrowed_bytes(value.as_bytes())
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let value: &'de PercentDecodedStr = self.value;
        visitor.visit_enum(IntoDeserializer::<'de, Self::Error>::into_deserializer(value.as_str()))
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}
