use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "diesel")]
use diesel::deserialize::{self, FromSql, Queryable};
#[cfg(feature = "diesel")]
use diesel::expression::AsExpression;
#[cfg(feature = "diesel")]
use diesel::pg::{Pg, PgValue};
#[cfg(feature = "diesel")]
use diesel::serialize::{self, Output, ToSql};
#[cfg(feature = "diesel")]
use diesel::sql_types::BigInt;
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};

use crate::{Codec, Config, Error};

thread_local! {
    static CODEC_CACHE: RefCell<HashMap<String, Arc<Codec>>> = RefCell::new(HashMap::new());
}

// Each type gets its own salt, so equal IDs of different types look unrelated.
fn get_or_create_codec(name: &str) -> Option<Arc<Codec>> {
    CODEC_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if let Some(codec) = cache.get(name) {
            return Some(codec.clone());
        }
        let config = Config::global()?;
        let salt = format!("{}/{}", name, config.salt);
        let codec = Arc::new(Codec::new(&Config {
            alphabet: config.alphabet,
            min_length: config.min_length,
            salt: &salt,
        }));
        cache.insert(name.to_string(), codec.clone());
        Some(codec)
    })
}

const MISSING_CONFIG: &str = "global hashids config is not set";

pub trait TypeMarker: std::fmt::Debug {
    fn name() -> &'static str;
}

/// A generic type-safe object ID field (a wrapped u64).
///
/// When serialized with Serde, the number is automatically encoded into a hashid.
/// Deserialization decodes the string back to an integer.  The string has an object
/// type specific prefix defined in the type marker's `fn name()`, and the name is
/// also mixed into the salt.
///
/// With the `diesel` feature, traits are also provided for Diesel compatibility with
/// Postgres BigInt fields.
///
/// # Examples
///
/// ```
/// use hashids_rs;
/// use serde::{Serialize, Deserialize};
/// use serde_json;
///
/// #[derive(Clone, Copy, Debug)]
/// pub struct ExampleIdMarker;
/// impl hashids_rs::TypeMarker for ExampleIdMarker {
///     fn name() -> &'static str { "example" }
/// }
///
/// type ExampleId = hashids_rs::Field<ExampleIdMarker>;
///
/// #[derive(serde::Serialize)]
/// struct Example {
///     pub id: ExampleId,
/// }
///
/// hashids_rs::Config::set_global(hashids_rs::Config::new("your salt"));
/// let obj = Example {id: ExampleId::from(12345)};
/// let obj_str = serde_json::to_string(&obj).unwrap();
/// assert_eq!(obj_str, "{\"id\":\"example_1AgZ\"}");
/// ```
#[cfg_attr(feature = "diesel", derive(AsExpression), diesel(sql_type = BigInt))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<T: TypeMarker> {
    id: u64,
    _marker: std::marker::PhantomData<T>,
}

impl<T: TypeMarker> From<Field<T>> for u64 {
    /// Returns the raw `u64` value.
    fn from(field: Field<T>) -> Self {
        field.id
    }
}

impl<T: TypeMarker> From<u64> for Field<T> {
    /// Creates a `Field<T>` value from a `u64`.
    fn from(id: u64) -> Self {
        Field {
            id,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T: TypeMarker> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Field {{ id: {}, marker: {} }}", self.id, T::name())
    }
}

impl<T: TypeMarker> Field<T> {
    /// Encodes the ID into its public string form, `None` if no global config is set.
    pub fn encode(&self) -> Option<String> {
        let codec = get_or_create_codec(T::name())?;
        Some(format!("{}_{}", T::name(), codec.encode(&[self.id])))
    }

    /// Decodes a string produced by `encode`.
    pub fn decode(encoded: &str) -> Result<Self, Error> {
        let hashid = encoded
            .strip_prefix(T::name())
            .and_then(|rest| rest.strip_prefix('_'))
            .ok_or(Error::Malformed)?;
        let codec = get_or_create_codec(T::name()).ok_or(Error::Malformed)?;
        match codec.try_decode(hashid)?.as_slice() {
            [id] => Ok(Field::from(*id)),
            _ => Err(Error::Malformed),
        }
    }
}

impl<T: TypeMarker> Serialize for Field<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let encoded = self
            .encode()
            .ok_or_else(|| <S::Error as ser::Error>::custom(MISSING_CONFIG))?;
        serializer.serialize_str(&encoded)
    }
}

impl<'de, T: TypeMarker> Deserialize<'de> for Field<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        if Config::global().is_none() {
            return Err(de::Error::custom(MISSING_CONFIG));
        }
        Field::decode(&encoded).map_err(de::Error::custom)
    }
}

#[cfg(feature = "diesel")]
impl<T: TypeMarker> ToSql<BigInt, Pg> for Field<T> {
    fn to_sql(&self, out: &mut Output<'_, '_, Pg>) -> serialize::Result {
        <i64 as ToSql<BigInt, Pg>>::to_sql(&(self.id as i64), &mut out.reborrow())
    }
}

#[cfg(feature = "diesel")]
impl<T: TypeMarker> FromSql<BigInt, Pg> for Field<T> {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        let id = <i64 as FromSql<BigInt, Pg>>::from_sql(bytes)?;
        Ok(Field::from(id as u64))
    }
}

#[cfg(feature = "diesel")]
impl<T> Queryable<BigInt, Pg> for Field<T>
where
    T: TypeMarker,
{
    type Row = <i64 as Queryable<BigInt, Pg>>::Row;

    fn build(row: Self::Row) -> deserialize::Result<Self> {
        let id = i64::build(row)?;
        Ok(Field::from(id as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    struct UserMarker;
    impl TypeMarker for UserMarker {
        fn name() -> &'static str {
            "user"
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    struct OrderMarker;
    impl TypeMarker for OrderMarker {
        fn name() -> &'static str {
            "order"
        }
    }

    type UserId = Field<UserMarker>;
    type OrderId = Field<OrderMarker>;

    // All tests share the same global config.
    fn setup() {
        Config::set_global(Config::new("field test salt").min_length(8));
    }

    #[test]
    fn test_serialize() {
        setup();
        assert_eq!(
            serde_json::to_string(&UserId::from(42)).unwrap(),
            "\"user_yzELG2Lg\""
        );
        assert_eq!(
            serde_json::to_string(&OrderId::from(42)).unwrap(),
            "\"order_yEQzlXq6\""
        );
    }

    #[test]
    fn test_deserialize() {
        setup();
        let id: UserId = serde_json::from_str("\"user_yzELG2Lg\"").unwrap();
        assert_eq!(u64::from(id), 42);
        let id: OrderId = serde_json::from_str("\"order_yEQzlXq6\"").unwrap();
        assert_eq!(u64::from(id), 42);
    }

    #[test]
    fn test_decode_errors() {
        setup();
        // Wrong type prefix.
        assert_eq!(UserId::decode("order_yEQzlXq6"), Err(Error::Malformed));
        assert_eq!(UserId::decode("yzELG2Lg"), Err(Error::Malformed));
        // Right prefix, another type's salt.
        assert!(UserId::decode("user_yEQzlXq6").is_err());
        // Valid hashid of two values.
        assert_eq!(UserId::decode("user_5M9YhyMV"), Err(Error::Malformed));
        assert!(serde_json::from_str::<UserId>("\"user_yzELG2Lh\"").is_err());
    }

    #[test]
    fn test_roundtrip() {
        setup();
        for id in [0, 1, 42, 1_000_000, u64::MAX] {
            let encoded = UserId::from(id).encode().unwrap();
            assert_eq!(UserId::decode(&encoded), Ok(UserId::from(id)));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(UserId::from(7).to_string(), "Field { id: 7, marker: user }");
    }

    // A marker without Clone or Copy, as in the crate docs.
    #[derive(Debug)]
    struct TagMarker;
    impl TypeMarker for TagMarker {
        fn name() -> &'static str {
            "tag"
        }
    }

    #[derive(serde::Serialize, serde::Deserialize)]
    struct Tagged {
        id: Field<TagMarker>,
    }

    #[test]
    fn test_marker_without_copy() {
        setup();
        let tagged = Tagged { id: Field::from(7) };
        let json = serde_json::to_string(&tagged).unwrap();
        assert_eq!(json, "{\"id\":\"tag_xWPKOPkb\"}");
        let tagged: Tagged = serde_json::from_str(&json).unwrap();
        assert_eq!(u64::from(tagged.id), 7);
    }
}
