//! Serializes a [`primitive_types::U256`] as a decimal string instead of the
//! hex array `ethcontract`/`web3` use by default. JSON consumers of the
//! on-chain SDK call-data (quotes, plan amounts) expect plain decimal
//! integers, not hex.

use primitive_types::U256;
use serde::{de, Deserialize, Deserializer, Serializer};
use std::fmt;

pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = U256;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a decimal number encoded as a string")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            U256::from_dec_str(value).map_err(|err| E::custom(format!("invalid U256 {value:?}: {err:?}")))
        }
    }
    deserializer.deserialize_str(Visitor)
}

pub mod option {
    use super::*;

    pub fn serialize<S>(value: &Option<U256>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => super::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<U256>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt = Option::<String>::deserialize(deserializer)?;
        opt.map(|s| U256::from_dec_str(&s).map_err(|err| de::Error::custom(format!("invalid U256 {s:?}: {err:?}"))))
            .transpose()
    }
}
