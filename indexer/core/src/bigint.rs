//! Serde helpers to store 256-bit integers as decimal strings.

use alloy_primitives::U256;
use serde::{de, Deserialize, Deserializer, Serializer};

pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(value)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_decimal(&value).map_err(de::Error::custom)
}

fn parse_decimal(value: &str) -> Result<U256, String> {
    U256::from_str_radix(value, 10).map_err(|err| format!("invalid decimal integer {value}: {err}"))
}

pub mod vec {
    use alloy_primitives::U256;
    use serde::{de, ser::SerializeSeq, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(values: &[U256], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for value in values {
            seq.serialize_element(&value.to_string())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<U256>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let values = Vec::<String>::deserialize(deserializer)?;
        values
            .iter()
            .map(|value| super::parse_decimal(value).map_err(de::Error::custom))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Amounts {
        #[serde(with = "crate::bigint")]
        price: U256,
        #[serde(with = "crate::bigint::vec")]
        ids: Vec<U256>,
    }

    #[test]
    fn test_decimal_strings() {
        let amounts = Amounts {
            price: U256::from(1_000_000_000_000_000_000u128),
            ids: vec![U256::from(1), U256::from(42)],
        };
        let value = serde_json::to_value(&amounts).unwrap();
        assert_eq!(
            value,
            json!({ "price": "1000000000000000000", "ids": ["1", "42"] })
        );
        let back: Amounts = serde_json::from_value(value).unwrap();
        assert_eq!(back, amounts);
    }

    #[test]
    fn test_rejects_hex() {
        let value = json!({ "price": "0x10", "ids": [] });
        assert!(serde_json::from_value::<Amounts>(value).is_err());
    }
}
