// ABOUTME: Numeric wrappers for values the backend sends as numbers or numeric strings
// Amounts always display with two decimals, ratings with one

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    /// `None` for blank strings
    fn into_f64<E: serde::de::Error>(self) -> Result<Option<f64>, E> {
        match self {
            Self::Number(n) => Ok(Some(n)),
            Self::Text(s) if s.trim().is_empty() => Ok(None),
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| E::custom(format!("expected a number, got {s:?}"))),
        }
    }
}

/// Money value (balance, hourly rate, budget)
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Amount(pub f64);

impl Amount {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self(Numeric::deserialize(deserializer)?.into_f64()?.unwrap_or_default()))
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

/// Reviewer rating, e.g. 4.8
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Rating(pub f64);

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self(Numeric::deserialize(deserializer)?.into_f64()?.unwrap_or_default()))
    }
}

impl From<f64> for Rating {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

/// For `Option<Amount>` / `Option<Rating>` fields: null, missing and "" are all `None`
pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<f64>,
{
    match Option::<Numeric>::deserialize(deserializer)? {
        Some(n) => Ok(n.into_f64()?.map(T::from)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Wallet {
        balance: Amount,
        #[serde(default, deserialize_with = "optional")]
        rate: Option<Amount>,
        #[serde(default, deserialize_with = "optional")]
        rating: Option<Rating>,
    }

    #[test]
    fn test_numeric_string_renders_two_decimals() {
        let wallet: Wallet = serde_json::from_str(r#"{"balance": "150.5"}"#).unwrap();
        assert_eq!(wallet.balance.to_string(), "150.50");
        assert_eq!(wallet.rate, None);
    }

    #[test]
    fn test_plain_numbers_are_accepted() {
        let wallet: Wallet =
            serde_json::from_str(r#"{"balance": 12, "rate": 45.126, "rating": 4}"#).unwrap();
        assert_eq!(wallet.balance.to_string(), "12.00");
        assert_eq!(wallet.rate.unwrap().to_string(), "45.13");
        assert_eq!(wallet.rating.unwrap().to_string(), "4.0");
    }

    #[test]
    fn test_blank_and_null_optionals() {
        let wallet: Wallet =
            serde_json::from_str(r#"{"balance": "0", "rate": "", "rating": null}"#).unwrap();
        assert_eq!(wallet.rate, None);
        assert_eq!(wallet.rating, None);
    }

    #[test]
    fn test_garbage_is_rejected() {
        let result = serde_json::from_str::<Wallet>(r#"{"balance": "lots"}"#);
        assert!(result.is_err());
    }
}
