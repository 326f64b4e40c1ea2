use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CartError;

/// Non-negative course price in the storefront's currency.
///
/// Serialized as a plain JSON number so persisted carts stay readable.
/// Amounts are below [`Price::MAX`] with at most [`Price::SCALE`] decimal
/// places, which keeps every price exact through an `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    pub const ZERO: Price = Price(Decimal::ZERO);

    /// Exclusive upper bound for a single price.
    pub const MAX: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

    /// Decimal places a price may carry.
    pub const SCALE: u32 = 2;

    /// Create a price, rejecting negative, oversized and over-precise amounts.
    pub fn new(amount: Decimal) -> Result<Self, CartError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(CartError::InvalidPrice(format!(
                "price must not be negative (got {})",
                amount
            )));
        }
        if amount >= Self::MAX {
            return Err(CartError::InvalidPrice(format!(
                "price must be below {} (got {})",
                Self::MAX,
                amount
            )));
        }
        let amount = amount.normalize();
        if amount.scale() > Self::SCALE {
            return Err(CartError::InvalidPrice(format!(
                "price may have at most {} decimal places (got {})",
                Self::SCALE,
                amount
            )));
        }
        Ok(Self(amount))
    }

    /// Price from a whole number of currency units.
    pub fn whole(units: u32) -> Self {
        Self(Decimal::from(units))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_free(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl FromStr for Price {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim())
            .map_err(|e| CartError::InvalidPrice(format!("'{}': {}", s, e)))?;
        Self::new(amount)
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        Price(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Self {
        iter.fold(Price::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Price> for Price {
    fn sum<I: Iterator<Item = &'a Price>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Price::new(amount).map_err(serde::de::Error::custom)
    }
}

/// One orderable course entry. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub title: String,
    pub instructor: String,
    pub price: Price,
}

impl CartItem {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        instructor: impl Into<String>,
        price: Price,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            instructor: instructor.into(),
            price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_price_rejected() {
        assert!(Price::new(Decimal::new(-1, 0)).is_err());
        assert!("-5".parse::<Price>().is_err());
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_oversized_price_rejected() {
        assert!("999999999999.99".parse::<Price>().is_ok());
        assert!("1000000000000".parse::<Price>().is_err());
        assert!("5e28".parse::<Price>().is_err());
        assert_eq!(Price::MAX, Decimal::new(1_000_000_000_000, 0));
    }

    #[test]
    fn test_excess_decimal_places_rejected() {
        assert!("0.1234567890123456789".parse::<Price>().is_err());
        assert!("19.999".parse::<Price>().is_err());
        // Trailing zeros do not count.
        assert_eq!("19.9900".parse::<Price>().unwrap().to_string(), "19.99");
    }

    #[test]
    fn test_item_with_out_of_range_price_fails_to_deserialize() {
        for price in ["5e28", "0.1234567890123456789"] {
            let raw = format!(
                r#"{{"id":"a","title":"Rust","instructor":"Ferris","price":{}}}"#,
                price
            );
            assert!(serde_json::from_str::<CartItem>(&raw).is_err(), "{}", price);
        }
    }

    #[test]
    fn test_largest_price_round_trips() {
        let price: Price = "999999999999.99".parse().unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(serde_json::from_str::<Price>(&json).unwrap(), price);
    }

    #[test]
    fn test_price_sum_and_display() {
        let prices = [Price::whole(500), Price::ZERO, "49.50".parse().unwrap()];
        let total: Price = prices.iter().sum();
        assert_eq!(total.to_string(), "549.5");
        assert!(Price::ZERO.is_free());
        assert!(!Price::whole(1).is_free());
    }

    #[test]
    fn test_item_deserializes_integer_and_float_prices() {
        let item: CartItem = serde_json::from_str(
            r#"{"id":"a","title":"Rust","instructor":"Ferris","price":500}"#,
        )
        .unwrap();
        assert_eq!(item.price, Price::whole(500));

        let item: CartItem = serde_json::from_str(
            r#"{"id":"b","title":"Go","instructor":"Gopher","price":19.99}"#,
        )
        .unwrap();
        assert_eq!(item.price, "19.99".parse().unwrap());
    }

    #[test]
    fn test_item_with_negative_price_fails_to_deserialize() {
        let result: Result<CartItem, _> = serde_json::from_str(
            r#"{"id":"a","title":"Rust","instructor":"Ferris","price":-1}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_price_serializes_as_number() {
        let json = serde_json::to_value(Price::whole(500)).unwrap();
        assert!(json.is_number());
        assert_eq!(json.as_f64(), Some(500.0));
    }
}
