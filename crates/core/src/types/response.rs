//! Rate service response document.
//!
//! ```json
//! {"packages_rates": [{"rates": [{"code": "EXP", "name": "Express",
//!   "total_cost": "15.00", "calculated_taxes": "1.50"}]}]}
//! ```
//!
//! Amounts are read loosely: `calculated_taxes` is passed through untouched,
//! and a rate whose `total_cost` is not a number is dropped on its own
//! instead of failing the whole document.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use super::rate::Rate;

/// A rate as quoted by the remote service.
#[derive(Debug, Clone, Deserialize)]
pub struct QuotedRate {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub total_cost: Value,
    #[serde(default)]
    pub calculated_taxes: Value,
}

impl QuotedRate {
    /// Total cost as a decimal, accepting both JSON strings and numbers.
    ///
    /// Returns `None` for `null`, a missing field, or anything not numeric.
    #[must_use]
    pub fn cost(&self) -> Option<Decimal> {
        decimal_from_value(&self.total_cost)
    }

    /// Convert into a checkout rate, or `None` when the cost is unusable.
    #[must_use]
    pub fn into_rate(self) -> Option<Rate> {
        let cost = self.cost()?;
        Some(Rate::new(self.code, self.name, cost, self.calculated_taxes))
    }
}

fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        _ => None,
    }
}

/// Rates quoted for one package.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageRates {
    #[serde(default)]
    pub rates: Vec<QuotedRate>,
}

/// Full response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RatesResponse {
    #[serde(default)]
    pub packages_rates: Vec<PackageRates>,
}

impl RatesResponse {
    /// Flatten every package's rates into one list, keeping response order.
    ///
    /// Rates without a usable `total_cost` are skipped.
    #[must_use]
    pub fn into_rates(self) -> Vec<Rate> {
        self.packages_rates
            .into_iter()
            .flat_map(|package| package.rates)
            .filter_map(QuotedRate::into_rate)
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flattens_packages_in_order() {
        let body = r#"{"packages_rates": [
            {"rates": [
                {"code": "A1", "name": "A one", "total_cost": "1.00", "calculated_taxes": "0.10"},
                {"code": "A2", "name": "A two", "total_cost": "2.00", "calculated_taxes": "0.20"}
            ]},
            {"rates": [
                {"code": "B1", "name": "B one", "total_cost": "3.00", "calculated_taxes": "0.30"},
                {"code": "B2", "name": "B two", "total_cost": "4.00", "calculated_taxes": "0.40"}
            ]}
        ]}"#;

        let rates = serde_json::from_str::<RatesResponse>(body)
            .unwrap()
            .into_rates();

        let ids: Vec<_> = rates.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["A1", "A2", "B1", "B2"]);
        assert_eq!(rates[3].taxes["1"], json!("0.40"));
    }

    #[test]
    fn test_numeric_amounts_accepted() {
        let body = r#"{"packages_rates": [{"rates": [
            {"code": "STD", "name": "Standard", "total_cost": 9.5, "calculated_taxes": 0}
        ]}]}"#;

        let rates = serde_json::from_str::<RatesResponse>(body)
            .unwrap()
            .into_rates();
        assert_eq!(rates[0].cost, Decimal::new(95, 1));
        assert_eq!(rates[0].taxes["1"], json!(0));
    }

    #[test]
    fn test_null_tax_keeps_every_rate() {
        let body = r#"{"packages_rates": [{"rates": [
            {"code": "REG", "name": "Regular", "total_cost": "9.95", "calculated_taxes": "0.90"},
            {"code": "EXP", "name": "Express", "total_cost": "14.95", "calculated_taxes": null}
        ]}]}"#;

        let rates = serde_json::from_str::<RatesResponse>(body)
            .unwrap()
            .into_rates();

        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].taxes["1"], json!("0.90"));
        assert_eq!(rates[1].id, "EXP");
        assert_eq!(rates[1].cost, Decimal::new(1495, 2));
        assert_eq!(rates[1].taxes["1"], Value::Null);
    }

    #[test]
    fn test_non_numeric_tax_passed_through() {
        let body = r#"{"packages_rates": [{"rates": [
            {"code": "PICKUP", "name": "Pickup", "total_cost": "0", "calculated_taxes": "n/a"}
        ]}]}"#;

        let rates = serde_json::from_str::<RatesResponse>(body)
            .unwrap()
            .into_rates();
        assert_eq!(rates[0].taxes["1"], json!("n/a"));
    }

    #[test]
    fn test_unusable_cost_drops_only_that_rate() {
        let body = r#"{"packages_rates": [
            {"rates": [
                {"code": "BAD1", "name": "No cost", "total_cost": null, "calculated_taxes": "0.10"},
                {"code": "OK1", "name": "Fine", "total_cost": "5.00", "calculated_taxes": "0.50"}
            ]},
            {"rates": [
                {"code": "BAD2", "name": "Garbled", "total_cost": "call us", "calculated_taxes": "0"},
                {"code": "BAD3", "name": "Missing", "calculated_taxes": "0"},
                {"code": "OK2", "name": "Also fine", "total_cost": 7, "calculated_taxes": "0.70"}
            ]}
        ]}"#;

        let rates = serde_json::from_str::<RatesResponse>(body)
            .unwrap()
            .into_rates();

        let ids: Vec<_> = rates.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["OK1", "OK2"]);
        assert_eq!(rates[1].cost, Decimal::new(7, 0));
    }

    #[test]
    fn test_missing_lists_are_empty() {
        let rates = serde_json::from_str::<RatesResponse>("{}")
            .unwrap()
            .into_rates();
        assert!(rates.is_empty());

        let rates = serde_json::from_str::<RatesResponse>(r#"{"packages_rates": [{}]}"#)
            .unwrap()
            .into_rates();
        assert!(rates.is_empty());
    }
}
