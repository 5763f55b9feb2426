//! Ad spend and profit rows fed to the advice stage.
//!
//! Money fields are [`Decimal`]; JSON numbers and numeric strings are both
//! accepted on input.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One day (or period) of paid-media results for a campaign on a platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendRecord {
    #[serde(default)]
    pub date: Option<String>,
    pub platform: String,
    #[serde(default)]
    pub campaign: String,
    pub spend: Decimal,
    #[serde(default)]
    pub clicks: Option<u64>,
    #[serde(default)]
    pub conversions: u64,
    #[serde(default, alias = "sales")]
    pub revenue: Decimal,
}

/// Revenue and cost of goods for one product over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitRecord {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(alias = "name")]
    pub product: String,
    pub revenue: Decimal,
    #[serde(alias = "costs")]
    pub cost: Decimal,
}

impl ProfitRecord {
    /// Revenue minus cost; `None` if the difference overflows.
    #[must_use]
    pub fn net(&self) -> Option<Decimal> {
        self.revenue.checked_sub(self.cost)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn spend_record_accepts_numbers_and_strings() {
        let record: SpendRecord = serde_json::from_value(json!({
            "platform": "Meta",
            "campaign": "Black Friday",
            "spend": "120.50",
            "conversions": 4,
            "sales": 480
        }))
        .expect("decode");
        assert_eq!(record.spend, Decimal::new(12050, 2));
        assert_eq!(record.revenue, Decimal::from(480));
        assert_eq!(record.clicks, None);
    }

    #[test]
    fn profit_record_net_subtracts_cost() {
        let record: ProfitRecord = serde_json::from_value(json!({
            "name": "Widget",
            "revenue": 1000,
            "costs": 650.25
        }))
        .expect("decode");
        assert_eq!(record.net(), Some(Decimal::new(34975, 2)));
    }

    #[test]
    fn profit_record_net_reports_overflow() {
        let record = ProfitRecord {
            date: None,
            product: "Widget".to_string(),
            revenue: Decimal::MAX,
            cost: Decimal::MIN,
        };
        assert_eq!(record.net(), None);
    }
}
