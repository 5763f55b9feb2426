//! Aggregation of spend and profit records into the advice prompt context.
//!
//! The context is derived per request and never stored.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use salescopy_core::{ProfitRecord, SpendRecord};

use crate::error::StageError;

const UNNAMED_CAMPAIGN: &str = "(sin campaña)";

/// Totals for one platform, one campaign, or the whole account.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PerformanceSummary {
    pub name: String,
    pub spend: Decimal,
    pub clicks: u64,
    pub conversions: u64,
    pub revenue: Decimal,
}

impl PerformanceSummary {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    fn add(&mut self, record: &SpendRecord) -> Result<(), StageError> {
        self.spend = self
            .spend
            .checked_add(record.spend)
            .ok_or_else(|| overflow("spend"))?;
        self.clicks = self
            .clicks
            .checked_add(record.clicks.unwrap_or(0))
            .ok_or_else(|| overflow("clicks"))?;
        self.conversions = self
            .conversions
            .checked_add(record.conversions)
            .ok_or_else(|| overflow("conversions"))?;
        self.revenue = self
            .revenue
            .checked_add(record.revenue)
            .ok_or_else(|| overflow("revenue"))?;
        Ok(())
    }

    /// Revenue per unit of spend; `None` when nothing was spent.
    #[must_use]
    pub fn roas(&self) -> Option<Decimal> {
        if self.spend.is_zero() {
            return None;
        }
        self.revenue.checked_div(self.spend).map(|r| r.round_dp(2))
    }

    /// Spend per conversion; `None` when there were no conversions.
    #[must_use]
    pub fn cpa(&self) -> Option<Decimal> {
        if self.conversions == 0 {
            return None;
        }
        self.spend
            .checked_div(Decimal::from(self.conversions))
            .map(|c| c.round_dp(2))
    }
}

/// Totals across all profit records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfitSummary {
    pub products: usize,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub net: Decimal,
}

impl ProfitSummary {
    /// Net profit as a percentage of revenue, two decimals.
    #[must_use]
    pub fn margin_pct(&self) -> Option<Decimal> {
        if self.revenue.is_zero() {
            return None;
        }
        self.net
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|n| n.checked_div(self.revenue))
            .map(|m| m.round_dp(2))
    }
}

/// Spend grouped by platform and by campaign, plus profit totals.
///
/// Groups are sorted by name so the rendered prompt is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketingAdviceContext {
    pub totals: PerformanceSummary,
    pub by_platform: Vec<PerformanceSummary>,
    pub by_campaign: Vec<PerformanceSummary>,
    pub profit: Option<ProfitSummary>,
}

impl MarketingAdviceContext {
    /// Aggregates the caller's records.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::Validation`] if a total overflows.
    pub fn from_records(
        records: &[SpendRecord],
        profit_data: &[ProfitRecord],
    ) -> Result<Self, StageError> {
        let mut totals = PerformanceSummary::named("Total");
        let mut platforms: BTreeMap<String, PerformanceSummary> = BTreeMap::new();
        let mut campaigns: BTreeMap<String, PerformanceSummary> = BTreeMap::new();

        for record in records {
            totals.add(record)?;

            let platform = record.platform.trim();
            platforms
                .entry(platform.to_lowercase())
                .or_insert_with(|| PerformanceSummary::named(platform))
                .add(record)?;

            let campaign = match record.campaign.trim() {
                "" => UNNAMED_CAMPAIGN,
                name => name,
            };
            campaigns
                .entry(campaign.to_string())
                .or_insert_with(|| PerformanceSummary::named(campaign))
                .add(record)?;
        }

        let profit = if profit_data.is_empty() {
            None
        } else {
            Some(ProfitSummary::from_records(profit_data)?)
        };

        Ok(Self {
            totals,
            by_platform: platforms.into_values().collect(),
            by_campaign: campaigns.into_values().collect(),
            profit,
        })
    }
}

impl ProfitSummary {
    fn from_records(profit_data: &[ProfitRecord]) -> Result<Self, StageError> {
        let mut summary = Self {
            products: profit_data.len(),
            revenue: Decimal::ZERO,
            cost: Decimal::ZERO,
            net: Decimal::ZERO,
        };
        for record in profit_data {
            let net = record.net().ok_or_else(|| overflow("net profit"))?;
            summary.revenue = summary
                .revenue
                .checked_add(record.revenue)
                .ok_or_else(|| overflow("profit revenue"))?;
            summary.cost = summary
                .cost
                .checked_add(record.cost)
                .ok_or_else(|| overflow("profit cost"))?;
            summary.net = summary
                .net
                .checked_add(net)
                .ok_or_else(|| overflow("net profit"))?;
        }
        Ok(summary)
    }
}

fn overflow(field: &str) -> StageError {
    StageError::validation(format!("{field} total overflows"))
}
