//! Quote arithmetic using rust_decimal for precision.
//!
//! Every function here is pure. Amounts stay exact `Decimal` values until
//! they are formatted for the page.

use rust_decimal::prelude::*;

use crate::model::{FixedCostEntry, LineItem, QuoteRequest};

/// Monetary values print with 2 decimal places, half away from zero.
const DECIMAL_PLACES: u32 = 2;

/// Percentages print with 1 decimal place.
const PERCENT_PLACES: u32 = 1;

const CURRENCY_SYMBOL: &str = "€";

// ============================================================================
// Aggregation
// ============================================================================

pub fn per_person_subtotal(items: &[LineItem]) -> Decimal {
    items.iter().map(|item| item.unit_price).sum()
}

pub fn food_total(per_person: Decimal, headcount: u32) -> Decimal {
    per_person * Decimal::from(headcount)
}

pub fn fixed_costs_total(entries: &[FixedCostEntry]) -> Decimal {
    entries.iter().map(|entry| entry.amount).sum()
}

/// Sum of production costs per person. A missing cost counts as zero.
pub fn production_subtotal(items: &[LineItem]) -> Decimal {
    items
        .iter()
        .map(|item| item.unit_production_cost.unwrap_or(Decimal::ZERO))
        .sum()
}

pub fn unit_margin(item: &LineItem) -> Decimal {
    item.unit_price - item.unit_production_cost.unwrap_or(Decimal::ZERO)
}

/// Profit as a percentage of revenue; zero revenue yields 0.
pub fn margin_percent(profit: Decimal, revenue: Decimal) -> Decimal {
    if revenue.is_zero() {
        return Decimal::ZERO;
    }
    profit / revenue * Decimal::ONE_HUNDRED
}

/// Client-facing totals of a quote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteTotals {
    pub per_person_subtotal: Decimal,
    pub headcount: u32,
    pub food_total: Decimal,
    pub fixed_costs_total: Decimal,
    pub grand_total: Decimal,
}

impl QuoteTotals {
    pub fn compute(items: &[LineItem], headcount: u32, fixed_costs: &[FixedCostEntry]) -> Self {
        let per_person_subtotal = per_person_subtotal(items);
        let food_total = food_total(per_person_subtotal, headcount);
        let fixed_costs_total = fixed_costs_total(fixed_costs);
        Self {
            per_person_subtotal,
            headcount,
            food_total,
            fixed_costs_total,
            grand_total: food_total + fixed_costs_total,
        }
    }

    pub fn for_request(request: &QuoteRequest) -> Self {
        Self::compute(
            &request.line_items,
            request.headcount,
            request.included_fixed_costs(),
        )
    }
}

/// Revenue against production and fixed costs, for internal use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfitAnalysis {
    pub revenue: Decimal,
    pub production_subtotal: Decimal,
    pub food_production_total: Decimal,
    pub fixed_costs_total: Decimal,
    pub total_costs: Decimal,
    pub profit: Decimal,
    pub margin_percent: Decimal,
}

impl ProfitAnalysis {
    pub fn compute(totals: &QuoteTotals, items: &[LineItem]) -> Self {
        let production_subtotal = production_subtotal(items);
        let food_production_total = food_total(production_subtotal, totals.headcount);
        let total_costs = food_production_total + totals.fixed_costs_total;
        let profit = totals.grand_total - total_costs;
        Self {
            revenue: totals.grand_total,
            production_subtotal,
            food_production_total,
            fixed_costs_total: totals.fixed_costs_total,
            total_costs,
            profit,
            margin_percent: margin_percent(profit, totals.grand_total),
        }
    }

    pub fn outcome(&self) -> ProfitOutcome {
        if self.profit.is_sign_negative() && !self.profit.is_zero() {
            ProfitOutcome::Loss(self.profit.abs())
        } else {
            ProfitOutcome::Profit(self.profit)
        }
    }
}

/// Sign of the result, carrying the absolute amount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfitOutcome {
    Profit(Decimal),
    Loss(Decimal),
}

impl ProfitOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ProfitOutcome::Profit(_) => "PROFITTO",
            ProfitOutcome::Loss(_) => "PERDITA",
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            ProfitOutcome::Profit(amount) | ProfitOutcome::Loss(amount) => *amount,
        }
    }
}

// ============================================================================
// Formatting
// ============================================================================

pub fn format_euro(amount: Decimal) -> String {
    let rounded =
        amount.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}{:.2}", CURRENCY_SYMBOL, rounded.abs())
    } else {
        format!("{}{:.2}", CURRENCY_SYMBOL, rounded.abs())
    }
}

pub fn format_percent(value: Decimal) -> String {
    let rounded =
        value.round_dp_with_strategy(PERCENT_PLACES, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.1}%", rounded)
}
