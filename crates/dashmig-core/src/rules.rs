//! Ordered replacement rule tables for the v5 snapshot schema migration.
//!
//! Rules are literal substring pairs applied in table order against the
//! progressively mutated content, so ordering is load-bearing: a rule
//! whose pattern is a prefix of a later rule's pattern would consume the
//! narrower match first and corrupt it. [`check_ordering`] enforces the
//! invariant that no earlier pattern is a prefix of a later one, and the
//! built-in tables are asserted against it in tests.
//!
//! Patterns ending in `'` match a complete quoted JSONPath; patterns
//! ending in `.` are prefix rules that cover every sub-field below them.

/// A single literal substring replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub find: &'static str,
    pub replace: &'static str,
}

const fn rule(find: &'static str, replace: &'static str) -> Rule {
    Rule { find, replace }
}

/// Rules for dashboards querying the daily snapshot table.
///
/// v5 restructured the daily payload: totals and income moved under
/// `portfolio`, `portfolio_rollups` flattened into `portfolio` with risk
/// split across `volatility`/`ratios`/`drawdown`/`var`, margin stress
/// became `margin`, the goal family regrouped under `goals`, holdings
/// sub-fields nested under `cost`/`valuation`/`income`/`analytics`/
/// `reliability`, dividend windows became `realized`, and coverage moved
/// to `meta.data_quality`.
const DAILY_RULES: &[Rule] = &[
    // Totals: root -> portfolio.totals
    rule("'$.totals.market_value'", "'$.portfolio.totals.market_value'"),
    rule(
        "'$.totals.net_liquidation_value'",
        "'$.portfolio.totals.net_liquidation_value'",
    ),
    rule(
        "'$.totals.margin_to_portfolio_pct'",
        "'$.portfolio.totals.margin_to_portfolio_pct'",
    ),
    rule(
        "'$.totals.margin_loan_balance'",
        "'$.portfolio.totals.margin_loan_balance'",
    ),
    rule("'$.totals.unrealized_pnl'", "'$.portfolio.totals.unrealized_pnl'"),
    rule("'$.totals.unrealized_pct'", "'$.portfolio.totals.unrealized_pct'"),
    rule("'$.totals.cost_basis'", "'$.portfolio.totals.cost_basis'"),
    rule("'$.totals.holdings_count'", "'$.portfolio.totals.holdings_count'"),
    // Income: root -> portfolio.income
    rule(
        "'$.income.projected_monthly_income'",
        "'$.portfolio.income.projected_monthly_income'",
    ),
    rule(
        "'$.income.forward_12m_total'",
        "'$.portfolio.income.forward_12m_total'",
    ),
    rule(
        "'$.income.portfolio_current_yield_pct'",
        "'$.portfolio.income.portfolio_current_yield_pct'",
    ),
    rule(
        "'$.income.portfolio_yield_on_cost_pct'",
        "'$.portfolio.income.portfolio_yield_on_cost_pct'",
    ),
    // Risk: drawdown_status -> drawdown (before the general risk rules)
    rule(
        "'$.portfolio_rollups.risk.drawdown_status.currently_in_drawdown'",
        "'$.portfolio.risk.drawdown.currently_in_drawdown'",
    ),
    rule(
        "'$.portfolio_rollups.risk.drawdown_status.current_drawdown_depth_pct'",
        "'$.portfolio.risk.drawdown.current_drawdown_depth_pct'",
    ),
    rule(
        "'$.portfolio_rollups.risk.drawdown_status.days_since_peak'",
        "'$.portfolio.risk.drawdown.days_since_peak'",
    ),
    rule(
        "'$.portfolio_rollups.risk.drawdown_status.recovery_progress_pct'",
        "'$.portfolio.risk.drawdown.recovery_progress_pct'",
    ),
    // Risk: volatility
    rule(
        "'$.portfolio_rollups.risk.vol_30d_pct'",
        "'$.portfolio.risk.volatility.vol_30d_pct'",
    ),
    rule(
        "'$.portfolio_rollups.risk.vol_90d_pct'",
        "'$.portfolio.risk.volatility.vol_90d_pct'",
    ),
    // Risk: ratios
    rule(
        "'$.portfolio_rollups.risk.sharpe_1y'",
        "'$.portfolio.risk.ratios.sharpe_1y'",
    ),
    rule(
        "'$.portfolio_rollups.risk.sortino_1y'",
        "'$.portfolio.risk.ratios.sortino_1y'",
    ),
    rule(
        "'$.portfolio_rollups.risk.calmar_1y'",
        "'$.portfolio.risk.ratios.calmar_1y'",
    ),
    rule(
        "'$.portfolio_rollups.risk.ulcer_index_1y'",
        "'$.portfolio.risk.ratios.ulcer_index_1y'",
    ),
    rule(
        "'$.portfolio_rollups.risk.omega_ratio_1y'",
        "'$.portfolio.risk.ratios.omega_ratio_1y'",
    ),
    // Risk: max drawdown
    rule(
        "'$.portfolio_rollups.risk.max_drawdown_1y_pct'",
        "'$.portfolio.risk.drawdown.max_drawdown_1y_pct'",
    ),
    // Risk: VaR / CVaR
    rule(
        "'$.portfolio_rollups.risk.var_95_1d_pct'",
        "'$.portfolio.risk.var.var_95_1d_pct'",
    ),
    rule(
        "'$.portfolio_rollups.risk.var_95_1w_pct'",
        "'$.portfolio.risk.var.var_95_1w_pct'",
    ),
    rule(
        "'$.portfolio_rollups.risk.var_95_1m_pct'",
        "'$.portfolio.risk.var.var_95_1m_pct'",
    ),
    rule(
        "'$.portfolio_rollups.risk.cvar_95_1d_pct'",
        "'$.portfolio.risk.var.cvar_95_1d_pct'",
    ),
    rule(
        "'$.portfolio_rollups.risk.cvar_95_1w_pct'",
        "'$.portfolio.risk.var.cvar_95_1w_pct'",
    ),
    rule(
        "'$.portfolio_rollups.risk.cvar_95_1m_pct'",
        "'$.portfolio.risk.var.cvar_95_1m_pct'",
    ),
    // Risk: standalone fields
    rule(
        "'$.portfolio_rollups.risk.beta_portfolio'",
        "'$.portfolio.risk.beta_portfolio'",
    ),
    rule(
        "'$.portfolio_rollups.risk.portfolio_risk_quality'",
        "'$.portfolio.risk.portfolio_risk_quality'",
    ),
    rule(
        "'$.portfolio_rollups.risk.income_stability_score'",
        "'$.portfolio.risk.income_stability_score'",
    ),
    rule(
        "'$.portfolio_rollups.risk.tracking_error_1y_pct'",
        "'$.portfolio.performance.vs_benchmark.tracking_error_1y_pct'",
    ),
    rule(
        "'$.portfolio_rollups.risk.corr_1y'",
        "'$.portfolio.performance.vs_benchmark.correlation_to_benchmark'",
    ),
    // vs_benchmark
    rule(
        "'$.portfolio_rollups.vs_benchmark.excess_return_1y_pct'",
        "'$.portfolio.performance.vs_benchmark.excess_return_1y_pct'",
    ),
    rule(
        "'$.portfolio_rollups.vs_benchmark.tracking_error_1y_pct'",
        "'$.portfolio.performance.vs_benchmark.tracking_error_1y_pct'",
    ),
    rule(
        "'$.portfolio_rollups.vs_benchmark.information_ratio_1y'",
        "'$.portfolio.performance.vs_benchmark.information_ratio_1y'",
    ),
    // Attribution (prefix rules: cover .top_contributors, .bottom_contributors, ...)
    rule(
        "'$.portfolio_rollups.return_attribution_1m.",
        "'$.portfolio.attribution.1m.",
    ),
    rule(
        "'$.portfolio_rollups.return_attribution_3m.",
        "'$.portfolio.attribution.3m.",
    ),
    rule(
        "'$.portfolio_rollups.return_attribution_6m.",
        "'$.portfolio.attribution.6m.",
    ),
    rule(
        "'$.portfolio_rollups.return_attribution_12m.",
        "'$.portfolio.attribution.12m.",
    ),
    // Income stability rollup
    rule(
        "'$.portfolio_rollups.income_stability.",
        "'$.portfolio.income.income_stability.",
    ),
    // Margin stress -> margin
    rule("'$.margin_stress.", "'$.margin."),
    // Goals (order: _net before plain to avoid partial match)
    rule("'$.goal_progress_net.", "'$.goals.net_of_interest."),
    rule("'$.goal_progress.", "'$.goals.baseline."),
    rule("'$.goal_tiers.current_state.", "'$.goals.current_state."),
    rule("'$.goal_tiers.tiers'", "'$.goals.tiers'"),
    rule("'$.goal_pace.", "'$.goals.pace."),
    // Data quality
    rule("'$.prices_as_of'", "'$.timestamps.price_data_as_of_date'"),
    rule("'$.missing_prices'", "'$.meta.data_quality.missing_paths'"),
    rule("'$.coverage.derived_pct'", "'$.meta.data_quality.derived_pct'"),
    // Dividends
    rule(
        "'$.dividends.windows.30d.by_symbol'",
        "'$.dividends.realized.30d.by_symbol'",
    ),
    // Holdings sub-fields (json_each(h.value) context only in daily)
    rule("'$.weight_pct'", "'$.valuation.portfolio_weight_pct'"),
    rule("'$.market_value'", "'$.valuation.market_value'"),
    rule("'$.current_yield_pct'", "'$.income.current_yield_pct'"),
    rule(
        "'$.projected_monthly_dividend'",
        "'$.income.projected_monthly_dividend'",
    ),
    rule("'$.unrealized_pct'", "'$.valuation.unrealized_pct'"),
    rule("'$.yield_on_cost_pct'", "'$.income.yield_on_cost_pct'"),
    rule("'$.forward_12m_dividend'", "'$.income.forward_12m_dividend'"),
    rule("'$.cost_basis'", "'$.cost.cost_basis'"),
    rule("'$.avg_cost_per_share'", "'$.cost.avg_cost_per_share'"),
    rule("'$.last_price'", "'$.valuation.last_price'"),
    rule("'$.unrealized_pnl'", "'$.valuation.unrealized_pnl'"),
    // Holdings: ultimate.* -> analytics.risk.*
    rule("'$.ultimate.sortino_1y'", "'$.analytics.risk.sortino_1y'"),
    rule("'$.ultimate.sharpe_1y'", "'$.analytics.risk.sharpe_1y'"),
    rule(
        "'$.ultimate.risk_quality_category'",
        "'$.analytics.risk.risk_quality_category'",
    ),
    rule(
        "'$.ultimate.risk_quality_score'",
        "'$.analytics.risk.risk_quality_score'",
    ),
    rule("'$.ultimate.vol_30d_pct'", "'$.analytics.risk.vol_30d_pct'"),
    rule("'$.ultimate.vol_90d_pct'", "'$.analytics.risk.vol_90d_pct'"),
    rule("'$.ultimate.beta_3y'", "'$.analytics.risk.beta_3y'"),
    rule(
        "'$.ultimate.max_drawdown_1y_pct'",
        "'$.analytics.risk.max_drawdown_1y_pct'",
    ),
    rule("'$.ultimate.corr_1y'", "'$.analytics.performance.corr_1y'"),
    rule("'$.ultimate.twr_1m_pct'", "'$.analytics.performance.twr_1m_pct'"),
    rule("'$.ultimate.twr_3m_pct'", "'$.analytics.performance.twr_3m_pct'"),
    rule("'$.ultimate.twr_6m_pct'", "'$.analytics.performance.twr_6m_pct'"),
    rule("'$.ultimate.twr_12m_pct'", "'$.analytics.performance.twr_12m_pct'"),
    rule(
        "'$.ultimate.distribution_frequency'",
        "'$.analytics.distribution.distribution_frequency'",
    ),
    rule(
        "'$.ultimate.trailing_12m_yield_pct'",
        "'$.analytics.distribution.trailing_12m_yield_pct'",
    ),
    rule(
        "'$.ultimate.forward_yield_pct'",
        "'$.analytics.distribution.forward_yield_pct'",
    ),
    rule(
        "'$.ultimate.next_ex_date_est'",
        "'$.analytics.distribution.next_ex_date_est'",
    ),
    // Holdings: dividend_reliability.* -> reliability.*
    rule("'$.dividend_reliability.", "'$.reliability."),
];

/// Rules for dashboards querying the period snapshot table.
///
/// Interval entries keep flat field names except market_value, which
/// became total_market_value. The `].` anchor covers both indexed
/// (`intervals[2].`) and templated (`intervals[%d].`) references while
/// never matching `period_summary` fields, which have no bracket and
/// already carry the new name.
const PERIOD_RULES: &[Rule] = &[rule(
    "].totals.market_value'",
    "].totals.total_market_value'",
)];

/// The daily-table rule set, in application order.
pub fn daily_rules() -> &'static [Rule] {
    DAILY_RULES
}

/// The period-table rule set, in application order.
pub fn period_rules() -> &'static [Rule] {
    PERIOD_RULES
}

/// Verify the specific-before-general ordering invariant.
///
/// Returns the offending `(earlier, later)` index pair if an earlier
/// pattern is a prefix of a later pattern, which would let the broad rule
/// consume (and corrupt) text the narrow rule was meant to match.
pub fn check_ordering(rules: &[Rule]) -> Option<(usize, usize)> {
    for (i, earlier) in rules.iter().enumerate() {
        for (j, later) in rules.iter().enumerate().skip(i + 1) {
            if later.find.starts_with(earlier.find) {
                return Some((i, j));
            }
        }
    }
    None
}
