//! Performance statistics.
//!
//! Every ratio has an explicit fallback for degenerate inputs (no
//! observations, zero volatility, no paired trades) so the report never
//! carries NaN or infinity.

use chrono::NaiveDate;
use reversion_core::types::{Trade, TradeType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Trading days per year used for annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Entry trade matched with the trade that closed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundTrip {
    pub ticker: String,
    /// Type of the opening trade
    pub direction: TradeType,
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    /// (exit_price - entry_price) / entry_price
    pub trade_return: f64,
}

/// Pair trades into sequential (entry, exit) round trips, per ticker.
///
/// The pooled log is the concatenation of every ticker's trades, so pairing
/// its entries two at a time would match one ticker's open position with the
/// next ticker's entry. Pairs are therefore formed within each ticker only.
/// A ticker's trailing unpaired trade is an open position and is left out.
pub fn pair_trades(trades: &[Trade]) -> Vec<RoundTrip> {
    let mut pending: HashMap<&str, &Trade> = HashMap::new();
    let mut round_trips = Vec::new();

    for trade in trades {
        match pending.remove(trade.ticker.as_str()) {
            None => {
                pending.insert(trade.ticker.as_str(), trade);
            }
            Some(entry) => round_trips.push(RoundTrip {
                ticker: entry.ticker.clone(),
                direction: entry.trade_type,
                entry_date: entry.date,
                exit_date: trade.date,
                entry_price: entry.price,
                exit_price: trade.price,
                trade_return: (trade.price - entry.price) / entry.price,
            }),
        }
    }

    round_trips
}

/// Risk and performance metrics over pooled return series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    /// Compounded strategy return
    pub cumulative_return: f64,
    /// Compounded return scaled to one year; `None` without observations
    pub annualized_return: Option<f64>,
    /// Annualized population standard deviation of returns
    pub volatility: f64,
    pub sharpe_ratio: f64,
    /// Annualized population standard deviation of negative returns
    pub downside_deviation: f64,
    pub sortino_ratio: f64,
    /// Worst peak-to-trough decline of the compounded curve (<= 0)
    pub max_drawdown: f64,
    /// 5th percentile of returns
    pub value_at_risk_95: f64,
    pub calmar_ratio: f64,
    /// Number of trade events
    pub total_trades: usize,
    /// Round trips with a positive return
    pub winning_trades: usize,
    /// Round trips with a zero or negative return
    pub losing_trades: usize,
    pub win_rate: f64,
    pub avg_trade_return: f64,
    pub avg_winning_trade: f64,
    pub avg_losing_trade: f64,
    /// Compounded buy-and-hold return
    pub benchmark_return: f64,
    pub alpha: f64,
    pub beta: f64,
}

impl PerformanceStats {
    /// Compute every metric.
    ///
    /// `strategy_returns` and `benchmark_returns` are aligned per bar.
    pub fn compute(strategy_returns: &[f64], benchmark_returns: &[f64], trades: &[Trade]) -> Self {
        let n = strategy_returns.len();
        let annual_sqrt = TRADING_DAYS_PER_YEAR.sqrt();

        let cumulative_return = finite_or_zero(compound(strategy_returns));
        let annualized_return = annualize(cumulative_return, n);

        let mean_return = mean(strategy_returns);
        let volatility = finite_or_zero(population_std(strategy_returns) * annual_sqrt);
        let sharpe_ratio = ratio(mean_return * TRADING_DAYS_PER_YEAR, volatility);

        let negative: Vec<f64> = strategy_returns.iter().copied().filter(|&r| r < 0.0).collect();
        let downside_deviation = finite_or_zero(population_std(&negative) * annual_sqrt);
        let sortino_ratio = ratio(mean_return * TRADING_DAYS_PER_YEAR, downside_deviation);

        let max_drawdown = max_drawdown(strategy_returns);
        let value_at_risk_95 = finite_or_zero(percentile(strategy_returns, 5.0));
        let calmar_ratio = match annualized_return {
            Some(annual) => ratio(annual, max_drawdown.abs()),
            None => 0.0,
        };

        let benchmark_return = finite_or_zero(compound(benchmark_returns));
        let alpha = cumulative_return - benchmark_return;
        let beta = beta(strategy_returns, benchmark_returns);

        let round_trips = pair_trades(trades);
        let wins: Vec<f64> = round_trips
            .iter()
            .map(|t| t.trade_return)
            .filter(|&r| r > 0.0)
            .collect();
        let losses: Vec<f64> = round_trips
            .iter()
            .map(|t| t.trade_return)
            .filter(|&r| r <= 0.0)
            .collect();
        let all: Vec<f64> = round_trips.iter().map(|t| t.trade_return).collect();

        let win_rate = if round_trips.is_empty() {
            0.0
        } else {
            wins.len() as f64 / round_trips.len() as f64
        };

        Self {
            cumulative_return,
            annualized_return,
            volatility,
            sharpe_ratio,
            downside_deviation,
            sortino_ratio,
            max_drawdown,
            value_at_risk_95,
            calmar_ratio,
            total_trades: trades.len(),
            winning_trades: wins.len(),
            losing_trades: losses.len(),
            win_rate,
            avg_trade_return: finite_or_zero(mean(&all)),
            avg_winning_trade: finite_or_zero(mean(&wins)),
            avg_losing_trade: finite_or_zero(mean(&losses)),
            benchmark_return,
            alpha,
            beta,
        }
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// `numerator / denominator`, or 0 when the denominator is 0.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        finite_or_zero(numerator / denominator)
    }
}

fn compound(returns: &[f64]) -> f64 {
    returns.iter().map(|r| 1.0 + r).product::<f64>() - 1.0
}

fn annualize(cumulative_return: f64, observations: usize) -> Option<f64> {
    if observations == 0 {
        return None;
    }
    let base = 1.0 + cumulative_return;
    if base < 0.0 {
        return None;
    }
    let annual = base.powf(TRADING_DAYS_PER_YEAR / observations as f64) - 1.0;
    annual.is_finite().then_some(annual)
}

/// Arithmetic mean, 0 for an empty slice.
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population (ddof = 0) standard deviation, 0 for an empty slice.
fn population_std(values: &[f64]) -> f64 {
    population_variance(values).sqrt()
}

fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Sample (ddof = 1) covariance of two equally long series.
fn sample_covariance(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n < 2 {
        return 0.0;
    }
    let (a, b) = (&a[..n], &b[..n]);
    let (mean_a, mean_b) = (mean(a), mean(b));
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - mean_a) * (y - mean_b))
        .sum::<f64>()
        / (n - 1) as f64
}

/// Sample covariance over population benchmark variance; 1 when the
/// benchmark never moves or there are fewer than two observations.
fn beta(strategy_returns: &[f64], benchmark_returns: &[f64]) -> f64 {
    let n = strategy_returns.len().min(benchmark_returns.len());
    if n < 2 {
        return 1.0;
    }
    let benchmark = &benchmark_returns[..n];
    let variance = population_variance(benchmark);
    if variance > 0.0 {
        finite_or_zero(sample_covariance(&strategy_returns[..n], benchmark) / variance)
    } else {
        1.0
    }
}

/// Minimum of `(curve - running_max) / running_max` over the compounded
/// curve, 0 without observations.
fn max_drawdown(returns: &[f64]) -> f64 {
    let mut curve = 1.0;
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;

    for r in returns {
        curve *= 1.0 + r;
        peak = peak.max(curve);
        if peak > 0.0 {
            worst = worst.min((curve - peak) / peak);
        }
    }

    finite_or_zero(worst)
}

/// Percentile with linear interpolation between closest ranks.
fn percentile(values: &[f64], pct: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (rank - lower as f64)
}
