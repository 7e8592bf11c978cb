//! Performance report generation.

use chrono::NaiveDate;
use reversion_core::types::Trade;
use serde::{Deserialize, Serialize};

use crate::statistics::{PerformanceStats, RoundTrip};

/// Complete backtest report.
///
/// Metric fields are flattened so the JSON form is a single object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Strategy name from the configuration
    pub strategy: String,
    /// Metrics
    #[serde(flatten)]
    pub stats: PerformanceStats,
    /// Every trade, per ticker in configuration order
    pub trade_log: Vec<Trade>,
    /// Closed entry/exit pairs
    pub round_trips: Vec<RoundTrip>,
    pub backtest_start_date: NaiveDate,
    pub backtest_end_date: NaiveDate,
    /// Tickers that contributed data
    pub symbols: Vec<String>,
    /// Pooled bar count
    pub observations: usize,
}

impl PerformanceReport {
    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let s = &self.stats;
        let mut out = String::new();

        out.push_str("═══════════════════════════════════════════════════════════\n");
        out.push_str("                  MEAN REVERSION BACKTEST                   \n");
        out.push_str("═══════════════════════════════════════════════════════════\n\n");

        out.push_str(&format!("  Strategy:            {}\n", self.strategy));
        out.push_str(&format!("  Symbols:             {}\n", self.symbols.join(", ")));
        out.push_str(&format!(
            "  Window:              {} to {}\n",
            self.backtest_start_date, self.backtest_end_date
        ));
        out.push_str(&format!("  Observations:        {}\n", self.observations));
        out.push('\n');

        out.push_str("PERFORMANCE\n");
        out.push_str("───────────────────────────────────────────────────────────\n");
        out.push_str(&format!("  Cumulative Return:   {:.2}%\n", s.cumulative_return * 100.0));
        match s.annualized_return {
            Some(annual) => out.push_str(&format!("  Annualized Return:   {:.2}%\n", annual * 100.0)),
            None => out.push_str("  Annualized Return:   n/a\n"),
        }
        out.push_str(&format!("  Benchmark Return:    {:.2}%\n", s.benchmark_return * 100.0));
        out.push_str(&format!("  Alpha:               {:.2}%\n", s.alpha * 100.0));
        out.push_str(&format!("  Beta:                {:.2}\n", s.beta));
        out.push('\n');

        out.push_str("RISK METRICS\n");
        out.push_str("───────────────────────────────────────────────────────────\n");
        out.push_str(&format!("  Volatility:          {:.2}%\n", s.volatility * 100.0));
        out.push_str(&format!("  Sharpe Ratio:        {:.2}\n", s.sharpe_ratio));
        out.push_str(&format!("  Sortino Ratio:       {:.2}\n", s.sortino_ratio));
        out.push_str(&format!("  Downside Deviation:  {:.2}%\n", s.downside_deviation * 100.0));
        out.push_str(&format!("  Max Drawdown:        {:.2}%\n", s.max_drawdown * 100.0));
        out.push_str(&format!("  VaR (95%):           {:.2}%\n", s.value_at_risk_95 * 100.0));
        out.push_str(&format!("  Calmar Ratio:        {:.2}\n", s.calmar_ratio));
        out.push('\n');

        out.push_str("TRADE STATISTICS\n");
        out.push_str("───────────────────────────────────────────────────────────\n");
        out.push_str(&format!("  Total Trades:        {}\n", s.total_trades));
        out.push_str(&format!("  Winning Trades:      {}\n", s.winning_trades));
        out.push_str(&format!("  Losing Trades:       {}\n", s.losing_trades));
        out.push_str(&format!("  Win Rate:            {:.2}%\n", s.win_rate * 100.0));
        out.push_str(&format!("  Avg Trade Return:    {:.2}%\n", s.avg_trade_return * 100.0));
        out.push_str(&format!("  Avg Win:             {:.2}%\n", s.avg_winning_trade * 100.0));
        out.push_str(&format!("  Avg Loss:            {:.2}%\n", s.avg_losing_trade * 100.0));
        out.push('\n');

        out.push_str("═══════════════════════════════════════════════════════════\n");

        out
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export the trade log as CSV.
    pub fn trades_to_csv(&self) -> String {
        let mut csv = String::from("ticker,date,type,price,quantity,commission,signal_value\n");
        for trade in &self.trade_log {
            let signal = trade.signal_value.map(|z| z.to_string()).unwrap_or_default();
            csv.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                trade.ticker, trade.date, trade.trade_type, trade.price, trade.quantity, trade.commission, signal
            ));
        }
        csv
    }
}
