//! Human-readable report rendering.

use riskranger_risk::RiskReport;
use std::fmt;

const WIDTH: usize = 62;

fn banner(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "╔{}╗", "═".repeat(WIDTH))?;
    writeln!(f, "║{title:^WIDTH$}║")?;
    writeln!(f, "╚{}╝", "═".repeat(WIDTH))
}

fn line(f: &mut fmt::Formatter<'_>, label: &str, value: impl fmt::Display) -> fmt::Result {
    writeln!(f, "  {label:<32}{value:>14}")
}

fn pct(value: f64) -> String {
    format!("{:.4}%", value * 100.0)
}

/// Boxed text block for one report.
#[derive(Debug, Clone, Copy)]
pub struct ReportText<'a>(pub &'a RiskReport);

impl fmt::Display for ReportText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let level = report.confidence_level * 100.0;

        banner(f, &format!("RISK REPORT: {}", report.symbol))?;
        writeln!(
            f,
            "\nData used: {} up to {} ({} returns, {} periods/year)\n",
            report.period_start, report.period_end, report.observations, report.annualization_factor
        )?;

        line(f, "Total Return", pct(report.total_return))?;
        line(f, "Average Annual Return", pct(report.annualized_return))?;
        line(
            f,
            "Return to Volatility Ratio",
            format!("{:.4}", report.return_to_volatility),
        )?;
        line(
            f,
            &format!("Risk-Free Rate ({})", report.risk_free_rate.origin),
            pct(report.risk_free_rate.rate),
        )?;
        line(f, "Annual Excess Return", pct(report.excess_return))?;
        line(f, "Sharpe Ratio", format!("{:.4}", report.sharpe_ratio))?;
        writeln!(f)?;

        line(f, "Volatility (per period)", pct(report.period_volatility))?;
        line(f, "Annualized Volatility", pct(report.annualized_volatility))?;
        line(f, "Skewness", format!("{:.4}", report.skewness))?;
        line(f, "Kurtosis", format!("{:.4}", report.kurtosis))?;
        line(f, &format!("Historic VaR ({level:.1}%)"), pct(report.var))?;
        line(f, &format!("Historic CVaR ({level:.1}%)"), pct(report.cvar))?;
        line(
            f,
            &format!("Cornish-Fisher VaR ({level:.1}%)"),
            pct(report.cornish_fisher_var),
        )?;
        line(
            f,
            "Maximum Drawdown",
            format!("{:.1}%", report.max_drawdown() * 100.0),
        )?;

        match (report.drawdown.peak_date, report.drawdown.trough_date) {
            (Some(peak), Some(trough)) => {
                writeln!(f, "  {:<32}{peak} -> {trough}", "  peak -> trough")
            }
            _ => writeln!(f, "  {:<32}{:>14}", "  peak -> trough", "none"),
        }
    }
}

/// Boxed text block for a ticker that could not be analyzed.
#[derive(Debug, Clone, Copy)]
pub struct FailureText<'a> {
    /// Requested symbol.
    pub symbol: &'a str,
    /// Error message.
    pub error: &'a str,
}

impl fmt::Display for FailureText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        banner(f, &format!("RISK REPORT: {}", self.symbol))?;
        writeln!(f, "\n  No report: {}", self.error)
    }
}

/// Render one report as a boxed text block.
pub fn render_report(report: &RiskReport) -> String {
    ReportText(report).to_string()
}

/// Render a ticker that could not be analyzed.
pub fn render_failure(symbol: &str, error: &str) -> String {
    FailureText { symbol, error }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use riskranger_risk::{Drawdown, RateOrigin, RiskFreeRate};

    fn sample_report() -> RiskReport {
        RiskReport {
            symbol: "AAPL".to_string(),
            period_start: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            observations: 251,
            confidence_level: 0.95,
            annualization_factor: 252,
            risk_free_rate: RiskFreeRate {
                rate: 0.0512,
                origin: RateOrigin::Market,
            },
            total_return: 0.3071,
            annualized_return: 0.3085,
            annualized_volatility: 0.2245,
            period_volatility: 0.0141,
            skewness: 0.42,
            kurtosis: 6.1,
            var: -0.0203,
            cvar: -0.0288,
            cornish_fisher_var: -0.0195,
            drawdown: Drawdown {
                max_drawdown: -0.1531,
                peak_date: NaiveDate::from_ymd_opt(2024, 7, 16),
                trough_date: NaiveDate::from_ymd_opt(2024, 8, 7),
            },
            excess_return: 0.2573,
            return_to_volatility: 1.3742,
            sharpe_ratio: 1.1461,
        }
    }

    #[test]
    fn test_render_report() {
        let text = render_report(&sample_report());

        assert!(text.contains("RISK REPORT: AAPL"));
        assert!(text.contains("2024-01-02 up to 2024-12-31"));
        assert!(text.contains("30.7100%"));
        assert!(text.contains("Risk-Free Rate (market)"));
        assert!(text.contains("Historic VaR (95.0%)"));
        assert!(text.contains("-2.0300%"));
        assert!(text.contains("-15.3%"));
        assert!(text.contains("2024-07-16 -> 2024-08-07"));
        assert!(text.contains("1.1461"));
    }

    #[test]
    fn test_render_report_without_drawdown() {
        let mut report = sample_report();
        report.drawdown = Drawdown::none();
        let text = render_report(&report);
        assert!(text.contains("none"));
        assert!(text.contains("0.0%"));
    }

    #[test]
    fn test_report_text_layout() {
        let report = sample_report();
        let text = format!("{}", ReportText(&report));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(text, render_report(&report));
        assert_eq!(lines.len(), 22);
        assert_eq!(lines[0].chars().count(), WIDTH + 2);
        assert_eq!(lines[6], format!("  {:<32}{:>14}", "Total Return", "30.7100%"));
        assert_eq!(lines[12], "");
        assert!(text.ends_with("2024-07-16 -> 2024-08-07\n"));
    }

    #[test]
    fn test_render_failure() {
        let text = render_failure("ZZZZ", "Ticker not found: ZZZZ (404)");
        assert!(text.contains("RISK REPORT: ZZZZ"));
        assert!(text.contains("No report: Ticker not found"));
        assert_eq!(
            text,
            FailureText {
                symbol: "ZZZZ",
                error: "Ticker not found: ZZZZ (404)",
            }
            .to_string()
        );
    }
}
