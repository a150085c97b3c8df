//! Immutable per-run configuration of the trade loop
//!
//! Every field is defaulted so a partial (or empty) document is valid. The
//! defaults describe the exchange page the workflow was written against.

use action_primitives::DelayWindow;
use alphaloop_core_types::StructuralPredicate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be a number, got {value:?}")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: String },

    #[error("trade.sell_fraction must be within (0, 100], got {0}")]
    SellFractionOutOfRange(String),

    #[error("{field} must not be empty")]
    EmptyText { field: &'static str },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    pub trade: TradeConfig,
    pub pacing: PacingConfig,
    pub selectors: SelectorConfig,
}

impl FlowConfig {
    /// Reject values the page would silently mangle.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("trade.buy_amount", &self.trade.buy_amount)?;
        positive("trade.slippage_tolerance", &self.trade.slippage_tolerance)?;
        let fraction = positive("trade.sell_fraction", &self.trade.sell_fraction)?;
        if fraction > 100.0 {
            return Err(ConfigError::SellFractionOutOfRange(
                self.trade.sell_fraction.clone(),
            ));
        }

        let texts = [
            ("selectors.buy_tab_text", &self.selectors.buy_tab_text),
            ("selectors.sell_tab_text", &self.selectors.sell_tab_text),
            (
                "selectors.custom_option_marker",
                &self.selectors.custom_option_marker,
            ),
        ];
        for (field, text) in texts {
            if text.trim().is_empty() {
                return Err(ConfigError::EmptyText { field });
            }
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: &str) -> Result<f64, ConfigError> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| ConfigError::NotANumber {
            field,
            value: value.to_string(),
        })?;
    if !parsed.is_finite() || parsed <= 0.0 {
        return Err(ConfigError::NotPositive {
            field,
            value: value.to_string(),
        });
    }
    Ok(parsed)
}

/// Trade amounts and loop bound.
///
/// Amounts stay strings: they are written verbatim into page controls.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeConfig {
    pub iterations: u32,
    pub buy_amount: String,
    pub slippage_tolerance: String,
    /// Range control position for the sell leg (100 = sell everything)
    pub sell_fraction: String,
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            iterations: 3,
            buy_amount: "8".to_string(),
            slippage_tolerance: "0.1".to_string(),
            sell_fraction: "100".to_string(),
        }
    }
}

/// Named pacing windows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// After tab switches, plain clicks and slippage panel moves
    pub step: DelayWindow,
    /// After dismissing a leftover modal during reset
    pub modal: DelayWindow,
    /// After entering the buy amount
    pub amount_settle: DelayWindow,
    /// After order and slippage confirmations, and after the sell slider
    pub order_settle: DelayWindow,
    /// After the final sell confirmation
    pub final_settle: DelayWindow,
    /// Extra pause after a failed iteration
    pub failure_backoff: DelayWindow,
    /// Between iterations, success or not
    pub iteration: DelayWindow,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            step: DelayWindow::new(500, 1000),
            modal: DelayWindow::new(500, 1000),
            amount_settle: DelayWindow::new(2000, 4000),
            order_settle: DelayWindow::new(3000, 5000),
            final_settle: DelayWindow::new(1000, 2000),
            failure_backoff: DelayWindow::new(1000, 2000),
            iteration: DelayWindow::new(3000, 7000),
        }
    }
}

impl PacingConfig {
    /// Zero-length windows everywhere.
    pub fn instant() -> Self {
        let zero = DelayWindow::new(0, 0);
        Self {
            step: zero,
            modal: zero,
            amount_settle: zero,
            order_settle: zero,
            final_settle: zero,
            failure_backoff: zero,
            iteration: zero,
        }
    }
}

/// Predicates and text literals identifying each affordance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub buy_tab: StructuralPredicate,
    pub buy_tab_text: String,
    pub sell_tab: StructuralPredicate,
    pub sell_tab_text: String,
    pub amount_field: StructuralPredicate,
    pub range_control: StructuralPredicate,
    pub modal_footer: StructuralPredicate,
    pub confirm_button: StructuralPredicate,
    pub cancel_button: StructuralPredicate,
    pub slippage_settings: StructuralPredicate,
    pub slippage_options: StructuralPredicate,
    pub custom_option_marker: String,
    pub slippage_field: StructuralPredicate,
    pub buy_button: StructuralPredicate,
    pub sell_button: StructuralPredicate,
}

fn trade_tab(id: &str) -> StructuralPredicate {
    StructuralPredicate::tag("div")
        .with_role("tab")
        .with_id(id)
        .with_class("bn-tab")
        .with_class("bn-tab__buySell")
}

fn modal_footer() -> StructuralPredicate {
    StructuralPredicate::any().with_class("bn-modal-footer")
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            buy_tab: trade_tab("bn-tab-0"),
            buy_tab_text: "买入".to_string(),
            sell_tab: trade_tab("bn-tab-1"),
            sell_tab_text: "卖出".to_string(),
            amount_field: StructuralPredicate::any().with_id("fromCoinAmount"),
            range_control: StructuralPredicate::tag("input").with_role("slider"),
            modal_footer: modal_footer(),
            confirm_button: StructuralPredicate::any()
                .with_class("bn-button")
                .with_class("bn-button__primary")
                .within(modal_footer()),
            cancel_button: StructuralPredicate::any()
                .with_class("bn-button")
                .without_class("bn-button__primary")
                .within(modal_footer()),
            slippage_settings: StructuralPredicate::tag("div")
                .with_class("bn-flex")
                .with_class("cursor-pointer")
                .within(
                    StructuralPredicate::tag("div")
                        .with_class("t-subtitle3")
                        .with_class("text-PrimaryText"),
                ),
            slippage_options: StructuralPredicate::tag("div")
                .with_class("t-subtitle1")
                .with_class("text-PrimaryText"),
            custom_option_marker: "自定义".to_string(),
            slippage_field: StructuralPredicate::any().with_id("customize-slippage"),
            buy_button: StructuralPredicate::any()
                .with_class("bn-button")
                .with_class("bn-button__buy"),
            sell_button: StructuralPredicate::any()
                .with_class("bn-button")
                .with_class("bn-button__sell"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_and_render_expected_selectors() {
        let config = FlowConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.selectors.buy_tab.to_css(),
            r#"div[role="tab"][id="bn-tab-0"].bn-tab.bn-tab__buySell"#
        );
        assert_eq!(
            config.selectors.slippage_settings.to_css(),
            "div.t-subtitle3.text-PrimaryText div.bn-flex.cursor-pointer"
        );
    }

    #[test]
    fn partial_document_keeps_remaining_defaults() {
        let config: FlowConfig = serde_json::from_str(
            r#"{"trade": {"iterations": 10}, "pacing": {"step": {"min_ms": 5, "max_ms": 9}}}"#,
        )
        .unwrap();
        assert_eq!(config.trade.iterations, 10);
        assert_eq!(config.trade.buy_amount, "8");
        assert_eq!(config.pacing.step, DelayWindow::new(5, 9));
        assert_eq!(config.pacing.iteration, DelayWindow::new(3000, 7000));
        assert_eq!(config.selectors, SelectorConfig::default());
    }

    #[test]
    fn validate_rejects_bad_amounts() {
        let mut config = FlowConfig::default();
        config.trade.buy_amount = "eight".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotANumber {
                field: "trade.buy_amount",
                ..
            })
        ));

        let mut config = FlowConfig::default();
        config.trade.slippage_tolerance = "0".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { .. })
        ));

        let mut config = FlowConfig::default();
        config.trade.sell_fraction = "150".into();
        assert_eq!(
            config.validate(),
            Err(ConfigError::SellFractionOutOfRange("150".into()))
        );

        let mut config = FlowConfig::default();
        config.selectors.custom_option_marker = "  ".into();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyText { .. })));
    }
}
