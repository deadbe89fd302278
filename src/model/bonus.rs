use serde::{Deserialize, Serialize};

/// Localizable text: an opaque key plus the literal to show when no
/// translation exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelKey {
    pub key: String,
    pub fallback: String,
}

impl LabelKey {
    pub fn new(key: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            fallback: fallback.into(),
        }
    }
}

/// Display-string provider. The engine hands over keys and never inspects
/// what comes back.
pub trait Localizer {
    fn resolve(&self, label: &LabelKey) -> String;
}

/// Returns the fallback literal for every key.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackLocalizer;

impl Localizer for FallbackLocalizer {
    fn resolve(&self, label: &LabelKey) -> String {
        label.fallback.clone()
    }
}

/// One additive line of an explained statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatAdjustment {
    pub value: f64,
    pub label: LabelKey,
}

/// A base value plus labelled additive adjustments, one per source key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplainedStat {
    pub base: f64,
    pub adjustments: Vec<StatAdjustment>,
}

impl ExplainedStat {
    pub fn new(base: f64) -> Self {
        Self {
            base,
            adjustments: Vec::new(),
        }
    }

    pub fn total(&self) -> f64 {
        self.base + self.adjustments.iter().map(|a| a.value).sum::<f64>()
    }

    /// Replace the adjustment carrying the same label key, or drop it when
    /// `adjustment` is `None`.
    pub fn set_adjustment(&mut self, key: &str, adjustment: Option<StatAdjustment>) {
        self.adjustments.retain(|a| a.label.key != key);
        if let Some(adjustment) = adjustment {
            self.adjustments.push(adjustment);
        }
    }

    pub fn adjustment(&self, key: &str) -> Option<&StatAdjustment> {
        self.adjustments.iter().find(|a| a.label.key == key)
    }

    /// Rendered explanation lines, base first.
    pub fn describe(&self, localizer: &dyn Localizer) -> Vec<(String, f64)> {
        let mut lines = vec![("Base".to_string(), self.base)];
        lines.extend(
            self.adjustments
                .iter()
                .map(|a| (localizer.resolve(&a.label), a.value)),
        );
        lines
    }
}

/// Conditional bonus proportional to the share of a party made of the
/// faction's own troops, available only once unlocked.
#[derive(Debug, Clone, PartialEq)]
pub struct UnlockGatedBonus {
    pub factor: f64,
    pub label: LabelKey,
}

impl UnlockGatedBonus {
    pub fn new(factor: f64, label: LabelKey) -> Self {
        Self { factor, label }
    }

    /// `current * ratio * factor`, or nothing when locked. Non-finite input
    /// or a ratio outside [0, 1] contributes nothing.
    pub fn bonus(&self, current: f64, retinue_ratio: f64, unlocked: bool) -> Option<StatAdjustment> {
        if !unlocked {
            return None;
        }
        if !current.is_finite() || !self.factor.is_finite() || !retinue_ratio.is_finite() {
            return None;
        }
        if !(0.0..=1.0).contains(&retinue_ratio) {
            return None;
        }
        let value = current * retinue_ratio * self.factor;
        if value == 0.0 {
            return None;
        }
        Some(StatAdjustment {
            value,
            label: self.label.clone(),
        })
    }

    /// Numeric form of [`bonus`](Self::bonus): zero whenever no adjustment applies.
    pub fn increment(&self, current: f64, retinue_ratio: f64, unlocked: bool) -> f64 {
        self.bonus(current, retinue_ratio, unlocked)
            .map(|a| a.value)
            .unwrap_or(0.0)
    }
}
