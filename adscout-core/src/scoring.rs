//! Qualification scoring engine.
//!
//! Maps a prospect's signal set to a 0-100 opportunity score, an overall
//! confidence, and a qualification decision. Each fired rule is recorded so a
//! report can say exactly why a prospect ranked where it did.
//!
//! Pure function over its inputs: no I/O, no shared state, same signals in,
//! same qualification out.

use crate::model::{SignalKind, SignalSet, Tier};
use serde::{Deserialize, Serialize};

/// Threshold comparison against a signal's numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    AtLeast(f64),
    Above(f64),
    AtMost(f64),
    Below(f64),
}

impl Condition {
    pub fn holds(&self, observed: f64) -> bool {
        match self {
            Condition::AtLeast(threshold) => observed >= *threshold,
            Condition::Above(threshold) => observed > *threshold,
            Condition::AtMost(threshold) => observed <= *threshold,
            Condition::Below(threshold) => observed < *threshold,
        }
    }
}

/// One scoring rule: when `signal` satisfies `condition`, add `points`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub signal: SignalKind,
    pub condition: Condition,
    pub points: u8,
    pub label: String,
}

/// The full weight table plus qualification thresholds.
///
/// Weights are tuning material, not policy: `init` writes the default table
/// to `scoring.json` and the hunt loads whatever is there. The engine only
/// guarantees its invariants (clamping, floor exclusion, monotonicity), not
/// any particular table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub rules: Vec<Rule>,
    /// Minimum score for a prospect to qualify.
    pub qualify_score: u8,
    /// Minimum overall confidence for a prospect to qualify.
    pub min_confidence: f64,
    /// Signals at or below this confidence are excluded from the confidence
    /// average entirely.
    pub confidence_floor: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                Rule {
                    signal: SignalKind::AdVolume,
                    condition: Condition::AtLeast(3.0),
                    points: 20,
                    label: "running 3+ active ads".to_string(),
                },
                Rule {
                    signal: SignalKind::AdVolume,
                    condition: Condition::AtLeast(10.0),
                    points: 10,
                    label: "heavy ad spend (10+ active ads)".to_string(),
                },
                Rule {
                    signal: SignalKind::CreativeDiversity,
                    condition: Condition::Below(0.3),
                    points: 15,
                    label: "low creative diversity".to_string(),
                },
                Rule {
                    signal: SignalKind::LoadTime,
                    condition: Condition::Above(3000.0),
                    points: 20,
                    label: "landing page slower than 3s".to_string(),
                },
                Rule {
                    signal: SignalKind::LoadTime,
                    condition: Condition::Above(5000.0),
                    points: 10,
                    label: "landing page slower than 5s".to_string(),
                },
                Rule {
                    signal: SignalKind::GeoSpread,
                    condition: Condition::AtLeast(5.0),
                    points: 10,
                    label: "advertising in 5+ regions".to_string(),
                },
            ],
            qualify_score: 70,
            min_confidence: 0.6,
            confidence_floor: 0.5,
        }
    }
}

impl ScoringConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Total points the table attaches to a signal. Used as that signal's
    /// weight in the confidence average: a signal that can move the score
    /// more also moves trust more.
    fn signal_weight(&self, kind: SignalKind) -> u32 {
        self.rules
            .iter()
            .filter(|rule| rule.signal == kind)
            .map(|rule| rule.points as u32)
            .sum()
    }
}

/// A rule that fired, kept for the audit trail in reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleHit {
    pub label: String,
    pub points: u8,
    pub observed: f64,
}

/// Scoring outcome for one prospect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Qualification {
    pub score: u8,
    pub confidence: f64,
    pub qualified: bool,
    pub tier: Tier,
    pub hits: Vec<RuleHit>,
}

/// Score a signal set against a config.
///
/// Unavailable signals contribute no points and are excluded from the
/// confidence average. The total is clamped to [0, 100]; unnormalized weight
/// tables must not leak out-of-range scores.
pub fn score(signals: &SignalSet, config: &ScoringConfig) -> Qualification {
    let mut total: u32 = 0;
    let mut hits = Vec::new();

    for rule in &config.rules {
        let signal = signals.get(rule.signal);
        let Some(observed) = signal.value.as_f64() else {
            continue;
        };
        if rule.condition.holds(observed) {
            total += rule.points as u32;
            hits.push(RuleHit {
                label: rule.label.clone(),
                points: rule.points,
                observed,
            });
        }
    }

    let score = total.min(100) as u8;
    let confidence = overall_confidence(signals, config);
    let qualified = score >= config.qualify_score && confidence >= config.min_confidence;

    Qualification {
        score,
        confidence,
        qualified,
        tier: Tier::from_score(score),
        hits,
    }
}

/// Weighted average of per-signal confidences over signals strictly above the
/// floor. Signals at or below the floor are excluded, not down-weighted; a
/// signal no rule references carries no weight. No eligible signal means
/// confidence 0.
fn overall_confidence(signals: &SignalSet, config: &ScoringConfig) -> f64 {
    let mut weighted = 0.0;
    let mut weight_total = 0.0;

    for (kind, signal) in signals.iter() {
        if signal.confidence <= config.confidence_floor {
            continue;
        }
        let weight = config.signal_weight(*kind) as f64;
        if weight == 0.0 {
            continue;
        }
        weighted += signal.confidence * weight;
        weight_total += weight;
    }

    if weight_total == 0.0 {
        0.0
    } else {
        (weighted / weight_total).clamp(0.0, 1.0)
    }
}
