// Tests for the qualification scoring engine

use adscout_core::model::{Signal, SignalKind, SignalSet, SignalValue, Tier};
use adscout_core::scoring::{Condition, Rule, ScoringConfig, score};

fn rule(signal: SignalKind, condition: Condition, points: u8, label: &str) -> Rule {
    Rule {
        signal,
        condition,
        points,
        label: label.to_string(),
    }
}

/// The two-rule table from the worked qualification example.
fn two_rule_config() -> ScoringConfig {
    ScoringConfig {
        rules: vec![
            rule(
                SignalKind::AdVolume,
                Condition::AtLeast(3.0),
                20,
                "running 3+ active ads",
            ),
            rule(
                SignalKind::LoadTime,
                Condition::Above(3000.0),
                20,
                "slow landing page",
            ),
        ],
        qualify_score: 70,
        min_confidence: 0.6,
        confidence_floor: 0.5,
    }
}

fn signal_set(entries: &[(SignalKind, SignalValue, f64)]) -> SignalSet {
    let mut set = SignalSet::new();
    for (kind, value, confidence) in entries {
        set.insert(*kind, Signal::new(*value, *confidence));
    }
    set
}

// ============================================================================
// Worked Examples
// ============================================================================

#[test]
fn test_two_triggered_rules_score_forty() {
    let signals = signal_set(&[
        (SignalKind::AdVolume, SignalValue::Count(3), 0.9),
        (SignalKind::LoadTime, SignalValue::Millis(5200), 0.8),
    ]);

    let result = score(&signals, &two_rule_config());

    assert_eq!(result.score, 40);
    assert!(!result.qualified, "40 is below the 70 threshold");
    assert_eq!(result.hits.len(), 2);
}

#[test]
fn test_diversity_rule_raises_score_to_fifty_five() {
    let mut config = two_rule_config();
    config.rules.push(rule(
        SignalKind::CreativeDiversity,
        Condition::Below(0.3),
        15,
        "low creative diversity",
    ));

    let signals = signal_set(&[
        (SignalKind::AdVolume, SignalValue::Count(3), 0.9),
        (SignalKind::LoadTime, SignalValue::Millis(5200), 0.8),
        (SignalKind::CreativeDiversity, SignalValue::Ratio(0.15), 0.7),
    ]);

    let result = score(&signals, &config);

    assert_eq!(result.score, 55);
    assert!(!result.qualified, "55 is still below the 70 threshold");
}

#[test]
fn test_qualification_requires_score_and_confidence() {
    let mut config = two_rule_config();
    config.qualify_score = 40;

    let signals = signal_set(&[
        (SignalKind::AdVolume, SignalValue::Count(5), 0.9),
        (SignalKind::LoadTime, SignalValue::Millis(4000), 0.8),
    ]);

    let result = score(&signals, &config);
    assert_eq!(result.score, 40);
    assert!(result.confidence >= 0.6);
    assert!(result.qualified);

    // Same score, confidence starved below the cutoff.
    let shaky = signal_set(&[
        (SignalKind::AdVolume, SignalValue::Count(5), 0.55),
        (SignalKind::LoadTime, SignalValue::Millis(4000), 0.55),
    ]);

    let result = score(&shaky, &config);
    assert_eq!(result.score, 40);
    assert!(result.confidence < 0.6);
    assert!(!result.qualified);
}

// ============================================================================
// Clamp Invariant
// ============================================================================

#[test]
fn test_score_clamped_to_one_hundred() {
    // An unnormalized table that sums to 160 when everything fires.
    let config = ScoringConfig {
        rules: vec![
            rule(SignalKind::AdVolume, Condition::AtLeast(1.0), 80, "a"),
            rule(SignalKind::AdVolume, Condition::AtLeast(2.0), 40, "b"),
            rule(SignalKind::LoadTime, Condition::Above(0.0), 40, "c"),
        ],
        qualify_score: 70,
        min_confidence: 0.6,
        confidence_floor: 0.5,
    };

    let signals = signal_set(&[
        (SignalKind::AdVolume, SignalValue::Count(50), 0.9),
        (SignalKind::LoadTime, SignalValue::Millis(9000), 0.9),
    ]);

    let result = score(&signals, &config);

    assert_eq!(result.score, 100);
    // The audit trail still records the real contributions.
    let total_points: u32 = result.hits.iter().map(|h| h.points as u32).sum();
    assert_eq!(total_points, 160);
}

#[test]
fn test_score_in_range_for_default_config() {
    let config = ScoringConfig::default();

    let maxed = signal_set(&[
        (SignalKind::AdVolume, SignalValue::Count(100), 1.0),
        (SignalKind::CreativeDiversity, SignalValue::Ratio(0.01), 1.0),
        (SignalKind::LoadTime, SignalValue::Millis(60_000), 1.0),
        (SignalKind::GeoSpread, SignalValue::Count(50), 1.0),
    ]);

    let result = score(&maxed, &config);
    assert!(result.score <= 100);
    assert!(result.confidence >= 0.0 && result.confidence <= 1.0);
}

// ============================================================================
// Confidence Propagation
// ============================================================================

#[test]
fn test_confidence_is_weighted_average() {
    // Both signals carry 20 points of rules, so weights are equal.
    let signals = signal_set(&[
        (SignalKind::AdVolume, SignalValue::Count(3), 0.9),
        (SignalKind::LoadTime, SignalValue::Millis(5200), 0.7),
    ]);

    let result = score(&signals, &two_rule_config());

    assert!((result.confidence - 0.8).abs() < 1e-9);
}

#[test]
fn test_low_confidence_signal_excluded_from_average() {
    // 0.5 sits exactly at the floor: excluded, not down-weighted.
    let signals = signal_set(&[
        (SignalKind::AdVolume, SignalValue::Count(3), 0.9),
        (SignalKind::LoadTime, SignalValue::Millis(5200), 0.5),
    ]);

    let result = score(&signals, &two_rule_config());

    assert!((result.confidence - 0.9).abs() < 1e-9);
}

#[test]
fn test_no_eligible_signal_means_zero_confidence() {
    let signals = signal_set(&[
        (SignalKind::AdVolume, SignalValue::Count(3), 0.4),
        (SignalKind::LoadTime, SignalValue::Millis(5200), 0.5),
    ]);

    let result = score(&signals, &two_rule_config());

    assert_eq!(result.confidence, 0.0);
    assert!(!result.qualified);
    // Points still accumulate; confidence gates qualification, not scoring.
    assert_eq!(result.score, 40);
}

#[test]
fn test_unreferenced_signal_carries_no_weight() {
    // GeoSpread has no rule in the two-rule table, so its confidence must
    // not move the average.
    let signals = signal_set(&[
        (SignalKind::AdVolume, SignalValue::Count(3), 0.8),
        (SignalKind::GeoSpread, SignalValue::Count(9), 1.0),
    ]);

    let result = score(&signals, &two_rule_config());

    assert!((result.confidence - 0.8).abs() < 1e-9);
}

// ============================================================================
// Missing Signals
// ============================================================================

#[test]
fn test_empty_signal_set_scores_zero() {
    let signals = SignalSet::new();
    let result = score(&signals, &ScoringConfig::default());

    assert_eq!(result.score, 0);
    assert_eq!(result.confidence, 0.0);
    assert!(!result.qualified);
    assert!(result.hits.is_empty());
}

#[test]
fn test_unavailable_signal_contributes_nothing() {
    let mut signals = SignalSet::new();
    signals.insert(SignalKind::AdVolume, Signal::unavailable());
    signals.insert(
        SignalKind::LoadTime,
        Signal::new(SignalValue::Millis(5200), 0.8),
    );

    let result = score(&signals, &two_rule_config());

    assert_eq!(result.score, 20);
    assert_eq!(result.hits.len(), 1);
    assert_eq!(result.hits[0].label, "slow landing page");
    assert!((result.confidence - 0.8).abs() < 1e-9);
}

// ============================================================================
// Monotonicity and Purity
// ============================================================================

#[test]
fn test_score_monotonic_in_triggered_rules() {
    let config = ScoringConfig::default();

    let base = signal_set(&[(SignalKind::AdVolume, SignalValue::Count(3), 0.9)]);
    let base_score = score(&base, &config).score;

    // Raising ad volume can only trigger more rules, never fewer.
    let raised = signal_set(&[(SignalKind::AdVolume, SignalValue::Count(12), 0.9)]);
    let raised_score = score(&raised, &config).score;

    assert!(raised_score >= base_score);

    // Adding a signal holding everything else fixed never lowers the total.
    let mut extended = raised.clone();
    extended.insert(
        SignalKind::LoadTime,
        Signal::new(SignalValue::Millis(6000), 0.8),
    );
    let extended_score = score(&extended, &config).score;

    assert!(extended_score >= raised_score);
}

#[test]
fn test_scoring_is_idempotent() {
    let signals = signal_set(&[
        (SignalKind::AdVolume, SignalValue::Count(7), 0.9),
        (SignalKind::LoadTime, SignalValue::Millis(4100), 0.8),
        (SignalKind::CreativeDiversity, SignalValue::Ratio(0.2), 0.7),
    ]);
    let config = ScoringConfig::default();

    let first = score(&signals, &config);
    let second = score(&signals, &config);

    assert_eq!(first, second);
}

// ============================================================================
// Conditions and Config
// ============================================================================

#[test]
fn test_condition_boundaries() {
    assert!(Condition::AtLeast(3.0).holds(3.0));
    assert!(!Condition::Above(3.0).holds(3.0));
    assert!(Condition::AtMost(3.0).holds(3.0));
    assert!(!Condition::Below(3.0).holds(3.0));
}

#[test]
fn test_config_json_round_trip() {
    let config = ScoringConfig::default();
    let json = config.to_json().unwrap();
    let parsed = ScoringConfig::from_json(&json).unwrap();

    assert_eq!(config, parsed);
}

#[test]
fn test_config_rejects_garbage_json() {
    assert!(ScoringConfig::from_json("{\"rules\": 12}").is_err());
    assert!(ScoringConfig::from_json("not json").is_err());
}

#[test]
fn test_tier_from_score() {
    assert_eq!(Tier::from_score(100), Tier::Hot);
    assert_eq!(Tier::from_score(85), Tier::Hot);
    assert_eq!(Tier::from_score(84), Tier::Warm);
    assert_eq!(Tier::from_score(70), Tier::Warm);
    assert_eq!(Tier::from_score(69), Tier::Cool);
    assert_eq!(Tier::from_score(50), Tier::Cool);
    assert_eq!(Tier::from_score(49), Tier::Cold);
    assert_eq!(Tier::from_score(0), Tier::Cold);
}
