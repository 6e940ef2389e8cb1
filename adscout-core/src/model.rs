use crate::scoring::Qualification;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A candidate business identified via ad-transparency search.
///
/// Identity is fixed at discovery time and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prospect {
    pub domain: String,
    pub company_name: String,
    pub discovered_via: String,
}

impl Prospect {
    pub fn new(
        domain: impl Into<String>,
        company_name: impl Into<String>,
        discovered_via: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            company_name: company_name.into(),
            discovered_via: discovered_via.into(),
        }
    }
}

/// The named signal dimensions the scorer understands.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    AdVolume,
    CreativeDiversity,
    LoadTime,
    GeoSpread,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::AdVolume => "ad_volume",
            SignalKind::CreativeDiversity => "creative_diversity",
            SignalKind::LoadTime => "load_time",
            SignalKind::GeoSpread => "geo_spread",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ad_volume" => Some(SignalKind::AdVolume),
            "creative_diversity" => Some(SignalKind::CreativeDiversity),
            "load_time" => Some(SignalKind::LoadTime),
            "geo_spread" => Some(SignalKind::GeoSpread),
            _ => None,
        }
    }
}

/// A signal's observed value, with an explicit variant for "the connector
/// could not produce this" instead of a missing map key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalValue {
    Count(u64),
    Millis(u64),
    Ratio(f64),
    Unavailable,
}

impl SignalValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SignalValue::Count(n) => Some(*n as f64),
            SignalValue::Millis(ms) => Some(*ms as f64),
            SignalValue::Ratio(r) => Some(*r),
            SignalValue::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, SignalValue::Unavailable)
    }
}

/// An observed value plus how much we trust it. Confidence 0.0 means the
/// underlying data was unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub value: SignalValue,
    pub confidence: f64,
}

impl Signal {
    pub fn new(value: SignalValue, confidence: f64) -> Self {
        Self {
            value,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            value: SignalValue::Unavailable,
            confidence: 0.0,
        }
    }
}

/// Per-prospect signal map, populated by the extractors and consumed once by
/// the scorer. A kind that was never inserted reads as unavailable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalSet {
    signals: BTreeMap<SignalKind, Signal>,
}

impl SignalSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: SignalKind, signal: Signal) {
        self.signals.insert(kind, signal);
    }

    pub fn get(&self, kind: SignalKind) -> Signal {
        self.signals
            .get(&kind)
            .copied()
            .unwrap_or_else(Signal::unavailable)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SignalKind, &Signal)> {
        self.signals.iter()
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

/// Priority label derived from the qualification score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Hot,
    Warm,
    Cool,
    Cold,
}

impl Tier {
    pub fn from_score(score: u8) -> Self {
        match score {
            85..=100 => Tier::Hot,
            70..=84 => Tier::Warm,
            50..=69 => Tier::Cool,
            _ => Tier::Cold,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Hot => "hot",
            Tier::Warm => "warm",
            Tier::Cool => "cool",
            Tier::Cold => "cold",
        }
    }
}

/// A prospect plus its scoring outcome. Derived once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualifiedProspect {
    pub prospect: Prospect,
    pub qualification: Qualification,
}
