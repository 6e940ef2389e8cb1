// Signal extraction from connector records

use crate::model::{Signal, SignalKind, SignalSet, SignalValue};
use adscout_connectors::record::{AdvertiserRecord, PerformanceRecord};
use std::collections::HashSet;

// Per-source trust levels. Ad counts come straight from the transparency
// index; diversity and geography are derived from sampled creatives and are
// softer; load time is a single measured run.
const AD_VOLUME_CONFIDENCE: f64 = 0.9;
const CREATIVE_DIVERSITY_CONFIDENCE: f64 = 0.7;
const GEO_SPREAD_CONFIDENCE: f64 = 0.6;
const LOAD_TIME_CONFIDENCE: f64 = 0.8;

/// Build the full signal set for one prospect.
///
/// `performance` is `None` when the audit failed or was skipped; the load
/// time signal degrades to unavailable rather than erroring.
pub fn extract_signals(
    advertiser: &AdvertiserRecord,
    performance: Option<&PerformanceRecord>,
) -> SignalSet {
    let mut signals = SignalSet::new();
    extract_advertiser_signals(advertiser, &mut signals);
    match performance {
        Some(record) => extract_performance_signals(record, &mut signals),
        None => signals.insert(SignalKind::LoadTime, Signal::unavailable()),
    }
    signals
}

pub fn extract_advertiser_signals(record: &AdvertiserRecord, signals: &mut SignalSet) {
    match record.ads_count {
        Some(count) => signals.insert(
            SignalKind::AdVolume,
            Signal::new(SignalValue::Count(count), AD_VOLUME_CONFIDENCE),
        ),
        None => signals.insert(SignalKind::AdVolume, Signal::unavailable()),
    }

    // Diversity = distinct creative formats over sampled creatives. A single
    // format recycled across every ad is the pain signal we are after.
    let distinct_formats: HashSet<&str> = record
        .creatives
        .iter()
        .filter_map(|creative| creative.format.as_deref())
        .collect();

    if record.creatives.is_empty() || distinct_formats.is_empty() {
        signals.insert(SignalKind::CreativeDiversity, Signal::unavailable());
    } else {
        let ratio = distinct_formats.len() as f64 / record.creatives.len() as f64;
        signals.insert(
            SignalKind::CreativeDiversity,
            Signal::new(SignalValue::Ratio(ratio), CREATIVE_DIVERSITY_CONFIDENCE),
        );
    }

    if record.regions.is_empty() {
        signals.insert(SignalKind::GeoSpread, Signal::unavailable());
    } else {
        signals.insert(
            SignalKind::GeoSpread,
            Signal::new(
                SignalValue::Count(record.regions.len() as u64),
                GEO_SPREAD_CONFIDENCE,
            ),
        );
    }
}

pub fn extract_performance_signals(record: &PerformanceRecord, signals: &mut SignalSet) {
    match record.load_time_ms {
        Some(ms) => signals.insert(
            SignalKind::LoadTime,
            Signal::new(SignalValue::Millis(ms), LOAD_TIME_CONFIDENCE),
        ),
        None => signals.insert(SignalKind::LoadTime, Signal::unavailable()),
    }
}
