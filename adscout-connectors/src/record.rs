use serde::{Deserialize, Serialize};

/// An advertiser as returned by the ad-transparency search API.
///
/// Every field past the advertiser name is optional: the upstream APIs omit
/// fields freely and a missing field must read as "unavailable", never fail
/// deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvertiserRecord {
    pub advertiser: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub ads_count: Option<u64>,
    #[serde(default)]
    pub creatives: Vec<CreativeSample>,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub first_shown: Option<String>,
    #[serde(default)]
    pub last_shown: Option<String>,
}

impl AdvertiserRecord {
    pub fn new(advertiser: String) -> Self {
        Self {
            advertiser,
            domain: None,
            ads_count: None,
            creatives: Vec::new(),
            regions: Vec::new(),
            first_shown: None,
            last_shown: None,
        }
    }
}

/// One sampled creative belonging to an advertiser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreativeSample {
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub last_shown: Option<String>,
}

/// Page performance metrics for a prospect's landing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub url: String,
    #[serde(default)]
    pub load_time_ms: Option<u64>,
    #[serde(default)]
    pub performance_score: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
}

impl PerformanceRecord {
    pub fn new(url: String) -> Self {
        Self {
            url,
            load_time_ms: None,
            performance_score: None,
            error: None,
        }
    }

    pub fn with_error(url: String, error: String) -> Self {
        Self {
            url,
            load_time_ms: None,
            performance_score: None,
            error: Some(error),
        }
    }
}
