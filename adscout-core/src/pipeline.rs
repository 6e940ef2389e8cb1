use crate::model::{Prospect, QualifiedProspect, SignalSet};
use crate::scoring::{self, Qualification, ScoringConfig};
use crate::signals;
use adscout_connectors::record::AdvertiserRecord;
use adscout_connectors::{AdLibraryClient, PerformanceClient};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tracing::{info, warn};
use url::Url;

/// Options for configuring a hunt
pub struct HuntOptions {
    /// Search keywords, usually "<vertical> <city>".
    pub keywords: Vec<String>,
    /// Seed domains to assess directly instead of discovering via search.
    pub seed_domains: Vec<String>,
    pub region: Option<String>,
    /// Stop discovery once this many prospects are found.
    pub target_count: usize,
    /// Concurrent assessment workers.
    pub workers: usize,
    /// Discover only; skip assessment and scoring.
    pub dry_run: bool,
    pub show_progress_bars: bool,
}

/// Callback for reporting hunt progress
pub type HuntProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// One fully assessed prospect: identity, the signals behind the score, and
/// the scoring outcome.
#[derive(Debug, Clone)]
pub struct ScoredProspect {
    pub prospect: Prospect,
    pub signals: SignalSet,
    pub qualification: Qualification,
}

pub struct HuntOutcome {
    pub discovered: Vec<Prospect>,
    pub scored: Vec<ScoredProspect>,
}

impl HuntOutcome {
    /// Prospects that passed qualification, signal sets dropped.
    pub fn qualified(&self) -> Vec<QualifiedProspect> {
        self.scored
            .iter()
            .filter(|s| s.qualification.qualified)
            .map(|s| QualifiedProspect {
                prospect: s.prospect.clone(),
                qualification: s.qualification.clone(),
            })
            .collect()
    }
}

/// Execute a hunt with the given options.
///
/// Discovery queries the ad library per keyword and deduplicates advertisers
/// by domain. Assessment audits each prospect's landing page, extracts the
/// signal set and scores it. Prospects are independent: any connector failure
/// degrades that prospect's signals to unavailable and the batch continues.
pub async fn execute_hunt(
    options: HuntOptions,
    adlibrary: Arc<AdLibraryClient>,
    performance: Arc<PerformanceClient>,
    config: ScoringConfig,
    progress_callback: Option<HuntProgressCallback>,
) -> Result<HuntOutcome, String> {
    let candidates = if options.seed_domains.is_empty() {
        discover_from_keywords(&options, &adlibrary, &progress_callback).await?
    } else {
        discover_from_seeds(&options, &adlibrary, &progress_callback).await
    };

    info!("Discovery complete: {} prospects", candidates.len());

    let discovered: Vec<Prospect> = candidates
        .iter()
        .map(|(prospect, _)| prospect.clone())
        .collect();

    if options.dry_run {
        return Ok(HuntOutcome {
            discovered,
            scored: Vec::new(),
        });
    }

    let scored = assess_candidates(&options, candidates, performance, config).await?;

    Ok(HuntOutcome { discovered, scored })
}

async fn discover_from_keywords(
    options: &HuntOptions,
    adlibrary: &Arc<AdLibraryClient>,
    progress_callback: &Option<HuntProgressCallback>,
) -> Result<Vec<(Prospect, AdvertiserRecord)>, String> {
    if options.keywords.is_empty() {
        return Err("No keywords or seed domains provided".to_string());
    }

    let mut candidates: Vec<(Prospect, AdvertiserRecord)> = Vec::new();
    let mut seen_domains: HashSet<String> = HashSet::new();

    for keyword in &options.keywords {
        if candidates.len() >= options.target_count {
            break;
        }

        if let Some(callback) = progress_callback {
            callback(format!("Searching ad library: {}", keyword));
        }

        let remaining = options.target_count - candidates.len();
        let records = match adlibrary
            .search(keyword, options.region.as_deref(), remaining)
            .await
        {
            Ok(records) => records,
            Err(e) => {
                warn!("Ad library search failed for '{}': {}", keyword, e);
                if let Some(callback) = progress_callback {
                    callback(format!("[!] Search failed for '{}': {}", keyword, e));
                }
                continue;
            }
        };

        for record in records {
            if candidates.len() >= options.target_count {
                break;
            }

            // An advertiser without a usable domain cannot be audited or
            // deduped; skip it rather than guessing.
            let Some(domain) = record.domain.clone() else {
                continue;
            };
            if Url::parse(&format!("https://{}/", domain)).is_err() {
                warn!("Skipping advertiser with unparsable domain '{}'", domain);
                continue;
            }
            if !seen_domains.insert(domain.clone()) {
                continue;
            }

            let prospect = Prospect::new(domain, record.advertiser.clone(), keyword.clone());
            candidates.push((prospect, record));
        }
    }

    Ok(candidates)
}

async fn discover_from_seeds(
    options: &HuntOptions,
    adlibrary: &Arc<AdLibraryClient>,
    progress_callback: &Option<HuntProgressCallback>,
) -> Vec<(Prospect, AdvertiserRecord)> {
    let mut candidates = Vec::new();
    let mut seen_domains: HashSet<String> = HashSet::new();

    for domain in &options.seed_domains {
        if !seen_domains.insert(domain.clone()) {
            continue;
        }

        if let Some(callback) = progress_callback {
            callback(format!("Looking up advertiser for {}", domain));
        }

        // Search the ad library by domain; an advertiser record that matches
        // enriches the ad signals, no match just means those signals come
        // back unavailable.
        let record = match adlibrary
            .search(domain, options.region.as_deref(), 5)
            .await
        {
            Ok(records) => records
                .into_iter()
                .find(|r| r.domain.as_deref() == Some(domain.as_str())),
            Err(e) => {
                warn!("Ad library lookup failed for '{}': {}", domain, e);
                None
            }
        };

        let (company_name, record) = match record {
            Some(record) => (record.advertiser.clone(), record),
            None => (domain.clone(), AdvertiserRecord::new(domain.clone())),
        };

        let prospect = Prospect::new(domain.clone(), company_name, "seed".to_string());
        candidates.push((prospect, record));
    }

    candidates
}

async fn assess_candidates(
    options: &HuntOptions,
    candidates: Vec<(Prospect, AdvertiserRecord)>,
    performance: Arc<PerformanceClient>,
    config: ScoringConfig,
) -> Result<Vec<ScoredProspect>, String> {
    let total = candidates.len();

    let progress_bar = if options.show_progress_bars {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} Assessing prospects {pos}/{len} {msg}")
                .unwrap(),
        );
        Some(Arc::new(pb))
    } else {
        None
    };

    // Each prospect is an independent pure computation over its own signals;
    // the semaphore just caps concurrent audits.
    let semaphore = Arc::new(Semaphore::new(options.workers.max(1)));
    let results: Arc<Mutex<Vec<ScoredProspect>>> = Arc::new(Mutex::new(Vec::new()));
    let config = Arc::new(config);

    let mut handles = Vec::new();

    for (prospect, record) in candidates {
        let semaphore = semaphore.clone();
        let performance = performance.clone();
        let config = config.clone();
        let results = results.clone();
        let progress_bar = progress_bar.clone();

        let handle = tokio::spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("semaphore closed unexpectedly");

            let target = format!("https://{}/", prospect.domain);
            let performance_record = match performance.audit(&target).await {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Performance audit failed for {}: {}", prospect.domain, e);
                    None
                }
            };

            let signal_set = signals::extract_signals(&record, performance_record.as_ref());
            let qualification = scoring::score(&signal_set, &config);

            if let Some(ref pb) = progress_bar {
                pb.set_message(prospect.domain.clone());
                pb.inc(1);
            }

            let mut results_lock = results.lock().await;
            results_lock.push(ScoredProspect {
                prospect,
                signals: signal_set,
                qualification,
            });
        });

        handles.push(handle);
    }

    for handle in handles {
        handle
            .await
            .map_err(|e| format!("Worker task failed: {}", e))?;
    }

    if let Some(ref pb) = progress_bar {
        pb.finish_with_message(format!("{} prospects assessed", total));
    }

    let mut scored = Arc::try_unwrap(results)
        .map_err(|_| "Assessment results still shared".to_string())?
        .into_inner();

    // Best first; ties broken by confidence so the ranking is stable enough
    // to eyeball between runs.
    scored.sort_by(|a, b| {
        b.qualification
            .score
            .cmp(&a.qualification.score)
            .then_with(|| {
                b.qualification
                    .confidence
                    .partial_cmp(&a.qualification.confidence)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.prospect.domain.cmp(&b.prospect.domain))
    });

    info!("Assessment complete: {} prospects scored", scored.len());

    Ok(scored)
}
