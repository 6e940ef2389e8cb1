// Report generation from database

use crate::data::Database;
use rusqlite::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    pub session_id: String,
    pub total_prospects: usize,
    pub entries: Vec<ProspectEntry>,
    pub tier_counts: TierCounts,
    pub hunt_info: HuntInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProspectEntry {
    pub rank: usize,
    pub domain: String,
    pub company_name: String,
    pub score: i64,
    /// Rounded to 2 decimals at gather time; the presentation boundary is the
    /// only place rounding happens.
    pub confidence: f64,
    pub qualified: bool,
    pub tier: String,
    pub triggered_rules: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierCounts {
    pub hot: i64,
    pub warm: i64,
    pub cool: i64,
    pub cold: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuntInfo {
    pub start_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    pub status: String,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn gather_report_data(
    db: &Database,
    session_id: &str,
    top: Option<usize>,
) -> Result<ReportData> {
    // Get session info
    let hunt_info = {
        let conn = db.get_connection();
        let mut stmt = conn.prepare(
            "SELECT start_time, end_time, status, query, region FROM hunt_sessions WHERE id = ?1",
        )?;

        stmt.query_row([session_id], |row| {
            Ok(HuntInfo {
                start_time: row.get(0)?,
                end_time: row.get(1)?,
                status: row.get(2)?,
                query: row.get(3)?,
                region: row.get(4)?,
            })
        })?
    };

    // Get tier counts
    let tier_counts_raw = db.get_tier_counts(session_id)?;
    let mut tier_counts = TierCounts {
        hot: 0,
        warm: 0,
        cool: 0,
        cold: 0,
    };

    for (tier, count) in tier_counts_raw {
        match tier.as_str() {
            "hot" => tier_counts.hot = count,
            "warm" => tier_counts.warm = count,
            "cool" => tier_counts.cool = count,
            "cold" => tier_counts.cold = count,
            _ => {}
        }
    }

    // Get ranked prospects with their fired rules
    let scored = db.get_scored_by_session(session_id)?;
    let total_prospects = scored.len();

    let mut entries = Vec::new();
    for (rank, (prospect_id, domain, company_name, score, confidence, qualified, tier)) in
        scored.into_iter().enumerate()
    {
        if let Some(top) = top
            && entries.len() >= top
        {
            break;
        }

        let triggered_rules = db
            .get_rule_hits_by_prospect(prospect_id)?
            .into_iter()
            .map(|(label, points, _observed)| format!("{} (+{})", label, points))
            .collect();

        entries.push(ProspectEntry {
            rank: rank + 1,
            domain,
            company_name,
            score,
            confidence: round2(confidence),
            qualified,
            tier,
            triggered_rules,
        });
    }

    Ok(ReportData {
        session_id: session_id.to_string(),
        total_prospects,
        entries,
        tier_counts,
        hunt_info,
    })
}

pub fn generate_text_report(data: &ReportData) -> String {
    let mut report = String::new();

    // Header
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report.push_str("                        ADSCOUT PROSPECTING REPORT\n");
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    // Session info
    report.push_str(&format!("Session ID:   {}\n", data.session_id));
    report.push_str(&format!("Status:       {}\n", data.status_to_string()));
    report.push_str(&format!(
        "Hunt Date:    {}\n",
        format_timestamp(data.hunt_info.start_time)
    ));

    if let Some(end_time) = data.hunt_info.end_time {
        let duration = end_time - data.hunt_info.start_time;
        report.push_str(&format!("Duration:     {} seconds\n", duration));
    }

    report.push_str(&format!("Query:        {}\n", data.format_query()));
    if let Some(ref region) = data.hunt_info.region {
        report.push_str(&format!("Region:       {}\n", region));
    }
    report.push_str(&format!("Prospects:    {}\n", data.total_prospects));
    report.push('\n');

    // Executive Summary
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report.push_str("EXECUTIVE SUMMARY\n");
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    let qualified_count = data.entries.iter().filter(|e| e.qualified).count();
    report.push_str(&format!("Qualified Prospects: {}\n\n", qualified_count));

    if data.tier_counts.hot > 0 {
        report.push_str(&format!(
            "  [HOT]   {}  (Reach out this week)\n",
            data.tier_counts.hot
        ));
    }
    if data.tier_counts.warm > 0 {
        report.push_str(&format!(
            "  [WARM]  {}  (Worth a sequence)\n",
            data.tier_counts.warm
        ));
    }
    if data.tier_counts.cool > 0 {
        report.push_str(&format!(
            "  [COOL]  {}  (Nurture list)\n",
            data.tier_counts.cool
        ));
    }
    if data.tier_counts.cold > 0 {
        report.push_str(&format!(
            "  [COLD]  {}  (Skip for now)\n",
            data.tier_counts.cold
        ));
    }
    report.push('\n');

    // Ranked prospects
    if !data.entries.is_empty() {
        report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
        report.push_str("RANKED PROSPECTS\n");
        report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

        for entry in &data.entries {
            report.push_str(&format!(
                "[{}] {} ({})\n",
                entry.rank, entry.company_name, entry.domain
            ));
            report.push_str(&format!("Score:        {} / 100\n", entry.score));
            report.push_str(&format!("Confidence:   {:.2}\n", entry.confidence));
            report.push_str(&format!("Tier:         {}\n", entry.tier.to_uppercase()));
            report.push_str(&format!(
                "Qualified:    {}\n",
                if entry.qualified { "yes" } else { "no" }
            ));

            if !entry.triggered_rules.is_empty() {
                report.push_str("\nWhy:\n");
                for rule in &entry.triggered_rules {
                    report.push_str(&format!("  - {}\n", rule));
                }
            }

            report.push_str("\n────────────────────────────────────────────────────────────────────────────────\n\n");
        }
    }

    // Footer
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report.push_str("                          End of Report\n");
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report.push_str("\nGenerated by Adscout - an ad-transparency prospecting toolkit\n\n");

    report
}

pub fn generate_json_report(data: &ReportData) -> std::result::Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Adscout",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "session": {
                "id": data.session_id,
                "status": data.hunt_info.status,
                "start_time": format_iso8601_timestamp(data.hunt_info.start_time),
                "end_time": data.hunt_info.end_time.map(format_iso8601_timestamp),
                "duration_seconds": data.hunt_info.end_time.map(|end| end - data.hunt_info.start_time),
                "query": parse_query(&data.hunt_info.query),
                "region": data.hunt_info.region
            },
            "summary": {
                "total_prospects": data.total_prospects,
                "qualified": data.entries.iter().filter(|e| e.qualified).count(),
                "tier_breakdown": {
                    "hot": data.tier_counts.hot,
                    "warm": data.tier_counts.warm,
                    "cool": data.tier_counts.cool,
                    "cold": data.tier_counts.cold
                }
            },
            "prospects": data.entries
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn generate_markdown_report(data: &ReportData) -> String {
    let mut report = String::new();

    report.push_str("# Adscout Prospecting Report\n\n");
    report.push_str(&format!("- **Session:** `{}`\n", data.session_id));
    report.push_str(&format!("- **Status:** {}\n", data.status_to_string()));
    report.push_str(&format!(
        "- **Hunt date:** {}\n",
        format_timestamp(data.hunt_info.start_time)
    ));
    report.push_str(&format!("- **Query:** {}\n", data.format_query()));
    report.push_str(&format!("- **Prospects:** {}\n\n", data.total_prospects));

    report.push_str("## Tier breakdown\n\n");
    report.push_str("| Tier | Count |\n|------|-------|\n");
    report.push_str(&format!("| Hot | {} |\n", data.tier_counts.hot));
    report.push_str(&format!("| Warm | {} |\n", data.tier_counts.warm));
    report.push_str(&format!("| Cool | {} |\n", data.tier_counts.cool));
    report.push_str(&format!("| Cold | {} |\n\n", data.tier_counts.cold));

    if !data.entries.is_empty() {
        report.push_str("## Ranked prospects\n\n");
        report.push_str("| # | Company | Domain | Score | Confidence | Tier | Qualified |\n");
        report.push_str("|---|---------|--------|-------|------------|------|-----------|\n");
        for entry in &data.entries {
            report.push_str(&format!(
                "| {} | {} | {} | {} | {:.2} | {} | {} |\n",
                entry.rank,
                entry.company_name,
                entry.domain,
                entry.score,
                entry.confidence,
                entry.tier,
                if entry.qualified { "yes" } else { "no" }
            ));
        }
        report.push('\n');

        report.push_str("## Why each prospect ranked\n\n");
        for entry in &data.entries {
            report.push_str(&format!(
                "### {}. {} ({})\n\n",
                entry.rank, entry.company_name, entry.domain
            ));
            if entry.triggered_rules.is_empty() {
                report.push_str("No scoring rules fired.\n\n");
            } else {
                for rule in &entry.triggered_rules {
                    report.push_str(&format!("- {}\n", rule));
                }
                report.push('\n');
            }
        }
    }

    report
}

pub fn generate_csv_report(data: &ReportData) -> String {
    let mut report = String::new();
    report.push_str("rank,company_name,domain,score,confidence,tier,qualified,triggered_rules\n");

    for entry in &data.entries {
        report.push_str(&format!(
            "{},{},{},{},{:.2},{},{},{}\n",
            entry.rank,
            csv_escape(&entry.company_name),
            csv_escape(&entry.domain),
            entry.score,
            entry.confidence,
            entry.tier,
            entry.qualified,
            csv_escape(&entry.triggered_rules.join("; ")),
        ));
    }

    report
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

// Helper functions
impl ReportData {
    fn status_to_string(&self) -> &str {
        match self.hunt_info.status.as_str() {
            "completed" => "Completed",
            "failed" => "Failed",
            "running" => "Running",
            "cancelled" => "Cancelled",
            _ => "Unknown",
        }
    }

    fn format_query(&self) -> String {
        // Parse JSON query list
        if let Ok(keywords) = serde_json::from_str::<Vec<String>>(&self.hunt_info.query) {
            if keywords.len() == 1 {
                keywords[0].clone()
            } else {
                keywords.join(", ")
            }
        } else {
            "Unknown".to_string()
        }
    }
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn format_timestamp(timestamp: i64) -> String {
    use chrono::{DateTime, Utc};
    let datetime = DateTime::<Utc>::from_timestamp(timestamp, 0).unwrap_or_else(|| Utc::now());
    datetime.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn format_iso8601_timestamp(timestamp: i64) -> String {
    use chrono::{DateTime, Utc};
    let datetime = DateTime::<Utc>::from_timestamp(timestamp, 0).unwrap_or_else(|| Utc::now());
    datetime.to_rfc3339()
}

fn parse_query(query_json: &str) -> serde_json::Value {
    serde_json::from_str::<Vec<String>>(query_json)
        .map(|keywords| serde_json::json!(keywords))
        .unwrap_or_else(|_| serde_json::json!([]))
}
