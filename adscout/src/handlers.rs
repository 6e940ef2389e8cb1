use adscout_connectors::{AdLibraryClient, PerformanceClient};
use adscout_core::data::Database;
use adscout_core::model::Tier;
use adscout_core::pipeline::{HuntOptions, HuntProgressCallback, execute_hunt};
use adscout_core::report::{
    ReportFormat, gather_report_data, generate_csv_report, generate_json_report,
    generate_markdown_report, generate_text_report, save_report,
};
use adscout_core::scoring::ScoringConfig;
use anyhow::{Context, bail};
use clap::ArgMatches;
use colored::Colorize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

const DEFAULT_SCORING_CONFIG: &str = include_str!("../assets/scoring.json");

const SEARCH_API_KEY_VAR: &str = "ADSCOUT_SEARCH_API_KEY";
const PAGESPEED_API_KEY_VAR: &str = "ADSCOUT_PAGESPEED_API_KEY";

// Helper functions shared by the hunt and report handlers

/// Expand `~` in a user-supplied data directory path.
pub fn resolve_data_dir(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

pub fn database_path(data_dir: &Path) -> PathBuf {
    data_dir.join("adscout.db")
}

pub fn scoring_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("scoring.json")
}

/// Load the tuned scoring table if one exists, otherwise the built-in default.
pub fn load_scoring_config(data_dir: &Path) -> anyhow::Result<ScoringConfig> {
    let path = scoring_config_path(data_dir);
    if !path.exists() {
        return Ok(ScoringConfig::default());
    }

    let json = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    ScoringConfig::from_json(&json)
        .with_context(|| format!("Invalid scoring config at {}", path.display()))
}

/// Parse a single line as a domain, stripping a scheme if one is present.
pub fn parse_domain_line(line: &str) -> Option<String> {
    // A full URL: take its host.
    if line.contains("://")
        && let Ok(url) = Url::parse(line)
    {
        return url.host_str().map(|host| host.to_string());
    }

    // A bare domain: validate it parses as a host.
    let with_scheme = format!("http://{}", line);
    if let Ok(url) = Url::parse(&with_scheme)
        && let Some(host) = url.host_str()
        && host.contains('.')
    {
        return Some(host.to_string());
    }

    eprintln!("[!] Skipping invalid domain '{}'", line);
    None
}

/// Load and parse domains from a newline-delimited file
pub fn load_domains_from_file(path: &PathBuf) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read domains file {}: {}", path.display(), e))?;

    let domains: Vec<String> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| parse_domain_line(line.trim()))
        .collect();

    if domains.is_empty() {
        return Err(format!("No valid domains found in {}", path.display()));
    }

    Ok(domains)
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_prompt(msg: &str) -> String {
    print!("{} ", msg.bright_cyan().bold());
    io::stdout().flush().unwrap();
    let mut response = String::new();
    io::stdin().read_line(&mut response).unwrap();
    response.trim().to_lowercase()
}

fn tier_label(tier: &str) -> colored::ColoredString {
    match tier {
        "hot" => "HOT ".bright_red().bold(),
        "warm" => "WARM".yellow().bold(),
        "cool" => "COOL".cyan(),
        _ => "COLD".bright_black(),
    }
}

pub fn handle_init(args: &ArgMatches) {
    print_divider();
    println!("{}", "  ADSCOUT INITIALIZATION".bright_white().bold());
    print_divider();
    println!();

    let raw_path = args.get_one::<String>("PATH").unwrap();
    let force = args.get_flag("force");
    let data_dir = resolve_data_dir(raw_path);
    let db_path = database_path(&data_dir);
    let scoring_path = scoring_config_path(&data_dir);

    println!("{} Parsed arguments", "✓".green().bold());
    println!(
        "{} Target: {}",
        "→".blue(),
        data_dir.display().to_string().bright_white()
    );
    println!();

    let dir_exists = data_dir.exists();
    let scoring_exists = scoring_path.exists();
    let db_exists = Database::exists(&db_path);

    // Check for existing installation
    if (scoring_exists || db_exists) && !force {
        println!("{}", "⚠ WARNING".yellow().bold());
        println!("An adscout installation already exists:");
        if db_exists {
            println!(
                "  {} {}",
                "•".yellow(),
                db_path.display().to_string().bright_white()
            );
        }
        if scoring_exists {
            println!(
                "  {} {}",
                "•".yellow(),
                scoring_path.display().to_string().bright_white()
            );
        }
        println!();
        println!(
            "{}",
            "This operation will overwrite existing files.".yellow()
        );

        let response = print_prompt("Do you want to continue? [y/N]:");
        println!();

        if response != "y" && response != "yes" {
            println!("{} Initialization cancelled.", "✗".red().bold());
            return;
        }
        println!("{} Proceeding with overwrite", "→".yellow().bold());
        println!();
    }

    if !dir_exists {
        fs::create_dir_all(&data_dir).expect("Failed to create data directory");
        println!("{} Created {}", "✓".green().bold(), data_dir.display());
    }

    // Default scoring table: the weight numbers are tuning material, edit
    // freely and the next hunt picks them up.
    fs::write(&scoring_path, DEFAULT_SCORING_CONFIG).expect("Failed to write scoring config");
    println!(
        "{} Default scoring config installed to: {}",
        "✓".green().bold(),
        scoring_path.display()
    );

    if db_exists {
        Database::drop(&db_path);
        println!("{} Deleted existing database", "✓".green().bold());
    }

    Database::new(&db_path).expect("Failed to create database");
    println!(
        "{} Database initialized at: {}",
        "✓".green().bold(),
        db_path.display()
    );

    println!();
    println!("{}", "Adscout initialization complete!".bright_green().bold());
    println!(
        "Set {} (and optionally {}) before your first hunt.",
        SEARCH_API_KEY_VAR.bright_white(),
        PAGESPEED_API_KEY_VAR.bright_white()
    );
}

pub async fn handle_hunt(args: &ArgMatches) -> anyhow::Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let keywords: Vec<String> = args
        .get_many::<String>("keyword")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let domains_file = args.get_one::<PathBuf>("domains-file");
    let region = args.get_one::<String>("region").cloned();
    let count = *args.get_one::<usize>("count").unwrap_or(&25);
    let threads = *args.get_one::<usize>("threads").unwrap_or(&4);
    let dry_run = args.get_flag("dry-run");
    let data_dir = resolve_data_dir(args.get_one::<String>("data-dir").unwrap());

    let seed_domains = match domains_file {
        Some(path) => load_domains_from_file(path).map_err(anyhow::Error::msg)?,
        None => Vec::new(),
    };

    if keywords.is_empty() && seed_domains.is_empty() {
        bail!("Either --keyword or --domains-file must be provided");
    }

    let search_api_key = std::env::var(SEARCH_API_KEY_VAR)
        .map_err(|_| anyhow::anyhow!("{} is not set", SEARCH_API_KEY_VAR))?;
    let pagespeed_api_key = std::env::var(PAGESPEED_API_KEY_VAR).ok();

    let config = load_scoring_config(&data_dir)?;

    let target = if seed_domains.is_empty() {
        keywords.join(", ")
    } else {
        format!("{} seed domains", seed_domains.len())
    };
    println!("\n🔎 Hunting: {}", target.bright_white().bold());
    println!("Target count: {}", count);
    println!("Workers: {}", threads);
    if let Some(ref region) = region {
        println!("Region: {}", region);
    }
    if dry_run {
        println!("{}", "Dry run: discovery only".yellow());
    }
    println!();

    let adlibrary = Arc::new(AdLibraryClient::new(search_api_key));
    let performance = Arc::new(PerformanceClient::new(pagespeed_api_key));

    let progress_callback: HuntProgressCallback = Arc::new(|msg: String| {
        println!("  {}", msg.bright_black());
    });

    let query_json = if seed_domains.is_empty() {
        serde_json::to_string(&keywords)?
    } else {
        serde_json::to_string(&seed_domains)?
    };

    let options = HuntOptions {
        keywords,
        seed_domains,
        region: region.clone(),
        target_count: count,
        workers: threads,
        dry_run,
        show_progress_bars: true,
    };

    let outcome = execute_hunt(
        options,
        adlibrary,
        performance,
        config.clone(),
        Some(progress_callback),
    )
    .await
    .map_err(anyhow::Error::msg)?;

    if dry_run {
        println!("\n{} Discovery complete!\n", "✓".green().bold());
        for prospect in &outcome.discovered {
            println!(
                "  {} {} ({})",
                "•".blue(),
                prospect.company_name,
                prospect.domain.bright_black()
            );
        }
        println!("\n{} prospects discovered; nothing stored.", outcome.discovered.len());
        return Ok(());
    }

    // Persist the whole hunt before printing anything, so a report can always
    // be regenerated later.
    let db = Database::new(&database_path(&data_dir))
        .with_context(|| "Failed to open database (run `adscout init` first?)")?;

    let session_id = db.create_session(
        &query_json,
        region.as_deref(),
        config.to_json().ok().as_deref(),
    )?;

    for scored in &outcome.scored {
        let prospect_id = db.insert_prospect(&session_id, &scored.prospect)?;
        db.insert_signals(prospect_id, &scored.signals)?;
        db.insert_qualification(prospect_id, &scored.qualification)?;
    }
    db.complete_session(&session_id)?;

    // Ranked summary
    println!("\n{} Hunt complete!\n", "✓".green().bold());

    let qualified_count = outcome.qualified().len();

    for scored in &outcome.scored {
        let q = &scored.qualification;
        let marker = if q.qualified {
            "✓".green().bold()
        } else {
            "·".bright_black()
        };

        println!(
            "{} [{}] {:>3}  {}  {} ({})",
            marker,
            tier_label(q.tier.as_str()),
            q.score,
            format!("{:.2}", q.confidence).bright_black(),
            scored.prospect.company_name.bright_white(),
            scored.prospect.domain.bright_black(),
        );

        if q.qualified {
            for hit in &q.hits {
                println!("        {} {} (+{})", "↳".blue(), hit.label, hit.points);
            }
        }
    }

    println!(
        "\n{} of {} prospects qualified (tier: {} hot / {} warm)",
        qualified_count,
        outcome.scored.len(),
        outcome
            .scored
            .iter()
            .filter(|s| s.qualification.tier == Tier::Hot)
            .count(),
        outcome
            .scored
            .iter()
            .filter(|s| s.qualification.tier == Tier::Warm)
            .count(),
    );
    println!(
        "Session {} stored. Render it with: {}",
        session_id.bright_white(),
        format!("adscout report --session {}", session_id).bright_cyan()
    );

    Ok(())
}

pub fn handle_report(args: &ArgMatches) -> anyhow::Result<()> {
    let session_arg = args.get_one::<String>("session").unwrap();
    let format_arg = args.get_one::<String>("format").unwrap();
    let output = args.get_one::<PathBuf>("output");
    let top = args.get_one::<usize>("top").copied();
    let data_dir = resolve_data_dir(args.get_one::<String>("data-dir").unwrap());

    let format = ReportFormat::from_str(format_arg)
        .ok_or_else(|| anyhow::anyhow!("Unknown report format '{}'", format_arg))?;

    let db_path = database_path(&data_dir);
    if !Database::exists(&db_path) {
        bail!(
            "No database at {} (run `adscout init` first?)",
            db_path.display()
        );
    }
    let db = Database::new(&db_path)?;

    let session_id = if session_arg == "latest" {
        db.latest_session_id()?
            .ok_or_else(|| anyhow::anyhow!("No hunt sessions stored yet"))?
    } else {
        session_arg.clone()
    };

    let data = gather_report_data(&db, &session_id, top)
        .with_context(|| format!("Failed to gather report for session {}", session_id))?;

    let content = match format {
        ReportFormat::Text => generate_text_report(&data),
        ReportFormat::Json => generate_json_report(&data)?,
        ReportFormat::Markdown => generate_markdown_report(&data),
        ReportFormat::Csv => generate_csv_report(&data),
    };

    match output {
        Some(path) => {
            save_report(&content, path)
                .with_context(|| format!("Failed to save report to {}", path.display()))?;
            println!(
                "{} Report saved to {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
        None => {
            print!("{}", content);
        }
    }

    Ok(())
}
