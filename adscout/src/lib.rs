// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    load_domains_from_file,
    load_scoring_config,
    parse_domain_line,
    resolve_data_dir,
};

// Re-export hunt functionality from adscout-core
pub use adscout_core::pipeline::{
    HuntOptions, HuntOutcome, HuntProgressCallback, ScoredProspect, execute_hunt,
};
