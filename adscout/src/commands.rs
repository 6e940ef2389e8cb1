use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("adscout")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("adscout")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("init")
                .about("Initializes the adscout database and default scoring config")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Location to store the adscout database and config")
                        .default_value("~/.config/adscout/"),
                )
                .arg(
                    arg!(-f - -"force")
                        .help(
                            "Forces the overwriting of any existing database or config at the \
                        specified location.",
                        )
                        .required(false),
                ),
        )
        .subcommand(
            command!("hunt")
                .about(
                    "Search ad-transparency data for prospects, score their pain signals and \
                store a ranked list.",
                )
                .arg(
                    arg!(-k --"keyword" <KEYWORD>)
                        .required(false)
                        .help("Search keyword, usually '<vertical> <city>'. Repeatable.")
                        .action(clap::ArgAction::Append)
                        .conflicts_with("domains-file"),
                )
                .arg(
                    arg!(-D --"domains-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of domains to assess directly")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .conflicts_with("keyword"),
                )
                .arg(
                    arg!(-r --"region" <REGION>)
                        .required(false)
                        .help("Two-letter region code to restrict the ad library search"),
                )
                .arg(
                    arg!(-c --"count" <NUM_PROSPECTS>)
                        .required(false)
                        .help("Stop discovery after this many prospects")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("25"),
                )
                .arg(
                    arg!(-t --"threads" <NUM_WORKERS>)
                        .required(false)
                        .help("The number of async worker 'threads' assessing prospects.")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("4"),
                )
                .arg(
                    arg!(--"dry-run")
                        .required(false)
                        .help("Discover prospects but skip assessment, scoring and storage")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-d --"data-dir" <PATH>)
                        .required(false)
                        .help("Adscout data directory (database + scoring config)")
                        .default_value("~/.config/adscout/"),
                ),
        )
        .subcommand(
            command!("report")
                .about("Render a ranked prospect report from a stored hunt session")
                .arg(
                    arg!(-s --"session" <SESSION_ID>)
                        .required(false)
                        .help("Hunt session to report on, or 'latest'")
                        .default_value("latest"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, csv, markdown")
                        .value_parser(["text", "json", "csv", "markdown"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-n --"top" <NUM_PROSPECTS>)
                        .required(false)
                        .help("Limit the report to the top N prospects")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(-d --"data-dir" <PATH>)
                        .required(false)
                        .help("Adscout data directory (database + scoring config)")
                        .default_value("~/.config/adscout/"),
                ),
        )
}
