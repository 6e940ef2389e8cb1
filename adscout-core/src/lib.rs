pub mod data;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod signals;

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
           _
  __ _  __| |___  ___ ___  _   _| |_
 / _` |/ _` / __|/ __/ _ \| | | | __|
| (_| | (_| \__ \ (_| (_) | |_| | |_
 \__,_|\__,_|___/\___\___/ \__,_|\__|
"#;
    println!("{}", banner.bright_cyan());
    println!(
        " {} {}",
        "adscout".bright_white().bold(),
        env!("CARGO_PKG_VERSION").bright_black()
    );
    println!(
        " {}\n",
        "ad-transparency prospecting toolkit".bright_black()
    );
}
