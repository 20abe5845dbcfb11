//! Vanity onion address miner CLI
//!
//! Usage:
//!   rsa-vanity tor            # Find a key whose address starts with "tor"
//!   rsa-vanity -w 4 -b 512 ab # 4 workers, 512 bit keys

use std::process;

use clap::Parser;

use rsa_vanity::{Config, SearchReport, VanitySearch};

const BOX_WIDTH: usize = 62;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();

    let (pattern, search_config) = match config.validate() {
        Ok(validated) => validated,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    log::info!(
        "searching for {}.onion with {} workers (about {:.0} trials expected)",
        pattern,
        search_config.workers,
        pattern.estimated_difficulty()
    );

    let search = match VanitySearch::start(pattern, search_config) {
        Ok(search) => search,
        Err(e) => {
            eprintln!("Failed to start search: {}", e);
            process::exit(1);
        }
    };

    let interrupter = search.interrupter();
    if let Err(e) = ctrlc::set_handler(move || interrupter.interrupt_all()) {
        log::warn!("cannot install Ctrl-C handler: {}", e);
    }

    let report = search.wait();
    if let Err(e) = print_report(&report) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn print_report(report: &SearchReport) -> Result<(), String> {
    let (address, key) = match (&report.address, &report.key) {
        (Some(address), Some(key)) => (address, key),
        _ => {
            return Err(format!(
                "Stopped without a match after {} trials.",
                report.total_trials
            ))
        }
    };

    let message = format!(
        "Found {}.onion in {} seconds, {} trials.",
        address,
        report.elapsed.as_secs_f64().round() as u64,
        report.total_trials
    );
    println!("+{:-^width$}+", "", width = BOX_WIDTH);
    println!("|{:^width$}|", message, width = BOX_WIDTH);
    println!("+{:-^width$}+", "", width = BOX_WIDTH);

    let pem = key.to_private_key_pem().map_err(|e| e.to_string())?;
    print!("{}", pem.as_str());
    Ok(())
}
