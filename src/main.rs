//! debt-settlement CLI
//!
//! Settle a group's expenses from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Print the balances and transfers for a request file
//! debt-settlement settle --input request.json
//!
//! # Print the JSON response contract instead
//! debt-settlement settle --input request.json --format json
//!
//! # Generate a random group for testing
//! debt-settlement generate --members 8 --expenses 40
//! ```

use debt_settlement::core::currency::{Currency, PrecisionPolicy, MAX_MINOR_DIGITS};
use debt_settlement::core::member::MemberId;
use debt_settlement::engine::{EngineConfig, SettlementEngine};
use debt_settlement::simulation::random_group::{generate_random_group, member_names, GroupConfig};
use debt_settlement::wire::request::SettlementRequest;
use debt_settlement::wire::response::{ErrorResponse, SettlementResponse};
use log::info;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"debt-settlement — who pays whom to settle shared expenses

USAGE:
    debt-settlement <COMMAND> [OPTIONS]

COMMANDS:
    settle      Compute balances and the settlement plan for a request file
    generate    Generate a random request file (for testing)
    help        Show this message

OPTIONS (settle):
    --input <FILE>          Path to JSON request ({{"names": [...], "edges": [...]}})
    --format <FORMAT>       Output format: text (default) or json
    --currency <CODE>       Currency code (default: USD)
    --minor-digits <N>      Fractional digits of the currency (default: ISO value for CODE)
    --round                 Round over-precise amounts instead of rejecting them

OPTIONS (generate):
    --members <N>           Number of members (default: 6)
    --expenses <N>          Number of expenses (default: 20)
    --seed <N>              Seed for a reproducible group
    --output <FILE>         Write to file instead of stdout

Set RUST_LOG=debug to trace the pipeline stages.

EXAMPLES:
    debt-settlement settle --input trip.json
    debt-settlement settle --input trip.json --format json --currency JPY
    debt-settlement generate --members 20 --expenses 100 --seed 42"#
    );
}

fn next_value(args: &[String], i: &mut usize, flag: &str, what: &str) -> String {
    *i += 1;
    args.get(*i).cloned().unwrap_or_else(|| {
        eprintln!("{} requires {}", flag, what);
        process::exit(1);
    })
}

fn next_number<T: std::str::FromStr>(args: &[String], i: &mut usize, flag: &str) -> T {
    let raw = next_value(args, i, flag, "a number");
    raw.parse().unwrap_or_else(|_| {
        eprintln!("{} requires a number, got '{}'", flag, raw);
        process::exit(1);
    })
}

fn cmd_settle(args: &[String]) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut code = "USD".to_string();
    let mut minor_digits: Option<u32> = None;
    let mut precision = PrecisionPolicy::Reject;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => input_path = Some(next_value(args, &mut i, "--input", "a file path")),
            "--format" => format = next_value(args, &mut i, "--format", "'text' or 'json'"),
            "--currency" => code = next_value(args, &mut i, "--currency", "a currency code"),
            "--minor-digits" => minor_digits = Some(next_number(args, &mut i, "--minor-digits")),
            "--round" => precision = PrecisionPolicy::RoundHalfEven,
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });
    if format != "text" && format != "json" {
        eprintln!("--format must be 'text' or 'json', got '{}'", format);
        process::exit(1);
    }

    let currency = match minor_digits {
        Some(digits) if digits > MAX_MINOR_DIGITS => {
            eprintln!("--minor-digits must be at most {}", MAX_MINOR_DIGITS);
            process::exit(1);
        }
        Some(digits) => Currency::new(code.to_ascii_uppercase(), digits),
        None => Currency::standard(&code),
    };

    let content = fs::read_to_string(&path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    let engine = SettlementEngine::new(EngineConfig {
        currency,
        precision,
    });

    let outcome = SettlementRequest::from_json(&content).and_then(|request| {
        let records = request.to_records(&engine.config().currency, precision)?;
        let roster: Vec<MemberId> = request.names.iter().map(MemberId::new).collect();
        engine.settle_with_roster(&records, &roster)
    });

    match (outcome, format.as_str()) {
        (Ok(plan), "json") => {
            let response = SettlementResponse::render(&plan);
            match response.to_json_pretty() {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error encoding response: {}", e);
                    process::exit(1);
                }
            }
        }
        (Ok(plan), _) => {
            info!("settled {} members with {} transfers", plan.balances().len(), plan.len());
            println!("{}", plan);
            if plan.remainder_redistributed() {
                println!("--- Split remainders ---");
                for note in plan.remainders() {
                    let recipients: Vec<String> =
                        note.recipients.iter().map(|m| m.to_string()).collect();
                    println!(
                        "  record #{}: {} extra minor unit(s) charged to {}",
                        note.record_index,
                        note.remainder,
                        recipients.join(", ")
                    );
                }
            }
        }
        (Err(e), "json") => {
            let response = ErrorResponse::from(&e);
            println!(
                "{}",
                serde_json::to_string_pretty(&response).unwrap_or_else(|_| e.to_string())
            );
            process::exit(1);
        }
        (Err(e), _) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = GroupConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--members" => config.member_count = next_number(args, &mut i, "--members"),
            "--expenses" => config.expense_count = next_number(args, &mut i, "--expenses"),
            "--seed" => config.seed = Some(next_number(args, &mut i, "--seed")),
            "--output" => output_path = Some(next_value(args, &mut i, "--output", "a file path")),
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let records = generate_random_group(&config);
    let names = member_names(config.member_count)
        .into_iter()
        .map(|m| m.to_string())
        .collect();
    let request = SettlementRequest::from_records(names, &records, &Currency::usd());

    let json = serde_json::to_string_pretty(&request).unwrap_or_else(|e| {
        eprintln!("Error encoding request: {}", e);
        process::exit(1);
    });

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} expenses across {} members → {}",
            records.len(),
            config.member_count,
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "settle" => cmd_settle(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
