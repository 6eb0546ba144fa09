//! fairdice: CLI binary for the provably fair dice game.
//!
//! Subcommands:
//! - play (default when the first argument is a die)
//! - table
//! - verify
//! - audit

mod audit;

use std::env;
use std::io;
use std::process;

use fd_core::{Config, DiceError, DiceSet};
use fd_fair::{compute_digest, verify, Digest, SecretKey, HMAC_ALGORITHM};
use fd_game::{render_probability_table, Game, GameError, GameOptions};
use fd_logging::{hash_config_bytes, NdjsonWriter};

const EXAMPLE_USAGE: &str = "fairdice 2,2,4,4,9,9 6,8,1,1,8,6 7,5,3,7,5,3";

fn print_help() {
    println!(
        r#"fairdice - provably fair non-transitive dice

USAGE:
    fairdice [play] [OPTIONS] DIE DIE DIE...
    fairdice <COMMAND> [OPTIONS]

COMMANDS:
    play        Play one game against the computer (default)
    table       Print the win-probability table for a set of dice
    verify      Check a disclosed HMAC against its key and value
    audit       Re-verify every reveal in a session transcript

OPTIONS:
    -h, --help          Print this help message
    -V, --version       Print version

A die is a comma-separated list of integer faces, e.g. 2,2,4,4,9,9.
Example: {EXAMPLE_USAGE}
"#
    );
}

fn print_version() {
    println!("fairdice {}", env!("CARGO_PKG_VERSION"));
}

fn invalid_dice(e: &DiceError) -> ! {
    eprintln!("Invalid dice configuration: {e}");
    eprintln!("Example usage: {EXAMPLE_USAGE}");
    process::exit(1);
}

/// Config from `path` (or defaults) plus the blake3 hash of the file bytes.
fn load_config(path: Option<&str>) -> (Config, Option<String>) {
    let Some(path) = path else {
        return (Config::default(), None);
    };
    let text = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Failed to read config {path}: {e}");
        process::exit(1);
    });
    let cfg = Config::from_yaml(&text).unwrap_or_else(|e| {
        eprintln!("Failed to load config {path}: {e}");
        process::exit(1);
    });
    (cfg, Some(hash_config_bytes(text.as_bytes())))
}

fn option_value(args: &[String], i: usize, flag: &str) -> String {
    if i + 1 >= args.len() {
        eprintln!("Missing value for {flag}");
        process::exit(1);
    }
    args[i + 1].clone()
}

fn cmd_play(args: &[String]) {
    let mut config_path: Option<String> = None;
    let mut transcript: Option<String> = None;
    let mut tokens: Vec<String> = Vec::new();

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"fairdice play

USAGE:
    fairdice play [--config cfg.yaml] [--transcript session.ndjson] DIE DIE DIE...

OPTIONS:
    --config PATH       YAML config (see configs/default.yaml)
    --transcript PATH   Append an NDJSON transcript of every commitment and reveal
"#
                );
                return;
            }
            "--config" => {
                config_path = Some(option_value(args, i, "--config"));
                i += 2;
            }
            "--transcript" => {
                transcript = Some(option_value(args, i, "--transcript"));
                i += 2;
            }
            die => {
                tokens.push(die.to_string());
                i += 1;
            }
        }
    }

    let (cfg, config_hash) = load_config(config_path.as_deref());
    let dice = DiceSet::parse(&tokens).unwrap_or_else(|e| invalid_dice(&e));

    let mut game = match Game::new(dice, GameOptions::from(&cfg)) {
        Ok(g) => g,
        Err(GameError::Dice(e)) => invalid_dice(&e),
        Err(e) => {
            eprintln!("Failed to start game: {e}");
            process::exit(1);
        }
    };

    // The flag wins over the config file.
    if let Some(path) = transcript.or(cfg.transcript.path.clone()) {
        let writer = NdjsonWriter::open_append_with_flush(&path, cfg.transcript.flush_every_lines)
            .unwrap_or_else(|e| {
                eprintln!("Failed to open transcript {path}: {e}");
                process::exit(1);
            });
        game = game.with_transcript(writer, config_hash).unwrap_or_else(|e| {
            eprintln!("Failed to write transcript {path}: {e}");
            process::exit(1);
        });
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    match game.play(&mut stdin.lock(), &mut stdout.lock()) {
        Ok(_) => {}
        Err(GameError::Aborted) => {
            println!();
            println!("Bye.");
        }
        Err(e) => {
            eprintln!("Game failed: {e}");
            process::exit(1);
        }
    }
}

fn cmd_table(args: &[String]) {
    let mut config_path: Option<String> = None;
    let mut tokens: Vec<String> = Vec::new();

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"fairdice table

USAGE:
    fairdice table [--config cfg.yaml] DIE...

Prints P(user wins) for every pair of dice; the diagonal is marked "-".
"#
                );
                return;
            }
            "--config" => {
                config_path = Some(option_value(args, i, "--config"));
                i += 2;
            }
            die => {
                tokens.push(die.to_string());
                i += 1;
            }
        }
    }

    let (cfg, _) = load_config(config_path.as_deref());
    let dice = DiceSet::parse(&tokens).unwrap_or_else(|e| invalid_dice(&e));
    print!("{}", render_probability_table(&dice, cfg.display.precision));
}

fn cmd_verify(args: &[String]) {
    let mut key: Option<String> = None;
    let mut value: Option<String> = None;
    let mut hmac: Option<String> = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"fairdice verify

USAGE:
    fairdice verify --key HEX --value N --hmac HEX

Recomputes {HMAC_ALGORITHM}(KEY, decimal(N)) and compares it with HMAC.
Exit status 0 on match, 1 otherwise.
"#
                );
                return;
            }
            "--key" => {
                key = Some(option_value(args, i, "--key"));
                i += 2;
            }
            "--value" => {
                value = Some(option_value(args, i, "--value"));
                i += 2;
            }
            "--hmac" => {
                hmac = Some(option_value(args, i, "--hmac"));
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `fairdice verify`: {other}");
                eprintln!("Run `fairdice verify --help` for usage.");
                process::exit(1);
            }
        }
    }

    let (Some(key), Some(value), Some(hmac)) = (key, value, hmac) else {
        eprintln!("Usage: fairdice verify --key HEX --value N --hmac HEX");
        process::exit(1);
    };
    let key = SecretKey::from_hex(&key).unwrap_or_else(|e| {
        eprintln!("Invalid --key: {e}");
        process::exit(1);
    });
    let value: u64 = value.trim().parse().unwrap_or_else(|_| {
        eprintln!("Invalid --value: {value}");
        process::exit(1);
    });
    let digest = Digest::from_hex(&hmac).unwrap_or_else(|e| {
        eprintln!("Invalid --hmac: {e}");
        process::exit(1);
    });

    if verify(key.as_bytes(), value, &digest) {
        println!("OK: {HMAC_ALGORITHM}(KEY, \"{value}\") = {digest}");
    } else {
        match compute_digest(key.as_bytes(), value) {
            Ok(d) => println!("MISMATCH: {HMAC_ALGORITHM}(KEY, \"{value}\") = {d}"),
            Err(e) => println!("MISMATCH: {e}"),
        }
        println!("          disclosed HMAC          = {digest}");
        process::exit(1);
    }
}

fn cmd_audit(args: &[String]) {
    let path = match args.first().map(String::as_str) {
        Some("--help" | "-h") => {
            println!(
                r#"fairdice audit

USAGE:
    fairdice audit session.ndjson

Re-verifies every reveal of a transcript written by `fairdice play --transcript`.
Exit status 0 when every round checks out.
"#
            );
            return;
        }
        Some(p) => p,
        None => {
            eprintln!("Usage: fairdice audit PATH");
            process::exit(1);
        }
    };

    let report = audit::audit_file(path).unwrap_or_else(|e| {
        eprintln!("Failed to read transcript {path}: {e}");
        process::exit(1);
    });
    if report.events == 0 {
        eprintln!("No transcript events in {path}");
        process::exit(1);
    }

    for r in &report.rounds {
        match &r.result {
            Ok(()) => println!("round {} ({}): ok", r.round, r.purpose),
            Err(msg) => println!("round {} ({}): FAILED: {msg}", r.round, r.purpose),
        }
    }
    let failed = report.failures();
    println!(
        "{} commits, {} reveals, {} failed",
        report.commits,
        report.rounds.len(),
        failed
    );
    if failed > 0 {
        process::exit(1);
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        invalid_dice(&DiceError::Empty);
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => {
            print_help();
        }
        "-V" | "--version" => {
            print_version();
        }
        "play" => {
            cmd_play(&args[2..]);
        }
        "table" => {
            cmd_table(&args[2..]);
        }
        "verify" => {
            cmd_verify(&args[2..]);
        }
        "audit" => {
            cmd_audit(&args[2..]);
        }
        _ => {
            cmd_play(&args[1..]);
        }
    }
}
