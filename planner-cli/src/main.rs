use clap::Parser;
use std::path::PathBuf;

use planner_core::{load_game_data, BuildCodec, Character};

#[derive(Debug, Parser)]
#[command(name = "planner-cli", version, about = "GigaPlanner build code codec tool")]
struct Args {
    /// Directory containing the catalog JSON files.
    #[arg(long)]
    data: PathBuf,

    /// Share URL or bare build code to decode.
    #[arg(long, value_name = "URL_OR_CODE", required_unless_present_any = ["encode", "mappings", "perks"])]
    decode: Option<String>,

    /// Character record JSON file to encode.
    #[arg(long, value_name = "CHARACTER_JSON", required_unless_present_any = ["decode", "mappings", "perks"])]
    encode: Option<PathBuf>,

    /// Base URL to prepend when encoding a full share link instead of a
    /// bare build code.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Print id/name mappings for every catalog and exit.
    #[arg(long)]
    mappings: bool,

    /// Print the perk descriptors of one perk list and exit.
    #[arg(long, value_name = "PERK_LIST")]
    perks: Option<String>,
}

fn main() {
    let args = Args::parse();

    let codec = match load_game_data(&args.data).and_then(BuildCodec::new) {
        Ok(codec) => codec,
        Err(e) => {
            eprintln!("Failed to load catalogs from {:?}: {}", args.data, e);
            std::process::exit(1);
        }
    };

    if args.mappings {
        print_json(&codec.data_mappings());
        return;
    }

    if let Some(list_name) = args.perks.as_ref() {
        match codec.perks_for_list(list_name) {
            Ok(perks) => print_json(&perks),
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if let Some(input) = args.decode.as_ref() {
        // Anything with a query string is a share URL; a bare build
        // code never contains '?'.
        if input.contains('?') {
            match codec.decode_url(input) {
                Ok(decoded) => print_json(&decoded),
                Err(e) => {
                    eprintln!("Failed to decode {}: {}", input, e);
                    std::process::exit(1);
                }
            }
        } else {
            match codec.decode_build_code(input) {
                Ok(character) => print_json(&character),
                Err(e) => {
                    eprintln!("Failed to decode {}: {}", input, e);
                    std::process::exit(1);
                }
            }
        }
        return;
    }

    if let Some(path) = args.encode.as_ref() {
        let character: Character = match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(character) => character,
                Err(e) => {
                    eprintln!("Invalid character record in {:?}: {}", path, e);
                    std::process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("Failed to read {:?}: {}", path, e);
                std::process::exit(1);
            }
        };

        let result = match args.base_url.as_ref() {
            Some(base_url) => codec.encode_url(&character, base_url),
            None => codec.encode_build_code(&character),
        };

        match result {
            Ok(output) => println!("{}", output),
            Err(e) => {
                eprintln!("Failed to encode {:?}: {}", path, e);
                std::process::exit(1);
            }
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize output: {}", e);
            std::process::exit(1);
        }
    }
}
