//! `resumetoken-decode` — decode a change-stream resume token to JSON.
//!
//! Usage:
//!   resumetoken-decode [--keystring] [--version v0|v1] [--canonical] <hex>
//!
//! By default the argument is treated as a resume token `_data` payload.
//! With `--keystring` it is decoded as a bare index key instead, in which
//! case `--version` selects the key layout.

use resumetoken::cli::{decode_keystring_to_json, decode_token_to_json};
use resumetoken_keystring::{EjsonMode, Version};

fn usage() -> ! {
    eprintln!("Usage: resumetoken-decode [--keystring] [--version v0|v1] [--canonical] <hex>");
    std::process::exit(1);
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut keystring = false;
    let mut version = Version::V1;
    let mut mode = EjsonMode::Relaxed;
    let mut hex: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--keystring" => keystring = true,
            "--canonical" => mode = EjsonMode::Canonical,
            "--version" => {
                i += 1;
                version = match args.get(i).map(String::as_str) {
                    Some("v0") => Version::V0,
                    Some("v1") => Version::V1,
                    _ => usage(),
                };
            }
            arg if !arg.starts_with('-') && hex.is_none() => hex = Some(arg.to_owned()),
            _ => usage(),
        }
        i += 1;
    }

    let hex = match hex {
        Some(hex) => hex,
        None => usage(),
    };

    let result = if keystring {
        decode_keystring_to_json(&hex, version, mode)
    } else {
        decode_token_to_json(&hex, mode)
    };

    match result {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
