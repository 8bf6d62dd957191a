use clap::{
    crate_authors, crate_name, crate_version, value_t_or_exit, App, AppSettings, Arg,
};
use client_bank_exchange::sanitizers::sanitize;
use client_bank_exchange::{parse_statement, Statement};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

fn is_file(p: String) -> Result<(), String> {
    if Path::new(&p).is_file() {
        Ok(())
    } else {
        Err(format!(
            "Path '{}' doesn't exist or is not a regular file.",
            &p
        ))
    }
}

fn has_parent_dir(p: String) -> Result<(), String> {
    let parent_dir = if let Some(p) = Path::new(&p).parent() {
        p
    } else {
        return Err("Path doesn't have a parent dir.".into());
    };
    if parent_dir.is_dir() || parent_dir.as_os_str().is_empty() {
        Ok(())
    } else {
        Err(format!("Parent directory of '{}' doesn't exist.", &p))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let matches = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about(
            "Convert a 1CClientBankExchange statement to json and back. \n\n\
             It will try to sanitize input by default. For instance, it will \
             normalize line endings and drop anything after the end of file \
             marker before attempting conversion. You can turn off this \
             behavior by enabling strict mode. The input must be UTF-8, \
             convert files in Windows-1251 beforehand.",
        )
        .global_setting(AppSettings::ColoredHelp)
        .arg(
            Arg::with_name("strict")
                .short("s")
                .long("strict")
                .help("Enable strict parsing. When this is on, input won't be sanitized."),
        )
        .arg(
            Arg::with_name("text")
                .short("t")
                .long("text")
                .help("Read a json statement and write it in the exchange format instead."),
        )
        .arg(
            Arg::with_name("validate")
                .long("validate")
                .requires("text")
                .help("Fail if a field required when sending to the bank is missing."),
        )
        .arg(
            Arg::with_name("statement")
                .value_name("STATEMENT")
                .takes_value(true)
                .required(true)
                .validator(is_file)
                .help("Input statement"),
        )
        .arg(
            Arg::with_name("output")
                .value_name("OUTPUT")
                .takes_value(true)
                .validator(has_parent_dir)
                .help("Output file, stdout if not given"),
        )
        .get_matches();

    let is_strict = matches.is_present("strict");
    let statement_input = value_t_or_exit!(matches, "statement", String);

    let mut input = fs::read_to_string(statement_input)?;

    let output = if matches.is_present("text") {
        let statement: Statement = serde_json::from_str(&input)?;
        statement.to_text(matches.is_present("validate"))?
    } else {
        // Do some sanitizing if not running in strict mode.
        if !is_strict {
            input = sanitize(&input);
        }
        let parsed = parse_statement(&input)?;
        serde_json::to_string_pretty(&parsed)?
    };

    if matches.is_present("output") {
        // Write to a file.
        let output_path = value_t_or_exit!(matches, "output", String);
        fs::write(output_path, output)?;
    } else {
        // Write to stdout instead.
        io::stdout().write_all(output.as_bytes())?;
    };

    Ok(())
}
