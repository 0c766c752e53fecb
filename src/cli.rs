// src/cli.rs
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::consts::DEFAULT_CAPTURE_DIR;
use crate::config::options::{ExportFormat, RunOptions, split_opponents};
use crate::config::slot::parse_slots;
use crate::error::{InputError, PipelineError};
use crate::extract::CaptureExtractor;
use crate::log::LogTarget;
use crate::progress::StderrProgress;

/// Everything the command line asked for.
#[derive(Clone, Debug, PartialEq)]
pub struct CliArgs {
    pub run: RunOptions,
    pub captures: PathBuf,
    pub log: LogTarget,
    pub help: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            run: RunOptions::default(),
            captures: PathBuf::from(DEFAULT_CAPTURE_DIR),
            log: LogTarget::Stderr,
            help: false,
        }
    }
}

pub fn help_text() -> &'static str {
    include_str!("cli_help.txt")
}

/// Parse, run, print the build payload. Errors carry a message for the user.
pub fn run() -> Result<(), PipelineError> {
    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        eprintln!("{}", help_text());
        return Ok(());
    }
    args.run.validate()?;

    crate::log::init(&args.log);

    let extractor = CaptureExtractor::new(&args.captures, args.run.traversal);
    let mut progress = StderrProgress::default();
    let report = crate::runner::run(&args.run, Arc::new(extractor), Some(&mut progress))?;

    for path in &report.files_written {
        eprintln!("Wrote {}", path.display());
    }
    println!("{}", report.payload(args.run.select.beta).to_json()?);
    Ok(())
}

fn value<I: Iterator<Item = String>>(args: &mut I, flag: &'static str) -> Result<String, InputError> {
    args.next().ok_or(InputError::MissingValue(flag))
}

fn number<T: FromStr>(raw: &str, flag: &'static str) -> Result<T, InputError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| InputError::InvalidValue { flag, value: s!(raw) })
}

pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<CliArgs, InputError> {
    let mut out = CliArgs::default();
    let mut opponents_raw: Vec<String> = Vec::new();
    let mut args = args.into_iter();

    while let Some(a) = args.next() {
        match a.as_str()
        {
            "-s" | "--subject" | "--otp" => out.run.subject = value(&mut args, "--subject")?.trim().to_string(),
            "-o" | "--opponents" | "--enemies" => opponents_raw.push(value(&mut args, "--opponents")?),
            "--opponent" | "--enemy" => opponents_raw.push(value(&mut args, "--opponent")?),
            "--slots" | "--section" => out.run.slots = parse_slots(&value(&mut args, "--slots")?)?,
            "--beta" => {
                let v = value(&mut args, "--beta")?;
                out.run.select.beta = number(&v, "--beta")?; }
            "--min-pr" => {
                let v = value(&mut args, "--min-pr")?;
                out.run.select.min_pr = number(&v, "--min-pr")?; }
            "--top" => {
                let v = value(&mut args, "--top")?;
                out.run.export.top_n = number(&v, "--top")?; }
            "--max-steps" => {
                let v = value(&mut args, "--max-steps")?;
                out.run.traversal.max_steps = number(&v, "--max-steps")?; }
            "--stability" => {
                let v = value(&mut args, "--stability")?;
                out.run.traversal.stability_window = number(&v, "--stability")?; }
            "--captures" => out.captures = PathBuf::from(value(&mut args, "--captures")?),
            "--out" => out.run.export.out_dir = PathBuf::from(value(&mut args, "--out")?),
            "--format" => {
                let v = value(&mut args, "--format")?;
                out.run.export.format = match v.to_ascii_lowercase().as_str() {
                    "csv" => ExportFormat::Csv,
                    "tsv" => ExportFormat::Tsv,
                    _ => return Err(InputError::InvalidValue { flag: "--format", value: v }),
                };}
            "--no-export" => out.run.export.enabled = false,
            "--log" => out.log = LogTarget::File(PathBuf::from(value(&mut args, "--log")?)),
            "-h" | "--help" => out.help = true,
            _ => return Err(InputError::UnknownArg(a)),
        }
    }

    out.run.opponents = split_opponents(&opponents_raw);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Slot;

    fn parse(line: &str) -> Result<CliArgs, InputError> {
        parse_args(line.split_whitespace().map(String::from))
    }

    #[test]
    fn full_command_line() {
        let a = parse("--subject Ahri -o Zed,Yasuo --opponent Lux --slots item1,boots --beta 0.5 --min-pr 2 --format tsv --top 3").unwrap();
        assert_eq!(a.run.subject, "Ahri");
        assert_eq!(a.run.opponents, vec!["Zed", "Yasuo", "Lux"]);
        assert_eq!(a.run.slots, vec![Slot::Item1, Slot::Boots]);
        assert_eq!(a.run.select.beta, 0.5);
        assert_eq!(a.run.select.min_pr, 2.0);
        assert_eq!(a.run.export.format, ExportFormat::Tsv);
        assert_eq!(a.run.export.top_n, 3);
        assert!(a.run.validate().is_ok());
    }

    #[test]
    fn defaults_apply() {
        let a = parse("-s Ahri -o Zed").unwrap();
        assert_eq!(a.run.slots, Slot::ALL.to_vec());
        assert_eq!(a.run.select.beta, 0.25);
        assert_eq!(a.run.select.min_pr, 4.0);
        assert_eq!(a.run.export.top_n, 4);
    }

    #[test]
    fn bad_input_is_rejected() {
        assert_eq!(parse("--slots item7").unwrap_err(), InputError::UnknownSlot(s!("item7")));
        assert_eq!(parse("--beta x").unwrap_err(), InputError::InvalidValue { flag: "--beta", value: s!("x") });
        assert_eq!(parse("--beta").unwrap_err(), InputError::MissingValue("--beta"));
        assert_eq!(parse("--frobnicate").unwrap_err(), InputError::UnknownArg(s!("--frobnicate")));
        let too_many = parse("-s Ahri -o a,b,c,d,e,f").unwrap();
        assert!(matches!(too_many.run.validate(), Err(InputError::TooManyOpponents { got: 6, .. })));
        assert_eq!(parse("-s Ahri").unwrap().run.validate(), Err(InputError::NoOpponents));
    }
}
