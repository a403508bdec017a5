use anyhow::{Context, Error};
use getopts::Options;
use log::info;
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::env;
use std::fs::File;
use std::io;
use std::io::BufReader;
use std::path::Path;
use std::process;
use time::macros::format_description;
use time::OffsetDateTime;

mod unpack;

const DEFAULT_OUTPUT_DIR: &str = ".";
const STDIN_ARG: &str = "-";

// Command line option names
const OPT_HELP: &str = "help";
const OPT_OUTPUT: &str = "output";
const OPT_LOG: &str = "log";
const OPT_VERBOSE: &str = "verbose";

fn setup_logger(log_dir: Option<String>, verbose: bool) -> Result<(), Error> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        log_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ));
    if let Some(log_dir) = log_dir {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        let datetime = now.format(format_description!(
            "[year][month][day][hour][minute][second]"
        ))?;
        let filename = format!("mhtml-unpack-{}.log", datetime);
        let filepath = Path::new(&log_dir).join(filename);
        let file = File::create(&filepath)
            .with_context(|| format!("Cannot create log file {}", filepath.display()))?;
        loggers.push(WriteLogger::new(LevelFilter::Trace, Config::default(), file));
    }
    CombinedLogger::init(loggers).context("Cannot initialize logger")
}

fn print_usage(program: &str, opts: &Options) {
    let brief = format!("Usage: {} [options] SNAPSHOT", program);
    print!("{}", opts.usage(&brief));
}

fn run() -> Result<(), Error> {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("mhtml-unpack");
    let mut opts = Options::new();
    opts.optflag("h", OPT_HELP, "print this help menu");
    opts.optopt(
        "o",
        OPT_OUTPUT,
        "the directory to write parts to",
        "DIR",
    );
    opts.optopt("l", OPT_LOG, "also write a log file into this directory", "LOG_DIR");
    opts.optflag("v", OPT_VERBOSE, "log at debug level");
    let matches = opts
        .parse(args.iter().skip(1))
        .context("Error parsing command line")?;
    if matches.opt_present(OPT_HELP) {
        print_usage(program, &opts);
        return Ok(());
    }
    let snapshot = match matches.free.as_slice() {
        [snapshot] => snapshot.clone(),
        _ => {
            print_usage(program, &opts);
            anyhow::bail!("Expected exactly one SNAPSHOT argument");
        }
    };
    setup_logger(matches.opt_str(OPT_LOG), matches.opt_present(OPT_VERBOSE))?;
    let output = matches
        .opt_str(OPT_OUTPUT)
        .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_owned());
    let output = Path::new(&output);
    let count = if snapshot == STDIN_ARG {
        unpack::unpack(io::stdin().lock(), output)?
    } else {
        let file = File::open(&snapshot).with_context(|| format!("Cannot open {}", snapshot))?;
        unpack::unpack(BufReader::new(file), output)?
    };
    info!("Unpacked {} parts into {}", count, output.display());
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        process::exit(1);
    }
}
