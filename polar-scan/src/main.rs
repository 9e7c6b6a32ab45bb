use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{error, info};
use polar_scan::{FailurePolicy, FileNaming, ScannerConfig, SerialConfig};
use std::path::PathBuf;
use std::time::Duration;

fn command() -> Command {
    Command::new("polar_scan")
        .about("Reads angle/distance frames from a serial range finder, plots and records them.")
        .disable_version_flag(true)
        .arg(
            Arg::new("port")
                .help("The device path to a serial port")
                .use_value_delimiter(false)
                .required(true),
        )
        .arg(
            Arg::new("baud")
                .long("baud")
                .help("Serial baud rate")
                .value_parser(value_parser!(u32))
                .default_value("115200"),
        )
        .arg(
            Arg::new("timeout-ms")
                .long("timeout-ms")
                .help("Serial read timeout in milliseconds")
                .value_parser(value_parser!(u64))
                .default_value("100"),
        )
        .arg(
            Arg::new("save-dir")
                .long("save-dir")
                .help("Directory for record files. Existing files in it are deleted!")
                .value_parser(value_parser!(PathBuf))
                .default_value("data"),
        )
        .arg(
            Arg::new("canvas-size")
                .long("canvas-size")
                .help("Width and height of the plot in pixels")
                .value_parser(value_parser!(u32))
                .default_value("800"),
        )
        .arg(
            Arg::new("flush-every")
                .long("flush-every")
                .help("Accepted samples between two record files")
                .value_parser(value_parser!(usize))
                .default_value("1000"),
        )
        .arg(
            Arg::new("sequence-names")
                .long("sequence-names")
                .help("Name record files by sequence number instead of time of day")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("strict-frames")
                .long("strict-frames")
                .help("Stop on the first frame with a non-integer field")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("tolerate-flush-errors")
                .long("tolerate-flush-errors")
                .help("Log failed record writes and retry instead of stopping")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("threaded-reader")
                .long("threaded-reader")
                .help("Read the serial port on a separate thread")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("headless")
                .long("headless")
                .help("Record without opening a window")
                .action(ArgAction::SetTrue),
        )
}

fn policy(strict: bool) -> FailurePolicy {
    match strict {
        true => FailurePolicy::FailFast,
        false => FailurePolicy::Tolerant,
    }
}

fn to_config(matches: &ArgMatches) -> ScannerConfig {
    let timeout = Duration::from_millis(*matches.get_one::<u64>("timeout-ms").unwrap());
    ScannerConfig {
        serial: SerialConfig {
            port_name: matches.get_one::<String>("port").unwrap().to_string(),
            baud_rate: *matches.get_one("baud").unwrap(),
            timeout,
        },
        save_dir: matches.get_one::<PathBuf>("save-dir").unwrap().clone(),
        canvas_size: *matches.get_one("canvas-size").unwrap(),
        flush_every: *matches.get_one("flush-every").unwrap(),
        file_naming: match matches.get_flag("sequence-names") {
            true => FileNaming::Sequence,
            false => FileNaming::WallClock,
        },
        parse_policy: policy(matches.get_flag("strict-frames")),
        flush_policy: policy(!matches.get_flag("tolerate-flush-errors")),
        threaded_reader: matches.get_flag("threaded-reader"),
        poll_interval: timeout,
    }
}

#[cfg(feature = "window")]
fn run(config: &ScannerConfig, headless: bool) -> Result<(), polar_scan::ScannerError> {
    if headless {
        return polar_scan::run_scanner(config, polar_scan::NullSurface);
    }
    let surface = polar_scan::PistonSurface::new("LiDAR scan", config.canvas_size)?;
    polar_scan::run_scanner(config, surface)
}

#[cfg(not(feature = "window"))]
fn run(config: &ScannerConfig, _headless: bool) -> Result<(), polar_scan::ScannerError> {
    polar_scan::run_scanner(config, polar_scan::NullSurface)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = command().get_matches();
    let config = to_config(&matches);

    match run(&config, matches.get_flag("headless")) {
        Ok(()) => info!("Quit"),
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    }
}
