#[macro_use] extern crate clap;
#[macro_use] extern crate log;

use chartcheck::*;
use clap::{Arg, App, AppSettings, SubCommand, ArgMatches};
use std::env;
use std::path::Path;
use std::process;

fn print_error_debug(e: &Error) {
    // print causes of error if present
    if let Ok(_) = env::var("CI") {
        // only print debug implementation rather than unwinding
        warn!("{:?}", e);
    } else {
        // normal case - unwind the error chain
        for e in e.iter().skip(1) {
            warn!("caused by: {}", e);
        }
    }
}

fn main() {
    let app = App::new("chartcheck")
        .version(crate_version!())
        .setting(AppSettings::VersionlessSubcommands)
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .setting(AppSettings::ColoredHelp)
        .setting(AppSettings::DeriveDisplayOrder)
        .global_settings(&[AppSettings::ColoredHelp])
        .about("Render a helm chart and verify what comes out")
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .global(true)
            .help("Increase verbosity"))
        .arg(Arg::with_name("debug")
            .short("d")
            .long("debug")
            .global(true)
            .help("Adds line numbers to log statements"))

        .subcommand(SubCommand::with_name("test")
            .about("Render the chart with default and custom values and check the output")
            .arg(Arg::with_name("chart-dir")
                .short("C")
                .long("chart-dir")
                .takes_value(true)
                .help("Chart directory (defaults to CHARTCHECK_CHART_DIR or .)"))
            .arg(Arg::with_name("config")
                .short("c")
                .long("config")
                .takes_value(true)
                .help("Expectations file (defaults to chartcheck.yml in the chart)"))
            .arg(Arg::with_name("helm")
                .long("helm")
                .takes_value(true)
                .help("Helm binary to use"))
            .arg(Arg::with_name("release")
                .long("release")
                .takes_value(true)
                .help("Release name to template with"))
            .arg(Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .default_value(results::RESULTS_FILE)
                .help("Results file to write")))

        .subcommand(SubCommand::with_name("report")
            .about("Convert a results file into a junit xml report")
            .arg(Arg::with_name("input")
                .short("i")
                .long("input")
                .takes_value(true)
                .default_value(results::RESULTS_FILE)
                .help("Results file to read"))
            .arg(Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .default_value(report::REPORT_FILE)
                .help("Report file to write")));

    let args = app.get_matches();
    let name = args.subcommand_name().unwrap();
    let _ = run(&args).map_err(|e| {
        error!("{} error: {}", name, e);
        print_error_debug(&e);
        process::exit(1);
    });
    process::exit(0);
}

fn run(args: &ArgMatches) -> Result<()> {
    // initialise deps and set log default - always show INFO messages (+1)
    loggerv::Logger::new()
        .verbosity(args.occurrences_of("verbose") + 1)
        .module_path(true)
        .line_numbers(args.is_present("debug"))
        .init()
        .unwrap();

    // Ignore SIGPIPE errors to avoid having to use let _ = write! everywhere
    // See https://github.com/rust-lang/rust/issues/46016
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }

    dispatch_commands(args)
}

fn void<T>(_x: T) { () } // helper so that dispatch_commands can return Result<()>

/// Dispatch clap arguments to chartcheck handlers
fn dispatch_commands(args: &ArgMatches) -> Result<()> {
    if let Some(a) = args.subcommand_matches("test") {
        let chart_dir = chartcheck::resolve_chart_dir(a.value_of("chart-dir"))?;
        let exp = Expectations::resolve(a.value_of("config").map(Path::new), &chart_dir)?
            .with_overrides(a.value_of("helm"), a.value_of("release"));
        let output = Path::new(a.value_of("output").unwrap());
        return chartcheck::tester::run(&chart_dir, exp, output).map(void);
    }
    else if let Some(a) = args.subcommand_matches("report") {
        let input = Path::new(a.value_of("input").unwrap());
        let output = Path::new(a.value_of("output").unwrap());
        return chartcheck::report::generate(input, output).map(void);
    }
    unreachable!("Subcommand valid, but not implemented")
}
