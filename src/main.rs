// MIT License - free as in freedom; Full license in the LICENSE file
use clap::{Parser, ValueEnum};
use smokebench::bench::{self, Report, WorkloadSelection};

#[derive(Clone, ValueEnum, PartialEq, Eq)]
enum Output {
    Stats,
    Csv,
}

#[derive(Parser)]
#[command(author, version, about = "Time list appends against counter increments", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[arg(short, long, default_value_t = 1_000_000, value_parser = clap::value_parser!(u64).range(1..))]
    /// Upper bound of the loop, exclusive
    limit: u64,

    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    /// How many times each workload runs
    repeat: u64,

    #[arg(short, long, value_enum, default_value_t = WorkloadSelection::Sequence)]
    workload: WorkloadSelection,

    #[arg(short, long, value_enum)]
    /// Output format [default: stats]
    output: Option<Output>,
}

fn main() {
    let cli = Cli::parse();
    smokebench::init_tracing();
    let output = cli.output.unwrap_or(Output::Stats);
    let verbose = output == Output::Stats;

    let reports = bench::run_selection(cli.workload, cli.limit, cli.repeat as usize, verbose);
    match output {
        Output::Stats => summary_stats(&reports),
        Output::Csv => summary_csv(&reports),
    }
}

fn summary_csv(reports: &[Report]) {
    println!("workload,run,limit,elapsed in μs");
    for report in reports {
        for (run, elapsed) in report.samples.iter().enumerate() {
            println!(
                "{},{},{},{}",
                report.workload.name(),
                run + 1,
                report.limit,
                elapsed.as_micros()
            );
        }
    }
}

fn summary_stats(reports: &[Report]) {
    for report in reports {
        if let Some(average) = report.average() {
            println!(
                "[**] {}: average: {}s",
                report.workload.name(),
                average.as_secs_f64()
            );
        }
    }
}
