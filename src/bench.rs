use chrono::{DateTime, Local};
use clap::ValueEnum;
use std::{
    hint::black_box,
    time::{Duration, Instant},
};

/// Which workloads the command line asked for.
#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum WorkloadSelection {
    /// Append 1..limit to a vector
    Sequence,
    /// Increment a counter limit-1 times
    Scalar,
    /// Run both, sequence first
    Both,
}

impl WorkloadSelection {
    /// The runnable workloads, in run order.
    pub fn workloads(self) -> Vec<Workload> {
        match self {
            WorkloadSelection::Sequence => vec![Workload::Sequence],
            WorkloadSelection::Scalar => vec![Workload::Scalar],
            WorkloadSelection::Both => vec![Workload::Sequence, Workload::Scalar],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Workload {
    Sequence,
    Scalar,
}

impl Workload {
    pub fn name(self) -> &'static str {
        match self {
            Workload::Sequence => "sequence",
            Workload::Scalar => "scalar",
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Workload::Sequence => "[*1]",
            Workload::Scalar => "[*2]",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Sample<T> {
    pub output: T,
    pub started: DateTime<Local>,
    pub finished: DateTime<Local>,
    pub elapsed: Duration,
}

pub fn run_sequence_workload(limit: u64) -> Sample<Vec<u64>> {
    let started = Local::now();
    let start = Instant::now();
    let mut sequence = Vec::new();
    for i in 1..limit {
        sequence.push(black_box(i));
    }
    let elapsed = start.elapsed();
    Sample {
        output: sequence,
        started,
        finished: Local::now(),
        elapsed,
    }
}

pub fn run_scalar_workload(limit: u64) -> Sample<u64> {
    let started = Local::now();
    let start = Instant::now();
    let mut counter = 0u64;
    for _ in 1..limit {
        counter = black_box(counter + 1);
    }
    let elapsed = start.elapsed();
    Sample {
        output: counter,
        started,
        finished: Local::now(),
        elapsed,
    }
}

/// Elapsed durations of repeated runs of one workload.
#[derive(Debug, Clone)]
pub struct Report {
    pub workload: Workload,
    pub limit: u64,
    pub samples: Vec<Duration>,
}

impl Report {
    pub fn new(workload: Workload, limit: u64) -> Self {
        Self {
            workload,
            limit,
            samples: vec![],
        }
    }

    pub fn total(&self) -> Duration {
        self.samples.iter().sum()
    }

    /// `None` until at least one sample was recorded.
    pub fn average(&self) -> Option<Duration> {
        let runs = u32::try_from(self.samples.len()).ok().filter(|&n| n > 0)?;
        Some(self.total() / runs)
    }
}

/// Run `workload` `repeat` times, printing the per-run timestamps and timing when `verbose`.
pub fn repeat(workload: Workload, limit: u64, repeat: usize, verbose: bool) -> Report {
    let mut report = Report::new(workload, limit);
    for _ in 0..repeat {
        let (started, finished, elapsed) = match workload {
            Workload::Sequence => {
                let sample = run_sequence_workload(limit);
                (sample.started, sample.finished, sample.elapsed)
            }
            Workload::Scalar => {
                let sample = run_scalar_workload(limit);
                (sample.started, sample.finished, sample.elapsed)
            }
        };
        if verbose {
            println!("{}", started.format("%Y-%m-%d %H:%M:%S%.6f"));
            println!("{}", finished.format("%Y-%m-%d %H:%M:%S%.6f"));
            println!(
                "{} Process Done!: {limit} DONE: Time taken: {}",
                workload.tag(),
                format_elapsed(elapsed)
            );
        }
        report.samples.push(elapsed);
    }
    report
}

/// One report per selected workload, in run order.
pub fn run_selection(selection: WorkloadSelection, limit: u64, runs: usize, verbose: bool) -> Vec<Report> {
    selection
        .workloads()
        .into_iter()
        .map(|workload| {
            tracing::info!(workload = workload.name(), limit, runs, "running workload");
            repeat(workload, limit, runs, verbose)
        })
        .collect()
}

/// Render as `H:MM:SS.ffffff`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!(
        "{}:{:02}:{:02}.{:06}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60,
        elapsed.subsec_micros()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_holds_limit_minus_one_values_in_order() {
        for limit in [1, 2, 10, 1_000] {
            let sample = run_sequence_workload(limit);
            assert_eq!(sample.output.len() as u64, limit - 1);
            assert!(sample.output.windows(2).all(|w| w[1] == w[0] + 1));
            assert!(sample.finished >= sample.started);
        }
        assert_eq!(run_sequence_workload(4).output, vec![1, 2, 3]);
    }

    #[test]
    fn scalar_counts_to_limit_minus_one() {
        assert_eq!(run_scalar_workload(1).output, 0);
        assert_eq!(run_scalar_workload(2).output, 1);
        assert_eq!(run_scalar_workload(100_000).output, 99_999);
    }

    #[test]
    fn average_is_total_over_runs() {
        let mut report = Report::new(Workload::Sequence, 10);
        assert_eq!(report.average(), None);
        report.samples = vec![
            Duration::from_millis(10),
            Duration::from_millis(20),
            Duration::from_millis(60),
        ];
        assert_eq!(report.total(), Duration::from_millis(90));
        assert_eq!(report.average(), Some(Duration::from_millis(30)));
    }

    #[test]
    fn repeat_records_one_sample_per_run() {
        let report = repeat(Workload::Scalar, 500, 4, false);
        assert_eq!(report.samples.len(), 4);
        assert_eq!(report.average().unwrap(), report.total() / 4);
    }

    #[test]
    fn both_runs_sequence_then_scalar() {
        let reports = run_selection(WorkloadSelection::Both, 10, 2, false);
        let workloads: Vec<Workload> = reports.iter().map(|r| r.workload).collect();
        assert_eq!(workloads, vec![Workload::Sequence, Workload::Scalar]);
        assert!(reports.iter().all(|r| r.samples.len() == 2 && r.limit == 10));
    }

    #[test]
    fn single_selection_runs_one_workload() {
        let reports = run_selection(WorkloadSelection::Scalar, 10, 1, false);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].workload, Workload::Scalar);
        assert_eq!(WorkloadSelection::Sequence.workloads(), vec![Workload::Sequence]);
    }

    #[test]
    fn elapsed_renders_like_a_clock() {
        assert_eq!(format_elapsed(Duration::from_micros(51_234)), "0:00:00.051234");
        assert_eq!(format_elapsed(Duration::from_secs(3_723)), "1:02:03.000000");
    }
}
