use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::scheduler::job::{Job, JobId};

/// What happened to a job at the tick the event was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// Placed on first-fit scan at arrival.
    Allocated,
    /// No node accepted the job; it entered the retry queue.
    Reinserted,
    /// Placed by a later tick's retry pass.
    AllocatedAfterRetry,
    /// Evicted from the retry queue after exhausting the retry limit.
    Rejected,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Allocated => write!(f, "Allocated"),
            Outcome::Reinserted => write!(f, "Reinserted"),
            Outcome::AllocatedAfterRetry => write!(f, "Allocated After Retry"),
            Outcome::Rejected => write!(f, "Rejected"),
        }
    }
}

/// Structured outcome record emitted by the engine, one per job state
/// transition. Formatting and persistence belong to reporters.
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeEvent {
    pub job_id: JobId,
    pub arrival_day: u32,
    pub arrival_hour: u32,
    pub memory_demand: u32,
    pub cpu_demand: u32,
    pub execution_duration: u32,
    pub outcome: Outcome,
    /// Set on `Reinserted` when the demand exceeds every node's total
    /// capacity, i.e. the job is permanently starved, not just waiting.
    pub unsatisfiable: bool,
    /// Simulated clock at emission time.
    pub day: u32,
    pub hour: u32,
}

impl OutcomeEvent {
    pub fn new(job: &Job, outcome: Outcome, day: u32, hour: u32) -> Self {
        Self {
            job_id: job.id,
            arrival_day: job.arrival_day,
            arrival_hour: job.arrival_hour,
            memory_demand: job.memory_demand,
            cpu_demand: job.cpu_demand,
            execution_duration: job.execution_duration,
            outcome,
            unsatisfiable: false,
            day,
            hour,
        }
    }

    pub fn unsatisfiable(mut self) -> Self {
        self.unsatisfiable = true;
        self
    }
}

pub trait Reporter {
    fn record(&mut self, event: &OutcomeEvent) -> Result<()>;

    /// Called once after the last event. Flush buffers here.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Writes the tabular audit log, one row per outcome event.
pub struct CsvReporter<W: Write> {
    out: W,
}

impl CsvReporter<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(BufWriter::new(File::create(path)?))
    }
}

impl<W: Write> CsvReporter<W> {
    pub fn new(mut out: W) -> Result<Self> {
        writeln!(out, "JobId, ArrivalDay, ArrivalHour, MemReq, CPUReq, ExeTime, Status")?;
        Ok(Self { out })
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for CsvReporter<W> {
    fn record(&mut self, event: &OutcomeEvent) -> Result<()> {
        writeln!(
            self.out,
            "{}, {}, {}, {}, {}, {}, {}",
            event.job_id,
            event.arrival_day,
            event.arrival_hour,
            event.memory_demand,
            event.cpu_demand,
            event.execution_duration,
            event.outcome,
        )?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Per-job progress lines on stdout.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn record(&mut self, event: &OutcomeEvent) -> Result<()> {
        match event.outcome {
            Outcome::Allocated => println!("Job {} allocated successfully.", event.job_id),
            Outcome::Reinserted => println!("Job {} reinserted into queue.", event.job_id),
            Outcome::AllocatedAfterRetry => {
                println!("Job {} allocated after retry.", event.job_id)
            }
            Outcome::Rejected => println!("Job {} rejected after retry limit.", event.job_id),
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        io::stdout().flush()?;
        Ok(())
    }
}

/// Fans events out to several reporters, e.g. CSV file plus console.
#[derive(Default)]
pub struct MultiReporter {
    reporters: Vec<Box<dyn Reporter>>,
}

impl MultiReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, reporter: Box<dyn Reporter>) {
        self.reporters.push(reporter);
    }

    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }
}

impl Reporter for MultiReporter {
    fn record(&mut self, event: &OutcomeEvent) -> Result<()> {
        for reporter in &mut self.reporters {
            reporter.record(event)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        for reporter in &mut self.reporters {
            reporter.finish()?;
        }
        Ok(())
    }
}
