use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{ClockPolicy, SimConfig};
use crate::report::{Outcome, OutcomeEvent};
use crate::scheduler::job::Job;
use crate::scheduler::pool::WorkerPool;
use crate::scheduler::queue::RetryQueue;

/// Simulated wall clock in whole days and hours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SimClock {
    pub day: u32,
    pub hour: u32,
}

impl SimClock {
    fn advance_hours(&mut self, hours: u32) {
        for _ in 0..hours {
            self.hour += 1;
            if self.hour == 24 {
                self.hour = 0;
                self.day += 1;
            }
        }
    }

    /// Moves the clock forward to the given stamp and returns the number
    /// of hours that elapsed. A stamp at or behind the current time leaves
    /// the clock untouched and returns zero; the clock never runs backwards.
    fn advance_to(&mut self, day: u32, hour: u32) -> u32 {
        let now = u64::from(self.day) * 24 + u64::from(self.hour);
        let target = u64::from(day) * 24 + u64::from(hour);
        if target <= now {
            return 0;
        }
        let elapsed = (target - now) as u32;
        self.day = day;
        self.hour = hour;
        elapsed
    }
}

/// Aggregate counters for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimSummary {
    pub arrivals: u64,
    pub allocated: u64,
    pub reinserted: u64,
    pub allocated_after_retry: u64,
    pub rejected: u64,
    pub completed: u64,
    pub still_running: u64,
    pub still_queued: u64,
    pub ticks: u64,
    pub final_day: u32,
    pub final_hour: u32,
}

/// Orchestrates one simulation tick per arriving job: first-fit placement,
/// clock advance, pool-wide aging, then one retry pass over the queue.
pub struct SchedulerEngine {
    pool: WorkerPool,
    retry_queue: RetryQueue,
    clock: SimClock,
    clock_policy: ClockPolicy,
    summary: SimSummary,
}

impl SchedulerEngine {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            pool: WorkerPool::from_config(config),
            retry_queue: RetryQueue::new(config.max_retries),
            clock: SimClock::default(),
            clock_policy: config.clock_policy,
            summary: SimSummary::default(),
        }
    }

    pub fn clock(&self) -> SimClock {
        self.clock
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Jobs currently waiting in the retry queue.
    pub fn queued(&self) -> usize {
        self.retry_queue.len()
    }

    /// Processes one arriving job as one full tick and returns the outcome
    /// events it produced: exactly one arrival outcome, plus one event per
    /// queued job that was placed or evicted by this tick's retry pass.
    pub fn on_arrival(&mut self, job: Job) -> Vec<OutcomeEvent> {
        let mut events = Vec::new();
        self.summary.arrivals += 1;

        let (arrival_day, arrival_hour) = (job.arrival_day, job.arrival_hour);

        // ArrivalProcessing: outcome is stamped with the pre-advance clock.
        match self.pool.place_first_fit(&job) {
            Some(node) => {
                info!(job_id = job.id, node, "job allocated");
                self.summary.allocated += 1;
                events.push(OutcomeEvent::new(
                    &job,
                    Outcome::Allocated,
                    self.clock.day,
                    self.clock.hour,
                ));
            }
            None => {
                let starved = !self.pool.can_ever_fit(&job);
                if starved {
                    warn!(
                        job_id = job.id,
                        cpu_demand = job.cpu_demand,
                        memory_demand = job.memory_demand,
                        "demand exceeds every node's total capacity, job can never be placed"
                    );
                }
                info!(job_id = job.id, "job reinserted into retry queue");
                self.summary.reinserted += 1;
                let mut event = OutcomeEvent::new(
                    &job,
                    Outcome::Reinserted,
                    self.clock.day,
                    self.clock.hour,
                );
                if starved {
                    event = event.unsatisfiable();
                }
                events.push(event);
                self.retry_queue.enqueue(job);
            }
        }

        // Clock advance. How many aging rounds follow depends on policy:
        // one per processed job, or one per elapsed simulated hour.
        let aging_rounds = match self.clock_policy {
            ClockPolicy::PerJob => {
                self.clock.advance_hours(1);
                1
            }
            ClockPolicy::ArrivalStamped => self.clock.advance_to(arrival_day, arrival_hour),
        };

        self.run_aging_and_retry(aging_rounds, &mut events);
        events
    }

    /// A tick with no arrival: advances the clock one hour, ages the pool,
    /// and runs one retry pass. Lets a driver keep draining the retry queue
    /// after the job source is exhausted.
    pub fn idle_tick(&mut self) -> Vec<OutcomeEvent> {
        let mut events = Vec::new();
        self.clock.advance_hours(1);
        self.run_aging_and_retry(1, &mut events);
        events
    }

    fn run_aging_and_retry(&mut self, aging_rounds: u32, events: &mut Vec<OutcomeEvent>) {
        self.summary.ticks += 1;

        // Aging: every running job everywhere loses one tick per round.
        for _ in 0..aging_rounds {
            let completed = self.pool.age_all();
            self.summary.completed += completed.len() as u64;
            for job_id in completed {
                debug!(job_id, "job completed");
            }
        }

        // RetryProcessing: one attempt per queued job, FIFO.
        let drained = self.retry_queue.drain_and_retry(&mut self.pool);
        for (job, node) in drained.placed {
            info!(job_id = job.id, node, "job allocated after retry");
            self.summary.allocated_after_retry += 1;
            events.push(OutcomeEvent::new(
                &job,
                Outcome::AllocatedAfterRetry,
                self.clock.day,
                self.clock.hour,
            ));
        }
        for job in drained.rejected {
            warn!(job_id = job.id, "job evicted after exhausting retry limit");
            self.summary.rejected += 1;
            events.push(OutcomeEvent::new(
                &job,
                Outcome::Rejected,
                self.clock.day,
                self.clock.hour,
            ));
        }
    }

    /// Snapshot of the run counters, including jobs still on nodes or in
    /// the queue at this moment.
    pub fn summary(&self) -> SimSummary {
        let mut summary = self.summary.clone();
        summary.still_running = self.pool.running_total() as u64;
        summary.still_queued = self.retry_queue.len() as u64;
        summary.final_day = self.clock.day;
        summary.final_hour = self.clock.hour;
        summary
    }
}
