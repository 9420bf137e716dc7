use packsim::config::SimConfig;
use packsim::report::{CsvReporter, Reporter};
use packsim::scheduler::SchedulerEngine;
use packsim::source::JobSource;
use packsim::SimError;

const TRACE: &str = "\
JobId: 1 Arrival Day: 0 Time Hour: 0 MemReq: 64 CPUReg: 24 ExeTime: 2
JobId: 2 Arrival Day: 0 Time Hour: 1 MemReq: 64 CPUReg: 24 ExeTime: 1

JobId: 3 Arrival Day: 0 Time Hour: 2 MemReq: 8 CPUReg: 4 ExeTime: 1
";

#[test]
fn trace_flows_through_engine_into_csv_report() {
    let config = SimConfig::new(1, 24, 64);
    let mut engine = SchedulerEngine::new(&config);
    let mut reporter = CsvReporter::new(Vec::new()).unwrap();

    for record in JobSource::new(TRACE.as_bytes()) {
        let job = record.unwrap();
        for event in engine.on_arrival(job) {
            reporter.record(&event).unwrap();
        }
    }
    reporter.finish().unwrap();

    let text = String::from_utf8(reporter.into_inner()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "JobId, ArrivalDay, ArrivalHour, MemReq, CPUReq, ExeTime, Status",
            // Job 1 fills the node for two ticks.
            "1, 0, 0, 64, 24, 2, Allocated",
            // Job 2 finds it full, but job 1 completes during the same
            // tick's aging and the retry pass picks job 2 up.
            "2, 0, 1, 64, 24, 1, Reinserted",
            "2, 0, 1, 64, 24, 1, Allocated After Retry",
            // Job 2 holds the node until this tick's aging, so job 3 takes
            // the same detour through the queue.
            "3, 0, 2, 8, 4, 1, Reinserted",
            "3, 0, 2, 8, 4, 1, Allocated After Retry",
        ]
    );

    let summary = engine.summary();
    assert_eq!(summary.arrivals, 3);
    assert_eq!(summary.allocated, 1);
    assert_eq!(summary.reinserted, 2);
    assert_eq!(summary.allocated_after_retry, 2);
    assert_eq!(summary.completed, 2);
    assert_eq!(summary.still_running, 1);
    assert_eq!(summary.still_queued, 0);
}

#[test]
fn malformed_trace_line_stops_with_a_parse_error() {
    let trace = "\
JobId: 1 Arrival Day: 0 Time Hour: 0 MemReq: 8 CPUReg: 4 ExeTime: 1
JobId: oops Arrival Day: 0 Time Hour: 1 MemReq: 8 CPUReg: 4 ExeTime: 1
";
    let mut source = JobSource::new(trace.as_bytes());
    assert!(source.next().unwrap().is_ok());
    let err = source.next().unwrap().unwrap_err();
    match err {
        SimError::ParseJob { line, ref reason } => {
            assert_eq!(line, 2);
            assert!(reason.contains("job id"), "unexpected reason: {reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}
