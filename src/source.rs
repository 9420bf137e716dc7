use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};

use crate::error::{Result, SimError};
use crate::scheduler::job::Job;

// On-disk record grammar, one job per line:
//   JobId: 17 Arrival Day: 2 Time Hour: 13 MemReq: 8 CPUReg: 4 ExeTime: 5
// "CPUReg" is how the trace files actually spell the CPU field.
const LABEL_JOB_ID: &[&str] = &["JobId:"];
const LABEL_ARRIVAL_DAY: &[&str] = &["Arrival", "Day:"];
const LABEL_ARRIVAL_HOUR: &[&str] = &["Time", "Hour:"];
const LABEL_MEM_REQ: &[&str] = &["MemReq:"];
const LABEL_CPU_REQ: &[&str] = &["CPUReg:"];
const LABEL_EXE_TIME: &[&str] = &["ExeTime:"];

/// Line-oriented job source over any buffered reader. Yields one parsed
/// job per non-blank line; malformed lines surface as parse errors, never
/// as zero-valued jobs.
pub struct JobSource<R: BufRead> {
    reader: R,
    line_no: usize,
}

impl JobSource<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> JobSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line_no: 0 }
    }
}

impl<R: BufRead> Iterator for JobSource<R> {
    type Item = Result<Job>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Some(parse_record(&line, self.line_no));
        }
    }
}

struct FieldCursor<'a> {
    tokens: SplitWhitespace<'a>,
    line_no: usize,
}

impl<'a> FieldCursor<'a> {
    fn new(line: &'a str, line_no: usize) -> Self {
        Self {
            tokens: line.split_whitespace(),
            line_no,
        }
    }

    fn err(&self, reason: String) -> SimError {
        SimError::ParseJob {
            line: self.line_no,
            reason,
        }
    }

    fn labeled<T: FromStr>(&mut self, labels: &[&str], name: &str) -> Result<T> {
        for expected in labels {
            match self.tokens.next() {
                Some(token) if token == *expected => {}
                Some(token) => {
                    return Err(self.err(format!(
                        "expected label `{expected}` for {name}, found `{token}`"
                    )))
                }
                None => return Err(self.err(format!("record ends before {name}"))),
            }
        }
        let value = self
            .tokens
            .next()
            .ok_or_else(|| self.err(format!("missing value for {name}")))?;
        value
            .parse::<T>()
            .map_err(|_| self.err(format!("invalid {name} value `{value}`")))
    }

    fn finish(mut self) -> Result<()> {
        match self.tokens.next() {
            Some(token) => Err(self.err(format!("unexpected trailing token `{token}`"))),
            None => Ok(()),
        }
    }
}

fn parse_record(line: &str, line_no: usize) -> Result<Job> {
    let mut cursor = FieldCursor::new(line, line_no);
    let id = cursor.labeled(LABEL_JOB_ID, "job id")?;
    let arrival_day = cursor.labeled(LABEL_ARRIVAL_DAY, "arrival day")?;
    let arrival_hour = cursor.labeled(LABEL_ARRIVAL_HOUR, "arrival hour")?;
    let memory_demand: u32 = cursor.labeled(LABEL_MEM_REQ, "memory demand")?;
    let cpu_demand: u32 = cursor.labeled(LABEL_CPU_REQ, "cpu demand")?;
    let execution_duration: u32 = cursor.labeled(LABEL_EXE_TIME, "execution time")?;

    if memory_demand == 0 || cpu_demand == 0 {
        return Err(SimError::ParseJob {
            line: line_no,
            reason: format!(
                "job {id} demands must be positive (memory {memory_demand}, cpu {cpu_demand})"
            ),
        });
    }
    if execution_duration == 0 {
        return Err(SimError::ParseJob {
            line: line_no,
            reason: format!("job {id} execution time must be positive"),
        });
    }
    cursor.finish()?;

    Ok(Job::new(
        id,
        arrival_day,
        arrival_hour,
        memory_demand,
        cpu_demand,
        execution_duration,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(line: &str) -> Result<Job> {
        parse_record(line, 1)
    }

    #[test]
    fn parses_well_formed_record() {
        let job =
            parse_one("JobId: 17 Arrival Day: 2 Time Hour: 13 MemReq: 8 CPUReg: 4 ExeTime: 5")
                .unwrap();
        assert_eq!(job.id, 17);
        assert_eq!(job.arrival_day, 2);
        assert_eq!(job.arrival_hour, 13);
        assert_eq!(job.memory_demand, 8);
        assert_eq!(job.cpu_demand, 4);
        assert_eq!(job.execution_duration, 5);
    }

    #[test]
    fn rejects_wrong_label() {
        let err =
            parse_one("JobID: 17 Arrival Day: 2 Time Hour: 13 MemReq: 8 CPUReg: 4 ExeTime: 5")
                .unwrap_err();
        assert!(matches!(err, SimError::ParseJob { line: 1, .. }));
        assert!(err.to_string().contains("JobId:"));
    }

    #[test]
    fn rejects_non_numeric_value() {
        let err =
            parse_one("JobId: 17 Arrival Day: 2 Time Hour: 13 MemReq: lots CPUReg: 4 ExeTime: 5")
                .unwrap_err();
        assert!(err.to_string().contains("memory demand"));
    }

    #[test]
    fn rejects_truncated_record() {
        let err = parse_one("JobId: 17 Arrival Day: 2 Time Hour: 13").unwrap_err();
        assert!(err.to_string().contains("memory demand"));
    }

    #[test]
    fn rejects_zero_demand() {
        let err =
            parse_one("JobId: 17 Arrival Day: 2 Time Hour: 13 MemReq: 0 CPUReg: 4 ExeTime: 5")
                .unwrap_err();
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn rejects_zero_duration() {
        let err =
            parse_one("JobId: 17 Arrival Day: 2 Time Hour: 13 MemReq: 8 CPUReg: 4 ExeTime: 0")
                .unwrap_err();
        assert!(err.to_string().contains("execution time"));
    }

    #[test]
    fn rejects_trailing_garbage() {
        let err = parse_one(
            "JobId: 17 Arrival Day: 2 Time Hour: 13 MemReq: 8 CPUReg: 4 ExeTime: 5 extra",
        )
        .unwrap_err();
        assert!(err.to_string().contains("trailing"));
    }

    #[test]
    fn source_skips_blank_lines_and_numbers_errors_by_line() {
        let text = "\
JobId: 1 Arrival Day: 0 Time Hour: 0 MemReq: 8 CPUReg: 4 ExeTime: 1

JobId: 2 Arrival Day: 0 Time Hour: 1 MemReq: bad CPUReg: 4 ExeTime: 1
JobId: 3 Arrival Day: 0 Time Hour: 2 MemReq: 8 CPUReg: 4 ExeTime: 1
";
        let mut source = JobSource::new(text.as_bytes());
        assert_eq!(source.next().unwrap().unwrap().id, 1);
        match source.next().unwrap().unwrap_err() {
            SimError::ParseJob { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(source.next().unwrap().unwrap().id, 3);
        assert!(source.next().is_none());
    }
}
