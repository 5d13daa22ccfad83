/*!
# Deadline-Bounded Execution

Every instance runs as a task with the state machine
`Pending → Running → {Completed, TimedOut, Failed}`.

[`TaskRunner::run`] executes the [`Pipeline`] on a dedicated worker thread and waits for its
result at most until the instance deadline. Afterwards, the worker's [`CancelToken`] is set and
the runner grants it a shutdown grace period to unwind. A worker that does not stop within the
grace period is logged and abandoned. Neither a timeout nor a failure aborts a batch: both
produce an [`InstanceRecord`] without results.

[`TaskRunner::run_batch`] distributes instances over a pool of such runners.
*/

use std::{
    fmt::Display,
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use crossbeam_channel::RecvTimeoutError;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::{
    cancel::CancelToken,
    config::AnalysisConfig,
    error::AnalysisError,
    pipeline::{InstanceAnalysis, Pipeline},
    report::InstanceRecord,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Pending,
    Running,
    Completed,
    /// The deadline elapsed before the pipeline finished
    TimedOut,
    /// The instance could not be read or parsed
    Failed,
}

impl TaskState {
    /// Returns *true* if no further transition is possible
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::TimedOut | TaskState::Failed
        )
    }
}

impl Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TaskState::Pending => "pending",
            TaskState::Running => "running",
            TaskState::Completed => "completed",
            TaskState::TimedOut => "timedout",
            TaskState::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

/// Runs instances under a wall-clock deadline
#[derive(Debug, Clone)]
pub struct TaskRunner {
    pipeline: Arc<Pipeline>,
    timeout: Duration,
    shutdown_grace: Duration,
}

impl TaskRunner {
    /// Creates a runner with deadline and grace period taken from `config`
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            timeout: config.timeout(),
            shutdown_grace: config.shutdown_grace(),
            pipeline: Arc::new(Pipeline::new(config)),
        }
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn set_shutdown_grace(&mut self, grace: Duration) {
        self.shutdown_grace = grace;
    }

    /// Updates the wall-clock deadline of each instance
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.set_timeout(timeout);
        self
    }

    /// Updates how long a cancelled worker may take to stop
    pub fn shutdown_grace(mut self, grace: Duration) -> Self {
        self.set_shutdown_grace(grace);
        self
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Analyzes the instance at `path`; never panics and never blocks much longer than
    /// `timeout + shutdown_grace`.
    pub fn run(&self, path: &Path) -> InstanceRecord {
        let start = Instant::now();
        let token = CancelToken::new();
        let (tx, rx) = crossbeam_channel::bounded(1);

        debug!(path = %path.display(), state = %TaskState::Pending, "Task created");
        let worker = {
            let pipeline = Arc::clone(&self.pipeline);
            let token = token.clone();
            let path = path.to_path_buf();
            thread::Builder::new()
                .name("mipgraphs-worker".into())
                .spawn(move || {
                    let _ = tx.send(pipeline.analyze_file(&path, &token));
                })
        };
        let worker = match worker {
            Ok(worker) => worker,
            Err(err) => {
                error!(path = %path.display(), "Cannot spawn worker: {err}");
                return self.finish(path, TaskState::Failed, None, start);
            }
        };
        debug!(path = %path.display(), state = %TaskState::Running, "Task started");

        match rx.recv_timeout(self.timeout) {
            Ok(result) => {
                let _ = worker.join();
                match result {
                    Ok(analysis) => {
                        self.finish(path, TaskState::Completed, Some(analysis), start)
                    }
                    Err(AnalysisError::Cancelled) => {
                        self.finish(path, TaskState::TimedOut, None, start)
                    }
                    Err(err) => {
                        warn!(path = %path.display(), "Instance failed: {err}");
                        self.finish(path, TaskState::Failed, None, start)
                    }
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                token.cancel();
                match rx.recv_timeout(self.shutdown_grace) {
                    Err(RecvTimeoutError::Timeout) => {
                        error!(
                            path = %path.display(),
                            grace = ?self.shutdown_grace,
                            "Worker did not stop after cancellation; abandoning it"
                        );
                    }
                    _ => {
                        let _ = worker.join();
                        debug!(path = %path.display(), "Worker stopped after cancellation");
                    }
                }
                self.finish(path, TaskState::TimedOut, None, start)
            }
            Err(RecvTimeoutError::Disconnected) => {
                let _ = worker.join();
                error!(path = %path.display(), "Worker terminated without result");
                self.finish(path, TaskState::Failed, None, start)
            }
        }
    }

    fn finish(
        &self,
        path: &Path,
        state: TaskState,
        analysis: Option<InstanceAnalysis>,
        start: Instant,
    ) -> InstanceRecord {
        let elapsed = start.elapsed();
        info!(
            path = %path.display(),
            %state,
            elapsed_secs = elapsed.as_secs_f64(),
            "Instance finished"
        );
        match analysis {
            Some(analysis) => InstanceRecord::completed(path.to_path_buf(), analysis, elapsed),
            None => InstanceRecord::empty(path.to_path_buf(), state, elapsed),
        }
    }

    /// Runs all instances on up to `workers` concurrent runners. Records are returned in
    /// the order of `paths`.
    pub fn run_batch(&self, paths: &[PathBuf], workers: usize) -> Vec<InstanceRecord> {
        let workers = workers.clamp(1, paths.len().max(1));
        let (job_tx, job_rx) = crossbeam_channel::unbounded();
        let (result_tx, result_rx) = crossbeam_channel::unbounded();

        for job in paths.iter().enumerate() {
            let _ = job_tx.send(job);
        }
        drop(job_tx);

        thread::scope(|scope| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    for (idx, path) in job_rx.iter() {
                        let _ = result_tx.send((idx, self.run(path)));
                    }
                });
            }
        });
        drop(result_tx);

        let mut records: Vec<Option<InstanceRecord>> = vec![None; paths.len()];
        for (idx, record) in result_rx.iter() {
            records[idx] = Some(record);
        }
        records.into_iter().flatten().collect()
    }
}

/// Source of the instances of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchInput {
    /// A single MPS file
    Single(PathBuf),
    /// A text file listing one MPS path per line
    List(PathBuf),
}

impl BatchInput {
    /// Files with extension `.mps` are instances, everything else is read as a list
    pub fn detect<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let is_mps = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("mps"));
        if is_mps {
            BatchInput::Single(path)
        } else {
            BatchInput::List(path)
        }
    }

    /// Returns the instance paths. Only reading a list file can fail.
    pub fn instances(&self) -> io::Result<Vec<PathBuf>> {
        match self {
            BatchInput::Single(path) => Ok(vec![path.clone()]),
            BatchInput::List(path) => {
                let content = fs::read_to_string(path)?;
                let base = path.parent().unwrap_or_else(|| Path::new(""));
                Ok(parse_instance_list(&content, base))
            }
        }
    }
}

/// Parses a list of instance paths: one per line, blank lines and lines starting with `#`
/// are skipped, relative paths are resolved against `base`.
pub fn parse_instance_list(content: &str, base: &Path) -> Vec<PathBuf> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| base.join(line))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::{gens::GraphRepresentation, lp::MpsFormat};

    const TINY: &str = "\
NAME          TINY
ROWS
 N  COST
 L  LIM1
COLUMNS
    X         COST         1.0   LIM1         1.0
    Y         LIM1         1.0
RHS
    RHS       LIM1         4.0
ENDATA
";

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mipgraphs-runner-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    fn runner() -> TaskRunner {
        TaskRunner::new(AnalysisConfig {
            representations: vec![GraphRepresentation::Primal],
            mps_format: MpsFormat::Free,
            seed: Some(0),
            ..Default::default()
        })
    }

    #[test]
    fn completes_and_fails_per_instance() {
        let tiny = write_temp("tiny.mps", TINY);
        let broken = write_temp("broken.mps", "ROWS\n X  R1\nENDATA\n");
        let missing = tiny.with_file_name("missing.mps");

        let records = runner().run_batch(&[tiny.clone(), broken.clone(), missing.clone()], 2);
        let states: Vec<_> = records.iter().map(|r| r.state).collect();
        assert_eq!(
            states,
            vec![TaskState::Completed, TaskState::Failed, TaskState::Failed]
        );
        assert_eq!(records[0].path, tiny);
        assert_eq!(records[1].path, broken);
        assert_eq!(records[2].path, missing);

        let primal = records[0].graph(GraphRepresentation::Primal).unwrap();
        assert_eq!((primal.num_nodes, primal.num_edges), (2, 1));
        assert!(records[1].lp.is_none() && records[1].graphs.is_empty());
    }

    #[test]
    fn batch_input_detection_and_lists() {
        assert_eq!(
            BatchInput::detect("a/b.MPS"),
            BatchInput::Single(PathBuf::from("a/b.MPS"))
        );
        assert_eq!(
            BatchInput::detect("instances.txt"),
            BatchInput::List(PathBuf::from("instances.txt"))
        );

        let list = "# benchmark set\n\nfirst.mps\n  sub/second.mps  \n/abs/third.mps\n";
        assert_eq!(
            parse_instance_list(list, Path::new("/data")),
            vec![
                PathBuf::from("/data/first.mps"),
                PathBuf::from("/data/sub/second.mps"),
                PathBuf::from("/abs/third.mps"),
            ]
        );

        let file = write_temp("list.txt", "tiny.mps\n");
        assert_eq!(
            BatchInput::detect(&file).instances().unwrap(),
            vec![file.with_file_name("tiny.mps")]
        );
        assert!(BatchInput::List(PathBuf::from("/nonexistent/list.txt")).instances().is_err());
    }

    #[test]
    fn final_states() {
        assert!(!TaskState::Pending.is_final());
        assert!(!TaskState::Running.is_final());
        assert!(TaskState::TimedOut.is_final());
        assert_eq!(TaskState::TimedOut.to_string(), "timedout");
    }
}
