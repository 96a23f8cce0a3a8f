//! Runs a catalogue against a system under test and aggregates verdicts.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use crossbeam_channel::RecvTimeoutError;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::domain::CaseKey;
use crate::domain::CaseVerdict;
use crate::domain::Catalogue;
use crate::domain::Observed;
use crate::domain::Payload;
use crate::domain::QueryCategory;
use crate::domain::ReportAccumulator;
use crate::domain::SuiteReport;
use crate::domain::TestCase;
use crate::domain::TestCaseGroup;
use crate::domain::Verdict;
use crate::usecases::ports::QueryOutcome;
use crate::usecases::ports::SutError;
use crate::usecases::ports::SystemUnderTestHandle;
use crate::usecases::request::QueryRequest;

pub const DEFAULT_CASE_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared flag that stops a run before its next case.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle {
    flag: Arc<AtomicBool>,
}

impl AbortHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// The underlying flag, for signal handlers.
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    timeout: Duration,
    strict: bool,
    parallel: bool,
    abort: AbortHandle,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_CASE_TIMEOUT,
            strict: false,
            parallel: false,
            abort: AbortHandle::new(),
        }
    }
}

impl RunOptions {
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    pub fn abort_handle(&self) -> &AbortHandle {
        &self.abort
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_abort_handle(mut self, abort: AbortHandle) -> Self {
        self.abort = abort;
        self
    }
}

pub trait RunSuiteUseCase: Send + Sync {
    fn execute(&self, catalogue: &Catalogue, options: &RunOptions) -> SuiteReport;
}

pub struct RunSuiteUseCaseImpl {
    system: SystemUnderTestHandle,
}

impl RunSuiteUseCaseImpl {
    pub fn new(system: SystemUnderTestHandle) -> Self {
        Self { system }
    }

    fn run_sequential(
        &self,
        catalogue: &Catalogue,
        options: &RunOptions,
        stop: &AtomicBool,
    ) -> ReportAccumulator {
        let mut merged = ReportAccumulator::new();
        for group in catalogue.groups() {
            merged.merge(self.run_group(group, options, stop));
        }
        merged
    }

    /// One worker per group; accumulators are merged in catalogue order.
    fn run_parallel(
        &self,
        catalogue: &Catalogue,
        options: &RunOptions,
        stop: &AtomicBool,
    ) -> ReportAccumulator {
        let mut merged = ReportAccumulator::new();
        thread::scope(|scope| {
            let workers: Vec<_> = catalogue
                .groups()
                .iter()
                .map(|group| {
                    let spawned = thread::Builder::new()
                        .name(format!("group-{}", group.category()))
                        .spawn_scoped(scope, move || self.run_group(group, options, stop));
                    (group, spawned)
                })
                .collect();

            for (group, spawned) in workers {
                let acc = match spawned {
                    Ok(handle) => match handle.join() {
                        Ok(acc) => acc,
                        Err(_) => {
                            warn!(category = %group.category(), "Group worker panicked");
                            ReportAccumulator::new()
                        }
                    },
                    Err(err) => {
                        warn!(error = %err, "Failed to spawn group worker; running inline");
                        self.run_group(group, options, stop)
                    }
                };
                merged.merge(acc);
            }
        });
        merged
    }

    fn run_group(
        &self,
        group: &TestCaseGroup,
        options: &RunOptions,
        stop: &AtomicBool,
    ) -> ReportAccumulator {
        let mut acc = ReportAccumulator::new();
        for (key, case) in group.entries() {
            if stop.load(Ordering::SeqCst) || options.abort.is_aborted() {
                debug!(category = %group.category(), case = %key, "Run stopped before case");
                break;
            }
            let verdict = self.run_case(group.category(), key, case, options.timeout);
            let errored = verdict.verdict == Verdict::Errored;
            acc.record(verdict);
            if errored && options.strict {
                warn!(category = %group.category(), "Strict mode: stopping after errored case");
                stop.store(true, Ordering::SeqCst);
            }
        }
        acc
    }

    fn run_case(
        &self,
        category: QueryCategory,
        key: CaseKey,
        case: &TestCase,
        timeout: Duration,
    ) -> CaseVerdict {
        let request = QueryRequest::build(category, &case.payload);
        let mistyped = request.mistyped_keys();
        if !mistyped.is_empty() {
            debug!(category = %category, case = %key, keys = ?mistyped, "Forwarding mistyped keys");
        }
        let extra = request.extra_keys();
        if !extra.is_empty() {
            debug!(category = %category, case = %key, keys = ?extra, "Forwarding unknown keys");
        }

        let start = Instant::now();
        let result = self.invoke(category, request.payload(), timeout);
        let (observed, message) = observe(result);
        let expected = case.expectation();
        let verdict = Verdict::judge(expected, observed);
        debug!(
            category = %category,
            case = %key,
            tool = request.tool_name(),
            verdict = verdict.as_str(),
            elapsed_ms = start.elapsed().as_millis(),
            "Case finished"
        );
        if verdict == Verdict::Errored {
            warn!(
                category = %category,
                case = %key,
                error = message.as_deref().unwrap_or_default(),
                "Case errored"
            );
        }

        let passed = verdict == Verdict::Passed;
        CaseVerdict {
            category,
            key,
            description: case.description.clone(),
            expected,
            observed,
            verdict,
            payload: (!passed).then(|| case.payload.clone()),
            message: if passed { None } else { message },
        }
    }

    /// Calls the system on its own thread so a hung call cannot stall the run.
    /// A call that misses the deadline is abandoned and its late result dropped.
    fn invoke(
        &self,
        category: QueryCategory,
        payload: &Payload,
        timeout: Duration,
    ) -> Result<QueryOutcome, SutError> {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let system = Arc::clone(&self.system);
        let payload = payload.clone();
        thread::Builder::new()
            .name(format!("call-{}", category))
            .spawn(move || {
                let _ = tx.send(system.execute(category, &payload));
            })
            .map_err(|err| SutError::Transport(format!("failed to spawn call thread: {}", err)))?;

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(SutError::Timeout(timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(SutError::Transport(
                "call ended without a result".to_string(),
            )),
        }
    }
}

impl RunSuiteUseCase for RunSuiteUseCaseImpl {
    #[tracing::instrument(skip(self, catalogue, options), fields(system = self.system.name()))]
    fn execute(&self, catalogue: &Catalogue, options: &RunOptions) -> SuiteReport {
        let total = catalogue.case_count();
        info!(
            groups = catalogue.groups().len(),
            cases = total,
            parallel = options.parallel,
            strict = options.strict,
            timeout_ms = options.timeout.as_millis(),
            "Suite run started"
        );
        let start = Instant::now();
        let stop = AtomicBool::new(false);

        let acc = if options.parallel && catalogue.groups().len() > 1 {
            self.run_parallel(catalogue, options, &stop)
        } else {
            self.run_sequential(catalogue, options, &stop)
        };

        let report = acc.finish_partial(total);
        let totals = report.totals();
        info!(
            passed = totals.passed,
            failed = totals.failed,
            errored = totals.errored,
            aborted = report.aborted,
            elapsed_ms = start.elapsed().as_millis(),
            "Suite run finished"
        );
        report
    }
}

/// Runs `catalogue` once with default options.
pub fn run(catalogue: &Catalogue, system: SystemUnderTestHandle) -> SuiteReport {
    RunSuiteUseCaseImpl::new(system).execute(catalogue, &RunOptions::default())
}

fn observe(result: Result<QueryOutcome, SutError>) -> (Observed, Option<String>) {
    match result {
        Ok(QueryOutcome {
            ok: true,
            data: None,
            ..
        }) => (
            Observed::Error,
            Some(SutError::MalformedResponse("success without data".to_string()).to_string()),
        ),
        Ok(outcome) if outcome.ok => (Observed::Success, outcome.error),
        Ok(outcome) => (Observed::Failure, outcome.error),
        Err(err) => (Observed::Error, Some(err.to_string())),
    }
}
