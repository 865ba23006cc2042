use std::convert::TryFrom;
use std::io::Write;
use std::time::Instant;

use log::Level;
use time::Duration;

use crate::relabel::Summary;

/// Where a relabeling run reports on itself. Nothing written here may reach
/// the edge list itself.
pub trait Diagnostics {
    /// Called each time another `PROGRESS_EVERY` edges have been accepted.
    fn progress(&mut self, ticks: usize);
    /// Called once, after the last edge was written and flushed.
    fn finished(&mut self, summary: &Summary);
}

/// Reports through the `log` facade, i.e. to stderr once `init_logging` ran.
pub struct LogDiagnostics {
    started: Instant,
}

impl LogDiagnostics {
    pub fn new() -> LogDiagnostics {
        LogDiagnostics { started: Instant::now() }
    }
}

impl Default for LogDiagnostics {
    fn default() -> LogDiagnostics { LogDiagnostics::new() }
}

impl Diagnostics for LogDiagnostics {
    fn progress(&mut self, ticks: usize) {
        log::info!("{}", ticks);
    }

    fn finished(&mut self, summary: &Summary) {
        for line in reminder(summary).lines() {
            log::info!("{}", line);
        }
        let elapsed = Duration::try_from(self.started.elapsed()).unwrap_or(Duration::MAX);
        log::debug!("{} vertices, {} edges in {:.3}s", summary.vertices, summary.edges, elapsed.as_seconds_f64());
    }
}

/// What the operator must still do with the edge list once the run is over.
pub fn reminder(summary: &Summary) -> String {
    format!("Add the following at the beginning of the file:\n{}", summary.header())
}

/// Logs to stderr at `info` unless `RUST_LOG` says otherwise. Informational
/// records print as bare text, warnings and errors carry their level.
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env)
        .format(|buf, record| {
            if record.level() <= Level::Warn {
                writeln!(buf, "{}: {}", record.level(), record.args())
            } else {
                writeln!(buf, "{}", record.args())
            }
        })
        .try_init();
}

#[cfg(test)]
#[derive(Default)]
pub struct Recorder {
    pub ticks: Vec<usize>,
    pub finished: Vec<Summary>,
}

#[cfg(test)]
impl Diagnostics for Recorder {
    fn progress(&mut self, ticks: usize) { self.ticks.push(ticks); }
    fn finished(&mut self, summary: &Summary) { self.finished.push(*summary); }
}

#[test]
fn log_diagnostics_never_panics() {
    init_logging();
    let mut diagnostics = LogDiagnostics::new();
    diagnostics.progress(1);
    diagnostics.finished(&Summary { vertices: 2, edges: 1 });
}

#[test]
fn reminder_text() {
    assert_eq!(
        reminder(&Summary { vertices: 3, edges: 2 }),
        "Add the following at the beginning of the file:\n# Comment\n3 2\n"
    );
    assert_eq!(reminder(&Summary::default()).lines().last(), Some("0 0"));
}
