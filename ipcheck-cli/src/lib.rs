use std::{
    fs,
    io::{self, IsTerminal},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressDrawTarget};
use ipcheck::{addr::to_ipv4, check, parse, parse_all, Options, Progress, RangeSet, Verdict};
use thiserror::Error;
use tracing::{info, instrument};

/// The default file listing the desired addresses.
pub const DEFAULT_DESIRED: &str = "desired_ips.csv";
/// The default file listing the total addresses.
pub const DEFAULT_TOTAL: &str = "total_ips.csv";

/// An input file could not be read.
#[derive(Debug, Error)]
#[error("failed to read {}", path.display())]
pub struct FileReadError {
    /// The file which could not be read.
    pub path: PathBuf,
    /// The underlying I/O error.
    #[source]
    pub source: io::Error,
}

/// Configuration of a run.
#[derive(Debug, Clone)]
pub struct Config {
    /// The file listing the addresses which must be covered.
    pub desired: PathBuf,
    /// The file listing the covering addresses.
    pub total: PathBuf,
    /// Parsing and checking options.
    pub options: Options,
    /// Report every malformed entry of a file instead of only the first.
    pub all_errors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            desired: PathBuf::from(DEFAULT_DESIRED),
            total: PathBuf::from(DEFAULT_TOTAL),
            options: Options::default(),
            all_errors: false,
        }
    }
}

/// Reads the entries of a file.
///
/// Returns the trimmed lines of the file in order, each paired with its 1-based line number,
/// skipping blank lines and `#` comments.
pub fn read_lines(path: impl AsRef<Path>) -> Result<Vec<(usize, String)>, FileReadError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| FileReadError {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(contents
        .trim_start_matches('\u{feff}')
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| (line_no, line.to_string()))
        .collect())
}

/// Shows progress as a bar on stderr.
///
/// Each stage started with [`Progress::start`] gets a fresh bar. Messages are logged with the
/// bar suspended so the two do not interleave.
#[derive(Debug)]
pub struct ConsoleProgress {
    bar: Mutex<ProgressBar>,
    visible: bool,
}

impl ConsoleProgress {
    /// Returns a new sink which draws to stderr if it is a terminal.
    pub fn new() -> Self {
        Self::with_visibility(io::stderr().is_terminal())
    }

    /// Returns a new sink which never draws.
    pub fn hidden() -> Self {
        Self::with_visibility(false)
    }

    fn with_visibility(visible: bool) -> Self {
        Self {
            bar: Mutex::new(ProgressBar::hidden()),
            visible,
        }
    }

    /// Returns the bar of the current stage.
    pub fn bar(&self) -> ProgressBar {
        self.bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for ConsoleProgress {
    fn message(&self, message: &str) {
        self.bar().suspend(|| info!("{message}"));
    }

    fn start(&self, total: u64) {
        let target = if self.visible {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };

        *self.bar.lock().unwrap_or_else(PoisonError::into_inner) =
            ProgressBar::with_draw_target(Some(total), target);
    }

    fn inc(&self, delta: u64) {
        self.bar().inc(delta);
    }

    fn finish(&self) {
        self.bar().finish();
    }
}

/// Loads both files and checks whether the desired addresses are covered by the total addresses.
#[instrument(skip_all, err)]
pub fn run(config: &Config) -> Result<Verdict> {
    run_with(config, &ConsoleProgress::new())
}

/// Like [`run`], reporting progress to the given sink.
pub fn run_with(config: &Config, progress: &ConsoleProgress) -> Result<Verdict> {
    info!("Loading IP range A from {}", config.desired.display());
    let desired = read_lines(&config.desired)?;
    info!("Loading IP range B from {}", config.total.display());
    let total = read_lines(&config.total)?;

    info!("Parsing the desired IPs.");
    let desired = parse_file(&desired, &config.desired, config, progress)?;
    info!("Parsing the total IPs.");
    let total = parse_file(&total, &config.total, config, progress)?;

    info!("Checking if list A is in list B.");
    let verdict = check(&desired, &total, config.options.algorithm, progress);

    match verdict.uncovered() {
        None => info!("It's a match!"),
        Some(uncovered) => info!(
            "Unmatched address {} from A entry {}",
            to_ipv4(uncovered.address),
            uncovered.interval
        ),
    }

    Ok(verdict)
}

fn parse_file(
    lines: &[(usize, String)],
    path: &Path,
    config: &Config,
    progress: &ConsoleProgress,
) -> Result<RangeSet> {
    let parse_options = &config.options.parse;

    let set = if config.all_errors {
        parse_all(lines, parse_options, progress)
            .with_context(|| format!("failed to parse {}", path.display()))?
    } else {
        parse(lines, parse_options, progress)
            .with_context(|| format!("failed to parse {}", path.display()))?
    };

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipcheck::{Algorithm, CidrPolicy, ParseOptions};
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_lines() {
        let f = file("\u{feff}10.0.0.1\r\n\n  10.0.0.0/24  \n# comment\n\n1.0.0.0-1.0.0.5\n\n");

        assert_eq!(
            read_lines(f.path()).unwrap(),
            vec![
                (1, "10.0.0.1".to_string()),
                (3, "10.0.0.0/24".to_string()),
                (6, "1.0.0.0-1.0.0.5".to_string())
            ]
        );
    }

    #[test]
    fn test_read_lines_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.csv");

        let err = read_lines(&path).unwrap_err();

        assert_eq!(err.path, path);
        assert_eq!(err.source.kind(), io::ErrorKind::NotFound);
    }

    fn config(desired: &NamedTempFile, total: &NamedTempFile) -> Config {
        Config {
            desired: desired.path().to_path_buf(),
            total: total.path().to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_run_match() {
        let desired = file("192.168.1.1\n10.0.0.0-10.0.0.255\n");
        let total = file("192.168.1.0/24\n10.0.0.0/16\n");

        assert!(run(&config(&desired, &total)).unwrap().is_match());
    }

    #[test]
    fn test_run_no_match() {
        let desired = file("192.168.2.1\n");
        let total = file("192.168.1.0/24\n");

        let mut config = config(&desired, &total);
        config.options.algorithm = Algorithm::Direct;

        assert_eq!(
            run(&config).unwrap().into_parts(),
            (false, Some(3232236033))
        );
    }

    #[test]
    fn test_run_cidr_policy() {
        let desired = file("10.0.0.5\n");
        let total = file("10.0.0.5/24\n");

        let mut config = config(&desired, &total);
        assert!(run(&config).is_err());

        config.options.parse = ParseOptions {
            cidr: CidrPolicy::Normalize,
        };
        assert!(run(&config).unwrap().is_match());
    }

    #[test]
    fn test_run_all_errors() {
        let desired = file("bogus\n10.0.0.1\n10.0.0.0/40\n");
        let total = file("10.0.0.0/8\n");

        let mut config = config(&desired, &total);
        config.all_errors = true;

        let err = run(&config).unwrap_err();
        let errs = err.downcast_ref::<ipcheck::ParseErrors>().unwrap();

        assert_eq!(errs.0.len(), 2);
    }

    #[test]
    fn test_run_reports_file_line() {
        let desired = file("# header\n\n10.0.0.1\n\nbogus\n");
        let total = file("10.0.0.0/8\n");

        let err = run(&config(&desired, &total)).unwrap_err();
        let err = err.downcast_ref::<ipcheck::ParseError>().unwrap();

        assert_eq!(err.line, 5);
        assert!(format!("{err}").starts_with("line 5: "));
    }

    #[test]
    fn test_run_all_errors_report_file_lines() {
        let desired = file("# header\nbogus\n\n10.0.0.1\n10.0.0.0/40\n");
        let total = file("10.0.0.0/8\n");

        let mut config = config(&desired, &total);
        config.all_errors = true;

        let err = run(&config).unwrap_err();
        let errs = err.downcast_ref::<ipcheck::ParseErrors>().unwrap();

        assert_eq!(
            errs.0.iter().map(|err| err.line).collect::<Vec<_>>(),
            vec![2, 5]
        );
    }

    #[test]
    fn test_console_progress_stages() {
        let progress = ConsoleProgress::hidden();
        let f = file("# header\n10.0.0.1\n\n10.0.0.0/24\n10.0.1.0/24\n");
        let lines = read_lines(f.path()).unwrap();

        let set = parse_file(&lines, f.path(), &Config::default(), &progress).unwrap();
        let bar = progress.bar();

        assert_eq!(set.len_intervals(), 3);
        assert_eq!(bar.length(), Some(3));
        assert_eq!(bar.position(), 3);
        assert!(bar.is_finished());

        // a new stage gets a new bar
        progress.start(7);
        let bar = progress.bar();
        assert_eq!(bar.length(), Some(7));
        assert_eq!(bar.position(), 0);
        assert!(!bar.is_finished());
    }

    #[test]
    fn test_run_with_finishes_check_stage() {
        let desired = file("192.168.1.1\n10.0.0.0-10.0.0.255\n");
        let total = file("192.168.1.0/24\n10.0.0.0/16\n");
        let progress = ConsoleProgress::hidden();

        let mut config = config(&desired, &total);
        config.options.algorithm = Algorithm::Direct;

        assert!(run_with(&config, &progress).unwrap().is_match());

        // the last stage is the scan over the two desired intervals
        let bar = progress.bar();
        assert_eq!(bar.length(), Some(2));
        assert_eq!(bar.position(), 2);
        assert!(bar.is_finished());
    }
}
