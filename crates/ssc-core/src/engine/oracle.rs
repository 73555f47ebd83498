//! The boundary to the external registration procedure.
//!
//! The driver only sees [`RegistrationOracle`]: a blocking call from a pair of
//! peak lists plus their dimension roles to an optional tolerance map. Any
//! failure on the other side of that call is soft and surfaces as `None`.

use crate::core::io::error::PeakListError;
use crate::core::io::json::JsonPeakListFile;
use crate::core::io::traits::PeakListFile;
use crate::core::models::peaklist::PeakList;
use crate::core::models::tolerance::ToleranceMap;
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

/// First placeholder name handed out to a non-root dimension.
pub const FIRST_PLACEHOLDER: usize = 100;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Failed to launch registration executable '{executable}': {source}")]
    Spawn {
        executable: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error while talking to the registration executable: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to stage peak list for registration: {0}")]
    Staging(#[from] PeakListError),

    #[error("Registration executable exited with {status}: {stderr}")]
    ExitStatus { status: ExitStatus, stderr: String },

    #[error("Registration executable produced no output")]
    EmptyOutput,

    #[error("Registration output could not be parsed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Registration executable did not finish within {0:?}")]
    Timeout(Duration),
}

/// Dimension labels as presented to the oracle for the input and the root list.
///
/// Root labels are passed literally; every other label is replaced by a numeric
/// placeholder so that non-root axes of the two lists are never matched by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionRoles {
    pub input: Vec<String>,
    pub root: Vec<String>,
}

impl DimensionRoles {
    /// Placeholders come from one counter starting at [`FIRST_PLACEHOLDER`],
    /// consumed by the root list first and then by the input list.
    pub fn anonymize(labels: &[String], root_labels: &[String]) -> Self {
        let mut next = FIRST_PLACEHOLDER;
        let mut present = |label: &String| {
            if root_labels.contains(label) {
                label.clone()
            } else {
                let placeholder = next.to_string();
                next += 1;
                placeholder
            }
        };
        let root = labels.iter().map(&mut present).collect();
        let input = labels.iter().map(&mut present).collect();
        Self { input, root }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RegistrationRequest<'a> {
    pub input: &'a PeakList,
    pub root: &'a PeakList,
    pub roles: &'a DimensionRoles,
}

pub trait RegistrationOracle {
    /// Estimates per-dimension standard deviations, or `None` when the
    /// estimate is unavailable for any reason.
    fn register(&self, request: &RegistrationRequest<'_>) -> Option<ToleranceMap>;
}

impl<F> RegistrationOracle for F
where
    F: Fn(&RegistrationRequest<'_>) -> Option<ToleranceMap>,
{
    fn register(&self, request: &RegistrationRequest<'_>) -> Option<ToleranceMap> {
        self(request)
    }
}

/// Structured output of the registration executable.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationResult {
    #[serde(rename = "FullSTD")]
    pub full_std: ToleranceMap,
}

impl RegistrationResult {
    pub fn parse(output: &str) -> Result<Self, OracleError> {
        if output.trim().is_empty() {
            return Err(OracleError::EmptyOutput);
        }
        Ok(serde_json::from_str(output)?)
    }
}

/// Runs the registration algorithm as a child process.
///
/// Both lists are staged as temporary JSON files and the executable is called
/// as `<exe> <input.json> <root.json> --noi --dim <input dims> : <root dims>`;
/// its standard output must hold a [`RegistrationResult`].
#[derive(Debug, Clone)]
pub struct ProcessOracle {
    executable: PathBuf,
    timeout: Option<Duration>,
    poll_interval: Duration,
}

impl ProcessOracle {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            timeout: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn run(&self, request: &RegistrationRequest<'_>) -> Result<RegistrationResult, OracleError> {
        let input = stage(request.input)?;
        let root = stage(request.root)?;
        let mut stdout = tempfile::tempfile()?;
        let mut stderr = tempfile::tempfile()?;

        debug!(
            executable = %self.executable.display(),
            input_dims = ?request.roles.input,
            root_dims = ?request.roles.root,
            "Launching registration executable."
        );
        let mut child = Command::new(&self.executable)
            .arg(input.path())
            .arg(root.path())
            .arg("--noi")
            .arg("--dim")
            .args(&request.roles.input)
            .arg(":")
            .args(&request.roles.root)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout.try_clone()?))
            .stderr(Stdio::from(stderr.try_clone()?))
            .spawn()
            .map_err(|source| OracleError::Spawn {
                executable: self.executable.clone(),
                source,
            })?;

        let status = self.wait(&mut child)?;
        if !status.success() {
            return Err(OracleError::ExitStatus {
                status,
                stderr: read_back(&mut stderr)?.trim().to_string(),
            });
        }
        RegistrationResult::parse(&read_back(&mut stdout)?)
    }

    fn wait(&self, child: &mut Child) -> Result<ExitStatus, OracleError> {
        let Some(timeout) = self.timeout else {
            return Ok(child.wait()?);
        };
        let started = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if started.elapsed() >= timeout {
                let _ = child.kill();
                let _ = child.wait();
                return Err(OracleError::Timeout(timeout));
            }
            thread::sleep(self.poll_interval);
        }
    }
}

impl RegistrationOracle for ProcessOracle {
    fn register(&self, request: &RegistrationRequest<'_>) -> Option<ToleranceMap> {
        match self.run(request) {
            Ok(result) => Some(result.full_std),
            Err(e) => {
                warn!(error = %e, "Registration failed; treating as unavailable.");
                None
            }
        }
    }
}

fn stage(peaklist: &PeakList) -> Result<NamedTempFile, OracleError> {
    let file = tempfile::Builder::new()
        .prefix("ssc-registration-")
        .suffix(".json")
        .tempfile()?;
    let mut writer = BufWriter::new(file.as_file());
    JsonPeakListFile::write_to(peaklist, &mut writer)?;
    writer.flush()?;
    drop(writer);
    Ok(file)
}

fn read_back(file: &mut File) -> io::Result<String> {
    let mut text = String::new();
    file.seek(SeekFrom::Start(0))?;
    file.read_to_string(&mut text)?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::format::PeakListFormat;
    use crate::core::models::peak::Peak;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sample_list() -> PeakList {
        let labels = labels(&["HN", "N"]);
        PeakList::from_peaks(
            "HSQC",
            labels.clone(),
            PeakListFormat::Json,
            [Peak::new(&labels, &["G2H", "G2N"], &[8.31, 109.5], vec![1.0]).unwrap()],
        )
        .unwrap()
    }

    #[test]
    fn anonymize_fills_root_list_before_input_list() {
        let roles = DimensionRoles::anonymize(&labels(&["H", "N", "CA"]), &labels(&["H", "N"]));
        assert_eq!(roles.root, labels(&["H", "N", "100"]));
        assert_eq!(roles.input, labels(&["H", "N", "101"]));
    }

    #[test]
    fn anonymize_with_no_root_labels_uses_only_placeholders() {
        let roles = DimensionRoles::anonymize(&labels(&["HN", "N"]), &[]);
        assert_eq!(roles.root, labels(&["100", "101"]));
        assert_eq!(roles.input, labels(&["102", "103"]));
    }

    #[test]
    fn closures_act_as_oracles() {
        let list = sample_list();
        let roles = DimensionRoles::anonymize(list.labels(), list.labels());
        let request = RegistrationRequest {
            input: &list,
            root: &list,
            roles: &roles,
        };
        fn check(oracle: &impl RegistrationOracle, request: &RegistrationRequest<'_>) -> Option<ToleranceMap> {
            oracle.register(request)
        }
        let stds = check(
            &|req: &RegistrationRequest<'_>| -> Option<ToleranceMap> {
                Some(req.input.labels().iter().map(|l| (l.clone(), 0.01)).collect())
            },
            &request,
        )
        .unwrap();
        assert_eq!(stds.get("HN"), Some(0.01));
        assert_eq!(stds.len(), 2);
    }

    #[test]
    fn parse_reads_full_std_mapping() {
        let result = RegistrationResult::parse(r#"{"FullSTD": {"HN": 0.02, "N": 0.25}}"#).unwrap();
        assert_eq!(result.full_std.get("N"), Some(0.25));
    }

    #[test]
    fn parse_rejects_empty_and_malformed_output() {
        assert!(matches!(
            RegistrationResult::parse("  \n"),
            Err(OracleError::EmptyOutput)
        ));
        assert!(matches!(
            RegistrationResult::parse("registration failed"),
            Err(OracleError::Malformed(_))
        ));
        assert!(matches!(
            RegistrationResult::parse(r#"{"stds": {}}"#),
            Err(OracleError::Malformed(_))
        ));
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        fn script(dir: &TempDir, body: &str) -> PathBuf {
            let path = dir.path().join("register.sh");
            fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn register_with(oracle: &ProcessOracle) -> Option<ToleranceMap> {
            let list = sample_list();
            let roles = DimensionRoles::anonymize(list.labels(), &labels(&["HN"]));
            oracle.register(&RegistrationRequest {
                input: &list,
                root: &list,
                roles: &roles,
            })
        }

        #[test]
        fn successful_run_returns_tolerances() {
            let dir = tempfile::tempdir().unwrap();
            let exe = script(&dir, r#"echo '{"FullSTD": {"HN": 0.015, "N": 0.2}}'"#);
            let stds = register_with(&ProcessOracle::new(exe)).unwrap();
            assert_eq!(stds.get("HN"), Some(0.015));
            assert_eq!(stds.get("N"), Some(0.2));
        }

        #[test]
        fn arguments_follow_registration_protocol() {
            let dir = tempfile::tempdir().unwrap();
            let args_path = dir.path().join("args.txt");
            let exe = script(
                &dir,
                &format!(
                    "shift 2\necho \"$@\" > '{}'\necho '{{\"FullSTD\": {{\"HN\": 0.01}}}}'",
                    args_path.display()
                ),
            );
            register_with(&ProcessOracle::new(exe)).unwrap();
            let args = fs::read_to_string(args_path).unwrap();
            assert_eq!(args.trim(), "--noi --dim HN 101 : HN 100");
        }

        #[test]
        fn staged_peak_list_is_valid_json() {
            let dir = tempfile::tempdir().unwrap();
            let copy_path = dir.path().join("staged.json");
            let exe = script(
                &dir,
                &format!(
                    "cp \"$1\" '{}'\necho '{{\"FullSTD\": {{\"HN\": 0.01}}}}'",
                    copy_path.display()
                ),
            );
            register_with(&ProcessOracle::new(exe)).unwrap();
            let staged: serde_json::Value =
                serde_json::from_str(&fs::read_to_string(copy_path).unwrap()).unwrap();
            assert_eq!(staged[0]["Assignment"][0], "G2H");
        }

        #[test]
        fn non_zero_exit_is_a_soft_failure() {
            let dir = tempfile::tempdir().unwrap();
            let exe = script(&dir, "echo 'bad input' >&2\nexit 3");
            let oracle = ProcessOracle::new(exe);
            assert!(register_with(&oracle).is_none());

            let list = sample_list();
            let roles = DimensionRoles::anonymize(list.labels(), &[]);
            let err = oracle
                .run(&RegistrationRequest {
                    input: &list,
                    root: &list,
                    roles: &roles,
                })
                .unwrap_err();
            match err {
                OracleError::ExitStatus { status, stderr } => {
                    assert_eq!(status.code(), Some(3));
                    assert_eq!(stderr, "bad input");
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[test]
        fn empty_output_is_a_soft_failure() {
            let dir = tempfile::tempdir().unwrap();
            let exe = script(&dir, "exit 0");
            assert!(register_with(&ProcessOracle::new(exe)).is_none());
        }

        #[test]
        fn missing_executable_is_a_soft_failure() {
            let dir = tempfile::tempdir().unwrap();
            let oracle = ProcessOracle::new(dir.path().join("does-not-exist"));
            assert!(register_with(&oracle).is_none());
        }

        #[test]
        fn timeout_kills_the_process() {
            let dir = tempfile::tempdir().unwrap();
            let exe = script(&dir, "sleep 5\necho '{\"FullSTD\": {}}'");
            let oracle = ProcessOracle::new(exe).with_timeout(Some(Duration::from_millis(200)));
            let started = Instant::now();
            assert!(register_with(&oracle).is_none());
            assert!(started.elapsed() < Duration::from_secs(4));
        }
    }
}
