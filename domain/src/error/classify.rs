//! Error classification
//!
//! Turns any failure observed at a component boundary into a [`PrismError`].
//! The input is a tagged union ([`Failure`]); classification runs an ordered
//! chain of rules, each of which either produces an error or hands the
//! failure on to the next rule:
//!
//! 1. already-classified domain errors pass through unchanged
//! 2. OS error codes (`EACCES`/`EPERM`, `ENOENT`, `ENOSPC`)
//! 3. message vocabulary: auth/API key, then network/timeout, then model/config
//! 4. opaque values with no error structure
//!
//! Anything left over becomes an [`ErrorKind::Unknown`] error.

use super::{BoxedCause, ErrorKind, PrismError};
use regex::Regex;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

#[cfg(unix)]
mod raw {
    pub const EPERM: i32 = 1;
    pub const ENOENT: i32 = 2;
    pub const EACCES: i32 = 13;
    pub const ENOSPC: i32 = 28;
}

/// OS-level error codes the classifier knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsErrorCode {
    Eacces,
    Eperm,
    Enoent,
    Enospc,
    Other(Option<i32>),
}

impl OsErrorCode {
    pub fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied if is_eperm(err) => OsErrorCode::Eperm,
            io::ErrorKind::PermissionDenied => OsErrorCode::Eacces,
            io::ErrorKind::NotFound => OsErrorCode::Enoent,
            io::ErrorKind::StorageFull => OsErrorCode::Enospc,
            _ => Self::from_raw(err.raw_os_error()),
        }
    }

    #[cfg(unix)]
    fn from_raw(code: Option<i32>) -> Self {
        match code {
            Some(raw::EPERM) => OsErrorCode::Eperm,
            Some(raw::ENOENT) => OsErrorCode::Enoent,
            Some(raw::EACCES) => OsErrorCode::Eacces,
            Some(raw::ENOSPC) => OsErrorCode::Enospc,
            other => OsErrorCode::Other(other),
        }
    }

    #[cfg(not(unix))]
    fn from_raw(code: Option<i32>) -> Self {
        OsErrorCode::Other(code)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OsErrorCode::Eacces => "EACCES",
            OsErrorCode::Eperm => "EPERM",
            OsErrorCode::Enoent => "ENOENT",
            OsErrorCode::Enospc => "ENOSPC",
            OsErrorCode::Other(_) => "EOTHER",
        }
    }
}

#[cfg(unix)]
fn is_eperm(err: &io::Error) -> bool {
    err.raw_os_error() == Some(raw::EPERM)
}

#[cfg(not(unix))]
fn is_eperm(_err: &io::Error) -> bool {
    false
}

/// A native OS error, optionally tied to the path being operated on.
#[derive(Debug)]
pub struct OsFailure {
    pub code: OsErrorCode,
    pub path: Option<PathBuf>,
    source: io::Error,
}

impl OsFailure {
    pub fn new(source: io::Error, path: Option<PathBuf>) -> Self {
        Self {
            code: OsErrorCode::from_io(&source),
            path,
            source,
        }
    }

    pub fn message(&self) -> String {
        self.source.to_string()
    }

    fn path_suffix(&self) -> String {
        self.path
            .as_ref()
            .map(|p| format!(": {}", p.display()))
            .unwrap_or_default()
    }
}

/// Anything that can go wrong, before classification.
#[derive(Debug)]
pub enum Failure {
    /// Already a domain error
    Domain(PrismError),
    /// Native OS / filesystem error
    Os(OsFailure),
    /// A structured error with a message
    Error {
        message: String,
        source: Option<BoxedCause>,
    },
    /// A value with no error structure at all (empty, a bare string, nothing)
    Opaque(Option<String>),
}

impl Failure {
    pub fn io(err: io::Error) -> Self {
        Failure::Os(OsFailure::new(err, None))
    }

    pub fn io_at(err: io::Error, path: impl AsRef<Path>) -> Self {
        Failure::Os(OsFailure::new(err, Some(path.as_ref().to_path_buf())))
    }

    pub fn message(message: impl Into<String>) -> Self {
        Failure::Error {
            message: message.into(),
            source: None,
        }
    }

    pub fn error<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Failure::Error {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    pub fn opaque(value: Option<impl Into<String>>) -> Self {
        Failure::Opaque(value.map(Into::into))
    }

    fn text(&self) -> Option<String> {
        match self {
            Failure::Os(os) => Some(os.message()),
            Failure::Error { message, .. } => Some(message.clone()),
            Failure::Domain(_) | Failure::Opaque(_) => None,
        }
    }

    fn into_cause(self) -> Option<BoxedCause> {
        match self {
            Failure::Os(os) => Some(Box::new(os.source)),
            Failure::Error { source, .. } => source,
            Failure::Domain(err) => Some(Box::new(err)),
            Failure::Opaque(_) => None,
        }
    }
}

impl From<io::Error> for Failure {
    fn from(err: io::Error) -> Self {
        Failure::io(err)
    }
}

impl From<PrismError> for Failure {
    fn from(err: PrismError) -> Self {
        Failure::Domain(err)
    }
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Failure::message(message)
    }
}

impl From<&str> for Failure {
    fn from(message: &str) -> Self {
        Failure::message(message)
    }
}

/// Run-level facts used to make suggestions concrete.
#[derive(Debug, Clone, Default)]
pub struct ClassifyContext {
    pub run_name: Option<String>,
    pub output_dir: Option<PathBuf>,
}

impl ClassifyContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_run_name(mut self, run_name: impl Into<String>) -> Self {
        self.run_name = Some(run_name.into());
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    fn output_dir_display(&self) -> Option<String> {
        self.output_dir.as_ref().map(|d| d.display().to_string())
    }

    fn run_suggestion(&self) -> Option<String> {
        self.run_name.as_ref().map(|run| {
            format!(
                "Run '{}' did not complete cleanly; re-run once the problem is fixed",
                run
            )
        })
    }
}

type Rule = fn(Failure, &ClassifyContext) -> Result<PrismError, Failure>;

const RULES: [Rule; 6] = [
    pass_through_domain,
    classify_os_code,
    classify_auth,
    classify_network,
    classify_model_config,
    classify_opaque,
];

static AUTH_VOCABULARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(api[ _-]?key|unauthori[sz]ed|authenticat|\b40[13]\b|forbidden|credential|rate[ _-]?limit|\b429\b|quota|api (request|error|call))",
    )
    .expect("auth vocabulary regex is valid")
});

static NETWORK_VOCABULARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(timed? ?out|timeout|network|connect(ion)? (refused|reset|closed|failed)|econnrefused|econnreset|etimedout|enotfound|socket hang up|\bdns\b|unreachable)",
    )
    .expect("network vocabulary regex is valid")
});

static MODEL_VOCABULARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\bmodel\b.*\b(not found|unknown|invalid|not supported|does not exist|unavailable)|\b(unknown|invalid|unsupported)\b.*\bmodel\b|config(uration)? key|provider:model|\bnot found\b)",
    )
    .expect("model vocabulary regex is valid")
});

/// Classify any failure into a [`PrismError`].
pub fn classify(failure: impl Into<Failure>, context: &ClassifyContext) -> PrismError {
    let mut failure = failure.into();
    for rule in RULES {
        match rule(failure, context) {
            Ok(err) => return err,
            Err(unmatched) => failure = unmatched,
        }
    }
    fallback_unknown(failure, context)
}

fn pass_through_domain(failure: Failure, _ctx: &ClassifyContext) -> Result<PrismError, Failure> {
    match failure {
        Failure::Domain(err) => Ok(err),
        other => Err(other),
    }
}

fn classify_os_code(failure: Failure, ctx: &ClassifyContext) -> Result<PrismError, Failure> {
    let os = match failure {
        Failure::Os(os) => os,
        other => return Err(other),
    };
    let location = os
        .path
        .as_ref()
        .map(|p| p.display().to_string())
        .or_else(|| ctx.output_dir_display());

    let err = match os.code {
        OsErrorCode::Eacces | OsErrorCode::Eperm => {
            let target = location.unwrap_or_else(|| "the output directory".to_string());
            PrismError::permission(format!(
                "Permission denied ({}){}",
                os.code.as_str(),
                os.path_suffix()
            ))
            .with_suggestion(format!(
                "Check that you have write permissions for {}",
                target
            ))
            .with_suggestion("Choose a directory you own with --output-dir")
        }
        OsErrorCode::Enoent => {
            let mut err = PrismError::file_system(format!(
                "File or directory not found{}",
                os.path_suffix()
            ))
            .with_suggestion("Verify that the path exists and the parent directory is correct");
            if let Some(dir) = ctx.output_dir_display() {
                err = err.with_suggestion(format!(
                    "Output directory {} is created automatically; check its parent directory",
                    dir
                ));
            }
            err
        }
        OsErrorCode::Enospc => {
            let target = location.unwrap_or_else(|| "the output volume".to_string());
            PrismError::file_system(format!(
                "Not enough disk space{}",
                os.path_suffix()
            ))
            .with_suggestion(format!("Free up disk space on the volume holding {}", target))
            .with_suggestion("Write responses to another disk with --output-dir")
        }
        OsErrorCode::Other(_) => return Err(Failure::Os(os)),
    };

    let err = err.with_suggestions(ctx.run_suggestion());
    Ok(err.with_boxed_cause(Some(Box::new(os.source))))
}

fn classify_auth(failure: Failure, ctx: &ClassifyContext) -> Result<PrismError, Failure> {
    classify_by_vocabulary(failure, &AUTH_VOCABULARY, |message| {
        PrismError::api(message)
            .with_suggestion("Check that the API key environment variable for this provider is set and valid")
            .with_suggestion("Verify the account has access to the requested model and has remaining quota")
            .with_suggestions(ctx.run_suggestion())
    })
}

fn classify_network(failure: Failure, ctx: &ClassifyContext) -> Result<PrismError, Failure> {
    classify_by_vocabulary(failure, &NETWORK_VOCABULARY, |message| {
        PrismError::network(message)
            .with_suggestion("Check your network connection and the provider's base_url")
            .with_suggestion("Increase the per-call timeout with --timeout if the model is slow")
            .with_suggestions(ctx.run_suggestion())
    })
}

fn classify_model_config(failure: Failure, _ctx: &ClassifyContext) -> Result<PrismError, Failure> {
    classify_by_vocabulary(failure, &MODEL_VOCABULARY, |message| {
        PrismError::config(message)
            .with_suggestion("Models are addressed as provider:model_id, e.g. openai:gpt-4o")
            .with_suggestion("Check the [[models]] entries in prism.toml for a typo in model_id")
            .with_suggestion("List the models a provider offers with --list-models <provider>")
            .with_example("prism -m openai:gpt-4o \"Explain ownership in Rust\"")
            .with_example("prism --models openai:gpt-4o,anthropic:claude-3-5-sonnet-latest \"...\"")
    })
}

fn classify_opaque(failure: Failure, ctx: &ClassifyContext) -> Result<PrismError, Failure> {
    let value = match failure {
        Failure::Opaque(value) => value,
        other => return Err(other),
    };
    let shown = value.unwrap_or_else(|| "<no value>".to_string());
    Ok(PrismError::unknown(format!(
        "An unexpected error occurred: {} (no structured error information was available)",
        shown
    ))
    .with_suggestion("Re-run with -vv to capture debug logs")
    .with_suggestions(ctx.run_suggestion()))
}

fn classify_by_vocabulary(
    failure: Failure,
    vocabulary: &Regex,
    build: impl FnOnce(String) -> PrismError,
) -> Result<PrismError, Failure> {
    match failure.text() {
        Some(text) if vocabulary.is_match(&text) => {
            let err = build(text);
            Ok(err.with_boxed_cause(failure.into_cause()))
        }
        _ => Err(failure),
    }
}

fn fallback_unknown(failure: Failure, ctx: &ClassifyContext) -> PrismError {
    let message = failure
        .text()
        .unwrap_or_else(|| "An unexpected error occurred".to_string());
    PrismError::new(ErrorKind::Unknown, message)
        .with_suggestion("Re-run with -vv to capture debug logs")
        .with_suggestions(ctx.run_suggestion())
        .with_boxed_cause(failure.into_cause())
}
