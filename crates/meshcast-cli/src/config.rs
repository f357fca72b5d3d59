//! CLI configuration from environment and arguments.
//!
//! Environment:
//! - `MESHCAST_INPUT`      problem file (default: stdin)
//! - `MESHCAST_OUTPUT`     solution file (default: stdout)
//! - `MESHCAST_MAX_SLICE`  search horizon (default: unbounded)
//! - `MESHCAST_VERIFY`     `0`/`false` skips solution verification
//!
//! Positional arguments and flags override the environment.

use std::path::PathBuf;

use meshcast_admission::SearchConfig;

use crate::{Error, Result};

/// Resolved CLI settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Problem file, stdin when absent
    pub input: Option<PathBuf>,
    /// Solution file, stdout when absent
    pub output: Option<PathBuf>,
    /// Last slice a path may occupy
    pub max_slice: Option<u32>,
    /// Check the solution before writing it
    pub verify: bool,
    /// Indent the JSON output
    pub pretty: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            max_slice: None,
            verify: true,
            pretty: false,
        }
    }
}

impl CliConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Read settings through a variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_slice = var("MESHCAST_MAX_SLICE")
            .map(|s| parse_slice("MESHCAST_MAX_SLICE", &s))
            .transpose()?;

        let verify = match var("MESHCAST_VERIFY").as_deref().map(str::trim) {
            None | Some("") => true,
            Some("1") | Some("true") | Some("yes") => true,
            Some("0") | Some("false") | Some("no") => false,
            Some(other) => {
                return Err(Error::Config(format!(
                    "MESHCAST_VERIFY must be a boolean, got {:?}",
                    other
                )))
            }
        };

        Ok(Self {
            input: var("MESHCAST_INPUT").filter(|s| !s.is_empty()).map(PathBuf::from),
            output: var("MESHCAST_OUTPUT").filter(|s| !s.is_empty()).map(PathBuf::from),
            max_slice,
            verify,
            pretty: false,
        })
    }

    /// Apply command-line arguments: `[input] [output] [--max-slice N]
    /// [--no-verify] [--pretty]`. A `-` path means stdin/stdout.
    pub fn with_args(mut self, args: &[String]) -> Result<Self> {
        let mut positional = 0;
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--max-slice" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| Error::Config("--max-slice needs a value".into()))?;
                    self.max_slice = Some(parse_slice("--max-slice", value)?);
                }
                "--no-verify" => self.verify = false,
                "--pretty" => self.pretty = true,
                flag if flag.starts_with("--") => {
                    return Err(Error::Config(format!("unknown flag {}", flag)));
                }
                path => {
                    let path = (path != "-").then(|| PathBuf::from(path));
                    match positional {
                        0 => self.input = path,
                        1 => self.output = path,
                        _ => return Err(Error::Config(format!("unexpected argument {}", arg))),
                    }
                    positional += 1;
                }
            }
        }

        Ok(self)
    }

    /// Search settings for the admission engine.
    pub fn search(&self) -> SearchConfig {
        SearchConfig {
            max_slice: self.max_slice,
        }
    }
}

fn parse_slice(name: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} must be a slice number, got {:?}", name, value)))
}
