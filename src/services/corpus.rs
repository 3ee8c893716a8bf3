use crate::models::{EvaluationReport, PreferencePair, ResponseSet, Sample};
use chrono::{DateTime, TimeZone};
use serde::Deserialize;
use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when reading or writing corpora and reports
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Line {0} has neither a prompt/response pair nor a messages list")]
    UnrecognizedRecord(usize),

    #[error("JSON error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("No records found in {0}")]
    Empty(String),
}

#[derive(Debug, Deserialize)]
struct Message {
    role: String,
    content: String,
}

/// Accepted corpus line shapes
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CorpusRecord {
    Pair {
        prompt: String,
        #[serde(default)]
        response: String,
        #[serde(default)]
        meta: Option<serde_json::Value>,
    },
    Chat {
        messages: Vec<Message>,
        #[serde(default)]
        meta: Option<serde_json::Value>,
    },
}

impl CorpusRecord {
    /// First user message as the prompt, final assistant message as the response
    fn into_sample(self) -> Option<Sample> {
        match self {
            CorpusRecord::Pair {
                prompt,
                response,
                meta,
            } => Some(Sample {
                prompt,
                response,
                meta,
            }),
            CorpusRecord::Chat { messages, meta } => {
                let prompt = messages.iter().find(|m| m.role == "user")?.content.clone();
                let response = messages
                    .last()
                    .filter(|m| m.role == "assistant")
                    .map(|m| m.content.clone())
                    .unwrap_or_default();
                Some(Sample {
                    prompt,
                    response,
                    meta,
                })
            }
        }
    }
}

/// Read non-blank JSONL lines with their 1-based line numbers
fn read_lines(path: &Path) -> Result<Vec<(usize, String)>, CorpusError> {
    let reader = BufReader::new(fs::File::open(path)?);
    let mut lines = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if !line.trim().is_empty() {
            lines.push((i + 1, line));
        }
    }

    Ok(lines)
}

fn parse_line<T: serde::de::DeserializeOwned>(line_no: usize, line: &str) -> Result<T, CorpusError> {
    serde_json::from_str(line).map_err(|source| CorpusError::Json {
        line: line_no,
        source,
    })
}

/// Load an evaluation corpus in either the prompt/response or messages shape
pub fn load_samples<P: AsRef<Path>>(path: P) -> Result<Vec<Sample>, CorpusError> {
    let path = path.as_ref();
    let mut samples = Vec::new();

    for (line_no, line) in read_lines(path)? {
        let value: serde_json::Value = parse_line(line_no, &line)?;
        let record: CorpusRecord =
            serde_json::from_value(value).map_err(|_| CorpusError::UnrecognizedRecord(line_no))?;
        let sample = record
            .into_sample()
            .ok_or(CorpusError::UnrecognizedRecord(line_no))?;
        samples.push(sample);
    }

    if samples.is_empty() {
        return Err(CorpusError::Empty(path.display().to_string()));
    }

    tracing::info!("Loaded {} samples from {}", samples.len(), path.display());
    Ok(samples)
}

/// Load pre-generated `{"prompt", "responses"}` sets
pub fn load_response_sets<P: AsRef<Path>>(path: P) -> Result<Vec<ResponseSet>, CorpusError> {
    let path = path.as_ref();
    let mut sets = Vec::new();

    for (line_no, line) in read_lines(path)? {
        sets.push(parse_line::<ResponseSet>(line_no, &line)?);
    }

    if sets.is_empty() {
        return Err(CorpusError::Empty(path.display().to_string()));
    }

    tracing::info!("Loaded {} response sets from {}", sets.len(), path.display());
    Ok(sets)
}

/// Turn corpus samples into single-response sets; samples without a
/// reference response are dropped
pub fn reference_sets(samples: Vec<Sample>) -> Vec<ResponseSet> {
    samples
        .into_iter()
        .filter(|s| !s.response.trim().is_empty())
        .map(|s| ResponseSet {
            prompt: s.prompt,
            responses: vec![s.response],
        })
        .collect()
}

/// Write preference pairs as JSONL, creating parent directories as needed
pub fn write_pairs<P: AsRef<Path>>(path: P, pairs: &[PreferencePair]) -> Result<(), CorpusError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(fs::File::create(path)?);
    for pair in pairs {
        serde_json::to_writer(&mut writer, pair)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    tracing::info!("Saved {} preference pairs to {}", pairs.len(), path.display());
    Ok(())
}

/// Save an evaluation report as pretty JSON
pub fn save_report<P: AsRef<Path>>(path: P, report: &EvaluationReport) -> Result<(), CorpusError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, serde_json::to_string_pretty(report)?)?;
    tracing::info!("Saved report {} to {}", report.name, path.display());
    Ok(())
}

/// Report name for a run, tagged when only a subsample was scored
pub fn run_name(name: &str, sampled: Option<usize>) -> String {
    match sampled {
        Some(n) => format!("{}_sample{}", name, n),
        None => name.to_string(),
    }
}

/// Default report location: `{dir}/{name}_{YYYYmmdd_HHMMSS}.json`
pub fn timestamped_report_path<Tz>(dir: &Path, name: &str, at: &DateTime<Tz>) -> PathBuf
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    dir.join(format!("{}_{}.json", name, at.format("%Y%m%d_%H%M%S")))
}

pub fn load_report<P: AsRef<Path>>(path: P) -> Result<EvaluationReport, CorpusError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
