use thiserror::Error;

use crate::domain::{to_megabytes, ContainerStat, SkippedLine, Snapshot, UnitError};

/// Field separator used in the `--format` template
pub const FIELD_DELIMITER: char = ',';

#[derive(Debug, Error)]
pub enum LineParseError {
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid CPU percentage: {0}")]
    InvalidCpu(String),

    #[error(transparent)]
    Memory(#[from] UnitError),
}

pub type LineParseResult<T> = Result<T, LineParseError>;

/// Parse one `name,cpu%,used / limit` line of `docker stats` output
pub fn parse_stat_line(line: &str) -> LineParseResult<ContainerStat> {
    let line = line.trim().trim_matches('"');
    let mut fields = line.split(FIELD_DELIMITER);

    let name = fields.next().ok_or(LineParseError::MissingField("name"))?;
    let cpu = fields.next().ok_or(LineParseError::MissingField("cpu"))?;
    let memory = fields.next().ok_or(LineParseError::MissingField("memory"))?;

    Ok(ContainerStat::new(
        name,
        parse_cpu_percent(cpu)?,
        parse_memory_used(memory)?,
    ))
}

/// Parse `12.34%` into `12.34`
pub fn parse_cpu_percent(field: &str) -> LineParseResult<f64> {
    field
        .trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .map_err(|_| LineParseError::InvalidCpu(field.to_string()))
}

/// Parse the used half of `1.091GiB / 3.492GiB` into MB
pub fn parse_memory_used(field: &str) -> LineParseResult<f64> {
    // split always yields at least one item
    let used = field.split('/').next().unwrap_or(field);
    Ok(to_megabytes(used)?)
}

/// Parse the whole stdout of a single `docker stats` run.
///
/// Bad lines never abort the snapshot; they are collected into
/// `Snapshot::skipped` with the reason. Blank lines are ignored.
pub fn parse_snapshot(output: &str) -> Snapshot {
    let mut stats = Vec::new();
    let mut skipped = Vec::new();

    for (index, line) in output.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        match parse_stat_line(line) {
            Ok(stat) => stats.push(stat),
            Err(e) => skipped.push(SkippedLine {
                line_number: index + 1,
                line: line.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    Snapshot::new(stats, skipped)
}
