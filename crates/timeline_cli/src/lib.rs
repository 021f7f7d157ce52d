//! Timeline CLI support
//!
//! File handling shared by the `timeline_cli` binary: read an event log
//! from a file or stdin, consolidate it, write JSON back out.

use anyhow::{Context, Result};
use match_timeline::{
    apply_ui_event_types, consolidate_with_summary, parse_event_log, NameMap, TimelineConfig,
    TimelineSummary,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

/// Options for one `consolidate` run
#[derive(Debug, Clone, Default)]
pub struct ConsolidateOptions {
    /// Event log path; stdin when absent
    pub input: Option<PathBuf>,
    /// Optional YAML config
    pub config: Option<PathBuf>,
    /// Translate event types for display
    pub ui_types: bool,
    pub pretty: bool,
}

/// Read the whole input (file or stdin) as text
pub fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read event log {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read event log from stdin")?;
            Ok(buf)
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<TimelineConfig> {
    match path {
        Some(path) => TimelineConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(TimelineConfig::default()),
    }
}

/// Consolidate `raw` and render the timeline as JSON
pub fn render_timeline(
    raw: &str,
    config: &TimelineConfig,
    ui_types: bool,
    pretty: bool,
) -> Result<(String, TimelineSummary)> {
    let log = parse_event_log(raw).context("event log is not valid JSON")?;
    let (mut timeline, summary) = consolidate_with_summary(&log.events, Some(&log.names), config);
    if ui_types {
        apply_ui_event_types(&mut timeline);
    }

    let json = if pretty {
        serde_json::to_string_pretty(&timeline)?
    } else {
        serde_json::to_string(&timeline)?
    };
    Ok((json, summary))
}

pub fn run_consolidate(opts: &ConsolidateOptions) -> Result<(String, TimelineSummary)> {
    let config = load_config(opts.config.as_deref())?;
    let raw = read_input(opts.input.as_deref())?;
    let (json, summary) = render_timeline(&raw, &config, opts.ui_types, opts.pretty)?;
    info!(
        input = summary.input_events,
        output = summary.output_events,
        "consolidated event log"
    );
    Ok((json, summary))
}

/// Resolve player names for an event log
pub fn run_names(input: Option<&Path>) -> Result<NameMap> {
    let raw = read_input(input)?;
    let log = parse_event_log(&raw).context("event log is not valid JSON")?;
    Ok(log.names)
}

pub fn write_output(path: Option<&Path>, body: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, body)
            .with_context(|| format!("failed to write timeline {}", path.display())),
        None => {
            println!("{body}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::io::Write;

    const LOG: &str = r#"[
        {"event_type": "goalie_enters", "correlation_id": "g", "player_id": "k1", "ordinal": 3,
         "data": {"goalie_name": "Keeper"}},
        {"event_type": "match_started", "ordinal": 1},
        {"event_type": "substitution_out", "correlation_id": "s", "player_id": "p2", "ordinal": 5},
        {"event_type": "substitution_in", "correlation_id": "s", "player_id": "p3", "ordinal": 4}
    ]"#;

    fn temp_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_run_consolidate_from_file() {
        let input = temp_file(LOG);
        let opts = ConsolidateOptions {
            input: Some(input.path().to_path_buf()),
            ..Default::default()
        };

        let (json, summary) = run_consolidate(&opts).unwrap();
        let out: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(summary.input_events, 4);
        assert_eq!(summary.output_events, 3);
        let types: Vec<&str> = out
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|e| e["event_type"].as_str())
            .collect();
        assert_eq!(types, vec!["match_started", "goalie_enters", "substitution"]);
    }

    #[test]
    fn test_ui_types_and_config() {
        let input = temp_file(LOG);
        let config = temp_file("position_id_prefix: keeper\n");
        let opts = ConsolidateOptions {
            input: Some(input.path().to_path_buf()),
            config: Some(config.path().to_path_buf()),
            ui_types: true,
            pretty: true,
        };

        let (json, _) = run_consolidate(&opts).unwrap();
        let out: Value = serde_json::from_str(&json).unwrap();

        assert!(json.contains('\n'));
        assert_eq!(out[0]["event_type"], "match_start");
        assert_eq!(out[1]["event_type"], "goalie_assignment");
        assert_eq!(out[1]["id"], "keeper-g");
    }

    #[test]
    fn test_run_names() {
        let input = temp_file(LOG);
        let names = run_names(Some(input.path())).unwrap();
        assert_eq!(names.get("k1"), Some("Keeper"));
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_missing_input_reports_path() {
        let err = read_input(Some(Path::new("/nonexistent/events.json"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/events.json"));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let err = render_timeline("{oops", &TimelineConfig::default(), false, false).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn test_write_output_to_file() {
        let out = tempfile::NamedTempFile::new().unwrap();
        write_output(Some(out.path()), "[]").unwrap();
        assert_eq!(std::fs::read_to_string(out.path()).unwrap(), "[]");
    }
}
