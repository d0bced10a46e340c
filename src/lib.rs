pub mod application;
pub mod domain;
pub mod infrastructure;

use application::commands::{
    load_events_impl, parse_datetime_input, set_month_offset_impl, timeline_frame_impl, AppState,
};
use infrastructure::error::InfraError;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

const USAGE: &str = "usage: event-timeline <workspace_dir> <events.json> [month_offset] [now]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub workspace_root: PathBuf,
    pub events_path: PathBuf,
    pub month_offset: i32,
    pub now: Option<String>,
}

pub fn parse_args<I>(args: I) -> Result<CliArgs, InfraError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let workspace_root = args
        .next()
        .ok_or_else(|| InfraError::InvalidInput(USAGE.to_string()))?;
    let events_path = args
        .next()
        .ok_or_else(|| InfraError::InvalidInput(USAGE.to_string()))?;
    let month_offset = args
        .next()
        .map(|value| {
            value.trim().parse::<i32>().map_err(|error| {
                InfraError::InvalidInput(format!("invalid month_offset '{value}': {error}"))
            })
        })
        .transpose()?
        .unwrap_or(0);
    let now = args.next();
    if args.next().is_some() {
        return Err(InfraError::InvalidInput(USAGE.to_string()));
    }

    Ok(CliArgs {
        workspace_root: PathBuf::from(workspace_root),
        events_path: PathBuf::from(events_path),
        month_offset,
        now,
    })
}

/// Loads events from a JSON file and renders one timeline frame as JSON.
/// `now`, when given, replaces the wall clock for the whole run.
pub fn render_frame(args: &CliArgs) -> Result<String, InfraError> {
    let mut state = AppState::new(args.workspace_root.clone())?;
    if let Some(now) = args.now.as_deref() {
        let instant = parse_datetime_input(now.trim(), state.settings().timezone)?;
        state = state.with_now_provider(Arc::new(move || instant));
    }
    let raw = fs::read_to_string(&args.events_path)?;
    load_events_impl(&state, raw)
        .inspect_err(|error| state.log_error("load_events", &error.to_string()))?;
    if args.month_offset != 0 {
        set_month_offset_impl(&state, args.month_offset)
            .inspect_err(|error| state.log_error("set_month_offset", &error.to_string()))?;
    }
    let frame = timeline_frame_impl(&state, None)
        .inspect_err(|error| state.log_error("timeline_frame", &error.to_string()))?;
    Ok(serde_json::to_string_pretty(&frame)?)
}

pub fn run() -> i32 {
    let result = parse_args(std::env::args().skip(1)).and_then(|args| render_frame(&args));
    match result {
        Ok(output) => {
            println!("{output}");
            0
        }
        Err(error) => {
            eprintln!("{error}");
            1
        }
    }
}
