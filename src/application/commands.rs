use crate::application::bootstrap::bootstrap_workspace;
use crate::application::interaction::InteractionController;
use crate::application::timeline::{ClickOutcome, TimelineFrame, TimelineView};
use crate::domain::layout::rank;
use crate::domain::models::{DisplayStatus, Event, EventCategory, LocalNow};
use crate::domain::status::resolve_display;
use crate::infrastructure::config::TimelineSettings;
use crate::infrastructure::error::InfraError;
use crate::infrastructure::event_cache::{EventSnapshotRepository, InMemoryEventSnapshotRepository};
use crate::infrastructure::event_mapper::{decode_events, parse_instant};
use crate::infrastructure::lookup::{
    BarPalette, DefaultPalette, EventDetailRouter, EventRouter, LocalizedStatusLabels,
    StatusLabels,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

type NowProvider = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub struct AppState {
    config_dir: PathBuf,
    logs_dir: PathBuf,
    settings: TimelineSettings,
    events: Arc<InMemoryEventSnapshotRepository>,
    palette: Box<dyn BarPalette>,
    labels: Box<dyn StatusLabels>,
    router: Box<dyn EventRouter>,
    now_provider: NowProvider,
    runtime: Mutex<RuntimeState>,
    log_guard: Mutex<()>,
}

impl AppState {
    pub fn new(workspace_root: PathBuf) -> Result<Self, InfraError> {
        let bootstrap = bootstrap_workspace(&workspace_root)?;
        let settings = bootstrap.settings;
        let now_provider: NowProvider = Arc::new(Utc::now);
        let now = LocalNow::new(now_provider(), settings.timezone);

        Ok(Self {
            config_dir: bootstrap.config_dir,
            logs_dir: bootstrap.logs_dir,
            events: Arc::new(InMemoryEventSnapshotRepository::default()),
            palette: Box::new(DefaultPalette),
            labels: Box::new(LocalizedStatusLabels::new(settings.locale)),
            router: Box::new(EventDetailRouter),
            runtime: Mutex::new(RuntimeState {
                view: TimelineView::new(settings.metrics, &now),
            }),
            settings,
            now_provider,
            log_guard: Mutex::new(()),
        })
    }

    /// Replaces the clock and remounts the view against it.
    pub fn with_now_provider(mut self, now_provider: NowProvider) -> Self {
        let now = LocalNow::new(now_provider(), self.settings.timezone);
        self.runtime = Mutex::new(RuntimeState {
            view: TimelineView::new(self.settings.metrics, &now),
        });
        self.now_provider = now_provider;
        self
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn settings(&self) -> &TimelineSettings {
        &self.settings
    }

    pub fn command_error(&self, command: &str, error: &InfraError) -> String {
        self.log_error(command, &error.to_string());
        error.to_string()
    }

    pub fn log_info(&self, command: &str, message: &str) {
        self.append_log("info", command, message);
    }

    pub fn log_error(&self, command: &str, message: &str) {
        self.append_log("error", command, message);
    }

    fn append_log(&self, level: &str, command: &str, message: &str) {
        let Ok(_guard) = self.log_guard.lock() else {
            return;
        };
        let path = self.logs_dir.join("commands.log");
        let payload = serde_json::json!({
            "timestamp": Utc::now().to_rfc3339(),
            "level": level,
            "command": command,
            "message": message,
        });

        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let _ = writeln!(file, "{}", payload);
        }
    }

    fn local_now(&self) -> LocalNow {
        LocalNow::new((self.now_provider)(), self.settings.timezone)
    }
}

struct RuntimeState {
    view: TimelineView,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoadEventsResponse {
    pub loaded: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InteractionStateResponse {
    pub phase: String,
    pub scroll_left: f64,
    pub scrolling: bool,
    pub labels_visible: bool,
    pub has_dragged: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventStatusResponse {
    pub event_id: String,
    pub title: String,
    pub category: EventCategory,
    pub status: DisplayStatus,
    pub status_label: String,
}

pub fn load_events_impl(state: &AppState, raw: String) -> Result<LoadEventsResponse, InfraError> {
    let events = decode_events(&raw, state.settings.timezone)?;
    let loaded = events.len();
    state.events.replace_all(events)?;

    state.log_info("load_events", &format!("loaded events={loaded}"));
    Ok(LoadEventsResponse { loaded })
}

pub fn list_events_impl(state: &AppState) -> Result<Vec<Event>, InfraError> {
    state.events.list_all()
}

/// Renders the mounted view. An explicit `now` changes the evaluation
/// instant only; the window stays the one chosen at mount or month change.
pub fn timeline_frame_impl(
    state: &AppState,
    now: Option<String>,
) -> Result<TimelineFrame, InfraError> {
    let now = resolve_now(state, now.as_deref())?;
    let events = state.events.list_all()?;
    let mut runtime = lock_runtime(state)?;
    runtime.view.controller_mut().settle(now.instant);
    Ok(runtime
        .view
        .frame(&events, &now, state.palette.as_ref(), state.labels.as_ref()))
}

pub fn set_month_offset_impl(
    state: &AppState,
    month_offset: i32,
) -> Result<TimelineFrame, InfraError> {
    let now = state.local_now();
    let events = state.events.list_all()?;
    let frame = {
        let mut runtime = lock_runtime(state)?;
        runtime.view.set_month_offset(month_offset, &now);
        runtime
            .view
            .frame(&events, &now, state.palette.as_ref(), state.labels.as_ref())
    };

    state.log_info(
        "set_month_offset",
        &format!(
            "month_offset={month_offset} window_start={} bars={}",
            frame.window_start,
            frame.bars.len()
        ),
    );
    Ok(frame)
}

pub fn pointer_down_impl(
    state: &AppState,
    pointer_x: f64,
) -> Result<InteractionStateResponse, InfraError> {
    let pointer_x = finite_input(pointer_x, "pointer_x")?;
    let mut runtime = lock_runtime(state)?;
    runtime.view.controller_mut().pointer_down(pointer_x);
    Ok(to_interaction_response(runtime.view.controller()))
}

pub fn pointer_move_impl(
    state: &AppState,
    pointer_x: f64,
) -> Result<InteractionStateResponse, InfraError> {
    let pointer_x = finite_input(pointer_x, "pointer_x")?;
    let at = (state.now_provider)();
    let mut runtime = lock_runtime(state)?;
    runtime.view.controller_mut().pointer_move(pointer_x, at);
    Ok(to_interaction_response(runtime.view.controller()))
}

pub fn pointer_up_impl(state: &AppState) -> Result<InteractionStateResponse, InfraError> {
    let mut runtime = lock_runtime(state)?;
    runtime.view.controller_mut().pointer_up();
    Ok(to_interaction_response(runtime.view.controller()))
}

pub fn pointer_leave_impl(state: &AppState) -> Result<InteractionStateResponse, InfraError> {
    let mut runtime = lock_runtime(state)?;
    runtime.view.controller_mut().pointer_leave();
    Ok(to_interaction_response(runtime.view.controller()))
}

pub fn scroll_impl(state: &AppState, scroll_left: f64) -> Result<InteractionStateResponse, InfraError> {
    let scroll_left = finite_input(scroll_left, "scroll_left")?;
    let at = (state.now_provider)();
    let mut runtime = lock_runtime(state)?;
    runtime.view.controller_mut().on_scroll(scroll_left, at);
    Ok(to_interaction_response(runtime.view.controller()))
}

pub fn settle_scroll_impl(state: &AppState) -> Result<InteractionStateResponse, InfraError> {
    let at = (state.now_provider)();
    let mut runtime = lock_runtime(state)?;
    runtime.view.controller_mut().settle(at);
    Ok(to_interaction_response(runtime.view.controller()))
}

pub fn set_viewport_width_impl(
    state: &AppState,
    viewport_width: f64,
) -> Result<InteractionStateResponse, InfraError> {
    let viewport_width = finite_input(viewport_width, "viewport_width")?;
    let mut runtime = lock_runtime(state)?;
    runtime.view.controller_mut().set_viewport_width(viewport_width);
    Ok(to_interaction_response(runtime.view.controller()))
}

pub fn click_bar_impl(state: &AppState, event_id: String) -> Result<ClickOutcome, InfraError> {
    let event = state
        .events
        .get_by_id(&event_id)?
        .ok_or_else(|| InfraError::UnknownEvent(event_id.trim().to_string()))?;
    let now = state.local_now();
    let events = state.events.list_all()?;
    let outcome = {
        let runtime = lock_runtime(state)?;
        let bars = runtime.view.bars(&events, &now);
        runtime.view.click(&event.id, &bars, state.router.as_ref())
    };

    match &outcome {
        ClickOutcome::Navigate { route } => {
            state.log_info("click_bar", &format!("event_id={} route={route}", event.id));
        }
        ClickOutcome::Swallowed => {
            state.log_info("click_bar", &format!("event_id={} swallowed", event.id));
        }
    }
    Ok(outcome)
}

/// Statuses for list views: deduplicated, ranked, with the last-day
/// refinement.
pub fn event_statuses_impl(
    state: &AppState,
    now: Option<String>,
) -> Result<Vec<EventStatusResponse>, InfraError> {
    let now = resolve_now(state, now.as_deref())?;
    let events = state.events.list_all()?;
    Ok(rank(&events)
        .into_iter()
        .map(|event| {
            let status = resolve_display(&event, &now);
            EventStatusResponse {
                status_label: state.labels.label(status),
                event_id: event.id,
                title: event.title,
                category: event.category,
                status,
            }
        })
        .collect())
}

fn lock_runtime(state: &AppState) -> Result<MutexGuard<'_, RuntimeState>, InfraError> {
    state
        .runtime
        .lock()
        .map_err(|error| InfraError::LockPoisoned(format!("runtime lock poisoned: {error}")))
}

fn to_interaction_response(controller: &InteractionController) -> InteractionStateResponse {
    InteractionStateResponse {
        phase: controller.phase().as_str().to_string(),
        scroll_left: controller.scroll_left(),
        scrolling: controller.is_scrolling(),
        labels_visible: controller.labels_visible(),
        has_dragged: controller.has_dragged(),
    }
}

fn finite_input(value: f64, field_name: &str) -> Result<f64, InfraError> {
    if !value.is_finite() {
        return Err(InfraError::InvalidInput(format!("{field_name} must be finite")));
    }
    Ok(value)
}

fn resolve_now(state: &AppState, now: Option<&str>) -> Result<LocalNow, InfraError> {
    let Some(value) = now.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(state.local_now());
    };
    let instant = parse_datetime_input(value, state.settings.timezone)?;
    Ok(LocalNow::new(instant, state.settings.timezone))
}

/// Parses an RFC 3339 instant or a `YYYY-MM-DD` date at local midnight.
pub fn parse_datetime_input(value: &str, tz: chrono_tz::Tz) -> Result<DateTime<Utc>, InfraError> {
    parse_instant(value, tz, |value| {
        InfraError::InvalidInput(format!("now must be RFC3339 or YYYY-MM-DD, got '{value}'"))
    })
}
