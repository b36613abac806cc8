use crate::config::AppConfig;
use crate::dlog;
use crate::error::{AppError, GeolocationError};
use crate::persistence::WorkoutRepository;
use crate::render::{ListItem, MarkerPopup, list_item, marker_popup};
use crate::store::KeyValueStore;
use crate::types::{Coords, FormInput, FormState, Workout, WorkoutKind};

pub const LOCATION_ALERT: &str = "Could not get your location...";
pub const INVALID_INPUT_ALERT: &str = "Input has to be positive numbers only...";

/// Single-shot position lookup.
pub trait GeolocationProvider {
    fn request_position(&mut self) -> Result<Coords, GeolocationError>;
}

/// Handle to a map created around the user's position.
pub trait MapWidget {
    fn add_marker(&mut self, coords: Coords, popup: &MarkerPopup);
    fn recenter(&mut self, coords: Coords, zoom: f64);
}

/// The form and list surface next to the map.
pub trait View {
    /// Blocking notice to the user.
    fn alert(&mut self, message: &str);
    fn show_form(&mut self, anchor: Coords);
    /// Hides the form and clears its inputs.
    fn hide_form(&mut self);
    /// Shows the cadence field for runs or the elevation field for rides.
    fn toggle_kind_fields(&mut self, kind: WorkoutKind);
    fn render_workout(&mut self, item: &ListItem);
    /// Removes every rendered list entry.
    fn clear_workouts(&mut self);
}

/// Session context: owns the workout list, the form state and the map
/// handle once the map exists.
pub struct App<S, V, M> {
    config: AppConfig,
    repo: WorkoutRepository<S>,
    view: V,
    map: Option<M>,
    workouts: Vec<Workout>,
    form: FormState,
    selected_kind: WorkoutKind,
    /// Set when stored history could neither be read nor backed up, so a
    /// save would overwrite data this session never saw.
    saves_blocked: bool,
}

impl<S, V, M> App<S, V, M>
where
    S: KeyValueStore,
    V: View,
    M: MapWidget,
{
    /// Loads stored history and renders it into the list. Markers wait
    /// for the map, see [`App::on_position`].
    pub fn start(config: AppConfig, store: S, mut view: V) -> Self {
        let mut repo = WorkoutRepository::with_key(store, config.storage_key.clone());

        let (workouts, damaged) = match repo.load_report() {
            Ok(report) => (report.workouts, report.skipped > 0),
            Err(e) => {
                tracing::warn!(error = %e, "could not load stored workouts, starting empty");
                (Vec::new(), true)
            }
        };
        let saves_blocked = damaged && !back_up_history(&mut repo);

        for w in &workouts {
            view.render_workout(&list_item(w));
        }
        tracing::info!(workouts = workouts.len(), key = %repo.key(), "session started");

        Self {
            config,
            repo,
            view,
            map: None,
            workouts,
            form: FormState::Hidden,
            selected_kind: WorkoutKind::Running,
            saves_blocked,
        }
    }

    pub fn locate<G, F>(&mut self, geo: &mut G, create_map: F) -> Result<(), AppError>
    where
        G: GeolocationProvider,
        F: FnOnce(Coords, f64) -> M,
    {
        let position = geo.request_position();
        self.on_position(position, create_map)
    }

    /// Creates the map at `position` and pins every known workout on it.
    /// On failure the user is told and the session carries on without a map.
    pub fn on_position<F>(
        &mut self,
        position: Result<Coords, GeolocationError>,
        create_map: F,
    ) -> Result<(), AppError>
    where
        F: FnOnce(Coords, f64) -> M,
    {
        let center = match position {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, "geolocation failed");
                self.view.alert(LOCATION_ALERT);
                return Err(e.into());
            }
        };

        let mut map = create_map(center, self.config.zoom_level);
        for w in &self.workouts {
            map.add_marker(w.coords(), &marker_popup(w));
        }
        dlog!("map ready center={} markers={}", center, self.workouts.len());
        self.map = Some(map);
        Ok(())
    }

    pub fn on_map_click(&mut self, coords: Coords) -> Result<(), AppError> {
        if self.map.is_none() {
            tracing::warn!(%coords, "map click before the map was ready");
            return Err(AppError::MissingMapContext);
        }
        self.form = FormState::Visible { anchor: coords };
        self.view.show_form(coords);
        Ok(())
    }

    pub fn toggle_kind(&mut self) {
        self.selected_kind = self.selected_kind.toggled();
        self.view.toggle_kind_fields(self.selected_kind);
    }

    /// Switches the form to `kind`; no-op when it is already selected.
    pub fn choose_kind(&mut self, kind: WorkoutKind) {
        if self.selected_kind != kind {
            self.toggle_kind();
        }
    }

    /// Validates the form as the selected kind, records the workout at the
    /// clicked point and persists the full list. Invalid input alerts and
    /// creates nothing.
    pub fn submit(&mut self, input: &FormInput) -> Result<&Workout, AppError> {
        let FormState::Visible { anchor } = self.form else {
            return Err(AppError::NoSelectedLocation);
        };

        let kind = self.selected_kind;
        let workout = match build_workout(kind, input, anchor) {
            Ok(w) => w,
            Err(e) => {
                tracing::warn!(error = %e, %kind, "rejected workout input");
                self.view.alert(INVALID_INPUT_ALERT);
                return Err(e);
            }
        };

        if let Some(map) = self.map.as_mut() {
            map.add_marker(workout.coords(), &marker_popup(&workout));
        }
        self.view.render_workout(&list_item(&workout));

        self.form = FormState::Hidden;
        self.view.hide_form();

        tracing::info!(
            id = %workout.id(),
            kind = %workout.kind(),
            distance_km = workout.distance_km(),
            duration_min = workout.duration_min(),
            "workout recorded"
        );
        self.workouts.push(workout);
        self.persist();

        Ok(&self.workouts[self.workouts.len() - 1])
    }

    /// Counts a click on a list entry and moves the map to it.
    pub fn select(&mut self, id: &str) -> Result<&Workout, AppError> {
        let idx = self
            .workouts
            .iter()
            .position(|w| w.id() == id)
            .ok_or_else(|| AppError::UnknownWorkout(id.to_string()))?;

        let workout = &mut self.workouts[idx];
        workout.click();

        let Some(map) = self.map.as_mut() else {
            tracing::warn!(id, "cannot recenter without a map");
            return Err(AppError::MissingMapContext);
        };
        map.recenter(workout.coords(), self.config.zoom_level);
        dlog!("recentered id={} clicks={}", id, workout.clicks());
        Ok(&self.workouts[idx])
    }

    /// Wipes stored history and returns the session to its initial state.
    /// A new map needs a fresh position lookup afterwards.
    pub fn reset(&mut self) {
        match self.repo.clear() {
            Ok(()) => self.saves_blocked = false,
            Err(e) => tracing::warn!(error = %e, "could not clear stored workouts"),
        }
        self.workouts.clear();
        self.view.clear_workouts();
        self.map = None;
        self.form = FormState::Hidden;
        self.view.hide_form();
        self.choose_kind(WorkoutKind::Running);
        tracing::info!("history reset");
    }

    fn persist(&mut self) {
        if self.saves_blocked {
            tracing::warn!(
                workouts = self.workouts.len(),
                key = %self.repo.key(),
                "stored history is unreadable and has no backup, not overwriting it"
            );
            return;
        }
        if let Err(e) = self.repo.save(&self.workouts) {
            tracing::warn!(
                error = %e,
                workouts = self.workouts.len(),
                "could not persist workouts, keeping them in memory"
            );
        }
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub const fn form_state(&self) -> FormState {
        self.form
    }

    pub const fn selected_kind(&self) -> WorkoutKind {
        self.selected_kind
    }

    pub const fn saves_blocked(&self) -> bool {
        self.saves_blocked
    }

    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    pub const fn view(&self) -> &V {
        &self.view
    }

    pub const fn map(&self) -> Option<&M> {
        self.map.as_ref()
    }

    pub const fn repository(&self) -> &WorkoutRepository<S> {
        &self.repo
    }
}

/// Copies unreadable history aside before anything can overwrite it.
/// Returns false when no copy could be made.
fn back_up_history<S: KeyValueStore>(repo: &mut WorkoutRepository<S>) -> bool {
    match repo.backup() {
        Ok(Some(key)) => {
            tracing::warn!(backup = %key, "stored history was not fully readable, kept a copy");
            true
        }
        Ok(None) => true,
        Err(e) => {
            tracing::warn!(error = %e, "could not back up stored history, saving is disabled");
            false
        }
    }
}

fn build_workout(kind: WorkoutKind, input: &FormInput, at: Coords) -> Result<Workout, AppError> {
    let distance = positive_input("distance", &input.distance)?;
    let duration = positive_input("duration", &input.duration)?;

    let (workout, metric) = match kind {
        WorkoutKind::Running => {
            let cadence = positive_input("cadence", &input.cadence)?;
            (Workout::running(at, distance, duration, cadence), "pace")
        }
        WorkoutKind::Cycling => {
            let elevation = non_negative_input("elevation", &input.elevation)?;
            (Workout::cycling(at, distance, duration, elevation), "speed")
        }
    };

    // finite inputs can still divide out to infinity
    if !workout.metric().is_finite() {
        return Err(AppError::InvalidInput {
            field: metric,
            input: format!("{} km in {} min", input.distance.trim(), input.duration.trim()),
        });
    }
    Ok(workout)
}

/// Blank or non-numeric text reads as NaN, so it never passes a check.
fn parse_number(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(f64::NAN)
}

fn positive_input(field: &'static str, text: &str) -> Result<f64, AppError> {
    let v = parse_number(text);
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(AppError::InvalidInput {
            field,
            input: text.to_string(),
        })
    }
}

fn non_negative_input(field: &'static str, text: &str) -> Result<f64, AppError> {
    let v = parse_number(text);
    if v.is_finite() && v >= 0.0 {
        Ok(v)
    } else {
        Err(AppError::InvalidInput {
            field,
            input: text.to_string(),
        })
    }
}
