use crate::error::RecordError;
use crate::types::{Activity, Coords, StoredWorkout, Workout, WorkoutKind};
use chrono::{DateTime, FixedOffset, Local};

const ID_DIGITS: usize = 10;

impl Workout {
    pub fn running(coords: Coords, distance_km: f64, duration_min: f64, cadence_spm: f64) -> Self {
        Self::running_at(
            coords,
            distance_km,
            duration_min,
            cadence_spm,
            Local::now().fixed_offset(),
        )
    }

    pub fn cycling(
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    ) -> Self {
        Self::cycling_at(
            coords,
            distance_km,
            duration_min,
            elevation_gain_m,
            Local::now().fixed_offset(),
        )
    }

    pub fn running_at(
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        cadence_spm: f64,
        created_at: DateTime<FixedOffset>,
    ) -> Self {
        let activity = Activity::Running {
            cadence_spm,
            pace_min_per_km: pace(distance_km, duration_min),
        };
        Self::build(coords, distance_km, duration_min, activity, created_at)
    }

    pub fn cycling_at(
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
        created_at: DateTime<FixedOffset>,
    ) -> Self {
        let activity = Activity::Cycling {
            elevation_gain_m,
            speed_km_h: speed(distance_km, duration_min),
        };
        Self::build(coords, distance_km, duration_min, activity, created_at)
    }

    fn build(
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        activity: Activity,
        created_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id: id_from_timestamp(created_at),
            description: describe(activity.kind(), created_at),
            created_at,
            coords,
            distance_km,
            duration_min,
            clicks: 0,
            activity,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub const fn created_at(&self) -> DateTime<FixedOffset> {
        self.created_at
    }

    pub const fn coords(&self) -> Coords {
        self.coords
    }

    pub const fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub const fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub const fn kind(&self) -> WorkoutKind {
        self.activity.kind()
    }

    pub const fn activity(&self) -> &Activity {
        &self.activity
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub const fn clicks(&self) -> u32 {
        self.clicks
    }

    /// Pace in min/km for runs, speed in km/h for rides.
    pub const fn metric(&self) -> f64 {
        match self.activity {
            Activity::Running {
                pace_min_per_km, ..
            } => pace_min_per_km,
            Activity::Cycling { speed_km_h, .. } => speed_km_h,
        }
    }

    pub fn click(&mut self) {
        self.clicks = self.clicks.saturating_add(1);
    }
}

/// Rebuilds a workout from its persisted shape. Derived fields are
/// recomputed, so stale or hand-edited `pace`/`speed`/`description`
/// values in the blob are ignored.
impl TryFrom<StoredWorkout> for Workout {
    type Error = RecordError;

    fn try_from(s: StoredWorkout) -> Result<Self, Self::Error> {
        positive("distance", s.distance)?;
        positive("duration", s.duration)?;

        let activity = match s.kind {
            WorkoutKind::Running => {
                let cadence_spm = s.cadence.ok_or(RecordError::MissingField {
                    kind: s.kind,
                    field: "cadence",
                })?;
                positive("cadence", cadence_spm)?;
                let pace_min_per_km = pace(s.distance, s.duration);
                finite("pace", pace_min_per_km)?;
                Activity::Running {
                    cadence_spm,
                    pace_min_per_km,
                }
            }
            WorkoutKind::Cycling => {
                let elevation_gain_m = s.elevation_gain.ok_or(RecordError::MissingField {
                    kind: s.kind,
                    field: "elevationGain",
                })?;
                finite("elevationGain", elevation_gain_m)?;
                let speed_km_h = speed(s.distance, s.duration);
                finite("speed", speed_km_h)?;
                Activity::Cycling {
                    elevation_gain_m,
                    speed_km_h,
                }
            }
        };

        Ok(Self {
            description: describe(s.kind, s.date),
            id: s.id,
            created_at: s.date,
            coords: s.coords,
            distance_km: s.distance,
            duration_min: s.duration,
            clicks: s.clicks,
            activity,
        })
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), RecordError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RecordError::NotFinite { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), RecordError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(RecordError::NotPositive { field, value })
    }
}

pub fn pace(distance_km: f64, duration_min: f64) -> f64 {
    duration_min / distance_km
}

pub fn speed(distance_km: f64, duration_min: f64) -> f64 {
    distance_km / (duration_min / 60.0)
}

/// e.g. `Cycling on March 4`.
pub fn describe(kind: WorkoutKind, created_at: DateTime<FixedOffset>) -> String {
    format!("{} on {}", kind.label(), created_at.format("%B %-d"))
}

fn id_from_timestamp(created_at: DateTime<FixedOffset>) -> String {
    let ms = created_at.timestamp_millis().to_string();
    let start = ms.len().saturating_sub(ID_DIGITS);
    ms[start..].to_string()
}

/// Display rounding for pace and speed. Stored values are never rounded.
pub fn format_metric(value: f64) -> String {
    format!("{value:.1}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn running_pace_is_duration_over_distance() {
        let w = Workout::running_at(
            Coords::new(10.0, 20.0),
            5.0,
            30.0,
            180.0,
            at("2026-10-16T09:30:00+02:00"),
        );
        assert_eq!(w.kind(), WorkoutKind::Running);
        assert!((w.metric() - 6.0).abs() < f64::EPSILON);
        assert_eq!(w.description(), "Running on October 16");
        assert_eq!(w.clicks(), 0);
    }

    #[test]
    fn cycling_speed_is_km_per_hour() {
        let w = Workout::cycling_at(
            Coords::new(0.0, 0.0),
            20.0,
            60.0,
            300.0,
            at("2026-03-04T18:00:00Z"),
        );
        assert!((w.metric() - 20.0).abs() < f64::EPSILON);
        assert_eq!(w.description(), "Cycling on March 4");
    }

    #[test]
    fn metrics_are_not_rounded_at_storage() {
        let w = Workout::running(Coords::new(1.0, 2.0), 3.0, 10.0, 170.0);
        assert_eq!(w.metric(), 10.0 / 3.0);
        assert_eq!(format_metric(w.metric()), "3.3");
    }

    #[test]
    fn id_is_last_ten_digits_of_epoch_millis() {
        let created = at("2026-10-16T09:30:00.123Z");
        let w = Workout::cycling_at(Coords::new(0.0, 0.0), 1.0, 1.0, 0.0, created);
        let full = created.timestamp_millis().to_string();
        assert_eq!(w.id().len(), 10);
        assert!(full.ends_with(w.id()));
    }

    #[test]
    fn description_uses_the_recorded_offset() {
        // 23:30 UTC on the 16th is already the 17th in UTC+2.
        let w = Workout::running_at(
            Coords::new(0.0, 0.0),
            1.0,
            5.0,
            160.0,
            at("2026-10-17T01:30:00+02:00"),
        );
        assert_eq!(w.description(), "Running on October 17");
    }

    #[test]
    fn click_counts_interactions() {
        let mut w = Workout::running(Coords::new(0.0, 0.0), 1.0, 5.0, 160.0);
        w.click();
        w.click();
        assert_eq!(w.clicks(), 2);
    }

    #[test]
    fn rehydration_recomputes_derived_fields() {
        let w = Workout::running_at(
            Coords::new(10.0, 20.0),
            5.0,
            30.0,
            180.0,
            at("2026-10-16T09:30:00+02:00"),
        );
        let mut stored = StoredWorkout::from(w.clone());
        stored.pace = Some(99.0);
        stored.description = Some("tampered".to_string());

        let back = Workout::try_from(stored).unwrap();
        assert_eq!(back, w);
    }

    #[test]
    fn rehydration_rejects_zero_distance() {
        let w = Workout::running(Coords::new(0.0, 0.0), 5.0, 30.0, 180.0);
        let mut stored = StoredWorkout::from(w);
        stored.distance = 0.0;
        assert_eq!(
            Workout::try_from(stored).unwrap_err(),
            RecordError::NotPositive {
                field: "distance",
                value: 0.0
            }
        );
    }

    #[test]
    fn rehydration_requires_variant_field() {
        let w = Workout::cycling(Coords::new(0.0, 0.0), 5.0, 30.0, 10.0);
        let mut stored = StoredWorkout::from(w);
        stored.elevation_gain = None;
        assert!(matches!(
            Workout::try_from(stored),
            Err(RecordError::MissingField {
                kind: WorkoutKind::Cycling,
                ..
            })
        ));
    }

    #[test]
    fn rehydration_rejects_overflowing_metric() {
        let w = Workout::cycling(Coords::new(0.0, 0.0), 5.0, 30.0, 10.0);
        let mut stored = StoredWorkout::from(w);
        stored.distance = 1e308;
        stored.duration = 1.0;
        assert!(matches!(
            Workout::try_from(stored),
            Err(RecordError::NotFinite { field: "speed", .. })
        ));

        let w = Workout::running(Coords::new(0.0, 0.0), 5.0, 30.0, 180.0);
        let mut stored = StoredWorkout::from(w);
        stored.distance = 5e-324;
        assert!(matches!(
            Workout::try_from(stored),
            Err(RecordError::NotFinite { field: "pace", .. })
        ));
    }
}
