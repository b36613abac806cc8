use crate::types::{Activity, Workout};
use crate::workout::format_metric;
use std::fmt::Write as _;

pub const POPUP_MAX_WIDTH: u32 = 250;
pub const POPUP_MIN_WIDTH: u32 = 100;

/// What a map marker shows. Popups stay open until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerPopup {
    pub class_name: String,
    pub content: String,
    pub max_width: u32,
    pub min_width: u32,
}

pub fn marker_popup(workout: &Workout) -> MarkerPopup {
    let kind = workout.kind();
    MarkerPopup {
        class_name: format!("{kind}-popup"),
        content: format!("{} {}", kind.icon(), workout.description()),
        max_width: POPUP_MAX_WIDTH,
        min_width: POPUP_MIN_WIDTH,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detail {
    pub icon: &'static str,
    pub value: String,
    pub unit: &'static str,
}

/// One entry in the workout list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub id: String,
    pub class_name: String,
    pub title: String,
    pub details: Vec<Detail>,
}

pub fn list_item(workout: &Workout) -> ListItem {
    let kind = workout.kind();
    let mut details = vec![
        Detail {
            icon: kind.icon(),
            value: workout.distance_km().to_string(),
            unit: "km",
        },
        Detail {
            icon: "⏱",
            value: workout.duration_min().to_string(),
            unit: "min",
        },
    ];

    match *workout.activity() {
        Activity::Running {
            cadence_spm,
            pace_min_per_km,
        } => {
            details.push(Detail {
                icon: "⚡️",
                value: format_metric(pace_min_per_km),
                unit: "min/km",
            });
            details.push(Detail {
                icon: "🦶🏼",
                value: cadence_spm.to_string(),
                unit: "spm",
            });
        }
        Activity::Cycling {
            elevation_gain_m,
            speed_km_h,
        } => {
            details.push(Detail {
                icon: "⚡️",
                value: format_metric(speed_km_h),
                unit: "km/h",
            });
            details.push(Detail {
                icon: "⛰",
                value: elevation_gain_m.to_string(),
                unit: "m",
            });
        }
    }

    ListItem {
        id: workout.id().to_string(),
        class_name: format!("workout workout--{kind}"),
        title: workout.description().to_string(),
        details,
    }
}

impl ListItem {
    /// Single-line text form: `[id] title | 5 km | 30 min | 6.0 min/km | 180 spm`.
    pub fn to_line(&self) -> String {
        let mut line = format!("[{}] {}", self.id, self.title);
        for d in &self.details {
            let _ = write!(line, " | {} {} {}", d.icon, d.value, d.unit);
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coords;
    use chrono::DateTime;

    fn run() -> Workout {
        let t = DateTime::parse_from_rfc3339("2026-10-16T09:30:00+02:00").unwrap();
        Workout::running_at(Coords::new(10.0, 20.0), 5.0, 30.0, 180.0, t)
    }

    #[test]
    fn popup_for_running() {
        let p = marker_popup(&run());
        assert_eq!(p.class_name, "running-popup");
        assert_eq!(p.content, "🏃‍♂️ Running on October 16");
    }

    #[test]
    fn list_item_rounds_metric_only_for_display() {
        let t = DateTime::parse_from_rfc3339("2026-10-16T09:30:00Z").unwrap();
        let ride = Workout::cycling_at(Coords::new(0.0, 0.0), 10.0, 27.0, 120.0, t);
        let item = list_item(&ride);
        assert_eq!(item.class_name, "workout workout--cycling");
        let units: Vec<_> = item.details.iter().map(|d| d.unit).collect();
        assert_eq!(units, ["km", "min", "km/h", "m"]);
        assert_eq!(item.details[2].value, "22.2");
        assert_eq!(item.details[3].value, "120");
    }

    #[test]
    fn list_line_for_running() {
        let item = list_item(&run());
        let line = item.to_line();
        assert!(line.starts_with(&format!("[{}] Running on October 16", item.id)));
        assert!(line.contains("| ⚡️ 6.0 min/km"));
        assert!(line.contains("| 🦶🏼 180 spm"));
    }
}
