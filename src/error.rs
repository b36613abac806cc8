use thiserror::Error;

use crate::types::WorkoutKind;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage quota exceeded writing {key:?} ({needed} bytes, {limit} allowed)")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },

    #[error("sqlite store: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("encoding workouts: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("decoding stored workouts: {0}")]
    Decode(#[source] serde_json::Error),
}

/// A stored entry that cannot be rebuilt into a valid workout.
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("{field} must be a positive number, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{kind} workout is missing {field}")]
    MissingField {
        kind: WorkoutKind,
        field: &'static str,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid coordinates {0:?} (expected LAT,LNG)")]
pub struct ParseCoordsError(pub String);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("no position available")]
    Unavailable,

    #[error("position request denied")]
    Denied,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Input has to be positive numbers only ({field}: {input:?})")]
    InvalidInput { field: &'static str, input: String },

    #[error("Could not get your location: {0}")]
    GeolocationUnavailable(#[from] GeolocationError),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] PersistenceError),

    #[error("map is not ready yet")]
    MissingMapContext,

    #[error("no map location selected for the new workout")]
    NoSelectedLocation,

    #[error("no workout with id {0}")]
    UnknownWorkout(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_display() {
        let e = AppError::InvalidInput {
            field: "distance",
            input: "abc".to_string(),
        };
        assert_eq!(
            e.to_string(),
            r#"Input has to be positive numbers only (distance: "abc")"#
        );
    }

    #[test]
    fn quota_display() {
        let e = StoreError::QuotaExceeded {
            key: "workout".to_string(),
            needed: 12,
            limit: 4,
        };
        assert_eq!(
            e.to_string(),
            r#"storage quota exceeded writing "workout" (12 bytes, 4 allowed)"#
        );
    }

    #[test]
    fn geolocation_converts_into_app_error() {
        let app: AppError = GeolocationError::Denied.into();
        assert_eq!(
            app.to_string(),
            "Could not get your location: position request denied"
        );
    }

    #[test]
    fn store_error_is_transparent_through_persistence() {
        let e: PersistenceError = StoreError::QuotaExceeded {
            key: "k".to_string(),
            needed: 2,
            limit: 1,
        }
        .into();
        assert!(e.to_string().starts_with("storage quota exceeded"));
    }
}
