use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error("power requirement must be a positive, finite number of Watts (got {0})")]
    InvalidPower(f64),
}

/// An electrical load waiting to be scheduled on the grid.
///
/// The `id` is fixed at construction. A [`Load`] handed out by a [`crate::Scheduler`] is a
/// detached copy: changing its priority does not reorder the scheduler, use
/// [`crate::Scheduler::update_priority`] for that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLoad")]
pub struct Load {
    id: String,
    /// Power drawn by the load in Watts.
    power_requirement: f64,
    /// Lower value means more urgent.
    priority: i32,
}

impl Load {
    /// Creates a new [`Load`].
    /// # Errors
    /// Returns [`LoadError::InvalidPower`] when `power_requirement` is zero, negative or not finite.
    pub fn new(
        id: impl Into<String>,
        power_requirement: f64,
        priority: i32,
    ) -> Result<Self, LoadError> {
        if !(power_requirement.is_finite() && power_requirement > 0.0) {
            return Err(LoadError::InvalidPower(power_requirement));
        }
        Ok(Self {
            id: id.into(),
            power_requirement,
            priority,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn power_requirement(&self) -> f64 {
        self.power_requirement
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    /// Compares two loads by scheduling urgency:
    /// - A lower priority value leads to a higher urgency ([`Ordering::Greater`]).
    /// - Equal priority values compare as [`Ordering::Equal`], no matter the id.
    pub fn cmp_urgency(&self, other: &Self) -> Ordering {
        other.priority.cmp(&self.priority)
    }
}

#[derive(Deserialize)]
struct RawLoad {
    id: String,
    power_requirement: f64,
    priority: i32,
}

impl TryFrom<RawLoad> for Load {
    type Error = LoadError;

    fn try_from(raw: RawLoad) -> Result<Self, Self::Error> {
        Load::new(raw.id, raw.power_requirement, raw.priority)
    }
}

#[cfg(test)]
mod tests {
    use super::{Load, LoadError};
    use std::cmp::Ordering;

    #[test]
    fn new_rejects_non_positive_power() {
        assert_eq!(
            Load::new("zero", 0.0, 1).unwrap_err(),
            LoadError::InvalidPower(0.0)
        );
        assert_eq!(
            Load::new("negative", -12.5, 1).unwrap_err(),
            LoadError::InvalidPower(-12.5)
        );
    }

    #[test]
    fn new_rejects_non_finite_power() {
        assert!(Load::new("nan", f64::NAN, 1).is_err());
        assert!(Load::new("inf", f64::INFINITY, 1).is_err());
    }

    #[test]
    fn new_keeps_fields() {
        let load = Load::new("Hospital", 5000.0, 1).unwrap();
        assert_eq!(load.id(), "Hospital");
        assert_eq!(load.power_requirement(), 5000.0);
        assert_eq!(load.priority(), 1);
    }

    /// Lower priority value -> more urgent
    #[test]
    fn cmp_urgency_diff_priority() {
        let urgent = Load::new("urgent", 100.0, 1).unwrap();
        let relaxed = Load::new("relaxed", 100.0, 7).unwrap();

        assert_eq!(urgent.cmp_urgency(&relaxed), Ordering::Greater);
        assert_eq!(relaxed.cmp_urgency(&urgent), Ordering::Less);
    }

    #[test]
    fn cmp_urgency_negative_priorities() {
        let a = Load::new("a", 100.0, -3).unwrap();
        let b = Load::new("b", 100.0, 0).unwrap();

        assert_eq!(a.cmp_urgency(&b), Ordering::Greater);
    }

    #[test]
    fn cmp_urgency_equal_priority() {
        let a = Load::new("a", 10.0, 2).unwrap();
        let b = Load::new("b", 99.0, 2).unwrap();

        assert_eq!(a.cmp_urgency(&b), Ordering::Equal);
    }

    #[test]
    fn sort_loads_by_urgency() {
        let mut loads = vec![
            Load::new("School", 2000.0, 3).unwrap(),
            Load::new("Hospital", 5000.0, 1).unwrap(),
            Load::new("Residential", 1500.0, 4).unwrap(),
            Load::new("Factory", 8000.0, 2).unwrap(),
        ];
        loads.sort_by(Load::cmp_urgency);

        let ids: Vec<&str> = loads.iter().map(Load::id).collect();
        assert_eq!(ids, vec!["Residential", "School", "Factory", "Hospital"]);
    }

    #[test]
    fn set_priority_on_copy() {
        let mut load = Load::new("Factory", 8000.0, 2).unwrap();
        load.set_priority(-1);
        assert_eq!(load.priority(), -1);
    }

    #[test]
    fn deserialize_validates_power() {
        let ok: Load =
            serde_json::from_str(r#"{"id":"School","power_requirement":2000.0,"priority":3}"#)
                .unwrap();
        assert_eq!(ok.id(), "School");

        let err = serde_json::from_str::<Load>(
            r#"{"id":"Broken","power_requirement":-1.0,"priority":3}"#,
        );
        assert!(err.is_err());
    }
}
