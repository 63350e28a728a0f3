use std::{collections::HashSet, fs, path::Path};

use anyhow::{Context, bail};
use load_scheduler::Load;
use serde::Deserialize;

/// Loads to schedule plus the priority changes applied while they wait.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub loads: Vec<Load>,
    #[serde(default)]
    pub adjustments: Vec<Adjustment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Adjustment {
    pub id: String,
    pub priority: i32,
}

impl Scenario {
    /// Four consumers of different importance and an emergency that makes the residential
    /// area as urgent as the hospital.
    pub fn grid() -> anyhow::Result<Self> {
        Ok(Self {
            loads: vec![
                Load::new("Hospital", 5_000.0, 1)?,
                Load::new("School", 2_000.0, 3)?,
                Load::new("Factory", 8_000.0, 2)?,
                Load::new("Residential", 1_500.0, 4)?,
            ],
            adjustments: vec![Adjustment {
                id: "Residential".to_string(),
                priority: 1,
            }],
        })
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("could not read scenario file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid scenario file {}", path.display()))
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let scenario: Self = serde_json::from_str(raw)?;

        let mut ids = HashSet::new();
        for load in &scenario.loads {
            if !ids.insert(load.id()) {
                bail!("load id {} appears more than once", load.id());
            }
        }
        Ok(scenario)
    }
}

#[cfg(test)]
mod tests {
    use super::{Adjustment, Scenario};

    #[test]
    fn grid_scenario() {
        let scenario = Scenario::grid().unwrap();
        let ids: Vec<&str> = scenario.loads.iter().map(|l| l.id()).collect();
        assert_eq!(ids, vec!["Hospital", "School", "Factory", "Residential"]);
        assert_eq!(
            scenario.adjustments,
            vec![Adjustment {
                id: "Residential".into(),
                priority: 1
            }]
        );
    }

    #[test]
    fn from_json_without_adjustments() {
        let scenario = Scenario::from_json(
            r#"{"loads": [{"id": "Mill", "power_requirement": 750.5, "priority": -2}]}"#,
        )
        .unwrap();
        assert_eq!(scenario.loads.len(), 1);
        assert_eq!(scenario.loads[0].priority(), -2);
        assert!(scenario.adjustments.is_empty());
    }

    #[test]
    fn from_json_rejects_invalid_power() {
        let err = Scenario::from_json(
            r#"{"loads": [{"id": "Dead", "power_requirement": 0.0, "priority": 1}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("power requirement"), "{err}");
    }

    #[test]
    fn from_json_rejects_duplicate_ids() {
        let err = Scenario::from_json(
            r#"{"loads": [
                {"id": "Twin", "power_requirement": 1.0, "priority": 1},
                {"id": "Twin", "power_requirement": 2.0, "priority": 2}
            ]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Twin"));
    }

    #[test]
    fn from_path_reports_missing_file() {
        let err = Scenario::from_path(std::path::Path::new("/definitely/not/here.json"))
            .unwrap_err();
        assert!(err.to_string().contains("could not read scenario file"));
    }
}
