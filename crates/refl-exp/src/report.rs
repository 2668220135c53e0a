use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use refl_core::errors::ReflError;
use refl_core::provenance::{RunProvenance, SchemaVersion};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::plan::{DesignPlan, StudyOutcome};
use crate::serde::{from_json_slice, to_canonical_json_bytes};

/// File name used by [`write_report`].
pub const REPORT_FILE: &str = "design_report.json";

/// Result of one study of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyReport {
    /// Study kind.
    pub label: String,
    /// Name of the sample studied.
    pub sample: String,
    /// Seed derived for this study from the plan seed.
    pub seed: u64,
    /// Result of the study.
    pub outcome: StudyOutcome,
}

/// Results of a design plan with the provenance needed to reproduce them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignReport {
    /// Report layout version.
    pub schema: SchemaVersion,
    /// Name of the plan.
    pub plan_name: String,
    /// Hash of the plan that produced the report.
    pub plan_hash: String,
    /// One entry per study, in plan order.
    pub studies: Vec<StudyReport>,
    /// Seed, samples, tools and time of the run.
    pub provenance: RunProvenance,
}

impl DesignReport {
    /// Report of `studies` run from `plan`, stamped with the current time.
    pub fn new(plan: &DesignPlan, studies: Vec<StudyReport>) -> Result<Self, ReflError> {
        let plan_hash = plan.plan_hash()?;
        let provenance = RunProvenance::new(&plan_hash, plan.seed, Utc::now().to_rfc3339())
            .with_samples(studies.iter().map(|study| study.sample.as_str()))
            .with_tool("refl-exp", env!("CARGO_PKG_VERSION"));
        Ok(Self {
            schema: SchemaVersion::default(),
            plan_name: plan.name.clone(),
            plan_hash,
            studies,
            provenance,
        })
    }
}

/// Writes `report` as canonical JSON to `<dir>/design_report.json`.
pub fn write_report(report: &DesignReport, dir: &Path) -> Result<PathBuf, ReflError> {
    fs::create_dir_all(dir).map_err(|err| ReflError::io("report-dir", dir, err))?;
    let path = dir.join(REPORT_FILE);
    let bytes = to_canonical_json_bytes(report)?;
    fs::write(&path, bytes).map_err(|err| ReflError::io("report-write", &path, err))?;
    info!(path = %path.display(), "wrote design report");
    Ok(path)
}

/// Reads a report written by [`write_report`].
pub fn load_report(path: &Path) -> Result<DesignReport, ReflError> {
    let bytes = fs::read(path).map_err(|err| ReflError::io("report-read", path, err))?;
    from_json_slice(&bytes)
}
