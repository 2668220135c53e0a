//! YAML design plans describing a batch of studies.

use std::fs;
use std::path::{Path, PathBuf};

use refl_core::derive_substream_seed;
use refl_core::errors::{ErrorInfo, ReflError};
use refl_model::{BilayerDmpc, Sample, SampleYig};
use refl_sim::{AngleTime, DirectBeam};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::angles::{angle_choice, AngleChoice};
use crate::kinetics::kinetics;
use crate::log_ratio::{calc_log_ratios, LogRatios};
use crate::optimise::{
    optimise_angle_times, optimise_kinetics, optimise_underlayers, optimise_yig_thickness,
    DifferentialEvolutionOptions, OptimisedAngleTimes, OptimisedKinetics, OptimisedThicknesses,
    OptimisedUnderlayers,
};
use crate::report::{DesignReport, StudyReport};
use crate::serde::{from_yaml_slice, stable_hash_string, to_yaml_string};
use crate::sweep::{Grid2D, Scheduler, Values};
use crate::target::LibrarySample;
use crate::underlayer::{magnetic_underlayer_sweep, underlayer_choice, UnderlayerChoice};

/// A single design study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Study {
    /// Pt magnetic SLD information over YIG and Pt thicknesses.
    MagneticSweep {
        /// YIG thicknesses in Å.
        yig_thicks: Values,
        /// Pt thicknesses in Å.
        pt_thicks: Values,
        /// Measurement plan.
        angle_times: Vec<AngleTime>,
    },
    /// Single underlayer choice beneath the DMPC bilayer.
    Underlayer {
        /// Underlayer thicknesses in Å.
        thicknesses: Values,
        /// Underlayer SLDs.
        slds: Values,
        /// Bulk water SLDs measured.
        contrasts: Vec<f64>,
        /// Measurement plan of each contrast.
        angle_times: Vec<AngleTime>,
    },
    /// Best angle to add to an initial plan.
    Angles {
        /// Library sample name.
        sample: String,
        /// Bulk water SLDs; the sample's usual conditions when empty.
        #[serde(default)]
        contrasts: Vec<f64>,
        /// Plan the candidate angle is added to.
        #[serde(default)]
        initial: Vec<AngleTime>,
        /// Candidate angles in degrees.
        angles: Values,
        /// Points of the added angle.
        points: usize,
        /// Counting time of the added angle.
        time: f64,
    },
    /// Angle and contrast choice for the bilayer's area per molecule changing over time.
    Kinetics {
        /// Measurement angles in degrees.
        angles: Values,
        /// Bulk water SLDs.
        contrasts: Values,
        /// Area per molecule values the kinetic information is summed over.
        kinetic_values: Values,
        /// Points per measurement.
        points: usize,
        /// Counting time per measurement.
        time: f64,
    },
    /// Log-likelihood ratio of a magnetic Pt layer over counting time.
    LogRatios {
        /// Template plan; its times are multiplied by each entry of `times`.
        angle_times: Vec<AngleTime>,
        /// Multipliers applied to the template counting times.
        times: Values,
        /// Platinum magnetic SLD of the magnetic model.
        pt_mag: f64,
        /// Simulations averaged for each time.
        #[serde(default = "default_repeats")]
        repeats: usize,
    },
    /// Angles and time split maximising the minimum eigenvalue.
    OptimiseAngleTimes {
        /// Library sample name.
        sample: String,
        /// Bulk water SLDs; the sample's usual conditions when empty.
        #[serde(default)]
        contrasts: Vec<f64>,
        /// Number of angles.
        num_angles: usize,
        /// Range of each angle in degrees.
        angle_bounds: (f64, f64),
        /// Points per angle.
        points: usize,
        /// Time shared between the angles.
        total_time: f64,
    },
    /// Underlayers beneath the DMPC bilayer maximising the minimum eigenvalue.
    OptimiseUnderlayers {
        /// Number of underlayers.
        num_underlayers: usize,
        /// Measurement plan of each contrast.
        angle_times: Vec<AngleTime>,
        /// Bulk water SLDs measured.
        contrasts: Vec<f64>,
        /// Thickness range in Å.
        thick_bounds: (f64, f64),
        /// SLD range.
        sld_bounds: (f64, f64),
    },
    /// Angle and contrast maximising the kinetic information.
    OptimiseKinetics {
        /// Angle range in degrees.
        angle_bounds: (f64, f64),
        /// Bulk water SLD range.
        contrast_bounds: (f64, f64),
        /// Area per molecule values the information is summed over.
        kinetic_values: Values,
        /// Points of the measurement.
        points: usize,
        /// Counting time of the measurement.
        time: f64,
    },
    /// YIG and Pt thicknesses maximising the Pt magnetic SLD information.
    OptimiseYigThickness {
        /// Measurement plan.
        angle_times: Vec<AngleTime>,
        /// YIG thickness range in Å.
        yig_bounds: (f64, f64),
        /// Pt thickness range in Å.
        pt_bounds: (f64, f64),
    },
}

fn default_repeats() -> usize {
    1
}

impl Study {
    /// Kebab-case study kind, used in output file names.
    pub fn label(&self) -> &'static str {
        match self {
            Study::MagneticSweep { .. } => "magnetic-sweep",
            Study::Underlayer { .. } => "underlayer",
            Study::Angles { .. } => "angles",
            Study::Kinetics { .. } => "kinetics",
            Study::LogRatios { .. } => "log-ratios",
            Study::OptimiseAngleTimes { .. } => "optimise-angle-times",
            Study::OptimiseUnderlayers { .. } => "optimise-underlayers",
            Study::OptimiseKinetics { .. } => "optimise-kinetics",
            Study::OptimiseYigThickness { .. } => "optimise-yig-thickness",
        }
    }
}

/// Result of one study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "result", rename_all = "kebab-case")]
pub enum StudyOutcome {
    /// Values over a 2-D grid.
    Grid(Grid2D),
    /// Underlayer grid and its best point.
    Underlayer(UnderlayerChoice),
    /// Angle choice.
    Angles(AngleChoice),
    /// Log-likelihood ratios over time.
    LogRatios(LogRatios),
    /// Optimised angles and times.
    AngleTimes(OptimisedAngleTimes),
    /// Optimised underlayers.
    Underlayers(OptimisedUnderlayers),
    /// Optimised kinetic measurement.
    Kinetics(OptimisedKinetics),
    /// Optimised YIG and Pt thicknesses.
    Thicknesses(OptimisedThicknesses),
}

/// Batch of design studies sharing a seed, scheduler and instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignPlan {
    /// Plan name, recorded in the report.
    pub name: String,
    /// Master seed; each study derives its own.
    #[serde(default)]
    pub seed: u64,
    /// Scheduler of grid studies.
    #[serde(default)]
    pub scheduler: Scheduler,
    /// Direct beam file; the built-in spectrum is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beam: Option<PathBuf>,
    /// Settings of every optimisation study.
    #[serde(default)]
    pub optimiser: DifferentialEvolutionOptions,
    /// Studies, run in order.
    pub studies: Vec<Study>,
    /// Directory containing the plan on disk (ignored when serializing).
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl DesignPlan {
    /// SHA-256 of the canonical JSON of the plan.
    pub fn plan_hash(&self) -> Result<String, ReflError> {
        stable_hash_string(self)
    }

    /// YAML form of the plan.
    pub fn to_yaml_string(&self) -> Result<String, ReflError> {
        to_yaml_string(self)
    }

    /// Direct beam of the plan, resolving relative paths against the plan's directory.
    pub fn direct_beam(&self) -> Result<DirectBeam, ReflError> {
        match &self.beam {
            None => Ok(DirectBeam::offspec()),
            Some(path) if path.is_absolute() => DirectBeam::from_csv(path),
            Some(path) => DirectBeam::from_csv(&self.base_dir.join(path)),
        }
    }
}

/// Loads a plan from disk.
pub fn load_plan<P: AsRef<Path>>(path: P) -> Result<DesignPlan, ReflError> {
    let plan_path = path.as_ref();
    let bytes = fs::read(plan_path).map_err(|err| ReflError::io("plan-read", plan_path, err))?;
    let mut plan: DesignPlan = from_yaml_slice(&bytes)?;
    plan.base_dir = plan_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    Ok(plan)
}

/// Runs every study of `plan` in order.
pub fn run_plan(plan: &DesignPlan) -> Result<DesignReport, ReflError> {
    if plan.studies.is_empty() {
        return Err(ReflError::Design(
            ErrorInfo::new("plan-empty", "design plan lists no studies")
                .with_context("plan", plan.name.clone()),
        ));
    }
    let beam = plan.direct_beam()?;
    let mut studies = Vec::with_capacity(plan.studies.len());
    for (idx, study) in plan.studies.iter().enumerate() {
        info!(study = study.label(), ">>> {}/{}", idx, plan.studies.len());
        let seed = derive_substream_seed(plan.seed, idx as u64);
        let (sample, outcome) = run_study(plan, study, &beam, seed)?;
        studies.push(StudyReport {
            label: study.label().to_string(),
            sample,
            seed,
            outcome,
        });
    }
    DesignReport::new(plan, studies)
}

/// Loads a plan from disk and runs it.
pub fn run_plan_from_path(path: &Path) -> Result<DesignReport, ReflError> {
    run_plan(&load_plan(path)?)
}

fn run_study(
    plan: &DesignPlan,
    study: &Study,
    beam: &DirectBeam,
    seed: u64,
) -> Result<(String, StudyOutcome), ReflError> {
    let scheduler = &plan.scheduler;
    let options = &plan.optimiser;
    let yig = SampleYig::new();
    let bilayer = BilayerDmpc::new();
    let yig_name = yig.name().to_string();
    let bilayer_name = bilayer.name().to_string();
    match study {
        Study::MagneticSweep {
            yig_thicks,
            pt_thicks,
            angle_times,
        } => {
            let grid = magnetic_underlayer_sweep(
                &yig,
                &yig_thicks.to_vec(),
                &pt_thicks.to_vec(),
                angle_times,
                beam,
                scheduler,
            )?;
            Ok((yig_name, StudyOutcome::Grid(grid)))
        }
        Study::Underlayer {
            thicknesses,
            slds,
            contrasts,
            angle_times,
        } => {
            let choice = underlayer_choice(
                &bilayer,
                &thicknesses.to_vec(),
                &slds.to_vec(),
                contrasts,
                angle_times,
                beam,
                scheduler,
            )?;
            Ok((bilayer_name, StudyOutcome::Underlayer(choice)))
        }
        Study::Angles {
            sample,
            contrasts,
            initial,
            angles,
            points,
            time,
        } => {
            let library = LibrarySample::load(sample)?;
            let target = library.target(contrasts)?;
            let choice = angle_choice(
                target,
                initial,
                &angles.to_vec(),
                *points,
                *time,
                beam,
                scheduler,
            )?;
            Ok((sample.clone(), StudyOutcome::Angles(choice)))
        }
        Study::Kinetics {
            angles,
            contrasts,
            kinetic_values,
            points,
            time,
        } => {
            let grid = kinetics(
                &bilayer,
                &angles.to_vec(),
                &contrasts.to_vec(),
                &kinetic_values.to_vec(),
                *points,
                *time,
                beam,
                scheduler,
            )?;
            Ok((bilayer_name, StudyOutcome::Grid(grid)))
        }
        Study::LogRatios {
            angle_times,
            times,
            pt_mag,
            repeats,
        } => {
            let ratios = calc_log_ratios(
                &yig,
                angle_times,
                &times.to_vec(),
                *pt_mag,
                *repeats,
                seed,
                beam,
            )?;
            Ok((yig_name, StudyOutcome::LogRatios(ratios)))
        }
        Study::OptimiseAngleTimes {
            sample,
            contrasts,
            num_angles,
            angle_bounds,
            points,
            total_time,
        } => {
            let library = LibrarySample::load(sample)?;
            let result = optimise_angle_times(
                library.target(contrasts)?,
                *num_angles,
                *angle_bounds,
                *points,
                *total_time,
                beam,
                options,
                seed,
            )?;
            Ok((sample.clone(), StudyOutcome::AngleTimes(result)))
        }
        Study::OptimiseUnderlayers {
            num_underlayers,
            angle_times,
            contrasts,
            thick_bounds,
            sld_bounds,
        } => {
            let result = optimise_underlayers(
                &bilayer,
                *num_underlayers,
                angle_times,
                contrasts,
                *thick_bounds,
                *sld_bounds,
                beam,
                options,
                seed,
            )?;
            Ok((bilayer_name, StudyOutcome::Underlayers(result)))
        }
        Study::OptimiseKinetics {
            angle_bounds,
            contrast_bounds,
            kinetic_values,
            points,
            time,
        } => {
            let result = optimise_kinetics(
                &bilayer,
                *angle_bounds,
                *contrast_bounds,
                &kinetic_values.to_vec(),
                *points,
                *time,
                beam,
                options,
                seed,
            )?;
            Ok((bilayer_name, StudyOutcome::Kinetics(result)))
        }
        Study::OptimiseYigThickness {
            angle_times,
            yig_bounds,
            pt_bounds,
        } => {
            let result = optimise_yig_thickness(
                &yig,
                angle_times,
                *yig_bounds,
                *pt_bounds,
                beam,
                options,
                seed,
            )?;
            Ok((yig_name, StudyOutcome::Thicknesses(result)))
        }
    }
}
