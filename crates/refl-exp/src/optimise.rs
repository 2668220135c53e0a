//! Differential evolution and the design optimisations built on it.

use rand::seq::SliceRandom;
use rand::Rng;
use refl_core::errors::{ErrorInfo, ReflError};
use refl_core::RngHandle;
use refl_info::{min_eigenvalue, underlayer_info, MagneticUnderlayerInfo};
use refl_model::{ContrastSample, SampleYig, Underlayer};
use refl_sim::{AngleTime, DirectBeam};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::kinetics::kinetic_information;
use crate::sweep::Scheduler;
use crate::target::DesignTarget;

/// Lower bound on the fraction of the total time given to any angle.
const MIN_TIME_SPLIT: f64 = 0.01;

/// Options for [`differential_evolution`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferentialEvolutionOptions {
    /// Population size per dimension.
    #[serde(default = "DifferentialEvolutionOptions::default_popsize")]
    pub popsize: usize,
    /// Generation limit.
    #[serde(default = "DifferentialEvolutionOptions::default_max_generations")]
    pub max_generations: usize,
    /// Range the mutation factor is dithered over each generation.
    #[serde(default = "DifferentialEvolutionOptions::default_mutation")]
    pub mutation: (f64, f64),
    /// Crossover probability.
    #[serde(default = "DifferentialEvolutionOptions::default_recombination")]
    pub recombination: f64,
    /// Relative tolerance on the spread of population energies.
    #[serde(default = "DifferentialEvolutionOptions::default_tol")]
    pub tol: f64,
    /// Absolute tolerance on the spread of population energies.
    #[serde(default)]
    pub atol: f64,
    /// Scheduler the members of a generation are evaluated on.
    #[serde(default)]
    pub scheduler: Scheduler,
}

impl DifferentialEvolutionOptions {
    const fn default_popsize() -> usize {
        15
    }

    const fn default_max_generations() -> usize {
        1000
    }

    const fn default_mutation() -> (f64, f64) {
        (0.5, 1.0)
    }

    const fn default_recombination() -> f64 {
        0.7
    }

    const fn default_tol() -> f64 {
        0.001
    }
}

impl Default for DifferentialEvolutionOptions {
    fn default() -> Self {
        Self {
            popsize: Self::default_popsize(),
            max_generations: Self::default_max_generations(),
            mutation: Self::default_mutation(),
            recombination: Self::default_recombination(),
            tol: Self::default_tol(),
            atol: 0.0,
            scheduler: Scheduler::default(),
        }
    }
}

/// Best point found by [`differential_evolution`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimisationResult {
    /// Best point, in the original variables.
    pub x: Vec<f64>,
    /// Objective value at `x`.
    pub fun: f64,
    /// Generations run.
    pub generations: usize,
    /// Objective evaluations.
    pub evaluations: usize,
    /// Whether the tolerance was met before the generation limit.
    pub converged: bool,
}

fn invalid_bounds(message: &str, dim: usize) -> ReflError {
    ReflError::Design(
        ErrorInfo::new("optimise-bounds", message).with_context("dimension", dim.to_string()),
    )
}

/// Minimises `objective` within `bounds` using the `best/1/bin` strategy.
///
/// Trial vectors of a generation are all evaluated before any member is
/// replaced, so evaluation order does not affect the result. The initial
/// population is a Latin hypercube. The search stops when the standard
/// deviation of the population energies drops below
/// `atol + tol * |mean energy|`.
pub fn differential_evolution<F>(
    objective: F,
    bounds: &[(f64, f64)],
    options: &DifferentialEvolutionOptions,
    seed: u64,
) -> Result<OptimisationResult, ReflError>
where
    F: Fn(&[f64]) -> Result<f64, ReflError> + Sync + Send,
{
    let dim = bounds.len();
    if dim == 0 {
        return Err(invalid_bounds("at least one variable is required", 0));
    }
    for (i, &(lo, hi)) in bounds.iter().enumerate() {
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(invalid_bounds("bounds must be finite with low < high", i));
        }
    }
    let pop_size = (options.popsize * dim).max(5);
    let mut rng = RngHandle::from_seed(seed);
    let scale = |unit: &[f64]| -> Vec<f64> {
        unit.iter()
            .zip(bounds)
            .map(|(u, (lo, hi))| lo + u * (hi - lo))
            .collect()
    };
    let evaluate = |members: &[Vec<f64>]| -> Result<Vec<f64>, ReflError> {
        options
            .scheduler
            .map("differential_evolution", members.len(), |idx| {
                let value = objective(&scale(&members[idx]))?;
                Ok(if value.is_finite() { value } else { f64::INFINITY })
            })
    };

    let mut population = latin_hypercube(pop_size, dim, &mut rng);
    let mut energies = evaluate(&population)?;
    let mut evaluations = pop_size;
    let mut generations = 0;
    let mut converged = converged_population(&energies, options);

    while !converged && generations < options.max_generations {
        generations += 1;
        let best = argmin(&energies);
        let (f_lo, f_hi) = options.mutation;
        let factor = if f_hi > f_lo { rng.gen_range(f_lo..f_hi) } else { f_lo };

        let trials: Vec<Vec<f64>> = (0..pop_size)
            .map(|i| {
                let (r1, r2) = pick_two(pop_size, i, &mut rng);
                let forced = rng.gen_range(0..dim);
                (0..dim)
                    .map(|j| {
                        if j == forced || rng.gen::<f64>() < options.recombination {
                            let mutant = population[best][j]
                                + factor * (population[r1][j] - population[r2][j]);
                            if (0.0..=1.0).contains(&mutant) {
                                mutant
                            } else {
                                rng.gen::<f64>()
                            }
                        } else {
                            population[i][j]
                        }
                    })
                    .collect()
            })
            .collect();
        let trial_energies = evaluate(&trials)?;
        evaluations += pop_size;
        for (i, (trial, energy)) in trials.into_iter().zip(trial_energies).enumerate() {
            if energy <= energies[i] {
                population[i] = trial;
                energies[i] = energy;
            }
        }
        converged = converged_population(&energies, options);
        debug!(generation = generations, best = energies[argmin(&energies)], "differential evolution");
    }

    let best = argmin(&energies);
    Ok(OptimisationResult {
        x: scale(&population[best]),
        fun: energies[best],
        generations,
        evaluations,
        converged,
    })
}

fn latin_hypercube(samples: usize, dim: usize, rng: &mut RngHandle) -> Vec<Vec<f64>> {
    let mut population = vec![vec![0.0; dim]; samples];
    for j in 0..dim {
        let mut slots: Vec<usize> = (0..samples).collect();
        slots.shuffle(rng);
        for (member, slot) in population.iter_mut().zip(slots) {
            member[j] = (slot as f64 + rng.gen::<f64>()) / samples as f64;
        }
    }
    population
}

fn pick_two(n: usize, exclude: usize, rng: &mut RngHandle) -> (usize, usize) {
    let mut candidates: Vec<usize> = (0..n).filter(|&k| k != exclude).collect();
    candidates.shuffle(rng);
    (candidates[0], candidates[1])
}

fn argmin(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

fn converged_population(energies: &[f64], options: &DifferentialEvolutionOptions) -> bool {
    if energies.iter().any(|e| !e.is_finite()) {
        return false;
    }
    let n = energies.len() as f64;
    let mean = energies.iter().sum::<f64>() / n;
    let std = (energies.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / n).sqrt();
    std <= options.atol + options.tol * mean.abs()
}

/// Optimised measurement angles and the share of the total time each receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimisedAngleTimes {
    /// Angles and their share of the total time.
    pub angle_times: Vec<AngleTime>,
    /// Minimum eigenvalue of the optimised design.
    pub objective: f64,
    /// Raw optimiser result.
    pub result: OptimisationResult,
}

fn split_times(angles: &[f64], splits: &[f64], points: usize, total_time: f64) -> Vec<AngleTime> {
    let sum: f64 = splits.iter().sum();
    angles
        .iter()
        .zip(splits)
        .map(|(&angle, &split)| AngleTime::new(angle, points, total_time * split / sum))
        .collect()
}

/// Chooses `num_angles` angles and the split of `total_time` between them.
#[allow(clippy::too_many_arguments)]
pub fn optimise_angle_times(
    target: DesignTarget<'_>,
    num_angles: usize,
    angle_bounds: (f64, f64),
    points: usize,
    total_time: f64,
    beam: &DirectBeam,
    options: &DifferentialEvolutionOptions,
    seed: u64,
) -> Result<OptimisedAngleTimes, ReflError> {
    let bounds: Vec<(f64, f64)> = std::iter::repeat(angle_bounds)
        .take(num_angles)
        .chain(std::iter::repeat((MIN_TIME_SPLIT, 1.0)).take(num_angles))
        .collect();
    let result = differential_evolution(
        |x| {
            let plan = split_times(&x[..num_angles], &x[num_angles..], points, total_time);
            Ok(-min_eigenvalue(&target.information(&plan, beam)?))
        },
        &bounds,
        options,
        seed,
    )?;
    let angle_times = split_times(
        &result.x[..num_angles],
        &result.x[num_angles..],
        points,
        total_time,
    );
    Ok(OptimisedAngleTimes {
        angle_times,
        objective: -result.fun,
        result,
    })
}

/// Optimised underlayers beneath a contrast sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimisedUnderlayers {
    /// Thickness and SLD of each underlayer.
    pub underlayers: Vec<Underlayer>,
    /// Minimum eigenvalue of the optimised design.
    pub objective: f64,
    /// Raw optimiser result.
    pub result: OptimisationResult,
}

fn underlayers_from(x: &[f64], count: usize) -> Vec<Underlayer> {
    x[..count]
        .iter()
        .zip(&x[count..])
        .map(|(&thick, &sld)| Underlayer { thick, sld })
        .collect()
}

/// Chooses the thickness and SLD of `num_underlayers` underlayers.
#[allow(clippy::too_many_arguments)]
pub fn optimise_underlayers<S: ContrastSample + ?Sized>(
    sample: &S,
    num_underlayers: usize,
    angle_times: &[AngleTime],
    contrasts: &[f64],
    thick_bounds: (f64, f64),
    sld_bounds: (f64, f64),
    beam: &DirectBeam,
    options: &DifferentialEvolutionOptions,
    seed: u64,
) -> Result<OptimisedUnderlayers, ReflError> {
    let bounds: Vec<(f64, f64)> = std::iter::repeat(thick_bounds)
        .take(num_underlayers)
        .chain(std::iter::repeat(sld_bounds).take(num_underlayers))
        .collect();
    let result = differential_evolution(
        |x| {
            let underlayers = underlayers_from(x, num_underlayers);
            let g = underlayer_info(sample, angle_times, contrasts, &underlayers, beam)?;
            Ok(-min_eigenvalue(&g))
        },
        &bounds,
        options,
        seed,
    )?;
    Ok(OptimisedUnderlayers {
        underlayers: underlayers_from(&result.x, num_underlayers),
        objective: -result.fun,
        result,
    })
}

/// Optimised angle and contrast of a kinetic measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimisedKinetics {
    /// Measurement angle in degrees.
    pub angle: f64,
    /// Bulk water SLD.
    pub contrast: f64,
    /// Information on the kinetic parameter.
    pub objective: f64,
    /// Raw optimiser result.
    pub result: OptimisationResult,
}

/// Chooses the angle and contrast maximising information on the kinetic parameter.
#[allow(clippy::too_many_arguments)]
pub fn optimise_kinetics<S: ContrastSample + ?Sized>(
    sample: &S,
    angle_bounds: (f64, f64),
    contrast_bounds: (f64, f64),
    kinetic_values: &[f64],
    points: usize,
    time: f64,
    beam: &DirectBeam,
    options: &DifferentialEvolutionOptions,
    seed: u64,
) -> Result<OptimisedKinetics, ReflError> {
    let result = differential_evolution(
        |x| {
            let info =
                kinetic_information(sample, x[0], x[1], kinetic_values, points, time, beam)?;
            Ok(-info)
        },
        &[angle_bounds, contrast_bounds],
        options,
        seed,
    )?;
    Ok(OptimisedKinetics {
        angle: result.x[0],
        contrast: result.x[1],
        objective: -result.fun,
        result,
    })
}

/// Optimised YIG and Pt thicknesses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimisedThicknesses {
    /// YIG thickness in Å.
    pub yig_thick: f64,
    /// Pt thickness in Å.
    pub pt_thick: f64,
    /// Information on the Pt magnetic SLD.
    pub objective: f64,
    /// Raw optimiser result.
    pub result: OptimisationResult,
}

/// Chooses the YIG and Pt thicknesses maximising information on the Pt magnetic SLD.
pub fn optimise_yig_thickness(
    yig: &SampleYig,
    angle_times: &[AngleTime],
    yig_bounds: (f64, f64),
    pt_bounds: (f64, f64),
    beam: &DirectBeam,
    options: &DifferentialEvolutionOptions,
    seed: u64,
) -> Result<OptimisedThicknesses, ReflError> {
    let result = differential_evolution(
        |x| {
            let g = yig.underlayer_info(angle_times, x[0], x[1], beam)?;
            Ok(-g[(0, 0)])
        },
        &[yig_bounds, pt_bounds],
        options,
        seed,
    )?;
    Ok(OptimisedThicknesses {
        yig_thick: result.x[0],
        pt_thick: result.x[1],
        objective: -result.fun,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere(x: &[f64]) -> Result<f64, ReflError> {
        Ok(x.iter().map(|v| (v - 0.3) * (v - 0.3)).sum())
    }

    #[test]
    fn finds_the_minimum_of_a_sphere() {
        let options = DifferentialEvolutionOptions {
            tol: 1e-8,
            atol: 1e-10,
            ..Default::default()
        };
        let result = differential_evolution(sphere, &[(-2.0, 2.0), (-2.0, 2.0)], &options, 1).unwrap();
        assert!(result.fun < 1e-6, "fun = {}", result.fun);
        for x in &result.x {
            assert!((x - 0.3).abs() < 1e-2);
        }
    }

    #[test]
    fn seeded_runs_repeat() {
        let options = DifferentialEvolutionOptions {
            max_generations: 20,
            ..Default::default()
        };
        let a = differential_evolution(sphere, &[(-1.0, 1.0)], &options, 9).unwrap();
        let b = differential_evolution(sphere, &[(-1.0, 1.0)], &options, 9).unwrap();
        assert_eq!(a, b);
        let parallel = DifferentialEvolutionOptions {
            scheduler: Scheduler::parallel(2),
            ..options
        };
        let c = differential_evolution(sphere, &[(-1.0, 1.0)], &parallel, 9).unwrap();
        assert_eq!(a, c);
    }

    #[test]
    fn rejects_empty_bounds() {
        let err = differential_evolution(sphere, &[], &Default::default(), 0).unwrap_err();
        assert_eq!(err.info().code, "optimise-bounds");
        let err =
            differential_evolution(sphere, &[(1.0, 1.0)], &Default::default(), 0).unwrap_err();
        assert_eq!(err.info().code, "optimise-bounds");
    }

    #[test]
    fn time_splits_sum_to_total() {
        let plan = split_times(&[0.7, 2.3], &[1.0, 3.0], 100, 1000.0);
        assert_eq!(plan[0].time, 250.0);
        assert_eq!(plan[1].time, 750.0);
    }
}
