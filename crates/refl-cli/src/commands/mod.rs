pub mod angles;
pub mod fisher;
pub mod kinetics;
pub mod log_ratios;
pub mod magnetic_sweep;
pub mod optimise;
pub mod plan;
pub mod profile;
pub mod simulate;
pub mod underlayer;

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Args;
use refl_core::errors::ReflError;
use refl_exp::{
    run_plan, write_report, DesignPlan, DesignReport, DifferentialEvolutionOptions, Scheduler,
    Study, StudyOutcome, StudyReport, Values,
};
use refl_plot::{plot_heatmap, plot_series, write_grid_csv, write_series_csv};
use refl_sim::{AngleTime, DirectBeam};
use tracing::info;

/// Flags shared by every study command.
#[derive(Args, Debug)]
pub struct StudyArgs {
    /// Master seed; each study derives its own substream.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Worker threads used to evaluate grid points.
    #[arg(long, default_value_t = 1)]
    pub threads: usize,
    /// Direct beam CSV of `wavelength, flux` rows; the built-in spectrum otherwise.
    #[arg(long)]
    pub beam: Option<PathBuf>,
    /// Output directory for the report, figures and tables.
    #[arg(long)]
    pub out: PathBuf,
}

/// Parses `angle:points:time`, e.g. `0.7:70:10`.
pub fn parse_angle_time(text: &str) -> Result<AngleTime, String> {
    let fields: Vec<&str> = text.split(':').collect();
    let [angle, points, time] = fields.as_slice() else {
        return Err(format!("expected angle:points:time, got `{text}`"));
    };
    let angle: f64 = angle
        .trim()
        .parse()
        .map_err(|err| format!("angle `{angle}`: {err}"))?;
    let points: usize = points
        .trim()
        .parse()
        .map_err(|err| format!("points `{points}`: {err}"))?;
    let time: f64 = time
        .trim()
        .parse()
        .map_err(|err| format!("time `{time}`: {err}"))?;
    Ok(AngleTime::new(angle, points, time))
}

/// Parses `lo:hi` bounds.
pub fn parse_bounds(text: &str) -> Result<(f64, f64), String> {
    let (lo, hi) = text
        .split_once(':')
        .ok_or_else(|| format!("expected lo:hi, got `{text}`"))?;
    let lo: f64 = lo.trim().parse().map_err(|err| format!("`{lo}`: {err}"))?;
    let hi: f64 = hi.trim().parse().map_err(|err| format!("`{hi}`: {err}"))?;
    if !(lo < hi) {
        return Err(format!("lower bound {lo} must be below upper bound {hi}"));
    }
    Ok((lo, hi))
}

/// Parses `start:stop:num` as evenly spaced values, or a comma separated list.
pub fn parse_values(text: &str) -> Result<Values, String> {
    let fields: Vec<&str> = text.split(':').collect();
    match fields.as_slice() {
        [start, stop, num] => Ok(Values::Linspace {
            start: start
                .trim()
                .parse()
                .map_err(|err| format!("`{start}`: {err}"))?,
            stop: stop.trim().parse().map_err(|err| format!("`{stop}`: {err}"))?,
            num: num.trim().parse().map_err(|err| format!("`{num}`: {err}"))?,
        }),
        [list] => list
            .split(',')
            .filter(|item| !item.trim().is_empty())
            .map(|item| {
                item.trim()
                    .parse::<f64>()
                    .map_err(|err| format!("`{item}`: {err}"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Values::List),
        _ => Err(format!("expected start:stop:num or a,b,c, got `{text}`")),
    }
}

pub fn load_beam(path: Option<&Path>) -> Result<DirectBeam, ReflError> {
    match path {
        Some(path) => DirectBeam::from_csv(path),
        None => Ok(DirectBeam::offspec()),
    }
}

/// Runs `study` as a one study plan and writes its report, figures and tables.
pub fn run_single(
    name: &str,
    study: Study,
    args: &StudyArgs,
    optimiser: DifferentialEvolutionOptions,
) -> Result<(), Box<dyn Error>> {
    let plan = DesignPlan {
        name: name.to_string(),
        seed: args.seed,
        scheduler: Scheduler::parallel(args.threads),
        beam: args.beam.clone(),
        optimiser,
        studies: vec![study],
        base_dir: PathBuf::from("."),
    };
    let report = run_plan(&plan)?;
    persist(&report, &args.out)?;
    Ok(())
}

/// Writes the report and renders every study outcome under `out`.
pub fn persist(report: &DesignReport, out: &Path) -> Result<(), Box<dyn Error>> {
    write_report(report, out)?;
    for (idx, study) in report.studies.iter().enumerate() {
        let stem = format!("{:02}_{}", idx, study.label);
        render(study, out, &stem)?;
        info!(study = %stem, sample = %study.sample, "rendered study");
        println!("{}: {}", stem, summary(&study.outcome));
    }
    Ok(())
}

fn render(study: &StudyReport, out: &Path, stem: &str) -> Result<(), ReflError> {
    let dir = out.join(&study.sample);
    match &study.outcome {
        StudyOutcome::Grid(grid) => {
            plot_heatmap(grid, &dir, stem)?;
            write_grid_csv(grid, &dir.join(format!("{stem}.csv")))?;
        }
        StudyOutcome::Underlayer(choice) => {
            plot_heatmap(&choice.grid, &dir, stem)?;
            write_grid_csv(&choice.grid, &dir.join(format!("{stem}.csv")))?;
        }
        StudyOutcome::Angles(choice) => {
            plot_series(&choice.series, &dir, stem)?;
            write_series_csv(&choice.series, &dir.join(format!("{stem}.csv")))?;
        }
        StudyOutcome::LogRatios(ratios) => {
            let series = ratios.to_series();
            plot_series(&series, &dir, stem)?;
            write_series_csv(&series, &dir.join(format!("{stem}.csv")))?;
        }
        StudyOutcome::AngleTimes(_)
        | StudyOutcome::Underlayers(_)
        | StudyOutcome::Kinetics(_)
        | StudyOutcome::Thicknesses(_) => {}
    }
    Ok(())
}

/// One line description of the headline result of a study.
pub fn summary(outcome: &StudyOutcome) -> String {
    match outcome {
        StudyOutcome::Grid(grid) => match grid.argmax() {
            Some(best) => format!(
                "max {:.4e} at {} = {}, {} = {}",
                best.value, grid.x_label, best.x, grid.y_label, best.y
            ),
            None => "no finite grid values".to_string(),
        },
        StudyOutcome::Underlayer(choice) => match choice.best {
            Some(best) => format!(
                "best underlayer {:.1} Å thick, SLD {:.2} ({:.4e})",
                best.x, best.y, best.value
            ),
            None => "no finite grid values".to_string(),
        },
        StudyOutcome::Angles(choice) => match choice.best {
            Some(angle) => format!("best angle {angle}°"),
            None => "no finite angle values".to_string(),
        },
        StudyOutcome::LogRatios(ratios) => {
            let last = ratios.times.last().zip(ratios.ratios.last());
            match last {
                Some((time, ratio)) => format!("ratio {ratio:.4} after time {time}"),
                None => "no counting times".to_string(),
            }
        }
        StudyOutcome::AngleTimes(result) => {
            let plan: Vec<String> = result
                .angle_times
                .iter()
                .map(|at| format!("{}°/{:.1}", at.angle, at.time))
                .collect();
            format!("{} (objective {:.4e})", plan.join(", "), result.objective)
        }
        StudyOutcome::Underlayers(result) => {
            let layers: Vec<String> = result
                .underlayers
                .iter()
                .map(|u| format!("{:.1} Å / SLD {:.2}", u.thick, u.sld))
                .collect();
            format!("{} (objective {:.4e})", layers.join(", "), result.objective)
        }
        StudyOutcome::Kinetics(result) => format!(
            "angle {:.3}°, contrast {:.3} (objective {:.4e})",
            result.angle, result.contrast, result.objective
        ),
        StudyOutcome::Thicknesses(result) => format!(
            "YIG {:.1} Å, Pt {:.1} Å (objective {:.4e})",
            result.yig_thick, result.pt_thick, result.objective
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_time_parses_three_fields() {
        let at = parse_angle_time("0.7:70:10").expect("parse");
        assert_eq!(at, AngleTime::new(0.7, 70, 10.0));
        assert!(parse_angle_time("0.7:70").is_err());
        assert!(parse_angle_time("a:70:10").is_err());
    }

    #[test]
    fn bounds_must_be_ordered() {
        assert_eq!(parse_bounds("0.2:4").expect("parse"), (0.2, 4.0));
        assert!(parse_bounds("4:0.2").is_err());
        assert!(parse_bounds("4").is_err());
    }

    #[test]
    fn values_accept_lists_and_ranges() {
        assert_eq!(
            parse_values("1, 2,3").expect("list"),
            Values::List(vec![1.0, 2.0, 3.0])
        );
        assert_eq!(
            parse_values("0:10:5").expect("range"),
            Values::Linspace {
                start: 0.0,
                stop: 10.0,
                num: 5
            }
        );
        assert!(parse_values("0:1").is_err());
    }
}
