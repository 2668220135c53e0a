//! Deterministic evaluation of design grids, sequentially or on a rayon pool.

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use refl_core::errors::{ErrorInfo, ReflError};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Scheduler configuration controlling how grid points are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheduler {
    /// Worker threads; `1` evaluates points in order on the calling thread.
    #[serde(default = "Scheduler::default_parallelism")]
    pub parallelism: usize,
}

impl Scheduler {
    const fn default_parallelism() -> usize {
        1
    }

    /// Scheduler evaluating points in order on the calling thread.
    pub const fn sequential() -> Self {
        Self { parallelism: 1 }
    }

    /// Scheduler with `threads` workers.
    pub const fn parallel(threads: usize) -> Self {
        Self {
            parallelism: threads,
        }
    }

    /// Evaluates `f` at every index in `0..total`, returning results in index order.
    ///
    /// Progress is reported as `>>> done/total` roughly every tenth of the work.
    pub fn map<T, F>(&self, label: &str, total: usize, f: F) -> Result<Vec<T>, ReflError>
    where
        T: Send,
        F: Fn(usize) -> Result<T, ReflError> + Sync + Send,
    {
        let every = (total / 10).max(1);
        let done = AtomicUsize::new(0);
        let step = |idx: usize| -> Result<T, ReflError> {
            let value = f(idx)?;
            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            if finished % every == 0 || finished == total {
                info!(study = label, ">>> {}/{}", finished, total);
            }
            Ok(value)
        };

        if self.parallelism <= 1 {
            return (0..total).map(step).collect();
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.parallelism)
            .build()
            .map_err(|err| {
                ReflError::Design(
                    ErrorInfo::new("thread-pool", err.to_string())
                        .with_context("parallelism", self.parallelism.to_string()),
                )
            })?;
        pool.install(|| (0..total).into_par_iter().map(step).collect())
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            parallelism: Self::default_parallelism(),
        }
    }
}

/// `n` evenly spaced values from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => (0..n)
            .map(|i| start + (stop - start) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

/// Values from `start` (inclusive) to `stop` (exclusive) in steps of `step`.
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || stop <= start {
        return Vec::new();
    }
    let n = ((stop - start) / step).ceil() as usize;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Values of a design variable, either listed or generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Values {
    /// Explicit values.
    List(Vec<f64>),
    /// `num` evenly spaced values from `start` to `stop` inclusive.
    Linspace {
        /// First value.
        start: f64,
        /// Last value.
        stop: f64,
        /// Number of values.
        num: usize,
    },
    /// Values from `start` up to, not including, `stop` in steps of `step`.
    Arange {
        /// First value.
        start: f64,
        /// Exclusive end.
        stop: f64,
        /// Spacing.
        step: f64,
    },
}

impl Values {
    /// The values as a vector.
    pub fn to_vec(&self) -> Vec<f64> {
        match self {
            Values::List(values) => values.clone(),
            Values::Linspace { start, stop, num } => linspace(*start, *stop, *num),
            Values::Arange { start, stop, step } => arange(*start, *stop, *step),
        }
    }
}

/// Best point of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    /// Grid `x` value.
    pub x: f64,
    /// Grid `y` value.
    pub y: f64,
    /// Value at `(x, y)`.
    pub value: f64,
}

/// A scalar evaluated over a one dimensional range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Axis label of `x`.
    pub x_label: String,
    /// Axis label of `values`.
    pub y_label: String,
    /// Range the scalar is evaluated over.
    pub x: Vec<f64>,
    /// Scalar at each `x`.
    pub values: Vec<f64>,
}

impl Series {
    /// `(x, value)` of the largest finite value.
    pub fn argmax(&self) -> Option<(f64, f64)> {
        self.x
            .iter()
            .zip(&self.values)
            .filter(|(_, v)| v.is_finite())
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(&x, &v)| (x, v))
    }
}

/// A scalar evaluated over an `x × y` grid; `values[i][j]` belongs to `(x[i], y[j])`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid2D {
    /// Axis label of `x`.
    pub x_label: String,
    /// Axis label of `y`.
    pub y_label: String,
    /// Label of the scalar.
    pub z_label: String,
    /// First grid axis.
    pub x: Vec<f64>,
    /// Second grid axis.
    pub y: Vec<f64>,
    /// Scalar at each grid point.
    pub values: Vec<Vec<f64>>,
}

impl Grid2D {
    /// Largest finite value and its position.
    pub fn argmax(&self) -> Option<GridPoint> {
        let mut best: Option<GridPoint> = None;
        for (i, row) in self.values.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                if !value.is_finite() {
                    continue;
                }
                if best.map_or(true, |b| value > b.value) {
                    best = Some(GridPoint {
                        x: self.x[i],
                        y: self.y[j],
                        value,
                    });
                }
            }
        }
        best
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.x.len() * self.y.len()
    }

    /// Whether the grid has no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Evaluates `f(x, y)` over every grid point.
pub fn grid_2d<F>(
    scheduler: &Scheduler,
    labels: (&str, &str, &str),
    xs: &[f64],
    ys: &[f64],
    f: F,
) -> Result<Grid2D, ReflError>
where
    F: Fn(f64, f64) -> Result<f64, ReflError> + Sync + Send,
{
    let (x_label, y_label, z_label) = labels;
    let ny = ys.len();
    let flat = scheduler.map(z_label, xs.len() * ny, |idx| f(xs[idx / ny], ys[idx % ny]))?;
    let values = if ny == 0 {
        vec![Vec::new(); xs.len()]
    } else {
        flat.chunks(ny).map(<[f64]>::to_vec).collect()
    };
    Ok(Grid2D {
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        z_label: z_label.to_string(),
        x: xs.to_vec(),
        y: ys.to_vec(),
        values,
    })
}

/// Evaluates `f(x)` over a range.
pub fn series<F>(
    scheduler: &Scheduler,
    labels: (&str, &str),
    xs: &[f64],
    f: F,
) -> Result<Series, ReflError>
where
    F: Fn(f64) -> Result<f64, ReflError> + Sync + Send,
{
    let (x_label, y_label) = labels;
    let values = scheduler.map(y_label, xs.len(), |idx| f(xs[idx]))?;
    Ok(Series {
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        x: xs.to_vec(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallel_matches_sequential() {
        let xs = linspace(0.0, 1.0, 7);
        let ys = linspace(-1.0, 1.0, 5);
        let f = |x: f64, y: f64| Ok(x * x - y);
        let seq = grid_2d(&Scheduler::sequential(), ("x", "y", "z"), &xs, &ys, f).unwrap();
        let par = grid_2d(&Scheduler::parallel(3), ("x", "y", "z"), &xs, &ys, f).unwrap();
        assert_eq!(seq, par);
        let best = seq.argmax().unwrap();
        assert_eq!((best.x, best.y), (1.0, -1.0));
    }

    #[test]
    fn errors_propagate() {
        let err = Scheduler::sequential()
            .map("fail", 4, |idx| {
                if idx == 2 {
                    Err(ReflError::Design(ErrorInfo::new("boom", "failed")))
                } else {
                    Ok(idx)
                }
            })
            .unwrap_err();
        assert_eq!(err.info().code, "boom");
    }

    #[test]
    fn ranges() {
        assert_eq!(linspace(5.0, 500.0, 2), vec![5.0, 500.0]);
        assert_eq!(arange(5.0, 25.0, 10.0), vec![5.0, 15.0]);
        assert!(arange(1.0, 0.0, 1.0).is_empty());
        let values: Values = serde_json::from_str(r#"{"start": 0.0, "stop": 1.0, "num": 3}"#).unwrap();
        assert_eq!(values.to_vec(), vec![0.0, 0.5, 1.0]);
    }
}
