#![deny(missing_docs)]
//! SVG figures and CSV tables for reflectometry design studies.

mod data;
mod export;
mod figure;
mod profiles;
mod studies;

pub use data::plot_reflectivity;
pub use export::{write_data_csv, write_grid_csv, write_series_csv};
pub use figure::{save_plot, Canvas, FIGURE_SIZE};
pub use profiles::{plot_reflectivity_profile, plot_sld_profile, ProfileOptions};
pub use studies::{plot_heatmap, plot_series};
