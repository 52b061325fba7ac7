pub mod chart_spec;
pub mod density_sample;
pub mod prepared_series;
pub mod trend_row;
