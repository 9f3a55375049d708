//! Report generation port trait.

use std::path::Path;

use crate::domain::engine::BacktestResult;
use crate::domain::error::KabusimError;

/// Port for rendering a completed backtest result.
pub trait ReportPort {
    fn write(&self, result: &BacktestResult, output_path: &Path) -> Result<(), KabusimError>;
}
