//! JSON report adapter: writes the full backtest result to a file.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::domain::engine::BacktestResult;
use crate::domain::error::KabusimError;
use crate::ports::report_port::ReportPort;

pub struct JsonReportAdapter;

impl ReportPort for JsonReportAdapter {
    fn write(&self, result: &BacktestResult, output_path: &Path) -> Result<(), KabusimError> {
        let file = File::create(output_path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), result)?;
        Ok(())
    }
}
