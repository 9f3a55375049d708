//! CSV quote data adapter.
//!
//! Reads `<base>/<code>.csv` with a header row. Required columns: date,
//! open, high, low, close, volume. Every optional observation column is
//! picked up by name when present; empty cells read as absent.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::domain::error::KabusimError;
use crate::domain::quote::DailyQuote;
use crate::ports::data_port::QuoteDataPort;

pub struct CsvQuoteAdapter {
    base_path: PathBuf,
}

impl CsvQuoteAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{code}.csv"))
    }

    fn read_all(&self, code: &str) -> Result<Vec<DailyQuote>, KabusimError> {
        let path = self.csv_path(code);
        if !path.exists() {
            return Err(KabusimError::NoData {
                code: code.to_string(),
            });
        }

        let mut reader = csv::Reader::from_path(&path).map_err(|e| KabusimError::Data {
            reason: format!("failed to open {}: {}", path.display(), e),
        })?;

        let mut quotes = Vec::new();
        for record in reader.deserialize::<DailyQuote>() {
            let quote = record.map_err(|e| KabusimError::Data {
                reason: format!("{}: {}", path.display(), e),
            })?;
            quotes.push(quote);
        }

        quotes.sort_by_key(|q| q.date);
        Ok(quotes)
    }
}

impl QuoteDataPort for CsvQuoteAdapter {
    fn fetch_daily_quotes(
        &self,
        code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<DailyQuote>, KabusimError> {
        let quotes = self
            .read_all(code)?
            .into_iter()
            .filter(|q| start_date.is_none_or(|d| q.date >= d))
            .filter(|q| end_date.is_none_or(|d| q.date <= d))
            .collect();
        Ok(quotes)
    }

    fn data_range(
        &self,
        code: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, KabusimError> {
        let quotes = self.read_all(code)?;
        match (quotes.first(), quotes.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, quotes.len()))),
            _ => Ok(None),
        }
    }
}
