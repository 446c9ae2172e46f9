//! Ranked candidate universe: per-day lists of securities ordered by an
//! external ranking model.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;

use crate::domain::CandidateRow;

use super::{parse_date_cell, DataError};

/// Canonical security code: numeric codes are zero-padded to five digits
/// ("1" → "00001"), everything else is kept as-is.
pub fn normalize_security(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        format!("{trimmed:0>5}")
    } else {
        trimmed.to_string()
    }
}

/// The ranked universe, keyed by ranking date. Rows within a day are sorted
/// by ascending rank (rank 1 first).
#[derive(Debug, Clone, Default)]
pub struct Universe {
    days: BTreeMap<NaiveDate, Vec<CandidateRow>>,
}

impl Universe {
    /// Load the universe CSV. Required columns: `date`, `stockno`, `rank`;
    /// `point` is optional and blank cells become None.
    pub fn from_csv(path: &Path) -> Result<Self, DataError> {
        let display = path.display().to_string();
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| DataError::Io {
                path: display.clone(),
                message: e.to_string(),
            })?;

        let headers = reader
            .headers()
            .map_err(|e| DataError::Csv {
                path: display.clone(),
                message: e.to_string(),
            })?
            .clone();
        let col = |name: &str| -> Result<usize, DataError> {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| DataError::MissingColumn {
                    path: display.clone(),
                    column: name.to_string(),
                })
        };
        let date_idx = col("date")?;
        let stock_idx = col("stockno")?;
        let rank_idx = col("rank")?;
        let point_idx = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case("point"));

        let mut days: BTreeMap<NaiveDate, Vec<CandidateRow>> = BTreeMap::new();
        for record in reader.records() {
            let record = record.map_err(|e| DataError::Csv {
                path: display.clone(),
                message: e.to_string(),
            })?;
            let date_cell = record.get(date_idx).unwrap_or("");
            let date = parse_date_cell(date_cell).ok_or_else(|| DataError::BadDate {
                path: display.clone(),
                value: date_cell.to_string(),
            })?;
            let security = normalize_security(record.get(stock_idx).unwrap_or(""));
            if security.is_empty() {
                continue;
            }
            let rank = match record.get(rank_idx).and_then(|c| c.trim().parse::<i64>().ok()) {
                Some(r) => r,
                None => continue,
            };
            let score = point_idx
                .and_then(|i| record.get(i))
                .and_then(|c| c.trim().parse::<f64>().ok());
            days.entry(date).or_default().push(CandidateRow {
                security,
                rank,
                score,
            });
        }

        if days.is_empty() {
            return Err(DataError::Empty { path: display });
        }
        for rows in days.values_mut() {
            rows.sort_by_key(|r| r.rank);
        }
        Ok(Self { days })
    }

    /// Build a universe directly from rows, for tests and synthetic runs.
    pub fn from_rows(rows: impl IntoIterator<Item = (NaiveDate, CandidateRow)>) -> Self {
        let mut days: BTreeMap<NaiveDate, Vec<CandidateRow>> = BTreeMap::new();
        for (date, row) in rows {
            days.entry(date).or_default().push(row);
        }
        for list in days.values_mut() {
            list.sort_by_key(|r| r.rank);
        }
        Self { days }
    }

    /// Top `n` candidates ranked on `date`, best rank first. Empty when the
    /// universe has no list for that date.
    pub fn candidates(&self, date: NaiveDate, n: usize) -> &[CandidateRow] {
        match self.days.get(&date) {
            Some(rows) => &rows[..rows.len().min(n)],
            None => &[],
        }
    }

    /// First and last ranking dates present.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = *self.days.keys().next()?;
        let last = *self.days.keys().next_back()?;
        Some((first, last))
    }

    /// Number of ranking days present.
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// All ranking days with their candidate counts, in date order.
    pub fn day_sizes(&self) -> impl Iterator<Item = (NaiveDate, usize)> + '_ {
        self.days.iter().map(|(&d, rows)| (d, rows.len()))
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
