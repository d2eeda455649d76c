//! CutoffIndex loading and validation.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

impl CutoffIndex {
    /// Load the cutoff table from a CSV file
    ///
    /// Steps:
    /// 1. Parse every row (in parallel)
    /// 2. Build the category, year and unique value lookups
    /// 3. Validate rank ranges
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading cutoff table from {:?}", path);

        let records = parser::parse_cutoffs(path)?;
        debug!("Parsed {} cutoff rows", records.len());

        let index = CutoffIndex::from_records(records);
        index.validate()?;

        info!(
            "Cutoff table ready: {} rows, {} categories, years {:?}",
            index.len(),
            index.categories().len(),
            index.years()
        );
        Ok(index)
    }

    /// Most recent row of every program within a category
    ///
    /// "Most recent" compares `(year, round)`, so the final round of the
    /// latest year wins. Programs that were only offered in earlier years
    /// are still returned with their last known cutoff.
    pub fn latest_by_program(&self, category: &str) -> Vec<&CutoffRecord> {
        let mut latest: HashMap<ProgramKey, &CutoffRecord> = HashMap::new();

        for record in self.get_records_by_category(category) {
            latest
                .entry(record.program_key())
                .and_modify(|existing| {
                    if record.session() > existing.session() {
                        *existing = record;
                    }
                })
                .or_insert(record);
        }

        latest.into_values().collect()
    }

    /// Validate data integrity
    ///
    /// Check that:
    /// - Ranks are positive
    /// - Opening rank does not exceed closing rank
    /// - Rounds are positive
    pub fn validate(&self) -> Result<()> {
        if self.records.is_empty() {
            return Err(DataLoadError::ValidationError(
                "cutoff table has no rows".to_string(),
            ));
        }

        for record in &self.records {
            if record.opening_rank == 0 || record.closing_rank == 0 {
                return Err(DataLoadError::InvalidValue {
                    field: "rank".to_string(),
                    value: format!(
                        "{} / {} for {} - {}",
                        record.opening_rank,
                        record.closing_rank,
                        record.institute_name,
                        record.branch
                    ),
                });
            }
            if record.opening_rank > record.closing_rank {
                return Err(DataLoadError::ValidationError(format!(
                    "opening rank {} exceeds closing rank {} for {} - {} ({} {})",
                    record.opening_rank,
                    record.closing_rank,
                    record.institute_name,
                    record.branch,
                    record.year,
                    record.round
                )));
            }
            if record.round == 0 {
                return Err(DataLoadError::InvalidValue {
                    field: "round".to_string(),
                    value: record.round.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn record(year: Year, round: Round, branch: &str, opening: Rank, closing: Rank) -> CutoffRecord {
        CutoffRecord {
            year,
            round,
            institute_type: "IIT".to_string(),
            institute_name: "IIT Madras".to_string(),
            branch: branch.to_string(),
            quota: "AI".to_string(),
            category: "OPEN".to_string(),
            gender: "Gender-Neutral".to_string(),
            is_pwd: false,
            opening_rank: opening,
            closing_rank: closing,
        }
    }

    #[test]
    fn test_latest_by_program_picks_last_session() {
        let index = CutoffIndex::from_records(vec![
            record(2022, 6, "Civil Engineering", 3000, 5000),
            record(2023, 1, "Civil Engineering", 2800, 4200),
            record(2023, 6, "Civil Engineering", 2900, 4600),
            record(2021, 6, "Metallurgical Engineering", 6000, 8000),
        ]);

        let mut latest = index.latest_by_program("OPEN");
        latest.sort_by(|a, b| a.branch.cmp(&b.branch));

        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].session(), (2023, 6));
        assert_eq!(latest[0].closing_rank, 4600);
        assert_eq!(latest[1].session(), (2021, 6));

        assert!(index.latest_by_program("EWS").is_empty());
    }

    #[test]
    fn test_validate_rejects_inverted_ranks() {
        let index = CutoffIndex::from_records(vec![record(2023, 1, "CSE", 500, 100)]);
        assert!(matches!(
            index.validate(),
            Err(DataLoadError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_table() {
        assert!(CutoffIndex::new().validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "year,round,institute_type,institute_name,branch,quota,category,gender,is_pwd,opening_rank,closing_rank"
        )
        .unwrap();
        writeln!(file, "2023,1,IIT,IIT Delhi,CSE,AI,OPEN,Gender-Neutral,0,10,120").unwrap();
        writeln!(file, "2023,1,IIT,IIT Delhi,CSE,AI,OBC-NCL,Gender-Neutral,0,20,60").unwrap();

        let index = CutoffIndex::load_from_file(file.path()).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.categories(), vec!["OBC-NCL", "OPEN"]);
        assert_eq!(index.latest_year(), Some(2023));
    }

    #[test]
    fn test_load_missing_file() {
        let err = CutoffIndex::load_from_file(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
