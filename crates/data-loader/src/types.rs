//! Core domain types for the seat-allocation cutoff table.
//!
//! One `CutoffRecord` is a single row of a counselling round result: for a
//! given year, round, program and seat type, the opening and closing ranks
//! of the candidates who were allotted a seat.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

// =============================================================================
// Type Aliases
// =============================================================================

/// Common rank list position (1 is the best rank)
pub type Rank = u32;

/// Counselling year, e.g. 2023
pub type Year = u16;

/// Counselling round within a year (1-based)
pub type Round = u8;

// =============================================================================
// Record Types
// =============================================================================

/// A single row of the cutoff table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutoffRecord {
    pub year: Year,
    pub round: Round,
    pub institute_type: String,
    pub institute_name: String,
    pub branch: String,
    pub quota: String,
    pub category: String,
    pub gender: String,
    /// Seat reserved for persons with disability
    pub is_pwd: bool,
    pub opening_rank: Rank,
    pub closing_rank: Rank,
}

impl CutoffRecord {
    /// Identifies the seat this row describes, independent of year and round
    pub fn program_key(&self) -> ProgramKey {
        ProgramKey {
            institute_name: self.institute_name.clone(),
            branch: self.branch.clone(),
            quota: self.quota.clone(),
            gender: self.gender.clone(),
            is_pwd: self.is_pwd,
        }
    }

    /// `(year, round)` ordering key; later rounds of later years sort last
    pub fn session(&self) -> (Year, Round) {
        (self.year, self.round)
    }
}

/// Identity of a seat pool across counselling sessions.
///
/// The category is not part of the key because callers always look records
/// up within a single category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramKey {
    pub institute_name: String,
    pub branch: String,
    pub quota: String,
    pub gender: String,
    pub is_pwd: bool,
}

/// Categorical columns of the cutoff table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    InstituteType,
    InstituteName,
    Branch,
    Quota,
    Category,
    Gender,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::InstituteType,
        Column::InstituteName,
        Column::Branch,
        Column::Quota,
        Column::Category,
        Column::Gender,
    ];

    /// Header name used in the CSV export
    pub fn header(&self) -> &'static str {
        match self {
            Column::InstituteType => "institute_type",
            Column::InstituteName => "institute_name",
            Column::Branch => "branch",
            Column::Quota => "quota",
            Column::Category => "category",
            Column::Gender => "gender",
        }
    }

    fn value<'a>(&self, record: &'a CutoffRecord) -> &'a str {
        match self {
            Column::InstituteType => &record.institute_type,
            Column::InstituteName => &record.institute_name,
            Column::Branch => &record.branch,
            Column::Quota => &record.quota,
            Column::Category => &record.category,
            Column::Gender => &record.gender,
        }
    }
}

// =============================================================================
// CutoffIndex - The In-Memory Table
// =============================================================================

/// Holds every cutoff row plus the lookups the predictors need.
#[derive(Debug)]
pub struct CutoffIndex {
    pub(crate) records: Vec<CutoffRecord>,

    /// Row positions grouped by category
    pub(crate) category_index: HashMap<String, Vec<usize>>,
    /// Row positions grouped by year (sorted by year)
    pub(crate) year_index: BTreeMap<Year, Vec<usize>>,

    /// Sorted distinct values of each categorical column
    pub(crate) unique_values: HashMap<Column, BTreeSet<String>>,
}

impl CutoffIndex {
    /// Creates a new, empty CutoffIndex
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            category_index: HashMap::new(),
            year_index: BTreeMap::new(),
            unique_values: HashMap::new(),
        }
    }

    /// Build an index from already parsed records
    pub fn from_records(records: Vec<CutoffRecord>) -> Self {
        let mut index = Self::new();
        for record in records {
            index.insert_record(record);
        }
        index.build_secondary_indices();
        index
    }

    /// All rows, in file order
    pub fn records(&self) -> &[CutoffRecord] {
        &self.records
    }

    /// Get a row by its position
    pub fn get_record(&self, position: usize) -> Option<&CutoffRecord> {
        self.records.get(position)
    }

    /// All rows of a category
    ///
    /// Returns an empty iterator for unknown categories.
    pub fn get_records_by_category<'a>(
        &'a self,
        category: &str,
    ) -> impl Iterator<Item = &'a CutoffRecord> + 'a {
        self.category_index
            .get(category)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(move |&pos| self.records.get(pos))
    }

    /// All rows of a year
    pub fn get_records_by_year<'a>(
        &'a self,
        year: Year,
    ) -> impl Iterator<Item = &'a CutoffRecord> + 'a {
        self.year_index
            .get(&year)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(move |&pos| self.records.get(pos))
    }

    /// Years present in the table, oldest first
    pub fn years(&self) -> Vec<Year> {
        self.year_index.keys().copied().collect()
    }

    /// Most recent year present in the table
    pub fn latest_year(&self) -> Option<Year> {
        self.year_index.keys().next_back().copied()
    }

    /// Sorted distinct values of a categorical column
    pub fn unique_values(&self, column: Column) -> Vec<String> {
        self.unique_values
            .get(&column)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Whether a value occurs in a categorical column
    pub fn contains_value(&self, column: Column, value: &str) -> bool {
        self.unique_values
            .get(&column)
            .is_some_and(|set| set.contains(value))
    }

    /// Sorted distinct categories
    pub fn categories(&self) -> Vec<String> {
        self.unique_values(Column::Category)
    }

    /// Append a row; call `build_secondary_indices` once all rows are in
    pub fn insert_record(&mut self, record: CutoffRecord) {
        self.records.push(record);
    }

    /// Rebuild the category, year and unique value lookups from `records`
    pub fn build_secondary_indices(&mut self) {
        self.category_index.clear();
        self.year_index.clear();
        self.unique_values.clear();

        for (pos, record) in self.records.iter().enumerate() {
            self.category_index
                .entry(record.category.clone())
                .or_default()
                .push(pos);
            self.year_index.entry(record.year).or_default().push(pos);

            for column in Column::ALL {
                self.unique_values
                    .entry(column)
                    .or_default()
                    .insert(column.value(record).to_string());
            }
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for CutoffIndex {
    fn default() -> Self {
        Self::new()
    }
}
