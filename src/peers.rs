use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::{normalize_yes_no, PeerRecord, PeerSummary, StudentProfile};

pub const MIN_SIMILAR_PEERS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerColumn {
    Year,
    Branch,
    Interest,
    SkillLevel,
    Hostel,
    Gpa,
    StudyHours,
}

impl PeerColumn {
    pub const ALL: [PeerColumn; 7] = [
        PeerColumn::Year,
        PeerColumn::Branch,
        PeerColumn::Interest,
        PeerColumn::SkillLevel,
        PeerColumn::Hostel,
        PeerColumn::Gpa,
        PeerColumn::StudyHours,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PeerColumn::Year => "year",
            PeerColumn::Branch => "branch",
            PeerColumn::Interest => "interest",
            PeerColumn::SkillLevel => "skill_level",
            PeerColumn::Hostel => "hostel",
            PeerColumn::Gpa => "gpa",
            PeerColumn::StudyHours => "study_hours",
        }
    }
}

#[derive(Debug, Default, serde::Deserialize)]
struct CsvRow {
    #[serde(default)]
    year: Option<String>,
    #[serde(default)]
    branch: Option<String>,
    #[serde(default)]
    interest: Option<String>,
    #[serde(default)]
    skill_level: Option<String>,
    #[serde(default)]
    hostel: Option<String>,
    #[serde(default)]
    gpa: Option<String>,
    #[serde(default)]
    study_hours: Option<String>,
}

fn cell(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn numeric(column: PeerColumn, value: Option<String>) -> Option<f64> {
    let raw = cell(value)?;
    match raw.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Some(parsed),
        _ => {
            debug!(column = column.name(), value = %raw, "ignoring non-numeric peer cell");
            None
        }
    }
}

impl CsvRow {
    // A blank hostel cell reads as "No"; only a missing column leaves it unknown.
    fn into_record(self, has_hostel: bool) -> PeerRecord {
        PeerRecord {
            year: cell(self.year),
            branch: cell(self.branch),
            interest: cell(self.interest),
            skill_level: cell(self.skill_level),
            hostel: has_hostel.then(|| self.hostel.as_deref().is_some_and(normalize_yes_no)),
            gpa: numeric(PeerColumn::Gpa, self.gpa),
            study_hours: numeric(PeerColumn::StudyHours, self.study_hours),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PeerDataset {
    columns: Vec<PeerColumn>,
    records: Vec<PeerRecord>,
}

impl PeerDataset {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let dataset = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            rows = dataset.len(),
            "loaded peer dataset"
        );
        Ok(dataset)
    }

    pub fn from_reader(reader: impl std::io::Read) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let columns: Vec<PeerColumn> = PeerColumn::ALL
            .into_iter()
            .filter(|column| headers.iter().any(|h| h == column.name()))
            .collect();

        for column in PeerColumn::ALL {
            if !columns.contains(&column) {
                warn!(
                    column = column.name(),
                    "peer dataset has no such column; it will be skipped"
                );
            }
        }

        let has_hostel = columns.contains(&PeerColumn::Hostel);
        let mut records = Vec::new();
        for result in reader.deserialize::<CsvRow>() {
            records.push(result?.into_record(has_hostel));
        }

        Ok(Self { columns, records })
    }

    pub fn has_column(&self, column: PeerColumn) -> bool {
        self.columns.contains(&column)
    }

    pub fn records(&self) -> &[PeerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct values of a categorical column, or `None` when the
    /// column is absent. Numeric-looking values sort numerically.
    pub fn distinct(&self, column: PeerColumn) -> Option<Vec<String>> {
        if !self.has_column(column) {
            return None;
        }

        let values: BTreeSet<&str> = self
            .records
            .iter()
            .filter_map(|record| categorical(record, column))
            .collect();

        let mut values: Vec<String> = values.into_iter().map(str::to_string).collect();
        values.sort_by_key(|v| {
            let number = v.parse::<u32>().ok();
            (number.is_none(), number.unwrap_or(0), v.clone())
        });
        Some(values)
    }
}

fn categorical(record: &PeerRecord, column: PeerColumn) -> Option<&str> {
    match column {
        PeerColumn::Year => record.year.as_deref(),
        PeerColumn::Branch => record.branch.as_deref(),
        PeerColumn::Interest => record.interest.as_deref(),
        PeerColumn::SkillLevel => record.skill_level.as_deref(),
        PeerColumn::Hostel => record.hostel.map(|h| if h { "Yes" } else { "No" }),
        PeerColumn::Gpa | PeerColumn::StudyHours => None,
    }
}

#[derive(Debug, Clone)]
pub struct PeerMatch<'a> {
    pub rows: Vec<&'a PeerRecord>,
    pub summary: PeerSummary,
}

/// A constraint whose column is absent is skipped. Hostel is not a constraint.
pub fn filter_peers<'a>(dataset: &'a PeerDataset, profile: &StudentProfile) -> PeerMatch<'a> {
    let year = profile.year.to_string();
    let skill_level = profile.skill_level.to_string();

    let constraints = [
        (PeerColumn::Year, year.as_str()),
        (PeerColumn::Branch, profile.branch.as_str()),
        (PeerColumn::Interest, profile.interest.as_str()),
        (PeerColumn::SkillLevel, skill_level.as_str()),
    ];

    let mut rows: Vec<&PeerRecord> = dataset.records().iter().collect();
    for (column, wanted) in constraints {
        if !dataset.has_column(column) {
            debug!(column = column.name(), "skipping similarity constraint");
            continue;
        }
        rows.retain(|record| categorical(record, column) == Some(wanted));
    }

    let summary = summarize(dataset, &rows);
    debug!(matched = summary.matched, total = dataset.len(), "filtered peers");

    PeerMatch { rows, summary }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

fn summarize(dataset: &PeerDataset, rows: &[&PeerRecord]) -> PeerSummary {
    let avg_gpa = if dataset.has_column(PeerColumn::Gpa) {
        mean(rows.iter().filter_map(|r| r.gpa))
    } else {
        None
    };
    let avg_study_hours = if dataset.has_column(PeerColumn::StudyHours) {
        mean(rows.iter().filter_map(|r| r.study_hours))
    } else {
        None
    };

    PeerSummary {
        matched: rows.len(),
        avg_gpa,
        avg_study_hours,
    }
}

impl PeerSummary {
    /// Sentence describing the peer group, or `None` when enough peers
    /// matched but the dataset carries no GPA or study-hours figures.
    pub fn note(&self) -> Option<String> {
        if self.matched < MIN_SIMILAR_PEERS {
            return Some(format!(
                "Not enough similar-student rows for strong stats (found {}). Using rule-based roadmap.",
                self.matched
            ));
        }

        match (self.avg_gpa, self.avg_study_hours) {
            (Some(gpa), Some(hours)) => Some(format!(
                "Based on {} similar students (same year/branch/interest/skill), average GPA is {:.2} and average study hours is {:.1}/day.",
                self.matched, gpa, hours
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Communication, Level, SkillLevel};
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn profile() -> StudentProfile {
        StudentProfile {
            year: 2,
            branch: "CSE".to_string(),
            gpa: 7.0,
            study_hours: 3,
            failures: 0,
            hostel: true,
            sleep_hours: 7,
            family_support: Level::Medium,
            interest: "ML".to_string(),
            budget: Level::Low,
            skill_level: SkillLevel::Beginner,
            stress_level: Level::Low,
            confusion_level: Level::Low,
            communication: Communication::Good,
        }
    }

    fn csv_with_matches(matching: usize, others: usize) -> String {
        let mut csv = String::from("year,branch,interest,skill_level,hostel,gpa,study_hours\n");
        for i in 0..matching {
            csv.push_str(&format!("2,CSE,ML,Beginner,yes,{}.0,{}\n", 6 + i % 3, 2 + i % 2));
        }
        for _ in 0..others {
            csv.push_str("3,ECE,Web,Advanced,no,9.0,6\n");
        }
        csv
    }

    #[test]
    fn four_matches_are_insufficient() {
        let dataset = PeerDataset::from_reader(csv_with_matches(4, 3).as_bytes()).unwrap();
        let matched = filter_peers(&dataset, &profile());
        assert_eq!(matched.rows.len(), 4);
        assert_eq!(
            matched.summary.note().unwrap(),
            "Not enough similar-student rows for strong stats (found 4). Using rule-based roadmap."
        );
    }

    #[test]
    fn five_matches_report_aggregates() {
        let dataset = PeerDataset::from_reader(csv_with_matches(5, 3).as_bytes()).unwrap();
        let matched = filter_peers(&dataset, &profile());
        // gpa: 6,7,8,6,7 -> 6.8; hours: 2,3,2,3,2 -> 2.4
        assert_eq!(
            matched.summary.note().unwrap(),
            "Based on 5 similar students (same year/branch/interest/skill), average GPA is 6.80 and average study hours is 2.4/day."
        );
    }

    #[test]
    fn absent_columns_are_no_constraint() {
        let csv = "interest,gpa,study_hours\nML,7.0,3\nML,8.0,4\nWeb,5.0,1\n";
        let dataset = PeerDataset::from_reader(csv.as_bytes()).unwrap();
        assert!(!dataset.has_column(PeerColumn::Branch));

        let matched = filter_peers(&dataset, &profile());
        assert_eq!(matched.rows.len(), 2);
        assert_eq!(matched.summary.avg_gpa, Some(7.5));
    }

    #[test]
    fn no_aggregate_without_numeric_columns() {
        let mut csv = String::from("year,branch\n");
        for _ in 0..6 {
            csv.push_str("2,CSE\n");
        }
        let dataset = PeerDataset::from_reader(csv.as_bytes()).unwrap();
        let matched = filter_peers(&dataset, &profile());
        assert_eq!(matched.summary.matched, 6);
        assert_eq!(matched.summary.avg_gpa, None);
        assert_eq!(matched.summary.note(), None);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let csv = "branch,interest\ncse,ML\nCSE,ml\nCSE,ML\n";
        let dataset = PeerDataset::from_reader(csv.as_bytes()).unwrap();
        let matched = filter_peers(&dataset, &profile());
        assert_eq!(matched.rows.len(), 1);
    }

    #[test]
    fn hostel_is_normalized_but_not_filtered() {
        let csv = "branch,hostel\nCSE, Yes \nCSE,Y\nCSE,no\nCSE,\n";
        let dataset = PeerDataset::from_reader(csv.as_bytes()).unwrap();
        let hostel: Vec<Option<bool>> = dataset.records().iter().map(|r| r.hostel).collect();
        assert_eq!(hostel, vec![Some(true), Some(true), Some(false), Some(false)]);
        assert_eq!(dataset.distinct(PeerColumn::Hostel).unwrap(), vec!["No", "Yes"]);

        let matched = filter_peers(&dataset, &profile());
        assert_eq!(matched.rows.len(), 4);
    }

    #[test]
    fn hostel_unknown_without_column() {
        let dataset = PeerDataset::from_reader("branch\nCSE\n".as_bytes()).unwrap();
        assert_eq!(dataset.records()[0].hostel, None);
        assert_eq!(dataset.distinct(PeerColumn::Hostel), None);
    }

    #[test]
    fn distinct_values_sort_numerically() {
        let csv = "year,branch\n10,IT\n2,CSE\n1,CSE\n2,ECE\n";
        let dataset = PeerDataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(
            dataset.distinct(PeerColumn::Year).unwrap(),
            vec!["1", "2", "10"]
        );
        assert_eq!(
            dataset.distinct(PeerColumn::Branch).unwrap(),
            vec!["CSE", "ECE", "IT"]
        );
        assert_eq!(dataset.distinct(PeerColumn::Interest), None);
    }

    #[test]
    fn loads_from_disk_and_skips_bad_numbers() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "year,gpa,study_hours").unwrap();
        writeln!(file, "2,seven,3").unwrap();
        writeln!(file, "2,8.0,").unwrap();
        file.flush().unwrap();

        let dataset = PeerDataset::from_path(file.path()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].gpa, None);
        assert_eq!(dataset.records()[1].gpa, Some(8.0));
        assert_eq!(dataset.records()[1].study_hours, None);
    }
}
