use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, RoadmapError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Communication {
    Poor,
    Average,
    Good,
}

impl FromStr for Level {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Level::Low),
            "medium" => Ok(Level::Medium),
            "high" => Ok(Level::High),
            _ => Err(format!("`{value}` is not one of Low, Medium, High")),
        }
    }
}

impl FromStr for SkillLevel {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(SkillLevel::Beginner),
            "intermediate" => Ok(SkillLevel::Intermediate),
            "advanced" => Ok(SkillLevel::Advanced),
            _ => Err(format!(
                "`{value}` is not one of Beginner, Intermediate, Advanced"
            )),
        }
    }
}

impl FromStr for Communication {
    type Err = String;

    // "Low" shows up in survey exports that reuse the Low/Medium/High scale.
    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "poor" | "low" => Ok(Communication::Poor),
            "average" => Ok(Communication::Average),
            "good" => Ok(Communication::Good),
            _ => Err(format!("`{value}` is not one of Poor, Average, Good")),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Level::Low => "Low",
            Level::Medium => "Medium",
            Level::High => "High",
        };
        f.write_str(label)
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
        };
        f.write_str(label)
    }
}

impl fmt::Display for Communication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Communication::Poor => "Poor",
            Communication::Average => "Average",
            Communication::Good => "Good",
        };
        f.write_str(label)
    }
}

pub fn normalize_yes_no(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "yes" | "y" | "true" | "1"
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudentProfile {
    pub year: u32,
    pub branch: String,
    pub gpa: f64,
    pub study_hours: u32,
    pub failures: u32,
    pub hostel: bool,
    pub sleep_hours: u32,
    pub family_support: Level,
    pub interest: String,
    pub budget: Level,
    pub skill_level: SkillLevel,
    pub stress_level: Level,
    pub confusion_level: Level,
    pub communication: Communication,
}

/// Profile as submitted by a form or JSON file. Values stay untyped until
/// `TryFrom` so a wrong JSON type is reported against its field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileInput {
    pub year: Option<Value>,
    pub branch: Option<Value>,
    pub gpa: Option<Value>,
    pub study_hours: Option<Value>,
    pub failures: Option<Value>,
    pub hostel: Option<Value>,
    pub sleep_hours: Option<Value>,
    pub family_support: Option<Value>,
    pub interest: Option<Value>,
    pub budget: Option<Value>,
    pub skill_level: Option<Value>,
    pub stress_level: Option<Value>,
    pub confusion_level: Option<Value>,
    pub communication: Option<Value>,
}

fn required(field: &'static str, value: Option<Value>) -> Result<Value> {
    match value {
        None | Some(Value::Null) => Err(RoadmapError::validation(field, "missing")),
        Some(value) => Ok(value),
    }
}

fn text(field: &'static str, value: Option<Value>) -> Result<String> {
    match required(field, value)? {
        Value::String(text) => Ok(text),
        other => Err(RoadmapError::validation(
            field,
            format!("expected a string, got {other}"),
        )),
    }
}

fn non_empty(field: &'static str, value: Option<Value>) -> Result<String> {
    let value = text(field, value)?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RoadmapError::validation(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn number(field: &'static str, value: Option<Value>) -> Result<f64> {
    match required(field, value)? {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| RoadmapError::validation(field, format!("{number} is not a number"))),
        other => Err(RoadmapError::validation(
            field,
            format!("expected a number, got {other}"),
        )),
    }
}

fn whole_in_range(field: &'static str, value: Option<Value>, min: i64, max: i64) -> Result<u32> {
    let value = match required(field, value)? {
        Value::Number(number) => number.as_i64().ok_or_else(|| {
            RoadmapError::validation(field, format!("expected a whole number, got {number}"))
        })?,
        other => {
            return Err(RoadmapError::validation(
                field,
                format!("expected a whole number, got {other}"),
            ))
        }
    };
    if value < min || value > max {
        return Err(RoadmapError::validation(
            field,
            format!("{value} is outside {min}..={max}"),
        ));
    }
    Ok(value as u32)
}

fn yes_no(field: &'static str, value: Option<Value>) -> Result<bool> {
    match required(field, value)? {
        Value::Bool(flag) => Ok(flag),
        Value::String(text) => Ok(normalize_yes_no(&text)),
        other => Err(RoadmapError::validation(
            field,
            format!("expected true/false or yes/no, got {other}"),
        )),
    }
}

fn parse_enum<T>(field: &'static str, value: Option<Value>) -> Result<T>
where
    T: FromStr<Err = String>,
{
    text(field, value)?
        .parse()
        .map_err(|reason| RoadmapError::validation(field, reason))
}

impl TryFrom<ProfileInput> for StudentProfile {
    type Error = RoadmapError;

    fn try_from(input: ProfileInput) -> Result<Self> {
        let year = whole_in_range("year", input.year, 1, i64::from(u32::MAX))?;
        let branch = non_empty("branch", input.branch)?;

        let gpa = number("gpa", input.gpa)?;
        if !gpa.is_finite() || !(0.0..=10.0).contains(&gpa) {
            return Err(RoadmapError::validation(
                "gpa",
                format!("{gpa} is outside 0.0..=10.0"),
            ));
        }

        let study_hours = whole_in_range("study_hours", input.study_hours, 0, 24)?;
        let failures = whole_in_range("failures", input.failures, 0, i64::from(u32::MAX))?;
        let hostel = yes_no("hostel", input.hostel)?;
        let sleep_hours = whole_in_range("sleep_hours", input.sleep_hours, 0, 24)?;

        Ok(StudentProfile {
            year,
            branch,
            gpa,
            study_hours,
            failures,
            hostel,
            sleep_hours,
            family_support: parse_enum("family_support", input.family_support)?,
            interest: non_empty("interest", input.interest)?,
            budget: parse_enum("budget", input.budget)?,
            skill_level: parse_enum("skill_level", input.skill_level)?,
            stress_level: parse_enum("stress_level", input.stress_level)?,
            confusion_level: parse_enum("confusion_level", input.confusion_level)?,
            communication: parse_enum("communication", input.communication)?,
        })
    }
}

impl StudentProfile {
    pub fn from_json_reader(reader: impl std::io::Read) -> Result<Self> {
        let input: ProfileInput = serde_json::from_reader(reader)?;
        Self::try_from(input)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeerRecord {
    pub year: Option<String>,
    pub branch: Option<String>,
    pub interest: Option<String>,
    pub skill_level: Option<String>,
    pub hostel: Option<bool>,
    pub gpa: Option<f64>,
    pub study_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeerSummary {
    pub matched: usize,
    pub avg_gpa: Option<f64>,
    pub avg_study_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekPhase {
    pub title: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadmapResult {
    pub similar_note: Option<String>,
    pub goals: Vec<String>,
    pub risks: Vec<String>,
    pub habits: Vec<String>,
    pub steps: Vec<String>,
    pub week_plan: Vec<WeekPhase>,
    pub resources: Vec<String>,
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillGapResult {
    pub role: String,
    pub known: Vec<String>,
    pub missing: Vec<String>,
    pub learning_order: Vec<String>,
}

impl SkillGapResult {
    pub fn coverage_percent(&self) -> u32 {
        let required = self.known.len() + self.missing.len();
        if required == 0 {
            return 100;
        }
        ((self.known.len() as f64 / required as f64) * 100.0).round() as u32
    }
}
