use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, RoadmapError};
use crate::models::SkillGapResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRequirements {
    pub role: String,
    pub skills: Vec<String>,
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillCatalogue {
    roles: Vec<RoleRequirements>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn role(name: &str, skills: &[&str], projects: &[&str], resources: &[&str]) -> RoleRequirements {
    RoleRequirements {
        role: name.to_string(),
        skills: owned(skills),
        projects: owned(projects),
        resources: owned(resources),
    }
}

impl SkillCatalogue {
    pub fn new(roles: Vec<RoleRequirements>) -> Result<Self> {
        let mut names = HashSet::new();
        for entry in &roles {
            if entry.role.trim().is_empty() {
                return Err(RoadmapError::Catalogue("role name must not be empty".into()));
            }
            if !names.insert(entry.role.as_str()) {
                return Err(RoadmapError::Catalogue(format!(
                    "duplicate role `{}`",
                    entry.role
                )));
            }
            if entry.skills.is_empty() {
                return Err(RoadmapError::Catalogue(format!(
                    "role `{}` lists no skills",
                    entry.role
                )));
            }
            let mut seen = HashSet::new();
            if let Some(dup) = entry.skills.iter().find(|s| !seen.insert(s.as_str())) {
                return Err(RoadmapError::Catalogue(format!(
                    "role `{}` lists `{dup}` twice",
                    entry.role
                )));
            }
        }
        Ok(Self { roles })
    }

    pub fn from_json(reader: impl std::io::Read) -> Result<Self> {
        let roles: Vec<RoleRequirements> = serde_json::from_reader(reader)?;
        Self::new(roles)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let catalogue = Self::from_json(std::fs::File::open(path)?)?;
        info!(
            path = %path.display(),
            roles = catalogue.roles.len(),
            "loaded skill catalogue"
        );
        Ok(catalogue)
    }

    pub fn builtin() -> Self {
        Self {
            roles: vec![
                role(
                    "Frontend Developer",
                    &["HTML", "CSS", "JavaScript", "React", "Responsive Design", "Git & GitHub"],
                    &["Portfolio website", "Weather app using an API", "E-commerce product page"],
                    &["MDN Web Docs", "freeCodeCamp Responsive Web Design", "React official docs"],
                ),
                role(
                    "Backend Developer",
                    &["Python / Java", "SQL", "REST APIs", "Authentication", "Databases", "Git & GitHub"],
                    &["REST API for a student portal", "URL shortener", "Blog backend with auth"],
                    &["CS50 Web", "PostgreSQL tutorial", "Postman learning center"],
                ),
                role(
                    "Full Stack Developer",
                    &["HTML", "CSS", "JavaScript", "React", "Node.js", "SQL", "REST APIs", "Git & GitHub"],
                    &["Mini full-stack CRUD app", "Real-time chat app", "Task manager with login"],
                    &["The Odin Project", "Full Stack Open", "MDN Web Docs"],
                ),
                role(
                    "Data Analyst",
                    &["Excel", "SQL", "Python", "Statistics", "Data Visualization", "Power BI / Tableau"],
                    &["Sales dashboard", "Student performance analysis", "Survey data report"],
                    &["Kaggle Learn", "Mode SQL tutorial", "Google Data Analytics course"],
                ),
                role(
                    "Data Scientist",
                    &["Python", "Statistics", "Pandas", "Machine Learning", "Data Visualization", "SQL"],
                    &["Student performance prediction", "Customer churn model", "Mini recommender system"],
                    &["Kaggle: datasets + notebooks", "Hands-On Machine Learning (book)", "NPTEL data science"],
                ),
                role(
                    "Machine Learning Engineer",
                    &["Python", "Linear Algebra", "Machine Learning", "Deep Learning", "Model Deployment", "Git & GitHub"],
                    &["Image classifier", "Text sentiment model", "Simple ML model + Streamlit deployment"],
                    &["Andrew Ng ML course", "fast.ai", "PyTorch tutorials"],
                ),
                role(
                    "DevOps Engineer",
                    &["Linux", "Shell Scripting", "Git & GitHub", "Docker", "CI/CD", "Cloud Basics"],
                    &["Dockerize a web app", "CI pipeline for a project", "Deploy to a cloud VM"],
                    &["Linux Journey", "Docker docs", "GitHub Actions docs"],
                ),
            ],
        }
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(|entry| entry.role.as_str())
    }

    pub fn get(&self, role: &str) -> Result<&RoleRequirements> {
        self.roles
            .iter()
            .find(|entry| entry.role == role)
            .ok_or_else(|| RoadmapError::UnknownRole(role.to_string()))
    }
}

/// Partitions the role's required skills into known and missing.
///
/// A required skill is known when a declared skill equals it exactly
/// (case-sensitive, declared skills trimmed). Catalogue order is preserved
/// and the learning order is the missing list as-is.
pub fn skill_gap<S: AsRef<str>>(
    catalogue: &SkillCatalogue,
    role: &str,
    known_skills: &[S],
) -> Result<SkillGapResult> {
    let requirements = catalogue.get(role)?;
    let declared: HashSet<&str> = known_skills.iter().map(|s| s.as_ref().trim()).collect();

    let (known, missing): (Vec<String>, Vec<String>) = requirements
        .skills
        .iter()
        .cloned()
        .partition(|skill| declared.contains(skill.as_str()));

    debug!(
        role,
        known = known.len(),
        missing = missing.len(),
        "computed skill gap"
    );

    Ok(SkillGapResult {
        role: requirements.role.clone(),
        learning_order: missing.clone(),
        known,
        missing,
    })
}
