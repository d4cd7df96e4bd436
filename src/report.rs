use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{RoadmapResult, SkillGapResult, StudentProfile};
use crate::skill_gap::RoleRequirements;

pub const NO_PEER_INSIGHT: &str = "No peer comparison available for this profile.";

fn display_name(name: Option<&str>) -> &str {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => "Student",
    }
}

pub fn export_file_name(name: Option<&str>) -> String {
    let stem = match name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_lowercase().replace(' ', "_"),
        _ => "student".to_string(),
    };
    format!("roadmap_{stem}.md")
}

fn profile_rows(profile: &StudentProfile) -> Vec<(&'static str, String)> {
    vec![
        ("Year", profile.year.to_string()),
        ("Branch", profile.branch.clone()),
        ("Interest", profile.interest.clone()),
        ("Skill Level", profile.skill_level.to_string()),
        ("Budget", profile.budget.to_string()),
        ("Hostel", if profile.hostel { "Yes" } else { "No" }.to_string()),
        ("Study Hours", profile.study_hours.to_string()),
        ("Sleep Hours", profile.sleep_hours.to_string()),
        ("GPA", format!("{:.1}", profile.gpa)),
        ("Failures", profile.failures.to_string()),
        ("Stress Level", profile.stress_level.to_string()),
        ("Confusion Level", profile.confusion_level.to_string()),
        ("Communication", profile.communication.to_string()),
        ("Family Support", profile.family_support.to_string()),
    ]
}

fn bullets(output: &mut String, items: &[String]) {
    for item in items {
        let _ = writeln!(output, "- {item}");
    }
    let _ = writeln!(output);
}

pub fn roadmap_to_markdown(
    name: Option<&str>,
    profile: &StudentProfile,
    roadmap: &RoadmapResult,
    generated_on: NaiveDate,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Personalized Roadmap for {}", display_name(name));
    let _ = writeln!(output, "**Generated on:** {generated_on}");
    let _ = writeln!(output);

    let _ = writeln!(output, "## Profile");
    for (label, value) in profile_rows(profile) {
        let _ = writeln!(output, "- **{label}**: {value}");
    }
    let _ = writeln!(output);

    let _ = writeln!(output, "## Data Insight");
    let _ = writeln!(
        output,
        "{}",
        roadmap.similar_note.as_deref().unwrap_or(NO_PEER_INSIGHT)
    );
    let _ = writeln!(output);

    let _ = writeln!(output, "## Goals");
    bullets(&mut output, &roadmap.goals);

    if !roadmap.risks.is_empty() {
        let _ = writeln!(output, "## Risks to Watch");
        bullets(&mut output, &roadmap.risks);
    }

    let _ = writeln!(output, "## Daily Habits");
    bullets(&mut output, &roadmap.habits);

    let _ = writeln!(output, "## Action Steps");
    bullets(&mut output, &roadmap.steps);

    let _ = writeln!(output, "## 4-Week Plan");
    for phase in &roadmap.week_plan {
        let _ = writeln!(output, "### {}", phase.title);
        bullets(&mut output, &phase.bullets);
    }

    let _ = writeln!(output, "## Suggested Projects");
    bullets(&mut output, &roadmap.projects);

    let _ = writeln!(output, "## Resources");
    bullets(&mut output, &roadmap.resources);

    output
}

pub fn skill_gap_to_markdown(gap: &SkillGapResult, requirements: &RoleRequirements) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Skill Gap: {}", gap.role);
    let _ = writeln!(output, "Coverage: {}% of required skills", gap.coverage_percent());
    let _ = writeln!(output);

    let _ = writeln!(output, "## Known Skills");
    if gap.known.is_empty() {
        let _ = writeln!(output, "None of the required skills yet.");
        let _ = writeln!(output);
    } else {
        bullets(&mut output, &gap.known);
    }

    let _ = writeln!(output, "## Missing Skills");
    if gap.missing.is_empty() {
        let _ = writeln!(output, "All required skills covered.");
        let _ = writeln!(output);
    } else {
        bullets(&mut output, &gap.missing);
    }

    if !gap.learning_order.is_empty() {
        let _ = writeln!(output, "## Learning Order");
        for (index, skill) in gap.learning_order.iter().enumerate() {
            let _ = writeln!(output, "{}. {skill}", index + 1);
        }
        let _ = writeln!(output);
    }

    let _ = writeln!(output, "## Suggested Projects");
    bullets(&mut output, &requirements.projects);

    let _ = writeln!(output, "## Resources");
    bullets(&mut output, &requirements.resources);

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Communication, Level, SkillLevel};
    use crate::roadmap::generate_roadmap;
    use crate::skill_gap::{skill_gap, SkillCatalogue};

    fn profile() -> StudentProfile {
        StudentProfile {
            year: 3,
            branch: "IT".to_string(),
            gpa: 5.4,
            study_hours: 2,
            failures: 1,
            hostel: true,
            sleep_hours: 6,
            family_support: Level::Medium,
            interest: "Robotics".to_string(),
            budget: Level::Low,
            skill_level: SkillLevel::Beginner,
            stress_level: Level::High,
            confusion_level: Level::Medium,
            communication: Communication::Average,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn heading_positions(markdown: &str, headings: &[&str]) -> Vec<usize> {
        headings
            .iter()
            .map(|heading| {
                markdown
                    .find(&format!("\n## {heading}\n"))
                    .unwrap_or_else(|| panic!("missing section {heading}"))
            })
            .collect()
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let roadmap = generate_roadmap(&profile(), None);
        let markdown = roadmap_to_markdown(Some("Avery Lee"), &profile(), &roadmap, date());

        assert!(markdown.starts_with("# Personalized Roadmap for Avery Lee\n"));
        assert!(markdown.contains("**Generated on:** 2026-03-01"));

        let positions = heading_positions(
            &markdown,
            &[
                "Profile",
                "Data Insight",
                "Goals",
                "Risks to Watch",
                "Daily Habits",
                "Action Steps",
                "4-Week Plan",
                "Suggested Projects",
                "Resources",
            ],
        );
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(markdown.contains("### Week 3 — Projects & Proof\n"));
        assert!(markdown.contains("- **Hostel**: Yes\n"));
        assert!(markdown.contains(NO_PEER_INSIGHT));
    }

    #[test]
    fn risks_section_omitted_when_empty() {
        let mut calm = profile();
        calm.stress_level = Level::Low;
        let roadmap = generate_roadmap(&calm, None);
        let markdown = roadmap_to_markdown(None, &calm, &roadmap, date());

        assert!(markdown.starts_with("# Personalized Roadmap for Student\n"));
        assert!(!markdown.contains("## Risks to Watch"));
    }

    #[test]
    fn export_file_names() {
        assert_eq!(export_file_name(Some("Avery Lee")), "roadmap_avery_lee.md");
        assert_eq!(export_file_name(Some("  ")), "roadmap_student.md");
        assert_eq!(export_file_name(None), "roadmap_student.md");
    }

    #[test]
    fn skill_gap_report_numbers_learning_order() {
        let catalogue = SkillCatalogue::builtin();
        let gap = skill_gap(&catalogue, "Frontend Developer", &["HTML", "React"]).unwrap();
        let requirements = catalogue.get("Frontend Developer").unwrap();
        let markdown = skill_gap_to_markdown(&gap, requirements);

        assert!(markdown.starts_with("# Skill Gap: Frontend Developer\n"));
        assert!(markdown.contains("Coverage: 33% of required skills"));
        assert!(markdown.contains("1. CSS\n2. JavaScript\n3. Responsive Design\n4. Git & GitHub\n"));
        assert!(markdown.contains("- MDN Web Docs\n"));
    }
}
