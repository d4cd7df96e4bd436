use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgGroup, Parser, Subcommand};
use tracing::warn;

mod config;
mod error;
mod models;
mod peers;
mod report;
mod roadmap;
mod skill_gap;

use config::Config;
use models::{RoadmapResult, StudentProfile};
use peers::{PeerColumn, PeerDataset};
use skill_gap::SkillCatalogue;

#[derive(Parser)]
#[command(name = "skill-roadmap")]
#[command(about = "Personalized student learning roadmaps and skill-gap reports", long_about = None)]
struct Cli {
    /// Log at debug level unless ROADMAP_LOG says otherwise
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a roadmap for a student profile (JSON file)
    #[command(group(
        ArgGroup::new("export_target")
            .args(["out", "export"])
            .multiple(false)
    ))]
    Roadmap {
        #[arg(long)]
        profile: PathBuf,
        #[arg(long)]
        dataset: Option<PathBuf>,
        /// Skip the peer comparison entirely
        #[arg(long)]
        no_peers: bool,
        #[arg(long)]
        name: Option<String>,
        /// Write the markdown export to this path
        #[arg(long)]
        out: Option<PathBuf>,
        /// Write the markdown export to roadmap_<name>.md
        #[arg(long)]
        export: bool,
        /// Print the roadmap as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Compare declared skills against a role's requirements
    SkillGap {
        #[arg(long)]
        role: String,
        #[arg(long = "skill")]
        skills: Vec<String>,
        #[arg(long)]
        catalogue: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// List the roles in the skill catalogue
    Roles {
        #[arg(long)]
        catalogue: Option<PathBuf>,
    },
    /// Show how a profile compares to similar peers
    Peers {
        #[arg(long)]
        profile: PathBuf,
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
    /// List the accepted values for each profile field
    Options {
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();
    init_tracing(cli.verbose, config.log_filter.as_deref())?;

    match cli.command {
        Commands::Roadmap {
            profile,
            dataset,
            no_peers,
            name,
            out,
            export,
            json,
        } => {
            let config = config.with_overrides(dataset, None);
            let student = load_profile(&profile)?;
            let peer_data = if no_peers {
                None
            } else {
                load_peers(&config.dataset_path)?
            };
            let summary = peer_data
                .as_ref()
                .map(|dataset| peers::filter_peers(dataset, &student).summary);
            let result = roadmap::generate_roadmap(&student, summary.as_ref());

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_roadmap(name.as_deref(), &student, &result);
            }

            let target = match (out, export) {
                (Some(path), _) => Some(path),
                (None, true) => Some(PathBuf::from(report::export_file_name(name.as_deref()))),
                (None, false) => None,
            };
            if let Some(path) = target {
                let today = chrono::Local::now().date_naive();
                let markdown = report::roadmap_to_markdown(name.as_deref(), &student, &result, today);
                std::fs::write(&path, markdown)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                announce_written(
                    &mut std::io::stdout(),
                    &mut std::io::stderr(),
                    json,
                    "Roadmap",
                    &path,
                )?;
            }
        }
        Commands::SkillGap {
            role,
            skills,
            catalogue,
            out,
            json,
        } => {
            let config = config.with_overrides(None, catalogue);
            let catalogue = load_catalogue(config.catalogue_path.as_deref())?;
            let gap = skill_gap::skill_gap(&catalogue, &role, skills.as_slice())?;
            let requirements = catalogue.get(&role)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&gap)?);
            } else {
                println!("Skill gap for {} ({}% covered):", gap.role, gap.coverage_percent());
                println!("Known: {}", joined_or_none(&gap.known));
                println!("Missing: {}", joined_or_none(&gap.missing));
                if !gap.learning_order.is_empty() {
                    println!("Learning order:");
                    for (index, skill) in gap.learning_order.iter().enumerate() {
                        println!("{}. {skill}", index + 1);
                    }
                }
                println!("Suggested projects:");
                for project in &requirements.projects {
                    println!("- {project}");
                }
                println!("Resources:");
                for resource in &requirements.resources {
                    println!("- {resource}");
                }
            }

            if let Some(path) = out {
                std::fs::write(&path, report::skill_gap_to_markdown(&gap, requirements))
                    .with_context(|| format!("failed to write {}", path.display()))?;
                announce_written(
                    &mut std::io::stdout(),
                    &mut std::io::stderr(),
                    json,
                    "Skill gap report",
                    &path,
                )?;
            }
        }
        Commands::Roles { catalogue } => {
            let config = config.with_overrides(None, catalogue);
            let catalogue = load_catalogue(config.catalogue_path.as_deref())?;
            for role in catalogue.roles() {
                println!("{role}");
            }
        }
        Commands::Peers { profile, dataset } => {
            let config = config.with_overrides(dataset, None);
            let student = load_profile(&profile)?;
            let dataset = PeerDataset::from_path(&config.dataset_path).with_context(|| {
                format!("failed to load peer dataset {}", config.dataset_path.display())
            })?;
            if dataset.is_empty() {
                warn!(path = %config.dataset_path.display(), "peer dataset has no rows");
            }
            let matched = peers::filter_peers(&dataset, &student);

            println!(
                "{} of {} peers share this profile's year/branch/interest/skill.",
                matched.rows.len(),
                dataset.len()
            );
            println!(
                "{}",
                matched
                    .summary
                    .note()
                    .as_deref()
                    .unwrap_or(report::NO_PEER_INSIGHT)
            );
        }
        Commands::Options { dataset } => {
            let config = config.with_overrides(dataset, None);
            let dataset = load_peers(&config.dataset_path)?.unwrap_or_default();
            let from_data = |column: PeerColumn, fallback: &[&str]| {
                dataset
                    .distinct(column)
                    .filter(|values| !values.is_empty())
                    .unwrap_or_else(|| fallback.iter().map(|v| v.to_string()).collect())
            };

            let rows = [
                ("year", from_data(PeerColumn::Year, &["1", "2", "3", "4"])),
                ("branch", from_data(PeerColumn::Branch, &["CSE", "IT", "ECE", "EEE"])),
                ("interest", from_data(PeerColumn::Interest, &["ML", "Web", "DSA"])),
                (
                    "skill_level",
                    from_data(
                        PeerColumn::SkillLevel,
                        &["Beginner", "Intermediate", "Advanced"],
                    ),
                ),
            ];
            for (field, values) in rows {
                println!("{field}: {}", values.join(", "));
            }
            for field in ["family_support", "budget", "stress_level", "confusion_level"] {
                println!("{field}: Low, Medium, High");
            }
            println!("communication: Poor, Average, Good");
            println!("hostel: Yes, No");
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool, filter: Option<&str>) -> anyhow::Result<()> {
    let level = if verbose {
        "debug"
    } else {
        config::DEFAULT_LOG_FILTER
    };
    let filter = tracing_subscriber::EnvFilter::new(filter.unwrap_or(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn load_profile(path: &Path) -> anyhow::Result<StudentProfile> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open profile {}", path.display()))?;
    StudentProfile::from_json_reader(file)
        .with_context(|| format!("invalid profile {}", path.display()))
}

fn load_peers(path: &Path) -> anyhow::Result<Option<PeerDataset>> {
    if !path.exists() {
        warn!(path = %path.display(), "peer dataset not found; continuing without peer insight");
        return Ok(None);
    }
    let dataset = PeerDataset::from_path(path)
        .with_context(|| format!("failed to load peer dataset {}", path.display()))?;
    Ok(Some(dataset))
}

fn load_catalogue(path: Option<&Path>) -> anyhow::Result<SkillCatalogue> {
    match path {
        Some(path) => SkillCatalogue::from_path(path)
            .with_context(|| format!("failed to load skill catalogue {}", path.display())),
        None => Ok(SkillCatalogue::builtin()),
    }
}

/// With `--json` stdout carries only the document, so the notice goes to stderr.
fn announce_written(
    stdout: &mut impl Write,
    stderr: &mut impl Write,
    json: bool,
    label: &str,
    path: &Path,
) -> std::io::Result<()> {
    let target: &mut dyn Write = if json { stderr } else { stdout };
    writeln!(target, "{label} written to {}.", path.display())
}

fn joined_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

fn print_roadmap(name: Option<&str>, student: &StudentProfile, result: &RoadmapResult) {
    println!(
        "Roadmap for {} (readiness {}/100)",
        name.filter(|n| !n.trim().is_empty()).unwrap_or("Student"),
        roadmap::readiness_score(student)
    );
    println!();
    println!(
        "{}",
        result
            .similar_note
            .as_deref()
            .unwrap_or(report::NO_PEER_INSIGHT)
    );

    println!();
    println!("Goals:");
    for goal in &result.goals {
        println!("- {goal}");
    }

    println!();
    println!("Risks to watch:");
    if result.risks.is_empty() {
        println!("- No risks flagged.");
    } else {
        for risk in &result.risks {
            println!("- {risk}");
        }
    }

    println!();
    println!("Daily habits:");
    for habit in &result.habits {
        println!("- {habit}");
    }

    println!();
    println!("Action steps:");
    for (index, step) in result.steps.iter().enumerate() {
        println!("{}. {step}", index + 1);
    }

    for phase in &result.week_plan {
        println!();
        println!("{}:", phase.title);
        for bullet in &phase.bullets {
            println!("- {bullet}");
        }
    }

    println!();
    println!("Suggested projects:");
    for project in &result.projects {
        println!("- {project}");
    }

    println!();
    println!("Resources:");
    for resource in &result.resources {
        println!("- {resource}");
    }
}
