use tracing::debug;

use crate::models::{
    Communication, Level, PeerSummary, RoadmapResult, SkillLevel, StudentProfile, WeekPhase,
};

pub const LOW_GPA: f64 = 6.0;
pub const LOW_STUDY_HOURS: u32 = 3;

#[derive(Debug, Clone, Copy)]
pub struct InterestRoute {
    pub keywords: &'static [&'static str],
    pub resources: &'static [&'static str],
    pub projects: &'static [&'static str],
}

/// Evaluated top to bottom against the lowercased interest; first match wins.
pub const INTEREST_ROUTES: &[InterestRoute] = &[
    InterestRoute {
        keywords: &["data", "ml", "ai"],
        resources: &[
            "NPTEL / YouTube: Python + ML basics",
            "Kaggle: datasets + notebooks",
            "GitHub: portfolio + README",
            "LeetCode/HackerRank: fundamentals (optional)",
        ],
        projects: &[
            "Student performance prediction / analysis dashboard",
            "Mini recommender system",
            "Simple ML model + Streamlit deployment",
        ],
    },
    InterestRoute {
        keywords: &["web"],
        resources: &[
            "MDN Web Docs (HTML/CSS/JS)",
            "Frontend practice: small clones",
            "GitHub Pages / Vercel for deployment",
        ],
        projects: &[
            "Portfolio website",
            "To-do app + local storage",
            "Mini full-stack CRUD app",
        ],
    },
];

pub const FALLBACK_ROUTE: InterestRoute = InterestRoute {
    keywords: &[],
    resources: &[
        "YouTube + NPTEL fundamentals",
        "One structured course (beginner → intermediate)",
        "Build 2–3 projects + document well",
    ],
    projects: &[
        "1 mini project",
        "1 intermediate project",
        "1 portfolio-grade project",
    ],
};

pub fn route_interest(interest: &str) -> &'static InterestRoute {
    let interest = interest.to_lowercase();
    INTEREST_ROUTES
        .iter()
        .find(|route| route.keywords.iter().any(|k| interest.contains(k)))
        .unwrap_or(&FALLBACK_ROUTE)
}

fn weak_communication(profile: &StudentProfile) -> bool {
    profile.communication == Communication::Poor
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

pub fn build_week_plan(interest: &str, skill_level: SkillLevel, budget: Level) -> Vec<WeekPhase> {
    let budget_note = if budget == Level::Low {
        "Use free resources (YouTube/NPTEL/free Coursera audits)."
    } else {
        "Consider 1 paid course + mentorship for speed."
    };

    let (depth, project) = if skill_level == SkillLevel::Beginner {
        (
            "Focus on fundamentals + consistent practice",
            "Mini project: build a basic end-to-end demo",
        )
    } else {
        (
            "Focus on advanced concepts + real datasets + deployment",
            "Project: build a portfolio-grade real-world application",
        )
    };

    vec![
        WeekPhase {
            title: "Week 1 — Foundation".to_string(),
            bullets: vec![
                format!("{depth} in {interest} (core concepts)."),
                "Set up tools (GitHub, editor, notes).".to_string(),
                "Daily practice: 45–60 mins.".to_string(),
                budget_note.to_string(),
            ],
        },
        WeekPhase {
            title: "Week 2 — Skill Building".to_string(),
            bullets: to_strings(&[
                "Solve 10–15 practice problems / exercises.",
                "Start a structured course + take notes.",
                "Build 1 small component (feature/module) daily.",
            ]),
        },
        WeekPhase {
            title: "Week 3 — Projects & Proof".to_string(),
            bullets: vec![
                project.to_string(),
                "Add README + screenshots + clear steps.".to_string(),
                "Push code daily to GitHub (commit streak).".to_string(),
            ],
        },
        WeekPhase {
            title: "Week 4 — Career Readiness".to_string(),
            bullets: to_strings(&[
                "Resume: add project + skills + links.",
                "Mock interview / presentations (2 sessions).",
                "Polish project + deploy (if possible).",
                "Plan next month based on gaps.",
            ]),
        },
    ]
}

pub fn generate_roadmap(profile: &StudentProfile, peers: Option<&PeerSummary>) -> RoadmapResult {
    let low_gpa = profile.gpa < LOW_GPA;
    let low_hours = profile.study_hours < LOW_STUDY_HOURS;
    let weak_comm = weak_communication(profile);

    let mut goals = vec![format!(
        "Build a clear learning path in {}.",
        profile.interest
    )];
    if low_gpa {
        goals.push("Improve academic consistency (target +0.5 GPA in next semester).".to_string());
    }
    if low_hours {
        goals.push("Increase study hours gradually to a sustainable level.".to_string());
    }
    if weak_comm {
        goals.push("Improve communication through weekly speaking/writing practice.".to_string());
    }

    let mut risks = Vec::new();
    let mut habits = Vec::new();
    if profile.stress_level == Level::High || profile.confusion_level == Level::High {
        risks.push(
            "High stress/confusion can reduce consistency → use weekly planning + short focused sessions."
                .to_string(),
        );
        habits.push("10 min breathing/meditation + 25/5 Pomodoro (2 cycles).".to_string());
    }

    if profile.hostel {
        habits.push(
            "Hostel routine: fixed sleep + fixed study slot + limit late-night scrolling."
                .to_string(),
        );
    } else {
        habits.push(
            "Home routine: fixed study slot + communicate study time to family.".to_string(),
        );
    }

    let mut steps = Vec::new();
    if profile.family_support == Level::Low {
        steps.push(
            "Get external support: mentor/teacher/peer group + online communities.".to_string(),
        );
    } else {
        steps.push(
            "Use family support: share weekly goals and ask for accountability.".to_string(),
        );
    }

    if profile.budget == Level::Low {
        steps.push("Use free resources first + build projects (proof > certificates).".to_string());
    } else {
        steps.push("Pick 1 high-quality paid course OR mentorship for faster progress.".to_string());
    }

    if low_hours {
        steps.push("Study plan: add +30 mins/week until you reach 3–4 hours/day.".to_string());
    }
    if low_gpa {
        steps.push("Academics: revise daily + weekly tests + focus on weak subjects.".to_string());
    }
    if weak_comm {
        steps.push(
            "Communication: 2 short talks/week + write 1 summary/day (5–7 lines).".to_string(),
        );
    }

    let route = route_interest(&profile.interest);
    debug!(
        interest = %profile.interest,
        goals = goals.len(),
        risks = risks.len(),
        steps = steps.len(),
        "generated roadmap"
    );

    RoadmapResult {
        similar_note: peers.and_then(PeerSummary::note),
        goals,
        risks,
        habits,
        steps,
        week_plan: build_week_plan(&profile.interest, profile.skill_level, profile.budget),
        resources: to_strings(route.resources),
        projects: to_strings(route.projects),
    }
}

pub fn readiness_score(profile: &StudentProfile) -> u32 {
    let gpa = if profile.gpa >= 7.0 {
        30
    } else if profile.gpa >= 6.0 {
        20
    } else {
        10
    };
    let hours = match profile.study_hours {
        4.. => 25,
        3 => 15,
        _ => 8,
    };
    let stress = if profile.stress_level == Level::High { 8 } else { 20 };
    let confusion = if profile.confusion_level == Level::High { 8 } else { 15 };
    let communication = if weak_communication(profile) { 5 } else { 10 };

    (gpa + hours + stress + confusion + communication).min(100)
}
