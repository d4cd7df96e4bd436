use std::path::PathBuf;

pub const DEFAULT_DATASET: &str = "student_performance_extended.csv";
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub dataset_path: PathBuf,
    pub catalogue_path: Option<PathBuf>,
    pub log_filter: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // .env is optional

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Config {
            dataset_path: non_empty("ROADMAP_DATASET")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET)),
            catalogue_path: non_empty("ROADMAP_CATALOGUE").map(PathBuf::from),
            log_filter: non_empty("ROADMAP_LOG"),
        }
    }

    pub fn with_overrides(mut self, dataset: Option<PathBuf>, catalogue: Option<PathBuf>) -> Self {
        if let Some(dataset) = dataset {
            self.dataset_path = dataset;
        }
        if catalogue.is_some() {
            self.catalogue_path = catalogue;
        }
        self
    }
}
