use std::path::PathBuf;

/// Source table name, relative to the project root.
pub const DATASET_FILE: &str = "cleaned_flights_data_final.csv";
/// Parquet copy used when the CSV is absent.
pub const DATASET_PARQUET_FILE: &str = "cleaned_flights_data_final.parquet";
/// JSON records export, tried last.
pub const DATASET_JSON_FILE: &str = "cleaned_flights_data_final.json";
/// Directory holding `forecast_*.csv` artifacts.
pub const FORECASTS_DIR: &str = "predictions";

/// Fixed file locations under a project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardPaths {
    pub root: PathBuf,
    pub dataset: PathBuf,
    pub forecasts_dir: PathBuf,
}

impl DashboardPaths {
    /// The dataset is the first of CSV, Parquet and JSON that exists; when
    /// none does it stays the CSV path so the load reports it as missing.
    pub fn resolve(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let dataset = [DATASET_FILE, DATASET_PARQUET_FILE, DATASET_JSON_FILE]
            .into_iter()
            .map(|name| root.join(name))
            .find(|path| path.exists())
            .unwrap_or_else(|| root.join(DATASET_FILE));
        Self {
            forecasts_dir: root.join(FORECASTS_DIR),
            dataset,
            root,
        }
    }
}

/// Project root: the first command-line argument, else the working directory.
pub fn project_root(args: impl IntoIterator<Item = String>) -> PathBuf {
    args.into_iter()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn resolves_fixed_locations() {
        let dir = TempDir::new().unwrap();
        let paths = DashboardPaths::resolve(dir.path());
        assert_eq!(paths.dataset, dir.path().join("cleaned_flights_data_final.csv"));
        assert_eq!(paths.forecasts_dir, dir.path().join("predictions"));
    }

    #[test]
    fn falls_back_to_parquet_only_when_csv_is_absent() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(DATASET_PARQUET_FILE), b"").unwrap();
        assert_eq!(
            DashboardPaths::resolve(dir.path()).dataset,
            dir.path().join(DATASET_PARQUET_FILE)
        );

        std::fs::write(dir.path().join(DATASET_FILE), b"").unwrap();
        assert_eq!(
            DashboardPaths::resolve(dir.path()).dataset,
            dir.path().join(DATASET_FILE)
        );
    }

    #[test]
    fn json_export_is_used_when_nothing_else_exists() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(DATASET_JSON_FILE), b"[]").unwrap();
        assert_eq!(
            DashboardPaths::resolve(dir.path()).dataset,
            dir.path().join(DATASET_JSON_FILE)
        );

        std::fs::write(dir.path().join(DATASET_PARQUET_FILE), b"").unwrap();
        assert_eq!(
            DashboardPaths::resolve(dir.path()).dataset,
            dir.path().join(DATASET_PARQUET_FILE)
        );
    }

    #[test]
    fn root_comes_from_first_argument() {
        let args = ["dashboard".to_string(), "/data/flights".to_string()];
        assert_eq!(project_root(args), PathBuf::from("/data/flights"));
        assert_eq!(project_root(["dashboard".to_string()]), PathBuf::from("."));
    }
}
