use crate::config::{LessonSettings, TomlConfig};
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use crate::utils::validation::{validate_file_extension, validate_path, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "rx-lessons")]
#[command(about = "Walk through observables, operators and subjects with console output")]
pub struct CliConfig {
    /// Lessons to run, comma separated (default: all)
    #[arg(long, value_delimiter = ',')]
    pub lessons: Vec<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Upper bound of the simulated fetch latency
    #[arg(long)]
    pub max_fetch_delay_ms: Option<u64>,

    /// Probability (0 to 1) that a simulated fetch fails
    #[arg(long)]
    pub fetch_failure_rate: Option<f64>,

    /// Period of the simulated user actions in the exhaustMap lesson
    #[arg(long)]
    pub action_interval_ms: Option<u64>,

    /// Seed for the simulated latencies, for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Abort a lesson that runs longer than this
    #[arg(long)]
    pub lesson_timeout_ms: Option<u64>,

    /// Write a JSON run report to this path
    #[arg(long)]
    pub report: Option<String>,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,

    /// List the available lessons and exit
    #[arg(long)]
    pub list: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Enable runtime monitoring")]
    pub monitor: bool,
}

impl CliConfig {
    /// 合併預設值、TOML 檔與命令列參數
    pub fn resolve_settings(&self) -> Result<LessonSettings> {
        let mut settings = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                TomlConfig::from_file(path)?.to_settings()
            }
            None => LessonSettings::default(),
        };

        if !self.lessons.is_empty() {
            settings.lessons = self.lessons.clone();
        }
        if let Some(v) = self.max_fetch_delay_ms {
            settings.max_fetch_delay_ms = v;
        }
        if let Some(v) = self.fetch_failure_rate {
            settings.fetch_failure_rate = v;
        }
        if let Some(v) = self.action_interval_ms {
            settings.action_interval_ms = v;
        }
        if let Some(v) = self.lesson_timeout_ms {
            settings.lesson_timeout_ms = v;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        if self.monitor {
            settings.monitoring = true;
        }

        Ok(settings)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.config {
            validate_path("config", path)?;
            validate_file_extension("config", path, &["toml"])?;
        }
        if let Some(path) = &self.report {
            validate_path("report", path)?;
            validate_file_extension("report", path, &["json"])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_lessons_list() {
        let config = CliConfig::parse_from(["rx-lessons", "--lessons", "operators,subjects", "-v"]);
        assert_eq!(config.lessons, vec!["operators", "subjects"]);
        assert!(config.verbose);
        assert_eq!(config.log_format, LogFormat::Compact);
    }

    #[test]
    fn test_cli_overrides_toml() {
        let mut temp_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        temp_file
            .write_all(b"[timing]\naction_interval_ms = 100\nmax_fetch_delay_ms = 400\n")
            .unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();

        let config = CliConfig::parse_from([
            "rx-lessons",
            "--config",
            path.as_str(),
            "--max-fetch-delay-ms",
            "50",
            "--seed",
            "3",
        ]);
        assert!(config.validate().is_ok());

        let settings = config.resolve_settings().unwrap();
        assert_eq!(settings.action_interval_ms, 100);
        assert_eq!(settings.max_fetch_delay_ms, 50);
        assert_eq!(settings.seed, Some(3));
    }

    #[test]
    fn test_rejects_non_json_report_path() {
        let config = CliConfig::parse_from(["rx-lessons", "--report", "report.txt"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_config_file_is_io_error() {
        let file = NamedTempFile::new().unwrap();
        let missing = file.path().with_extension("missing.toml");
        let config = CliConfig::parse_from(["rx-lessons", "--config", missing.to_str().unwrap()]);

        assert!(matches!(
            config.resolve_settings(),
            Err(crate::utils::error::AppError::IoError(_))
        ));
    }

    #[test]
    fn test_fetch_failure_rate_flag() {
        let config = CliConfig::parse_from(["rx-lessons", "--fetch-failure-rate", "0.5"]);
        let settings = config.resolve_settings().unwrap();
        assert_eq!(settings.fetch_failure_rate, 0.5);
        assert!(settings.validate().is_ok());
    }
}
