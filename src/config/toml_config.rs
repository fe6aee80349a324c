use crate::config::settings::LessonSettings;
use crate::utils::error::{AppError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub lessons: Option<LessonsConfig>,
    pub timing: Option<TimingConfig>,
    pub subjects: Option<SubjectsConfig>,
    pub random: Option<RandomConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LessonsConfig {
    pub enabled: Option<Vec<String>>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimingConfig {
    pub late_emission_delay_ms: Option<u64>,
    pub max_fetch_delay_ms: Option<u64>,
    pub fetch_failure_rate: Option<f64>,
    pub action_interval_ms: Option<u64>,
    pub action_count: Option<usize>,
    pub user_count: Option<u32>,
    pub debounce_ms: Option<u64>,
    pub search_latency_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubjectsConfig {
    pub replay_buffer_size: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RandomConfig {
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default)]
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AppError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${RX_SEED})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| AppError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 把檔案中有設定的欄位套用到既有設定上
    pub fn apply_to(&self, settings: &mut LessonSettings) {
        if let Some(lessons) = &self.lessons {
            if let Some(enabled) = &lessons.enabled {
                settings.lessons = enabled.clone();
            }
            if let Some(timeout_ms) = lessons.timeout_ms {
                settings.lesson_timeout_ms = timeout_ms;
            }
        }

        if let Some(timing) = &self.timing {
            if let Some(v) = timing.late_emission_delay_ms {
                settings.late_emission_delay_ms = v;
            }
            if let Some(v) = timing.max_fetch_delay_ms {
                settings.max_fetch_delay_ms = v;
            }
            if let Some(v) = timing.fetch_failure_rate {
                settings.fetch_failure_rate = v;
            }
            if let Some(v) = timing.action_interval_ms {
                settings.action_interval_ms = v;
            }
            if let Some(v) = timing.action_count {
                settings.action_count = v;
            }
            if let Some(v) = timing.user_count {
                settings.user_count = v;
            }
            if let Some(v) = timing.debounce_ms {
                settings.debounce_ms = v;
            }
            if let Some(v) = timing.search_latency_ms {
                settings.search_latency_ms = v;
            }
        }

        if let Some(size) = self.subjects.as_ref().and_then(|s| s.replay_buffer_size) {
            settings.replay_buffer_size = size;
        }

        if let Some(seed) = self.random.as_ref().and_then(|r| r.seed) {
            settings.seed = Some(seed);
        }

        if let Some(monitoring) = &self.monitoring {
            settings.monitoring = monitoring.enabled;
        }
    }

    pub fn to_settings(&self) -> LessonSettings {
        let mut settings = LessonSettings::default();
        self.apply_to(&mut settings);
        settings
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.to_settings().validate()
    }
}
