use rx_lessons::adapters::MemoryConsole;
use rx_lessons::config::TomlConfig;
use rx_lessons::domain::model::RunReport;
use rx_lessons::utils::error::{AppError, ErrorCategory};
use rx_lessons::utils::validation::Validate;
use rx_lessons::{catalog, write_report, LessonRunner, LessonSettings};
use std::sync::Arc;
use std::time::Duration;

fn runner_with(settings: &LessonSettings, timeout: Duration) -> (LessonRunner, Arc<MemoryConsole>) {
    let console = Arc::new(MemoryConsole::new());
    (
        LessonRunner::new(catalog(settings), console.clone(), timeout),
        console,
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_toml_selection_and_report() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join("lessons.toml");
    std::fs::write(
        &config_path,
        r#"
[lessons]
enabled = ["subjects", "operators"]

[subjects]
replay_buffer_size = 2
"#,
    )?;

    let config = TomlConfig::from_file(&config_path)?;
    config.validate()?;
    let settings = config.to_settings();
    let (runner, console) = runner_with(&settings, settings.lesson_timeout());

    let report = runner.run(&settings.lessons).await?;
    assert_eq!(report.lesson_names(), vec!["operators", "subjects"]);
    assert!(!console.contains("got value 1"));

    let report_path = dir.path().join("report.json");
    write_report(&report, &report_path).await?;
    let saved: RunReport = serde_json::from_str(&std::fs::read_to_string(&report_path)?)?;
    assert_eq!(saved.lesson_names(), report.lesson_names());
    Ok(())
}

#[tokio::test]
async fn test_unknown_lesson_is_a_configuration_error() {
    let settings = LessonSettings::default();
    let (runner, console) = runner_with(&settings, settings.lesson_timeout());

    let err = runner
        .run(&["observables".to_string(), "schedulers".to_string()])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::UnknownLesson { ref name, .. } if name == "schedulers"));
    assert_eq!(err.category(), ErrorCategory::Configuration);
    assert!(err.recovery_suggestion().contains("--list"));
    assert!(console.lines().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_slow_lesson_times_out() {
    let settings = LessonSettings {
        late_emission_delay_ms: 600,
        ..LessonSettings::default()
    };
    let (runner, console) = runner_with(&settings, Duration::from_millis(100));

    let err = runner.run(&["observables".to_string()]).await.unwrap_err();

    assert!(matches!(err, AppError::LessonTimeout { ref lesson, timeout_ms: 100 } if lesson == "observables"));
    assert!(console.contains("got value 3"));
    assert!(!console.contains("got value 4"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_timed_out_lesson_writes_nothing_afterwards() {
    let settings = LessonSettings {
        late_emission_delay_ms: 300,
        ..LessonSettings::default()
    };
    let (runner, console) = runner_with(&settings, Duration::from_millis(100));

    let err = runner.run(&["observables".to_string()]).await.unwrap_err();
    assert!(matches!(err, AppError::LessonTimeout { .. }));
    let lines_at_timeout = console.lines();

    tokio::time::sleep(Duration::from_millis(800)).await;

    assert_eq!(console.lines(), lines_at_timeout);
    assert!(!console.contains("got value 4"));
    assert!(!console.contains("done"));
}

#[test]
fn test_catalog_describes_every_lesson() {
    let settings = LessonSettings::default();
    let (runner, _) = runner_with(&settings, settings.lesson_timeout());

    let described = runner.describe();
    assert_eq!(described.len(), 4);
    assert!(described.iter().all(|(_, title)| !title.is_empty()));
}
