use crate::domain::model::{LessonOutcome, RunReport};
use crate::domain::ports::{Console, Lesson};
use crate::utils::error::{AppError, Result};
use crate::utils::monitor::RuntimeMonitor;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// 依序執行課程，每個課程都有自己的逾時限制
pub struct LessonRunner {
    lessons: Vec<Box<dyn Lesson>>,
    console: Arc<dyn Console>,
    timeout: Duration,
    monitor: Option<RuntimeMonitor>,
}

impl LessonRunner {
    pub fn new(lessons: Vec<Box<dyn Lesson>>, console: Arc<dyn Console>, timeout: Duration) -> Self {
        Self {
            lessons,
            console,
            timeout,
            monitor: None,
        }
    }

    pub fn new_with_monitoring(
        lessons: Vec<Box<dyn Lesson>>,
        console: Arc<dyn Console>,
        timeout: Duration,
        monitor_enabled: bool,
    ) -> Self {
        let monitor = monitor_enabled.then(|| RuntimeMonitor::new(true));
        Self {
            monitor,
            ..Self::new(lessons, console, timeout)
        }
    }

    pub fn lesson_names(&self) -> Vec<&str> {
        self.lessons.iter().map(|lesson| lesson.name()).collect()
    }

    /// 名稱與標題，給 `--list` 使用
    pub fn describe(&self) -> Vec<(String, String)> {
        self.lessons
            .iter()
            .map(|lesson| (lesson.name().to_string(), lesson.title().to_string()))
            .collect()
    }

    /// 確認所有選取的課程都存在；任何一個不存在就不執行
    pub fn validate_selection(&self, selection: &[String]) -> Result<()> {
        let available = self.lesson_names();
        match selection
            .iter()
            .find(|name| !available.contains(&name.as_str()))
        {
            Some(unknown) => Err(AppError::UnknownLesson {
                name: unknown.clone(),
                available: available.join(", "),
            }),
            None => Ok(()),
        }
    }

    /// 執行選取的課程 (空的代表全部)，順序固定為課程目錄的順序
    pub async fn run(&self, selection: &[String]) -> Result<RunReport> {
        self.validate_selection(selection)?;

        let started = Instant::now();
        let mut report = RunReport::default();

        for lesson in self
            .lessons
            .iter()
            .filter(|lesson| selection.is_empty() || selection.iter().any(|s| s == lesson.name()))
        {
            report.lessons.push(self.run_lesson(lesson.as_ref()).await?);
        }

        report.total_duration_ms = started.elapsed().as_millis() as u64;

        if let Some(monitor) = &self.monitor {
            monitor.log_summary();
        }
        tracing::info!(
            "✅ Finished {} lesson(s) in {}ms",
            report.lessons.len(),
            report.total_duration_ms
        );

        Ok(report)
    }

    async fn run_lesson(&self, lesson: &dyn Lesson) -> Result<LessonOutcome> {
        tracing::info!("📚 Running lesson: {} ({})", lesson.name(), lesson.title());
        let started = Instant::now();

        match tokio::time::timeout(self.timeout, lesson.run(Arc::clone(&self.console))).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::error!("❌ Lesson failed: {}: {}", lesson.name(), e);
                return Err(e);
            }
            Err(_) => {
                tracing::error!("⏰ Lesson timed out: {}", lesson.name());
                return Err(AppError::LessonTimeout {
                    lesson: lesson.name().to_string(),
                    timeout_ms: self.timeout.as_millis() as u64,
                });
            }
        }

        let outcome = LessonOutcome {
            lesson: lesson.name().to_string(),
            duration_ms: started.elapsed().as_millis() as u64,
        };
        tracing::info!(
            "✅ Lesson completed: {} (duration: {}ms)",
            outcome.lesson,
            outcome.duration_ms
        );

        if let Some(monitor) = &self.monitor {
            monitor.sample(lesson.name());
        }

        Ok(outcome)
    }
}

/// 把執行結果寫成 JSON 檔
pub async fn write_report(report: &RunReport, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(report)?;
    tokio::fs::write(path, json).await?;
    tracing::info!("📁 Report saved to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryConsole;
    use crate::utils::error::RxError;
    use async_trait::async_trait;

    struct Echo(&'static str);

    #[async_trait]
    impl Lesson for Echo {
        fn name(&self) -> &str {
            self.0
        }

        fn title(&self) -> &str {
            "echo"
        }

        async fn run(&self, console: Arc<dyn Console>) -> Result<()> {
            console.line(self.0);
            Ok(())
        }
    }

    struct Stuck;

    #[async_trait]
    impl Lesson for Stuck {
        fn name(&self) -> &str {
            "stuck"
        }

        fn title(&self) -> &str {
            "never finishes"
        }

        async fn run(&self, _console: Arc<dyn Console>) -> Result<()> {
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    struct Broken;

    #[async_trait]
    impl Lesson for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn title(&self) -> &str {
            "fails"
        }

        async fn run(&self, _console: Arc<dyn Console>) -> Result<()> {
            Err(AppError::LessonFailed {
                lesson: "broken".to_string(),
                source: RxError::message("boom"),
            })
        }
    }

    fn runner(lessons: Vec<Box<dyn Lesson>>) -> (LessonRunner, Arc<MemoryConsole>) {
        let console = Arc::new(MemoryConsole::new());
        let runner = LessonRunner::new(lessons, console.clone(), Duration::from_secs(1));
        (runner, console)
    }

    #[tokio::test]
    async fn test_runs_selection_in_catalog_order() {
        let (runner, console) = runner(vec![Box::new(Echo("a")), Box::new(Echo("b")), Box::new(Echo("c"))]);

        let report = runner
            .run(&["c".to_string(), "a".to_string()])
            .await
            .unwrap();

        assert_eq!(report.lesson_names(), vec!["a", "c"]);
        assert_eq!(console.lines(), vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_unknown_lesson_runs_nothing() {
        let (runner, console) = runner(vec![Box::new(Echo("a"))]);

        let result = runner.run(&["a".to_string(), "nope".to_string()]).await;

        match result {
            Err(AppError::UnknownLesson { name, available }) => {
                assert_eq!(name, "nope");
                assert_eq!(available, "a");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(console.lines().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_lesson_timeout() {
        let (runner, _) = runner(vec![Box::new(Stuck)]);

        let result = runner.run(&[]).await;

        assert!(matches!(
            result,
            Err(AppError::LessonTimeout { timeout_ms: 1000, .. })
        ));
    }

    #[tokio::test]
    async fn test_failure_stops_the_run() {
        let (runner, console) = runner(vec![Box::new(Broken), Box::new(Echo("after"))]);

        let result = runner.run(&[]).await;

        assert!(matches!(result, Err(AppError::LessonFailed { .. })));
        assert!(console.lines().is_empty());
    }

    #[tokio::test]
    async fn test_write_report_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.json");
        let report = RunReport {
            lessons: vec![LessonOutcome {
                lesson: "a".to_string(),
                duration_ms: 3,
            }],
            total_duration_ms: 3,
        };

        write_report(&report, &path).await.unwrap();

        let saved: RunReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved.lesson_names(), vec!["a"]);
    }
}
