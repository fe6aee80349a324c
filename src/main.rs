use clap::Parser;
use rx_lessons::adapters::StdoutConsole;
use rx_lessons::utils::error::{AppError, ErrorSeverity};
use rx_lessons::utils::{logger, validation::Validate};
use rx_lessons::{catalog, write_report, CliConfig, LessonRunner, LessonSettings};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(config.verbose, config.log_format);

    tracing::info!("Starting rx-lessons CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(&config).await {
        // 記錄詳細錯誤信息
        tracing::error!(
            "❌ Lessons failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(config: &CliConfig) -> Result<(), AppError> {
    config.validate()?;
    let settings: LessonSettings = config.resolve_settings()?;
    settings.validate()?;

    if settings.monitoring {
        tracing::info!("🔍 Runtime monitoring enabled");
    }

    let runner = LessonRunner::new_with_monitoring(
        catalog(&settings),
        Arc::new(StdoutConsole),
        settings.lesson_timeout(),
        settings.monitoring,
    );

    if config.list {
        for (name, title) in runner.describe() {
            println!("{:<14} {}", name, title);
        }
        return Ok(());
    }

    let report = runner.run(&settings.lessons).await?;

    if let Some(path) = &config.report {
        write_report(&report, path).await?;
    }
    Ok(())
}
