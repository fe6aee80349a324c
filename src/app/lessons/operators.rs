use crate::app::lessons::{lesson_failed, section};
use crate::app::rx::{drive, merge, of, throw_error, LessonOperators};
use crate::domain::ports::{Console, Lesson};
use crate::utils::error::{Result, RxError, StreamError};
use async_trait::async_trait;
use rxr::subscribe::Subscriber;
use rxr::{Observable, ObservableExt};
use std::fmt::Display;
use std::sync::Arc;

/// concat 示範用的兩批資料
const BATCHES: [[i32; 3]; 2] = [[1, 2, 3], [4, 5, 6]];

/// 運算子：過濾 (filter, take)、轉換 (map)、組合 (merge, concat)、錯誤處理與工具 (tap)
pub struct OperatorsLesson;

fn print_values<T: Display + 'static>(console: &Arc<dyn Console>) -> Subscriber<T> {
    let (on_next, on_error) = (Arc::clone(console), Arc::clone(console));
    Subscriber::new(
        move |value: T| on_next.line(&value.to_string()),
        move |err: StreamError| on_error.error_line(&format!("Error: {}", err)),
        || {},
    )
}

fn tap_line(console: &Arc<dyn Console>, label: &'static str) -> Subscriber<i32> {
    let out = Arc::clone(console);
    Subscriber::new(
        move |value: i32| out.line(&format!("{}: {}", label, value)),
        |_: StreamError| {},
        || {},
    )
}

impl OperatorsLesson {
    async fn walkthrough(&self, console: &Arc<dyn Console>) -> std::result::Result<(), RxError> {
        section(console.as_ref(), "Operators: filter");
        drive(of(1..=5).filter(|x| x % 2 == 0), print_values(console)).await?;

        section(console.as_ref(), "Operators: take");
        drive(of(1..=10).take(3), print_values(console)).await?;

        section(console.as_ref(), "Operators: map");
        drive(of([1, 2, 3]).map(|x| x * x), print_values(console)).await?;

        section(console.as_ref(), "Operators: combination");
        drive(merge(vec![of(BATCHES[0]), of(BATCHES[1])]), print_values(console)).await?;

        // concat 等於一次只展開一個內層的 concatMap
        section(console.as_ref(), "Operators: concat");
        let concatenated = of([1usize, 0]).concat_map(|batch| of(BATCHES[batch]));
        drive(concatenated, print_values(console)).await?;

        section(console.as_ref(), "Operators: Error handling");
        let failing: Observable<String> = throw_error(RxError::message("Error occured"));
        let (on_next, on_error, on_complete) = (console.clone(), console.clone(), console.clone());
        drive(
            failing.catch_error(|err| of([err.to_string()])),
            Subscriber::new(
                move |value: String| on_next.line(&value),
                move |err: StreamError| on_error.line(&format!("Error: {}", err)),
                move || on_complete.line("Completed Error occured"),
            ),
        )
        .await?;

        section(console.as_ref(), "Operators: Utility");
        let output = Arc::clone(console);
        drive(
            of([1, 2, 3])
                .tap(tap_line(console, "Before"))
                .map(|value| value * 10)
                .tap(tap_line(console, "After")),
            Subscriber::new(
                move |value: i32| output.line(&format!("Output: {}", value)),
                |_: StreamError| {},
                || {},
            ),
        )
        .await
    }
}

#[async_trait]
impl Lesson for OperatorsLesson {
    fn name(&self) -> &str {
        "operators"
    }

    fn title(&self) -> &str {
        "Filtering, transformation, combination and error handling operators"
    }

    async fn run(&self, console: Arc<dyn Console>) -> Result<()> {
        self.walkthrough(&console)
            .await
            .map_err(|source| lesson_failed(self.name(), source))
    }
}
