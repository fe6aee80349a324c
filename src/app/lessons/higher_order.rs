use crate::app::lessons::{lesson_failed, section};
use crate::app::rx::{drive, from_future, interval, of, task_subscription, timer, LessonOperators};
use crate::config::LessonSettings;
use crate::domain::model::UserDetails;
use crate::domain::ports::{Console, Lesson, UserDirectory};
use crate::utils::error::{Result, RxError, StreamError};
use async_trait::async_trait;
use rxr::subscribe::Subscriber;
use rxr::{Observable, ObservableExt, Observer};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// 模擬搜尋框的輸入：(距離開始的時間單位, 輸入框內容)
///
/// 一個時間單位是 debounce 的三分之一，所以前兩次與中間兩次都在同一段安靜期內。
const SEARCH_TYPING: &[(u32, &str)] = &[
    (0, "r"),
    (1, "rx"),
    (15, "rxj"),
    (16, "rxjs"),
    (22, "rxj"),
    (23, "rxjs"),
    (27, "rust"),
];

const TASK_STEP: Duration = Duration::from_millis(100);

/// 高階 Observable：mergeMap、concatMap、switchMap、exhaustMap
pub struct HigherOrderLesson<D> {
    users: D,
    user_count: u32,
    action_interval: Duration,
    action_count: usize,
    debounce: Duration,
    search_latency: Duration,
}

impl<D: UserDirectory> HigherOrderLesson<D> {
    pub fn new(users: D, settings: &LessonSettings) -> Self {
        Self {
            users,
            user_count: settings.user_count,
            action_interval: settings.action_interval(),
            action_count: settings.action_count,
            debounce: settings.debounce(),
            search_latency: settings.search_latency(),
        }
    }

    fn user_ids(&self) -> Observable<u32> {
        of(1..=self.user_count)
    }

    async fn merge_map(&self, console: &Arc<dyn Console>) -> std::result::Result<(), RxError> {
        section(console.as_ref(), "Higher-Order Observables: mergeMap");
        let users = self.users;
        let fetched = self.user_ids().merge_map(move |id| fetch_user_data(users, id));
        drive(fetched, print_user_details(console, "mergeMap")).await
    }

    async fn concat_map(&self, console: &Arc<dyn Console>) -> std::result::Result<(), RxError> {
        section(console.as_ref(), "Higher-Order Observables: concatMap");
        let users = self.users;
        let fetched = self.user_ids().concat_map(move |id| fetch_user_data(users, id));
        drive(fetched, print_user_details(console, "concatMap")).await?;

        // 越晚的任務越快完成，輸出仍然照順序
        let count = self.user_count;
        let tasks = self.user_ids().concat_map(move |id| perform_task(id, count));
        let out = Arc::clone(console);
        drive(
            tasks,
            Subscriber::new(
                move |result: String| out.line(&format!("concatMap: performTask: {}", result)),
                |_: StreamError| {},
                || {},
            ),
        )
        .await
    }

    async fn switch_map(&self, console: &Arc<dyn Console>) -> std::result::Result<(), RxError> {
        section(console.as_ref(), "Higher-Order Observables: switchMap");
        let users = self.users;
        let fetched = self.user_ids().switch_map(move |id| fetch_user_data(users, id));
        drive(fetched, print_user_details(console, "switchMap")).await?;

        let latency = self.search_latency;
        let searching = Arc::clone(console);
        let results = keystrokes(self.debounce / 3)
            .debounce_time(self.debounce)
            .distinct_until_changed()
            .tap(Subscriber::new(
                move |query: String| searching.line(&format!("switchMap: searching for \"{}\"", query)),
                |_: StreamError| {},
                || {},
            ))
            .switch_map(move |query| search(query, latency));
        let out = Arc::clone(console);
        drive(
            results,
            Subscriber::new(
                move |result: String| out.line(&format!("switchMap: {}", result)),
                |_: StreamError| {},
                || {},
            ),
        )
        .await
    }

    async fn exhaust_map(&self, console: &Arc<dyn Console>) -> std::result::Result<(), RxError> {
        section(console.as_ref(), "Higher-Order Observables: exhaustMap");
        let users = self.users;
        let clicks = interval(self.action_interval)
            .take(self.action_count)
            .enumerate()
            .exhaust_map(move |(index, _tick)| fetch_user_data(users, index as u32 + 1));

        let (on_next, on_error, on_complete) = (console.clone(), console.clone(), console.clone());
        drive(
            clicks,
            Subscriber::new(
                move |user: UserDetails| {
                    on_next.line(&format!(
                        "exhaustMap: Fetched User Data: {}, Fetching Time: {}ms",
                        user.user_name, user.delay
                    ))
                },
                move |err: StreamError| on_error.error_line(&format!("exhaustMap: {}", err)),
                move || on_complete.line("exhaustMap: Completed processing all user data"),
            ),
        )
        .await
    }
}

/// 把非同步的使用者查詢包成 Observable
pub fn fetch_user_data<D: UserDirectory>(users: D, user_id: u32) -> Observable<UserDetails> {
    from_future(move || async move { users.fetch_user(user_id).await })
}

fn perform_task(task_id: u32, task_count: u32) -> Observable<String> {
    let steps = task_count.saturating_sub(task_id) + 1;
    timer(TASK_STEP * steps).map(move |_| format!("Completed Task {}", task_id))
}

fn search(query: String, latency: Duration) -> Observable<String> {
    from_future(move || {
        let query = query.clone();
        async move {
            tokio::time::sleep(latency).await;
            Ok(format!("Result for \"{}\"", query))
        }
    })
}

fn keystrokes(unit: Duration) -> Observable<String> {
    Observable::new(move |mut subscriber: Subscriber<String>| {
        task_subscription(tokio::spawn(async move {
            let started = Instant::now();
            for (at, text) in SEARCH_TYPING {
                tokio::time::sleep_until(started + unit * *at).await;
                subscriber.next(text.to_string());
            }
            subscriber.complete();
        }))
    })
}

fn print_user_details(console: &Arc<dyn Console>, label: &'static str) -> Subscriber<UserDetails> {
    let (on_next, on_error) = (Arc::clone(console), Arc::clone(console));
    Subscriber::new(
        move |user: UserDetails| {
            on_next.line(&format!(
                "{}: Fetched User Details: {} (after {}ms)",
                label, user.user_name, user.delay
            ))
        },
        move |err: StreamError| on_error.error_line(&format!("{}: {}", label, err)),
        || {},
    )
}

#[async_trait]
impl<D: UserDirectory> Lesson for HigherOrderLesson<D> {
    fn name(&self) -> &str {
        "higher-order"
    }

    fn title(&self) -> &str {
        "Flattening inner observables with merge, concat, switch and exhaust"
    }

    async fn run(&self, console: Arc<dyn Console>) -> Result<()> {
        tracing::debug!("🔀 Fetching {} users per section", self.user_count);
        let walkthrough = async {
            self.merge_map(&console).await?;
            self.concat_map(&console).await?;
            self.switch_map(&console).await?;
            self.exhaust_map(&console).await
        };
        walkthrough
            .await
            .map_err(|source| lesson_failed(self.name(), source))
    }
}
