use async_trait::async_trait;
use parking_lot::Mutex;
use rx_lessons::adapters::MemoryConsole;
use rx_lessons::app::rx::{collect, from_future, interval, merge, of, throw_error, timer, LessonOperators};
use rx_lessons::domain::model::UserDetails;
use rx_lessons::domain::ports::UserDirectory;
use rx_lessons::utils::error::{AppError, ErrorCategory};
use rx_lessons::{catalog_with, LessonRunner, LessonSettings, RxError, StreamError};
use rxr::subjects::BehaviorSubject;
use rxr::subscribe::Subscriber;
use rxr::{Observable, ObservableExt, Observer, Subscribeable, Unsubscribeable};
use std::sync::Arc;
use std::time::Duration;

fn recorder<T: Send + 'static>() -> (Arc<Mutex<Vec<T>>>, Subscriber<T>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let subscriber = Subscriber::new(move |v: T| sink.lock().push(v), |_: StreamError| {}, || {});
    (seen, subscriber)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_operator_chain_collects_values() {
    let values = collect(of(1..=10).filter(|x| x % 3 == 0).map(|x| x * 2)).await;
    assert_eq!(values, Ok(vec![6, 12, 18]));
}

#[tokio::test]
async fn test_error_reaches_collect() {
    let failing: Observable<i32> = throw_error(RxError::message("nope"));
    assert_eq!(collect(failing).await, Err(RxError::message("nope")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_merge_interleaves_by_time() {
    let slow = timer(Duration::from_millis(200)).map(|_| "slow");
    let fast = timer(Duration::from_millis(50)).map(|_| "fast");

    assert_eq!(collect(merge(vec![slow, fast])).await, Ok(vec!["fast", "slow"]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_observable_is_cold() {
    let ticks = || interval(Duration::from_millis(10)).take(3);

    assert_eq!(collect(ticks()).await, Ok(vec![0, 1, 2]));
    assert_eq!(collect(ticks()).await, Ok(vec![0, 1, 2]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unsubscribe_cancels_pending_future() {
    let mut source: Observable<u32> = from_future(|| async {
        tokio::time::sleep(Duration::from_millis(300)).await;
        Ok::<_, RxError>(1)
    });
    let (seen, subscriber) = recorder();
    let subscription = source.subscribe(subscriber);

    tokio::time::sleep(Duration::from_millis(50)).await;
    subscription.unsubscribe();
    tokio::time::sleep(Duration::from_millis(600)).await;

    assert!(seen.lock().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concat_map_drains_long_backlog_of_sync_inners() {
    // 第一個內層要等計時器，其餘的值全部排隊，之後一次同步完成
    let drained = of(0..200u64).concat_map(|i| {
        if i == 0 {
            timer(Duration::from_millis(20))
        } else {
            of([i])
        }
    });

    assert_eq!(collect(drained).await, Ok((0..200).collect::<Vec<u64>>()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_long_lived_merge_map_stops_after_unsubscribe() {
    let mut flattened = interval(Duration::from_millis(1)).merge_map(|tick| of([tick]));
    let (seen, subscriber) = recorder::<u64>();
    let subscription = flattened.subscribe(subscriber);

    tokio::time::sleep(Duration::from_millis(300)).await;
    subscription.unsubscribe();
    tokio::time::sleep(Duration::from_millis(50)).await;
    let delivered = seen.lock().len();
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(delivered > 50, "only {} ticks delivered", delivered);
    assert_eq!(seen.lock().len(), delivered);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_behavior_subject_feeds_operators() {
    let (mut emitter, receiver) = BehaviorSubject::emitter_receiver(1);
    let (seen, subscriber) = recorder::<i32>();
    receiver.clone().map(|x| x * 2).subscribe(subscriber);

    emitter.next(5);
    emitter.complete();

    assert_eq!(*seen.lock(), vec![2, 10]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_debounced_search_terms_skip_repeats() {
    let typed = merge(
        [(0, "r"), (20, "rx"), (300, "rx"), (600, "rust")]
            .into_iter()
            .map(|(at, text)| {
                from_future(move || async move {
                    tokio::time::sleep(Duration::from_millis(at)).await;
                    Ok(text.to_string())
                })
            })
            .collect(),
    )
    .debounce_time(Duration::from_millis(100))
    .distinct_until_changed();

    assert_eq!(collect(typed).await, Ok(vec!["rx".to_string(), "rust".to_string()]));
}

#[derive(Debug, Clone, Copy)]
struct OfflineDirectory;

#[async_trait]
impl UserDirectory for OfflineDirectory {
    async fn fetch_user(&self, user_id: u32) -> Result<UserDetails, RxError> {
        Err(RxError::FetchFailed {
            user_id,
            reason: "offline".to_string(),
        })
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_failed_fetch_is_reported_as_lesson_failure() {
    let settings = LessonSettings::default();
    let console = Arc::new(MemoryConsole::new());
    let runner = LessonRunner::new(
        catalog_with(&settings, OfflineDirectory),
        console.clone(),
        settings.lesson_timeout(),
    );

    let err = runner.run(&["higher-order".to_string()]).await.unwrap_err();

    assert!(matches!(
        err,
        AppError::LessonFailed {
            ref lesson,
            source: RxError::FetchFailed { .. },
        } if lesson == "higher-order"
    ));
    assert_eq!(err.category(), ErrorCategory::Stream);
    assert!(!console.lines_matching("[stderr] mergeMap: Failed to fetch user").is_empty());
}
