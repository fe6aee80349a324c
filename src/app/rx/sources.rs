use crate::utils::error::{RxError, StreamError};
use parking_lot::Mutex;
use rxr::subscribe::{Subscriber, Subscription, SubscriptionHandle, UnsubscribeLogic};
use rxr::{Observable, Observer, Subscribeable, Unsubscribeable};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// 背景任務的訂閱：取消訂閱時 abort 任務
pub fn task_subscription(handle: JoinHandle<()>) -> Subscription {
    let abort = handle.abort_handle();
    Subscription::new(
        UnsubscribeLogic::Logic(Box::new(move || abort.abort())),
        SubscriptionHandle::JoinTask(handle),
    )
}

fn empty_subscription() -> Subscription {
    Subscription::new(UnsubscribeLogic::Nil, SubscriptionHandle::Nil)
}

/// 依序同步送出所有值後完成
pub fn of<T, I>(values: I) -> Observable<T>
where
    T: Clone + Send + Sync + 'static,
    I: IntoIterator<Item = T>,
{
    let values: Vec<T> = values.into_iter().collect();
    Observable::new(move |mut subscriber: Subscriber<T>| {
        for value in values.iter().cloned() {
            subscriber.next(value);
        }
        subscriber.complete();
        empty_subscription()
    })
}

/// 訂閱時立即送出錯誤
pub fn throw_error<T: Send + Sync + 'static>(err: RxError) -> Observable<T> {
    Observable::new(move |mut subscriber: Subscriber<T>| {
        subscriber.error(err.clone().into_stream());
        empty_subscription()
    })
}

/// 把 future 轉成 Observable
///
/// 每次訂閱都會呼叫 `factory` 產生新的 future，在背景任務中執行。
pub fn from_future<T, F, Fut>(factory: F) -> Observable<T>
where
    T: Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, RxError>> + Send + 'static,
{
    Observable::new(move |mut subscriber: Subscriber<T>| {
        let future = factory();
        task_subscription(tokio::spawn(async move {
            match future.await {
                Ok(value) => {
                    subscriber.next(value);
                    subscriber.complete();
                }
                Err(err) => subscriber.error(err.into_stream()),
            }
        }))
    })
}

/// 延遲 `delay` 後送出 0 並完成
pub fn timer(delay: Duration) -> Observable<u64> {
    Observable::new(move |mut subscriber: Subscriber<u64>| {
        task_subscription(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            subscriber.next(0);
            subscriber.complete();
        }))
    })
}

/// 每隔 `period` 送出 0, 1, 2, ...；第一個值在一個週期之後
pub fn interval(period: Duration) -> Observable<u64> {
    let period = period.max(Duration::from_millis(1));
    Observable::new(move |mut subscriber: Subscriber<u64>| {
        task_subscription(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            let mut count = 0u64;
            loop {
                ticker.tick().await;
                subscriber.next(count);
                count += 1;
            }
        }))
    })
}

/// 同時訂閱所有來源，全部完成後才完成
pub fn merge<T: Send + Sync + 'static>(mut sources: Vec<Observable<T>>) -> Observable<T> {
    Observable::new(move |subscriber: Subscriber<T>| {
        let downstream = Arc::new(Mutex::new(subscriber));
        if sources.is_empty() {
            downstream.lock().complete();
            return empty_subscription();
        }

        let remaining = Arc::new(AtomicUsize::new(sources.len()));
        let inner: Vec<Subscription> = sources
            .iter_mut()
            .map(|source| {
                let (next, error, complete) = (
                    Arc::clone(&downstream),
                    Arc::clone(&downstream),
                    Arc::clone(&downstream),
                );
                let remaining = Arc::clone(&remaining);
                source.subscribe(Subscriber::new(
                    move |value: T| next.lock().next(value),
                    move |err: StreamError| error.lock().error(err),
                    move || {
                        if remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
                            complete.lock().complete();
                        }
                    },
                ))
            })
            .collect();

        Subscription::new(
            UnsubscribeLogic::Logic(Box::new(move || {
                for subscription in inner {
                    subscription.unsubscribe();
                }
            })),
            SubscriptionHandle::Nil,
        )
    })
}
