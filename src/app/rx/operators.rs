use crate::utils::error::{RxError, StreamError};
use parking_lot::Mutex;
use rxr::subscribe::{Subscriber, Subscription, SubscriptionHandle, UnsubscribeLogic};
use rxr::{Observable, Observer, Subscribeable, Unsubscribeable};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

type Downstream<T> = Arc<Mutex<Subscriber<T>>>;

/// 課程用到、rxr 沒有提供的運算子
pub trait LessonOperators<T>: Sized {
    /// 每個值附上從 0 開始的索引
    fn enumerate(self) -> Observable<(usize, T)>;

    /// 來源錯誤時改訂閱 `handler` 回傳的 Observable
    fn catch_error<F>(self, handler: F) -> Observable<T>
    where
        F: Fn(RxError) -> Observable<T> + Send + Sync + 'static;

    /// 只在安靜 `quiet` 之後送出最後一個值；來源完成時立即送出尚未送出的值
    fn debounce_time(self, quiet: Duration) -> Observable<T>;

    /// 略過和上一個送出的值相同的值
    fn distinct_until_changed(self) -> Observable<T>
    where
        T: PartialEq + Clone;
}

fn share<T>(subscriber: Subscriber<T>) -> Downstream<T> {
    Arc::new(Mutex::new(subscriber))
}

/// 原樣轉送 error 與 complete，只自訂 next
fn forward<T, U, N>(downstream: &Downstream<U>, next: N) -> Subscriber<T>
where
    T: 'static,
    U: 'static,
    N: FnMut(T) + Send + Sync + 'static,
{
    let (error, complete) = (Arc::clone(downstream), Arc::clone(downstream));
    Subscriber::new(
        next,
        move |err: StreamError| error.lock().error(err),
        move || complete.lock().complete(),
    )
}

fn wrap(upstream: Subscription) -> Subscription {
    Subscription::new(
        UnsubscribeLogic::Wrapped(Box::new(upstream)),
        SubscriptionHandle::Nil,
    )
}

struct Debounce<T> {
    pending: Option<T>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl<T> Debounce<T> {
    fn new() -> Self {
        Self {
            pending: None,
            generation: 0,
            timer: None,
        }
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl<T: Send + Sync + 'static> LessonOperators<T> for Observable<T> {
    fn enumerate(self) -> Observable<(usize, T)> {
        let mut source = self;
        Observable::new(move |subscriber: Subscriber<(usize, T)>| {
            let downstream = share(subscriber);
            let next = Arc::clone(&downstream);
            let index = AtomicUsize::new(0);
            wrap(source.subscribe(forward(&downstream, move |value: T| {
                let i = index.fetch_add(1, Ordering::Relaxed);
                next.lock().next((i, value));
            })))
        })
    }

    fn catch_error<F>(self, handler: F) -> Observable<T>
    where
        F: Fn(RxError) -> Observable<T> + Send + Sync + 'static,
    {
        let mut source = self;
        let handler = Arc::new(handler);
        Observable::new(move |subscriber: Subscriber<T>| {
            let downstream = share(subscriber);
            let fallback: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

            let on_error = {
                let handler = Arc::clone(&handler);
                let downstream = Arc::clone(&downstream);
                let fallback = Arc::clone(&fallback);
                move |err: StreamError| {
                    let mut replacement = handler(RxError::from_stream(&err));
                    let next = Arc::clone(&downstream);
                    let subscription = replacement
                        .subscribe(forward(&downstream, move |value: T| next.lock().next(value)));
                    *fallback.lock() = Some(subscription);
                }
            };
            let (next, complete) = (Arc::clone(&downstream), Arc::clone(&downstream));
            let upstream = source.subscribe(Subscriber::new(
                move |value: T| next.lock().next(value),
                on_error,
                move || complete.lock().complete(),
            ));

            Subscription::new(
                UnsubscribeLogic::Logic(Box::new(move || {
                    upstream.unsubscribe();
                    if let Some(replacement) = fallback.lock().take() {
                        replacement.unsubscribe();
                    }
                })),
                SubscriptionHandle::Nil,
            )
        })
    }

    fn debounce_time(self, quiet: Duration) -> Observable<T> {
        let mut source = self;
        Observable::new(move |subscriber: Subscriber<T>| {
            let downstream = share(subscriber);
            let state = Arc::new(Mutex::new(Debounce::new()));

            let on_next = {
                let state = Arc::clone(&state);
                let downstream = Arc::clone(&downstream);
                move |value: T| {
                    let mut guard = state.lock();
                    guard.cancel_timer();
                    guard.generation += 1;
                    guard.pending = Some(value);

                    let generation = guard.generation;
                    let timer_state = Arc::clone(&state);
                    let timer_downstream = Arc::clone(&downstream);
                    guard.timer = Some(tokio::spawn(async move {
                        tokio::time::sleep(quiet).await;
                        let value = {
                            let mut current = timer_state.lock();
                            if current.generation != generation {
                                return;
                            }
                            current.timer = None;
                            current.pending.take()
                        };
                        if let Some(value) = value {
                            timer_downstream.lock().next(value);
                        }
                    }));
                }
            };
            let on_error = {
                let state = Arc::clone(&state);
                let downstream = Arc::clone(&downstream);
                move |err: StreamError| {
                    {
                        let mut guard = state.lock();
                        guard.cancel_timer();
                        guard.pending = None;
                    }
                    downstream.lock().error(err);
                }
            };
            let on_complete = {
                let state = Arc::clone(&state);
                let downstream = Arc::clone(&downstream);
                move || {
                    let pending = {
                        let mut guard = state.lock();
                        guard.cancel_timer();
                        guard.pending.take()
                    };
                    let mut downstream = downstream.lock();
                    if let Some(value) = pending {
                        downstream.next(value);
                    }
                    downstream.complete();
                }
            };

            let upstream = source.subscribe(Subscriber::new(on_next, on_error, on_complete));
            Subscription::new(
                UnsubscribeLogic::Logic(Box::new(move || {
                    upstream.unsubscribe();
                    state.lock().cancel_timer();
                })),
                SubscriptionHandle::Nil,
            )
        })
    }

    fn distinct_until_changed(self) -> Observable<T>
    where
        T: PartialEq + Clone,
    {
        let mut source = self;
        Observable::new(move |subscriber: Subscriber<T>| {
            let downstream = share(subscriber);
            let next = Arc::clone(&downstream);
            let last: Mutex<Option<T>> = Mutex::new(None);
            wrap(source.subscribe(forward(&downstream, move |value: T| {
                let changed = {
                    let mut last = last.lock();
                    if last.as_ref() == Some(&value) {
                        false
                    } else {
                        *last = Some(value.clone());
                        true
                    }
                };
                if changed {
                    next.lock().next(value);
                }
            })))
        })
    }
}
