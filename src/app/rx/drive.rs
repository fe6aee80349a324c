use crate::utils::error::{RxError, StreamError};
use parking_lot::Mutex;
use rxr::subscribe::{Subscriber, Subscription};
use rxr::{Observer, Subscribeable, Unsubscribeable};
use std::sync::Arc;
use tokio::sync::oneshot;

/// 被 drop 時取消訂閱
///
/// rxr 的 `Subscription` 被 drop 時不會取消訂閱；課程的 future 被逾時丟棄時，
/// 靠這個把背景任務停下來。
pub struct SubscriptionGuard {
    subscription: Option<Subscription>,
}

impl SubscriptionGuard {
    pub fn new(subscription: Subscription) -> Self {
        Self {
            subscription: Some(subscription),
        }
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

/// 訂閱 `source`，把事件交給 `observer`，等到串流完成或出錯
///
/// 回傳的 future 被丟棄時會取消訂閱。
pub async fn drive<S, T>(mut source: S, observer: Subscriber<T>) -> Result<(), RxError>
where
    S: Subscribeable<ObsType = T> + Send,
    T: Send + 'static,
{
    let (done_tx, done_rx) = oneshot::channel::<Result<(), RxError>>();
    let done_tx = Arc::new(Mutex::new(Some(done_tx)));
    let observer = Arc::new(Mutex::new(observer));

    let next = Arc::clone(&observer);
    let (error, error_tx) = (Arc::clone(&observer), Arc::clone(&done_tx));
    let (complete, complete_tx) = (observer, done_tx);

    let subscription = source.subscribe(Subscriber::new(
        move |value: T| next.lock().next(value),
        move |err: StreamError| {
            error.lock().error(Arc::clone(&err));
            if let Some(tx) = error_tx.lock().take() {
                let _ = tx.send(Err(RxError::from_stream(&err)));
            }
        },
        move || {
            complete.lock().complete();
            if let Some(tx) = complete_tx.lock().take() {
                let _ = tx.send(Ok(()));
            }
        },
    ));
    let _guard = SubscriptionGuard::new(subscription);

    done_rx.await.unwrap_or(Err(RxError::Dropped))
}

/// 收集所有值直到完成；錯誤時回傳錯誤
pub async fn collect<S, T>(source: S) -> Result<Vec<T>, RxError>
where
    S: Subscribeable<ObsType = T> + Send,
    T: Send + 'static,
{
    let values = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&values);
    drive(
        source,
        Subscriber::new(move |value: T| sink.lock().push(value), |_: StreamError| {}, || {}),
    )
    .await?;

    let collected = std::mem::take(&mut *values.lock());
    Ok(collected)
}
