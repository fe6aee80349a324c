use crate::app::lessons::{lesson_failed, section};
use crate::app::rx::drive;
use crate::domain::ports::{Console, Lesson};
use crate::utils::error::{Result, StreamError};
use async_trait::async_trait;
use rxr::subscribe::{Subscriber, Subscription, SubscriptionHandle, UnsubscribeLogic};
use rxr::{Observable, Observer};
use std::sync::Arc;
use std::time::Duration;

/// Observable、Observer 與 Subscription 的基本關係
///
/// - Observable 是惰性的資料流，沒有人訂閱就不會開始
/// - Observer 以 next / error / complete 三個回呼接收通知
/// - subscribe 把兩者接起來並回傳 Subscription
pub struct ObservablesLesson {
    late_delay: Duration,
}

impl ObservablesLesson {
    pub fn new(late_delay: Duration) -> Self {
        Self { late_delay }
    }
}

#[async_trait]
impl Lesson for ObservablesLesson {
    fn name(&self) -> &str {
        "observables"
    }

    fn title(&self) -> &str {
        "Observables, observers and subscriptions"
    }

    async fn run(&self, console: Arc<dyn Console>) -> Result<()> {
        section(console.as_ref(), "Observables");

        let late_delay = self.late_delay;
        let observable: Observable<i32> = Observable::new(move |mut subscriber: Subscriber<i32>| {
            subscriber.next(1);
            subscriber.next(2);
            subscriber.next(3);

            let handle = tokio::spawn(async move {
                tokio::time::sleep(late_delay).await;
                subscriber.next(4);
                subscriber.complete();
            });
            // 取消訂閱時停止尚未送出的值
            let abort = handle.abort_handle();
            Subscription::new(
                UnsubscribeLogic::Logic(Box::new(move || abort.abort())),
                SubscriptionHandle::JoinTask(handle),
            )
        });

        let (on_next, on_error, on_complete) = (console.clone(), console.clone(), console.clone());
        let observer = Subscriber::new(
            move |x: i32| on_next.line(&format!("got value {}", x)),
            move |err: StreamError| on_error.error_line(&format!("something wrong occurred: {}", err)),
            move || on_complete.line("done"),
        );

        drive(observable, observer)
            .await
            .map_err(|source| lesson_failed(self.name(), source))
    }
}
