use crate::app::lessons::section;
use crate::domain::ports::{Console, Lesson};
use crate::utils::error::{Result, StreamError};
use async_trait::async_trait;
use rxr::subjects::{AsyncSubject, BehaviorSubject, BufSize, ReplaySubject, Subject};
use rxr::subscribe::Subscriber;
use rxr::{Observer, Subscribeable};
use std::sync::Arc;

/// Subject 家族：一般、帶目前值、重播、只送最後值
pub struct SubjectsLesson {
    replay_buffer_size: usize,
}

impl SubjectsLesson {
    pub fn new(replay_buffer_size: usize) -> Self {
        Self { replay_buffer_size }
    }
}

fn observer(console: &Arc<dyn Console>, name: &'static str) -> Subscriber<i32> {
    let (on_next, on_error) = (Arc::clone(console), Arc::clone(console));
    Subscriber::new(
        move |x: i32| on_next.line(&format!("{}: {}", name, x)),
        move |err: StreamError| on_error.error_line(&format!("{}: {}", name, err)),
        || {},
    )
}

#[async_trait]
impl Lesson for SubjectsLesson {
    fn name(&self) -> &str {
        "subjects"
    }

    fn title(&self) -> &str {
        "Multicasting with Subject, BehaviorSubject, ReplaySubject and AsyncSubject"
    }

    async fn run(&self, console: Arc<dyn Console>) -> Result<()> {
        section(console.as_ref(), "Subjects");
        let (mut emitter, mut receiver) = Subject::emitter_receiver();
        receiver.subscribe(observer(&console, "observerA"));
        receiver.subscribe(observer(&console, "observerB"));
        emitter.next(1);
        emitter.next(2);
        emitter.complete();

        section(console.as_ref(), "BehaviourSubject");
        let (mut emitter, mut receiver) = BehaviorSubject::emitter_receiver(0);
        receiver.subscribe(observer(&console, "observerA"));
        emitter.next(1);
        emitter.next(2);
        receiver.subscribe(observer(&console, "observerB"));
        emitter.next(3);
        emitter.complete();

        section(console.as_ref(), "ReplaySubject");
        let (mut emitter, mut receiver) =
            ReplaySubject::emitter_receiver(BufSize::Bounded(self.replay_buffer_size));
        receiver.subscribe(observer(&console, "observerA"));
        for value in 1..=4 {
            emitter.next(value);
        }
        receiver.subscribe(observer(&console, "observerB"));
        emitter.next(5);
        emitter.complete();

        section(console.as_ref(), "AsyncSubject");
        let (mut emitter, mut receiver) = AsyncSubject::emitter_receiver();
        receiver.subscribe(observer(&console, "observerA"));
        emitter.next(1);
        emitter.next(2);
        receiver.subscribe(observer(&console, "observerB"));
        emitter.complete();

        tracing::debug!("📡 Subjects lesson delivered all values synchronously");
        Ok(())
    }
}
