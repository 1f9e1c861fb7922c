//! Fire-and-forget event delivery
//!
//! An [`EventHandler`] owns the receiving end of a bounded channel and a single hook. Anything holding an
//! [`EventProducer`] can push events into it; the hook runs once per event on its own task. Hooks only see the event,
//! never the state of whoever published it, and publishers never see what a hook did.
use std::{future::Future, pin::Pin, sync::Arc};

use log::*;
use tokio::{
    sync::mpsc,
    task::{JoinHandle, JoinSet},
};

/// An async hook that receives events of type `E`.
pub type Handler<E> = Arc<dyn Fn(E) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

pub struct EventHandler<E: Send + Sync + 'static> {
    inbox: mpsc::Receiver<E>,
    outbox: mpsc::Sender<E>,
    hook: Handler<E>,
}

impl<E: Send + Sync + 'static> EventHandler<E> {
    /// `buffer_size` is how many undelivered events may queue up before publishers have to wait.
    pub fn new(buffer_size: usize, hook: Handler<E>) -> Self {
        let (outbox, inbox) = mpsc::channel(buffer_size.max(1));
        Self { inbox, outbox, hook }
    }

    pub fn subscribe(&self) -> EventProducer<E> {
        EventProducer::new(self.outbox.clone())
    }

    /// Runs the hook for each incoming event until every producer has been dropped, then waits for the hooks that are
    /// still running.
    pub async fn start_handler(self) {
        let Self { mut inbox, outbox, hook } = self;
        // Only producers may keep the channel open
        drop(outbox);
        debug!("📬️ Event handler started");
        let mut running = JoinSet::new();
        while let Some(event) = inbox.recv().await {
            let hook = Arc::clone(&hook);
            running.spawn(async move { hook(event).await });
            while let Some(done) = running.try_join_next() {
                log_hook_result(done);
            }
        }
        trace!("📬️ Channel closed with {} hook(s) still running", running.len());
        while let Some(done) = running.join_next().await {
            log_hook_result(done);
        }
        debug!("📬️ Event handler stopped");
    }

    /// Starts the handler on a new task. Await the handle to know when every event has been dealt with.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.start_handler())
    }
}

fn log_hook_result(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        warn!("📬️ Event hook did not complete: {e}");
    }
}

#[derive(Clone)]
pub struct EventProducer<E: Send + Sync> {
    outbox: mpsc::Sender<E>,
}

impl<E: Send + Sync> EventProducer<E> {
    pub fn new(outbox: mpsc::Sender<E>) -> Self {
        Self { outbox }
    }

    /// Queues `event` for the hook. Waits only if the queue is full. If the handler has gone away, the event is
    /// dropped and logged.
    pub async fn publish_event(&self, event: E) {
        if self.outbox.send(event).await.is_err() {
            error!("📬️ Event dropped: its handler is no longer running");
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Mutex;

    use super::*;

    fn recording_hook(seen: Arc<Mutex<Vec<String>>>) -> Handler<String> {
        Arc::new(move |title: String| {
            let seen = seen.clone();
            Box::pin(async move {
                tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
                seen.lock().unwrap().push(title);
            }) as Pin<Box<dyn Future<Output = ()> + Send>>
        })
    }

    #[tokio::test]
    async fn events_from_all_producers_reach_the_hook() {
        let _ = env_logger::try_init();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let handler = EventHandler::new(1, recording_hook(seen.clone()));
        let updates = handler.subscribe();
        let creations = handler.subscribe();
        let done = handler.spawn();
        let a = tokio::spawn(async move {
            for i in 0..4 {
                updates.publish_event(format!("updated {i}")).await;
            }
        });
        let b = tokio::spawn(async move {
            for i in 0..3 {
                creations.publish_event(format!("created {i}")).await;
            }
        });
        a.await.unwrap();
        b.await.unwrap();
        done.await.unwrap();
        let mut seen = seen.lock().unwrap().clone();
        seen.sort();
        assert_eq!(seen.len(), 7);
        assert_eq!(seen[0], "created 0");
        assert_eq!(seen[6], "updated 3");
    }

    #[tokio::test]
    async fn publishing_to_a_stopped_handler_is_harmless() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let handler = EventHandler::new(4, recording_hook(seen.clone()));
        let producer = handler.subscribe();
        drop(handler);
        producer.publish_event("lost".to_string()).await;
        assert!(seen.lock().unwrap().is_empty());
    }
}
