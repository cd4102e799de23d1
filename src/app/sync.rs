use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};

use crate::proxy::{BackendDescriptor, StatusSnapshot, TopologySource};

#[derive(Clone, Debug, Default)]
pub(in crate::app) struct PollOutcome {
    pub(in crate::app) servers: Vec<BackendDescriptor>,
    pub(in crate::app) statuses: Vec<StatusSnapshot>,
}

enum PollerCommand {
    RefreshNow,
}

pub(in crate::app) fn poll_once(source: &dyn TopologySource, proxy_id: &str) -> Result<PollOutcome> {
    let (servers, statuses) = thread::scope(|scope| {
        let servers = scope.spawn(|| source.fetch_servers(proxy_id));
        let statuses = source.fetch_status(proxy_id);
        (servers.join(), statuses)
    });

    let servers = servers
        .map_err(|_| anyhow!("server list request panicked"))?
        .with_context(|| format!("failed to fetch server list for proxy {proxy_id}"))?;
    let statuses =
        statuses.with_context(|| format!("failed to fetch status for proxy {proxy_id}"))?;

    Ok(PollOutcome { servers, statuses })
}

fn discard_pending(command_rx: &Receiver<PollerCommand>) -> bool {
    loop {
        match command_rx.try_recv() {
            Ok(PollerCommand::RefreshNow) => {}
            Err(TryRecvError::Empty) => return true,
            Err(TryRecvError::Disconnected) => return false,
        }
    }
}

pub(in crate::app) struct Poller {
    rx: Receiver<Result<PollOutcome, String>>,
    command_tx: Sender<PollerCommand>,
}

impl Poller {
    pub(in crate::app) fn spawn(
        source: Arc<dyn TopologySource>,
        proxy_id: String,
        interval: Duration,
    ) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let (command_tx, command_rx) = mpsc::channel();

        thread::Builder::new()
            .name(format!("poller-{proxy_id}"))
            .spawn(move || {
                loop {
                    let result = poll_once(source.as_ref(), &proxy_id)
                        .map_err(|error| format!("{error:#}"));
                    if let Err(error) = &result {
                        log::warn!("topology refresh for proxy {proxy_id} failed: {error}");
                    }
                    if tx.send(result).is_err() {
                        break;
                    }

                    match command_rx.recv_timeout(interval) {
                        Ok(PollerCommand::RefreshNow) => {
                            if !discard_pending(&command_rx) {
                                break;
                            }
                        }
                        Err(RecvTimeoutError::Timeout) => {}
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                log::debug!("poller for proxy {proxy_id} stopped");
            })
            .context("failed to spawn topology poller thread")?;

        Ok(Self { rx, command_tx })
    }

    pub(in crate::app) fn refresh_now(&self) {
        let _ = self.command_tx.send(PollerCommand::RefreshNow);
    }

    /// Every outcome that arrived since the last call, oldest first.
    pub(in crate::app) fn drain(&self) -> Vec<Result<PollOutcome, String>> {
        let mut results = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(result) => results.push(result),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        results
    }

    #[cfg(test)]
    pub(in crate::app) fn wait(&self, timeout: Duration) -> Option<Result<PollOutcome, String>> {
        self.rx.recv_timeout(timeout).ok()
    }
}

#[cfg(test)]
pub(in crate::app) mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    pub(in crate::app) struct FakeSource {
        pub(in crate::app) servers: Mutex<Vec<BackendDescriptor>>,
        pub(in crate::app) statuses: Mutex<Vec<StatusSnapshot>>,
        pub(in crate::app) fail: Mutex<bool>,
        pub(in crate::app) calls: AtomicUsize,
    }

    impl FakeSource {
        pub(in crate::app) fn with_servers(names: &[&str]) -> Self {
            let source = Self::default();
            *source.servers.lock().unwrap() = names
                .iter()
                .map(|name| BackendDescriptor {
                    name: (*name).to_string(),
                    address: None,
                })
                .collect();
            source
        }
    }

    impl TopologySource for FakeSource {
        fn fetch_servers(&self, _proxy_id: &str) -> Result<Vec<BackendDescriptor>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if *self.fail.lock().unwrap() {
                return Err(anyhow!("connection refused"));
            }
            Ok(self.servers.lock().unwrap().clone())
        }

        fn fetch_status(&self, _proxy_id: &str) -> Result<Vec<StatusSnapshot>> {
            if *self.fail.lock().unwrap() {
                return Err(anyhow!("connection refused"));
            }
            Ok(self.statuses.lock().unwrap().clone())
        }
    }

    #[test]
    fn poll_once_combines_both_responses() {
        let source = FakeSource::with_servers(&["lobby", "survival"]);
        source
            .statuses
            .lock()
            .unwrap()
            .push(StatusSnapshot::empty("lobby"));

        let outcome = poll_once(&source, "p1").expect("poll succeeds");
        assert_eq!(outcome.servers.len(), 2);
        assert_eq!(outcome.statuses.len(), 1);
    }

    #[test]
    fn poll_once_fails_when_either_request_fails() {
        let source = FakeSource::with_servers(&["lobby"]);
        *source.fail.lock().unwrap() = true;

        let error = poll_once(&source, "p1").expect_err("poll fails");
        assert!(format!("{error:#}").contains("connection refused"));
    }

    #[test]
    fn poller_delivers_immediately_and_on_demand() {
        let source = Arc::new(FakeSource::with_servers(&["lobby"]));
        let poller = Poller::spawn(source.clone(), "p1".to_string(), Duration::from_secs(3600))
            .expect("thread spawns");

        let first = poller.wait(Duration::from_secs(5)).expect("first poll arrives");
        assert_eq!(first.expect("first poll succeeds").servers.len(), 1);

        *source.fail.lock().unwrap() = true;
        poller.refresh_now();
        let second = poller.wait(Duration::from_secs(5)).expect("second poll arrives");
        assert!(second.is_err());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn queued_refresh_requests_collapse_into_one() {
        let (command_tx, command_rx) = mpsc::channel();
        for _ in 0..3 {
            command_tx.send(PollerCommand::RefreshNow).expect("receiver alive");
        }

        assert!(discard_pending(&command_rx));
        assert!(matches!(command_rx.try_recv(), Err(TryRecvError::Empty)));

        command_tx.send(PollerCommand::RefreshNow).expect("receiver alive");
        drop(command_tx);
        assert!(!discard_pending(&command_rx));
    }

    #[test]
    fn dropped_poller_stops_polling() {
        let source = Arc::new(FakeSource::with_servers(&["lobby"]));
        let poller = Poller::spawn(source.clone(), "p1".to_string(), Duration::from_millis(5))
            .expect("thread spawns");
        poller.wait(Duration::from_secs(5)).expect("first poll arrives");
        drop(poller);

        thread::sleep(Duration::from_millis(50));
        let settled = source.calls.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(100));
        assert_eq!(source.calls.load(Ordering::SeqCst), settled);
    }
}
