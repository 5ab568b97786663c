//! Process-wide readiness signal for the interpreter bootstrap.

use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Starting,
    Ready,
    /// Bootstrap gave up; the runtime will never become ready.
    Failed(String),
}

/// Create the signal pair. The bootstrapper owns the [`ReadySignal`]; every
/// consumer gets a clone of the [`Readiness`].
pub fn channel() -> (ReadySignal, Readiness) {
    let (tx, rx) = watch::channel(Phase::Starting);
    (ReadySignal { tx }, Readiness { rx })
}

/// Write side. Consumed on use so the phase can only leave `Starting` once.
#[derive(Debug)]
pub struct ReadySignal {
    tx: watch::Sender<Phase>,
}

impl ReadySignal {
    pub fn ready(self) {
        self.tx.send_replace(Phase::Ready);
    }

    pub fn fail(self, reason: impl Into<String>) {
        self.tx.send_replace(Phase::Failed(reason.into()));
    }
}

#[derive(Debug, Clone)]
pub struct Readiness {
    rx: watch::Receiver<Phase>,
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(*self.rx.borrow(), Phase::Ready)
    }

    /// Wait until the phase leaves `Starting` and return the settled phase.
    /// A signal dropped without settling counts as a failure.
    pub async fn settled(&self) -> Phase {
        let mut rx = self.rx.clone();
        let phase = match rx.wait_for(|p| *p != Phase::Starting).await {
            Ok(phase) => phase.clone(),
            Err(_) => Phase::Failed("bootstrap abandoned".into()),
        };
        phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_not_ready() {
        let (_signal, readiness) = channel();
        assert!(!readiness.is_ready());
        assert_eq!(*readiness.rx.borrow(), Phase::Starting);
    }

    #[tokio::test]
    async fn every_clone_observes_ready() {
        let (signal, readiness) = channel();
        let other = readiness.clone();
        let waiter = tokio::spawn(async move { other.settled().await });
        signal.ready();
        assert_eq!(waiter.await.unwrap(), Phase::Ready);
        assert!(readiness.is_ready());
        assert_eq!(readiness.settled().await, Phase::Ready);
    }

    #[tokio::test]
    async fn failure_is_terminal_and_not_ready() {
        let (signal, readiness) = channel();
        signal.fail("pip exploded");
        assert!(!readiness.is_ready());
        assert_eq!(readiness.settled().await, Phase::Failed("pip exploded".into()));
    }

    #[tokio::test]
    async fn dropped_signal_counts_as_failure() {
        let (signal, readiness) = channel();
        drop(signal);
        assert!(matches!(readiness.settled().await, Phase::Failed(_)));
    }
}
