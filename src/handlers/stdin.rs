//! Stdin evaluation loop: every chunk read from stdin is one evaluation unit.
//!
//! A reader task feeds chunks into a queue as they arrive; a single worker
//! waits for the runtime to finish bootstrapping and then drains the queue in
//! order, so a unit never starts before the previous one has been written out.

use std::future::Future;
use std::io;

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::error::RuntimeError;
use crate::execution::Interpreter;
use crate::printer::{Rendered, TextPrinter};
use crate::runtime::{self, readiness, RuntimeSettings};

const CHUNK_SIZE: usize = 8 * 1024;

pub async fn run(settings: RuntimeSettings) -> Result<()> {
    let (signal, _readiness) = readiness::channel();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        if let Err(e) = read_chunks(tokio::io::stdin(), tx).await {
            tracing::error!(error = %e, "reading stdin failed");
        }
    });

    let printer = TextPrinter {
        color_faults: io::stderr().is_terminal(),
    };
    let startup = runtime::start(&settings, signal);
    drain(startup, rx, tokio::io::stdout(), tokio::io::stderr(), &printer).await
}

/// Forward raw reads from `input` to `tx` until EOF. A UTF-8 sequence cut by a
/// read boundary is held back and completed by the next read.
pub async fn read_chunks<R>(mut input: R, tx: mpsc::UnboundedSender<String>) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut pending: Vec<u8> = Vec::new();
    loop {
        let n = input.read(&mut buf).await?;
        if n == 0 {
            if !pending.is_empty() {
                let _ = tx.send(String::from_utf8_lossy(&pending).into_owned());
            }
            tracing::debug!("stdin closed");
            return Ok(());
        }
        pending.extend_from_slice(&buf[..n]);
        let unit = take_complete_utf8(&mut pending);
        if unit.is_empty() {
            continue;
        }
        if tx.send(unit).is_err() {
            return Ok(());
        }
    }
}

/// Split off the longest prefix of `bytes` that ends on a character boundary.
fn take_complete_utf8(bytes: &mut Vec<u8>) -> String {
    let valid = match std::str::from_utf8(bytes) {
        Ok(_) => bytes.len(),
        // Truncated sequence at the end: keep it for the next read.
        Err(e) if e.error_len().is_none() => e.valid_up_to(),
        // Genuinely invalid bytes: nothing will complete them.
        Err(_) => bytes.len(),
    };
    let text = String::from_utf8_lossy(&bytes[..valid]).into_owned();
    bytes.drain(..valid);
    text
}

/// Await `startup`, then evaluate queued units one at a time until the queue
/// closes. Only a startup failure ends the loop with an error.
pub async fn drain<I, F, O, E>(
    startup: F,
    mut units: mpsc::UnboundedReceiver<String>,
    mut out: O,
    mut err: E,
    printer: &TextPrinter,
) -> Result<()>
where
    I: Interpreter,
    F: Future<Output = Result<I, RuntimeError>>,
    O: AsyncWrite + Unpin,
    E: AsyncWrite + Unpin,
{
    let mut interpreter = startup.await.context("python runtime failed to start")?;

    let mut seq: u64 = 0;
    while let Some(unit) = units.recv().await {
        seq += 1;
        tracing::debug!(seq, len = unit.len(), "evaluating unit");
        let result = match interpreter.evaluate(&unit).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(seq, error = %e, "evaluation did not complete");
                continue;
            }
        };
        tracing::debug!(seq, fault = result.is_fault(), "unit finished");
        if let Err(e) = sink(&mut out, &mut err, printer.render(&result)).await {
            tracing::error!(seq, error = %e, "writing result failed");
        }
    }
    Ok(())
}

async fn sink<O, E>(out: &mut O, err: &mut E, rendered: Rendered) -> io::Result<()>
where
    O: AsyncWrite + Unpin,
    E: AsyncWrite + Unpin,
{
    if !rendered.out.is_empty() {
        out.write_all(rendered.out.as_bytes()).await?;
        out.flush().await?;
    }
    if !rendered.err.is_empty() {
        err.write_all(rendered.err.as_bytes()).await?;
        err.flush().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::scripted::Scripted;
    use std::collections::VecDeque;
    use std::pin::Pin;
    use std::task::{Context as TaskContext, Poll};
    use tokio::io::ReadBuf;
    use tokio::sync::oneshot;

    /// Reader that hands out one scripted chunk per `read`.
    struct Chunks(VecDeque<Vec<u8>>);

    impl AsyncRead for Chunks {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut TaskContext<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            if let Some(chunk) = self.0.pop_front() {
                buf.put_slice(&chunk);
            }
            Poll::Ready(Ok(()))
        }
    }

    const PLAIN: TextPrinter = TextPrinter { color_faults: false };

    fn queue(units: &[&str]) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        for u in units {
            tx.send(u.to_string()).unwrap();
        }
        rx
    }

    async fn run_units(units: &[&str]) -> (String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        drain(async { Ok(Scripted::new()) }, queue(units), &mut out, &mut err, &PLAIN)
            .await
            .unwrap();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[tokio::test]
    async fn bindings_survive_between_units() {
        let (out, err) = run_units(&["x = 5", "x + 1"]).await;
        assert_eq!(out, "6\n");
        assert_eq!(err, "");
    }

    #[tokio::test]
    async fn fault_is_reported_and_loop_continues() {
        let (out, err) = run_units(&["raise ValueError", "41 + 1"]).await;
        assert_eq!(out, "42\n");
        assert!(err.contains("ValueError"));
        assert!(!out.contains("ValueError"));
    }

    #[tokio::test]
    async fn captured_print_output_reaches_stdout() {
        let (out, _) = run_units(&["print(hi)"]).await;
        assert_eq!(out, "hi\n");
    }

    #[tokio::test]
    async fn broken_transport_for_one_unit_is_only_logged() {
        let (out, err) = run_units(&["__crash__", "2"]).await;
        assert_eq!(out, "2\n");
        assert_eq!(err, "");
    }

    #[tokio::test]
    async fn units_received_before_ready_wait_and_keep_order() {
        let scripted = Scripted::new();
        let calls = scripted.calls.clone();
        let (release, gate) = oneshot::channel::<()>();
        let startup = async move {
            let _ = gate.await;
            Ok(scripted)
        };

        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(async move {
            let mut out = Vec::new();
            let mut err = Vec::new();
            drain(startup, rx, &mut out, &mut err, &PLAIN).await.unwrap();
            String::from_utf8(out).unwrap()
        });

        tx.send("a = 1".into()).unwrap();
        tx.send("a + 1".into()).unwrap();
        tx.send("a + 2".into()).unwrap();
        tokio::task::yield_now().await;
        assert!(calls.lock().unwrap().is_empty());

        release.send(()).unwrap();
        drop(tx);
        assert_eq!(worker.await.unwrap(), "2\n3\n");
        assert_eq!(*calls.lock().unwrap(), vec!["a = 1", "a + 1", "a + 2"]);
    }

    #[tokio::test]
    async fn startup_failure_ends_the_loop_with_error() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let startup = async { Err::<Scripted, _>(RuntimeError::Closed) };
        let result = drain(startup, queue(&["1"]), &mut out, &mut err, &PLAIN).await;
        assert!(result.is_err());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn each_read_is_one_unit() {
        let reader = Chunks(VecDeque::from(vec![b"x = 1\ny = 2\n".to_vec(), b"x + y\n".to_vec()]));
        let (tx, mut rx) = mpsc::unbounded_channel();
        read_chunks(reader, tx).await.unwrap();
        assert_eq!(rx.recv().await.as_deref(), Some("x = 1\ny = 2\n"));
        assert_eq!(rx.recv().await.as_deref(), Some("x + y\n"));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn split_utf8_sequence_is_carried_over() {
        let reader = Chunks(VecDeque::from(vec![b"s = '\xc3".to_vec(), b"\xa9'".to_vec()]));
        let (tx, mut rx) = mpsc::unbounded_channel();
        read_chunks(reader, tx).await.unwrap();
        assert_eq!(rx.recv().await.as_deref(), Some("s = '"));
        assert_eq!(rx.recv().await.as_deref(), Some("\u{e9}'"));
    }

    #[test]
    fn invalid_bytes_are_replaced_not_held() {
        let mut bytes = b"a\xffb".to_vec();
        assert_eq!(take_complete_utf8(&mut bytes), "a\u{fffd}b");
        assert!(bytes.is_empty());
    }
}
