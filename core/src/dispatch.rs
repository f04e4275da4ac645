//! Executes descriptors against a transport and delivers exactly one outcome.
//!
//! # Design
//! `dispatch` is the whole pipeline as one future: encode the descriptor,
//! hand the request to the transport once, classify the response with the
//! transport's own `is_success`. Encoding failures return before any I/O.
//! There are no retries.
//!
//! `spawn` is the continuation form: it runs `dispatch` on the tokio runtime
//! and calls either `on_success` or `on_failure`, once. Cancelling through
//! the returned handle resolves the dispatch as `ApiError::Cancelled` via
//! `on_failure`, unless the outcome was already delivered.

use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::descriptor::RequestDescriptor;
use crate::error::ApiError;
use crate::transport::Transport;

/// Runs descriptors through an injected `Transport`.
pub struct Dispatcher<T: ?Sized> {
    transport: Arc<T>,
}

impl<T: ?Sized> Clone for Dispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }
}

impl<T: Transport + ?Sized + 'static> Dispatcher<T> {
    pub fn from_arc(transport: Arc<T>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute the descriptor once and resolve to the raw response body.
    ///
    /// The body may be empty. Failures carry the transport error, the
    /// unsuccessful response, or the encoding problem.
    pub async fn dispatch<D: RequestDescriptor>(&self, descriptor: D) -> Result<Vec<u8>, ApiError> {
        let request = descriptor.to_request()?;
        drop(descriptor);

        let method = request.method;
        let url = request.url.clone();
        debug!(%method, %url, "dispatching request");

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(%method, %url, error = %e, "transport failure");
                return Err(e.into());
            }
        };

        if self.transport.is_success(&response) {
            debug!(%method, %url, status = response.status, bytes = response.body.len(), "request succeeded");
            Ok(response.body)
        } else {
            warn!(%method, %url, status = response.status, "request failed");
            Err(ApiError::HttpStatus {
                status: response.status,
                response,
            })
        }
    }

    /// Dispatch in the background and deliver the outcome to exactly one of
    /// the two continuations.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<D, S, F>(&self, descriptor: D, on_success: S, on_failure: F) -> DispatchHandle
    where
        D: RequestDescriptor + Send + 'static,
        S: FnOnce(Vec<u8>) + Send + 'static,
        F: FnOnce(ApiError) + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        let dispatcher = self.clone();

        let task = tokio::spawn(async move {
            let outcome = tokio::select! {
                result = dispatcher.dispatch(descriptor) => result,
                Ok(()) = cancel_rx => Err(ApiError::Cancelled),
            };
            match outcome {
                Ok(body) => on_success(body),
                Err(e) => on_failure(e),
            }
        });

        DispatchHandle {
            cancel: Some(cancel_tx),
            task,
        }
    }
}

/// Handle to a dispatch started with `Dispatcher::spawn`.
///
/// Dropping the handle does not cancel the dispatch.
#[derive(Debug)]
pub struct DispatchHandle {
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl DispatchHandle {
    /// Ask the dispatch to stop. Has no effect once the outcome is delivered.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }

    /// Whether a continuation has already run.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait until the continuation has run. Panics raised inside a
    /// continuation are propagated to the caller.
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            if e.is_panic() {
                std::panic::resume_unwind(e.into_panic());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::client::SonosClient;
    use crate::error::{ErrorKind, TransportError, TransportErrorKind};
    use crate::http::{HttpRequest, HttpResponse};

    /// Replays one canned outcome and records every request it sees.
    struct CannedTransport {
        outcome: Result<HttpResponse, TransportError>,
        delay: Option<Duration>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl CannedTransport {
        fn status(status: u16, body: &[u8]) -> Self {
            Self {
                outcome: Ok(HttpResponse {
                    status,
                    headers: Vec::new(),
                    body: body.to_vec(),
                }),
                delay: None,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(kind: TransportErrorKind) -> Self {
            Self {
                outcome: Err(TransportError::new(kind, "simulated")),
                delay: None,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.lock().unwrap().push(request);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.outcome.clone()
        }
    }

    fn play() -> crate::Descriptor {
        SonosClient::default().build_play("tok", "G1").unwrap()
    }

    #[derive(Default)]
    struct Outcomes {
        successes: AtomicUsize,
        failures: AtomicUsize,
        body: Mutex<Option<Vec<u8>>>,
        error: Mutex<Option<ErrorKind>>,
    }

    fn spawn_counted(dispatcher: &Dispatcher<CannedTransport>, outcomes: &Arc<Outcomes>) -> DispatchHandle {
        let ok = Arc::clone(outcomes);
        let failed = Arc::clone(outcomes);
        dispatcher.spawn(
            play(),
            move |body| {
                ok.successes.fetch_add(1, Ordering::SeqCst);
                *ok.body.lock().unwrap() = Some(body);
            },
            move |err| {
                failed.failures.fetch_add(1, Ordering::SeqCst);
                *failed.error.lock().unwrap() = Some(err.kind());
            },
        )
    }

    #[tokio::test]
    async fn success_returns_exact_body() {
        let dispatcher = Dispatcher::new(CannedTransport::status(200, br#"{"access_token":"t"}"#));
        let body = dispatcher.dispatch(play()).await.unwrap();
        assert_eq!(body, br#"{"access_token":"t"}"#.to_vec());
        assert_eq!(dispatcher.transport().calls(), 1);
    }

    #[tokio::test]
    async fn request_reaches_transport_unchanged() {
        let dispatcher = Dispatcher::new(CannedTransport::status(200, b"{}"));
        let descriptor = play();
        let expected = descriptor.to_request().unwrap();
        dispatcher.dispatch(descriptor).await.unwrap();
        assert_eq!(dispatcher.transport().seen.lock().unwrap()[0], expected);
    }

    #[tokio::test]
    async fn non_success_status_keeps_response() {
        let dispatcher = Dispatcher::new(CannedTransport::status(400, br#"{"errorCode":"ERROR_INVALID_PARAMETER"}"#));
        let err = dispatcher.dispatch(play()).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(
            err.response().unwrap().body,
            br#"{"errorCode":"ERROR_INVALID_PARAMETER"}"#.to_vec()
        );
        assert_eq!(dispatcher.transport().calls(), 1);
    }

    #[tokio::test]
    async fn transport_failure_is_not_retried() {
        let dispatcher = Dispatcher::new(CannedTransport::failing(TransportErrorKind::Connect));
        let err = dispatcher.dispatch(play()).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(ref e) if e.kind == TransportErrorKind::Connect));
        assert_eq!(dispatcher.transport().calls(), 1);
    }

    #[tokio::test]
    async fn encoding_failure_skips_transport() {
        let dispatcher = Dispatcher::new(CannedTransport::status(200, b""));
        let mut descriptor = play();
        descriptor.url = "not a url".to_string();
        let err = dispatcher.dispatch(descriptor).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);
        assert_eq!(dispatcher.transport().calls(), 0);
    }

    #[tokio::test]
    async fn empty_success_body_is_delivered() {
        let dispatcher = Dispatcher::new(CannedTransport::status(204, b""));
        assert!(dispatcher.dispatch(play()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn spawn_calls_only_on_success() {
        let dispatcher = Dispatcher::new(CannedTransport::status(200, br#"{"access_token":"t"}"#));
        let outcomes = Arc::new(Outcomes::default());
        spawn_counted(&dispatcher, &outcomes).join().await;

        assert_eq!(outcomes.successes.load(Ordering::SeqCst), 1);
        assert_eq!(outcomes.failures.load(Ordering::SeqCst), 0);
        assert_eq!(
            outcomes.body.lock().unwrap().as_deref(),
            Some(&br#"{"access_token":"t"}"#[..])
        );
    }

    #[tokio::test]
    async fn spawn_calls_only_on_failure_for_400() {
        let dispatcher = Dispatcher::new(CannedTransport::status(400, b""));
        let outcomes = Arc::new(Outcomes::default());
        spawn_counted(&dispatcher, &outcomes).join().await;

        assert_eq!(outcomes.successes.load(Ordering::SeqCst), 0);
        assert_eq!(outcomes.failures.load(Ordering::SeqCst), 1);
        assert_eq!(*outcomes.error.lock().unwrap(), Some(ErrorKind::HttpStatus));
    }

    #[tokio::test]
    async fn cancel_delivers_cancelled_once() {
        let dispatcher = Dispatcher::new(CannedTransport {
            delay: Some(Duration::from_secs(30)),
            ..CannedTransport::status(200, b"{}")
        });
        let outcomes = Arc::new(Outcomes::default());
        let mut handle = spawn_counted(&dispatcher, &outcomes);
        handle.cancel();
        handle.cancel();
        handle.join().await;

        assert_eq!(outcomes.successes.load(Ordering::SeqCst), 0);
        assert_eq!(outcomes.failures.load(Ordering::SeqCst), 1);
        assert_eq!(*outcomes.error.lock().unwrap(), Some(ErrorKind::Cancelled));
    }

    #[tokio::test]
    async fn dropped_handle_still_delivers() {
        let dispatcher = Dispatcher::new(CannedTransport {
            delay: Some(Duration::from_millis(20)),
            ..CannedTransport::status(200, b"{}")
        });
        let outcomes = Arc::new(Outcomes::default());
        drop(spawn_counted(&dispatcher, &outcomes));

        for _ in 0..200 {
            if outcomes.successes.load(Ordering::SeqCst) == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(outcomes.successes.load(Ordering::SeqCst), 1);
        assert_eq!(outcomes.failures.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn concurrent_dispatches_are_independent() {
        let dispatcher = Dispatcher::new(CannedTransport::status(200, b"{}"));
        let client = SonosClient::default();
        let a = client.build_pause("tok", "G1").unwrap();
        let b = client.build_play("tok", "G2").unwrap();
        let (ra, rb) = tokio::join!(dispatcher.dispatch(a), dispatcher.dispatch(b));
        assert!(ra.is_ok() && rb.is_ok());
        assert_eq!(dispatcher.transport().calls(), 2);
    }
}
