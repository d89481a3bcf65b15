use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
        Mutex,
    },
};

use futures_util::{future::BoxFuture, FutureExt};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::{
    bson::Document,
    cmap::{
        AsyncConnection,
        AsyncWriteBinding,
        Binding,
        CheckInState,
        Connection,
        RawCommandResponse,
        Request,
        StreamDescription,
        WriteBinding,
    },
    error::{Error, Result},
};

#[derive(Debug, Default)]
struct Shared {
    replies: Mutex<VecDeque<Result<Document>>>,
    requests: Mutex<Vec<Request>>,
    check_outs: AtomicUsize,
    check_ins: AtomicUsize,
    check_in_states: Mutex<Vec<CheckInState>>,
    request_sent: Notify,
    release_reply: Notify,
}

/// A binding handing out connections to a scripted server. Every connection reports the same
/// description and consumes the configured replies in order.
#[derive(Debug)]
pub(crate) struct MockBinding {
    description: StreamDescription,
    check_out_error: Option<Error>,
    check_in_error: Option<Error>,
    hold_check_out: bool,
    hold_reply: bool,
    cancel_on_check_out: Option<CancellationToken>,
    shared: Arc<Shared>,
}

impl MockBinding {
    pub(crate) fn new(max_wire_version: Option<i32>) -> Self {
        Self {
            description: StreamDescription::with_wire_version(max_wire_version),
            check_out_error: None,
            check_in_error: None,
            hold_check_out: false,
            hold_reply: false,
            cancel_on_check_out: None,
            shared: Default::default(),
        }
    }

    /// Queues the reply to the next request.
    pub(crate) fn reply(self, reply: Document) -> Self {
        self.shared.replies.lock().unwrap().push_back(Ok(reply));
        self
    }

    /// Queues a transport failure for the next request.
    pub(crate) fn send_error(self, error: Error) -> Self {
        self.shared.replies.lock().unwrap().push_back(Err(error));
        self
    }

    pub(crate) fn fail_check_out(mut self, error: Error) -> Self {
        self.check_out_error = Some(error);
        self
    }

    pub(crate) fn fail_check_in(mut self, error: Error) -> Self {
        self.check_in_error = Some(error);
        self
    }

    /// Makes asynchronous check-outs never complete.
    pub(crate) fn hold_check_out(mut self) -> Self {
        self.hold_check_out = true;
        self
    }

    /// Makes asynchronous round trips wait for [`MockBinding::release_reply`] after the request
    /// was recorded.
    pub(crate) fn hold_reply(mut self) -> Self {
        self.hold_reply = true;
        self
    }

    /// Cancels `token` as soon as a connection has been handed out.
    pub(crate) fn cancel_on_check_out(mut self, token: CancellationToken) -> Self {
        self.cancel_on_check_out = Some(token);
        self
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.shared.requests.lock().unwrap().clone()
    }

    pub(crate) fn check_outs(&self) -> usize {
        self.shared.check_outs.load(Ordering::SeqCst)
    }

    pub(crate) fn check_ins(&self) -> usize {
        self.shared.check_ins.load(Ordering::SeqCst)
    }

    /// The state every connection was checked in with, in check-in order.
    pub(crate) fn check_in_states(&self) -> Vec<CheckInState> {
        self.shared.check_in_states.lock().unwrap().clone()
    }

    /// Resolves once a connection has recorded a request.
    pub(crate) async fn request_sent(&self) {
        self.shared.request_sent.notified().await
    }

    pub(crate) fn release_reply(&self) {
        self.shared.release_reply.notify_one();
    }

    fn connection(&self) -> Result<MockConnection> {
        if let Some(ref error) = self.check_out_error {
            return Err(error.clone());
        }
        self.shared.check_outs.fetch_add(1, Ordering::SeqCst);
        if let Some(ref token) = self.cancel_on_check_out {
            token.cancel();
        }
        Ok(MockConnection {
            description: self.description.clone(),
            hold_reply: self.hold_reply,
            shared: self.shared.clone(),
        })
    }
}

impl Binding for MockBinding {
    type Connection = MockConnection;

    fn check_in(&self, _connection: MockConnection, state: CheckInState) -> Result<()> {
        self.shared.check_ins.fetch_add(1, Ordering::SeqCst);
        self.shared.check_in_states.lock().unwrap().push(state);
        match self.check_in_error {
            Some(ref error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl WriteBinding for MockBinding {
    fn check_out(&self) -> Result<MockConnection> {
        self.connection()
    }
}

impl AsyncWriteBinding for MockBinding {
    fn check_out(&self) -> BoxFuture<'_, Result<MockConnection>> {
        async move {
            if self.hold_check_out {
                std::future::pending::<()>().await;
            }
            self.connection()
        }
        .boxed()
    }
}

#[derive(Debug)]
pub(crate) struct MockConnection {
    description: StreamDescription,
    hold_reply: bool,
    shared: Arc<Shared>,
}

impl MockConnection {
    fn record(&self, request: Request) -> Result<RawCommandResponse> {
        self.shared.requests.lock().unwrap().push(request);
        let reply = self
            .shared
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::invalid_response("no reply scripted")))?;
        RawCommandResponse::with_document(self.description.server_address.clone(), &reply)
    }
}

impl Connection for MockConnection {
    fn stream_description(&self) -> Result<&StreamDescription> {
        Ok(&self.description)
    }

    fn send_request(&mut self, request: Request) -> Result<RawCommandResponse> {
        self.record(request)
    }
}

impl AsyncConnection for MockConnection {
    fn stream_description(&self) -> Result<&StreamDescription> {
        Ok(&self.description)
    }

    fn send_request(&mut self, request: Request) -> BoxFuture<'_, Result<RawCommandResponse>> {
        async move {
            let response = self.record(request);
            self.shared.request_sent.notify_one();
            if self.hold_reply {
                self.shared.release_reply.notified().await;
            }
            response
        }
        .boxed()
    }
}
