//! Subtree walk streams.
//!
//! [`Walk`] pages with GETNEXT (one varbind per round trip), [`BulkWalk`]
//! with GETBULK. Both terminate on the first OID that leaves the root
//! subtree or on endOfMibView, and both guard against agents that fail to
//! advance by yielding [`Error::NonIncreasingOid`].

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;

use crate::engine::{Engine, PduRequest, PduResult};
use crate::error::{Error, ErrorStatus, Result};
use crate::oid::Oid;
use crate::record::{OutputFlags, ResultRecord};
use crate::session::Session;
use crate::value::Value;
use crate::varbind::VarBind;

type PageFuture = Pin<Box<dyn Future<Output = Result<PduResult>> + Send>>;

/// What one response varbind means for the walk.
enum Step {
    Yield(VarBind),
    Finished,
}

fn advance(root: &Oid, cursor: &mut Oid, varbind: VarBind) -> Result<Step> {
    if matches!(varbind.value, Value::EndOfMibView) {
        return Ok(Step::Finished);
    }
    if !varbind.oid.starts_with(root) {
        return Ok(Step::Finished);
    }
    if varbind.oid <= *cursor {
        return Err(Error::NonIncreasingOid {
            previous: cursor.clone(),
            current: varbind.oid,
        });
    }
    *cursor = varbind.oid.clone();
    Ok(Step::Yield(varbind))
}

/// Map a walk page's PDU error-status. SNMPv1 signals end of MIB with
/// noSuchName, which propagates as a typed error rather than a silent stop.
fn page_error(page: &PduResult, cursor: &Oid) -> Error {
    match page.error_status {
        ErrorStatus::NoSuchName => Error::NoSuchName {
            oid: Some(cursor.clone()),
            index: page.error_index,
        },
        status => Error::Agent {
            status,
            index: page.error_index,
            oid: Some(cursor.clone()),
        },
    }
}

/// A GETNEXT-paged walk over a subtree.
pub struct Walk<E: Engine> {
    session: Session<E>,
    root: Oid,
    cursor: Oid,
    flags: OutputFlags,
    pending: Option<PageFuture>,
    done: bool,
}

impl<E: Engine + 'static> Walk<E> {
    pub(crate) fn new(session: Session<E>, root: Oid) -> Self {
        let flags = session.output_flags();
        let cursor = root.clone();
        Self {
            session,
            root,
            cursor,
            flags,
            pending: None,
            done: false,
        }
    }

    fn next_page(&self) -> PageFuture {
        let session = self.session.clone();
        let cursor = self.cursor.clone();
        Box::pin(async move {
            session
                .dispatch_with_retry(PduRequest::GetNext { oids: vec![cursor] })
                .await
        })
    }
}

impl<E: Engine + 'static> Stream for Walk<E> {
    type Item = Result<ResultRecord>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }
        if this.pending.is_none() {
            this.pending = Some(this.next_page());
        }
        let Some(pending) = this.pending.as_mut() else {
            return Poll::Ready(None);
        };
        let page = match pending.as_mut().poll(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(page) => page,
        };
        this.pending = None;

        let page = match page {
            Ok(page) => page,
            Err(err) => {
                this.done = true;
                return Poll::Ready(Some(Err(err)));
            }
        };
        if page.is_error() {
            this.done = true;
            return Poll::Ready(Some(Err(page_error(&page, &this.cursor))));
        }
        let Some(varbind) = page.varbinds.into_iter().next() else {
            this.done = true;
            return Poll::Ready(Some(Err(Error::connection(
                "agent answered GETNEXT with no varbinds",
            ))));
        };
        match advance(&this.root, &mut this.cursor, varbind) {
            Ok(Step::Yield(vb)) => {
                let record = ResultRecord::decode(&vb, this.flags, this.session.engine());
                Poll::Ready(Some(Ok(record)))
            }
            Ok(Step::Finished) => {
                this.done = true;
                Poll::Ready(None)
            }
            Err(err) => {
                this.done = true;
                Poll::Ready(Some(Err(err)))
            }
        }
    }
}

/// A GETBULK-paged walk over a subtree.
///
/// Buffers each response page and re-requests from the last in-subtree
/// OID when the buffer drains.
pub struct BulkWalk<E: Engine> {
    session: Session<E>,
    root: Oid,
    cursor: Oid,
    max_repetitions: i32,
    flags: OutputFlags,
    buffer: VecDeque<VarBind>,
    pending: Option<PageFuture>,
    done: bool,
}

impl<E: Engine + 'static> BulkWalk<E> {
    pub(crate) fn new(session: Session<E>, root: Oid, max_repetitions: i32) -> Self {
        let flags = session.output_flags();
        let cursor = root.clone();
        Self {
            session,
            root,
            cursor,
            max_repetitions,
            flags,
            buffer: VecDeque::new(),
            pending: None,
            done: false,
        }
    }

    fn next_page(&self) -> PageFuture {
        let session = self.session.clone();
        let cursor = self.cursor.clone();
        let max_repetitions = self.max_repetitions;
        Box::pin(async move {
            session
                .dispatch_with_retry(PduRequest::GetBulk {
                    oids: vec![cursor],
                    non_repeaters: 0,
                    max_repetitions,
                })
                .await
        })
    }
}

impl<E: Engine + 'static> Stream for BulkWalk<E> {
    type Item = Result<ResultRecord>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if this.done {
                return Poll::Ready(None);
            }
            if let Some(varbind) = this.buffer.pop_front() {
                match advance(&this.root, &mut this.cursor, varbind) {
                    Ok(Step::Yield(vb)) => {
                        let record = ResultRecord::decode(&vb, this.flags, this.session.engine());
                        return Poll::Ready(Some(Ok(record)));
                    }
                    Ok(Step::Finished) => {
                        this.done = true;
                        return Poll::Ready(None);
                    }
                    Err(err) => {
                        this.done = true;
                        return Poll::Ready(Some(Err(err)));
                    }
                }
            }

            if this.pending.is_none() {
                this.pending = Some(this.next_page());
            }
            let Some(pending) = this.pending.as_mut() else {
                return Poll::Ready(None);
            };
            let page = match pending.as_mut().poll(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(page) => page,
            };
            this.pending = None;

            let page = match page {
                Ok(page) => page,
                Err(err) => {
                    this.done = true;
                    return Poll::Ready(Some(Err(err)));
                }
            };
            if page.is_error() {
                this.done = true;
                return Poll::Ready(Some(Err(page_error(&page, &this.cursor))));
            }
            if page.varbinds.is_empty() {
                this.done = true;
                return Poll::Ready(Some(Err(Error::connection(
                    "agent answered GETBULK with no varbinds",
                ))));
            }
            this.buffer.extend(page.varbinds);
        }
    }
}
