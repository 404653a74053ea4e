//! Attachment responses for extracted audio.

use audex_processing::Workspace;
use bytes::Bytes;
use futures::Stream;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::fs::File;
use tokio_util::io::ReaderStream;

/// RFC 5987 `attr-char` minus the alphanumerics.
const ATTR_CHARS: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

fn is_quotable(c: char) -> bool {
    c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\'
}

/// `Content-Disposition` value for downloading `filename`.
///
/// Plain ASCII names produce `attachment; filename="<name>"`. Anything else
/// gets an ASCII fallback in the quoted form plus an RFC 5987 `filename*`.
pub fn attachment_disposition(filename: &str) -> String {
    if filename.chars().all(is_quotable) {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let fallback: String = filename
        .chars()
        .map(|c| if is_quotable(c) { c } else { '_' })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        utf8_percent_encode(filename, ATTR_CHARS)
    )
}

/// Streams a file out of a workspace and keeps the workspace alive until the
/// body is finished.
///
/// The workspace is released when the file has been fully read, when reading
/// fails, or when the transport drops the body (client disconnect).
pub struct WorkspaceFileStream {
    inner: ReaderStream<File>,
    workspace: Option<Workspace>,
    bytes_sent: u64,
}

impl WorkspaceFileStream {
    pub fn new(file: File, workspace: Workspace) -> Self {
        Self {
            inner: ReaderStream::new(file),
            workspace: Some(workspace),
            bytes_sent: 0,
        }
    }

    fn release(&mut self, outcome: &'static str) {
        if let Some(workspace) = self.workspace.take() {
            let path = workspace.path().to_path_buf();
            match workspace.release() {
                Ok(()) => tracing::info!(
                    workspace = %path.display(),
                    bytes_sent = self.bytes_sent,
                    outcome,
                    "Workspace released"
                ),
                Err(e) => tracing::warn!(
                    workspace = %path.display(),
                    error = %e,
                    outcome,
                    "Failed to release workspace"
                ),
            }
        }
    }
}

impl Stream for WorkspaceFileStream {
    type Item = io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.bytes_sent += chunk.len() as u64;
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                tracing::error!(error = %e, "Failed to read extracted audio");
                this.release("read_error");
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                this.release("completed");
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for WorkspaceFileStream {
    fn drop(&mut self) {
        if self.workspace.is_some() {
            self.release("aborted");
        }
    }
}
