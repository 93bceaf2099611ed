use std::{io, pin::Pin, task};

use tokio::{
    io::{AsyncRead, DuplexStream, ReadBuf},
    process::{ChildStderr, ChildStdout},
};

/// The byte source feeding a pipeline stage: the previous stage's stdout or
/// stderr for external commands, a duplex channel for builtins, or an
/// immediate end-of-file.
pub enum StageRead {
    Stdout(ChildStdout),
    Stderr(ChildStderr),
    Duplex(DuplexStream),
    Empty,
}

impl StageRead {
    /// Reads this source to end-of-file and discards the bytes.
    ///
    /// Every non-first stage must consume its input to completion so the
    /// upstream writer can finish flushing and close its end.
    pub async fn drain(mut self) {
        let _ = tokio::io::copy(&mut self, &mut tokio::io::sink()).await;
    }
}

impl From<ChildStdout> for StageRead {
    fn from(value: ChildStdout) -> Self {
        Self::Stdout(value)
    }
}

impl From<ChildStderr> for StageRead {
    fn from(value: ChildStderr) -> Self {
        Self::Stderr(value)
    }
}

impl AsyncRead for StageRead {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut task::Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> task::Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Stdout(stdout) => Pin::new(stdout).poll_read(cx, buf),
            Self::Stderr(stderr) => Pin::new(stderr).poll_read(cx, buf),
            Self::Duplex(duplex) => Pin::new(duplex).poll_read(cx, buf),
            Self::Empty => task::Poll::Ready(Ok(())),
        }
    }
}
