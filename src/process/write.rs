use std::{io, pin::Pin, task};

use tokio::{
    fs::File,
    io::{AsyncWrite, DuplexStream, Sink, Stdout},
};

/// The byte sink a pipeline stage writes into: the shell's stdout for a
/// terminal stage, a duplex channel feeding the next stage, a redirection
/// target, or a discard sink when the target could not be opened.
pub enum StageWrite {
    Stdout(Stdout),
    Duplex(DuplexStream),
    File(File),
    Sink(Sink),
}

impl StageWrite {
    pub fn stdout() -> Self {
        Self::Stdout(tokio::io::stdout())
    }

    pub fn sink() -> Self {
        Self::Sink(tokio::io::sink())
    }
}

impl AsyncWrite for StageWrite {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut task::Context<'_>,
        buf: &[u8],
    ) -> task::Poll<io::Result<usize>> {
        match self.get_mut() {
            Self::Stdout(stdout) => Pin::new(stdout).poll_write(cx, buf),
            Self::Duplex(duplex) => Pin::new(duplex).poll_write(cx, buf),
            Self::File(file) => Pin::new(file).poll_write(cx, buf),
            Self::Sink(sink) => Pin::new(sink).poll_write(cx, buf),
        }
    }

    fn poll_flush(
        self: Pin<&mut Self>,
        cx: &mut task::Context<'_>,
    ) -> task::Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Stdout(stdout) => Pin::new(stdout).poll_flush(cx),
            Self::Duplex(duplex) => Pin::new(duplex).poll_flush(cx),
            Self::File(file) => Pin::new(file).poll_flush(cx),
            Self::Sink(sink) => Pin::new(sink).poll_flush(cx),
        }
    }

    fn poll_shutdown(
        self: Pin<&mut Self>,
        cx: &mut task::Context<'_>,
    ) -> task::Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Stdout(stdout) => Pin::new(stdout).poll_shutdown(cx),
            Self::Duplex(duplex) => Pin::new(duplex).poll_shutdown(cx),
            Self::File(file) => Pin::new(file).poll_shutdown(cx),
            Self::Sink(sink) => Pin::new(sink).poll_shutdown(cx),
        }
    }
}
