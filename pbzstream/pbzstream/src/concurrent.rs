//! Channel-driven writer/reader worker threads with cooperative
//! cancellation.
//!
//! One thread owns a [`PbzWriter`] and drains a message channel; one thread
//! owns a [`PbzReader`] and feeds a message channel.  A one-shot
//! [`CancelToken`] stops either loop between messages — in-flight frame I/O
//! is never interrupted, and a cancelled writer still finalizes the
//! compression envelope so the file stays structurally valid up to the last
//! fully written frame.  The returned [`JoinHandle`]s are the completion
//! signal: loop failures surface there instead of vanishing.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam::channel::{Receiver, Sender, bounded, never};
use crossbeam::select;
use pbzstream_core::MessageCodec;

use crate::{PbzReader, PbzWriter, ReadError, WriteError};

/// Fires the paired [`CancelToken`].  One-shot.
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
    // Dropped on cancel, waking any select blocked on the token's channel.
    _tx: Sender<()>,
}

/// Cancellation signal observed by worker loops between messages.
#[derive(Clone)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    rx: Receiver<()>,
}

/// Create a connected cancellation handle/token pair.
///
/// Dropping the handle without calling [`CancelHandle::cancel`] never
/// cancels anything.
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let flag = Arc::new(AtomicBool::new(false));
    let (tx, rx) = bounded(0);
    (
        CancelHandle {
            flag: Arc::clone(&flag),
            _tx: tx,
        },
        CancelToken { flag, rx },
    )
}

impl CancelHandle {
    /// Signal cancellation.  Loops observe it at their next iteration head.
    pub fn cancel(self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}

impl CancelToken {
    /// Non-blocking cancellation check.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    fn channel(&self) -> Receiver<()> {
        self.rx.clone()
    }
}

/// Drain `messages` into `writer` until the channel closes or `cancel`
/// fires, then finish the stream.
///
/// Cancellation stops the loop without draining remaining channel input.
/// The envelope is finalized on every exit path, including after a write
/// error, so the destination stays structurally valid.
pub fn run_writer<C, W>(
    mut writer: PbzWriter<C, W>,
    messages: &Receiver<C::Message>,
    cancel: &CancelToken,
) -> Result<W, WriteError>
where
    C: MessageCodec,
    W: Write,
{
    let mut cancel_rx = cancel.channel();
    let mut result = Ok(());

    loop {
        select! {
            recv(messages) -> msg => match msg {
                Ok(message) => {
                    if let Err(err) = writer.write(&message) {
                        result = Err(err);
                        break;
                    }
                }
                // Producer hung up: no more input.
                Err(_) => break,
            },
            recv(cancel_rx) -> _msg => {
                if cancel.is_cancelled() {
                    break;
                }
                // Handle dropped without firing: stop watching it.
                cancel_rx = never();
            }
        }
    }

    let finished = writer.finish();
    match result {
        Ok(()) => finished,
        Err(err) => Err(err),
    }
}

/// Pump messages from `reader` into `out` until end of stream, a read
/// error, or cancellation.
///
/// Cancellation is checked non-blockingly at each iteration head and is a
/// graceful stop, not an error.  A hung-up output channel also stops the
/// loop silently.
pub fn run_reader<C, R>(
    mut reader: PbzReader<C, R>,
    out: &Sender<C::Message>,
    cancel: &CancelToken,
) -> Result<(), ReadError>
where
    C: MessageCodec,
    R: Read,
{
    while !cancel.is_cancelled() {
        match reader.read()? {
            Some(message) => {
                if out.send(message).is_err() {
                    break;
                }
            }
            None => break,
        }
    }
    Ok(())
}

/// Spawn a thread that writes every message received on `messages` to a new
/// stream at `path`, embedding the descriptor set read from
/// `descriptor_path`.
///
/// Join the returned handle to wait for completion and observe failures.
pub fn spawn_writer<C>(
    path: impl AsRef<Path>,
    descriptor_path: impl AsRef<Path>,
    codec: C,
    messages: Receiver<C::Message>,
    cancel: CancelToken,
) -> JoinHandle<Result<(), WriteError>>
where
    C: MessageCodec + Send + 'static,
    C::Message: Send + 'static,
{
    let path: PathBuf = path.as_ref().to_path_buf();
    let descriptor_path: PathBuf = descriptor_path.as_ref().to_path_buf();
    thread::spawn(move || {
        let writer = PbzWriter::create(&path, &descriptor_path, codec)?;
        run_writer(writer, &messages, &cancel).map(drop)
    })
}

/// Spawn a thread that reads the stream at `path` and sends each decoded
/// message to `out`.
///
/// `out` is dropped on every exit path — open failure, read failure, end of
/// stream, cancellation — so consumers blocked on the channel always wake
/// up.  Join the returned handle to wait for completion and observe
/// failures.
pub fn spawn_reader<C>(
    path: impl AsRef<Path>,
    codec: C,
    out: Sender<C::Message>,
    cancel: CancelToken,
) -> JoinHandle<Result<(), ReadError>>
where
    C: MessageCodec + Send + 'static,
    C::Message: Send + 'static,
{
    let path: PathBuf = path.as_ref().to_path_buf();
    thread::spawn(move || {
        let reader = PbzReader::open(&path, codec)?;
        run_reader(reader, &out, &cancel)
    })
}
