//! Single-instance arbitration over a named local socket.
//!
//! The process that takes an exclusive `flock` on `<ipc_dir>/<identity>.lock`
//! is primary for as long as it holds it: it binds `<ipc_dir>/<identity>.sock`
//! and serves forwarded launches. Every other launch connects to that socket,
//! forwards its payload as one JSON line, and must exit.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, ErrorKind, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};
use nix::errno::Errno;
use nix::fcntl::{Flock, FlockArg};
use serde::{Deserialize, Serialize};

use crate::constants::{
    SINGLE_INSTANCE_CONNECT_ATTEMPTS, SINGLE_INSTANCE_CONNECT_INTERVAL,
    SINGLE_INSTANCE_READ_TIMEOUT,
};

#[derive(Debug, Serialize, Deserialize)]
struct ForwardedLaunch {
    arguments: Vec<String>,
}

pub enum InstanceRole {
    /// This process owns the endpoint and should create its window.
    Primary(SingleInstanceServer),
    /// The payload went to the running instance; this process should exit.
    Secondary,
}

fn sanitized(identity: &str) -> String {
    identity
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect()
}

/// Endpoint path for `identity` inside `ipc_dir`.
pub fn endpoint_path(ipc_dir: &Path, identity: &str) -> PathBuf {
    ipc_dir.join(format!("{}.sock", sanitized(identity)))
}

/// Lock file guarding the endpoint of `identity`.
pub fn lock_path(ipc_dir: &Path, identity: &str) -> PathBuf {
    ipc_dir.join(format!("{}.lock", sanitized(identity)))
}

/// Decides whether this process is the single live instance for `identity`.
///
/// `payload` is forwarded to the running instance when there is one.
pub fn arbitrate(ipc_dir: &Path, identity: &str, payload: &[String]) -> Result<InstanceRole> {
    let path = endpoint_path(ipc_dir, identity);

    match try_lock(&lock_path(ipc_dir, identity))? {
        Some(lock) => {
            // Holding the lock means no live primary; anything at `path` is stale.
            if path.exists() {
                warn!("[SingleInstance] Removing stale endpoint {}", path.display());
                fs::remove_file(&path).with_context(|| format!("removing {}", path.display()))?;
            }
            let listener =
                UnixListener::bind(&path).with_context(|| format!("binding {}", path.display()))?;
            info!("[SingleInstance] Primary instance listening on {}", path.display());
            Ok(InstanceRole::Primary(SingleInstanceServer {
                listener,
                path,
                _lock: lock,
            }))
        }
        None => {
            let stream = connect_to_primary(&path)?;
            forward(stream, payload)
                .with_context(|| format!("forwarding launch payload to {}", path.display()))?;
            info!("[SingleInstance] Forwarded {} argument(s) to running instance", payload.len());
            Ok(InstanceRole::Secondary)
        }
    }
}

/// Takes the exclusive lock without blocking. `None` when another process holds it.
fn try_lock(lock: &Path) -> Result<Option<Flock<File>>> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(lock)
        .with_context(|| format!("opening lock file {}", lock.display()))?;

    match Flock::lock(file, FlockArg::LockExclusiveNonblock) {
        Ok(lock) => Ok(Some(lock)),
        Err((_, errno)) if errno == Errno::EWOULDBLOCK => Ok(None),
        Err((_, errno)) => {
            Err(anyhow!(errno)).with_context(|| format!("locking {}", lock.display()))
        }
    }
}

/// The lock holder may still be binding; retry until its socket answers.
fn connect_to_primary(path: &Path) -> Result<UnixStream> {
    let mut last_error = None;
    for _ in 0..SINGLE_INSTANCE_CONNECT_ATTEMPTS {
        match UnixStream::connect(path) {
            Ok(stream) => return Ok(stream),
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::ConnectionRefused) => {
                debug!("[SingleInstance] Primary not listening yet at {}: {}", path.display(), e);
                last_error = Some(e);
                thread::sleep(SINGLE_INSTANCE_CONNECT_INTERVAL);
            }
            Err(e) => return Err(e).with_context(|| format!("connecting to {}", path.display())),
        }
    }
    let e = last_error.unwrap_or_else(|| io::Error::from(ErrorKind::NotFound));
    Err(e).with_context(|| format!("running instance never answered at {}", path.display()))
}

fn forward(mut stream: UnixStream, payload: &[String]) -> Result<()> {
    let mut line = serde_json::to_vec(&ForwardedLaunch {
        arguments: payload.to_vec(),
    })?;
    line.push(b'\n');
    stream.write_all(&line)?;
    stream.flush()?;
    Ok(())
}

/// The bound endpoint of the primary instance.
///
/// Holds the identity lock for its lifetime. The socket file is removed on
/// drop, before the lock is released.
pub struct SingleInstanceServer {
    listener: UnixListener,
    path: PathBuf,
    _lock: Flock<File>,
}

impl SingleInstanceServer {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serves forwarded payloads on a background thread, handing each one to `on_payload`.
    pub fn spawn<F>(self, on_payload: F) -> JoinHandle<()>
    where
        F: Fn(Vec<String>) + Send + 'static,
    {
        thread::spawn(move || {
            for stream in self.listener.incoming() {
                match stream {
                    Ok(stream) => match read_forwarded(stream) {
                        Ok(Some(launch)) => on_payload(launch.arguments),
                        Ok(None) => debug!("[SingleInstance] Peer closed without a payload"),
                        Err(e) => warn!("[SingleInstance] Dropping forwarded launch: {:#}", e),
                    },
                    Err(e) => {
                        warn!("[SingleInstance] Listener stopped: {}", e);
                        break;
                    }
                }
            }
        })
    }
}

impl Drop for SingleInstanceServer {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn read_forwarded(stream: UnixStream) -> Result<Option<ForwardedLaunch>> {
    stream
        .set_read_timeout(Some(SINGLE_INSTANCE_READ_TIMEOUT))
        .context("setting read timeout")?;
    let mut line = String::new();
    let read = BufReader::new(stream)
        .read_line(&mut line)
        .context("reading forwarded launch")?;
    if read == 0 {
        return Ok(None);
    }
    let launch = serde_json::from_str(line.trim_end()).context("decoding forwarded launch")?;
    Ok(Some(launch))
}
