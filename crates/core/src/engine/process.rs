//! Child process supervision for the engine.

use async_trait::async_trait;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tracing::debug;

use super::args::ArgumentList;
use super::error::EngineError;
use super::traits::{Engine, EngineExit, EngineProcess};

/// Lines buffered between the reader thread and the consumer.
const LINE_BUFFER: usize = 256;

/// Launches the engine binary and supervises its processes.
#[derive(Debug, Clone)]
pub struct ProcessSupervisor {
    executable: PathBuf,
    name: String,
}

impl ProcessSupervisor {
    /// Creates a supervisor for the given executable.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        let executable = executable.into();
        let name = executable
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "engine".to_string());
        Self { executable, name }
    }

    /// Path of the binary this supervisor launches.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Spawns the engine with stdout and stderr sharing one pipe, so lines
    /// arrive in the order the child wrote them.
    pub fn spawn_process(&self, args: &ArgumentList) -> Result<ProcessHandle, EngineError> {
        let (reader, writer) =
            std::io::pipe().map_err(|e| EngineError::from_spawn(&self.executable, e))?;
        let stderr_writer = writer
            .try_clone()
            .map_err(|e| EngineError::from_spawn(&self.executable, e))?;

        // The command holds our copies of the write end. It has to go away
        // right after spawning or the reader never sees EOF.
        let child = {
            let mut command = Command::new(&self.executable);
            command
                .args(args)
                .stdin(Stdio::null())
                .stdout(writer)
                .stderr(stderr_writer)
                .kill_on_drop(true);
            command.spawn()
        }
        .map_err(|e| EngineError::from_spawn(&self.executable, e))?;

        debug!(pid = ?child.id(), "Spawned {}", self.executable.display());

        let (tx, lines) = mpsc::channel(LINE_BUFFER);
        std::thread::Builder::new()
            .name("engine-output".to_string())
            .spawn(move || forward_lines(reader, tx))?;

        Ok(ProcessHandle { child, lines })
    }
}

#[async_trait]
impl Engine for ProcessSupervisor {
    fn name(&self) -> &str {
        &self.name
    }

    async fn spawn(&self, args: &ArgumentList) -> Result<Box<dyn EngineProcess>, EngineError> {
        Ok(Box::new(self.spawn_process(args)?))
    }
}

/// A running engine process.
///
/// Dropping the handle kills the child if it is still alive and closes the
/// output pipe, whichever way consumption ended.
#[derive(Debug)]
pub struct ProcessHandle {
    child: Child,
    lines: mpsc::Receiver<std::io::Result<String>>,
}

impl ProcessHandle {
    /// OS process id, if the child has not been reaped yet.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }
}

#[async_trait]
impl EngineProcess for ProcessHandle {
    async fn next_line(&mut self) -> Result<Option<String>, EngineError> {
        match self.lines.recv().await {
            Some(Ok(line)) => Ok(Some(line)),
            Some(Err(e)) => Err(EngineError::Io(e)),
            None => Ok(None),
        }
    }

    async fn wait(&mut self) -> Result<EngineExit, EngineError> {
        let status = self.child.wait().await?;
        Ok(EngineExit::from(status))
    }
}

/// Reads the merged output and forwards it line by line.
///
/// Both `\n` and `\r` end a line, since the engine redraws its console readout
/// with carriage returns. The empty piece between a `\r` and the next
/// terminator is not a line; every other line is trimmed and forwarded, blank
/// ones included. Bytes are decoded lossily.
fn forward_lines<R: Read>(reader: R, tx: mpsc::Sender<std::io::Result<String>>) {
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    let mut after_cr = false;

    loop {
        let consumed = match reader.fill_buf() {
            Ok([]) => break,
            Ok(chunk) => {
                for &byte in chunk {
                    if byte == b'\n' || byte == b'\r' {
                        if !(after_cr && line.is_empty())
                            && tx.blocking_send(Ok(decode_line(&line))).is_err()
                        {
                            return;
                        }
                        line.clear();
                        after_cr = byte == b'\r';
                    } else {
                        line.push(byte);
                    }
                }
                chunk.len()
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                let _ = tx.blocking_send(Err(e));
                return;
            }
        };
        reader.consume(consumed);
    }

    if !line.is_empty() {
        let _ = tx.blocking_send(Ok(decode_line(&line)));
    }
}

fn decode_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}
