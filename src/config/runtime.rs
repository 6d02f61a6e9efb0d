//! Defaults and runtime stream wiring.
//!
//! [`Config::apply_defaults`] fills in everything a merged configuration
//! left unset and hands back the [`Streams`] the renderer writes to and the
//! post-exec command reads from.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::rc::Rc;

use super::defaults;
use super::document::Config;

/// In-memory pipe between the renderer and the post-exec command.
///
/// Clones share the same buffer: bytes written through one handle are read
/// back, in order, through any other. The pipe lives on one thread.
#[derive(Debug, Clone, Default)]
pub struct PipeBuffer {
    inner: Rc<RefCell<VecDeque<u8>>>,
}

impl PipeBuffer {
    /// Creates an empty pipe.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes written and not yet read.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns true if there is nothing left to read.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Read for PipeBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.borrow_mut().read(buf)
    }
}

impl Write for PipeBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Where the post-exec command reads its standard input from.
#[derive(Debug)]
pub enum PostExecInput {
    /// The process's own standard input
    Stdin(io::Stdin),
    /// Rendered output captured for `execPipe`
    Pipe(PipeBuffer),
}

impl Read for PostExecInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Stdin(stdin) => stdin.read(buf),
            Self::Pipe(pipe) => pipe.read(buf),
        }
    }
}

/// Where the renderer writes output destined for `-`.
#[derive(Debug)]
pub enum OutputWriter {
    /// The process's standard output
    Stdout(io::Stdout),
    /// Captured for the post-exec command
    Pipe(PipeBuffer),
}

impl Write for OutputWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout(stdout) => stdout.write(buf),
            Self::Pipe(pipe) => pipe.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(stdout) => stdout.flush(),
            Self::Pipe(pipe) => pipe.flush(),
        }
    }
}

/// Runtime stream handles; never part of the persisted document.
#[derive(Debug)]
pub struct Streams {
    /// Standard input for the post-exec command
    pub post_exec_input: PostExecInput,
    /// Destination for rendered output written to `-`
    pub out_writer: OutputWriter,
}

impl Streams {
    /// Streams connected to the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self {
            post_exec_input: PostExecInput::Stdin(io::stdin()),
            out_writer: OutputWriter::Stdout(io::stdout()),
        }
    }

    /// Streams joined by a fresh in-memory pipe.
    #[must_use]
    pub fn piped() -> Self {
        let pipe = PipeBuffer::new();
        Self {
            post_exec_input: PostExecInput::Pipe(pipe.clone()),
            out_writer: OutputWriter::Pipe(pipe),
        }
    }

    /// Returns true if output is captured for the post-exec command.
    #[must_use]
    pub const fn is_piped(&self) -> bool {
        matches!(self.out_writer, OutputWriter::Pipe(_))
    }
}

impl Config {
    /// Fills unset options with their defaults and wires the runtime streams.
    ///
    /// Applying defaults to an already-defaulted configuration changes
    /// nothing.
    pub fn apply_defaults(&mut self) -> Streams {
        if !self.input_dir.is_empty() && self.output_dir.is_empty() && self.output_map.is_empty() {
            defaults::OUTPUT_DIR.clone_into(&mut self.output_dir);
        }
        if self.input.is_empty() && self.input_dir.is_empty() && self.input_files.is_empty() {
            self.input_files = defaults::stdio_files();
        }
        if self.output_dir.is_empty()
            && self.output_map.is_empty()
            && self.output_files.is_empty()
            && !self.exec_pipe
        {
            self.output_files = defaults::stdio_files();
        }
        if self.left_delim.is_empty() {
            defaults::LEFT_DELIM.clone_into(&mut self.left_delim);
        }
        if self.right_delim.is_empty() {
            defaults::RIGHT_DELIM.clone_into(&mut self.right_delim);
        }
        if self.plugin_timeout.is_zero() {
            self.plugin_timeout = defaults::plugin_timeout();
        }

        let streams = if self.exec_pipe {
            self.output_files = defaults::stdio_files();
            Streams::piped()
        } else {
            Streams::stdio()
        };

        tracing::debug!(piped = streams.is_piped(), "applied configuration defaults");
        streams
    }
}
