// ABOUTME: Output destination lifecycle for split dumps
// ABOUTME: Routes segments to one stream or per-entity files with append semantics

use anyhow::{bail, Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Destination of a single-stream run.
#[derive(Debug, Clone)]
pub enum StreamTarget {
    /// The `-` sentinel on the command line.
    Stdout,
    File(PathBuf),
}

/// Where kept segments go; exactly one target per run.
#[derive(Debug, Clone)]
pub enum OutputTarget {
    /// One combined stream for the whole run.
    Single(StreamTarget),
    /// One `<entity>.sql[.gz]` file per entity under a directory.
    PerEntity(PathBuf),
}

/// A writable destination, optionally wrapped in a gzip envelope.
///
/// The envelope must be finalized (trailer written) before the underlying
/// writer is released, so closing is an explicit `finish`, not a drop.
enum Sink {
    Plain(Box<dyn Write>),
    Gzip(GzEncoder<Box<dyn Write>>),
}

impl Sink {
    fn new(raw: Box<dyn Write>, compress: bool) -> Self {
        if compress {
            Sink::Gzip(GzEncoder::new(raw, Compression::default()))
        } else {
            Sink::Plain(raw)
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            Sink::Plain(w) => w.write_all(buf),
            Sink::Gzip(w) => w.write_all(buf),
        }
    }

    fn finish(self) -> Result<()> {
        match self {
            Sink::Plain(mut w) => w.flush().context("failed to flush output")?,
            Sink::Gzip(gz) => gz
                .finish()
                .context("failed to finalize gzip output")?
                .flush()
                .context("failed to flush output")?,
        }
        Ok(())
    }
}

/// Owns every open output handle for a run.
///
/// At most one destination is open for writing at any time: the single
/// stream stays open for the whole run, while per-entity handles are closed
/// before the next one opens.
pub struct OutputRouter {
    target: OutputTarget,
    compress: bool,
    header: Vec<u8>,
    created: HashSet<PathBuf>,
    sink: Option<Sink>,
}

impl OutputRouter {
    pub fn new(target: OutputTarget, compress: bool) -> Self {
        Self {
            target,
            compress,
            header: Vec::new(),
            created: HashSet::new(),
            sink: None,
        }
    }

    /// Installs the captured header block, replicated as a prologue into
    /// every destination created afterwards.
    pub fn set_header(&mut self, header: Vec<u8>) {
        self.header = header;
    }

    /// Resolves the destination for an about-to-start segment.
    ///
    /// Single-stream mode opens the stream exactly once; later calls are
    /// no-ops. Per-entity mode creates `<entity>.sql[.gz]` on first sight
    /// (with the header prologue) and reopens it in append mode afterwards.
    pub fn open(&mut self, entity: &str) -> Result<()> {
        match self.target.clone() {
            OutputTarget::Single(stream) => {
                if self.sink.is_some() {
                    return Ok(());
                }
                self.open_single(&stream)
            }
            OutputTarget::PerEntity(dir) => self.open_entity(&dir, entity),
        }
    }

    /// Appends one dump line; output always uses CRLF line endings.
    pub fn write_line(&mut self, line: &[u8]) -> Result<()> {
        let sink = match self.sink.as_mut() {
            Some(sink) => sink,
            None => bail!("no output destination is open"),
        };
        sink.write_all(line)
            .and_then(|()| sink.write_all(b"\r\n"))
            .context("failed to write output line")?;
        Ok(())
    }

    /// Flushes and releases the open destination. Called at run end and on
    /// fatal errors; safe to call when nothing is open.
    pub fn finish(&mut self) -> Result<()> {
        match self.sink.take() {
            Some(sink) => sink.finish(),
            None => Ok(()),
        }
    }

    fn open_single(&mut self, stream: &StreamTarget) -> Result<()> {
        let raw: Box<dyn Write> = match stream {
            StreamTarget::Stdout => Box::new(io::stdout()),
            StreamTarget::File(path) => {
                let file = File::create(path)
                    .with_context(|| format!("failed to create output file {}", path.display()))?;
                Box::new(BufWriter::new(file))
            }
        };
        let mut sink = Sink::new(raw, self.compress);
        self.write_header(&mut sink)?;
        self.sink = Some(sink);
        Ok(())
    }

    fn open_entity(&mut self, dir: &Path, entity: &str) -> Result<()> {
        // The previous entity's handle must be finalized before the next
        // opens; segments are strictly sequential.
        self.finish()?;
        ensure_outdir(dir)?;

        let mut file_name = format!("{entity}.sql");
        if self.compress {
            file_name.push_str(".gz");
        }
        let path = dir.join(file_name);

        if self.created.contains(&path) {
            let file = OpenOptions::new()
                .append(true)
                .open(&path)
                .with_context(|| format!("failed to reopen {} for append", path.display()))?;
            // Appending a fresh gzip member to an existing .gz file yields a
            // valid multi-member stream.
            self.sink = Some(Sink::new(Box::new(BufWriter::new(file)), self.compress));
            return Ok(());
        }

        let file = File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        self.created.insert(path);
        let mut sink = Sink::new(Box::new(BufWriter::new(file)), self.compress);
        self.write_header(&mut sink)?;
        self.sink = Some(sink);
        Ok(())
    }

    fn write_header(&self, sink: &mut Sink) -> Result<()> {
        if self.header.is_empty() {
            return Ok(());
        }
        sink.write_all(&self.header)
            .and_then(|()| sink.write_all(b"\n"))
            .context("failed to write header block")?;
        Ok(())
    }
}

fn ensure_outdir(dir: &Path) -> Result<()> {
    match std::fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => bail!("{} exists but is not a directory", dir.display()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display())),
        Err(err) => Err(err)
            .with_context(|| format!("failed to inspect output directory {}", dir.display())),
    }
}
