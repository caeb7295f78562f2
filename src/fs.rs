//! Proxies to FS utils that wrap I/O failures with the offending path.

use std::{
    fmt::Display,
    fs::File,
    io::{self, BufReader, Write},
    path::{Path, PathBuf},
};

use log::trace;
use miette::Diagnostic;
use thiserror::Error;

/// Open a file for buffered, line-by-line reading.
pub(crate) fn open(path: &Path) -> Result<BufReader<File>, Error> {
    trace!("Opening {}", path.display());
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| Error::Read {
            path: path.into(),
            source,
        })
}

pub(crate) fn write<C: AsRef<[u8]> + Display>(path: &Path, contents: C) -> Result<(), Error> {
    trace!("Writing {} to {}", contents, path.display());
    std::fs::write(path, contents).map_err(|source| Error::Write {
        path: path.into(),
        source,
    })
}

pub(crate) fn write_stdout<C: Display>(contents: C) -> Result<(), Error> {
    writeln!(io::stdout(), "{contents}").map_err(Error::Stdout)
}

#[derive(Debug, Diagnostic, Error)]
pub(crate) enum Error {
    #[error("Error writing to {path}: {source}")]
    #[diagnostic(
        code(fs::write),
        help("Make sure you have permission to write to this file.")
    )]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Error reading from {path}: {source}")]
    #[diagnostic(
        code(fs::read),
        help("Make sure you have permission to read this file.")
    )]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Error writing to stdout: {0}")]
    Stdout(#[source] io::Error),
}
