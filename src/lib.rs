use std::path::PathBuf;

use clap::Parser;
use miette::Result;

mod changelog;
mod fs;
mod semver;

/// Extract one version's release notes from a changelog file.
///
/// The changelog is plain text where each release starts with a three-line
/// heading: a ruler of `-` characters, the version, another ruler. Everything
/// up to the next heading is that release's notes.
#[derive(Parser)]
#[command(name = "release-notes")]
#[command(version, about)]
pub struct Cli {
    /// Path to the changelog file to read
    infile_path: PathBuf,

    /// The version to look up, with or without a leading `v`
    #[arg(id = "version_arg", value_name = "VERSION")]
    version: String,

    /// Where to write the notes, `-` meaning standard output
    #[arg(short, long, default_value = "-")]
    outfile_path: PathBuf,
}

pub fn run(cli: Cli) -> Result<()> {
    let notes = changelog::get_release_notes(&cli.infile_path, &cli.version)?;
    if cli.outfile_path.as_os_str() == "-" {
        fs::write_stdout(&notes)?;
    } else {
        fs::write(&cli.outfile_path, format!("{notes}\n"))?;
    }
    Ok(())
}
