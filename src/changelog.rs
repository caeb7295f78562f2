use std::{
    borrow::Cow,
    collections::VecDeque,
    io::{self, BufRead, Lines},
    path::Path,
    str::FromStr,
    sync::LazyLock,
};

use itertools::Itertools;
use log::debug;
use regex::Regex;

use crate::{fs, semver::Version};

/// Written out when the requested version can't be parsed at all.
pub(crate) const GENERIC_MESSAGE: &str =
    "This release was automatically generated by the release pipeline.";

/// A hard-wrapped line break inside a paragraph, as opposed to a deliberate
/// blank-line paragraph break.
static HARD_WRAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\S)\n(\S)").expect("hard-wrap pattern is valid"));

/// Pull the release notes for `version` out of the changelog at `path`.
///
/// The requested version only has to match on its base version, so
/// `1.2.3+build5` finds a section headed `v1.2.3`. A version that doesn't
/// parse at all selects [`GENERIC_MESSAGE`] without reading the file, and a
/// version with no heading in the changelog comes back as an empty string.
pub(crate) fn get_release_notes(path: &Path, version: &str) -> Result<String, fs::Error> {
    let Ok(version) = Version::from_str(version) else {
        debug!("{version} is not a version, falling back to the generic notes");
        return Ok(GENERIC_MESSAGE.to_string());
    };
    let mut lines = fs::open(path)?.lines();

    // First pass lands the cursor just past the matching heading (or at end
    // of file when the version isn't in the changelog).
    for line in HeadingScanner::new(&mut lines, Some(&version)) {
        line.map_err(|source| fs::Error::Read {
            path: path.into(),
            source,
        })?;
    }

    // Second pass runs to the next heading, whatever its version. The last
    // three collected lines are that heading, not body text.
    let section = HeadingScanner::new(&mut lines, None)
        .collect::<io::Result<Vec<String>>>()
        .map_err(|source| fs::Error::Read {
            path: path.into(),
            source,
        })?;
    let body = section.iter().dropping_back(3).join("\n");
    Ok(unwrap_hard_breaks(&body).trim().to_string())
}

/// Produces lines from `source` until the trailing three form a version
/// heading:
///
/// ```text
/// ---------
/// v##.##.##
/// ---------
/// ```
///
/// Lines are released in order but held back behind a three-line window, so a
/// heading is recognized before any of its lines are given out. Whatever is
/// still buffered when the scan ends (a matched heading included) is flushed,
/// leaving the cursor just past the heading for a follow-up scan.
pub(crate) struct HeadingScanner<'a, R> {
    source: &'a mut Lines<R>,
    target: Option<&'a Version>,
    window: VecDeque<String>,
    released: VecDeque<String>,
    done: bool,
}

impl<'a, R: BufRead> HeadingScanner<'a, R> {
    pub(crate) fn new(source: &'a mut Lines<R>, target: Option<&'a Version>) -> Self {
        Self {
            source,
            target,
            window: VecDeque::with_capacity(4),
            released: VecDeque::new(),
            done: false,
        }
    }

    /// Whether the last three buffered lines are a heading for the target
    /// version (or for any version, without a target).
    fn window_matches(&self) -> bool {
        let mut newest_first = self.window.iter().rev();
        let (Some(bottom), Some(label), Some(top)) = (
            newest_first.next(),
            newest_first.next(),
            newest_first.next(),
        ) else {
            return false;
        };
        if !is_ruler(top) || !is_ruler(bottom) {
            return false;
        }
        let Ok(version) = Version::from_str(label.trim()) else {
            return false;
        };
        self.target
            .is_none_or(|target| target.base_version() == version.base_version())
    }
}

impl<R: BufRead> Iterator for HeadingScanner<'_, R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<io::Result<String>> {
        loop {
            if let Some(line) = self.released.pop_front() {
                return Some(Ok(line));
            }
            if self.done {
                return None;
            }
            match self.source.next() {
                None => {
                    self.done = true;
                    self.released.extend(self.window.drain(..));
                }
                Some(Err(err)) => {
                    self.done = true;
                    return Some(Err(err));
                }
                Some(Ok(line)) => {
                    self.window.push_back(line.trim_end().to_string());
                    if self.window_matches() {
                        self.done = true;
                        self.released.extend(self.window.drain(..));
                    } else if self.window.len() > 3 {
                        let excess = self.window.len() - 3;
                        self.released.extend(self.window.drain(..excess));
                    }
                }
            }
        }
    }
}

/// A line consisting solely of one or more `-` characters.
fn is_ruler(line: &str) -> bool {
    !line.is_empty() && line.bytes().all(|byte| byte == b'-')
}

/// Undo manual hard-wrapping: a newline directly between two non-whitespace
/// characters joins them with nothing in between. Blank-line paragraph breaks
/// are untouched.
fn unwrap_hard_breaks(text: &str) -> Cow<'_, str> {
    HARD_WRAP.replace_all(text, "${1}${2}")
}
