use std::{fmt::Display, str::FromStr};

use miette::Diagnostic;
use thiserror::Error;

/// A semantic version as found in changelog headings: a three-part numeric
/// core with optional pre-release and build metadata components.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Version {
    base: BaseVersion,
    pre: Option<Prerelease>,
    build: Option<Build>,
}

impl Version {
    /// The numeric core, ignoring pre-release and build metadata. Two
    /// releases refer to the same changelog section when their base versions
    /// are equal.
    pub(crate) const fn base_version(&self) -> BaseVersion {
        self.base
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct BaseVersion {
    pub(crate) major: u64,
    pub(crate) minor: u64,
    pub(crate) patch: u64,
}

impl Display for BaseVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{major}.{minor}.{patch}",
            major = self.major,
            minor = self.minor,
            patch = self.patch
        )
    }
}

impl FromStr for Version {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let version = s.strip_prefix(['v', 'V']).unwrap_or(s);
        let (version, build) = version
            .split_once('+')
            .map_or((version, None), |(version, build)| (version, Some(build)));
        let (version, pre) = version
            .split_once('-')
            .map_or((version, None), |(version, pre)| (version, Some(pre)));
        let base_parts: [u64; 3] = version
            .split('.')
            .map(|part| {
                part.parse::<u64>()
                    .map_err(|err| InvalidVersion(err.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?
            .try_into()
            .map_err(|_| InvalidVersion("Version must have exactly 3 parts".to_string()))?;
        Ok(Self {
            base: BaseVersion {
                major: base_parts[0],
                minor: base_parts[1],
                patch: base_parts[2],
            },
            pre: pre.map(Prerelease::from_str).transpose()?,
            build: build.map(Build::from_str).transpose()?,
        })
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.base)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{pre}")?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{build}")?;
        }
        Ok(())
    }
}

/// The pre-release component (e.g., "rc.1" in "1.2.3-rc.1"). Carried for
/// display, never compared.
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Prerelease(String);

impl Display for Prerelease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Prerelease {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        identifiers(s, "pre-release").map(Self)
    }
}

/// The build metadata component (e.g., "build5" in "1.0.0+build5").
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Build(String);

impl Display for Build {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Build {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        identifiers(s, "build metadata").map(Self)
    }
}

/// Dot-separated identifiers of ASCII alphanumerics and hyphens.
fn identifiers(s: &str, component: &str) -> Result<String, InvalidVersion> {
    let well_formed = !s.is_empty()
        && s.split('.').all(|part| {
            !part.is_empty()
                && part
                    .bytes()
                    .all(|byte| byte.is_ascii_alphanumeric() || byte == b'-')
        });
    if well_formed {
        Ok(s.to_string())
    } else {
        Err(InvalidVersion(format!(
            "Invalid {component} component {s}"
        )))
    }
}

#[derive(Debug, Diagnostic, Error)]
#[error("Found invalid semantic version {0}")]
#[diagnostic(
    code(semver::parse),
    help("The version must be a valid Semantic Version")
)]
pub(crate) struct InvalidVersion(String);

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("1.2.3")]
    #[case("v1.2.3")]
    #[case("V1.2.3")]
    #[case("0.1.0-rc.0")]
    #[case("1.0.0+build5")]
    #[case("2.0.0-alpha-two.1+42")]
    fn parses(#[case] version: &str) {
        Version::from_str(version).unwrap();
    }

    #[rstest]
    #[case("")]
    #[case("not-a-version")]
    #[case("1.2")]
    #[case("1.2.3.4")]
    #[case("1.2.c")]
    #[case("1.2.3-")]
    #[case("1.2.3+")]
    #[case("1.2.3-rc..1")]
    fn rejects(#[case] version: &str) {
        Version::from_str(version).unwrap_err();
    }

    #[test]
    fn base_version_ignores_pre_and_build() {
        let released = Version::from_str("1.0.0").unwrap();
        let tagged = Version::from_str("1.0.0+build5").unwrap();
        let pre = Version::from_str("1.0.0-rc.1").unwrap();

        assert_eq!(released.base_version(), tagged.base_version());
        assert_eq!(released.base_version(), pre.base_version());
        assert_ne!(released, tagged);
    }

    #[test]
    fn display_round_trips() {
        for version in ["1.2.3", "1.2.3-rc.4", "1.2.3-rc.4+build5", "1.2.3+42"] {
            assert_eq!(Version::from_str(version).unwrap().to_string(), version);
        }
    }

    #[test]
    fn leading_v_is_stripped() {
        assert_eq!(
            Version::from_str("v1.2.3").unwrap(),
            Version::from_str("1.2.3").unwrap()
        );
    }
}
