use serde::{Deserialize, Serialize};
use std::fmt;

/// A module referenced by the SBOM, decomposed from its canonical path.
///
/// `github.com/acme/toolkit/v2` splits into domain `github.com`, owner
/// `acme`, name `toolkit` and subpath `v2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dependency {
    path: String,
    version: String,
}

impl Dependency {
    pub fn new(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    fn segments(&self) -> Vec<&str> {
        self.path.split('/').collect()
    }

    pub fn domain(&self) -> Option<&str> {
        self.segments().first().copied().filter(|s| !s.is_empty())
    }

    pub fn owner(&self) -> Option<&str> {
        self.segments().get(1).copied()
    }

    pub fn name(&self) -> Option<&str> {
        self.segments().get(2).copied()
    }

    pub fn subpath(&self) -> String {
        self.segments().iter().skip(3).copied().collect::<Vec<_>>().join("/")
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.path, self.version)
    }
}

/// How the fetch URL of an internal repository is spelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchProtocol {
    /// `git@host:owner/repo.git`
    #[default]
    Ssh,
    /// `https://host/owner/repo.git`
    Https,
}

/// Repository identity of a dependency that may be owned internally.
///
/// Only paths with at least three segments (host, owner, repository) have an
/// identity; anything shorter is never treated as internal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InternalIdentity {
    domain: String,
    owner: String,
    repository: String,
    fetch_url: String,
}

impl InternalIdentity {
    pub fn from_dependency(dependency: &Dependency, protocol: FetchProtocol) -> Option<Self> {
        let segments = dependency.segments();
        if segments.len() < 3 || segments[..3].iter().any(|s| s.is_empty()) {
            return None;
        }
        let (domain, owner, repository) = (segments[0], segments[1], segments[2]);
        let fetch_url = match protocol {
            FetchProtocol::Ssh => format!("git@{}:{}/{}.git", domain, owner, repository),
            FetchProtocol::Https => format!("https://{}/{}/{}.git", domain, owner, repository),
        };

        Some(Self {
            domain: domain.to_string(),
            owner: owner.to_string(),
            repository: repository.to_string(),
            fetch_url,
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// `domain/owner/repository`
    pub fn qualified_name(&self) -> String {
        format!("{}/{}/{}", self.domain, self.owner, self.repository)
    }

    pub fn fetch_url(&self) -> &str {
        &self.fetch_url
    }
}
