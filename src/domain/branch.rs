use crate::error::{FinishError, Result};

/// The single in-progress release branch and the version it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseBranch {
    /// Full branch name, e.g. `release/1.2.0`
    pub name: String,
    /// Branch name with the release prefix stripped, e.g. `1.2.0`
    pub version: String,
}

/// Local branches found under the release prefix.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReleaseBranchSet {
    names: Vec<String>,
}

impl ReleaseBranchSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|name| clean_ref_name(name.as_ref()))
            .filter(|name| !name.is_empty())
            .collect();

        ReleaseBranchSet { names }
    }

    /// Parses `git for-each-ref --format=%(refname:short)` output, one ref per line.
    ///
    /// Quoted lines (as produced by `--format="%(refname:short)"`) are accepted.
    pub fn from_listing(text: &str) -> Self {
        Self::new(text.lines())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolves the one release branch under `prefix`.
    ///
    /// Fails with [FinishError::AmbiguousRelease] when no branch or more than
    /// one branch starts with `prefix`, or when the stripped version is blank.
    pub fn resolve(&self, prefix: &str) -> Result<ReleaseBranch> {
        let matching: Vec<&String> = self
            .names
            .iter()
            .filter(|name| name.starts_with(prefix))
            .collect();

        let name = match matching.as_slice() {
            [] => {
                return Err(FinishError::ambiguous_release(format!(
                    "No release branch exists under '{}'. Cannot finish release.",
                    prefix
                )))
            }
            [single] => *single,
            many => {
                let listed: Vec<&str> = many.iter().map(|name| name.as_str()).collect();
                return Err(FinishError::ambiguous_release(format!(
                    "More than one release branch exists ({}). Cannot finish release.",
                    listed.join(", ")
                )));
            }
        };

        let version = name[prefix.len()..].trim();
        if version.is_empty() {
            return Err(FinishError::ambiguous_release(format!(
                "Release version is blank for branch '{}'",
                name
            )));
        }

        Ok(ReleaseBranch {
            name: name.clone(),
            version: version.to_string(),
        })
    }
}

fn clean_ref_name(raw: &str) -> String {
    raw.trim().trim_matches(|c| c == '"' || c == '\'').trim().to_string()
}
