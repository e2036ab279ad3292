use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::build::ProjectMetadata;
use crate::error::{FinishError, Result};

/// Sections of a POM that may carry their own `<version>` elements.
const NESTED_SECTIONS: &[&str] = &[
    "profiles",
    "dependencyManagement",
    "dependencies",
    "build",
    "reporting",
    "distributionManagement",
    "repositories",
    "pluginRepositories",
];

/// The project descriptor (`pom.xml`) of a Maven project.
pub struct PomFile {
    path: PathBuf,
}

impl PomFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PomFile { path: path.into() }
    }

    /// `pom.xml` inside `project_dir`
    pub fn in_dir(project_dir: &Path) -> Self {
        Self::new(project_dir.join("pom.xml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProjectMetadata for PomFile {
    fn current_version(&self) -> Result<String> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            FinishError::Io(std::io::Error::new(
                e.kind(),
                format!("Cannot read {}: {}", self.path.display(), e),
            ))
        })?;

        project_version(&content).ok_or_else(|| {
            FinishError::version_computation(format!(
                "No project version declared in {}",
                self.path.display()
            ))
        })
    }
}

fn section(tag: &str) -> Option<Regex> {
    match Regex::new(&format!(r"(?s)<{tag}(?:\s[^>]*)?>.*?</{tag}\s*>", tag = tag)) {
        Ok(re) => Some(re),
        Err(e) => {
            debug!(section = tag, error = %e, "could not compile POM section pattern");
            None
        }
    }
}

fn nested_sections() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| NESTED_SECTIONS.iter().filter_map(|tag| section(tag)).collect())
}

fn first_version(xml: &str) -> Option<String> {
    let re = Regex::new(r"(?s)<version\s*>\s*(.*?)\s*</version\s*>").ok()?;
    re.captures(xml)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|v| !v.is_empty())
}

/// Extracts the project's own version from POM text.
///
/// Falls back to the `<parent>` version when the project inherits it.
pub fn project_version(pom: &str) -> Option<String> {
    let comments = Regex::new(r"(?s)<!--.*?-->").ok()?;
    let mut xml = comments.replace_all(pom, "").into_owned();

    let parent_re = section("parent")?;
    let parent_version = parent_re
        .find(&xml)
        .and_then(|m| first_version(m.as_str()));
    xml = parent_re.replace_all(&xml, "").into_owned();

    for re in nested_sections() {
        xml = re.replace_all(&xml, "").into_owned();
    }

    first_version(&xml).or(parent_version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SIMPLE_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <groupId>com.example</groupId>
  <artifactId>app</artifactId>
  <version>1.2.0</version>
</project>
"#;

    #[test]
    fn test_simple_project_version() {
        assert_eq!(project_version(SIMPLE_POM).as_deref(), Some("1.2.0"));
    }

    #[test]
    fn test_parent_and_dependency_versions_are_skipped() {
        let pom = r#"<project>
  <parent>
    <groupId>com.example</groupId>
    <artifactId>parent</artifactId>
    <version>9.9.9</version>
  </parent>
  <!-- <version>0.0.1</version> -->
  <dependencies>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
      <version>4.13.2</version>
    </dependency>
  </dependencies>
  <artifactId>app</artifactId>
  <version>
    2.3.0-SNAPSHOT
  </version>
</project>"#;
        assert_eq!(project_version(pom).as_deref(), Some("2.3.0-SNAPSHOT"));
    }

    #[test]
    fn test_inherited_version_from_parent() {
        let pom = r#"<project>
  <parent>
    <artifactId>parent</artifactId>
    <version>4.0.0</version>
  </parent>
  <artifactId>child</artifactId>
  <build><plugins><plugin><version>3.1</version></plugin></plugins></build>
</project>"#;
        assert_eq!(project_version(pom).as_deref(), Some("4.0.0"));
    }

    #[test]
    fn test_every_nested_section_pattern_compiles() {
        assert_eq!(nested_sections().len(), NESTED_SECTIONS.len());
        let profiles = "<profiles id=\"x\">\n<version>1</version>\n</profiles>";
        assert!(nested_sections()[0].is_match(profiles));
    }

    #[test]
    fn test_no_version() {
        assert_eq!(project_version("<project><artifactId>x</artifactId></project>"), None);
    }

    #[test]
    fn test_pom_file_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SIMPLE_POM.as_bytes()).unwrap();
        file.flush().unwrap();

        let pom = PomFile::new(file.path());
        assert_eq!(pom.current_version().unwrap(), "1.2.0");
    }

    #[test]
    fn test_missing_pom_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let pom = PomFile::in_dir(dir.path());

        let err = pom.current_version().unwrap_err();
        assert!(matches!(err, FinishError::Io(_)));
        assert!(err.to_string().contains("pom.xml"));
    }
}
