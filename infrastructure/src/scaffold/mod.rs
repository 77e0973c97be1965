//! Filesystem scaffold writer.
//!
//! Materializes a parsed scaffold plan under
//! `<projects_dir>/<conversation_id>/`, creating parent directories as
//! needed. Plan paths are provider-generated text and must stay inside the
//! project directory: absolute paths and `..` components are rejected.

use async_trait::async_trait;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tandem_application::ports::scaffold_writer::{ScaffoldWriteError, ScaffoldWriter};
use tandem_domain::{ConversationId, ScaffoldPlan};
use tracing::info;

/// Writes scaffold plans to the local filesystem
pub struct FsScaffoldWriter {
    projects_dir: PathBuf,
}

impl FsScaffoldWriter {
    pub fn new(projects_dir: impl Into<PathBuf>) -> Self {
        Self {
            projects_dir: projects_dir.into(),
        }
    }
}

/// Reject absolute paths and any path escaping the project directory
fn sanitize(raw: &str) -> Result<PathBuf, ScaffoldWriteError> {
    let path = Path::new(raw);
    if path.as_os_str().is_empty() || path.is_absolute() {
        return Err(ScaffoldWriteError::UnsafePath(raw.to_string()));
    }
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => return Err(ScaffoldWriteError::UnsafePath(raw.to_string())),
        }
    }
    Ok(path.to_path_buf())
}

#[async_trait]
impl ScaffoldWriter for FsScaffoldWriter {
    async fn write(
        &self,
        id: &ConversationId,
        plan: &ScaffoldPlan,
    ) -> Result<Vec<PathBuf>, ScaffoldWriteError> {
        let project_dir = self.projects_dir.join(id.as_str());

        // Validate the whole plan before touching the disk
        let mut relative_paths = Vec::with_capacity(plan.files.len());
        for file in &plan.files {
            relative_paths.push(sanitize(&file.path)?);
        }

        let mut written = Vec::with_capacity(plan.files.len());
        for (file, relative) in plan.files.iter().zip(relative_paths) {
            let target = project_dir.join(&relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| ScaffoldWriteError::Io(e.to_string()))?;
            }
            fs::write(&target, &file.content).map_err(|e| ScaffoldWriteError::Io(e.to_string()))?;
            written.push(target);
        }

        info!("Scaffold wrote {} files under {}", written.len(), project_dir.display());
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_domain::ScaffoldFile;

    fn plan(paths: &[(&str, &str)]) -> ScaffoldPlan {
        ScaffoldPlan {
            files: paths
                .iter()
                .map(|(path, content)| ScaffoldFile {
                    path: path.to_string(),
                    content: content.to_string(),
                })
                .collect(),
        }
    }

    fn conversation_id() -> ConversationId {
        "scaffold-test".parse().unwrap()
    }

    #[tokio::test]
    async fn writes_nested_files_under_the_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FsScaffoldWriter::new(dir.path());

        let written = writer
            .write(
                &conversation_id(),
                &plan(&[("src/index.js", "console.log('hi')"), ("README.md", "# App")]),
            )
            .await
            .unwrap();

        assert_eq!(written.len(), 2);
        let index = dir.path().join("scaffold-test/src/index.js");
        assert_eq!(fs::read_to_string(&index).unwrap(), "console.log('hi')");
        assert_eq!(written[0], index);
    }

    #[tokio::test]
    async fn rejects_parent_dir_escapes() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FsScaffoldWriter::new(dir.path());

        let err = writer
            .write(&conversation_id(), &plan(&[("../evil.txt", "pwned")]))
            .await
            .unwrap_err();

        assert!(matches!(err, ScaffoldWriteError::UnsafePath(_)));
        assert!(!dir.path().join("evil.txt").exists());
    }

    #[tokio::test]
    async fn rejects_absolute_paths_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FsScaffoldWriter::new(dir.path());

        // A bad entry anywhere in the plan aborts before any write
        let err = writer
            .write(
                &conversation_id(),
                &plan(&[("ok.txt", "fine"), ("/etc/hosts", "nope")]),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ScaffoldWriteError::UnsafePath(_)));
        assert!(!dir.path().join("scaffold-test/ok.txt").exists());
    }
}
