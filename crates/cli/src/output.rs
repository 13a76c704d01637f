//! Atomic artifact writes: stage to `<name>.tmp`, rename once every
//! artifact is staged.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::CliError;

/// A fully written temp file waiting to replace its target.
///
/// Dropping it without `commit` removes the temp file.
pub struct Staged {
    tmp: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl Staged {
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Move the temp file over the target.
    pub fn commit(mut self) -> Result<PathBuf, CliError> {
        std::fs::rename(&self.tmp, &self.target).map_err(|e| {
            CliError::output(format!("failed to rename to {}: {e}", self.target.display()))
        })?;
        self.committed = true;
        Ok(self.target.clone())
    }
}

impl Drop for Staged {
    fn drop(&mut self) {
        if !self.committed {
            let _ = std::fs::remove_file(&self.tmp);
        }
    }
}

/// `families.json` -> `families.json.tmp`, next to the target.
pub fn tmp_path(target: &Path) -> Result<PathBuf, CliError> {
    let name = target
        .file_name()
        .ok_or_else(|| CliError::output(format!("invalid output path: {}", target.display())))?;
    let mut tmp_name = name.to_os_string();
    tmp_name.push(".tmp");
    Ok(target.with_file_name(tmp_name))
}

/// Write `target`'s content to its temp file and sync it.
pub fn stage<F>(target: &Path, write: F) -> Result<Staged, CliError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), String>,
{
    let tmp = tmp_path(target)?;
    let file = File::create(&tmp)
        .map_err(|e| CliError::output(format!("cannot create {}: {e}", tmp.display())))?;

    // From here on the guard cleans up the temp file on any failure
    let staged = Staged {
        tmp,
        target: target.to_path_buf(),
        committed: false,
    };

    let mut writer = BufWriter::new(file);
    write(&mut writer)
        .map_err(|e| CliError::output(format!("cannot write {}: {e}", target.display())))?;
    let file = writer
        .into_inner()
        .map_err(|e| CliError::output(format!("cannot write {}: {e}", target.display())))?;
    file.sync_all()
        .map_err(|e| CliError::output(format!("cannot sync {}: {e}", target.display())))?;

    Ok(staged)
}

/// Commit every staged artifact, in order.
pub fn commit_all(staged: Vec<Staged>) -> Result<Vec<PathBuf>, CliError> {
    staged.into_iter().map(Staged::commit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn tmp_path_appends_suffix() {
        let tmp = tmp_path(Path::new("out/families.json")).unwrap();
        assert_eq!(tmp, PathBuf::from("out/families.json.tmp"));
    }

    #[test]
    fn tmp_path_rejects_directory_like_paths() {
        assert!(tmp_path(Path::new("..")).is_err());
    }

    #[test]
    fn commit_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("rows.csv");
        std::fs::write(&target, "old").unwrap();

        let staged = stage(&target, |w| w.write_all(b"new").map_err(|e| e.to_string())).unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "old");
        staged.commit().unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new");
        assert!(!dir.path().join("rows.csv.tmp").exists());
    }

    #[test]
    fn dropped_stage_leaves_target_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("rows.json");
        std::fs::write(&target, "[]").unwrap();

        let staged = stage(&target, |w| w.write_all(b"[[1]]").map_err(|e| e.to_string())).unwrap();
        drop(staged);

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "[]");
        assert!(!dir.path().join("rows.json.tmp").exists());
    }

    #[test]
    fn failed_write_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("rows.json");
        let err = stage(&target, |_| Err("disk full".to_string())).err().unwrap();
        assert!(err.message.contains("disk full"));
        assert!(!dir.path().join("rows.json.tmp").exists());
        assert!(!target.exists());
    }

    #[test]
    fn missing_directory_is_an_output_error() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing/rows.json");
        let err = stage(&target, |_| Ok(())).err().unwrap();
        assert_eq!(err.code, crate::exit_codes::EXIT_OUTPUT_WRITE);
    }
}
