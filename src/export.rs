use std::{
    fs,
    path::{Path, PathBuf}
};

use crate::error::SigError;

/// Default file name for a downloaded signature.
pub const SIGNATURE_FILE_NAME: &str = "signature.png";

/// Destination for an exported PNG. Browser builds click a download link,
/// desktop builds write a file.
pub trait SaveTarget {
    fn save(&mut self, file_name: &str, png: &[u8]) -> Result<(), SigError>;
}

/// Writes exports into a directory on disk.
#[derive(Clone, Debug)]
pub struct FileSaver {
    dir: PathBuf
}

impl FileSaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SaveTarget for FileSaver {
    fn save(&mut self, file_name: &str, png: &[u8]) -> Result<(), SigError> {
        let path = self.dir.join(file_name);
        fs::write(&path, png)?;
        log::debug!("saved signature to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_saver_writes_into_dir() {
        let dir = std::env::temp_dir().join(format!("sigcap-export-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let mut saver = FileSaver::new(&dir);
        saver.save(SIGNATURE_FILE_NAME, b"png-bytes").unwrap();
        assert_eq!(fs::read(dir.join("signature.png")).unwrap(), b"png-bytes");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn file_saver_reports_missing_dir() {
        let mut saver = FileSaver::new("/nonexistent/sigcap/dir");
        assert!(matches!(
            saver.save(SIGNATURE_FILE_NAME, b"x"),
            Err(SigError::Io(_))
        ));
    }
}
