//! Export destinations

use std::path::PathBuf;

/// Receives the encoded container and its suggested file name
pub trait ExportSink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> std::io::Result<()>;
}

/// Writes exports into a directory, creating it if needed
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Where `file_name` will be written
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }
}

impl ExportSink for DirectorySink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(file_name);
        std::fs::write(&path, bytes)?;
        log::info!("DirectorySink: wrote {} bytes to {:?}", bytes.len(), path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_sink_creates_dir_and_writes() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path().join("out"));

        sink.deliver("merged_audio.wav", b"RIFF").unwrap();

        let written = std::fs::read(dir.path().join("out").join("merged_audio.wav")).unwrap();
        assert_eq!(written, b"RIFF");
    }
}
