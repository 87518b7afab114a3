
//! Small utilities which do not belong in any specific module

pub mod loading {
    use std::fs;
    use std::io;
    use std::path::Path;
    use std::time::SystemTime;

    /// Checks if the given file has been modified since the given time.
    pub fn modified_since(path: &Path, last_time: SystemTime) -> io::Result<bool> {
        let metadata = fs::metadata(path)?;
        let modified = metadata.modified()?;

        // duration_since errors if the modification happened before last_time
        Ok(modified.duration_since(last_time).is_ok())
    }
}
