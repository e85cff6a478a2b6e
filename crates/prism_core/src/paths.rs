//! On-disk content layout.
//!
//! ```text
//! <root>/Content/Images/*
//! <root>/Content/Models/*
//! <root>/Content/Shaders/Compiled/<FORMAT>/<name>.<ext>
//! ```
//!
//! A `ContentPaths` is built once at startup and handed to every loader, so
//! no loader reads a process-wide base path.

use std::path::{Path, PathBuf};

const CONTENT_DIR: &str = "Content";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPaths {
    root: PathBuf,
}

impl ContentPaths {
    /// Uses `root` as the directory that contains `Content/`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory of the running executable when it ships a `Content/`
    /// folder, otherwise the current working directory.
    pub fn from_exe_dir() -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));

        match exe_dir {
            Some(dir) if dir.join(CONTENT_DIR).is_dir() => Self::new(dir),
            _ => {
                let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
                log::debug!(
                    "no {CONTENT_DIR}/ next to the executable, using {}",
                    cwd.display()
                );
                Self::new(cwd)
            }
        }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn content_dir(&self) -> PathBuf {
        self.root.join(CONTENT_DIR)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.content_dir().join("Images")
    }

    pub fn models_dir(&self) -> PathBuf {
        self.content_dir().join("Models")
    }

    pub fn compiled_shaders_dir(&self) -> PathBuf {
        self.content_dir().join("Shaders").join("Compiled")
    }

    pub fn image(&self, file_name: &str) -> PathBuf {
        self.images_dir().join(file_name)
    }

    pub fn model(&self, file_name: &str) -> PathBuf {
        self.models_dir().join(file_name)
    }

    /// `Content/Shaders/Compiled/<format_dir>/<file_name>`.
    pub fn compiled_shader(&self, format_dir: &str, file_name: &str) -> PathBuf {
        self.compiled_shaders_dir().join(format_dir).join(file_name)
    }
}

impl Default for ContentPaths {
    fn default() -> Self {
        Self::from_exe_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_under_root() {
        let paths = ContentPaths::new("/opt/prism");
        assert_eq!(paths.image("a.png"), Path::new("/opt/prism/Content/Images/a.png"));
        assert_eq!(
            paths.model("viking_room.obj"),
            Path::new("/opt/prism/Content/Models/viking_room.obj")
        );
        assert_eq!(
            paths.compiled_shader("SPIRV", "Foo.vert.spv"),
            Path::new("/opt/prism/Content/Shaders/Compiled/SPIRV/Foo.vert.spv")
        );
    }

    #[test]
    fn exe_dir_falls_back_to_cwd() {
        // test binaries live in target/…/deps, which has no Content/ folder
        let paths = ContentPaths::from_exe_dir();
        assert_eq!(paths.root(), std::env::current_dir().unwrap());
    }
}
