use std::path::PathBuf;

use prism_core::{Color, ContentPaths};
use prism_gpu::SampleCount;

/// What gets drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// An OBJ file under `Content/Models/`.
    Obj(String),
    /// The built-in textured cube.
    Cube,
}

/// Window, device and scene settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    pub vsync: bool,
    pub sample_count: SampleCount,
    pub clear_color: Color,
    /// Directory containing `Content/`. `None` looks next to the executable,
    /// then in the working directory.
    pub content_root: Option<PathBuf>,
    pub model: ModelSource,
    /// File under `Content/Images/`.
    pub texture: String,
    pub vertex_shader: String,
    pub fragment_shader: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Prism Viewer".to_string(),
            width: 800,
            height: 600,
            resizable: true,
            vsync: true,
            sample_count: SampleCount::X4,
            clear_color: Color::CHARCOAL,
            content_root: None,
            model: ModelSource::Obj("viking_room.obj".to_string()),
            texture: "viking_room.png".to_string(),
            vertex_shader: "TexturedQuadWithMatrix.vert".to_string(),
            fragment_shader: "TexturedQuad.frag".to_string(),
        }
    }
}

impl AppConfig {
    pub fn content_paths(&self) -> ContentPaths {
        match &self.content_root {
            Some(root) => ContentPaths::new(root),
            None => ContentPaths::from_exe_dir(),
        }
    }
}

/// Entry point. Configure with the `with_*` methods, then [`App::run`].
#[derive(Debug, Clone, Default)]
pub struct App {
    config: AppConfig,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.config.title = title.to_string();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.config.resizable = resizable;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.config.vsync = vsync;
        self
    }

    pub fn with_sample_count(mut self, sample_count: SampleCount) -> Self {
        self.config.sample_count = sample_count;
        self
    }

    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.config.clear_color = color;
        self
    }

    pub fn with_content_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.content_root = Some(root.into());
        self
    }

    pub fn with_model(mut self, model: ModelSource) -> Self {
        self.config.model = model;
        self
    }

    pub fn with_texture(mut self, file_name: &str) -> Self {
        self.config.texture = file_name.to_string();
        self
    }

    pub fn with_shaders(mut self, vertex: &str, fragment: &str) -> Self {
        self.config.vertex_shader = vertex.to_string();
        self.config.fragment_shader = fragment.to_string();
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Opens the window and runs until it is closed or a fatal error occurs.
    pub fn run(self) -> anyhow::Result<()> {
        crate::runner::run(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.sample_count, SampleCount::X4);
        assert!(config.resizable && config.vsync);
        assert_eq!(config.model, ModelSource::Obj("viking_room.obj".into()));
        assert_eq!(config.texture, "viking_room.png");
    }

    #[test]
    fn builder_overrides() {
        let app = App::new()
            .with_title("Cube")
            .with_size(1024, 768)
            .with_model(ModelSource::Cube)
            .with_texture("checker.png")
            .with_content_root("/data");
        let config = app.config();
        assert_eq!(config.title, "Cube");
        assert_eq!((config.width, config.height), (1024, 768));
        assert_eq!(config.model, ModelSource::Cube);
        assert_eq!(config.content_paths().root(), std::path::Path::new("/data"));
    }
}
