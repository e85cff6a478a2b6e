//! Compiled shader lookup.
//!
//! Shaders are compiled offline, one file per stage and format:
//!
//! ```text
//! Content/Shaders/Compiled/SPIRV/<name>.spv
//! Content/Shaders/Compiled/MSL/<name>.msl
//! Content/Shaders/Compiled/DXIL/<name>.dxil
//! Content/Shaders/Compiled/WGSL/<name>.wgsl
//! ```
//!
//! The stage comes from the name (`Foo.vert`, `Foo.frag`); the format is the
//! first one in [`FORMAT_PRIORITY`] the device accepts.
use std::path::PathBuf;

use prism_core::ContentPaths;
use prism_gpu::{GpuDevice, ShaderDesc, ShaderFormat, ShaderFormats, ShaderResources, ShaderStage};

use crate::error::AssetError;

/// Format preference: directory, file extension and entry point of each.
pub const FORMAT_PRIORITY: [(ShaderFormat, &str, &str, &str); 4] = [
    (ShaderFormat::Spirv, "SPIRV", "spv", "main"),
    (ShaderFormat::Msl, "MSL", "msl", "main0"),
    (ShaderFormat::Dxil, "DXIL", "dxil", "main"),
    (ShaderFormat::Wgsl, "WGSL", "wgsl", "main"),
];

/// Where a shader lives and how to create it, decided before any IO.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedShader {
    pub stage: ShaderStage,
    pub format: ShaderFormat,
    pub path: PathBuf,
    pub entry_point: &'static str,
}

pub fn stage_from_name(name: &str) -> Result<ShaderStage, AssetError> {
    if name.contains(".vert") {
        Ok(ShaderStage::Vertex)
    } else if name.contains(".frag") {
        Ok(ShaderStage::Fragment)
    } else {
        Err(AssetError::UnrecognizedShaderStage(name.to_owned()))
    }
}

#[derive(Debug, Clone)]
pub struct ShaderLoader {
    paths: ContentPaths,
}

impl ShaderLoader {
    pub fn new(paths: ContentPaths) -> Self {
        Self { paths }
    }

    /// Picks stage, format, file and entry point for `name` on a device that
    /// accepts `formats`.
    pub fn resolve(&self, name: &str, formats: ShaderFormats) -> Result<ResolvedShader, AssetError> {
        let stage = stage_from_name(name)?;
        let (format, dir, ext, entry_point) = FORMAT_PRIORITY
            .iter()
            .copied()
            .find(|(format, ..)| formats.contains(format.flag()))
            .ok_or(AssetError::NoSupportedShaderFormat(formats))?;

        Ok(ResolvedShader {
            stage,
            format,
            path: self.paths.compiled_shader(dir, &format!("{name}.{ext}")),
            entry_point,
        })
    }

    /// Reads the compiled shader for `name` and creates it on `device` with
    /// the declared resource counts.
    pub fn load<D: GpuDevice>(
        &self,
        device: &D,
        name: &str,
        resources: ShaderResources,
    ) -> Result<D::Shader, AssetError> {
        let resolved = self.resolve(name, device.shader_formats())?;
        let code = std::fs::read(&resolved.path).map_err(|source| AssetError::Io {
            path: resolved.path.clone(),
            source,
        })?;
        log::info!(
            "Loading shader {name} as {:?} ({} bytes, entry point '{}')",
            resolved.format,
            code.len(),
            resolved.entry_point
        );

        let shader = device.create_shader(&ShaderDesc {
            label: name,
            code: &code,
            entry_point: resolved.entry_point,
            format: resolved.format,
            stage: resolved.stage,
            resources,
        })?;
        Ok(shader)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use prism_gpu::headless::{HeadlessConfig, HeadlessDevice};

    use super::*;

    fn loader() -> ShaderLoader {
        ShaderLoader::new(ContentPaths::new("/game"))
    }

    #[test]
    fn stage_comes_from_name() {
        assert_eq!(stage_from_name("TexturedQuad.frag").unwrap(), ShaderStage::Fragment);
        assert_eq!(stage_from_name("TexturedQuadWithMatrix.vert").unwrap(), ShaderStage::Vertex);
        assert!(matches!(
            stage_from_name("Compute.comp"),
            Err(AssetError::UnrecognizedShaderStage(_))
        ));
    }

    #[test]
    fn spirv_wins_when_offered() {
        let r = loader()
            .resolve("Foo.vert", ShaderFormats::SPIRV | ShaderFormats::MSL | ShaderFormats::WGSL)
            .unwrap();
        assert_eq!(r.format, ShaderFormat::Spirv);
        assert_eq!(r.path, Path::new("/game/Content/Shaders/Compiled/SPIRV/Foo.vert.spv"));
        assert_eq!(r.entry_point, "main");
    }

    #[test]
    fn msl_only_device() {
        let r = loader().resolve("Foo.vert", ShaderFormats::MSL).unwrap();
        assert_eq!(r.stage, ShaderStage::Vertex);
        assert_eq!(r.format, ShaderFormat::Msl);
        assert_eq!(r.path, Path::new("/game/Content/Shaders/Compiled/MSL/Foo.vert.msl"));
        assert_eq!(r.entry_point, "main0");
    }

    #[test]
    fn dxil_before_wgsl() {
        let r = loader()
            .resolve("Foo.frag", ShaderFormats::DXIL | ShaderFormats::WGSL)
            .unwrap();
        assert_eq!(r.format, ShaderFormat::Dxil);
        assert_eq!(r.path, Path::new("/game/Content/Shaders/Compiled/DXIL/Foo.frag.dxil"));
    }

    #[test]
    fn no_known_format() {
        assert!(matches!(
            loader().resolve("Foo.vert", ShaderFormats::empty()),
            Err(AssetError::NoSupportedShaderFormat(_))
        ));
    }

    #[test]
    fn stage_checked_before_format() {
        assert!(matches!(
            loader().resolve("Foo", ShaderFormats::empty()),
            Err(AssetError::UnrecognizedShaderStage(_))
        ));
    }

    #[test]
    fn load_reads_file_and_creates_shader() {
        let root = crate::fixtures::dir("shader_load");
        let paths = ContentPaths::new(&root);
        let file = paths.compiled_shader("MSL", "Foo.vert.msl");
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(&file, b"vertex shader bytes").unwrap();

        let device = HeadlessDevice::new(HeadlessConfig {
            shader_formats: ShaderFormats::MSL,
            ..Default::default()
        });
        let resources = ShaderResources { uniform_buffers: 1, ..Default::default() };
        let shader = ShaderLoader::new(paths).load(&device, "Foo.vert", resources).unwrap();
        assert_eq!(shader.stage(), ShaderStage::Vertex);
        assert_eq!(shader.entry_point(), "main0");
        assert_eq!(shader.resources(), resources);
    }

    #[test]
    fn missing_file_is_io_error() {
        let root = crate::fixtures::dir("shader_missing");
        let device = HeadlessDevice::default();
        let err = ShaderLoader::new(ContentPaths::new(root))
            .load(&device, "Missing.frag", ShaderResources::default())
            .unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }
}
