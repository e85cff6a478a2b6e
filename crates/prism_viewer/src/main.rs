//! Spinning textured mesh.
//!
//! Renders `Content/Models/viking_room.obj` with `viking_room.png` when both
//! are present, otherwise the built-in cube with `checker.png`.
use std::path::PathBuf;
use std::process::ExitCode;

use prism_app::{App, ContentPaths, ModelSource};

/// Content shipped with the crate, used when nothing sits next to the binary.
fn content_root() -> PathBuf {
    let beside_exe = ContentPaths::from_exe_dir();
    if beside_exe.content_dir().is_dir() {
        beside_exe.root().to_path_buf()
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    }
}

fn run() -> anyhow::Result<()> {
    let root = content_root();
    let paths = ContentPaths::new(&root);
    let mut app = App::new().with_content_root(root);

    let (model, texture) = (paths.model("viking_room.obj"), paths.image("viking_room.png"));
    if !(model.is_file() && texture.is_file()) {
        log::info!("viking_room assets not found, showing the cube");
        app = app.with_model(ModelSource::Cube).with_texture("checker.png");
    }
    app.run()
}

fn main() -> ExitCode {
    if let Err(err) = prism_app::logging::init() {
        eprintln!("logger not installed: {err}");
    }
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("fatal: {err:#}");
            ExitCode::FAILURE
        }
    }
}
