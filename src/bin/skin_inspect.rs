//! skin-inspect: load a JSON scene, step its animation and print the bone
//! matrices that would be uploaded to the renderer.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use skinning_rig::{AnimatedModel, SceneData, SkinningConfig};

#[derive(Parser)]
#[command(name = "skin-inspect")]
#[command(about = "Step a skinned model's animation and dump its bone matrices", long_about = None)]
#[command(version)]
struct Cli {
    /// Scene file produced by the importer (JSON)
    scene: PathBuf,

    /// Skinning configuration (JSON); defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of frames to step
    #[arg(short, long, default_value_t = 1)]
    frames: u32,

    /// Seconds per frame
    #[arg(short, long, default_value_t = 1.0 / 60.0)]
    delta: f32,

    /// Also print per-mesh skin statistics
    #[arg(long)]
    meshes: bool,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Log filter requested on the command line, `None` to defer to `RUST_LOG`
fn verbosity_filter(verbose: u8) -> Option<log::LevelFilter> {
    match verbose {
        0 => None,
        1 => Some(log::LevelFilter::Info),
        2 => Some(log::LevelFilter::Debug),
        _ => Some(log::LevelFilter::Trace),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = verbosity_filter(cli.verbose) {
        logger.filter_level(level);
    }
    logger.init();

    let config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            SkinningConfig::from_json(&json)
                .with_context(|| format!("Failed to parse config {}", path.display()))?
        }
        None => SkinningConfig::default(),
    };

    let scene = SceneData::from_json_file(&cli.scene)
        .with_context(|| format!("Failed to load scene {}", cli.scene.display()))?;
    let mut model = AnimatedModel::load(&scene, config).context("Failed to build model")?;

    println!(
        "{} bones, {} meshes, {} clips",
        model.registry().bone_count(),
        model.meshes().len(),
        model.library().len()
    );
    for (i, name) in model.library().names().enumerate() {
        println!("  clip {}: {}", i, name);
    }

    if cli.meshes {
        for mesh in model.meshes() {
            let influenced = mesh
                .skin
                .iter()
                .filter(|v| v.is_influenced(model.config().weight_epsilon))
                .count();
            println!(
                "  mesh '{}': {} vertices ({} skinned), {} indices, texture {}",
                mesh.name,
                mesh.vertex_count(),
                influenced,
                mesh.indices.len(),
                mesh.diffuse_texture.as_deref().unwrap_or("-")
            );
        }
    }

    for _ in 0..cli.frames {
        model.update_animation(cli.delta);
    }

    println!("tick {:.4}", model.animation_time());
    for bone in model.registry().bones() {
        let m = model.bone_transforms()[bone.id.index()];
        println!("[{}] {}", bone.id.0, bone.name);
        // Print row by row
        for row in 0..4 {
            let r = m.row(row);
            println!("    {:>10.4} {:>10.4} {:>10.4} {:>10.4}", r.x, r.y, r.z, r.w);
        }
    }

    model
        .bone_uniforms()
        .context("Skeleton does not fit the bone uniform array")?;

    Ok(())
}
