use anyhow::Context;
use dae_import::{ImportSettings, load_collada_animation, load_collada_model};
use serde::Serialize;

const USAGE: &str = "usage: dae-import <file.dae> [--animation] [--json] | dae-import --save-settings";

struct Args {
    path: Option<String>,
    animation: bool,
    json: bool,
    save_settings: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut path = None;
    let mut animation = false;
    let mut json = false;
    let mut save_settings = false;
    for arg in std::env::args().skip(1) {
        if arg == "--animation" {
            animation = true;
        } else if arg == "--json" {
            json = true;
        } else if arg == "--save-settings" {
            save_settings = true;
        } else if path.is_none() {
            path = Some(arg);
        } else {
            anyhow::bail!("unexpected argument '{arg}'");
        }
    }
    if path.is_none() && !save_settings {
        anyhow::bail!(USAGE);
    }
    Ok(Args {
        path,
        animation,
        json,
        save_settings,
    })
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = parse_args()?;
    let settings = ImportSettings::load();

    if args.save_settings {
        let saved = settings.save().context("failed to save import settings")?;
        println!("Settings written to {}", saved.display());
    }
    let Some(path) = args.path else {
        return Ok(());
    };

    if args.animation {
        let anim = load_collada_animation(&path, &settings)
            .with_context(|| format!("failed to load animation '{path}'"))?;
        if args.json {
            return print_json(&anim);
        }
        println!("Duration: {}s", anim.length_seconds);
        println!("Keyframes: {}", anim.key_frames.len());
        if let Some(first) = anim.key_frames.first() {
            println!("Animated joints: {}", first.joint_transforms.len());
        }
    } else {
        let model = load_collada_model(&path, &settings)
            .with_context(|| format!("failed to load model '{path}'"))?;
        if args.json {
            return print_json(&model);
        }
        println!("Vertices: {}", model.mesh.vertex_count());
        println!("Indices: {}", model.mesh.indices.len());
        println!("Furthest point: {}", model.mesh.furthest_point);
        println!("Joints: {}", model.skeleton.joint_count);
        println!("Root joint: {}", model.skeleton.head_joint.name_id);
    }

    Ok(())
}
