use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pixpet_art::{build_render_data, CanvasSize, CreatureRender, RenderRequest};
use serde::Serialize;

mod config;
mod creature_file;

use config::{OutputFormat, PixpetConfig};
use creature_file::CreatureFile;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Creature description file (RON)
    #[arg(long)]
    creature: Option<PathBuf>,

    /// Seed string; overrides the file
    #[arg(long)]
    seed: Option<String>,

    /// Growth progress, 0.0-1.0; overrides the file
    #[arg(long)]
    progress: Option<f64>,

    /// Canvas width in cells
    #[arg(long)]
    width: Option<usize>,

    /// Canvas height in text rows (two pixel rows each)
    #[arg(long)]
    text_height: Option<usize>,

    /// Idle frames to generate after the base frame
    #[arg(long)]
    frames: Option<usize>,

    /// Print the render-data export as JSON instead of frames
    #[arg(long)]
    export: bool,

    /// Config file to use instead of ./pixpet.ron
    #[arg(long)]
    config: Option<PathBuf>,
}

/// JSON shape of `output.format = json`
#[derive(Serialize)]
struct FramesOutput<'a> {
    seed: &'a str,
    archetype: String,
    subtype: String,
    limb_stage: u8,
    palette: [String; 10],
    item: Option<String>,
    frames: Vec<Vec<String>>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => PixpetConfig::load_from(path)?,
        None => PixpetConfig::load()?,
    };

    let mut creature = match &args.creature {
        Some(path) => CreatureFile::load(path)?,
        None => CreatureFile::bare("pixpet"),
    };
    if let Some(seed) = &args.seed {
        creature.seed = seed.clone();
    }
    if let Some(progress) = args.progress {
        creature.progress = progress;
    }

    log::info!(
        "Rendering creature '{}' at progress {:.2}",
        creature.seed,
        creature.progress
    );

    if args.export {
        let data = build_render_data(&creature.seed, &creature.inputs(), creature.progress);
        let json = serde_json::to_string_pretty(&data).context("Failed to encode render data")?;
        println!("{}", json);
        return Ok(());
    }

    let size = CanvasSize::new(
        args.width.unwrap_or(config.canvas.width),
        args.text_height.unwrap_or(config.canvas.text_height),
    );
    let mut request = RenderRequest::new(creature.seed.clone(), creature.progress, creature.inputs())
        .with_size(size)
        .with_frames(args.frames.unwrap_or(config.animation.frames));
    if let Some(item) = creature.item_request() {
        request = request.with_item(item);
    }

    let render = request.render().context("Invalid creature inputs")?;

    match config.output.format {
        OutputFormat::Sprite => print_sprites(&render),
        OutputFormat::Json => {
            let output = FramesOutput {
                seed: &creature.seed,
                archetype: render.archetype.to_string(),
                subtype: render.subtype.to_string(),
                limb_stage: render.body.limb_stage.value(),
                palette: render.body.palette.to_hex_array(),
                item: render.body.item.as_ref().map(|item| item.family.to_string()),
                frames: render.frames.iter().map(|f| f.to_sprite_lines()).collect(),
            };
            let json = serde_json::to_string_pretty(&output).context("Failed to encode frames")?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn print_sprites(render: &CreatureRender) {
    let body = &render.body;
    println!(
        "# {} / {}, stage {}",
        render.archetype, render.subtype, body.limb_stage
    );
    println!("# palette {:?}", body.palette.colors);
    if let Some(item) = &body.item {
        println!("# item {} ({:?})", item.family, item.richness);
    }
    for (i, frame) in render.frames.iter().enumerate() {
        println!("frame {}", i);
        for line in frame.to_sprite_lines() {
            println!("{}", line);
        }
    }
}
