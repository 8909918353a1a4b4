use std::path::PathBuf;

use anyhow::{Context, anyhow};
use scene_composer::{SceneConfig, flow, milestones};

const USAGE: &str = "usage: scene-composer [milestone] [output.png]";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let milestone = args.next().unwrap_or_else(|| "7".to_string());
    if milestone == "-h" || milestone == "--help" {
        println!("{USAGE}\nmilestones: {}", milestones::MILESTONE_NAMES.join(", "));
        return Ok(());
    }
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("milestone-{milestone}.png")));

    let scene = milestones::by_name(&milestone).ok_or_else(|| {
        anyhow!(
            "unknown milestone {milestone}, expected one of {}\n{USAGE}",
            milestones::MILESTONE_NAMES.join(", ")
        )
    })?;

    let config = SceneConfig::from_env();
    log::info!("Rendering milestone {milestone} with assets from {:?}", config.asset_root);
    let img = flow::run(&config, &scene)?;
    img.save(&output)
        .with_context(|| format!("could not write {}", output.display()))?;
    log::info!("Wrote {}", output.display());
    Ok(())
}
