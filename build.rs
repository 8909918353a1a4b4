use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;
use std::path::PathBuf;

fn main() -> Result<()> {
    // Rerun when the scene textures change.
    println!("cargo:rerun-if-changed=assets/textures");

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets_src = manifest_dir.join("assets");

    // Without bundled assets the default root points at the source tree so a
    // checkout that adds textures later still finds them.
    let asset_root = if assets_src.exists() {
        let mut copy_options = CopyOptions::new();
        copy_options.overwrite = true;
        copy_items(&[assets_src.as_path()], &out_dir, &copy_options)?;
        out_dir.join("assets")
    } else {
        assets_src
    };
    println!("cargo:rustc-env=SCENE_ASSET_DIR={}", asset_root.display());

    Ok(())
}
