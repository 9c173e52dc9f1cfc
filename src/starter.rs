use std::{fs, path::Path};

use tracing::{debug, warn};

use crate::{
    error::{LinkerError, Result},
    types::{SourceExtension, StarterBundle},
    util::sorted_entries,
};

/// Concatenates every `.cpp`/`.h` file in `starter_dir`, sorted by name. The
/// same names are what gets pulled out of each submission.
pub fn build_starter_bundle(starter_dir: &Path) -> Result<StarterBundle> {
    if !starter_dir.is_dir() {
        return Err(LinkerError::configuration(format!(
            "starter directory {:?} does not exist",
            starter_dir
        )));
    }

    let mut sources = Vec::new();
    for path in sorted_entries(starter_dir).map_err(|e| LinkerError::io(starter_dir, e))? {
        if !path.is_file() || SourceExtension::of(&path).is_none() {
            continue;
        }
        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => {
                let name = name.to_string();
                sources.push((path, name));
            }
            None => warn!("Skipping starter file {:?}: name is not valid UTF-8", path),
        }
    }

    if sources.is_empty() {
        return Err(LinkerError::configuration(format!(
            "no .{} nor .{} files found in {:?}",
            SourceExtension::Cpp,
            SourceExtension::H,
            starter_dir
        )));
    }

    let mut bundle = StarterBundle::default();
    for (path, name) in sources {
        let bytes = fs::read(&path).map_err(|e| LinkerError::io(&path, e))?;
        let contents = String::from_utf8_lossy(&bytes);
        debug!("Starter file {} ({} bytes)", name, contents.len());
        bundle
            .text
            .push_str(&format!("/* ----- {} | STARTER CODE ----- */\n\n", name));
        bundle.text.push_str(&contents);
        bundle.designated.push(name);
    }

    Ok(bundle)
}
