use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use squad::history::ChatExport;

/// Print a saved session as JSON or as a plain-text transcript, or write it
/// to `output` when given
pub async fn execute(file: PathBuf, text: bool, output: Option<PathBuf>) -> Result<()> {
    let rendered = render(&file, text)?;
    match output {
        Some(path) => {
            fs::write(&path, rendered)?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

fn render(file: &Path, text: bool) -> Result<String> {
    let export = ChatExport::load(file)?;
    if text {
        Ok(export.to_text())
    } else {
        export.to_json()
    }
}
