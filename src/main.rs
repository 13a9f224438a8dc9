//! Headless pocket list: loads a prediction and logs its pockets.

use std::path::Path;

use pocketview::engine::HeadlessEngine;
use pocketview::options::Options;
use pocketview::prediction::{
    FilePredictionLoader, PredictionId, PredictionLoader,
};
use pocketview::sync::PocketSync;

const USAGE: &str = "Usage: pocketview <prediction-dir or server URL> \
                     <database> <id> [--only N] [--options FILE]";

struct Args {
    source: String,
    id: PredictionId,
    only: Option<usize>,
    options: Option<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut only = None;
    let mut options = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--only" => {
                let value = args.next().ok_or("--only needs a pocket number")?;
                let number: usize = value
                    .parse()
                    .map_err(|_| format!("not a pocket number: {value}"))?;
                only = Some(number.saturating_sub(1));
            }
            "--options" => {
                options = Some(args.next().ok_or("--options needs a file")?);
            }
            _ => positional.push(arg),
        }
    }
    let [source, database, id] = <[String; 3]>::try_from(positional)
        .map_err(|_| USAGE.to_owned())?;
    Ok(Args {
        source,
        id: PredictionId::new(database, id),
        only,
        options,
    })
}

fn loader_for(source: &str) -> Result<Box<dyn PredictionLoader>, String> {
    if source.starts_with("http://") || source.starts_with("https://") {
        #[cfg(feature = "http")]
        return Ok(Box::new(pocketview::prediction::HttpPredictionLoader::new(
            source,
        )));
        #[cfg(not(feature = "http"))]
        return Err(format!(
            "{source}: built without the `http` feature, use a local directory"
        ));
    }
    if !Path::new(source).is_dir() {
        return Err(format!("Prediction directory not found: {source}"));
    }
    Ok(Box::new(FilePredictionLoader::new(source)))
}

fn run(args: Args) -> Result<(), String> {
    let options = match &args.options {
        Some(path) => Options::load(Path::new(path)).map_err(|e| e.to_string())?,
        None => Options::default(),
    };
    let mut loader = loader_for(&args.source)?;

    let mut sync = PocketSync::new(HeadlessEngine::new(), options);
    let _ = sync
        .load_structure(loader.as_mut(), args.id)
        .map_err(|e| e.to_string())?;
    if let Some(index) = args.only {
        sync.show_only_pocket(index).map_err(|e| e.to_string())?;
    }

    let predicted = sync.is_predicted();
    for pocket in sync.pockets() {
        let details = &pocket.pocket;
        if predicted {
            log::info!(
                "{:>3} {:<12} {:<7} score {:>7.2} conservation {:>6} pLDDT {:>7}",
                details.rank,
                details.name,
                if pocket.is_visible { "shown" } else { "hidden" },
                details.score,
                pocket.conservation_score,
                pocket.plddt_score,
            );
        } else {
            log::info!(
                "{:>3} {:<12} {:<7} score {:>7.2} conservation {:>6}",
                details.rank,
                details.name,
                if pocket.is_visible { "shown" } else { "hidden" },
                details.score,
                pocket.conservation_score,
            );
        }
    }
    sync.mark_rendered();
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
