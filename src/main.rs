use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use edrdg_json::{
    DictionaryKind, DictionaryTranscoder, EntityMode, Generation, Jmdict, Kanjidic2,
    TranscodeConfig, TranscodeError,
};
use log::error;

/// Converts JMdict and KANJIDIC2 to compressed JSON.
///
/// A dictionary is only regenerated when its output file does not exist.
#[derive(Debug, Parser)]
#[command(name = "edrdg-json", version)]
struct Args {
    /// Output path for the JMdict word list
    #[arg(long, default_value = "../public/dict/JMdict.json")]
    jmdict_out: PathBuf,

    /// Output path for the KANJIDIC2 character list
    #[arg(long, default_value = "../public/dict/kanjidic2.json")]
    kanjidic_out: PathBuf,

    /// JMdict source (overrides EDRDG_JMDICT_XML)
    #[arg(long)]
    jmdict_xml: Option<PathBuf>,

    /// KANJIDIC2 source (overrides EDRDG_KANJIDIC2_XML)
    #[arg(long)]
    kanjidic_xml: Option<PathBuf>,

    /// Indent the JSON instead of minifying it
    #[arg(long)]
    pretty: bool,

    /// scratch, opaque or expand (overrides EDRDG_ENTITY_MODE)
    #[arg(long)]
    entity_mode: Option<EntityMode>,

    /// Transcode records on a single thread
    #[arg(long)]
    sequential: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(2);
        }
    };

    let (kanjidic, jmdict) = rayon::join(
        || generate::<Kanjidic2>(&config, &args.kanjidic_out),
        || generate::<Jmdict>(&config, &args.jmdict_out),
    );

    let mut failed = false;
    for (name, result) in [(Kanjidic2::DEBUG_NAME, kanjidic), (Jmdict::DEBUG_NAME, jmdict)] {
        match result {
            Ok(Generation::Skipped) => println!("{}: output exists, skipped", name),
            Ok(Generation::Written { entries, bytes }) => {
                println!("{}: wrote {} entries ({} bytes)", name, entries, bytes)
            }
            Err(e) => {
                error!("{} conversion failed: {}", name, e);
                eprintln!("ERROR: {} conversion failed", name);
                eprintln!("  {}", e);
                failed = true;
            }
        }
    }

    if failed {
        process::exit(1);
    }
}

fn build_config(args: &Args) -> Result<TranscodeConfig, TranscodeError> {
    let mut config = TranscodeConfig::from_env()?;
    if let Some(path) = &args.jmdict_xml {
        config.jmdict_source = path.clone();
    }
    if let Some(path) = &args.kanjidic_xml {
        config.kanjidic2_source = path.clone();
    }
    if let Some(mode) = args.entity_mode {
        config.entity_mode = mode;
    }
    config.minify = !args.pretty;
    config.parallel &= !args.sequential;
    config.validate()?;
    Ok(config)
}

fn generate<K: DictionaryKind>(
    config: &TranscodeConfig,
    target: &Path,
) -> Result<Generation, TranscodeError> {
    if let Some(dir) = target.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    DictionaryTranscoder::<K>::new(config.clone()).generate_if_missing(target)
}
