#![forbid(unsafe_code)]

//! `cform` binary entry point.

use std::env;
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::process;
use std::sync::Mutex;

use cform_contact::ContactFormApp;
use cform_contact::cli;
use cform_runtime::{Program, ProgramConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

const ENV_LOG: &str = "CFORM_LOG";
const ENV_LOG_FILE: &str = "CFORM_LOG_FILE";
const ENV_LOG_JSON: &str = "CFORM_LOG_JSON";

/// Route logs to a file; the terminal belongs to the UI.
fn init_logging() -> io::Result<PathBuf> {
    let path = env::var_os(ENV_LOG_FILE)
        .map(PathBuf::from)
        .unwrap_or_else(|| env::temp_dir().join("cform.log"));
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false);
    if env::var_os(ENV_LOG_JSON).is_some() {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
    Ok(path)
}

fn main() {
    let opts = cli::Opts::parse();

    if let Err(e) = init_logging() {
        eprintln!("Logging disabled: {e}");
    }

    let config = match opts.to_config(|key| env::var(key).ok()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };
    info!(?config, mouse = opts.mouse, "starting");

    let program_config = ProgramConfig::default().with_mouse(opts.mouse);
    let mut program = Program::with_config(ContactFormApp::new(config), program_config);
    if let Err(e) = program.run() {
        eprintln!("Runtime error: {e}");
        process::exit(1);
    }

    if opts.print_json
        && let Some(submission) = program.model().submitted()
    {
        match serde_json::to_string_pretty(submission) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Cannot encode submission: {e}");
                process::exit(1);
            }
        }
    }
}
