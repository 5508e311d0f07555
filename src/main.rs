use clap::Parser;

use img2ascii::cli::{self, Args, Command};

/// Load `.env` and start the logger before anything else.
fn init_env() {
    // dotenv::dotenv() returns Err if .env doesn't exist, which is fine
    let _ = dotenv::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}

fn main() {
    init_env();

    let args = Args::parse();
    let config_path = args.config.as_deref();

    let result = match &args.command {
        Command::Convert(convert) => cli::run_convert(convert, config_path),
        Command::Config { action } => cli::handle_config_action(action, config_path),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
