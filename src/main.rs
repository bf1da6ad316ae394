mod config;
mod discovery;
mod display;
mod error;
mod session;

extern crate prettytable;
extern crate term;

use crate::discovery::Pipeline;
use crate::error::AppError;
use crate::session::Session;
use clap::Parser;
use log::{debug, error, info};
use std::env;

#[derive(Parser, Debug)]
pub struct CLI {
    /// Enable debug output
    #[arg(short, long, env = "MIXPAL_DEBUG")]
    pub debug: bool,

    /// Spotify bearer token obtained via the implicit-grant flow
    #[arg(long, env = "MIXPAL_SPOTIFY_TOKEN", default_value = "")]
    pub spotify_token: String,

    /// Optional market/region filter for recommendations (e.g. US)
    #[arg(long, env = "MIXPAL_MARKET")]
    pub market: Option<String>,

    /// How many recommended tracks to search playlists for
    #[arg(long, env = "MIXPAL_FANOUT_CAP", default_value_t = config::DEFAULT_FANOUT_CAP)]
    pub fanout_cap: usize,

    /// Minimum track count for a playlist to make the cut
    #[arg(long, env = "MIXPAL_MIN_PLAYLIST_TRACKS", default_value_t = config::DEFAULT_MIN_PLAYLIST_TRACKS)]
    pub min_playlist_tracks: u32,
}

#[tokio::main]
async fn main() {
    let cli = setup();

    let app_config = config::setup_cli(&cli);

    debug!("Config: {:?}", app_config);

    let mut session = Session::new(app_config.token.clone());
    let mut pipeline = Pipeline::new(app_config);

    info!("Starting playlist discovery...");

    let playlists = match pipeline.run(&mut session).await {
        Ok(playlists) => playlists,
        Err(AppError::Unauthorized) => {
            // Credential was already cleared by the pipeline
            fatal_error(
                "Spotify rejected the access token - please re-authenticate and try again"
                    .to_string(),
            );
        }
        Err(e) => fatal_error(format!("Discovery failed: {} - please try again", e)),
    };

    display::display(&playlists);
}

fn setup() -> CLI {
    let cli = CLI::parse();

    if cli.debug {
        env::set_var("RUST_LOG", "mixpal=debug");
    } else {
        env::set_var("RUST_LOG", "mixpal=info");
    }

    env_logger::init();

    cli
}

fn exit(m: String) -> ! {
    info!("{}", m);
    std::process::exit(0);
}

fn fatal_error(m: String) -> ! {
    error!("{}", m);
    std::process::exit(1);
}
