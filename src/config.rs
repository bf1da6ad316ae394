use serde::{Deserialize, Serialize};

use crate::CLI;

pub const SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";

// Owner id of Spotify's own editorial playlists; those get filtered out
// because the whole point is surfacing user-curated playlists.
pub const CURATOR_OWNER_ID: &str = "spotify";

// Genre seeds used whenever the account has no taste signals (or the
// seeded recommendation request comes back unsatisfiable). Fixed order
// so fallback runs are deterministic.
pub const FALLBACK_GENRES: &[&str] = &["pop", "rock", "hip-hop", "electronic", "indie"];

pub const REQUEST_TIMEOUT_SECS: u64 = 10;

// Page size when pulling top artists/tracks; only the rank-1 entries
// become seeds but a few extra help debugging.
pub const TOP_SIGNAL_LIMIT: u32 = 10;

pub const RECOMMENDATION_LIMIT: u32 = 20;
pub const SEARCH_RESULT_LIMIT: u32 = 5;

pub const DEFAULT_FANOUT_CAP: usize = 5;
pub const DEFAULT_MIN_PLAYLIST_TRACKS: u32 = 20;

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub market: Option<String>,
    pub api_base_url: String,
    // How many recommended tracks get a playlist search issued for them.
    // Cost/latency control, not a correctness knob.
    pub fanout_cap: usize,
    pub min_playlist_tracks: u32,
    pub recommendation_limit: u32,
    pub search_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: "".to_string(),
            market: None,
            api_base_url: SPOTIFY_API_URL.to_string(),
            fanout_cap: DEFAULT_FANOUT_CAP,
            min_playlist_tracks: DEFAULT_MIN_PLAYLIST_TRACKS,
            recommendation_limit: RECOMMENDATION_LIMIT,
            search_limit: SEARCH_RESULT_LIMIT,
        }
    }
}

pub fn setup_cli(cli: &CLI) -> Config {
    Config {
        token: cli.spotify_token.clone(),
        market: cli.market.clone(),
        api_base_url: SPOTIFY_API_URL.to_string(),
        fanout_cap: cli.fanout_cap,
        min_playlist_tracks: cli.min_playlist_tracks,
        recommendation_limit: RECOMMENDATION_LIMIT,
        search_limit: SEARCH_RESULT_LIMIT,
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Artist {
    pub id: String,
    pub name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artists: Vec<Artist>,
}

impl Track {
    // Spotify lists artists in credit order; the first one is the
    // primary artist.
    pub fn primary_artist_name(&self) -> Option<&str> {
        self.artists.first().map(|a| a.name.as_str())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub owner_display_name: String,
    pub track_count: u32,
    pub image_url: Option<String>,
    pub external_url: String,
}
