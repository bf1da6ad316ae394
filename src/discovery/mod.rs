pub mod seeds;
mod spotify;

use std::collections::HashSet;

use log::{debug, info, warn};

use crate::config::{Config, Playlist, Track, CURATOR_OWNER_ID};
use crate::discovery::seeds::SeedSet;
use crate::discovery::spotify::{RawPlaylist, Spotify};
use crate::session::Session;
use crate::AppError;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Stage {
    Idle,
    FetchingSignals,
    Resolving,
    Discovering,
    Done,
    Failed,
}

pub struct Pipeline {
    config: Config,
    stage: Stage,
    in_flight: bool,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Pipeline {
            config,
            stage: Stage::Idle,
            in_flight: false,
        }
    }

    // One run at a time; overlapping runs would race on the dedup set.
    pub async fn run(&mut self, session: &mut Session) -> Result<Vec<Playlist>, AppError> {
        if self.in_flight {
            return Err(AppError::GenericError(
                "a discovery run is already in flight".to_string(),
            ));
        }

        self.in_flight = true;
        self.advance(Stage::Idle);

        let result = self.run_stages(session).await;

        self.in_flight = false;

        match result {
            Ok(playlists) => {
                self.advance(Stage::Done);
                Ok(playlists)
            }
            Err(e) => {
                self.advance(Stage::Failed);
                handle_failure(session, &e);
                Err(e)
            }
        }
    }

    async fn run_stages(&mut self, session: &Session) -> Result<Vec<Playlist>, AppError> {
        // A credential has to exist before any stage runs.
        let token = session.current().ok_or(AppError::Unauthorized)?;
        let spotify = Spotify::new(&self.config, token)?;

        self.advance(Stage::FetchingSignals);

        // The two signal fetches are independent; run them together and
        // fail the stage if either fails.
        let (top_artists, top_tracks) =
            tokio::try_join!(spotify.top_artists(), spotify.top_tracks())?;

        info!(
            "Taste signals: {} top artists, {} top tracks",
            top_artists.len(),
            top_tracks.len()
        );

        self.advance(Stage::Resolving);

        let seeds = SeedSet::resolve(&top_artists, &top_tracks);
        debug_assert!(!seeds.is_empty());

        let recommended =
            fetch_recommendations(&spotify, &seeds, self.config.recommendation_limit).await?;

        if recommended.is_empty() {
            // Valid terminal outcome, not an error.
            info!("Spotify returned no recommendations for these seeds");
            return Ok(vec![]);
        }

        info!("Got {} recommended tracks", recommended.len());

        self.advance(Stage::Discovering);

        self.discover(&spotify, &recommended).await
    }

    async fn discover(
        &self,
        spotify: &Spotify,
        tracks: &[Track],
    ) -> Result<Vec<Playlist>, AppError> {
        let mut collector = PlaylistCollector::new(self.config.min_playlist_tracks);

        for track in fanout(tracks, self.config.fanout_cap) {
            let query = search_query(track);

            debug!("Searching playlists for '{}'", query);

            match spotify
                .search_playlists(&query, self.config.search_limit)
                .await
            {
                // A dead credential fails every remaining search too
                Err(AppError::Unauthorized) => return Err(AppError::Unauthorized),
                outcome => absorb_outcome(&mut collector, &query, outcome),
            }
        }

        Ok(collector.into_playlists())
    }

    fn advance(&mut self, stage: Stage) {
        debug!("Pipeline stage: {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }
}

fn handle_failure(session: &mut Session, err: &AppError) {
    if matches!(err, AppError::Unauthorized) {
        info!("Clearing stored credential - re-authentication required");
        session.clear();
    }
}

async fn fetch_recommendations(
    spotify: &Spotify,
    seeds: &SeedSet,
    limit: u32,
) -> Result<Vec<Track>, AppError> {
    match spotify.recommendations(seeds, limit).await {
        Ok(tracks) => Ok(tracks),
        Err(e) if should_retry_with_fallback(&e, seeds) => {
            info!("Seeded recommendation request was unsatisfiable; retrying with genre seeds");
            spotify.recommendations(&SeedSet::fallback(), limit).await
        }
        Err(e) => Err(e),
    }
}

// A 404 from /recommendations means a seed id was stale or
// region-restricted; genre seeds can't be, so one retry with those is
// strictly more likely to succeed. Never retry a request that already
// used genre seeds.
fn should_retry_with_fallback(err: &AppError, seeds: &SeedSet) -> bool {
    matches!(err, AppError::UpstreamError { status: 404 }) && !seeds.is_fallback()
}

// Bound the search fan-out to the first `cap` recommendations.
fn fanout(tracks: &[Track], cap: usize) -> &[Track] {
    &tracks[..tracks.len().min(cap)]
}

fn search_query(track: &Track) -> String {
    match track.primary_artist_name() {
        Some(artist) => format!("{} {}", track.name, artist),
        None => track.name.clone(),
    }
}

fn absorb_outcome(
    collector: &mut PlaylistCollector,
    query: &str,
    outcome: Result<Vec<RawPlaylist>, AppError>,
) {
    match outcome {
        Ok(results) => collector.absorb(results),
        Err(e) => {
            // One bad search shouldn't sink the whole run.
            warn!("Playlist search for '{}' failed; skipping: {}", query, e);
        }
    }
}

// Accumulates accepted playlists across all searches of one run.
// First-seen copy wins; ids never repeat in the output.
struct PlaylistCollector {
    min_tracks: u32,
    seen: HashSet<String>,
    playlists: Vec<Playlist>,
}

impl PlaylistCollector {
    fn new(min_tracks: u32) -> Self {
        PlaylistCollector {
            min_tracks,
            seen: HashSet::new(),
            playlists: Vec::new(),
        }
    }

    fn absorb(&mut self, results: Vec<RawPlaylist>) {
        for raw in results {
            if let Some(playlist) = self.accept(raw) {
                self.seen.insert(playlist.id.clone());
                self.playlists.push(playlist);
            }
        }
    }

    fn accept(&self, raw: RawPlaylist) -> Option<Playlist> {
        // Entries missing any required field get dropped outright.
        let id = raw.id?;
        let name = raw.name?;
        let owner = raw.owner?;
        let owner_id = owner.id?;
        let track_count = raw.tracks.and_then(|t| t.total)?;
        let external_url = raw.external_urls.get("spotify")?.clone();

        // Editorial playlists are owned by "spotify" (or namespaced
        // under it); we only want user-curated ones.
        if owner_id.starts_with(CURATOR_OWNER_ID) {
            debug!("Skipping curator-owned playlist '{}'", name);
            return None;
        }

        if self.seen.contains(&id) {
            return None;
        }

        if track_count < self.min_tracks {
            debug!(
                "Skipping playlist '{}' - only {} tracks",
                name, track_count
            );
            return None;
        }

        Some(Playlist {
            id,
            name,
            owner_id,
            owner_display_name: owner.display_name.unwrap_or_default(),
            track_count,
            image_url: raw.images.first().map(|i| i.url.clone()),
            external_url,
        })
    }

    fn into_playlists(self) -> Vec<Playlist> {
        self.playlists
    }
}
