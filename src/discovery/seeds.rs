use log::{debug, info};

use crate::config::{Artist, Track, FALLBACK_GENRES};

// The recommendation endpoint takes up to 5 seeds total across artists,
// tracks and genres. We deliberately use the smallest useful set: the
// rank-1 artist plus the rank-1 track (they carry the strongest
// affinity signal), or genre seeds when the account has neither.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedSet {
    pub artists: Vec<String>,
    pub tracks: Vec<String>,
    pub genres: Vec<String>,
}

impl SeedSet {
    // Resolution policy: take what exists, never come back empty.
    pub fn resolve(top_artists: &[Artist], top_tracks: &[Track]) -> SeedSet {
        if top_artists.is_empty() && top_tracks.is_empty() {
            info!("No taste signals for this account - falling back to genre seeds");
            return SeedSet::fallback();
        }

        let seeds = SeedSet {
            artists: top_artists.iter().take(1).map(|a| a.id.clone()).collect(),
            tracks: top_tracks.iter().take(1).map(|t| t.id.clone()).collect(),
            genres: vec![],
        };

        debug!(
            "Resolved seeds: artists={:?} tracks={:?}",
            seeds.artists, seeds.tracks
        );

        seeds
    }

    pub fn fallback() -> SeedSet {
        SeedSet {
            artists: vec![],
            tracks: vec![],
            genres: FALLBACK_GENRES.iter().map(|g| g.to_string()).collect(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        !self.genres.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.artists.is_empty() && self.tracks.is_empty() && self.genres.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artist(id: &str) -> Artist {
        Artist {
            id: id.to_string(),
            name: format!("artist {}", id),
        }
    }

    fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            name: format!("track {}", id),
            artists: vec![artist("x")],
        }
    }

    #[test]
    fn both_kinds_present_takes_rank_one_of_each() {
        let seeds = SeedSet::resolve(&[artist("a1"), artist("a2")], &[track("t1"), track("t2")]);

        assert_eq!(seeds.artists, vec!["a1"]);
        assert_eq!(seeds.tracks, vec!["t1"]);
        assert!(seeds.genres.is_empty());
        assert!(!seeds.is_fallback());
    }

    #[test]
    fn artists_only() {
        let seeds = SeedSet::resolve(&[artist("a1")], &[]);

        assert_eq!(seeds.artists, vec!["a1"]);
        assert!(seeds.tracks.is_empty());
        assert!(!seeds.is_empty());
    }

    #[test]
    fn tracks_only() {
        let seeds = SeedSet::resolve(&[], &[track("t1")]);

        assert!(seeds.artists.is_empty());
        assert_eq!(seeds.tracks, vec!["t1"]);
        assert!(!seeds.is_empty());
    }

    #[test]
    fn no_signals_falls_back_to_genres() {
        let seeds = SeedSet::resolve(&[], &[]);

        assert!(seeds.is_fallback());
        assert!(!seeds.is_empty());
        assert_eq!(seeds.genres, FALLBACK_GENRES.to_vec());
    }

    #[test]
    fn fallback_is_deterministic() {
        assert_eq!(SeedSet::fallback(), SeedSet::fallback());
        assert_eq!(SeedSet::resolve(&[], &[]), SeedSet::fallback());
    }
}
