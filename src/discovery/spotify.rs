use std::collections::HashMap;
use std::time::Duration;

use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::{Artist, Config, Track, REQUEST_TIMEOUT_SECS, TOP_SIGNAL_LIMIT};
use crate::discovery::seeds::SeedSet;
use crate::error::classify_status;
use crate::AppError;

pub struct Spotify {
    client: reqwest::Client,
    token: String,
    base_url: String,
    market: Option<String>,
}

#[derive(Deserialize, Debug)]
struct SignalPage<T> {
    #[serde(default)]
    items: Vec<T>,
}

#[derive(Deserialize, Debug)]
struct RecommendationsResponse {
    #[serde(default)]
    tracks: Vec<Track>,
}

#[derive(Deserialize, Debug)]
struct SearchResponse {
    playlists: SearchPage,
}

#[derive(Deserialize, Debug)]
struct SearchPage {
    // Spotify occasionally puts literal nulls into search result pages.
    #[serde(default)]
    items: Vec<Option<RawPlaylist>>,
}

// Search result shape is not fully guaranteed, so every field is
// optional here; the collector rejects entries it can't use.
#[derive(Deserialize, Debug, Clone)]
pub struct RawPlaylist {
    pub id: Option<String>,
    pub name: Option<String>,
    pub owner: Option<RawOwner>,
    pub tracks: Option<RawTrackRef>,
    #[serde(default)]
    pub images: Vec<RawImage>,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RawOwner {
    pub id: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RawTrackRef {
    pub total: Option<u32>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RawImage {
    pub url: String,
}

impl Spotify {
    pub fn new(config: &Config, token: &str) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent("mixpal")
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Spotify {
            client,
            token: token.to_string(),
            base_url: config.api_base_url.clone(),
            market: config.market.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let url = format!("{}{}", self.base_url, path);

        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(classify_status(response.status()));
        }

        let body = response.bytes().await?;

        Ok(serde_json::from_slice::<T>(&body)?)
    }

    pub async fn top_artists(&self) -> Result<Vec<Artist>, AppError> {
        let page: SignalPage<Artist> = self
            .get_json(
                "/me/top/artists",
                &[
                    ("limit", TOP_SIGNAL_LIMIT.to_string()),
                    ("time_range", "medium_term".to_string()),
                ],
            )
            .await?;

        Ok(page.items)
    }

    pub async fn top_tracks(&self) -> Result<Vec<Track>, AppError> {
        let page: SignalPage<Track> = self
            .get_json(
                "/me/top/tracks",
                &[
                    ("limit", TOP_SIGNAL_LIMIT.to_string()),
                    ("time_range", "medium_term".to_string()),
                ],
            )
            .await?;

        Ok(page.items)
    }

    pub async fn recommendations(
        &self,
        seeds: &SeedSet,
        limit: u32,
    ) -> Result<Vec<Track>, AppError> {
        let mut query = vec![("limit", limit.to_string())];

        if !seeds.artists.is_empty() {
            query.push(("seed_artists", seeds.artists.join(",")));
        }

        if !seeds.tracks.is_empty() {
            query.push(("seed_tracks", seeds.tracks.join(",")));
        }

        if !seeds.genres.is_empty() {
            query.push(("seed_genres", seeds.genres.join(",")));
        }

        if let Some(market) = &self.market {
            query.push(("market", market.clone()));
        }

        let response: RecommendationsResponse =
            self.get_json("/recommendations", &query).await?;

        Ok(response.tracks)
    }

    pub async fn search_playlists(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<RawPlaylist>, AppError> {
        let response: SearchResponse = self
            .get_json(
                "/search",
                &[
                    ("q", query.to_string()),
                    ("type", "playlist".to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        Ok(response.playlists.items.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_page_tolerates_nulls_and_missing_fields() {
        let json = r#"{
            "playlists": {
                "items": [
                    null,
                    {"id": "p1"},
                    {
                        "id": "p2",
                        "name": "road trip mix",
                        "owner": {"id": "u1", "display_name": "u one"},
                        "tracks": {"total": 42},
                        "images": [{"url": "https://i.scdn.co/image/abc"}],
                        "external_urls": {"spotify": "https://open.spotify.com/playlist/p2"}
                    }
                ]
            }
        }"#;

        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let items: Vec<RawPlaylist> = response.playlists.items.into_iter().flatten().collect();

        // The literal null is gone; the bare entry survives with
        // everything unset so the filter chain can reject it.
        assert_eq!(items.len(), 2);
        assert!(items[0].name.is_none());
        assert!(items[0].owner.is_none());
        assert_eq!(items[1].tracks.as_ref().unwrap().total, Some(42));
        assert_eq!(
            items[1].external_urls.get("spotify").unwrap(),
            "https://open.spotify.com/playlist/p2"
        );
    }

    #[test]
    fn recommendations_response_parses_tracks() {
        let json = r#"{
            "tracks": [
                {
                    "id": "t1",
                    "name": "Some Song",
                    "artists": [{"id": "a1", "name": "Some Band"}, {"id": "a2", "name": "Guest"}]
                }
            ],
            "seeds": []
        }"#;

        let response: RecommendationsResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.tracks.len(), 1);
        assert_eq!(response.tracks[0].primary_artist_name(), Some("Some Band"));
    }

    #[test]
    fn empty_recommendations_is_a_valid_response() {
        let response: RecommendationsResponse = serde_json::from_str(r#"{"tracks": []}"#).unwrap();
        assert!(response.tracks.is_empty());
    }
}
