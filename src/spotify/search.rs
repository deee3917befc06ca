use crate::{
    error::ServiceError,
    spotify::AuthorizedClient,
    types::{Playlist, SearchPlaylistsResponse, SearchTracksResponse, Track},
};

const SEARCH_LIMIT: &str = "20";

/// Searches the catalog for tracks matching the query.
pub async fn search_tracks(
    client: &AuthorizedClient<'_>,
    query: &str,
) -> Result<Vec<Track>, ServiceError> {
    let response: SearchTracksResponse = client
        .get_json(
            "/search",
            &[("q", query), ("type", "track"), ("limit", SEARCH_LIMIT)],
        )
        .await?;
    Ok(response.tracks.items)
}

/// Searches the catalog for playlists matching the query.
pub async fn search_playlists(
    client: &AuthorizedClient<'_>,
    query: &str,
) -> Result<Vec<Playlist>, ServiceError> {
    let response: SearchPlaylistsResponse = client
        .get_json(
            "/search",
            &[("q", query), ("type", "playlist"), ("limit", SEARCH_LIMIT)],
        )
        .await?;

    // Playlist pages come back with null slots at times; drop them.
    Ok(response.playlists.items.into_iter().flatten().collect())
}
