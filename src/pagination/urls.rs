use super::cursor::PageRequest;
use crate::domain::models::{PlayerId, TournamentId};

const PLAYER_SEARCH_PATH: &str = "/userAccount/s";
const PLAYER_PROFILE_PATH: &str = "/userAccount/up";
const TOURNAMENT_SEARCH_PATH: &str = "/t/search";
const TOURNAMENT_RESULTS_PATH: &str = "/t/tr";
const CITIZENS_FILTER: &str = "format=&showUsCitizensOnly=on";
const TOTAL_PROBE_SIZE: usize = 5;

/// Append max/offset with &-or-? depending on existing params
pub fn build_paginated_url_with_params(base_url: &str, request: PageRequest) -> String {
    let separator = determine_separator(base_url);
    format!(
        "{}{}max={}&offset={}",
        base_url, separator, request.max, request.offset
    )
}

pub fn player_listing_url(base_url: &str, request: PageRequest, citizens_only: bool) -> String {
    let url = build_paginated_url_with_params(&player_search(base_url), request);
    with_citizens_filter(url, citizens_only)
}

/// Small listing page whose header carries the total player count
pub fn player_total_url(base_url: &str, citizens_only: bool) -> String {
    let url = format!("{}?max={}", player_search(base_url), TOTAL_PROBE_SIZE);
    with_citizens_filter(url, citizens_only)
}

pub fn tournament_total_url(base_url: &str) -> String {
    format!("{}{}", base_url, TOURNAMENT_SEARCH_PATH)
}

pub fn tournament_listing_url(base_url: &str, request: PageRequest) -> String {
    build_paginated_url_with_params(&tournament_total_url(base_url), request)
}

pub fn match_results_url(base_url: &str, tournament_id: TournamentId, request: PageRequest) -> String {
    let base = format!("{}{}/{}", base_url, TOURNAMENT_RESULTS_PATH, tournament_id);
    build_paginated_url_with_params(&base, request)
}

pub fn profile_url(base_url: &str, player_id: PlayerId) -> String {
    format!("{}{}/{}", base_url, PLAYER_PROFILE_PATH, player_id)
}

pub fn external_id_search_url(base_url: &str, external_id: &str) -> String {
    format!(
        "{}?searchBy=usattNumber&query={}",
        player_search(base_url),
        urlencoding::encode(external_id)
    )
}

fn player_search(base_url: &str) -> String {
    format!("{}{}", base_url, PLAYER_SEARCH_PATH)
}

fn with_citizens_filter(url: String, citizens_only: bool) -> String {
    if citizens_only {
        format!("{}&{}", url, CITIZENS_FILTER)
    } else {
        url
    }
}

fn determine_separator(url: &str) -> char {
    if url.contains('?') { '&' } else { '?' }
}
