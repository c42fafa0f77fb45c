//! Response records for the setlist.fm API.
//!
//! # Design
//! Every field is optional: the API omits fields freely, and a missing
//! field must never turn a valid response into a decode error. Field names
//! follow the API's camelCase JSON. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// A musician or group, identified by its MusicBrainz id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub mbid: Option<String>,
    /// Deprecated Ticketmaster id.
    pub tmid: Option<i64>,
    pub name: Option<String>,
    pub sort_name: Option<String>,
    pub disambiguation: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artists {
    pub artist: Option<Vec<Artist>>,
    pub total: Option<u32>,
    pub page: Option<u32>,
    pub items_per_page: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    pub lat: Option<f64>,
    pub long: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// ISO 3166-1 alpha-2 code.
    pub code: Option<String>,
    /// Localized per the request language.
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Countries {
    pub country: Option<Vec<Country>>,
    pub total: Option<u32>,
    pub page: Option<u32>,
    pub items_per_page: Option<u32>,
}

/// A city, identified by its GeoNames id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: Option<String>,
    pub name: Option<String>,
    pub state_code: Option<String>,
    pub state: Option<String>,
    pub coords: Option<Coords>,
    pub country: Option<Country>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cities {
    pub cities: Option<Vec<City>>,
    pub total: Option<u32>,
    pub page: Option<u32>,
    pub items_per_page: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: Option<String>,
    pub name: Option<String>,
    pub city: Option<City>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venues {
    pub venue: Option<Vec<Venue>>,
    pub total: Option<u32>,
    pub page: Option<u32>,
    pub items_per_page: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tour {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub name: Option<String>,
    /// Guest artist performing with the main artist.
    pub with: Option<Artist>,
    /// Original artist when the song is a cover.
    pub cover: Option<Artist>,
    pub info: Option<String>,
    /// Played from tape rather than live.
    pub tape: Option<bool>,
}

/// One set (main set or an encore) of a concert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Set {
    pub name: Option<String>,
    /// Encore number; absent for the main set.
    pub encore: Option<u32>,
    pub song: Option<Vec<Song>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sets {
    pub set: Option<Vec<Set>>,
}

/// A concert's setlist, in one of its edit versions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setlist {
    pub id: Option<String>,
    pub version_id: Option<String>,
    pub artist: Option<Artist>,
    pub venue: Option<Venue>,
    pub tour: Option<Tour>,
    pub sets: Option<Sets>,
    pub info: Option<String>,
    pub url: Option<String>,
    pub last_fm_event_id: Option<i64>,
    /// `dd-MM-yyyy`, as sent by the API.
    pub event_date: Option<String>,
    /// ISO-8601 timestamp of the last edit.
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setlists {
    pub setlist: Option<Vec<Setlist>>,
    pub total: Option<u32>,
    pub page: Option<u32>,
    pub items_per_page: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: Option<String>,
    pub fullname: Option<String>,
    pub last_fm: Option<String>,
    pub my_space: Option<String>,
    pub twitter: Option<String>,
    pub flickr: Option<String>,
    pub website: Option<String>,
    pub about: Option<String>,
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artist_decodes_camel_case_fields() {
        let artist: Artist = serde_json::from_str(
            r#"{
                "mbid": "a74b1b7f-71a5-4011-9441-d0b5e4122711",
                "tmid": 734540,
                "name": "Radiohead",
                "sortName": "Radiohead",
                "disambiguation": "",
                "url": "https://www.setlist.fm/setlists/radiohead-bd6bd12.html"
            }"#,
        )
        .unwrap();
        assert_eq!(artist.name.as_deref(), Some("Radiohead"));
        assert_eq!(artist.sort_name.as_deref(), Some("Radiohead"));
        assert_eq!(artist.tmid, Some(734540));
    }

    #[test]
    fn empty_object_decodes_to_all_none() {
        let setlist: Setlist = serde_json::from_str("{}").unwrap();
        assert_eq!(setlist, Setlist::default());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let tour: Tour = serde_json::from_str(r#"{"name":"OK Computer","sponsor":"x"}"#).unwrap();
        assert_eq!(tour.name.as_deref(), Some("OK Computer"));
    }

    #[test]
    fn setlist_decodes_nested_sets_and_songs() {
        let setlist: Setlist = serde_json::from_str(
            r#"{
                "id": "63de4613",
                "versionId": "7be1aaa0",
                "eventDate": "23-08-1997",
                "artist": {"name": "Radiohead"},
                "venue": {"name": "Lowlands", "city": {"id": "2759794", "name": "Biddinghuizen",
                          "coords": {"lat": 52.45, "long": 5.69},
                          "country": {"code": "NL", "name": "Netherlands"}}},
                "sets": {"set": [
                    {"song": [{"name": "Airbag"}, {"name": "Paranoid Android"}]},
                    {"encore": 1, "song": [{"name": "Creep", "cover": {"name": "Nobody"}, "tape": false}]}
                ]}
            }"#,
        )
        .unwrap();

        let sets = setlist.sets.unwrap().set.unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].song.as_ref().unwrap().len(), 2);
        assert_eq!(sets[1].encore, Some(1));
        let city = setlist.venue.unwrap().city.unwrap();
        assert_eq!(city.coords.unwrap().lat, Some(52.45));
        assert_eq!(city.country.unwrap().code.as_deref(), Some("NL"));
    }

    #[test]
    fn wrong_field_type_is_a_decode_error() {
        let result: Result<Artist, _> = serde_json::from_str(r#"{"tmid":"not a number"}"#);
        assert!(result.is_err());
    }
}
