//! The fifteen API operations.
//!
//! Each function returns an `ApiRequest<R>`: the `Endpoint` for the call
//! plus the record type its response decodes into. `SetlistClient` has an
//! awaitable method per operation; callback callers pass the `ApiRequest`
//! to `SetlistClient::execute_with`.
//!
//! Identifiers are percent-encoded as single path segments. Optional
//! arguments left as `None` become empty parameter values and are not sent.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::client::SetlistClient;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Artist, Artists, Cities, City, Countries, Setlist, Setlists, User, Venue, Venues};

/// Characters escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// An `Endpoint` tagged with the type its response decodes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest<R> {
    endpoint: Endpoint,
    response: PhantomData<fn() -> R>,
}

impl<R> ApiRequest<R> {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            response: PhantomData,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn into_endpoint(self) -> Endpoint {
        self.endpoint
    }
}

fn segment(id: &str) -> String {
    utf8_percent_encode(id, PATH_SEGMENT).to_string()
}

/// Sort order for artist searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtistSort {
    SortName,
    Relevance,
}

impl fmt::Display for ArtistSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArtistSort::SortName => "sortName",
            ArtistSort::Relevance => "relevance",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistSearch {
    pub artist_mbid: Option<String>,
    pub artist_name: Option<String>,
    pub page: Option<u32>,
    pub sort: Option<ArtistSort>,
}

impl ArtistSearch {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            artist_name: Some(name.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CitySearch {
    /// ISO country code.
    pub country: Option<String>,
    pub name: Option<String>,
    pub page: Option<u32>,
    pub state: Option<String>,
    pub state_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetlistSearch {
    pub artist_mbid: Option<String>,
    pub artist_name: Option<String>,
    pub artist_tmid: Option<i64>,
    pub city_id: Option<String>,
    pub city_name: Option<String>,
    pub country_code: Option<String>,
    /// `dd-MM-yyyy`.
    pub date: Option<String>,
    pub last_fm: Option<i64>,
    /// `yyyyMMddHHmmss`.
    pub last_updated: Option<String>,
    pub page: Option<u32>,
    pub state: Option<String>,
    pub state_code: Option<String>,
    pub tour_name: Option<String>,
    pub venue_id: Option<String>,
    pub venue_name: Option<String>,
    pub year: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenueSearch {
    pub city_id: Option<String>,
    pub city_name: Option<String>,
    pub country: Option<String>,
    pub name: Option<String>,
    pub page: Option<u32>,
    pub state: Option<String>,
    pub state_code: Option<String>,
}

pub fn artist(mbid: &str) -> ApiRequest<Artist> {
    ApiRequest::new(Endpoint::new(format!("artist/{}", segment(mbid))))
}

pub fn artist_setlists(mbid: &str, page: Option<u32>) -> ApiRequest<Setlists> {
    ApiRequest::new(Endpoint::new(format!("artist/{}/setlists", segment(mbid))).param_opt("p", page))
}

pub fn city(geo_id: &str) -> ApiRequest<City> {
    ApiRequest::new(Endpoint::new(format!("city/{}", segment(geo_id))))
}

pub fn search_artists(query: &ArtistSearch) -> ApiRequest<Artists> {
    ApiRequest::new(
        Endpoint::new("search/artists")
            .param_opt("artistMbid", query.artist_mbid.as_deref())
            .param_opt("artistName", query.artist_name.as_deref())
            .param_opt("p", query.page)
            .param_opt("sort", query.sort),
    )
}

pub fn search_cities(query: &CitySearch) -> ApiRequest<Cities> {
    ApiRequest::new(
        Endpoint::new("search/cities")
            .param_opt("country", query.country.as_deref())
            .param_opt("name", query.name.as_deref())
            .param_opt("p", query.page)
            .param_opt("state", query.state.as_deref())
            .param_opt("stateCode", query.state_code.as_deref()),
    )
}

pub fn search_countries() -> ApiRequest<Countries> {
    ApiRequest::new(Endpoint::new("search/countries"))
}

pub fn search_setlists(query: &SetlistSearch) -> ApiRequest<Setlists> {
    ApiRequest::new(
        Endpoint::new("search/setlists")
            .param_opt("artistMbid", query.artist_mbid.as_deref())
            .param_opt("artistName", query.artist_name.as_deref())
            .param_opt("artistTmid", query.artist_tmid)
            .param_opt("cityId", query.city_id.as_deref())
            .param_opt("cityName", query.city_name.as_deref())
            .param_opt("countryCode", query.country_code.as_deref())
            .param_opt("date", query.date.as_deref())
            .param_opt("lastFm", query.last_fm)
            .param_opt("lastUpdated", query.last_updated.as_deref())
            .param_opt("p", query.page)
            .param_opt("state", query.state.as_deref())
            .param_opt("stateCode", query.state_code.as_deref())
            .param_opt("tourName", query.tour_name.as_deref())
            .param_opt("venueId", query.venue_id.as_deref())
            .param_opt("venueName", query.venue_name.as_deref())
            .param_opt("year", query.year),
    )
}

pub fn search_venues(query: &VenueSearch) -> ApiRequest<Venues> {
    ApiRequest::new(
        Endpoint::new("search/venues")
            .param_opt("cityId", query.city_id.as_deref())
            .param_opt("cityName", query.city_name.as_deref())
            .param_opt("country", query.country.as_deref())
            .param_opt("name", query.name.as_deref())
            .param_opt("p", query.page)
            .param_opt("state", query.state.as_deref())
            .param_opt("stateCode", query.state_code.as_deref()),
    )
}

pub fn setlist(setlist_id: &str) -> ApiRequest<Setlist> {
    ApiRequest::new(Endpoint::new(format!("setlist/{}", segment(setlist_id))))
}

pub fn setlist_version(version_id: &str) -> ApiRequest<Setlist> {
    ApiRequest::new(Endpoint::new(format!("setlist/version/{}", segment(version_id))))
}

pub fn user(user_id: &str) -> ApiRequest<User> {
    ApiRequest::new(Endpoint::new(format!("user/{}", segment(user_id))))
}

pub fn user_attended(user_id: &str, page: Option<u32>) -> ApiRequest<Setlists> {
    ApiRequest::new(Endpoint::new(format!("user/{}/attended", segment(user_id))).param_opt("p", page))
}

pub fn user_edited(user_id: &str, page: Option<u32>) -> ApiRequest<Setlists> {
    ApiRequest::new(Endpoint::new(format!("user/{}/edited", segment(user_id))).param_opt("p", page))
}

pub fn venue(venue_id: &str) -> ApiRequest<Venue> {
    ApiRequest::new(Endpoint::new(format!("venue/{}", segment(venue_id))))
}

pub fn venue_setlists(venue_id: &str, page: Option<u32>) -> ApiRequest<Setlists> {
    ApiRequest::new(Endpoint::new(format!("venue/{}/setlists", segment(venue_id))).param_opt("p", page))
}

impl<T: Transport> SetlistClient<T> {
    /// Artist by MusicBrainz id.
    pub fn artist<'a>(&'a self, mbid: &str) -> impl Future<Output = Result<Artist, ApiError>> + Send + 'a {
        self.execute(artist(mbid))
    }

    /// Setlists of an artist, newest first, 20 per page.
    pub fn artist_setlists<'a>(
        &'a self,
        mbid: &str,
        page: Option<u32>,
    ) -> impl Future<Output = Result<Setlists, ApiError>> + Send + 'a {
        self.execute(artist_setlists(mbid, page))
    }

    /// City by GeoNames id.
    pub fn city<'a>(&'a self, geo_id: &str) -> impl Future<Output = Result<City, ApiError>> + Send + 'a {
        self.execute(city(geo_id))
    }

    pub fn search_artists<'a>(
        &'a self,
        query: &ArtistSearch,
    ) -> impl Future<Output = Result<Artists, ApiError>> + Send + 'a {
        self.execute(search_artists(query))
    }

    pub fn search_cities<'a>(
        &'a self,
        query: &CitySearch,
    ) -> impl Future<Output = Result<Cities, ApiError>> + Send + 'a {
        self.execute(search_cities(query))
    }

    /// All supported countries, names localized per the configured language.
    pub fn search_countries(&self) -> impl Future<Output = Result<Countries, ApiError>> + Send + '_ {
        self.execute(search_countries())
    }

    pub fn search_setlists<'a>(
        &'a self,
        query: &SetlistSearch,
    ) -> impl Future<Output = Result<Setlists, ApiError>> + Send + 'a {
        self.execute(search_setlists(query))
    }

    pub fn search_venues<'a>(
        &'a self,
        query: &VenueSearch,
    ) -> impl Future<Output = Result<Venues, ApiError>> + Send + 'a {
        self.execute(search_venues(query))
    }

    /// Current version of a setlist.
    pub fn setlist<'a>(&'a self, setlist_id: &str) -> impl Future<Output = Result<Setlist, ApiError>> + Send + 'a {
        self.execute(setlist(setlist_id))
    }

    /// A specific edit version of a setlist.
    pub fn setlist_version<'a>(
        &'a self,
        version_id: &str,
    ) -> impl Future<Output = Result<Setlist, ApiError>> + Send + 'a {
        self.execute(setlist_version(version_id))
    }

    pub fn user<'a>(&'a self, user_id: &str) -> impl Future<Output = Result<User, ApiError>> + Send + 'a {
        self.execute(user(user_id))
    }

    /// Concerts the user attended.
    pub fn user_attended<'a>(
        &'a self,
        user_id: &str,
        page: Option<u32>,
    ) -> impl Future<Output = Result<Setlists, ApiError>> + Send + 'a {
        self.execute(user_attended(user_id, page))
    }

    /// Setlists the user created or edited.
    pub fn user_edited<'a>(
        &'a self,
        user_id: &str,
        page: Option<u32>,
    ) -> impl Future<Output = Result<Setlists, ApiError>> + Send + 'a {
        self.execute(user_edited(user_id, page))
    }

    pub fn venue<'a>(&'a self, venue_id: &str) -> impl Future<Output = Result<Venue, ApiError>> + Send + 'a {
        self.execute(venue(venue_id))
    }

    pub fn venue_setlists<'a>(
        &'a self,
        venue_id: &str,
        page: Option<u32>,
    ) -> impl Future<Output = Result<Setlists, ApiError>> + Send + 'a {
        self.execute(venue_setlists(venue_id, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::request::build_request;
    use crate::transport::StaticTransport;

    fn url_of<R>(request: &ApiRequest<R>) -> String {
        let config = ClientConfig::new("key");
        build_request(request.endpoint(), &config).unwrap().url
    }

    #[test]
    fn paths_match_api_layout() {
        let base = "https://api.setlist.fm/rest/1.0";
        let cases = [
            (url_of(&artist("mbid-1")), "artist/mbid-1"),
            (url_of(&artist_setlists("mbid-1", None)), "artist/mbid-1/setlists"),
            (url_of(&city("5357527")), "city/5357527"),
            (url_of(&search_artists(&ArtistSearch::default())), "search/artists"),
            (url_of(&search_cities(&CitySearch::default())), "search/cities"),
            (url_of(&search_countries()), "search/countries"),
            (url_of(&search_setlists(&SetlistSearch::default())), "search/setlists"),
            (url_of(&search_venues(&VenueSearch::default())), "search/venues"),
            (url_of(&setlist("63de4613")), "setlist/63de4613"),
            (url_of(&setlist_version("7be1aaa0")), "setlist/version/7be1aaa0"),
            (url_of(&user("Adam-Jones")), "user/Adam-Jones"),
            (url_of(&user_attended("Adam-Jones", None)), "user/Adam-Jones/attended"),
            (url_of(&user_edited("Adam-Jones", None)), "user/Adam-Jones/edited"),
            (url_of(&venue("6bd6ca6e")), "venue/6bd6ca6e"),
            (url_of(&venue_setlists("6bd6ca6e", None)), "venue/6bd6ca6e/setlists"),
        ];
        for (url, path) in cases {
            assert_eq!(url, format!("{base}/{path}"));
        }
    }

    #[test]
    fn page_is_sent_only_when_given() {
        assert_eq!(
            url_of(&user_attended("Adam-Jones", Some(3))),
            "https://api.setlist.fm/rest/1.0/user/Adam-Jones/attended?p=3"
        );
        let omitted = artist_setlists("mbid-1", None);
        assert_eq!(omitted.endpoint().parameters()["p"], "");
    }

    #[test]
    fn identifiers_are_single_path_segments() {
        assert_eq!(
            url_of(&user("a/b?c")),
            "https://api.setlist.fm/rest/1.0/user/a%2Fb%3Fc"
        );
    }

    #[test]
    fn identifiers_cannot_leave_their_segment() {
        let config = ClientConfig::new("key");
        let cases = [
            user("..").endpoint().clone(),
            user_attended("..", None).endpoint().clone(),
            artist("").endpoint().clone(),
            setlist(".").endpoint().clone(),
        ];
        for endpoint in cases {
            assert_eq!(
                build_request(&endpoint, &config),
                Err(ApiError::InvalidEndpoint),
                "{}",
                endpoint.path()
            );
        }
    }

    #[tokio::test]
    async fn empty_identifier_never_reaches_transport() {
        let client = SetlistClient::with_transport(ClientConfig::new("key"), StaticTransport::json(200, "{}"));
        let err = client.artist("").await.unwrap_err();
        assert_eq!(err.code(), 0);
        assert_eq!(client.transport().calls(), 0);
    }

    #[test]
    fn artist_search_sends_supplied_fields_in_name_order() {
        let query = ArtistSearch {
            artist_name: Some("The Beatles".to_string()),
            page: Some(2),
            sort: Some(ArtistSort::Relevance),
            ..ArtistSearch::default()
        };
        assert_eq!(
            url_of(&search_artists(&query)),
            "https://api.setlist.fm/rest/1.0/search/artists?artistName=The%20Beatles&p=2&sort=relevance"
        );
    }

    #[test]
    fn setlist_search_maps_every_field() {
        let query = SetlistSearch {
            artist_mbid: Some("m".into()),
            artist_name: Some("n".into()),
            artist_tmid: Some(1),
            city_id: Some("c".into()),
            city_name: Some("cn".into()),
            country_code: Some("US".into()),
            date: Some("01-02-2003".into()),
            last_fm: Some(2),
            last_updated: Some("20030201000000".into()),
            page: Some(4),
            state: Some("s".into()),
            state_code: Some("sc".into()),
            tour_name: Some("t".into()),
            venue_id: Some("v".into()),
            venue_name: Some("vn".into()),
            year: Some(2003),
        };
        let request = search_setlists(&query);
        let names: Vec<&str> = request.endpoint().supplied_parameters().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec![
                "artistMbid", "artistName", "artistTmid", "cityId", "cityName", "countryCode", "date",
                "lastFm", "lastUpdated", "p", "state", "stateCode", "tourName", "venueId", "venueName",
                "year",
            ]
        );
    }

    #[test]
    fn default_searches_record_every_parameter_as_omitted() {
        let request = search_venues(&VenueSearch::default());
        assert_eq!(request.endpoint().parameters().len(), 7);
        assert_eq!(request.endpoint().supplied_parameters().count(), 0);
    }

    #[test]
    fn city_search_uses_state_code_name() {
        let query = CitySearch {
            name: Some("Hollywood".into()),
            state_code: Some("CA".into()),
            ..CitySearch::default()
        };
        assert_eq!(
            url_of(&search_cities(&query)),
            "https://api.setlist.fm/rest/1.0/search/cities?name=Hollywood&stateCode=CA"
        );
    }
}
