//! In-memory movie catalog.
//!
//! A small `DomainAdapter` over a vector of records, used by unit tests,
//! the integration tests, and the demo binary. Matching mirrors the remote
//! discovery API this stands in for: case-insensitive genre and title
//! matching, substring matching on cast names, and `>=YYYY` / `<=YYYY`
//! range values on the release year. An unconstrained query returns
//! nothing rather than the whole catalog.

use tracing::debug;

use reel_core::error::Result;
use reel_core::types::Slot;

use crate::adapter::{Constraints, DomainAdapter, MovieRecord, QueryResult};

pub struct MovieCatalog {
    movies: Vec<MovieRecord>,
}

impl MovieCatalog {
    /// Build a catalog from records; query ranking follows this order.
    pub fn new(movies: Vec<MovieRecord>) -> Self {
        Self { movies }
    }

    /// Load a catalog from a JSON array of records.
    pub fn from_json(json: &str) -> Result<Self> {
        let movies: Vec<MovieRecord> = serde_json::from_str(json)?;
        Ok(Self::new(movies))
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// A canned catalog for demos and tests.
    pub fn sample() -> Self {
        fn movie(
            id: &str,
            title: &str,
            overview: &str,
            year: &str,
            genres: &[&str],
            cast: &[&str],
            rating: &str,
        ) -> MovieRecord {
            MovieRecord {
                id: id.to_string(),
                title: title.to_string(),
                overview: overview.to_string(),
                release_year: Some(year.to_string()),
                genres: genres.iter().map(|s| s.to_string()).collect(),
                cast: cast.iter().map(|s| s.to_string()).collect(),
                rating: Some(rating.to_string()),
            }
        }

        Self::new(vec![
            movie(
                "744",
                "Top Gun",
                "A hotshot Navy pilot is accepted into an elite training school \
                 for fighter pilots, where tragedy and personal demons threaten \
                 his dream of becoming an ace.",
                "1986",
                &["action", "drama", "adventure"],
                &["Tom Cruise", "Kelly McGillis", "Val Kilmer"],
                "7.0",
            ),
            movie(
                "954",
                "Mission: Impossible",
                "An American agent, framed for the deaths of his team, goes on \
                 the run to uncover the real spy.",
                "1996",
                &["action", "adventure", "thriller"],
                &["Tom Cruise", "Jon Voight"],
                "6.9",
            ),
            movie(
                "955",
                "Mission: Impossible II",
                "A secret agent is sent to Sydney to find and destroy a \
                 genetically modified disease.",
                "2000",
                &["action", "adventure", "thriller"],
                &["Tom Cruise", "Thandiwe Newton"],
                "6.1",
            ),
            movie(
                "956",
                "Mission: Impossible III",
                "A retired agent is called back into action to rescue a \
                 colleague and face the most ruthless arms dealer of his career.",
                "2006",
                &["action", "adventure", "thriller"],
                &["Tom Cruise", "Philip Seymour Hoffman"],
                "6.7",
            ),
            movie(
                "95",
                "Armageddon",
                "An asteroid the size of Texas is on a collision course with \
                 Earth and a team of deep-core drillers is sent to stop it.",
                "1998",
                &["action", "thriller", "science fiction"],
                &["Bruce Willis", "Ben Affleck", "Liv Tyler"],
                "6.7",
            ),
            movie(
                "8838",
                "Mercury Rising",
                "An outcast FBI agent protects a nine-year-old autistic boy who \
                 has cracked a top-secret government code.",
                "1998",
                &["action", "crime", "drama"],
                &["Bruce Willis", "Alec Baldwin"],
                "6.1",
            ),
            movie(
                "9882",
                "The Siege",
                "After the abduction of a religious leader, New York City \
                 becomes the target of escalating terrorist attacks.",
                "1998",
                &["action", "thriller"],
                &["Bruce Willis", "Denzel Washington", "Annette Bening"],
                "6.3",
            ),
            movie(
                "1573",
                "Die Hard 2",
                "A cop battles terrorists who seize an airport while his wife's \
                 plane circles above.",
                "1990",
                &["action", "thriller"],
                &["Bruce Willis", "Bonnie Bedelia"],
                "6.9",
            ),
            movie(
                "861",
                "Total Recall",
                "A construction worker discovers his memories may be implants \
                 and travels to Mars to find out who he really is.",
                "1990",
                &["action", "science fiction"],
                &["Arnold Schwarzenegger", "Sharon Stone"],
                "7.3",
            ),
            movie(
                "8845",
                "Predator 2",
                "An alien hunter stalks gang members and police in a sweltering \
                 Los Angeles.",
                "1990",
                &["action", "science fiction"],
                &["Danny Glover", "Gary Busey"],
                "6.3",
            ),
            movie(
                "8851",
                "Darkman",
                "A scientist left for dead seeks revenge using synthetic skin \
                 that lets him take on any identity.",
                "1990",
                &["action", "crime", "science fiction"],
                &["Liam Neeson", "Frances McDormand"],
                "6.4",
            ),
            movie(
                "2619",
                "Big",
                "A boy's wish at a carnival machine turns him into a \
                 thirty-year-old overnight.",
                "1988",
                &["comedy", "drama", "fantasy"],
                &["Tom Hanks", "Elizabeth Perkins"],
                "7.3",
            ),
            movie(
                "2620",
                "Splash",
                "A man is reunited with the mysterious woman who saved him as a \
                 boy; she happens to be a mermaid.",
                "1984",
                &["comedy", "fantasy", "romance"],
                &["Tom Hanks", "Daryl Hannah"],
                "6.3",
            ),
            movie(
                "771",
                "Home Alone",
                "An eight-year-old defends his house against two bumbling \
                 burglars after his family leaves for vacation without him.",
                "1990",
                &["comedy", "family"],
                &["Macaulay Culkin", "Joe Pesci"],
                "7.4",
            ),
            movie(
                "137",
                "Groundhog Day",
                "A cynical weatherman relives the same day over and over in a \
                 small Pennsylvania town.",
                "1993",
                &["comedy", "fantasy", "romance"],
                &["Bill Murray", "Andie MacDowell"],
                "7.6",
            ),
            movie(
                "854",
                "The Mask",
                "A meek bank clerk finds an ancient mask that transforms him \
                 into a green-faced trickster.",
                "1994",
                &["comedy", "fantasy"],
                &["Jim Carrey", "Cameron Diaz"],
                "6.9",
            ),
        ])
    }
}

impl DomainAdapter for MovieCatalog {
    fn query(&self, constraints: &Constraints) -> QueryResult {
        // Unconstrained discovery is unsupported, matching the remote API
        // this catalog stands in for.
        if constraints.is_empty() {
            return QueryResult::empty();
        }
        let results: Vec<MovieRecord> = self
            .movies
            .iter()
            .filter(|movie| matches_constraints(movie, constraints))
            .cloned()
            .collect();
        debug!(
            matches = results.len(),
            constrained_slots = constraints.len(),
            "Catalog query"
        );
        QueryResult {
            total: results.len(),
            results,
        }
    }
}

fn matches_constraints(movie: &MovieRecord, constraints: &Constraints) -> bool {
    constraints.iter().all(|(slot, values)| {
        let candidates: Vec<&str> = values.keys().map(String::as_str).collect();
        match slot {
            Slot::Id => candidates.iter().any(|v| movie.id == *v),
            Slot::Title => candidates
                .iter()
                .any(|v| movie.title.eq_ignore_ascii_case(v)),
            Slot::Genres => candidates.iter().any(|wanted| {
                movie
                    .genres
                    .iter()
                    .any(|genre| genre.eq_ignore_ascii_case(wanted))
            }),
            Slot::Cast => candidates.iter().any(|wanted| {
                let wanted = wanted.to_lowercase();
                movie
                    .cast
                    .iter()
                    .any(|name| name.to_lowercase().contains(&wanted))
            }),
            Slot::ReleaseYear => matches_year(movie.release_year.as_deref(), &candidates),
            Slot::Rating => candidates
                .iter()
                .any(|v| movie.rating.as_deref() == Some(*v)),
            Slot::Overview => candidates.iter().any(|v| movie.overview == *v),
            // Control slots never reach the adapter; tolerate them anyway.
            Slot::LookingForSpecific | Slot::MatchCount => true,
        }
    })
}

/// Year values are either exact (`"1986"`) or bounds (`">=1980"`,
/// `"<=1989"`). All bounds must hold; exact values match disjunctively.
fn matches_year(year: Option<&str>, candidates: &[&str]) -> bool {
    let Some(year) = year else {
        return false;
    };
    let bounds: Vec<&str> = candidates
        .iter()
        .copied()
        .filter(|v| v.starts_with(">=") || v.starts_with("<="))
        .collect();
    if !bounds.is_empty() {
        let Ok(year_num) = year.parse::<i32>() else {
            return false;
        };
        return bounds.iter().all(|bound| {
            let limit: i32 = match bound[2..].trim().parse() {
                Ok(n) => n,
                Err(_) => return false,
            };
            if bound.starts_with(">=") {
                year_num >= limit
            } else {
                year_num <= limit
            }
        });
    }
    candidates.iter().any(|v| *v == year)
}
