//! Shared Star Wars fixtures.
//!
//! Use these for tests that only need a realistic schema. When the schema
//! shape is what a test is about, prefer an inline SDL string so the test
//! stays self-documenting.

use graphql_dsl::{DateTimeScalar, DslSchema};
use serde_json::{json, Value};

/// The Star Wars schema used across the DSL tests.
///
/// `Character` is an interface implemented by `Human` and `Droid`; `date`
/// echoes a custom `DateTime` scalar.
pub const STARWARS_SCHEMA: &str = r#"
"""One of the films in the Star Wars Trilogy"""
enum Episode {
  NEWHOPE
  EMPIRE
  JEDI
}

scalar DateTime

interface Character {
  id: String!
  name: String
  friends: [Character]
  appearsIn: [Episode]
}

type Human implements Character {
  id: String!
  name: String
  friends: [Character]
  appearsIn: [Episode]
  homePlanet: String
}

type Droid implements Character {
  id: String!
  name: String
  friends: [Character]
  appearsIn: [Episode]
  primaryFunction: String
}

type Review {
  episode: Episode
  stars: Int!
  commentary: String
}

input ReviewInput {
  stars: Int!
  commentary: String
}

type Query {
  hero(episode: Episode): Character
  human(id: String!): Human
  droid(id: String!): Droid
  humans(ids: [String!]!): [Human]
  date(date: DateTime): DateTime
}

type Mutation {
  createReview(episode: Episode, review: ReviewInput!): Review
}
"#;

/// [`STARWARS_SCHEMA`] wrapped in a [`DslSchema`] with `DateTime` registered.
///
/// # Panics
///
/// Panics if the fixture SDL fails validation.
#[must_use]
pub fn starwars_schema() -> DslSchema {
    DslSchema::builder_from_sdl(STARWARS_SCHEMA)
        .expect("Star Wars fixture schema is valid")
        .scalar("DateTime", DateTimeScalar)
        .build()
}

/// Response data for `hero { name }` with R2-D2 as the hero.
#[must_use]
pub fn r2d2_hero() -> Value {
    json!({
        "hero": {
            "__typename": "Droid",
            "name": "R2-D2"
        }
    })
}

/// Luke Skywalker as returned for `human(id: "1000")`, with every field set.
#[must_use]
pub fn luke() -> Value {
    json!({
        "__typename": "Human",
        "id": "1000",
        "name": "Luke Skywalker",
        "homePlanet": "Tatooine",
        "appearsIn": ["NEWHOPE", "EMPIRE", "JEDI"],
        "friends": [
            {"__typename": "Human", "name": "Han Solo"},
            {"__typename": "Human", "name": "Leia Organa"},
            {"__typename": "Droid", "name": "C-3PO"},
            {"__typename": "Droid", "name": "R2-D2"}
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starwars_schema_builds() {
        let dsl = starwars_schema();
        assert!(dsl.ty("Character").is_ok());
        assert!(dsl.ty("Human").is_ok());
        assert!(dsl.mutation().is_ok());
        assert!(dsl.context().scalars().contains("DateTime"));
    }
}
