use indexmap::IndexMap;
use tracing::debug;

use crate::geocode::{Coordinates, GeocodeOutcome, Geocoder, resolve_location};
use crate::parser::ParsedRecord;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilmTitle {
    pub name: String,
    pub year_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationEntry {
    pub coordinates: Coordinates,
    pub representative: FilmTitle,
    pub also_filmed: Vec<FilmTitle>,
}

impl LocationEntry {
    pub fn contains(&self, title: &FilmTitle) -> bool {
        self.representative == *title || self.also_filmed.contains(title)
    }

    pub fn film_count(&self) -> usize {
        1 + self.also_filmed.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldOutcome {
    Inserted,
    Appended,
    Unchanged,
    NotFound,
    Unavailable,
}

#[derive(Debug, Default)]
pub struct LocationTable {
    entries: IndexMap<String, LocationEntry>,
}

impl LocationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, location: &str) -> Option<&LocationEntry> {
        self.entries.get(location)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LocationEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn insert(&mut self, location: String, coordinates: Coordinates, title: FilmTitle) {
        self.entries.entry(location).or_insert(LocationEntry {
            coordinates,
            representative: title,
            also_filmed: Vec::new(),
        });
    }

    pub async fn fold<G: Geocoder>(&mut self, record: ParsedRecord, geocoder: &G) -> FoldOutcome {
        let ParsedRecord {
            name,
            year_text,
            location,
        } = record;
        let title = FilmTitle { name, year_text };

        if let Some(entry) = self.entries.get_mut(&location) {
            if entry.contains(&title) {
                return FoldOutcome::Unchanged;
            }
            entry.also_filmed.push(title);
            return FoldOutcome::Appended;
        }

        match resolve_location(geocoder, &location).await {
            GeocodeOutcome::Found(place) => {
                self.insert(location, place.coordinates, title);
                FoldOutcome::Inserted
            }
            GeocodeOutcome::NotFound => {
                debug!(location = %location, "skipping location: no geocoding result");
                FoldOutcome::NotFound
            }
            GeocodeOutcome::Unavailable => {
                debug!(location = %location, "skipping location: geocoder unavailable");
                FoldOutcome::Unavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::tests::{TableGeocoder, found};

    fn record(name: &str, year: &str, location: &str) -> ParsedRecord {
        ParsedRecord {
            name: name.to_string(),
            year_text: year.to_string(),
            location: location.to_string(),
        }
    }

    #[tokio::test]
    async fn first_record_becomes_representative() {
        let geocoder = TableGeocoder::default().with("Lviv, Ukraine", found(49.841952, 24.0315921));
        let mut table = LocationTable::new();

        let outcome = table.fold(record("Film A", "2011", "Lviv, Ukraine"), &geocoder).await;
        assert_eq!(outcome, FoldOutcome::Inserted);

        let entry = table.get("Lviv, Ukraine").unwrap();
        assert_eq!(entry.coordinates, Coordinates::new(49.841952, 24.0315921));
        assert_eq!(entry.representative.name, "Film A");
        assert_eq!(entry.film_count(), 1);
    }

    #[tokio::test]
    async fn folding_same_record_twice_is_idempotent() {
        let geocoder = TableGeocoder::default().with("Lviv, Ukraine", found(49.8, 24.0));
        let mut table = LocationTable::new();
        table.fold(record("Film A", "2011", "Lviv, Ukraine"), &geocoder).await;
        let before = table.get("Lviv, Ukraine").cloned();

        let outcome = table.fold(record("Film A", "2011", "Lviv, Ukraine"), &geocoder).await;
        assert_eq!(outcome, FoldOutcome::Unchanged);
        assert_eq!(table.get("Lviv, Ukraine").cloned(), before);
        assert_eq!(table.len(), 1);
        assert_eq!(geocoder.call_count(), 1);
    }

    #[tokio::test]
    async fn additional_films_do_not_replace_representative() {
        let geocoder = TableGeocoder::default().with("Lviv, Ukraine", found(49.8, 24.0));
        let mut table = LocationTable::new();
        table.fold(record("Film A", "2011", "Lviv, Ukraine"), &geocoder).await;

        let outcome = table.fold(record("Film B", "2011", "Lviv, Ukraine"), &geocoder).await;
        assert_eq!(outcome, FoldOutcome::Appended);

        let entry = table.get("Lviv, Ukraine").unwrap();
        assert_eq!(entry.representative.name, "Film A");
        assert_eq!(entry.film_count(), 2);
        assert_eq!(geocoder.call_count(), 1);
    }

    #[tokio::test]
    async fn ungeocodable_locations_are_skipped() {
        let geocoder = TableGeocoder::default().with("Atlantis", GeocodeOutcome::Unavailable);
        let mut table = LocationTable::new();

        let outcome = table.fold(record("Film A", "2011", "Atlantis"), &geocoder).await;
        assert_eq!(outcome, FoldOutcome::Unavailable);
        let outcome = table.fold(record("Film B", "2011", "Mu, Pacific"), &geocoder).await;
        assert_eq!(outcome, FoldOutcome::NotFound);
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn table_keeps_insertion_order() {
        let geocoder = TableGeocoder::default()
            .with("Zagreb, Croatia", found(45.8, 16.0))
            .with("Athens, Greece", found(37.9, 23.7));
        let mut table = LocationTable::new();
        table.fold(record("Z", "2011", "Zagreb, Croatia"), &geocoder).await;
        table.fold(record("A", "2011", "Athens, Greece"), &geocoder).await;

        let keys: Vec<&str> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Zagreb, Croatia", "Athens, Greece"]);
    }
}
