use crate::constants::EARTH_RADIUS_KM;
use crate::export::TableRow;
use crate::geocode::Coordinates;

#[derive(Debug, Clone, PartialEq)]
pub struct RankedRow {
    pub name: String,
    pub year: String,
    pub lat: f64,
    pub lon: f64,
    pub dist: f64,
}

pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lon = (b.lon - a.lon).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

pub fn rank_by_distance(rows: Vec<TableRow>, user: Coordinates) -> Vec<RankedRow> {
    let mut ranked: Vec<RankedRow> = rows
        .into_iter()
        .map(|row| {
            let dist = haversine_km(Coordinates::new(row.lat, row.lon), user);
            RankedRow {
                name: row.name,
                year: row.year,
                lat: row.lat,
                lon: row.lon,
                dist,
            }
        })
        .collect();
    ranked.sort_by(|a, b| a.dist.total_cmp(&b.dist));
    ranked
}

pub fn nearest(ranked: &[RankedRow], limit: usize) -> &[RankedRow] {
    &ranked[..ranked.len().min(limit)]
}

#[cfg(test)]
mod tests {
    use super::*;

    const LVIV: Coordinates = Coordinates {
        lat: 49.841952,
        lon: 24.0315921,
    };
    const KYIV: Coordinates = Coordinates {
        lat: 50.431759,
        lon: 30.517023,
    };

    fn row(name: &str, lat: f64, lon: f64) -> TableRow {
        TableRow {
            name: name.to_string(),
            year: "2011".to_string(),
            lat,
            lon,
        }
    }

    #[test]
    fn lviv_to_kyiv() {
        let d = haversine_km(LVIV, KYIV);
        assert!((d - 466.70).abs() < 0.5, "got {d}");
        assert!((haversine_km(KYIV, LVIV) - d).abs() < 1e-9);
        assert_eq!(haversine_km(LVIV, LVIV), 0.0);
    }

    #[test]
    fn rows_sorted_ascending_by_distance() {
        let user = Coordinates::new(0.0, 0.0);
        // Roughly 800, 50, 12000 and 3 km east of the user along the equator.
        let km_per_degree = 2.0 * std::f64::consts::PI * EARTH_RADIUS_KM / 360.0;
        let rows = vec![
            row("eight hundred", 0.0, 800.0 / km_per_degree),
            row("fifty", 0.0, 50.0 / km_per_degree),
            row("twelve thousand", 0.0, 12000.0 / km_per_degree),
            row("three", 0.0, 3.0 / km_per_degree),
        ];
        let ranked = rank_by_distance(rows, user);
        let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["three", "fifty", "eight hundred", "twelve thousand"]);
        assert!((ranked[0].dist - 3.0).abs() < 1e-6);
        assert!((ranked[3].dist - 12000.0).abs() < 1e-6);
    }

    #[test]
    fn ties_keep_row_order() {
        let user = Coordinates::new(0.0, 0.0);
        let rows = vec![row("north", 1.0, 0.0), row("south", -1.0, 0.0), row("here", 0.0, 0.0)];
        let ranked = rank_by_distance(rows, user);
        let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["here", "north", "south"]);
    }

    #[test]
    fn nearest_truncates_without_padding() {
        let user = Coordinates::new(0.0, 0.0);
        let ranked = rank_by_distance(vec![row("a", 1.0, 1.0), row("b", 2.0, 2.0)], user);
        assert_eq!(nearest(&ranked, 10).len(), 2);
        assert_eq!(nearest(&ranked, 1)[0].name, "a");
        assert!(nearest(&[], 10).is_empty());
    }
}
