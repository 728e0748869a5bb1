use super::{haversine_km, Coordinate};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct City {
    pub name: &'static str,
    pub coordinate: Coordinate,
}

const fn city(name: &'static str, latitude: f64, longitude: f64) -> City {
    City {
        name,
        coordinate: Coordinate::new_unchecked(latitude, longitude),
    }
}

/// Cities offered for manual selection. The first entry is the default location.
pub const CITIES: &[City] = &[
    city("Bath", 51.383741, -2.377120),
    city("London", 51.507351, -0.127758),
    city("New York", 40.712776, -74.005974),
    city("Los Angeles", 34.052235, -118.243683),
    city("Reykjavik", 64.146582, -21.942635),
    city("Paris", 48.856614, 2.352222),
    city("Cairo", 30.044420, 31.235712),
    city("Nairobi", -1.292066, 36.821946),
    city("Mumbai", 19.075984, 72.877656),
    city("Singapore", 1.352083, 103.819836),
    city("Tokyo", 35.689487, 139.691706),
    city("Sydney", -33.868820, 151.209296),
    city("Buenos Aires", -34.603684, -58.381559),
    city("Anchorage", 61.218056, -149.900284),
];

pub fn default_city() -> &'static City {
    &CITIES[0]
}

pub fn find_city(name: &str) -> Option<&'static City> {
    let name = name.trim();
    CITIES.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

pub fn find_nearest_city(to: Coordinate) -> (&'static City, f64) {
    CITIES
        .iter()
        .map(|c| (c, haversine_km(c.coordinate, to)))
        .fold((default_city(), f64::INFINITY), |best, candidate| {
            if candidate.1 < best.1 {
                candidate
            } else {
                best
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_first() {
        assert_eq!(default_city().name, "Bath");
        assert_eq!(default_city().coordinate.latitude(), 51.383741);
        assert_eq!(default_city().coordinate.longitude(), -2.377120);
    }

    #[test]
    fn test_catalog_coordinates_are_valid() {
        for c in CITIES {
            let checked = Coordinate::new(c.coordinate.latitude(), c.coordinate.longitude());
            assert_eq!(checked, Some(c.coordinate), "{}", c.name);
        }
    }

    #[test]
    fn test_find_city_ignores_case() {
        assert_eq!(find_city("tokyo").map(|c| c.name), Some("Tokyo"));
        assert_eq!(find_city("  New York ").map(|c| c.name), Some("New York"));
        assert!(find_city("Atlantis").is_none());
    }

    #[test]
    fn test_exact_match_is_nearest_at_zero() {
        for c in CITIES {
            let (nearest, km) = find_nearest_city(c.coordinate);
            assert_eq!(nearest.name, c.name);
            assert_eq!(km, 0.0);
        }
    }

    #[test]
    fn test_nearest_picks_neighbour() {
        // Bristol
        let (nearest, km) = find_nearest_city(Coordinate::new(51.4545, -2.5879).unwrap());
        assert_eq!(nearest.name, "Bath");
        assert!(km < 20.0, "{km}");

        // Yokohama
        let (nearest, _) = find_nearest_city(Coordinate::new(35.4437, 139.6380).unwrap());
        assert_eq!(nearest.name, "Tokyo");
    }
}
