//! Weather-station metadata as served by the archive's `locations.xml` query.

use std::fmt;

/// The archive's four station classes, keyed by the numeric codes it uses in
/// the `type=` query parameter and station records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StationKind {
    Rainfall,
    Climatological,
    Main,
    Automatic,
}

impl StationKind {
    pub const ALL: [StationKind; 4] = [
        StationKind::Rainfall,
        StationKind::Climatological,
        StationKind::Main,
        StationKind::Automatic,
    ];

    pub fn code(&self) -> u8 {
        match self {
            StationKind::Rainfall => 1,
            StationKind::Climatological => 2,
            StationKind::Main => 3,
            StationKind::Automatic => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.code() == code)
    }

    pub fn label(&self) -> &'static str {
        match self {
            StationKind::Rainfall => "Rainfall station",
            StationKind::Climatological => "Climatological station",
            StationKind::Main => "Main station",
            StationKind::Automatic => "Automatic station",
        }
    }

    /// Parses the catalog's station-type field, which shows up both as a comma
    /// list (`"1,2"`) and as a compact digit run (`"12"`). Returns the first
    /// offending character on anything else.
    pub(crate) fn parse_set(raw: &str) -> Result<Vec<StationKind>, char> {
        let mut out = Vec::new();
        for c in raw.chars() {
            if c == ',' || c.is_whitespace() {
                continue;
            }
            let kind = c
                .to_digit(10)
                .and_then(|d| u8::try_from(d).ok())
                .and_then(StationKind::from_code)
                .ok_or(c)?;
            if !out.contains(&kind) {
                out.push(kind);
            }
        }
        Ok(out)
    }
}

impl fmt::Display for StationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One station from a `locations.xml` response. The station list depends on
/// the queried period and type filter; it is not a fixed registry.
#[derive(Debug, Clone, PartialEq)]
pub struct StationDescriptor {
    pub id: String,
    pub name: String,
    pub lon: f64,
    pub lat: f64,
    pub altitude: Option<f64>,
    pub kind: StationKind,
}

#[cfg(test)]
mod tests {
    use super::StationKind;

    #[test]
    fn code_round_trip() {
        for kind in StationKind::ALL {
            assert_eq!(StationKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(StationKind::from_code(0), None);
        assert_eq!(StationKind::from_code(5), None);
    }

    #[test]
    fn parse_set_accepts_both_field_formats() {
        assert_eq!(
            StationKind::parse_set("1,2,3").unwrap(),
            vec![
                StationKind::Rainfall,
                StationKind::Climatological,
                StationKind::Main
            ]
        );
        assert_eq!(
            StationKind::parse_set("24").unwrap(),
            vec![StationKind::Climatological, StationKind::Automatic]
        );
        assert_eq!(StationKind::parse_set("").unwrap(), vec![]);
    }

    #[test]
    fn parse_set_dedups() {
        assert_eq!(
            StationKind::parse_set("2,2").unwrap(),
            vec![StationKind::Climatological]
        );
    }

    #[test]
    fn parse_set_rejects_unknown_codes() {
        assert_eq!(StationKind::parse_set("1,9"), Err('9'));
        assert_eq!(StationKind::parse_set("x"), Err('x'));
    }
}
