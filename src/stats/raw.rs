// Raw box-score row loading and normalization.
//
// Reads the per-team extract CSVs written by the scraper: one row per
// entity-appearance, counting stats as integers, inherited rate stats as
// text. A player appears once per team page and once per postseason series,
// so duplicate identities are the normal case and are resolved downstream by
// the aggregator.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One raw batting line. Counting stats only; the inherited AVG/SLG/OBP
/// text is parsed for completeness but discarded by aggregation, which
/// recomputes every rate from summed counts.
#[derive(Debug, Clone)]
pub struct BattingRow {
    pub player: String,
    pub team: String,
    pub g: u32,
    pub pa: u32,
    pub ab: u32,
    pub r: u32,
    pub h: u32,
    pub doubles: u32,
    pub triples: u32,
    pub hr: u32,
    pub tb: u32,
    pub rbi: u32,
    pub sb: u32,
    pub cs: u32,
    pub sh: u32,
    pub sf: u32,
    pub bb: u32,
    pub ibb: u32,
    pub hp: u32,
    pub so: u32,
    pub gdp: u32,
    pub source_avg: f64,
    pub source_slg: f64,
    pub source_obp: f64,
}

/// One raw pitching line. `ip` is in baseball display notation (6.1 = six
/// and one third); the aggregator converts to internal thirds before any
/// arithmetic. `source_era` and `source_pct` carry the inherited rate text
/// mapped through [`parse_rate_token`]; both are discarded by aggregation.
#[derive(Debug, Clone)]
pub struct PitchingRow {
    pub pitcher: String,
    pub team: String,
    pub g: u32,
    pub w: u32,
    pub l: u32,
    pub sv: u32,
    pub hld: u32,
    pub cg: u32,
    pub sho: u32,
    pub bf: u32,
    pub ip: f64,
    pub h: u32,
    pub hr: u32,
    pub bb: u32,
    pub ibb: u32,
    pub hb: u32,
    pub so: u32,
    pub wp: u32,
    pub bk: u32,
    pub r: u32,
    pub er: u32,
    pub source_pct: f64,
    pub source_era: f64,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

// ---------------------------------------------------------------------------
// Sentinel token mapping
// ---------------------------------------------------------------------------

/// Map an inherited rate-stat token to a number before any arithmetic.
///
/// NPB box scores use `----` for an undefined ERA (runs allowed without a
/// recorded out) and a trailing `+` on partial-appearance values; both are
/// deterministic sentinels, never parse failures:
/// `"----"` → ∞, a `+`-suffixed token → its numeric prefix (bare `"+"` → 0),
/// anything unparseable → NaN.
pub fn parse_rate_token(token: &str) -> f64 {
    let t = token.trim();
    if t == "----" {
        return f64::INFINITY;
    }
    if let Some(prefix) = t.strip_suffix('+') {
        return prefix.trim().parse::<f64>().unwrap_or(0.0);
    }
    t.parse::<f64>().unwrap_or(f64::NAN)
}

/// Innings-pitched tokens use the same sentinel rules, but an unusable value
/// collapses to zero innings rather than NaN so it cannot poison sums.
fn parse_ip_token(token: &str) -> f64 {
    let v = parse_rate_token(token);
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Raw CSV serde records (private)
// ---------------------------------------------------------------------------

/// Raw batting CSV row. Field names match the scraper's header row; the
/// trailing empty column the scraper emits (and any future extras) are
/// absorbed via `#[serde(flatten)]`.
#[derive(Debug, Deserialize)]
#[allow(dead_code, non_snake_case)]
struct RawBattingRecord {
    Player: String,
    G: u32,
    PA: u32,
    AB: u32,
    R: u32,
    H: u32,
    #[serde(rename = "2B")]
    Doubles: u32,
    #[serde(rename = "3B")]
    Triples: u32,
    HR: u32,
    TB: u32,
    RBI: u32,
    SB: u32,
    CS: u32,
    SH: u32,
    SF: u32,
    BB: u32,
    IBB: u32,
    HP: u32,
    SO: u32,
    GDP: u32,
    AVG: String,
    SLG: String,
    OBP: String,
    Team: String,
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

/// Raw pitching CSV row. IP and ERA stay text until sentinel mapping.
#[derive(Debug, Deserialize)]
#[allow(dead_code, non_snake_case)]
struct RawPitchingRecord {
    Pitcher: String,
    G: u32,
    W: u32,
    L: u32,
    SV: u32,
    HLD: u32,
    CG: u32,
    SHO: u32,
    PCT: String,
    BF: u32,
    IP: String,
    H: u32,
    HR: u32,
    BB: u32,
    IBB: u32,
    HB: u32,
    SO: u32,
    WP: u32,
    BK: u32,
    R: u32,
    ER: u32,
    ERA: String,
    Team: String,
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_batting_from_reader<R: Read>(rdr: R) -> Result<Vec<BattingRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
    let mut rows = Vec::new();
    for result in reader.deserialize::<RawBattingRecord>() {
        match result {
            Ok(raw) => rows.push(BattingRow {
                player: raw.Player.trim().to_string(),
                team: raw.Team.trim().to_string(),
                g: raw.G,
                pa: raw.PA,
                ab: raw.AB,
                r: raw.R,
                h: raw.H,
                doubles: raw.Doubles,
                triples: raw.Triples,
                hr: raw.HR,
                tb: raw.TB,
                rbi: raw.RBI,
                sb: raw.SB,
                cs: raw.CS,
                sh: raw.SH,
                sf: raw.SF,
                bb: raw.BB,
                ibb: raw.IBB,
                hp: raw.HP,
                so: raw.SO,
                gdp: raw.GDP,
                source_avg: parse_rate_token(&raw.AVG),
                source_slg: parse_rate_token(&raw.SLG),
                source_obp: parse_rate_token(&raw.OBP),
            }),
            Err(e) => {
                warn!("skipping malformed batting row: {}", e);
            }
        }
    }
    Ok(rows)
}

fn load_pitching_from_reader<R: Read>(rdr: R) -> Result<Vec<PitchingRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
    let mut rows = Vec::new();
    for result in reader.deserialize::<RawPitchingRecord>() {
        match result {
            Ok(raw) => rows.push(PitchingRow {
                pitcher: raw.Pitcher.trim().to_string(),
                team: raw.Team.trim().to_string(),
                g: raw.G,
                w: raw.W,
                l: raw.L,
                sv: raw.SV,
                hld: raw.HLD,
                cg: raw.CG,
                sho: raw.SHO,
                bf: raw.BF,
                ip: parse_ip_token(&raw.IP),
                h: raw.H,
                hr: raw.HR,
                bb: raw.BB,
                ibb: raw.IBB,
                hb: raw.HB,
                so: raw.SO,
                wp: raw.WP,
                bk: raw.BK,
                r: raw.R,
                er: raw.ER,
                source_pct: parse_rate_token(&raw.PCT),
                source_era: parse_rate_token(&raw.ERA),
            }),
            Err(e) => {
                warn!("skipping malformed pitching row: {}", e);
            }
        }
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

/// Load raw batting rows from an extract CSV.
pub fn load_batting(path: &Path) -> Result<Vec<BattingRow>, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_batting_from_reader(file).map_err(|e| LoadError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load raw pitching rows from an extract CSV.
pub fn load_pitching(path: &Path) -> Result<Vec<PitchingRow>, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_pitching_from_reader(file).map_err(|e| LoadError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const BATTING_HEADER: &str = "Player,G,PA,AB,R,H,2B,3B,HR,TB,RBI,SB,CS,SH,SF,BB,IBB,HP,SO,GDP,AVG,SLG,OBP,Team";
    const PITCHING_HEADER: &str = "Pitcher,G,W,L,SV,HLD,CG,SHO,PCT,BF,IP,H,HR,BB,IBB,HB,SO,WP,BK,R,ER,ERA,Team";

    // -- Batting rows --

    #[test]
    fn batting_csv_parses() {
        let csv_data = format!(
            "{BATTING_HEADER}\n\
             Sato Teruaki,6,25,22,3,7,2,0,1,12,4,0,0,0,1,2,0,0,5,1,.318,.545,.360,Hanshin Tigers"
        );

        let rows = load_batting_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.player, "Sato Teruaki");
        assert_eq!(row.team, "Hanshin Tigers");
        assert_eq!(row.g, 6);
        assert_eq!(row.pa, 25);
        assert_eq!(row.ab, 22);
        assert_eq!(row.h, 7);
        assert_eq!(row.doubles, 2);
        assert_eq!(row.triples, 0);
        assert_eq!(row.hr, 1);
        assert_eq!(row.tb, 12);
        assert_eq!(row.sf, 1);
        assert_eq!(row.so, 5);
        assert!((row.source_avg - 0.318).abs() < 1e-9);
    }

    #[test]
    fn batting_trailing_empty_column_absorbed() {
        // The scraper terminates every line with a comma, producing an
        // unnamed empty column.
        let csv_data = format!(
            "{BATTING_HEADER},\n\
             Okamoto Kazuma,4,17,15,2,5,1,0,2,12,5,0,0,0,0,2,0,0,3,0,.333,.800,.412,Yomiuri Giants,"
        );

        let rows = load_batting_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].player, "Okamoto Kazuma");
        assert_eq!(rows[0].hr, 2);
    }

    #[test]
    fn malformed_batting_rows_skipped() {
        let csv_data = format!(
            "{BATTING_HEADER}\n\
             Good Row,6,25,22,3,7,2,0,1,12,4,0,0,0,1,2,0,0,5,1,.318,.545,.360,Hanshin Tigers\n\
             Bad Row,not_a_number,25,22,3,7,2,0,1,12,4,0,0,0,1,2,0,0,5,1,.318,.545,.360,Hanshin Tigers\n\
             Another Good,3,10,9,1,2,0,0,0,2,1,0,0,0,0,1,0,0,2,0,.222,.222,.300,Lotte Marines"
        );

        let rows = load_batting_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].player, "Good Row");
        assert_eq!(rows[1].player, "Another Good");
    }

    #[test]
    fn empty_batting_csv_returns_empty_vec() {
        let rows = load_batting_from_reader(BATTING_HEADER.as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    // -- Pitching rows --

    #[test]
    fn pitching_csv_parses_with_display_ip() {
        let csv_data = format!(
            "{PITCHING_HEADER}\n\
             Moinelo Livan,3,1,0,0,1,0,0,1.000,25,6.1,4,0,2,0,0,8,0,0,1,1,1.42,SoftBank Hawks"
        );

        let rows = load_pitching_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.pitcher, "Moinelo Livan");
        assert_eq!(row.team, "SoftBank Hawks");
        assert_eq!(row.bf, 25);
        assert!((row.ip - 6.1).abs() < 1e-9);
        assert_eq!(row.so, 8);
        assert_eq!(row.er, 1);
        assert!((row.source_era - 1.42).abs() < 1e-9);
    }

    #[test]
    fn plus_ip_token_maps_to_zero() {
        // A pitcher who faced batters without recording an out shows "0+".
        let csv_data = format!(
            "{PITCHING_HEADER}\n\
             Short Outing,1,0,1,0,0,0,0,.000,3,0+,2,1,1,0,0,0,0,0,3,3,----,DeNA BayStars"
        );

        let rows = load_pitching_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert!((rows[0].ip - 0.0).abs() < 1e-9);
        // Undefined ERA maps to infinity, never a parse failure.
        assert!(rows[0].source_era.is_infinite());
    }

    #[test]
    fn empty_pitching_csv_returns_empty_vec() {
        let rows = load_pitching_from_reader(PITCHING_HEADER.as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    // -- Sentinel token mapping --

    #[test]
    fn rate_token_sentinels() {
        assert!(parse_rate_token("----").is_infinite());
        assert!((parse_rate_token("+") - 0.0).abs() < 1e-9);
        assert!((parse_rate_token("0+") - 0.0).abs() < 1e-9);
        assert!((parse_rate_token("2+") - 2.0).abs() < 1e-9);
        assert!((parse_rate_token(" 3.40 ") - 3.40).abs() < 1e-9);
        assert!(parse_rate_token("junk").is_nan());
        assert!(parse_rate_token("").is_nan());
    }
}
