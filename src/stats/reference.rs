// Reference-table resolvers: park factors, season FIP constants, and the
// static team→league membership map.
//
// Reference data is versioned by year and loaded once per run. A missing or
// unreadable table degrades the run (one warning, neutral/undefined
// substitutes) instead of aborting it: park factors fall back to NaN per
// entity (1.0 for the synthetic league-average row, which is pinned by its
// caller), the FIP constant falls back to NaN.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::stats::team::LEAGUE_AVERAGE;

// ---------------------------------------------------------------------------
// Park factors
// ---------------------------------------------------------------------------

/// Raw park factor CSV row: Year,League,Team,ParkF.
#[derive(Debug, Deserialize)]
#[allow(dead_code, non_snake_case)]
struct ParkFactorRecord {
    Year: u16,
    League: String,
    Team: String,
    ParkF: f64,
}

/// Park factors for one (year, league), normalized on load so 1.0 is
/// neutral. `None` means the reference file was unavailable.
#[derive(Debug, Clone)]
pub struct ParkFactors {
    factors: Option<HashMap<String, f64>>,
}

impl ParkFactors {
    /// Load and filter the park factor table. A missing or unreadable file
    /// emits a single warning and yields the degraded resolver.
    pub fn load(path: &Path, year: u16, league: &str) -> ParkFactors {
        let file = match std::fs::File::open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(
                    "park factor file {} unavailable ({}); normalized metrics will be blank",
                    path.display(),
                    e
                );
                return ParkFactors { factors: None };
            }
        };
        match Self::from_reader(file, year, league) {
            Ok(pf) => pf,
            Err(e) => {
                warn!(
                    "park factor file {} unreadable ({}); normalized metrics will be blank",
                    path.display(),
                    e
                );
                ParkFactors { factors: None }
            }
        }
    }

    fn from_reader<R: Read>(rdr: R, year: u16, league: &str) -> Result<ParkFactors, csv::Error> {
        let mut reader = csv::Reader::from_reader(rdr);
        let mut factors = HashMap::new();
        for result in reader.deserialize::<ParkFactorRecord>() {
            let record = result?;
            if record.Year != year || record.League != league {
                continue;
            }
            // Raw factors are run-scoring ratios; recenter halfway toward
            // neutral so 1.0 means a neutral park.
            factors.insert(record.Team.trim().to_string(), (record.ParkF + 1.0) / 2.0);
        }
        Ok(ParkFactors {
            factors: Some(factors),
        })
    }

    /// A resolver with no underlying table (degraded mode).
    pub fn unavailable() -> ParkFactors {
        ParkFactors { factors: None }
    }

    /// A resolver over an in-memory map; factors are taken as already
    /// normalized. Used by tests and callers that inject reference data.
    pub fn from_map(factors: HashMap<String, f64>) -> ParkFactors {
        ParkFactors {
            factors: Some(factors),
        }
    }

    /// Resolve the park factor for one team. The synthetic league-average
    /// row is always neutral regardless of the join result; a real team
    /// with no entry degrades to NaN.
    pub fn for_team(&self, team: &str) -> f64 {
        if team == LEAGUE_AVERAGE {
            return 1.0;
        }
        match &self.factors {
            None => f64::NAN,
            Some(map) => match map.get(team) {
                Some(&pf) => pf,
                None => {
                    warn!("no park factor entry for team '{}'", team);
                    f64::NAN
                }
            },
        }
    }
}

// ---------------------------------------------------------------------------
// FIP constants
// ---------------------------------------------------------------------------

/// Raw FIP constant CSV row: Year,League,FIP.
#[derive(Debug, Deserialize)]
#[allow(dead_code, non_snake_case)]
struct FipConstantRecord {
    Year: u16,
    League: String,
    FIP: f64,
}

/// Resolve the season FIP constant for (year, league). Missing file or
/// missing entry warns once and returns NaN, which blanks the FIP family
/// downstream.
pub fn load_fip_constant(path: &Path, year: u16, league: &str) -> f64 {
    let file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(e) => {
            warn!(
                "FIP constant file {} unavailable ({}); FIP metrics will be blank",
                path.display(),
                e
            );
            return f64::NAN;
        }
    };
    match fip_constant_from_reader(file, year, league) {
        Ok(Some(c)) => c,
        Ok(None) => {
            warn!(
                "no FIP constant for year {} league {} in {}; FIP metrics will be blank",
                year,
                league,
                path.display()
            );
            f64::NAN
        }
        Err(e) => {
            warn!(
                "FIP constant file {} unreadable ({}); FIP metrics will be blank",
                path.display(),
                e
            );
            f64::NAN
        }
    }
}

fn fip_constant_from_reader<R: Read>(
    rdr: R,
    year: u16,
    league: &str,
) -> Result<Option<f64>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    for result in reader.deserialize::<FipConstantRecord>() {
        let record = result?;
        if record.Year == year && record.League == league {
            return Ok(Some(record.FIP));
        }
    }
    Ok(None)
}

// ---------------------------------------------------------------------------
// Team → league membership
// ---------------------------------------------------------------------------

/// Static team→league membership for the supported seasons, injected from
/// configuration so it can be versioned per season and tested on its own.
#[derive(Debug, Clone, Default)]
pub struct LeagueMap {
    map: HashMap<String, String>,
}

impl LeagueMap {
    pub fn new(map: HashMap<String, String>) -> LeagueMap {
        LeagueMap { map }
    }

    /// Look up the league for a team. Unknown teams (including the
    /// synthetic league-average row) get no assignment, never an error.
    pub fn league_for(&self, team: &str) -> Option<&str> {
        self.map.get(team).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
