// Pipeline orchestration.
//
// The phase order is load-bearing: the league context must be complete
// before any per-entity derivation because every normalized metric reads
// its baselines, and the context must be built from exactly the filtered
// entity set that is later normalized against it.

use std::collections::HashMap;

use tracing::info;

use crate::config::Config;
use crate::stats::aggregate::{
    aggregate_batting, aggregate_pitching, filter_qualified_batters, filter_qualified_pitchers,
};
use crate::stats::batting::{derive_batting, BattingEntity};
use crate::stats::format::{
    batting_publication, pitching_publication, team_batting_publication,
    team_pitching_publication, BattingPublication, PitchingPublication, TeamBattingPublication,
    TeamPitchingPublication,
};
use crate::stats::league::{batting_context, pitching_context};
use crate::stats::pitching::{derive_pitching, PitchingEntity};
use crate::stats::raw::{self, BattingRow, LoadError, PitchingRow};
use crate::stats::reference::{load_fip_constant, LeagueMap, ParkFactors};
use crate::stats::team::{derive_team_batting, derive_team_pitching};

// ---------------------------------------------------------------------------
// Inputs and outputs
// ---------------------------------------------------------------------------

/// Reference data resolved once per run. Degraded resolvers (missing files)
/// are valid inputs; they blank the normalized metrics without failing.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub park: ParkFactors,
    pub fip_constant: f64,
    pub leagues: LeagueMap,
}

/// All four publication tables produced by one run.
#[derive(Debug, Clone)]
pub struct PublicationTables {
    pub batting: Vec<BattingPublication>,
    pub pitching: Vec<PitchingPublication>,
    pub team_batting: Vec<TeamBattingPublication>,
    pub team_pitching: Vec<TeamPitchingPublication>,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("failed to load raw rows: {0}")]
    Load(#[from] LoadError),
}

// ---------------------------------------------------------------------------
// Derivation over in-memory rows
// ---------------------------------------------------------------------------

/// Run the full derivation over already-loaded raw rows. This is the whole
/// engine; `run` is a thin file-loading wrapper around it.
pub fn derive_tables(
    batting_rows: &[BattingRow],
    pitching_rows: &[PitchingRow],
    refs: &ReferenceData,
) -> PublicationTables {
    // ---- 1. Aggregate duplicate identities ----
    let batters = aggregate_batting(batting_rows);
    let pitchers = aggregate_pitching(pitching_rows);

    // ---- 2. Drop zero-PA / zero-IP entities ----
    let batters = filter_qualified_batters(batters);
    let pitchers = filter_qualified_pitchers(pitchers);
    info!(
        "aggregated {} qualified batters, {} qualified pitchers",
        batters.len(),
        pitchers.len()
    );

    // ---- 3. League context from the filtered sets ----
    let batting_ctx = batting_context(&batters);
    let pitching_ctx = pitching_context(&pitchers, refs.fip_constant);

    // ---- 4. Per-entity derivation ----
    // Park factors resolve once per distinct team so a missing entry warns
    // once, not once per player.
    let mut park_by_team: HashMap<String, f64> = HashMap::new();
    let mut park_for = |team: &str| -> f64 {
        if let Some(&pf) = park_by_team.get(team) {
            return pf;
        }
        let pf = refs.park.for_team(team);
        park_by_team.insert(team.to_string(), pf);
        pf
    };

    let batter_entities: Vec<BattingEntity> = batters
        .into_iter()
        .map(|b| {
            let pf = park_for(&b.team);
            BattingEntity {
                derived: derive_batting(&b.counts, &batting_ctx, pf),
                player: b.player,
                team: b.team,
                counts: b.counts,
            }
        })
        .collect();

    let pitcher_entities: Vec<PitchingEntity> = pitchers
        .into_iter()
        .map(|p| {
            let pf = park_for(&p.team);
            PitchingEntity {
                derived: derive_pitching(&p.counts, &pitching_ctx, pf, refs.fip_constant),
                pitcher: p.pitcher,
                team: p.team,
                counts: p.counts,
            }
        })
        .collect();

    // ---- 5. Team rollups + synthetic league-average rows ----
    let team_batting = derive_team_batting(&batter_entities, &batting_ctx, &refs.park);
    let team_pitching = derive_team_pitching(
        &pitcher_entities,
        &pitching_ctx,
        &refs.park,
        refs.fip_constant,
    );

    // ---- 6. Format for publication ----
    PublicationTables {
        batting: batting_publication(&batter_entities, &refs.leagues),
        pitching: pitching_publication(&pitcher_entities, &refs.leagues),
        team_batting: team_batting_publication(&team_batting, &refs.leagues),
        team_pitching: team_pitching_publication(&team_pitching, &refs.leagues),
    }
}

// ---------------------------------------------------------------------------
// File-backed entry point
// ---------------------------------------------------------------------------

/// Load reference tables according to the config. Missing files degrade
/// with a warning each.
pub fn load_references(config: &Config) -> ReferenceData {
    let year = config.season.year;
    let league = &config.season.league;
    ReferenceData {
        park: ParkFactors::load(&config.park_factor_path(), year, league),
        fip_constant: load_fip_constant(&config.fip_constant_path(), year, league),
        leagues: LeagueMap::new(config.teams.clone()),
    }
}

/// Load the raw extracts named by the config, resolve reference data, and
/// run the derivation.
pub fn run(config: &Config) -> Result<PublicationTables, PipelineError> {
    let batting_rows = raw::load_batting(&config.raw_batting_path())?;
    let pitching_rows = raw::load_pitching(&config.raw_pitching_path())?;
    info!(
        "loaded {} raw batting rows, {} raw pitching rows",
        batting_rows.len(),
        pitching_rows.len()
    );

    let refs = load_references(config);
    Ok(derive_tables(&batting_rows, &pitching_rows, &refs))
}
