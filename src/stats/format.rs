// Final formatting and sanitation.
//
// The derivation stages leave degenerate arithmetic as NaN/∞ inside f64;
// this is the only place those values become text. Each metric has a fixed
// format and a degenerate policy: most blank out, ERA+ caps at the 999
// sentinel, and BB/K renders the conventional "1.00" when a batter walked
// without ever striking out. Column selection and ordering here define the
// publication schema.

use serde::Serialize;

use crate::stats::batting::BattingEntity;
use crate::stats::innings;
use crate::stats::pitching::PitchingEntity;
use crate::stats::reference::LeagueMap;
use crate::stats::team::{TeamBatting, TeamPitching};

// ---------------------------------------------------------------------------
// Per-metric formatting policies
// ---------------------------------------------------------------------------

/// Three-decimal rate (AVG, OBP, SLG, OPS, ISO, BABIP). Degenerate → blank.
fn fixed3(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.3}")
    } else {
        String::new()
    }
}

/// Two-decimal rate (ERA, FIP, kwERA, WHIP, Diff). Degenerate → blank.
fn fixed2(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.2}")
    } else {
        String::new()
    }
}

/// Normalized index (OPS+, FIP-, kwERA-), rounded to a whole number.
/// Degenerate → blank.
fn index(v: f64) -> String {
    if v.is_finite() {
        format!("{:.0}", v.round())
    } else {
        String::new()
    }
}

/// ERA+ rendering: an infinite ratio (zero or undefined ERA) caps at the
/// 999 sentinel; an undefined ratio (missing reference data) blanks.
fn era_plus(v: f64) -> String {
    if v.is_infinite() {
        "999".to_string()
    } else {
        index(v)
    }
}

/// BB/K rendering: walks without a strikeout display as the conventional
/// "1.00", never "inf"; the 0/0 case blanks.
fn bb_per_k(v: f64) -> String {
    if v.is_infinite() {
        "1.00".to_string()
    } else {
        fixed2(v)
    }
}

/// One-decimal percentage (K%, BB%, TTO%, HR%, K-BB%). Degenerate → blank.
fn percent1(v: f64) -> String {
    if v.is_finite() {
        format!("{:.1}%", v * 100.0)
    } else {
        String::new()
    }
}

fn league_cell(leagues: &LeagueMap, team: &str) -> String {
    leagues.league_for(team).unwrap_or_default().to_string()
}

// ---------------------------------------------------------------------------
// Publication row schemas
// ---------------------------------------------------------------------------

/// Final batting publication row. Field order is the column order.
#[derive(Debug, Clone, Serialize)]
pub struct BattingPublication {
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "G")]
    pub g: u32,
    #[serde(rename = "PA")]
    pub pa: u32,
    #[serde(rename = "AB")]
    pub ab: u32,
    #[serde(rename = "R")]
    pub r: u32,
    #[serde(rename = "H")]
    pub h: u32,
    #[serde(rename = "2B")]
    pub doubles: u32,
    #[serde(rename = "3B")]
    pub triples: u32,
    #[serde(rename = "HR")]
    pub hr: u32,
    #[serde(rename = "TB")]
    pub tb: u32,
    #[serde(rename = "RBI")]
    pub rbi: u32,
    #[serde(rename = "SB")]
    pub sb: u32,
    #[serde(rename = "CS")]
    pub cs: u32,
    #[serde(rename = "SH")]
    pub sh: u32,
    #[serde(rename = "SF")]
    pub sf: u32,
    #[serde(rename = "SO")]
    pub so: u32,
    #[serde(rename = "BB")]
    pub bb: u32,
    #[serde(rename = "IBB")]
    pub ibb: u32,
    #[serde(rename = "HP")]
    pub hp: u32,
    #[serde(rename = "GDP")]
    pub gdp: u32,
    #[serde(rename = "AVG")]
    pub avg: String,
    #[serde(rename = "OBP")]
    pub obp: String,
    #[serde(rename = "SLG")]
    pub slg: String,
    #[serde(rename = "OPS")]
    pub ops: String,
    #[serde(rename = "OPS+")]
    pub ops_plus: String,
    #[serde(rename = "ISO")]
    pub iso: String,
    #[serde(rename = "BABIP")]
    pub babip: String,
    #[serde(rename = "TTO%")]
    pub tto_pct: String,
    #[serde(rename = "K%")]
    pub k_pct: String,
    #[serde(rename = "BB%")]
    pub bb_pct: String,
    #[serde(rename = "BB/K")]
    pub bb_per_k: String,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "League")]
    pub league: String,
}

/// Final pitching publication row. HLD, PCT and BK from the raw schema are
/// not published.
#[derive(Debug, Clone, Serialize)]
pub struct PitchingPublication {
    #[serde(rename = "Pitcher")]
    pub pitcher: String,
    #[serde(rename = "G")]
    pub g: u32,
    #[serde(rename = "W")]
    pub w: u32,
    #[serde(rename = "L")]
    pub l: u32,
    #[serde(rename = "SV")]
    pub sv: u32,
    #[serde(rename = "CG")]
    pub cg: u32,
    #[serde(rename = "SHO")]
    pub sho: u32,
    #[serde(rename = "BF")]
    pub bf: u32,
    #[serde(rename = "IP")]
    pub ip: String,
    #[serde(rename = "H")]
    pub h: u32,
    #[serde(rename = "HR")]
    pub hr: u32,
    #[serde(rename = "SO")]
    pub so: u32,
    #[serde(rename = "BB")]
    pub bb: u32,
    #[serde(rename = "IBB")]
    pub ibb: u32,
    #[serde(rename = "HB")]
    pub hb: u32,
    #[serde(rename = "WP")]
    pub wp: u32,
    #[serde(rename = "R")]
    pub r: u32,
    #[serde(rename = "ER")]
    pub er: u32,
    #[serde(rename = "ERA")]
    pub era: String,
    #[serde(rename = "FIP")]
    pub fip: String,
    #[serde(rename = "kwERA")]
    pub kw_era: String,
    #[serde(rename = "WHIP")]
    pub whip: String,
    #[serde(rename = "ERA+")]
    pub era_plus: String,
    #[serde(rename = "FIP-")]
    pub fip_minus: String,
    #[serde(rename = "kwERA-")]
    pub kw_era_minus: String,
    #[serde(rename = "Diff")]
    pub diff: String,
    #[serde(rename = "HR%")]
    pub hr_pct: String,
    #[serde(rename = "K%")]
    pub k_pct: String,
    #[serde(rename = "BB%")]
    pub bb_pct: String,
    #[serde(rename = "K-BB%")]
    pub k_bb_pct: String,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "League")]
    pub league: String,
}

/// Team batting publication row: the identity column is the team itself.
#[derive(Debug, Clone, Serialize)]
pub struct TeamBattingPublication {
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "G")]
    pub g: u32,
    #[serde(rename = "PA")]
    pub pa: u32,
    #[serde(rename = "AB")]
    pub ab: u32,
    #[serde(rename = "R")]
    pub r: u32,
    #[serde(rename = "H")]
    pub h: u32,
    #[serde(rename = "2B")]
    pub doubles: u32,
    #[serde(rename = "3B")]
    pub triples: u32,
    #[serde(rename = "HR")]
    pub hr: u32,
    #[serde(rename = "TB")]
    pub tb: u32,
    #[serde(rename = "RBI")]
    pub rbi: u32,
    #[serde(rename = "SB")]
    pub sb: u32,
    #[serde(rename = "CS")]
    pub cs: u32,
    #[serde(rename = "SH")]
    pub sh: u32,
    #[serde(rename = "SF")]
    pub sf: u32,
    #[serde(rename = "SO")]
    pub so: u32,
    #[serde(rename = "BB")]
    pub bb: u32,
    #[serde(rename = "IBB")]
    pub ibb: u32,
    #[serde(rename = "HP")]
    pub hp: u32,
    #[serde(rename = "GDP")]
    pub gdp: u32,
    #[serde(rename = "AVG")]
    pub avg: String,
    #[serde(rename = "OBP")]
    pub obp: String,
    #[serde(rename = "SLG")]
    pub slg: String,
    #[serde(rename = "OPS")]
    pub ops: String,
    #[serde(rename = "OPS+")]
    pub ops_plus: String,
    #[serde(rename = "ISO")]
    pub iso: String,
    #[serde(rename = "BABIP")]
    pub babip: String,
    #[serde(rename = "TTO%")]
    pub tto_pct: String,
    #[serde(rename = "K%")]
    pub k_pct: String,
    #[serde(rename = "BB%")]
    pub bb_pct: String,
    #[serde(rename = "BB/K")]
    pub bb_per_k: String,
    #[serde(rename = "League")]
    pub league: String,
}

/// Team pitching publication row.
#[derive(Debug, Clone, Serialize)]
pub struct TeamPitchingPublication {
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "G")]
    pub g: u32,
    #[serde(rename = "W")]
    pub w: u32,
    #[serde(rename = "L")]
    pub l: u32,
    #[serde(rename = "SV")]
    pub sv: u32,
    #[serde(rename = "CG")]
    pub cg: u32,
    #[serde(rename = "SHO")]
    pub sho: u32,
    #[serde(rename = "BF")]
    pub bf: u32,
    #[serde(rename = "IP")]
    pub ip: String,
    #[serde(rename = "H")]
    pub h: u32,
    #[serde(rename = "HR")]
    pub hr: u32,
    #[serde(rename = "SO")]
    pub so: u32,
    #[serde(rename = "BB")]
    pub bb: u32,
    #[serde(rename = "IBB")]
    pub ibb: u32,
    #[serde(rename = "HB")]
    pub hb: u32,
    #[serde(rename = "WP")]
    pub wp: u32,
    #[serde(rename = "R")]
    pub r: u32,
    #[serde(rename = "ER")]
    pub er: u32,
    #[serde(rename = "ERA")]
    pub era: String,
    #[serde(rename = "FIP")]
    pub fip: String,
    #[serde(rename = "kwERA")]
    pub kw_era: String,
    #[serde(rename = "WHIP")]
    pub whip: String,
    #[serde(rename = "ERA+")]
    pub era_plus: String,
    #[serde(rename = "FIP-")]
    pub fip_minus: String,
    #[serde(rename = "kwERA-")]
    pub kw_era_minus: String,
    #[serde(rename = "Diff")]
    pub diff: String,
    #[serde(rename = "HR%")]
    pub hr_pct: String,
    #[serde(rename = "K%")]
    pub k_pct: String,
    #[serde(rename = "BB%")]
    pub bb_pct: String,
    #[serde(rename = "K-BB%")]
    pub k_bb_pct: String,
    #[serde(rename = "League")]
    pub league: String,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn batting_publication(
    entities: &[BattingEntity],
    leagues: &LeagueMap,
) -> Vec<BattingPublication> {
    entities
        .iter()
        .map(|e| BattingPublication {
            player: e.player.clone(),
            g: e.counts.g,
            pa: e.counts.pa,
            ab: e.counts.ab,
            r: e.counts.r,
            h: e.counts.h,
            doubles: e.counts.doubles,
            triples: e.counts.triples,
            hr: e.counts.hr,
            tb: e.counts.tb,
            rbi: e.counts.rbi,
            sb: e.counts.sb,
            cs: e.counts.cs,
            sh: e.counts.sh,
            sf: e.counts.sf,
            so: e.counts.so,
            bb: e.counts.bb,
            ibb: e.counts.ibb,
            hp: e.counts.hp,
            gdp: e.counts.gdp,
            avg: fixed3(e.derived.avg),
            obp: fixed3(e.derived.obp),
            slg: fixed3(e.derived.slg),
            ops: fixed3(e.derived.ops),
            ops_plus: index(e.derived.ops_plus),
            iso: fixed3(e.derived.iso),
            babip: fixed3(e.derived.babip),
            tto_pct: percent1(e.derived.tto_rate),
            k_pct: percent1(e.derived.k_rate),
            bb_pct: percent1(e.derived.bb_rate),
            bb_per_k: bb_per_k(e.derived.bb_per_k),
            team: e.team.clone(),
            league: league_cell(leagues, &e.team),
        })
        .collect()
}

pub fn pitching_publication(
    entities: &[PitchingEntity],
    leagues: &LeagueMap,
) -> Vec<PitchingPublication> {
    entities
        .iter()
        .map(|e| PitchingPublication {
            pitcher: e.pitcher.clone(),
            g: e.counts.g,
            w: e.counts.w,
            l: e.counts.l,
            sv: e.counts.sv,
            cg: e.counts.cg,
            sho: e.counts.sho,
            bf: e.counts.bf,
            ip: innings::format_ip(e.counts.ip),
            h: e.counts.h,
            hr: e.counts.hr,
            so: e.counts.so,
            bb: e.counts.bb,
            ibb: e.counts.ibb,
            hb: e.counts.hb,
            wp: e.counts.wp,
            r: e.counts.r,
            er: e.counts.er,
            era: fixed2(e.derived.era),
            fip: fixed2(e.derived.fip),
            kw_era: fixed2(e.derived.kw_era),
            whip: fixed2(e.derived.whip),
            era_plus: era_plus(e.derived.era_plus),
            fip_minus: index(e.derived.fip_minus),
            kw_era_minus: index(e.derived.kw_era_minus),
            diff: fixed2(e.derived.diff),
            hr_pct: percent1(e.derived.hr_rate),
            k_pct: percent1(e.derived.k_rate),
            bb_pct: percent1(e.derived.bb_rate),
            k_bb_pct: percent1(e.derived.k_bb_rate),
            team: e.team.clone(),
            league: league_cell(leagues, &e.team),
        })
        .collect()
}

pub fn team_batting_publication(
    teams: &[TeamBatting],
    leagues: &LeagueMap,
) -> Vec<TeamBattingPublication> {
    teams
        .iter()
        .map(|t| TeamBattingPublication {
            team: t.team.clone(),
            g: t.counts.g,
            pa: t.counts.pa,
            ab: t.counts.ab,
            r: t.counts.r,
            h: t.counts.h,
            doubles: t.counts.doubles,
            triples: t.counts.triples,
            hr: t.counts.hr,
            tb: t.counts.tb,
            rbi: t.counts.rbi,
            sb: t.counts.sb,
            cs: t.counts.cs,
            sh: t.counts.sh,
            sf: t.counts.sf,
            so: t.counts.so,
            bb: t.counts.bb,
            ibb: t.counts.ibb,
            hp: t.counts.hp,
            gdp: t.counts.gdp,
            avg: fixed3(t.derived.avg),
            obp: fixed3(t.derived.obp),
            slg: fixed3(t.derived.slg),
            ops: fixed3(t.derived.ops),
            ops_plus: index(t.derived.ops_plus),
            iso: fixed3(t.derived.iso),
            babip: fixed3(t.derived.babip),
            tto_pct: percent1(t.derived.tto_rate),
            k_pct: percent1(t.derived.k_rate),
            bb_pct: percent1(t.derived.bb_rate),
            bb_per_k: bb_per_k(t.derived.bb_per_k),
            league: league_cell(leagues, &t.team),
        })
        .collect()
}

pub fn team_pitching_publication(
    teams: &[TeamPitching],
    leagues: &LeagueMap,
) -> Vec<TeamPitchingPublication> {
    teams
        .iter()
        .map(|t| TeamPitchingPublication {
            team: t.team.clone(),
            g: t.counts.g,
            w: t.counts.w,
            l: t.counts.l,
            sv: t.counts.sv,
            cg: t.counts.cg,
            sho: t.counts.sho,
            bf: t.counts.bf,
            ip: innings::format_ip(t.counts.ip),
            h: t.counts.h,
            hr: t.counts.hr,
            so: t.counts.so,
            bb: t.counts.bb,
            ibb: t.counts.ibb,
            hb: t.counts.hb,
            wp: t.counts.wp,
            r: t.counts.r,
            er: t.counts.er,
            era: fixed2(t.derived.era),
            fip: fixed2(t.derived.fip),
            kw_era: fixed2(t.derived.kw_era),
            whip: fixed2(t.derived.whip),
            era_plus: era_plus(t.derived.era_plus),
            fip_minus: index(t.derived.fip_minus),
            kw_era_minus: index(t.derived.kw_era_minus),
            diff: fixed2(t.derived.diff),
            hr_pct: percent1(t.derived.hr_rate),
            k_pct: percent1(t.derived.k_rate),
            bb_pct: percent1(t.derived.bb_rate),
            k_bb_pct: percent1(t.derived.k_bb_rate),
            league: league_cell(leagues, &t.team),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
