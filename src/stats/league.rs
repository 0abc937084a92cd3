// League context: totals and normalization baselines.
//
// Every "+"/"-" suffixed metric divides a per-entity rate by a league
// baseline, so the baselines must be computed first, from exactly the
// filtered entity set that is later normalized against it. Baselines are
// totals-then-ratio, never averages of per-entity rates.

use crate::stats::aggregate::{AggregatedBatter, AggregatedPitcher, BattingCounts, PitchingCounts};
use crate::stats::pitching;

// ---------------------------------------------------------------------------
// Contexts
// ---------------------------------------------------------------------------

/// League-wide batting totals and baseline rates.
#[derive(Debug, Clone)]
pub struct BattingContext {
    pub totals: BattingCounts,
    /// League OBP = (H+BB+HP) / (AB+BB+HP+SF).
    pub obp: f64,
    /// League SLG = total-bases-equivalent / AB.
    pub slg: f64,
}

/// League-wide pitching totals and baseline rates. A zero or undefined
/// baseline (e.g. zero total IP) propagates as ∞/NaN downstream; callers
/// treat such outputs as "no data" rather than errors.
#[derive(Debug, Clone)]
pub struct PitchingContext {
    pub totals: PitchingCounts,
    /// League ERA = 9 × ΣER / ΣIP.
    pub era: f64,
    /// League FIP = (13ΣHR + 3(ΣBB+ΣHB) − 2ΣSO) / ΣIP + season constant.
    pub fip: f64,
    /// League kwERA = 4.80 − 10 × (ΣSO − ΣBB) / ΣBF, rounded to 2 decimals.
    pub kw_era: f64,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Build the batting context from the filtered (nonzero-PA) batter set.
pub fn batting_context(batters: &[AggregatedBatter]) -> BattingContext {
    let mut totals = BattingCounts::default();
    for batter in batters {
        totals.absorb(&batter.counts);
    }

    let reached = f64::from(totals.h + totals.bb + totals.hp);
    let obp_denom = f64::from(totals.ab + totals.bb + totals.hp + totals.sf);
    let obp = reached / obp_denom;
    let slg = f64::from(totals.total_bases()) / f64::from(totals.ab);

    BattingContext { totals, obp, slg }
}

/// Build the pitching context from the filtered (nonzero-IP) pitcher set.
/// `fip_constant` is the season constant from the reference table; NaN when
/// the table is missing, which blanks every FIP-family metric downstream.
pub fn pitching_context(pitchers: &[AggregatedPitcher], fip_constant: f64) -> PitchingContext {
    let mut totals = PitchingCounts::default();
    for pitcher in pitchers {
        totals.absorb(&pitcher.counts);
    }

    let era = 9.0 * f64::from(totals.er) / totals.ip;
    let fip = pitching::fip_rate(&totals) + fip_constant;
    let kw_era = pitching::kw_era(&totals);

    PitchingContext {
        totals,
        era,
        fip,
        kw_era,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
