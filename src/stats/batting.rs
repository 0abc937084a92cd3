// Per-batter advanced metric derivation.
//
// Everything here is computed from an entity's own summed counts, except the
// park- and league-normalized OPS+, which additionally reads the league
// context baselines. Degenerate divisions are left as NaN/∞ in the metric
// set; the formatting stage decides between blanks and sentinels.

use crate::stats::aggregate::BattingCounts;
use crate::stats::league::BattingContext;
use crate::stats::round3;

// ---------------------------------------------------------------------------
// Derived metric set
// ---------------------------------------------------------------------------

/// Advanced batting metrics for one entity (player or team).
///
/// `ops` carries the documented display rounding (sum of 3-dp-rounded OBP
/// and SLG); `ops_plus` carries the documented round-then-park-adjust order.
/// All other fields are raw ratios rounded only at formatting.
#[derive(Debug, Clone, Copy)]
pub struct DerivedBatting {
    pub avg: f64,
    pub obp: f64,
    pub slg: f64,
    pub ops: f64,
    pub ops_plus: f64,
    pub iso: f64,
    pub babip: f64,
    pub tto_rate: f64,
    pub k_rate: f64,
    pub bb_rate: f64,
    pub bb_per_k: f64,
}

/// The batter after derivation: identity, summed counts, derived metrics.
#[derive(Debug, Clone)]
pub struct BattingEntity {
    pub player: String,
    pub team: String,
    pub counts: BattingCounts,
    pub derived: DerivedBatting,
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Derive the advanced batting metrics from summed counts, the league
/// context, and the entity's park factor.
pub fn derive_batting(c: &BattingCounts, ctx: &BattingContext, park_factor: f64) -> DerivedBatting {
    let ab = f64::from(c.ab);
    let pa = f64::from(c.pa);
    let h = f64::from(c.h);
    let bb = f64::from(c.bb);
    let hp = f64::from(c.hp);
    let so = f64::from(c.so);
    let hr = f64::from(c.hr);

    let avg = h / ab;
    let slg = f64::from(c.total_bases()) / ab;
    let obp = (h + bb + hp) / pa;

    // Published OPS must equal the sum of the published (3 dp) components.
    let ops = round3(round3(obp) + round3(slg));

    // Round the raw index first, then park-adjust; the order is part of the
    // metric's definition.
    let ops_plus_raw = 100.0 * (obp / ctx.obp + slg / ctx.slg - 1.0);
    let ops_plus = ops_plus_raw.round() / park_factor;

    let iso = slg - avg;
    let k_rate = so / pa;
    let bb_rate = bb / pa;
    let bb_per_k = bb / so;
    let tto_rate = (bb + so + hr) / pa;

    let babip_denom = ab + f64::from(c.sf) - so - hr;
    let babip = if babip_denom == 0.0 {
        f64::NAN
    } else {
        (h - hr) / babip_denom
    };

    DerivedBatting {
        avg,
        obp,
        slg,
        ops,
        ops_plus,
        iso,
        babip,
        tto_rate,
        k_rate,
        bb_rate,
        bb_per_k,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
