// Per-pitcher advanced metric derivation.
//
// ERA is always recomputed from summed earned runs and internal-thirds
// innings; the inherited ERA text never survives aggregation. Normalized
// metrics (ERA+, FIP-, kwERA-) read the league context baselines and the
// entity's park factor. Zero-IP entities never reach this module for
// players; team-level callers skip zero-IP teams, so infinities here come
// only from legitimately degenerate data and are resolved at formatting.

use crate::stats::aggregate::PitchingCounts;
use crate::stats::league::PitchingContext;
use crate::stats::round2;

// ---------------------------------------------------------------------------
// Shared formula components
// ---------------------------------------------------------------------------

/// The FIP rate term (13·HR + 3·(BB+HB) − 2·SO) / IP, without the season
/// constant. Shared with the league-context builder so entity and baseline
/// use the same arithmetic.
pub(crate) fn fip_rate(c: &PitchingCounts) -> f64 {
    (13.0 * f64::from(c.hr) + 3.0 * f64::from(c.bb + c.hb) - 2.0 * f64::from(c.so)) / c.ip
}

/// kwERA = 4.80 − 10 × (SO − BB) / BF, rounded to 2 decimals. The rounding
/// is part of the metric's definition; kwERA- divides the rounded values.
pub(crate) fn kw_era(c: &PitchingCounts) -> f64 {
    round2(4.80 - 10.0 * ((f64::from(c.so) - f64::from(c.bb)) / f64::from(c.bf)))
}

// ---------------------------------------------------------------------------
// Derived metric set
// ---------------------------------------------------------------------------

/// Advanced pitching metrics for one entity (player or team).
///
/// `era`, `fip`, `kw_era`, `whip` and `diff` carry their documented 2 dp
/// rounding; the normalized indexes are raw ratios rounded at formatting.
#[derive(Debug, Clone, Copy)]
pub struct DerivedPitching {
    pub era: f64,
    pub fip: f64,
    pub kw_era: f64,
    pub whip: f64,
    pub diff: f64,
    pub era_plus: f64,
    pub fip_minus: f64,
    pub kw_era_minus: f64,
    pub hr_rate: f64,
    pub k_rate: f64,
    pub bb_rate: f64,
    pub k_bb_rate: f64,
}

/// The pitcher after derivation: identity, summed counts, derived metrics.
#[derive(Debug, Clone)]
pub struct PitchingEntity {
    pub pitcher: String,
    pub team: String,
    pub counts: PitchingCounts,
    pub derived: DerivedPitching,
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Derive the advanced pitching metrics from summed counts, the league
/// context, the entity's park factor, and the season FIP constant.
pub fn derive_pitching(
    c: &PitchingCounts,
    ctx: &PitchingContext,
    park_factor: f64,
    fip_constant: f64,
) -> DerivedPitching {
    let bf = f64::from(c.bf);
    let h = f64::from(c.h);
    let hr = f64::from(c.hr);
    let bb = f64::from(c.bb);
    let so = f64::from(c.so);

    let era = round2(9.0 * f64::from(c.er) / c.ip);
    let fip = round2(fip_rate(c) + fip_constant);
    let kw = kw_era(c);

    // A zero ERA makes the ratio infinite by definition; the formatter caps
    // it at the 999 sentinel.
    let era_plus = if era == 0.0 {
        f64::INFINITY
    } else {
        100.0 * (ctx.era * park_factor) / era
    };
    let fip_minus = 100.0 * fip / (ctx.fip * park_factor);
    let kw_era_minus = 100.0 * kw / ctx.kw_era;

    let whip = round2((bb + h) / c.ip);
    let diff = round2(era - fip);

    let hr_rate = hr / bf;
    let k_rate = so / bf;
    let bb_rate = bb / bf;
    let k_bb_rate = k_rate - bb_rate;

    DerivedPitching {
        era,
        fip,
        kw_era: kw,
        whip,
        diff,
        era_plus,
        fip_minus,
        kw_era_minus,
        hr_rate,
        k_rate,
        bb_rate,
        k_bb_rate,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::innings;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn plain_context(era: f64, fip: f64, kw_era: f64) -> PitchingContext {
        PitchingContext {
            totals: PitchingCounts::default(),
            era,
            fip,
            kw_era,
        }
    }

    #[test]
    fn era_recomputed_from_er_and_internal_ip() {
        // ER=4 over a display 6.1 innings: internal IP = 6.3333,
        // ERA = 9*4/6.3333 = 5.684.. -> 5.68 at 2 dp.
        let counts = PitchingCounts {
            ip: innings::to_internal(6.1),
            er: 4,
            bf: 27,
            ..Default::default()
        };
        let d = derive_pitching(&counts, &plain_context(4.0, 4.0, 4.0), 1.0, 3.2);
        assert!(approx_eq(d.era, 5.68, 1e-9));
        // And the internal value still displays back as 6.1.
        assert!(approx_eq(innings::to_display(counts.ip), 6.1, 1e-9));
    }

    #[test]
    fn fip_formula_with_season_constant() {
        // (13*2 + 3*(4+1) - 2*18) / 10 + 3.20 = 0.5 + 3.20 = 3.70
        let counts = PitchingCounts {
            ip: 10.0,
            hr: 2,
            bb: 4,
            hb: 1,
            so: 18,
            bf: 40,
            er: 3,
            ..Default::default()
        };
        let d = derive_pitching(&counts, &plain_context(4.0, 4.0, 4.0), 1.0, 3.20);
        assert!(approx_eq(d.fip, 3.70, 1e-9));
        // Diff uses the published (rounded) ERA and FIP.
        assert!(approx_eq(d.diff, d.era - d.fip, 1e-9));
    }

    #[test]
    fn missing_fip_constant_blanks_fip_family() {
        let counts = PitchingCounts {
            ip: 10.0,
            so: 10,
            bf: 40,
            er: 4,
            ..Default::default()
        };
        let d = derive_pitching(&counts, &plain_context(4.0, f64::NAN, 4.0), 1.0, f64::NAN);
        assert!(d.fip.is_nan());
        assert!(d.fip_minus.is_nan());
        assert!(d.diff.is_nan());
        // ERA and kwERA are unaffected.
        assert!(d.era.is_finite());
        assert!(d.kw_era.is_finite());
    }

    #[test]
    fn era_plus_against_park_adjusted_baseline() {
        // ERA = 9*2/9 = 2.00; league 4.00 at park 0.9:
        // ERA+ = 100 * (4.00*0.9) / 2.00 = 180.
        let counts = PitchingCounts {
            ip: 9.0,
            er: 2,
            bf: 36,
            so: 9,
            bb: 2,
            h: 7,
            ..Default::default()
        };
        let d = derive_pitching(&counts, &plain_context(4.0, 4.0, 4.0), 0.9, 3.2);
        assert!(approx_eq(d.era_plus, 180.0, 1e-9));
    }

    #[test]
    fn zero_era_yields_infinite_era_plus() {
        let counts = PitchingCounts {
            ip: 5.0,
            er: 0,
            bf: 18,
            so: 6,
            ..Default::default()
        };
        let d = derive_pitching(&counts, &plain_context(4.0, 4.0, 4.0), 1.0, 3.2);
        // Capped to the 999 sentinel at formatting, not here.
        assert!(d.era_plus.is_infinite());
    }

    #[test]
    fn missing_park_factor_blanks_normalized_metrics_only() {
        let counts = PitchingCounts {
            ip: 9.0,
            er: 3,
            bf: 36,
            so: 9,
            bb: 2,
            h: 8,
            ..Default::default()
        };
        let d = derive_pitching(&counts, &plain_context(4.0, 4.0, 4.0), f64::NAN, 3.2);
        assert!(d.era_plus.is_nan());
        assert!(d.fip_minus.is_nan());
        // kwERA- does not use the park factor.
        assert!(d.kw_era_minus.is_finite());
        assert!(d.era.is_finite());
        assert!(d.whip.is_finite());
    }

    #[test]
    fn kw_era_rounded_then_normalized() {
        // kwERA = round2(4.80 - 10*(20-5)/90) = round2(3.1333..) = 3.13
        let counts = PitchingCounts {
            ip: 20.0,
            bf: 90,
            so: 20,
            bb: 5,
            er: 8,
            ..Default::default()
        };
        let d = derive_pitching(&counts, &plain_context(4.0, 4.0, 4.0), 1.0, 3.2);
        assert!(approx_eq(d.kw_era, 3.13, 1e-9));
        // kwERA- divides the rounded value by the (rounded) baseline.
        assert!(approx_eq(d.kw_era_minus, 100.0 * 3.13 / 4.0, 1e-9));
    }

    #[test]
    fn whip_and_batter_rates() {
        let counts = PitchingCounts {
            ip: 12.0,
            h: 9,
            bb: 3,
            so: 15,
            hr: 1,
            bf: 50,
            er: 4,
            ..Default::default()
        };
        let d = derive_pitching(&counts, &plain_context(4.0, 4.0, 4.0), 1.0, 3.2);
        assert!(approx_eq(d.whip, 1.0, 1e-9));
        assert!(approx_eq(d.k_rate, 0.30, 1e-9));
        assert!(approx_eq(d.bb_rate, 0.06, 1e-9));
        assert!(approx_eq(d.k_bb_rate, 0.24, 1e-9));
        assert!(approx_eq(d.hr_rate, 0.02, 1e-9));
    }
}
