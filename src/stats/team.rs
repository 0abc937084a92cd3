// Team-level derivation.
//
// Team statistics are re-derived from summed player counting stats, never
// from averaged player rates: a team's AVG is teamH/teamAB, which in general
// differs from the mean of the players' rounded AVGs. After every real team,
// one synthetic "League Average" row is appended whose counting stats are
// the per-team mean and whose rates are recomputed from the league totals,
// keeping its normalized metrics consistent with the context baselines.

use crate::stats::aggregate::{BattingCounts, PitchingCounts};
use crate::stats::batting::{derive_batting, BattingEntity, DerivedBatting};
use crate::stats::league::{BattingContext, PitchingContext};
use crate::stats::pitching::{derive_pitching, DerivedPitching, PitchingEntity};
use crate::stats::reference::ParkFactors;

/// Name of the synthetic per-team-mean row appended to every team table.
/// Its park factor is pinned to 1.0, so its "+"/"-" metrics equal the
/// unadjusted ratio against the league baselines.
pub const LEAGUE_AVERAGE: &str = "League Average";

// ---------------------------------------------------------------------------
// Team entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TeamBatting {
    pub team: String,
    pub counts: BattingCounts,
    pub derived: DerivedBatting,
}

#[derive(Debug, Clone)]
pub struct TeamPitching {
    pub team: String,
    pub counts: PitchingCounts,
    pub derived: DerivedPitching,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Distinct team names in order of first appearance.
fn teams_in_order<'a, I: Iterator<Item = &'a str>>(teams: I) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for team in teams {
        if !seen.iter().any(|t| t == team) {
            seen.push(team.to_string());
        }
    }
    seen
}

fn averaged_batting(totals: &BattingCounts, teams: u32) -> BattingCounts {
    let n = f64::from(teams);
    let avg = |v: u32| (f64::from(v) / n).round() as u32;
    BattingCounts {
        g: avg(totals.g),
        pa: avg(totals.pa),
        ab: avg(totals.ab),
        r: avg(totals.r),
        h: avg(totals.h),
        doubles: avg(totals.doubles),
        triples: avg(totals.triples),
        hr: avg(totals.hr),
        tb: avg(totals.tb),
        rbi: avg(totals.rbi),
        sb: avg(totals.sb),
        cs: avg(totals.cs),
        sh: avg(totals.sh),
        sf: avg(totals.sf),
        bb: avg(totals.bb),
        ibb: avg(totals.ibb),
        hp: avg(totals.hp),
        so: avg(totals.so),
        gdp: avg(totals.gdp),
    }
}

fn averaged_pitching(totals: &PitchingCounts, teams: u32) -> PitchingCounts {
    let n = f64::from(teams);
    let avg = |v: u32| (f64::from(v) / n).round() as u32;
    PitchingCounts {
        g: avg(totals.g),
        w: avg(totals.w),
        l: avg(totals.l),
        sv: avg(totals.sv),
        hld: avg(totals.hld),
        cg: avg(totals.cg),
        sho: avg(totals.sho),
        bf: avg(totals.bf),
        ip: totals.ip / n,
        h: avg(totals.h),
        hr: avg(totals.hr),
        bb: avg(totals.bb),
        ibb: avg(totals.ibb),
        hb: avg(totals.hb),
        so: avg(totals.so),
        wp: avg(totals.wp),
        bk: avg(totals.bk),
        r: avg(totals.r),
        er: avg(totals.er),
    }
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Derive team batting rows from the derived player table, then append the
/// synthetic league-average row. Teams whose players sum to zero PA did not
/// field a qualifying roster and are skipped.
pub fn derive_team_batting(
    players: &[BattingEntity],
    ctx: &BattingContext,
    park: &ParkFactors,
) -> Vec<TeamBatting> {
    let mut out: Vec<TeamBatting> = Vec::new();
    let mut league_totals = BattingCounts::default();

    for team in teams_in_order(players.iter().map(|p| p.team.as_str())) {
        let mut counts = BattingCounts::default();
        for player in players.iter().filter(|p| p.team == team) {
            counts.absorb(&player.counts);
        }
        if counts.pa == 0 {
            continue;
        }
        league_totals.absorb(&counts);
        let derived = derive_batting(&counts, ctx, park.for_team(&team));
        out.push(TeamBatting {
            team,
            counts,
            derived,
        });
    }

    if !out.is_empty() {
        let participating = out.len() as u32;
        // Counting stats are the per-team mean; rates come from the full
        // league totals so the row stays consistent with the baselines.
        let derived = derive_batting(&league_totals, ctx, 1.0);
        out.push(TeamBatting {
            team: LEAGUE_AVERAGE.to_string(),
            counts: averaged_batting(&league_totals, participating),
            derived,
        });
    }

    out
}

/// Derive team pitching rows plus the synthetic league-average row. Teams
/// whose pitchers sum to zero IP are skipped.
pub fn derive_team_pitching(
    players: &[PitchingEntity],
    ctx: &PitchingContext,
    park: &ParkFactors,
    fip_constant: f64,
) -> Vec<TeamPitching> {
    let mut out: Vec<TeamPitching> = Vec::new();
    let mut league_totals = PitchingCounts::default();

    for team in teams_in_order(players.iter().map(|p| p.team.as_str())) {
        let mut counts = PitchingCounts::default();
        for player in players.iter().filter(|p| p.team == team) {
            counts.absorb(&player.counts);
        }
        if counts.ip == 0.0 {
            continue;
        }
        league_totals.absorb(&counts);
        let derived = derive_pitching(&counts, ctx, park.for_team(&team), fip_constant);
        out.push(TeamPitching {
            team,
            counts,
            derived,
        });
    }

    if !out.is_empty() {
        let participating = out.len() as u32;
        let derived = derive_pitching(&league_totals, ctx, 1.0, fip_constant);
        out.push(TeamPitching {
            team: LEAGUE_AVERAGE.to_string(),
            counts: averaged_pitching(&league_totals, participating),
            derived,
        });
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::league::{batting_context, pitching_context};
    use crate::stats::aggregate::{AggregatedBatter, AggregatedPitcher};

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn batter(player: &str, team: &str, pa: u32, ab: u32, h: u32) -> BattingEntity {
        let counts = BattingCounts {
            g: 3,
            pa,
            ab,
            h,
            ..Default::default()
        };
        BattingEntity {
            player: player.into(),
            team: team.into(),
            derived: DerivedBatting {
                avg: f64::from(h) / f64::from(ab),
                obp: 0.0,
                slg: 0.0,
                ops: 0.0,
                ops_plus: 0.0,
                iso: 0.0,
                babip: 0.0,
                tto_rate: 0.0,
                k_rate: 0.0,
                bb_rate: 0.0,
                bb_per_k: 0.0,
            },
            counts,
        }
    }

    fn pitcher(name: &str, team: &str, ip: f64, er: u32) -> PitchingEntity {
        let counts = PitchingCounts {
            g: 2,
            bf: (ip * 4.0).round() as u32,
            ip,
            er,
            so: 3,
            bb: 1,
            h: 2,
            ..Default::default()
        };
        PitchingEntity {
            pitcher: name.into(),
            team: team.into(),
            derived: DerivedPitching {
                era: 0.0,
                fip: 0.0,
                kw_era: 0.0,
                whip: 0.0,
                diff: 0.0,
                era_plus: 0.0,
                fip_minus: 0.0,
                kw_era_minus: 0.0,
                hr_rate: 0.0,
                k_rate: 0.0,
                bb_rate: 0.0,
                k_bb_rate: 0.0,
            },
            counts,
        }
    }

    fn batting_ctx_for(players: &[BattingEntity]) -> BattingContext {
        let aggregated: Vec<AggregatedBatter> = players
            .iter()
            .map(|p| AggregatedBatter {
                player: p.player.clone(),
                team: p.team.clone(),
                counts: p.counts.clone(),
            })
            .collect();
        batting_context(&aggregated)
    }

    #[test]
    fn team_rates_from_summed_counts_not_averaged_rates() {
        // Player AVGs are 0.400 (2/5) and 0.100 (1/10); their mean is 0.250,
        // but the team AVG must be 3/15 = 0.200.
        let players = vec![
            batter("A", "Hanshin Tigers", 6, 5, 2),
            batter("B", "Hanshin Tigers", 10, 10, 1),
        ];
        let ctx = batting_ctx_for(&players);
        let teams = derive_team_batting(&players, &ctx, &ParkFactors::unavailable());

        let tigers = &teams[0];
        assert_eq!(tigers.team, "Hanshin Tigers");
        assert_eq!(tigers.counts.h, 3);
        assert_eq!(tigers.counts.ab, 15);
        assert!(approx_eq(tigers.derived.avg, 0.200, 1e-9));
        let mean_of_rates =
            (players[0].derived.avg + players[1].derived.avg) / 2.0;
        assert!((tigers.derived.avg - mean_of_rates).abs() > 0.01);
    }

    #[test]
    fn league_average_row_appended_last() {
        let players = vec![
            batter("A", "Hanshin Tigers", 10, 10, 3),
            batter("B", "SoftBank Hawks", 10, 10, 2),
        ];
        let ctx = batting_ctx_for(&players);
        let teams = derive_team_batting(&players, &ctx, &ParkFactors::unavailable());

        assert_eq!(teams.len(), 3);
        assert_eq!(teams[2].team, LEAGUE_AVERAGE);
        // Counting stats are the per-team mean: (10+10)/2 PA.
        assert_eq!(teams[2].counts.pa, 10);
        assert_eq!(teams[2].counts.h, 3); // (3+2)/2 = 2.5 rounds to 3
        // Rates come from the league totals, not the divided counts:
        // 5/20 = 0.250.
        assert!(approx_eq(teams[2].derived.avg, 0.250, 1e-9));
    }

    #[test]
    fn league_average_normalized_metrics_are_unadjusted_ratio() {
        let players = vec![
            batter("A", "Hanshin Tigers", 10, 10, 3),
            batter("B", "SoftBank Hawks", 10, 10, 2),
        ];
        let ctx = batting_ctx_for(&players);
        // Even with no park table at all, the league-average row is pinned
        // to a neutral park and keeps its normalized metrics.
        let teams = derive_team_batting(&players, &ctx, &ParkFactors::unavailable());
        let avg_row = teams.last().unwrap();
        assert!(avg_row.derived.ops_plus.is_finite());
        // Real teams have no park factor, so their OPS+ is undefined.
        assert!(teams[0].derived.ops_plus.is_nan());
    }

    #[test]
    fn zero_pa_team_skipped() {
        let players = vec![
            batter("A", "Hanshin Tigers", 10, 10, 3),
            batter("Ghost", "Lotte Marines", 0, 0, 0),
        ];
        let ctx = batting_ctx_for(&players);
        let teams = derive_team_batting(&players, &ctx, &ParkFactors::unavailable());

        let names: Vec<&str> = teams.iter().map(|t| t.team.as_str()).collect();
        assert_eq!(names, vec!["Hanshin Tigers", LEAGUE_AVERAGE]);
    }

    #[test]
    fn empty_player_table_yields_no_teams() {
        let ctx = batting_ctx_for(&[]);
        let teams = derive_team_batting(&[], &ctx, &ParkFactors::unavailable());
        assert!(teams.is_empty());
    }

    #[test]
    fn team_pitching_ip_sums_in_thirds() {
        // 5 1/3 + 3 2/3 = 9 exact innings for the team.
        let players = vec![
            pitcher("P1", "Yomiuri Giants", 5.0 + 1.0 / 3.0, 2),
            pitcher("P2", "Yomiuri Giants", 3.0 + 2.0 / 3.0, 1),
        ];
        let aggregated: Vec<AggregatedPitcher> = players
            .iter()
            .map(|p| AggregatedPitcher {
                pitcher: p.pitcher.clone(),
                team: p.team.clone(),
                counts: p.counts.clone(),
            })
            .collect();
        let ctx = pitching_context(&aggregated, 3.2);
        let teams = derive_team_pitching(&players, &ctx, &ParkFactors::unavailable(), 3.2);

        assert_eq!(teams[0].team, "Yomiuri Giants");
        assert!(approx_eq(teams[0].counts.ip, 9.0, 1e-9));
        // ERA = 9 * 3 / 9 = 3.00
        assert!(approx_eq(teams[0].derived.era, 3.0, 1e-9));
    }

    #[test]
    fn zero_ip_team_skipped_in_pitching() {
        let players = vec![
            pitcher("P1", "Yomiuri Giants", 9.0, 3),
            pitcher("NoOuts", "DeNA BayStars", 0.0, 2),
        ];
        let aggregated: Vec<AggregatedPitcher> = players
            .iter()
            .map(|p| AggregatedPitcher {
                pitcher: p.pitcher.clone(),
                team: p.team.clone(),
                counts: p.counts.clone(),
            })
            .collect();
        let ctx = pitching_context(&aggregated, 3.2);
        let teams = derive_team_pitching(&players, &ctx, &ParkFactors::unavailable(), 3.2);

        let names: Vec<&str> = teams.iter().map(|t| t.team.as_str()).collect();
        assert_eq!(names, vec!["Yomiuri Giants", LEAGUE_AVERAGE]);
    }
}
