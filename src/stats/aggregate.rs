// Duplicate-identity aggregation.
//
// A player appears in the raw extracts once per team page and once per
// postseason series (and once per prior club if traded mid-season). All rows
// sharing an identity merge into a single line: counting stats are summed,
// identity and team come from the first row in input order, and the order of
// first appearance is preserved. Inherited rate text never survives the
// merge; every rate is recomputed downstream from the summed counts.

use std::collections::HashMap;

use crate::stats::innings;
use crate::stats::raw::{BattingRow, PitchingRow};

// ---------------------------------------------------------------------------
// Counting-stat records
// ---------------------------------------------------------------------------

/// Summed batting counting stats. Also used for league totals and team sums,
/// which are produced by the same absorb operation.
#[derive(Debug, Clone, Default)]
pub struct BattingCounts {
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
}

impl BattingCounts {
    pub fn absorb(&mut self, other: &BattingCounts) {
        self.g += other.g;
        self.pa += other.pa;
        self.ab += other.ab;
        self.r += other.r;
        self.h += other.h;
        self.doubles += other.doubles;
        self.triples += other.triples;
        self.hr += other.hr;
        self.tb += other.tb;
        self.rbi += other.rbi;
        self.sb += other.sb;
        self.cs += other.cs;
        self.sh += other.sh;
        self.sf += other.sf;
        self.bb += other.bb;
        self.ibb += other.ibb;
        self.hp += other.hp;
        self.so += other.so;
        self.gdp += other.gdp;
    }

    /// Total bases from hit components: singles + 2·2B + 3·3B + 4·HR,
    /// which simplifies to H + 2B + 2·3B + 3·HR. The raw TB column is
    /// carried through for publication but not trusted for rate math.
    pub fn total_bases(&self) -> u32 {
        self.h + self.doubles + 2 * self.triples + 3 * self.hr
    }
}

/// Summed pitching counting stats. `ip` is held in internal decimal thirds;
/// conversion from display notation happens exactly once, on the way in.
#[derive(Debug, Clone, Default)]
pub struct PitchingCounts {
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
}

impl PitchingCounts {
    pub fn absorb(&mut self, other: &PitchingCounts) {
        self.g += other.g;
        self.w += other.w;
        self.l += other.l;
        self.sv += other.sv;
        self.hld += other.hld;
        self.cg += other.cg;
        self.sho += other.sho;
        self.bf += other.bf;
        self.ip += other.ip;
        self.h += other.h;
        self.hr += other.hr;
        self.bb += other.bb;
        self.ibb += other.ibb;
        self.hb += other.hb;
        self.so += other.so;
        self.wp += other.wp;
        self.bk += other.bk;
        self.r += other.r;
        self.er += other.er;
    }
}

impl From<&BattingRow> for BattingCounts {
    fn from(row: &BattingRow) -> Self {
        BattingCounts {
            g: row.g,
            pa: row.pa,
            ab: row.ab,
            r: row.r,
            h: row.h,
            doubles: row.doubles,
            triples: row.triples,
            hr: row.hr,
            tb: row.tb,
            rbi: row.rbi,
            sb: row.sb,
            cs: row.cs,
            sh: row.sh,
            sf: row.sf,
            bb: row.bb,
            ibb: row.ibb,
            hp: row.hp,
            so: row.so,
            gdp: row.gdp,
        }
    }
}

impl From<&PitchingRow> for PitchingCounts {
    fn from(row: &PitchingRow) -> Self {
        PitchingCounts {
            g: row.g,
            w: row.w,
            l: row.l,
            sv: row.sv,
            hld: row.hld,
            cg: row.cg,
            sho: row.sho,
            bf: row.bf,
            ip: innings::to_internal(row.ip),
            h: row.h,
            hr: row.hr,
            bb: row.bb,
            ibb: row.ibb,
            hb: row.hb,
            so: row.so,
            wp: row.wp,
            bk: row.bk,
            r: row.r,
            er: row.er,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregated entities
// ---------------------------------------------------------------------------

/// One batter after the duplicate merge.
#[derive(Debug, Clone)]
pub struct AggregatedBatter {
    pub player: String,
    pub team: String,
    pub counts: BattingCounts,
}

/// One pitcher after the duplicate merge.
#[derive(Debug, Clone)]
pub struct AggregatedPitcher {
    pub pitcher: String,
    pub team: String,
    pub counts: PitchingCounts,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Merge raw batting rows by player identity. First-occurrence order is
/// preserved, identity and team come from the first row, counting stats sum.
/// Empty input yields empty output.
pub fn aggregate_batting(rows: &[BattingRow]) -> Vec<AggregatedBatter> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<AggregatedBatter> = Vec::new();

    for row in rows {
        let counts = BattingCounts::from(row);
        match index.get(&row.player) {
            Some(&i) => out[i].counts.absorb(&counts),
            None => {
                index.insert(row.player.clone(), out.len());
                out.push(AggregatedBatter {
                    player: row.player.clone(),
                    team: row.team.clone(),
                    counts,
                });
            }
        }
    }

    out
}

/// Merge raw pitching rows by pitcher identity. IP is converted to internal
/// thirds per row before summation so notation never mixes into arithmetic.
pub fn aggregate_pitching(rows: &[PitchingRow]) -> Vec<AggregatedPitcher> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<AggregatedPitcher> = Vec::new();

    for row in rows {
        let counts = PitchingCounts::from(row);
        match index.get(&row.pitcher) {
            Some(&i) => out[i].counts.absorb(&counts),
            None => {
                index.insert(row.pitcher.clone(), out.len());
                out.push(AggregatedPitcher {
                    pitcher: row.pitcher.clone(),
                    team: row.team.clone(),
                    counts,
                });
            }
        }
    }

    out
}

// ---------------------------------------------------------------------------
// Qualification filters
// ---------------------------------------------------------------------------

/// Drop batters with zero plate appearances. They would force divide-by-zero
/// in every rate and must not feed the league context.
pub fn filter_qualified_batters(batters: Vec<AggregatedBatter>) -> Vec<AggregatedBatter> {
    batters.into_iter().filter(|b| b.counts.pa > 0).collect()
}

/// Drop pitchers with zero innings pitched.
pub fn filter_qualified_pitchers(pitchers: Vec<AggregatedPitcher>) -> Vec<AggregatedPitcher> {
    pitchers.into_iter().filter(|p| p.counts.ip > 0.0).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_batting_row(player: &str, team: &str, g: u32, pa: u32, h: u32) -> BattingRow {
        BattingRow {
            player: player.into(),
            team: team.into(),
            g,
            pa,
            ab: pa,
            r: 0,
            h,
            doubles: 0,
            triples: 0,
            hr: 0,
            tb: h,
            rbi: 0,
            sb: 0,
            cs: 0,
            sh: 0,
            sf: 0,
            bb: 0,
            ibb: 0,
            hp: 0,
            so: 0,
            gdp: 0,
            source_avg: 0.0,
            source_slg: 0.0,
            source_obp: 0.0,
        }
    }

    fn make_pitching_row(pitcher: &str, team: &str, ip: f64, er: u32) -> PitchingRow {
        PitchingRow {
            pitcher: pitcher.into(),
            team: team.into(),
            g: 1,
            w: 0,
            l: 0,
            sv: 0,
            hld: 0,
            cg: 0,
            sho: 0,
            bf: 4,
            ip,
            h: 1,
            hr: 0,
            bb: 0,
            ibb: 0,
            hb: 0,
            so: 1,
            wp: 0,
            bk: 0,
            r: er,
            er,
            source_pct: 0.0,
            source_era: 0.0,
        }
    }

    #[test]
    fn duplicate_batter_rows_sum() {
        // Two rows for the same player with G=3 and G=2 -> aggregated G=5.
        let rows = vec![
            make_batting_row("Kondo Kensuke", "SoftBank Hawks", 3, 12, 4),
            make_batting_row("Kondo Kensuke", "SoftBank Hawks", 2, 8, 2),
        ];

        let merged = aggregate_batting(&rows);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].counts.g, 5);
        assert_eq!(merged[0].counts.pa, 20);
        assert_eq!(merged[0].counts.h, 6);
    }

    #[test]
    fn identity_and_team_come_from_first_row() {
        let rows = vec![
            make_batting_row("Traded Player", "Lotte Marines", 3, 12, 4),
            make_batting_row("Traded Player", "SoftBank Hawks", 2, 8, 2),
        ];

        let merged = aggregate_batting(&rows);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].team, "Lotte Marines");
    }

    #[test]
    fn first_appearance_order_preserved() {
        let rows = vec![
            make_batting_row("Third", "A", 1, 4, 1),
            make_batting_row("First", "A", 1, 4, 1),
            make_batting_row("Third", "A", 1, 4, 1),
            make_batting_row("Second", "B", 1, 4, 1),
        ];

        let merged = aggregate_batting(&rows);
        let names: Vec<&str> = merged.iter().map(|b| b.player.as_str()).collect();
        assert_eq!(names, vec!["Third", "First", "Second"]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(aggregate_batting(&[]).is_empty());
        assert!(aggregate_pitching(&[]).is_empty());
    }

    #[test]
    fn pitching_ip_sums_in_thirds() {
        // 3.1 + 2.2 in display notation = 3 1/3 + 2 2/3 = 6 exact innings.
        let rows = vec![
            make_pitching_row("Workhorse", "Hanshin Tigers", 3.1, 1),
            make_pitching_row("Workhorse", "Hanshin Tigers", 2.2, 0),
        ];

        let merged = aggregate_pitching(&rows);
        assert_eq!(merged.len(), 1);
        assert!((merged[0].counts.ip - 6.0).abs() < 1e-9);
        assert_eq!(merged[0].counts.er, 1);
    }

    #[test]
    fn total_bases_from_components() {
        // H=3 with one double and one homer: singles(1) + 2*1 + 4*1 = 7.
        let counts = BattingCounts {
            h: 3,
            doubles: 1,
            triples: 0,
            hr: 1,
            ..Default::default()
        };
        assert_eq!(counts.total_bases(), 7);
    }

    #[test]
    fn zero_pa_batters_filtered_out() {
        let rows = vec![
            make_batting_row("Pinch Runner", "A", 2, 0, 0),
            make_batting_row("Regular", "A", 6, 25, 8),
        ];

        let qualified = filter_qualified_batters(aggregate_batting(&rows));
        assert_eq!(qualified.len(), 1);
        assert_eq!(qualified[0].player, "Regular");
    }

    #[test]
    fn zero_ip_pitchers_filtered_out() {
        let rows = vec![
            make_pitching_row("No Outs", "A", 0.0, 2),
            make_pitching_row("Starter", "A", 6.0, 2),
        ];

        let qualified = filter_qualified_pitchers(aggregate_pitching(&rows));
        assert_eq!(qualified.len(), 1);
        assert_eq!(qualified[0].pitcher, "Starter");
    }
}
