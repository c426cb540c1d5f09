use crate::config::*;
use crate::roster::MemberCounters;

/// The points of a member, per category.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct MemberScore {
    /// Present, substitute, absent and medical.
    pub attendance: i64,
    /// Generic late arrivals and the late-arrival bands.
    pub late: i64,
    pub referrals: i64,
    pub visitors: i64,
    pub one_to_ones: i64,
    pub tyfcb: i64,
    pub ceu: i64,
    pub total: i64,
}

impl MemberScore {
    pub fn points(&self, category: Category) -> i64 {
        match category {
            Category::Total => self.total,
            Category::Attendance => self.attendance,
            Category::Late => self.late,
            Category::Referrals => self.referrals,
            Category::Visitors => self.visitors,
            Category::OneToOnes => self.one_to_ones,
            Category::Tyfcb => self.tyfcb,
            Category::Ceu => self.ceu,
        }
    }
}

/// Computes the points of a member from the counters.
///
/// The arithmetic saturates: huge counters give huge scores, never a panic
/// or a change of sign.
pub fn score_member(c: &MemberCounters, w: &ScoringWeights) -> MemberScore {
    let attendance = total(&[
        pts(c.present, w.present),
        pts(c.substitute, w.substitute),
        pts(c.absent, w.absent),
        pts(c.medical, w.medical),
    ]);
    let late = total(&[
        pts(c.late, w.late),
        pts(c.late_on_time, w.late_on_time),
        pts(c.late_mild, w.late_mild),
        pts(c.late_significant, w.late_significant),
    ]);
    let referrals = total(&[
        pts(c.referrals_given_inside, w.referral_given_inside),
        pts(c.referrals_given_outside, w.referral_given_outside),
        pts(
            count(&[c.referrals_received_inside, c.referrals_received_outside]),
            w.referral_received,
        ),
    ]);
    let visitors = pts(c.visitors, w.visitor);
    let one_to_ones = pts(c.one_to_ones, w.one_to_one);
    let tyfcb = pts(tyfcb_units(c.tyfcb, w.tyfcb_unit), w.tyfcb);
    let ceu = pts(c.ceu, w.ceu);
    MemberScore {
        attendance,
        late,
        referrals,
        visitors,
        one_to_ones,
        tyfcb,
        ceu,
        total: total(&[attendance, late, referrals, visitors, one_to_ones, tyfcb, ceu]),
    }
}

/// The raw count behind the points of a category.
pub fn raw_count(c: &MemberCounters, category: Category) -> f64 {
    match category {
        Category::Total => count(&[
            c.present,
            c.substitute,
            c.referrals_given_inside,
            c.referrals_given_outside,
            c.visitors,
            c.one_to_ones,
            c.ceu,
        ]) as f64,
        Category::Attendance => c.present as f64,
        Category::Late => count(&[c.late, c.late_mild, c.late_significant]) as f64,
        Category::Referrals => {
            count(&[c.referrals_given_inside, c.referrals_given_outside]) as f64
        }
        Category::Visitors => c.visitors as f64,
        Category::OneToOnes => c.one_to_ones as f64,
        Category::Tyfcb => c.tyfcb,
        Category::Ceu => c.ceu as f64,
    }
}

/// The number of whole TYFCB units in an amount.
pub fn tyfcb_units(amount: f64, unit: f64) -> u64 {
    if unit.is_nan() || unit <= 0.0 || !amount.is_finite() || amount <= 0.0 {
        return 0;
    }
    // Float to int casts saturate.
    (amount / unit).floor() as u64
}

/// Saturating sum of points.
pub(crate) fn total(points: &[i64]) -> i64 {
    points.iter().fold(0i64, |acc, p| acc.saturating_add(*p))
}

/// Saturating sum of counters.
pub(crate) fn count(counts: &[u64]) -> u64 {
    counts.iter().fold(0u64, |acc, c| acc.saturating_add(*c))
}

fn pts(count: u64, weight: i64) -> i64 {
    i64::try_from(count)
        .unwrap_or(i64::MAX)
        .saturating_mul(weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemberCounters {
        MemberCounters {
            present: 4,
            referrals_given_inside: 3,
            referrals_given_outside: 2,
            visitors: 1,
            one_to_ones: 2,
            tyfcb: 1.0,
            ..MemberCounters::default()
        }
    }

    #[test]
    fn reference_member() {
        let s = score_member(&sample(), &ScoringWeights::DEFAULT);
        assert_eq!(s.attendance, 40);
        assert_eq!(s.referrals, 35);
        assert_eq!(s.visitors, 15);
        assert_eq!(s.one_to_ones, 20);
        assert_eq!(s.tyfcb, 10);
        assert_eq!(s.ceu, 0);
        assert_eq!(s.late, 0);
        assert_eq!(s.total, 120);
    }

    #[test]
    fn scoring_is_a_pure_read() {
        let c = sample();
        let before = c.clone();
        let s1 = score_member(&c, &ScoringWeights::DEFAULT);
        let s2 = score_member(&c, &ScoringWeights::DEFAULT);
        assert_eq!(s1, s2);
        assert_eq!(c, before);
    }

    #[test]
    fn attendance_and_late_weights() {
        let c = MemberCounters {
            present: 2,
            substitute: 1,
            absent: 1,
            medical: 3,
            late: 1,
            late_on_time: 2,
            late_mild: 1,
            late_significant: 2,
            ceu: 4,
            referrals_received_inside: 5,
            ..MemberCounters::default()
        };
        let s = score_member(&c, &ScoringWeights::DEFAULT);
        assert_eq!(s.attendance, 20 + 5 - 5);
        assert_eq!(s.late, -5 + 20 + 5 - 10);
        assert_eq!(s.ceu, 20);
        assert_eq!(s.referrals, 0);
        assert_eq!(s.total, 20 + 10 + 20);
        assert_eq!(s.points(Category::Late), 10);
    }

    #[test]
    fn tyfcb_units_follow_the_unit_amount() {
        let w = ScoringWeights {
            tyfcb_unit: 1000.0,
            ..ScoringWeights::DEFAULT
        };
        let c = MemberCounters {
            tyfcb: 2500.0,
            ..MemberCounters::default()
        };
        assert_eq!(score_member(&c, &w).tyfcb, 20);
        assert_eq!(tyfcb_units(10.0, 0.0), 0);
        assert_eq!(raw_count(&c, Category::Tyfcb), 2500.0);
    }

    #[test]
    fn huge_counters_saturate() {
        let c = MemberCounters {
            present: u64::MAX,
            visitors: u64::MAX,
            referrals_received_inside: u64::MAX,
            referrals_received_outside: u64::MAX,
            ..MemberCounters::default()
        };
        let s = score_member(&c, &ScoringWeights::DEFAULT);
        assert_eq!(s.visitors, i64::MAX);
        assert_eq!(s.attendance, i64::MAX);
        assert_eq!(s.referrals, 0);
        assert_eq!(s.total, i64::MAX);
        assert!(raw_count(&c, Category::Total) > 0.0);
    }
}
