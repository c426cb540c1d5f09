// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The canonical metrics that can be read from a report column.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum MetricKey {
    Present,
    Absent,
    Late,
    Medical,
    Substitute,
    ReferralGivenInside,
    ReferralGivenOutside,
    ReferralReceivedInside,
    ReferralReceivedOutside,
    Visitors,
    OneToOnes,
    /// Thank You For Closed Business, a currency amount.
    Tyfcb,
    /// Continuing Education Units.
    Ceu,
    Inductions,
    /// Late-arrival band: arrived on time.
    LateOnTime,
    /// Late-arrival band: arrived a little late.
    LateMild,
    /// Late-arrival band: arrived significantly late.
    LateSignificant,
}

impl MetricKey {
    pub const ALL: [MetricKey; 17] = [
        MetricKey::Present,
        MetricKey::Absent,
        MetricKey::Late,
        MetricKey::Medical,
        MetricKey::Substitute,
        MetricKey::ReferralGivenInside,
        MetricKey::ReferralGivenOutside,
        MetricKey::ReferralReceivedInside,
        MetricKey::ReferralReceivedOutside,
        MetricKey::Visitors,
        MetricKey::OneToOnes,
        MetricKey::Tyfcb,
        MetricKey::Ceu,
        MetricKey::Inductions,
        MetricKey::LateOnTime,
        MetricKey::LateMild,
        MetricKey::LateSignificant,
    ];
}

/// The content of a single cell, as decoded from a CSV or Excel file.
#[derive(PartialEq, Debug, Clone)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    /// The textual content of the cell. Numbers are printed without a
    /// fractional part when they are integral.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => "".to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) if n.fract() == 0.0 && n.is_finite() => format!("{}", *n as i64),
            CellValue::Number(n) => n.to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// One data row of a report: the column headers with their values, in the
/// order of the columns in the file.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Row {
    cells: Vec<(String, CellValue)>,
}

impl Row {
    pub fn new() -> Row {
        Row { cells: Vec::new() }
    }

    pub fn from_cells(cells: Vec<(String, CellValue)>) -> Row {
        Row { cells }
    }

    /// Convenience constructor where every cell is read as text.
    pub fn from_text(cells: &[(&str, &str)]) -> Row {
        Row {
            cells: cells
                .iter()
                .map(|(h, v)| (h.to_string(), CellValue::from(*v)))
                .collect(),
        }
    }

    pub fn push(&mut self, header: impl Into<String>, value: CellValue) {
        self.cells.push((header.into(), value));
    }

    pub fn cells(&self) -> &[(String, CellValue)] {
        &self.cells
    }

    /// Looks up a cell by header. The comparison ignores case and the
    /// surrounding whitespace of the header.
    pub fn get(&self, header: &str) -> Option<&CellValue> {
        let wanted = header.trim().to_lowercase();
        self.cells
            .iter()
            .find(|(h, _)| h.trim().to_lowercase() == wanted)
            .map(|(_, v)| v)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, v)| v.is_blank())
    }
}

// ******** Output data structures *********

/// The categories in which members can be ranked.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Category {
    Total,
    Attendance,
    Late,
    Referrals,
    Visitors,
    OneToOnes,
    Tyfcb,
    Ceu,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Total,
        Category::Attendance,
        Category::Late,
        Category::Referrals,
        Category::Visitors,
        Category::OneToOnes,
        Category::Tyfcb,
        Category::Ceu,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Total => "total",
            Category::Attendance => "attendance",
            Category::Late => "late",
            Category::Referrals => "referrals",
            Category::Visitors => "visitors",
            Category::OneToOnes => "oneToOnes",
            Category::Tyfcb => "tyfcb",
            Category::Ceu => "ceu",
        }
    }

    /// Parses a category name. Also accepts the short labels used by the
    /// dashboard (`121`, `1-2-1`).
    pub fn parse(s: &str) -> Option<Category> {
        match s.trim().to_lowercase().as_str() {
            "total" => Some(Category::Total),
            "attendance" => Some(Category::Attendance),
            "late" => Some(Category::Late),
            "referrals" => Some(Category::Referrals),
            "visitors" => Some(Category::Visitors),
            "onetoones" | "one_to_ones" | "121" | "1-2-1" => Some(Category::OneToOnes),
            "tyfcb" => Some(Category::Tyfcb),
            "ceu" => Some(Category::Ceu),
            _ => None,
        }
    }
}

/// Team-wide raw counts displayed next to a team score.
#[derive(PartialEq, Debug, Clone)]
pub struct TeamStats {
    pub total_present: u64,
    pub total_referrals_given: u64,
    pub total_visitors: u64,
    pub total_one_to_ones: u64,
    pub total_tyfcb: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct TeamScore {
    pub team_key: String,
    pub name: String,
    pub captain: String,
    pub color: Option<String>,
    pub individual_points: i64,
    pub bonus_points: i64,
    pub total_score: i64,
    /// The labels of the bonus rules this team achieved.
    pub bonuses: Vec<String>,
    pub stats: TeamStats,
}

#[derive(PartialEq, Debug, Clone)]
pub struct IndividualScore {
    pub member: String,
    pub team: String,
    pub color: Option<String>,
    pub category: Category,
    /// Points in the requested category.
    pub points: i64,
    /// The raw count behind the points of the requested category.
    pub raw_count: f64,
    /// Points across all categories.
    pub total: i64,
}

/// Errors that prevent an engine operation from completing.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ScoringErrors {
    /// A batch without any data row.
    EmptyBatch,
    DuplicateTeam(String),
    /// Member names must be unique across the whole roster.
    DuplicateMember(String),
    UnknownTeam(String),
    UnknownMember(String),
    EmptyMemberName,
    /// The shared roster lock was poisoned by a panicking writer.
    RosterUnavailable,
}

impl Error for ScoringErrors {}

impl Display for ScoringErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringErrors::EmptyBatch => write!(f, "the report does not contain any data row"),
            ScoringErrors::DuplicateTeam(key) => write!(f, "team {} is declared twice", key),
            ScoringErrors::DuplicateMember(name) => {
                write!(f, "member {} is declared more than once", name)
            }
            ScoringErrors::UnknownTeam(key) => write!(f, "unknown team {}", key),
            ScoringErrors::UnknownMember(name) => {
                write!(f, "member {} not found in any team", name)
            }
            ScoringErrors::EmptyMemberName => write!(f, "a member name is required"),
            ScoringErrors::RosterUnavailable => write!(f, "the roster is unavailable"),
        }
    }
}

// ********* Configuration **********

pub const ONE_TO_ONE_BONUS_THRESHOLD: u64 = 50;
pub const ONE_TO_ONE_BONUS_POINTS: i64 = 100;
pub const REFERRALS_OUTSIDE_BONUS_THRESHOLD: u64 = 30;
pub const REFERRALS_INSIDE_BONUS_THRESHOLD: u64 = 20;
pub const REFERRALS_BONUS_POINTS: i64 = 100;
pub const VISITORS_BONUS_THRESHOLD: u64 = 10;
pub const VISITORS_BONUS_POINTS: i64 = 100;
pub const INDUCTIONS_BONUS_THRESHOLD: u64 = 3;
pub const INDUCTIONS_BONUS_POINTS: i64 = 150;

/// Points granted per unit of each metric.
#[derive(PartialEq, Debug, Clone)]
pub struct ScoringWeights {
    pub present: i64,
    pub substitute: i64,
    pub absent: i64,
    pub late: i64,
    pub medical: i64,
    pub late_on_time: i64,
    pub late_mild: i64,
    pub late_significant: i64,
    pub referral_given_inside: i64,
    pub referral_given_outside: i64,
    pub referral_received: i64,
    pub visitor: i64,
    pub one_to_one: i64,
    /// Points per recorded TYFCB unit.
    pub tyfcb: i64,
    /// The currency amount that makes one recorded TYFCB unit.
    pub tyfcb_unit: f64,
    pub ceu: i64,
}

impl ScoringWeights {
    pub const DEFAULT: ScoringWeights = ScoringWeights {
        present: 10,
        substitute: 5,
        absent: -5,
        late: -5,
        medical: 0,
        late_on_time: 10,
        late_mild: 5,
        late_significant: -5,
        referral_given_inside: 5,
        referral_given_outside: 10,
        referral_received: 0,
        visitor: 15,
        one_to_one: 10,
        tyfcb: 10,
        tyfcb_unit: 1.0,
        ceu: 5,
    };
}

impl Default for ScoringWeights {
    fn default() -> Self {
        ScoringWeights::DEFAULT
    }
}

/// A team-wide raw count that a bonus rule can be checked against.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum TeamMetric {
    Present,
    OneToOnes,
    ReferralsGivenInside,
    ReferralsGivenOutside,
    /// Inside and outside referrals given, combined.
    ReferralsGiven,
    Visitors,
    Inductions,
    TyfcbAmount,
    Ceu,
}

impl TeamMetric {
    pub fn parse(s: &str) -> Option<TeamMetric> {
        match s {
            "present" => Some(TeamMetric::Present),
            "oneToOnes" => Some(TeamMetric::OneToOnes),
            "referralsGivenInside" => Some(TeamMetric::ReferralsGivenInside),
            "referralsGivenOutside" => Some(TeamMetric::ReferralsGivenOutside),
            "referralsGiven" => Some(TeamMetric::ReferralsGiven),
            "visitors" => Some(TeamMetric::Visitors),
            "inductions" => Some(TeamMetric::Inductions),
            "tyfcb" => Some(TeamMetric::TyfcbAmount),
            "ceu" => Some(TeamMetric::Ceu),
            _ => None,
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct BonusRequirement {
    pub metric: TeamMetric,
    pub at_least: f64,
}

/// A team bonus: awarded once when all the requirements are met by the
/// summed raw counters of the team.
#[derive(PartialEq, Debug, Clone)]
pub struct BonusRule {
    pub label: String,
    pub requirements: Vec<BonusRequirement>,
    pub points: i64,
}

impl BonusRule {
    pub fn default_rules() -> Vec<BonusRule> {
        vec![
            BonusRule {
                label: format!("{} One-to-Ones", ONE_TO_ONE_BONUS_THRESHOLD),
                requirements: vec![BonusRequirement {
                    metric: TeamMetric::OneToOnes,
                    at_least: ONE_TO_ONE_BONUS_THRESHOLD as f64,
                }],
                points: ONE_TO_ONE_BONUS_POINTS,
            },
            BonusRule {
                label: format!(
                    "{} Referrals ({} Outside + {} Inside)",
                    REFERRALS_OUTSIDE_BONUS_THRESHOLD + REFERRALS_INSIDE_BONUS_THRESHOLD,
                    REFERRALS_OUTSIDE_BONUS_THRESHOLD,
                    REFERRALS_INSIDE_BONUS_THRESHOLD
                ),
                requirements: vec![
                    BonusRequirement {
                        metric: TeamMetric::ReferralsGivenOutside,
                        at_least: REFERRALS_OUTSIDE_BONUS_THRESHOLD as f64,
                    },
                    BonusRequirement {
                        metric: TeamMetric::ReferralsGivenInside,
                        at_least: REFERRALS_INSIDE_BONUS_THRESHOLD as f64,
                    },
                ],
                points: REFERRALS_BONUS_POINTS,
            },
            BonusRule {
                label: format!("{} Visitors", VISITORS_BONUS_THRESHOLD),
                requirements: vec![BonusRequirement {
                    metric: TeamMetric::Visitors,
                    at_least: VISITORS_BONUS_THRESHOLD as f64,
                }],
                points: VISITORS_BONUS_POINTS,
            },
            BonusRule {
                label: format!("{} Inductions", INDUCTIONS_BONUS_THRESHOLD),
                requirements: vec![BonusRequirement {
                    metric: TeamMetric::Inductions,
                    at_least: INDUCTIONS_BONUS_THRESHOLD as f64,
                }],
                points: INDUCTIONS_BONUS_POINTS,
            },
        ]
    }
}

/// The column headers that carry the member name.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct NameColumns {
    pub first: Vec<String>,
    pub last: Vec<String>,
    /// Columns holding the full name, tried in order after the first/last pair.
    pub full: Vec<String>,
}

impl Default for NameColumns {
    fn default() -> Self {
        let to_vec = |l: &[&str]| l.iter().map(|s| s.to_string()).collect();
        NameColumns {
            first: to_vec(&["first", "first name", "firstname", "given name"]),
            last: to_vec(&["last", "last name", "lastname", "surname"]),
            full: to_vec(&["member name", "participant name", "name", "member"]),
        }
    }
}

/// Everything that controls how a competition is scored.
#[derive(PartialEq, Debug, Clone)]
pub struct CompetitionRules {
    pub weights: ScoringWeights,
    pub bonus_rules: Vec<BonusRule>,
    pub name_columns: NameColumns,
}

impl CompetitionRules {
    /// The default weights and name columns, with the default bonus rules.
    pub fn standard() -> CompetitionRules {
        CompetitionRules {
            weights: ScoringWeights::DEFAULT,
            bonus_rules: BonusRule::default_rules(),
            name_columns: NameColumns::default(),
        }
    }
}

impl Default for CompetitionRules {
    fn default() -> Self {
        CompetitionRules::standard()
    }
}
