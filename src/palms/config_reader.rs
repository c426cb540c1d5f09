use crate::palms::*;

use palms_scoring::builder::RosterBuilder;
use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "competitionName")]
    pub competition_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

/// A member of a team, written either as a full name or as separate parts.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemberEntry {
    FullName(String),
    Parts {
        #[serde(rename = "firstName")]
        first_name: String,
        #[serde(rename = "lastName")]
        last_name: String,
    },
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TeamConfig {
    pub key: String,
    pub name: String,
    pub captain: String,
    pub color: Option<String>,
    pub members: Vec<MemberEntry>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct NameColumnsConfig {
    pub first: Option<Vec<String>>,
    pub last: Option<Vec<String>>,
    pub full: Option<Vec<String>>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct BonusRequirementConfig {
    pub metric: String,
    #[serde(rename = "atLeast")]
    pub at_least: f64,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct BonusRuleConfig {
    pub label: String,
    pub points: i64,
    pub requirements: Vec<BonusRequirementConfig>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PalmsConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    pub teams: Vec<TeamConfig>,
    #[serde(rename = "nameColumns")]
    pub name_columns: Option<NameColumnsConfig>,
    #[serde(rename = "bonusRules")]
    pub bonus_rules: Option<Vec<BonusRuleConfig>>,
    #[serde(rename = "tyfcbUnit")]
    pub tyfcb_unit: Option<f64>,
    #[serde(rename = "fileSources")]
    pub file_sources: Option<Vec<FileSource>>,
}

impl PalmsConfig {
    /// The roster described by the configuration, with all the counters at
    /// zero.
    pub fn build_roster(&self) -> BPalmsResult<Roster> {
        let mut builder = RosterBuilder::new();
        for t in self.teams.iter() {
            builder = builder
                .team(&t.key, &t.name, &t.captain, t.color.as_deref())
                .context(ScoringSnafu {
                    message: format!("Invalid team {}", t.key),
                })?;
        }
        for t in self.teams.iter() {
            for m in t.members.iter() {
                let res = match m {
                    MemberEntry::FullName(name) => builder.add_member(&t.key, name),
                    MemberEntry::Parts {
                        first_name,
                        last_name,
                    } => builder.add_member_parts(&t.key, first_name, last_name),
                };
                res.context(ScoringSnafu {
                    message: format!("Invalid member in team {}", t.key),
                })?;
            }
        }
        let roster = builder.build().context(ScoringSnafu {
            message: "Invalid roster".to_string(),
        })?;
        Ok(roster)
    }

    pub fn rules(&self) -> PalmsResult<CompetitionRules> {
        let mut rules = CompetitionRules::standard();
        if let Some(unit) = self.tyfcb_unit {
            if !unit.is_finite() || unit <= 0.0 {
                whatever!("tyfcbUnit must be a positive amount, got {}", unit);
            }
            rules.weights.tyfcb_unit = unit;
        }
        if let Some(nc) = self.name_columns.as_ref() {
            if let Some(first) = nc.first.as_ref() {
                rules.name_columns.first = first.clone();
            }
            if let Some(last) = nc.last.as_ref() {
                rules.name_columns.last = last.clone();
            }
            if let Some(full) = nc.full.as_ref() {
                rules.name_columns.full = full.clone();
            }
        }
        if let Some(bonus_rules) = self.bonus_rules.as_ref() {
            let mut res: Vec<BonusRule> = Vec::new();
            for br in bonus_rules.iter() {
                res.push(validate_bonus_rule(br)?);
            }
            rules.bonus_rules = res;
        }
        Ok(rules)
    }
}

fn validate_bonus_rule(br: &BonusRuleConfig) -> PalmsResult<BonusRule> {
    if br.requirements.is_empty() {
        whatever!("bonus rule {:?} has no requirement", br.label);
    }
    let mut requirements: Vec<BonusRequirement> = Vec::new();
    for req in br.requirements.iter() {
        let metric = match TeamMetric::parse(&req.metric) {
            Some(m) => m,
            None => whatever!(
                "bonus rule {:?}: unknown metric {:?}",
                br.label,
                req.metric
            ),
        };
        requirements.push(BonusRequirement {
            metric,
            at_least: req.at_least,
        });
    }
    Ok(BonusRule {
        label: br.label.clone(),
        requirements,
        points: br.points,
    })
}

pub fn read_config(path: &str) -> BPalmsResult<PalmsConfig> {
    let config_str = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: PalmsConfig = serde_json::from_str(&config_str).context(ParsingJsonSnafu {})?;
    Ok(config)
}

/// Reads a leaderboard written by a previous run, for comparison.
pub fn read_reference(path: &str) -> PalmsResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> PalmsConfig {
        serde_json::from_str(s).unwrap()
    }

    const MINIMAL: &str = r#"{
        "outputSettings": {"competitionName": "Test"},
        "teams": [
            {"key": "a", "name": "Team A", "captain": "Ann Lee",
             "members": ["Ann Lee", {"firstName": "Bo", "lastName": "Kim"}]}
        ]
    }"#;

    #[test]
    fn members_as_names_or_parts() {
        let c = parse(MINIMAL);
        let roster = c.build_roster().unwrap();
        let members = &roster.teams()[0].members;
        assert_eq!(members.len(), 2);
        assert_eq!(members[1].name, "Bo Kim");
        assert_eq!(members[1].first_name, Some("Bo".to_string()));
        assert_eq!(c.rules().unwrap(), CompetitionRules::standard());
    }

    #[test]
    fn optional_rules() {
        let c = parse(
            r#"{
            "outputSettings": {"competitionName": "Test"},
            "teams": [],
            "nameColumns": {"full": ["Attendee"]},
            "tyfcbUnit": 1000,
            "bonusRules": [{"label": "50 Referrals", "points": 50,
                            "requirements": [{"metric": "referralsGiven", "atLeast": 50}]}]
        }"#,
        );
        let rules = c.rules().unwrap();
        assert_eq!(rules.weights.tyfcb_unit, 1000.0);
        assert_eq!(rules.name_columns.full, vec!["Attendee".to_string()]);
        assert_eq!(rules.name_columns.first, NameColumns::default().first);
        assert_eq!(rules.bonus_rules.len(), 1);
        assert_eq!(rules.bonus_rules[0].requirements[0].metric, TeamMetric::ReferralsGiven);
    }

    #[test]
    fn invalid_rules() {
        let c = parse(
            r#"{
            "outputSettings": {"competitionName": "Test"},
            "teams": [],
            "bonusRules": [{"label": "x", "points": 1,
                            "requirements": [{"metric": "handshakes", "atLeast": 1}]}]
        }"#,
        );
        assert!(c.rules().is_err());
        let c =
            parse(r#"{"outputSettings": {"competitionName": "T"}, "teams": [], "tyfcbUnit": 0}"#);
        assert!(c.rules().is_err());
    }

    #[test]
    fn duplicate_members_are_rejected() {
        let c = parse(
            r#"{
            "outputSettings": {"competitionName": "Test"},
            "teams": [
                {"key": "a", "name": "A", "captain": "Ann Lee", "members": ["Ann Lee"]},
                {"key": "b", "name": "B", "captain": "Bo Kim", "members": ["ann lee"]}
            ]
        }"#,
        );
        let err = c.build_roster().unwrap_err();
        assert!(matches!(
            *err,
            PalmsError::Scoring {
                source: ScoringErrors::DuplicateMember(_),
                ..
            }
        ));
    }
}
