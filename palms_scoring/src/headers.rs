use log::debug;

use crate::config::MetricKey;

/// How an alias is compared with a cleaned-up header.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum Alias {
    /// The whole header. Used for the single-letter codes so that they do
    /// not collide with longer words.
    Exact(&'static str),
    /// One alphanumeric token of the header (`RGI`, `RGI (count)`).
    Token(&'static str),
    /// Consecutive tokens of the header, separated by single spaces here.
    /// `on time` matches `On-Time` but not `Registration Time`.
    Words(&'static str),
    /// Any substring of the header.
    Contains(&'static str),
}

struct HeaderRule {
    key: MetricKey,
    aliases: &'static [Alias],
}

use Alias::*;

// Order matters: the first matching rule wins. The late-arrival bands must
// come before the generic late rule.
static HEADER_RULES: &[HeaderRule] = &[
    HeaderRule {
        key: MetricKey::ReferralGivenInside,
        aliases: &[
            Token("rgi"),
            Contains("referrals given inside"),
            Contains("referral given inside"),
            Contains("ref given in"),
        ],
    },
    HeaderRule {
        key: MetricKey::ReferralGivenOutside,
        aliases: &[
            Token("rgo"),
            Contains("referrals given outside"),
            Contains("referral given outside"),
            Contains("ref given out"),
        ],
    },
    HeaderRule {
        key: MetricKey::ReferralReceivedInside,
        aliases: &[
            Token("rri"),
            Contains("referrals received inside"),
            Contains("referral received inside"),
            Contains("ref received in"),
        ],
    },
    HeaderRule {
        key: MetricKey::ReferralReceivedOutside,
        aliases: &[
            Token("rro"),
            Contains("referrals received outside"),
            Contains("referral received outside"),
            Contains("ref received out"),
        ],
    },
    HeaderRule {
        key: MetricKey::Tyfcb,
        aliases: &[
            Token("tyfcb"),
            Contains("thank you"),
            Contains("closed business"),
        ],
    },
    HeaderRule {
        key: MetricKey::Ceu,
        aliases: &[
            Token("ceu"),
            Token("ceus"),
            Contains("continuing education"),
            Contains("education unit"),
        ],
    },
    HeaderRule {
        key: MetricKey::OneToOnes,
        aliases: &[
            Contains("1-2-1"),
            Token("121"),
            Token("121s"),
            Token("1to1"),
            Contains("1-to-1"),
            Contains("1 to 1"),
            Contains("one to one"),
            Contains("one-to-one"),
        ],
    },
    HeaderRule {
        key: MetricKey::Visitors,
        aliases: &[Exact("v"), Contains("visitor")],
    },
    HeaderRule {
        key: MetricKey::LateOnTime,
        aliases: &[Words("on time"), Token("ontime")],
    },
    HeaderRule {
        key: MetricKey::LateMild,
        aliases: &[Words("mildly late"), Words("slightly late")],
    },
    HeaderRule {
        key: MetricKey::LateSignificant,
        aliases: &[Words("significantly late"), Words("very late")],
    },
    HeaderRule {
        key: MetricKey::Substitute,
        aliases: &[Exact("s"), Contains("substitut")],
    },
    HeaderRule {
        key: MetricKey::Medical,
        aliases: &[Exact("m"), Contains("medical")],
    },
    HeaderRule {
        key: MetricKey::Inductions,
        aliases: &[Exact("i"), Contains("induction")],
    },
    HeaderRule {
        key: MetricKey::Present,
        aliases: &[Exact("p"), Token("present")],
    },
    HeaderRule {
        key: MetricKey::Absent,
        aliases: &[Exact("a"), Token("absent"), Token("absence"), Token("absences")],
    },
    HeaderRule {
        key: MetricKey::Late,
        aliases: &[Exact("l"), Token("late"), Token("lates")],
    },
];

/// Maps a column header of a report to the metric it holds, if any.
///
/// Headers that do not match any rule are not an error: the column is
/// simply not a metric (names, dates, comments, ...).
pub fn normalize(header: &str) -> Option<MetricKey> {
    let h = clean_header(header);
    if h.is_empty() {
        return None;
    }
    let tokens: Vec<&str> = h
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    let res = HEADER_RULES
        .iter()
        .find(|rule| {
            rule.aliases.iter().any(|alias| match alias {
                Exact(s) => h == *s,
                Token(s) => tokens.iter().any(|t| t == s),
                Words(s) => {
                    let words: Vec<&str> = s.split(' ').collect();
                    tokens.windows(words.len()).any(|w| w == words.as_slice())
                }
                Contains(s) => h.contains(s),
            })
        })
        .map(|rule| rule.key);
    debug!("normalize: {:?} -> {:?}", header, res);
    res
}

/// The canonical header of a metric. It normalizes back to the same metric.
pub fn display_name(key: MetricKey) -> &'static str {
    match key {
        MetricKey::Present => "Present",
        MetricKey::Absent => "Absent",
        MetricKey::Late => "Late",
        MetricKey::Medical => "Medical",
        MetricKey::Substitute => "Substitute",
        MetricKey::ReferralGivenInside => "RGI",
        MetricKey::ReferralGivenOutside => "RGO",
        MetricKey::ReferralReceivedInside => "RRI",
        MetricKey::ReferralReceivedOutside => "RRO",
        MetricKey::Visitors => "Visitors",
        MetricKey::OneToOnes => "1-2-1",
        MetricKey::Tyfcb => "TYFCB",
        MetricKey::Ceu => "CEU",
        MetricKey::Inductions => "Inductions",
        MetricKey::LateOnTime => "On Time",
        MetricKey::LateMild => "Mildly Late",
        MetricKey::LateSignificant => "Significantly Late",
    }
}

fn clean_header(header: &str) -> String {
    header
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palms_export_headers() {
        assert_eq!(normalize("P"), Some(MetricKey::Present));
        assert_eq!(normalize(" a "), Some(MetricKey::Absent));
        assert_eq!(normalize("L"), Some(MetricKey::Late));
        assert_eq!(normalize("M"), Some(MetricKey::Medical));
        assert_eq!(normalize("S"), Some(MetricKey::Substitute));
        assert_eq!(normalize("RGI"), Some(MetricKey::ReferralGivenInside));
        assert_eq!(normalize("RGO"), Some(MetricKey::ReferralGivenOutside));
        assert_eq!(normalize("RRI"), Some(MetricKey::ReferralReceivedInside));
        assert_eq!(normalize("RRO"), Some(MetricKey::ReferralReceivedOutside));
        assert_eq!(normalize("V"), Some(MetricKey::Visitors));
        assert_eq!(normalize("1-2-1"), Some(MetricKey::OneToOnes));
        assert_eq!(normalize("TYFCB"), Some(MetricKey::Tyfcb));
        assert_eq!(normalize("CEU"), Some(MetricKey::Ceu));
    }

    #[test]
    fn long_form_headers() {
        assert_eq!(
            normalize("Referrals Given Inside"),
            Some(MetricKey::ReferralGivenInside)
        );
        assert_eq!(
            normalize("Ref Given Out"),
            Some(MetricKey::ReferralGivenOutside)
        );
        assert_eq!(
            normalize("Thank You For Closed Business (INR)"),
            Some(MetricKey::Tyfcb)
        );
        assert_eq!(normalize("One To One Meetings"), Some(MetricKey::OneToOnes));
        assert_eq!(normalize("Visitors Brought"), Some(MetricKey::Visitors));
        assert_eq!(normalize("Times Present"), Some(MetricKey::Present));
        assert_eq!(normalize("RGI (count)"), Some(MetricKey::ReferralGivenInside));
    }

    #[test]
    fn late_bands_before_generic_late() {
        assert_eq!(normalize("On Time"), Some(MetricKey::LateOnTime));
        assert_eq!(normalize("Mildly Late"), Some(MetricKey::LateMild));
        assert_eq!(normalize("Very late"), Some(MetricKey::LateSignificant));
        assert_eq!(normalize("Late Arrivals"), Some(MetricKey::Late));
    }

    #[test]
    fn single_letters_and_codes_do_not_collide() {
        assert_eq!(normalize("Origin"), None);
        assert_eq!(normalize("Pa"), None);
        assert_eq!(normalize("Name"), None);
        assert_eq!(normalize("First Name"), None);
        assert_eq!(normalize("Last Name"), None);
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("   "), None);
    }

    #[test]
    fn words_inside_other_words_are_not_metrics() {
        assert_eq!(normalize("Accumulated"), None);
        assert_eq!(normalize("Translated"), None);
        assert_eq!(normalize("Template"), None);
        assert_eq!(normalize("Registration Time"), None);
        assert_eq!(normalize("Feature Presentations"), None);
        assert_eq!(normalize("Absentee Count"), None);
        assert_eq!(normalize("On-Time"), Some(MetricKey::LateOnTime));
        assert_eq!(normalize("Times Absent"), Some(MetricKey::Absent));
        assert_eq!(normalize("Lates"), Some(MetricKey::Late));
    }

    #[test]
    fn display_names_round_trip() {
        for key in MetricKey::ALL {
            assert_eq!(normalize(display_name(key)), Some(key), "{:?}", key);
        }
    }
}
