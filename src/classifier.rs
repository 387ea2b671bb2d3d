//! Business rule counters.
//!
//! Each [`Counter`] owns a list of (category, action) combinations. A record
//! bumps a counter by one when its trimmed, upper-cased fields match any of
//! that counter's combinations. Counters are independent: one record can
//! bump several of them, and the order of [`RULES`] has no effect.
//!
//! `Gift` and `FbMessages` are part of the report but have no combinations,
//! so they always read zero.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::ops::Add;
use tracing::debug;

use crate::models::ActivityRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Counter {
    TotalAccountsWorked,
    Endorsements,
    RespondedEmails,
    InboundCalls,
    OutboundCalls,
    WelcomeCalls,
    PublicReviews,
    Sms,
    Gift,
    FbMessages,
    Training,
    Meeting,
    Coaching,
    CallListening,
}

impl Counter {
    /// Report order
    pub const ALL: [Counter; 14] = [
        Counter::TotalAccountsWorked,
        Counter::Endorsements,
        Counter::RespondedEmails,
        Counter::InboundCalls,
        Counter::OutboundCalls,
        Counter::WelcomeCalls,
        Counter::PublicReviews,
        Counter::Sms,
        Counter::Gift,
        Counter::FbMessages,
        Counter::Training,
        Counter::Meeting,
        Counter::Coaching,
        Counter::CallListening,
    ];

    /// Row label in the activity summary table
    pub fn label(&self) -> &'static str {
        match self {
            Counter::TotalAccountsWorked => "Total Accounts Worked Today",
            Counter::Endorsements => "Endorsement Personal/Tracker",
            Counter::RespondedEmails => "Responded Emails in ZD",
            Counter::InboundCalls => "Inbound Calls",
            Counter::OutboundCalls => "Sequences Outbound Calls",
            Counter::WelcomeCalls => "After Sales Welcome Call (Completed)",
            Counter::PublicReviews => "Public Reviews",
            Counter::Sms => "SMS",
            Counter::Gift => "Gift",
            Counter::FbMessages => "FB Messages",
            Counter::Training => "Training",
            Counter::Meeting => "Meeting",
            Counter::Coaching => "Coaching",
            Counter::CallListening => "Call Listening",
        }
    }
}

/// Normalized category constants
pub const ACCOUNT: &str = "ACCOUNT";
pub const OB: &str = "OB";
pub const IB: &str = "IB";
pub const TEAMS_DEV: &str = "TEAM'S DEV";

/// A (category, action) combination; `category: None` matches any category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Combo {
    pub category: Option<&'static str>,
    pub action: &'static str,
}

impl Combo {
    const fn pair(category: &'static str, action: &'static str) -> Self {
        Self {
            category: Some(category),
            action,
        }
    }

    const fn any_category(action: &'static str) -> Self {
        Self {
            category: None,
            action,
        }
    }

    /// Both arguments must already be trimmed and upper-cased
    pub fn matches(&self, category: &str, action: &str) -> bool {
        self.action == action && self.category.map_or(true, |c| c == category)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub counter: Counter,
    pub combos: &'static [Combo],
}

impl Rule {
    pub fn fires(&self, category: &str, action: &str) -> bool {
        self.combos.iter().any(|c| c.matches(category, action))
    }
}

pub const RULES: &[Rule] = &[
    Rule {
        counter: Counter::TotalAccountsWorked,
        combos: &[
            Combo::pair(OB, "PROCESS"),
            Combo::pair(IB, "PROCESS"),
            Combo::pair(ACCOUNT, "EMAIL"),
            Combo::pair(ACCOUNT, "ENDO"),
            Combo::pair(ACCOUNT, "SMS"),
            Combo::pair(OB, "WC"),
            Combo::pair(IB, "WC"),
            Combo::pair(ACCOUNT, "PUBLIC REVIEW"),
            Combo::pair(OB, "PUBLIC REVIEW"),
            Combo::pair(TEAMS_DEV, "TRAINING"),
            Combo::pair(TEAMS_DEV, "MEETING"),
            Combo::pair(TEAMS_DEV, "COACHING"),
            Combo::pair(TEAMS_DEV, "CALL LISTENING"),
        ],
    },
    Rule {
        counter: Counter::Endorsements,
        combos: &[Combo::pair(ACCOUNT, "ENDO")],
    },
    Rule {
        counter: Counter::RespondedEmails,
        combos: &[Combo::any_category("EMAIL")],
    },
    Rule {
        counter: Counter::InboundCalls,
        combos: &[Combo::pair(IB, "PROCESS")],
    },
    Rule {
        counter: Counter::OutboundCalls,
        combos: &[Combo::pair(OB, "PROCESS")],
    },
    Rule {
        counter: Counter::WelcomeCalls,
        combos: &[Combo::pair(OB, "WC"), Combo::pair(IB, "WC")],
    },
    Rule {
        counter: Counter::PublicReviews,
        combos: &[
            Combo::pair(ACCOUNT, "PUBLIC REVIEW"),
            Combo::pair(OB, "PUBLIC REVIEW"),
        ],
    },
    Rule {
        counter: Counter::Sms,
        combos: &[Combo::pair(ACCOUNT, "SMS")],
    },
    Rule {
        counter: Counter::Training,
        combos: &[Combo::pair(TEAMS_DEV, "TRAINING")],
    },
    Rule {
        counter: Counter::Meeting,
        combos: &[Combo::pair(TEAMS_DEV, "MEETING")],
    },
    Rule {
        counter: Counter::Coaching,
        combos: &[Combo::pair(TEAMS_DEV, "COACHING")],
    },
    Rule {
        counter: Counter::CallListening,
        combos: &[Combo::pair(TEAMS_DEV, "CALL LISTENING")],
    },
];

/// Trim and upper-case a field for rule matching
pub fn normalize(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Named totals, always holding every [`Counter`] in report order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamedCounters {
    counts: IndexMap<Counter, usize>,
}

impl NamedCounters {
    pub fn new() -> Self {
        Self {
            counts: Counter::ALL.iter().map(|c| (*c, 0)).collect(),
        }
    }

    pub fn get(&self, counter: Counter) -> usize {
        self.counts.get(&counter).copied().unwrap_or(0)
    }

    fn increment(&mut self, counter: Counter) {
        *self.counts.entry(counter).or_insert(0) += 1;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Counter, usize)> + '_ {
        self.counts.iter().map(|(c, n)| (*c, *n))
    }

    pub fn is_zero(&self) -> bool {
        self.counts.values().all(|n| *n == 0)
    }
}

impl Default for NamedCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl Add for NamedCounters {
    type Output = NamedCounters;

    fn add(mut self, other: NamedCounters) -> NamedCounters {
        for (counter, n) in other.iter() {
            *self.counts.entry(counter).or_insert(0) += n;
        }
        self
    }
}

/// Counters a single record contributes to
pub fn matching_counters(record: &ActivityRecord) -> Vec<Counter> {
    let category = normalize(&record.category);
    let action = normalize(&record.action);

    RULES
        .iter()
        .filter(|rule| rule.fires(&category, &action))
        .map(|rule| rule.counter)
        .collect()
}

pub fn classify(records: &[ActivityRecord]) -> NamedCounters {
    let mut counters = NamedCounters::new();

    for record in records {
        for counter in matching_counters(record) {
            counters.increment(counter);
        }
    }

    debug!(
        "Classified {} records, {} accounts worked",
        records.len(),
        counters.get(Counter::TotalAccountsWorked)
    );
    counters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(pairs: &[(&str, &str)]) -> Vec<ActivityRecord> {
        pairs
            .iter()
            .map(|(c, a)| ActivityRecord::untimed(*c, *a))
            .collect()
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let counters = classify(&[]);
        assert!(counters.is_zero());
        assert_eq!(counters.iter().count(), Counter::ALL.len());
    }

    #[test]
    fn test_outbound_and_email() {
        let counters = classify(&records(&[
            ("OB", "PROCESS"),
            ("OB", "PROCESS"),
            ("ACCOUNT", "EMAIL"),
        ]));
        assert_eq!(counters.get(Counter::TotalAccountsWorked), 3);
        assert_eq!(counters.get(Counter::OutboundCalls), 2);
        assert_eq!(counters.get(Counter::RespondedEmails), 1);
        assert_eq!(counters.get(Counter::InboundCalls), 0);
    }

    #[test]
    fn test_empty_fields_match_nothing() {
        assert!(classify(&records(&[("", "")])).is_zero());
    }

    #[test]
    fn test_matching_ignores_case_and_whitespace() {
        let counters = classify(&records(&[("ib", " process ")]));
        assert_eq!(counters.get(Counter::TotalAccountsWorked), 1);
        assert_eq!(counters.get(Counter::InboundCalls), 1);
        assert_eq!(counters.get(Counter::OutboundCalls), 0);
    }

    #[test]
    fn test_email_counts_for_any_category() {
        let counters = classify(&records(&[("OB", "EMAIL"), ("", "email")]));
        assert_eq!(counters.get(Counter::RespondedEmails), 2);
        // Only ACCOUNT/EMAIL is an account worked
        assert_eq!(counters.get(Counter::TotalAccountsWorked), 0);
    }

    #[test]
    fn test_account_email_counts_each_counter_once() {
        let rec = ActivityRecord::untimed("ACCOUNT", "EMAIL");
        assert_eq!(
            matching_counters(&rec),
            vec![Counter::TotalAccountsWorked, Counter::RespondedEmails]
        );
    }

    #[test]
    fn test_every_combo_of_total_accounts_worked() {
        let pairs = [
            ("OB", "PROCESS", Counter::OutboundCalls),
            ("IB", "PROCESS", Counter::InboundCalls),
            ("ACCOUNT", "EMAIL", Counter::RespondedEmails),
            ("ACCOUNT", "ENDO", Counter::Endorsements),
            ("ACCOUNT", "SMS", Counter::Sms),
            ("OB", "WC", Counter::WelcomeCalls),
            ("IB", "WC", Counter::WelcomeCalls),
            ("ACCOUNT", "PUBLIC REVIEW", Counter::PublicReviews),
            ("OB", "PUBLIC REVIEW", Counter::PublicReviews),
            ("TEAM'S DEV", "TRAINING", Counter::Training),
            ("TEAM'S DEV", "MEETING", Counter::Meeting),
            ("TEAM'S DEV", "COACHING", Counter::Coaching),
            ("TEAM'S DEV", "CALL LISTENING", Counter::CallListening),
        ];

        for (category, action, specific) in pairs {
            let hits = matching_counters(&ActivityRecord::untimed(category, action));
            assert_eq!(
                hits,
                vec![Counter::TotalAccountsWorked, specific],
                "{category}/{action}"
            );
        }
    }

    #[test]
    fn test_unlisted_combos_do_not_fire() {
        let counters = classify(&records(&[
            ("IB", "ENDO"),
            ("TEAM'S DEV", "PROCESS"),
            ("IB", "PUBLIC REVIEW"),
            ("ACCOUNT", "WC"),
            ("TEAMS DEV", "MEETING"),
        ]));
        assert!(counters.is_zero());
    }

    #[test]
    fn test_gift_and_fb_messages_never_fire() {
        let counters = classify(&records(&[
            ("ACCOUNT", "GIFT"),
            ("ACCOUNT", "FB MESSAGES"),
            ("ACCOUNT", "FB"),
        ]));
        assert_eq!(counters.get(Counter::Gift), 0);
        assert_eq!(counters.get(Counter::FbMessages), 0);
        assert!(RULES
            .iter()
            .all(|r| r.counter != Counter::Gift && r.counter != Counter::FbMessages));
    }

    #[test]
    fn test_classify_is_additive_over_concatenation() {
        let a = records(&[("OB", "PROCESS"), ("ACCOUNT", "EMAIL"), ("IB", "WC")]);
        let b = records(&[("team's dev", "coaching"), ("OB", "EMAIL"), ("", "")]);
        let joined: Vec<_> = a.iter().chain(b.iter()).cloned().collect();

        let whole = classify(&joined);
        let parts = classify(&a) + classify(&b);
        for counter in Counter::ALL {
            assert_eq!(whole.get(counter), parts.get(counter), "{:?}", counter);
        }
        assert_eq!(classify(&joined), whole);
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(classify(&records(&[("OB", "WC")]))).unwrap();
        assert_eq!(json["totalAccountsWorked"], 1);
        assert_eq!(json["welcomeCalls"], 1);
        assert_eq!(json["fbMessages"], 0);
        for counter in Counter::ALL {
            let key = serde_json::to_value(counter).unwrap();
            let key = key.as_str().unwrap();
            assert!(json.get(key).is_some(), "{}", key);
        }
    }
}
