//! Console report for a profile response.
//!
//! Five traits are printed in a fixed order. Each [`TraitKind`] knows the entry shape
//! it expects and decodes entries into a [`TraitEntry`]; anything that does not fit
//! is kept as [`TraitEntry::Raw`] and printed verbatim.
use serde::Deserialize;
use serde_json::Value;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraitKind {
    Needs,
    ConsumptionPreferences,
    Values,
    Behavior,
    Personality,
}

impl TraitKind {
    /// Print order.
    pub const ALL: [TraitKind; 5] = [
        TraitKind::Needs,
        TraitKind::ConsumptionPreferences,
        TraitKind::Values,
        TraitKind::Behavior,
        TraitKind::Personality,
    ];

    pub fn key(self) -> &'static str {
        match self {
            TraitKind::Needs => "needs",
            TraitKind::ConsumptionPreferences => "consumption_preferences",
            TraitKind::Values => "values",
            TraitKind::Behavior => "behavior",
            TraitKind::Personality => "personality",
        }
    }

    pub fn parse_entry(self, entry: &Value) -> TraitEntry {
        let decoded = match self {
            TraitKind::Needs | TraitKind::Values | TraitKind::Personality => {
                ScoredEntry::deserialize(entry).map(|e| TraitEntry::Scored {
                    name: e.name,
                    percentile: e.percentile,
                })
            }
            TraitKind::ConsumptionPreferences => {
                PreferenceCategory::deserialize(entry).map(|c| TraitEntry::Preferences {
                    category: c.consumption_preference_category_id,
                    preferences: c
                        .consumption_preferences
                        .into_iter()
                        .map(|p| Preference {
                            name: p.name,
                            score: p.score,
                        })
                        .collect(),
                })
            }
            TraitKind::Behavior => BehaviorEntry::deserialize(entry).map(|b| TraitEntry::Behavior {
                trait_id: b.trait_id,
                percentage: b.percentage,
            }),
        };
        decoded.unwrap_or_else(|e| {
            tracing::debug!(kind = self.key(), error = %e, "report.entry.raw");
            TraitEntry::Raw(entry.clone())
        })
    }

    /// Entries of this trait in `profile`; `None` when the key is absent.
    pub fn entries(self, profile: &Value) -> Option<Vec<TraitEntry>> {
        let section = profile.get(self.key())?;
        Some(match section {
            Value::Array(items) => items.iter().map(|e| self.parse_entry(e)).collect(),
            other => vec![TraitEntry::Raw(other.clone())],
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Preference {
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TraitEntry {
    /// needs, values, personality
    Scored { name: String, percentile: f64 },
    Preferences {
        category: String,
        preferences: Vec<Preference>,
    },
    Behavior { trait_id: String, percentage: f64 },
    Raw(Value),
}

impl TraitEntry {
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self {
            TraitEntry::Scored { name, percentile } => writeln!(out, "\t {name} -> {percentile}"),
            TraitEntry::Preferences {
                category,
                preferences,
            } => {
                writeln!(out, "\t Consumption Preference: {category}")?;
                for p in preferences {
                    writeln!(out, "\t\t {} -> {}", p.name, p.score)?;
                }
                Ok(())
            }
            TraitEntry::Behavior {
                trait_id,
                percentage,
            } => writeln!(out, "\t {trait_id} -> {percentage}"),
            TraitEntry::Raw(v) => writeln!(out, "\t {v}"),
        }
    }
}

#[derive(Deserialize)]
struct ScoredEntry {
    name: String,
    percentile: f64,
}

#[derive(Deserialize)]
struct PreferenceCategory {
    consumption_preference_category_id: String,
    #[serde(default)]
    consumption_preferences: Vec<PreferenceEntry>,
}

#[derive(Deserialize)]
struct PreferenceEntry {
    name: String,
    score: f64,
}

#[derive(Deserialize)]
struct BehaviorEntry {
    trait_id: String,
    percentage: f64,
}

/// Write the five-trait report for `profile` to `out`.
pub fn render<W: Write>(profile: &Value, out: &mut W) -> io::Result<()> {
    for kind in TraitKind::ALL {
        writeln!(out, "Trait: {}", kind.key())?;
        match kind.entries(profile) {
            Some(entries) => {
                for entry in &entries {
                    entry.write_to(out)?;
                }
            }
            None => tracing::warn!(kind = kind.key(), "report.trait.missing"),
        }
    }
    Ok(())
}

/// [`render`] to a locked stdout.
pub fn print_report(profile: &Value) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render(profile, &mut out)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rendered(profile: &Value) -> String {
        let mut buf = Vec::new();
        render(profile, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn keys_follow_print_order() {
        let keys: Vec<&str> = TraitKind::ALL.iter().map(|k| k.key()).collect();
        assert_eq!(
            keys,
            vec!["needs", "consumption_preferences", "values", "behavior", "personality"]
        );
    }

    #[test]
    fn each_kind_selects_its_fields() {
        let needs = TraitKind::Needs.parse_entry(&json!({
            "trait_id": "need_challenge", "name": "Challenge", "category": "needs",
            "percentile": 0.67, "raw_score": 0.75
        }));
        assert_eq!(
            needs,
            TraitEntry::Scored {
                name: "Challenge".into(),
                percentile: 0.67
            }
        );

        let behavior = TraitKind::Behavior.parse_entry(&json!({
            "trait_id": "behavior_sunday", "name": "Sunday", "category": "behavior",
            "percentage": 0.21
        }));
        assert_eq!(
            behavior,
            TraitEntry::Behavior {
                trait_id: "behavior_sunday".into(),
                percentage: 0.21
            }
        );
    }

    #[test]
    fn mismatched_shape_falls_back_to_raw() {
        let odd = json!({ "label": "Challenge", "value": 3 });
        assert_eq!(TraitKind::Values.parse_entry(&odd), TraitEntry::Raw(odd.clone()));
        assert_eq!(TraitKind::Behavior.parse_entry(&odd), TraitEntry::Raw(odd));
    }

    #[test]
    fn renders_full_report() {
        let profile = json!({
            "word_count": 1500,
            "personality": [
                { "trait_id": "big5_openness", "name": "Openness", "percentile": 0.8,
                  "children": [] }
            ],
            "needs": [
                { "trait_id": "need_challenge", "name": "Challenge", "percentile": 0.67 },
                { "trait_id": "need_closeness", "name": "Closeness", "percentile": 0.25 }
            ],
            "values": [
                { "trait_id": "value_hedonism", "name": "Hedonism", "percentile": 0.5 }
            ],
            "behavior": [
                { "trait_id": "behavior_sunday", "name": "Sunday", "percentage": 0.21 }
            ],
            "consumption_preferences": [
                {
                    "consumption_preference_category_id": "consumption_preferences_shopping",
                    "name": "Purchasing Preferences",
                    "consumption_preferences": [
                        { "consumption_preference_id": "consumption_preferences_automobile_ownership_cost",
                          "name": "Likely to be sensitive to ownership cost when buying automobiles",
                          "score": 0.5 },
                        { "consumption_preference_id": "consumption_preferences_clothes_quality",
                          "name": "Likely to prefer quality when buying clothes",
                          "score": 1.0 }
                    ]
                }
            ]
        });

        let expected = "\
Trait: needs
\t Challenge -> 0.67
\t Closeness -> 0.25
Trait: consumption_preferences
\t Consumption Preference: consumption_preferences_shopping
\t\t Likely to be sensitive to ownership cost when buying automobiles -> 0.5
\t\t Likely to prefer quality when buying clothes -> 1
Trait: values
\t Hedonism -> 0.5
Trait: behavior
\t behavior_sunday -> 0.21
Trait: personality
\t Openness -> 0.8
";
        assert_eq!(rendered(&profile), expected);
    }

    #[test]
    fn missing_trait_prints_header_only() {
        let profile = json!({ "needs": [] });
        assert_eq!(
            rendered(&profile),
            "Trait: needs\nTrait: consumption_preferences\nTrait: values\nTrait: behavior\nTrait: personality\n"
        );
    }

    #[test]
    fn raw_entries_print_as_json() {
        let profile = json!({ "behavior": [ { "oops": true } ] });
        assert!(rendered(&profile).contains("Trait: behavior\n\t {\"oops\":true}\n"));
    }

    #[test]
    fn preference_category_without_id_prints_raw() {
        let uncategorised = json!({
            "consumption_preferences": [ { "name": "Likes hiking", "score": 0.5 } ],
            "name": "Outdoors"
        });
        assert_eq!(
            TraitKind::ConsumptionPreferences.parse_entry(&uncategorised),
            TraitEntry::Raw(uncategorised.clone())
        );

        let profile = json!({ "consumption_preferences": [ uncategorised ] });
        assert!(rendered(&profile).contains(
            "Trait: consumption_preferences\n\t {\"consumption_preferences\":[{\"name\":\"Likes hiking\",\"score\":0.5}],\"name\":\"Outdoors\"}\nTrait: values\n"
        ));
    }

    #[test]
    fn non_array_section_is_one_raw_entry() {
        let entries = TraitKind::Needs.entries(&json!({ "needs": "n/a" })).unwrap();
        assert_eq!(entries, vec![TraitEntry::Raw(json!("n/a"))]);
    }
}
