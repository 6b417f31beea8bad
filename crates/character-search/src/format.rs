//! Display shaping for search hits.
//!
//! Groups stored fields back into labeled sections. The `"Unknown"` sentinel
//! is substituted here only; stored documents never contain it.

use std::fmt::Write;

use serde::Serialize;

use character_types::field_names;

use crate::searcher::SearchHit;

/// Placeholder for fields absent from the stored document.
pub const UNKNOWN: &str = "Unknown";

/// Message rendered when a query has no hits.
pub const NO_RESULTS: &str = "No results found.";

type SectionLayout = (&'static str, &'static [(&'static str, &'static str)]);

/// Section title -> (display label, stored field) in display order.
const SECTION_LAYOUT: &[SectionLayout] = &[
    (
        "Basic Character Information",
        &[
            ("Name", field_names::BASIC_INFO_NAME),
            ("Current Alias", field_names::BASIC_INFO_CURRENT_ALIAS),
            ("Aliases", field_names::BASIC_INFO_ALIASES),
            ("Affiliations", field_names::AFFILIATIONS_AFFILIATION),
        ],
    ),
    (
        "Appearance and Physical Traits",
        &[
            ("Gender", field_names::APPEARANCE_GENDER),
            ("Eye Color", field_names::APPEARANCE_EYES),
            ("Skin Colors", field_names::APPEARANCE_SKIN),
            ("Notable Features", field_names::APPEARANCE_FEATURES),
        ],
    ),
    (
        "Origin and Status",
        &[
            ("Origin", field_names::ORIGIN_ORIGIN),
            ("Living Status", field_names::ORIGIN_STATUS),
            ("Reality", field_names::ORIGIN_REALITY),
        ],
    ),
    ("Powers & Abilities", &[("Powers", field_names::POWERS_POWERS)]),
];

/// One labeled section of a formatted hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedSection {
    pub title: &'static str,
    /// (label, value) pairs; absent values are [`UNKNOWN`]
    pub entries: Vec<(&'static str, String)>,
}

impl FormattedSection {
    /// Entries with a real value.
    pub fn known_entries(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries
            .iter()
            .filter(|(_, value)| value != UNKNOWN)
            .map(|(label, value)| (*label, value.as_str()))
    }
}

/// Display structure for one hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedHit {
    pub id: String,
    pub url: Option<String>,
    pub score: f32,
    /// Non-empty sections in display order
    pub sections: Vec<FormattedSection>,
}

/// Group a hit's stored fields into labeled sections.
///
/// Sections where every field is absent are omitted.
pub fn format_hit(hit: &SearchHit) -> FormattedHit {
    let sections = SECTION_LAYOUT
        .iter()
        .filter_map(|(title, layout)| {
            let entries: Vec<(&'static str, String)> = layout
                .iter()
                .map(|(label, field)| {
                    let value = hit
                        .get(field)
                        .filter(|value| !value.is_empty())
                        .unwrap_or(UNKNOWN);
                    (*label, value.to_string())
                })
                .collect();

            if entries.iter().all(|(_, value)| value == UNKNOWN) {
                None
            } else {
                Some(FormattedSection {
                    title: *title,
                    entries,
                })
            }
        })
        .collect();

    FormattedHit {
        id: hit.id().to_string(),
        url: hit.get(field_names::URL).map(str::to_string),
        score: hit.score,
        sections,
    }
}

/// Render hits as the plain-text report printed after a search.
pub fn render_hits(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return format!("{}\n", NO_RESULTS);
    }

    let rule = "=".repeat(50);
    let mut out = String::new();
    let _ = writeln!(out, "\nSearch Results:");
    let _ = writeln!(out, "{}", rule);

    for hit in hits {
        let formatted = format_hit(hit);
        let _ = writeln!(out, "\nMatch Score: {:.2}", formatted.score);
        let _ = writeln!(out, "{}", "-".repeat(50));
        let _ = writeln!(out, "ID: {}", formatted.id);
        if let Some(url) = &formatted.url {
            let _ = writeln!(out, "URL: {}", url);
        }

        for section in &formatted.sections {
            let _ = writeln!(out, "\n{}:", section.title);
            for (label, value) in section.known_entries() {
                let _ = writeln!(out, "  • {}: {}", label, value);
            }
        }

        let _ = writeln!(out, "\n{}", rule);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn hit(fields: &[(&str, &str)]) -> SearchHit {
        SearchHit {
            score: 1.5,
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn test_format_substitutes_unknown() {
        let formatted = format_hit(&hit(&[
            ("id", "groot"),
            ("basic_info.name", "Groot"),
        ]));

        assert_eq!(formatted.sections.len(), 1);
        let basic = &formatted.sections[0];
        assert_eq!(basic.title, "Basic Character Information");
        assert_eq!(basic.entries[0], ("Name", "Groot".to_string()));
        assert_eq!(basic.entries[1], ("Current Alias", UNKNOWN.to_string()));
        assert_eq!(basic.known_entries().count(), 1);
    }

    #[test]
    fn test_format_suppresses_all_unknown_sections() {
        let formatted = format_hit(&hit(&[("id", "x"), ("powers.powers", "Flight")]));

        let titles: Vec<_> = formatted.sections.iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["Powers & Abilities"]);
    }

    #[test]
    fn test_format_id_only_hit() {
        let formatted = format_hit(&hit(&[("id", "empty")]));
        assert_eq!(formatted.id, "empty");
        assert!(formatted.url.is_none());
        assert!(formatted.sections.is_empty());
    }

    #[test]
    fn test_format_section_order() {
        let formatted = format_hit(&hit(&[
            ("id", "x"),
            ("powers.powers", "Flight"),
            ("origin.reality", "Earth-616"),
            ("appearance.eyes", "Blue"),
            ("basic_info.name", "X"),
        ]));

        let titles: Vec<_> = formatted.sections.iter().map(|s| s.title).collect();
        assert_eq!(
            titles,
            vec![
                "Basic Character Information",
                "Appearance and Physical Traits",
                "Origin and Status",
                "Powers & Abilities",
            ]
        );
    }

    #[test]
    fn test_render_no_results() {
        assert_eq!(render_hits(&[]), "No results found.\n");
    }

    #[test]
    fn test_render_hits() {
        let rendered = render_hits(&[hit(&[
            ("id", "groot"),
            ("url", "https://example.com/groot"),
            ("basic_info.name", "Groot"),
            ("powers.powers", "Regeneration; Strength"),
        ])]);

        assert!(rendered.contains("Match Score: 1.50"));
        assert!(rendered.contains("ID: groot"));
        assert!(rendered.contains("URL: https://example.com/groot"));
        assert!(rendered.contains("Basic Character Information:"));
        assert!(rendered.contains("  • Name: Groot"));
        assert!(rendered.contains("  • Powers: Regeneration; Strength"));
        assert!(!rendered.contains(UNKNOWN));
        assert!(!rendered.contains("Origin and Status"));
    }
}
