//! Field extraction from raw character page text.
//!
//! Line-oriented label matching: each non-blank line is tested against
//! [`FIELD_RULES`] in order and the first rule whose label occurs anywhere in
//! the line wins. Unknown content is dropped; extraction never fails.

use tracing::warn;

use character_types::{FieldValue, Section, StructuredRecord};

/// How a matched label stores its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Text after the label on the same line
    Text,
    /// Following unlabeled lines, one item each
    List,
}

/// One entry of the label table.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub label: &'static str,
    pub section: Section,
    pub field: &'static str,
    pub kind: FieldKind,
}

const fn text(label: &'static str, section: Section, field: &'static str) -> FieldRule {
    FieldRule {
        label,
        section,
        field,
        kind: FieldKind::Text,
    }
}

/// Label table. Order is the tie-break when several labels occur in a line.
pub const FIELD_RULES: &[FieldRule] = &[
    text("Name", Section::BasicInfo, "name"),
    text("Current Alias", Section::BasicInfo, "current_alias"),
    text("Aliases", Section::BasicInfo, "aliases"),
    text("Gender", Section::Appearance, "gender"),
    text("Eyes", Section::Appearance, "eyes"),
    text("Skin", Section::Appearance, "skin"),
    text("Unusual Features", Section::Appearance, "features"),
    text("Origin", Section::Origin, "origin"),
    text("Living Status", Section::Origin, "status"),
    text("Reality", Section::Origin, "reality"),
    text("Affiliation", Section::Affiliations, "affiliation"),
    FieldRule {
        label: "Powers:",
        section: Section::Powers,
        field: "powers",
        kind: FieldKind::List,
    },
];

/// Result of one extraction pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub record: StructuredRecord,
    /// Labeled lines that carried no usable value
    pub skipped_lines: usize,
}

/// List currently collecting unlabeled lines.
struct OpenList {
    section: Section,
    field: &'static str,
    items: Vec<String>,
}

impl OpenList {
    fn close(self, record: &mut StructuredRecord) {
        record.insert(self.section, self.field, FieldValue::List(self.items));
    }
}

/// Extract a structured record from page text.
///
/// Missing content yields an empty record.
pub fn extract_character_info(content: Option<&str>) -> StructuredRecord {
    content.map(|c| extract(c).record).unwrap_or_default()
}

/// Extract a structured record and line accounting from page text.
pub fn extract(content: &str) -> Extraction {
    let mut extraction = Extraction::default();
    let mut open_list: Option<OpenList> = None;

    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some((rule, rest)) = match_rule(line) else {
            if let Some(list) = open_list.as_mut() {
                list.items.push(line.to_string());
            }
            continue;
        };

        if let Some(list) = open_list.take() {
            list.close(&mut extraction.record);
        }

        match rule.kind {
            FieldKind::List => {
                // A repeated list label starts the list over.
                extraction.record.remove(rule.section, rule.field);
                open_list = Some(OpenList {
                    section: rule.section,
                    field: rule.field,
                    items: Vec::new(),
                });
            }
            FieldKind::Text => {
                let value = clean_value(rest);
                if value.is_empty() {
                    warn!(label = rule.label, line, "Skipping labeled line without value");
                    extraction.skipped_lines += 1;
                } else {
                    extraction.record.insert(
                        rule.section,
                        rule.field,
                        FieldValue::Text(value.to_string()),
                    );
                }
            }
        }
    }

    if let Some(list) = open_list.take() {
        list.close(&mut extraction.record);
    }

    extraction
}

/// First rule whose label occurs in the line, with the text after the label.
fn match_rule(line: &str) -> Option<(&'static FieldRule, &str)> {
    FIELD_RULES.iter().find_map(|rule| {
        line.find(rule.label)
            .map(|pos| (rule, &line[pos + rule.label.len()..]))
    })
}

fn clean_value(rest: &str) -> &str {
    let rest = rest.trim();
    rest.strip_prefix(':').unwrap_or(rest).trim()
}
