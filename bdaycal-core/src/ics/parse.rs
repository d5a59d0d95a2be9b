//! Component decoding using the icalendar crate's parser.
//!
//! The parser is generic over component names, so the same code reads
//! `.vcf` address book items and `.ics` calendar items. A `VCALENDAR`
//! wrapper is flattened away by the parser; its children come back as
//! top-level components.

use crate::component::{Component, Contact, EventEntry};
use icalendar::parser::{self, read_calendar, unfold};

/// Decode every top-level component in an item file.
///
/// The parser only accepts one root component per input, so the file is
/// cut into its top-level `BEGIN:`/`END:` blocks first.
pub fn parse_components(content: &str) -> Result<Vec<Component>, String> {
    let unfolded = unfold(content);
    let mut components = Vec::new();

    for block in top_level_blocks(&unfolded)? {
        let calendar = read_calendar(&block)?;
        components.extend(calendar.components.iter().map(to_component));
    }

    Ok(components)
}

/// Split unfolded content into its top-level components.
///
/// An unterminated trailing block is passed on as is so the parser
/// reports it.
fn top_level_blocks(unfolded: &str) -> Result<Vec<String>, String> {
    let mut blocks = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for line in unfolded.lines() {
        if depth == 0 {
            if line.trim().is_empty() {
                continue;
            }
            if !has_prefix(line, "BEGIN:") {
                return Err(format!("unexpected line outside of a component: {line}"));
            }
        }

        current.push_str(line);
        current.push('\n');

        if has_prefix(line, "BEGIN:") {
            depth += 1;
        } else if has_prefix(line, "END:") {
            depth -= 1;
            if depth == 0 {
                blocks.push(std::mem::take(&mut current));
            }
        }
    }

    if !current.is_empty() {
        blocks.push(current);
    }

    Ok(blocks)
}

fn has_prefix(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn to_component(component: &parser::Component) -> Component {
    let prop = |name: &str| component.find_prop(name).map(|p| p.val.to_string());
    let text = |name: &str| prop(name).map(|value| unescape_text(&value));

    match component.name.as_ref() {
        "VCARD" => Component::Contact(Contact {
            uid: prop("UID"),
            full_name: text("FN"),
            birthday: prop("BDAY"),
        }),
        "VEVENT" => Component::Event(EventEntry {
            uid: prop("UID"),
            summary: text("SUMMARY"),
        }),
        other => Component::Other(other.to_string()),
    }
}

/// Undo TEXT value escaping: `\,` `\;` `\\` and `\n`/`\N`.
fn unescape_text(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.peek() {
            Some(&escaped @ (',' | ';' | '\\')) => {
                result.push(escaped);
                chars.next();
            }
            Some('n' | 'N') => {
                result.push('\n');
                chars.next();
            }
            _ => result.push(c),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vcard_with_birthday() {
        let vcf = "BEGIN:VCARD\r\n\
VERSION:4.0\r\n\
UID:c1\r\n\
FN:Bob Builder\r\n\
N:Builder;Bob;;;\r\n\
BDAY;VALUE=date:1985-03-04\r\n\
END:VCARD\r\n";

        let components = parse_components(vcf).expect("Should parse");
        assert_eq!(
            components,
            vec![Component::Contact(Contact {
                uid: Some("c1".to_string()),
                full_name: Some("Bob Builder".to_string()),
                birthday: Some("1985-03-04".to_string()),
            })]
        );
    }

    #[test]
    fn test_parse_vcard_without_birthday() {
        let vcf = "BEGIN:VCARD\r\nVERSION:3.0\r\nUID:c2\r\nFN:Carol\r\nEND:VCARD\r\n";

        let components = parse_components(vcf).expect("Should parse");
        let contact = components[0].as_contact().expect("Should be a contact");
        assert!(!contact.has_birthday());
    }

    #[test]
    fn test_parse_multiple_vcards_in_one_file() {
        let vcf = "BEGIN:VCARD\r\nVERSION:3.0\r\nUID:a\r\nFN:A\r\nBDAY:20000101\r\nEND:VCARD\r\n\
BEGIN:VCARD\r\nVERSION:3.0\r\nUID:b\r\nFN:B\r\nEND:VCARD\r\n";

        let uids: Vec<Option<String>> = parse_components(vcf)
            .expect("Should parse")
            .into_iter()
            .filter_map(Component::into_contact)
            .map(|c| c.uid)
            .collect();
        assert_eq!(uids, vec![Some("a".to_string()), Some("b".to_string())]);
    }

    #[test]
    fn test_parse_multiple_vcards_with_mixed_line_endings() {
        let vcf = "BEGIN:VCARD\nVERSION:3.0\nUID:a\nFN:A\nEND:VCARD\n\n\
BEGIN:VCARD\r\nVERSION:3.0\r\nUID:b\r\nFN:B\r\nBDAY:--0101\r\nEND:VCARD\r\n";

        let components = parse_components(vcf).expect("Should parse");
        assert_eq!(components.len(), 2);
        let second = components[1].as_contact().expect("Should be a contact");
        assert_eq!(second.birthday.as_deref(), Some("--0101"));
    }

    #[test]
    fn test_parse_rejects_text_outside_components() {
        let vcf = "BEGIN:VCARD\r\nUID:a\r\nEND:VCARD\r\ngarbage\r\n";
        assert!(parse_components(vcf).is_err());
    }

    #[test]
    fn test_parse_unterminated_component_fails() {
        let vcf = "BEGIN:VCARD\r\nUID:a\r\nFN:A\r\n";
        assert!(parse_components(vcf).is_err());
    }

    #[test]
    fn test_parse_unescapes_text_values() {
        let vcf = "BEGIN:VCARD\r\nVERSION:3.0\r\nUID:c3\r\nFN:Doe\\, John\\; Jr. \\\\ Esq.\r\nEND:VCARD\r\n";

        let components = parse_components(vcf).expect("Should parse");
        let contact = components[0].as_contact().expect("Should be a contact");
        assert_eq!(contact.full_name.as_deref(), Some("Doe, John; Jr. \\ Esq."));
    }

    #[test]
    fn test_unescape_text_keeps_unknown_escapes() {
        assert_eq!(unescape_text("a\\nb"), "a\nb");
        assert_eq!(unescape_text("a\\Nb"), "a\nb");
        assert_eq!(unescape_text("a\\xb"), "a\\xb");
        assert_eq!(unescape_text("trailing\\"), "trailing\\");
    }

    #[test]
    fn test_parse_calendar_flattens_vcalendar() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
BEGIN:VTIMEZONE
TZID:Europe/Berlin
END:VTIMEZONE
BEGIN:VEVENT
UID:c1
SUMMARY:Bob
DTSTART;VALUE=DATE:19850304
DTEND;VALUE=DATE:19850305
RRULE:FREQ=YEARLY
END:VEVENT
END:VCALENDAR"#;

        let components = parse_components(ics).expect("Should parse");
        assert_eq!(components.len(), 2);
        assert_eq!(components[0], Component::Other("VTIMEZONE".to_string()));
        assert_eq!(
            components[1],
            Component::Event(EventEntry {
                uid: Some("c1".to_string()),
                summary: Some("Bob".to_string()),
            })
        );
    }

    #[test]
    fn test_parse_unfolds_long_lines() {
        let vcf = "BEGIN:VCARD\r\nVERSION:3.0\r\nUID:folded-\r\n uid\r\nFN:X\r\nEND:VCARD\r\n";

        let components = parse_components(vcf).expect("Should parse");
        let contact = components[0].as_contact().expect("Should be a contact");
        assert_eq!(contact.uid.as_deref(), Some("folded-uid"));
    }
}
