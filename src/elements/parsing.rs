use std::collections::HashSet;

use crate::elements::types::SatelliteRecord;

const LINE1_MARKER: &str = "1 ";
const LINE2_MARKER: &str = "2 ";

/// Parse multi-satellite TLE text into at most `max_records` records.
///
/// Blocks are either `name / line1 / line2` or bare `line1 / line2`. Anything
/// that does not line up is skipped and parsing resynchronises on the next
/// line.
pub fn parse_element_set(content: &str, max_records: usize) -> Vec<SatelliteRecord> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim_end())
        .filter(|l| !l.trim().is_empty())
        .collect();

    let mut result = Vec::new();
    let mut seen = HashSet::new();
    let mut i = 0;

    while i < lines.len() && result.len() < max_records {
        let (name, line1, line2, consumed) = if is_line1(lines[i])
            && i + 1 < lines.len()
            && is_line2(lines[i + 1])
        {
            (None, lines[i], lines[i + 1], 2)
        } else if i + 2 < lines.len() && is_line1(lines[i + 1]) && is_line2(lines[i + 2]) {
            (Some(lines[i].trim()), lines[i + 1], lines[i + 2], 3)
        } else {
            i += 1;
            continue;
        };
        i += consumed;

        let Some(norad_id) = norad_id(line1) else {
            log::debug!("Skipping element set with bad catalog number: {}", line1);
            continue;
        };
        if !seen.insert(norad_id) {
            log::debug!("Skipping duplicate element set for NORAD {}", norad_id);
            continue;
        }

        result.push(SatelliteRecord {
            norad_id,
            name: name
                .map(String::from)
                .unwrap_or_else(|| format!("NORAD {}", norad_id)),
            line1: line1.to_string(),
            line2: line2.to_string(),
        });
    }

    result
}

fn is_line1(line: &str) -> bool {
    line.starts_with(LINE1_MARKER)
}

fn is_line2(line: &str) -> bool {
    line.starts_with(LINE2_MARKER)
}

/// Catalog number, columns 3-7 of line 1.
fn norad_id(line1: &str) -> Option<u32> {
    line1
        .get(2..7)
        .and_then(|s| s.trim().parse().ok())
        .filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISS: &str = "ISS (ZARYA)
1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
";

    const TWO_SATS: &str = "IRIDIUM 106
1 41917U 17003A   24001.50000000  .00000100  00000-0  30000-4 0  9993
2 41917  86.3940 120.0000 0002000  90.0000 270.0000 14.34218000370000
IRIDIUM 103
1 41918U 17003B   24001.50000000  .00000100  00000-0  30000-4 0  9994
2 41918  86.3940 120.0000 0002000  90.0000 300.0000 14.34218000370005
";

    #[test]
    fn parses_named_triplet() {
        let records = parse_element_set(ISS, 10);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].norad_id, 25544);
        assert_eq!(records[0].name, "ISS (ZARYA)");
        assert!(records[0].line1.starts_with("1 25544U"));
        assert!(records[0].line2.starts_with("2 25544"));
    }

    #[test]
    fn parses_bare_two_line_block() {
        let bare: String = ISS.lines().skip(1).collect::<Vec<_>>().join("\n");
        let records = parse_element_set(&bare, 10);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "NORAD 25544");
    }

    #[test]
    fn stops_at_max_records() {
        assert_eq!(parse_element_set(TWO_SATS, 1).len(), 1);
        assert_eq!(parse_element_set(TWO_SATS, 1)[0].norad_id, 41917);
        assert_eq!(parse_element_set(TWO_SATS, 5).len(), 2);
        assert!(parse_element_set(TWO_SATS, 0).is_empty());
    }

    #[test]
    fn skips_malformed_triplets() {
        let text = format!(
            "BROKEN\n1 41917U missing second line\nNOT A DATA LINE\n{}",
            TWO_SATS
        );
        let records = parse_element_set(&text, 10);
        let ids: Vec<u32> = records.iter().map(|r| r.norad_id).collect();
        assert_eq!(ids, vec![41917, 41918]);
    }

    #[test]
    fn skips_non_numeric_catalog_number() {
        let text = "BAD\n1 ABCDEU 17003A\n2 ABCDE  86.3940\n";
        assert!(parse_element_set(text, 10).is_empty());
    }

    #[test]
    fn keeps_first_of_duplicate_ids() {
        let text = format!("{}{}", TWO_SATS, TWO_SATS);
        let records = parse_element_set(&text, 10);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn garbage_yields_nothing() {
        assert!(parse_element_set("<html>rate limited</html>", 10).is_empty());
        assert!(parse_element_set("", 10).is_empty());
    }
}
