//! Timezone normalization for provider profiles
//!
//! Providers report timezones as IANA names, GMT offsets (`+1`,
//! `GMT+1:00`, fractional hours like `5.5`), or bare abbreviations.
//! Everything funnels into an IANA name, with `UTC` as the fallback.

use std::str::FromStr;

use chrono_tz::Tz;

/// Offsets that do not fall on a whole hour but have a current tzdb zone.
/// Keyed by offset minutes east of UTC.
const FRACTIONAL_OFFSET_ZONES: &[(i32, &str)] = &[
	(-570, "Pacific/Marquesas"),
	(-210, "America/St_Johns"),
	(210, "Asia/Tehran"),
	(270, "Asia/Kabul"),
	(330, "Asia/Kolkata"),
	(345, "Asia/Kathmandu"),
	(390, "Asia/Yangon"),
	(525, "Asia/Colombo"),
	(570, "Australia/Adelaide"),
	(630, "Australia/Lord_Howe"),
	(765, "Pacific/Chatham"),
];

/// Abbreviations that are not themselves tzdb zone names.
const ABBREVIATION_ZONES: &[(&str, &str)] = &[
	("PST", "America/Los_Angeles"),
	("PDT", "America/Los_Angeles"),
	("MDT", "America/Denver"),
	("CST", "America/Chicago"),
	("CDT", "America/Chicago"),
	("EDT", "America/New_York"),
	("AST", "America/Halifax"),
	("BST", "Europe/London"),
	("CEST", "Europe/Paris"),
	("EEST", "Europe/Athens"),
	("JST", "Asia/Tokyo"),
	("KST", "Asia/Seoul"),
	("IST", "Asia/Kolkata"),
	("AEST", "Australia/Sydney"),
	("AEDT", "Australia/Sydney"),
];

/// Normalizes a provider-supplied timezone string to an IANA name.
///
/// Valid IANA names (including tzdb-resident abbreviations like `EST`)
/// pass through unchanged. GMT-offset forms resolve to a zone with that
/// offset where one exists. Anything else becomes `UTC`.
pub fn normalize_timezone(raw: &str) -> String {
	let raw = raw.trim();
	if raw.is_empty() {
		return "UTC".to_string();
	}

	if Tz::from_str(raw).is_ok() {
		return raw.to_string();
	}

	if let Some((_, zone)) = ABBREVIATION_ZONES
		.iter()
		.find(|(abbrev, _)| abbrev.eq_ignore_ascii_case(raw))
	{
		return (*zone).to_string();
	}

	if let Some(minutes) = parse_offset_minutes(raw) {
		return zone_for_offset(minutes);
	}

	"UTC".to_string()
}

/// Parses `+1`, `-5:30`, `GMT+1:00`, `UTC+2`, `5.5` into offset minutes.
fn parse_offset_minutes(raw: &str) -> Option<i32> {
	let mut rest = raw;
	for prefix in ["GMT", "UTC", "gmt", "utc"] {
		if let Some(stripped) = rest.strip_prefix(prefix) {
			rest = stripped;
			break;
		}
	}
	let rest = rest.trim();
	if rest.is_empty() {
		return Some(0);
	}

	let (sign, digits) = match rest.as_bytes()[0] {
		b'+' => (1, &rest[1..]),
		b'-' => (-1, &rest[1..]),
		_ => (1, rest),
	};
	if digits.is_empty() {
		return None;
	}

	// Fractional hours, e.g. "5.5"
	if digits.contains('.') {
		let hours: f64 = digits.parse().ok()?;
		let minutes = (hours * 60.0).round() as i32;
		return in_offset_range(sign * minutes);
	}

	// "H" or "H:MM"
	let (hours_part, minutes_part) = match digits.split_once(':') {
		Some((h, m)) => (h, m),
		None => (digits, "0"),
	};
	let hours: i32 = hours_part.parse().ok()?;
	let minutes: i32 = minutes_part.parse().ok()?;
	if minutes >= 60 {
		return None;
	}
	in_offset_range(sign * (hours * 60 + minutes))
}

fn in_offset_range(minutes: i32) -> Option<i32> {
	// tzdb offsets span UTC-12 to UTC+14
	if (-12 * 60..=14 * 60).contains(&minutes) {
		Some(minutes)
	} else {
		None
	}
}

fn zone_for_offset(minutes: i32) -> String {
	if minutes == 0 {
		return "UTC".to_string();
	}
	if minutes % 60 == 0 {
		// Etc/GMT zone signs are inverted relative to ISO offsets
		let hours = minutes / 60;
		let name = if hours > 0 {
			format!("Etc/GMT-{hours}")
		} else {
			format!("Etc/GMT+{}", -hours)
		};
		if Tz::from_str(&name).is_ok() {
			return name;
		}
		return "UTC".to_string();
	}
	FRACTIONAL_OFFSET_ZONES
		.iter()
		.find(|(offset, _)| *offset == minutes)
		.map(|(_, zone)| (*zone).to_string())
		.unwrap_or_else(|| "UTC".to_string())
}
