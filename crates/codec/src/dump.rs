//! Line-oriented definition dumps for regression checks.
//!
//! A dump is one JSON object per line, one line per artifact item, in
//! ascending hash order. Two dumps of the same artifact are byte-identical.

use std::fmt;

use crate::decoder::DefinitionResolver;

/// Renders every item the resolver's artifact holds.
pub fn dump_definitions(resolver: &DefinitionResolver) -> Result<String, serde_json::Error> {
	let mut out = String::new();
	for hash in resolver.artifact().items.keys() {
		out.push_str(&serde_json::to_string(&*resolver.resolve(*hash))?);
		out.push('\n');
	}
	Ok(out)
}

/// Outcome of comparing a dump to a stored baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyReport {
	Match,
	/// First differing line, 1-based.
	Mismatch { line: usize, expected: String, actual: String },
	/// Every shared line matches but one side has extra lines.
	LengthDiffers { expected: usize, actual: usize },
}

impl VerifyReport {
	pub fn is_match(&self) -> bool {
		matches!(self, Self::Match)
	}
}

impl fmt::Display for VerifyReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Match => f.write_str("dump matches baseline"),
			Self::Mismatch { line, expected, actual } => {
				write!(f, "line {line} differs\n  expected: {expected}\n  actual:   {actual}")
			}
			Self::LengthDiffers { expected, actual } => {
				write!(f, "baseline has {expected} lines, dump has {actual}")
			}
		}
	}
}

pub fn verify(actual: &str, baseline: &str) -> VerifyReport {
	let actual_lines: Vec<&str> = actual.lines().collect();
	let expected_lines: Vec<&str> = baseline.lines().collect();

	let first_diff = actual_lines
		.iter()
		.zip(&expected_lines)
		.position(|(actual, expected)| actual != expected);
	if let Some(index) = first_diff {
		return VerifyReport::Mismatch {
			line: index + 1,
			expected: expected_lines[index].to_owned(),
			actual: actual_lines[index].to_owned(),
		};
	}

	if actual_lines.len() != expected_lines.len() {
		return VerifyReport::LengthDiffers {
			expected: expected_lines.len(),
			actual: actual_lines.len(),
		};
	}
	VerifyReport::Match
}

#[cfg(test)]
mod tests {
	use itemdex_schema::RawCatalog;
	use pretty_assertions::assert_eq;
	use rstest::rstest;
	use serde_json::json;

	use super::*;
	use crate::encode;

	fn resolver() -> DefinitionResolver {
		let catalog: RawCatalog = serde_json::from_value(json!({
			"20": {"displayProperties": {"name": "Second", "description": "b"}},
			"3": {"displayProperties": {"name": "First", "description": "a"}},
			"7": {}
		}))
		.unwrap();
		DefinitionResolver::new(encode(&catalog, "dump").artifact)
	}

	#[test]
	fn dump_has_one_line_per_item_in_hash_order() {
		let dump = dump_definitions(&resolver()).unwrap();
		let hashes: Vec<u64> = dump
			.lines()
			.map(|line| serde_json::from_str::<serde_json::Value>(line).unwrap()["hash"].as_u64().unwrap())
			.collect();
		assert_eq!(hashes, vec![3, 20]);
	}

	#[test]
	fn dump_is_stable() {
		assert_eq!(dump_definitions(&resolver()).unwrap(), dump_definitions(&resolver()).unwrap());
	}

	#[rstest]
	#[case("a\nb\n", "a\nb\n", VerifyReport::Match)]
	#[case("a\nb", "a\nb\n", VerifyReport::Match)]
	#[case("a\nx\n", "a\nb\n", VerifyReport::Mismatch { line: 2, expected: "b".into(), actual: "x".into() })]
	#[case("a\n", "a\nb\n", VerifyReport::LengthDiffers { expected: 2, actual: 1 })]
	#[case("a\nb\nc\n", "a\nb\n", VerifyReport::LengthDiffers { expected: 2, actual: 3 })]
	fn verify_reports_first_difference(#[case] actual: &str, #[case] baseline: &str, #[case] report: VerifyReport) {
		assert_eq!(verify(actual, baseline), report);
	}
}
