use std::collections::HashMap;

/// Task type → boundary keys. First mapping with both keys present wins, so
/// order matters.
pub const TASK_MAPPING: &[(&str, [&str; 2])] = &[
	("translate", ["translate_start", "translate_end"]),
	("transcribe", ["start", "end"]),
];

/// Compact timed sub-task annotation, `"<start>,<end>,<task>"`.
///
/// `None` when no mapping matches; the metadata column then stays NULL
/// instead of carrying a dummy value.
pub fn derive_metas(times: &HashMap<String, f64>) -> Option<String> {
	for &(task, [start_key, end_key]) in TASK_MAPPING {
		if let (Some(start), Some(end)) = (times.get(start_key), times.get(end_key)) {
			return Some(format!("{start},{end},{task}"));
		}
	}
	None
}

#[cfg(test)]
mod tests {
	use super::*;

	fn times(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
		pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
	}

	#[test]
	fn transcribe_boundaries_match() {
		let metas = derive_metas(&times(&[("start", 0.5), ("end", 7.25)]));
		assert_eq!(metas.as_deref(), Some("0.5,7.25,transcribe"));
	}

	#[test]
	fn translate_wins_over_transcribe() {
		let metas = derive_metas(&times(&[("start", 1.0), ("end", 2.0), ("translate_start", 3.0), ("translate_end", 4.0)]));
		assert_eq!(metas.as_deref(), Some("3,4,translate"));
	}

	#[test]
	fn one_boundary_key_is_not_enough() {
		assert_eq!(derive_metas(&times(&[("start", 1.0)])), None);
		assert_eq!(derive_metas(&times(&[("translate_end", 1.0), ("end", 2.0)])), None);
	}

	#[test]
	fn empty_times_yield_no_metas() {
		assert_eq!(derive_metas(&HashMap::new()), None);
	}
}
