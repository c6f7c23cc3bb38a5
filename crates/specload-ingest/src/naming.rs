//! Component name de-duplication.

use std::collections::BTreeSet;

/// Make names unique within one dataset.
///
/// The first occurrence keeps its name; later ones become `<name>_<n>` with
/// the smallest `n >= 1` not already taken.
pub fn unique_names(names: &[String], dataset: usize) -> Vec<String> {
    let mut taken: BTreeSet<String> = BTreeSet::new();
    let reserved: BTreeSet<&str> = names.iter().map(String::as_str).collect();
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        if taken.insert(name.clone()) {
            out.push(name.clone());
            continue;
        }
        let mut n = 1;
        let renamed = loop {
            let candidate = format!("{name}_{n}");
            if !taken.contains(&candidate) && !reserved.contains(candidate.as_str()) {
                break candidate;
            }
            n += 1;
        };
        tracing::warn!(dataset, component = %name, renamed = %renamed, "duplicate component name");
        taken.insert(renamed.clone());
        out.push(renamed);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unique_names_untouched() {
        assert_eq!(unique_names(&names(&["A", "B"]), 0), names(&["A", "B"]));
    }

    #[test]
    fn test_duplicates_get_suffix() {
        assert_eq!(
            unique_names(&names(&["FLUX", "FLUX", "FLUX"]), 1),
            names(&["FLUX", "FLUX_1", "FLUX_2"])
        );
    }

    #[test]
    fn test_suffix_skips_existing_names() {
        assert_eq!(
            unique_names(&names(&["A", "A", "A_1"]), 0),
            names(&["A", "A_2", "A_1"])
        );
    }
}
