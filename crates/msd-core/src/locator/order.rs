//! Digest lookup and part-number sort.

use std::collections::HashSet;
use std::path::PathBuf;

use super::LocateError;
use crate::checksum::Hasher;
use crate::manifest::DownloadManifest;

/// Orders `candidates` by the part number their content digest maps to.
///
/// Fails on the first candidate whose digest is not in the manifest, on two
/// candidates mapping to the same part, and on any manifest part left
/// without a candidate. Every candidate is hashed before any check on
/// missing parts, so the result is all-or-nothing.
pub fn order_parts<H: Hasher + ?Sized>(
    candidates: &[PathBuf],
    manifest: &DownloadManifest,
    hasher: &H,
) -> Result<Vec<PathBuf>, LocateError> {
    manifest.check_invariants()?;
    let index = manifest.digest_index();

    let mut located: Vec<(u32, &PathBuf)> = Vec::with_capacity(candidates.len());
    for path in candidates {
        let digest = hasher
            .compute_digest(path)
            .map_err(|source| LocateError::Hash {
                path: path.clone(),
                source,
            })?;
        let part = index
            .get(&digest.to_ascii_lowercase())
            .ok_or_else(|| LocateError::UnknownPart {
                path: path.clone(),
                digest: digest.clone(),
            })?;
        tracing::debug!(
            part = part.part_number,
            path = %path.display(),
            "matched part file"
        );
        located.push((part.part_number, path));
    }

    located.sort_by_key(|(n, _)| *n);

    if let Some(pair) = located.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(LocateError::DuplicatePart {
            part_number: pair[0].0,
            first: pair[0].1.clone(),
            second: pair[1].1.clone(),
        });
    }

    let found: HashSet<u32> = located.iter().map(|(n, _)| *n).collect();
    let missing = manifest
        .downloaded_parts
        .iter()
        .map(|part| part.part_number)
        .filter(|n| !found.contains(n))
        .min();
    if let Some(part_number) = missing {
        return Err(LocateError::MissingPart { part_number });
    }

    Ok(located.into_iter().map(|(_, p)| p.clone()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::Sha256Hasher;
    use crate::manifest::{DownloadedPart, ManifestError};
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::io;
    use std::path::Path;

    /// Digest is looked up by file name; counts calls.
    struct NameHasher {
        digests: HashMap<&'static str, &'static str>,
        calls: Cell<usize>,
    }

    impl NameHasher {
        fn new(pairs: &[(&'static str, &'static str)]) -> Self {
            Self {
                digests: pairs.iter().copied().collect(),
                calls: Cell::new(0),
            }
        }
    }

    impl Hasher for NameHasher {
        fn compute_digest(&self, path: &Path) -> io::Result<String> {
            self.calls.set(self.calls.get() + 1);
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            self.digests
                .get(name)
                .map(|d| d.to_string())
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_string()))
        }
    }

    fn manifest(parts: &[(&str, u32)]) -> DownloadManifest {
        DownloadManifest {
            downloaded_parts: parts
                .iter()
                .map(|(h, n)| DownloadedPart {
                    file_hash: h.to_string(),
                    part_number: *n,
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn orders_by_part_number_not_name() {
        let hasher = NameHasher::new(&[("output-a", "h3"), ("output-b", "h1"), ("output-c", "h2")]);
        let m = manifest(&[("h1", 1), ("h2", 2), ("h3", 3)]);
        let ordered = order_parts(&paths(&["output-a", "output-b", "output-c"]), &m, &hasher).unwrap();
        assert_eq!(ordered, paths(&["output-b", "output-c", "output-a"]));
        assert_eq!(hasher.calls.get(), 3);
    }

    #[test]
    fn enumeration_order_does_not_matter() {
        let hasher = NameHasher::new(&[("x", "h1"), ("y", "h2"), ("z", "h3")]);
        let m = manifest(&[("h2", 2), ("h3", 3), ("h1", 1)]);
        let expected = paths(&["x", "y", "z"]);
        for order in [["z", "y", "x"], ["y", "x", "z"], ["x", "z", "y"]] {
            assert_eq!(order_parts(&paths(&order), &m, &hasher).unwrap(), expected);
        }
    }

    #[test]
    fn digest_case_is_ignored() {
        let hasher = NameHasher::new(&[("p", "ABCDEF")]);
        let m = manifest(&[("abcdef", 1)]);
        assert_eq!(order_parts(&paths(&["p"]), &m, &hasher).unwrap(), paths(&["p"]));
    }

    #[test]
    fn unknown_part_is_reported() {
        let hasher = NameHasher::new(&[("p1", "h1"), ("stale", "hx")]);
        let m = manifest(&[("h1", 1)]);
        match order_parts(&paths(&["p1", "stale"]), &m, &hasher) {
            Err(LocateError::UnknownPart { path, digest }) => {
                assert_eq!(path, PathBuf::from("stale"));
                assert_eq!(digest, "hx");
            }
            other => panic!("expected UnknownPart, got {other:?}"),
        }
    }

    #[test]
    fn missing_part_is_reported() {
        let hasher = NameHasher::new(&[("p1", "h1"), ("p3", "h3")]);
        let m = manifest(&[("h1", 1), ("h2", 2), ("h3", 3)]);
        assert!(matches!(
            order_parts(&paths(&["p3", "p1"]), &m, &hasher),
            Err(LocateError::MissingPart { part_number: 2 })
        ));
    }

    #[test]
    fn lowest_missing_part_is_reported() {
        let hasher = NameHasher::new(&[("p2", "h2")]);
        let m = manifest(&[("h4", 4), ("h3", 3), ("h2", 2), ("h1", 1)]);
        assert!(matches!(
            order_parts(&paths(&["p2"]), &m, &hasher),
            Err(LocateError::MissingPart { part_number: 1 })
        ));
    }

    #[test]
    fn duplicate_part_is_reported() {
        let hasher = NameHasher::new(&[("p1", "h1"), ("copy", "h1"), ("p2", "h2")]);
        let m = manifest(&[("h1", 1), ("h2", 2)]);
        assert!(matches!(
            order_parts(&paths(&["p1", "p2", "copy"]), &m, &hasher),
            Err(LocateError::DuplicatePart { part_number: 1, .. })
        ));
    }

    #[test]
    fn invalid_manifest_fails_before_hashing() {
        let hasher = NameHasher::new(&[("p1", "h1")]);
        let m = manifest(&[("h1", 1), ("h2", 1)]);
        assert!(matches!(
            order_parts(&paths(&["p1"]), &m, &hasher),
            Err(LocateError::Manifest(ManifestError::DuplicatePartNumber { .. }))
        ));
        assert_eq!(hasher.calls.get(), 0);
    }

    #[test]
    fn hash_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let m = manifest(&[("h1", 1)]);
        let gone = dir.path().join("output-1");
        assert!(matches!(
            order_parts(&[gone], &m, &Sha256Hasher),
            Err(LocateError::Hash { .. })
        ));
    }
}
