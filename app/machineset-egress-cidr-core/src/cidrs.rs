use std::collections::HashMap;

use ipnet::IpNet;
use tokio::sync::RwLock;

use crate::NO_CIDRS_SENTINEL;

/// Splits a raw annotation value on commas, trims every piece and sorts the result.
///
/// Pieces are never dropped, so `"a,,b"` keeps its empty middle entry, but a
/// blank value yields an empty list rather than `[""]`.
pub fn canonicalize(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    let mut cidrs = raw
        .split(',')
        .map(|cidr| cidr.trim().to_owned())
        .collect::<Vec<_>>();

    cidrs.sort_unstable();

    cidrs
}

/// Inverse of [`canonicalize`] for an already canonical list.
pub fn render(cidrs: &[String]) -> String {
    cidrs.join(",")
}

/// Entries that can't be parsed as an IP network. The cache stores them anyway,
/// this is only used to warn about likely typos.
pub fn invalid_cidrs(cidrs: &[String]) -> Vec<&str> {
    cidrs
        .iter()
        .map(String::as_str)
        .filter(|cidr| *cidr != NO_CIDRS_SENTINEL && cidr.parse::<IpNet>().is_err())
        .collect()
}

fn is_sentinel(cidrs: &[String]) -> bool {
    matches!(cidrs, [only] if only == NO_CIDRS_SENTINEL)
}

/// Canonical egress CIDRs of every annotated MachineSet, keyed by MachineSet name.
#[derive(Debug, Default)]
pub struct EgressCidrCache {
    entries: RwLock<HashMap<String, Vec<String>>>,
}

impl EgressCidrCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, machine_set: &str, raw: &str) {
        let cidrs = canonicalize(raw);

        self.entries
            .write()
            .await
            .insert(machine_set.to_owned(), cidrs);
    }

    pub async fn delete(&self, machine_set: &str) {
        self.entries.write().await.remove(machine_set);
    }

    /// True when the MachineSet has a non-empty entry. The `none` sentinel
    /// counts as existing, an entry stored from a blank value does not.
    pub async fn exists(&self, machine_set: &str) -> bool {
        self.entries
            .read()
            .await
            .get(machine_set)
            .is_some_and(|cidrs| !cidrs.is_empty())
    }

    /// Desired egress CIDRs, with the `none` sentinel translated to an empty list.
    pub async fn get(&self, machine_set: &str) -> Vec<String> {
        match self.entries.read().await.get(machine_set) {
            Some(cidrs) if is_sentinel(cidrs) => Vec::new(),
            Some(cidrs) => cidrs.clone(),
            None => Vec::new(),
        }
    }

    /// Compares the canonical form of a raw annotation value with the stored entry.
    pub async fn equals(&self, machine_set: &str, raw: &str) -> bool {
        let other = canonicalize(raw);
        let entries = self.entries.read().await;

        match entries.get(machine_set) {
            Some(cidrs) => *cidrs == other,
            None => other.is_empty(),
        }
    }

    /// Compares an observed CIDR list with the stored entry, ignoring the order
    /// of `other`. Only the stored side gets the sentinel treatment.
    pub async fn equals_canonical(&self, machine_set: &str, other: &[String]) -> bool {
        let mut other = other.to_vec();
        other.sort_unstable();

        let entries = self.entries.read().await;

        match entries.get(machine_set) {
            Some(cidrs) if is_sentinel(cidrs) => other.is_empty(),
            Some(cidrs) => *cidrs == other,
            None => other.is_empty(),
        }
    }

    /// Keeps only the entries whose MachineSet name satisfies `keep`.
    pub async fn retain(&self, keep: impl Fn(&str) -> bool) {
        self.entries
            .write()
            .await
            .retain(|machine_set, _| keep(machine_set));
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{canonicalize, invalid_cidrs, render, EgressCidrCache};

    fn cidrs(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn canonicalize_splits_trims_and_sorts() {
        assert_eq!(canonicalize("foo"), cidrs(&["foo"]));
        assert_eq!(canonicalize("foo,bar"), cidrs(&["bar", "foo"]));
        assert_eq!(canonicalize("ggg, aaa"), cidrs(&["aaa", "ggg"]));
        assert_eq!(canonicalize("one,   two"), cidrs(&["one", "two"]));
        assert_eq!(canonicalize("tab,\tulator"), cidrs(&["tab", "ulator"]));
        assert_eq!(canonicalize("b ,a"), cidrs(&["a", "b"]));
    }

    #[test]
    fn canonicalize_is_order_independent() {
        assert_eq!(canonicalize("b,a"), canonicalize("a, b"));
        assert_eq!(canonicalize("a, b"), canonicalize("a,   b"));
    }

    #[test]
    fn canonicalize_blank_is_empty() {
        assert!(canonicalize("").is_empty());
        assert!(canonicalize(" \t ").is_empty());
    }

    #[test]
    fn canonicalize_keeps_accidental_empties() {
        assert_eq!(canonicalize("a,,b"), cidrs(&["", "a", "b"]));
        assert_eq!(canonicalize("a,"), cidrs(&["", "a"]));
    }

    #[test]
    fn canonicalize_is_idempotent() {
        for raw in [
            "",
            "none",
            "203.0.113.0/24,198.51.100.0/24",
            "c, b,\ta",
            "a,,b",
            ",",
        ] {
            let canonical = canonicalize(raw);

            assert_eq!(canonicalize(&render(&canonical)), canonical, "input: {raw:?}");
        }
    }

    #[test]
    fn invalid_cidrs_reports_only_unparseable_entries() {
        let values = cidrs(&["192.0.2.0/24", "2001:db8::/32", "foo", "none", ""]);

        assert_eq!(invalid_cidrs(&values), vec!["foo", ""]);
    }

    #[tokio::test]
    async fn cache_set_get_exists_delete() {
        let cache = EgressCidrCache::new();

        for (name, input, expected) in [
            ("simple", "foo", cidrs(&["foo"])),
            ("no-space", "foo,bar", cidrs(&["bar", "foo"])),
            ("one-space", "ggg, aaa", cidrs(&["aaa", "ggg"])),
            ("multiple-spaces", "one,   two", cidrs(&["one", "two"])),
            ("tabs", "tab,\tulator", cidrs(&["tab", "ulator"])),
        ] {
            cache.set(name, input).await;

            assert_eq!(cache.get(name).await, expected, "case: {name}");
            assert!(cache.exists(name).await, "case: {name}");
            assert!(cache.equals_canonical(name, &expected).await, "case: {name}");
            assert!(cache.equals(name, input).await, "case: {name}");

            cache.delete(name).await;

            assert!(!cache.exists(name).await, "case: {name}");
            assert!(cache.equals(name, "").await, "case: {name}");
        }
    }

    #[tokio::test]
    async fn cache_empty_value_does_not_exist() {
        let cache = EgressCidrCache::new();

        cache.set("foo", "").await;

        assert!(!cache.exists("foo").await);
        assert!(cache.get("foo").await.is_empty());
    }

    #[tokio::test]
    async fn cache_unknown_machine_set() {
        let cache = EgressCidrCache::new();

        assert!(!cache.exists("ghost").await);
        assert!(cache.get("ghost").await.is_empty());
        assert!(cache.equals_canonical("ghost", &[]).await);
        assert!(!cache.equals_canonical("ghost", &cidrs(&["192.0.2.0/24"])).await);

        cache.delete("ghost").await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn cache_sentinel_means_empty() {
        let cache = EgressCidrCache::new();

        cache.set("workers", "none").await;

        assert!(cache.exists("workers").await);
        assert!(cache.get("workers").await.is_empty());
        assert!(cache.equals_canonical("workers", &[]).await);
        assert!(!cache.equals_canonical("workers", &cidrs(&["none"])).await);
        assert!(cache.equals("workers", "none").await);
        assert!(!cache.equals("workers", "").await);
    }

    #[tokio::test]
    async fn cache_equals_canonical_ignores_input_order() {
        let cache = EgressCidrCache::new();
        let observed = cidrs(&["203.0.113.0/24", "192.0.2.0/24", "198.51.100.0/24"]);

        cache.set("workers", &observed.join(", ")).await;

        assert!(cache.equals_canonical("workers", &observed).await);
        assert_eq!(
            cache.get("workers").await,
            cidrs(&["192.0.2.0/24", "198.51.100.0/24", "203.0.113.0/24"])
        );
    }

    #[tokio::test]
    async fn cache_set_replaces_previous_entry() {
        let cache = EgressCidrCache::new();

        cache.set("workers", "192.0.2.0/24").await;
        cache.set("workers", "198.51.100.0/24").await;

        assert_eq!(cache.get("workers").await, cidrs(&["198.51.100.0/24"]));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn cache_retain_drops_unlisted_machine_sets() {
        let cache = EgressCidrCache::new();

        cache.set("infra", "192.0.2.0/24").await;
        cache.set("workers", "198.51.100.0/24").await;
        cache.retain(|name| name == "workers").await;

        assert!(!cache.exists("infra").await);
        assert!(cache.exists("workers").await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn cache_tolerates_concurrent_writers_and_readers() {
        let cache = Arc::new(EgressCidrCache::new());
        let mut handles = Vec::new();

        for i in 0..16 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                let name = format!("set-{}", i % 4);
                cache.set(&name, "203.0.113.0/24, 192.0.2.0/24").await;
                let _ = cache.equals_canonical(&name, &[]).await;
                cache.get(&name).await
            }));
        }

        for handle in handles {
            let cidrs = handle.await.unwrap();
            assert_eq!(cidrs, vec!["192.0.2.0/24", "203.0.113.0/24"]);
        }
        assert_eq!(cache.len().await, 4);
    }
}
