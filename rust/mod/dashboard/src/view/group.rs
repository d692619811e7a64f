use std::cmp::Reverse;
use std::collections::BTreeMap;

use catalog::model::Release;
use catalog_types::{parse_instant, EntityId};

/// Releases keyed by product id, each group newest first.
pub type ReleasesByProduct = BTreeMap<EntityId, Vec<Release>>;

/// Group releases by product and sort each group by release date,
/// newest first. Unparseable dates sort last; ties keep input order.
pub fn group_releases<'a, I>(releases: I) -> ReleasesByProduct
where
    I: IntoIterator<Item = &'a Release>,
{
    let mut groups = ReleasesByProduct::new();
    for release in releases {
        groups
            .entry(release.product_id)
            .or_default()
            .push(release.clone());
    }
    for group in groups.values_mut() {
        sort_newest_first(group);
    }
    groups
}

/// Stable sort by release date, descending.
pub fn sort_newest_first(releases: &mut [Release]) {
    releases.sort_by_cached_key(|r| Reverse(parse_instant(&r.release_date)));
}

/// First release of the product's group.
pub fn latest_release(groups: &ReleasesByProduct, product_id: EntityId) -> Option<&Release> {
    groups.get(&product_id).and_then(|g| g.first())
}
