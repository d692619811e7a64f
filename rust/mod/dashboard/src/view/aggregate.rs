use std::collections::BTreeSet;

use catalog::model::{
    Artifact, License, Notification, Product, Release, ReleaseDependency, UpdateLog,
};

pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.is_read).count()
}

/// Licenses whose stored status is `active`.
pub fn active_license_count(licenses: &[License]) -> usize {
    licenses.iter().filter(|l| l.is_active()).count()
}

/// Distinct client names across the products' embedded client rows,
/// sorted. Blank names are skipped.
pub fn unique_client_names(products: &[Product]) -> Vec<String> {
    products
        .iter()
        .flat_map(|p| p.clients.iter())
        .map(|c| c.client_name.trim())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Artifacts of every release, in release order.
pub fn artifacts_of(releases: &[Release]) -> Vec<&Artifact> {
    releases.iter().flat_map(|r| r.artifacts.iter()).collect()
}

pub fn update_logs_of(releases: &[Release]) -> Vec<&UpdateLog> {
    releases.iter().flat_map(|r| r.update_logs.iter()).collect()
}

pub fn dependencies_of(releases: &[Release]) -> Vec<&ReleaseDependency> {
    releases.iter().flat_map(|r| r.dependencies.iter()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::model::{LicenseStatus, ProductClient};

    #[test]
    fn counts() {
        let notes = vec![
            Notification { is_read: true, ..Default::default() },
            Notification::default(),
            Notification::default(),
        ];
        assert_eq!(unread_count(&notes), 2);

        let licenses = vec![
            License::default(),
            License { status: LicenseStatus::Revoked, ..Default::default() },
        ];
        assert_eq!(active_license_count(&licenses), 1);
    }

    #[test]
    fn client_names_are_unique() {
        let row = |name: &str| ProductClient {
            client_id: 1,
            client_name: name.to_string(),
        };
        let mut a = Product::new("A", "A-1");
        a.clients = vec![row("Globex"), row("Acme"), row(" ")];
        let mut b = Product::new("B", "B-1");
        b.clients = vec![row("Acme")];
        assert_eq!(unique_client_names(&[a, b]), vec!["Acme", "Globex"]);
    }

    #[test]
    fn flattening_keeps_release_order() {
        let mut r1 = Release::draft(1, "2.0.0", "2024-02-01");
        r1.artifacts = vec![Artifact { artifact_id: 1, ..Default::default() }];
        let mut r2 = Release::draft(1, "1.0.0", "2024-01-01");
        r2.artifacts = vec![
            Artifact { artifact_id: 2, ..Default::default() },
            Artifact { artifact_id: 3, ..Default::default() },
        ];
        r2.update_logs = vec![UpdateLog::default()];
        let rels = [r1, r2];
        let ids: Vec<_> = artifacts_of(&rels).iter().map(|a| a.artifact_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(update_logs_of(&rels).len(), 1);
        assert!(dependencies_of(&rels).is_empty());
    }
}
