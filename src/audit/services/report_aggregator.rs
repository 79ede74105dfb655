use crate::audit::domain::{
    AggregatedPackageStatus, CachedVulnerability, Dependency, Finding, FindingSource, VersionKey,
    STDLIB_PACKAGE,
};
use std::collections::{BTreeMap, HashMap};

/// ReportAggregator - Merges findings against the versions actually in use
///
/// A package is reported only when it has a resolved version and that
/// version is strictly below the highest fix any finding names for it.
pub struct ReportAggregator;

impl ReportAggregator {
    /// Aggregates findings per affected package
    ///
    /// # Arguments
    /// * `findings` - Public advisory and internal scan findings
    /// * `resolved_versions` - Package name to version in use
    ///
    /// # Returns
    /// Affected packages sorted by name
    pub fn aggregate(
        findings: &[Finding],
        resolved_versions: &HashMap<String, VersionKey>,
    ) -> Vec<AggregatedPackageStatus> {
        let mut by_package: BTreeMap<&str, Vec<&Finding>> = BTreeMap::new();
        for finding in findings {
            by_package
                .entry(finding.affected_package.as_str())
                .or_default()
                .push(finding);
        }

        by_package
            .into_iter()
            .filter_map(|(package, package_findings)| {
                let current = resolved_versions.get(package)?;
                // a finding without a known fix cannot flag a version
                let max_fixed = package_findings
                    .iter()
                    .map(|f| f.fixed_key())
                    .filter(|key| !key.is_minimum())
                    .max()?;

                (*current < max_fixed).then(|| AggregatedPackageStatus {
                    package: package.to_string(),
                    current_version: current.clone(),
                    fixed_version: max_fixed,
                    findings: package_findings.into_iter().cloned().collect(),
                })
            })
            .collect()
    }

    /// Converts cached internal scan entries into findings
    ///
    /// `fixed_in` of `pkg@version` targets `pkg` (standard library packages
    /// such as `net/http` fold into `stdlib`); a bare version targets the
    /// internal dependency itself.
    pub fn internal_findings(
        dependency: &Dependency,
        vulnerabilities: &[CachedVulnerability],
    ) -> Vec<Finding> {
        vulnerabilities
            .iter()
            .map(|vulnerability| {
                let (package, version) = vulnerability.fixed_package_and_version();
                let affected = match package {
                    Some(package) if is_stdlib_path(package) => STDLIB_PACKAGE,
                    Some(package) => package,
                    None => dependency.path(),
                };
                let finding = Finding::new(
                    vulnerability.code.clone(),
                    vulnerability.description.clone(),
                    affected,
                    FindingSource::InternalScan,
                );
                if version.is_empty() {
                    finding
                } else {
                    finding.with_fixed(version)
                }
            })
            .collect()
    }
}

/// Standard library import paths have no dot in their first element.
fn is_stdlib_path(path: &str) -> bool {
    path == STDLIB_PACKAGE || !path.split('/').next().unwrap_or_default().contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advisory(id: &str, package: &str, fixed: Option<&str>) -> Finding {
        let finding = Finding::new(id, "summary", package, FindingSource::PublicAdvisory);
        match fixed {
            Some(fixed) => finding.with_fixed(fixed),
            None => finding,
        }
    }

    fn resolved(entries: &[(&str, &str)]) -> HashMap<String, VersionKey> {
        entries
            .iter()
            .map(|(name, version)| (name.to_string(), VersionKey::parse(version)))
            .collect()
    }

    #[test]
    fn test_flags_package_below_fix() {
        let findings = vec![advisory("GO-1", "example.com/p", Some("2.0.0"))];
        let statuses =
            ReportAggregator::aggregate(&findings, &resolved(&[("example.com/p", "v1.5.0")]));

        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].package, "example.com/p");
        assert_eq!(statuses[0].current_version.to_string(), "1.5.0");
        assert_eq!(statuses[0].fixed_version.to_string(), "2.0.0");
    }

    #[test]
    fn test_not_flagged_at_or_above_fix() {
        let findings = vec![advisory("GO-1", "example.com/p", Some("2.0.0"))];
        for version in ["v2.0.0", "v2.0.1", "v3.0.0"] {
            let statuses =
                ReportAggregator::aggregate(&findings, &resolved(&[("example.com/p", version)]));
            assert!(statuses.is_empty(), "{} should not be flagged", version);
        }
    }

    #[test]
    fn test_uses_maximum_fix_across_findings() {
        let findings = vec![
            advisory("GO-1", "example.com/p", Some("1.2.0")),
            advisory("GO-2", "example.com/p", Some("1.10.0")),
            advisory("GO-3", "example.com/p", None),
        ];
        let statuses =
            ReportAggregator::aggregate(&findings, &resolved(&[("example.com/p", "v1.5.0")]));

        assert_eq!(statuses[0].fixed_version.to_string(), "1.10.0");
        assert_eq!(statuses[0].findings.len(), 3);
    }

    #[test]
    fn test_never_reports_unresolved_packages() {
        let findings = vec![
            advisory("GO-1", "example.com/absent", Some("9.9.9")),
            advisory("GO-2", "example.com/p", Some("2.0.0")),
        ];
        let versions = resolved(&[("example.com/p", "v1.0.0")]);
        let statuses = ReportAggregator::aggregate(&findings, &versions);

        assert!(statuses.iter().all(|s| versions.contains_key(&s.package)));
        assert_eq!(statuses.len(), 1);
    }

    #[test]
    fn test_findings_without_fix_are_not_flagged() {
        let findings = vec![advisory("GO-1", "example.com/p", None)];
        let statuses =
            ReportAggregator::aggregate(&findings, &resolved(&[("example.com/p", "v0.0.1")]));
        assert!(statuses.is_empty());
    }

    #[test]
    fn test_output_sorted_by_package() {
        let findings = vec![
            advisory("GO-1", "z.com/z", Some("2.0.0")),
            advisory("GO-2", "a.com/a", Some("2.0.0")),
            advisory("GO-3", "stdlib", Some("1.21.3")),
        ];
        let versions = resolved(&[("z.com/z", "1.0.0"), ("a.com/a", "1.0.0"), ("stdlib", "go1.21.1")]);
        let names: Vec<String> = ReportAggregator::aggregate(&findings, &versions)
            .into_iter()
            .map(|s| s.package)
            .collect();
        assert_eq!(names, vec!["a.com/a", "stdlib", "z.com/z"]);
    }

    #[test]
    fn test_internal_findings_target_package_or_dependency() {
        let dependency = Dependency::new("github.com/acme/foo", "v1.0.0");
        let vulns = vec![
            CachedVulnerability::new("GO-1", "own bug", "v1.2.0"),
            CachedVulnerability::new("GO-2", "net bug", "golang.org/x/net@v0.23.0"),
            CachedVulnerability::new("GO-3", "std bug", "net/http@go1.21.8"),
        ];
        let findings = ReportAggregator::internal_findings(&dependency, &vulns);

        assert_eq!(findings[0].affected_package, "github.com/acme/foo");
        assert_eq!(findings[0].fixed_version.as_deref(), Some("v1.2.0"));
        assert_eq!(findings[1].affected_package, "golang.org/x/net");
        assert_eq!(findings[2].affected_package, "stdlib");
        assert_eq!(findings[2].fixed_version.as_deref(), Some("go1.21.8"));
        assert!(findings.iter().all(|f| f.source == FindingSource::InternalScan));
    }
}
