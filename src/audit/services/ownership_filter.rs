use crate::audit::domain::Dependency;
use crate::shared::Result;

/// Maximum number of configured internal owners
const MAX_INTERNAL_OWNERS: usize = 64;

/// Maximum length of a single owner name
const MAX_OWNER_LENGTH: usize = 100;

/// OwnershipFilter - Selects dependencies owned by configured organizations
///
/// A dependency is internal when the second segment of its module path
/// (`host/<owner>/repo`) equals one of the configured owners. Matching is
/// case-sensitive, and paths with fewer than three segments never match.
#[derive(Debug, Clone, Default)]
pub struct OwnershipFilter {
    owners: Vec<String>,
}

impl OwnershipFilter {
    /// Creates a new OwnershipFilter from raw owner names
    ///
    /// # Arguments
    /// * `owners` - Organization names (e.g., "acme", "my-team")
    ///
    /// # Errors
    /// - Too many owners (> MAX_INTERNAL_OWNERS)
    /// - Empty, overlong or malformed owner names
    pub fn new(owners: Vec<String>) -> Result<Self> {
        if owners.len() > MAX_INTERNAL_OWNERS {
            anyhow::bail!(
                "Too many internal owners: {} (maximum: {})",
                owners.len(),
                MAX_INTERNAL_OWNERS
            );
        }

        let mut validated: Vec<String> = Vec::with_capacity(owners.len());
        for owner in owners {
            let owner = owner.trim().to_string();
            validate_owner(&owner)?;
            if !validated.contains(&owner) {
                validated.push(owner);
            }
        }

        Ok(Self { owners: validated })
    }

    pub fn owners(&self) -> &[String] {
        &self.owners
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn is_internal(&self, dependency: &Dependency) -> bool {
        if dependency.name().map_or(true, str::is_empty) {
            return false;
        }
        dependency
            .owner()
            .is_some_and(|owner| self.owners.iter().any(|o| o == owner))
    }

    /// Returns the internally owned dependencies, preserving input order
    pub fn select(&self, dependencies: &[Dependency]) -> Vec<Dependency> {
        dependencies
            .iter()
            .filter(|d| self.is_internal(d))
            .cloned()
            .collect()
    }
}

fn validate_owner(owner: &str) -> Result<()> {
    if owner.is_empty() {
        anyhow::bail!("Internal owner cannot be empty");
    }
    if owner.len() > MAX_OWNER_LENGTH {
        anyhow::bail!(
            "Internal owner is too long: {} characters (maximum: {})",
            owner.len(),
            MAX_OWNER_LENGTH
        );
    }
    if let Some(c) = owner
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        anyhow::bail!(
            "Internal owner '{}' contains invalid character '{}'. Only alphanumerics, '-', '_' and '.' are allowed.",
            owner,
            c
        );
    }
    Ok(())
}
