//! Role & Authority
//!
//! The ledger consults an [`AccessAuthority`] before privileged operations
//! (mint, pause, unpause). Grant/revoke policy lives outside the core;
//! [`AuthoritySet`] is a plain role table for tests and administration
//! tooling.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use lib_types::Address;

/// Role enumeration for authority checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Administration authority (role management, migrations)
    Admin,
    /// Mint authority (supply expansion)
    Minter,
    /// Pause authority (emergency stop)
    Pauser,
}

impl Role {
    /// String representation of the role (lowercase, stable across versions)
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Minter => "minter",
            Role::Pauser => "pauser",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "minter" => Ok(Role::Minter),
            "pauser" => Ok(Role::Pauser),
            other => Err(format!(
                "unknown role: '{}'. Valid roles: admin, minter, pauser",
                other
            )),
        }
    }
}

/// Capability check consulted by the ledger before privileged operations.
///
/// The ledger only ever asks "may this caller act in this role"; it never
/// stores roles or decides grant/revoke policy itself.
pub trait AccessAuthority {
    /// Check whether `caller` is authorized to act in `role`
    fn is_authorized(&self, caller: &Address, role: Role) -> bool;
}

/// Authority set: maps roles to sets of authorized addresses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthoritySet {
    authorities: HashMap<Role, HashSet<Address>>,
}

impl AuthoritySet {
    /// Create empty authority set
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant a role to an address
    pub fn grant(&mut self, role: Role, address: Address) {
        self.authorities.entry(role).or_default().insert(address);
    }

    /// Remove an address from a role
    pub fn renounce(&mut self, role: Role, address: &Address) {
        if let Some(set) = self.authorities.get_mut(&role) {
            set.remove(address);
        }
    }

    /// Check if an address has a role
    pub fn has_role(&self, role: Role, address: &Address) -> bool {
        self.authorities
            .get(&role)
            .map(|set| set.contains(address))
            .unwrap_or(false)
    }

    /// Get all addresses for a role
    pub fn addresses(&self, role: Role) -> impl Iterator<Item = &Address> {
        self.authorities
            .get(&role)
            .map(|set| set.iter())
            .into_iter()
            .flatten()
    }
}

impl AccessAuthority for AuthoritySet {
    fn is_authorized(&self, caller: &Address, role: Role) -> bool {
        self.has_role(role, caller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_and_renounce() {
        let mut authorities = AuthoritySet::new();
        let addr = Address::new([1u8; 32]);

        authorities.grant(Role::Minter, addr);
        assert!(authorities.has_role(Role::Minter, &addr));
        assert!(!authorities.has_role(Role::Pauser, &addr));

        authorities.renounce(Role::Minter, &addr);
        assert!(!authorities.has_role(Role::Minter, &addr));
    }

    #[test]
    fn authority_trait_delegates_to_table() {
        let mut authorities = AuthoritySet::new();
        let addr = Address::new([2u8; 32]);
        authorities.grant(Role::Pauser, addr);

        let authority: &dyn AccessAuthority = &authorities;
        assert!(authority.is_authorized(&addr, Role::Pauser));
        assert!(!authority.is_authorized(&addr, Role::Minter));
    }

    #[test]
    fn role_string_round_trip() {
        for role in [Role::Admin, Role::Minter, Role::Pauser] {
            let parsed: Role = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
        assert!("governor".parse::<Role>().is_err());
    }

    #[test]
    fn addresses_lists_only_granted() {
        let mut authorities = AuthoritySet::new();
        let a = Address::new([1u8; 32]);
        let b = Address::new([2u8; 32]);
        authorities.grant(Role::Admin, a);
        authorities.grant(Role::Admin, b);

        let mut admins: Vec<_> = authorities.addresses(Role::Admin).copied().collect();
        admins.sort();
        assert_eq!(admins, vec![a, b]);
        assert_eq!(authorities.addresses(Role::Minter).count(), 0);
    }
}
