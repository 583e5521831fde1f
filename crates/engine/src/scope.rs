//! Wallet aggregation scope.
//!
//! The scope of a wallet is the set of wallet ids whose transactions count
//! toward its totals: the wallet itself plus its direct sub-wallets. The
//! hierarchy is one level deep and only expands from a top-level wallet, so
//! a sub-wallet's scope is always just itself.

use uuid::Uuid;

use crate::Wallet;

#[derive(Clone, Debug)]
pub struct WalletScope {
    pub wallet: Wallet,
    pub sub_wallets: Vec<Wallet>,
}

impl WalletScope {
    /// Resolves the scope of `wallet` against the candidate wallets.
    ///
    /// Candidates that are deleted or belong to another parent are ignored.
    pub fn resolve<I>(wallet: Wallet, candidates: I) -> Self
    where
        I: IntoIterator<Item = Wallet>,
    {
        let sub_wallets = if wallet.is_sub_wallet() {
            Vec::new()
        } else {
            candidates
                .into_iter()
                .filter(|candidate| {
                    candidate.parent_wallet_id == Some(wallet.id)
                        && candidate.deleted_at.is_none()
                })
                .collect()
        };

        Self {
            wallet,
            sub_wallets,
        }
    }

    /// All wallet ids in scope, the wallet itself first.
    pub fn ids(&self) -> Vec<Uuid> {
        std::iter::once(self.wallet.id)
            .chain(self.sub_wallets.iter().map(|w| w.id))
            .collect()
    }

    pub fn contains(&self, wallet_id: Uuid) -> bool {
        self.wallet.id == wallet_id || self.sub_wallets.iter().any(|w| w.id == wallet_id)
    }

    /// Name of the sub-wallet owning `wallet_id`, if it is one of ours.
    pub fn sub_wallet_name(&self, wallet_id: Uuid) -> Option<&str> {
        self.sub_wallets
            .iter()
            .find(|w| w.id == wallet_id)
            .map(|w| w.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::PeriodUnit;

    fn wallet(name: &str, parent: Option<Uuid>) -> Wallet {
        Wallet::new(
            "alice".to_string(),
            name,
            "EUR",
            "IT",
            PeriodUnit::Month,
            parent,
            0,
            Utc.timestamp_opt(0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn top_level_scope_includes_direct_sub_wallets() {
        let parent = wallet("Everyday", None);
        let child_a = wallet("Groceries", Some(parent.id));
        let child_b = wallet("Fuel", Some(parent.id));
        let unrelated = wallet("Travel", None);

        let scope = WalletScope::resolve(
            parent.clone(),
            vec![child_a.clone(), child_b.clone(), unrelated],
        );

        assert_eq!(scope.ids(), vec![parent.id, child_a.id, child_b.id]);
        assert!(scope.contains(child_a.id));
        assert_eq!(scope.sub_wallet_name(child_b.id), Some("Fuel"));
    }

    #[test]
    fn sub_wallet_scope_is_itself_only() {
        let parent = wallet("Everyday", None);
        let child = wallet("Groceries", Some(parent.id));
        let sibling = wallet("Fuel", Some(parent.id));

        let scope = WalletScope::resolve(child.clone(), vec![parent, sibling]);

        assert_eq!(scope.ids(), vec![child.id]);
        assert!(scope.sub_wallets.is_empty());
    }

    #[test]
    fn deleted_sub_wallets_are_ignored() {
        let parent = wallet("Everyday", None);
        let mut child = wallet("Groceries", Some(parent.id));
        child.deleted_at = Some(Utc.timestamp_opt(0, 0).unwrap());

        let scope = WalletScope::resolve(parent.clone(), vec![child]);

        assert_eq!(scope.ids(), vec![parent.id]);
    }
}
