//! 账户存储

use component_macros::component;
use infrastructure_common::{ContainerError, Resolver};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// 账户
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: u64,
    pub owner: String,
    pub kind: AccountKind,
    pub balance_cents: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AccountKind {
    Checking,
    Savings,
}

/// 账户存储接口
pub trait AccountStore: Send + Sync {
    fn all(&self) -> Vec<Account>;
    fn find(&self, id: u64) -> Option<Account>;
    fn save(&self, account: Account);
}

/// 内存账户存储
#[component(provides(dyn AccountStore), post_construct = "seed")]
pub struct InMemoryAccounts {
    accounts: RwLock<BTreeMap<u64, Account>>,
}

impl InMemoryAccounts {
    fn seed(&self, _resolver: &mut dyn Resolver) -> Result<(), ContainerError> {
        let samples = [
            (1, "alice", AccountKind::Checking, 325_000),
            (2, "alice", AccountKind::Savings, 1_200_000),
            (3, "bob", AccountKind::Checking, 48_050),
        ];
        for (id, owner, kind, balance_cents) in samples {
            self.save(Account {
                id,
                owner: owner.to_string(),
                kind,
                balance_cents,
            });
        }
        debug!("账户样例数据已写入: {} 条", samples.len());
        Ok(())
    }
}

impl AccountStore for InMemoryAccounts {
    fn all(&self) -> Vec<Account> {
        self.accounts.read().values().cloned().collect()
    }

    fn find(&self, id: u64) -> Option<Account> {
        self.accounts.read().get(&id).cloned()
    }

    fn save(&self, account: Account) {
        self.accounts.write().insert(account.id, account);
    }
}
