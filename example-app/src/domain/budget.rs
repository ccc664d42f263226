//! 预算服务

use super::accounts::{AccountKind, AccountStore};
use super::money::{BudgetLimit, CurrencySettings};
use component_macros::component;
use std::sync::Arc;

/// 预算服务
#[component]
pub struct BudgetService {
    store: Arc<dyn AccountStore>,
    currency: Arc<CurrencySettings>,
    limit: Arc<BudgetLimit>,
}

impl BudgetService {
    /// 某个用户的可支配余额（仅活期账户）
    pub fn spendable(&self, owner: &str) -> i64 {
        self.store
            .all()
            .iter()
            .filter(|a| a.owner == owner && a.kind == AccountKind::Checking)
            .map(|a| a.balance_cents)
            .sum()
    }

    /// 本月剩余预算
    pub fn remaining(&self, spent_cents: i64) -> i64 {
        self.limit.monthly_limit_cents - spent_cents
    }

    pub fn summary(&self, owner: &str) -> String {
        format!(
            "{} 可支配 {}，月度预算 {} ({})",
            owner,
            self.currency.format(self.spendable(owner)),
            self.currency.format(self.limit.monthly_limit_cents),
            self.currency.code
        )
    }
}
