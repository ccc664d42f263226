//! 储蓄计算

use super::accounts::AccountStore;
use super::money::{CurrencySettings, InterestPolicy};
use component_macros::component;
use std::sync::Arc;

/// 储蓄计算器
#[component]
pub struct SavingsCalculator {
    policy: Arc<InterestPolicy>,
    currency: Arc<CurrencySettings>,
    store: Arc<dyn AccountStore>,
}

impl SavingsCalculator {
    /// 按月复利预测余额，结果向下取整到最小货币单位
    pub fn project(&self, principal_cents: i64, months: u32) -> i64 {
        let monthly_rate = f64::from(self.policy.annual_rate_bp) / 10_000.0 / 12.0;
        let factor = (1.0 + monthly_rate).powi(months as i32);
        (principal_cents as f64 * factor).floor() as i64
    }

    /// 预测某个账户在若干月后的余额
    pub fn project_account(&self, id: u64, months: u32) -> Option<String> {
        let account = self.store.find(id)?;
        Some(self.currency.format(self.project(account.balance_cents, months)))
    }
}
