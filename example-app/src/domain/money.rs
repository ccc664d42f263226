//! 货币与利率设置，由配置类从外部属性生成

use component_macros::{configuration, factories};
use config_impl::ApplicationProperties;
use infrastructure_common::ConfigResult;
use serde::Deserialize;
use std::sync::Arc;

/// 货币设置
#[derive(Debug, Clone, Deserialize)]
pub struct CurrencySettings {
    pub code: String,
    pub symbol: String,
    pub precision: u32,
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self {
            code: "CNY".to_string(),
            symbol: "¥".to_string(),
            precision: 2,
        }
    }
}

impl CurrencySettings {
    /// 把最小货币单位格式化为金额文本
    ///
    /// 精度超出 `u64` 可表示的范围时按最小货币单位原样输出。
    pub fn format(&self, minor_units: i64) -> String {
        let sign = if minor_units < 0 { "-" } else { "" };
        let value = minor_units.unsigned_abs();
        match 10_u64.checked_pow(self.precision) {
            Some(1) | None => format!("{}{}{}", sign, self.symbol, value),
            Some(scale) => format!(
                "{}{}{}.{:0width$}",
                sign,
                self.symbol,
                value / scale,
                value % scale,
                width = self.precision as usize
            ),
        }
    }
}

/// 储蓄利率策略
#[derive(Debug, Clone, Copy)]
pub struct InterestPolicy {
    /// 年化利率，单位为基点
    pub annual_rate_bp: u32,
}

/// 预算限额
#[derive(Debug, Clone, Copy)]
pub struct BudgetLimit {
    pub monthly_limit_cents: i64,
}

#[configuration]
pub struct MoneyConfiguration {
    properties: Arc<ApplicationProperties>,
}

#[factories]
impl MoneyConfiguration {
    #[factory]
    fn currency(&self) -> ConfigResult<CurrencySettings> {
        self.properties.get_or("currency", CurrencySettings::default())
    }

    #[factory(name = "interest_policy")]
    fn interest(&self) -> ConfigResult<InterestPolicy> {
        Ok(InterestPolicy {
            annual_rate_bp: self.properties.get_or("savings.annual_rate_bp", 250)?,
        })
    }

    #[factory]
    fn budget_limit(&self, currency: Arc<CurrencySettings>) -> ConfigResult<BudgetLimit> {
        let monthly_limit_cents = self.properties.get_or("budget.monthly_limit_cents", 500_000)?;
        tracing::debug!("预算限额: {}", currency.format(monthly_limit_cents));
        Ok(BudgetLimit { monthly_limit_cents })
    }
}
