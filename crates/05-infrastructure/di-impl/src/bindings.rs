//! 接口绑定表
//!
//! 记录每个接口的全部候选实现，并按绑定策略选出唯一的实现。

use di_abstractions::BindingPolicy;
use infrastructure_common::{CastFn, ContainerError, ContainerResult, TypeKey};
use std::any::TypeId;
use std::collections::HashMap;
use tracing::{debug, warn};

/// 接口的一个候选实现
#[derive(Clone, Copy, Debug)]
pub struct BindingCandidate {
    /// 实现接口的具体类型
    pub concrete: TypeKey,
    /// 具体实例到接口句柄的转换
    pub cast: CastFn,
    /// 是否为首选实现
    pub primary: bool,
}

#[derive(Debug)]
struct InterfaceEntry {
    interface: TypeKey,
    candidates: Vec<BindingCandidate>,
}

/// 接口绑定表
#[derive(Debug)]
pub struct BindingTable {
    policy: BindingPolicy,
    entries: HashMap<TypeId, InterfaceEntry>,
    order: Vec<TypeKey>,
}

impl BindingTable {
    /// 创建绑定表
    pub fn new(policy: BindingPolicy) -> Self {
        Self {
            policy,
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// 当前绑定策略
    pub fn policy(&self) -> BindingPolicy {
        self.policy
    }

    /// 记录 `interface => candidate.concrete` 的候选绑定
    ///
    /// 同一具体类型重复声明时只保留最新的一条。
    pub fn record(&mut self, interface: TypeKey, candidate: BindingCandidate) {
        if self.policy == BindingPolicy::LastRegisteredWins {
            if let Some(previous) = self.replaced_winner(interface, &candidate) {
                warn!(
                    "接口 {} 的绑定被覆盖: {} -> {}",
                    interface, previous, candidate.concrete
                );
            }
        }

        if !self.entries.contains_key(&interface.id()) {
            self.order.push(interface);
        }
        let entry = self.entries.entry(interface.id()).or_insert_with(|| InterfaceEntry {
            interface,
            candidates: Vec::new(),
        });
        entry.candidates.retain(|c| c.concrete != candidate.concrete);
        debug!("记录接口绑定: {} => {}", interface, candidate.concrete);
        entry.candidates.push(candidate);
    }

    /// 追加候选后胜出实现发生变化时，返回原来的胜出者
    fn replaced_winner(&self, interface: TypeKey, candidate: &BindingCandidate) -> Option<TypeKey> {
        let entry = self.entries.get(&interface.id())?;
        let previous = select(self.policy, entry).ok()?;
        let mut candidates: Vec<BindingCandidate> = entry
            .candidates
            .iter()
            .filter(|c| c.concrete != candidate.concrete)
            .copied()
            .collect();
        candidates.push(*candidate);
        let current = select(self.policy, &InterfaceEntry { interface, candidates }).ok()?;
        (current.concrete != previous.concrete).then_some(previous.concrete)
    }

    /// 按绑定策略选出接口的实现
    ///
    /// 接口没有任何候选时返回 `Ok(None)`。
    pub fn winner(&self, interface: TypeKey) -> ContainerResult<Option<BindingCandidate>> {
        let Some(entry) = self.entries.get(&interface.id()) else {
            return Ok(None);
        };
        select(self.policy, entry).map(Some)
    }

    /// 具体类型胜出的全部接口
    pub fn implemented_by(&self, concrete: TypeKey) -> Vec<(TypeKey, CastFn)> {
        self.order
            .iter()
            .filter_map(|interface| {
                let entry = self.entries.get(&interface.id())?;
                let winner = select(self.policy, entry).ok()?;
                (winner.concrete == concrete).then_some((entry.interface, winner.cast))
            })
            .collect()
    }

    /// 检查所有接口都能选出唯一实现
    pub fn ensure_unambiguous(&self) -> ContainerResult<()> {
        for interface in &self.order {
            if let Some(entry) = self.entries.get(&interface.id()) {
                select(self.policy, entry)?;
            }
        }
        Ok(())
    }

    /// 已确定的绑定（按首次声明顺序），有歧义的接口被跳过
    pub fn resolved(&self) -> Vec<(TypeKey, TypeKey)> {
        self.order
            .iter()
            .filter_map(|interface| {
                let entry = self.entries.get(&interface.id())?;
                let winner = select(self.policy, entry).ok()?;
                Some((entry.interface, winner.concrete))
            })
            .collect()
    }
}

fn select(policy: BindingPolicy, entry: &InterfaceEntry) -> ContainerResult<BindingCandidate> {
    if let [only] = entry.candidates.as_slice() {
        return Ok(*only);
    }

    let primaries: Vec<&BindingCandidate> = entry.candidates.iter().filter(|c| c.primary).collect();
    if let [primary] = primaries.as_slice() {
        return Ok(**primary);
    }

    match policy {
        BindingPolicy::LastRegisteredWins => entry.candidates.last().copied().ok_or_else(|| {
            ContainerError::NoImplementation {
                type_name: entry.interface.name().to_string(),
            }
        }),
        BindingPolicy::Unique => Err(ContainerError::AmbiguousBinding {
            interface: entry.interface.name().to_string(),
            candidates: entry
                .candidates
                .iter()
                .map(|c| c.concrete.name().to_string())
                .collect(),
        }),
    }
}
