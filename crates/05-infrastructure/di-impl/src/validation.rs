//! 依赖图校验
//!
//! 只沿声明的依赖遍历，不调用任何构造函数。

use crate::container::{cycle_chain, Container};
use infrastructure_common::{ContainerError, ContainerResult, TypeKey};
use std::any::TypeId;
use std::collections::HashSet;
use tracing::debug;

impl Container {
    /// 校验全部已登记组件的依赖图
    ///
    /// 发现缺失实现、缺失构造函数、歧义绑定或循环依赖时返回第一个错误。
    pub fn validate(&self) -> ContainerResult<()> {
        self.bindings.ensure_unambiguous()?;

        let mut checked = HashSet::new();
        let mut path = Vec::new();
        for key in &self.descriptor_order {
            self.visit(*key, &mut path, &mut checked)?;
        }
        debug!("依赖图校验通过, 共 {} 个类型", checked.len());
        Ok(())
    }

    fn visit(&self, key: TypeKey, path: &mut Vec<TypeKey>, checked: &mut HashSet<TypeId>) -> ContainerResult<()> {
        if checked.contains(&key.id()) || self.registry.contains(key) {
            return Ok(());
        }

        if key.is_interface() {
            let candidate = self
                .bindings
                .winner(key)?
                .ok_or_else(|| ContainerError::NoImplementation {
                    type_name: key.name().to_string(),
                })?;
            return self.visit(candidate.concrete, path, checked);
        }

        if let Some(position) = path.iter().position(|visiting| *visiting == key) {
            return Err(ContainerError::CyclicDependency {
                chain: cycle_chain(&path[position..], key),
            });
        }

        let dependencies = self.declared_dependencies(key)?;
        path.push(key);
        for dependency in dependencies {
            self.visit(dependency, path, checked)?;
        }
        path.pop();
        checked.insert(key.id());
        Ok(())
    }
}
