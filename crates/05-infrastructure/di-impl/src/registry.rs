//! 实例注册表
//!
//! 每个具体类型至多一个实例；接口条目单独存放，指向同一个对象。

use crate::report::RegistrationOrigin;
use infrastructure_common::{CastFn, ContainerError, ContainerResult, Handle, SharedAny, TypeKey};
use std::any::TypeId;
use std::collections::HashMap;

/// 注册表中的一条具体类型记录
#[derive(Clone)]
pub struct Registration {
    /// 注册的类型
    pub key: TypeKey,
    /// 类型化句柄
    pub handle: Handle,
    /// 类型擦除的原始对象，只通过共享句柄注册时为空
    pub object: Option<SharedAny>,
    /// 实例来源
    pub origin: RegistrationOrigin,
}

/// 实例注册表
#[derive(Clone, Default)]
pub struct InstanceRegistry {
    entries: HashMap<TypeId, Registration>,
    interfaces: HashMap<TypeId, (TypeKey, Handle)>,
    order: Vec<TypeKey>,
}

impl InstanceRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册具体对象
    pub fn insert_object(
        &mut self,
        key: TypeKey,
        object: SharedAny,
        wrap: CastFn,
        origin: RegistrationOrigin,
    ) -> ContainerResult<Handle> {
        self.ensure_vacant(key)?;
        let handle = wrap(object.clone()).ok_or_else(|| ContainerError::TypeMismatch {
            type_name: key.name().to_string(),
        })?;
        self.push(Registration {
            key,
            handle: handle.clone(),
            object: Some(object),
            origin,
        });
        Ok(handle)
    }

    /// 注册已经类型化的句柄（`T` 可以是接口）
    pub fn insert_handle(&mut self, key: TypeKey, handle: Handle, origin: RegistrationOrigin) -> ContainerResult<()> {
        self.ensure_vacant(key)?;
        self.push(Registration {
            key,
            handle,
            object: None,
            origin,
        });
        Ok(())
    }

    /// 注册接口条目，已存在时保持原条目
    pub fn insert_interface(&mut self, interface: TypeKey, handle: Handle) {
        self.interfaces.entry(interface.id()).or_insert((interface, handle));
    }

    /// 查找实例句柄
    pub fn get(&self, key: TypeKey) -> Option<Handle> {
        self.entries
            .get(&key.id())
            .map(|r| r.handle.clone())
            .or_else(|| self.interfaces.get(&key.id()).map(|(_, h)| h.clone()))
    }

    /// 查找类型擦除的原始对象
    pub fn object(&self, key: TypeKey) -> Option<SharedAny> {
        self.entries.get(&key.id()).and_then(|r| r.object.clone())
    }

    /// 是否存在实例
    pub fn contains(&self, key: TypeKey) -> bool {
        self.entries.contains_key(&key.id()) || self.interfaces.contains_key(&key.id())
    }

    /// 具体类型记录（按注册顺序）
    pub fn registrations(&self) -> impl Iterator<Item = &Registration> {
        self.order.iter().filter_map(|key| self.entries.get(&key.id()))
    }

    /// 全部句柄（具体类型和接口），用于冻结
    pub fn handles(&self) -> HashMap<TypeId, Handle> {
        let mut handles: HashMap<TypeId, Handle> = self
            .interfaces
            .iter()
            .map(|(id, (_, handle))| (*id, handle.clone()))
            .collect();
        for (id, registration) in &self.entries {
            handles.insert(*id, registration.handle.clone());
        }
        handles
    }

    /// 已注册实例数量（不含接口条目）
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn ensure_vacant(&self, key: TypeKey) -> ContainerResult<()> {
        if self.entries.contains_key(&key.id()) {
            return Err(ContainerError::DuplicateRegistration {
                type_name: key.name().to_string(),
            });
        }
        Ok(())
    }

    fn push(&mut self, registration: Registration) {
        self.order.push(registration.key);
        self.entries.insert(registration.key.id(), registration);
    }
}
