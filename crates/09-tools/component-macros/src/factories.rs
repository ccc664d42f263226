//! 工厂方法宏实现
//!
//! `#[factories]` 作用在配置类的 `impl` 块上，收集其中带 `#[factory]` 的方法，
//! 生成 `Configuration::factory_methods()`。

use crate::utils::{arc_inner, result_ok_type, string_value};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    punctuated::Punctuated, Attribute, Error, FnArg, ImplItem, ImplItemFn, ItemImpl, Meta, Result, ReturnType,
    Token, Type,
};

/// 单个工厂方法的参数
#[derive(Default)]
struct FactoryArgs {
    name: Option<String>,
    provides: Vec<Type>,
}

impl FactoryArgs {
    fn from_attribute(attr: &Attribute) -> Result<Self> {
        let mut args = FactoryArgs::default();
        if matches!(attr.meta, Meta::Path(_)) {
            return Ok(args);
        }

        let parsed = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
        for meta in parsed {
            match &meta {
                Meta::List(list) if list.path.is_ident("provides") => {
                    let interfaces = list.parse_args_with(Punctuated::<Type, Token![,]>::parse_terminated)?;
                    args.provides.extend(interfaces);
                }
                Meta::NameValue(nv) if nv.path.is_ident("name") => {
                    args.name = Some(string_value(&nv.value)?);
                }
                other => {
                    return Err(Error::new_spanned(
                        other,
                        "未知的工厂方法参数，支持: provides(..), name = \"..\"",
                    ))
                }
            }
        }
        Ok(args)
    }
}

/// 解析后的工厂方法
struct FactorySpec {
    name: String,
    method: syn::Ident,
    product: Type,
    fallible: bool,
    dependencies: Vec<Type>,
    provides: Vec<Type>,
}

impl FactorySpec {
    fn parse(method: &ImplItemFn, args: FactoryArgs) -> Result<Self> {
        let sig = &method.sig;
        if sig.asyncness.is_some() {
            return Err(Error::new_spanned(sig, "工厂方法不能是 async"));
        }
        if !sig.generics.params.is_empty() {
            return Err(Error::new_spanned(&sig.generics, "工厂方法不支持泛型参数"));
        }

        let mut inputs = sig.inputs.iter();
        match inputs.next() {
            Some(FnArg::Receiver(receiver)) if receiver.reference.is_some() && receiver.mutability.is_none() => {}
            _ => return Err(Error::new_spanned(sig, "工厂方法的第一个参数必须是 &self")),
        }

        let mut dependencies = Vec::new();
        for input in inputs {
            let FnArg::Typed(typed) = input else {
                return Err(Error::new_spanned(input, "无效的工厂方法参数"));
            };
            let inner = arc_inner(&typed.ty).ok_or_else(|| Error::new_spanned(&typed.ty, "工厂方法参数必须是 Arc<T>"))?;
            dependencies.push(inner.clone());
        }

        let ReturnType::Type(_, output) = &sig.output else {
            return Err(Error::new_spanned(sig, "工厂方法必须有返回值"));
        };
        let (product, fallible) = match result_ok_type(output) {
            Some(ok) => (ok.clone(), true),
            None => ((**output).clone(), false),
        };

        Ok(Self {
            name: args.name.unwrap_or_else(|| sig.ident.to_string()),
            method: sig.ident.clone(),
            product,
            fallible,
            dependencies,
            provides: args.provides,
        })
    }

    fn to_tokens(&self, self_ty: &Type) -> TokenStream {
        let Self {
            name,
            method,
            product,
            fallible,
            dependencies,
            provides,
        } = self;

        let arguments: Vec<_> = (0..dependencies.len()).map(|i| format_ident!("__arg{}", i)).collect();
        let call = if *fallible {
            quote! {
                __owner.#method(#(#arguments),*).map_err(|err| {
                    ::infrastructure_common::ContainerError::construction(::std::any::type_name::<#product>(), err)
                })?
            }
        } else {
            quote! { __owner.#method(#(#arguments),*) }
        };

        quote! {
            ::infrastructure_common::FactoryMethod::new::<#product>(#name, |__owner, __resolver| {
                let __owner = __owner.downcast::<#self_ty>().map_err(|_| {
                    ::infrastructure_common::ContainerError::TypeMismatch {
                        type_name: ::std::any::type_name::<#self_ty>().to_string(),
                    }
                })?;
                #(let #arguments = ::infrastructure_common::resolve::<#dependencies>(__resolver)?;)*
                let __product: #product = #call;
                let __object: ::infrastructure_common::SharedAny = ::std::sync::Arc::new(__product);
                ::core::result::Result::Ok(__object)
            })
            .with_dependencies(::std::vec![#(::infrastructure_common::TypeKey::of::<#dependencies>()),*])
            #(.provides(::infrastructure_common::bind_interface!(#product => #provides)))*
        }
    }
}

fn is_factory_attribute(attr: &Attribute) -> bool {
    attr.path().is_ident("factory")
}

/// 展开 `#[factories]`
pub fn expand(args: TokenStream, input: TokenStream) -> Result<TokenStream> {
    if !args.is_empty() {
        return Err(Error::new_spanned(args, "#[factories] 不接受参数"));
    }
    let mut item: ItemImpl = syn::parse2(input)?;
    if item.trait_.is_some() {
        return Err(Error::new_spanned(&item.self_ty, "#[factories] 只能用于固有 impl 块"));
    }

    let mut specs = Vec::new();
    for impl_item in &mut item.items {
        let ImplItem::Fn(method) = impl_item else {
            continue;
        };
        let Some(position) = method.attrs.iter().position(is_factory_attribute) else {
            continue;
        };
        let attr = method.attrs.remove(position);
        if method.attrs.iter().any(is_factory_attribute) {
            return Err(Error::new_spanned(&method.sig.ident, "重复的 #[factory] 标记"));
        }
        let args = FactoryArgs::from_attribute(&attr)?;
        specs.push(FactorySpec::parse(method, args)?);
    }

    let self_ty = &item.self_ty;
    let factories = specs.iter().map(|spec| spec.to_tokens(self_ty));

    Ok(quote! {
        #item

        impl ::infrastructure_common::Configuration for #self_ty {
            fn factory_methods() -> ::std::vec::Vec<::infrastructure_common::FactoryMethod> {
                ::std::vec![#(#factories),*]
            }
        }
    })
}
