//! 组件与配置类注册宏实现

use crate::utils::{injectable_impl, method_ident, registration_fn_name, string_value};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    parse::Parse, parse::ParseStream, punctuated::Punctuated, Error, Ident, ItemStruct, Meta, Result, Token, Type,
};

/// 标记种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// `#[component]`
    Component,
    /// `#[configuration]`
    Configuration,
}

impl MarkerKind {
    fn label(self) -> &'static str {
        match self {
            Self::Component => "component",
            Self::Configuration => "configuration",
        }
    }
}

/// 组件标记参数
#[derive(Default)]
pub struct ComponentArgs {
    /// 实现的接口（`dyn Trait`）
    pub provides: Vec<Type>,
    /// 是否为首选实现
    pub primary: bool,
    /// 自定义组件名称
    pub name: Option<String>,
    /// 构造后钩子方法
    pub post_construct: Option<Ident>,
}

impl Parse for ComponentArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut args = ComponentArgs::default();

        let parsed = Punctuated::<Meta, Token![,]>::parse_terminated(input)?;

        for meta in parsed {
            match &meta {
                Meta::Path(path) if path.is_ident("primary") => args.primary = true,
                Meta::List(list) if list.path.is_ident("provides") => {
                    let interfaces = list.parse_args_with(Punctuated::<Type, Token![,]>::parse_terminated)?;
                    args.provides.extend(interfaces);
                }
                Meta::NameValue(nv) if nv.path.is_ident("name") => {
                    args.name = Some(string_value(&nv.value)?);
                }
                Meta::NameValue(nv) if nv.path.is_ident("post_construct") => {
                    args.post_construct = Some(method_ident(&nv.value)?);
                }
                other => {
                    return Err(Error::new_spanned(
                        other,
                        "未知的组件参数，支持: provides(..), primary, name = \"..\", post_construct = \"..\"",
                    ))
                }
            }
        }

        Ok(args)
    }
}

/// 展开 `#[component]` / `#[configuration]`
pub fn expand(kind: MarkerKind, args: TokenStream, input: TokenStream) -> Result<TokenStream> {
    let args: ComponentArgs = if args.is_empty() {
        ComponentArgs::default()
    } else {
        syn::parse2(args)?
    };
    let item: ItemStruct = syn::parse2(input)?;

    if !item.generics.params.is_empty() {
        return Err(Error::new_spanned(&item.generics, "组件不支持泛型参数"));
    }
    if kind == MarkerKind::Configuration && (!args.provides.is_empty() || args.primary) {
        return Err(Error::new_spanned(
            &item.ident,
            "配置类不实现接口，请在 #[factory(provides(..))] 上声明",
        ));
    }

    let ident = &item.ident;
    let injectable = injectable_impl(ident, &item.fields);
    let registration = registration_code(kind, ident, &args);

    Ok(quote! {
        #item

        #injectable

        #registration
    })
}

/// 生成加载期注册代码
fn registration_code(kind: MarkerKind, ident: &Ident, args: &ComponentArgs) -> TokenStream {
    let fn_name = registration_fn_name(kind.label(), ident);

    let create = match kind {
        MarkerKind::Component => quote! {
            ::infrastructure_common::ComponentDescriptor::component::<#ident>(::core::module_path!())
                .injectable::<#ident>()
        },
        MarkerKind::Configuration => quote! {
            ::infrastructure_common::ComponentDescriptor::configuration::<#ident>(::core::module_path!())
        },
    };

    let named = args.name.as_ref().map(|name| quote! { .named(#name) });
    let primary = args.primary.then(|| quote! { .primary() });
    let provides = args.provides.iter().map(|interface| {
        quote! { .provides(::infrastructure_common::bind_interface!(#ident => #interface)) }
    });
    let hook = args.post_construct.as_ref().map(|method| {
        quote! {
            .with_post_construct(|object, resolver| {
                let component = object.downcast::<#ident>().map_err(|_| {
                    ::infrastructure_common::ContainerError::TypeMismatch {
                        type_name: ::std::any::type_name::<#ident>().to_string(),
                    }
                })?;
                component
                    .#method(resolver)
                    .map_err(|err| ::infrastructure_common::ContainerError::construction(
                        ::std::any::type_name::<#ident>(),
                        err,
                    ))
            })
        }
    });

    quote! {
        #[::infrastructure_common::__private::ctor]
        fn #fn_name() {
            ::infrastructure_common::register_component(
                #create
                    .at_line(::core::line!())
                    #named
                    #primary
                    #(#provides)*
                    #hook
            );
        }
    }
}
