//! 宏工具函数

use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::{Error, Expr, Fields, GenericArgument, Ident, Lit, PathArguments, Result, Type};

/// 若类型为 `Arc<T>`，返回 `T`
pub fn arc_inner(ty: &Type) -> Option<&Type> {
    generic_argument(ty, |ident| ident == "Arc")
}

/// 若类型为 `Result<T, E>`（或以 `Result` 结尾的别名），返回 `T`
pub fn result_ok_type(ty: &Type) -> Option<&Type> {
    generic_argument(ty, |ident| ident.to_string().ends_with("Result"))
}

fn generic_argument(ty: &Type, matches: impl Fn(&Ident) -> bool) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if !matches(&segment.ident) {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    })
}

/// 读取字符串字面量参数
pub fn string_value(expr: &Expr) -> Result<String> {
    match expr {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Str(lit_str) => Ok(lit_str.value()),
            other => Err(Error::new_spanned(other, "参数值必须是字符串字面量")),
        },
        other => Err(Error::new_spanned(other, "参数值必须是字符串字面量")),
    }
}

/// 读取方法名参数（如 `post_construct = "initialize"`）
pub fn method_ident(expr: &Expr) -> Result<Ident> {
    let name = string_value(expr)?;
    syn::parse_str::<Ident>(&name).map_err(|_| Error::new_spanned(expr, format!("无效的方法名: {name}")))
}

/// 加载期注册函数名
pub fn registration_fn_name(kind: &str, ident: &Ident) -> Ident {
    format_ident!("__register_{}_{}", kind, to_snake_case(&ident.to_string()))
}

/// 字段构造：`Arc<T>` 字段从解析器获取，其余字段取默认值
///
/// 返回依赖类型列表和 `Self { .. }` 构造表达式。
pub fn field_constructor(fields: &Fields, resolver: &Ident) -> (Vec<Type>, TokenStream) {
    let mut dependencies = Vec::new();
    let mut values = Vec::new();

    for field in fields.iter() {
        let value = match arc_inner(&field.ty) {
            Some(inner) => {
                dependencies.push(inner.clone());
                quote! { ::infrastructure_common::resolve::<#inner>(#resolver)? }
            }
            None => quote! { ::core::default::Default::default() },
        };
        values.push((field.ident.clone(), value));
    }

    let construct = match fields {
        Fields::Named(_) => {
            let entries = values.iter().map(|(ident, value)| quote! { #ident: #value });
            quote! { Self { #(#entries),* } }
        }
        Fields::Unnamed(_) => {
            let entries = values.iter().map(|(_, value)| value);
            quote! { Self( #(#entries),* ) }
        }
        Fields::Unit => quote! { Self },
    };

    (dependencies, construct)
}

/// 生成 `Injectable` 实现
pub fn injectable_impl(ident: &Ident, fields: &Fields) -> TokenStream {
    let resolver = Ident::new("__resolver", Span::call_site());
    let (dependencies, construct) = field_constructor(fields, &resolver);

    quote! {
        impl ::infrastructure_common::Injectable for #ident {
            fn dependencies() -> ::std::vec::Vec<::infrastructure_common::TypeKey> {
                ::std::vec![#(::infrastructure_common::TypeKey::of::<#dependencies>()),*]
            }

            fn inject(
                #resolver: &mut dyn ::infrastructure_common::Resolver,
            ) -> ::core::result::Result<Self, ::infrastructure_common::ContainerError> {
                ::core::result::Result::Ok(#construct)
            }
        }
    }
}

/// 将驼峰命名转换为蛇形命名
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            let prev_is_lower = chars.get(i - 1).is_some_and(|c| c.is_lowercase());
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());

            if prev_is_lower || next_is_lower {
                result.push('_');
            }
        }
        result.extend(ch.to_lowercase());
    }

    result
}
