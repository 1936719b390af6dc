//! Crate not intended for direct use.
//! Use https://docs.rs/thread-gen instead.
#![allow(nonstandard_style, unused_imports)]

use ::core::{
    mem,
    ops::Not as _,
};
use ::proc_macro::{
    TokenStream,
};
use ::proc_macro2::{
    Span,
    TokenStream as TokenStream2,
    TokenTree as TT,
};
use ::quote::{
    format_ident,
    quote,
    quote_spanned,
    ToTokens,
};
use ::syn::{*,
    parse::{Parse, Parser, ParseStream},
    punctuated::Punctuated,
    Result, // Explicitly shadow it
    spanned::Spanned,
};

mod utils;

#[proc_macro_attribute] pub
fn generator (
    attrs: TokenStream,
    input: TokenStream,
) -> TokenStream
{
    generator_impl(attrs.into(), input.into())
        .map(|ret| {
            #[cfg(feature = "verbose-expansions")] {
                utils::pretty_print_tokenstream(&ret);
            }
            ret
        })
        .unwrap_or_else(|err| {
            let mut errors =
                err .into_iter()
                    .map(|err| Error::new(
                        err.span(),
                        format_args!("`#[thread_gen::generator]`: {}", err),
                    ))
            ;
            let mut err = errors.next().unwrap();
            errors.for_each(|cur| err.combine(cur));
            err.to_compile_error()
        })
        .into()
}

/// `yield(T)` or just `T`.
struct YieldType(Type);

impl Parse for YieldType {
    fn parse (input: ParseStream<'_>)
      -> Result<Self>
    {
        let ty = if input.peek(Token![yield]) {
            let _: Token![yield] = input.parse()?;
            let contents;
            parenthesized!(contents in input);
            contents.parse()?
        } else {
            input.parse()?
        };
        let _: Option<Token![,]> = input.parse()?;
        Ok(Self(ty))
    }
}

fn generator_impl (
    params: TokenStream2,
    input: TokenStream2,
) -> Result<TokenStream2>
{
    let YieldType(yield_type) = parse2(params)?;

    let ItemFn {
        attrs,
        vis,
        mut sig,
        block,
    } = parse2(input)?;

    if let Some(ref asyncness) = sig.asyncness {
        return Err(Error::new_spanned(
            asyncness,
            "`async fn`s are not supported",
        ));
    }

    // Each iteration runs the body anew, so it works on its own copy of the
    // arguments.
    let mut per_run_args = vec![];
    for fn_arg in sig.inputs.iter_mut() {
        match *fn_arg {
            | FnArg::Receiver(ref receiver) => return Err(Error::new_spanned(
                receiver,
                "`self` receivers are not supported",
            )),

            | FnArg::Typed(PatType { ref mut pat, .. }) => match **pat {
                | Pat::Ident(PatIdent {
                    ref ident,
                    ref mut mutability,
                    by_ref: None,
                    subpat: None,
                    ..
                }) => {
                    let mutability = mutability.take();
                    per_run_args.push(quote!(
                        let #mutability #ident =
                            ::core::clone::Clone::clone(&#ident)
                        ;
                    ));
                },

                | ref other => return Err(Error::new_spanned(
                    other,
                    "only plain identifiers are supported as parameters",
                )),
            },
        }
    }

    let (ret, body) = match mem::replace(&mut sig.output, ReturnType::Default) {
        | ReturnType::Default => (
            quote!(
                ::core::result::Result<(), ::core::convert::Infallible>
            ),
            quote!({
                let () = (|| -> () #block)();
                ::core::result::Result::Ok(())
            }),
        ),

        | ReturnType::Type(_, ty) => (
            ty.to_token_stream(),
            quote!(
                (|| -> #ty #block)()
            ),
        ),
    };

    sig.output = parse_quote!(
        -> ::thread_gen::Generator<
            impl ::thread_gen::Producer<
                Item = #yield_type,
                Error = <
                    #ret as ::thread_gen::__::ProducerResult
                >::Error,
            >
        >
    );

    Ok(quote!(
        #(#attrs)*
        #vis
        #sig
        {
            ::thread_gen::Generator::new(::thread_gen::from_fn(
                move |__yielder__: &::thread_gen::Yielder<#yield_type>| -> #ret {
                    #(#per_run_args)*

                    #[allow(unused_macros)]
                    macro_rules! yield_ {(
                        $value:expr $(,)?
                    ) => (
                        ::thread_gen::Yielder::yield_(__yielder__, $value)
                    )}

                    #body
                }
            ))
        }
    ))
}
