// SPDX-License-Identifier: MIT

//!
//! *Part of the wider EpiCalendar project*
//!
//! This crate contains the EpiCalendar procedural macros
//!

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{LitInt, Token, parse_macro_input};

// Keep in step with the `Week` bounds in the core crate
const MIN_WEEK: i64 = 1;
const MAX_WEEK: i64 = 53;

/// Parse an integer literal, checking it lies within `min..=max`
fn parse_bounded(lit: &LitInt, type_name: &str, min: i64, max: i64) -> Result<i64, syn::Error> {
    let value = lit
        .base10_parse::<i64>()
        .map_err(|_| syn::Error::new_spanned(lit, "Expected a valid i64 integer literal"))?;

    if value < min || value > max {
        return Err(syn::Error::new_spanned(
            lit,
            format!("{type_name} must be between {min} and {max}"),
        ));
    }

    Ok(value)
}

/// Create a `Week`, using `week!(x)`, with compile time checking of the value.
#[proc_macro]
pub fn week(input: TokenStream) -> TokenStream {
    let lit = parse_macro_input!(input as LitInt);

    let value = match parse_bounded(&lit, "Week", MIN_WEEK, MAX_WEEK) {
        Ok(value) => value,
        Err(error) => return error.to_compile_error().into(),
    };

    quote! {
        Week::try_from(#value).unwrap()
    }
    .into()
}

/// Create an `EpiWeek`, using `epi_week!(year, week)`, with compile time
/// checking of the week number.
#[proc_macro]
pub fn epi_week(input: TokenStream) -> TokenStream {
    let parser = Punctuated::<LitInt, Token![,]>::parse_terminated;
    let args = match parser.parse(input) {
        Ok(args) => args,
        Err(error) => return error.to_compile_error().into(),
    };

    let lits: Vec<&LitInt> = args.iter().collect();
    let (year_lit, week_lit) = match lits.as_slice() {
        [year, week] => (*year, *week),
        _ => {
            return syn::Error::new(
                proc_macro2::Span::call_site(),
                "Expected `epi_week!(year, week)`",
            )
            .to_compile_error()
            .into();
        }
    };

    let year = match parse_bounded(
        year_lit,
        "Year",
        i64::from(i32::MIN),
        i64::from(i32::MAX),
    ) {
        Ok(year) => year as i32,
        Err(error) => return error.to_compile_error().into(),
    };

    let week = match parse_bounded(week_lit, "Week", MIN_WEEK, MAX_WEEK) {
        Ok(week) => week,
        Err(error) => return error.to_compile_error().into(),
    };

    quote! {
        EpiWeek::new(#year, #week).unwrap()
    }
    .into()
}
