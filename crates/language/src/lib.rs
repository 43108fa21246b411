//! Syntax classification for abbreviation tracking.
//!
//! * [`classify`]: maps a declared syntax name to a [`SyntaxClass`]
//! * [`lookup`]: full [`SyntaxInfo`] entry, including XML and structure flags
//! * [`stylesheet_syntax_for_mime`]: resolves `<style type="...">` values

pub mod classify;

pub use classify::{
	DEFAULT_STYLESHEET_SYNTAX, SyntaxClass, SyntaxInfo, classify, is_stylesheet_syntax, lookup,
	stylesheet_syntax_for_mime,
};
