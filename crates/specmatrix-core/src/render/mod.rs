//! On-screen renderers for a [`MatrixView`](crate::MatrixView).
//!
//! - [`text`] - aligned terminal table
//! - [`html`] - standalone HTML page with merged topic cells
//!
//! Both read the precomputed topic spans from the view: a positive span
//! emits the topic cell, a zero span suppresses it.

pub mod html;
pub mod text;

pub use html::{render_html, render_html_table};
pub use text::render_text;
