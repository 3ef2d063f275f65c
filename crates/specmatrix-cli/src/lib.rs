//! Command-line interface for exam specification matrices
//!
//! This crate provides the `specmatrix` command-line tool. It sends exam
//! matrix documents (PDFs, photos) to Gemini, prints the resulting
//! specification matrix and exports it as a Word document.
//!
//! # Quick Start
//!
//! ```bash
//! # Store the API key once
//! specmatrix key set AIza...
//!
//! # Generate from a scanned matrix, save JSON and DOCX
//! specmatrix generate matrix.pdf --json matrix.json --docx exports/
//!
//! # Use a layout sample and a custom distribution
//! specmatrix generate scan1.jpg scan2.jpg --template sample.pdf \
//!     --recognition 40,10,0 --understanding 30,4,2
//!
//! # Re-render or export a saved result
//! specmatrix render matrix.json --html matrix.html
//! specmatrix export matrix.json --output exports/
//! ```
//!
//! # Commands
//!
//! - `generate` - call the generation service once and show the matrix
//! - `render` - print a saved matrix as a table, optionally as HTML
//! - `export` - write a saved matrix as `.docx`
//! - `key` - set, show or clear the stored API key
//! - `config` - create, show or locate `.specmatrix.toml`
//!
//! # Configuration
//!
//! See [`config::Config`] for the file format and precedence rules, and
//! [`credentials`] for how the API key is resolved.

pub mod config;
pub mod credentials;
