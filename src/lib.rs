//! Chess rules engine: board state, legal move generation, check, checkmate
//! and stalemate detection and move execution including castling, en passant
//! and promotion.
//!
//! [`game::Game`] is the entry point for interactive play; the rules live in
//! [`chess`].

// Rustdoc lints.
#![warn(
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_html_tags,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::bare_urls
)]

pub mod chess;
pub mod game;
pub mod opponent;
