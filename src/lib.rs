//! Rules engine for standard chess: board state, per-piece legal-move
//! enumeration, check and checkmate detection, and the special moves
//! (castling, en passant and promotion).
//!
//! The crate is presentation-free by design: no rendering, input or timing
//! concepts. A front end asks [`game::Game`] for a piece's legal
//! destinations, plays one with [`game::Game::move_piece`], and reacts to
//! the returned [`game::MoveOutcome`] (captures, a pending promotion, the
//! new check state).
//!
//! ```
//! use shatranj::core::Position;
//! use shatranj::game::Game;
//!
//! let mut game = Game::standard();
//! let pawn = game.board().occupant(Position::new(1, 4)).unwrap();
//! assert!(game.legal_destinations(pawn).contains(&Position::new(3, 4)));
//! let outcome = game.move_piece(pawn, Position::new(3, 4)).unwrap();
//! assert!(outcome.captured.is_none());
//! ```

#![warn(missing_docs, variant_size_differences)]
// Rustc lints.
#![warn(
    absolute_paths_not_starting_with_crate,
    keyword_idents,
    macro_use_extern_crate,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_extern_crates,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications
)]
// Rustdoc lints.
#![warn(
    rustdoc::private_doc_tests,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_html_tags,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::bare_urls
)]
// Clippy lints.
#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::pedantic
)]

pub mod board;
pub mod core;
pub mod game;
pub mod movement;
