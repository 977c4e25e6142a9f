//! # Restring (Stringing Order Service)
//!
//! `restring` is the order-management backend for a racket-stringing service.
//! Clients submit stringing requests, query order status, and mutate orders
//! through a REST interface backed by `PostgreSQL`.
//!
//! ## Orders
//!
//! A stringing order carries the sport, racket model, string, tension,
//! pickup date, optional notes, and a price. Creation and field updates are
//! validated up front and every violated rule is reported in one response,
//! so a form client can show the complete correction list after a single
//! round trip.
//!
//! ## Status model
//!
//! Order statuses (`pending`, `paid`, `strung`, `picked_up`, `cancelled`)
//! form a flat label set. The status-update endpoint overwrites any label
//! with any other; there is no enforced transition graph. This matches the
//! workflow the shop actually runs, where staff correct mislabeled orders
//! by writing the right status directly.
//!
//! ## User associations
//!
//! The user-scoped creation endpoint records a `user_orders` association row
//! in the same transaction as the order itself, so a user's order list never
//! observes a half-created pair.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
