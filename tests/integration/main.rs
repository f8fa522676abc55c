//! HTTP-level tests against the in-memory store.

mod helpers;

mod alumni_test;
mod auth_test;
mod role_test;
mod user_test;
