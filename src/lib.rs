//! Lesson Engine - Group-enrollment pricing and lifecycle service
//!
//! Teachers publish lessons whose per-student price drops as more students
//! join. Students enroll, cancel before the recruiting deadline, or request a
//! refund after it.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
