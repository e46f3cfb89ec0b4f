//! Meeting Scheduler - recurring stakeholder meetings on a business calendar
//!
//! This crate schedules recurring check-ins, sends reminders on the first
//! working day of each cycle, follows up on the last, and keeps an
//! attendance record for every meeting.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
